//! Per-platform mapping rules.
//!
//! Each platform module turns a [`Listing`] into a [`Decision`]; this module
//! owns the shared pieces (split-part pre-step, cascade runner, slot tables)
//! and the conversion of a decision into a [`MappingResult`].

mod categories;
mod momo;
mod orange_point;
mod shopee;
mod slots;

use ivypick_core::{Catalog, Column, MappingResult, MatchStatus, Platform, RuleSet};

use crate::error::PipelineError;
use crate::normalize::normalize;
use crate::split::SplitMarker;
use crate::text::{compact, first_unit_count, Listing};

pub(crate) use slots::{is_pack_count, Slot};

/// An explicit spec, weight, or gift-box slot.
pub(crate) const EXPLICIT_CONFIDENCE: f64 = 0.95;
/// A category plus flavor keyword hit.
pub(crate) const CATEGORY_CONFIDENCE: f64 = 0.9;
/// A slot inferred from loose tokens or a singleton marker.
pub(crate) const INFERRED_CONFIDENCE: f64 = 0.85;

/// A recognised product, before catalog normalization.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Hit {
    pub product: String,
    pub confidence: f64,
    pub slot: Option<Slot>,
    pub multiplier: u32,
}

impl Hit {
    pub fn new(product: impl Into<String>, confidence: f64) -> Self {
        Self {
            product: product.into(),
            confidence,
            slot: None,
            multiplier: 1,
        }
    }

    #[must_use]
    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slot = Some(slot);
        self
    }
}

/// Outcome of running one platform's rules over a listing.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Decision {
    Filtered(&'static str),
    Unrecognized,
    Matched(Hit),
}

/// One category in a cascade. `resolve` returns `None` when the category
/// does not apply or applies without a recognisable flavor; either way the
/// cascade moves on.
pub(crate) struct CategoryRule {
    pub label: &'static str,
    pub resolve: fn(&Listing) -> Option<Hit>,
}

/// Known noise that is never counted.
pub(crate) struct Exclusion {
    pub label: &'static str,
    pub matches: fn(&Listing) -> bool,
}

pub(crate) fn excluded_by(exclusions: &[Exclusion], listing: &Listing) -> Option<&'static str> {
    exclusions
        .iter()
        .find(|e| (e.matches)(listing))
        .map(|e| e.label)
}

/// Runs `rules` in order; the first rule that resolves wins.
pub(crate) fn run_cascade(rules: &[CategoryRule], listing: &Listing) -> Option<Hit> {
    rules.iter().find_map(|rule| {
        let hit = (rule.resolve)(listing)?;
        tracing::debug!(rule = rule.label, product = %hit.product, "category rule matched");
        Some(hit)
    })
}

/// Maps one picking line to its production-sheet slot.
///
/// Split parts (names ending in a split marker) are mapped directly from
/// their canonical base on every platform. Everything else goes through the
/// cascade for `platform`'s rule set.
///
/// # Errors
///
/// Returns [`PipelineError::QuantityOverflow`] when `quantity × multiplier`
/// does not fit the quantity type.
pub fn map_product(
    catalog: &Catalog,
    name: &str,
    spec: &str,
    quantity: u32,
    platform: Platform,
) -> Result<MappingResult, PipelineError> {
    let decision = match SplitMarker::detect(name.trim()) {
        Some((marker, base)) => split_part(marker, base, spec),
        None => {
            let rule_set = platform.rule_set();
            match rule_set {
                RuleSet::MomoOfficial => momo::decide(&Listing::new(name, spec)),
                RuleSet::Shopee => shopee::decide(name, spec, catalog),
                RuleSet::OrangePoint => orange_point::decide(&Listing::new(name, "")),
            }
        }
    };

    finish(catalog, name, quantity, platform, decision)
}

/// A combo part whose spec names a count without a pack slot is left
/// unrecognised rather than counted in another row.
fn split_part(marker: SplitMarker, base: &str, spec: &str) -> Decision {
    let slot = match marker {
        SplitMarker::Promotion => Slot::SINGLE_MADELEINE,
        SplitMarker::Combo => {
            let spec = compact(spec);
            match (slots::pack_slot(&spec), first_unit_count(&spec)) {
                (Some(slot), _) => slot,
                (None, None) => Slot::TEN_PACK,
                (None, Some(count)) => {
                    tracing::warn!(part = base, count, "combo part has no pack slot for its count");
                    return Decision::Unrecognized;
                }
            }
        }
    };
    Decision::Matched(Hit::new(base, EXPLICIT_CONFIDENCE).with_slot(slot))
}

fn finish(
    catalog: &Catalog,
    name: &str,
    quantity: u32,
    platform: Platform,
    decision: Decision,
) -> Result<MappingResult, PipelineError> {
    let hit = match decision {
        Decision::Filtered(reason) => {
            tracing::debug!(%platform, name, reason, "line filtered");
            return Ok(MappingResult::filtered());
        }
        Decision::Unrecognized => {
            tracing::debug!(%platform, name, "no rule recognised line");
            return Ok(MappingResult::unrecognized());
        }
        Decision::Matched(hit) => hit,
    };

    let product = normalize(catalog, &hit.product);
    let mapped_quantity = quantity.checked_mul(hit.multiplier).ok_or_else(|| {
        PipelineError::overflow(name, format!("{quantity} x {}", hit.multiplier))
    })?;

    let column: Option<Column> = hit.slot.map(|s| s.column);
    Ok(MappingResult {
        template_product: Some(product),
        template_column: column,
        template_spec: hit.slot.and_then(|s| s.spec).map(str::to_string),
        multiplier: hit.multiplier,
        mapped_quantity,
        confidence: hit.confidence,
        status: MatchStatus::Matched,
    })
}
