//! One statistics run: consolidate, split, map, override, aggregate, sort.

use std::collections::BTreeMap;

use ivypick_core::{
    Catalog, ConfidenceTier, ManualOverride, ManualOverrides, MappedProduct, MappingResult,
    MatchStatus, RawProductRecord, SplitRecord, StatisticsEntry,
};
use serde::Serialize;

use crate::aggregate::{aggregate, consolidate};
use crate::error::PipelineError;
use crate::rules::map_product;
use crate::sort::sort_statistics;
use crate::split::split_bundles;

/// Confidence recorded for operator overrides.
pub const OVERRIDE_CONFIDENCE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Unit count for combo segments that do not name one.
    pub combo_default_unit_count: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            combo_default_unit_count: 10,
        }
    }
}

/// Everything a run produced. `unmapped` holds the lines that did not reach
/// the statistics, whether filtered as noise or never recognised.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub statistics: Vec<StatisticsEntry>,
    pub mapped: Vec<MappedProduct>,
    pub unmapped: Vec<MappedProduct>,
}

impl PipelineReport {
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.statistics.iter().map(|e| e.quantity).sum()
    }

    /// Number of mapped lines per confidence tier.
    #[must_use]
    pub fn confidence_breakdown(&self) -> BTreeMap<ConfidenceTier, usize> {
        let mut counts = BTreeMap::new();
        for item in self.mapped.iter().filter(|m| m.mapping.is_mapped()) {
            *counts.entry(item.mapping.tier()).or_insert(0) += 1;
        }
        counts
    }
}

/// Read-only context shared by the stages of a run.
#[derive(Debug, Clone)]
pub struct Pipeline<'a> {
    catalog: &'a Catalog,
    overrides: Option<&'a ManualOverrides>,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            overrides: None,
            options: PipelineOptions::default(),
        }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: &'a ManualOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs every stage over `records`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyCatalog`] when there is nothing to map
    /// against, or [`PipelineError::QuantityOverflow`] from any stage.
    pub fn run(&self, records: Vec<RawProductRecord>) -> Result<PipelineReport, PipelineError> {
        if self.catalog.is_empty() {
            return Err(PipelineError::EmptyCatalog);
        }

        let input_lines = records.len();
        let consolidated = consolidate(records)?;
        let split = split_bundles(consolidated, self.options.combo_default_unit_count)?;

        let mut mapped = Vec::with_capacity(split.len());
        for record in split {
            mapped.push(self.map_record(record)?);
        }

        let mut statistics = aggregate(&mapped)?;
        sort_statistics(self.catalog, &mut statistics)?;

        let unmapped: Vec<MappedProduct> = mapped
            .iter()
            .filter(|m| !m.mapping.is_mapped())
            .cloned()
            .collect();
        for item in unmapped.iter().filter(|m| m.mapping.status == MatchStatus::Unrecognized) {
            tracing::warn!(
                name = %item.record.name,
                spec = %item.record.spec,
                source = %item.record.source,
                "unrecognised picking line"
            );
        }

        tracing::info!(
            input_lines,
            mapped_lines = mapped.len() - unmapped.len(),
            unmapped_lines = unmapped.len(),
            entries = statistics.len(),
            "pipeline run complete"
        );

        Ok(PipelineReport {
            statistics,
            mapped,
            unmapped,
        })
    }

    fn map_record(&self, record: SplitRecord) -> Result<MappedProduct, PipelineError> {
        let automatic = map_product(
            self.catalog,
            &record.name,
            &record.spec,
            record.quantity,
            record.source,
        )?;

        let mapping = match self
            .overrides
            .and_then(|o| o.find(&record.name, record.source))
        {
            Some(entry) => apply_override(&record, &automatic, entry)?,
            None => automatic,
        };

        Ok(MappedProduct { record, mapping })
    }
}

/// Replaces the automatic decision with an operator override.
///
/// The automatic multiplier survives when the line was mapped; otherwise it
/// is 1. An override without a product filters the line.
///
/// # Errors
///
/// Returns [`PipelineError::QuantityOverflow`] if the recomputed quantity
/// overflows.
pub fn apply_override(
    record: &SplitRecord,
    automatic: &MappingResult,
    entry: &ManualOverride,
) -> Result<MappingResult, PipelineError> {
    let Some(product) = entry.product.as_ref() else {
        tracing::info!(name = %record.name, source = %record.source, "override filtered line");
        return Ok(MappingResult::filtered());
    };

    let multiplier = if automatic.is_mapped() {
        automatic.multiplier
    } else {
        1
    };
    let mapped_quantity = record.quantity.checked_mul(multiplier).ok_or_else(|| {
        PipelineError::overflow(&record.name, format!("{} x {multiplier} in override", record.quantity))
    })?;

    tracing::info!(
        name = %record.name,
        source = %record.source,
        product = %product,
        "manual override applied"
    );

    Ok(MappingResult {
        template_product: Some(product.clone()),
        template_column: entry.column,
        template_spec: entry.spec.clone(),
        multiplier,
        mapped_quantity,
        confidence: OVERRIDE_CONFIDENCE,
        status: MatchStatus::Matched,
    })
}

#[cfg(test)]
mod tests {
    use ivypick_core::{Column, ConsolidatedRecord, Platform};

    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_names(["豆塔-蔓越莓", "豆塔-焦糖", "鳳凰酥"]).unwrap()
    }

    fn raw(name: &str, spec: &str, quantity: i64) -> RawProductRecord {
        RawProductRecord {
            name: name.to_string(),
            spec: spec.to_string(),
            quantity,
            source: Platform::Momo,
            raw_payload: None,
        }
    }

    fn split(name: &str, quantity: u32) -> SplitRecord {
        SplitRecord::passthrough(ConsolidatedRecord {
            name: name.to_string(),
            spec: String::new(),
            quantity,
            source: Platform::Shopee,
            raw_payload: None,
        })
    }

    fn override_to(product: Option<&str>) -> ManualOverride {
        ManualOverride {
            name: "神秘新品".to_string(),
            source: None,
            product: product.map(str::to_string),
            column: Some(Column::C),
            spec: Some("15入袋裝".to_string()),
        }
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let catalog = Catalog::default();
        let result = Pipeline::new(&catalog).run(vec![raw("鳳凰酥", "", 1)]);
        assert!(matches!(result, Err(PipelineError::EmptyCatalog)));
    }

    #[test]
    fn empty_input_gives_empty_report() {
        let catalog = catalog();
        let report = Pipeline::new(&catalog).run(Vec::new()).unwrap();
        assert!(report.statistics.is_empty());
        assert!(report.mapped.is_empty());
        assert_eq!(report.total_quantity(), 0);
    }

    #[test]
    fn override_on_unmapped_line_uses_multiplier_one() {
        let record = split("神秘新品", 3);
        let result =
            apply_override(&record, &MappingResult::unrecognized(), &override_to(Some("豆塔-焦糖")))
                .unwrap();
        assert_eq!(result.template_product.as_deref(), Some("豆塔-焦糖"));
        assert_eq!(result.template_column, Some(Column::C));
        assert_eq!(result.multiplier, 1);
        assert_eq!(result.mapped_quantity, 3);
        assert!((result.confidence - OVERRIDE_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn override_keeps_automatic_multiplier() {
        let record = split("神秘新品", 3);
        let automatic = MappingResult {
            template_product: Some("豆塔-蔓越莓".to_string()),
            template_column: Some(Column::B),
            template_spec: Some("10入袋裝".to_string()),
            multiplier: 2,
            mapped_quantity: 6,
            confidence: 0.9,
            status: MatchStatus::Matched,
        };
        let result = apply_override(&record, &automatic, &override_to(Some("豆塔-焦糖"))).unwrap();
        assert_eq!(result.multiplier, 2);
        assert_eq!(result.mapped_quantity, 6);
    }

    #[test]
    fn override_without_product_filters() {
        let record = split("鳳凰酥", 1);
        let result = apply_override(&record, &MappingResult::unrecognized(), &override_to(None))
            .unwrap();
        assert_eq!(result.status, MatchStatus::Filtered);
        assert_eq!(result.mapped_quantity, 0);
    }

    #[test]
    fn overrides_flow_into_statistics() {
        let catalog = catalog();
        let overrides = ManualOverrides {
            overrides: vec![override_to(Some("豆塔-焦糖"))],
        };
        let report = Pipeline::new(&catalog)
            .with_overrides(&overrides)
            .run(vec![raw("神秘 新品", "", 4)])
            .unwrap();

        assert!(report.unmapped.is_empty());
        assert_eq!(report.statistics.len(), 1);
        assert_eq!(report.statistics[0].name, "豆塔-焦糖");
        assert_eq!(report.statistics[0].quantity, 4);
    }

    #[test]
    fn breakdown_counts_mapped_lines_per_tier() {
        let catalog = catalog();
        let report = Pipeline::new(&catalog)
            .run(vec![
                raw("夏威夷豆塔 焦糖", "10入", 1),
                raw("鳳凰酥", "", 1),
                raw("運費", "", 1),
            ])
            .unwrap();
        let breakdown = report.confidence_breakdown();
        assert_eq!(breakdown.get(&ConfidenceTier::High), Some(&2));
        assert_eq!(breakdown.get(&ConfidenceTier::Low), None);
        assert_eq!(report.unmapped.len(), 1);
    }
}
