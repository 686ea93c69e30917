//! Bundle splitting: one consolidated line may explode into several
//! single-flavor parts before mapping.
//!
//! Rules are tried in order and the first one that recognises a line wins.
//! Lines no rule recognises pass through untouched.

use std::sync::LazyLock;

use ivypick_core::{ConsolidatedRecord, SplitRecord};
use regex::Regex;

use crate::error::PipelineError;
use crate::rules::is_pack_count;
use crate::text::{compact, first_unit_count, has_unit_count};

/// Suffix carried by parts of a promotional pair.
pub const PROMOTION_SPLIT_MARKER: &str = "（活動拆分）";
/// Suffix carried by parts of a multi-flavor combo.
pub const COMBO_SPLIT_MARKER: &str = "（組合拆分）";

/// Which splitter produced a part. Recovered from the part name by the
/// mapper so split parts bypass the platform cascades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMarker {
    Promotion,
    Combo,
}

impl SplitMarker {
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            SplitMarker::Promotion => PROMOTION_SPLIT_MARKER,
            SplitMarker::Combo => COMBO_SPLIT_MARKER,
        }
    }

    /// Splits `name` into its marker and the canonical base in front of it.
    #[must_use]
    pub fn detect(name: &str) -> Option<(Self, &str)> {
        [SplitMarker::Promotion, SplitMarker::Combo]
            .into_iter()
            .find_map(|m| name.strip_suffix(m.marker()).map(|base| (m, base)))
    }
}

static COMBO_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[xX×*＊]\s*(\d+)\s*(?:袋|包)").expect("valid combo token regex")
});

/// A fixed promotional pair: one purchased unit yields one of each part.
struct PairSplit {
    label: &'static str,
    requires: &'static [&'static str],
    unit_count: u32,
    parts: [&'static str; 2],
    spec: &'static str,
}

const PAIR_SPLITS: &[PairSplit] = &[PairSplit {
    label: "madeleine_shell_pair",
    requires: &["胖貝殼瑪德蓮"],
    unit_count: 2,
    parts: ["瑪德蓮-蜂蜜", "瑪德蓮-巧克力"],
    spec: "單顆",
}];

/// A product family that can be ordered as a multi-flavor combo.
struct ComboFamily {
    label: &'static str,
    markers: &'static [&'static str],
    /// `(keyword, flavor)` checked in order; earlier entries shadow later ones.
    flavors: &'static [(&'static str, &'static str)],
}

const NUT_TART: ComboFamily = ComboFamily {
    label: "堅果塔",
    markers: &["堅果塔"],
    flavors: &[
        ("蜂蜜", "蜂蜜"),
        ("焦糖", "焦糖"),
        ("巧克力", "巧克力"),
        ("海苔", "海苔"),
        ("咖哩", "咖哩"),
    ],
};

const BEAN_TART: ComboFamily = ComboFamily {
    label: "豆塔",
    markers: &["豆塔"],
    flavors: &[
        ("蜂蜜蔓越莓", "蔓越莓"),
        ("蔓越莓", "蔓越莓"),
        ("焦糖", "焦糖"),
        ("巧克力", "巧克力"),
        ("抹茶", "抹茶"),
        ("椒麻", "椒麻"),
    ],
};

/// Categories that are never assumed to be bean-tart combos.
const NON_TART_CATEGORIES: &[&str] = &[
    "雪花餅", "瑪德蓮", "瓦片", "奶油", "西點", "椰棗", "堅果", "牛奶糖", "禮盒",
];

/// One parsed combo segment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComboPart {
    flavor: &'static str,
    unit_count: u32,
    multiplier: u32,
}

/// A part proposed by a split rule, before quantities are scaled.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PartPlan {
    name: String,
    spec: String,
    factor: u32,
}

/// Explodes bundle lines into single-flavor parts.
///
/// # Errors
///
/// Returns [`PipelineError::QuantityOverflow`] when a part quantity does not
/// fit the quantity type.
pub fn split_bundles(
    records: Vec<ConsolidatedRecord>,
    default_unit_count: u32,
) -> Result<Vec<SplitRecord>, PipelineError> {
    let mut out = Vec::with_capacity(records.len());

    for record in records {
        let plan = pair_split(&record).or_else(|| combo_split(&record, default_unit_count));
        let Some((label, parts)) = plan else {
            out.push(SplitRecord::passthrough(record));
            continue;
        };

        tracing::debug!(
            rule = label,
            name = %record.name,
            spec = %record.spec,
            parts = parts.len(),
            "split bundle line"
        );

        for part in parts {
            let quantity = record.quantity.checked_mul(part.factor).ok_or_else(|| {
                PipelineError::overflow(
                    &record.name,
                    format!("{} x {} while splitting", record.quantity, part.factor),
                )
            })?;
            out.push(SplitRecord::part(&record, part.name, part.spec, quantity));
        }
    }

    Ok(out)
}

fn pair_split(record: &ConsolidatedRecord) -> Option<(&'static str, Vec<PartPlan>)> {
    let text = compact(&format!("{}{}", record.name, record.spec));
    let rule = PAIR_SPLITS.iter().find(|rule| {
        rule.requires.iter().all(|k| text.contains(k)) && has_unit_count(&text, rule.unit_count)
    })?;

    let parts = rule
        .parts
        .iter()
        .map(|base| PartPlan {
            name: format!("{base}{PROMOTION_SPLIT_MARKER}"),
            spec: rule.spec.to_string(),
            factor: 1,
        })
        .collect();
    Some((rule.label, parts))
}

fn combo_split(
    record: &ConsolidatedRecord,
    default_unit_count: u32,
) -> Option<(&'static str, Vec<PartPlan>)> {
    let name = compact(&record.name);
    let spec = compact(&record.spec);
    let family = combo_family(&format!("{name}{spec}"))?;

    let parts = [spec.as_str(), name.as_str()]
        .into_iter()
        .find_map(|field| parse_combo(field, family, default_unit_count))?;

    let plans = parts
        .into_iter()
        .map(|p| PartPlan {
            name: format!("{}-{}{COMBO_SPLIT_MARKER}", family.label, p.flavor),
            spec: format!("{}入袋裝", p.unit_count),
            factor: p.multiplier,
        })
        .collect();
    Some(("flavor_combo", plans))
}

/// A line naming both tart families is ambiguous and is not split.
fn combo_family(text: &str) -> Option<&'static ComboFamily> {
    let names = |family: &ComboFamily| family.markers.iter().any(|m| text.contains(m));
    match (names(&NUT_TART), names(&BEAN_TART)) {
        (true, true) => return None,
        (true, false) => return Some(&NUT_TART),
        (false, true) => return Some(&BEAN_TART),
        (false, false) => {}
    }
    // Unlabelled combos are bean tarts unless another category is named.
    if NON_TART_CATEGORIES.iter().any(|c| text.contains(c)) {
        return None;
    }
    Some(&BEAN_TART)
}

/// Parses `flavor ... xN袋` segments. Each segment ends at its multiplier
/// token. Returns `None` unless there are at least two segments, every one
/// names a flavor and a packable unit count, and at least two flavors differ.
fn parse_combo(text: &str, family: &ComboFamily, default_unit_count: u32) -> Option<Vec<ComboPart>> {
    let mut parts = Vec::new();
    let mut start = 0;

    for caps in COMBO_TOKEN.captures_iter(text) {
        let token = caps.get(0)?;
        let segment = &text[start..token.end()];
        start = token.end();

        let multiplier: u32 = caps[1].parse().ok().filter(|&n| n > 0)?;
        let flavor = family
            .flavors
            .iter()
            .find(|(keyword, _)| segment.contains(keyword))
            .map(|&(_, flavor)| flavor)?;
        let unit_count = first_unit_count(segment).unwrap_or(default_unit_count);
        if !is_pack_count(unit_count) {
            return None;
        }

        parts.push(ComboPart {
            flavor,
            unit_count,
            multiplier,
        });
    }

    if parts.len() < 2 {
        return None;
    }
    let first = parts[0].flavor;
    if parts.iter().all(|p| p.flavor == first) {
        return None;
    }
    Some(parts)
}
