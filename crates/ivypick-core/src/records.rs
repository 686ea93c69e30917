use serde::{Deserialize, Serialize};

use crate::platform::{Column, Platform};

/// One picking-list line as handed over by a format adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProductRecord {
    pub name: String,
    #[serde(default)]
    pub spec: String,
    /// Adapters are expected to drop non-positive quantities; the pipeline
    /// guards against them anyway, so the raw value stays signed.
    pub quantity: i64,
    pub source: Platform,
    /// Whatever row/cell data the adapter wants to keep for review screens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_payload: Option<serde_json::Value>,
}

/// A [`RawProductRecord`] after literal `(name, source, spec)` duplicates
/// have been merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedRecord {
    pub name: String,
    pub spec: String,
    pub quantity: u32,
    pub source: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_payload: Option<serde_json::Value>,
}

/// Output of the bundle splitter. Unsplit records keep their own name and
/// spec as `original_name`/`original_spec`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitRecord {
    pub name: String,
    pub spec: String,
    pub quantity: u32,
    pub source: Platform,
    pub original_name: String,
    pub original_spec: String,
    pub is_split: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_payload: Option<serde_json::Value>,
}

impl SplitRecord {
    /// Wraps a consolidated record that no split rule touched.
    #[must_use]
    pub fn passthrough(record: ConsolidatedRecord) -> Self {
        Self {
            original_name: record.name.clone(),
            original_spec: record.spec.clone(),
            name: record.name,
            spec: record.spec,
            quantity: record.quantity,
            source: record.source,
            is_split: false,
            raw_payload: record.raw_payload,
        }
    }

    /// Builds one exploded part of `source`.
    #[must_use]
    pub fn part(
        source: &ConsolidatedRecord,
        name: impl Into<String>,
        spec: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            name: name.into(),
            spec: spec.into(),
            quantity,
            source: source.source,
            original_name: source.name.clone(),
            original_spec: source.spec.clone(),
            is_split: true,
            raw_payload: source.raw_payload.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// A rule (or a manual override) resolved a canonical product.
    Matched,
    /// Known noise: shipping fees, tote add-ons, coffee, etc.
    Filtered,
    /// Nothing in the cascade recognised the line.
    Unrecognized,
}

/// Review-highlighting thresholds shared by the engine and any consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    pub const HIGH_THRESHOLD: f64 = 0.9;
    pub const MEDIUM_THRESHOLD: f64 = 0.7;

    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            ConfidenceTier::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceTier::Low => write!(f, "low"),
            ConfidenceTier::Medium => write!(f, "medium"),
            ConfidenceTier::High => write!(f, "high"),
        }
    }
}

/// Where a picking line lands in the production sheet, and how many units.
///
/// `template_product == None` means "not counted"; `mapped_quantity` is then
/// always 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingResult {
    pub template_product: Option<String>,
    pub template_column: Option<Column>,
    pub template_spec: Option<String>,
    pub multiplier: u32,
    pub mapped_quantity: u32,
    pub confidence: f64,
    pub status: MatchStatus,
}

impl MappingResult {
    /// Confidence assigned to lines no rule recognised.
    pub const UNRECOGNIZED_CONFIDENCE: f64 = 0.3;

    #[must_use]
    pub fn filtered() -> Self {
        Self {
            template_product: None,
            template_column: None,
            template_spec: None,
            multiplier: 1,
            mapped_quantity: 0,
            confidence: 0.0,
            status: MatchStatus::Filtered,
        }
    }

    #[must_use]
    pub fn unrecognized() -> Self {
        Self {
            confidence: Self::UNRECOGNIZED_CONFIDENCE,
            status: MatchStatus::Unrecognized,
            ..Self::filtered()
        }
    }

    #[must_use]
    pub fn is_mapped(&self) -> bool {
        self.template_product.is_some()
    }

    #[must_use]
    pub fn tier(&self) -> ConfidenceTier {
        ConfidenceTier::from_score(self.confidence)
    }
}

/// A split record together with its mapping decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedProduct {
    #[serde(flatten)]
    pub record: SplitRecord,
    #[serde(flatten)]
    pub mapping: MappingResult,
}

/// One row of the final report: total units for a canonical product/spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsEntry {
    pub name: String,
    pub column: Option<Column>,
    pub spec: Option<String>,
    /// The input spec of the first line that contributed to this entry.
    pub flavor: String,
    pub quantity: u64,
}

impl StatisticsEntry {
    /// Grouping key used by the aggregator: `(product, spec or "default")`.
    #[must_use]
    pub fn key(&self) -> (&str, &str) {
        (self.name.as_str(), self.spec.as_deref().unwrap_or("default"))
    }
}
