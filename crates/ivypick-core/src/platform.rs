use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// The order-export source a picking line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Momo,
    Official,
    Shopee,
    #[serde(alias = "orange_point")]
    OrangePoint,
}

/// The rule cascade used to map a platform's lines. MOMO and the official
/// web shop export the same dialect and share one cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleSet {
    MomoOfficial,
    Shopee,
    OrangePoint,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Momo,
        Platform::Official,
        Platform::Shopee,
        Platform::OrangePoint,
    ];

    #[must_use]
    pub fn rule_set(self) -> RuleSet {
        match self {
            Platform::Momo | Platform::Official => RuleSet::MomoOfficial,
            Platform::Shopee => RuleSet::Shopee,
            Platform::OrangePoint => RuleSet::OrangePoint,
        }
    }

    /// Source label printed in the picking-list exports.
    #[must_use]
    pub fn source_label(self) -> &'static str {
        match self {
            Platform::Momo => "MOMO",
            Platform::Official => "官網",
            Platform::Shopee => "蝦皮",
            Platform::OrangePoint => "橘點子",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Momo => write!(f, "momo"),
            Platform::Official => write!(f, "official"),
            Platform::Shopee => write!(f, "shopee"),
            Platform::OrangePoint => write!(f, "orangepoint"),
        }
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    /// Accepts the serialized names as well as the export source labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "momo" | "MOMO" => Ok(Platform::Momo),
            "official" | "官網" => Ok(Platform::Official),
            "shopee" | "蝦皮" => Ok(Platform::Shopee),
            "orangepoint" | "orange_point" | "橘點子" => Ok(Platform::OrangePoint),
            other => Err(CoreError::UnknownPlatform(other.to_string())),
        }
    }
}

/// Destination column in the production-tracking sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    B,
    C,
    D,
    E,
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Column::B => "B",
            Column::C => "C",
            Column::D => "D",
            Column::E => "E",
        };
        f.write_str(letter)
    }
}

impl FromStr for Column {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "B" | "b" => Ok(Column::B),
            "C" | "c" => Ok(Column::C),
            "D" | "d" => Ok(Column::D),
            "E" | "e" => Ok(Column::E),
            other => Err(CoreError::UnknownColumn(other.to_string())),
        }
    }
}
