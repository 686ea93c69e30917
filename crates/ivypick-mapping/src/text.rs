//! Text preparation and token extraction shared by the splitter and the
//! mapping cascades.
//!
//! All matching runs on "compact" text: whitespace removed, full-width digits
//! and `ｇ` folded to ASCII. Numeric tokens are extracted whole, so a `50g`
//! test never fires on `150g`.

use std::sync::LazyLock;

use regex::Regex;

static WEIGHT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)g").expect("valid weight regex"));

static COUNT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)入").expect("valid count regex"));

static PACK_MULTIPLIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[xX×*＊]\s*(\d+)\s*包").expect("valid pack multiplier regex"));

static LEADING_BOXES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)盒").expect("valid box count regex"));

static BRACKETED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\[\(（【]([^\]\)）】]+)[\]\)）】]").expect("valid bracket regex")
});

static SQUARE_BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("valid square bracket regex"));

/// Strips whitespace and folds full-width digits, `ｇ`/`Ｇ`/`G` and `ｘ`.
#[must_use]
pub fn compact(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '０'..='９' => char::from_u32(u32::from(c) - u32::from('０') + u32::from('0')).unwrap_or(c),
            'ｇ' | 'Ｇ' | 'G' => 'g',
            'ｘ' | 'Ｘ' => 'x',
            other => other,
        })
        .collect()
}

/// One picking line prepared for rule evaluation.
#[derive(Debug, Clone)]
pub(crate) struct Listing {
    pub name: String,
    pub spec: String,
    pub full: String,
}

impl Listing {
    pub fn new(name: &str, spec: &str) -> Self {
        let name = compact(name);
        let spec = compact(spec);
        let full = format!("{name}{spec}");
        Self { name, spec, full }
    }

    /// True when `keyword` appears anywhere in name + spec.
    pub fn has(&self, keyword: &str) -> bool {
        self.full.contains(keyword)
    }

    pub fn has_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.full.contains(k))
    }

    pub fn name_or_spec_has(&self, keyword: &str) -> bool {
        self.name.contains(keyword) || self.spec.contains(keyword)
    }
}

/// All gram weights in `text`, left to right.
#[must_use]
pub fn weights(text: &str) -> Vec<u32> {
    WEIGHT_TOKEN
        .captures_iter(text)
        .filter_map(|c| c[1].parse().ok())
        .collect()
}

/// All `N入` unit counts in `text`, left to right.
#[must_use]
pub fn unit_counts(text: &str) -> Vec<u32> {
    COUNT_TOKEN
        .captures_iter(text)
        .filter_map(|c| c[1].parse().ok())
        .collect()
}

#[must_use]
pub fn first_unit_count(text: &str) -> Option<u32> {
    COUNT_TOKEN
        .captures(text)
        .and_then(|c| c[1].parse().ok())
}

#[must_use]
pub fn has_weight(text: &str, grams: u32) -> bool {
    weights(text).contains(&grams)
}

#[must_use]
pub fn has_unit_count(text: &str, count: u32) -> bool {
    unit_counts(text).contains(&count)
}

/// `x N 包` pack multiplier, ignoring zero.
#[must_use]
pub fn pack_multiplier(text: &str) -> Option<u32> {
    PACK_MULTIPLIER
        .captures(text)
        .and_then(|c| c[1].parse().ok())
        .filter(|&n| n > 0)
}

/// A spec that starts with `N盒` orders N boxes.
#[must_use]
pub fn leading_box_count(spec: &str) -> Option<u32> {
    LEADING_BOXES
        .captures(spec)
        .and_then(|c| c[1].parse().ok())
        .filter(|&n| n > 0)
}

/// Content of the first bracket pair of any style, trimmed.
#[must_use]
pub fn bracketed(text: &str) -> Option<&str> {
    BRACKETED
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

/// Content of the first `[...]` pair, trimmed.
#[must_use]
pub fn square_bracketed(text: &str) -> Option<&str> {
    SQUARE_BRACKETED
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}
