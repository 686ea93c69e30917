//! Resolution of free-text names to canonical catalog spelling.

use ivypick_core::{strip_whitespace, Catalog};

/// Result of [`normalize_name`]. `catalog_hit` tells a recognised name from a
/// pass-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub name: String,
    pub catalog_hit: bool,
}

/// Maps `candidate` to the closest canonical name.
///
/// Whitespace is ignored on both sides. An exact match wins; otherwise the
/// longest catalog name contained in the candidate wins, earlier catalog
/// entries breaking ties. With no match the candidate comes back unchanged.
#[must_use]
pub fn normalize_name(catalog: &Catalog, candidate: &str) -> Normalized {
    let cleaned = strip_whitespace(candidate);
    if cleaned.is_empty() {
        return Normalized {
            name: candidate.to_string(),
            catalog_hit: false,
        };
    }

    if let Some((name, _)) = catalog.entries().find(|(_, compact)| *compact == cleaned) {
        return Normalized {
            name: name.to_string(),
            catalog_hit: true,
        };
    }

    let mut best: Option<(&str, usize)> = None;
    for (name, compact) in catalog.entries() {
        if !cleaned.contains(compact) {
            continue;
        }
        let len = compact.chars().count();
        if best.is_none_or(|(_, best_len)| len > best_len) {
            best = Some((name, len));
        }
    }

    match best {
        Some((name, _)) => Normalized {
            name: name.to_string(),
            catalog_hit: true,
        },
        None => Normalized {
            name: candidate.to_string(),
            catalog_hit: false,
        },
    }
}

/// [`normalize_name`] without the hit flag.
#[must_use]
pub fn normalize(catalog: &Catalog, candidate: &str) -> String {
    normalize_name(catalog, candidate).name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_names([
            "雙塔",
            "瓦片-原味",
            "瓦片-原味45克",
            "牛奶糖",
            "牛奶糖-50g",
            "雙塔禮盒",
            "豆塔-焦糖",
        ])
        .unwrap()
    }

    #[test]
    fn exact_match_wins() {
        let n = normalize_name(&catalog(), "瓦片-原味");
        assert_eq!(n.name, "瓦片-原味");
        assert!(n.catalog_hit);
    }

    #[test]
    fn exact_match_ignores_whitespace() {
        assert_eq!(normalize(&catalog(), " 豆塔 - 焦糖 "), "豆塔-焦糖");
    }

    #[test]
    fn longest_contained_name_wins() {
        assert_eq!(normalize(&catalog(), "招牌雙塔禮盒x1"), "雙塔禮盒");
        assert_eq!(normalize(&catalog(), "瓦片-原味45克袋裝"), "瓦片-原味45克");
    }

    #[test]
    fn equal_length_tie_resolves_to_first_in_catalog_order() {
        let catalog = Catalog::from_names(["豆塔-焦糖", "豆塔-抹茶"]).unwrap();
        assert_eq!(normalize(&catalog, "豆塔-抹茶豆塔-焦糖"), "豆塔-焦糖");
    }

    #[test]
    fn unknown_name_passes_through() {
        let n = normalize_name(&catalog(), "手工蛋捲 禮盒");
        assert_eq!(n.name, "手工蛋捲 禮盒");
        assert!(!n.catalog_hit);
    }

    #[test]
    fn empty_candidate_passes_through() {
        let n = normalize_name(&catalog(), "  ");
        assert!(!n.catalog_hit);
        assert_eq!(n.name, "  ");
    }

    #[test]
    fn normalization_is_idempotent_on_canonical_names() {
        let catalog = catalog();
        for name in catalog.names() {
            let once = normalize(&catalog, name);
            assert_eq!(normalize(&catalog, &once), once);
            assert_eq!(once, name);
        }
    }
}
