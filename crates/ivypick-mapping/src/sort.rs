use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};
use icu_locid::locale;
use ivypick_core::{Catalog, StatisticsEntry};

use crate::error::PipelineError;

/// Orders entries by catalog row; names outside the catalog follow in zh-TW
/// (stroke) order. The sort is stable, so equal keys keep aggregation order.
///
/// # Errors
///
/// Returns [`PipelineError::Collation`] if the zh-TW collator cannot be built.
pub fn sort_statistics(
    catalog: &Catalog,
    entries: &mut [StatisticsEntry],
) -> Result<(), PipelineError> {
    let collator = Collator::try_new(&locale!("zh-TW").into(), CollatorOptions::new())
        .map_err(|e| PipelineError::Collation(e.to_string()))?;
    entries.sort_by(|a, b| compare(catalog, &collator, a, b));
    Ok(())
}

fn compare(
    catalog: &Catalog,
    collator: &Collator,
    a: &StatisticsEntry,
    b: &StatisticsEntry,
) -> Ordering {
    let rank = |e: &StatisticsEntry| catalog.position(&e.name).unwrap_or(usize::MAX);
    rank(a)
        .cmp(&rank(b))
        .then_with(|| match (catalog.contains(&a.name), catalog.contains(&b.name)) {
            (false, false) => collator.compare(&a.name, &b.name),
            _ => Ordering::Equal,
        })
}

#[cfg(test)]
mod tests {
    use ivypick_core::Column;

    use super::*;

    fn entry(name: &str, spec: &str) -> StatisticsEntry {
        StatisticsEntry {
            name: name.to_string(),
            column: Some(Column::B),
            spec: Some(spec.to_string()),
            flavor: String::new(),
            quantity: 1,
        }
    }

    fn names(entries: &[StatisticsEntry]) -> Vec<(&str, &str)> {
        entries.iter().map(StatisticsEntry::key).collect()
    }

    #[test]
    fn catalog_order_then_unknown_by_name() {
        let catalog = Catalog::from_names(["豆塔-蔓越莓", "豆塔-焦糖", "鳳凰酥"]).unwrap();
        let mut entries = vec![
            entry("乙-未知", "x"),
            entry("鳳凰酥", "x"),
            entry("甲-未知", "x"),
            entry("豆塔-蔓越莓", "x"),
        ];
        sort_statistics(&catalog, &mut entries).unwrap();
        assert_eq!(
            names(&entries),
            vec![("豆塔-蔓越莓", "x"), ("鳳凰酥", "x"), ("乙-未知", "x"), ("甲-未知", "x")]
        );
    }

    #[test]
    fn unknown_names_follow_stroke_order_not_code_points() {
        let catalog = Catalog::from_names(["鳳凰酥"]).unwrap();
        let mut entries = vec![entry("丹麥酥", "x"), entry("十穀酥", "x")];
        sort_statistics(&catalog, &mut entries).unwrap();
        assert_eq!(names(&entries), vec![("十穀酥", "x"), ("丹麥酥", "x")]);
    }

    #[test]
    fn same_product_keeps_aggregation_order() {
        let catalog = Catalog::from_names(["豆塔-焦糖"]).unwrap();
        let mut entries = vec![entry("豆塔-焦糖", "15入袋裝"), entry("豆塔-焦糖", "10入袋裝")];
        sort_statistics(&catalog, &mut entries).unwrap();
        assert_eq!(
            names(&entries),
            vec![("豆塔-焦糖", "15入袋裝"), ("豆塔-焦糖", "10入袋裝")]
        );
    }

    #[test]
    fn sorting_twice_is_stable() {
        let catalog = Catalog::from_names(["鳳凰酥"]).unwrap();
        let mut entries = vec![entry("未知", "b"), entry("鳳凰酥", "a"), entry("未知", "a")];
        sort_statistics(&catalog, &mut entries).unwrap();
        let once = entries.clone();
        sort_statistics(&catalog, &mut entries).unwrap();
        assert_eq!(entries, once);
    }
}
