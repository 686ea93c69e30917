//! Line consolidation before splitting, and statistics aggregation after
//! mapping.

use std::collections::HashMap;

use ivypick_core::{ConsolidatedRecord, MappedProduct, Platform, RawProductRecord, StatisticsEntry};

use crate::error::PipelineError;

/// Merges raw lines with an identical `(name, source, spec)` triple.
///
/// Output order follows the first appearance of each key. Lines with a
/// non-positive quantity are dropped with a warning.
///
/// # Errors
///
/// Returns [`PipelineError::QuantityOverflow`] when a line or a merged total
/// does not fit the quantity type.
pub fn consolidate(raw: Vec<RawProductRecord>) -> Result<Vec<ConsolidatedRecord>, PipelineError> {
    let mut out: Vec<ConsolidatedRecord> = Vec::new();
    let mut index: HashMap<(String, Platform, String), usize> = HashMap::new();

    for record in raw {
        if record.quantity <= 0 {
            tracing::warn!(
                name = %record.name,
                source = %record.source,
                quantity = record.quantity,
                "dropping line with non-positive quantity"
            );
            continue;
        }
        let quantity = u32::try_from(record.quantity).map_err(|_| {
            PipelineError::overflow(&record.name, format!("line quantity {}", record.quantity))
        })?;

        let key = (record.name.clone(), record.source, record.spec.clone());
        if let Some(&idx) = index.get(&key) {
            let current = out[idx].quantity;
            out[idx].quantity = current.checked_add(quantity).ok_or_else(|| {
                PipelineError::overflow(
                    &record.name,
                    format!("{current} + {quantity} while consolidating"),
                )
            })?;
            continue;
        }

        index.insert(key, out.len());
        out.push(ConsolidatedRecord {
            name: record.name,
            spec: record.spec,
            quantity,
            source: record.source,
            raw_payload: record.raw_payload,
        });
    }

    Ok(out)
}

/// Sums mapped quantities per `(product, spec)`.
///
/// Unmapped lines are skipped. Column and flavor come from the first line
/// seen for each key; output order is first appearance, ready for sorting.
///
/// # Errors
///
/// Returns [`PipelineError::QuantityOverflow`] if a total overflows.
pub fn aggregate(mapped: &[MappedProduct]) -> Result<Vec<StatisticsEntry>, PipelineError> {
    let mut out: Vec<StatisticsEntry> = Vec::new();
    let mut index: HashMap<(String, Option<String>), usize> = HashMap::new();

    for item in mapped {
        let Some(product) = item.mapping.template_product.as_ref() else {
            continue;
        };
        let quantity = u64::from(item.mapping.mapped_quantity);
        let key = (product.clone(), item.mapping.template_spec.clone());

        if let Some(&idx) = index.get(&key) {
            let entry = &mut out[idx];
            entry.quantity = entry
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| PipelineError::overflow(product, "statistics total"))?;
            continue;
        }

        index.insert(key, out.len());
        out.push(StatisticsEntry {
            name: product.clone(),
            column: item.mapping.template_column,
            spec: item.mapping.template_spec.clone(),
            flavor: item.record.spec.clone(),
            quantity,
        });
    }

    Ok(out)
}
