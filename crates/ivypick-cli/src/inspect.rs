//! Single-item commands used to debug the catalog and the mapping rules.

use ivypick_core::{Catalog, Platform};
use ivypick_mapping::{map_product, normalize_name};

pub(crate) fn run_normalize(catalog: &Catalog, name: &str) {
    let normalized = normalize_name(catalog, name);
    let verdict = if normalized.catalog_hit {
        "catalog hit"
    } else {
        "not in catalog"
    };
    println!("{} ({verdict})", normalized.name);
}

/// Print the mapping decision for one line as JSON.
///
/// # Errors
///
/// Returns an error if the multiplied quantity overflows or serialization
/// fails.
pub(crate) fn run_map(
    catalog: &Catalog,
    name: &str,
    spec: &str,
    quantity: u32,
    platform: Platform,
) -> anyhow::Result<()> {
    let result = map_product(catalog, name, spec, quantity, platform)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub(crate) fn run_catalog(catalog: &Catalog) {
    for (idx, name) in catalog.names().enumerate() {
        println!("{:>3}  {name}", idx + 1);
    }
    println!();
    println!("{} products", catalog.len());
}
