//! OrangePoint exports carry everything in the product name; flavors sit in
//! brackets, e.g. `夏威夷豆塔[焦糖]10入`.

use super::categories::{
    pick, Flavor, ALMOND_TILES, BEAN_TARTS, GIFT_BOXES, NUT_TARTS, SNOWFLAKES,
};
use super::slots::{pack_slot, weight_slot, Slot};
use super::{
    excluded_by, run_cascade, CategoryRule, Decision, Exclusion, Hit, EXPLICIT_CONFIDENCE,
};
use crate::text::{bracketed, square_bracketed, Listing};

fn is_coffee(listing: &Listing) -> bool {
    listing.has("咖啡") && !listing.has("咖啡小花")
}

fn is_shipping_fee(listing: &Listing) -> bool {
    listing.has("運費")
}

fn is_bag(listing: &Listing) -> bool {
    listing.has_any(&["贈品袋", "提袋"])
}

const EXCLUSIONS: &[Exclusion] = &[
    Exclusion { label: "coffee", matches: is_coffee },
    Exclusion { label: "shipping_fee", matches: is_shipping_fee },
    Exclusion { label: "bag", matches: is_bag },
];

fn hit(product: &str, slot: Option<Slot>) -> Hit {
    Hit {
        slot,
        ..Hit::new(product, EXPLICIT_CONFIDENCE)
    }
}

/// Bracketed flavor first, then the whole title.
fn almond_tile(listing: &Listing) -> Option<Hit> {
    if !listing.has("杏仁瓦片") {
        return None;
    }
    let product = bracketed(&listing.name)
        .and_then(|flavor| pick(flavor, ALMOND_TILES))
        .or_else(|| pick(&listing.name, ALMOND_TILES))?;
    Some(hit(product, weight_slot(&listing.name)))
}

/// Tart flavors are only read from `[...]`.
fn tart(listing: &Listing, marker: &str, table: &[Flavor]) -> Option<Hit> {
    if !listing.has(marker) {
        return None;
    }
    let product = square_bracketed(&listing.name).and_then(|flavor| pick(flavor, table))?;
    Some(hit(product, pack_slot(&listing.name)))
}

fn bean_tart(listing: &Listing) -> Option<Hit> {
    tart(listing, "夏威夷豆塔", BEAN_TARTS)
}

fn nut_tart(listing: &Listing) -> Option<Hit> {
    tart(listing, "堅果塔", NUT_TARTS)
}

fn snowflake(listing: &Listing) -> Option<Hit> {
    if !listing.has("雪花餅") {
        return None;
    }
    let product = pick(&listing.name, SNOWFLAKES)?;
    Some(hit(product, pack_slot(&listing.name)))
}

fn gift_box(listing: &Listing) -> Option<Hit> {
    if !listing.has("禮盒") {
        return None;
    }
    pick(&listing.name, GIFT_BOXES).map(|p| hit(p, Some(Slot::GIFT_BOX)))
}

const RULES: &[CategoryRule] = &[
    CategoryRule { label: "almond_tile", resolve: almond_tile },
    CategoryRule { label: "bean_tart", resolve: bean_tart },
    CategoryRule { label: "nut_tart", resolve: nut_tart },
    CategoryRule { label: "snowflake", resolve: snowflake },
    CategoryRule { label: "gift_box", resolve: gift_box },
];

/// Always multiplier 1: OrangePoint quantities are already in units.
pub(super) fn decide(listing: &Listing) -> Decision {
    if let Some(reason) = excluded_by(EXCLUSIONS, listing) {
        return Decision::Filtered(reason);
    }
    run_cascade(RULES, listing).map_or(Decision::Unrecognized, Decision::Matched)
}
