//! Shopee exports. Flavors often live in the spec field, and the spec wins
//! over the name when it carries a weight or pack count.

use ivypick_core::Catalog;

use super::categories::{
    bean_tart, dates, gift_box, jujube_walnut_cake, nut_tart, phoenix_cake, pick, plain_nuts,
    puff_sticks, snowflake, ALMOND_TILES, BUTTER_COOKIES, MADELEINES, PASTRIES,
};
use super::slots::{is_singleton, pack_slot, singleton, weight_slot, Slot};
use super::{
    excluded_by, run_cascade, CategoryRule, Decision, Exclusion, Hit, CATEGORY_CONFIDENCE,
    EXPLICIT_CONFIDENCE, INFERRED_CONFIDENCE,
};
use crate::normalize::normalize_name;
use crate::text::{has_weight, pack_multiplier, unit_counts, weights, Listing};

/// Shop-name decorations prepended to listing titles.
const VENDOR_DECORATIONS: &[&str] = &["【艾薇手工坊】", "【艾薇】", "艾薇手工坊"];

fn is_coffee(listing: &Listing) -> bool {
    listing.has("咖啡") && !listing.has("咖啡小花") && !listing.has("禮盒")
}

fn is_tote_add_on(listing: &Listing) -> bool {
    listing.has("提袋加購")
}

fn is_shipping_fee(listing: &Listing) -> bool {
    listing.has("運費")
}

const EXCLUSIONS: &[Exclusion] = &[
    Exclusion { label: "coffee", matches: is_coffee },
    Exclusion { label: "tote_add_on", matches: is_tote_add_on },
    Exclusion { label: "shipping_fee", matches: is_shipping_fee },
];

/// Madeleine flavors are only trusted when the spec names the product.
fn madeleine_in_spec(listing: &Listing) -> Option<Hit> {
    if !listing.spec.contains("瑪德蓮") {
        return None;
    }
    pick(&listing.spec, MADELEINES).map(|p| Hit::new(p, CATEGORY_CONFIDENCE))
}

fn almond_tile(listing: &Listing) -> Option<Hit> {
    if !listing.name_or_spec_has("杏仁瓦片") {
        return None;
    }
    if listing.has("原味") && has_weight(&listing.full, 45) {
        return Some(Hit::new("瓦片-原味45克", CATEGORY_CONFIDENCE));
    }
    pick(&listing.full, ALMOND_TILES).map(|p| Hit::new(p, CATEGORY_CONFIDENCE))
}

fn milk_candy(listing: &Listing) -> Option<Hit> {
    let fifty = has_weight(&listing.full, 50);
    if listing.has("牛奶糖") && fifty {
        Some(Hit::new("牛奶糖-50g", CATEGORY_CONFIDENCE))
    } else if listing.has("夏威夷豆法式牛奶糖") {
        Some(Hit::new("牛奶糖", CATEGORY_CONFIDENCE))
    } else {
        None
    }
}

fn pineapple_cake(listing: &Listing) -> Option<Hit> {
    listing
        .has("金磚土鳳梨酥")
        .then(|| Hit::new("土鳳梨酥(紅點)", CATEGORY_CONFIDENCE))
}

/// Listings often name a single pastry without the family word; an
/// assorted box is only assorted when the spec or title says so.
fn pastry(listing: &Listing) -> Option<Hit> {
    let named = listing.name_or_spec_has("西點餅乾")
        || listing.has_any(&["藍莓小花", "咖啡小花", "蔓越莓貝殼", "巧克力貝殼", "乳酪酥條"]);
    if !named {
        return None;
    }
    if listing.spec.contains("綜合") || listing.name.contains("綜合西點") {
        return Some(Hit::new("西點-綜合", CATEGORY_CONFIDENCE));
    }
    pick(&listing.full, PASTRIES).map(|p| Hit::new(p, CATEGORY_CONFIDENCE))
}

fn butter_cookie(listing: &Listing) -> Option<Hit> {
    if !listing.has_any(&["奶油曲奇", "奶油餅乾", "經典熱銷餅乾"]) {
        return None;
    }
    pick(&listing.full, BUTTER_COOKIES).map(|p| Hit::new(p, CATEGORY_CONFIDENCE))
}

fn twin_tart(listing: &Listing) -> Option<Hit> {
    (listing.has("招牌雙塔") && !listing.has("禮盒"))
        .then(|| Hit::new("雙塔", CATEGORY_CONFIDENCE))
}

const RULES: &[CategoryRule] = &[
    CategoryRule { label: "gift_box", resolve: gift_box },
    CategoryRule { label: "madeleine", resolve: madeleine_in_spec },
    CategoryRule { label: "almond_tile", resolve: almond_tile },
    CategoryRule { label: "milk_candy", resolve: milk_candy },
    CategoryRule { label: "plain_nuts", resolve: plain_nuts },
    CategoryRule { label: "pineapple_cake", resolve: pineapple_cake },
    CategoryRule { label: "dates", resolve: dates },
    CategoryRule { label: "pastry", resolve: pastry },
    CategoryRule { label: "nut_tart", resolve: nut_tart },
    CategoryRule { label: "bean_tart", resolve: bean_tart },
    CategoryRule { label: "butter_cookie", resolve: butter_cookie },
    CategoryRule { label: "puff_sticks", resolve: puff_sticks },
    CategoryRule { label: "snowflake", resolve: snowflake },
    CategoryRule { label: "jujube_walnut_cake", resolve: jujube_walnut_cake },
    CategoryRule { label: "phoenix_cake", resolve: phoenix_cake },
    CategoryRule { label: "twin_tart", resolve: twin_tart },
];

fn strip_vendor(name: &str) -> String {
    VENDOR_DECORATIONS
        .iter()
        .fold(name.to_string(), |acc, deco| acc.replace(deco, ""))
        .trim()
        .to_string()
}

/// Last resort: the stripped title already names a catalog product.
fn catalog_fallback(name: &str, catalog: &Catalog) -> Option<Hit> {
    let normalized = normalize_name(catalog, name);
    if !normalized.catalog_hit {
        return None;
    }
    tracing::debug!(product = %normalized.name, "catalog fallback matched");
    Some(Hit::new(normalized.name, INFERRED_CONFIDENCE))
}

pub(super) fn decide(name: &str, spec: &str, catalog: &Catalog) -> Decision {
    let raw = Listing::new(name, spec);
    if let Some(reason) = excluded_by(EXCLUSIONS, &raw) {
        return Decision::Filtered(reason);
    }

    let stripped = strip_vendor(name);
    let listing = Listing::new(&stripped, spec);

    let Some(mut hit) =
        run_cascade(RULES, &listing).or_else(|| catalog_fallback(&stripped, catalog))
    else {
        return Decision::Unrecognized;
    };

    hit.multiplier = pack_multiplier(&listing.spec).unwrap_or(1);
    assign_slot(&listing, &mut hit);
    Decision::Matched(hit)
}

/// Weight and gift-box slots describe one physical item, so they reset the
/// multiplier.
fn assign_slot(listing: &Listing, hit: &mut Hit) {
    let spec_has_tokens =
        !weights(&listing.spec).is_empty() || !unit_counts(&listing.spec).is_empty();
    let source = if spec_has_tokens {
        &listing.spec
    } else {
        &listing.name
    };

    if listing.has("禮盒") {
        hit.slot = Some(Slot::GIFT_BOX);
        hit.confidence = EXPLICIT_CONFIDENCE;
        hit.multiplier = 1;
    } else if let Some(slot) = weight_slot(source) {
        hit.slot = Some(slot);
        hit.confidence = EXPLICIT_CONFIDENCE;
        hit.multiplier = 1;
    } else if let Some(slot) = pack_slot(source) {
        hit.slot = Some(slot);
        hit.confidence = CATEGORY_CONFIDENCE;
    } else if hit.product == "瓦片-原味45克" {
        hit.slot = Some(Slot::PLAIN_B);
        hit.confidence = EXPLICIT_CONFIDENCE;
        hit.multiplier = 1;
    } else if hit.product == "千層-小酥條" {
        hit.slot = Some(Slot::SMALL_PACK);
        hit.confidence = EXPLICIT_CONFIDENCE;
        hit.multiplier = 1;
    } else if is_singleton(listing) {
        let (slot, multiplier) = singleton(listing);
        hit.slot = Some(slot);
        hit.confidence = INFERRED_CONFIDENCE;
        if let Some(m) = multiplier {
            hit.multiplier = m;
        }
    }
}

#[cfg(test)]
mod tests {
    use ivypick_core::Column;

    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_names(["鳳凰酥", "雙塔", "瑪德蓮-抹茶", "無調味核桃"]).unwrap()
    }

    fn matched(name: &str, spec: &str) -> Hit {
        match decide(name, spec, &catalog()) {
            Decision::Matched(hit) => hit,
            other => panic!("expected a match for {name} / {spec}, got {other:?}"),
        }
    }

    #[test]
    fn vendor_prefix_is_stripped() {
        assert_eq!(strip_vendor("【艾薇手工坊】 夏威夷豆塔"), "夏威夷豆塔");
        assert_eq!(strip_vendor("艾薇手工坊 鳳凰酥"), "鳳凰酥");
    }

    #[test]
    fn flavor_and_pack_from_spec() {
        let hit = matched("【艾薇手工坊】夏威夷豆塔 多口味", "抹茶 15入");
        assert_eq!(hit.product, "豆塔-抹茶");
        assert_eq!(hit.slot.unwrap().column, Column::C);
        assert_eq!(hit.slot.unwrap().spec, Some("15入袋裝"));
    }

    #[test]
    fn spec_tokens_take_priority_over_name() {
        let hit = matched("杏仁瓦片 135g 多口味", "紅茶 90g");
        assert_eq!(hit.product, "瓦片-紅茶");
        assert_eq!(hit.slot.unwrap().spec, Some("90g"));
    }

    #[test]
    fn name_tokens_used_when_spec_has_none() {
        let hit = matched("杏仁瓦片 135g", "海苔");
        assert_eq!(hit.product, "瓦片-海苔");
        assert_eq!(hit.slot.unwrap().spec, Some("135g"));
        assert_eq!(hit.slot.unwrap().column, Column::C);
    }

    #[test]
    fn weight_slot_resets_multiplier() {
        let hit = matched("無調味堅果", "核桃 200g x2包");
        assert_eq!(hit.product, "無調味核桃");
        assert_eq!(hit.multiplier, 1);
        assert!((hit.confidence - EXPLICIT_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn pack_slot_keeps_multiplier() {
        let hit = matched("雪花餅", "蔓越莓 10入 x3包");
        assert_eq!(hit.product, "雪花餅-蔓越莓");
        assert_eq!(hit.multiplier, 3);
    }

    #[test]
    fn madeleine_flavor_only_from_spec() {
        let hit = matched("手工甜點", "瑪德蓮 隨機口味 單顆");
        assert_eq!(hit.product, "瑪德蓮-綜合");
        assert_eq!(hit.slot, Some(Slot::SINGLE_MADELEINE));
    }

    #[test]
    fn sixty_gram_slot_exists() {
        let hit = matched("夏威夷豆法式牛奶糖", "60g");
        assert_eq!(hit.product, "牛奶糖");
        assert_eq!(hit.slot.unwrap().spec, Some("60g"));
    }

    #[test]
    fn plain_tile_45g_without_spec_token_lands_in_b() {
        let hit = matched("杏仁瓦片 原味45g", "");
        assert_eq!(hit.product, "瓦片-原味45克");
        assert_eq!(hit.slot.unwrap().spec, Some("45g"));
    }

    #[test]
    fn twin_tart_gift_box_is_not_plain_twin_tart() {
        let hit = matched("招牌雙塔禮盒", "");
        assert_eq!(hit.product, "雙塔禮盒");
        assert_eq!(hit.slot, Some(Slot::GIFT_BOX));
    }

    #[test]
    fn catalog_fallback_recognises_plain_names() {
        let hit = matched("【艾薇】無調味核桃 經典", "");
        assert_eq!(hit.product, "無調味核桃");
        assert!((hit.confidence - INFERRED_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn shipping_and_coffee_are_filtered() {
        assert_eq!(decide("運費", "", &catalog()), Decision::Filtered("shipping_fee"));
        assert_eq!(decide("耶加雪菲咖啡豆", "", &catalog()), Decision::Filtered("coffee"));
    }

    #[test]
    fn unknown_listing_is_unrecognized() {
        assert_eq!(decide("神秘新品", "", &catalog()), Decision::Unrecognized);
    }
}
