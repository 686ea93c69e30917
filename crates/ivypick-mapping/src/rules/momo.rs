//! MOMO and official web shop exports.

use super::categories::{
    almond_tile, bean_tart, butter_cookie, dates, gift_box, jujube_walnut_cake, madeleine,
    milk_candy, nut_tart, pastry, phoenix_cake, pineapple_cake, plain_nuts, puff_sticks,
    snowflake, twin_tart,
};
use super::slots::{is_singleton, pack_slot, singleton, weight_slot};
use super::{
    excluded_by, run_cascade, CategoryRule, Decision, Exclusion, CATEGORY_CONFIDENCE,
    INFERRED_CONFIDENCE,
};
use crate::text::{leading_box_count, pack_multiplier, Listing};

/// Promotional bundle SKU that is picked through its component lines.
const BUNDLE_SKU: &str = "TP00019370000000";

fn is_coffee(listing: &Listing) -> bool {
    listing.has("咖啡") && !listing.has("咖啡小花") && !listing.has("禮盒")
}

fn is_tote_add_on(listing: &Listing) -> bool {
    listing.has("提袋加購")
}

fn is_shipping_fee(listing: &Listing) -> bool {
    listing.has("運費")
}

fn is_bundle_sku(listing: &Listing) -> bool {
    listing.has(BUNDLE_SKU)
}

const EXCLUSIONS: &[Exclusion] = &[
    Exclusion { label: "coffee", matches: is_coffee },
    Exclusion { label: "tote_add_on", matches: is_tote_add_on },
    Exclusion { label: "shipping_fee", matches: is_shipping_fee },
    Exclusion { label: "bundle_sku", matches: is_bundle_sku },
];

const RULES: &[CategoryRule] = &[
    CategoryRule { label: "gift_box", resolve: gift_box },
    CategoryRule { label: "bean_tart", resolve: bean_tart },
    CategoryRule { label: "nut_tart", resolve: nut_tart },
    CategoryRule { label: "snowflake", resolve: snowflake },
    CategoryRule { label: "madeleine", resolve: madeleine },
    CategoryRule { label: "almond_tile", resolve: almond_tile },
    CategoryRule { label: "butter_cookie", resolve: butter_cookie },
    CategoryRule { label: "pastry", resolve: pastry },
    CategoryRule { label: "puff_sticks", resolve: puff_sticks },
    CategoryRule { label: "plain_nuts", resolve: plain_nuts },
    CategoryRule { label: "dates", resolve: dates },
    CategoryRule { label: "milk_candy", resolve: milk_candy },
    CategoryRule { label: "pineapple_cake", resolve: pineapple_cake },
    CategoryRule { label: "twin_tart", resolve: twin_tart },
    CategoryRule { label: "jujube_walnut_cake", resolve: jujube_walnut_cake },
    CategoryRule { label: "phoenix_cake", resolve: phoenix_cake },
];

pub(super) fn decide(listing: &Listing) -> Decision {
    if let Some(reason) = excluded_by(EXCLUSIONS, listing) {
        return Decision::Filtered(reason);
    }

    let Some(mut hit) = run_cascade(RULES, listing) else {
        return Decision::Unrecognized;
    };

    hit.multiplier = pack_multiplier(&listing.full)
        .or_else(|| leading_box_count(&listing.spec))
        .unwrap_or(1);

    if hit.slot.is_some() {
        return Decision::Matched(hit);
    }

    // Tokens in the spec field outrank those only found in the name.
    let explicit = weight_slot(&listing.spec)
        .or_else(|| pack_slot(&listing.spec))
        .or_else(|| weight_slot(&listing.full));
    if let Some(slot) = explicit {
        hit.slot = Some(slot);
        hit.confidence = CATEGORY_CONFIDENCE;
    } else if let Some(slot) = pack_slot(&listing.full) {
        hit.slot = Some(slot);
        hit.confidence = INFERRED_CONFIDENCE;
    } else if is_singleton(listing) {
        let (slot, multiplier) = singleton(listing);
        hit.slot = Some(slot);
        hit.confidence = CATEGORY_CONFIDENCE;
        if let Some(m) = multiplier {
            hit.multiplier = m;
        }
    }

    Decision::Matched(hit)
}

#[cfg(test)]
mod tests {
    use ivypick_core::Column;

    use super::super::{Hit, Slot};
    use super::*;

    fn matched(name: &str, spec: &str) -> Hit {
        match decide(&Listing::new(name, spec)) {
            Decision::Matched(hit) => hit,
            other => panic!("expected a match for {name} / {spec}, got {other:?}"),
        }
    }

    #[test]
    fn bean_tart_ten_pack() {
        let hit = matched("夏威夷豆塔-蔓越莓口味", "10入袋裝");
        assert_eq!(hit.product, "豆塔-蔓越莓");
        assert_eq!(hit.slot, Some(Slot::TEN_PACK));
        assert_eq!(hit.multiplier, 1);
        assert!((hit.confidence - CATEGORY_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn pack_multiplier_scales_order() {
        let hit = matched("堅果塔 海苔", "15入 x3包");
        assert_eq!(hit.product, "堅果塔-海苔");
        assert_eq!(hit.slot.unwrap().column, Column::C);
        assert_eq!(hit.multiplier, 3);
    }

    #[test]
    fn leading_box_count_is_a_multiplier() {
        let hit = matched("戀戀雪花禮盒", "2盒");
        assert_eq!(hit.product, "戀戀雪花禮盒");
        assert_eq!(hit.slot, Some(Slot::GIFT_BOX));
        assert_eq!(hit.multiplier, 2);
    }

    #[test]
    fn count_only_in_name_is_inferred() {
        let hit = matched("雪花餅 抹茶 12入", "");
        assert_eq!(hit.slot.unwrap().spec, Some("12入袋裝"));
        assert!((hit.confidence - INFERRED_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn dates_take_weight_slot() {
        let hit = matched("中東椰棗", "300g");
        assert_eq!(hit.product, "★中東椰棗300g");
        assert_eq!(hit.slot.unwrap().spec, Some("300g"));
    }

    #[test]
    fn spec_weight_outranks_name_weight() {
        let hit = matched("杏仁瓦片 抹茶 135g", "90g");
        assert_eq!(hit.slot.unwrap().spec, Some("90g"));
        assert_eq!(hit.slot.unwrap().column, Column::B);
    }

    #[test]
    fn weight_only_in_name_still_resolves() {
        let hit = matched("杏仁瓦片 抹茶 135g", "");
        assert_eq!(hit.slot.unwrap().spec, Some("135g"));
        assert_eq!(hit.slot.unwrap().column, Column::C);
    }

    #[test]
    fn madeleine_singleton_goes_to_column_c() {
        let hit = matched("瑪德蓮 蜂蜜 活動專用", "6入");
        assert_eq!(hit.slot, Some(Slot::SINGLE_MADELEINE));
        assert_eq!(hit.multiplier, 6);
    }

    #[test]
    fn puff_sticks_are_small_packs() {
        let hit = matched("千層 小酥條", "");
        assert_eq!(hit.product, "千層-小酥條");
        assert_eq!(hit.slot, Some(Slot::SMALL_PACK));
    }

    #[test]
    fn gift_box_without_known_name_falls_through() {
        let hit = matched("夏威夷豆塔禮盒", "焦糖");
        assert_eq!(hit.product, "豆塔-焦糖");
    }

    #[test]
    fn product_without_slot_keeps_category_confidence() {
        let hit = matched("鳳凰酥", "");
        assert!(hit.slot.is_none());
        assert!((hit.confidence - CATEGORY_CONFIDENCE).abs() < f64::EPSILON);
    }

    #[test]
    fn noise_is_filtered() {
        for (name, reason) in [
            ("運費", "shipping_fee"),
            ("提袋加購", "tote_add_on"),
            ("濾掛咖啡", "coffee"),
            ("TP00019370000000 組合", "bundle_sku"),
        ] {
            assert_eq!(decide(&Listing::new(name, "")), Decision::Filtered(reason));
        }
    }

    #[test]
    fn coffee_flower_cookie_is_not_coffee() {
        let hit = matched("西點餅乾 咖啡小花", "");
        assert_eq!(hit.product, "西點-咖啡小花");
    }

    #[test]
    fn unknown_line_is_unrecognized() {
        assert_eq!(decide(&Listing::new("手工蛋捲", "")), Decision::Unrecognized);
    }
}
