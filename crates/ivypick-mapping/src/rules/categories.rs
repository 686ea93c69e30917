//! Product families and flavor tables shared by the platform cascades.

use super::{Hit, Slot, CATEGORY_CONFIDENCE, EXPLICIT_CONFIDENCE};
use crate::text::{has_weight, Listing};

/// A keyword test for one canonical product. Any keyword in `any` must be
/// present, together with every keyword in `also`.
pub(crate) struct Flavor {
    any: &'static [&'static str],
    also: &'static [&'static str],
    product: &'static str,
}

const fn flavor(any: &'static [&'static str], product: &'static str) -> Flavor {
    Flavor {
        any,
        also: &[],
        product,
    }
}

const fn flavor_with(
    any: &'static [&'static str],
    also: &'static [&'static str],
    product: &'static str,
) -> Flavor {
    Flavor { any, also, product }
}

impl Flavor {
    fn matches(&self, text: &str) -> bool {
        self.any.iter().any(|k| text.contains(k)) && self.also.iter().all(|k| text.contains(k))
    }
}

/// First product in `table` whose keywords appear in `text`.
pub(crate) fn pick(text: &str, table: &[Flavor]) -> Option<&'static str> {
    table.iter().find(|f| f.matches(text)).map(|f| f.product)
}

pub(crate) const GIFT_BOXES: &[Flavor] = &[
    flavor(&["雙塔禮盒", "招牌雙塔"], "雙塔禮盒"),
    flavor_with(&["夏威夷豆塔禮盒"], &["蔓越莓"], "蔓越莓禮盒"),
    flavor_with(&["夏威夷豆塔禮盒"], &["綜合"], "綜豆禮盒"),
    flavor_with(&["堅果塔禮盒"], &["綜合"], "綜堅禮盒"),
    flavor(&["戀戀雪花"], "戀戀雪花禮盒"),
    flavor(&["浪漫詩篇"], "浪漫詩篇禮盒"),
    flavor(&["暖暖幸福"], "暖暖幸福禮盒"),
    flavor(&["臻愛時光"], "臻愛時光禮盒"),
    flavor(&["濃情滿載"], "濃情滿載禮盒"),
    flavor(&["午後漫步"], "午後漫步禮盒"),
    flavor(&["那年花開"], "那年花開禮盒"),
    flavor(&["花間逸韻"], "花間逸韻禮盒"),
    flavor(&["晴空塔餅"], "晴空塔餅禮盒"),
    flavor(&["金緻典藏"], "輕-金緻典藏禮盒"),
    flavor(&["香榭漫遊"], "輕-香榭漫遊禮盒"),
    flavor(&["晨曦物語"], "輕-晨曦物語禮盒"),
    flavor(&["月光序曲"], "輕-月光序曲禮盒"),
    flavor(&["蔓越莓禮盒"], "蔓越莓禮盒"),
    flavor(&["綜豆禮盒"], "綜豆禮盒"),
    flavor(&["綜堅禮盒"], "綜堅禮盒"),
];

pub(crate) const BEAN_TARTS: &[Flavor] = &[
    flavor(&["蜂蜜蔓越莓", "蔓越莓"], "豆塔-蔓越莓"),
    flavor(&["焦糖"], "豆塔-焦糖"),
    flavor(&["巧克力"], "豆塔-巧克力"),
    flavor(&["抹茶"], "豆塔-抹茶"),
    flavor(&["椒麻"], "豆塔-椒麻"),
    flavor(&["綜合"], "豆塔-綜合"),
];

pub(crate) const NUT_TARTS: &[Flavor] = &[
    flavor(&["蜂蜜"], "堅果塔-蜂蜜"),
    flavor(&["焦糖"], "堅果塔-焦糖"),
    flavor(&["巧克力"], "堅果塔-巧克力"),
    flavor(&["海苔"], "堅果塔-海苔"),
    flavor(&["咖哩"], "堅果塔-咖哩"),
    flavor(&["綜合"], "堅果塔-綜合"),
];

pub(crate) const SNOWFLAKES: &[Flavor] = &[
    flavor(&["蔓越莓"], "雪花餅-蔓越莓"),
    flavor(&["巧克力"], "雪花餅-巧克力"),
    flavor(&["金沙"], "雪花餅-金沙"),
    flavor(&["抹茶"], "雪花餅-抹茶"),
    flavor(&["肉鬆"], "雪花餅-肉鬆"),
    flavor(&["綜合"], "雪花餅-綜合"),
];

pub(crate) const MADELEINES: &[Flavor] = &[
    flavor(&["抹茶"], "瑪德蓮-抹茶"),
    flavor(&["檸檬"], "瑪德蓮-檸檬"),
    flavor(&["紅茶"], "瑪德蓮-紅茶"),
    flavor(&["蜂蜜"], "瑪德蓮-蜂蜜"),
    flavor(&["巧克力"], "瑪德蓮-巧克力"),
    flavor(&["柑橘"], "瑪德蓮-柑橘"),
    flavor(&["綜合", "隨機"], "瑪德蓮-綜合"),
];

pub(crate) const ALMOND_TILES: &[Flavor] = &[
    flavor(&["原味"], "瓦片-原味"),
    flavor(&["抹茶"], "瓦片-抹茶"),
    flavor(&["紅茶"], "瓦片-紅茶"),
    flavor(&["巧克力"], "瓦片-巧克力"),
    flavor(&["海苔"], "瓦片-海苔"),
    flavor(&["黑糖"], "瓦片-黑糖"),
    flavor(&["青花椒"], "瓦片-青花椒"),
    flavor(&["綜合"], "瓦片-綜合"),
];

pub(crate) const BUTTER_COOKIES: &[Flavor] = &[
    flavor(&["抹茶"], "奶油-抹茶"),
    flavor(&["焦糖牛奶"], "奶油-焦糖牛奶"),
    flavor(&["法國巧克力", "巧克力"], "奶油-法國巧克力"),
    flavor(&["蜂蜜檸檬"], "奶油-蜂蜜檸檬"),
    flavor(&["伯爵紅茶"], "奶油-伯爵紅茶"),
];

pub(crate) const PASTRIES: &[Flavor] = &[
    flavor(&["乳酪酥條"], "西點-乳酪酥條"),
    flavor(&["蔓越莓貝殼"], "西點-蔓越莓貝殼"),
    flavor(&["藍莓小花"], "西點-藍莓小花"),
    flavor(&["咖啡小花"], "西點-咖啡小花"),
    flavor(&["巧克力貝殼"], "西點-巧克力貝殼"),
    flavor(&["綜合"], "西點-綜合"),
];

pub(crate) const PLAIN_NUTS: &[Flavor] = &[
    flavor(&["綜合"], "無調味綜合堅果"),
    flavor(&["核桃"], "無調味核桃"),
    flavor(&["腰果"], "無調味腰果"),
    flavor(&["杏仁"], "無調味杏仁"),
    flavor(&["夏威夷豆"], "無調味夏威夷豆"),
];

pub(crate) const DATES: &[Flavor] = &[
    flavor(&["中東"], "★中東椰棗300g"),
    flavor(&["夏威夷豆"], "椰棗豆子150g"),
    flavor(&["核桃"], "椰棗核桃150g"),
    flavor(&["腰果"], "椰棗腰果150g"),
    flavor(&["杏仁"], "椰棗杏仁150g"),
];

fn category(listing: &Listing, marker: &[&str], table: &[Flavor]) -> Option<Hit> {
    if !listing.has_any(marker) {
        return None;
    }
    pick(&listing.full, table).map(|p| Hit::new(p, CATEGORY_CONFIDENCE))
}

fn single(listing: &Listing, marker: &[&str], product: &str) -> Option<Hit> {
    listing
        .has_any(marker)
        .then(|| Hit::new(product, CATEGORY_CONFIDENCE))
}

pub(crate) fn gift_box(listing: &Listing) -> Option<Hit> {
    if !listing.has("禮盒") {
        return None;
    }
    pick(&listing.full, GIFT_BOXES)
        .map(|p| Hit::new(p, EXPLICIT_CONFIDENCE).with_slot(Slot::GIFT_BOX))
}

pub(crate) fn bean_tart(listing: &Listing) -> Option<Hit> {
    category(listing, &["夏威夷豆塔"], BEAN_TARTS)
}

pub(crate) fn nut_tart(listing: &Listing) -> Option<Hit> {
    category(listing, &["堅果塔"], NUT_TARTS)
}

pub(crate) fn snowflake(listing: &Listing) -> Option<Hit> {
    category(listing, &["雪花餅"], SNOWFLAKES)
}

pub(crate) fn madeleine(listing: &Listing) -> Option<Hit> {
    category(listing, &["瑪德蓮"], MADELEINES)
}

/// The 45g plain tile is its own product.
pub(crate) fn almond_tile(listing: &Listing) -> Option<Hit> {
    if !listing.has("瓦片") {
        return None;
    }
    if listing.has("原味") && has_weight(&listing.full, 45) {
        return Some(Hit::new("瓦片-原味45克", CATEGORY_CONFIDENCE));
    }
    pick(&listing.full, ALMOND_TILES).map(|p| Hit::new(p, CATEGORY_CONFIDENCE))
}

pub(crate) fn butter_cookie(listing: &Listing) -> Option<Hit> {
    category(listing, &["奶油曲奇", "奶油餅乾"], BUTTER_COOKIES)
}

pub(crate) fn pastry(listing: &Listing) -> Option<Hit> {
    category(listing, &["西點餅乾"], PASTRIES)
}

pub(crate) fn puff_sticks(listing: &Listing) -> Option<Hit> {
    listing
        .has("小酥條")
        .then(|| Hit::new("千層-小酥條", EXPLICIT_CONFIDENCE).with_slot(Slot::SMALL_PACK))
}

pub(crate) fn plain_nuts(listing: &Listing) -> Option<Hit> {
    category(listing, &["無調味堅果"], PLAIN_NUTS)
}

pub(crate) fn dates(listing: &Listing) -> Option<Hit> {
    category(listing, &["椰棗"], DATES)
}

pub(crate) fn milk_candy(listing: &Listing) -> Option<Hit> {
    if !listing.has("牛奶糖") {
        return None;
    }
    let product = if has_weight(&listing.full, 50) {
        "牛奶糖-50g"
    } else {
        "牛奶糖"
    };
    Some(Hit::new(product, CATEGORY_CONFIDENCE))
}

pub(crate) fn pineapple_cake(listing: &Listing) -> Option<Hit> {
    single(listing, &["土鳳梨酥"], "土鳳梨酥(紅點)")
}

pub(crate) fn twin_tart(listing: &Listing) -> Option<Hit> {
    single(listing, &["招牌雙塔"], "雙塔")
}

pub(crate) fn jujube_walnut_cake(listing: &Listing) -> Option<Hit> {
    single(listing, &["南棗核桃糕"], "南棗核桃糕")
}

pub(crate) fn phoenix_cake(listing: &Listing) -> Option<Hit> {
    single(listing, &["鳳凰酥"], "鳳凰酥")
}
