use ivypick_core::Column;

use crate::text::{first_unit_count, unit_counts, weights, Listing};

/// A production-sheet column plus the spec label printed with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot {
    pub column: Column,
    pub spec: Option<&'static str>,
}

impl Slot {
    pub const GIFT_BOX: Slot = Slot::new(Column::B, "禮盒");
    pub const TEN_PACK: Slot = Slot::new(Column::B, "10入袋裝");
    pub const SMALL_PACK: Slot = Slot::new(Column::B, "小包裝");
    pub const SINGLE_MADELEINE: Slot = Slot::new(Column::C, "單顆");
    pub const SINGLE: Slot = Slot::new(Column::D, "單顆");
    /// Column B with no spec label.
    pub const PLAIN_B: Slot = Slot {
        column: Column::B,
        spec: None,
    };

    const fn new(column: Column, spec: &'static str) -> Self {
        Self {
            column,
            spec: Some(spec),
        }
    }
}

/// Checked largest to smallest.
const WEIGHT_SLOTS: &[(u32, Slot)] = &[
    (300, Slot::new(Column::B, "300g")),
    (280, Slot::new(Column::C, "280g")),
    (200, Slot::new(Column::C, "200g")),
    (150, Slot::new(Column::B, "150g")),
    (135, Slot::new(Column::C, "135g")),
    (120, Slot::new(Column::B, "120g")),
    (90, Slot::new(Column::B, "90g")),
    (60, Slot::new(Column::B, "60g")),
    (50, Slot::new(Column::B, "50g")),
    (45, Slot::new(Column::B, "45g")),
];

const PACK_SLOTS: &[(u32, Slot)] = &[
    (15, Slot::new(Column::C, "15入袋裝")),
    (12, Slot::new(Column::C, "12入袋裝")),
    (10, Slot::TEN_PACK),
    (8, Slot::new(Column::B, "8入袋裝")),
];

fn first_listed(table: &[(u32, Slot)], found: &[u32]) -> Option<Slot> {
    table
        .iter()
        .find(|(n, _)| found.contains(n))
        .map(|&(_, slot)| slot)
}

/// Slot for the heaviest known weight token in `text`.
pub(crate) fn weight_slot(text: &str) -> Option<Slot> {
    first_listed(WEIGHT_SLOTS, &weights(text))
}

/// Slot for a known `N入` pack count in `text`.
pub(crate) fn pack_slot(text: &str) -> Option<Slot> {
    first_listed(PACK_SLOTS, &unit_counts(text))
}

/// Whether `count` has a pack slot of its own.
pub(crate) fn is_pack_count(count: u32) -> bool {
    PACK_SLOTS.iter().any(|&(n, _)| n == count)
}

pub(crate) fn is_singleton(listing: &Listing) -> bool {
    listing.has_any(&["單顆", "單個", "活動"])
}

/// Singletons land in column C for madeleines and D for everything else.
/// The multiplier comes from an `N入` count in the spec.
pub(crate) fn singleton(listing: &Listing) -> (Slot, Option<u32>) {
    let slot = if listing.has("瑪德蓮") {
        Slot::SINGLE_MADELEINE
    } else {
        Slot::SINGLE
    };
    (slot, first_unit_count(&listing.spec).filter(|&n| n > 0))
}
