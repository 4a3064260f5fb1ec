use serde::{Deserialize, Serialize};

/// Named, independently owned regions of the chart state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Slice {
    Options,
    Theme,
    Layout,
    Series,
    NestedPieSeries,
    ZoomRange,
    RawCategories,
    Categories,
    DataRange,
    Scale,
    Axes,
    Legend,
    CircleLegend,
}

impl Slice {
    pub const ALL: [Self; 13] = [
        Self::Options,
        Self::Theme,
        Self::Layout,
        Self::Series,
        Self::NestedPieSeries,
        Self::ZoomRange,
        Self::RawCategories,
        Self::Categories,
        Self::DataRange,
        Self::Scale,
        Self::Axes,
        Self::Legend,
        Self::CircleLegend,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Options => "options",
            Self::Theme => "theme",
            Self::Layout => "layout",
            Self::Series => "series",
            Self::NestedPieSeries => "nestedPieSeries",
            Self::ZoomRange => "zoomRange",
            Self::RawCategories => "rawCategories",
            Self::Categories => "categories",
            Self::DataRange => "dataRange",
            Self::Scale => "scale",
            Self::Axes => "axes",
            Self::Legend => "legend",
            Self::CircleLegend => "circleLegend",
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Bitmask of slices, used for write grants and the pending-notification set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SliceSet {
    bits: u16,
}

impl SliceSet {
    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn from_slice(slice: Slice) -> Self {
        Self { bits: slice.bit() }
    }

    #[must_use]
    pub fn from_slices(slices: &[Slice]) -> Self {
        slices
            .iter()
            .fold(Self::none(), |set, slice| set.with(*slice))
    }

    #[must_use]
    pub const fn with(self, slice: Slice) -> Self {
        Self {
            bits: self.bits | slice.bit(),
        }
    }

    #[must_use]
    pub const fn without(self, slice: Slice) -> Self {
        Self {
            bits: self.bits & !slice.bit(),
        }
    }

    #[must_use]
    pub const fn contains(self, slice: Slice) -> bool {
        (self.bits & slice.bit()) != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Slice> {
        Slice::ALL
            .into_iter()
            .filter(move |slice| self.contains(*slice))
    }
}
