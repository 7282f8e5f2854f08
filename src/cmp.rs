//! Comparison of a 64-bit signed filter bound against native integer values.
//!
//! Filter bounds are always `i64`, while columns may hold any signed or
//! unsigned integer width up to 64 bits. Values are widened into [`Widened`]
//! without loss, and unsigned comparisons branch on the sign of the bound
//! before casting so `u64` values above `i64::MAX` never wrap.

use std::cmp::Ordering;

/// A column value widened to 64 bits, keeping its signedness.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Widened {
    Signed(i64),
    Unsigned(u64),
}

impl Widened {
    /// Order this value relative to `bound`.
    pub fn cmp_bound(self, bound: i64) -> Ordering {
        match self {
            Widened::Signed(value) => value.cmp(&bound),
            // Every unsigned value is greater than a negative bound
            Widened::Unsigned(_) if bound < 0 => Ordering::Greater,
            Widened::Unsigned(value) => value.cmp(&(bound as u64)),
        }
    }

    /// Whether this value equals `bound`.
    pub fn eq_bound(self, bound: i64) -> bool {
        self.cmp_bound(bound) == Ordering::Equal
    }

    /// Whether this value lies in the inclusive range `[start, end]`.
    ///
    /// Each end is checked independently, so a range that only partially
    /// overlaps the representable values of the column type is evaluated on
    /// the overlap, and an empty range (`start > end`) matches nothing.
    pub fn in_range(self, start: i64, end: i64) -> bool {
        self.cmp_bound(start) != Ordering::Less && self.cmp_bound(end) != Ordering::Greater
    }
}

/// Native integer types that can be compared against an `i64` filter bound.
pub trait FilterInt: Copy {
    fn widen(self) -> Widened;
}

macro_rules! impl_filter_int {
    (signed: $($t:ty),*) => {
        $(
            impl FilterInt for $t {
                fn widen(self) -> Widened {
                    Widened::Signed(i64::from(self))
                }
            }
        )*
    };
    (unsigned: $($t:ty),*) => {
        $(
            impl FilterInt for $t {
                fn widen(self) -> Widened {
                    Widened::Unsigned(u64::from(self))
                }
            }
        )*
    };
}

impl_filter_int!(signed: i8, i16, i32, i64);
impl_filter_int!(unsigned: u8, u16, u32, u64);

impl FilterInt for Widened {
    fn widen(self) -> Widened {
        self
    }
}

/// Whether `value` can lie within statistics `[min, max]`.
pub fn bounds_contain<T: FilterInt>(min: T, max: T, value: i64) -> bool {
    min.widen().cmp_bound(value) != Ordering::Greater
        && max.widen().cmp_bound(value) != Ordering::Less
}

/// Whether the inclusive ranges `[start, end]` and `[min, max]` overlap.
pub fn bounds_overlap<T: FilterInt>(min: T, max: T, start: i64, end: i64) -> bool {
    start <= end
        && min.widen().cmp_bound(end) != Ordering::Greater
        && max.widen().cmp_bound(start) != Ordering::Less
}
