//! Row-level inclusion masks: computing them from a predicate and applying
//! them to decoded arrays.

mod apply;
mod compute;

use arrow::{array::BooleanArray, buffer::BooleanBuffer};

pub use apply::{apply_mask, apply_mask_to_batch};
pub(crate) use compute::{compute_mask, evaluate_leaf};

use crate::error::{Result, TrellisError};

/// Bitmask of the rows selected by a filter.
///
/// Bit `i` is set when row `i` is included. The number of set bits is
/// counted once at construction and kept alongside the bits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterMask {
    bits: BooleanBuffer,
    included_count: usize,
}

impl FilterMask {
    pub fn new(bits: BooleanBuffer) -> Self {
        // Keep the backing bytes aligned with row 0
        let bits = if bits.offset() == 0 {
            bits
        } else {
            bits.iter().collect()
        };
        let included_count = bits.count_set_bits();
        Self {
            bits,
            included_count,
        }
    }

    /// A mask including all `len` rows.
    pub fn all(len: usize) -> Self {
        Self::new(BooleanBuffer::new_set(len))
    }

    /// A mask excluding all `len` rows.
    pub fn none(len: usize) -> Self {
        Self::new(BooleanBuffer::new_unset(len))
    }

    /// Number of rows described by the mask.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of included rows.
    pub fn included_count(&self) -> usize {
        self.included_count
    }

    pub fn is_included(&self, row: usize) -> bool {
        self.bits.value(row)
    }

    pub fn bits(&self) -> &BooleanBuffer {
        &self.bits
    }

    /// Packed little-endian bits, one per row, padded to a whole byte.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits.values()[..self.len().div_ceil(8)]
    }

    /// Indices of the included rows in ascending order.
    pub fn included_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.set_indices()
    }

    /// Rows included by both masks.
    pub fn and(&self, other: &FilterMask) -> Result<FilterMask> {
        self.check_len(other)?;
        Ok(Self::new(&self.bits & &other.bits))
    }

    /// Rows included by either mask.
    pub fn or(&self, other: &FilterMask) -> Result<FilterMask> {
        self.check_len(other)?;
        Ok(Self::new(&self.bits | &other.bits))
    }

    pub fn to_boolean_array(&self) -> BooleanArray {
        BooleanArray::new(self.bits.clone(), None)
    }

    fn check_len(&self, other: &FilterMask) -> Result<()> {
        if self.len() != other.len() {
            return Err(TrellisError::MaskLength {
                mask: other.len(),
                array: self.len(),
            });
        }
        Ok(())
    }
}

impl FromIterator<bool> for FilterMask {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<BooleanBuffer> for FilterMask {
    fn from(bits: BooleanBuffer) -> Self {
        Self::new(bits)
    }
}
