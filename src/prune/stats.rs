use half::f16;
use parquet::{
    basic::{ConvertedType, LogicalType},
    file::statistics::Statistics,
    schema::types::ColumnDescriptor,
};

use crate::cmp::{FilterInt, Widened};

/// Minimum and maximum of a column chunk, decoded to the logical type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMax<T> {
    pub min: T,
    pub max: T,
}

impl<T> MinMax<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

/// Row-group statistics for one column, typed by the column's logical type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColumnStatistics {
    Boolean(MinMax<bool>),
    Int8(MinMax<i8>),
    Int16(MinMax<i16>),
    Int32(MinMax<i32>),
    Int64(MinMax<i64>),
    UInt8(MinMax<u8>),
    UInt16(MinMax<u16>),
    UInt32(MinMax<u32>),
    UInt64(MinMax<u64>),
    Float16(MinMax<f16>),
    Float32(MinMax<f32>),
    Float64(MinMax<f64>),
}

/// How a physical column is annotated in the Parquet schema.
enum Annotation {
    Plain,
    Integer { bit_width: i8, is_signed: bool },
    Float16,
    Other,
}

fn annotation(descr: &ColumnDescriptor) -> Annotation {
    match descr.logical_type() {
        Some(LogicalType::Integer {
            bit_width,
            is_signed,
        }) => Annotation::Integer {
            bit_width,
            is_signed,
        },
        Some(LogicalType::Float16) => Annotation::Float16,
        Some(_) => Annotation::Other,
        None => {
            let (bit_width, is_signed) = match descr.converted_type() {
                ConvertedType::NONE => return Annotation::Plain,
                ConvertedType::INT_8 => (8, true),
                ConvertedType::INT_16 => (16, true),
                ConvertedType::INT_32 => (32, true),
                ConvertedType::INT_64 => (64, true),
                ConvertedType::UINT_8 => (8, false),
                ConvertedType::UINT_16 => (16, false),
                ConvertedType::UINT_32 => (32, false),
                ConvertedType::UINT_64 => (64, false),
                _ => return Annotation::Other,
            };
            Annotation::Integer {
                bit_width,
                is_signed,
            }
        }
    }
}

fn narrow<T: TryFrom<i64>>(min: i64, max: i64) -> Option<MinMax<T>> {
    Some(MinMax::new(T::try_from(min).ok()?, T::try_from(max).ok()?))
}

impl ColumnStatistics {
    /// Decode the physical statistics of a column chunk.
    ///
    /// Returns `None` when min or max is absent, when the column carries a
    /// logical type without integer or float semantics, or when a decoded
    /// value does not fit the annotated width.
    pub fn from_parquet(stats: &Statistics, descr: &ColumnDescriptor) -> Option<Self> {
        let annotation = annotation(descr);
        match stats {
            Statistics::Boolean(s) => match annotation {
                Annotation::Plain => Some(Self::Boolean(MinMax::new(
                    *s.min_opt()?,
                    *s.max_opt()?,
                ))),
                _ => None,
            },
            Statistics::Int32(s) => {
                let min = *s.min_opt()?;
                let max = *s.max_opt()?;
                match annotation {
                    Annotation::Plain
                    | Annotation::Integer {
                        bit_width: 32,
                        is_signed: true,
                    } => Some(Self::Int32(MinMax::new(min, max))),
                    Annotation::Integer {
                        bit_width: 32,
                        is_signed: false,
                    } => Some(Self::UInt32(MinMax::new(min as u32, max as u32))),
                    Annotation::Integer {
                        bit_width,
                        is_signed,
                    } => {
                        // Narrow unsigned values are stored zero-extended
                        let (min, max) = if is_signed {
                            (i64::from(min), i64::from(max))
                        } else {
                            (i64::from(min as u32), i64::from(max as u32))
                        };
                        match (bit_width, is_signed) {
                            (8, true) => narrow(min, max).map(Self::Int8),
                            (16, true) => narrow(min, max).map(Self::Int16),
                            (8, false) => narrow(min, max).map(Self::UInt8),
                            (16, false) => narrow(min, max).map(Self::UInt16),
                            _ => None,
                        }
                    }
                    _ => None,
                }
            }
            Statistics::Int64(s) => {
                let min = *s.min_opt()?;
                let max = *s.max_opt()?;
                match annotation {
                    Annotation::Plain
                    | Annotation::Integer {
                        bit_width: 64,
                        is_signed: true,
                    } => Some(Self::Int64(MinMax::new(min, max))),
                    Annotation::Integer {
                        bit_width: 64,
                        is_signed: false,
                    } => Some(Self::UInt64(MinMax::new(min as u64, max as u64))),
                    _ => None,
                }
            }
            Statistics::Float(s) => match annotation {
                Annotation::Plain => Some(Self::Float32(MinMax::new(
                    *s.min_opt()?,
                    *s.max_opt()?,
                ))),
                _ => None,
            },
            Statistics::Double(s) => match annotation {
                Annotation::Plain => Some(Self::Float64(MinMax::new(
                    *s.min_opt()?,
                    *s.max_opt()?,
                ))),
                _ => None,
            },
            Statistics::FixedLenByteArray(s) => match annotation {
                Annotation::Float16 => {
                    let min = float16_from_bytes(s.min_opt()?.data())?;
                    let max = float16_from_bytes(s.max_opt()?.data())?;
                    Some(Self::Float16(MinMax::new(min, max)))
                }
                _ => None,
            },
            Statistics::Int96(_) | Statistics::ByteArray(_) => None,
        }
    }

    /// Widened bounds for integer statistics, `None` for boolean and float.
    pub fn integer_bounds(&self) -> Option<MinMax<Widened>> {
        fn widen<T: FilterInt>(bounds: &MinMax<T>) -> MinMax<Widened> {
            MinMax::new(bounds.min.widen(), bounds.max.widen())
        }
        match self {
            Self::Int8(b) => Some(widen(b)),
            Self::Int16(b) => Some(widen(b)),
            Self::Int32(b) => Some(widen(b)),
            Self::Int64(b) => Some(widen(b)),
            Self::UInt8(b) => Some(widen(b)),
            Self::UInt16(b) => Some(widen(b)),
            Self::UInt32(b) => Some(widen(b)),
            Self::UInt64(b) => Some(widen(b)),
            Self::Boolean(_) | Self::Float16(_) | Self::Float32(_) | Self::Float64(_) => None,
        }
    }
}

fn float16_from_bytes(bytes: &[u8]) -> Option<f16> {
    let bytes: [u8; 2] = bytes.try_into().ok()?;
    Some(f16::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parquet::{
        basic::Type as PhysicalType,
        data_type::{ByteArray, FixedLenByteArray},
        schema::types::{ColumnPath, Type},
    };

    use super::*;

    fn descriptor(physical: PhysicalType, logical: Option<LogicalType>) -> ColumnDescriptor {
        let mut builder = Type::primitive_type_builder("x", physical).with_logical_type(logical);
        if physical == PhysicalType::FIXED_LEN_BYTE_ARRAY {
            builder = builder.with_length(2);
        }
        let tp = builder.build().unwrap();
        ColumnDescriptor::new(Arc::new(tp), 0, 0, ColumnPath::new(vec!["x".to_string()]))
    }

    fn integer(bit_width: i8, is_signed: bool) -> Option<LogicalType> {
        Some(LogicalType::Integer {
            bit_width,
            is_signed,
        })
    }

    #[test]
    fn plain_int32_and_int64() {
        let stats = Statistics::int32(Some(-5), Some(7), None, Some(0), false);
        let descr = descriptor(PhysicalType::INT32, None);
        assert_eq!(
            ColumnStatistics::from_parquet(&stats, &descr),
            Some(ColumnStatistics::Int32(MinMax::new(-5, 7)))
        );

        let stats = Statistics::int64(Some(-5), Some(7), None, Some(0), false);
        let descr = descriptor(PhysicalType::INT64, None);
        assert_eq!(
            ColumnStatistics::from_parquet(&stats, &descr),
            Some(ColumnStatistics::Int64(MinMax::new(-5, 7)))
        );
    }

    #[test]
    fn narrow_integer_annotations() {
        let stats = Statistics::int32(Some(-128), Some(127), None, Some(0), false);
        let descr = descriptor(PhysicalType::INT32, integer(8, true));
        assert_eq!(
            ColumnStatistics::from_parquet(&stats, &descr),
            Some(ColumnStatistics::Int8(MinMax::new(i8::MIN, i8::MAX)))
        );

        let stats = Statistics::int32(Some(0), Some(65_535), None, Some(0), false);
        let descr = descriptor(PhysicalType::INT32, integer(16, false));
        assert_eq!(
            ColumnStatistics::from_parquet(&stats, &descr),
            Some(ColumnStatistics::UInt16(MinMax::new(0, u16::MAX)))
        );
    }

    #[test]
    fn unsigned_values_reinterpret_bits() {
        let stats = Statistics::int32(Some(0), Some(-1), None, Some(0), false);
        let descr = descriptor(PhysicalType::INT32, integer(32, false));
        assert_eq!(
            ColumnStatistics::from_parquet(&stats, &descr),
            Some(ColumnStatistics::UInt32(MinMax::new(0, u32::MAX)))
        );

        let stats = Statistics::int64(Some(0), Some(-1), None, Some(0), false);
        let descr = descriptor(PhysicalType::INT64, integer(64, false));
        assert_eq!(
            ColumnStatistics::from_parquet(&stats, &descr),
            Some(ColumnStatistics::UInt64(MinMax::new(0, u64::MAX)))
        );
    }

    #[test]
    fn out_of_range_values_are_dropped() {
        let stats = Statistics::int32(Some(0), Some(300), None, Some(0), false);
        let descr = descriptor(PhysicalType::INT32, integer(8, false));
        assert_eq!(ColumnStatistics::from_parquet(&stats, &descr), None);
    }

    #[test]
    fn non_integer_logical_types_are_ignored() {
        let stats = Statistics::int32(Some(0), Some(10), None, Some(0), false);
        let descr = descriptor(PhysicalType::INT32, Some(LogicalType::Date));
        assert_eq!(ColumnStatistics::from_parquet(&stats, &descr), None);
    }

    #[test]
    fn missing_min_or_max() {
        let stats = Statistics::int32(None, Some(10), None, Some(0), false);
        let descr = descriptor(PhysicalType::INT32, None);
        assert_eq!(ColumnStatistics::from_parquet(&stats, &descr), None);
    }

    #[test]
    fn float16_from_fixed_len_bytes() {
        let min = f16::from_f32(-1.5);
        let max = f16::from_f32(2.25);
        let stats = Statistics::fixed_len_byte_array(
            Some(FixedLenByteArray::from(ByteArray::from(min.to_le_bytes().to_vec()))),
            Some(FixedLenByteArray::from(ByteArray::from(max.to_le_bytes().to_vec()))),
            None,
            Some(0),
            false,
        );
        let descr = descriptor(PhysicalType::FIXED_LEN_BYTE_ARRAY, Some(LogicalType::Float16));
        assert_eq!(
            ColumnStatistics::from_parquet(&stats, &descr),
            Some(ColumnStatistics::Float16(MinMax::new(min, max)))
        );
    }

    #[test]
    fn integer_bounds_only_for_integers() {
        let stats = ColumnStatistics::UInt64(MinMax::new(1, u64::MAX));
        assert_eq!(
            stats.integer_bounds(),
            Some(MinMax::new(Widened::Unsigned(1), Widened::Unsigned(u64::MAX)))
        );
        assert_eq!(
            ColumnStatistics::Float64(MinMax::new(0.0, 1.0)).integer_bounds(),
            None
        );
    }
}
