//! Rust element types that map onto array types

use super::{ArrayData, ArrayType, DataView};

/// Trait for types that can be read from and written to a container
///
/// Implemented for `i32` (INTE), `f32` (REAL), `f64` (DOUB), `bool` (LOGI)
/// and `String` (CHAR).
pub trait Element: Sized + Clone + 'static {
    const ARRAY_TYPE: ArrayType;

    /// Borrow the typed elements if `data` holds this type
    fn slice(data: &ArrayData) -> Option<&[Self]>;

    /// Wrap a typed slice for the writer
    fn view(values: &[Self]) -> DataView<'_>;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident) => {
        impl Element for $ty {
            const ARRAY_TYPE: ArrayType = ArrayType::$variant;

            fn slice(data: &ArrayData) -> Option<&[Self]> {
                match data {
                    ArrayData::$variant(v) => Some(v.as_slice()),
                    _ => None,
                }
            }

            fn view(values: &[Self]) -> DataView<'_> {
                DataView::$variant(values)
            }
        }
    };
}

impl_element!(i32, Inte);
impl_element!(f32, Real);
impl_element!(f64, Doub);
impl_element!(bool, Logi);
impl_element!(String, Char);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_matches_only_own_type() {
        let data = ArrayData::Inte(vec![1, 2, 3]);
        assert_eq!(i32::slice(&data), Some(&[1, 2, 3][..]));
        assert!(f32::slice(&data).is_none());
        assert!(String::slice(&data).is_none());
    }

    #[test]
    fn view_carries_type() {
        assert_eq!(f64::view(&[1.0]).array_type(), f64::ARRAY_TYPE);
        assert_eq!(bool::view(&[true]).array_type(), ArrayType::Logi);
    }
}
