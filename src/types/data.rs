//! Decoded array payloads

use super::ArrayType;

/// Owned, decoded payload of one array
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Inte(Vec<i32>),
    Real(Vec<f32>),
    Doub(Vec<f64>),
    Logi(Vec<bool>),
    Char(Vec<String>),
    Mess,
}

impl ArrayData {
    pub fn array_type(&self) -> ArrayType {
        match self {
            ArrayData::Inte(_) => ArrayType::Inte,
            ArrayData::Real(_) => ArrayType::Real,
            ArrayData::Doub(_) => ArrayType::Doub,
            ArrayData::Logi(_) => ArrayType::Logi,
            ArrayData::Char(_) => ArrayType::Char,
            ArrayData::Mess => ArrayType::Mess,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.view().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow as a view (for writing)
    pub fn view(&self) -> DataView<'_> {
        match self {
            ArrayData::Inte(v) => DataView::Inte(v),
            ArrayData::Real(v) => DataView::Real(v),
            ArrayData::Doub(v) => DataView::Doub(v),
            ArrayData::Logi(v) => DataView::Logi(v),
            ArrayData::Char(v) => DataView::Char(v),
            ArrayData::Mess => DataView::Mess,
        }
    }
}

/// Borrowed payload, the input side of the writer
#[derive(Debug, Clone, Copy)]
pub enum DataView<'a> {
    Inte(&'a [i32]),
    Real(&'a [f32]),
    Doub(&'a [f64]),
    Logi(&'a [bool]),
    Char(&'a [String]),
    Mess,
}

impl DataView<'_> {
    pub fn array_type(&self) -> ArrayType {
        match self {
            DataView::Inte(_) => ArrayType::Inte,
            DataView::Real(_) => ArrayType::Real,
            DataView::Doub(_) => ArrayType::Doub,
            DataView::Logi(_) => ArrayType::Logi,
            DataView::Char(_) => ArrayType::Char,
            DataView::Mess => ArrayType::Mess,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DataView::Inte(v) => v.len(),
            DataView::Real(v) => v.len(),
            DataView::Doub(v) => v.len(),
            DataView::Logi(v) => v.len(),
            DataView::Char(v) => v.len(),
            DataView::Mess => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to owned data
    pub fn to_owned(&self) -> ArrayData {
        match *self {
            DataView::Inte(v) => ArrayData::Inte(v.to_vec()),
            DataView::Real(v) => ArrayData::Real(v.to_vec()),
            DataView::Doub(v) => ArrayData::Doub(v.to_vec()),
            DataView::Logi(v) => ArrayData::Logi(v.to_vec()),
            DataView::Char(v) => ArrayData::Char(v.to_vec()),
            DataView::Mess => ArrayData::Mess,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_and_types() {
        let data = ArrayData::Doub(vec![1.0, 2.0, 3.0]);
        assert_eq!(data.len(), 3);
        assert_eq!(data.array_type(), ArrayType::Doub);
        assert_eq!(data.view().array_type(), ArrayType::Doub);

        assert!(ArrayData::Mess.is_empty());
        assert_eq!(ArrayData::Mess.array_type(), ArrayType::Mess);
    }

    #[test]
    fn view_to_owned() {
        let names = vec!["W1".to_string(), "W2".to_string()];
        let view = DataView::Char(&names);
        assert_eq!(view.to_owned(), ArrayData::Char(names.clone()));
    }
}
