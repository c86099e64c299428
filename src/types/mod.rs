//! Core types for the array container model

mod array_type;
mod data;
mod element;
mod entry;
mod header;
mod layout;

pub use array_type::ArrayType;
pub use data::{ArrayData, DataView};
pub use element::Element;
pub use entry::{ArrayInfo, Entry};
pub use header::{FALSE_VALUE, HEADER_MARKER, HEADER_SIZE, NAME_LEN, TRUE_VALUE};
pub use layout::{BlockLayout, Layout};
