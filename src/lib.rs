//! eclio - reader and writer for ECLIPSE-style array containers
//!
//! Simulation result files (`.INIT`, `.EGRID`, `.UNRST`, `.X0005`, ...) are
//! ordered sequences of named, typed arrays. Each comes in a binary
//! (big-endian, record-framed) and a formatted (text) encoding which decode
//! to identical values.
//!
//! # Features
//!
//! - Catalogue built at open time, payloads decoded lazily and cached
//! - Typed access with a type check against the declared array type
//! - Byte-exact writer for both encodings, usable for transcoding
//! - Restart step index with step-scoped lookup and resume positions
//! - Block sizes and column widths configurable through [`Layout`]
//!
//! # Example
//!
//! ```rust
//! use eclio::{EclFile, Writer};
//! use std::io::Cursor;
//!
//! let mut writer = Writer::new(Vec::new(), false);
//! writer.write("ICON", &[1, 7, 2, 9]).unwrap();
//! writer.write("PORV", &[0.25f32, 0.5]).unwrap();
//! let bytes = writer.finish().unwrap();
//!
//! let file = EclFile::from_reader(Cursor::new(bytes), false).unwrap();
//! assert!(file.has_key("PORV"));
//! assert_eq!(file.get::<i32>("ICON").unwrap(), &[1, 7, 2, 9]);
//! ```

pub mod error;
pub mod output;
pub mod parser;
pub mod reader;
pub mod restart;
pub mod types;
pub mod writer;

#[cfg(feature = "ndarray")]
pub mod ndarray_ext;

// Re-export common types at crate root
pub use error::{EclError, Result};
pub use output::{InitOutput, RestartOutput, ResultSet, output_file_name};
pub use reader::EclFile;
pub use restart::{RestartFile, SEQNUM};
pub use types::{
    ArrayData, ArrayInfo, ArrayType, BlockLayout, DataView, Element, Entry, HEADER_SIZE, Layout,
};
pub use writer::{Writer, to_bytes};
