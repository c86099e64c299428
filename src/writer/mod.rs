//! Serialization of arrays into a container
//!
//! A [`Writer`] appends arrays in call order, in either encoding, using the
//! same block and column layout the reader expects. Output written by
//! `Writer` and read back by [`crate::EclFile`] reproduces the original bytes.

mod array;
mod formatted;

pub use formatted::{double_token, real_token};

use crate::error::{EclError, Result};
use crate::types::{ArrayData, DataView, Element, Layout, NAME_LEN};
use array::write_binary_array;
use formatted::write_formatted_array;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

/// Sequential array writer
///
/// The output stream is owned for the writer's lifetime. [`Writer::finish`]
/// flushes it and reports any error; dropping the writer flushes on a best
/// effort basis.
#[derive(Debug)]
pub struct Writer<W: Write = BufWriter<File>> {
    out: W,
    formatted: bool,
    layout: Layout,
}

impl Writer<BufWriter<File>> {
    /// Create (or truncate) a container at `path`
    pub fn create(path: impl AsRef<Path>, formatted: bool) -> Result<Self> {
        Self::create_with_layout(path, formatted, Layout::default())
    }

    pub fn create_with_layout(
        path: impl AsRef<Path>,
        formatted: bool,
        layout: Layout,
    ) -> Result<Self> {
        layout.validate()?;
        let path = path.as_ref();
        let file = File::create(path)?;
        log::debug!(
            "created {} container {}",
            if formatted { "formatted" } else { "binary" },
            path.display()
        );
        Self::with_layout(BufWriter::new(file), formatted, layout)
    }

    /// Reopen an existing container for appending
    ///
    /// With `Some(position)` the file is first truncated to `position` bytes,
    /// discarding everything from that offset on. `None` appends at the end.
    pub fn resume(path: impl AsRef<Path>, formatted: bool, position: Option<u64>) -> Result<Self> {
        Self::resume_with_layout(path, formatted, position, Layout::default())
    }

    pub fn resume_with_layout(
        path: impl AsRef<Path>,
        formatted: bool,
        position: Option<u64>,
        layout: Layout,
    ) -> Result<Self> {
        layout.validate()?;
        let path = path.as_ref();
        let mut file = OpenOptions::new().write(true).open(path)?;

        if let Some(position) = position {
            file.set_len(position)?;
            log::debug!("truncated {} at byte {position}", path.display());
        }
        let end = file.seek(SeekFrom::End(0))?;
        log::debug!("resuming {} at byte {end}", path.display());

        Self::with_layout(BufWriter::new(file), formatted, layout)
    }
}

impl<W: Write> Writer<W> {
    /// Wrap any byte sink
    pub fn new(out: W, formatted: bool) -> Self {
        Self {
            out,
            formatted,
            layout: Layout::default(),
        }
    }

    /// Wrap a byte sink with a custom layout; fails if the layout has empty blocks
    pub fn with_layout(out: W, formatted: bool, layout: Layout) -> Result<Self> {
        layout.validate()?;
        Ok(Self {
            out,
            formatted,
            layout,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn is_formatted(&self) -> bool {
        self.formatted
    }

    /// Append one typed array
    ///
    /// The array type follows from `T`: `i32` INTE, `f32` REAL, `f64` DOUB,
    /// `bool` LOGI, `String` CHAR.
    pub fn write<T: Element>(&mut self, name: &str, values: &[T]) -> Result<()> {
        self.write_view(name, T::view(values))
    }

    /// Append a presence-only (MESS) array: header, no payload
    pub fn write_message(&mut self, name: &str) -> Result<()> {
        self.write_view(name, DataView::Mess)
    }

    /// Append an untyped payload, e.g. one read back from another container
    pub fn write_data(&mut self, name: &str, data: &ArrayData) -> Result<()> {
        self.write_view(name, data.view())
    }

    pub fn write_view(&mut self, name: &str, data: DataView<'_>) -> Result<()> {
        validate_name(name, self.formatted)?;
        if let DataView::Char(values) = data {
            for value in values {
                validate_string(name, value, self.formatted)?;
            }
        }
        let count = i32::try_from(data.len()).map_err(|_| {
            EclError::InvalidInput(format!(
                "array '{name}' has {} elements, more than a header can hold",
                data.len()
            ))
        })?;

        log::trace!("writing {} '{name}' ({count} elements)", data.array_type());
        if self.formatted {
            write_formatted_array(&mut self.out, name, count, data, &self.layout)
        } else {
            write_binary_array(&mut self.out, name, count, data, &self.layout)
        }
    }

    /// Flush and hand back the underlying sink
    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Serialize arrays into an in-memory container
pub fn to_bytes<'a>(
    formatted: bool,
    arrays: impl IntoIterator<Item = (&'a str, DataView<'a>)>,
) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new(), formatted);
    for (name, data) in arrays {
        writer.write_view(name, data)?;
    }
    writer.finish()
}

fn validate_name(name: &str, formatted: bool) -> Result<()> {
    if name.len() > NAME_LEN || !name.is_ascii() {
        return Err(EclError::InvalidInput(format!(
            "array name '{name}' must be ASCII and at most {NAME_LEN} characters"
        )));
    }
    if formatted && name.contains('\'') {
        return Err(EclError::InvalidInput(format!(
            "array name '{name}' contains an apostrophe"
        )));
    }
    Ok(())
}

fn validate_string(name: &str, value: &str, formatted: bool) -> Result<()> {
    if value.len() > NAME_LEN || !value.is_ascii() {
        return Err(EclError::InvalidInput(format!(
            "string '{value}' in array '{name}' must be ASCII and at most {NAME_LEN} characters"
        )));
    }
    if formatted && value.contains('\'') {
        return Err(EclError::InvalidInput(format!(
            "string '{value}' in array '{name}' contains an apostrophe"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_in_memory() {
        let mut writer = Writer::new(Vec::new(), false);
        writer.write("ICON", &[1, 2, 3]).unwrap();
        writer.write_message("ENDSOL").unwrap();
        let bytes = writer.finish().unwrap();
        assert_eq!(bytes.len(), 24 + 8 + 12 + 24);
    }

    #[test]
    fn long_name_rejected() {
        let mut writer = Writer::new(Vec::new(), false);
        let err = writer.write("TOOLONGNAME", &[1.0f32]).unwrap_err();
        assert!(err.to_string().contains("TOOLONGNAME"));
    }

    #[test]
    fn long_string_rejected() {
        let mut writer = Writer::new(Vec::new(), false);
        let values = vec!["NINECHARS".to_string()];
        assert!(writer.write("ZWEL", &values).is_err());
    }

    #[test]
    fn apostrophe_rejected_in_formatted() {
        let values = vec!["O'NEIL".to_string()];

        let mut binary = Writer::new(Vec::new(), false);
        assert!(binary.write("ZWEL", &values).is_ok());

        let mut formatted = Writer::new(Vec::new(), true);
        assert!(formatted.write("ZWEL", &values).is_err());
    }

    #[test]
    fn apostrophe_in_formatted_name_rejected() {
        let mut binary = Writer::new(Vec::new(), false);
        assert!(binary.write("A'B", &[1]).is_ok());

        let mut formatted = Writer::new(Vec::new(), true);
        let err = formatted.write("A'B", &[1]).unwrap_err();
        assert!(matches!(err, EclError::InvalidInput(_)));
        assert!(formatted.write_message("O'K").is_err());
        assert!(formatted.finish().unwrap().is_empty());
    }

    #[test]
    fn layout_without_room_rejected() {
        let mut layout = Layout::default();
        layout.doub.max_block_bytes = 4;
        assert!(matches!(
            Writer::with_layout(Vec::new(), false, layout),
            Err(EclError::InvalidInput(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CASE.INIT");
        assert!(Writer::create_with_layout(&path, false, layout).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn to_bytes_matches_writer() {
        let bytes = to_bytes(true, [("SEQNUM", DataView::Inte(&[5]))]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            " 'SEQNUM  '           1 'INTE'\n           5\n"
        );
    }

    #[test]
    fn resume_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CASE.UNRST");

        let mut writer = Writer::create(&path, false).unwrap();
        writer.write("SEQNUM", &[1]).unwrap();
        writer.write("SEQNUM", &[2]).unwrap();
        writer.finish().unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 2 * 36);

        let mut writer = Writer::resume(&path, false, Some(36)).unwrap();
        writer.write("SEQNUM", &[3]).unwrap();
        writer.finish().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 2 * 36);
        assert_eq!(&bytes[64..68], &3i32.to_be_bytes());
    }

    #[test]
    fn resume_keeps_custom_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CASE.UNRST");
        let mut layout = Layout::default();
        layout.inte.max_block_bytes = 8;

        let mut writer = Writer::create_with_layout(&path, false, layout).unwrap();
        writer.write("ICON", &[1, 2, 3]).unwrap();
        writer.finish().unwrap();

        let mut writer = Writer::resume_with_layout(&path, false, None, layout).unwrap();
        assert_eq!(writer.layout(), &layout);
        writer.write("ICON", &[4, 5, 6]).unwrap();
        writer.finish().unwrap();

        // Two blocks per array: one of two elements and one of one
        let per_array = 24 + 3 * 4 + 2 * 8;
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 2 * per_array);
    }
}
