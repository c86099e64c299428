//! Directory reader: an ordered, lazily decoded catalogue of arrays

use crate::error::{EclError, Result};
use crate::parser::{
    count_values, decode_payload, detect_format, is_formatted_name, parse_binary_header,
    parse_formatted_header,
};
use crate::types::{ArrayData, ArrayInfo, Element, Entry, HEADER_SIZE, Layout};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// An open container
///
/// The catalogue (name, type, count and position of every array) is built
/// when the container is opened. Payloads are decoded on first access and
/// cached in their entry; the stream stays open for the reader's lifetime.
///
/// Decoding mutates the per-entry caches through `&self`, so a reader is not
/// `Sync`. Independent readers share nothing.
#[derive(Debug)]
pub struct EclFile<R = BufReader<File>> {
    path: Option<PathBuf>,
    formatted: bool,
    layout: Layout,
    entries: Vec<Entry>,
    first_index: HashMap<String, usize>,
    file_len: u64,
    stream: RefCell<R>,
}

impl EclFile<BufReader<File>> {
    /// Open a container, detecting its encoding from the content
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_layout(path, Layout::default())
    }

    pub fn open_with_layout(path: impl AsRef<Path>, layout: Layout) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);

        let prefix = sniff_prefix(&mut reader)?;
        reader.seek(SeekFrom::Start(0))?;

        let formatted = match detect_format(&prefix) {
            Some(formatted) => formatted,
            None if prefix.iter().all(u8::is_ascii_whitespace) => is_formatted_name(path),
            None => {
                return Err(EclError::UnrecognizedFormat(format!(
                    "{} is neither a binary nor a formatted container",
                    path.display()
                )));
            }
        };

        let mut file = Self::from_reader_with_layout(reader, formatted, layout)?;
        file.path = Some(path.to_path_buf());
        log::debug!(
            "opened {} ({}, {} arrays)",
            path.display(),
            if formatted { "formatted" } else { "binary" },
            file.len()
        );
        Ok(file)
    }
}

impl<R: Read + Seek> EclFile<R> {
    /// Build a catalogue from any seekable stream in a known encoding
    pub fn from_reader(reader: R, formatted: bool) -> Result<Self> {
        Self::from_reader_with_layout(reader, formatted, Layout::default())
    }

    pub fn from_reader_with_layout(mut reader: R, formatted: bool, layout: Layout) -> Result<Self> {
        layout.validate()?;
        let file_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        let entries = if formatted {
            scan_formatted(&mut reader)?
        } else {
            scan_binary(&mut reader, file_len, &layout)?
        };

        let mut first_index = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            first_index.entry(entry.name().to_string()).or_insert(i);
        }

        Ok(Self {
            path: None,
            formatted,
            layout,
            entries,
            first_index,
            file_len,
            stream: RefCell::new(reader),
        })
    }

    /// Path the container was opened from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_formatted(&self) -> bool {
        self.formatted
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Number of arrays in the catalogue
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn has_key(&self, name: &str) -> bool {
        self.first_index.contains_key(name)
    }

    /// Index of the first array called `name`
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.first_index.get(name).copied()
    }

    /// Name, type and count of every array, in file order
    pub fn list(&self) -> Vec<ArrayInfo> {
        self.entries.iter().map(Entry::info).collect()
    }

    /// Typed payload of the first array called `name`
    pub fn get<T: Element>(&self, name: &str) -> Result<&[T]> {
        let index = self
            .index_of(name)
            .ok_or_else(|| EclError::ArrayNotFound(name.to_string()))?;
        self.get_at(index)
    }

    /// Typed payload of the array at `index`
    pub fn get_at<T: Element>(&self, index: usize) -> Result<&[T]> {
        let entry = self.entry(index)?;
        if entry.array_type() != T::ARRAY_TYPE {
            return Err(EclError::TypeMismatch {
                name: entry.name().to_string(),
                expected: T::ARRAY_TYPE,
                actual: entry.array_type(),
            });
        }
        let data = self.load_entry(entry)?;
        T::slice(data).ok_or_else(|| EclError::TypeMismatch {
            name: entry.name().to_string(),
            expected: T::ARRAY_TYPE,
            actual: data.array_type(),
        })
    }

    /// Untyped payload of the first array called `name`
    pub fn data(&self, name: &str) -> Result<&ArrayData> {
        let index = self
            .index_of(name)
            .ok_or_else(|| EclError::ArrayNotFound(name.to_string()))?;
        self.data_at(index)
    }

    /// Untyped payload of the array at `index`
    pub fn data_at(&self, index: usize) -> Result<&ArrayData> {
        let entry = self.entry(index)?;
        self.load_entry(entry)
    }

    /// Decode every payload
    pub fn load_data(&self) -> Result<()> {
        self.load_range(0..self.entries.len())
    }

    /// Decode the payload at `index`
    pub fn load_array(&self, index: usize) -> Result<()> {
        self.data_at(index).map(|_| ())
    }

    /// Decode every array called `name`
    pub fn load_named(&self, name: &str) -> Result<()> {
        if !self.has_key(name) {
            return Err(EclError::ArrayNotFound(name.to_string()));
        }
        for entry in self.entries.iter().filter(|e| e.name() == name) {
            self.load_entry(entry)?;
        }
        Ok(())
    }

    pub(crate) fn load_range(&self, range: std::ops::Range<usize>) -> Result<()> {
        for entry in &self.entries[range] {
            self.load_entry(entry)?;
        }
        Ok(())
    }

    /// Stream offset of the header of the array at `index`
    ///
    /// An index past the last array maps to the end of the container.
    pub fn seek_position(&self, index: usize) -> u64 {
        self.entries
            .get(index)
            .map_or(self.file_len, Entry::header_offset)
    }

    pub(crate) fn entry(&self, index: usize) -> Result<&Entry> {
        self.entries.get(index).ok_or(EclError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    fn load_entry<'a>(&self, entry: &'a Entry) -> Result<&'a ArrayData> {
        if let Some(data) = entry.loaded() {
            return Ok(data);
        }

        let len = usize::try_from(entry.data_len()).map_err(|_| {
            EclError::corrupt(entry.name(), entry.data_offset(), "payload too large")
        })?;
        let mut bytes = vec![0u8; len];
        {
            let mut stream = self.stream.borrow_mut();
            stream.seek(SeekFrom::Start(entry.data_offset()))?;
            stream.read_exact(&mut bytes).map_err(|e| match e.kind() {
                ErrorKind::UnexpectedEof => {
                    EclError::corrupt(entry.name(), entry.data_offset(), "truncated payload")
                }
                _ => EclError::Io(e),
            })?;
        }

        let data = decode_payload(
            &bytes,
            entry.data_offset(),
            entry.name(),
            entry.array_type(),
            entry.count(),
            &self.layout,
            self.formatted,
        )?;
        log::trace!(
            "decoded {} '{}' ({} elements)",
            entry.array_type(),
            entry.name(),
            entry.count()
        );
        Ok(entry.store(data))
    }
}

/// Leading bytes that decide the encoding: at least the four marker bytes,
/// and any run of blank space up to the first other byte
fn sniff_prefix<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut prefix = Vec::new();
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(prefix);
        }
        let blank = buf.iter().take_while(|b| b.is_ascii_whitespace()).count();
        let take = (blank + 1).max(4 - prefix.len().min(4)).min(buf.len());
        prefix.extend_from_slice(&buf[..take]);
        reader.consume(take);

        if prefix.len() >= 4 && !prefix.iter().all(u8::is_ascii_whitespace) {
            return Ok(prefix);
        }
    }
}

fn scan_binary<R: Read + Seek>(reader: &mut R, file_len: u64, layout: &Layout) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    let mut position = 0u64;
    let mut buf = [0u8; HEADER_SIZE];

    while position < file_len {
        let available = (file_len - position).min(HEADER_SIZE as u64) as usize;
        reader.read_exact(&mut buf[..available])?;
        let header = parse_binary_header(&buf[..available], position)?;

        let data_offset = position + HEADER_SIZE as u64;
        let data_len = layout.binary_size(header.array_type, header.count);
        let end = data_offset + data_len;
        if end > file_len {
            return Err(EclError::corrupt(
                &header.name,
                data_offset,
                format!("payload of {data_len} bytes runs past the end of the file ({file_len} bytes)"),
            ));
        }
        reader.seek(SeekFrom::Start(end))?;

        entries.push(Entry::new(
            header.name,
            header.array_type,
            header.count,
            position,
            data_offset,
            data_len,
        ));
        position = end;
    }

    Ok(entries)
}

fn scan_formatted<R: Read>(reader: &mut R) -> Result<Vec<Entry>> {
    let mut lines = BufReader::new(reader);
    let mut entries = Vec::new();
    let mut position = 0u64;
    let mut line = String::new();

    loop {
        let header_offset = position;
        let n = read_line(&mut lines, &mut line, position)?;
        if n == 0 {
            break;
        }
        position += n as u64;
        if line.trim().is_empty() {
            continue;
        }

        let header = parse_formatted_header(&line, header_offset)?;
        let data_offset = position;
        let mut found = 0;

        while found < header.count {
            let n = read_line(&mut lines, &mut line, position)?;
            if n == 0 {
                return Err(EclError::corrupt(
                    &header.name,
                    position,
                    format!(
                        "end of file after {found} of {} values",
                        header.count
                    ),
                ));
            }
            found += count_values(&line, header.array_type, &header.name, position)?;
            position += n as u64;
        }
        if found > header.count {
            return Err(EclError::corrupt(
                &header.name,
                data_offset,
                format!("found {found} values, header declares {}", header.count),
            ));
        }

        entries.push(Entry::new(
            header.name,
            header.array_type,
            header.count,
            header_offset,
            data_offset,
            position - data_offset,
        ));
    }

    Ok(entries)
}

fn read_line<B: BufRead>(lines: &mut B, line: &mut String, position: u64) -> Result<usize> {
    line.clear();
    lines.read_line(line).map_err(|e| match e.kind() {
        ErrorKind::InvalidData => EclError::header(position, "line is not valid text"),
        _ => EclError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::Writer;
    use std::io::Cursor;

    fn sample(formatted: bool) -> Vec<u8> {
        let mut writer = Writer::new(Vec::new(), formatted);
        writer.write("ICON", &[1, 7, 2, 9]).unwrap();
        writer.write("PORV", &[0.5f32, 1.5]).unwrap();
        writer.write_message("ENDSOL").unwrap();
        writer.write("ICON", &[3]).unwrap();
        writer.finish().unwrap()
    }

    #[test]
    fn catalogue_in_file_order() {
        for formatted in [false, true] {
            let file = EclFile::from_reader(Cursor::new(sample(formatted)), formatted).unwrap();
            let names: Vec<_> = file.list().into_iter().map(|info| info.name).collect();
            assert_eq!(names, ["ICON", "PORV", "ENDSOL", "ICON"]);
            assert!(file.entries().iter().all(|e| !e.is_loaded()));
        }
    }

    #[test]
    fn first_match_by_name() {
        let file = EclFile::from_reader(Cursor::new(sample(false)), false).unwrap();
        assert_eq!(file.get::<i32>("ICON").unwrap(), &[1, 7, 2, 9]);
        assert_eq!(file.get_at::<i32>(3).unwrap(), &[3]);
    }

    #[test]
    fn memoized_decode() {
        let file = EclFile::from_reader(Cursor::new(sample(true)), true).unwrap();
        let first = file.get::<f32>("PORV").unwrap().as_ptr();
        assert!(file.entries()[1].is_loaded());
        let second = file.get::<f32>("PORV").unwrap().as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn type_and_lookup_errors() {
        let file = EclFile::from_reader(Cursor::new(sample(false)), false).unwrap();
        assert!(matches!(
            file.get::<f32>("ICON"),
            Err(EclError::TypeMismatch { .. })
        ));
        assert!(matches!(
            file.get::<i32>("ENDSOL"),
            Err(EclError::TypeMismatch { .. })
        ));
        assert!(file.get::<i32>("NOPE").unwrap_err().is_not_found());
        assert!(file.get_at::<i32>(4).unwrap_err().is_not_found());
    }

    #[test]
    fn seek_positions() {
        let file = EclFile::from_reader(Cursor::new(sample(false)), false).unwrap();
        assert_eq!(file.seek_position(0), 0);
        assert_eq!(file.seek_position(1), 24 + 24);
        assert_eq!(file.seek_position(4), sample(false).len() as u64);
    }

    #[test]
    fn truncated_binary_is_corrupt() {
        let mut bytes = sample(false);
        bytes.truncate(30);
        let err = EclFile::from_reader(Cursor::new(bytes), false).unwrap_err();
        assert!(err.is_corrupt());
        assert!(err.to_string().contains("ICON"));
    }

    #[test]
    fn formatted_value_count_checked() {
        let text = " 'ICON    '           2 'INTE'\n           1           2           3\n";
        let err = EclFile::from_reader(Cursor::new(text), true).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn formatted_blank_lines_skipped() {
        let text = "\n 'ICON    '           1 'INTE'\n           4\n\n";
        let file = EclFile::from_reader(Cursor::new(text), true).unwrap();
        assert_eq!(file.get::<i32>("ICON").unwrap(), &[4]);
        assert_eq!(file.seek_position(0), 1);
    }
}
