//! Restart step index
//!
//! A unified restart container holds every report step in one file. Each
//! step starts with a `SEQNUM` array (one INTE element, the step number)
//! and runs up to the next `SEQNUM` or the end of the file. In the separate
//! layout each step lives in its own container (`CASE.X0005`,
//! `CASE.F0005`) and the whole catalogue belongs to that one step.

use crate::error::{EclError, Result};
use crate::reader::EclFile;
use crate::types::{ArrayData, ArrayInfo, ArrayType, Element};
use std::cell::Cell;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::ops::Range;
use std::path::Path;

/// Name of the step marker array
pub const SEQNUM: &str = "SEQNUM";

#[derive(Debug)]
struct Step {
    number: i32,
    range: Range<usize>,
    loaded: Cell<bool>,
}

/// Catalogue of a restart container partitioned into report steps
///
/// Step numbers are kept in file order. Repeated numbers are kept as
/// separate steps, but every lookup by number resolves to the first one.
#[derive(Debug)]
pub struct RestartFile<R = BufReader<File>> {
    file: EclFile<R>,
    steps: Vec<Step>,
    unified: bool,
}

impl RestartFile<BufReader<File>> {
    /// Open a restart container
    ///
    /// An `X####` or `F####` extension selects the separate layout with that
    /// step number; anything else is indexed as a unified container.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match separate_step(path) {
            Some(step) => Self::open_separate(path, step),
            None => Self::from_file_unified(EclFile::open(path)?),
        }
    }

    /// Open one per-step container of the separate layout
    pub fn open_separate(path: impl AsRef<Path>, step: i32) -> Result<Self> {
        Ok(Self::from_file_separate(EclFile::open(path)?, step))
    }
}

impl<R: Read + Seek> RestartFile<R> {
    /// Index an open container by its `SEQNUM` markers
    pub fn from_file_unified(file: EclFile<R>) -> Result<Self> {
        let mut steps: Vec<Step> = Vec::new();

        for (index, entry) in file.entries().iter().enumerate() {
            if entry.name() != SEQNUM {
                if steps.is_empty() {
                    return Err(EclError::corrupt(
                        entry.name(),
                        entry.header_offset(),
                        "array precedes the first SEQNUM marker",
                    ));
                }
                continue;
            }
            if entry.array_type() != ArrayType::Inte || entry.count() != 1 {
                return Err(EclError::corrupt(
                    SEQNUM,
                    entry.header_offset(),
                    format!(
                        "step marker must be a single INTE element, found {} x {}",
                        entry.count(),
                        entry.array_type()
                    ),
                ));
            }

            let number = file.get_at::<i32>(index)?[0];
            let repeated = steps.iter().any(|s| s.number == number);
            if let Some(last) = steps.last_mut() {
                last.range.end = index;
                if repeated {
                    log::warn!("report step {number} appears more than once; lookups use the first");
                } else if number < last.number {
                    log::warn!("report step {number} follows step {}", last.number);
                }
            }
            steps.push(Step {
                number,
                range: index..file.len(),
                loaded: Cell::new(false),
            });
        }

        log::debug!(
            "indexed {} report steps over {} arrays",
            steps.len(),
            file.len()
        );
        Ok(Self {
            file,
            steps,
            unified: true,
        })
    }

    /// Treat the whole catalogue as report step `step`
    pub fn from_file_separate(file: EclFile<R>, step: i32) -> Self {
        let steps = vec![Step {
            number: step,
            range: 0..file.len(),
            loaded: Cell::new(false),
        }];
        Self {
            file,
            steps,
            unified: false,
        }
    }

    /// The underlying directory reader
    pub fn file(&self) -> &EclFile<R> {
        &self.file
    }

    pub fn is_unified(&self) -> bool {
        self.unified
    }

    pub fn has_report_step(&self, step: i32) -> bool {
        self.find(step).is_some()
    }

    /// Step numbers in file order
    pub fn list_of_report_steps(&self) -> Vec<i32> {
        self.steps.iter().map(|s| s.number).collect()
    }

    /// Decode every array of one step; a no-op once the step is loaded
    pub fn load_report_step(&self, step: i32) -> Result<()> {
        let found = self.step(step)?;
        if !found.loaded.get() {
            self.file.load_range(found.range.clone())?;
            found.loaded.set(true);
            log::trace!("loaded report step {step}");
        }
        Ok(())
    }

    pub fn is_report_step_loaded(&self, step: i32) -> bool {
        self.find(step).is_some_and(|s| s.loaded.get())
    }

    /// Typed payload of `name`, looked up only within report step `step`
    pub fn get_rst<T: Element>(&self, name: &str, step: i32) -> Result<&[T]> {
        let index = self.index_in_step(name, step)?;
        self.file.get_at(index)
    }

    /// Untyped payload of `name` within report step `step`
    pub fn rst_data(&self, name: &str, step: i32) -> Result<&ArrayData> {
        let index = self.index_in_step(name, step)?;
        self.file.data_at(index)
    }

    /// Catalogue indices covered by one step
    pub fn step_range(&self, step: i32) -> Result<Range<usize>> {
        self.step(step).map(|s| s.range.clone())
    }

    /// Catalogue entries of one step, in file order
    pub fn list_of_rst_arrays(&self, step: i32) -> Result<Vec<ArrayInfo>> {
        let found = self.step(step)?;
        Ok(self.file.entries()[found.range.clone()]
            .iter()
            .map(|e| e.info())
            .collect())
    }

    /// Offset at which writing report step `step` should start
    ///
    /// The header offset of the first step (in file order) numbered `step`
    /// or later; truncating there drops that step and everything after it.
    /// `None` when every step is earlier, meaning a plain append.
    pub fn restart_step_write_position(&self, step: i32) -> Option<u64> {
        self.steps
            .iter()
            .find(|s| s.number >= step)
            .map(|s| self.file.seek_position(s.range.start))
    }

    fn find(&self, step: i32) -> Option<&Step> {
        self.steps.iter().find(|s| s.number == step)
    }

    fn step(&self, step: i32) -> Result<&Step> {
        self.find(step).ok_or(EclError::StepNotFound(step))
    }

    fn index_in_step(&self, name: &str, step: i32) -> Result<usize> {
        let found = self.step(step)?;
        let entries = self.file.entries();
        found
            .range
            .clone()
            .find(|&i| entries[i].name() == name)
            .ok_or_else(|| EclError::ArrayNotFoundAtStep {
                name: name.to_string(),
                step,
            })
    }
}

/// Step number encoded in a separate-layout extension (`X0005`, `F0012`)
pub fn separate_step(path: &Path) -> Option<i32> {
    let ext = path.extension()?.to_str()?;
    let digits = ext.strip_prefix(['X', 'F'])?;
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::Writer;
    use std::io::Cursor;

    fn restart(steps: &[i32]) -> Vec<u8> {
        let mut writer = Writer::new(Vec::new(), false);
        for &step in steps {
            writer.write(SEQNUM, &[step]).unwrap();
            writer.write("INTEHEAD", &[step * 10, 1]).unwrap();
            writer.write("PRESSURE", &[step as f32; 3]).unwrap();
        }
        writer.finish().unwrap()
    }

    fn index(steps: &[i32]) -> RestartFile<Cursor<Vec<u8>>> {
        let file = EclFile::from_reader(Cursor::new(restart(steps)), false).unwrap();
        RestartFile::from_file_unified(file).unwrap()
    }

    #[test]
    fn steps_in_file_order() {
        let rst = index(&[5, 10, 15]);
        assert_eq!(rst.list_of_report_steps(), vec![5, 10, 15]);
        assert!(rst.has_report_step(10));
        assert!(!rst.has_report_step(7));
        assert_eq!(rst.get_rst::<i32>(SEQNUM, 10).unwrap(), &[10]);
        assert_eq!(rst.get_rst::<i32>("INTEHEAD", 15).unwrap(), &[150, 1]);
    }

    #[test]
    fn step_ranges_partition_catalogue() {
        let rst = index(&[1, 2]);
        let names: Vec<_> = rst
            .list_of_rst_arrays(2)
            .unwrap()
            .into_iter()
            .map(|info| info.name)
            .collect();
        assert_eq!(names, [SEQNUM, "INTEHEAD", "PRESSURE"]);
    }

    #[test]
    fn load_step_marks_only_that_step() {
        let rst = index(&[5, 10]);
        rst.load_report_step(10).unwrap();
        assert!(rst.is_report_step_loaded(10));
        assert!(!rst.is_report_step_loaded(5));
        assert!(rst.file().entries()[3..].iter().all(|e| e.is_loaded()));
        assert!(!rst.file().entries()[1].is_loaded());
        // Idempotent
        rst.load_report_step(10).unwrap();
    }

    #[test]
    fn missing_step_errors() {
        let rst = index(&[5]);
        assert!(matches!(rst.load_report_step(6), Err(EclError::StepNotFound(6))));
        assert!(rst.get_rst::<i32>(SEQNUM, 6).unwrap_err().is_not_found());
        assert!(matches!(
            rst.get_rst::<i32>("ICON", 5),
            Err(EclError::ArrayNotFoundAtStep { .. })
        ));
    }

    #[test]
    fn write_positions() {
        let rst = index(&[1, 13]);
        let second = rst.file().seek_position(3);
        assert_eq!(rst.restart_step_write_position(1), Some(0));
        assert_eq!(rst.restart_step_write_position(5), Some(second));
        assert_eq!(rst.restart_step_write_position(13), Some(second));
        assert_eq!(rst.restart_step_write_position(14), None);
    }

    #[test]
    fn duplicate_steps_resolve_to_first() {
        let rst = index(&[5, 5]);
        assert_eq!(rst.list_of_report_steps(), vec![5, 5]);
        assert_eq!(rst.get_rst::<i32>("INTEHEAD", 5).unwrap(), &[50, 1]);
        assert_eq!(rst.list_of_rst_arrays(5).unwrap().len(), 3);
    }

    #[test]
    fn array_before_first_marker_is_corrupt() {
        let mut writer = Writer::new(Vec::new(), false);
        writer.write("INTEHEAD", &[1]).unwrap();
        writer.write(SEQNUM, &[1]).unwrap();
        let bytes = writer.finish().unwrap();

        let file = EclFile::from_reader(Cursor::new(bytes), false).unwrap();
        assert!(RestartFile::from_file_unified(file).unwrap_err().is_corrupt());
    }

    #[test]
    fn separate_layout() {
        let mut writer = Writer::new(Vec::new(), true);
        writer.write("INTEHEAD", &[7]).unwrap();
        let bytes = writer.finish().unwrap();

        let file = EclFile::from_reader(Cursor::new(bytes), true).unwrap();
        let rst = RestartFile::from_file_separate(file, 3);
        assert!(!rst.is_unified());
        assert_eq!(rst.list_of_report_steps(), vec![3]);
        assert_eq!(rst.get_rst::<i32>("INTEHEAD", 3).unwrap(), &[7]);
    }

    #[test]
    fn separate_extensions() {
        assert_eq!(separate_step(Path::new("CASE.X0005")), Some(5));
        assert_eq!(separate_step(Path::new("out/CASE.F0120")), Some(120));
        assert_eq!(separate_step(Path::new("CASE.UNRST")), None);
        assert_eq!(separate_step(Path::new("CASE.X05")), None);
        assert_eq!(separate_step(Path::new("CASE.FUNRST")), None);
    }
}
