//! Result-set output streams
//!
//! A simulation run writes its containers next to each other, named after
//! the case: `CASE.INIT`, `CASE.UNRST`, `CASE.X0005` and their formatted
//! counterparts `CASE.FINIT`, `CASE.FUNRST`, `CASE.F0005`.

use crate::error::{EclError, Result};
use crate::reader::EclFile;
use crate::restart::{RestartFile, SEQNUM};
use crate::types::Element;
use crate::writer::Writer;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Output directory and case name of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    pub output_dir: PathBuf,
    pub base_name: String,
}

impl ResultSet {
    pub fn new(output_dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_name: base_name.into(),
        }
    }
}

/// Full path of the container with extension `ext`
///
/// `CASE`, `CASE.`, `CASE.01` and `CASE.01.` are all accepted as base
/// names; a single trailing dot is dropped.
pub fn output_file_name(rset: &ResultSet, ext: &str) -> PathBuf {
    let stem = rset
        .base_name
        .strip_suffix('.')
        .unwrap_or(&rset.base_name);
    rset.output_dir.join(format!("{stem}.{ext}"))
}

pub fn init_extension(formatted: bool) -> &'static str {
    if formatted { "FINIT" } else { "INIT" }
}

/// `UNRST`/`FUNRST` for unified output, `X0005`/`F0005` for step 5 otherwise
pub fn restart_extension(step: i32, formatted: bool, unified: bool) -> String {
    match (unified, formatted) {
        (true, true) => "FUNRST".to_string(),
        (true, false) => "UNRST".to_string(),
        (false, true) => format!("F{step:04}"),
        (false, false) => format!("X{step:04}"),
    }
}

/// Initial-property container of a run, always written from scratch
#[derive(Debug)]
pub struct InitOutput {
    writer: Writer,
}

impl InitOutput {
    pub fn create(rset: &ResultSet, formatted: bool) -> Result<Self> {
        let path = output_file_name(rset, init_extension(formatted));
        Ok(Self {
            writer: Writer::create(path, formatted)?,
        })
    }

    pub fn write<T: Element>(&mut self, name: &str, values: &[T]) -> Result<()> {
        self.writer.write(name, values)
    }

    pub fn write_message(&mut self, name: &str) -> Result<()> {
        self.writer.write_message(name)
    }

    pub fn finish(self) -> Result<()> {
        self.writer.finish().map(|_| ())
    }
}

/// Restart output for one report step
///
/// In the unified layout an existing container is cut back to the start of
/// the first step numbered `step` or later before the new step is appended,
/// and the step opens with its `SEQNUM` marker. In the separate layout the
/// per-step container is always written from scratch.
#[derive(Debug)]
pub struct RestartOutput {
    writer: Writer,
    step: i32,
}

impl RestartOutput {
    pub fn open(rset: &ResultSet, step: i32, formatted: bool, unified: bool) -> Result<Self> {
        let path = output_file_name(rset, &restart_extension(step, formatted, unified));

        let writer = if unified {
            let mut writer = open_unified(&path, step, formatted)?;
            writer.write(SEQNUM, &[step])?;
            writer
        } else {
            Writer::create(&path, formatted)?
        };

        Ok(Self { writer, step })
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    pub fn write<T: Element>(&mut self, name: &str, values: &[T]) -> Result<()> {
        self.writer.write(name, values)
    }

    pub fn write_message(&mut self, name: &str) -> Result<()> {
        self.writer.write_message(name)
    }

    pub fn finish(self) -> Result<()> {
        self.writer.finish().map(|_| ())
    }
}

fn open_unified(path: &Path, step: i32, formatted: bool) -> Result<Writer<BufWriter<File>>> {
    if !path.exists() {
        return Writer::create(path, formatted);
    }

    let file = EclFile::open(path)?;
    if !file.has_key(SEQNUM) {
        return Err(EclError::InvalidInput(format!(
            "existing file {} does not appear to be a unified restart file",
            path.display()
        )));
    }
    if file.is_formatted() != formatted {
        return Err(EclError::InvalidInput(format!(
            "existing file {} is {}, requested {} output",
            path.display(),
            encoding(file.is_formatted()),
            encoding(formatted)
        )));
    }

    let position = RestartFile::from_file_unified(file)?.restart_step_write_position(step);
    Writer::resume(path, formatted, position)
}

fn encoding(formatted: bool) -> &'static str {
    if formatted { "formatted" } else { "binary" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_variants() {
        for base in ["CASE", "CASE."] {
            let rset = ResultSet::new("/out", base);
            assert_eq!(output_file_name(&rset, "UNRST"), Path::new("/out/CASE.UNRST"));
        }
        for base in ["CASE.01", "CASE.01."] {
            let rset = ResultSet::new("/out", base);
            assert_eq!(output_file_name(&rset, "X0005"), Path::new("/out/CASE.01.X0005"));
        }
    }

    #[test]
    fn extensions() {
        assert_eq!(init_extension(false), "INIT");
        assert_eq!(init_extension(true), "FINIT");
        assert_eq!(restart_extension(5, false, true), "UNRST");
        assert_eq!(restart_extension(5, true, true), "FUNRST");
        assert_eq!(restart_extension(5, false, false), "X0005");
        assert_eq!(restart_extension(123, true, false), "F0123");
    }
}
