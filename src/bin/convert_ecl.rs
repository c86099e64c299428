//! Convert a container between the binary and formatted encodings
//!
//! `convert_ecl CASE.UNRST` writes `CASE.FUNRST`, `convert_ecl CASE.F0005`
//! writes `CASE.X0005`. With `-r STEP` only one report step of a unified
//! restart file is converted; `-l` lists its report steps instead.

use anyhow::{Context, bail};
use clap::Parser;
use eclio::{EclFile, RestartFile, Writer};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input container; binary input is written formatted and vice versa
    file: PathBuf,

    /// List the report steps of a unified restart file
    #[arg(short, long)]
    list: bool,

    /// Convert a single report step of a unified restart file
    #[arg(short = 'r', long = "report-step")]
    report_step: Option<i32>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.list {
        return list_steps(&args.file);
    }

    if args.report_step.is_some() {
        require_unified(&args.file, "-r")?;
    }

    let start = Instant::now();
    let input = EclFile::open(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;
    let to_formatted = !input.is_formatted();
    let output = converted_name(&args.file, to_formatted)?;

    match args.report_step {
        Some(step) => {
            let rst = RestartFile::from_file_unified(input)?;
            if !rst.has_report_step(step) {
                bail!("{} has no report step {step}", args.file.display());
            }
            rst.load_report_step(step)?;

            println!("converting {} -> {}", args.file.display(), output.display());
            let mut writer = Writer::create(&output, to_formatted)?;
            for index in rst.step_range(step)? {
                copy_array(rst.file(), index, &mut writer)?;
            }
            writer.finish()?;
        }
        None => {
            input.load_data()?;

            println!("converting {} -> {}", args.file.display(), output.display());
            let mut writer = Writer::create(&output, to_formatted)?;
            for index in 0..input.len() {
                copy_array(&input, index, &mut writer)?;
            }
            writer.finish()?;
        }
    }

    log::info!(
        "converted {} in {:.3} seconds",
        args.file.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn copy_array(input: &EclFile, index: usize, writer: &mut Writer) -> anyhow::Result<()> {
    let name = input.entries()[index].name();
    writer.write_data(name, input.data_at(index)?)?;
    Ok(())
}

fn list_steps(path: &Path) -> anyhow::Result<()> {
    require_unified(path, "-l")?;
    let rst = RestartFile::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    if rst.file().has_key("INTEHEAD") {
        rst.file().load_named("INTEHEAD")?;
    }

    for step in rst.list_of_report_steps() {
        match rst.get_rst::<i32>("INTEHEAD", step) {
            Ok(head) if head.len() > 66 => println!(
                "Report step number: {step:>4}   Date: {}/{:02}/{:02}",
                head[66], head[65], head[64]
            ),
            _ => println!("Report step number: {step:>4}"),
        }
    }
    println!();
    Ok(())
}

fn require_unified(path: &Path, option: &str) -> anyhow::Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("UNRST" | "FUNRST") => Ok(()),
        _ => bail!("option {option} is only available for unified restart files (*.UNRST, *.FUNRST)"),
    }
}

/// Output name with the extension of the other encoding
///
/// `X0005` <-> `F0005`, `S0005` <-> `A0005`, otherwise an `F` prefix is
/// added (`UNRST` -> `FUNRST`) or removed.
fn converted_name(path: &Path, to_formatted: bool) -> anyhow::Result<PathBuf> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .with_context(|| format!("{} has no file extension", path.display()))?;

    let numbered = |rest: &str| rest.len() == 4 && rest.bytes().all(|b| b.is_ascii_digit());

    let new_ext = if to_formatted {
        match ext.split_at_checked(1) {
            Some(("X", rest)) if numbered(rest) => format!("F{rest}"),
            Some(("S", rest)) if numbered(rest) => format!("A{rest}"),
            _ => format!("F{ext}"),
        }
    } else {
        match ext.split_at_checked(1) {
            Some(("F", rest)) if numbered(rest) => format!("X{rest}"),
            Some(("A", rest)) if numbered(rest) => format!("S{rest}"),
            Some(("F", rest)) if !rest.is_empty() => rest.to_string(),
            _ => bail!("{} does not have a formatted file extension", path.display()),
        }
    };

    Ok(path.with_extension(new_ext))
}
