//! Renders the daily year progress dot calendar wallpaper.
//!
//! Writes `latest.png` (and `latest_max.png`) plus `palette.json` into the
//! output directory, and optionally date stamped archival copies.

mod calendar_utils;
mod device;
mod draw;
mod error;
mod layout;
mod output;
mod palette;
mod time;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use flexi_logger::{Duplicate, FileSpec, Logger};
use log::{debug, error, info};

use crate::calendar_utils::YearGrid;
use crate::device::DeviceSelection;
use crate::output::{encode_png, OutputDir, PaletteMetadata};
use crate::palette::PaletteFactory;

#[derive(Debug, Parser)]
#[command(
    name = "generate_wallpaper",
    about = "Render the year progress dot calendar wallpaper for today"
)]
pub struct Args {
    /// Directory the images are written to
    #[arg(short, long, env = "OUTPUT_DIR", default_value = "public")]
    pub output_dir: PathBuf,

    /// Render for this date instead of today, as YYYY-MM-DD
    #[arg(long, env = "WALLPAPER_DATE", value_parser = time::parse_date)]
    pub date: Option<NaiveDate>,

    /// Time zone used to decide what today is, the host's local time when not given
    #[arg(long, env = "WALLPAPER_TZ", value_parser = time::parse_timezone)]
    pub timezone: Option<Tz>,

    /// Also keep a date stamped copy that is never overwritten
    ///
    /// From the environment, accepts true/false, yes/no, on/off or 1/0.
    #[arg(
        long,
        env = "WALLPAPER_ARCHIVE",
        overrides_with = "no_archive",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub archive: bool,

    #[arg(long, overrides_with = "archive", hide = true)]
    pub no_archive: bool,

    /// Which device resolutions to render
    #[arg(long, env = "WALLPAPER_DEVICE", value_enum, default_value_t)]
    pub device: DeviceSelection,

    /// Palette seed, derived from the date when not given
    #[arg(long, env = "WALLPAPER_SEED")]
    pub seed: Option<u64>,

    /// Also log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn run(args: &Args) -> anyhow::Result<()> {
    let today = time::resolve_today(args.date, args.timezone);
    let grid = YearGrid::new(today)?;
    let position = grid.position();
    info!(
        "Rendering for {} {} {}, day {} of {}",
        position.month().name(),
        position.day(),
        grid.year(),
        grid.day_of_year(),
        grid.days_in_year()
    );
    debug!(
        "{} dots filled, today at column {} row {}",
        grid.filled_count(),
        position.column(),
        position.row()
    );

    let seed = args.seed.unwrap_or_else(|| PaletteFactory::seed_for(today));
    let palette = PaletteFactory::new(seed).generate();
    info!("Palette: {}", palette.name);
    debug!(
        "bg={:?} past={:?} today={:?} future={:?}",
        palette.bg, palette.past, palette.today, palette.future
    );

    let out = OutputDir::prepare(&args.output_dir)?;

    // Nothing is published until every file is staged
    let mut staged = Vec::new();
    for device in args.device.profiles() {
        info!("Generating for {}", device.name);
        let canvas = draw::render_wallpaper(&grid, device, &palette);
        let png = encode_png(canvas.as_image())
            .with_context(|| format!("Failed to encode wallpaper for {}", device.name))?;

        staged.push(out.stage_latest(device, &png)?);
        if args.archive && !args.no_archive {
            staged.extend(out.stage_archive(device, today, &png)?);
        }
    }
    staged.push(out.stage_palette(&PaletteMetadata::new(&palette, seed, today, Utc::now()))?);

    debug!("Publishing {} files", staged.len());
    out.publish(staged)?;

    info!("Done");
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;
    if let Some(log_file) = &args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .duplicate_to_stderr(Duplicate::All);
    }
    let _logger = logger.start()?;

    match run(&args) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!("{e:#}");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    /// Serialises tests that read or write the process environment
    static ENV: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        let _env = env_lock();
        Args::try_parse_from(std::iter::once("generate_wallpaper").chain(argv.iter().copied()))
    }

    fn parse_with_env(vars: &[(&str, &str)], argv: &[&str]) -> Result<Args, clap::Error> {
        let _env = env_lock();
        for (key, value) in vars {
            std::env::set_var(key, value);
        }
        let args =
            Args::try_parse_from(std::iter::once("generate_wallpaper").chain(argv.iter().copied()));
        for (key, _) in vars {
            std::env::remove_var(key);
        }
        args
    }

    fn args(dir: &std::path::Path, extra: &[&str]) -> Args {
        let mut argv = vec!["--output-dir", dir.to_str().unwrap()];
        argv.extend_from_slice(extra);
        parse(&argv).unwrap()
    }

    #[test]
    fn cli_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.output_dir, PathBuf::from("public"));
        assert_eq!(args.device, DeviceSelection::All);
        assert!(args.timezone.is_none());
        assert!(args.date.is_none());
        assert!(args.seed.is_none());
        assert!(!args.archive);
    }

    #[test]
    fn cli_rejects_bad_dates() {
        assert!(parse(&["--date", "2023-02-29"]).is_err());
        assert!(parse(&["--date", "tomorrow"]).is_err());
        assert!(parse(&["--timezone", "Nowhere/Land"]).is_err());
    }

    #[test]
    fn environment_configures_the_run() {
        let args = parse_with_env(
            &[
                ("OUTPUT_DIR", "/srv/wallpapers"),
                ("WALLPAPER_DATE", "2024-03-01"),
                ("WALLPAPER_TZ", "Europe/Moscow"),
                ("WALLPAPER_ARCHIVE", "true"),
                ("WALLPAPER_DEVICE", "max"),
                ("WALLPAPER_SEED", "42"),
            ],
            &[],
        )
        .unwrap();

        assert_eq!(args.output_dir, PathBuf::from("/srv/wallpapers"));
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(args.timezone, Some(chrono_tz::Europe::Moscow));
        assert!(args.archive);
        assert_eq!(args.device, DeviceSelection::Max);
        assert_eq!(args.seed, Some(42));
    }

    #[test]
    fn archive_env_accepts_boolish_values() {
        for (value, expected) in [
            ("1", true),
            ("yes", true),
            ("on", true),
            ("0", false),
            ("no", false),
            ("false", false),
        ] {
            let args = parse_with_env(&[("WALLPAPER_ARCHIVE", value)], &[]).unwrap();
            assert_eq!(args.archive, expected, "{value}");
        }
        assert!(parse_with_env(&[("WALLPAPER_ARCHIVE", "maybe")], &[]).is_err());
    }

    #[test]
    fn command_line_wins_over_environment() {
        let args = parse_with_env(
            &[("WALLPAPER_DEVICE", "max"), ("WALLPAPER_DATE", "2024-03-01")],
            &["--device", "standard", "--date", "2023-07-04"],
        )
        .unwrap();
        assert_eq!(args.device, DeviceSelection::Standard);
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2023, 7, 4));

        assert!(parse_with_env(&[("WALLPAPER_DATE", "2023-02-29")], &[]).is_err());
    }

    #[test]
    fn run_writes_latest_and_palette() {
        let tmp = tempfile::tempdir().unwrap();
        run(&args(tmp.path(), &["--date", "2024-12-31"])).unwrap();

        for name in ["latest.png", "latest_max.png", "palette.json"] {
            assert!(tmp.path().join(name).is_file(), "{name}");
        }
        assert!(!tmp.path().join("2024-12-31.png").exists());

        let latest = image::open(tmp.path().join("latest.png")).unwrap().to_rgb8();
        assert_eq!(latest.dimensions(), (1170, 2532));
    }

    #[test]
    fn run_is_idempotent_and_keeps_archives() {
        let tmp = tempfile::tempdir().unwrap();
        let argv = ["--date", "2024-01-01", "--archive", "--device", "standard"];

        run(&args(tmp.path(), &argv)).unwrap();
        let latest = std::fs::read(tmp.path().join("latest.png")).unwrap();
        let archive = std::fs::read(tmp.path().join("2024-01-01.png")).unwrap();
        assert_eq!(latest, archive);
        assert!(!tmp.path().join("latest_max.png").exists());

        run(&args(tmp.path(), &argv)).unwrap();
        assert_eq!(std::fs::read(tmp.path().join("latest.png")).unwrap(), latest);

        // A tampered archive proves the second run did not rewrite it
        std::fs::write(tmp.path().join("2024-01-01.png"), b"kept").unwrap();
        run(&args(tmp.path(), &argv)).unwrap();
        assert_eq!(std::fs::read(tmp.path().join("2024-01-01.png")).unwrap(), b"kept");
    }

    #[test]
    fn no_archive_wins_when_last() {
        let tmp = tempfile::tempdir().unwrap();
        let args = args(tmp.path(), &["--date", "2023-03-01", "--archive", "--no-archive"]);
        assert!(!args.archive || args.no_archive);
        run(&args).unwrap();
        assert!(!tmp.path().join("2023-03-01.png").exists());
    }

    #[test]
    fn failed_run_leaves_published_files_alone() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("latest.png"), b"yesterday").unwrap();
        std::fs::create_dir_all(tmp.path().join("latest_max.png/keep")).unwrap();

        let result = run(&args(tmp.path(), &["--date", "2024-05-05", "--archive"]));
        assert!(result.is_err());

        assert_eq!(
            std::fs::read(tmp.path().join("latest.png")).unwrap(),
            b"yesterday"
        );
        assert!(!tmp.path().join("palette.json").exists());
        assert!(!tmp.path().join("2024-05-05.png").exists());
        let entries: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 2, "{entries:?}");
    }
}
