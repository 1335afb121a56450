//! Encoding and persisting the rendered wallpapers.
//!
//! A run first stages every file it is going to publish as a temporary file
//! inside the output directory. Only once all of them are staged are they
//! renamed into place, so a run that fails while rendering, encoding or
//! staging leaves every published path as it was.

use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use log::{info, warn};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::device::DeviceProfile;
use crate::error::{Error, Result};
use crate::palette::{Palette, PaletteColors};

pub const PALETTE_FILE_NAME: &str = "palette.json";

/// Lossless, best compression
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut bytes, CompressionType::Best, FilterType::Adaptive);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(bytes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The file already existed and was left untouched
    Kept,
}

#[derive(Debug, Serialize)]
pub struct PaletteMetadata {
    pub generated_for: String,
    pub generated_at: String,
    pub seed: u64,
    pub palette_name: String,
    pub colors: PaletteColors,
}

impl PaletteMetadata {
    pub fn new(palette: &Palette, seed: u64, date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            generated_for: date.format("%Y-%m-%d").to_string(),
            generated_at: now.to_rfc3339(),
            seed,
            palette_name: palette.name.clone(),
            colors: palette.colors(),
        }
    }
}

/// Directory the wallpapers are published from
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Replace,
    /// Never clobber an existing file
    Once,
}

/// Contents written to a temporary file, waiting to be renamed to `target`
///
/// Dropping it without publishing removes the temporary file.
#[derive(Debug)]
pub struct Staged {
    file: NamedTempFile,
    target: PathBuf,
    placement: Placement,
}

impl Staged {
    fn publish(self) -> Result<WriteOutcome> {
        let Self {
            file,
            target,
            placement,
        } = self;
        match placement {
            Placement::Replace => {
                file.persist(&target).map_err(|e| Error::io(&target, e.error))?;
                info!("Wrote {}", target.display());
                Ok(WriteOutcome::Written)
            }
            Placement::Once => match file.persist_noclobber(&target) {
                Ok(_) => {
                    info!("Archived {}", target.display());
                    Ok(WriteOutcome::Written)
                }
                Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                    warn!("Archive {} appeared meanwhile, keeping it", target.display());
                    Ok(WriteOutcome::Kept)
                }
                Err(e) => Err(Error::io(&target, e.error)),
            },
        }
    }
}

impl OutputDir {
    /// Creates the directory if it does not exist yet
    pub fn prepare(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| Error::io(&root, e))?;
        Ok(Self { root })
    }

    /// Stage the replacement of `latest*.png` for `device`
    pub fn stage_latest(&self, device: &DeviceProfile, png: &[u8]) -> Result<Staged> {
        let target = self.root.join(device.latest_file_name());
        check_target(&target)?;
        self.stage(target, Placement::Replace, png)
    }

    /// Stage the date stamped copy for `device`
    ///
    /// `None` when the archive already exists, it is never rewritten.
    pub fn stage_archive(
        &self,
        device: &DeviceProfile,
        date: NaiveDate,
        png: &[u8],
    ) -> Result<Option<Staged>> {
        let target = self.root.join(device.archive_file_name(date));
        if check_target(&target)? {
            warn!("Archive {} already exists, keeping it", target.display());
            return Ok(None);
        }
        self.stage(target, Placement::Once, png).map(Some)
    }

    pub fn stage_palette(&self, metadata: &PaletteMetadata) -> Result<Staged> {
        let target = self.root.join(PALETTE_FILE_NAME);
        check_target(&target)?;
        let json = serde_json::to_vec_pretty(metadata)?;
        self.stage(target, Placement::Replace, &json)
    }

    /// Rename every staged file into place, in order
    pub fn publish(&self, staged: Vec<Staged>) -> Result<Vec<WriteOutcome>> {
        staged.into_iter().map(Staged::publish).collect()
    }

    fn stage(&self, target: PathBuf, placement: Placement, contents: &[u8]) -> Result<Staged> {
        let mut file = NamedTempFile::new_in(&self.root).map_err(|e| Error::io(&self.root, e))?;
        file.write_all(contents)
            .and_then(|()| file.as_file().sync_all())
            .map_err(|e| Error::io(file.path(), e))?;
        Ok(Staged {
            file,
            target,
            placement,
        })
    }
}

/// Whether a file already sits at `path`
///
/// Anything that a rename cannot replace, like a directory, is an error.
fn check_target(path: &Path) -> Result<bool> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => Err(Error::io(
            path,
            io::Error::new(ErrorKind::AlreadyExists, "a directory is in the way"),
        )),
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DEVICE_MAX, DEVICE_STANDARD};
    use crate::palette::PaletteFactory;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }

    fn leftover_temp_files(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(".tmp"))
            .count()
    }

    #[test]
    fn encodes_png() {
        let image = RgbImage::from_pixel(8, 4, image::Rgb([1, 2, 3]));
        let png = encode_png(&image).unwrap();
        assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded, image);
    }

    #[test]
    fn prepare_creates_nested_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        OutputDir::prepare(tmp.path().join("a/b")).unwrap();
        assert!(tmp.path().join("a/b").is_dir());
    }

    #[test]
    fn latest_is_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        let out = OutputDir::prepare(tmp.path()).unwrap();
        let path = tmp.path().join("latest.png");

        let first = out.stage_latest(&DEVICE_STANDARD, b"first").unwrap();
        out.publish(vec![first]).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"first");

        let second = out.stage_latest(&DEVICE_STANDARD, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"first");
        assert_eq!(out.publish(vec![second]).unwrap(), [WriteOutcome::Written]);
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        assert_eq!(leftover_temp_files(tmp.path()), 0);
    }

    #[test]
    fn archive_is_never_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        let out = OutputDir::prepare(tmp.path()).unwrap();

        let first = out.stage_archive(&DEVICE_MAX, date(), b"first").unwrap();
        assert_eq!(
            out.publish(first.into_iter().collect()).unwrap(),
            [WriteOutcome::Written]
        );
        assert!(out
            .stage_archive(&DEVICE_MAX, date(), b"second")
            .unwrap()
            .is_none());

        let archived = std::fs::read(tmp.path().join("2024-02-29_max.png")).unwrap();
        assert_eq!(archived, b"first");
        assert_eq!(leftover_temp_files(tmp.path()), 0);
    }

    #[test]
    fn archive_appearing_after_staging_is_kept() {
        let tmp = tempfile::tempdir().unwrap();
        let out = OutputDir::prepare(tmp.path()).unwrap();

        let staged = out.stage_archive(&DEVICE_STANDARD, date(), b"late").unwrap();
        std::fs::write(tmp.path().join("2024-02-29.png"), b"early").unwrap();
        assert_eq!(
            out.publish(staged.into_iter().collect()).unwrap(),
            [WriteOutcome::Kept]
        );
        assert_eq!(
            std::fs::read(tmp.path().join("2024-02-29.png")).unwrap(),
            b"early"
        );
        assert_eq!(leftover_temp_files(tmp.path()), 0);
    }

    #[test]
    fn palette_metadata_json() {
        let tmp = tempfile::tempdir().unwrap();
        let out = OutputDir::prepare(tmp.path()).unwrap();
        let palette = PaletteFactory::new(7).generate();
        let now = DateTime::parse_from_rfc3339("2024-02-29T06:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let staged = out
            .stage_palette(&PaletteMetadata::new(&palette, 7, date(), now))
            .unwrap();
        out.publish(vec![staged]).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(tmp.path().join(PALETTE_FILE_NAME)).unwrap())
                .unwrap();

        assert_eq!(json["generated_for"], "2024-02-29");
        assert_eq!(json["seed"], 7);
        assert_eq!(json["palette_name"], palette.name.as_str());
        for role in ["background", "past", "today", "future"] {
            let hex = json["colors"][role]["hex"].as_str().unwrap();
            assert_eq!(hex.len(), 7);
            assert_eq!(json["colors"][role]["rgb"].as_array().unwrap().len(), 3);
        }
    }

    #[test]
    fn directory_in_the_way_fails_before_staging() {
        let tmp = tempfile::tempdir().unwrap();
        let out = OutputDir::prepare(tmp.path()).unwrap();
        std::fs::create_dir_all(tmp.path().join("latest_max.png/keep")).unwrap();

        assert!(matches!(
            out.stage_latest(&DEVICE_MAX, b"data"),
            Err(Error::Io { .. })
        ));
        assert_eq!(leftover_temp_files(tmp.path()), 0);
    }

    #[test]
    fn unpublished_files_leave_nothing_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let out = OutputDir::prepare(tmp.path()).unwrap();

        let staged = out.stage_latest(&DEVICE_STANDARD, b"data").unwrap();
        assert_eq!(leftover_temp_files(tmp.path()), 1);
        drop(staged);
        assert_eq!(leftover_temp_files(tmp.path()), 0);
        assert!(!tmp.path().join("latest.png").exists());
    }

    #[test]
    fn missing_parent_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let out = OutputDir::prepare(tmp.path()).unwrap();
        std::fs::remove_dir(tmp.path()).unwrap();
        assert!(matches!(
            out.stage_latest(&DEVICE_STANDARD, b"data"),
            Err(Error::Io { .. })
        ));
    }
}
