//! Error types for the wallpaper generator

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The year/month/day triple does not name a day of the calendar
    #[error("Invalid calendar date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDateFormat(String),

    #[error("Unknown time zone: {0:?}")]
    UnknownTimezone(String),

    /// PNG encoding failed
    #[error("Failed to encode image: {0}")]
    Encoding(#[from] image::ImageError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize palette metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
