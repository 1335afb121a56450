//! Target screens and the parts of them the lock screen keeps for itself

use clap::ValueEnum;

/// `(left, top, right, bottom)` in pixels
pub type Bounds = (i32, i32, i32, i32);

/// Margins to keep free of content, in pixels from each edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SafeZone {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    pub name: &'static str,
    /// Suffix appended to output file names, empty for the default device
    pub slug: &'static str,
    pub width: u32,
    pub height: u32,
    pub safe_zone: SafeZone,
}

impl DeviceProfile {
    /// Usable area once the safe zone is taken out
    pub const fn content_bounds(&self) -> Bounds {
        (
            self.safe_zone.left as i32,
            self.safe_zone.top as i32,
            (self.width - self.safe_zone.right) as i32,
            (self.height - self.safe_zone.bottom) as i32,
        )
    }

    /// `latest.png`, `latest_max.png`, ...
    pub fn latest_file_name(&self) -> String {
        format!("latest{}.png", self.slug)
    }

    /// `2024-05-17.png`, `2024-05-17_max.png`, ...
    pub fn archive_file_name(&self, date: chrono::NaiveDate) -> String {
        format!("{}{}.png", date.format("%Y-%m-%d"), self.slug)
    }
}

// Top keeps the grid below the lock screen clock and date, bottom keeps it above
// the flashlight/camera buttons and the home indicator.
pub const DEVICE_STANDARD: DeviceProfile = DeviceProfile {
    name: "iPhone 13 Pro",
    slug: "",
    width: 1170,
    height: 2532,
    safe_zone: SafeZone {
        top: 720,
        bottom: 290,
        left: 58,
        right: 58,
    },
};

pub const DEVICE_MAX: DeviceProfile = DeviceProfile {
    name: "iPhone 16 Pro Max",
    slug: "_max",
    width: 1320,
    height: 2868,
    safe_zone: SafeZone {
        top: 840,
        bottom: 340,
        left: 68,
        right: 68,
    },
};

/// Which devices a run renders for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DeviceSelection {
    Standard,
    Max,
    #[default]
    All,
}

impl DeviceSelection {
    pub fn profiles(self) -> &'static [DeviceProfile] {
        static ALL: [DeviceProfile; 2] = [DEVICE_STANDARD, DEVICE_MAX];
        match self {
            Self::Standard => &ALL[..1],
            Self::Max => &ALL[1..],
            Self::All => &ALL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn content_bounds_subtract_safe_zone() {
        assert_eq!(DEVICE_STANDARD.content_bounds(), (58, 720, 1112, 2242));
        assert_eq!(DEVICE_MAX.content_bounds(), (68, 840, 1252, 2528));
    }

    #[test]
    fn file_names() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 7).unwrap();
        assert_eq!(DEVICE_STANDARD.latest_file_name(), "latest.png");
        assert_eq!(DEVICE_MAX.latest_file_name(), "latest_max.png");
        assert_eq!(DEVICE_STANDARD.archive_file_name(date), "2024-05-07.png");
        assert_eq!(DEVICE_MAX.archive_file_name(date), "2024-05-07_max.png");
    }

    #[test]
    fn selection_profiles() {
        assert_eq!(DeviceSelection::Standard.profiles(), &[DEVICE_STANDARD]);
        assert_eq!(DeviceSelection::Max.profiles(), &[DEVICE_MAX]);
        assert_eq!(DeviceSelection::All.profiles().len(), 2);
    }
}
