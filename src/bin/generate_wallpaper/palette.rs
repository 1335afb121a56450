//! Four colour schemes generated from colour theory in HSL space.
//!
//! Every role is bounded in saturation and lightness so that the background
//! always stays very dark, future days stay dim but visible, past days read
//! as clearly filled and today is the most vivid dot. Hue relationships
//! between roles come from one of a handful of classic harmonies.

use chrono::{Datelike, NaiveDate};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::Serialize;

type Range = (f32, f32);

const BG_SATURATION: Range = (0.20, 0.50);
const BG_LIGHTNESS: Range = (0.04, 0.10);
const PAST_SATURATION: Range = (0.35, 0.65);
const PAST_LIGHTNESS: Range = (0.70, 0.85);
const TODAY_SATURATION: Range = (0.70, 0.95);
const TODAY_LIGHTNESS: Range = (0.50, 0.65);
const FUTURE_SATURATION: Range = (0.08, 0.20);
const FUTURE_LIGHTNESS: Range = (0.20, 0.28);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarmonyType {
    /// Hues within ~30 degrees of each other
    Analogous,
    /// Base hue against its opposite
    Complementary,
    /// Base hue plus the two hues flanking its complement
    SplitComplementary,
    /// Three hues 120 degrees apart
    Triadic,
    /// One hue, variation only from saturation and lightness
    Monochromatic,
}

impl HarmonyType {
    const WEIGHTED: [(HarmonyType, u32); 5] = [
        (HarmonyType::Analogous, 3),
        (HarmonyType::Complementary, 2),
        (HarmonyType::SplitComplementary, 2),
        (HarmonyType::Triadic, 1),
        (HarmonyType::Monochromatic, 2),
    ];

    pub const fn name_prefix(self) -> &'static str {
        match self {
            Self::Analogous => "analogous",
            Self::Complementary => "complementary",
            Self::SplitComplementary => "split_comp",
            Self::Triadic => "triadic",
            Self::Monochromatic => "monochromatic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub name: String,
    pub bg: Rgb888,
    pub past: Rgb888,
    pub today: Rgb888,
    pub future: Rgb888,
}

#[derive(Debug, Serialize)]
pub struct ColorEntry {
    pub rgb: [u8; 3],
    pub hex: String,
}

impl From<Rgb888> for ColorEntry {
    fn from(color: Rgb888) -> Self {
        Self {
            rgb: [color.r(), color.g(), color.b()],
            hex: format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaletteColors {
    pub background: ColorEntry,
    pub past: ColorEntry,
    pub today: ColorEntry,
    pub future: ColorEntry,
}

impl Palette {
    pub fn colors(&self) -> PaletteColors {
        PaletteColors {
            background: self.bg.into(),
            past: self.past.into(),
            today: self.today.into(),
            future: self.future.into(),
        }
    }
}

/// HSL to RGB with hue in degrees, saturation and lightness in `0.0..=1.0`.
/// Channels are truncated, not rounded.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb888 {
    let h = wrap_hue(h) / 360.0;
    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let m1 = 2.0 * l - m2;
        (
            hue_channel(m1, m2, h + 1.0 / 3.0),
            hue_channel(m1, m2, h),
            hue_channel(m1, m2, h - 1.0 / 3.0),
        )
    };
    Rgb888::new((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

fn hue_channel(m1: f32, m2: f32, hue: f32) -> f32 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

/// Wrap to `[0, 360)`
pub fn wrap_hue(h: f32) -> f32 {
    h.rem_euclid(360.0)
}

/// Generates palettes from a seeded PCG stream, so one seed always gives the same palette
pub struct PaletteFactory {
    rng: Pcg64,
}

impl PaletteFactory {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    /// Seed used for `date` when none is given explicitly: `YYYYMMDD`
    pub fn seed_for(date: NaiveDate) -> u64 {
        let packed = i64::from(date.year()) * 10_000 + i64::from(date.month() * 100 + date.day());
        packed as u64
    }

    pub fn generate(&mut self) -> Palette {
        let harmony = self.pick_harmony();
        let base_hue: f32 = self.rng.gen_range(0.0..360.0);
        let (past_hue, today_hue) = match harmony {
            HarmonyType::Analogous => {
                let offset: f32 = self.rng.gen_range(15.0..35.0);
                (base_hue + offset, base_hue - offset)
            }
            HarmonyType::Complementary => {
                let comp_hue = base_hue + 180.0;
                let jitter: f32 = self.rng.gen_range(-15.0..15.0);
                (comp_hue + jitter, comp_hue)
            }
            HarmonyType::SplitComplementary => (base_hue + 150.0, base_hue + 210.0),
            HarmonyType::Triadic => (base_hue + 120.0, base_hue + 240.0),
            HarmonyType::Monochromatic => (base_hue, base_hue),
        };

        let bg = self.make_color(base_hue, BG_SATURATION, BG_LIGHTNESS);
        let past = self.make_color(past_hue, PAST_SATURATION, PAST_LIGHTNESS);
        let today = self.make_color(today_hue, TODAY_SATURATION, TODAY_LIGHTNESS);
        let future = self.make_color(base_hue, FUTURE_SATURATION, FUTURE_LIGHTNESS);

        Palette {
            name: format!("{}_{}", harmony.name_prefix(), base_hue as u32),
            bg,
            past,
            today,
            future,
        }
    }

    fn pick_harmony(&mut self) -> HarmonyType {
        let total: u32 = HarmonyType::WEIGHTED.iter().map(|(_, w)| w).sum();
        let mut roll = self.rng.gen_range(0..total);
        for (harmony, weight) in HarmonyType::WEIGHTED {
            if roll < weight {
                return harmony;
            }
            roll -= weight;
        }
        HarmonyType::Analogous
    }

    fn make_color(&mut self, hue: f32, saturation: Range, lightness: Range) -> Rgb888 {
        let s = self.rng.gen_range(saturation.0..saturation.1);
        let l = self.rng.gen_range(lightness.0..lightness.1);
        hsl_to_rgb(hue, s, l)
    }
}
