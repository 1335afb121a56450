use embedded_graphics::{
    pixelcolor::{Rgb888, RgbColor},
    prelude::*,
    primitives::{PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle, StrokeAlignment},
};

use crate::device::Bounds;

/// Translucent rounded rectangle drawn behind the dots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlassStyle {
    pub corner_radius: u32,
    /// Opacity out of 255
    pub fill_opacity: u8,
    pub border_opacity: u8,
    /// Added to every background channel before blending
    pub lighten_fill: u8,
    pub lighten_border: u8,
    pub border_width: u32,
}

impl Default for GlassStyle {
    fn default() -> Self {
        Self {
            corner_radius: 50,
            fill_opacity: 25,
            border_opacity: 50,
            lighten_fill: 30,
            lighten_border: 60,
            border_width: 2,
        }
    }
}

impl GlassStyle {
    pub fn fill_color(&self, bg: Rgb888) -> Rgb888 {
        blend(lighten(bg, self.lighten_fill), bg, self.fill_opacity)
    }

    pub fn border_color(&self, bg: Rgb888) -> Rgb888 {
        blend(lighten(bg, self.lighten_border), bg, self.border_opacity)
    }

    pub fn primitive_style(&self, bg: Rgb888) -> PrimitiveStyle<Rgb888> {
        PrimitiveStyleBuilder::new()
            .fill_color(self.fill_color(bg))
            .stroke_color(self.border_color(bg))
            .stroke_width(self.border_width)
            .stroke_alignment(StrokeAlignment::Inside)
            .build()
    }

    pub fn shape(&self, bounds: Bounds) -> RoundedRectangle {
        let (left, top, right, bottom) = bounds;
        RoundedRectangle::with_equal_corners(
            Rectangle::with_corners(Point::new(left, top), Point::new(right, bottom)),
            Size::new_equal(self.corner_radius),
        )
    }
}

fn lighten(color: Rgb888, amount: u8) -> Rgb888 {
    Rgb888::new(
        color.r().saturating_add(amount),
        color.g().saturating_add(amount),
        color.b().saturating_add(amount),
    )
}

/// Source-over compositing of `src` at `alpha` onto an opaque `dst`
fn blend(src: Rgb888, dst: Rgb888, alpha: u8) -> Rgb888 {
    let mix = |s: u8, d: u8| {
        let a = u32::from(alpha);
        ((u32::from(s) * a + u32::from(d) * (255 - a) + 127) / 255) as u8
    };
    Rgb888::new(
        mix(src.r(), dst.r()),
        mix(src.g(), dst.g()),
        mix(src.b(), dst.b()),
    )
}
