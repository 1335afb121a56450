use core::convert::Infallible;

use embedded_graphics::{
    pixelcolor::{Rgb888, RgbColor},
    prelude::*,
};
use image::{Rgb, RgbImage};

/// In-memory RGB raster the wallpaper is drawn onto before encoding
pub struct ImageCanvas {
    image: RgbImage,
}

impl ImageCanvas {
    pub fn new(width: u32, height: u32, background: Rgb888) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, to_rgb(background)),
        }
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }
}

fn to_rgb(color: Rgb888) -> Rgb<u8> {
    Rgb([color.r(), color.g(), color.b()])
}

impl OriginDimensions for ImageCanvas {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

impl DrawTarget for ImageCanvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = self.image.dimensions();
        for Pixel(point, color) in pixels {
            let Ok(x) = u32::try_from(point.x) else {
                continue;
            };
            let Ok(y) = u32::try_from(point.y) else {
                continue;
            };
            if x < width && y < height {
                self.image.put_pixel(x, y, to_rgb(color));
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = to_rgb(color);
        self.image.pixels_mut().for_each(|pixel| *pixel = fill);
        Ok(())
    }
}
