pub mod canvas;
pub mod glass;

use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, PrimitiveStyle},
};
use log::debug;

pub use canvas::ImageCanvas;
pub use glass::GlassStyle;

use crate::calendar_utils::{CellState, YearGrid};
use crate::device::DeviceProfile;
use crate::layout::GridLayout;
use crate::palette::Palette;

pub fn cell_color(state: CellState, palette: &Palette) -> Rgb888 {
    match state {
        CellState::Past => palette.past,
        CellState::Today => palette.today,
        CellState::Future => palette.future,
    }
}

/// Draw the background, the glass island and a dot for every day of the year
pub fn draw_calendar<D>(
    grid: &YearGrid,
    layout: &GridLayout,
    palette: &Palette,
    glass: &GlassStyle,
    display: &mut D,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    display.clear(palette.bg)?;

    glass
        .shape(layout.island)
        .into_styled(glass.primitive_style(palette.bg))
        .draw(display)?;

    // Matches an ellipse spanning `center ± radius` inclusively
    let diameter = (2 * layout.radius + 1) as u32;
    for cell in grid.cells() {
        let style = PrimitiveStyle::with_fill(cell_color(cell.state(), palette));
        Circle::with_center(layout.cell_center(&cell), diameter)
            .into_styled(style)
            .draw(display)?;
    }

    Ok(())
}

/// Render one device's wallpaper into a fresh canvas
pub fn render_wallpaper(
    grid: &YearGrid,
    device: &DeviceProfile,
    palette: &Palette,
) -> ImageCanvas {
    let layout = GridLayout::compute(device, grid.max_rows());
    debug!("Layout for {}: {layout:?}", device.name);

    let mut canvas = ImageCanvas::new(device.width, device.height, palette.bg);
    match draw_calendar(grid, &layout, palette, &GlassStyle::default(), &mut canvas) {
        Ok(()) => canvas,
        Err(never) => match never {},
    }
}
