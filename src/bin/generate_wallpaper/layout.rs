//! Dot grid geometry.
//!
//! Circle size and spacing are derived from the content area of the device
//! instead of fixed per-device pixel values, so every profile gets a grid
//! that fills its width without crossing into the safe zone.

use embedded_graphics::prelude::Point;

use crate::calendar_utils::{DayCell, MONTHS_IN_YEAR};
use crate::device::{Bounds, DeviceProfile};

const MAX_RADIUS: i32 = 22;
const MIN_RADIUS: i32 = 10;
/// Gap between columns, in radii
const COL_GAP_RATIO: f32 = 1.8;
/// Gap between rows, in radii
const ROW_GAP_RATIO: f32 = 0.6;
const ISLAND_PADDING: i32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Centre of the first circle
    pub origin_x: i32,
    pub origin_y: i32,
    /// Distance between neighbouring circle centres
    pub step_x: i32,
    pub step_y: i32,
    pub radius: i32,
    /// Glass island behind the grid
    pub island: Bounds,
}

impl GridLayout {
    pub fn compute(device: &DeviceProfile, max_rows: u8) -> Self {
        let cols = MONTHS_IN_YEAR as i32;
        let (left, top, right, bottom) = device.content_bounds();
        let content_width = right - left;
        let content_height = bottom - top;

        // width = cols * 2r + (cols - 1) * r * COL_GAP_RATIO
        let divisor = 2.0 * cols as f32 + (cols - 1) as f32 * COL_GAP_RATIO;
        let radius_from_width = (content_width as f32 / divisor) as i32;

        // height = max_rows * r * (2 + ROW_GAP_RATIO)
        let row_divisor = f32::from(max_rows) * (2.0 + ROW_GAP_RATIO);
        let radius_from_height = (content_height as f32 / row_divisor) as i32;

        let radius = radius_from_width
            .min(radius_from_height)
            .min(MAX_RADIUS)
            .max(MIN_RADIUS);

        let col_gap = (radius as f32 * COL_GAP_RATIO) as i32;
        let row_gap = (radius as f32 * ROW_GAP_RATIO) as i32;
        let diameter = 2 * radius;
        let step_x = diameter + col_gap;
        let step_y = diameter + row_gap;

        let grid_width = cols * diameter + (cols - 1) * col_gap;
        let origin_x = left + (content_width - grid_width) / 2 + radius;
        let origin_y = top + radius;

        let island = (
            origin_x - radius - ISLAND_PADDING,
            origin_y - radius - ISLAND_PADDING,
            origin_x + (cols - 1) * step_x + radius + ISLAND_PADDING,
            origin_y + (i32::from(max_rows) - 1) * step_y + radius + ISLAND_PADDING,
        );

        Self {
            origin_x,
            origin_y,
            step_x,
            step_y,
            radius,
            island,
        }
    }

    pub fn cell_center(&self, cell: &DayCell) -> Point {
        Point::new(
            self.origin_x + i32::from(cell.column()) * self.step_x,
            self.origin_y + i32::from(cell.row()) * self.step_y,
        )
    }
}
