//! Half-block rendering of a page raster

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

use crate::backend::Surface;

/// Pixels per half cell along each axis
pub const CELL_PX: u32 = 8;

/// Draws a surface with `▀`: the foreground carries the upper 8×8 block of a
/// cell, the background the lower one. Centred horizontally, clipped to the
/// area.
pub struct PageCanvas<'a> {
    surface: &'a Surface,
}

impl<'a> PageCanvas<'a> {
    pub fn new(surface: &'a Surface) -> Self {
        Self { surface }
    }

    /// Cells needed to show the whole surface
    pub fn cell_size(&self) -> (u16, u16) {
        let cols = self.surface.width().div_ceil(CELL_PX);
        let rows = self.surface.height().div_ceil(CELL_PX * 2);
        (
            cols.min(u32::from(u16::MAX)) as u16,
            rows.min(u32::from(u16::MAX)) as u16,
        )
    }
}

impl Widget for PageCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.surface.is_empty() || area.is_empty() {
            return;
        }
        let (cols, rows) = self.cell_size();
        let width = cols.min(area.width);
        let height = rows.min(area.height);
        let x0 = area.x + (area.width - width) / 2;

        for row in 0..height {
            for col in 0..width {
                let px = u32::from(col) * CELL_PX;
                let py = u32::from(row) * CELL_PX * 2;
                let top = block_average(self.surface, px, py).map_or(Color::Reset, rgb);
                let bottom =
                    block_average(self.surface, px, py + CELL_PX).map_or(Color::Reset, rgb);
                buf[(x0 + col, area.y + row)]
                    .set_char('▀')
                    .set_fg(top)
                    .set_bg(bottom);
            }
        }
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}

/// Mean colour of the block at (x, y), `None` if it lies outside the surface
fn block_average(surface: &Surface, x: u32, y: u32) -> Option<[u8; 3]> {
    let mut sum = [0u32; 3];
    let mut count = 0u32;
    for dy in 0..CELL_PX {
        for dx in 0..CELL_PX {
            if let Some(pixel) = surface.pixel(x + dx, y + dy) {
                for (acc, channel) in sum.iter_mut().zip(pixel) {
                    *acc += u32::from(channel);
                }
                count += 1;
            }
        }
    }
    (count > 0).then(|| sum.map(|channel| (channel / count) as u8))
}
