use image::{Pixel, Rgba, RgbaImage};

use crate::{
    cancel::CancelToken,
    error::{Error, Result},
    geometry::{Point, Segment},
    grid::Grid,
    queue::{Chord, ChordReceiver},
    verboser::{Message, Verboser},
};

pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const NAIL_COLOR: Rgba<u8> = Rgba([128, 128, 128, 255]);
pub const NAIL_RADIUS: isize = 1;

/// Draws chords, in the order they are received, as translucent black lines on a white
/// canvas.
pub struct Renderer {
    canvas: RgbaImage,
    grid: Grid,
    stroke: Rgba<u8>,
    lines_drawn: usize,
    nails_drawn: usize,
}

impl Renderer {
    pub fn new(grid: Grid, opacity: u8) -> Self {
        Self {
            canvas: RgbaImage::from_pixel(grid.width as u32, grid.height as u32, BACKGROUND),
            grid,
            stroke: Rgba([0, 0, 0, opacity]),
            lines_drawn: 0,
            nails_drawn: 0,
        }
    }

    pub fn lines_drawn(&self) -> usize {
        self.lines_drawn
    }

    pub fn nails_drawn(&self) -> usize {
        self.nails_drawn
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_canvas(self) -> RgbaImage {
        self.canvas
    }

    /// Fills a disc of [`NAIL_RADIUS`] around `nail`.
    pub fn draw_nail(&mut self, nail: Point<usize>) {
        let center = Point {
            x: nail.x as isize,
            y: nail.y as isize,
        };
        for dy in -NAIL_RADIUS..=NAIL_RADIUS {
            for dx in -NAIL_RADIUS..=NAIL_RADIUS {
                if dx * dx + dy * dy > NAIL_RADIUS * NAIL_RADIUS {
                    continue;
                }
                if let Some(p) = (center + Point::new(dx, dy)).cast::<u32>() {
                    if p.x < self.canvas.width() && p.y < self.canvas.height() {
                        self.canvas.put_pixel(p.x, p.y, NAIL_COLOR);
                    }
                }
            }
        }
        self.nails_drawn += 1;
    }

    /// Blends the stroke over every pixel of the segment, using the same rasterization the
    /// chord table was baked with. Only the color darkens, the canvas stays opaque.
    pub fn draw_line(&mut self, segment: Segment<usize>) {
        for point in self
            .grid
            .get_pixel_coords_in_segment(segment)
            .filter(|&point| self.grid.index_of(point).is_some())
        {
            let pixel = self.canvas.get_pixel_mut(point.x as u32, point.y as u32);
            pixel.blend(&self.stroke);
            pixel[3] = u8::MAX;
        }
        self.lines_drawn += 1;
    }

    /// Draws every nail, then consumes exactly `line_count` chords from `receiver`.
    ///
    /// Fails with [`Error::Cancelled`] when `cancel` is raised or the producer hangs up
    /// before `line_count` chords arrived.
    pub fn run(
        &mut self,
        nails: &[Point<usize>],
        receiver: ChordReceiver,
        line_count: usize,
        cancel: &CancelToken,
        verboser: &mut impl Verboser,
    ) -> Result<()> {
        for &nail in nails {
            self.draw_nail(nail);
        }
        while self.lines_drawn < line_count {
            if cancel.is_cancelled() {
                log::info!("renderer cancelled after {} lines", self.lines_drawn);
                return Err(Error::Cancelled);
            }
            let Some(Chord { segment, .. }) = receiver.recv() else {
                log::warn!(
                    "chord producer stopped after {} of {} lines",
                    self.lines_drawn,
                    line_count
                );
                return Err(Error::Cancelled);
            };
            self.draw_line(segment);
            verboser.verbose(Message::Rendering(self.lines_drawn, line_count));
        }
        Ok(())
    }
}
