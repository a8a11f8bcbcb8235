use crate::{
    config::ConfigError,
    geometry::{Point, Segment},
    grid::Grid,
    verboser::{Message, Verboser},
};

/// Nails evenly spread on the circle inscribed in the working image.
#[derive(Clone, Debug)]
pub struct NailTable {
    nails: Vec<Point<usize>>,
    grid: Grid,
}

impl NailTable {
    pub const RADIUS_FACTOR: f64 = 0.49;

    /// Places `nail_count` nails counter clockwise in image space starting at angle 0, on a circle
    /// of radius `0.49 * width` centered on the image. Coordinates are truncated towards zero, so
    /// neighbouring nails may share a pixel on small images.
    pub fn circle(
        grid: Grid,
        nail_count: usize,
        verboser: &mut impl Verboser,
    ) -> Result<Self, ConfigError> {
        if nail_count < 2 {
            return Err(ConfigError::DotsCount(nail_count));
        }
        verboser.verbose(Message::PlacingNails(nail_count));
        let width = grid.width as f64;
        let center = (width * 0.5) as isize;
        let radius = width * Self::RADIUS_FACTOR;
        let nails = (0..nail_count)
            .map(|i| {
                let theta = (360.0 * i as f64 / nail_count as f64).to_radians();
                let x = center + (radius * theta.cos()) as isize;
                let y = center + (radius * theta.sin()) as isize;
                // The radius is below half the side, so neither coordinate goes negative.
                Point {
                    x: x.max(0) as usize,
                    y: y.max(0) as usize,
                }
            })
            .collect();
        Ok(Self { nails, grid })
    }

    pub fn nails(&self) -> &[Point<usize>] {
        &self.nails
    }

    pub fn len(&self) -> usize {
        self.nails.len()
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn get(&self, idx: usize) -> Option<Point<usize>> {
        self.nails.get(idx).copied()
    }

    pub fn segment(&self, from: usize, to: usize) -> Option<Segment<usize>> {
        Some(Segment::new(self.get(from)?, self.get(to)?))
    }
}
