use num_traits::{NumCast, Unsigned};

use crate::geometry::{Point, Segment};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid<T = usize> {
    pub height: T,
    pub width: T,
}

impl<T> Grid<T> {
    pub fn new(height: T, width: T) -> Self {
        Self { height, width }
    }
}

impl<T: Copy> Grid<T> {
    pub fn square(side: T) -> Self {
        Self {
            height: side,
            width: side,
        }
    }
}

impl<T: Copy + std::ops::Mul<Output = T>> Grid<T> {
    pub fn len(&self) -> T {
        self.height * self.width
    }
}

impl<T: NumCast + Unsigned + PartialOrd + Copy> Grid<T> {
    /// Row-major indexes of the pixels a segment passes through; pixels outside the grid are
    /// skipped.
    pub fn get_pixel_indexes_in_segment(
        &self,
        seg: Segment<T>,
    ) -> impl Iterator<Item = T> + '_ {
        self.get_pixel_coords_in_segment(seg)
            .filter_map(|point| self.index_of(point))
    }

    pub fn get_pixel_coords_in_segment(
        &self,
        seg: Segment<T>,
    ) -> impl Iterator<Item = Point<T>> + '_ {
        seg.cast::<isize>()
            .into_iter()
            .flat_map(|seg| seg.points_between())
            .filter_map(|point| point.cast::<T>())
    }

    pub fn index_of(&self, point: Point<T>) -> Option<T> {
        if point.x < self.width && point.y < self.height {
            Some(point.y * self.width + point.x)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_row_major() {
        let grid = Grid::<usize>::square(10);
        assert_eq!(grid.index_of(Point::new(3, 2)), Some(23));
        assert_eq!(grid.index_of(Point::new(10, 0)), None);
        assert_eq!(grid.index_of(Point::new(0, 10)), None);
        assert_eq!(grid.len(), 100);
    }

    #[test]
    fn out_of_bounds_pixels_are_dropped() {
        let grid = Grid::<usize>::square(4);
        let indexes: Vec<_> = grid
            .get_pixel_indexes_in_segment(Segment::new(Point::new(0, 2), Point::new(6, 2)))
            .collect();
        assert_eq!(indexes, vec![8, 9, 10, 11]);
    }
}
