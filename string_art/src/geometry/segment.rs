use std::iter::FusedIterator;

use super::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment<T> {
    pub start: Point<T>,
    pub end: Point<T>,
}

impl<T> Segment<T> {
    pub fn new(start: Point<T>, end: Point<T>) -> Self {
        Self { start, end }
    }
}

impl<T: num_traits::NumCast> Segment<T> {
    pub fn cast<I: num_traits::NumCast>(self) -> Option<Segment<I>> {
        self.start
            .cast()
            .and_then(|start| self.end.cast().map(|end| Segment { start, end }))
    }
}

impl Segment<isize> {
    /// Integer Bresenham walk over every pixel of the segment, both endpoints included.
    ///
    /// The walk always starts at the row-major smaller endpoint, so a segment and its
    /// reversal cover exactly the same pixels in the same order.
    pub fn points_between(&self) -> LinePoints {
        let (from, to) = if self.end.row_major_lt(&self.start) {
            (self.end, self.start)
        } else {
            (self.start, self.end)
        };
        LinePoints::new(from, to)
    }
}

pub struct LinePoints {
    curr: Point<isize>,
    end: Point<isize>,
    delta: Point<isize>,
    step: Point<isize>,
    err: isize,
    done: bool,
}

impl LinePoints {
    fn new(start: Point<isize>, end: Point<isize>) -> Self {
        let delta = Point {
            x: (end.x - start.x).abs(),
            y: (end.y - start.y).abs(),
        };
        Self {
            curr: start,
            end,
            step: Point {
                x: if start.x < end.x { 1 } else { -1 },
                y: if start.y < end.y { 1 } else { -1 },
            },
            err: delta.x - delta.y,
            delta,
            done: false,
        }
    }
}

impl Iterator for LinePoints {
    type Item = Point<isize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let point = self.curr;
        if point == self.end {
            self.done = true;
            return Some(point);
        }
        let e2 = 2 * self.err;
        if e2 > -self.delta.y {
            self.err -= self.delta.y;
            self.curr.x += self.step.x;
        }
        if e2 < self.delta.x {
            self.err += self.delta.x;
            self.curr.y += self.step.y;
        }
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let remaining = (self.end.x - self.curr.x)
            .unsigned_abs()
            .max((self.end.y - self.curr.y).unsigned_abs());
        (remaining + 1, Some(remaining * 2 + 1))
    }
}

impl FusedIterator for LinePoints {}
