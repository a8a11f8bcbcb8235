use std::ops::Add;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T> Add for Point<T>
where
    T: Add<Output = T>,
{
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Point {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl<S: num_traits::NumCast> Point<S> {
    pub fn cast<I: num_traits::NumCast>(self) -> Option<Point<I>> {
        num_traits::cast(self.x).and_then(|x| num_traits::cast(self.y).map(|y| Point { x, y }))
    }
}

impl<T: Ord> Point<T> {
    /// Row-major ordering: `y` first, then `x`.
    pub fn row_major_lt(&self, other: &Self) -> bool {
        (&self.y, &self.x) < (&other.y, &other.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_add_per_axis() {
        let a = Point::new(3_i64, 4);
        let b = Point::new(1_i64, -2);
        assert_eq!(a + b, Point::new(4, 2));
    }

    #[test]
    fn cast_rejects_negative_into_unsigned() {
        assert_eq!(Point::new(-1_isize, 0).cast::<usize>(), None);
        assert_eq!(Point::new(7_isize, 9).cast::<u32>(), Some(Point::new(7, 9)));
    }

    #[test]
    fn row_major_order() {
        assert!(Point::new(9, 0).row_major_lt(&Point::new(0, 1)));
        assert!(Point::new(0, 1).row_major_lt(&Point::new(1, 1)));
        assert!(!Point::new(1, 1).row_major_lt(&Point::new(1, 1)));
    }
}
