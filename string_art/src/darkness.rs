/// How a pixel value changes when a chord is drawn over it.
pub trait Darkness: Copy + Send + Sync {
    fn compute(self, value: u8) -> u8;
}

/// Pays back a fixed amount of darkness per chord, saturating at white.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Opacity(pub u8);

impl Darkness for Opacity {
    fn compute(self, value: u8) -> u8 {
        value.saturating_add(self.0)
    }
}
