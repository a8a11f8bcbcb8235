use crate::{
    chord_table::{ChordKey, ChordTable},
    darkness::Darkness,
    image::GrayImage,
};

/// Virtual canvas the sequencer draws on.
///
/// Pixels crossed by at least one chord start at their gray value; every other pixel is
/// never read and stays white.
pub struct DrawState {
    values: Vec<u8>,
}

impl DrawState {
    pub fn new(image: &GrayImage, chords: &ChordTable) -> Self {
        debug_assert_eq!(*image.grid(), chords.grid());
        let values = chords
            .touched_mask()
            .into_iter()
            .zip(image.pixels())
            .map(|(touched, &value)| if touched { value } else { u8::MAX })
            .collect();
        Self { values }
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn get(&self, idx: u32) -> u8 {
        self.values[idx as usize]
    }

    /// Mean darkness still owed along the chord, `-inf` for a chord without pixels.
    pub fn priority(&self, pixels: &[u32]) -> f64 {
        if pixels.is_empty() {
            return f64::NEG_INFINITY;
        }
        let owed: u64 = pixels
            .iter()
            .map(|&idx| (u8::MAX - self.values[idx as usize]) as u64)
            .sum();
        owed as f64 / pixels.len() as f64
    }

    pub fn chord_priority(&self, chords: &ChordTable, key: ChordKey) -> f64 {
        self.priority(chords.pixels(key))
    }

    pub fn apply(&mut self, pixels: &[u32], darkness: impl Darkness) {
        for &idx in pixels {
            let value = &mut self.values[idx as usize];
            *value = darkness.compute(*value);
        }
    }

    pub fn apply_chord(&mut self, chords: &ChordTable, key: ChordKey, darkness: impl Darkness) {
        self.apply(chords.pixels(key), darkness)
    }
}
