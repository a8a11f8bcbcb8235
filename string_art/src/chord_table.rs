use std::fmt;

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    grid::Grid,
    nail_table::NailTable,
    verboser::{Message, Verboser},
};

/// Unordered pair of distinct nails, stored as `(small, big)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChordKey {
    small: usize,
    big: usize,
}

impl ChordKey {
    pub fn new(a: usize, b: usize) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { small: a, big: b }),
            std::cmp::Ordering::Greater => Some(Self { small: b, big: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn small(&self) -> usize {
        self.small
    }

    pub fn big(&self) -> usize {
        self.big
    }

    /// Position of the chord in the baked table: chords are grouped by their big nail, so
    /// every chord of nails `0..n` lives in `0..n * (n - 1) / 2`.
    pub fn index(&self) -> usize {
        self.big * (self.big - 1) / 2 + self.small
    }

    pub fn count(nail_count: usize) -> usize {
        nail_count * nail_count.saturating_sub(1) / 2
    }
}

impl fmt::Display for ChordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.small, self.big)
    }
}

/// Pixels covered by every chord between the nails of a [`NailTable`].
///
/// Pixel lists are stored back to back in one buffer; `offsets[k]..offsets[k + 1]` is the
/// range of the chord with [`ChordKey::index`] `k`.
pub struct ChordTable {
    nail_count: usize,
    grid: Grid,
    pixels: Vec<u32>,
    offsets: Vec<usize>,
}

impl ChordTable {
    pub fn bake(table: &NailTable, verboser: &mut impl Verboser) -> Self {
        let nail_count = table.len();
        let total = ChordKey::count(nail_count);
        let grid = table.grid();
        verboser.verbose(Message::Baking(0, total));

        let rows: Vec<(Vec<u32>, Vec<usize>)> = (1..nail_count)
            .into_par_iter()
            .map(|big| {
                let mut pixels = Vec::new();
                let mut lengths = Vec::with_capacity(big);
                for small in 0..big {
                    let start = pixels.len();
                    // Nails sharing a pixel make a degenerate chord with no pixels.
                    if let Some(segment) = table
                        .segment(small, big)
                        .filter(|segment| segment.start != segment.end)
                    {
                        pixels.extend(
                            grid.get_pixel_indexes_in_segment(segment)
                                .map(|idx| idx as u32),
                        );
                    }
                    lengths.push(pixels.len() - start);
                }
                (pixels, lengths)
            })
            .collect();

        let mut offsets = Vec::with_capacity(total + 1);
        offsets.push(0);
        let mut pixels = Vec::with_capacity(rows.iter().map(|(row, _)| row.len()).sum());
        for (row, lengths) in rows {
            pixels.extend_from_slice(&row);
            for len in lengths {
                offsets.push(offsets[offsets.len() - 1] + len);
            }
        }
        log::debug!(
            "baked {} chords covering {} pixel entries",
            total,
            pixels.len()
        );
        verboser.verbose(Message::Baking(total, total));
        Self {
            nail_count,
            grid,
            pixels,
            offsets,
        }
    }

    pub fn nail_count(&self) -> usize {
        self.nail_count
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Number of baked chords, always `n * (n - 1) / 2`.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pixels(&self, key: ChordKey) -> &[u32] {
        let idx = key.index();
        &self.pixels[self.offsets[idx]..self.offsets[idx + 1]]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChordKey, &[u32])> + '_ {
        (1..self.nail_count)
            .flat_map(|big| (0..big).map(move |small| ChordKey { small, big }))
            .map(|key| (key, self.pixels(key)))
    }

    /// Chords between nails sharing a pixel. They are never selected.
    pub fn degenerate_count(&self) -> usize {
        self.offsets.windows(2).filter(|w| w[0] == w[1]).count()
    }

    /// Per pixel of the grid, whether at least one chord passes through it.
    pub fn touched_mask(&self) -> Vec<bool> {
        let mut touched = vec![false; self.grid.len()];
        for &idx in self.pixels.iter() {
            touched[idx as usize] = true;
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verboser::Silent;
    use std::collections::HashSet;

    fn bake(side: usize, nails: usize) -> (NailTable, ChordTable) {
        let table = NailTable::circle(Grid::square(side), nails, &mut Silent).unwrap();
        let chords = ChordTable::bake(&table, &mut Silent);
        (table, chords)
    }

    #[test]
    fn keys_are_canonical() {
        assert_eq!(ChordKey::new(3, 1), ChordKey::new(1, 3));
        assert_eq!(ChordKey::new(2, 2), None);
        let key = ChordKey::new(7, 2).unwrap();
        assert_eq!((key.small(), key.big()), (2, 7));
        assert_eq!(key.to_string(), "2-7");
    }

    #[test]
    fn key_indexes_are_dense() {
        let n = 25;
        let indexes: Vec<_> = (1..n)
            .flat_map(|big| (0..big).map(move |small| ChordKey::new(small, big).unwrap().index()))
            .collect();
        assert_eq!(indexes, (0..ChordKey::count(n)).collect::<Vec<_>>());
    }

    #[test]
    fn holds_every_pair() {
        for nails in [2, 3, 4, 17, 60] {
            let (_, chords) = bake(64, nails);
            assert_eq!(chords.len(), nails * (nails - 1) / 2);
            assert_eq!(chords.iter().count(), chords.len());
        }
    }

    #[test]
    fn pixel_lists_start_and_end_on_nails() {
        let (table, chords) = bake(80, 12);
        for (key, pixels) in chords.iter() {
            let a = table.get(key.small()).unwrap();
            let b = table.get(key.big()).unwrap();
            let a = (a.y * 80 + a.x) as u32;
            let b = (b.y * 80 + b.x) as u32;
            let ends = [pixels[0], pixels[pixels.len() - 1]];
            assert!(ends.contains(&a) && ends.contains(&b), "chord {key}");
        }
    }

    #[test]
    fn both_directions_cover_the_same_pixels() {
        let (table, chords) = bake(90, 9);
        let grid = table.grid();
        for (key, pixels) in chords.iter() {
            let reversed: HashSet<u32> = grid
                .get_pixel_indexes_in_segment(table.segment(key.big(), key.small()).unwrap())
                .map(|idx| idx as u32)
                .collect();
            assert_eq!(pixels.iter().copied().collect::<HashSet<_>>(), reversed);
        }
    }

    #[test]
    fn baking_is_deterministic() {
        let (_, a) = bake(120, 40);
        let (_, b) = bake(120, 40);
        assert_eq!(a.pixels, b.pixels);
        assert_eq!(a.offsets, b.offsets);
    }

    #[test]
    fn coincident_nails_give_empty_chords() {
        // 2 pixels wide: every nail truncates onto (1, 1).
        let (_, chords) = bake(2, 5);
        assert_eq!(chords.len(), 10);
        assert!(chords.iter().all(|(_, pixels)| pixels.is_empty()));
        assert_eq!(chords.degenerate_count(), 10);
        assert!(chords.touched_mask().iter().all(|&touched| !touched));
        let (_, chords) = bake(100, 4);
        assert_eq!(chords.degenerate_count(), 0);
    }

    #[test]
    fn touched_mask_matches_chord_pixels() {
        let (_, chords) = bake(40, 6);
        let touched = chords.touched_mask();
        let all: HashSet<u32> = chords.iter().flat_map(|(_, p)| p.iter().copied()).collect();
        assert_eq!(touched.len(), 40 * 40);
        for (idx, &hit) in touched.iter().enumerate() {
            assert_eq!(hit, all.contains(&(idx as u32)));
        }
    }
}
