use rand::{rngs::SmallRng, Rng, SeedableRng};
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

use crate::{
    cancel::CancelToken,
    chord_table::{ChordKey, ChordTable},
    darkness::Darkness,
    draw_state::DrawState,
    error::{Error, Result},
    image::GrayImage,
    nail_table::NailTable,
    queue::{Chord, ChordSender},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    Running,
    Done,
}

/// Picks a random starting nail, from entropy when no seed is given.
pub fn start_nail(nail_count: usize, seed: Option<u64>) -> usize {
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    rng.gen_range(0..nail_count)
}

/// Greedy walk around the nails: from the current nail, always take the chord with the
/// highest mean darkness still owed.
///
/// Candidates are scanned by ascending nail index and only a strictly greater priority
/// replaces the best one, so ties go to the lowest nail index.
pub struct Sequencer<D> {
    nails: NailTable,
    chords: ChordTable,
    state: DrawState,
    darkness: D,
    current: usize,
    line_count: usize,
    emitted: usize,
    status: SequencerState,
    priorities: Vec<f64>,
}

impl<D: Darkness> Sequencer<D> {
    pub fn new(
        nails: NailTable,
        chords: ChordTable,
        image: &GrayImage,
        darkness: D,
        line_count: usize,
        start: usize,
    ) -> Self {
        debug_assert_eq!(nails.len(), chords.nail_count());
        debug_assert!(start < nails.len());
        let state = DrawState::new(image, &chords);
        Self {
            priorities: Vec::with_capacity(nails.len()),
            nails,
            chords,
            state,
            darkness,
            current: start,
            line_count,
            emitted: 0,
            status: SequencerState::Idle,
        }
    }

    pub fn status(&self) -> SequencerState {
        self.status
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn draw_state(&self) -> &DrawState {
        &self.state
    }

    pub fn chords(&self) -> &ChordTable {
        &self.chords
    }

    fn best_next(&mut self) -> Result<usize> {
        let from = self.current;
        let chords = &self.chords;
        let state = &self.state;
        (0..chords.nail_count())
            .into_par_iter()
            .map(|to| {
                ChordKey::new(from, to)
                    .map_or(f64::NEG_INFINITY, |key| state.chord_priority(chords, key))
            })
            .collect_into_vec(&mut self.priorities);

        let mut best = None;
        let mut best_priority = f64::NEG_INFINITY;
        for (to, &priority) in self.priorities.iter().enumerate() {
            if priority > best_priority {
                best_priority = priority;
                best = Some(to);
            }
        }
        best.ok_or(Error::NoViableChord { nail: from })
    }

    /// Selects, applies and returns the next chord, or `None` once `line_count` chords were
    /// emitted.
    pub fn step(&mut self) -> Option<Result<Chord>> {
        match self.status {
            SequencerState::Done => return None,
            SequencerState::Idle => {
                log::debug!("sequencing {} lines from nail {}", self.line_count, self.current);
                self.status = SequencerState::Running;
            }
            SequencerState::Running => {}
        }
        let to = match self.best_next() {
            Ok(to) => to,
            Err(err) => {
                self.status = SequencerState::Done;
                return Some(Err(err));
            }
        };
        let from = self.current;
        // `best_next` never returns the current nail
        if let Some(key) = ChordKey::new(from, to) {
            self.state.apply_chord(&self.chords, key, self.darkness);
        }
        self.current = to;
        self.emitted += 1;
        if self.emitted == self.line_count {
            self.status = SequencerState::Done;
        }
        let segment = self.nails.segment(from, to)?;
        Some(Ok(Chord { from, to, segment }))
    }

    /// Runs to completion, pushing every chord to `sender` in emission order.
    pub fn run(&mut self, sender: ChordSender, cancel: &CancelToken) -> Result<Vec<Chord>> {
        let mut sequence = Vec::with_capacity(self.line_count);
        loop {
            if cancel.is_cancelled() {
                log::info!("sequencer cancelled after {} lines", sequence.len());
                return Err(Error::Cancelled);
            }
            let Some(chord) = self.step() else {
                break;
            };
            let chord = chord?;
            if sender.send(chord).is_err() {
                return Err(Error::Cancelled);
            }
            sequence.push(chord);
        }
        log::debug!("sequenced {} lines", sequence.len());
        Ok(sequence)
    }
}

impl<D: Darkness> Iterator for Sequencer<D> {
    type Item = Result<Chord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{darkness::Opacity, image::PixelData, queue::chord_queue, verboser::Silent, Grid};

    fn sequencer(
        side: usize,
        nails: usize,
        gray: u8,
        opacity: u8,
        lines: usize,
        start: usize,
    ) -> Sequencer<Opacity> {
        let grid = Grid::square(side);
        let table = NailTable::circle(grid, nails, &mut Silent).unwrap();
        let chords = ChordTable::bake(&table, &mut Silent);
        let image = PixelData::new(|_| gray, grid);
        Sequencer::new(table, chords, &image, Opacity(opacity), lines, start)
    }

    fn path(sequencer: Sequencer<Opacity>) -> Vec<(usize, usize)> {
        sequencer
            .map(|chord| chord.map(|c| (c.from, c.to)))
            .collect::<Result<_>>()
            .unwrap()
    }

    #[test]
    fn moves_through_idle_running_done() {
        let mut seq = sequencer(60, 8, 90, 20, 2, 0);
        assert_eq!(seq.status(), SequencerState::Idle);
        assert!(seq.step().unwrap().is_ok());
        assert_eq!(seq.status(), SequencerState::Running);
        assert!(seq.step().unwrap().is_ok());
        assert_eq!(seq.status(), SequencerState::Done);
        assert!(seq.step().is_none());
        assert_eq!(seq.emitted(), 2);
    }

    #[test]
    fn emits_exactly_line_count_connected_chords() {
        let chords = path(sequencer(80, 24, 60, 30, 57, 5));
        assert_eq!(chords.len(), 57);
        assert_eq!(chords[0].0, 5);
        for pair in chords.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        assert!(chords.iter().all(|(from, to)| from != to));
    }

    #[test]
    fn square_of_nails_on_uniform_gray() {
        // All six chords start with the same priority, so the first step takes the lowest
        // index; after that shared endpoint pixels break the ties.
        let seq = sequencer(100, 4, 128, 50, 3, 0);
        let priorities: Vec<f64> = seq
            .chords()
            .iter()
            .map(|(key, _)| seq.draw_state().chord_priority(seq.chords(), key))
            .collect();
        assert!(priorities.iter().all(|&p| p == 127.0));
        assert_eq!(seq.chords().len(), 6);
        assert_eq!(path(seq), vec![(0, 1), (1, 3), (3, 2)]);
    }

    #[test]
    fn two_nails_repeat_the_only_chord() {
        let mut seq = sequencer(50, 2, 0, 40, 10, 1);
        let key = ChordKey::new(0, 1).unwrap();
        let mut previous = 0;
        let mut expected_from = 1;
        while let Some(chord) = seq.step() {
            let chord = chord.unwrap();
            assert_eq!((chord.from, chord.to), (expected_from, 1 - expected_from));
            expected_from = chord.to;
            let pixels = seq.chords().pixels(key);
            let value = seq.draw_state().get(pixels[0]);
            assert!(pixels.iter().all(|&idx| seq.draw_state().get(idx) == value));
            assert!(value >= previous);
            previous = value;
        }
        assert_eq!(seq.emitted(), 10);
        assert_eq!(previous, 255);
    }

    #[test]
    fn zero_opacity_still_terminates() {
        let seq = sequencer(100, 4, 128, 0, 6, 0);
        assert_eq!(
            path(seq),
            vec![(0, 1), (1, 0), (0, 1), (1, 0), (0, 1), (1, 0)]
        );
    }

    #[test]
    fn same_start_gives_same_sequence() {
        let image = PixelData::new(|p| ((p.x * 31 + p.y * 17) % 256) as u8, Grid::square(120));
        let run = || {
            let table = NailTable::circle(Grid::square(120), 40, &mut Silent).unwrap();
            let chords = ChordTable::bake(&table, &mut Silent);
            let start = start_nail(40, Some(7));
            path(Sequencer::new(table, chords, &image, Opacity(26), 200, start))
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn seeded_start_is_stable_and_in_range() {
        assert_eq!(start_nail(300, Some(42)), start_nail(300, Some(42)));
        assert!((0..100).all(|seed| start_nail(5, Some(seed)) < 5));
        assert!(start_nail(3, None) < 3);
    }

    #[test]
    fn degenerate_chords_are_never_picked() {
        // 2 pixels wide: all nails share one pixel and no chord has pixels.
        let mut seq = sequencer(2, 4, 0, 26, 3, 0);
        assert!(matches!(
            seq.step(),
            Some(Err(Error::NoViableChord { nail: 0 }))
        ));
        assert_eq!(seq.status(), SequencerState::Done);
        assert!(seq.step().is_none());
    }

    #[test]
    fn run_pushes_chords_in_order() {
        let mut seq = sequencer(60, 10, 40, 26, 25, 3);
        let (tx, rx) = chord_queue(1000);
        let sequence = seq.run(tx, &CancelToken::new()).unwrap();
        let received: Vec<Chord> = rx.collect();
        assert_eq!(sequence, received);
        assert_eq!(received.len(), 25);
    }

    #[test]
    fn run_stops_when_cancelled() {
        let mut seq = sequencer(60, 10, 40, 26, 25, 3);
        let (tx, rx) = chord_queue(1000);
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(matches!(seq.run(tx, &cancel), Err(Error::Cancelled)));
        assert_eq!(rx.count(), 0);
    }

    #[test]
    fn cancelled_run_leaves_the_canvas_untouched() {
        let mut seq = sequencer(60, 10, 40, 26, 25, 3);
        let before = seq.draw_state().values().to_vec();
        let cancel = CancelToken::new();
        cancel.cancel();
        let (tx, _rx) = chord_queue(1000);
        assert!(matches!(seq.run(tx, &cancel), Err(Error::Cancelled)));
        assert_eq!(seq.draw_state().values(), &before[..]);
        assert_eq!(seq.emitted(), 0);
        assert_eq!(seq.status(), SequencerState::Idle);
    }
}
