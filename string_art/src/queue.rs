use std::sync::mpsc::{self, Receiver, SyncSender};

use crate::geometry::{Point, Segment};

/// One chord of the string path, from the nail the string was on to the next one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chord {
    pub from: usize,
    pub to: usize,
    pub segment: Segment<usize>,
}

impl Chord {
    pub fn start(&self) -> Point<usize> {
        self.segment.start
    }

    pub fn end(&self) -> Point<usize> {
        self.segment.end
    }
}

/// Bounded FIFO hand-off between a single producer and a single consumer.
pub fn chord_queue(capacity: usize) -> (ChordSender, ChordReceiver) {
    let (tx, rx) = mpsc::sync_channel(capacity);
    (ChordSender(tx), ChordReceiver(rx))
}

pub struct ChordSender(SyncSender<Chord>);

#[derive(Debug, thiserror::Error)]
#[error("The chord receiver was dropped")]
pub struct Disconnected;

impl ChordSender {
    /// Blocks while the queue is full.
    pub fn send(&self, chord: Chord) -> Result<(), Disconnected> {
        self.0.send(chord).map_err(|_| Disconnected)
    }
}

pub struct ChordReceiver(Receiver<Chord>);

impl ChordReceiver {
    /// Blocks until a chord is available. Returns `None` once the sender is gone and every
    /// queued chord was received.
    pub fn recv(&self) -> Option<Chord> {
        self.0.recv().ok()
    }
}

impl Iterator for ChordReceiver {
    type Item = Chord;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}
