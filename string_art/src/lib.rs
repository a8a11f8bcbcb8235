pub mod geometry {
    pub mod point;
    pub mod segment;

    pub use point::Point;
    pub use segment::Segment;
}

pub mod cancel;
pub mod chord_table;
pub mod config;
pub mod darkness;
pub mod draw_state;
pub mod error;
pub mod generator;
pub mod grid;
pub mod image;
pub mod nail_table;
pub mod queue;
pub mod renderer;
pub mod sequencer;
pub mod verboser;

pub use cancel::CancelToken;
pub use chord_table::{ChordKey, ChordTable};
pub use config::{Config, ConfigError};
pub use darkness::{Darkness, Opacity};
pub use draw_state::DrawState;
pub use error::{Error, Result};
pub use generator::{generate, result_path, Generation, Generator};
pub use grid::Grid;
pub use crate::image::GrayImage;
pub use nail_table::NailTable;
pub use queue::{chord_queue, Chord, ChordReceiver, ChordSender};
pub use renderer::Renderer;
pub use sequencer::{Sequencer, SequencerState};
