#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message {
    Preprocessing,
    PlacingNails(usize),
    Baking(usize, usize),
    Sequencing(usize, usize),
    Rendering(usize, usize),
    Saving,
}

pub trait Verboser {
    fn verbose(&mut self, message: Message);
}

impl<V: Verboser + ?Sized> Verboser for &mut V {
    fn verbose(&mut self, message: Message) {
        (**self).verbose(message)
    }
}

pub struct Silent;

impl Verboser for Silent {
    fn verbose(&mut self, _: Message) {}
}

/// Forwards progress to the `log` facade, reporting rendering once every `interval` lines.
pub struct Logger {
    interval: usize,
}

impl Logger {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Verboser for Logger {
    fn verbose(&mut self, message: Message) {
        match message {
            Message::Preprocessing => log::info!("Preprocessing image"),
            Message::PlacingNails(count) => log::info!("Placing {count} nails"),
            Message::Baking(done, total) => {
                if done == total {
                    log::info!("Baked {total} chords");
                }
            }
            Message::Sequencing(done, total) => {
                if done == total {
                    log::info!("Sequenced {total} lines");
                }
            }
            Message::Rendering(done, total) => {
                if done % self.interval == 0 || done == total {
                    log::info!("Lines drawn: {done}/{total}");
                }
            }
            Message::Saving => log::info!("Saving result"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<Message>);

    impl Verboser for Recorder {
        fn verbose(&mut self, message: Message) {
            self.0.push(message);
        }
    }

    #[test]
    fn mutable_references_forward() {
        let mut recorder = Recorder::default();
        {
            let mut by_ref = &mut recorder;
            by_ref.verbose(Message::Saving);
        }
        assert_eq!(recorder.0, vec![Message::Saving]);
    }

    #[test_log::test]
    fn logger_accepts_every_message() {
        let mut logger = Logger::new(0);
        for message in [
            Message::Preprocessing,
            Message::PlacingNails(4),
            Message::Baking(6, 6),
            Message::Sequencing(3, 3),
            Message::Rendering(1, 3),
            Message::Saving,
        ] {
            logger.verbose(message);
        }
        assert_eq!(logger.interval, 1);
    }
}
