use std::{
    path::{Path, PathBuf},
    thread,
};

use image::{DynamicImage, RgbaImage};

use crate::{
    cancel::CancelToken,
    chord_table::ChordTable,
    config::Config,
    darkness::Opacity,
    error::{Error, Result},
    geometry::Point,
    image::{self as preprocessing, GrayImage},
    nail_table::NailTable,
    queue::{chord_queue, Chord},
    renderer::Renderer,
    sequencer::{start_nail, Sequencer},
    verboser::{Message, Verboser},
};

/// Suffix appended to the input file stem by [`result_path`].
pub const RESULT_SUFFIX: &str = "_RES";

/// `dir/photo.jpg` becomes `dir/photo_RES.png`.
pub fn result_path(input: impl AsRef<Path>) -> PathBuf {
    let input = input.as_ref();
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{RESULT_SUFFIX}.png"))
}

/// Everything a run needs, built and validated before any worker starts.
pub struct Generator {
    config: Config,
    image: GrayImage,
    nails: NailTable,
    chords: ChordTable,
    start: usize,
}

impl Generator {
    pub fn open(
        path: impl AsRef<Path>,
        config: Config,
        verboser: &mut impl Verboser,
    ) -> Result<Self> {
        config.validate()?;
        let image = preprocessing::open(path, config.resolution, verboser)?;
        Self::new(image, config, verboser)
    }

    pub fn from_image(
        image: &DynamicImage,
        config: Config,
        verboser: &mut impl Verboser,
    ) -> Result<Self> {
        config.validate()?;
        let image = preprocessing::preprocess(image, config.resolution, verboser)?;
        Self::new(image, config, verboser)
    }

    /// Builds a generator over an already preprocessed square image.
    pub fn new(image: GrayImage, config: Config, verboser: &mut impl Verboser) -> Result<Self> {
        config.validate()?;
        let grid = *image.grid();
        if grid.width != grid.height || grid.width == 0 {
            return Err(Error::invalid_image(
                "<memory>",
                format!("expected a non empty square image, got {}x{}", grid.width, grid.height),
            ));
        }
        let nails = NailTable::circle(grid, config.dots_count, verboser)?;
        let chords = ChordTable::bake(&nails, verboser);
        let degenerate = chords.degenerate_count();
        if degenerate > 0 {
            log::warn!(
                "{degenerate} of {} chords join nails sharing a pixel and will never be drawn",
                chords.len()
            );
        }
        let start = start_nail(nails.len(), config.seed);
        log::info!(
            "{} nails, {} chords, starting at nail {}",
            nails.len(),
            chords.len(),
            start
        );
        Ok(Self {
            config,
            image,
            nails,
            chords,
            start,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn nails(&self) -> &NailTable {
        &self.nails
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Runs the sequencer on its own thread and renders on the calling thread as chords
    /// arrive. Returns only once both sides finished.
    pub fn run(self, cancel: &CancelToken, verboser: &mut impl Verboser) -> Result<Generation> {
        let Self {
            config,
            image,
            nails,
            chords,
            start,
        } = self;
        let grid = nails.grid();
        let nail_points = nails.nails().to_vec();
        let mut sequencer = Sequencer::new(
            nails,
            chords,
            &image,
            Opacity(config.opacity),
            config.line_count,
            start,
        );
        drop(image);
        let (sender, receiver) = chord_queue(config.queue_capacity);
        let mut renderer = Renderer::new(grid, config.opacity);

        let (sequenced, rendered) = thread::scope(|scope| {
            let producer = thread::Builder::new()
                .name("sequencer".into())
                .spawn_scoped(scope, || sequencer.run(sender, cancel));
            let rendered = renderer.run(
                &nail_points,
                receiver,
                config.line_count,
                cancel,
                verboser,
            );
            let sequenced = match producer {
                Ok(handle) => handle
                    .join()
                    .unwrap_or(Err(Error::WorkerPanicked("sequencer"))),
                Err(err) => {
                    log::error!("failed spawning the sequencer: {err}");
                    Err(Error::WorkerPanicked("sequencer"))
                }
            };
            (sequenced, rendered)
        });
        // A sequencer failure explains why the renderer stopped, so it wins.
        let steps = sequenced?;
        rendered?;
        verboser.verbose(Message::Sequencing(steps.len(), config.line_count));
        log::debug!(
            "drew {} nails and {} lines",
            renderer.nails_drawn(),
            renderer.lines_drawn()
        );
        Ok(Generation {
            nails: nail_points,
            steps,
            canvas: renderer.into_canvas(),
            opacity: config.opacity,
        })
    }
}

/// Finished run: the chord sequence in emission order and its rendering.
pub struct Generation {
    nails: Vec<Point<usize>>,
    steps: Vec<Chord>,
    canvas: RgbaImage,
    opacity: u8,
}

impl Generation {
    pub fn steps(&self) -> &[Chord] {
        &self.steps
    }

    pub fn nails(&self) -> &[Point<usize>] {
        &self.nails
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_canvas(self) -> RgbaImage {
        self.canvas
    }

    /// Nail indexes visited by the string, starting nail first.
    pub fn nail_path(&self) -> Vec<usize> {
        self.steps
            .first()
            .map(|first| first.from)
            .into_iter()
            .chain(self.steps.iter().map(|step| step.to))
            .collect()
    }

    pub fn save(&self, path: impl AsRef<Path>, verboser: &mut impl Verboser) -> Result<()> {
        verboser.verbose(Message::Saving);
        self.canvas.save(path)?;
        Ok(())
    }

    /// One nail index per line, in the order the string goes around them.
    pub fn build_instructions(&self) -> String {
        let mut instructions = String::new();
        for nail in self.nail_path() {
            instructions.push_str(&nail.to_string());
            instructions.push('\n');
        }
        instructions
    }

    pub fn build_svg(&self, line_tickness: f32) -> svg::Document {
        let (width, height) = self.canvas.dimensions();
        let mut doc = svg::Document::new()
            .set("viewBox", (0.0, 0.0, width as f32, height as f32))
            .add(
                svg::node::element::Rectangle::new()
                    .set("width", width as f32)
                    .set("height", height as f32)
                    .set("fill", "white"),
            );
        for nail in self.nails.iter() {
            doc = doc.add(
                svg::node::element::Circle::new()
                    .set("cx", nail.x as f32)
                    .set("cy", nail.y as f32)
                    .set("r", 1.0)
                    .set("fill", "grey"),
            );
        }
        let opacity = format!("{:.4}", self.opacity as f32 / u8::MAX as f32);
        for step in self.steps.iter() {
            doc = doc.add(
                svg::node::element::Line::new()
                    .set("x1", step.start().x as f32)
                    .set("y1", step.start().y as f32)
                    .set("x2", step.end().x as f32)
                    .set("y2", step.end().y as f32)
                    .set("stroke", "black")
                    .set("stroke-width", format!("{:.4}", line_tickness))
                    .set("stroke-opacity", opacity.as_str()),
            );
        }
        doc
    }
}

/// Full run from an image file to `<stem>_RES.png` next to it. Nothing is written unless
/// every chord was sequenced and rendered.
pub fn generate(
    input: impl AsRef<Path>,
    config: Config,
    verboser: &mut impl Verboser,
) -> Result<PathBuf> {
    let input = input.as_ref();
    let output = result_path(input);
    let generation = Generator::open(input, config, verboser)?.run(&CancelToken::new(), verboser)?;
    generation.save(&output, verboser)?;
    Ok(output)
}
