use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use string_art::{result_path, verboser::Logger, CancelToken, Config, Generator};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image path (JPEG or PNG).
    #[arg()]
    input: PathBuf,

    /// Number of nails around the circle.
    #[arg(short, long, visible_alias = "dots")]
    nails: Option<usize>,

    /// Number of lines the string is made of.
    #[arg(short, long)]
    lines: Option<usize>,

    /// Darkness added by every line, from 0 to 255.
    #[arg(long)]
    opacity: Option<u8>,

    /// Side in pixels of the square working image.
    #[arg(short, long)]
    resolution: Option<u32>,

    /// Seed for the starting nail.
    #[arg(long)]
    seed: Option<u64>,

    /// Capacity of the queue between sequencing and rendering.
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Lines drawn between two progress reports.
    #[arg(long)]
    progress_interval: Option<usize>,

    /// JSON file with a base configuration. Flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output image path. Defaults to `<input stem>_RES.png` next to the input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write an SVG preview to this path.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Line thickness of the SVG preview.
    #[arg(long, default_value_t = 0.5)]
    svg_line_thickness: f32,

    /// Also write the nail sequence, one index per line, to this path.
    #[arg(long)]
    instructions: Option<PathBuf>,
}

impl Args {
    fn build_config(&self) -> Result<Config, CliError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => Config::default(),
        };
        if let Some(nails) = self.nails {
            config.dots_count = nails;
        }
        if let Some(lines) = self.lines {
            config.line_count = lines;
        }
        if let Some(opacity) = self.opacity {
            config.opacity = opacity;
        }
        if let Some(resolution) = self.resolution {
            config.resolution = resolution;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(capacity) = self.queue_capacity {
            config.queue_capacity = capacity;
        }
        if let Some(interval) = self.progress_interval {
            config.progress_interval = interval;
        }
        Ok(config)
    }
}

fn read_config(path: &Path) -> Result<Config, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::ConfigFile {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Failed accessing {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid configuration file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    StringArt(#[from] string_art::Error),
}

fn run(args: &Args) -> Result<PathBuf, CliError> {
    let config = args.build_config()?;
    log::debug!("{config:?}");
    let mut verboser = Logger::new(config.progress_interval);
    let generation = Generator::open(&args.input, config, &mut verboser)?
        .run(&CancelToken::new(), &mut verboser)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| result_path(&args.input));
    generation.save(&output, &mut verboser)?;

    if let Some(path) = &args.svg {
        svg::save(path, &generation.build_svg(args.svg_line_thickness)).map_err(|source| {
            CliError::Io {
                path: path.clone(),
                source,
            }
        })?;
    }
    if let Some(path) = &args.instructions {
        fs::write(path, generation.build_instructions()).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
    }
    Ok(output)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(&args) {
        Ok(output) => {
            log::info!("Result saved to {}", output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
