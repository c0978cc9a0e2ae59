use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use clap::{Parser, Subcommand};
use serde::Serialize;
use sudoku_ocr::{
    corpus, raster, BoardRecognizer, CellCoord, CellOutcome, RecognizerParams, ReferenceSet,
};
use sudoku_ocr::{knn::BuildReport, Board};

#[cfg(not(feature = "tracing"))]
use sudoku_ocr::core::{init_with_level, level_from_verbosity};
#[cfg(feature = "tracing")]
use sudoku_ocr::core::init_tracing;
#[cfg(feature = "tracing")]
use tracing_log::LogTracer;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Read the digits of a photographed Sudoku board.
#[derive(Parser, Debug)]
#[command(name = "sudoku-ocr", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON log lines (with the `tracing` feature)
    #[arg(long, global = true)]
    json_log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a reference set from `<corpus>/<1..9>/` sample images
    Train {
        /// Corpus root directory
        #[arg(long)]
        corpus: PathBuf,
        /// Where to write the reference set JSON
        #[arg(long)]
        model: PathBuf,
        /// Recognizer params JSON (only `ink_threshold` is used here)
        #[arg(long)]
        params: Option<PathBuf>,
    },
    /// Recognize a board image against a reference set
    Recognize {
        /// Reference set JSON written by `train`
        #[arg(long)]
        model: PathBuf,
        /// Board image
        #[arg(long)]
        image: PathBuf,
        /// Recognizer params JSON
        #[arg(long)]
        params: Option<PathBuf>,
        /// Override the neighbour count
        #[arg(short, long)]
        k: Option<usize>,
        /// Write a JSON report here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Default, Serialize)]
struct TimingsMs {
    load_model: u64,
    load_image: u64,
    recognize: u64,
    total: u64,
}

#[derive(Debug, Serialize)]
struct RecognizeReport<'a> {
    image_path: String,
    model_path: String,
    params: &'a RecognizerParams,
    board: Board,
    failures: &'a [CellCoord],
    cells: &'a [CellOutcome],
    timings_ms: TimingsMs,
}

#[derive(Debug, Serialize)]
struct TrainReport<'a> {
    corpus_path: String,
    model_path: String,
    #[serde(flatten)]
    build: &'a BuildReport,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_log)?;

    match cli.command {
        Command::Train {
            corpus,
            model,
            params,
        } => train(&corpus, &model, params.as_deref()),
        Command::Recognize {
            model,
            image,
            params,
            k,
            output,
        } => recognize(&model, &image, params.as_deref(), k, output.as_deref()),
    }
}

fn init_logging(verbose: u8, json: bool) -> CliResult<()> {
    #[cfg(not(feature = "tracing"))]
    {
        init_with_level(level_from_verbosity(verbose))?;
        if json {
            log::warn!("--json-log needs the `tracing` feature; using plain log lines");
        }
    }
    #[cfg(feature = "tracing")]
    {
        let _ = verbose;
        let _ = LogTracer::init();
        init_tracing(json);
    }
    Ok(())
}

fn load_params(path: Option<&Path>) -> CliResult<RecognizerParams> {
    match path {
        Some(p) => Ok(RecognizerParams::load_json(p)?),
        None => Ok(RecognizerParams::default()),
    }
}

fn train(corpus_root: &Path, model: &Path, params: Option<&Path>) -> CliResult<()> {
    let params = load_params(params)?;
    let (reference, report) = corpus::build_reference_from_dir(corpus_root, params.ink_threshold)?;
    if reference.is_empty() {
        return Err(format!("no usable samples under {}", corpus_root.display()).into());
    }
    reference.save_json(model)?;

    let summary = TrainReport {
        corpus_path: corpus_root.display().to_string(),
        model_path: model.display().to_string(),
        build: &report,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn recognize(
    model: &Path,
    image: &Path,
    params: Option<&Path>,
    k: Option<usize>,
    output: Option<&Path>,
) -> CliResult<()> {
    let t_total = Instant::now();
    let mut params = load_params(params)?;
    if let Some(k) = k {
        params.k = k;
    }

    let (reference, load_model_ms) = timed_result(|| ReferenceSet::load_json(model))?;
    let (grid, load_image_ms) = timed_result(|| raster::load_pixel_grid(image))?;

    let recognizer = BoardRecognizer::new(&reference, params)?;
    let (result, recognize_ms) = timed_result(|| recognizer.recognize(&grid))?;

    print!("{}", result.board);
    if result.failures.is_empty() {
        println!("failures: none");
    } else {
        let cells: Vec<String> = result.failures.iter().map(|c| c.to_string()).collect();
        println!("failures: {}", cells.join(" "));
    }

    if let Some(path) = output {
        let report = RecognizeReport {
            image_path: image.display().to_string(),
            model_path: model.display().to_string(),
            params: recognizer.params(),
            board: result.board,
            failures: &result.failures,
            cells: &result.cells,
            timings_ms: TimingsMs {
                load_model: load_model_ms,
                load_image: load_image_ms,
                recognize: recognize_ms,
                total: t_total.elapsed().as_millis() as u64,
            },
        };
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        println!("wrote report JSON to {}", path.display());
    }
    Ok(())
}

fn timed_result<T, E, F: FnOnce() -> Result<T, E>>(f: F) -> Result<(T, u64), E> {
    let start = Instant::now();
    let value = f()?;
    let elapsed = start.elapsed().as_millis() as u64;
    Ok((value, elapsed))
}
