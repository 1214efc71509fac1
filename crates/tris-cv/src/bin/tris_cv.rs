use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use tris_cv::engine::{decide, evaluate, GameStatus};
use tris_cv::frame::{load_rgb, prepare_frame, FrameError, ImageSequence};
use tris_cv::pipeline::{process_frame, PipelineError};
use tris_cv::render::{
    annotate_board, compose_canvas, draw_quad, draw_status_bar, NullSink, PngSequenceSink,
    RenderError,
};
use tris_cv::session::{preview_alignment, run_game, SessionError};
use tris_cv::{ConfigError, TrisConfig};

use tris_cv::core::level_for_verbosity;
#[cfg(not(feature = "tracing"))]
use tris_cv::core::init_with_level;
#[cfg(feature = "tracing")]
use tracing_log::LogTracer;

/// Play tic-tac-toe on a paper board seen through a camera.
#[derive(Parser, Debug)]
#[command(name = "tris-cv")]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON config file; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read the board in one image and suggest a move.
    Analyze {
        image: PathBuf,
        /// Print the reading as JSON.
        #[arg(long)]
        json: bool,
        /// Write the annotated board to this PNG.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run the turn loop over a directory of frames.
    Play {
        #[arg(long)]
        frames: PathBuf,
        /// Directory for annotated frames.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Seed for the random fallback move.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Classify cells on the fixed grid, to line the camera up.
    Align {
        image: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write the default config as JSON.
    InitConfig { path: PathBuf },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("failed to write {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let cfg = match &cli.config {
        Some(path) => TrisConfig::load_json(path)?,
        None => TrisConfig::default(),
    };

    match cli.command {
        Command::Analyze { image, json, out } => analyze(&cfg, &image, json, out.as_deref())?,
        Command::Play { frames, out, seed } => play(&cfg, &frames, out.as_deref(), seed)?,
        Command::Align { image, out } => align(&cfg, &image, out.as_deref())?,
        Command::InitConfig { path } => {
            TrisConfig::default().write_json(&path)?;
            println!("wrote default config to {}", path.display());
        }
    }
    Ok(())
}

fn init_logging(verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    {
        let _ = LogTracer::init();
        tris_cv::core::init_tracing_with_level(false, level_for_verbosity(verbose));
    }
    #[cfg(not(feature = "tracing"))]
    {
        init_with_level(level_for_verbosity(verbose))?;
    }
    Ok(())
}

fn rng_from(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_os_rng(),
    }
}

fn analyze(cfg: &TrisConfig, image: &Path, json: bool, out: Option<&Path>) -> Result<(), CliError> {
    let raw = load_rgb(image)?;
    let frame = prepare_frame(&raw, cfg.frame_width, cfg.frame_height, cfg.rotate);
    let analysis = process_frame(&frame, cfg)?;
    let board = &analysis.reading.board;
    let encoding = cfg.encoding().map_err(ConfigError::from)?;

    let status = evaluate(board, &encoding);
    let mut rng = rng_from(None);
    let suggestion = match (status, cfg.computer) {
        (GameStatus::Playing, Some(computer)) => {
            decide(board, &encoding, computer, computer.other(), &mut rng).ok()
        }
        _ => None,
    };

    if json {
        let report = serde_json::json!({
            "board": board,
            "cells": analysis.reading.cells,
            "corners": analysis.rectification.corners,
            "status": status,
            "suggestion": suggestion,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{board}");
        match status {
            GameStatus::Won(line) => println!("winner: {}", line.player),
            GameStatus::Draw => println!("draw"),
            GameStatus::Playing => match suggestion {
                Some(d) => println!("suggested move: {} ({:?})", d.mv, d.reason),
                None => println!("no suggestion (no computer player)"),
            },
        }
    }

    if let Some(path) = out {
        let style = cfg.render_style();
        let mut outlined = frame.clone();
        draw_quad(&mut outlined, &analysis.rectification.corners, &style);
        let mut img = analysis.board_image.clone();
        let geometry = cfg.classifier_params().geometry;
        annotate_board(&mut img, &analysis.reading, &geometry, None, &style);
        draw_status_bar(&mut img, true);
        save_png(&compose_canvas(&outlined, &img), path)?;
    }
    Ok(())
}

fn play(cfg: &TrisConfig, frames: &Path, out: Option<&Path>, seed: Option<u64>) -> Result<(), CliError> {
    let mut source = ImageSequence::from_dir(frames)?;
    let mut rng = rng_from(seed);
    let summary = match out {
        Some(dir) => run_game(&mut source, &mut PngSequenceSink::new(dir)?, cfg, &mut rng)?,
        None => run_game(&mut source, &mut NullSink, cfg, &mut rng)?,
    };
    for report in &summary.reports {
        println!("turn {} ({})", report.turn, report.player);
        println!("{}", report.board);
        if let Some(d) = report.decision {
            println!("computer plays {} ({:?})", d.mv, d.reason);
        }
    }
    println!(
        "frames: {} read: {} skipped: {}",
        summary.frames,
        summary.reports.len(),
        summary.skipped
    );
    match summary.outcome {
        Some(GameStatus::Won(line)) => println!("winner: {}", line.player),
        Some(GameStatus::Draw) => println!("draw"),
        _ => println!("unfinished"),
    }
    Ok(())
}

fn align(cfg: &TrisConfig, image: &Path, out: Option<&Path>) -> Result<(), CliError> {
    let raw = load_rgb(image)?;
    let frame = prepare_frame(&raw, cfg.frame_width, cfg.frame_height, cfg.rotate);
    let (reading, annotated) = preview_alignment(&frame, cfg);
    println!("{}", reading.board);
    if let Some(path) = out {
        save_png(&annotated, path)?;
    }
    Ok(())
}

fn save_png(img: &image::RgbImage, path: &Path) -> Result<(), CliError> {
    img.save(path).map_err(|source| CliError::Save {
        path: path.to_path_buf(),
        source,
    })
}
