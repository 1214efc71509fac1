//! The frame loop: capture, read, decide, annotate.

use image::RgbImage;
use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, TrisConfig};
use crate::detect::BoardReading;
use crate::engine::GameStatus;
use crate::frame::{prepare_frame, FrameSource};
use crate::game::{MatchState, TurnReport};
use crate::pipeline::{process_frame, read_fixed_grid};
use crate::render::{annotate_board, draw_quad, draw_status_bar, RenderError, RenderSink};

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// What a run of the frame loop saw.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Frames delivered by the source.
    pub frames: usize,
    /// Frames that could not be read or analysed.
    pub skipped: usize,
    pub reports: Vec<TurnReport>,
    pub outcome: Option<GameStatus>,
}

/// Run turns until the game ends or the source runs dry.
///
/// Frames that fail to load or to show a board are logged and skipped; the
/// turn does not advance. Only render errors abort the loop.
pub fn run_game<S, K, R>(
    source: &mut S,
    sink: &mut K,
    cfg: &TrisConfig,
    rng: &mut R,
) -> Result<GameSummary, SessionError>
where
    S: FrameSource + ?Sized,
    K: RenderSink + ?Sized,
    R: Rng + ?Sized,
{
    let mut state = MatchState::from_config(cfg)?;
    let geometry = cfg.classifier_params().geometry;
    let style = cfg.render_style();
    let mut summary = GameSummary::default();

    while !state.is_over() {
        let raw = match source.next_frame() {
            Ok(Some(raw)) => raw,
            Ok(None) => break,
            Err(e) => {
                warn!("frame skipped: {e}");
                summary.skipped += 1;
                continue;
            }
        };
        summary.frames += 1;
        let mut frame = prepare_frame(&raw, cfg.frame_width, cfg.frame_height, cfg.rotate);

        let analysis = match process_frame(&frame, cfg) {
            Ok(a) => a,
            Err(e) => {
                warn!("frame {}: {e}", summary.frames);
                summary.skipped += 1;
                let mut board = RgbImage::new(cfg.frame_width, cfg.frame_height);
                draw_status_bar(&mut board, false);
                sink.show(&frame, &board)?;
                continue;
            }
        };

        let report = state.observe(&analysis.reading.board, rng);
        info!(
            "turn {} ({}):\n{}",
            report.turn, report.player, analysis.reading.board
        );
        if let Some(d) = report.decision {
            info!("computer ({}) plays {} [{:?}]", report.player, d.mv, d.reason);
        }

        draw_quad(&mut frame, &analysis.rectification.corners, &style);
        let mut board = analysis.board_image;
        annotate_board(&mut board, &analysis.reading, &geometry, Some(&report), &style);
        draw_status_bar(&mut board, true);
        sink.show(&frame, &board)?;
        summary.reports.push(report);
    }

    summary.outcome = state.outcome();
    match summary.outcome {
        Some(GameStatus::Won(line)) => info!("winner: {}", line.player),
        Some(GameStatus::Draw) => info!("game drawn"),
        _ => info!("no more frames after {} turns", summary.reports.len()),
    }
    Ok(summary)
}

/// Read cells on the fixed grid of a prepared frame and draw the result, for
/// lining the camera up with the paper before a game.
pub fn preview_alignment(frame: &RgbImage, cfg: &TrisConfig) -> (BoardReading, RgbImage) {
    let reading = read_fixed_grid(frame, cfg);
    let mut annotated = frame.clone();
    annotate_board(
        &mut annotated,
        &reading,
        &cfg.classifier_params().geometry,
        None,
        &cfg.render_style(),
    );
    (reading, annotated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameError;
    use crate::render::NullSink;
    use image::Rgb;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<Result<Option<RgbImage>, FrameError>>);

    impl FrameSource for Scripted {
        fn next_frame(&mut self) -> Result<Option<RgbImage>, FrameError> {
            self.0.pop_front().unwrap_or(Ok(None))
        }
    }

    #[test]
    fn bad_frames_are_skipped_until_the_source_ends() {
        let blank = RgbImage::from_pixel(64, 64, Rgb([90, 90, 90]));
        let mut source = Scripted(VecDeque::from([
            Ok(Some(blank.clone())),
            Err(FrameError::Io {
                path: "missing.png".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
            Ok(Some(blank)),
        ]));
        let cfg = TrisConfig {
            frame_width: 60,
            frame_height: 60,
            cell_inset: 2,
            bilateral_diameter: 0,
            ..TrisConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(0);
        let summary = run_game(&mut source, &mut NullSink, &cfg, &mut rng).expect("run");
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.skipped, 3);
        assert!(summary.reports.is_empty());
        assert_eq!(summary.outcome, None);
    }

    #[test]
    fn alignment_preview_reads_a_blank_sheet() {
        let cfg = TrisConfig {
            frame_width: 60,
            frame_height: 60,
            cell_inset: 2,
            ..TrisConfig::default()
        };
        let frame = RgbImage::from_pixel(60, 60, Rgb([240, 240, 240]));
        let (reading, annotated) = preview_alignment(&frame, &cfg);
        assert_eq!(reading.board, crate::core::Board::new());
        assert_eq!(*annotated.get_pixel(20, 5), Rgb(cfg.line_color));
    }
}
