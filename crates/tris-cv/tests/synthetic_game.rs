mod common;

use std::collections::VecDeque;

use approx::assert_abs_diff_eq;
use image::RgbImage;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tris_cv::core::{Board, CellValue, Move, Player};
use tris_cv::engine::{GameStatus, MoveReason};
use tris_cv::frame::{FrameError, FrameSource, ImageSequence};
use tris_cv::pipeline::process_frame;
use tris_cv::render::{NullSink, PngSequenceSink};
use tris_cv::session::run_game;

use CellValue::{Empty as E, PlayerA as A, PlayerB as B};

struct Frames(VecDeque<RgbImage>);

impl FrameSource for Frames {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, FrameError> {
        Ok(self.0.pop_front())
    }
}

/// Human plays A, computer plays B; each position is shown twice, once for
/// the human's move and once for the computer's reply.
fn script() -> Vec<RgbImage> {
    let p1 = [[A, A, E], [E, B, E], [E, E, E]];
    let p2 = [[A, A, B], [E, B, E], [A, E, E]];
    let p3 = [[A, A, B], [B, B, E], [A, E, A]];
    let done = [[A, A, B], [B, B, B], [A, E, A]];
    vec![
        common::photograph(p1),
        common::empty_table(),
        common::photograph(p1),
        common::photograph(p2),
        common::photograph(p2),
        common::photograph(p3),
        common::photograph(p3),
        common::photograph(done),
        common::photograph(p1),
    ]
}

#[test]
fn photographed_board_is_read_and_rectified() {
    let cells = [[A, E, B], [E, B, E], [E, A, E]];
    let cfg = common::config();
    let analysis = process_frame(&common::photograph(cells), &cfg).expect("board found");

    assert_eq!(analysis.reading.board, Board::from_rows(cells), "\n{}", analysis.reading.board);
    for (p, (x, y)) in analysis
        .rectification
        .corners
        .points()
        .iter()
        .zip(common::FRAME_CORNERS)
    {
        assert_abs_diff_eq!(p.x, x, epsilon = 3.0);
        assert_abs_diff_eq!(p.y, y, epsilon = 3.0);
    }
    assert_eq!(analysis.board_image.dimensions(), (240, 240));
}

#[test]
fn computer_blocks_then_wins_over_a_frame_sequence() {
    let cfg = common::config();
    let mut source = Frames(script().into());
    let mut rng = SmallRng::seed_from_u64(11);

    let summary = run_game(&mut source, &mut NullSink, &cfg, &mut rng).expect("run");

    // The trailing frame is never consumed once the game is over.
    assert_eq!(source.0.len(), 1);
    assert_eq!(summary.frames, 8);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.reports.len(), 7);

    let players: Vec<Player> = summary.reports.iter().map(|r| r.player).collect();
    use Player::{A as PA, B as PB};
    assert_eq!(players, [PA, PB, PA, PB, PA, PB, PA]);

    let decisions: Vec<_> = summary
        .reports
        .iter()
        .filter_map(|r| r.decision)
        .map(|d| (d.mv, d.reason))
        .collect();
    assert_eq!(
        decisions,
        [
            (Move::new(0, 2), MoveReason::Block),
            (Move::new(1, 0), MoveReason::Block),
            (Move::new(1, 2), MoveReason::Win),
        ]
    );

    match summary.outcome {
        Some(GameStatus::Won(line)) => {
            assert_eq!(line.player, Player::B);
            assert_eq!(line.cells, [Move::new(1, 0), Move::new(1, 1), Move::new(1, 2)]);
        }
        other => panic!("expected a win for B, got {other:?}"),
    }
}

#[test]
fn frames_on_disk_produce_annotated_pngs() {
    let input = tempfile::tempdir().expect("tempdir");
    let output = tempfile::tempdir().expect("tempdir");
    let positions = [
        [[A, A, E], [E, B, E], [E, E, E]],
        [[A, A, E], [E, B, E], [E, E, E]],
    ];
    for (i, cells) in positions.into_iter().enumerate() {
        common::photograph(cells)
            .save(input.path().join(format!("{i:03}.png")))
            .expect("save frame");
    }

    let cfg = common::config();
    let mut source = ImageSequence::from_dir(input.path()).expect("sequence");
    assert_eq!(source.len(), 2);
    let mut sink = PngSequenceSink::new(output.path()).expect("sink");
    let mut rng = SmallRng::seed_from_u64(5);

    let summary = run_game(&mut source, &mut sink, &cfg, &mut rng).expect("run");
    assert_eq!(summary.reports.len(), 2);
    assert_eq!(summary.outcome, None);
    assert_eq!(sink.written(), 2);

    let first = image::open(output.path().join("frame_0001.png"))
        .expect("written")
        .to_rgb8();
    assert_eq!(first.width(), cfg.frame_width);
    assert_eq!(first.height(), 2 * cfg.frame_height);

    // The photographs are gray, so line-coloured pixels in the top half can
    // only come from the board outline.
    let outline = (0..cfg.frame_height)
        .flat_map(|y| (0..cfg.frame_width).map(move |x| (x, y)))
        .filter(|&(x, y)| first.get_pixel(x, y).0 == cfg.line_color)
        .count();
    assert!(outline > 500, "outline pixels: {outline}");
}
