use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tris_cv::core::{Board, CellValue, Player};
use tris_cv::detect::{read_board, rectify};
use tris_cv::engine::{decide, PlayerEncoding};
use tris_cv::pipeline::{process_frame, to_gray};

#[path = "../tests/common/mod.rs"]
mod common;

use CellValue::{Empty as E, PlayerA as A, PlayerB as B};

const CELLS: [[CellValue; 3]; 3] = [[A, E, B], [E, B, E], [E, A, E]];

fn bench_process_frame(c: &mut Criterion) {
    let cfg = common::config();
    let frame = common::photograph(CELLS);
    c.bench_function("process_frame 240x240", |b| {
        b.iter(|| process_frame(black_box(&frame), &cfg).expect("board"))
    });
}

fn bench_stages(c: &mut Criterion) {
    let cfg = common::config();
    let gray = to_gray(&common::photograph(CELLS));
    let view = tris_cv::pipeline::gray_view(&gray);
    let rect_params = cfg.rectifier_params();
    let cls_params = cfg.classifier_params();

    c.bench_function("rectify", |b| {
        b.iter(|| rectify(black_box(&view), &rect_params).expect("quad"))
    });

    let rect = rectify(&view, &rect_params).expect("quad");
    c.bench_function("read_board", |b| {
        b.iter(|| read_board(black_box(&rect.rect.view()), &cls_params))
    });
}

fn bench_decide(c: &mut Criterion) {
    let board = Board::from_rows([[A, E, E], [E, B, E], [E, E, E]]);
    let encoding = PlayerEncoding::default();
    let mut rng = SmallRng::seed_from_u64(7);
    c.bench_function("decide", |b| {
        b.iter(|| decide(black_box(&board), &encoding, Player::A, Player::B, &mut rng))
    });
}

criterion_group!(benches, bench_process_frame, bench_stages, bench_decide);
criterion_main!(benches);
