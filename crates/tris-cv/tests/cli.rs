mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use tris_cv::core::CellValue::{Empty as E, PlayerA as A, PlayerB as B};
use tris_cv::TrisConfig;

fn tris_cv() -> Command {
    Command::cargo_bin("tris-cv").expect("binary built")
}

fn write_config(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("tris.json");
    common::config().write_json(&path).expect("config");
    path
}

#[test]
fn help_lists_subcommands() {
    tris_cv()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("play"))
        .stdout(predicate::str::contains("init-config"));
}

#[test]
fn init_config_writes_loadable_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tris.json");
    tris_cv()
        .arg("init-config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote default config"));
    assert_eq!(TrisConfig::load_json(&path).expect("load"), TrisConfig::default());
}

#[test]
fn analyze_suggests_the_block() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(dir.path());
    let image = dir.path().join("board.png");
    common::photograph([[A, A, E], [E, B, E], [E, E, E]])
        .save(&image)
        .expect("save");
    let annotated = dir.path().join("annotated.png");

    tris_cv()
        .arg("--config")
        .arg(&config)
        .arg("analyze")
        .arg(&image)
        .arg("--out")
        .arg(&annotated)
        .assert()
        .success()
        .stdout(predicate::str::contains("suggested move: (0, 2) (Block)"));
    assert!(annotated.exists());
}

#[test]
fn play_over_an_empty_directory_is_unfinished() {
    let dir = tempfile::tempdir().expect("tempdir");
    tris_cv()
        .arg("play")
        .arg("--frames")
        .arg(dir.path())
        .arg("--seed")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("frames: 0 read: 0 skipped: 0"))
        .stdout(predicate::str::contains("unfinished"));
}

#[test]
fn missing_image_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    tris_cv()
        .arg("analyze")
        .arg(dir.path().join("nope.png"))
        .assert()
        .failure();
}

#[test]
fn play_prints_every_turn_and_the_reply() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(dir.path());
    let frames = dir.path().join("frames");
    std::fs::create_dir(&frames).expect("frames dir");
    let position = [[A, A, E], [E, B, E], [E, E, E]];
    for i in 0..2 {
        common::photograph(position)
            .save(frames.join(format!("{i:03}.png")))
            .expect("save");
    }

    tris_cv()
        .arg("--config")
        .arg(&config)
        .arg("play")
        .arg("--frames")
        .arg(&frames)
        .arg("--seed")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("turn 1 (O)"))
        .stdout(predicate::str::contains("turn 2 (X)"))
        .stdout(predicate::str::contains("O O   \n  X   \n"))
        .stdout(predicate::str::contains("computer plays (0, 2) (Block)"))
        .stdout(predicate::str::contains("frames: 2 read: 2 skipped: 0"));
}
