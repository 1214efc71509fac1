use tris_cv::core::Player;
use tris_cv::{ConfigError, TrisConfig};

#[test]
fn written_config_loads_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tris.json");
    let cfg = TrisConfig {
        rotate: true,
        cell_inset: 5,
        computer: Some(Player::A),
        human_starts: false,
        ..TrisConfig::default()
    };
    cfg.write_json(&path).expect("write");

    let loaded = TrisConfig::load_json(&path).expect("load");
    assert_eq!(loaded, cfg);
    assert_eq!(loaded.first_player(), Player::A);
}

#[test]
fn partial_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("partial.json");
    std::fs::write(&path, r#"{ "frame_width": 300, "frame_height": 300, "computer": null }"#)
        .expect("write");

    let cfg = TrisConfig::load_json(&path).expect("load");
    assert_eq!((cfg.frame_width, cfg.frame_height), (300, 300));
    assert_eq!(cfg.computer, None);
    assert_eq!(cfg.param2, TrisConfig::default().param2);
}

#[test]
fn invalid_files_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");

    let missing = dir.path().join("missing.json");
    assert!(matches!(TrisConfig::load_json(&missing), Err(ConfigError::Io { .. })));

    let garbled = dir.path().join("garbled.json");
    std::fs::write(&garbled, "{ frame_width: ").expect("write");
    assert!(matches!(TrisConfig::load_json(&garbled), Err(ConfigError::Json(_))));

    let shared = dir.path().join("shared.json");
    std::fs::write(&shared, r#"{ "player_a_code": 4, "player_b_code": 6 }"#).expect("write");
    assert!(matches!(TrisConfig::load_json(&shared), Err(ConfigError::Encoding(_))));
}
