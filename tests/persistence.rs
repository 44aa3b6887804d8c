//! Scores and settings surviving a restart through the on-disk store

use flappy_axolotl::audio::ToneRecorder;
use flappy_axolotl::highscores::{self, HighScores, MAX_HIGH_SCORES};
use flappy_axolotl::persistence::{FileStorage, Storage};
use flappy_axolotl::sim::GameMode;
use flappy_axolotl::{App, InputEvent, QualityPreset, Settings};

#[test]
fn leaderboard_reloads_sorted_and_capped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");

    let mut storage = FileStorage::open(&path).unwrap();
    let mut scores = HighScores::new();
    for (i, score) in [5u64, 40, 12, 40, 3, 27, 8, 19, 33, 1, 22, 14].iter().enumerate() {
        let initials = format!("P{:02}", i);
        scores.add(&initials, *score);
    }
    scores.save(&mut storage).unwrap();

    let reopened = FileStorage::open(&path).unwrap();
    let loaded = HighScores::load(&reopened);
    assert_eq!(loaded.len(), MAX_HIGH_SCORES);
    assert_eq!(loaded.top_score(), Some(40));
    // The first 40 was inserted earlier and keeps the higher rank
    assert_eq!(loaded.entries[0].initials, "P01");
    assert_eq!(loaded.entries[1].initials, "P03");
    assert!(loaded.entries.windows(2).all(|w| w[0].score >= w[1].score));
    assert_eq!(loaded.entries.last().map(|e| e.score), Some(5));
}

#[test]
fn best_score_and_settings_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("save.json");

    {
        let mut storage = FileStorage::open(&path).unwrap();
        highscores::save_best_score(&mut storage, 77).unwrap();
        let settings = Settings {
            quality: QualityPreset::Low,
            music_volume: 0.25,
            ..Default::default()
        };
        settings.save(&mut storage).unwrap();
    }

    let storage = FileStorage::open(&path).unwrap();
    assert_eq!(highscores::load_best_score(&storage), 77);
    let settings = Settings::load(&storage);
    assert_eq!(settings.quality, QualityPreset::Low);
    assert!((settings.music_volume - 0.25).abs() < 1e-6);
}

#[test]
fn corrupt_save_file_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");
    std::fs::write(&path, "{ not json").unwrap();

    let storage = FileStorage::open(&path).unwrap();
    assert_eq!(storage.get(highscores::LEADERBOARD_KEY).unwrap(), None);
    assert!(HighScores::load(&storage).is_empty());
}

#[test]
fn submitted_initials_reach_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");

    let mut app = App::new(9, FileStorage::open(&path).unwrap(), ToneRecorder::default());
    let mut now = 0.0;
    let mut step = |app: &mut App<FileStorage, ToneRecorder>, event: Option<InputEvent>| {
        if let Some(event) = event {
            app.handle_input(event);
        }
        app.step(now);
        now += 16.0;
    };

    // Start a run and let the axolotl sink to the floor until the run ends
    step(&mut app, Some(InputEvent::Activate));
    let mut guard = 0;
    while app.state().mode == GameMode::Playing && guard < 10_000 {
        step(&mut app, None);
        guard += 1;
    }
    assert_eq!(app.state().mode, GameMode::GameOver);

    // An empty board takes any score, zero included
    step(&mut app, Some(InputEvent::Activate));
    assert_eq!(app.state().mode, GameMode::NameEntry);
    step(&mut app, Some(InputEvent::Up));
    step(&mut app, Some(InputEvent::Confirm));
    assert_eq!(app.state().mode, GameMode::Leaderboard);

    let reopened = FileStorage::open(&path).unwrap();
    let loaded = HighScores::load(&reopened);
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.entries[0].initials, "BAA");
    assert_eq!(loaded.entries[0].score, app.state().score);
}
