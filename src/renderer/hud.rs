//! HUD and mode overlays

use glam::Vec2;

use super::shapes;
use super::{Color, DrawList, TextAlign, ViewOptions};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::sim::{AntagonistPhase, GameMode, GameState};

const PANEL: Color = Color::rgba(10, 30, 60, 0.9);
const BLUE: Color = Color::hex(0x4a9eff);
const GOLD: Color = Color::hex(0xffcc00);
const HEART: Color = Color::hex(0xff4a6a);
const HEART_EDGE: Color = Color::hex(0xcc2040);

const HEART_SIZE: f32 = 20.0;
const HEART_SPACING: f32 = 25.0;
const HEART_Y: f32 = 80.0;

/// Score, best, hearts, power-up timer, boss banner and fps
pub fn draw_hud(list: &mut DrawList, state: &GameState, opts: &ViewOptions) {
    list.outlined_text(
        format!("Score: {}", state.score),
        Vec2::new(10.0, 30.0),
        24.0,
        Color::WHITE,
        TextAlign::Left,
        3.0,
    );
    list.outlined_text(
        format!("High: {}", state.best_score),
        Vec2::new(10.0, 55.0),
        16.0,
        Color::WHITE,
        TextAlign::Left,
        3.0,
    );

    for i in 0..state.max_lives {
        let top = Vec2::new(10.0 + i as f32 * HEART_SPACING + HEART_SIZE / 2.0, HEART_Y);
        let (fill, edge) = if i < state.lives {
            (HEART, HEART_EDGE)
        } else {
            (HEART.with_alpha(0.3), HEART_EDGE.with_alpha(0.5))
        };
        list.outlined_polygon(shapes::heart(top, HEART_SIZE), fill, edge, 2.0);
    }

    if let (Some(kind), Some(secs)) = (state.power_up.kind(), state.power_up.remaining_secs()) {
        list.outlined_text(
            format!("{}: {}s", kind.label(), secs),
            Vec2::new(10.0, HEART_Y + HEART_SIZE + 20.0),
            14.0,
            Color::WHITE,
            TextAlign::Left,
            3.0,
        );
    }

    let entering = state
        .antagonist
        .as_ref()
        .filter(|boss| boss.phase == AntagonistPhase::Entering);
    if let Some(boss) = entering {
        list.outlined_text(
            "BOSS FIGHT!",
            Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0),
            48.0,
            Color::rgba(255, 74, 74, 0.8),
            TextAlign::Center,
            5.0,
        );
        list.outlined_text(
            boss.kind.name(),
            Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0 + 40.0),
            20.0,
            Color::WHITE,
            TextAlign::Center,
            3.0,
        );
    }

    if let Some(fps) = opts.fps {
        list.text(
            format!("FPS: {fps:.0}"),
            Vec2::new(CANVAS_WIDTH - 10.0, 20.0),
            14.0,
            Color::WHITE,
            TextAlign::Right,
        );
    }
}

/// Dialog for the current mode, if any
pub fn draw_overlay(list: &mut DrawList, state: &GameState) {
    match state.mode {
        GameMode::Playing => {}
        GameMode::Start => draw_dialog(list, "Flappy Axolotl", &["Click to Start".to_string()]),
        GameMode::GameOver => draw_dialog(
            list,
            "Game Over",
            &[
                format!("Score: {}", state.score),
                format!("High Score: {}", state.best_score),
                "Click to Restart".to_string(),
            ],
        ),
        GameMode::NameEntry => draw_name_entry(list, state),
        GameMode::Leaderboard => draw_leaderboard(list, state),
    }
}

fn draw_dialog(list: &mut DrawList, title: &str, lines: &[String]) {
    let cx = CANVAS_WIDTH / 2.0;
    let cy = CANVAS_HEIGHT / 2.0;

    list.fill_rect(50.0, cy - 100.0, CANVAS_WIDTH - 100.0, 180.0, Color::rgba(10, 30, 60, 0.85));
    list.stroke_rect(50.0, cy - 100.0, CANVAS_WIDTH - 100.0, 180.0, BLUE, 4.0);
    list.stroke_rect(54.0, cy - 96.0, CANVAS_WIDTH - 108.0, 172.0, Color::hex(0x2a5fcf), 2.0);

    list.outlined_text(title, Vec2::new(cx, cy - 50.0), 36.0, Color::WHITE, TextAlign::Center, 4.0);
    for (i, line) in lines.iter().enumerate() {
        list.outlined_text(
            line.as_str(),
            Vec2::new(cx, cy - 10.0 + i as f32 * 30.0),
            20.0,
            Color::WHITE,
            TextAlign::Center,
            4.0,
        );
    }
}

fn draw_name_entry(list: &mut DrawList, state: &GameState) {
    const BOX_W: f32 = 50.0;
    const BOX_H: f32 = 60.0;
    const GAP: f32 = 20.0;

    let cx = CANVAS_WIDTH / 2.0;
    let cy = CANVAS_HEIGHT / 2.0;

    list.fill_rect(150.0, cy - 120.0, CANVAS_WIDTH - 300.0, 240.0, PANEL);
    list.stroke_rect(150.0, cy - 120.0, CANVAS_WIDTH - 300.0, 240.0, GOLD, 4.0);

    list.outlined_text("HIGH SCORE!", Vec2::new(cx, cy - 80.0), 32.0, GOLD, TextAlign::Center, 3.0);
    list.outlined_text(
        format!("Score: {}", state.score),
        Vec2::new(cx, cy - 40.0),
        24.0,
        Color::WHITE,
        TextAlign::Center,
        3.0,
    );
    list.outlined_text("Enter Your Initials", Vec2::new(cx, cy - 10.0), 16.0, Color::WHITE, TextAlign::Center, 3.0);

    let entry = &state.name_entry;
    let start_x = cx - (3.0 * BOX_W + 2.0 * GAP) / 2.0;
    let top = cy + 20.0;
    for slot in 0..3 {
        let x = start_x + slot as f32 * (BOX_W + GAP);
        let selected = slot == entry.cursor;
        let (fill, border) = if selected { (BLUE, GOLD) } else { (BLUE.with_alpha(0.3), BLUE) };
        list.fill_rect(x, top, BOX_W, BOX_H, fill);
        list.stroke_rect(x, top, BOX_W, BOX_H, border, 3.0);
        list.outlined_text(
            entry.letter(slot).to_string(),
            Vec2::new(x + BOX_W / 2.0, top + BOX_H / 2.0 + 12.0),
            36.0,
            Color::WHITE,
            TextAlign::Center,
            2.0,
        );
    }

    let hints = ["UP/DOWN: Change Letter", "LEFT/RIGHT: Move Position", "ENTER: Confirm"];
    for (i, hint) in hints.iter().enumerate() {
        list.outlined_text(
            *hint,
            Vec2::new(cx, cy + 110.0 + i as f32 * 20.0),
            14.0,
            Color::WHITE,
            TextAlign::Center,
            3.0,
        );
    }
}

fn draw_leaderboard(list: &mut DrawList, state: &GameState) {
    let left = 150.0;
    let name_x = 300.0;
    let right = CANVAS_WIDTH - 150.0;

    list.fill_rect(100.0, 50.0, CANVAS_WIDTH - 200.0, CANVAS_HEIGHT - 100.0, PANEL);
    list.stroke_rect(100.0, 50.0, CANVAS_WIDTH - 200.0, CANVAS_HEIGHT - 100.0, GOLD, 4.0);
    list.outlined_text(
        "HIGH SCORES",
        Vec2::new(CANVAS_WIDTH / 2.0, 110.0),
        40.0,
        GOLD,
        TextAlign::Center,
        3.0,
    );

    list.outlined_text("RANK", Vec2::new(left, 160.0), 20.0, Color::WHITE, TextAlign::Left, 3.0);
    list.outlined_text("NAME", Vec2::new(name_x, 160.0), 20.0, Color::WHITE, TextAlign::Left, 3.0);
    list.outlined_text("SCORE", Vec2::new(right, 160.0), 20.0, Color::WHITE, TextAlign::Right, 3.0);

    for (rank, entry) in state.high_scores.entries.iter().enumerate() {
        let y = 200.0 + rank as f32 * 35.0;
        let color = if state.last_rank == Some(rank) { GOLD } else { Color::WHITE };
        list.outlined_text(format!("{}.", rank + 1), Vec2::new(left, y), 24.0, color, TextAlign::Left, 3.0);
        list.outlined_text(entry.initials.as_str(), Vec2::new(name_x, y), 24.0, color, TextAlign::Left, 3.0);
        list.outlined_text(entry.score.to_string(), Vec2::new(right, y), 24.0, color, TextAlign::Right, 3.0);
    }

    list.outlined_text(
        "Click to Continue",
        Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT - 80.0),
        18.0,
        Color::WHITE,
        TextAlign::Center,
        3.0,
    );
}
