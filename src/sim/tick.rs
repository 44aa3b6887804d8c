//! Per-frame simulation tick
//!
//! Handles input for the current mode, then advances a playing run in a
//! fixed order: timers, spawning, entities, collisions, bookkeeping.

use super::director::{self, is_boss_boundary};
use super::state::{BonusLife, Collectible, GameEvent, GameMode, GameState, NameEntry};
use super::{autopilot, collision, powerup};
use super::powerup::PowerUpKind;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Click, tap or space
    pub activate: bool,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Enter
    pub confirm: bool,
    /// Demo mode: the autopilot adds its own input
    pub autopilot: bool,
    /// Debug: apply a power-up immediately
    pub grant: Option<PowerUpKind>,
}

impl TickInput {
    fn any_press(&self) -> bool {
        self.activate || self.up || self.down || self.left || self.right || self.confirm
    }
}

/// Advance the game by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Background keeps moving on every screen
    state.ambience.update();

    let mut input = input.clone();
    if input.autopilot {
        let auto = autopilot::drive(state);
        input.activate |= auto.activate;
        input.confirm |= auto.confirm;
    }

    match state.mode {
        GameMode::Start => {
            if input.activate || input.confirm {
                state.start_run();
            }
        }
        GameMode::Playing => {
            if input.activate {
                state.player.flap();
                state.push_event(GameEvent::Flap);
            }
        }
        GameMode::GameOver => {
            if input.activate {
                if state.high_scores.qualifies(state.score) {
                    state.mode = GameMode::NameEntry;
                    state.name_entry = NameEntry::default();
                    log::info!("Score {} qualifies, entering initials", state.score);
                } else {
                    state.start_run();
                }
            }
        }
        GameMode::NameEntry => handle_name_entry(state, &input),
        GameMode::Leaderboard => {
            if input.any_press() {
                state.start_run();
            }
        }
    }

    if state.mode != GameMode::Playing {
        return;
    }

    if let Some(kind) = input.grant {
        powerup::activate(state, kind);
        state.push_event(GameEvent::PowerUpCollected(kind));
        log::info!("Granted power-up {}", kind.tag());
    }

    update_playing(state);
}

fn handle_name_entry(state: &mut GameState, input: &TickInput) {
    let entry = &mut state.name_entry;
    if input.up {
        entry.cycle_up();
    }
    if input.down {
        entry.cycle_down();
    }
    if input.left {
        entry.move_left();
    }
    if input.right {
        entry.move_right();
    }
    if input.confirm {
        let initials = entry.initials();
        state.last_rank = state.high_scores.add(&initials, state.score);
        state.mode = GameMode::Leaderboard;
        state.push_event(GameEvent::LeaderboardChanged);
        log::info!(
            "{} recorded {} at rank {:?}",
            initials,
            state.score,
            state.last_rank.map(|r| r + 1)
        );
    }
}

fn update_playing(state: &mut GameState) {
    // Player and timers
    state.player.update();
    state.invulnerable_ticks = state.invulnerable_ticks.saturating_sub(1);
    powerup::tick_timer(state);

    director::update(state);

    // Barriers scroll with the world; passing one scores
    let speed = state.scroll_speed();
    for obstacle in &mut state.obstacles {
        obstacle.update(speed);
    }
    let before = state.obstacles.len();
    state.obstacles.retain(|o| !o.is_off_screen());
    let passed = before - state.obstacles.len();

    for collectible in &mut state.collectibles {
        collectible.update();
    }
    for bonus in &mut state.bonus_lives {
        bonus.update();
    }

    update_dropper(state);

    // Before the boss, so hazards handed over on its exit tick move once
    for hazard in &mut state.persistent_hazards {
        hazard.update();
    }
    state.persistent_hazards.retain(|h| !h.is_expired());
    update_antagonist(state);

    for _ in 0..passed {
        director::on_obstacle_passed(state);
        collision::strike_antagonist(state);
    }

    collision::resolve(state);

    state
        .collectibles
        .retain(|c| !c.collected && !c.is_off_screen());
    state.bonus_lives.retain(|b| !b.is_off_screen());

    state.ground_offset += state.scroll_speed();
    state.time_ticks += 1;

    if state.score > state.best_score {
        state.best_score = state.score;
        state.push_event(GameEvent::BestScore(state.score));
    }
}

fn update_dropper(state: &mut GameState) {
    let Some(dropper) = state.dropper.as_mut() else {
        return;
    };
    dropper.update();

    if dropper.should_drop(state.player.pos.x) {
        dropper.has_dropped = true;
        let kind = dropper.carries;
        let at = dropper.pos + glam::Vec2::new(0.0, 30.0);
        state.collectibles.push(Collectible::new(at, kind));
        state.events.push(GameEvent::PowerUpDropped(kind));
        log::debug!("Mermaid dropped {}", kind.tag());
    }

    if dropper.is_off_screen() {
        state.dropper = None;
    }
}

fn update_antagonist(state: &mut GameState) {
    let Some(boss) = state.antagonist.as_mut() else {
        return;
    };
    let exited = boss.update(&mut state.rng, &mut state.events);

    if boss.take_defeat_signal() {
        state.bonus_lives.push(BonusLife::new(boss.drop_point()));
    }

    if !exited {
        return;
    }
    let Some(boss) = state.antagonist.take() else {
        return;
    };

    // Leftover hazards outlive their owner
    state.persistent_hazards.extend(boss.hazards);
    state.score += BOSS_DEFEAT_BONUS;
    state.boss_cycle += 1;
    if is_boss_boundary(state.score) {
        state.boss_latch = Some(state.score);
    }
    state.push_event(GameEvent::AntagonistDefeated(boss.kind));
    log::info!("{} left the arena, score {}", boss.kind.name(), state.score);
}
