//! Spawning and the difficulty ramp
//!
//! Decides when barriers, the mermaid and bosses appear. Runs once per
//! playing tick, before entities move.

use rand::Rng;

use super::antagonist::{Antagonist, AntagonistKind};
use super::powerup::PowerUpKind;
use super::state::{Dropper, GameEvent, GameState, Obstacle, roll_dropper_countdown};
use crate::consts::*;

/// Scroll speed for a difficulty level, capped at `MAX_SCROLL_SPEED`
pub fn base_speed_for_difficulty(difficulty: u32) -> f32 {
    (BASE_SCROLL_SPEED + difficulty as f32 * SPEED_PER_LEVEL).min(MAX_SCROLL_SPEED)
}

/// Whether `score` sits on a boss boundary
pub fn is_boss_boundary(score: u64) -> bool {
    score > 0 && score % BOSS_SCORE_INTERVAL == 0
}

/// Run all spawners for this tick
pub fn update(state: &mut GameState) {
    spawn_antagonist(state);
    spawn_dropper(state);
    spawn_obstacle(state);
}

fn spawn_antagonist(state: &mut GameState) {
    // The latch only guards the exact boundary it was taken on
    if state.boss_latch.is_some_and(|score| score != state.score) {
        state.boss_latch = None;
    }

    if !is_boss_boundary(state.score)
        || state.antagonist.is_some()
        || state.boss_latch == Some(state.score)
    {
        return;
    }

    let kind = AntagonistKind::for_cycle(state.boss_cycle);
    let y = 100.0 + state.rng.random::<f32>() * 200.0;
    state.antagonist = Some(Antagonist::spawn(kind, y));
    state.boss_latch = Some(state.score);
    state.push_event(GameEvent::AntagonistSpawned(kind));
    log::info!("{} appears at score {}", kind.name(), state.score);
}

fn spawn_dropper(state: &mut GameState) {
    state.dropper_countdown = state.dropper_countdown.saturating_sub(1);
    if state.dropper_countdown > 0 || state.dropper.is_some() || state.antagonist.is_some() {
        return;
    }

    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    let y = 100.0 + state.rng.random::<f32>() * 300.0;
    state.dropper = Some(Dropper::new(y, kind));
    state.dropper_countdown = roll_dropper_countdown(&mut state.rng, false);
    log::debug!("Mermaid spawned carrying {}", kind.tag());
}

fn spawn_obstacle(state: &mut GameState) {
    let due = state
        .obstacles
        .last()
        .is_none_or(|last| last.x < CANVAS_WIDTH - OBSTACLE_SPACING);
    if due {
        let obstacle = Obstacle::new(CANVAS_WIDTH, state.difficulty, &mut state.rng);
        state.obstacles.push(obstacle);
    }
}

/// Score a passed obstacle and ramp difficulty on every second point
pub fn on_obstacle_passed(state: &mut GameState) {
    state.score += 1;
    if state.score % POINTS_PER_LEVEL == 0 {
        state.difficulty = (state.difficulty + 1).min(MAX_DIFFICULTY);
        state.base_scroll_speed = base_speed_for_difficulty(state.difficulty);
        log::debug!(
            "Difficulty {} at score {}, base speed {:.2}",
            state.difficulty,
            state.score,
            state.base_scroll_speed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::antagonist::AntagonistPhase;
    use crate::sim::state::GameMode;

    fn playing() -> GameState {
        let mut state = GameState::new(5);
        state.start_run();
        state.events.clear();
        state
    }

    #[test]
    fn test_speed_ramp_caps() {
        assert_eq!(base_speed_for_difficulty(0), BASE_SCROLL_SPEED);
        assert!((base_speed_for_difficulty(5) - 2.8).abs() < 1e-5);
        assert_eq!(base_speed_for_difficulty(MAX_DIFFICULTY), MAX_SCROLL_SPEED);
    }

    #[test]
    fn test_difficulty_steps_on_even_scores() {
        let mut state = playing();
        on_obstacle_passed(&mut state);
        assert_eq!(state.difficulty, 0);
        on_obstacle_passed(&mut state);
        assert_eq!(state.difficulty, 1);
        assert_eq!(state.base_scroll_speed, base_speed_for_difficulty(1));

        for _ in 0..40 {
            on_obstacle_passed(&mut state);
        }
        assert_eq!(state.difficulty, MAX_DIFFICULTY);
        assert_eq!(state.base_scroll_speed, MAX_SCROLL_SPEED);
    }

    #[test]
    fn test_obstacle_spacing() {
        let mut state = playing();
        update(&mut state);
        assert_eq!(state.obstacles.len(), 1);
        update(&mut state);
        assert_eq!(state.obstacles.len(), 1);

        state.obstacles[0].x = CANVAS_WIDTH - OBSTACLE_SPACING - 1.0;
        update(&mut state);
        assert_eq!(state.obstacles.len(), 2);
        assert_eq!(state.obstacles[1].x, CANVAS_WIDTH);
    }

    #[test]
    fn test_boss_spawns_once_per_boundary() {
        let mut state = playing();
        state.score = 20;
        update(&mut state);

        let boss = state.antagonist.as_ref().map(|b| (b.kind, b.phase));
        assert_eq!(boss, Some((AntagonistKind::Diver, AntagonistPhase::Entering)));
        assert!(
            state
                .events
                .contains(&GameEvent::AntagonistSpawned(AntagonistKind::Diver))
        );

        // Boss gone but score unchanged: the latch holds
        state.antagonist = None;
        update(&mut state);
        assert!(state.antagonist.is_none());
    }

    #[test]
    fn test_defeat_bonus_on_boundary_is_latched() {
        let mut state = playing();
        state.score = 40;
        state.boss_latch = Some(40);
        update(&mut state);
        assert!(state.antagonist.is_none());

        // Moving off the boundary clears the latch
        state.score = 41;
        update(&mut state);
        assert_eq!(state.boss_latch, None);
    }

    #[test]
    fn test_second_boss_is_dolphin() {
        let mut state = playing();
        state.boss_cycle = 1;
        state.score = 40;
        update(&mut state);
        assert_eq!(
            state.antagonist.as_ref().map(|b| b.kind),
            Some(AntagonistKind::Dolphin)
        );
    }

    #[test]
    fn test_dropper_waits_for_countdown_and_boss() {
        let mut state = playing();
        state.dropper_countdown = 2;
        update(&mut state);
        assert!(state.dropper.is_none());
        update(&mut state);
        assert!(state.dropper.is_some());
        assert!((500..1300).contains(&state.dropper_countdown));

        let mut state = playing();
        state.dropper_countdown = 1;
        state.antagonist = Some(Antagonist::spawn(AntagonistKind::Diver, 150.0));
        update(&mut state);
        assert!(state.dropper.is_none());
        assert_eq!(state.dropper_countdown, 0);

        state.antagonist = None;
        update(&mut state);
        assert!(state.dropper.is_some());
        assert_eq!(state.mode, GameMode::Playing);
    }
}
