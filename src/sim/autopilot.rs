//! Demo player
//!
//! Produces input the way a cautious human would: aim for the middle of the
//! next gap and click straight through every menu.

use super::state::{GameMode, GameState};
use super::tick::TickInput;
use crate::consts::*;

/// Flap once the axolotl sinks this far below its target
const SINK_TOLERANCE: f32 = 12.0;
/// Never flap this close to the ceiling
const CEILING_GUARD: f32 = 60.0;

/// Height the autopilot tries to hold
pub fn target_y(state: &GameState) -> f32 {
    let player_x = state.player.pos.x;
    state
        .obstacles
        .iter()
        .find(|o| o.x + o.width > player_x)
        .map(|o| o.gap_center())
        .unwrap_or((CANVAS_HEIGHT - FLOOR_HEIGHT) * 0.5)
}

/// Input for this tick
pub fn drive(state: &GameState) -> TickInput {
    match state.mode {
        GameMode::Playing => {
            let player = &state.player;
            let below_target = player.center().y > target_y(state) + SINK_TOLERANCE;
            let falling = player.velocity >= 0.0;
            TickInput {
                activate: below_target && falling && player.pos.y > CEILING_GUARD,
                ..Default::default()
            }
        }
        GameMode::NameEntry => TickInput {
            confirm: true,
            ..Default::default()
        },
        GameMode::Start | GameMode::GameOver | GameMode::Leaderboard => TickInput {
            activate: true,
            ..Default::default()
        },
    }
}
