//! Power-up kinds and the timed effect state
//!
//! Effects are derived from `PowerUpState` wherever possible (speed
//! multiplier, invincibility), so expiry only has to undo the player-side
//! changes made on activation.

use serde::{Deserialize, Serialize};

use super::state::{GameState, PlayerSkin};
use crate::consts::*;

/// Power-up variant carried by the mermaid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Worm: restore all lives
    Heal,
    /// Halve the scroll speed
    Slow,
    /// Halve the player's hitbox
    Shrink,
    /// Star: pass through barriers, smash hazards
    Invincible,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Heal,
        PowerUpKind::Slow,
        PowerUpKind::Shrink,
        PowerUpKind::Invincible,
    ];

    /// Parse the short tag used by the debug CLI
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "worm" => Some(PowerUpKind::Heal),
            "slow" => Some(PowerUpKind::Slow),
            "small" => Some(PowerUpKind::Shrink),
            "star" => Some(PowerUpKind::Invincible),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            PowerUpKind::Heal => "worm",
            PowerUpKind::Slow => "slow",
            PowerUpKind::Shrink => "small",
            PowerUpKind::Invincible => "star",
        }
    }

    /// HUD label
    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::Heal => "HEAL",
            PowerUpKind::Slow => "SLOW",
            PowerUpKind::Shrink => "SMALL",
            PowerUpKind::Invincible => "STAR",
        }
    }

    /// Effect duration; zero means instant
    pub fn duration_ticks(self) -> u32 {
        match self {
            PowerUpKind::Heal => 0,
            PowerUpKind::Slow => SLOW_TICKS,
            PowerUpKind::Shrink => SHRINK_TICKS,
            PowerUpKind::Invincible => INVINCIBLE_TICKS,
        }
    }
}

/// A timed effect in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub remaining: u32,
}

/// At most one timed effect at a time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpState {
    pub active: Option<ActivePowerUp>,
}

impl PowerUpState {
    /// Multiplier applied on top of the base scroll speed
    pub fn speed_multiplier(&self) -> f32 {
        match self.active.map(|p| p.kind) {
            Some(PowerUpKind::Slow) => SLOW_MULTIPLIER,
            Some(PowerUpKind::Invincible) => INVINCIBLE_MULTIPLIER,
            _ => 1.0,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.active
            .is_some_and(|p| p.kind == PowerUpKind::Invincible)
    }

    pub fn kind(&self) -> Option<PowerUpKind> {
        self.active.map(|p| p.kind)
    }

    /// Whole seconds left, rounded up, for the HUD
    pub fn remaining_secs(&self) -> Option<u32> {
        self.active
            .map(|p| p.remaining.div_ceil(TICK_HZ as u32))
    }
}

/// Apply a power-up, replacing whatever was active
pub fn activate(state: &mut GameState, kind: PowerUpKind) {
    revert(state);

    match kind {
        PowerUpKind::Heal => {
            state.lives = state.max_lives;
        }
        PowerUpKind::Slow => {}
        PowerUpKind::Shrink => {
            state.player.size = state.player.base_size * 0.5;
        }
        PowerUpKind::Invincible => {
            state.player.skin = PlayerSkin::Golden;
        }
    }

    let duration = kind.duration_ticks();
    if duration > 0 {
        state.power_up.active = Some(ActivePowerUp {
            kind,
            remaining: duration,
        });
    }
    log::debug!("Power-up {} activated", kind.tag());
}

/// Count down the active effect, reverting it at zero
pub fn tick_timer(state: &mut GameState) {
    let Some(active) = state.power_up.active.as_mut() else {
        return;
    };
    active.remaining = active.remaining.saturating_sub(1);
    if active.remaining == 0 {
        let kind = active.kind;
        revert(state);
        log::debug!("Power-up {} expired", kind.tag());
    }
}

/// Undo exactly what activation changed
pub fn revert(state: &mut GameState) {
    let Some(active) = state.power_up.active.take() else {
        return;
    };
    match active.kind {
        PowerUpKind::Shrink => state.player.size = state.player.base_size,
        PowerUpKind::Invincible => state.player.skin = PlayerSkin::Normal,
        PowerUpKind::Heal | PowerUpKind::Slow => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_tags_round_trip() {
        for kind in PowerUpKind::ALL {
            assert_eq!(PowerUpKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(PowerUpKind::from_tag("shield"), None);
    }

    #[test]
    fn test_heal_is_instant() {
        let mut state = GameState::new(1);
        state.lives = 1;
        activate(&mut state, PowerUpKind::Heal);
        assert_eq!(state.lives, 3);
        assert!(state.power_up.active.is_none());
    }

    #[test]
    fn test_shrink_and_expire() {
        let mut state = GameState::new(1);
        activate(&mut state, PowerUpKind::Shrink);
        assert_eq!(state.player.size, Vec2::new(25.0, 15.0));

        for _ in 0..SHRINK_TICKS {
            tick_timer(&mut state);
        }
        assert!(state.power_up.active.is_none());
        assert_eq!(state.player.size, state.player.base_size);
    }

    #[test]
    fn test_new_power_up_reverts_previous() {
        let mut state = GameState::new(1);
        activate(&mut state, PowerUpKind::Invincible);
        assert_eq!(state.player.skin, PlayerSkin::Golden);
        assert_eq!(state.scroll_speed(), BASE_SCROLL_SPEED * INVINCIBLE_MULTIPLIER);

        activate(&mut state, PowerUpKind::Shrink);
        assert_eq!(state.player.skin, PlayerSkin::Normal);
        assert_eq!(state.scroll_speed(), BASE_SCROLL_SPEED);
        assert_eq!(state.power_up.kind(), Some(PowerUpKind::Shrink));
    }

    #[test]
    fn test_slow_expiry_keeps_new_base_speed() {
        let mut state = GameState::new(1);
        activate(&mut state, PowerUpKind::Slow);
        state.base_scroll_speed = 3.0;
        assert_eq!(state.scroll_speed(), 1.5);

        for _ in 0..SLOW_TICKS {
            tick_timer(&mut state);
        }
        assert_eq!(state.scroll_speed(), 3.0);
    }

    #[test]
    fn test_remaining_secs_rounds_up() {
        let state = PowerUpState {
            active: Some(ActivePowerUp {
                kind: PowerUpKind::Slow,
                remaining: 61,
            }),
        };
        assert_eq!(state.remaining_secs(), Some(2));
        assert_eq!(PowerUpState::default().remaining_secs(), None);
    }
}
