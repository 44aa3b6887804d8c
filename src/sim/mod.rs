//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, every timer counted in ticks
//! - Seeded RNG only, with cosmetics on their own stream
//! - No rendering or platform dependencies

pub mod ambience;
pub mod antagonist;
pub mod autopilot;
pub mod collision;
pub mod director;
pub mod powerup;
pub mod state;
pub mod tick;

pub use antagonist::{Antagonist, AntagonistKind, AntagonistPhase, Hazard, HazardKind};
pub use collision::Rect;
pub use powerup::{PowerUpKind, PowerUpState};
pub use state::{
    BonusLife, Collectible, Dropper, GameEvent, GameMode, GameState, InvariantViolation,
    NameEntry, Obstacle, Player, PlayerSkin,
};
pub use tick::{TickInput, tick};
