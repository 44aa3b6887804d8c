//! Collision detection and response
//!
//! Every entity collides as an axis-aligned box; round things (hazards,
//! pickups) use their bounding square.

use glam::Vec2;

use super::antagonist::Hazard;
use super::powerup;
use super::state::{GameEvent, GameMode, GameState};

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x * 0.5, center.y - size.y * 0.5, size.x, size.y)
    }

    /// Shrink by `amount` on every side
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            (self.w - 2.0 * amount).max(0.0),
            (self.h - 2.0 * amount).max(0.0),
        )
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap; touching edges do not count
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// What touching a hazard did to the player
enum HazardContact {
    None,
    Smashed,
    Hit,
}

/// Remove the first armed hazard overlapping `player`
fn consume_hazard(hazards: &mut Vec<Hazard>, player: &Rect, invincible: bool) -> HazardContact {
    let Some(index) = hazards
        .iter()
        .position(|h| h.armed && h.bounds().intersects(player))
    else {
        return HazardContact::None;
    };
    hazards.remove(index);
    if invincible {
        HazardContact::Smashed
    } else {
        HazardContact::Hit
    }
}

/// Apply a hazard contact. Returns false if the run just ended.
fn apply_hazard_contact(state: &mut GameState, contact: HazardContact) -> bool {
    match contact {
        HazardContact::None => {}
        HazardContact::Smashed => state.push_event(GameEvent::InvincibleDeflect),
        HazardContact::Hit => {
            state.damage_player();
        }
    }
    state.mode == GameMode::Playing
}

/// Resolve every player interaction for this tick
///
/// Order: boss hazards, persistent hazards, pickups, bonus lives, playfield
/// bounds, obstacles. Stops as soon as the run ends.
pub fn resolve(state: &mut GameState) {
    if state.mode != GameMode::Playing {
        return;
    }

    // Boss-owned hazards, then leftovers from bosses that already left
    loop {
        let player = state.player.bounds();
        let invincible = state.is_invincible();
        let contact = match state.antagonist.as_mut() {
            Some(boss) => consume_hazard(&mut boss.hazards, &player, invincible),
            None => HazardContact::None,
        };
        if matches!(contact, HazardContact::None) {
            break;
        }
        if !apply_hazard_contact(state, contact) {
            return;
        }
    }
    loop {
        let player = state.player.bounds();
        let invincible = state.is_invincible();
        let contact = consume_hazard(&mut state.persistent_hazards, &player, invincible);
        if matches!(contact, HazardContact::None) {
            break;
        }
        if !apply_hazard_contact(state, contact) {
            return;
        }
    }

    // Power-up pickups
    let player = state.player.bounds();
    let picked: Vec<_> = state
        .collectibles
        .iter_mut()
        .filter(|c| !c.collected && c.bounds().intersects(&player))
        .map(|c| {
            c.collected = true;
            c.kind
        })
        .collect();
    for kind in picked {
        powerup::activate(state, kind);
        state.push_event(GameEvent::PowerUpCollected(kind));
    }

    // Golden hearts
    let player = state.player.bounds();
    let before = state.bonus_lives.len();
    state.bonus_lives.retain(|b| !b.bounds().intersects(&player));
    for _ in state.bonus_lives.len()..before {
        state.grant_bonus_life();
        log::info!("Bonus life collected, max lives now {}", state.max_lives);
    }

    // Playfield edges
    if state.player.is_out_of_bounds() {
        state.player.clamp_to_playfield();
        if state.is_invincible() {
            state.push_event(GameEvent::InvincibleDeflect);
        } else {
            state.damage_player();
            if state.mode != GameMode::Playing {
                return;
            }
        }
    }

    // Seaweed barriers
    let hitbox = state.player.obstacle_hitbox();
    let touching = state.obstacles.iter().filter(|o| o.hits(&hitbox)).count();
    for _ in 0..touching {
        if state.is_invincible() {
            state.push_event(GameEvent::InvincibleDeflect);
        } else {
            state.damage_player();
            if state.mode != GameMode::Playing {
                return;
            }
        }
    }
}

/// One obstacle passed during a boss fight costs the boss a health point
pub fn strike_antagonist(state: &mut GameState) {
    let Some(boss) = state.antagonist.as_mut() else {
        return;
    };
    if boss.take_damage() {
        let health = boss.health;
        log::debug!("{} hit, {} health left", boss.kind.name(), health);
        state.push_event(GameEvent::AntagonistHit { health });
    }
}
