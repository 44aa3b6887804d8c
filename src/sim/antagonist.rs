//! Bosses and the hazards they deploy
//!
//! Both boss variants share one state machine and damage contract; they
//! differ only by their [`AntagonistProfile`].

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::GameEvent;
use crate::consts::*;

/// Boss variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AntagonistKind {
    /// Scuba diver throwing nets
    Diver,
    /// Dolphin dropping whirlpools
    Dolphin,
}

/// Per-variant movement and attack parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AntagonistProfile {
    pub size: Vec2,
    /// Vertical bob per tick is `sin(anim) * bob_amplitude`
    pub bob_amplitude: f32,
    /// Animation phase advance per tick
    pub anim_rate: f32,
    pub hazard: HazardKind,
}

impl AntagonistKind {
    /// Variants alternate, starting with the diver
    pub fn for_cycle(cycle: u32) -> Self {
        if cycle % 2 == 0 {
            AntagonistKind::Diver
        } else {
            AntagonistKind::Dolphin
        }
    }

    pub fn profile(self) -> AntagonistProfile {
        match self {
            AntagonistKind::Diver => AntagonistProfile {
                size: Vec2::new(100.0, 120.0),
                bob_amplitude: 1.0,
                anim_rate: 0.05,
                hazard: HazardKind::Net,
            },
            AntagonistKind::Dolphin => AntagonistProfile {
                size: Vec2::new(100.0, 80.0),
                bob_amplitude: 2.0,
                anim_rate: 0.08,
                hazard: HazardKind::Whirlpool,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AntagonistKind::Diver => "Scuba Diver",
            AntagonistKind::Dolphin => "Dolphin",
        }
    }
}

/// Boss phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AntagonistPhase {
    /// Sliding in from the right edge
    Entering,
    /// Hovering and deploying hazards
    Attacking,
    /// Defeated, swimming up and out
    Leaving,
}

/// Hazard variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Net,
    Whirlpool,
}

/// A slow-drifting boss attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub kind: HazardKind,
    /// Centre of the hazard
    pub pos: Vec2,
    /// Ticks since deployment
    pub age: u32,
    /// Collidable once the deploy spin has finished
    pub armed: bool,
    pub rotation: f32,
}

impl Hazard {
    pub fn new(kind: HazardKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            age: 0,
            armed: false,
            rotation: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.age += 1;
        if !self.armed {
            if self.age < HAZARD_ARM_TICKS {
                self.rotation += match self.kind {
                    HazardKind::Net => 0.3,
                    HazardKind::Whirlpool => 0.5,
                };
            } else {
                self.armed = true;
                if self.kind == HazardKind::Net {
                    self.rotation = 0.0;
                }
            }
        }
        if self.kind == HazardKind::Whirlpool {
            self.rotation += 0.15;
        }
        self.pos.x -= HAZARD_DRIFT;
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(HAZARD_SIZE))
    }

    /// Deploy progress in [0, 1] for the expand animation
    pub fn deploy_progress(&self) -> f32 {
        (self.age as f32 / HAZARD_ARM_TICKS as f32).min(1.0)
    }

    /// Past its lifetime or fully off the left edge
    pub fn is_expired(&self) -> bool {
        self.age >= HAZARD_LIFETIME_TICKS || self.pos.x + HAZARD_SIZE * 0.5 < 0.0
    }
}

/// A boss encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Antagonist {
    pub kind: AntagonistKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub phase: AntagonistPhase,
    /// Hazards this boss deployed and still owns
    pub hazards: Vec<Hazard>,
    /// Ticks spent attacking; drives the attack cadence
    pub attack_ticks: u32,
    pub anim: f32,
    /// Raised once on the Attacking -> Leaving transition
    just_defeated: bool,
}

impl Antagonist {
    /// Spawn just past the right edge at height `y`
    pub fn spawn(kind: AntagonistKind, y: f32) -> Self {
        Self {
            kind,
            pos: Vec2::new(CANVAS_WIDTH + 100.0, y),
            size: kind.profile().size,
            health: BOSS_MAX_HEALTH,
            max_health: BOSS_MAX_HEALTH,
            phase: AntagonistPhase::Entering,
            hazards: Vec::new(),
            attack_ticks: 0,
            anim: 0.0,
            just_defeated: false,
        }
    }

    /// Advance one tick. Returns true once the boss has left the arena.
    pub fn update(&mut self, rng: &mut impl Rng, events: &mut Vec<GameEvent>) -> bool {
        let profile = self.kind.profile();
        self.anim += profile.anim_rate;

        let mut exited = false;
        match self.phase {
            AntagonistPhase::Entering => {
                self.pos.x -= BOSS_ENTRY_SPEED;
                if self.pos.x <= BOSS_ENGAGE_X {
                    self.phase = AntagonistPhase::Attacking;
                    log::debug!("{} engaging", self.kind.name());
                }
            }
            AntagonistPhase::Attacking => {
                self.pos.y += self.anim.sin() * profile.bob_amplitude;

                self.attack_ticks += 1;
                if self.attack_ticks % BOSS_ATTACK_INTERVAL == 0 {
                    let y = 100.0 + rng.random::<f32>() * 300.0;
                    self.hazards
                        .push(Hazard::new(profile.hazard, Vec2::new(self.pos.x - 50.0, y)));
                    events.push(GameEvent::HazardSpawned(profile.hazard));
                }

                if self.health == 0 {
                    self.phase = AntagonistPhase::Leaving;
                    self.just_defeated = true;
                    log::info!("{} defeated, retreating", self.kind.name());
                }
            }
            AntagonistPhase::Leaving => {
                self.pos.y -= BOSS_EXIT_SPEED;
                exited = self.pos.y < BOSS_EXIT_Y;
            }
        }

        for hazard in &mut self.hazards {
            hazard.update();
        }
        self.hazards.retain(|h| !h.is_expired());

        exited
    }

    /// Remove one health point. Returns true if the hit landed.
    pub fn take_damage(&mut self) -> bool {
        if self.health == 0 {
            return false;
        }
        self.health -= 1;
        true
    }

    /// Consume the one-shot defeat signal
    pub fn take_defeat_signal(&mut self) -> bool {
        std::mem::take(&mut self.just_defeated)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Where the bonus life appears when this boss is beaten
    pub fn drop_point(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y + self.size.y / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn engaged(kind: AntagonistKind) -> Antagonist {
        let mut boss = Antagonist::spawn(kind, 200.0);
        boss.pos.x = BOSS_ENGAGE_X;
        boss.phase = AntagonistPhase::Attacking;
        boss
    }

    #[test]
    fn test_variants_alternate() {
        assert_eq!(AntagonistKind::for_cycle(0), AntagonistKind::Diver);
        assert_eq!(AntagonistKind::for_cycle(1), AntagonistKind::Dolphin);
        assert_eq!(AntagonistKind::for_cycle(2), AntagonistKind::Diver);
    }

    #[test]
    fn test_enters_then_attacks() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = Vec::new();
        let mut boss = Antagonist::spawn(AntagonistKind::Diver, 200.0);

        // 250 px to cover at 3 px/tick
        for _ in 0..83 {
            boss.update(&mut rng, &mut events);
            assert_eq!(boss.phase, AntagonistPhase::Entering);
        }
        boss.update(&mut rng, &mut events);
        assert_eq!(boss.phase, AntagonistPhase::Attacking);
    }

    #[test]
    fn test_attack_cadence() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = Vec::new();
        let mut boss = engaged(AntagonistKind::Dolphin);

        for _ in 0..BOSS_ATTACK_INTERVAL - 1 {
            boss.update(&mut rng, &mut events);
        }
        assert!(boss.hazards.is_empty());
        boss.update(&mut rng, &mut events);
        assert_eq!(boss.hazards.len(), 1);
        assert_eq!(boss.hazards[0].kind, HazardKind::Whirlpool);
        assert_eq!(events, vec![GameEvent::HazardSpawned(HazardKind::Whirlpool)]);
    }

    #[test]
    fn test_health_saturates_and_defeat_signal_is_one_shot() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = Vec::new();
        let mut boss = engaged(AntagonistKind::Diver);

        for _ in 0..BOSS_MAX_HEALTH {
            assert!(boss.take_damage());
        }
        assert!(!boss.take_damage());
        assert_eq!(boss.health, 0);

        boss.update(&mut rng, &mut events);
        assert_eq!(boss.phase, AntagonistPhase::Leaving);
        assert!(boss.take_defeat_signal());
        assert!(!boss.take_defeat_signal());

        boss.update(&mut rng, &mut events);
        assert!(!boss.take_defeat_signal());
    }

    #[test]
    fn test_leaving_exits_above_screen() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = Vec::new();
        let mut boss = engaged(AntagonistKind::Diver);
        boss.phase = AntagonistPhase::Leaving;
        boss.pos.y = BOSS_EXIT_Y + 4.0;

        assert!(!boss.update(&mut rng, &mut events));
        assert!(boss.update(&mut rng, &mut events));
    }

    #[test]
    fn test_hazard_arms_then_expires() {
        let mut hazard = Hazard::new(HazardKind::Net, Vec2::new(400.0, 200.0));
        for _ in 0..HAZARD_ARM_TICKS - 1 {
            hazard.update();
        }
        assert!(!hazard.armed);
        hazard.update();
        assert!(hazard.armed);

        for _ in HAZARD_ARM_TICKS..HAZARD_LIFETIME_TICKS {
            hazard.update();
        }
        assert!(hazard.is_expired());
        assert!((hazard.pos.x - (400.0 - HAZARD_DRIFT * HAZARD_LIFETIME_TICKS as f32)).abs() < 0.01);
    }
}
