//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]; cross-run data (leaderboard,
//! best score, RNG streams, ambience) survives [`GameState::reset_run`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ambience::Ambience;
use super::antagonist::{Antagonist, AntagonistKind, Hazard, HazardKind};
use super::collision::Rect;
use super::powerup::{PowerUpKind, PowerUpState};
use crate::consts::*;
use crate::highscores::{HighScores, INITIALS_CHARSET};

/// Top-level game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Title overlay, waiting for the first activate
    Start,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for activate
    GameOver,
    /// Entering initials for a qualifying score
    NameEntry,
    /// Top-10 table
    Leaderboard,
}

/// Gameplay moments the host reacts to (audio cues, persistence)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Flap,
    PlayerHit,
    GameOver,
    PowerUpDropped(PowerUpKind),
    PowerUpCollected(PowerUpKind),
    /// Invincible player brushed through a barrier, hazard or the playfield edge
    InvincibleDeflect,
    BonusLifeCollected,
    AntagonistSpawned(AntagonistKind),
    AntagonistHit { health: u32 },
    AntagonistDefeated(AntagonistKind),
    HazardSpawned(HazardKind),
    MusicStart,
    MusicStop,
    BestScore(u64),
    LeaderboardChanged,
}

/// Player colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerSkin {
    /// Pink axolotl
    #[default]
    Normal,
    /// Invincible star power
    Golden,
}

/// The axolotl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    /// Vertical velocity (positive is down)
    pub velocity: f32,
    /// Current hitbox size
    pub size: Vec2,
    /// Hitbox size without power-ups
    pub base_size: Vec2,
    pub skin: PlayerSkin,
    /// Swim animation phase
    pub anim: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            velocity: 0.0,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            base_size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            skin: PlayerSkin::Normal,
            anim: 0.0,
        }
    }
}

impl Player {
    /// Apply gravity and advance the animation
    pub fn update(&mut self) {
        self.velocity += GRAVITY;
        self.pos.y += self.velocity;
        self.anim += 0.15;
    }

    pub fn flap(&mut self) {
        self.velocity = FLAP_VELOCITY;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Forgiving box used against obstacles
    pub fn obstacle_hitbox(&self) -> Rect {
        self.bounds().inset(OBSTACLE_HITBOX_INSET)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn is_out_of_bounds(&self) -> bool {
        self.pos.y > PLAYER_MAX_Y || self.pos.y < 0.0
    }

    /// Push back into the playfield and kill vertical momentum
    pub fn clamp_to_playfield(&mut self) {
        self.pos.y = self.pos.y.clamp(PLAYER_CLAMP_TOP, PLAYER_MAX_Y);
        self.velocity = 0.0;
    }
}

/// A pair of seaweed barriers with a gap between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    /// Height of the upper barrier
    pub top: f32,
    /// Height of the lower barrier, measured up from the canvas bottom
    pub bottom: f32,
    pub width: f32,
}

impl Obstacle {
    /// Create an obstacle whose gap narrows with difficulty
    pub fn new(x: f32, difficulty: u32, rng: &mut impl Rng) -> Self {
        let gap = gap_for_difficulty(difficulty);
        let top = rng.random::<f32>() * (CANVAS_HEIGHT - gap - 2.0 * OBSTACLE_MARGIN) + OBSTACLE_MARGIN;
        Self::with_gap(x, top, gap)
    }

    pub fn with_gap(x: f32, top: f32, gap: f32) -> Self {
        Self {
            x,
            top,
            bottom: CANVAS_HEIGHT - top - gap - OBSTACLE_MARGIN,
            width: OBSTACLE_WIDTH,
        }
    }

    pub fn update(&mut self, speed: f32) {
        self.x -= speed;
    }

    /// Y where the lower barrier starts
    pub fn lower_edge(&self) -> f32 {
        CANVAS_HEIGHT - self.bottom
    }

    pub fn gap_center(&self) -> f32 {
        (self.top + self.lower_edge()) * 0.5
    }

    pub fn upper_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, self.width, self.top)
    }

    pub fn lower_rect(&self) -> Rect {
        Rect::new(self.x, self.lower_edge(), self.width, self.bottom)
    }

    pub fn hits(&self, hitbox: &Rect) -> bool {
        self.upper_rect().intersects(hitbox) || self.lower_rect().intersects(hitbox)
    }

    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }
}

/// Gap between barriers for a difficulty level, floored at `MIN_GAP`
pub fn gap_for_difficulty(difficulty: u32) -> f32 {
    (MAX_GAP - difficulty as f32 * GAP_SHRINK_PER_LEVEL).max(MIN_GAP)
}

/// A power-up pickup left behind by the mermaid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub collected: bool,
    pub sparkle: f32,
    pub rotation: f32,
}

impl Collectible {
    pub fn new(pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            pos,
            kind,
            collected: false,
            sparkle: 0.0,
            rotation: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.pos.x -= PICKUP_DRIFT;
        self.sparkle += 0.1;
        self.rotation += 0.05;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, COLLECTIBLE_SIZE, COLLECTIBLE_SIZE)
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x + COLLECTIBLE_SIZE < 0.0
    }
}

/// Golden heart dropped by a defeated boss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusLife {
    pub pos: Vec2,
    pub sparkle: f32,
    /// Vertical float animation phase
    pub float: f32,
}

impl BonusLife {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            sparkle: 0.0,
            float: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.pos.x -= PICKUP_DRIFT;
        self.sparkle += 0.15;
        self.float += 0.08;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, BONUS_LIFE_SIZE, BONUS_LIFE_SIZE)
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x + BONUS_LIFE_SIZE < 0.0
    }
}

/// The mermaid who swims past and drops a power-up ahead of the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dropper {
    pub pos: Vec2,
    pub carries: PowerUpKind,
    pub has_dropped: bool,
    pub anim: f32,
}

impl Dropper {
    pub fn new(y: f32, carries: PowerUpKind) -> Self {
        Self {
            pos: Vec2::new(CANVAS_WIDTH + 50.0, y),
            carries,
            has_dropped: false,
            anim: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.pos.x -= DROPPER_SPEED;
        self.anim += 0.12;
    }

    /// Drop far enough ahead that the player has to chase the pickup
    pub fn should_drop(&self, player_x: f32) -> bool {
        let ahead = self.pos.x - player_x;
        !self.has_dropped && ahead < DROP_RANGE_MAX && ahead > DROP_RANGE_MIN
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x + DROPPER_WIDTH < -50.0
    }
}

/// Initials being entered after a qualifying run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NameEntry {
    /// Index into `INITIALS_CHARSET` for each slot
    pub slots: [usize; 3],
    pub cursor: usize,
}

impl NameEntry {
    pub fn cycle_up(&mut self) {
        let slot = &mut self.slots[self.cursor];
        *slot = (*slot + 1) % INITIALS_CHARSET.len();
    }

    pub fn cycle_down(&mut self) {
        let slot = &mut self.slots[self.cursor];
        *slot = (*slot + INITIALS_CHARSET.len() - 1) % INITIALS_CHARSET.len();
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(2);
    }

    pub fn letter(&self, slot: usize) -> char {
        INITIALS_CHARSET[self.slots[slot]] as char
    }

    pub fn initials(&self) -> String {
        (0..3).map(|i| self.letter(i)).collect()
    }
}

/// Broken state rules, reported by [`GameState::validate_invariants`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    LivesAboveMax,
    MaxLivesBelowStart,
    NoLivesWhilePlaying,
    AntagonistHealthAboveMax,
    ScrollSpeedOutOfRange,
    DifficultyAboveCap,
    ExpiredPowerUpStillActive,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the gameplay stream was created from
    pub seed: u64,
    /// Gameplay RNG (spawns, gap placement)
    pub(crate) rng: Pcg32,
    pub mode: GameMode,
    /// Playing ticks elapsed in the current run
    pub time_ticks: u64,
    pub player: Player,
    pub lives: u32,
    pub max_lives: u32,
    /// Remaining invulnerability after a hit
    pub invulnerable_ticks: u32,
    pub score: u64,
    /// Best score across runs
    pub best_score: u64,
    pub difficulty: u32,
    /// Difficulty-driven scroll speed before power-up modifiers
    pub base_scroll_speed: f32,
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    pub bonus_lives: Vec<BonusLife>,
    pub dropper: Option<Dropper>,
    /// Ticks until the next mermaid may appear
    pub dropper_countdown: u32,
    pub antagonist: Option<Antagonist>,
    /// Hazards left behind by bosses that already left
    pub persistent_hazards: Vec<Hazard>,
    /// Completed boss fights this run; picks the next variant
    pub boss_cycle: u32,
    /// Score boundary that already produced (or suppressed) a boss
    pub boss_latch: Option<u64>,
    pub power_up: PowerUpState,
    /// Floor scroll distance
    pub ground_offset: f32,
    pub high_scores: HighScores,
    pub name_entry: NameEntry,
    /// Rank (0-based) of the entry submitted this session, for highlighting
    pub last_rank: Option<usize>,
    /// Cosmetic background, never affects gameplay
    pub ambience: Ambience,
    /// Events raised since the host last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed, sitting on the title screen
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let dropper_countdown = roll_dropper_countdown(&mut rng, true);
        Self {
            seed,
            rng,
            mode: GameMode::Start,
            time_ticks: 0,
            player: Player::default(),
            lives: START_LIVES,
            max_lives: START_LIVES,
            invulnerable_ticks: 0,
            score: 0,
            best_score: 0,
            difficulty: 0,
            base_scroll_speed: BASE_SCROLL_SPEED,
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            bonus_lives: Vec::new(),
            dropper: None,
            dropper_countdown,
            antagonist: None,
            persistent_hazards: Vec::new(),
            boss_cycle: 0,
            boss_latch: None,
            power_up: PowerUpState::default(),
            ground_offset: 0.0,
            high_scores: HighScores::new(),
            name_entry: NameEntry::default(),
            last_rank: None,
            ambience: Ambience::new(seed),
            events: Vec::new(),
        }
    }

    /// Clear all per-run state. Leaderboard, best score and RNG streams survive.
    pub fn reset_run(&mut self) {
        self.time_ticks = 0;
        self.player = Player::default();
        self.lives = START_LIVES;
        self.max_lives = START_LIVES;
        self.invulnerable_ticks = 0;
        self.score = 0;
        self.difficulty = 0;
        self.base_scroll_speed = BASE_SCROLL_SPEED;
        self.obstacles.clear();
        self.collectibles.clear();
        self.bonus_lives.clear();
        self.dropper = None;
        self.dropper_countdown = roll_dropper_countdown(&mut self.rng, true);
        self.antagonist = None;
        self.persistent_hazards.clear();
        self.boss_cycle = 0;
        self.boss_latch = None;
        self.power_up = PowerUpState::default();
        self.ground_offset = 0.0;
        self.name_entry = NameEntry::default();
    }

    /// Reset and enter `Playing`
    pub fn start_run(&mut self) {
        self.reset_run();
        self.mode = GameMode::Playing;
        self.events.push(GameEvent::MusicStart);
        log::info!("Run started");
    }

    /// Effective scroll speed including the active power-up's multiplier
    pub fn scroll_speed(&self) -> f32 {
        self.base_scroll_speed * self.power_up.speed_multiplier()
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ticks > 0
    }

    pub fn is_invincible(&self) -> bool {
        self.power_up.is_invincible()
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Remove one life unless protected. Returns true if a life was lost.
    pub fn damage_player(&mut self) -> bool {
        if self.is_invulnerable() || self.is_invincible() {
            return false;
        }

        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::PlayerHit);

        if self.lives == 0 {
            self.mode = GameMode::GameOver;
            self.events.push(GameEvent::GameOver);
            self.events.push(GameEvent::MusicStop);
            log::info!("Game over with score {}", self.score);
        } else {
            self.invulnerable_ticks = INVULNERABLE_TICKS;
        }
        true
    }

    /// Raise max lives by one and heal fully
    pub fn grant_bonus_life(&mut self) {
        self.max_lives += 1;
        self.lives = self.max_lives;
        self.events.push(GameEvent::BonusLifeCollected);
    }

    /// Whether the blink effect hides the player this frame
    pub fn player_blinking(&self) -> bool {
        self.is_invulnerable() && (self.invulnerable_ticks / 10) % 2 == 0
    }

    /// Check state rules that must hold after every tick
    pub fn validate_invariants(&self) -> Result<(), InvariantViolation> {
        if self.lives > self.max_lives {
            return Err(InvariantViolation::LivesAboveMax);
        }
        if self.max_lives < START_LIVES {
            return Err(InvariantViolation::MaxLivesBelowStart);
        }
        if self.mode == GameMode::Playing && self.lives == 0 {
            return Err(InvariantViolation::NoLivesWhilePlaying);
        }
        if let Some(boss) = &self.antagonist {
            if boss.health > boss.max_health {
                return Err(InvariantViolation::AntagonistHealthAboveMax);
            }
        }
        if !(BASE_SCROLL_SPEED..=MAX_SCROLL_SPEED).contains(&self.base_scroll_speed) {
            return Err(InvariantViolation::ScrollSpeedOutOfRange);
        }
        if self.difficulty > MAX_DIFFICULTY {
            return Err(InvariantViolation::DifficultyAboveCap);
        }
        if self.power_up.active.is_some_and(|p| p.remaining == 0) {
            return Err(InvariantViolation::ExpiredPowerUpStillActive);
        }
        Ok(())
    }
}

/// Ticks until the next mermaid; the first one of a run comes sooner
pub(crate) fn roll_dropper_countdown(rng: &mut impl Rng, first: bool) -> u32 {
    if first {
        rng.random_range(300..800)
    } else {
        rng.random_range(500..1300)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(7);
        assert_eq!(state.mode, GameMode::Start);
        assert_eq!(state.lives, 3);
        assert_eq!(state.max_lives, 3);
        assert_eq!(state.scroll_speed(), BASE_SCROLL_SPEED);
        assert!((300..800).contains(&state.dropper_countdown));
        assert_eq!(state.validate_invariants(), Ok(()));
    }

    #[test]
    fn test_gap_shrinks_to_floor() {
        assert_eq!(gap_for_difficulty(0), 200.0);
        assert_eq!(gap_for_difficulty(5), 165.0);
        assert_eq!(gap_for_difficulty(10), 130.0);
        assert_eq!(gap_for_difficulty(12), 130.0);
    }

    #[test]
    fn test_obstacle_geometry() {
        let obstacle = Obstacle::with_gap(100.0, 150.0, 200.0);
        assert_eq!(obstacle.bottom, CANVAS_HEIGHT - 150.0 - 200.0 - 50.0);
        assert_eq!(obstacle.lower_edge(), 400.0);
        assert_eq!(obstacle.gap_center(), 275.0);

        let inside_gap = Rect::new(110.0, 250.0, 40.0, 20.0);
        assert!(!obstacle.hits(&inside_gap));
        let touching_top = Rect::new(110.0, 140.0, 40.0, 20.0);
        assert!(obstacle.hits(&touching_top));
    }

    #[test]
    fn test_obstacle_gap_stays_on_screen() {
        let mut rng = Pcg32::seed_from_u64(3);
        for difficulty in 0..=MAX_DIFFICULTY {
            let obstacle = Obstacle::new(CANVAS_WIDTH, difficulty, &mut rng);
            assert!(obstacle.top >= OBSTACLE_MARGIN);
            assert!(obstacle.bottom >= 0.0);
            assert!(obstacle.lower_edge() - obstacle.top >= gap_for_difficulty(difficulty));
        }
    }

    #[test]
    fn test_damage_grants_invulnerability() {
        let mut state = GameState::new(1);
        state.mode = GameMode::Playing;

        assert!(state.damage_player());
        assert_eq!(state.lives, 2);
        assert_eq!(state.invulnerable_ticks, INVULNERABLE_TICKS);

        assert!(!state.damage_player());
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_last_life_ends_run() {
        let mut state = GameState::new(1);
        state.mode = GameMode::Playing;
        state.lives = 1;

        state.damage_player();
        assert_eq!(state.lives, 0);
        assert_eq!(state.mode, GameMode::GameOver);
        assert!(state.events.contains(&GameEvent::MusicStop));
    }

    #[test]
    fn test_bonus_life_raises_max() {
        let mut state = GameState::new(1);
        state.lives = 1;
        state.grant_bonus_life();
        assert_eq!(state.max_lives, 4);
        assert_eq!(state.lives, 4);
    }

    #[test]
    fn test_name_entry_wraps_and_clamps() {
        let mut entry = NameEntry::default();
        assert_eq!(entry.initials(), "AAA");

        entry.cycle_down();
        assert_eq!(entry.letter(0), '9');
        entry.cycle_up();
        entry.cycle_up();
        assert_eq!(entry.letter(0), 'B');

        entry.move_left();
        assert_eq!(entry.cursor, 0);
        entry.move_right();
        entry.move_right();
        entry.move_right();
        assert_eq!(entry.cursor, 2);
        entry.cycle_up();
        assert_eq!(entry.initials(), "BAB");
    }

    #[test]
    fn test_dropper_drop_window() {
        let mut dropper = Dropper::new(200.0, PowerUpKind::Slow);
        assert!(!dropper.should_drop(PLAYER_START_X));
        dropper.pos.x = PLAYER_START_X + 200.0;
        assert!(dropper.should_drop(PLAYER_START_X));
        dropper.has_dropped = true;
        assert!(!dropper.should_drop(PLAYER_START_X));
    }
}
