//! Cosmetic background: rising bubbles and parallax sea life
//!
//! Runs on its own RNG stream so nothing here can shift gameplay spawns.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

pub const BUBBLE_COUNT: usize = 30;
pub const ELEMENTS_PER_LAYER: usize = 5;
pub const LAYER_COUNT: u8 = 3;

/// Scroll speed per parallax layer (far to near)
pub const LAYER_SPEEDS: [f32; 3] = [0.3, 0.6, 1.0];
/// Scale per parallax layer
pub const LAYER_SCALES: [f32; 3] = [0.6, 0.8, 1.0];
/// Opacity per parallax layer
pub const LAYER_ALPHAS: [f32; 3] = [0.4, 0.6, 0.8];

// Separate stream id from the gameplay RNG
const AMBIENCE_STREAM: u64 = 0x5eaf_100d;

#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub speed: f32,
    pub wobble: f32,
}

impl Bubble {
    fn new(rng: &mut Pcg32) -> Self {
        Self {
            x: rng.random::<f32>() * CANVAS_WIDTH,
            y: CANVAS_HEIGHT + rng.random::<f32>() * 50.0,
            radius: rng.random::<f32>() * 3.0 + 1.0,
            speed: rng.random::<f32>() * 1.5 + 0.5,
            wobble: rng.random::<f32>() * std::f32::consts::TAU,
        }
    }

    fn update(&mut self, rng: &mut Pcg32) {
        self.y -= self.speed;
        self.wobble += 0.05;
        if self.y + self.radius < 0.0 {
            self.y = CANVAS_HEIGHT + self.radius;
            self.x = rng.random::<f32>() * CANVAS_WIDTH;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneryKind {
    Fish,
    Jellyfish,
    Seaweed,
}

impl SceneryKind {
    const ALL: [SceneryKind; 3] = [SceneryKind::Fish, SceneryKind::Jellyfish, SceneryKind::Seaweed];
}

/// A parallax decoration
#[derive(Debug, Clone, PartialEq)]
pub struct Scenery {
    pub kind: SceneryKind,
    /// 0 = far, 2 = near
    pub layer: u8,
    pub x: f32,
    pub y: f32,
}

impl Scenery {
    fn new(kind: SceneryKind, layer: u8, rng: &mut Pcg32) -> Self {
        Self {
            kind,
            layer,
            x: CANVAS_WIDTH + rng.random::<f32>() * 200.0,
            y: rng.random::<f32>() * (CANVAS_HEIGHT - 100.0) + 20.0,
        }
    }

    pub fn speed(&self) -> f32 {
        LAYER_SPEEDS[self.layer as usize]
    }

    pub fn scale(&self) -> f32 {
        LAYER_SCALES[self.layer as usize]
    }

    pub fn alpha(&self) -> f32 {
        LAYER_ALPHAS[self.layer as usize]
    }

    fn update(&mut self, rng: &mut Pcg32) {
        self.x -= self.speed();
        if self.x < -100.0 {
            // Re-enter on the right at roughly the same depth
            self.x = CANVAS_WIDTH + 100.0;
            self.y += (rng.random::<f32>() - 0.5) * 30.0;
            self.y = self.y.clamp(20.0, CANVAS_HEIGHT - 80.0);
        }
    }
}

/// Background animation, advanced every tick in every mode
#[derive(Debug, Clone)]
pub struct Ambience {
    rng: Pcg32,
    pub bubbles: Vec<Bubble>,
    /// Sorted by layer so drawing back to front is a plain iteration
    pub scenery: Vec<Scenery>,
    /// Ticks since creation; drives jellyfish and seaweed sway
    pub clock: u64,
}

impl Ambience {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::new(seed, AMBIENCE_STREAM);
        let bubbles = (0..BUBBLE_COUNT).map(|_| Bubble::new(&mut rng)).collect();
        let mut scenery = Vec::with_capacity(ELEMENTS_PER_LAYER * LAYER_COUNT as usize);
        for layer in 0..LAYER_COUNT {
            for _ in 0..ELEMENTS_PER_LAYER {
                let kind = SceneryKind::ALL[rng.random_range(0..SceneryKind::ALL.len())];
                scenery.push(Scenery::new(kind, layer, &mut rng));
            }
        }
        Self {
            rng,
            bubbles,
            scenery,
            clock: 0,
        }
    }

    pub fn update(&mut self) {
        self.clock += 1;
        for bubble in &mut self.bubbles {
            bubble.update(&mut self.rng);
        }
        for element in &mut self.scenery {
            element.update(&mut self.rng);
        }
    }

    /// Sway phase in seconds of ambience time
    pub fn seconds(&self) -> f32 {
        self.clock as f32 / crate::consts::TICK_HZ
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population() {
        let ambience = Ambience::new(9);
        assert_eq!(ambience.bubbles.len(), BUBBLE_COUNT);
        assert_eq!(ambience.scenery.len(), 15);
        for layer in 0..LAYER_COUNT {
            assert_eq!(
                ambience.scenery.iter().filter(|s| s.layer == layer).count(),
                ELEMENTS_PER_LAYER
            );
        }
    }

    #[test]
    fn test_bubbles_recycle_at_top() {
        let mut ambience = Ambience::new(9);
        for _ in 0..2000 {
            ambience.update();
        }
        for bubble in &ambience.bubbles {
            assert!(bubble.y + bubble.radius >= 0.0);
            assert!(bubble.y <= CANVAS_HEIGHT + 50.0);
        }
    }

    #[test]
    fn test_scenery_wraps_within_band() {
        let mut ambience = Ambience::new(4);
        for _ in 0..5000 {
            ambience.update();
        }
        for element in &ambience.scenery {
            assert!(element.x >= -100.0 - element.speed());
            assert!((20.0..=CANVAS_HEIGHT - 20.0).contains(&element.y));
        }
    }

    #[test]
    fn test_same_seed_same_scene() {
        let mut a = Ambience::new(77);
        let mut b = Ambience::new(77);
        for _ in 0..100 {
            a.update();
            b.update();
        }
        assert_eq!(a.bubbles, b.bubbles);
        assert_eq!(a.scenery, b.scenery);
    }
}
