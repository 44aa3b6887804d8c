//! World drawing: background, ambience, floor, entities, bosses, player

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::shapes;
use super::{Color, DrawList, TextAlign, ViewOptions};
use crate::consts::*;
use crate::sim::ambience::{LAYER_COUNT, Scenery, SceneryKind};
use crate::sim::{
    Antagonist, AntagonistKind, BonusLife, Collectible, Dropper, GameState, Hazard, HazardKind,
    Obstacle, Player, PlayerSkin, PowerUpKind,
};

const WATER_TOP: Color = Color::hex(0x1e5f8c);
const WATER_MID: Color = Color::hex(0x2a7fb5);
const WATER_DEEP: Color = Color::hex(0x1a4d73);

const SAND: Color = Color::hex(0x8b6f47);
const SAND_GRAIN: Color = Color::hex(0xa38b5f);
const ROCK: Color = Color::hex(0x6b5937);

const WEED_DARK: Color = Color::hex(0x2d8659);
const WEED_LIGHT: Color = Color::hex(0x3a9e6a);
const WEED_LEAF: Color = Color::hex(0x4ec47e);

const SKIN: Color = Color::hex(0xffd4a3);
const FISH_COLORS: [Color; 3] = [Color::hex(0xff9e4a), Color::hex(0x4a9eff), Color::hex(0xffcc00)];

/// Everything below the HUD, back to front
pub fn draw_world(list: &mut DrawList, state: &GameState, opts: &ViewOptions) {
    let t = if opts.sway { state.ambience.seconds() } else { 0.0 };

    draw_background(list, t, opts);
    draw_scenery(list, &state.ambience.scenery, t, opts);
    draw_bubbles(list, state, opts);
    draw_floor(list, state.ground_offset);

    for obstacle in &state.obstacles {
        draw_obstacle(list, obstacle, t);
    }
    for collectible in &state.collectibles {
        draw_collectible(list, collectible, opts);
    }
    for heart in &state.bonus_lives {
        draw_bonus_life(list, heart, opts);
    }
    if let Some(dropper) = &state.dropper {
        draw_dropper(list, dropper);
    }
    if let Some(boss) = &state.antagonist {
        draw_antagonist(list, boss);
        for hazard in &boss.hazards {
            draw_hazard(list, hazard);
        }
    }
    for hazard in &state.persistent_hazards {
        draw_hazard(list, hazard);
    }

    draw_player(list, state, opts);
}

fn draw_background(list: &mut DrawList, t: f32, opts: &ViewOptions) {
    list.gradient(
        crate::sim::Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT),
        &[(0.0, WATER_TOP), (0.5, WATER_MID), (1.0, WATER_DEEP)],
    );

    if !opts.quality.light_rays_enabled() {
        return;
    }
    list.with_alpha(0.06, |list| {
        for i in 0..3 {
            let sway = (t * 0.3 + i as f32).sin() * 20.0;
            let x = 150.0 + i as f32 * 250.0 + sway;
            list.polygon(
                vec![
                    Vec2::new(x - 30.0, 0.0),
                    Vec2::new(x + 30.0, 0.0),
                    Vec2::new(x + 120.0, CANVAS_HEIGHT - FLOOR_HEIGHT),
                    Vec2::new(x + 20.0, CANVAS_HEIGHT - FLOOR_HEIGHT),
                ],
                Color::WHITE,
            );
        }
    });
}

fn draw_scenery(list: &mut DrawList, scenery: &[Scenery], t: f32, opts: &ViewOptions) {
    // Low quality keeps only the nearest layer
    let first_layer = LAYER_COUNT.saturating_sub(opts.quality.parallax_layers());
    for element in scenery.iter().filter(|e| e.layer >= first_layer) {
        list.with_alpha(element.alpha(), |list| match element.kind {
            SceneryKind::Fish => draw_fish(list, element),
            SceneryKind::Jellyfish => draw_jellyfish(list, element, t),
            SceneryKind::Seaweed => draw_seaweed(list, element, t),
        });
    }
}

fn draw_fish(list: &mut DrawList, fish: &Scenery) {
    let size = 15.0 * fish.scale();
    let c = Vec2::new(fish.x, fish.y);
    let color = FISH_COLORS[(fish.y / 100.0).max(0.0) as usize % FISH_COLORS.len()];

    list.ellipse(c, Vec2::new(size, size * 0.6), 0.0, color);
    list.polygon(
        vec![
            c + Vec2::new(-size, 0.0),
            c + Vec2::new(-size * 1.5, -size * 0.5),
            c + Vec2::new(-size * 1.5, size * 0.5),
        ],
        color,
    );
    list.circle(c + Vec2::new(size * 0.4, -size * 0.2), size * 0.2, Color::WHITE);
    list.circle(c + Vec2::new(size * 0.5, -size * 0.2), size * 0.1, Color::BLACK);
}

fn draw_jellyfish(list: &mut DrawList, jelly: &Scenery, t: f32) {
    const PURPLE: Color = Color::hex(0x9d4aff);
    let size = 20.0 * jelly.scale();
    let wobble = (t * 2.0 + jelly.y).sin() * 3.0;
    let c = Vec2::new(jelly.x, jelly.y);

    list.ellipse(c, Vec2::new(size * 0.8, size), 0.0, PURPLE);
    for i in 0..4 {
        let x = c.x - size * 0.4 + i as f32 * size * 0.3;
        list.line(
            Vec2::new(x, c.y + size),
            Vec2::new(x + wobble, c.y + size * 2.0),
            PURPLE,
            2.0 * jelly.scale(),
        );
    }
}

fn draw_seaweed(list: &mut DrawList, weed: &Scenery, t: f32) {
    let height = 60.0 * weed.scale();
    let wobble = (t / 2.0 + weed.x).sin() * 2.0;
    let base = CANVAS_HEIGHT - FLOOR_HEIGHT;
    let points = shapes::quad_bezier(
        Vec2::new(weed.x, base),
        Vec2::new(weed.x + wobble, base - height / 2.0),
        Vec2::new(weed.x + wobble * 0.5, base - height),
        8,
    );
    list.polyline(points, WEED_DARK, 4.0 * weed.scale(), false);
}

fn draw_bubbles(list: &mut DrawList, state: &GameState, opts: &ViewOptions) {
    let max = opts.quality.max_bubbles();
    list.with_alpha(0.4, |list| {
        for bubble in state.ambience.bubbles.iter().take(max) {
            let x = bubble.x + bubble.wobble.sin() * 2.0;
            list.circle(Vec2::new(x, bubble.y), bubble.radius, Color::WHITE);
        }
    });
}

fn draw_floor(list: &mut DrawList, ground_offset: f32) {
    let top = CANVAS_HEIGHT - FLOOR_HEIGHT;
    list.fill_rect(0.0, top, CANVAS_WIDTH, FLOOR_HEIGHT, SAND);

    // Both patterns wrap so the scroll is seamless
    let mut x = -(ground_offset % 20.0);
    while x < CANVAS_WIDTH + 20.0 {
        list.fill_rect(x, top + 2.0, 10.0, 3.0, SAND_GRAIN);
        list.fill_rect(x + 5.0, top + 10.0, 8.0, 3.0, SAND_GRAIN);
        x += 20.0;
    }

    let mut x = -(ground_offset % 80.0);
    while x < CANVAS_WIDTH + 80.0 {
        list.ellipse(Vec2::new(x + 20.0, top + 5.0), Vec2::new(15.0, 8.0), 0.0, ROCK);
        x += 80.0;
    }
}

/// Seaweed barrier pair: four swaying strands per side with leaves
fn draw_obstacle(list: &mut DrawList, obstacle: &Obstacle, t: f32) {
    let spacing = obstacle.width / 5.0;
    let floor = CANVAS_HEIGHT - FLOOR_HEIGHT;
    let spans = [(0.0, obstacle.top), (obstacle.lower_edge(), floor)];

    for i in 0..4 {
        let x = obstacle.x + spacing * i as f32 + 5.0;
        let wobble = (t * 0.8 + i as f32).sin() * 1.5;
        let color = if i % 2 == 0 { WEED_DARK } else { WEED_LIGHT };

        for &(from, to) in &spans {
            if to <= from {
                continue;
            }
            list.polyline(shapes::wavy_strand(x, from, to, t * 0.8, wobble), color, 8.0, false);

            let mut y = from + 10.0;
            let mut side = if i % 2 == 0 { 1.0 } else { -1.0 };
            while y < to {
                let sway = (y / 50.0 + t * 0.8).sin() * wobble;
                list.ellipse(
                    Vec2::new(x + sway + side * 5.0, y),
                    Vec2::new(5.0, 8.0),
                    side * 0.5,
                    WEED_LEAF,
                );
                side = -side;
                y += 20.0;
            }
        }
    }
}

fn draw_collectible(list: &mut DrawList, item: &Collectible, opts: &ViewOptions) {
    let half = COLLECTIBLE_SIZE / 2.0;
    let c = item.pos + Vec2::splat(half);

    if opts.sparkles {
        list.with_alpha(0.5 + item.sparkle.sin() * 0.3, |list| {
            list.circle(c, 20.0, Color::hex(0xffff99));
        });
    }

    match item.kind {
        PowerUpKind::Heal => {
            // Wiggling worm
            for i in 0..4 {
                let offset = Vec2::new(-9.0 + i as f32 * 6.0, (item.sparkle + i as f32).sin() * 2.0);
                let color = if i % 2 == 0 { Color::hex(0xff69b4) } else { Color::hex(0xff1493) };
                list.circle(c + offset, 5.0, color);
            }
            list.circle(c + Vec2::new(9.0, -1.0), 1.5, Color::BLACK);
        }
        PowerUpKind::Slow => {
            list.circle(c, 12.0, Color::hex(0xff9e4a));
            list.stroke_circle(c, 12.0, Color::hex(0xcf7e2a), 2.0);
            list.line(c, c + Vec2::new(0.0, -8.0), Color::WHITE, 2.0);
            list.line(c, c + shapes::rotate(Vec2::new(6.0, 0.0), item.rotation), Color::WHITE, 2.0);
        }
        PowerUpKind::Shrink => {
            let square = vec![
                c + Vec2::new(-7.0, -7.0),
                c + Vec2::new(7.0, -7.0),
                c + Vec2::new(7.0, 7.0),
                c + Vec2::new(-7.0, 7.0),
            ];
            list.outlined_polygon(square, Color::hex(0xff4aff), Color::hex(0xcf2acf), 2.0);
            // Arrows pointing inward from each corner
            for corner in [Vec2::new(-1.0, -1.0), Vec2::new(1.0, -1.0), Vec2::new(1.0, 1.0), Vec2::new(-1.0, 1.0)] {
                list.line(c + corner * 12.0, c + corner * 4.0, Color::WHITE, 2.0);
            }
        }
        PowerUpKind::Invincible => {
            list.outlined_polygon(
                shapes::star(c, 12.0, 5.0, 5, item.rotation),
                Color::hex(0xffff00),
                Color::hex(0xffa500),
                2.0,
            );
            if opts.sparkles {
                for i in 0..8 {
                    let angle = i as f32 * PI / 4.0 + item.sparkle;
                    list.circle(c + Vec2::from_angle(angle) * 18.0, 1.5, Color::WHITE);
                }
            }
        }
    }
}

fn draw_bonus_life(list: &mut DrawList, heart: &BonusLife, opts: &ViewOptions) {
    let c = heart.pos + Vec2::splat(BONUS_LIFE_SIZE / 2.0) + Vec2::new(0.0, heart.float.sin() * 5.0);

    list.with_alpha(0.4, |list| {
        list.circle(c, 25.0 + heart.sparkle.sin() * 5.0, Color::hex(0xffd700));
    });
    list.outlined_polygon(
        shapes::heart(c - Vec2::new(0.0, 12.0), 24.0),
        Color::hex(0xffd700),
        Color::hex(0xffa500),
        2.0,
    );
    list.circle(c + Vec2::new(-5.0, -6.0), 3.0, Color::hex(0xffed4e));

    if opts.sparkles {
        for i in 0..6 {
            let angle = heart.sparkle + i as f32 * TAU / 6.0;
            list.circle(c + Vec2::from_angle(angle) * 22.0, 2.0, Color::WHITE);
        }
    }
}

fn hair_color(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::Heal => Color::hex(0xff69b4),
        PowerUpKind::Slow => Color::hex(0xff9e4a),
        PowerUpKind::Shrink => Color::hex(0xff4aff),
        PowerUpKind::Invincible => Color::hex(0xffff00),
    }
}

/// The mermaid; her hair shows what she carries
fn draw_dropper(list: &mut DrawList, mermaid: &Dropper) {
    const TAIL: Color = Color::hex(0x2eb82e);
    const TAIL_LIGHT: Color = Color::hex(0x4ed44e);
    const SHELL: Color = Color::hex(0xb86ed4);
    const SHELL_EDGE: Color = Color::hex(0x8a4eb4);

    let o = mermaid.pos;
    let at = |x: f32, y: f32| o + Vec2::new(x, y);
    let tail_wave = (mermaid.anim * 1.5).sin() * 8.0;
    let hair = hair_color(mermaid.carries);

    // Tail fins
    for flip in [-1.0, 1.0] {
        let mut fin = shapes::quad_bezier(
            at(-15.0, 45.0 + tail_wave),
            at(-25.0, 45.0 + flip * 5.0 + tail_wave),
            at(-28.0, 45.0 + flip * 10.0 + tail_wave),
            4,
        );
        fin.extend(shapes::quad_bezier(
            at(-28.0, 45.0 + flip * 10.0 + tail_wave),
            at(-25.0, 45.0 + flip * 2.0 + tail_wave),
            at(-18.0, 48.0 + tail_wave),
            4,
        ));
        list.polygon(fin, TAIL);
    }
    list.ellipse(at(0.0, 40.0 + tail_wave * 0.3), Vec2::new(10.0, 16.0), 0.3, TAIL_LIGHT);
    for i in 0..3 {
        let i = i as f32;
        list.circle(at(-5.0 + i * 3.0, 35.0 + i * 5.0 + tail_wave * 0.3), 3.0, TAIL);
    }

    // Torso, head and neck
    list.fill_rect(o.x + 8.0, o.y + 20.0, 14.0, 18.0, SKIN);
    list.circle(at(15.0, 12.0), 10.0, SKIN);
    list.fill_rect(o.x + 12.0, o.y + 18.0, 6.0, 4.0, SKIN);

    // Shells
    for x in [11.0, 19.0] {
        list.circle(at(x, 26.0), 5.0, SHELL);
        list.circle(at(x - 1.0, 25.0), 2.0, Color::hex(0xd89ef4));
        list.stroke_circle(at(x, 26.0), 5.0, SHELL_EDGE, 2.0);
        list.line(at(x, 23.0), at(x, 29.0), SHELL_EDGE, 1.0);
    }

    // Eyes
    for x in [12.0, 18.0] {
        list.circle(at(x, 11.0), 3.0, Color::WHITE);
        list.circle(at(x, 11.0), 2.0, Color::hex(0x4a9eff));
        list.circle(at(x, 11.0), 1.0, Color::BLACK);
        list.with_alpha(0.8, |list| {
            list.polyline(
                shapes::quad_bezier(at(x - 3.0, 8.0), at(x - 1.0, 7.0), at(x + 1.0, 8.0), 4),
                hair,
                1.5,
                false,
            );
        });
    }

    // Nose, lips and smile
    list.circle(at(15.0, 13.0), 1.5, Color::hex(0xffb080));
    list.ellipse(at(15.0, 16.5), Vec2::new(3.0, 1.5), 0.0, Color::hex(0xff4a6a));
    list.arc(at(15.0, 16.0), 3.0, 0.1, PI - 0.1, Color::hex(0xcc2040), 1.0);

    // Hair volume and flowing strands
    list.circle(at(7.0, 10.0), 7.0, hair);
    list.circle(at(15.0, 6.0), 8.0, hair);
    list.circle(at(23.0, 10.0), 6.0, hair);
    for i in 0..3 {
        let i = i as f32;
        let flow = (mermaid.anim + i * 0.5).sin() * 4.0;
        list.polyline(
            shapes::quad_bezier(
                at(6.0 + i * 5.0, 16.0),
                at(3.0 + i * 5.0 + flow, 26.0),
                at(1.0 + i * 4.0 + flow * 1.5, 35.0),
                6,
            ),
            hair,
            4.0,
            false,
        );
    }

    // Arms
    let arm_wave = (mermaid.anim * 2.0).sin() * 3.0;
    list.line(at(8.0, 24.0), at(3.0, 30.0 + arm_wave), SKIN, 5.0);
    list.line(at(22.0, 24.0), at(27.0, 30.0 - arm_wave), SKIN, 5.0);
}

fn draw_antagonist(list: &mut DrawList, boss: &Antagonist) {
    match boss.kind {
        AntagonistKind::Diver => draw_diver(list, boss),
        AntagonistKind::Dolphin => draw_dolphin(list, boss),
    }

    let bar = match boss.kind {
        AntagonistKind::Diver => Color::hex(0xff4a4a),
        AntagonistKind::Dolphin => Color::hex(0x4aff4a),
    };
    let (x, y, w) = (boss.pos.x, boss.pos.y, boss.size.x);
    let fraction = boss.health as f32 / boss.max_health.max(1) as f32;
    list.fill_rect(x, y - 20.0, w, 12.0, Color::rgba(0, 0, 0, 0.7));
    list.fill_rect(x + 2.0, y - 18.0, (w - 4.0) * fraction, 8.0, bar);
    list.stroke_rect(x, y - 20.0, w, 12.0, Color::WHITE, 2.0);
    list.text(
        format!("{}/{}", boss.health, boss.max_health),
        Vec2::new(x + w / 2.0, y - 11.0),
        10.0,
        Color::WHITE,
        TextAlign::Center,
    );
}

fn draw_diver(list: &mut DrawList, boss: &Antagonist) {
    const SUIT: Color = Color::hex(0x1a1a1a);
    const YELLOW: Color = Color::hex(0xffcc00);
    const STEEL: Color = Color::hex(0x666666);
    const MASK_FRAME: Color = Color::hex(0x1a3a8f);

    let bob = (boss.anim * 2.0).sin() * 3.0;
    let kick = (boss.anim * 4.0).sin() * 5.0;
    let swing = (boss.anim * 3.0).sin() * 8.0;
    let o = boss.pos + Vec2::new(0.0, bob);
    let at = |x: f32, y: f32| o + Vec2::new(x, y);
    let rect = |list: &mut DrawList, x: f32, y: f32, w: f32, h: f32, color: Color| {
        list.fill_rect(o.x + x, o.y + y, w, h, color);
    };

    // Regulator bubbles rising
    list.with_alpha(0.4, |list| {
        let rise = (boss.anim * 20.0) % 24.0;
        for i in 0..3 {
            list.circle(at(45.0, 25.0 - i as f32 * 8.0 - rise), 2.5, Color::WHITE);
        }
    });

    // Twin tanks, straps and valves
    rect(list, 30.0, 35.0, 12.0, 35.0, Color::hex(0x888888));
    rect(list, 45.0, 35.0, 12.0, 35.0, Color::hex(0x888888));
    rect(list, 28.0, 45.0, 32.0, 4.0, Color::hex(0x555555));
    rect(list, 28.0, 60.0, 32.0, 4.0, Color::hex(0x555555));
    rect(list, 32.0, 32.0, 8.0, 5.0, STEEL);
    rect(list, 47.0, 32.0, 8.0, 5.0, STEEL);

    // Wetsuit, stripes, weight belt, legs
    rect(list, 25.0, 35.0, 35.0, 40.0, SUIT);
    rect(list, 27.0, 40.0, 3.0, 30.0, Color::hex(0xff6600));
    rect(list, 55.0, 40.0, 3.0, 30.0, Color::hex(0xff6600));
    rect(list, 25.0, 65.0, 35.0, 5.0, Color::hex(0x444444));
    for i in 0..4 {
        rect(list, 28.0 + i as f32 * 8.0, 66.0, 5.0, 4.0, STEEL);
    }
    rect(list, 30.0, 75.0, 10.0, 20.0, SUIT);
    rect(list, 45.0, 75.0, 10.0, 20.0, SUIT);

    // Head and mask
    list.circle(at(42.0, 25.0), 15.0, SKIN);
    list.ellipse(at(42.0, 25.0), Vec2::new(18.0, 12.0), 0.0, Color::hex(0x2a5fcf));
    list.ellipse(at(42.0, 25.0), Vec2::new(15.0, 10.0), 0.0, Color::rgba(74, 158, 255, 0.7));
    list.polyline(
        shapes::ellipse_points(at(42.0, 25.0), Vec2::new(18.0, 12.0), 0.0, 24),
        MASK_FRAME,
        3.0,
        true,
    );
    list.line(at(28.0, 25.0), at(30.0, 20.0), MASK_FRAME, 4.0);
    list.line(at(56.0, 25.0), at(54.0, 20.0), MASK_FRAME, 4.0);

    // Regulator and hose
    list.circle(at(42.0, 32.0), 5.0, YELLOW);
    list.polyline(shapes::quad_bezier(at(42.0, 37.0), at(35.0, 45.0), at(35.0, 50.0), 6), YELLOW, 3.0, false);

    // Arms, gloves and the net launcher
    list.line(at(25.0, 40.0), at(15.0, 50.0 + swing), SUIT, 12.0);
    list.line(at(60.0, 40.0), at(70.0, 50.0 - swing), SUIT, 12.0);
    list.circle(at(15.0, 50.0 + swing), 6.0, YELLOW);
    list.circle(at(70.0, 50.0 - swing), 6.0, YELLOW);
    rect(list, 68.0, 48.0 - swing, 8.0, 15.0, Color::hex(0x444444));
    rect(list, 70.0, 46.0 - swing, 4.0, 4.0, STEEL);

    // Flippers
    list.ellipse(at(35.0, 100.0 + kick), Vec2::new(10.0, 15.0), 0.3, Color::hex(0xff9e4a));
    list.ellipse(at(50.0, 100.0 - kick), Vec2::new(10.0, 15.0), -0.3, Color::hex(0xff9e4a));
    list.line(at(35.0, 95.0), at(35.0, 92.0), Color::hex(0xcc7e3a), 2.0);
    list.line(at(50.0, 95.0), at(50.0, 92.0), Color::hex(0xcc7e3a), 2.0);
}

fn draw_dolphin(list: &mut DrawList, boss: &Antagonist) {
    const SKIN_BLUE: Color = Color::hex(0x7fa8c9);
    const FIN: Color = Color::hex(0x6a8fb0);
    const LINE: Color = Color::hex(0x5a7f9a);

    let bob = (boss.anim * 2.0).sin() * 4.0;
    let swim = (boss.anim * 3.0).sin() * 8.0;
    let o = boss.pos + Vec2::new(0.0, bob);
    let at = |x: f32, y: f32| o + Vec2::new(x, y);

    // Body, melon, blowhole
    list.ellipse(at(50.0, 40.0), Vec2::new(45.0, 16.0), 0.0, SKIN_BLUE);
    list.ellipse(at(85.0, 40.0), Vec2::new(18.0, 14.0), 0.0, SKIN_BLUE);
    list.ellipse(at(78.0, 28.0), Vec2::new(3.0, 2.0), 0.0, LINE);

    // Rostrum and mouth line
    list.polygon(vec![at(95.0, 36.0), at(123.0, 37.0), at(123.0, 43.0), at(95.0, 44.0)], FIN);
    list.line(at(123.0, 40.0), at(100.0, 43.0), LINE, 1.5);

    // Belly
    list.ellipse(at(50.0, 44.0), Vec2::new(40.0, 12.0), 0.0, Color::hex(0xb3d1e6));

    // Dorsal and pectoral fins
    let mut dorsal = shapes::quad_bezier(at(45.0, 20.0), at(42.0, 10.0), at(50.0, 15.0), 6);
    dorsal.push(at(52.0, 22.0));
    list.polygon(dorsal, FIN);
    list.ellipse(at(63.0, 28.0), Vec2::new(8.0, 18.0), -0.5, SKIN_BLUE);

    // Tail stock and flukes
    list.ellipse(at(20.0, 40.0), Vec2::new(10.0, 8.0), 0.0, SKIN_BLUE);
    for flip in [-1.0, 1.0] {
        let y = |dy: f32| 40.0 + flip * dy + swim;
        let mut fluke = shapes::quad_bezier(at(18.0, y(0.0)), at(10.0, y(10.0)), at(5.0, y(15.0)), 5);
        fluke.extend(shapes::quad_bezier(at(5.0, y(15.0)), at(12.0, y(8.0)), at(16.0, y(2.0)), 5));
        list.polygon(fluke, FIN);
    }

    // Eye and smile
    list.circle(at(88.0, 35.0), 4.0, Color::BLACK);
    list.circle(at(89.0, 34.0), 2.0, Color::WHITE);
    list.arc(at(95.0, 43.0), 6.0, 0.2, PI - 0.2, LINE, 2.0);
}

/// Corners of a square of side `size` centred on `center`, rotated
fn rotated_square(center: Vec2, size: f32, rotation: f32) -> Vec<Vec2> {
    let h = size / 2.0;
    [Vec2::new(-h, -h), Vec2::new(h, -h), Vec2::new(h, h), Vec2::new(-h, h)]
        .into_iter()
        .map(|p| center + shapes::rotate(p, rotation))
        .collect()
}

fn draw_hazard(list: &mut DrawList, hazard: &Hazard) {
    // Hazards grow into place while deploying
    let scale = 0.5 + 0.5 * hazard.deploy_progress();
    let size = HAZARD_SIZE * scale;
    let c = hazard.pos;

    match hazard.kind {
        HazardKind::Net => {
            let rotation = if hazard.armed { 0.0 } else { hazard.rotation };
            let h = size / 2.0;
            let step = size / 4.0;
            for i in 0..5 {
                let k = -h + step * i as f32;
                let across = [(Vec2::new(k, -h), Vec2::new(k, h)), (Vec2::new(-h, k), Vec2::new(h, k))];
                for (a, b) in across {
                    list.line(
                        c + shapes::rotate(a, rotation),
                        c + shapes::rotate(b, rotation),
                        Color::hex(0xd4a574),
                        3.0,
                    );
                }
            }
            list.polyline(rotated_square(c, size, rotation), Color::hex(0x8b6f47), 4.0, true);
            for corner in rotated_square(c, size, rotation) {
                list.polygon(rotated_square(corner, 6.0, rotation), Color::hex(0x666666));
            }
        }
        HazardKind::Whirlpool => {
            let radius = size / 2.0;
            for arm in 0..3 {
                let color = if arm % 2 == 0 { Color::hex(0x4a9eff) } else { Color::hex(0x2a7fb5) };
                list.polyline(shapes::spiral_arm(c, radius, arm, 3, hazard.rotation, 20), color, 4.0, false);
            }
            list.circle(c, 3.0, Color::hex(0x1a4d73));
            list.with_alpha(0.6, |list| {
                list.stroke_circle(c, radius, Color::hex(0x4a9eff), 3.0);
            });
        }
    }
}

fn draw_player(list: &mut DrawList, state: &GameState, opts: &ViewOptions) {
    let player = &state.player;
    let center = player.center();
    let clock = state.ambience.seconds();

    if state.is_invincible() {
        if opts.trails {
            let radius = player.size.max_element() / 2.0 + 5.0;
            for i in 0..3 {
                let i = i as f32;
                list.with_alpha(0.4 - i * 0.1, |list| {
                    list.circle(center - Vec2::new(i * 8.0, 0.0), radius, Color::hue(clock * 10.0 + i * 40.0));
                });
            }
        }
        if opts.sparkles {
            for i in 0..5 {
                let angle = clock * 5.0 + i as f32 * TAU / 5.0;
                list.circle(center + Vec2::from_angle(angle) * 30.0, 2.0, Color::WHITE);
            }
        }
    }

    let alpha = if state.player_blinking() { 0.5 } else { 1.0 };
    list.with_alpha(alpha, |list| draw_axolotl(list, player));
}

fn draw_axolotl(list: &mut DrawList, player: &Player) {
    const GILL: Color = Color::hex(0xff6b9d);

    let body = match player.skin {
        PlayerSkin::Normal => Color::hex(0xffb5d8),
        PlayerSkin::Golden => Color::hex(0xffff00),
    };
    let s = player.size.x / player.base_size.x;
    let o = player.pos + Vec2::new(0.0, player.anim.sin() * 2.0);
    let at = |x: f32, y: f32| o + Vec2::new(x, y) * s;
    let leg_wobble = (player.anim * 2.0).sin() * 2.0;

    list.polygon(vec![at(0.0, 15.0), at(-8.0, 8.0), at(-8.0, 22.0)], body);
    list.ellipse(at(15.0, 15.0), Vec2::new(20.0, 12.0) * s, 0.0, body);
    list.ellipse(at(35.0, 15.0), Vec2::new(15.0, 13.0) * s, 0.0, body);

    for i in 0..3 {
        let i = i as f32;
        list.line(at(32.0, 10.0), at(28.0 - i * 2.0, 2.0 + i * 3.0), GILL, 3.0 * s);
    }

    list.circle(at(40.0, 12.0), 3.0 * s, Color::BLACK);
    list.circle(at(41.0, 11.0), 1.5 * s, Color::WHITE);

    let front = at(25.0, 25.0 + leg_wobble);
    let back = at(10.0, 25.0 - leg_wobble);
    list.fill_rect(front.x, front.y, 4.0 * s, 6.0 * s, body);
    list.fill_rect(back.x, back.y, 4.0 * s, 6.0 * s, body);

    list.arc(at(42.0, 16.0), 4.0 * s, 0.2, 0.6 * PI, Color::BLACK, 1.5);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawCmd;
    use crate::settings::QualityPreset;

    fn opts(quality: QualityPreset) -> ViewOptions {
        ViewOptions {
            quality,
            ..Default::default()
        }
    }

    fn count_bubbles(list: &DrawList) -> usize {
        list.commands()
            .iter()
            .filter(|cmd| {
                matches!(cmd, DrawCmd::FillEllipse { color, .. }
                    if *color == Color::WHITE.with_alpha(0.4))
            })
            .count()
    }

    #[test]
    fn test_bubble_count_follows_quality() {
        let state = GameState::new(2);
        let mut low = DrawList::new();
        draw_bubbles(&mut low, &state, &opts(QualityPreset::Low));
        let mut high = DrawList::new();
        draw_bubbles(&mut high, &state, &opts(QualityPreset::High));
        assert_eq!(count_bubbles(&low), 10);
        assert_eq!(count_bubbles(&high), 30);
    }

    #[test]
    fn test_low_quality_skips_light_rays() {
        let mut low = DrawList::new();
        draw_background(&mut low, 0.0, &opts(QualityPreset::Low));
        assert_eq!(low.len(), 1);

        let mut medium = DrawList::new();
        draw_background(&mut medium, 0.0, &opts(QualityPreset::Medium));
        assert_eq!(medium.len(), 4);
    }

    #[test]
    fn test_blinking_player_is_translucent() {
        let mut state = GameState::new(1);
        state.invulnerable_ticks = 120;
        assert!(state.player_blinking());

        let mut list = DrawList::new();
        draw_player(&mut list, &state, &ViewOptions::default());
        let all_half = list.commands().iter().all(|cmd| match cmd {
            DrawCmd::FillEllipse { color, .. } | DrawCmd::FillRect { color, .. } => color.a <= 0.5,
            _ => true,
        });
        assert!(all_half);
    }

    #[test]
    fn test_star_power_adds_trail() {
        let mut state = GameState::new(1);
        let mut plain = DrawList::new();
        draw_player(&mut plain, &state, &ViewOptions::default());

        crate::sim::powerup::activate(&mut state, PowerUpKind::Invincible);
        let mut starred = DrawList::new();
        draw_player(&mut starred, &state, &ViewOptions::default());
        // Three trail circles and five sparkles
        assert_eq!(starred.len(), plain.len() + 8);
    }

    #[test]
    fn test_boss_draws_health_label() {
        let mut list = DrawList::new();
        let mut boss = Antagonist::spawn(AntagonistKind::Dolphin, 200.0);
        boss.health = 3;
        draw_antagonist(&mut list, &boss);
        assert!(list.has_text("3/5"));
    }

    #[test]
    fn test_obstacle_strands_cover_both_barriers() {
        let obstacle = Obstacle::with_gap(300.0, 150.0, 200.0);
        let mut list = DrawList::new();
        draw_obstacle(&mut list, &obstacle, 0.0);
        let strands = list
            .commands()
            .iter()
            .filter(|cmd| matches!(cmd, DrawCmd::Polyline { width, .. } if *width == 8.0))
            .count();
        assert_eq!(strands, 8);
    }
}
