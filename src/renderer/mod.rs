//! Frame description
//!
//! Drawing is a pure function of `&GameState` into a [`DrawList`] of
//! canvas-style commands. The browser backend replays the list onto a 2D
//! context; tests inspect it directly.

pub mod hud;
pub mod scene;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub mod canvas2d;

use glam::Vec2;

use crate::settings::{QualityPreset, Settings};
use crate::sim::{GameState, Rect};

/// RGBA color with an alpha in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// From a packed `0xRRGGBB` value
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Fully saturated hue (degrees) at 50% lightness
    pub fn hue(degrees: f32) -> Self {
        let h = degrees.rem_euclid(360.0) / 60.0;
        let x = 1.0 - (h % 2.0 - 1.0).abs();
        let (r, g, b) = match h as u32 {
            0 => (1.0, x, 0.0),
            1 => (x, 1.0, 0.0),
            2 => (0.0, 1.0, x),
            3 => (0.0, x, 1.0),
            4 => (x, 0.0, 1.0),
            _ => (1.0, 0.0, x),
        };
        Self::rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
    }

    /// CSS color string for the canvas backend
    pub fn css(&self) -> String {
        format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// One canvas operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Vertical linear gradient over a rect; stops are (offset, color)
    Gradient { rect: Rect, stops: Vec<(f32, Color)> },
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color, width: f32 },
    FillEllipse {
        center: Vec2,
        radii: Vec2,
        rotation: f32,
        color: Color,
    },
    StrokeArc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        color: Color,
        width: f32,
    },
    Polyline {
        points: Vec<Vec2>,
        color: Color,
        width: f32,
        closed: bool,
    },
    /// Filled polygon, optionally outlined
    Polygon {
        points: Vec<Vec2>,
        color: Color,
        outline: Option<(Color, f32)>,
    },
    /// Bold monospace text, optionally outlined
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
        align: TextAlign,
        outline: Option<(Color, f32)>,
    },
}

/// Ordered list of draw commands for one frame
#[derive(Debug, Default)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
    alpha: Vec<f32>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Strings of every text command, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.cmds.iter().filter_map(|cmd| match cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    /// Draw everything in `f` with its alpha scaled by `alpha`
    pub fn with_alpha(&mut self, alpha: f32, f: impl FnOnce(&mut Self)) {
        let current = self.current_alpha();
        self.alpha.push(current * alpha.clamp(0.0, 1.0));
        f(self);
        self.alpha.pop();
    }

    fn current_alpha(&self) -> f32 {
        self.alpha.last().copied().unwrap_or(1.0)
    }

    fn tint(&self, color: Color) -> Color {
        color.with_alpha(color.a * self.current_alpha())
    }

    pub fn gradient(&mut self, rect: Rect, stops: &[(f32, Color)]) {
        let stops = stops.iter().map(|&(o, c)| (o, self.tint(c))).collect();
        self.cmds.push(DrawCmd::Gradient { rect, stops });
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let color = self.tint(color);
        self.cmds.push(DrawCmd::FillRect {
            rect: Rect::new(x, y, w, h),
            color,
        });
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, width: f32) {
        let color = self.tint(color);
        self.cmds.push(DrawCmd::StrokeRect {
            rect: Rect::new(x, y, w, h),
            color,
            width,
        });
    }

    pub fn ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, color: Color) {
        let color = self.tint(color);
        self.cmds.push(DrawCmd::FillEllipse {
            center,
            radii,
            rotation,
            color,
        });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ellipse(center, Vec2::splat(radius), 0.0, color);
    }

    pub fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color, width: f32) {
        let color = self.tint(color);
        self.cmds.push(DrawCmd::StrokeArc {
            center,
            radius,
            start,
            end,
            color,
            width,
        });
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32) {
        self.arc(center, radius, 0.0, std::f32::consts::TAU, color, width);
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.polyline(vec![from, to], color, width, false);
    }

    pub fn polyline(&mut self, points: Vec<Vec2>, color: Color, width: f32, closed: bool) {
        let color = self.tint(color);
        self.cmds.push(DrawCmd::Polyline {
            points,
            color,
            width,
            closed,
        });
    }

    pub fn polygon(&mut self, points: Vec<Vec2>, color: Color) {
        let color = self.tint(color);
        self.cmds.push(DrawCmd::Polygon {
            points,
            color,
            outline: None,
        });
    }

    pub fn outlined_polygon(&mut self, points: Vec<Vec2>, color: Color, outline: Color, width: f32) {
        let color = self.tint(color);
        let outline = self.tint(outline);
        self.cmds.push(DrawCmd::Polygon {
            points,
            color,
            outline: Some((outline, width)),
        });
    }

    pub fn text(&mut self, text: impl Into<String>, pos: Vec2, size: f32, color: Color, align: TextAlign) {
        let color = self.tint(color);
        self.cmds.push(DrawCmd::Text {
            text: text.into(),
            pos,
            size,
            color,
            align,
            outline: None,
        });
    }

    /// Text with a black outline, the way every HUD label is drawn
    pub fn outlined_text(
        &mut self,
        text: impl Into<String>,
        pos: Vec2,
        size: f32,
        color: Color,
        align: TextAlign,
        outline_width: f32,
    ) {
        let color = self.tint(color);
        let outline = self.tint(Color::BLACK);
        self.cmds.push(DrawCmd::Text {
            text: text.into(),
            pos,
            size,
            color,
            align,
            outline: Some((outline, outline_width)),
        });
    }
}

/// Presentation options that do not live in the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    pub quality: QualityPreset,
    pub trails: bool,
    pub sparkles: bool,
    pub sway: bool,
    /// Measured frame rate, drawn when present
    pub fps: Option<f32>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default(), None)
    }
}

impl ViewOptions {
    pub fn from_settings(settings: &Settings, fps: Option<f32>) -> Self {
        Self {
            quality: settings.quality,
            trails: settings.effective_trails(),
            sparkles: settings.sparkles,
            sway: settings.effective_sway(),
            fps: fps.filter(|_| settings.show_fps),
        }
    }
}

/// Build the complete frame for `state`
pub fn draw_frame(state: &GameState, opts: &ViewOptions) -> DrawList {
    let mut list = DrawList::new();
    scene::draw_world(&mut list, state, opts);
    hud::draw_hud(&mut list, state, opts);
    hud::draw_overlay(&mut list, state);
    list
}
