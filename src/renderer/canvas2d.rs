//! Canvas 2D backend: replays a [`DrawList`] onto a rendering context

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{DrawCmd, DrawList, TextAlign};

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Grab the 2D context of `canvas`, if the browser provides one
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        Some(Self { ctx })
    }

    pub fn render(&self, list: &DrawList) {
        for cmd in list.commands() {
            self.draw(cmd);
        }
    }

    fn trace(&self, points: &[Vec2], closed: bool) -> bool {
        let Some((first, rest)) = points.split_first() else {
            return false;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        if closed {
            self.ctx.close_path();
        }
        true
    }

    fn draw(&self, cmd: &DrawCmd) {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::Gradient { rect, stops } => {
                let gradient = ctx.create_linear_gradient(
                    rect.x as f64,
                    rect.y as f64,
                    rect.x as f64,
                    rect.bottom() as f64,
                );
                for (offset, color) in stops {
                    gradient.add_color_stop(*offset, &color.css()).ok();
                }
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
            }
            DrawCmd::FillRect { rect, color } => {
                ctx.set_fill_style_str(&color.css());
                ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
            }
            DrawCmd::StrokeRect { rect, color, width } => {
                ctx.set_stroke_style_str(&color.css());
                ctx.set_line_width(*width as f64);
                ctx.stroke_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
            }
            DrawCmd::FillEllipse {
                center,
                radii,
                rotation,
                color,
            } => {
                ctx.set_fill_style_str(&color.css());
                ctx.begin_path();
                ctx.ellipse(
                    center.x as f64,
                    center.y as f64,
                    radii.x.max(0.0) as f64,
                    radii.y.max(0.0) as f64,
                    *rotation as f64,
                    0.0,
                    TAU,
                )
                .ok();
                ctx.fill();
            }
            DrawCmd::StrokeArc {
                center,
                radius,
                start,
                end,
                color,
                width,
            } => {
                ctx.set_stroke_style_str(&color.css());
                ctx.set_line_width(*width as f64);
                ctx.begin_path();
                ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    radius.max(0.0) as f64,
                    *start as f64,
                    *end as f64,
                )
                .ok();
                ctx.stroke();
            }
            DrawCmd::Polyline {
                points,
                color,
                width,
                closed,
            } => {
                if self.trace(points, *closed) {
                    ctx.set_stroke_style_str(&color.css());
                    ctx.set_line_width(*width as f64);
                    ctx.stroke();
                }
            }
            DrawCmd::Polygon {
                points,
                color,
                outline,
            } => {
                if self.trace(points, true) {
                    ctx.set_fill_style_str(&color.css());
                    ctx.fill();
                    if let Some((edge, width)) = outline {
                        ctx.set_stroke_style_str(&edge.css());
                        ctx.set_line_width(*width as f64);
                        ctx.stroke();
                    }
                }
            }
            DrawCmd::Text {
                text,
                pos,
                size,
                color,
                align,
                outline,
            } => {
                ctx.set_font(&format!("bold {size}px monospace"));
                ctx.set_text_align(match align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                    TextAlign::Right => "right",
                });
                if let Some((edge, width)) = outline {
                    ctx.set_stroke_style_str(&edge.css());
                    ctx.set_line_width(*width as f64);
                    ctx.stroke_text(text, pos.x as f64, pos.y as f64).ok();
                }
                ctx.set_fill_style_str(&color.css());
                ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
            }
        }
    }
}
