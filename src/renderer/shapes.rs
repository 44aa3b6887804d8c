//! Point generation for curved and composite outlines
//!
//! The canvas backend only needs polylines and polygons, so every curve the
//! scene uses is flattened here.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Rotate `p` around the origin
pub fn rotate(p: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(p)
}

/// Points on a (possibly rotated) ellipse outline
pub fn ellipse_points(center: Vec2, radii: Vec2, rotation: f32, segments: u32) -> Vec<Vec2> {
    (0..segments)
        .map(|i| {
            let theta = (i as f32 / segments as f32) * TAU;
            center + rotate(Vec2::new(radii.x * theta.cos(), radii.y * theta.sin()), rotation)
        })
        .collect()
}

/// Points along a circular arc from `start` to `end`, inclusive
pub fn arc_points(center: Vec2, radius: f32, start: f32, end: f32, segments: u32) -> Vec<Vec2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let theta = start + (end - start) * (i as f32 / segments as f32);
            center + Vec2::new(theta.cos(), theta.sin()) * radius
        })
        .collect()
}

/// Flatten a quadratic bezier, endpoints included
pub fn quad_bezier(p0: Vec2, p1: Vec2, p2: Vec2, segments: u32) -> Vec<Vec2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let u = 1.0 - t;
            p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
        })
        .collect()
}

/// Flatten a cubic bezier, endpoints included
pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, segments: u32) -> Vec<Vec2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let u = 1.0 - t;
            p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
        })
        .collect()
}

/// Heart outline hanging from `top` (the notch), `size` tall
pub fn heart(top: Vec2, size: f32) -> Vec<Vec2> {
    let half = size / 2.0;
    let quarter = size / 4.0;
    let notch = top + Vec2::new(0.0, quarter);
    let tip = top + Vec2::new(0.0, size);
    let left = top + Vec2::new(-half, quarter);
    let right = top + Vec2::new(half, quarter);

    let curves = [
        (notch, top, top + Vec2::new(-half, 0.0), left),
        (left, top + Vec2::new(-half, half), top + Vec2::new(0.0, size * 0.75), tip),
        (tip, top + Vec2::new(0.0, size * 0.75), top + Vec2::new(half, half), right),
        (right, top + Vec2::new(half, 0.0), top, notch),
    ];

    let mut points = Vec::with_capacity(curves.len() * 8);
    for (p0, p1, p2, p3) in curves {
        let mut curve = cubic_bezier(p0, p1, p2, p3, 8);
        // Shared endpoint with the previous curve
        curve.pop();
        points.extend(curve);
    }
    points
}

/// Star with `points` tips, alternating `outer` and `inner` radii
pub fn star(center: Vec2, outer: f32, inner: f32, points: u32, rotation: f32) -> Vec<Vec2> {
    let vertices = points * 2;
    (0..vertices)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let theta = rotation - PI / 2.0 + (i as f32 / vertices as f32) * TAU;
            center + Vec2::new(theta.cos(), theta.sin()) * radius
        })
        .collect()
}

/// Swaying seaweed strand from `y_top` to `y_bottom`, sampled every 15 px
pub fn wavy_strand(x: f32, y_top: f32, y_bottom: f32, phase: f32, wobble: f32) -> Vec<Vec2> {
    let mut points = Vec::new();
    let mut y = y_top;
    while y < y_bottom {
        points.push(Vec2::new(x + (y / 50.0 + phase).sin() * wobble, y));
        y += 15.0;
    }
    points.push(Vec2::new(x + (y_bottom / 50.0 + phase).sin() * wobble, y_bottom));
    points
}

/// One arm of a whirlpool spiral, winding inward from `radius`
pub fn spiral_arm(center: Vec2, radius: f32, arm: u32, arms: u32, rotation: f32, segments: u32) -> Vec<Vec2> {
    let offset = arm as f32 * TAU / arms as f32;
    let reach = (arm + 1) as f32 / arms as f32;
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let r = radius * (1.0 - t) * reach;
            let theta = t * TAU + offset + rotation;
            center + Vec2::new(theta.cos(), theta.sin()) * r
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_ellipse_points_lie_on_ellipse() {
        let center = Vec2::new(10.0, 20.0);
        let radii = Vec2::new(20.0, 12.0);
        for p in ellipse_points(center, radii, 0.0, 16) {
            let d = (p - center) / radii;
            assert!(close(d.length_squared(), 1.0));
        }
    }

    #[test]
    fn test_bezier_hits_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let d = Vec2::new(10.0, 5.0);
        let quad = quad_bezier(a, Vec2::new(5.0, 10.0), d, 6);
        assert_eq!(quad.len(), 7);
        assert_eq!(quad[0], a);
        assert!(close(quad[6].x, d.x) && close(quad[6].y, d.y));

        let cubic = cubic_bezier(a, Vec2::ONE, Vec2::splat(2.0), d, 4);
        assert_eq!(cubic[0], a);
        assert!(close(cubic[4].x, d.x) && close(cubic[4].y, d.y));
    }

    #[test]
    fn test_heart_is_symmetric() {
        let top = Vec2::new(100.0, 50.0);
        let points = heart(top, 20.0);
        assert_eq!(points.len(), 32);
        let min_x = points.iter().map(|p| p.x).fold(f32::MAX, f32::min);
        let max_x = points.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        assert!(close(top.x - min_x, max_x - top.x));
        let lowest = points.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        assert!(close(lowest, top.y + 20.0));
    }

    #[test]
    fn test_star_alternates_radii() {
        let center = Vec2::ZERO;
        let points = star(center, 12.0, 5.0, 5, 0.0);
        assert_eq!(points.len(), 10);
        for (i, p) in points.iter().enumerate() {
            let expected = if i % 2 == 0 { 12.0 } else { 5.0 };
            assert!(close(p.length(), expected));
        }
        // First tip points straight up
        assert!(close(points[0].x, 0.0) && close(points[0].y, -12.0));
    }

    #[test]
    fn test_wavy_strand_spans_range() {
        let points = wavy_strand(30.0, 0.0, 100.0, 0.0, 2.0);
        assert_eq!(points.first().map(|p| p.y), Some(0.0));
        assert_eq!(points.last().map(|p| p.y), Some(100.0));
        assert!(points.iter().all(|p| (p.x - 30.0).abs() <= 2.0));
    }

    #[test]
    fn test_spiral_winds_to_center() {
        let points = spiral_arm(Vec2::new(5.0, 5.0), 25.0, 2, 3, 0.0, 20);
        assert!(close(points[0].distance(Vec2::new(5.0, 5.0)), 25.0));
        assert_eq!(points[20], Vec2::new(5.0, 5.0));
    }
}
