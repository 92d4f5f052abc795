//! Shape generation for 2D primitives
//!
//! Every shape is emitted as a plain triangle list in screen space.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Filled circle shaded from `inner` at the center to `outer` at the rim
pub fn shaded_circle(center: Vec2, radius: f32, inner: [f32; 4], outer: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = circle(center, radius, outer, segments);
    for v in vertices.iter_mut().step_by(3) {
        v.color = inner;
    }
    vertices
}

/// Generate vertices for a thick arc band around `center`, starting at
/// `theta_start` and sweeping `sweep` radians (positive is clockwise on screen)
pub fn arc_band(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    theta_start: f32,
    sweep: f32,
    color: [f32; 4],
    segments_per_radian: f32,
) -> Vec<Vertex> {
    let sweep = sweep.clamp(-TAU, TAU);
    if sweep == 0.0 {
        return Vec::new();
    }
    let num_segments = ((sweep.abs() * segments_per_radian) as u32).max(2);
    let mut vertices = Vec::with_capacity((num_segments * 6) as usize);

    for i in 0..num_segments {
        let theta1 = theta_start + sweep * (i as f32 / num_segments as f32);
        let theta2 = theta_start + sweep * ((i + 1) as f32 / num_segments as f32);
        let (d1, d2) = (Vec2::from_angle(theta1), Vec2::from_angle(theta2));

        let inner1 = center + d1 * inner_radius;
        let outer1 = center + d1 * outer_radius;
        let inner2 = center + d2 * inner_radius;
        let outer2 = center + d2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Thick line segment as a quad
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = dir.perp() * (width * 0.5);
    quad([from + perp, from - perp, to + perp, to - perp], color)
}

/// Axis-aligned rectangle
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    quad(
        [
            Vec2::new(min.x, min.y),
            Vec2::new(min.x, max.y),
            Vec2::new(max.x, min.y),
            Vec2::new(max.x, max.y),
        ],
        color,
    )
}

/// Two triangles from corners ordered a-b on one edge, c-d on the opposite
fn quad([a, b, c, d]: [Vec2; 4], color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}
