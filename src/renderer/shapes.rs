//! Flatten the scene graph into screen-space triangles
//!
//! Every visible node is turned into a few world-space polygons which are
//! projected through the camera. Nodes are painted in render order, far to
//! near within the same order. Anything crossing the near plane is dropped.

use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::TAU;

use super::vertex::{Vertex, colors};
use crate::scene::{Camera, Node, PanelGlyph, PanelStyle, SceneGraph, Shape};

const CIRCLE_SEGMENTS: usize = 24;
const CORNER_SEGMENTS: usize = 6;

/// World to NDC projection for one frame
pub struct Projector {
    view_proj: Mat4,
}

impl Projector {
    pub fn new(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_proj(),
        }
    }

    /// `None` behind (or on) the camera plane
    pub fn project(&self, p: Vec3) -> Option<Vec2> {
        let clip = self.view_proj * p.extend(1.0);
        if clip.w <= 1e-5 {
            return None;
        }
        Some(Vec2::new(clip.x / clip.w, clip.y / clip.w))
    }
}

fn shade(color: [f32; 4], k: f32) -> [f32; 4] {
    [color[0] * k, color[1] * k, color[2] * k, color[3]]
}

/// Triangle fan around `center`; skipped entirely if any point is behind
/// the camera
fn fan(out: &mut Vec<Vertex>, proj: &Projector, center: Vec3, ring: &[Vec3], color: [f32; 4]) {
    let Some(c) = proj.project(center) else {
        return;
    };
    let Some(points) = ring.iter().map(|p| proj.project(*p)).collect::<Option<Vec<_>>>() else {
        return;
    };
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        out.push(Vertex::new(c.x, c.y, color));
        out.push(Vertex::new(a.x, a.y, color));
        out.push(Vertex::new(b.x, b.y, color));
    }
}

fn quad(out: &mut Vec<Vertex>, proj: &Projector, corners: [Vec3; 4], color: [f32; 4]) {
    let Some(p) = corners
        .iter()
        .map(|c| proj.project(*c))
        .collect::<Option<Vec<_>>>()
    else {
        return;
    };
    for i in [0, 1, 2, 0, 2, 3] {
        out.push(Vertex::new(p[i].x, p[i].y, color));
    }
}

/// Axis-aligned rectangle facing +Z
fn rect(out: &mut Vec<Vertex>, proj: &Projector, center: Vec3, half: Vec2, color: [f32; 4]) {
    quad(
        out,
        proj,
        [
            center + Vec3::new(-half.x, -half.y, 0.0),
            center + Vec3::new(half.x, -half.y, 0.0),
            center + Vec3::new(half.x, half.y, 0.0),
            center + Vec3::new(-half.x, half.y, 0.0),
        ],
        color,
    );
}

fn rounded_rect_ring(center: Vec3, half: Vec2, radius: f32) -> Vec<Vec3> {
    let r = radius.clamp(0.0, half.x.min(half.y));
    let corners = [
        (Vec2::new(half.x - r, half.y - r), 0.0),
        (Vec2::new(-half.x + r, half.y - r), 0.25),
        (Vec2::new(-half.x + r, -half.y + r), 0.5),
        (Vec2::new(half.x - r, -half.y + r), 0.75),
    ];
    let mut ring = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (corner, start) in corners {
        for s in 0..=CORNER_SEGMENTS {
            let angle = (start + 0.25 * s as f32 / CORNER_SEGMENTS as f32) * TAU;
            let p = corner + Vec2::new(angle.cos(), angle.sin()) * r;
            ring.push(center + p.extend(0.0));
        }
    }
    ring
}

fn panel(
    out: &mut Vec<Vertex>,
    proj: &Projector,
    center: Vec3,
    size: Vec2,
    style: &PanelStyle,
    alpha: f32,
) {
    let half = size * 0.5;
    let mut fill = style.fill;
    fill[3] *= alpha;
    let ring = rounded_rect_ring(center, half, style.corner_radius * size.y);
    fan(out, proj, center, &ring, fill);

    if let Some(PanelGlyph::Cross) = style.glyph {
        let arm = half.min_element() * 0.6;
        let width = arm * 0.18;
        let lift = center + Vec3::new(0.0, 0.0, 1e-3);
        for dir in [Vec2::new(1.0, 1.0), Vec2::new(1.0, -1.0)] {
            let along = dir.normalize() * arm;
            let across = Vec2::new(-along.y, along.x).normalize() * width;
            quad(
                out,
                proj,
                [
                    lift + (-along - across).extend(0.0),
                    lift + (along - across).extend(0.0),
                    lift + (along + across).extend(0.0),
                    lift + (-along + across).extend(0.0),
                ],
                colors::GLYPH,
            );
        }
    }
}

/// Stand-in glyphs: one block per visible character
fn text(out: &mut Vec<Vertex>, proj: &Projector, center: Vec3, content: &str, extent: Vec2, color: [f32; 4]) {
    let count = content.chars().count();
    if count == 0 {
        return;
    }
    let advance = extent.x / count as f32;
    let half = Vec2::new(advance * 0.35, extent.y * 0.35);
    let left = center.x - extent.x / 2.0 + advance / 2.0;
    for (i, ch) in content.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let c = Vec3::new(left + i as f32 * advance, center.y, center.z);
        rect(out, proj, c, half, color);
    }
}

fn sphere(out: &mut Vec<Vertex>, proj: &Projector, center: Vec3, radius: f32, spin: f32, color: [f32; 4]) {
    let ring: Vec<Vec3> = (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let a = i as f32 / CIRCLE_SEGMENTS as f32 * TAU;
            center + Vec3::new(a.cos(), a.sin(), 0.0) * radius
        })
        .collect();
    fan(out, proj, center, &ring, color);

    // A meridian band sweeping across the disc shows the spin
    let offset = spin.sin() * radius * 0.6;
    let band_half = Vec2::new(radius * 0.12 * spin.cos().abs().max(0.2), radius * 0.9);
    let band_center = center + Vec3::new(offset, 0.0, radius * 0.01);
    rect(out, proj, band_center, band_half, shade(color, colors::SHADE));
}

fn cuboid(out: &mut Vec<Vertex>, proj: &Projector, center: Vec3, size: Vec3, color: [f32; 4]) {
    let h = size * 0.5;
    // Top face, then the front face over it
    quad(
        out,
        proj,
        [
            center + Vec3::new(-h.x, h.y, h.z),
            center + Vec3::new(h.x, h.y, h.z),
            center + Vec3::new(h.x, h.y, -h.z),
            center + Vec3::new(-h.x, h.y, -h.z),
        ],
        shade(color, colors::SHADE),
    );
    rect(out, proj, center + Vec3::new(0.0, 0.0, h.z), Vec2::new(h.x, h.y), color);
}

/// Pick-box silhouette; the visible width follows the facing angle
fn model(
    out: &mut Vec<Vertex>,
    proj: &Projector,
    center: Vec3,
    half: Vec3,
    rotation_y: f32,
    color: [f32; 4],
) {
    let width = rotation_y.cos().abs() * half.x + rotation_y.sin().abs() * half.z;
    let body_half = Vec2::new(width, half.y * 0.6);
    let body_center = center - Vec3::new(0.0, half.y * 0.4, 0.0);
    rect(out, proj, body_center, body_half, color);

    let head_half = Vec2::new(width * 0.7, half.y * 0.35);
    let head_center = center + Vec3::new(0.0, half.y * 0.6, 0.0);
    rect(out, proj, head_center, head_half, shade(color, 0.9));

    // Eyes only while roughly facing the viewer
    if rotation_y.cos() > 0.3 {
        let eye = Vec2::splat(head_half.y * 0.2);
        for side in [-1.0, 1.0] {
            let c = head_center + Vec3::new(side * head_half.x * 0.4, 0.0, 1e-3);
            rect(out, proj, c, eye, colors::MODEL_EYES);
        }
    }
}

fn points(out: &mut Vec<Vertex>, proj: &Projector, origin: Vec3, positions: &[Vec3], size: f32) {
    let half = Vec2::splat(size * 0.5);
    for p in positions {
        rect(out, proj, origin + *p, half, colors::STAR);
    }
}

fn node_vertices(out: &mut Vec<Vertex>, proj: &Projector, node: &Node, pos: Vec3, scale: Vec3) {
    let color = node.color;
    match &node.shape {
        Shape::Group => {}
        Shape::Cuboid { size } => cuboid(out, proj, pos, *size * scale, color),
        Shape::Sphere { radius } => {
            sphere(out, proj, pos, radius * scale.max_element(), node.rotation_y, color)
        }
        Shape::Plane { size } => rect(out, proj, pos, *size * scale.truncate() * 0.5, color),
        Shape::Panel { size, style } => {
            panel(out, proj, pos, *size * scale.truncate(), style, color[3])
        }
        Shape::Text {
            content, extent, ..
        } => text(out, proj, pos, content, *extent * scale.truncate(), color),
        Shape::Points { positions, size } => points(out, proj, pos, positions, *size),
        Shape::Model {
            half_extents,
            offset,
            ..
        } => model(
            out,
            proj,
            pos + *offset * scale,
            *half_extents * scale,
            node.rotation_y,
            color,
        ),
    }
}

/// Every visible node as NDC triangles, in paint order
pub fn tessellate(scene: &SceneGraph, camera: &Camera) -> Vec<Vertex> {
    let proj = Projector::new(camera);
    let mut nodes: Vec<_> = scene
        .visible_nodes()
        .into_iter()
        .filter_map(|(id, pos)| scene.get(id).map(|node| (id, node, pos)))
        .collect();
    nodes.sort_by(|a, b| {
        a.1.render_order
            .cmp(&b.1.render_order)
            .then(a.2.z.total_cmp(&b.2.z))
    });

    let mut out = Vec::new();
    for (id, node, pos) in nodes {
        node_vertices(&mut out, &proj, node, pos, scene.world_scale(id));
    }
    out
}
