//! Scene graph collaborator
//!
//! A flat node arena with parent links. Participants own the ids of the
//! nodes they create; removing a node releases it and its whole subtree.
//! The renderer reads the graph once per frame.

pub mod camera;
pub mod ray;

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};

pub use camera::Camera;
pub use ray::Ray;

/// Handle to a node in the scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// Decoration drawn on top of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelGlyph {
    /// Diagonal cross (close button)
    Cross,
}

/// Declarative description of a procedurally drawn panel texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelStyle {
    /// Corner radius as a fraction of the panel height
    pub corner_radius: f32,
    pub fill: [f32; 4],
    pub glyph: Option<PanelGlyph>,
}

/// Geometry carried by a node
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Transform-only container
    Group,
    Cuboid { size: Vec3 },
    Sphere { radius: f32 },
    /// Flat rectangle facing +Z
    Plane { size: Vec2 },
    /// Rounded textured rectangle facing +Z
    Panel { size: Vec2, style: PanelStyle },
    /// Centered text mesh; `extent` is measured with the font at creation
    Text { content: String, size: f32, extent: Vec2 },
    /// Point cloud (not pickable)
    Points { positions: Vec<Vec3>, size: f32 },
    /// Loaded model bounds, `offset` from the model origin to the box center
    Model { name: String, half_extents: Vec3, offset: Vec3 },
}

/// A node in the scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub shape: Shape,
    pub position: Vec3,
    /// Rotation about +Y (radians)
    pub rotation_y: f32,
    pub scale: Vec3,
    pub visible: bool,
    pub color: [f32; 4],
    /// Higher draws later
    pub render_order: i32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            position: Vec3::ZERO,
            rotation_y: 0.0,
            scale: Vec3::ONE,
            visible: true,
            color: [1.0; 4],
            render_order: 0,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn with_render_order(mut self, order: i32) -> Self {
        self.render_order = order;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Nearest intersection found by [`SceneGraph::raycast`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// The node whose geometry was hit
    pub node: NodeId,
    /// Which of the queried targets the node belongs to
    pub target: NodeId,
    pub distance: f32,
}

/// The shared scene
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, Node>,
    roots: Vec<NodeId>,
    next_id: u32,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            roots: Vec::new(),
            next_id: 1,
        }
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    /// Add a top-level node
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = self.allocate();
        let mut node = node;
        node.parent = None;
        node.children.clear();
        self.nodes.insert(id, node);
        self.roots.push(id);
        id
    }

    /// Add a node under `parent`; `None` if the parent no longer exists
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let id = self.allocate();
        let mut node = node;
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.insert(id, node);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        Some(id)
    }

    /// Remove a node and its subtree. Returns how many nodes were released;
    /// removing an unknown id is a no-op.
    pub fn remove(&mut self, id: NodeId) -> usize {
        let Some(parent) = self.nodes.get(&id).map(|n| n.parent) else {
            return 0;
        };
        match parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(&parent) {
                    p.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
        self.release_subtree(id)
    }

    /// Remove every child of `id`, keeping the node itself
    pub fn clear_children(&mut self, id: NodeId) -> usize {
        let children = match self.nodes.get_mut(&id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return 0,
        };
        children.into_iter().map(|c| self.release_subtree(c)).sum()
    }

    fn release_subtree(&mut self, id: NodeId) -> usize {
        let Some(node) = self.nodes.remove(&id) else {
            return 0;
        };
        1 + node
            .children
            .into_iter()
            .map(|c| self.release_subtree(c))
            .sum::<usize>()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Set the Y coordinate of a node if it exists
    pub fn set_y(&mut self, id: NodeId, y: f32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position.y = y;
        }
    }

    pub fn y(&self, id: NodeId) -> Option<f32> {
        self.nodes.get(&id).map(|n| n.position.y)
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.visible = visible;
        }
    }

    /// Accumulated scale from the root down to `id`
    pub fn world_scale(&self, id: NodeId) -> Vec3 {
        let mut scale = Vec3::ONE;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.nodes.get(&current) else {
                break;
            };
            scale *= node.scale;
            cursor = node.parent;
        }
        scale
    }

    /// World-space origin of a node (translation and scale only)
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        let node = self.nodes.get(&id)?;
        match node.parent {
            Some(parent) => {
                let base = self.world_position(parent)?;
                Some(base + self.world_scale(parent) * node.position)
            }
            None => Some(node.position),
        }
    }

    /// Visible only if the node and every ancestor are visible
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            match self.nodes.get(&current) {
                Some(node) if node.visible => cursor = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Nodes in depth-first order starting at `id`
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                out.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Every visible node with its world position, sorted by render order
    pub fn visible_nodes(&self) -> Vec<(NodeId, Vec3)> {
        let mut out: Vec<(NodeId, Vec3, i32)> = Vec::new();
        for root in &self.roots {
            for id in self.subtree(*root) {
                if !self.is_visible(id) {
                    continue;
                }
                if let (Some(node), Some(pos)) = (self.nodes.get(&id), self.world_position(id)) {
                    out.push((id, pos, node.render_order));
                }
            }
        }
        out.sort_by_key(|(_, _, order)| *order);
        out.into_iter().map(|(id, pos, _)| (id, pos)).collect()
    }

    /// Distance along `ray` to the geometry of a single node (no children)
    pub fn intersect_node(&self, id: NodeId, ray: &Ray) -> Option<f32> {
        let node = self.nodes.get(&id)?;
        let center = self.world_position(id)?;
        let scale = self.world_scale(id);
        match &node.shape {
            Shape::Group | Shape::Points { .. } => None,
            Shape::Cuboid { size } => ray.intersect_aabb(center, *size * scale * 0.5),
            Shape::Sphere { radius } => ray.intersect_sphere(center, radius * scale.max_element()),
            Shape::Plane { size } | Shape::Panel { size, .. } => {
                let half = Vec3::new(size.x * 0.5, size.y * 0.5, 0.001) * scale;
                ray.intersect_aabb(center, half)
            }
            Shape::Text { extent, .. } => {
                let half = Vec3::new(extent.x * 0.5, extent.y * 0.5, 0.01) * scale;
                ray.intersect_aabb(center, half)
            }
            Shape::Model {
                half_extents,
                offset,
                ..
            } => ray.intersect_aabb(center + *offset * scale, *half_extents * scale),
        }
    }

    /// Nearest visible hit among `targets` and (if `recursive`) their
    /// descendants. Hidden nodes and removed targets are skipped.
    pub fn raycast(&self, ray: &Ray, targets: &[NodeId], recursive: bool) -> Option<Hit> {
        let mut best: Option<Hit> = None;
        for &target in targets {
            let candidates = if recursive {
                self.subtree(target)
            } else {
                vec![target]
            };
            for node in candidates {
                if !self.is_visible(node) {
                    continue;
                }
                let Some(distance) = self.intersect_node(node, ray) else {
                    continue;
                };
                if best.is_none_or(|b| distance < b.distance) {
                    best = Some(Hit {
                        node,
                        target,
                        distance,
                    });
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(w: f32, h: f32) -> Node {
        Node::new(Shape::Plane {
            size: Vec2::new(w, h),
        })
    }

    #[test]
    fn test_add_and_remove_subtree() {
        let mut scene = SceneGraph::new();
        let group = scene.add(Node::new(Shape::Group));
        let a = scene.add_child(group, panel(1.0, 1.0)).unwrap();
        let _b = scene.add_child(a, panel(1.0, 1.0)).unwrap();
        assert_eq!(scene.len(), 3);

        assert_eq!(scene.remove(group), 3);
        assert!(scene.is_empty());
        assert!(scene.roots().is_empty());
        // Removing twice is harmless
        assert_eq!(scene.remove(group), 0);
        assert!(scene.add_child(group, panel(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_clear_children_keeps_parent() {
        let mut scene = SceneGraph::new();
        let group = scene.add(Node::new(Shape::Group));
        scene.add_child(group, panel(1.0, 1.0));
        scene.add_child(group, panel(1.0, 1.0));
        assert_eq!(scene.clear_children(group), 2);
        assert!(scene.contains(group));
        assert!(scene.get(group).unwrap().children().is_empty());
    }

    #[test]
    fn test_world_position_follows_parent() {
        let mut scene = SceneGraph::new();
        let group = scene.add(Node::new(Shape::Group).with_position(Vec3::new(0.0, 0.0, -3.0)));
        let child = scene
            .add_child(group, panel(1.0, 1.0).with_position(Vec3::new(1.0, 2.0, 0.0)))
            .unwrap();
        assert_eq!(scene.world_position(child), Some(Vec3::new(1.0, 2.0, -3.0)));
    }

    #[test]
    fn test_raycast_nearest_wins() {
        let mut scene = SceneGraph::new();
        let far = scene.add(panel(2.0, 2.0).with_position(Vec3::new(0.0, 0.0, -5.0)));
        let near = scene.add(panel(2.0, 2.0).with_position(Vec3::new(0.0, 0.0, -1.0)));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);

        let hit = scene.raycast(&ray, &[far, near], false).unwrap();
        assert_eq!(hit.node, near);
        assert_eq!(hit.target, near);
    }

    #[test]
    fn test_raycast_skips_hidden_and_recurses() {
        let mut scene = SceneGraph::new();
        let group = scene.add(Node::new(Shape::Group));
        let child = scene
            .add_child(group, panel(1.0, 1.0).with_position(Vec3::new(0.0, 0.0, -2.0)))
            .unwrap();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);

        assert!(scene.raycast(&ray, &[group], false).is_none());
        let hit = scene.raycast(&ray, &[group], true).unwrap();
        assert_eq!(hit.node, child);
        assert_eq!(hit.target, group);

        scene.set_visible(group, false);
        assert!(scene.raycast(&ray, &[group], true).is_none());
    }

    #[test]
    fn test_visible_nodes_sorted_by_render_order() {
        let mut scene = SceneGraph::new();
        let top = scene.add(panel(1.0, 1.0).with_render_order(10));
        let bottom = scene.add(panel(1.0, 1.0));
        let hidden = scene.add(panel(1.0, 1.0).with_visible(false));
        let ids: Vec<NodeId> = scene.visible_nodes().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![bottom, top]);
        assert!(!ids.contains(&hidden));
    }
}
