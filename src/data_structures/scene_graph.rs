//! A single-level scene graph: one group owning named mesh nodes.
//!
//! The planet group holds the Earth and its atmosphere shell. World matrices
//! are the group transform composed with each node's local transform.

use cgmath::Matrix4;

use crate::data_structures::transform::Transform;

/// Which material a mesh node is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Earth,
    Atmosphere,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub kind: MeshKind,
    pub transform: Transform,
}

impl Node {
    pub fn new(name: &str, kind: MeshKind, transform: Transform) -> Self {
        Self {
            name: name.to_string(),
            kind,
            transform,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub transform: Transform,
    children: Vec<Node>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn find(&self, kind: MeshKind) -> Option<&Node> {
        self.children.iter().find(|node| node.kind == kind)
    }

    pub fn find_mut(&mut self, kind: MeshKind) -> Option<&mut Node> {
        self.children.iter_mut().find(|node| node.kind == kind)
    }

    pub fn world_matrix(&self, kind: MeshKind) -> Option<Matrix4<f32>> {
        self.find(kind).map(|node| &self.transform * &node.transform)
    }
}
