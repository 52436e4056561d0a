//! Scene graph for the render surface.
//!
//! The [`Scene`] is a flat, ordered node store. Node ids are allocated
//! monotonically and never reused, and iteration follows id order, so nodes
//! added later draw on top of earlier ones.

use std::collections::BTreeMap;

use arcade_math::{Tint, Vec2};

/// Identifier of a node in the [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Handle to a loaded texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureId(pub String);

/// A textured, tinted quad.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub texture: TextureId,
    pub position: Vec2,
    /// Rotation in radians, clockwise.
    pub rotation: f32,
    pub tint: Tint,
    /// Hidden sprites stay in the scene but are skipped by the renderer.
    pub visible: bool,
}

impl Sprite {
    /// A visible, untinted sprite at `position`.
    #[must_use]
    pub fn new(texture: TextureId, position: Vec2) -> Self {
        Self {
            texture,
            position,
            rotation: 0.0,
            tint: Tint::WHITE,
            visible: true,
        }
    }
}

/// Horizontal alignment of multi-line label text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Font and colour of a label.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// CSS-style font shorthand, e.g. `14px Arial`.
    pub font: String,
    pub fill: Tint,
    pub align: TextAlign,
}

/// A text node.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub style: TextStyle,
    /// Anchor as a fraction of the text's own size: `(0, 0.5)` pins the
    /// left edge and vertical centre to `position`.
    pub anchor: Vec2,
    pub position: Vec2,
}

/// Anything that can be drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Sprite(Sprite),
    Label(Label),
}

impl Node {
    /// Returns the sprite if this node is one.
    #[must_use]
    pub fn as_sprite(&self) -> Option<&Sprite> {
        match self {
            Node::Sprite(sprite) => Some(sprite),
            Node::Label(_) => None,
        }
    }

    /// Returns the label if this node is one.
    #[must_use]
    pub fn as_label(&self) -> Option<&Label> {
        match self {
            Node::Label(label) => Some(label),
            Node::Sprite(_) => None,
        }
    }
}

/// The outermost container of everything the surface renders.
#[derive(Debug)]
pub struct Scene {
    nodes: BTreeMap<NodeId, Node>,
    next_id: u64,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Add a node on top of everything already in the scene.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node, returning it if it existed.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.remove(&id)
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Mutable access to a sprite node. Returns `None` for labels.
    pub fn sprite_mut(&mut self, id: NodeId) -> Option<&mut Sprite> {
        match self.nodes.get_mut(&id) {
            Some(Node::Sprite(sprite)) => Some(sprite),
            _ => None,
        }
    }

    /// Nodes in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// All labels in draw order.
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.nodes.values().filter_map(Node::as_label)
    }

    /// Number of sprites currently visible.
    #[must_use]
    pub fn visible_sprites(&self) -> usize {
        self.nodes
            .values()
            .filter_map(Node::as_sprite)
            .filter(|s| s.visible)
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
