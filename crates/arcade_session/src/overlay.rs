//! On-screen roster: one label per player, top-left, in roster order.
//!
//! The overlay is thrown away and rebuilt on every roster change, so label
//! count and order always equal the roster's.

use arcade_math::Vec2;
use tracing::trace;

use crate::roster::PlayerEntity;
use crate::scene::{Label, Node, NodeId, Scene, TextAlign, TextStyle};

pub const LABEL_FONT: &str = "14px Arial";

/// Left margin of every label.
pub const LABEL_MARGIN_X: f32 = 5.0;

/// Vertical centre of the first row.
pub const FIRST_ROW_Y: f32 = 20.0;

/// Distance between consecutive rows.
pub const ROW_PITCH: f32 = 15.0;

/// The label nodes currently showing the roster.
#[derive(Debug, Default)]
pub struct RosterOverlay {
    labels: Vec<NodeId>,
}

impl RosterOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the label for roster row `index` is placed.
    #[must_use]
    pub fn row_position(index: usize) -> Vec2 {
        Vec2::new(LABEL_MARGIN_X, FIRST_ROW_Y + index as f32 * ROW_PITCH)
    }

    /// Remove every label this overlay created. Safe to call when empty.
    pub fn clear(&mut self, scene: &mut Scene) {
        for id in self.labels.drain(..) {
            scene.remove(id);
        }
    }

    /// Replace all labels with one per player, in the order given.
    pub fn rebuild<'a>(
        &mut self,
        players: impl IntoIterator<Item = &'a PlayerEntity>,
        scene: &mut Scene,
    ) {
        self.clear(scene);
        for (index, player) in players.into_iter().enumerate() {
            let id = scene.add(Node::Label(Label {
                text: player.name.clone(),
                style: TextStyle {
                    font: LABEL_FONT.to_string(),
                    fill: player.tint,
                    align: TextAlign::Center,
                },
                anchor: Vec2::new(0.0, 0.5),
                position: Self::row_position(index),
            }));
            self.labels.push(id);
        }
        trace!(labels = self.labels.len(), "roster overlay rebuilt");
    }

    /// The overlay's labels, top row first.
    pub fn labels<'s>(&'s self, scene: &'s Scene) -> impl Iterator<Item = &'s Label> + 's {
        self.labels
            .iter()
            .filter_map(|id| scene.get(*id).and_then(Node::as_label))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
