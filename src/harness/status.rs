use crate::scene::{NodeId, Scene};

use super::sequencer::StepObserver;

/// Text shown for a sequencer position: the 1-based index.
pub fn status_text(index: usize) -> String {
    (index + 1).to_string()
}

/// Keeps a scene text node showing the sequencer's current position.
///
/// Written only from successful steps. The sequencer never reads it back.
#[derive(Debug, Clone, Copy)]
pub struct StatusReflector {
    node: NodeId,
}

impl StatusReflector {
    pub fn new(node: NodeId) -> Self {
        Self { node }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Text currently displayed, if the node still exists.
    pub fn displayed<'a>(&self, scene: &'a Scene) -> Option<&'a str> {
        scene.node(self.node).map(|n| n.text.as_str())
    }
}

impl StepObserver<Scene> for StatusReflector {
    fn on_step(&mut self, scene: &mut Scene, index: usize) {
        match scene.node_mut(self.node) {
            Some(node) => node.text = status_text(index),
            None => tracing::warn!(node = self.node.index(), "status node missing"),
        }
    }
}
