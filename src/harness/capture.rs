use async_trait::async_trait;
use jiff::Zoned;
use ratatui::buffer::Buffer;

use crate::scene::render::{buffer_lines, render_to_buffer};
use crate::scene::{NodeId, Scene};

use super::automation::SnapshotCapture;

/// One rendered stage, tagged with the sequencer index it was taken at.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub index: usize,
    /// Text of the status node at capture time, when one was configured.
    pub status: Option<String>,
    pub buffer: Buffer,
    pub captured_at: Zoned,
}

impl CapturedFrame {
    pub fn lines(&self) -> Vec<String> {
        buffer_lines(&self.buffer)
    }
}

/// Keeps rendered frames in memory. Nothing is written to disk.
#[derive(Debug, Clone, Default)]
pub struct BufferCapture {
    frames: Vec<CapturedFrame>,
    status_node: Option<NodeId>,
}

impl BufferCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the text of `node` alongside every frame.
    pub fn with_status_node(mut self, node: NodeId) -> Self {
        self.status_node = Some(node);
        self
    }

    pub fn frames(&self) -> &[CapturedFrame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<CapturedFrame> {
        self.frames
    }
}

#[async_trait]
impl SnapshotCapture<Scene> for BufferCapture {
    async fn capture(&mut self, index: usize, scene: &Scene) -> anyhow::Result<()> {
        let buffer = render_to_buffer(scene);
        let status = self
            .status_node
            .and_then(|id| scene.node(id))
            .map(|n| n.text.clone());

        tracing::debug!(index, status = ?status, "frame rendered");
        self.frames.push(CapturedFrame {
            index,
            status,
            buffer,
            captured_at: Zoned::now(),
        });

        // Let other tasks (log writers, the UI) run between frames.
        tokio::task::yield_now().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::TextNodeProps;

    #[tokio::test]
    async fn test_capture_records_frame_and_status() {
        let mut scene = Scene::new(4, 1);
        let id = scene.create_text_node(TextNodeProps {
            text: "3".into(),
            ..Default::default()
        });
        let mut capture = BufferCapture::new().with_status_node(id);

        capture.capture(2, &scene).await.unwrap();

        let frames = capture.frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].index, 2);
        assert_eq!(frames[0].status.as_deref(), Some("3"));
        assert_eq!(frames[0].lines(), vec!["3   "]);
    }
}
