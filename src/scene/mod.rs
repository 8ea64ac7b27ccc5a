//! Minimal in-memory scene graph used as the mutation target.
//!
//! Only what the harness needs: text nodes with public properties, a font
//! table with line heights, and a ratatui widget that paints the stage.

pub mod layout;
pub mod render;

use std::collections::HashMap;

use strum_macros::Display;

pub use layout::{TextLayout, layout_text};
pub use render::SceneView;

/// Handle to a node stored in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Packed 0xRRGGBBAA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba(pub u32);

impl Rgba {
    pub const WHITE: Rgba = Rgba(0xffffffff);
    pub const BLACK: Rgba = Rgba(0x000000ff);
    pub const TRANSPARENT: Rgba = Rgba(0x00000000);

    pub fn r(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn g(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn b(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn a(&self) -> u8 {
        self.0 as u8
    }
}

/// How a text node's box constrains its layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Contain {
    /// Single unwrapped block sized to the text.
    #[default]
    None,
    /// Wrap at `width`; height grows with the text.
    Width,
    /// Wrap at `width` and clip to `height`.
    Both,
}

/// Text rendering backend a node is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum TextRenderer {
    Canvas,
    #[default]
    Sdf,
}

/// Per-family font data. The scene does not measure glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontFace {
    /// Rows consumed by each laid-out line.
    pub line_height: u16,
}

impl Default for FontFace {
    fn default() -> Self {
        Self { line_height: 1 }
    }
}

/// Options accepted by [`Scene::create_text_node`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextNodeProps {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    /// Anchor applied to both axes: 0.0 is top-left, 1.0 bottom-right.
    pub mount: f32,
    pub text: String,
    pub font_size: u16,
    pub font_family: String,
    pub color: Rgba,
    pub contain: Contain,
    pub renderer: TextRenderer,
    pub parent: Option<NodeId>,
    pub z_index: i32,
}

impl Default for TextNodeProps {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            mount: 0.0,
            text: String::new(),
            font_size: 1,
            font_family: String::new(),
            color: Rgba::BLACK,
            contain: Contain::None,
            renderer: TextRenderer::default(),
            parent: None,
            z_index: 0,
        }
    }
}

/// A text node. Fields are assigned directly by mutations.
pub type TextNode = TextNodeProps;

/// Stage plus the nodes painted on it.
#[derive(Debug, Clone)]
pub struct Scene {
    pub width: u16,
    pub height: u16,
    pub background: Rgba,
    nodes: Vec<TextNode>,
    fonts: HashMap<String, FontFace>,
}

impl Scene {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            background: Rgba::TRANSPARENT,
            nodes: Vec::new(),
            fonts: HashMap::new(),
        }
    }

    pub fn register_font(&mut self, family: impl Into<String>, face: FontFace) {
        self.fonts.insert(family.into(), face);
    }

    /// Face for `family`, or the default face when it was never registered.
    pub fn font(&self, family: &str) -> FontFace {
        self.fonts.get(family).copied().unwrap_or_default()
    }

    pub fn create_text_node(&mut self, props: TextNodeProps) -> NodeId {
        let id = NodeId(self.nodes.len());
        tracing::trace!(id = id.0, renderer = %props.renderer, "created text node");
        self.nodes.push(props);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&TextNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut TextNode> {
        self.nodes.get_mut(id.0)
    }

    /// Like [`node_mut`](Self::node_mut) but as an error for use inside mutations.
    pub fn try_node_mut(&mut self, id: NodeId) -> anyhow::Result<&mut TextNode> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| anyhow::anyhow!("no text node with id {}", id.0))
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &TextNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Laid-out block for a node using its registered font.
    pub fn layout(&self, id: NodeId) -> Option<TextLayout> {
        let node = self.node(id)?;
        Some(layout_text(node, self.font(&node.font_family)))
    }

    /// Top-left corner of a node in stage coordinates, after the parent chain
    /// and the mount offset.
    pub fn absolute_origin(&self, id: NodeId) -> Option<(i32, i32)> {
        let node = self.node(id)?;
        let layout = layout_text(node, self.font(&node.font_family));
        let (bw, bh) = (
            i32::from(node.width.max(layout.width)),
            i32::from(node.height.max(layout.height)),
        );
        let (mut x, mut y) = (
            i32::from(node.x) - (node.mount * bw as f32).round() as i32,
            i32::from(node.y) - (node.mount * bh as f32).round() as i32,
        );

        // Parents are created before children, so the walk terminates.
        let mut parent = node.parent;
        while let Some(pid) = parent {
            let Some(p) = self.node(pid) else { break };
            if pid.0 >= id.0 {
                break;
            }
            x += i32::from(p.x);
            y += i32::from(p.y);
            parent = p.parent;
        }
        Some((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_channels() {
        let c = Rgba(0x11223344);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (0x11, 0x22, 0x33, 0x44));
    }

    #[test]
    fn test_unknown_font_uses_default_face() {
        let mut scene = Scene::new(10, 10);
        scene.register_font("Tall", FontFace { line_height: 3 });
        assert_eq!(scene.font("Tall").line_height, 3);
        assert_eq!(scene.font("Missing"), FontFace::default());
    }

    #[test]
    fn test_node_mut_assigns_properties() {
        let mut scene = Scene::new(10, 10);
        let id = scene.create_text_node(TextNodeProps {
            text: "a".into(),
            ..Default::default()
        });
        scene.node_mut(id).unwrap().text = "b".into();
        assert_eq!(scene.node(id).unwrap().text, "b");
        assert!(scene.try_node_mut(NodeId(9)).is_err());
    }

    #[test]
    fn test_absolute_origin_applies_mount_and_parent() {
        let mut scene = Scene::new(40, 20);
        let parent = scene.create_text_node(TextNodeProps {
            x: 5,
            y: 2,
            ..Default::default()
        });
        let child = scene.create_text_node(TextNodeProps {
            x: 20,
            y: 10,
            mount: 1.0,
            text: "42".into(),
            parent: Some(parent),
            ..Default::default()
        });

        // "42" lays out as 2x1, anchored at its bottom-right corner.
        assert_eq!(scene.absolute_origin(child), Some((5 + 20 - 2, 2 + 10 - 1)));
    }
}
