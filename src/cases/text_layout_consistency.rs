//! Canvas vs SDF text consistency under fonts with modified metrics.
//!
//! Two text nodes share text and layout options; one is pinned to the canvas
//! renderer, the other uses SDF on top with a translucent color. When both lay
//! out identically they overlap into a single purple block. Each mutation swaps
//! the font family and/or the wrap width on both nodes.

use crate::config::StageConfig;
use crate::harness::{Harness, HarnessError, MutationSequence, Sequencer, StatusReflector};
use crate::scene::{Contain, FontFace, NodeId, Rgba, Scene, TextNodeProps, TextRenderer};

pub const FONT_FAMILY: &str = "Ubuntu";
pub const FONT_FAMILY_MODIFIED: &str = "Ubuntu-Modified-Metrics";

pub const TEXT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat. Duis aute irure dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla pariatur. Excepteur sint occaecat cupidatat non proident, sunt in culpa qui officia deserunt mollit anim id est laborum.";

const FONT_SIZE: u16 = 1;
const CANVAS_COLOR: Rgba = Rgba(0xff0000ff);
const SDF_COLOR: Rgba = Rgba(0x0000ff77);

/// Nodes the mutations and the reflector write to.
#[derive(Debug, Clone, Copy)]
pub struct CaseNodes {
    pub canvas_text: NodeId,
    pub sdf_text: NodeId,
    pub index_info: NodeId,
}

/// Build the scene, its five mutations and the harness around them.
///
/// Nothing is applied yet; drivers start with a forced step to index 0.
pub fn build(stage: &StageConfig) -> Result<(Harness<Scene>, CaseNodes), HarnessError> {
    let mut scene = Scene::new(stage.width, stage.height);
    scene.background = Rgba::WHITE;
    scene.register_font(FONT_FAMILY, FontFace { line_height: 1 });
    scene.register_font(FONT_FAMILY_MODIFIED, FontFace { line_height: 2 });

    let text_props = TextNodeProps {
        y: 0,
        width: stage.width,
        text: TEXT.to_string(),
        font_size: FONT_SIZE,
        font_family: FONT_FAMILY.to_string(),
        contain: Contain::Width,
        ..Default::default()
    };

    let canvas_text = scene.create_text_node(TextNodeProps {
        color: CANVAS_COLOR,
        renderer: TextRenderer::Canvas,
        ..text_props.clone()
    });
    let sdf_text = scene.create_text_node(TextNodeProps {
        color: SDF_COLOR,
        z_index: 3,
        ..text_props
    });
    let index_info = scene.create_text_node(TextNodeProps {
        x: stage.width,
        y: stage.height,
        mount: 1.0,
        color: Rgba::BLACK,
        font_family: FONT_FAMILY.to_string(),
        text: "1".to_string(),
        ..Default::default()
    });

    let nodes = CaseNodes {
        canvas_text,
        sdf_text,
        index_info,
    };

    let half = stage.width / 2;
    let full = stage.width;
    let sequence = MutationSequence::<Scene>::builder()
        .then(move |s: &mut Scene| {
            set_both(s, nodes, |n| {
                n.font_family = FONT_FAMILY.to_string();
                n.width = half;
            })
        })
        .then(move |s: &mut Scene| {
            set_both(s, nodes, |n| n.font_family = FONT_FAMILY_MODIFIED.to_string())
        })
        .then(move |s: &mut Scene| set_both(s, nodes, |n| n.font_family = FONT_FAMILY.to_string()))
        .then(move |s: &mut Scene| {
            set_both(s, nodes, |n| {
                n.font_family = FONT_FAMILY_MODIFIED.to_string();
                n.width = full;
            })
        })
        .then(move |s: &mut Scene| set_both(s, nodes, |n| n.font_family = FONT_FAMILY.to_string()))
        .build()?;

    let sequencer = Sequencer::new(sequence).with_observer(StatusReflector::new(index_info));
    Ok((Harness::new(sequencer, scene), nodes))
}

fn set_both(
    scene: &mut Scene,
    nodes: CaseNodes,
    apply: impl Fn(&mut TextNodeProps),
) -> anyhow::Result<()> {
    apply(scene.try_node_mut(nodes.canvas_text)?);
    apply(scene.try_node_mut(nodes.sdf_text)?);
    Ok(())
}
