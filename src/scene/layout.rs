use std::borrow::Cow;

use textwrap::core::display_width;

use super::{Contain, FontFace, TextNode};

/// Laid-out block of a text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayout {
    pub lines: Vec<String>,
    /// Widest line, in cells.
    pub width: u16,
    /// `lines.len() * line_height`, in cells.
    pub height: u16,
    pub line_height: u16,
}

/// Break a node's text into lines according to its `contain` policy.
pub fn layout_text(node: &TextNode, face: FontFace) -> TextLayout {
    let line_height = face.line_height.max(1);

    let wrap_width = match node.contain {
        Contain::Width | Contain::Both if node.width > 0 => Some(usize::from(node.width)),
        _ => None,
    };

    let mut lines: Vec<String> = match (node.text.is_empty(), wrap_width) {
        (true, _) => Vec::new(),
        (false, Some(width)) => textwrap::wrap(&node.text, width)
            .into_iter()
            .map(Cow::into_owned)
            .collect(),
        (false, None) => node.text.lines().map(str::to_owned).collect(),
    };

    if node.contain == Contain::Both && node.height > 0 {
        lines.truncate(usize::from(node.height / line_height));
    }

    let width = lines
        .iter()
        .map(|line| display_width(line))
        .max()
        .unwrap_or(0);
    let width = u16::try_from(width).unwrap_or(u16::MAX);
    let rows = u16::try_from(lines.len()).unwrap_or(u16::MAX);

    TextLayout {
        lines,
        width,
        height: rows.saturating_mul(line_height),
        line_height,
    }
}
