use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

use super::{Rgba, Scene};

/// Paints a [`Scene`] into a ratatui buffer.
///
/// Nodes are drawn in `(z_index, creation order)`. A translucent node blends its
/// color with the foreground already present in each cell it covers.
pub struct SceneView<'a> {
    scene: &'a Scene,
}

impl<'a> SceneView<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }
}

impl Widget for SceneView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let stage = Rect::new(area.x, area.y, self.scene.width, self.scene.height)
            .intersection(area)
            .intersection(buf.area);
        if stage.is_empty() {
            return;
        }

        let background = self.scene.background;
        if background.a() > 0 {
            for y in stage.top()..stage.bottom() {
                for x in stage.left()..stage.right() {
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_char(' ').set_bg(to_color(background));
                    }
                }
            }
        }

        let mut order: Vec<_> = self.scene.nodes().collect();
        order.sort_by_key(|(id, node)| (node.z_index, id.index()));

        for (id, node) in order {
            if node.color.a() == 0 {
                continue;
            }
            let (Some(layout), Some((ox, oy))) =
                (self.scene.layout(id), self.scene.absolute_origin(id))
            else {
                continue;
            };

            for (row, line) in layout.lines.iter().enumerate() {
                let y = oy + row as i32 * i32::from(layout.line_height);
                if y < 0 || y >= i32::from(stage.height) {
                    continue;
                }
                for (col, ch) in line.chars().enumerate() {
                    let x = ox + col as i32;
                    if x < 0 || x >= i32::from(stage.width) {
                        continue;
                    }
                    if let Some(cell) = buf.cell_mut((stage.x + x as u16, stage.y + y as u16)) {
                        let fg = blend(node.color, cell.fg);
                        cell.set_char(ch).set_fg(fg);
                    }
                }
            }
        }
    }
}

fn to_color(c: Rgba) -> Color {
    Color::Rgb(c.r(), c.g(), c.b())
}

/// Source-over blend of `src` onto an existing foreground.
fn blend(src: Rgba, dst: Color) -> Color {
    let alpha = u16::from(src.a());
    match dst {
        Color::Rgb(r, g, b) if alpha < 255 => {
            let mix = |s: u8, d: u8| {
                ((u16::from(s) * alpha + u16::from(d) * (255 - alpha)) / 255) as u8
            };
            Color::Rgb(mix(src.r(), r), mix(src.g(), g), mix(src.b(), b))
        }
        _ => to_color(src),
    }
}

/// Render the whole stage into a fresh buffer.
pub fn render_to_buffer(scene: &Scene) -> Buffer {
    let area = Rect::new(0, 0, scene.width, scene.height);
    let mut buf = Buffer::empty(area);
    SceneView::new(scene).render(area, &mut buf);
    buf
}

/// Cell symbols of a buffer, one string per row.
pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Contain, FontFace, TextNodeProps};

    #[test]
    fn test_blend_red_under_translucent_blue() {
        let out = blend(Rgba(0x0000ff77), Color::Rgb(255, 0, 0));
        assert_eq!(out, Color::Rgb(136, 0, 119));
    }

    #[test]
    fn test_opaque_color_replaces_foreground() {
        let out = blend(Rgba(0x00ff00ff), Color::Rgb(255, 0, 0));
        assert_eq!(out, Color::Rgb(0, 255, 0));
    }

    #[test]
    fn test_render_places_wrapped_lines() {
        let mut scene = Scene::new(8, 4);
        scene.register_font("Tall", FontFace { line_height: 2 });
        scene.create_text_node(TextNodeProps {
            x: 1,
            width: 5,
            text: "ab cd".into(),
            contain: Contain::Width,
            font_family: "Tall".into(),
            ..Default::default()
        });

        let buf = render_to_buffer(&scene);
        assert_eq!(
            buffer_lines(&buf),
            vec![" ab cd  ", "        ", "        ", "        "]
        );
    }

    #[test]
    fn test_higher_z_index_paints_last() {
        let mut scene = Scene::new(3, 1);
        scene.create_text_node(TextNodeProps {
            text: "top".into(),
            z_index: 2,
            ..Default::default()
        });
        scene.create_text_node(TextNodeProps {
            text: "low".into(),
            ..Default::default()
        });

        let buf = render_to_buffer(&scene);
        assert_eq!(buffer_lines(&buf), vec!["top"]);
    }

    #[test]
    fn test_nodes_outside_stage_are_clipped() {
        let mut scene = Scene::new(4, 1);
        scene.create_text_node(TextNodeProps {
            x: 2,
            text: "wxyz".into(),
            ..Default::default()
        });

        let buf = render_to_buffer(&scene);
        assert_eq!(buffer_lines(&buf), vec!["  wx"]);
    }
}
