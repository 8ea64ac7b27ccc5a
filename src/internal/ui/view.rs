use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::harness::status_text;
use crate::internal::notification::Notification;
use crate::internal::ui::app::Action;
use crate::internal::ui::keybindings::KeyBindingMap;
use crate::scene::{Scene, SceneView};

/// Everything the view needs besides the scene itself.
pub struct ViewState<'a> {
    pub index: usize,
    pub len: usize,
    pub notification: Option<&'a Notification>,
    pub keybindings: &'a KeyBindingMap,
    pub show_help: bool,
}

pub fn draw(f: &mut Frame, scene: &Scene, state: &ViewState) {
    let [stage_area, status_area, notification_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(f.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" text layout consistency ");
    let inner = block.inner(stage_area);
    f.render_widget(block, stage_area);
    f.render_widget(SceneView::new(scene), inner);

    f.render_widget(status_line(state), status_area);

    if let Some(notification) = state.notification {
        let style = Style::default().fg(notification.notification_type.color());
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(" {}", notification.message),
                style,
            ))),
            notification_area,
        );
    }

    if state.show_help {
        draw_help(f, state.keybindings);
    }
}

fn status_line<'a>(state: &ViewState) -> Paragraph<'a> {
    let advance_keys = state.keybindings.keys_for(&Action::Advance).join("/");
    let help_keys = state.keybindings.keys_for(&Action::ToggleHelp).join("/");
    Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" mutation {}/{} ", status_text(state.index), state.len),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {advance_keys}: next  {help_keys}: help"),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}

fn draw_help(f: &mut Frame, keybindings: &KeyBindingMap) {
    let rows = [
        (Action::Advance, "apply next mutation (wraps)"),
        (Action::ToggleHelp, "toggle this help"),
        (Action::Quit, "quit"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(action, description)| {
            Line::from(vec![
                Span::styled(
                    format!("{:>14} ", keybindings.keys_for(action).join(", ")),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(*description),
            ])
        })
        .collect();

    let area = centered(f.area(), 50, lines.len() as u16 + 2);
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" keys ")),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
