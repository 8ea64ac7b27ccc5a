use ratatui::{Terminal, backend::TestBackend};
use text_layout_harness::cases::text_layout_consistency;
use text_layout_harness::config::StageConfig;
use text_layout_harness::internal::notification::Notification;
use text_layout_harness::internal::ui::keybindings::KeyBindingMap;
use text_layout_harness::internal::ui::view::{ViewState, draw};
use text_layout_harness::scene::render::buffer_lines;

fn render(show_help: bool, notification: Option<&Notification>) -> Vec<String> {
    let (mut harness, _) = text_layout_consistency::build(&StageConfig::default()).unwrap();
    harness.seek(0).unwrap();

    let backend = TestBackend::new(80, 26);
    let mut terminal = Terminal::new(backend).unwrap();
    let keybindings = KeyBindingMap::with_defaults();
    let state = ViewState {
        index: harness.current_index(),
        len: harness.len(),
        notification,
        keybindings: &keybindings,
        show_help,
    };

    terminal
        .draw(|f| draw(f, harness.entities(), &state))
        .unwrap();
    buffer_lines(terminal.backend().buffer())
}

#[test]
fn test_status_bar_shows_position_and_keys() {
    let lines = render(false, None);
    let status = &lines[24];
    assert!(status.contains("mutation 1/5"), "status line was {status:?}");
    assert!(status.contains("Right: next"));
}

#[test]
fn test_stage_shows_reflector_in_corner() {
    let lines = render(false, None);
    // Stage is 60x20 inside the border, so the reflector sits at column 60, row 20.
    let row: Vec<char> = lines[20].chars().collect();
    assert_eq!(row[60], '1');
}

#[test]
fn test_notification_line() {
    let n = Notification::error("mutation 2 failed: boom");
    let lines = render(false, Some(&n));
    assert!(lines[25].contains("mutation 2 failed: boom"));
}

#[test]
fn test_help_popup_lists_bindings() {
    let lines = render(true, None);
    let text = lines.join("\n");
    assert!(text.contains("apply next mutation"));
    assert!(text.contains("Ctrl+c, Esc, q"));
}
