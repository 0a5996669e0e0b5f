//! Drawing the timer screen.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::view::{Control, ViewModel};
use crate::types::Mode;

fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Readout style; the active readout is highlighted.
fn readout_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn status_style(view: &ViewModel) -> Style {
    if view.is_alarm() {
        return Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK);
    }
    match view.mode {
        Mode::Idle => Style::default().fg(Color::Gray),
        Mode::Working => Style::default().fg(Color::Magenta),
        Mode::Resting => Style::default().fg(Color::Green),
    }
}

fn control_style(control: &Control) -> Style {
    if control.enabled {
        Style::default()
            .fg(Color::Black)
            .bg(Color::LightCyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Screen regions, top to bottom.
struct ScreenLayout {
    status: Rect,
    work: Rect,
    rest: Rect,
    controls: Rect,
    hints: Rect,
}

fn create_layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status
            Constraint::Length(3), // Working readout
            Constraint::Length(3), // Resting readout
            Constraint::Length(1), // Controls
            Constraint::Min(0),
            Constraint::Length(1), // Hints
        ])
        .split(area);

    ScreenLayout {
        status: chunks[0],
        work: chunks[1],
        rest: chunks[2],
        controls: chunks[3],
        hints: chunks[5],
    }
}

fn readout(label: &str, value: &str, active: bool) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(value.to_string(), readout_style(active))))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(label.to_string(), title_style())),
        )
}

fn controls_line(view: &ViewModel) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, control) in view.controls().iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!(" {} [{}] ", control.label, control.key),
            control_style(control),
        ));
    }
    Line::from(spans)
}

/// Draws one frame.
pub fn draw(frame: &mut Frame, view: &ViewModel) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" workrest ", title_style()));
    let inner = outer.inner(frame.size());
    frame.render_widget(outer, frame.size());

    let layout = create_layout(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(view.status(), status_style(view)))
            .alignment(Alignment::Center),
        layout.status,
    );
    frame.render_widget(
        readout("Working", &view.work_readout, view.mode == Mode::Working),
        layout.work,
    );
    frame.render_widget(
        readout("Resting", &view.rest_readout, view.mode == Mode::Resting),
        layout.rest,
    );
    frame.render_widget(
        Paragraph::new(controls_line(view)).alignment(Alignment::Center),
        layout.controls,
    );
    frame.render_widget(
        Paragraph::new(" q quit   ctrl-z suspend").style(hint_style()),
        layout.hints,
    );
}
