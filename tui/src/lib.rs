//! Terminal host for Tessera using ratatui.
//!
//! Renders the simulated challenge page owned by a [`Controller`]: the solver
//! toggle, the tile grid, undo/submit actions, the status line and the
//! notification modal.

mod host;
mod input;
mod theme;

pub use host::{HostPage, Tile};
pub use input::{
    DEMO_ALERT, HostCommand, InputPump, apply_command, dom_code, handle_events, handle_key,
    host_command,
};
pub use theme::{Glyphs, Palette, glyphs, palette, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use tessera_engine::Controller;
use tessera_types::settings::UiOptions;

const TILE_HEIGHT: u16 = 5;
const MODAL_MAX_WIDTH: u16 = 56;

/// Main draw function
pub fn draw(frame: &mut Frame, controller: &Controller<HostPage>, options: UiOptions) {
    let palette = palette(options);
    let glyphs = glyphs(options);
    let page = controller.page();

    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Title + toggle
            Constraint::Min(3),    // Grid
            Constraint::Length(1), // Undo / submit
            Constraint::Length(1), // Status
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    draw_header(frame, page, chunks[0], &palette, &glyphs);
    draw_grid(frame, page, chunks[1], &palette, &glyphs);
    draw_actions(frame, controller, chunks[2], &palette, &glyphs);
    draw_status_bar(frame, page, chunks[3], &palette);
    draw_key_hints(frame, controller, chunks[4], &palette, &glyphs);

    if let Some(message) = page.modal() {
        draw_alert_modal(frame, message, &palette);
    }
}

fn draw_header(frame: &mut Frame, page: &HostPage, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let (marker, state) = if page.indicator() {
        (glyphs.toggle_on, "ON")
    } else {
        (glyphs.toggle_off, "OFF")
    };
    let toggle = format!(" {marker} CAPTCHA Solver {state} ");
    let toggle_width = toggle.width() as u16;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(toggle_width)])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        page.page_title().to_string(),
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, columns[0]);

    let toggle = Paragraph::new(Line::from(Span::styled(
        toggle,
        styles::toggle(palette, page.indicator(), page.pulse()),
    )))
    .alignment(Alignment::Right);
    frame.render_widget(toggle, columns[1]);
}

fn draw_grid(frame: &mut Frame, page: &HostPage, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let columns = page.columns();
    let rows = page.tiles().len().div_ceil(columns);
    if rows == 0 {
        return;
    }

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(TILE_HEIGHT); rows])
        .split(area);
    let col_constraints = vec![Constraint::Ratio(1, columns as u32); columns];

    for (row, row_area) in row_areas.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(col_constraints.clone())
            .split(*row_area);
        for (col, cell) in cells.iter().enumerate() {
            let index = row * columns + col;
            let Some(tile) = page.tiles().get(index) else {
                continue;
            };
            // `display: none` tiles leave a gap, as on the page.
            if !tile.item.is_visible() {
                continue;
            }
            draw_tile(frame, tile, index == page.cursor(), *cell, palette, glyphs);
        }
    }
}

fn draw_tile(
    frame: &mut Frame,
    tile: &Tile,
    focused: bool,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let mark = if tile.selected {
        glyphs.selected
    } else {
        glyphs.unselected
    };
    let cursor = if focused { glyphs.cursor } else { " " };
    let lines = vec![
        Line::from(vec![
            Span::styled(cursor, styles::key_highlight(palette)),
            Span::raw(" "),
            Span::styled(
                tile.label().to_string(),
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(mark, Style::default().fg(palette.accent)),
        ]),
        Line::from(Span::styled(
            tile.item.fingerprint().to_string(),
            Style::default().fg(palette.text_muted),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::tile_border(palette, tile.selected, focused))
        .style(Style::default().bg(palette.bg_panel));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_actions(
    frame: &mut Frame,
    controller: &Controller<HostPage>,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let page = controller.page();
    let enabled = page.actions_enabled();
    let selection = controller
        .selector()
        .selection()
        .map(tessera_engine::SelectionSet::serialize)
        .unwrap_or_default();
    let mut spans = vec![
        Span::styled(" Undo ", styles::action(palette, enabled)),
        Span::raw(" "),
        Span::styled(" Submit ", styles::action(palette, enabled)),
    ];
    if !selection.is_empty() {
        spans.push(Span::styled(
            format!(" {} selected: {selection}", glyphs.separator),
            Style::default().fg(palette.text_secondary),
        ));
    }
    if let Some(last) = page.submitted().last() {
        spans.push(Span::styled(
            format!(" {} last submit: {last}", glyphs.separator),
            Style::default().fg(palette.text_muted),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub(crate) fn draw_status_bar(frame: &mut Frame, page: &HostPage, area: Rect, palette: &Palette) {
    let text = page.status();
    let color = match text {
        tessera_engine::STATUS_SOLVED => palette.success,
        tessera_engine::STATUS_UNSOLVED | tessera_engine::STATUS_ERROR => palette.error,
        tessera_engine::STATUS_NO_CANDIDATES => palette.warning,
        _ => palette.primary,
    };
    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(text.to_string(), Style::default().fg(color)),
    ]));
    frame.render_widget(status, area);
}

fn draw_key_hints(
    frame: &mut Frame,
    controller: &Controller<HostPage>,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let hints: &[(&str, &str)] = if controller.notifications().is_active() {
        &[
            ("Enter/Esc/Space", "dismiss"),
            ("Backspace", "click backdrop"),
            ("Tab", "click dialog"),
        ]
    } else {
        &[
            ("t", "toggle solver"),
            ("arrows", "move"),
            ("Enter", "select"),
            ("u", "undo"),
            ("s", "submit"),
            ("r", "reload"),
            ("a", "alert"),
            ("q", "quit"),
        ]
    };
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(
                format!(" {} ", glyphs.separator),
                styles::key_hint(palette),
            ));
        }
        spans.push(Span::styled(*key, styles::key_highlight(palette)));
        spans.push(Span::styled(format!(" {action}"), styles::key_hint(palette)));
    }
    let pending = controller.notifications().pending_len();
    if pending > 0 {
        spans.push(Span::styled(
            format!("   +{pending} queued"),
            Style::default().fg(palette.warning),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_alert_modal(frame: &mut Frame, message: &str, palette: &Palette) {
    let area = frame.area();
    let width = MODAL_MAX_WIDTH.min(area.width.saturating_sub(4)).max(10);
    let inner_width = width.saturating_sub(4).max(1) as usize;
    let text_lines = message.width().div_ceil(inner_width).max(1) as u16;
    let height = (text_lines + 4).min(area.height);

    let rect = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.peach))
        .style(Style::default().bg(palette.bg_popup))
        .title(Line::from(Span::styled(
            " Alert ",
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        )));
    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(palette.text_primary),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(block);
    frame.render_widget(body, rect);
}
