use ratatui::{
    backend::TestBackend,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::config::Provider;
use crate::tui::state::{App, EditorFocus, SettingsFocus};

const BORDER_DIM: Color = Color::Rgb(50, 50, 80);
const BG: Color = Color::Rgb(15, 15, 25);

// ── Drawing ───────────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Background
    f.render_widget(Block::default().style(Style::default().bg(BG)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(f, chunks[0]);
    draw_editor(f, chunks[1], app);
    draw_footer(f, chunks[2], app);

    if app.settings.is_some() {
        draw_settings_overlay(f, chunks[1], app);
    }
}

fn draw_header(f: &mut Frame, area: Rect) {
    let banner = vec![
        Line::from(vec![
            Span::styled(
                " Purgify",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  v", Style::default().fg(Color::DarkGray)),
            Span::styled(env!("CARGO_PKG_VERSION"), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(
            " AI-powered writing enhancement",
            Style::default().fg(Color::Gray),
        )),
    ];

    let header = Paragraph::new(banner)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(BORDER_DIM)),
        )
        .alignment(Alignment::Left);
    f.render_widget(header, area);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let hint = if app.settings.is_some() {
        " Tab Next field   ↑↓ Select   Enter Apply   F5 Test connection   Esc Close "
    } else if app.processing {
        " Processing…   Ctrl+S Settings   Esc Quit "
    } else {
        " Tab Focus   F2 Fix Grammar   F3 Rephrase   Ctrl+Y Copy   Ctrl+S Settings   Esc Quit "
    };
    let footer = Paragraph::new(hint)
        .style(Style::default().fg(Color::DarkGray).bg(BG))
        .alignment(Alignment::Center);
    f.render_widget(footer, area);
}

// ── Editor screen ─────────────────────────────────────────────────────────────

fn draw_editor(f: &mut Frame, area: Rect, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    draw_input(f, rows[0], app);
    draw_status_line(f, rows[1], app);
    draw_output(f, rows[2], app);
}

fn draw_input(f: &mut Frame, area: Rect, app: &mut App) {
    let focused = app.focus == EditorFocus::Input && app.settings.is_none();
    let active = focused && !app.processing;

    let cursor_style = if active {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    app.input_inner_width = inner_width.max(1);
    let inner_height = area.height.saturating_sub(2) as usize;

    // Build the input lines with the cursor marked inline, splitting on
    // newlines so the cursor highlight lands in the right logical line.
    let (before, cursor_ch, after) = app.input.split_at_cursor();
    let combined = format!("{before}\x00{cursor_ch}\x00{after}");
    let mut input_lines: Vec<Line> = Vec::new();
    for logical in combined.split('\n') {
        if let Some(c0) = logical.find('\x00') {
            let rest = &logical[c0 + 1..];
            if let Some(c1) = rest.find('\x00') {
                input_lines.push(Line::from(vec![
                    Span::styled(logical[..c0].to_string(), Style::default().fg(Color::White)),
                    Span::styled(rest[..c1].to_string(), cursor_style),
                    Span::styled(rest[c1 + 1..].to_string(), Style::default().fg(Color::White)),
                ]));
            } else {
                input_lines.push(Line::from(Span::styled(
                    logical.replace('\x00', ""),
                    Style::default().fg(Color::White),
                )));
            }
        } else {
            input_lines.push(Line::from(Span::styled(
                logical.to_string(),
                Style::default().fg(Color::White),
            )));
        }
    }

    // Keep the cursor row visible.
    let cursor_row = app.input.cursor_row(app.input_inner_width);
    if (cursor_row as usize) < app.input_scroll as usize {
        app.input_scroll = cursor_row;
    } else if inner_height > 0
        && (cursor_row as usize) >= app.input_scroll as usize + inner_height
    {
        app.input_scroll = cursor_row.saturating_sub((inner_height as u16).saturating_sub(1));
    }

    let title = if app.processing {
        " Input  [waiting for reply] "
    } else {
        " Input  [F2 Fix Grammar · F3 Rephrase] "
    };
    let input_widget = Paragraph::new(input_lines)
        .block(
            Block::default()
                .title(title)
                .title_style(Style::default().fg(if active { Color::Yellow } else { Color::DarkGray }))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if active { Color::Yellow } else { BORDER_DIM })),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.input_scroll, 0));
    f.render_widget(input_widget, area);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let line = if app.processing {
        Line::from(Span::styled(" Processing…", Style::default().fg(Color::Yellow)))
    } else if let Some(error) = &app.error {
        Line::from(Span::styled(
            format!(" ✘ {error}"),
            Style::default().fg(Color::Red),
        ))
    } else if !app.status.is_empty() {
        Line::from(Span::styled(
            format!(" {}", app.status),
            Style::default().fg(Color::Green),
        ))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_output(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == EditorFocus::Output && app.settings.is_none();
    let body: Paragraph = if app.output.is_empty() {
        Paragraph::new(Span::styled(
            " Transformed text appears here.",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(app.output.as_str()).style(Style::default().fg(Color::White))
    };
    let output = body
        .block(
            Block::default()
                .title(" Output  [Ctrl+Y Copy] ")
                .title_style(
                    Style::default()
                        .fg(if focused { Color::Yellow } else { Color::Cyan })
                        .add_modifier(Modifier::BOLD),
                )
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if focused { Color::Yellow } else { BORDER_DIM })),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.output_scroll, 0));
    f.render_widget(output, area);
}

// ── Settings overlay ──────────────────────────────────────────────────────────

fn draw_settings_overlay(f: &mut Frame, area: Rect, app: &mut App) {
    let Some(panel) = app.settings.as_mut() else {
        return;
    };

    let modal = centered_rect(area, 64, 26);
    f.render_widget(Clear, modal);
    let frame_block = Block::default()
        .title(" Settings ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Rgb(20, 20, 35)));
    let inner = frame_block.inner(modal);
    f.render_widget(frame_block, modal);

    let is_cloud = panel.draft.provider.is_cloud();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),                                // provider list
            Constraint::Length(if is_cloud { 0 } else { 3 }),     // local url
            Constraint::Length(if is_cloud { 0 } else { 1 }),     // connection status
            Constraint::Length(if is_cloud { 0 } else { 6 }),     // local model list
            Constraint::Length(if is_cloud { 3 } else { 0 }),     // api key
            Constraint::Length(if is_cloud { 3 } else { 0 }),     // cloud model
            Constraint::Length(3),                                // auto check
            Constraint::Length(3),                                // save
            Constraint::Length(1),                                // status
            Constraint::Min(0),
        ])
        .split(inner);

    // Provider list
    let provider_focused = panel.focus == SettingsFocus::ProviderList;
    let provider_items: Vec<ListItem> = Provider::all()
        .iter()
        .map(|p| ListItem::new(p.label().to_string()))
        .collect();
    let provider_list = List::new(provider_items)
        .block(
            Block::default()
                .title(" Provider (↑/↓) ")
                .title_style(focus_title(provider_focused))
                .borders(Borders::ALL)
                .border_style(focus_border(provider_focused)),
        )
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .highlight_symbol("▶ ");
    f.render_stateful_widget(provider_list, rows[0], &mut panel.provider_list_state);

    if is_cloud {
        // API key, masked
        let key_focused = panel.focus == SettingsFocus::ApiKey;
        let key_len = panel.draft.api_key.as_deref().unwrap_or("").len();
        let key_display = "•".repeat(key_len.min(20));
        let key_widget = Paragraph::new(key_display)
            .block(
                Block::default()
                    .title(" API Key ")
                    .title_style(focus_title(key_focused))
                    .borders(Borders::ALL)
                    .border_style(focus_border(key_focused)),
            )
            .style(Style::default().fg(Color::White));
        f.render_widget(key_widget, rows[4]);

        // Model name, free-form with a per-provider placeholder
        let model_focused = panel.focus == SettingsFocus::CloudModel;
        let model_value = panel.draft.provider_model.as_deref().unwrap_or("");
        let model_widget = if model_value.is_empty() {
            Paragraph::new(Span::styled(
                panel.draft.provider.model_hint().to_string(),
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Paragraph::new(model_value.to_string()).style(Style::default().fg(Color::White))
        };
        let model_widget = model_widget.block(
            Block::default()
                .title(" Model ")
                .title_style(focus_title(model_focused))
                .borders(Borders::ALL)
                .border_style(focus_border(model_focused)),
        );
        f.render_widget(model_widget, rows[5]);
    } else {
        // Local engine URL
        let url_focused = panel.focus == SettingsFocus::LocalUrl;
        let url_widget = Paragraph::new(panel.draft.local_base_url.clone())
            .block(
                Block::default()
                    .title(" Local engine URL  [Enter Test] ")
                    .title_style(focus_title(url_focused))
                    .borders(Borders::ALL)
                    .border_style(focus_border(url_focused)),
            )
            .style(Style::default().fg(Color::White));
        f.render_widget(url_widget, rows[1]);

        // Connection indicator
        let (conn_text, conn_color) = if panel.probe_pending {
            ("Checking…", Color::Yellow)
        } else if panel.probe.connected {
            ("Connected", Color::Green)
        } else {
            ("Not connected", Color::Red)
        };
        let conn = Line::from(vec![
            Span::styled(" Connection: ", Style::default().fg(Color::DarkGray)),
            Span::styled(conn_text, Style::default().fg(conn_color)),
        ]);
        f.render_widget(Paragraph::new(conn), rows[2]);

        // Model list: probed models, or the configured model as sole option
        let model_focused = panel.focus == SettingsFocus::LocalModelList;
        let options = panel.model_options();
        let model_items: Vec<ListItem> = options
            .iter()
            .map(|m| ListItem::new(m.clone()))
            .collect();
        let model_list = List::new(model_items)
            .block(
                Block::default()
                    .title(" Model (↑/↓) ")
                    .title_style(focus_title(model_focused))
                    .borders(Borders::ALL)
                    .border_style(focus_border(model_focused)),
            )
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Green))
            .highlight_symbol("▶ ");
        f.render_stateful_widget(model_list, rows[3], &mut panel.model_list_state);
    }

    // Auto grammar check toggle
    let auto_focused = panel.focus == SettingsFocus::AutoCheck;
    let mark = if panel.draft.auto_check_enabled { "[x]" } else { "[ ]" };
    let auto_widget = Paragraph::new(format!(" {mark} Automatic grammar checking"))
        .block(
            Block::default()
                .title(" Auto Check  [Space] ")
                .title_style(focus_title(auto_focused))
                .borders(Borders::ALL)
                .border_style(focus_border(auto_focused)),
        )
        .style(Style::default().fg(Color::White));
    f.render_widget(auto_widget, rows[6]);

    // Save
    let save_focused = panel.focus == SettingsFocus::Save;
    let save_style = if save_focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let save_widget = Paragraph::new(Span::styled(" Save Settings ", save_style))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_border(save_focused)),
        );
    f.render_widget(save_widget, rows[7]);

    // Status message
    if !panel.status.is_empty() {
        let color = if panel.status_is_error { Color::Red } else { Color::Green };
        let status = Paragraph::new(Span::styled(
            format!(" {}", panel.status),
            Style::default().fg(color),
        ));
        f.render_widget(status, rows[8]);
    }
}

fn focus_title(focused: bool) -> Style {
    Style::default().fg(if focused { Color::Yellow } else { Color::DarkGray })
}

fn focus_border(focused: bool) -> Style {
    Style::default().fg(if focused { Color::Yellow } else { BORDER_DIM })
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width - w) / 2;
    let y = area.y + (area.height - h) / 2;
    Rect::new(x, y, w, h)
}

// ── Test helpers ──────────────────────────────────────────────────────────────

/// Render the current app state into an in-memory buffer using `TestBackend`.
/// Useful for unit tests that need to assert on rendered output without a
/// real terminal.
pub fn render_to_buffer(app: &mut App, width: u16, height: u16) -> Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("TestBackend terminal");
    terminal.draw(|f| draw(f, app)).expect("draw");
    terminal.backend().buffer().clone()
}
