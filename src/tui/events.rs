use anyhow::Result;
use arboard::Clipboard;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tokio::sync::mpsc;
use tracing::warn;

use crate::config::{Config, ConfigStore, JsonFileStore};
use crate::router::{Action, HttpRouter, Reply, Request, Router};
use crate::tui::draw::draw;
use crate::tui::input::handle_text_input_key;
use crate::tui::state::{App, EditorFocus, SettingsFocus, SettingsPanel, SAVE_ERR_MESSAGE, SAVE_OK_MESSAGE};

// ── Entry point ───────────────────────────────────────────────────────────────

pub async fn run(start_in_settings: bool) -> Result<()> {
    let store = JsonFileStore::default_location()?;
    let config = store.load().unwrap_or_else(|e| {
        warn!("falling back to default config: {e:#}");
        Config::default()
    });

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let result = event_loop(&mut terminal, &mut app, &store, start_in_settings).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

// ── Event loop ────────────────────────────────────────────────────────────────

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &JsonFileStore,
    start_in_settings: bool,
) -> Result<()> {
    let mut event_stream = EventStream::new();
    let mut tick = tokio::time::interval(std::time::Duration::from_millis(50));
    // Replies from spawned router tasks: each request sends exactly one.
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<Reply>();

    if start_in_settings {
        open_settings(app, store, &reply_tx);
    }

    loop {
        terminal.draw(|f| draw(f, app))?;

        tokio::select! {
            // 50 ms tick — redraws and clears timed status messages
            _ = tick.tick() => {
                app.clear_expired_status();
            }

            Some(reply) = reply_rx.recv() => match reply {
                Reply::Transform(result) => app.on_transform(result),
                // Probe replies arriving after the overlay closed are dropped.
                Reply::Probe(status) => {
                    if let Some(panel) = app.settings.as_mut() {
                        panel.on_probe(status);
                    }
                }
            },

            Some(Ok(event)) = event_stream.next() => {
                if let Event::Key(key) = event {
                    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                    if ctrl && key.code == KeyCode::Char('c') {
                        return Ok(());
                    }
                    if app.settings.is_some() {
                        handle_settings_key(app, store, key, &reply_tx);
                    } else if !handle_editor_key(app, store, key, &reply_tx) {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Spawn a router task for one request; its reply comes back on the channel.
fn dispatch(config: &Config, req: Request, tx: &mpsc::UnboundedSender<Reply>) {
    let router = HttpRouter::new(config.clone());
    let tx = tx.clone();
    tokio::spawn(async move {
        let _ = tx.send(router.dispatch(req).await);
    });
}

fn open_settings(app: &mut App, store: &JsonFileStore, tx: &mpsc::UnboundedSender<Reply>) {
    // Re-read the store on every open so the panel sees the latest save.
    let config = store.load().unwrap_or_else(|e| {
        warn!("falling back to in-memory config: {e:#}");
        app.config.clone()
    });
    let (panel, probe) = SettingsPanel::open(config);
    dispatch(&app.config, probe, tx);
    app.settings = Some(panel);
}

fn save_settings(app: &mut App, store: &JsonFileStore) {
    let Some(panel) = app.settings.as_mut() else {
        return;
    };
    match store.save(&panel.draft) {
        Ok(()) => {
            app.config = panel.draft.clone();
            panel.set_status(SAVE_OK_MESSAGE, false);
        }
        Err(e) => {
            warn!("failed to save settings: {e:#}");
            panel.set_status(SAVE_ERR_MESSAGE, true);
        }
    }
}

// ── Editor keys ───────────────────────────────────────────────────────────────

/// Returns `false` when the app should quit.
fn handle_editor_key(
    app: &mut App,
    store: &JsonFileStore,
    key: KeyEvent,
    tx: &mpsc::UnboundedSender<Reply>,
) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => return false,
        KeyCode::Char('s') if ctrl => open_settings(app, store, tx),
        KeyCode::Char('y') if ctrl => copy_output(app),
        KeyCode::F(2) => {
            if let Some(req) = app.begin_transform(Action::FixGrammar) {
                dispatch(&app.config, req, tx);
            }
        }
        KeyCode::F(3) => {
            if let Some(req) = app.begin_transform(Action::Rephrase) {
                dispatch(&app.config, req, tx);
            }
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.focus = match app.focus {
                EditorFocus::Input => EditorFocus::Output,
                EditorFocus::Output => EditorFocus::Input,
            };
        }
        _ => match app.focus {
            // Input editing is disabled while a request is in flight.
            EditorFocus::Input if !app.processing => {
                handle_text_input_key(&mut app.input, key, app.input_inner_width);
            }
            EditorFocus::Output => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    app.output_scroll = app.output_scroll.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    app.output_scroll = app.output_scroll.saturating_add(1);
                }
                _ => {}
            },
            _ => {}
        },
    }
    true
}

/// Best-effort clipboard copy of the current output.
fn copy_output(app: &mut App) {
    if let Ok(mut clipboard) = Clipboard::new() {
        if clipboard.set_text(app.output.clone()).is_ok() {
            app.set_status("📋 Copied to clipboard");
        }
    }
}

// ── Settings keys ─────────────────────────────────────────────────────────────

fn handle_settings_key(
    app: &mut App,
    store: &JsonFileStore,
    key: KeyEvent,
    tx: &mpsc::UnboundedSender<Reply>,
) {
    if key.code == KeyCode::Esc {
        // Discard unsaved edits and the probe result.
        app.close_settings();
        return;
    }
    if key.code == KeyCode::Enter
        && app.settings.as_ref().map(|p| p.focus) == Some(SettingsFocus::Save)
    {
        save_settings(app, store);
        return;
    }

    let mut probe: Option<Request> = None;
    {
        let Some(panel) = app.settings.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Tab => panel.next_focus(),
            KeyCode::BackTab => panel.prev_focus(),
            KeyCode::F(5) => probe = Some(panel.request_probe()),
            KeyCode::Up => match panel.focus {
                SettingsFocus::ProviderList => panel.select_previous_provider(),
                SettingsFocus::LocalModelList => panel.select_previous_model(),
                _ => {}
            },
            KeyCode::Down => match panel.focus {
                SettingsFocus::ProviderList => panel.select_next_provider(),
                SettingsFocus::LocalModelList => panel.select_next_model(),
                _ => {}
            },
            KeyCode::Enter => match panel.focus {
                // Test with whatever URL is typed, saved or not.
                SettingsFocus::LocalUrl => probe = Some(panel.request_probe()),
                SettingsFocus::AutoCheck => {
                    panel.draft.auto_check_enabled = !panel.draft.auto_check_enabled;
                }
                _ => panel.next_focus(),
            },
            KeyCode::Char(' ') if panel.focus == SettingsFocus::AutoCheck => {
                panel.draft.auto_check_enabled = !panel.draft.auto_check_enabled;
            }
            KeyCode::Backspace => match panel.focus {
                SettingsFocus::LocalUrl => {
                    panel.draft.local_base_url.pop();
                }
                SettingsFocus::ApiKey => {
                    if let Some(api_key) = panel.draft.api_key.as_mut() {
                        api_key.pop();
                    }
                }
                SettingsFocus::CloudModel => {
                    if let Some(model) = panel.draft.provider_model.as_mut() {
                        model.pop();
                    }
                }
                _ => {}
            },
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                match panel.focus {
                    SettingsFocus::LocalUrl => panel.draft.local_base_url.push(c),
                    SettingsFocus::ApiKey => {
                        panel.draft.api_key.get_or_insert_with(String::new).push(c);
                    }
                    SettingsFocus::CloudModel => {
                        panel
                            .draft
                            .provider_model
                            .get_or_insert_with(String::new)
                            .push(c);
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
    if let Some(req) = probe {
        dispatch(&app.config, req, tx);
    }
}
