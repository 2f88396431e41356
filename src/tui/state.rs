use ratatui::widgets::ListState;
use std::time::{Duration, Instant};

use crate::config::{Config, Provider};
use crate::router::{Action, ProbeStatus, Request, GENERIC_FAILURE};
use crate::tui::input::TextInput;

// ── Messages and timing ───────────────────────────────────────────────────────

/// Local validation message for empty input; no request is sent.
pub const EMPTY_INPUT_ERROR: &str = "Please enter some text to process";

pub const SAVE_OK_MESSAGE: &str = "Settings saved successfully!";
pub const SAVE_ERR_MESSAGE: &str = "Error saving settings";

/// How long transient status messages stay on screen.
pub const STATUS_TTL: Duration = Duration::from_secs(3);

// ── Editor focus ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EditorFocus {
    Input,
    Output,
}

// ── Settings focus ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SettingsFocus {
    ProviderList,
    LocalUrl,
    LocalModelList,
    ApiKey,
    CloudModel,
    AutoCheck,
    Save,
}

// ── Settings panel ────────────────────────────────────────────────────────────

/// Modal settings state. Created fresh every time the overlay opens; edits
/// live in `draft` and reach the store only on save.
pub struct SettingsPanel {
    pub draft: Config,
    pub focus: SettingsFocus,
    pub provider_list_state: ListState,
    pub model_list_state: ListState,
    pub probe: ProbeStatus,
    pub probe_pending: bool,
    pub status: String,
    pub status_is_error: bool,
    pub status_set_at: Option<Instant>,
}

impl SettingsPanel {
    /// Build the panel for the given (already loaded) config and return the
    /// probe request to fire against the configured local engine URL.
    pub fn open(config: Config) -> (Self, Request) {
        let mut provider_list_state = ListState::default();
        provider_list_state.select(Some(provider_index(config.provider)));
        let mut model_list_state = ListState::default();
        model_list_state.select(Some(0));
        let host = config.local_base_url.clone();
        let panel = SettingsPanel {
            draft: config,
            focus: SettingsFocus::ProviderList,
            provider_list_state,
            model_list_state,
            probe: ProbeStatus::default(),
            probe_pending: true,
            status: String::new(),
            status_is_error: false,
            status_set_at: None,
        };
        (panel, Request::Probe { host })
    }

    /// Focusable fields in display order for the current provider. Exactly
    /// one of the local / cloud sections is ever part of the ring.
    pub fn focus_ring(&self) -> Vec<SettingsFocus> {
        if self.draft.provider.is_cloud() {
            vec![
                SettingsFocus::ProviderList,
                SettingsFocus::ApiKey,
                SettingsFocus::CloudModel,
                SettingsFocus::AutoCheck,
                SettingsFocus::Save,
            ]
        } else {
            vec![
                SettingsFocus::ProviderList,
                SettingsFocus::LocalUrl,
                SettingsFocus::LocalModelList,
                SettingsFocus::AutoCheck,
                SettingsFocus::Save,
            ]
        }
    }

    pub fn next_focus(&mut self) {
        let ring = self.focus_ring();
        let i = ring.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = ring[(i + 1) % ring.len()];
    }

    pub fn prev_focus(&mut self) {
        let ring = self.focus_ring();
        let i = ring.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = ring[(i + ring.len() - 1) % ring.len()];
    }

    pub fn select_previous_provider(&mut self) {
        let i = provider_index(self.draft.provider).saturating_sub(1);
        self.set_provider(Provider::all()[i]);
    }

    pub fn select_next_provider(&mut self) {
        let all = Provider::all();
        let i = (provider_index(self.draft.provider) + 1).min(all.len() - 1);
        self.set_provider(all[i]);
    }

    fn set_provider(&mut self, provider: Provider) {
        self.draft.provider = provider;
        self.provider_list_state.select(Some(provider_index(provider)));
    }

    /// Options for the local model selector: the probed model list, or the
    /// currently configured model as the only entry when the probe came back
    /// empty.
    pub fn model_options(&self) -> Vec<String> {
        if self.probe.models.is_empty() {
            vec![self.draft.local_model.clone()]
        } else {
            self.probe.models.clone()
        }
    }

    pub fn select_previous_model(&mut self) {
        let i = self.model_list_state.selected().unwrap_or(0).saturating_sub(1);
        self.model_list_state.select(Some(i));
        if let Some(m) = self.model_options().get(i) {
            self.draft.local_model = m.clone();
        }
    }

    pub fn select_next_model(&mut self) {
        let max = self.model_options().len().saturating_sub(1);
        let i = (self.model_list_state.selected().unwrap_or(0) + 1).min(max);
        self.model_list_state.select(Some(i));
        if let Some(m) = self.model_options().get(i) {
            self.draft.local_model = m.clone();
        }
    }

    /// Manual connectivity test against whatever URL is currently typed,
    /// saved or not.
    pub fn request_probe(&mut self) -> Request {
        self.probe_pending = true;
        Request::Probe {
            host: self.draft.local_base_url.clone(),
        }
    }

    pub fn on_probe(&mut self, status: ProbeStatus) {
        self.probe_pending = false;
        self.probe = status;
        let options = self.model_options();
        let i = options
            .iter()
            .position(|m| *m == self.draft.local_model)
            .unwrap_or(0);
        self.model_list_state.select(Some(i));
    }

    /// Success messages self-clear after `STATUS_TTL`; error messages stay
    /// until the overlay closes or the next save.
    pub fn set_status(&mut self, message: &str, is_error: bool) {
        self.status = message.to_string();
        self.status_is_error = is_error;
        self.status_set_at = if is_error { None } else { Some(Instant::now()) };
    }
}

pub fn provider_index(provider: Provider) -> usize {
    Provider::all()
        .iter()
        .position(|p| *p == provider)
        .unwrap_or(0)
}

// ── App state ─────────────────────────────────────────────────────────────────

pub struct App {
    pub config: Config,
    pub input: TextInput,
    pub output: String,
    pub error: Option<String>,
    pub processing: bool,
    pub focus: EditorFocus,
    pub status: String,
    pub status_set_at: Option<Instant>,
    /// `Some` while the settings overlay is visible.
    pub settings: Option<SettingsPanel>,
    pub output_scroll: u16,
    /// Inner width of the input box — updated every draw, used for cursor
    /// navigation.
    pub input_inner_width: usize,
    /// Vertical scroll offset of the input box (cursor-line tracking).
    pub input_scroll: u16,
}

impl App {
    pub fn new(config: Config) -> Self {
        App {
            config,
            input: TextInput::new(),
            output: String::new(),
            error: None,
            processing: false,
            focus: EditorFocus::Input,
            status: String::new(),
            status_set_at: None,
            settings: None,
            output_scroll: 0,
            input_inner_width: 60,
            input_scroll: 0,
        }
    }

    /// Begin a transformation. Returns the request to dispatch, or `None`
    /// when the input is rejected locally (empty after trimming) or another
    /// request is still in flight.
    pub fn begin_transform(&mut self, action: Action) -> Option<Request> {
        if self.processing {
            return None;
        }
        let text = self.input.text().trim().to_string();
        if text.is_empty() {
            self.error = Some(EMPTY_INPUT_ERROR.to_string());
            return None;
        }
        self.processing = true;
        self.error = None;
        Some(Request::Transform { action, text })
    }

    /// Apply a transformation reply. A success replaces the output verbatim
    /// and clears any prior error; a failure sets the error (explicit string
    /// when present, generic fallback otherwise) and leaves the output alone.
    pub fn on_transform(&mut self, result: Result<String, String>) {
        self.processing = false;
        match result {
            Ok(output) => {
                self.error = None;
                self.output = output;
                self.output_scroll = 0;
            }
            Err(message) => {
                let message = message.trim();
                self.error = Some(if message.is_empty() {
                    GENERIC_FAILURE.to_string()
                } else {
                    message.to_string()
                });
            }
        }
    }

    pub fn set_status(&mut self, message: &str) {
        self.status = message.to_string();
        self.status_set_at = Some(Instant::now());
    }

    pub fn close_settings(&mut self) {
        self.settings = None;
    }

    /// Housekeeping tick: drop transient status messages past their TTL.
    pub fn clear_expired_status(&mut self) {
        if let Some(at) = self.status_set_at {
            if at.elapsed() >= STATUS_TTL {
                self.status.clear();
                self.status_set_at = None;
            }
        }
        if let Some(panel) = self.settings.as_mut() {
            if let Some(at) = panel.status_set_at {
                if at.elapsed() >= STATUS_TTL {
                    panel.status.clear();
                    panel.status_set_at = None;
                }
            }
        }
    }
}
