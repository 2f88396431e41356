pub mod config;
pub mod logging;
pub mod router;
pub mod tui;

pub use config::{Config, ConfigStore, JsonFileStore, Provider};
pub use router::{Action, HttpRouter, ProbeStatus, Reply, Request, Router, GENERIC_FAILURE};
pub use tui::{render_to_buffer, App, EditorFocus, SettingsFocus, SettingsPanel, EMPTY_INPUT_ERROR};

use anyhow::{bail, Result};

// ── One-shot CLI surface ──────────────────────────────────────────────────────

/// Run one transformation through the router and return the output text.
/// Empty input is rejected locally, before anything is dispatched.
pub async fn run_transform<R: Router>(router: &R, action: Action, text: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        bail!("{EMPTY_INPUT_ERROR}");
    }
    let req = Request::Transform {
        action,
        text: text.to_string(),
    };
    match router.dispatch(req).await {
        Reply::Transform(Ok(output)) => Ok(output),
        Reply::Transform(Err(message)) => bail!("{message}"),
        Reply::Probe(_) => bail!("{GENERIC_FAILURE}"),
    }
}

/// Probe a local engine host. Fail-closed like the router itself.
pub async fn run_probe<R: Router>(router: &R, host: &str) -> ProbeStatus {
    match router
        .dispatch(Request::Probe {
            host: host.to_string(),
        })
        .await
    {
        Reply::Probe(status) => status,
        Reply::Transform(_) => ProbeStatus::default(),
    }
}

pub async fn fix(text: &str) -> Result<()> {
    transform_cli(Action::FixGrammar, text).await
}

pub async fn rephrase(text: &str) -> Result<()> {
    transform_cli(Action::Rephrase, text).await
}

async fn transform_cli(action: Action, text: &str) -> Result<()> {
    let config = JsonFileStore::default_location()?.load()?;
    let router = HttpRouter::new(config);
    println!("{}", run_transform(&router, action, text).await?);
    Ok(())
}

pub async fn probe(host: Option<String>) -> Result<()> {
    let config = JsonFileStore::default_location()?.load()?;
    let host = host.unwrap_or_else(|| config.local_base_url.clone());
    let router = HttpRouter::new(config);
    let status = run_probe(&router, &host).await;
    println!("Local engine: {host}");
    println!("Connected: {}", if status.connected { "yes" } else { "no" });
    if status.models.is_empty() {
        println!("Models: (none)");
    } else {
        println!("Models:");
        for model in &status.models {
            println!("- {model}");
        }
    }
    Ok(())
}

pub fn config_info() -> Result<()> {
    let store = JsonFileStore::default_location()?;
    let config = store.load()?;
    println!("Config path: {}", store.path().display());
    println!("Provider: {}", config.provider.label());
    if config.provider.is_cloud() {
        let key_set = config
            .api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false);
        println!("API key set: {}", if key_set { "yes" } else { "no" });
        println!("Model: {}", config.active_model());
    } else {
        println!("Local engine URL: {}", config.local_base_url);
        println!("Model: {}", config.local_model);
    }
    println!("Auto check: {}", if config.auto_check_enabled { "on" } else { "off" });
    Ok(())
}
