use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};
use std::future::Future;
use tracing::warn;

use crate::config::{Config, Provider};

// ── Wire protocol ─────────────────────────────────────────────────────────────

/// Transformations the editor can request.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    FixGrammar,
    Rephrase,
}

impl Action {
    pub fn label(&self) -> &str {
        match self {
            Action::FixGrammar => "Fix Grammar",
            Action::Rephrase => "Rephrase",
        }
    }

    /// System instruction sent ahead of the user's text.
    pub fn instruction(&self) -> &str {
        match self {
            Action::FixGrammar => {
                "You are a writing assistant. Correct the grammar, spelling, and \
                 punctuation of the user's text. Reply with the corrected text only, \
                 with no explanations or commentary."
            }
            Action::Rephrase => {
                "You are a writing assistant. Rephrase the user's text so it reads \
                 clearly and naturally while keeping its meaning. Reply with the \
                 rephrased text only, with no explanations or commentary."
            }
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Request {
    Probe { host: String },
    Transform { action: Action, text: String },
}

/// Result of the last local-engine probe. Fail-closed: every failure mode
/// collapses to `connected: false` with an empty model list.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ProbeStatus {
    pub connected: bool,
    pub models: Vec<String>,
}

#[derive(Clone, PartialEq, Debug)]
pub enum Reply {
    Probe(ProbeStatus),
    Transform(Result<String, String>),
}

/// Shown when a transformation fails without a usable error message.
pub const GENERIC_FAILURE: &str = "An error occurred";

// ── Router seam ───────────────────────────────────────────────────────────────

/// Dispatch seam between the panels and the provider calls. Each request
/// produces exactly one reply; probe failures are folded into a disconnected
/// status and transform failures into an error string, so callers never see
/// a transport error directly.
pub trait Router {
    fn dispatch(&self, req: Request) -> impl Future<Output = Reply> + Send;
}

// ── HTTP implementation ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct HttpRouter {
    client: reqwest::Client,
    config: Config,
}

impl HttpRouter {
    pub fn new(config: Config) -> Self {
        HttpRouter {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn probe(&self, host: &str) -> ProbeStatus {
        match self.fetch_models(host).await {
            Ok(models) => ProbeStatus {
                connected: true,
                models,
            },
            Err(e) => {
                warn!("probe of {host} failed: {e:#}");
                ProbeStatus::default()
            }
        }
    }

    async fn fetch_models(&self, host: &str) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", host.trim_end_matches('/'));
        let resp = self.client.get(&url).send().await?.error_for_status()?;
        let body: Value = resp.json().await?;
        let models = body["models"]
            .as_array()
            .map(|list| {
                list.iter()
                    .filter_map(|m| m["name"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        Ok(models)
    }

    async fn transform(&self, action: Action, text: &str) -> Result<String> {
        match self.config.provider {
            Provider::LocalEngine => self.local_chat(action, text).await,
            Provider::Gemini => self.gemini_generate(action, text).await,
            Provider::OpenAi | Provider::DeepSeek => self.cloud_chat(action, text).await,
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| anyhow!("No API key configured for {}", self.config.provider.label()))
    }

    async fn local_chat(&self, action: Action, text: &str) -> Result<String> {
        let base = self.config.local_base_url.trim_end_matches('/');
        let body = json!({
            "model": self.config.active_model(),
            "messages": [
                {"role": "system", "content": action.instruction()},
                {"role": "user", "content": text},
            ],
            "stream": false,
        });
        let resp = self
            .client
            .post(format!("{base}/api/chat"))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Cannot reach local engine at {base}"))?;
        let status = resp.status();
        let reply: Value = resp.json().await.context("Malformed local engine response")?;
        if !status.is_success() {
            let detail = reply["error"].as_str().unwrap_or("request failed");
            anyhow::bail!("Local engine error: {detail}");
        }
        reply["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| anyhow!("Local engine response has no message content"))
    }

    // OpenAI-compatible chat completions (OpenAI, DeepSeek).
    async fn cloud_chat(&self, action: Action, text: &str) -> Result<String> {
        let provider = self.config.provider;
        let key = self.api_key()?;
        let body = json!({
            "model": self.config.active_model(),
            "messages": [
                {"role": "system", "content": action.instruction()},
                {"role": "user", "content": text},
            ],
        });
        let resp = self
            .client
            .post(provider.api_url())
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Cannot reach {}", provider.label()))?;
        let status = resp.status();
        let reply: Value = resp
            .json()
            .await
            .with_context(|| format!("Malformed {} response", provider.label()))?;
        if !status.is_success() {
            let detail = reply["error"]["message"]
                .as_str()
                .unwrap_or("request failed");
            anyhow::bail!("{} error: {detail}", provider.label());
        }
        reply["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| anyhow!("{} response has no message content", provider.label()))
    }

    // Gemini uses its own request shape and key-in-query auth.
    async fn gemini_generate(&self, action: Action, text: &str) -> Result<String> {
        let key = self.api_key()?;
        let url = format!(
            "{}/{}:generateContent?key={key}",
            Provider::Gemini.api_url(),
            self.config.active_model(),
        );
        let body = json!({
            "systemInstruction": {"parts": [{"text": action.instruction()}]},
            "contents": [
                {"role": "user", "parts": [{"text": text}]},
            ],
        });
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Cannot reach Gemini Studio")?;
        let status = resp.status();
        let reply: Value = resp.json().await.context("Malformed Gemini response")?;
        if !status.is_success() {
            let detail = reply["error"]["message"]
                .as_str()
                .unwrap_or("request failed");
            anyhow::bail!("Gemini error: {detail}");
        }
        reply["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| anyhow!("Gemini response has no text candidate"))
    }
}

impl Router for HttpRouter {
    fn dispatch(&self, req: Request) -> impl Future<Output = Reply> + Send {
        async move {
            match req {
                Request::Probe { host } => Reply::Probe(self.probe(&host).await),
                Request::Transform { action, text } => {
                    Reply::Transform(self.transform(action, &text).await.map_err(|e| {
                        warn!("{} request failed: {e:#}", action.label());
                        format!("{e:#}")
                    }))
                }
            }
        }
    }
}
