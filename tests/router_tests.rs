use purgify::{
    run_probe, run_transform, Action, ProbeStatus, Reply, Request, Router, EMPTY_INPUT_ERROR,
    GENERIC_FAILURE,
};
use std::future::Future;
use std::sync::Mutex;

// ── Stub routers ──────────────────────────────────────────────────────────────

/// Replies with a fixed canned reply and records every request it sees.
struct StubRouter {
    seen: Mutex<Vec<Request>>,
    reply: Reply,
}

impl StubRouter {
    fn new(reply: Reply) -> Self {
        StubRouter {
            seen: Mutex::new(Vec::new()),
            reply,
        }
    }

    fn requests(&self) -> Vec<Request> {
        self.seen.lock().unwrap().clone()
    }
}

impl Router for StubRouter {
    fn dispatch(&self, req: Request) -> impl Future<Output = Reply> + Send {
        self.seen.lock().unwrap().push(req);
        let reply = self.reply.clone();
        async move { reply }
    }
}

// ── Action ────────────────────────────────────────────────────────────────────

#[test]
fn action_labels() {
    assert_eq!(Action::FixGrammar.label(), "Fix Grammar");
    assert_eq!(Action::Rephrase.label(), "Rephrase");
}

#[test]
fn action_instructions_are_distinct_and_non_empty() {
    let fix = Action::FixGrammar.instruction();
    let rephrase = Action::Rephrase.instruction();
    assert!(!fix.is_empty());
    assert!(!rephrase.is_empty());
    assert_ne!(fix, rephrase);
}

#[test]
fn action_instructions_ask_for_text_only() {
    assert!(Action::FixGrammar.instruction().contains("only"));
    assert!(Action::Rephrase.instruction().contains("only"));
}

// ── Protocol constants and shapes ─────────────────────────────────────────────

#[test]
fn generic_failure_message() {
    assert_eq!(GENERIC_FAILURE, "An error occurred");
}

#[test]
fn empty_input_error_message() {
    assert_eq!(EMPTY_INPUT_ERROR, "Please enter some text to process");
}

#[test]
fn probe_status_default_is_fail_closed() {
    let status = ProbeStatus::default();
    assert!(!status.connected);
    assert!(status.models.is_empty());
}

// ── run_transform ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn run_transform_success_returns_output() {
    let router = StubRouter::new(Reply::Transform(Ok("This is a test sentence.".to_string())));
    let out = run_transform(&router, Action::FixGrammar, "this is a test sentense")
        .await
        .unwrap();
    assert_eq!(out, "This is a test sentence.");
}

#[tokio::test]
async fn run_transform_failure_surfaces_error_message() {
    let router = StubRouter::new(Reply::Transform(Err("boom".to_string())));
    let err = run_transform(&router, Action::Rephrase, "some text")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("boom"));
}

#[tokio::test]
async fn run_transform_empty_input_sends_nothing() {
    let router = StubRouter::new(Reply::Transform(Ok("unused".to_string())));
    let err = run_transform(&router, Action::FixGrammar, "   ")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), EMPTY_INPUT_ERROR);
    assert!(router.requests().is_empty());
}

#[tokio::test]
async fn run_transform_trims_the_input_text() {
    let router = StubRouter::new(Reply::Transform(Ok("ok".to_string())));
    run_transform(&router, Action::Rephrase, "  hello there  ")
        .await
        .unwrap();
    assert_eq!(
        router.requests(),
        vec![Request::Transform {
            action: Action::Rephrase,
            text: "hello there".to_string(),
        }]
    );
}

#[tokio::test]
async fn run_transform_mismatched_reply_collapses_to_generic_failure() {
    let router = StubRouter::new(Reply::Probe(ProbeStatus::default()));
    let err = run_transform(&router, Action::FixGrammar, "text")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), GENERIC_FAILURE);
}

// ── run_probe ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn run_probe_returns_router_status() {
    let router = StubRouter::new(Reply::Probe(ProbeStatus {
        connected: true,
        models: vec!["tinyllama".to_string(), "mistral".to_string()],
    }));
    let status = run_probe(&router, "http://localhost:11434").await;
    assert!(status.connected);
    assert_eq!(status.models, vec!["tinyllama", "mistral"]);
}

#[tokio::test]
async fn run_probe_sends_the_host_through() {
    let router = StubRouter::new(Reply::Probe(ProbeStatus::default()));
    run_probe(&router, "http://10.0.0.9:11434").await;
    assert_eq!(
        router.requests(),
        vec![Request::Probe {
            host: "http://10.0.0.9:11434".to_string(),
        }]
    );
}

#[tokio::test]
async fn run_probe_mismatched_reply_is_fail_closed() {
    let router = StubRouter::new(Reply::Transform(Ok("nonsense".to_string())));
    let status = run_probe(&router, "http://localhost:11434").await;
    assert!(!status.connected);
    assert!(status.models.is_empty());
}
