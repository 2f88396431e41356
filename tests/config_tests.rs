use purgify::config::{
    Config, ConfigStore, JsonFileStore, Provider, DEFAULT_LOCAL_BASE_URL, DEFAULT_LOCAL_MODEL,
};
use std::fs;
use tempfile::TempDir;

fn temp_store() -> (TempDir, JsonFileStore) {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("config.json"));
    (dir, store)
}

// ── Defaults ──────────────────────────────────────────────────────────────────

#[test]
fn default_config_uses_local_engine() {
    assert_eq!(Config::default().provider, Provider::LocalEngine);
}

#[test]
fn default_local_base_url_value() {
    assert_eq!(Config::default().local_base_url, "http://localhost:11434");
    assert_eq!(DEFAULT_LOCAL_BASE_URL, "http://localhost:11434");
}

#[test]
fn default_local_model_value() {
    assert_eq!(Config::default().local_model, "tinyllama");
    assert_eq!(DEFAULT_LOCAL_MODEL, "tinyllama");
}

#[test]
fn default_auto_check_is_enabled() {
    assert!(Config::default().auto_check_enabled);
}

#[test]
fn default_has_no_api_key_or_cloud_model() {
    let config = Config::default();
    assert!(config.api_key.is_none());
    assert!(config.provider_model.is_none());
}

// ── Store ─────────────────────────────────────────────────────────────────────

#[test]
fn load_missing_file_returns_defaults() {
    let (_dir, store) = temp_store();
    assert_eq!(store.load().unwrap(), Config::default());
}

#[test]
fn save_then_load_round_trips() {
    let (_dir, store) = temp_store();
    let config = Config {
        provider: Provider::DeepSeek,
        api_key: Some("sk-test".to_string()),
        provider_model: Some("deepseek-chat".to_string()),
        local_base_url: "http://10.0.0.5:11434".to_string(),
        local_model: "mistral".to_string(),
        auto_check_enabled: false,
    };
    store.save(&config).unwrap();
    assert_eq!(store.load().unwrap(), config);
}

#[test]
fn save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("nested").join("deeper").join("config.json"));
    store.save(&Config::default()).unwrap();
    assert!(store.path().exists());
}

#[test]
fn load_merges_legacy_partial_record_over_defaults() {
    let (_dir, store) = temp_store();
    fs::write(store.path(), r#"{"provider":"openai","apiKey":"sk-old"}"#).unwrap();
    let config = store.load().unwrap();
    assert_eq!(config.provider, Provider::OpenAi);
    assert_eq!(config.api_key.as_deref(), Some("sk-old"));
    // Fields absent from the old record come back as defaults.
    assert_eq!(config.local_base_url, DEFAULT_LOCAL_BASE_URL);
    assert_eq!(config.local_model, DEFAULT_LOCAL_MODEL);
    assert!(config.auto_check_enabled);
}

#[test]
fn load_empty_object_record_is_all_defaults() {
    let (_dir, store) = temp_store();
    fs::write(store.path(), "{}").unwrap();
    assert_eq!(store.load().unwrap(), Config::default());
}

#[test]
fn load_rejects_malformed_json() {
    let (_dir, store) = temp_store();
    fs::write(store.path(), "not json at all").unwrap();
    assert!(store.load().is_err());
}

#[test]
fn persisted_record_uses_camel_case_keys() {
    let (_dir, store) = temp_store();
    let config = Config {
        api_key: Some("sk".to_string()),
        provider_model: Some("gpt-4o".to_string()),
        ..Config::default()
    };
    store.save(&config).unwrap();
    let raw = fs::read_to_string(store.path()).unwrap();
    assert!(raw.contains("\"apiKey\""));
    assert!(raw.contains("\"providerModel\""));
    assert!(raw.contains("\"localBaseUrl\""));
    assert!(raw.contains("\"localModel\""));
    assert!(raw.contains("\"autoCheckEnabled\""));
}

#[test]
fn unset_optional_fields_are_omitted_from_the_record() {
    let (_dir, store) = temp_store();
    store.save(&Config::default()).unwrap();
    let raw = fs::read_to_string(store.path()).unwrap();
    assert!(!raw.contains("apiKey"));
    assert!(!raw.contains("providerModel"));
}

// ── Provider tags ─────────────────────────────────────────────────────────────

#[test]
fn provider_local_engine_tag() {
    let tag = serde_json::to_string(&Provider::LocalEngine).unwrap();
    assert_eq!(tag, "\"local-engine\"");
}

#[test]
fn provider_openai_tag() {
    assert_eq!(serde_json::to_string(&Provider::OpenAi).unwrap(), "\"openai\"");
}

#[test]
fn provider_deepseek_tag() {
    assert_eq!(serde_json::to_string(&Provider::DeepSeek).unwrap(), "\"deepseek\"");
}

#[test]
fn provider_gemini_tag() {
    assert_eq!(serde_json::to_string(&Provider::Gemini).unwrap(), "\"gemini\"");
}

#[test]
fn provider_tags_round_trip() {
    for p in Provider::all() {
        let tag = serde_json::to_string(&p).unwrap();
        let back: Provider = serde_json::from_str(&tag).unwrap();
        assert_eq!(back, p);
    }
}

// ── Provider metadata ─────────────────────────────────────────────────────────

#[test]
fn provider_all_returns_four_variants() {
    assert_eq!(Provider::all().len(), 4);
}

#[test]
fn provider_labels_are_non_empty() {
    for p in Provider::all() {
        assert!(!p.label().is_empty());
    }
}

#[test]
fn local_engine_is_not_cloud() {
    assert!(!Provider::LocalEngine.is_cloud());
}

#[test]
fn cloud_providers_are_cloud() {
    assert!(Provider::OpenAi.is_cloud());
    assert!(Provider::DeepSeek.is_cloud());
    assert!(Provider::Gemini.is_cloud());
}

#[test]
fn provider_openai_api_url() {
    assert_eq!(
        Provider::OpenAi.api_url(),
        "https://api.openai.com/v1/chat/completions"
    );
}

#[test]
fn provider_deepseek_api_url() {
    assert_eq!(
        Provider::DeepSeek.api_url(),
        "https://api.deepseek.com/v1/chat/completions"
    );
}

#[test]
fn cloud_model_hints_are_non_empty() {
    for p in Provider::all().into_iter().filter(Provider::is_cloud) {
        assert!(!p.model_hint().is_empty(), "{} has no model hint", p.label());
    }
}

// ── Config::active_model ──────────────────────────────────────────────────────

#[test]
fn active_model_local_uses_local_model() {
    let config = Config {
        local_model: "mistral".to_string(),
        ..Config::default()
    };
    assert_eq!(config.active_model(), "mistral");
}

#[test]
fn active_model_cloud_uses_provider_model() {
    let config = Config {
        provider: Provider::OpenAi,
        provider_model: Some("gpt-4o".to_string()),
        ..Config::default()
    };
    assert_eq!(config.active_model(), "gpt-4o");
}

#[test]
fn active_model_cloud_unset_falls_back_to_provider_default() {
    let config = Config {
        provider: Provider::Gemini,
        ..Config::default()
    };
    assert_eq!(config.active_model(), Provider::Gemini.default_model());
}

#[test]
fn active_model_cloud_whitespace_falls_back_to_provider_default() {
    let config = Config {
        provider: Provider::DeepSeek,
        provider_model: Some("   ".to_string()),
        ..Config::default()
    };
    assert_eq!(config.active_model(), Provider::DeepSeek.default_model());
}
