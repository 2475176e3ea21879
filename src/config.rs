// src/config.rs

use crate::model::ProblemId;
use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
const BACKEND_ENV: &str = "SANDBOX_ALGEBRA_BACKEND";
#[cfg(not(target_arch = "wasm32"))]
const CSRF_ENV: &str = "SANDBOX_ALGEBRA_CSRF";
#[cfg(not(target_arch = "wasm32"))]
const PROBLEM_ENV: &str = "SANDBOX_ALGEBRA_PROBLEM";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    pub backend_url: String,
    #[serde(default)]
    pub csrf_token: Option<String>,
    pub sandbox: String,
    pub debounce_ms: u64,
    pub filter_debounce_ms: u64,
    pub help_cooldown_ms: u64,
    pub reveal_interval_ms: u64,
    pub reveal_settle_ms: u64,
    pub max_chat_message_len: usize,
    pub sentinel: String,
    pub page_size_options: Vec<usize>,
    pub default_page_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".into(),
            csrf_token: None,
            sandbox: "Algebra".into(),
            debounce_ms: 500,
            filter_debounce_ms: 500,
            help_cooldown_ms: 2000,
            reveal_interval_ms: 4500,
            reveal_settle_ms: 100,
            max_chat_message_len: 250,
            sentinel: "randomstringnoonewillevertypeinhopefully".into(),
            page_size_options: vec![10, 20, 50],
            default_page_size: 10,
        }
    }
}

impl ClientConfig {
    /// Configuración embebida en el binario.
    pub fn embedded() -> Result<Self, serde_yaml::Error> {
        let file_content = include_str!("data/client_config.yaml");
        serde_yaml::from_str(file_content)
    }

    /// Embebida + overrides del entorno (env en nativo, página en wasm).
    pub fn load() -> Self {
        let mut config = Self::embedded().unwrap_or_else(|err| {
            log::error!("client_config.yaml inválido, usando valores por defecto: {err}");
            Self::default()
        });
        if let Some(url) = backend_override() {
            config.backend_url = url;
        }
        if let Some(token) = csrf_override() {
            config.csrf_token = Some(token);
        }
        config.backend_url = trim_trailing_slashes(&config.backend_url);
        config
    }

    pub fn debounce_secs(&self) -> f64 {
        ms_to_secs(self.debounce_ms)
    }

    pub fn filter_debounce_secs(&self) -> f64 {
        ms_to_secs(self.filter_debounce_ms)
    }

    pub fn help_cooldown_secs(&self) -> f64 {
        ms_to_secs(self.help_cooldown_ms)
    }

    pub fn reveal_interval_secs(&self) -> f64 {
        ms_to_secs(self.reveal_interval_ms)
    }

    pub fn reveal_settle_secs(&self) -> f64 {
        ms_to_secs(self.reveal_settle_ms)
    }
}

/// Tamaño de página válido: si no está entre las opciones, el último (mayor).
pub fn snap_page_size(requested: usize, offered: &[usize]) -> usize {
    if offered.contains(&requested) {
        return requested;
    }
    offered.last().copied().unwrap_or(requested)
}

fn ms_to_secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Id de problema en una ruta `/algebra/{id}`.
pub fn problem_from_route(route: &str) -> Option<ProblemId> {
    route
        .trim_end_matches('/')
        .strip_prefix("/algebra/")?
        .parse()
        .ok()
}

/// Problema con el que arranca la sesión, si lo hay.
#[cfg(not(target_arch = "wasm32"))]
pub fn initial_problem() -> Option<ProblemId> {
    std::env::var(PROBLEM_ENV).ok()?.trim().parse().ok()
}

#[cfg(target_arch = "wasm32")]
pub fn initial_problem() -> Option<ProblemId> {
    web::from_querystring("problem")
        .and_then(|value| value.parse().ok())
        .or_else(|| web::pathname().as_deref().and_then(problem_from_route))
}

pub fn trim_trailing_slashes(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed == "/" {
        return String::new();
    }
    trimmed.trim_end_matches('/').to_string()
}

#[cfg(not(target_arch = "wasm32"))]
fn backend_override() -> Option<String> {
    option_env!("SANDBOX_ALGEBRA_BACKEND")
        .and_then(normalize_value)
        .or_else(|| std::env::var(BACKEND_ENV).ok().as_deref().and_then(normalize_value))
}

#[cfg(not(target_arch = "wasm32"))]
fn csrf_override() -> Option<String> {
    std::env::var(CSRF_ENV).ok().as_deref().and_then(normalize_value)
}

#[cfg(target_arch = "wasm32")]
fn backend_override() -> Option<String> {
    option_env!("SANDBOX_ALGEBRA_BACKEND")
        .and_then(normalize_value)
        .or_else(|| web::from_querystring("backend"))
        .or_else(|| web::from_meta("sandbox-algebra-backend"))
        .or_else(|| web::from_local_storage("sandbox_algebra_backend"))
}

#[cfg(target_arch = "wasm32")]
fn csrf_override() -> Option<String> {
    web::from_meta("csrfmiddlewaretoken").or_else(|| web::from_querystring("csrfmiddlewaretoken"))
}

#[cfg(target_arch = "wasm32")]
pub(crate) mod web {
    use super::normalize_value;

    pub fn from_querystring(wanted: &str) -> Option<String> {
        let window = web_sys::window()?;
        let search = window.location().search().ok()?;
        let query = search.strip_prefix('?').unwrap_or(search.as_str());

        for pair in query.split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key == wanted {
                let decoded = js_sys::decode_uri_component(value).ok()?;
                let decoded = decoded.as_string()?;
                return normalize_value(&decoded);
            }
        }
        None
    }

    pub fn pathname() -> Option<String> {
        web_sys::window()?.location().pathname().ok()
    }

    /// Reescribe la URL visible sin recargar.
    pub fn replace_route(route: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Ok(history) = window.history() {
            if let Err(err) = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(route)) {
                log::warn!("no se pudo actualizar la URL: {err:?}");
            }
        }
    }

    pub fn from_meta(name: &str) -> Option<String> {
        let document = web_sys::window()?.document()?;
        let meta = document
            .query_selector(&format!("meta[name='{name}']"))
            .ok()??;
        meta.get_attribute("content")
            .as_deref()
            .and_then(normalize_value)
    }

    pub fn from_local_storage(key: &str) -> Option<String> {
        let storage = web_sys::window()?.local_storage().ok()??;
        storage
            .get_item(key)
            .ok()?
            .as_deref()
            .and_then(normalize_value)
    }
}
