// src/backend/http.rs
//
// Cliente HTTP real: reqwest bloqueante en nativo, fetch en wasm. Ambos
// resuelven la misma `Endpoint` y decodifican con `Call::decode`.

use super::{Call, Endpoint, Method, Reply};
use crate::config::ClientConfig;
use crate::error::BackendError;

const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Clone, Debug)]
pub struct HttpBackend {
    base_url: String,
    csrf_token: Option<String>,
    #[cfg(not(target_arch = "wasm32"))]
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base_url: config.backend_url.clone(),
            csrf_token: config.csrf_token.clone(),
            #[cfg(not(target_arch = "wasm32"))]
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl super::Backend for HttpBackend {
    fn call(&self, call: &Call) -> Result<Reply, BackendError> {
        let endpoint = call.endpoint();
        let url = self.url_for(&endpoint);
        log::debug!("{:?} {url}", endpoint.method);

        let mut request = match endpoint.method {
            Method::Get => self.client.get(&url).query(&endpoint.params),
            Method::Post => self.client.post(&url).form(&endpoint.params),
        };
        if endpoint.needs_csrf() {
            if let Some(token) = &self.csrf_token {
                request = request.header(CSRF_HEADER, token);
            }
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let body = response.text()?;
        call.decode(&body)
    }
}

#[cfg(target_arch = "wasm32")]
fn encode_params(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                String::from(js_sys::encode_uri_component(k)),
                String::from(js_sys::encode_uri_component(v))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(target_arch = "wasm32")]
impl HttpBackend {
    pub async fn call_async(&self, call: Call) -> Result<Reply, BackendError> {
        use wasm_bindgen::{JsCast, JsValue};
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Request, RequestInit, RequestMode, Response};

        let endpoint = call.endpoint();
        let encoded = encode_params(&endpoint.params);
        let mut url = self.url_for(&endpoint);

        let opts = RequestInit::new();
        opts.set_mode(RequestMode::Cors);
        match endpoint.method {
            Method::Get => {
                opts.set_method("GET");
                if !encoded.is_empty() {
                    url = format!("{url}?{encoded}");
                }
            }
            Method::Post => {
                opts.set_method("POST");
                opts.set_body(&JsValue::from_str(&encoded));
            }
        }

        let request = Request::new_with_str_and_init(&url, &opts)
            .map_err(|err| BackendError::Transport(format!("{err:?}")))?;
        if endpoint.method == Method::Post {
            request
                .headers()
                .set("Content-Type", "application/x-www-form-urlencoded")
                .map_err(|err| BackendError::Transport(format!("{err:?}")))?;
        }
        if endpoint.needs_csrf() {
            if let Some(token) = &self.csrf_token {
                request
                    .headers()
                    .set(CSRF_HEADER, token)
                    .map_err(|err| BackendError::Transport(format!("{err:?}")))?;
            }
        }

        let window = web_sys::window()
            .ok_or_else(|| BackendError::Transport("no existe window en entorno wasm".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|err| BackendError::Transport(format!("{err:?}")))?;
        let response: Response = resp_value
            .dyn_into()
            .map_err(|_| BackendError::Transport("la respuesta fetch no es un Response".into()))?;

        if !response.ok() {
            return Err(BackendError::Status {
                status: response.status(),
                url,
            });
        }

        let text = JsFuture::from(
            response
                .text()
                .map_err(|err| BackendError::Transport(format!("{err:?}")))?,
        )
        .await
        .map_err(|err| BackendError::Transport(format!("{err:?}")))?;
        let body = text
            .as_string()
            .ok_or_else(|| BackendError::Decode("response.text() no devolvió string".into()))?;
        call.decode(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_path() {
        let config = ClientConfig {
            backend_url: "http://localhost:8000".into(),
            ..ClientConfig::default()
        };
        let backend = HttpBackend::new(&config);
        let endpoint = Call::SaveNewProblem.endpoint();
        assert_eq!(backend.url_for(&endpoint), "http://localhost:8000/algebra/save-new/");
    }
}
