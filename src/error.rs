use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("error conectando con el servidor: {0}")]
    Transport(String),

    #[error("el servidor devolvió HTTP {status} en {url}")]
    Status { status: u16, url: String },

    #[error("respuesta inválida del servidor: {0}")]
    Decode(String),

    #[error("no hay problema guardado todavía")]
    NoProblem,

    #[error("el problema está terminado; la sesión está bloqueada")]
    Locked,
}

impl BackendError {
    /// Texto corto para la barra de estado.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::NoProblem => "Define the equation before adding a step.".into(),
            BackendError::Locked => "This problem is finished.".into(),
            BackendError::Transport(_) | BackendError::Status { .. } => {
                "Could not reach the server. Try again.".into()
            }
            BackendError::Decode(_) => "The server sent an unexpected reply.".into(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}
