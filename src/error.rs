use thiserror::Error;

/// Generic message shown to end users when the model call itself failed.
pub const MODEL_REQUEST_FAILED: &str = "The request to the AI model failed.";

#[derive(Debug, Error)]
pub enum SwapError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Response error: {0}")]
    Response(String),
}

impl SwapError {
    /// HTTP status used when the error is exposed by the relay server.
    pub fn http_status(&self) -> u16 {
        match self {
            SwapError::Validation(_) => 400,
            _ => 500,
        }
    }

    /// Message safe to show an end user. Diagnostic detail stays in `details()`.
    pub fn user_message(&self) -> String {
        match self {
            SwapError::Config(msg) | SwapError::Validation(msg) => msg.clone(),
            _ => MODEL_REQUEST_FAILED.to_string(),
        }
    }

    pub fn details(&self) -> Option<String> {
        match self {
            SwapError::Config(_) | SwapError::Validation(_) => None,
            other => Some(other.to_string()),
        }
    }

    pub fn is_transport_class(&self) -> bool {
        !matches!(self, SwapError::Config(_) | SwapError::Validation(_))
    }
}

impl From<reqwest::Error> for SwapError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SwapError::Response(e.to_string())
        } else {
            SwapError::Transport(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, SwapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(SwapError::Validation("x".into()).http_status(), 400);
        assert_eq!(SwapError::Config("x".into()).http_status(), 500);
        assert_eq!(
            SwapError::Api {
                status: 503,
                message: "busy".into()
            }
            .http_status(),
            500
        );
    }

    #[test]
    fn test_user_message_hides_diagnostics() {
        let err = SwapError::Transport("connection reset by peer".into());
        assert_eq!(err.user_message(), MODEL_REQUEST_FAILED);
        assert!(err.details().unwrap().contains("connection reset"));

        let err = SwapError::Validation("too small".into());
        assert_eq!(err.user_message(), "too small");
        assert!(err.details().is_none());
    }
}
