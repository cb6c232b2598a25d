use ips_rules::ServiceError;

/// Errors returned by [`ApiClient`](crate::ApiClient) calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or the connection failed.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the service's `error` field when the
    /// body carried one, otherwise status and raw body.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// 2xx response whose body did not match the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Decode(_) => None,
        }
    }
}

impl From<ClientError> for ServiceError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => ServiceError::Transport(e.to_string()),
            ClientError::Api { status, message } => ServiceError::Api { status, message },
            ClientError::Decode(msg) => ServiceError::Decode(msg),
        }
    }
}
