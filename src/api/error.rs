use thiserror::Error;

/// Failures surfaced by the ListenBrainz API client.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("{0}")]
    Network(String),
    #[error("server responded with {code}: {message}")]
    Status { code: u16, message: String },
    #[error("unexpected response status {0}")]
    UnexpectedStatus(u16),
    #[error("could not read server response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Short label shown next to the message in alerts.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "NetworkError",
            ApiError::Status { .. } => "APIError",
            ApiError::UnexpectedStatus(_) => "APIError",
            ApiError::Decode(_) => "DecodeError",
        }
    }

    /// "Kind: message", used wherever the user sees the failure.
    pub fn describe(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_prefixes_kind() {
        let err = ApiError::Status {
            code: 401,
            message: "Invalid authorization token.".to_string(),
        };
        assert_eq!(
            err.describe(),
            "APIError: server responded with 401: Invalid authorization token."
        );
        assert_eq!(ApiError::Network("offline".into()).describe(), "NetworkError: offline");
    }
}
