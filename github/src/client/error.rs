//! Error type for Github Client

use std::borrow::Cow;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Message(Cow<'static, str>),

    /// Github answered with a non-success status code
    #[error("GitHub API error: {}", .0.as_u16())]
    Api(reqwest::StatusCode),
}

impl From<&'static str> for Error {
    fn from(error: &'static str) -> Self {
        Error::Message(error.into())
    }
}

impl From<String> for Error {
    fn from(error: String) -> Self {
        Error::Message(error.into())
    }
}

#[cfg(test)]
mod test {
    use super::Error;
    use reqwest::StatusCode;

    #[test]
    fn api_error_names_status_code() {
        let error = Error::Api(StatusCode::NOT_FOUND);
        assert_eq!(error.to_string(), "GitHub API error: 404");
    }

    #[test]
    fn message_is_displayed_verbatim() {
        let error = Error::from("timeout");
        assert_eq!(error.to_string(), "timeout");
    }
}
