use crate::directive::RouteKwargs;
use thiserror::Error;

/// Raised by a route reverser when no registered pattern matches.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Reverse for '{name}' not found or arguments did not match: {reason}")]
pub struct NoReverseMatch {
    pub name: String,
    pub reason: String,
}

impl NoReverseMatch {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AdminError {
    /// The "next" directive names a route that cannot be reversed with the
    /// arguments found in the querystring.
    #[error("{source}. Got url_name={url_name}, kwargs={kwargs}.")]
    NextUrlRedirect {
        url_name: String,
        kwargs: RouteKwargs,
        #[source]
        source: NoReverseMatch,
    },

    /// The saved record cannot take part in save-next navigation.
    #[error(
        "{reason} Model {model}. Check model class declaration uses required \
         visit tracking and visit schedule capabilities."
    )]
    NextUrl { model: String, reason: String },

    #[error(transparent)]
    NoReverseMatch(#[from] NoReverseMatch),

    #[error("Invalid directive: {0}")]
    InvalidDirective(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AdminError>;
