//! Error handling for jportal
//!
//! The error system is built around two pieces:
//! 1. [`PortalError`] - strongly-typed errors for every failure the portal
//!    client, the session store, or the derivations can produce
//! 2. [`ErrorContext`] - a wrapper that adds a user-facing suggestion for
//!    CLI display
//!
//! # Error categories
//!
//! - **Authentication**: [`PortalError::LoginFailed`],
//!   [`PortalError::ServerUnavailable`], [`PortalError::NetworkUnreachable`] -
//!   the three cases the login screen distinguishes for the user
//! - **Remote API**: [`PortalError::Api`], [`PortalError::MalformedResponse`],
//!   [`PortalError::EmptyData`]
//! - **Store**: [`PortalError::KeyNotFound`] - a selection referenced a key
//!   that is not in the fetched list; fatal to that operation, never to the
//!   session
//! - **Derivation**: [`PortalError::DegenerateInput`] - e.g. a marks
//!   component with zero full marks
//! - **Extraction**: [`PortalError::Extraction`] - the marks document could
//!   not be turned into a structured report
//!
//! Domain-fetch failures are caught at the store boundary and converted into
//! a per-domain `Failed` view; they are logged and displayed but never crash
//! the session. Use [`user_friendly_error`] at the CLI boundary to render
//! any error with a suggestion.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for jportal operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PortalError {
    /// Credentials were rejected by the portal.
    #[error("login failed: {reason}")]
    LoginFailed {
        /// What the portal reported, if anything useful
        reason: String,
    },

    /// The portal answered but is not in a state to serve requests (5xx).
    #[error("the web portal server is temporarily unavailable")]
    ServerUnavailable,

    /// The portal could not be reached at all (DNS, connect, TLS).
    #[error("could not reach the web portal")]
    NetworkUnreachable,

    /// The portal returned a non-success status for an API call.
    #[error("portal API call '{endpoint}' failed with status {status}: {message}")]
    Api {
        /// Endpoint path that failed
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// The response body did not have the shape the client expects.
    ///
    /// The portal serves loosely-typed JSON; everything is parsed into the
    /// typed models at the client boundary, and any shape mismatch surfaces
    /// here rather than deeper in the store or the derivations.
    #[error("unexpected response shape from '{endpoint}': {reason}")]
    MalformedResponse {
        /// Endpoint path whose response failed to parse
        endpoint: String,
        /// Serde or shape-check failure description
        reason: String,
    },

    /// A call succeeded but carried no usable payload.
    ///
    /// Displayed as "not available yet" rather than as an error banner.
    #[error("no {domain} data is available")]
    EmptyData {
        /// Which domain came back empty (e.g. "grade sheet")
        domain: String,
    },

    /// A selection referenced a key absent from the fetched list.
    #[error("{domain} has no entry for key '{key}'")]
    KeyNotFound {
        /// Domain the selection was made in
        domain: String,
        /// The key that was requested
        key: String,
    },

    /// The marks document could not be parsed into a report.
    #[error("failed to extract marks report: {reason}")]
    Extraction {
        /// Extractor failure description
        reason: String,
    },

    /// A derivation was asked to divide by zero or similar.
    #[error("degenerate input: {reason}")]
    DegenerateInput {
        /// What made the input degenerate
        reason: String,
    },

    /// Configuration file problem.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// IO error wrapper.
    #[error("IO error: {message}")]
    Io {
        /// Description of the IO failure
        message: String,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl PortalError {
    /// Categorize a transport-level error from the HTTP client.
    ///
    /// Connect/DNS/TLS failures become [`PortalError::NetworkUnreachable`];
    /// everything else is reported against the endpoint that was being
    /// called.
    pub fn from_transport(endpoint: &str, err: &reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::NetworkUnreachable
        } else {
            Self::Api {
                endpoint: endpoint.to_string(),
                status: err.status().map_or(0, |s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}

impl From<std::io::Error> for PortalError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

/// An error plus an actionable suggestion, for terminal display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The error message shown to the user
    pub message: String,
    /// A hint about how to resolve the failure, when one exists
    pub suggestion: Option<String>,
}

impl ErrorContext {
    /// Wrap a message with no suggestion.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
        }
    }

    /// Attach a suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Print to stderr with colors.
    pub fn display(&self) {
        eprintln!("{} {}", "error:".red().bold(), self.message);
        if let Some(suggestion) = &self.suggestion {
            eprintln!("{} {}", "hint:".yellow().bold(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  hint: {suggestion}")?;
        }
        Ok(())
    }
}

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// Known [`PortalError`] values get tailored suggestions matching what the
/// portal UI tells students; anything else is passed through verbatim.
pub fn user_friendly_error(err: &anyhow::Error) -> ErrorContext {
    if let Some(portal_err) = err.downcast_ref::<PortalError>() {
        match portal_err {
            PortalError::LoginFailed { .. } => ErrorContext::new(portal_err.to_string())
                .with_suggestion("Check your enrollment number and password"),
            PortalError::ServerUnavailable => ErrorContext::new(portal_err.to_string())
                .with_suggestion("The portal goes down around result time; try again later"),
            PortalError::NetworkUnreachable => ErrorContext::new(portal_err.to_string())
                .with_suggestion(
                    "Check your internet connection. If connected, the portal server is down",
                ),
            PortalError::EmptyData { .. } => {
                ErrorContext::new(portal_err.to_string()).with_suggestion("Please check back later")
            }
            PortalError::Config { .. } => ErrorContext::new(portal_err.to_string())
                .with_suggestion(
                    "Review ~/.jportal/config.toml or set JPORTAL_USERNAME/JPORTAL_PASSWORD",
                ),
            _ => ErrorContext::new(portal_err.to_string()),
        }
    } else {
        ErrorContext::new(format!("{err:#}"))
    }
}
