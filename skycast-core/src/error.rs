//! Error taxonomy for a weather lookup.
//!
//! Every variant is recoverable: the front end shows a message and keeps
//! whatever it displayed before.

use std::{error::Error as StdError, fmt, io};

use thiserror::Error;

/// Transport failure category, as far as the platform reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    Timeout,
    ConnectionRefused,
    Dns,
    Connect,
    Other,
}

impl NetworkErrorKind {
    /// Inspect a reqwest error and its cause chain.
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return NetworkErrorKind::Timeout;
        }

        let mut cause = err.source();
        while let Some(inner) = cause {
            if let Some(io_err) = inner.downcast_ref::<io::Error>() {
                match io_err.kind() {
                    io::ErrorKind::ConnectionRefused => return NetworkErrorKind::ConnectionRefused,
                    io::ErrorKind::TimedOut => return NetworkErrorKind::Timeout,
                    _ => {}
                }
            }

            let text = inner.to_string().to_lowercase();
            if text.contains("dns error") || text.contains("failed to lookup address") {
                return NetworkErrorKind::Dns;
            }
            if text.contains("connection refused") {
                return NetworkErrorKind::ConnectionRefused;
            }

            cause = inner.source();
        }

        if err.is_connect() {
            NetworkErrorKind::Connect
        } else {
            NetworkErrorKind::Other
        }
    }
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NetworkErrorKind::Timeout => "request timed out",
            NetworkErrorKind::ConnectionRefused => "connection refused",
            NetworkErrorKind::Dns => "DNS lookup failed",
            NetworkErrorKind::Connect => "could not connect",
            NetworkErrorKind::Other => "network failure",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Place name must not be empty")]
    InvalidInput,

    #[error("No match found for '{0}'")]
    NotFound(String),

    #[error("{service}: {kind}: {source}")]
    Network {
        service: &'static str,
        kind: NetworkErrorKind,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned an unexpected response: {detail}")]
    MalformedResponse {
        service: &'static str,
        detail: String,
    },

    #[error("{service} request failed with status {status}: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },
}

impl WeatherError {
    pub(crate) fn network(service: &'static str, source: reqwest::Error) -> Self {
        let kind = NetworkErrorKind::classify(&source);
        WeatherError::Network {
            service,
            kind,
            source,
        }
    }

    pub(crate) fn malformed(service: &'static str, detail: impl fmt::Display) -> Self {
        WeatherError::MalformedResponse {
            service,
            detail: detail.to_string(),
        }
    }

    /// Short heading for a message box.
    pub fn title(&self) -> &'static str {
        match self {
            WeatherError::InvalidInput => "Input Error",
            WeatherError::NotFound(_) => "Not Found",
            WeatherError::Network { .. } => "Network Error",
            WeatherError::MalformedResponse { .. } | WeatherError::Api { .. } => "Error",
        }
    }

    /// User-facing explanation, free of transport details.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::InvalidInput => "Please enter a city name.".to_string(),
            WeatherError::NotFound(place) => format!("Could not find a place called '{place}'."),
            WeatherError::Network { service, kind, .. } => {
                format!("Could not connect to {service}: {kind}.")
            }
            WeatherError::MalformedResponse { service, .. } => {
                format!("Could not read the data returned by {service}.")
            }
            WeatherError::Api { service, status, .. } => {
                format!("{service} rejected the request (status {status}).")
            }
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
