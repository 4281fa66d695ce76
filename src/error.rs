// SPDX-License-Identifier: MPL-2.0
//! Error types shared across the crate.
//!
//! The orchestration surface (lightbox, overlay, context) never returns these
//! to callers: failures there are logged and absorbed. They appear on the
//! edges that genuinely can fail, namely configuration, persistence and the
//! host boundary.

use crate::host::ElementId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("State Error: {0}")]
    State(String),

    #[error("Host Error: {0}")]
    Host(#[from] HostError),
}

/// Failures reported by a [`MediaHost`](crate::host::MediaHost) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The element was removed (or never mounted).
    #[error("element `{0}` is not attached")]
    MissingElement(ElementId),

    /// The target frame refused or could not receive the message.
    #[error("message rejected: {0}")]
    MessageRejected(String),
}

/// Outcome of a rejected `play()` request on a native video element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    /// Autoplay policy refused playback (the usual cause for unmuted starts).
    #[error("playback not allowed by autoplay policy")]
    NotAllowed,

    /// The element vanished before playback could start.
    #[error("element `{0}` is not attached")]
    MissingElement(ElementId),

    /// Any other rejection (aborted load, decode failure).
    #[error("playback failed: {0}")]
    Failed(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err: Error = std::io::Error::other("disk failure").into();
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn host_error_converts_into_crate_error() {
        let err: Error = HostError::MissingElement(ElementId::new("lb1-root")).into();
        assert!(matches!(err, Error::Host(HostError::MissingElement(_))));
        assert!(format!("{}", err).contains("lb1-root"));
    }

    #[test]
    fn toml_parse_error_becomes_config_error() {
        let parse: std::result::Result<toml::Value, _> = toml::from_str("not = valid = toml");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn play_error_display() {
        assert_eq!(
            PlayError::NotAllowed.to_string(),
            "playback not allowed by autoplay policy"
        );
        assert!(PlayError::Failed("aborted".into())
            .to_string()
            .contains("aborted"));
    }
}
