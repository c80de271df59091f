//! Configuration error types.

use std::io;
use std::path::PathBuf;

/// Failures while loading or persisting `config.ron`. File errors carry the
/// path that was touched.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {path:?}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but is not a valid orrery config.
    #[error("invalid config in {path:?}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("cannot encode config as RON: {0}")]
    SerializeError(#[source] ron::Error),
}

impl ConfigError {
    pub(crate) fn read(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::ReadError { path, source }
    }

    pub(crate) fn write(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::WriteError { path, source }
    }

    pub(crate) fn parse(
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(ron::error::SpannedError) -> Self {
        let path = path.into();
        move |source| Self::ParseError { path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_file() {
        let err = ConfigError::read("/tmp/orrery/config.ron")(io::Error::from(
            io::ErrorKind::PermissionDenied,
        ));
        let message = err.to_string();
        assert!(message.contains("config.ron"), "{message}");
        assert!(std::error::Error::source(&err).is_some());
    }
}
