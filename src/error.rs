use std::fmt;

/// Errors that can occur in the disinfect crate.
///
/// The pipeline itself is total over well-formed values; the only failure
/// surface is configuration handed over at registration or route setup.
#[derive(Debug)]
pub enum Error {
    /// Registration or per-route options were rejected
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

/// A rejected configuration, naming the offending key when there is one.
///
/// # Examples
///
/// ```
/// use disinfect::{ConfigError, ConfigErrorKind};
///
/// let error = ConfigError::new(ConfigErrorKind::UnknownKey, "unknown option 'deleteAll'");
/// assert_eq!(error.kind(), ConfigErrorKind::UnknownKey);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    kind: ConfigErrorKind,
    message: String,
}

impl ConfigError {
    /// Creates a new configuration error.
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ConfigErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Kind of configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// Options were not a key-value object.
    NotAnObject,
    /// An option name is not part of the schema.
    UnknownKey,
    /// An option has the wrong type (e.g. a string where a boolean belongs).
    InvalidType,
    /// A sanitizer hook was supplied as data instead of as a function.
    HookNotData,
    /// A per-route override is neither `false`, `null` nor an object.
    InvalidOverride,
}

impl fmt::Display for ConfigErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "options must be an object"),
            Self::UnknownKey => write!(f, "unknown option"),
            Self::InvalidType => write!(f, "invalid option type"),
            Self::HookNotData => write!(f, "hook must be a function"),
            Self::InvalidOverride => write!(f, "invalid route override"),
        }
    }
}
