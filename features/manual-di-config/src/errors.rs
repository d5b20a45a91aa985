use manual_di::types::TypeInfo;

/// Errors when registering or retrieving configs
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The config type is already registered
    #[error("The Config type '{0}' is already registered")]
    ConfigAlreadyRegistered(TypeInfo),
    /// The stored config is not of the requested type
    #[error("The Config stored for '{0}' has a different type")]
    ConfigMismatch(TypeInfo),
}
