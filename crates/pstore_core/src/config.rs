//! Namespace configuration.

/// Default kind label for PStore entities.
pub const DEFAULT_KIND: &str = "PStore";

/// Configuration for a namespace handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Kind label for the root key and every record of the namespace.
    pub kind: String,

    /// Maximum serialized key size accepted by `set`.
    pub max_key_size: usize,

    /// Maximum serialized value size accepted by `set`.
    pub max_value_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kind: DEFAULT_KIND.to_string(),
            max_key_size: 1500,          // store key-name limit
            max_value_size: 1024 * 1024, // 1 MB entity limit
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the kind label.
    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Sets the maximum serialized key size.
    #[must_use]
    pub const fn max_key_size(mut self, size: usize) -> Self {
        self.max_key_size = size;
        self
    }

    /// Sets the maximum serialized value size.
    #[must_use]
    pub const fn max_value_size(mut self, size: usize) -> Self {
        self.max_value_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.kind, DEFAULT_KIND);
        assert_eq!(config.max_key_size, 1500);
        assert_eq!(config.max_value_size, 1024 * 1024);
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new()
            .kind("Settings")
            .max_key_size(64)
            .max_value_size(1024);

        assert_eq!(config.kind, "Settings");
        assert_eq!(config.max_key_size, 64);
        assert_eq!(config.max_value_size, 1024);
    }
}
