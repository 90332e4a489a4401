use crate::error::StoreError;

/// Default buffer capacity for the change broadcast channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Store configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Broadcast buffer size (default: `1024`). Subscribers further behind
    /// than this observe `RecvError::Lagged`.
    pub capacity: usize,
}

impl StoreConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default |
    /// |-----------------------|---------|
    /// | `FORM_STORE_CAPACITY` | `1024`  |
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StoreError> {
        let capacity = match lookup("FORM_STORE_CAPACITY") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                StoreError::Config(format!(
                    "FORM_STORE_CAPACITY must be a positive integer, got '{raw}'"
                ))
            })?,
            None => DEFAULT_CAPACITY,
        };

        if capacity == 0 {
            return Err(StoreError::Config(
                "FORM_STORE_CAPACITY must be greater than zero".to_string(),
            ));
        }

        Ok(Self { capacity })
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}
