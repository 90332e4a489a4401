use formstate_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
