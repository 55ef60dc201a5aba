use pull_loader::ConfigError;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Every row needs a render callback; there is no default markup.
    #[error("a row render callback is required")]
    MissingRenderRow,
}
