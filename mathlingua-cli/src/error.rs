use mathlingua_analysis::CollectionError;
use mathlingua_config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error("cannot format output: {0}")]
    Json(#[from] serde_json::Error),
}
