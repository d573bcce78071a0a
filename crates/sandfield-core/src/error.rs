use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialise config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("config palette must name at least one colour")]
    EmptyPalette,
}

pub type Result<T> = std::result::Result<T, FieldError>;
