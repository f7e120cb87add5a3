//! Error type shared by the loader, the row source and the report facade.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Requested municipality is unknown to the row source
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn municipality_not_found(region: &str, municipality: &str) -> Self {
        Self::NotFound {
            kind: "Municipality",
            name: format!("{} ({})", municipality, region),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
