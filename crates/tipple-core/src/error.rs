use thiserror::Error;

/// Contract-violation errors from the ranking pipeline.
///
/// Malformed *authored* data (unreadable clock strings, missing venue
/// coordinates, unknown tags) never surfaces here; the affected deal is
/// silently treated as inactive or unrankable instead, because bad venue
/// data must not take down the request path. These variants mean the caller
/// passed arguments the contract forbids.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("viewer position is not finite: lat={lat}, lng={lng}")]
    NonFiniteViewer { lat: f64, lng: f64 },

    #[error("invalid radius tiers: {reason}")]
    InvalidTiers { reason: String },
}

/// Errors loading or validating the collection catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
