use thiserror::Error;

/// Result type alias for dataset loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Everything that can go wrong while turning a file into a
/// [`super::model::ShoppingDataset`].
///
/// Filtering and aggregation never fail, so this is the only error type in
/// the data layer.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File missing, unreadable, …
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// A required header is absent from the source.
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    /// A cell could not be interpreted as its column's type.
    #[error("invalid value at row {row} column '{column}': {message}")]
    InvalidValue {
        row: usize,
        column: String,
        message: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

impl LoadError {
    pub(crate) fn missing(column: &str) -> Self {
        LoadError::MissingColumn {
            column: column.to_string(),
        }
    }
}
