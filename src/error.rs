use thiserror::Error;

/// Fatal problems with the delivered dataset. The filter UI refuses to start
/// when any of these is returned.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The data source did not deliver one of its parts.
    #[error("dataset was not loaded correctly: missing {field}")]
    Missing { field: &'static str },

    /// The header row is empty, so there is nothing to show or filter.
    #[error("dataset has no columns")]
    NoColumns,
}
