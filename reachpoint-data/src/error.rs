use thiserror::Error;

/// Failures of the data layer. Schema violations are raised before
/// anything is written, so a bad row never reaches the file.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("column '{0}' exists in row data but not in the file header")]
    ExtraColumn(String),
    #[error("no value for column '{0}' provided")]
    MissingColumn(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl From<DataError> for reachpoint_core::SessionError {
    fn from(err: DataError) -> Self {
        Self::Service(err.into())
    }
}
