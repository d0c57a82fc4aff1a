use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("InvalidData: {0}")]
    InvalidData(String),

    #[error("{0}")]
    General(String),
}

pub type DashResult<T> = Result<T, DashError>;

#[cfg(feature = "python")]
impl From<DashError> for pyo3::PyErr {
    fn from(err: DashError) -> pyo3::PyErr {
        pyo3::exceptions::PyRuntimeError::new_err(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for DashError {
    fn from(err: pyo3::PyErr) -> Self {
        DashError::General(err.to_string())
    }
}
