use thiserror::Error;

pub type ForecastResult<T> = Result<T, ForecastError>;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed spreadsheet: {0}")]
    MalformedFile(String),

    #[error("Sheet '{sheet}' not found (available: {available})")]
    SheetNotFound { sheet: String, available: String },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("Chart rendering failed: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl ForecastError {
    /// True for errors caused by the uploaded file rather than by this system
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ForecastError::MalformedFile(_)
                | ForecastError::SheetNotFound { .. }
                | ForecastError::MissingColumn(_)
        )
    }
}
