use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StmtError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Cannot read PDF {}: {message}", path.display())]
    Pdf { path: PathBuf, message: String },

    #[error("Malformed date {value:?} (expected format {format})")]
    Date { value: String, format: String },

    #[error("Cannot stitch a row of {found} cells onto a row of {expected} cells")]
    Arity { expected: usize, found: usize },

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<StmtError>,
    },

    #[cfg(feature = "sample")]
    #[error("PDF rendering error: {0}")]
    Render(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

impl StmtError {
    /// Attach the offending file to an error raised while processing it.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Self::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, StmtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_context_names_the_file() {
        let err = StmtError::Arity { expected: 5, found: 4 }.in_file("/tmp/janvier.pdf");
        assert_eq!(
            err.to_string(),
            "/tmp/janvier.pdf: Cannot stitch a row of 4 cells onto a row of 5 cells"
        );
    }

    #[test]
    fn test_date_error_message() {
        let err = StmtError::Date {
            value: "31/13/2024".to_string(),
            format: "%d/%m/%Y".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed date \"31/13/2024\" (expected format %d/%m/%Y)"
        );
    }
}
