use std::path::PathBuf;

use thiserror::Error;

use crate::figure::Backend;

/// Errors raised by the block parser and the figure writer.
///
/// Every error is returned straight to the caller. Nothing is retried, and
/// files already written by a multi-file save are left in place.
#[derive(Debug, Error)]
pub enum Error {
    /// The input file does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// A non-blank line could not be parsed as a numeric row.
    #[error("line {line}: {reason} (in {content:?})")]
    MalformedRow {
        /// 1-based line number in the source text.
        line: usize,
        content: String,
        reason: String,
    },

    /// Regular-grid reshape failed: the row count is not a multiple of the
    /// number of distinct keys.
    #[error("cannot reshape {rows} rows into {keys} equal blocks")]
    ShapeMismatch { rows: usize, keys: usize },

    /// `mode` is unknown, or not available on the selected backend.
    /// `backend` is `None` when the mode name itself is unrecognised.
    #[error(
        "unsupported mode '{mode}' for {} (supported: {supported})",
        backend_label(backend)
    )]
    UnsupportedMode {
        mode: String,
        backend: Option<Backend>,
        supported: &'static str,
    },

    #[error("unsupported backend '{0}' (expected Matplotlib or Plotly)")]
    UnsupportedBackend(String),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The figure failed to export itself to `path`.
    #[error("exporting figure to {}: {source:#}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn backend_label(backend: &Option<Backend>) -> String {
    match backend {
        Some(b) => format!("backend {b}"),
        None => "any backend".to_string(),
    }
}

impl Error {
    /// Wrap an I/O error, promoting `NotFound` to [`Error::FileNotFound`].
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound { path }
        } else {
            Error::Io { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_promoted() {
        let err = Error::io(
            "missing.dat",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, Error::FileNotFound { .. }));
        assert_eq!(err.to_string(), "file not found: missing.dat");
    }

    #[test]
    fn other_io_kinds_stay_io() {
        let err = Error::io(
            "locked.dat",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn unsupported_mode_names_the_backend() {
        let err = Error::UnsupportedMode {
            mode: "html".into(),
            backend: Some(Backend::Matplotlib),
            supported: "vec, raster",
        };
        assert_eq!(
            err.to_string(),
            "unsupported mode 'html' for backend Matplotlib (supported: vec, raster)"
        );
    }

    #[test]
    fn malformed_row_names_the_line() {
        let err = Error::MalformedRow {
            line: 7,
            content: "1.0 abc".into(),
            reason: "'abc' is not a number".into(),
        };
        assert!(err.to_string().starts_with("line 7:"));
    }
}
