use serde::{Deserialize, Serialize};

/// Element type requested for parsed values.
///
/// Values are always stored as `f64`; the dtype decides how each token is
/// parsed and rounded before widening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    #[default]
    Float64,
    Float32,
    Int64,
}

/// Options forwarded to the row parser for every parsed unit (one block in
/// block mode, the whole file in grid mode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Field separator. `None` splits on runs of whitespace.
    pub delimiter: Option<char>,
    /// Comment markers; text from the first marker to end of line is dropped.
    pub comments: Vec<String>,
    /// Leading lines of each unit to skip before parsing.
    pub skip_rows: usize,
    /// Maximum number of data rows read per unit.
    pub max_rows: Option<usize>,
    /// Columns to keep, in output order.
    pub usecols: Option<Vec<usize>>,
    pub dtype: Dtype,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            comments: vec!["#".to_string()],
            skip_rows: 0,
            max_rows: None,
            usecols: None,
            dtype: Dtype::Float64,
        }
    }
}

impl ParseOptions {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Replace the comment markers. An empty list disables comments.
    pub fn with_comments<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.comments = markers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_skip_rows(mut self, n: usize) -> Self {
        self.skip_rows = n;
        self
    }

    pub fn with_max_rows(mut self, n: usize) -> Self {
        self.max_rows = Some(n);
        self
    }

    pub fn with_usecols(mut self, cols: impl Into<Vec<usize>>) -> Self {
        self.usecols = Some(cols.into());
        self
    }

    pub fn with_dtype(mut self, dtype: Dtype) -> Self {
        self.dtype = dtype;
        self
    }
}
