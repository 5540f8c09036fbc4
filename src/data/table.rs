//! Row parser: turns numbered text lines into a [`NumericBlock`].

use log::debug;

use super::model::NumericBlock;
use super::options::{Dtype, ParseOptions};
use crate::error::{Error, Result};

/// A data line after comment stripping: (1-based line number, text).
type DataLine = (usize, String);

/// Parse one unit of numbered lines into a table.
///
/// `lines` yields `(line_number, text)` with the line terminator removed.
/// Comment text and whitespace-only lines are skipped. Every remaining row
/// must have the width of the first one.
pub fn parse_table<'a, I>(lines: I, opts: &ParseOptions) -> Result<NumericBlock>
where
    I: IntoIterator<Item = (usize, &'a str)>,
{
    let data = data_lines(lines, opts);
    let rows = match opts.delimiter {
        None => data
            .iter()
            .map(|(no, text)| {
                let fields = text.split_whitespace().map(str::to_owned).collect();
                (*no, text.clone(), fields)
            })
            .collect::<Vec<SplitRow>>(),
        Some(delim) => split_delimited(&data, delim)?,
    };

    let mut values = Vec::new();
    let mut ncols: Option<usize> = None;
    for (line, content, fields) in &rows {
        let row = convert_row(*line, content, fields, opts)?;
        match ncols {
            None => ncols = Some(row.len()),
            Some(n) if n != row.len() => {
                return Err(Error::MalformedRow {
                    line: *line,
                    content: content.clone(),
                    reason: format!("expected {n} columns, found {}", row.len()),
                });
            }
            Some(_) => {}
        }
        values.extend(row);
    }

    let ncols = ncols.unwrap_or(0);
    debug!("parsed {} rows x {ncols} columns", rows.len());
    NumericBlock::from_flat(values, ncols).ok_or_else(|| {
        Error::InvalidOptions(format!("table of {ncols} columns has a partial row"))
    })
}

/// Apply `skip_rows`, comment stripping and `max_rows`.
fn data_lines<'a, I>(lines: I, opts: &ParseOptions) -> Vec<DataLine>
where
    I: IntoIterator<Item = (usize, &'a str)>,
{
    let limit = opts.max_rows.unwrap_or(usize::MAX);
    lines
        .into_iter()
        .skip(opts.skip_rows)
        .filter_map(|(no, text)| {
            let text = strip_comment(text, &opts.comments).trim();
            (!text.is_empty()).then(|| (no, text.to_owned()))
        })
        .take(limit)
        .collect()
}

fn strip_comment<'a>(text: &'a str, markers: &[String]) -> &'a str {
    let cut = markers
        .iter()
        .filter(|m| !m.is_empty())
        .filter_map(|m| text.find(m.as_str()))
        .min();
    match cut {
        Some(pos) => &text[..pos],
        None => text,
    }
}

type SplitRow = (usize, String, Vec<String>);

/// Split data lines on an explicit delimiter using a CSV reader.
fn split_delimited(data: &[DataLine], delim: char) -> Result<Vec<SplitRow>> {
    if !delim.is_ascii() {
        return Err(Error::InvalidOptions(format!(
            "delimiter {delim:?} is not a single-byte character"
        )));
    }
    let joined = data
        .iter()
        .map(|(_, text)| text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delim as u8)
        .from_reader(joined.as_bytes());

    // Map a csv line position back to the source line.
    let source = |pos: Option<&csv::Position>| -> DataLine {
        pos.and_then(|p| data.get((p.line() as usize).saturating_sub(1)))
            .or_else(|| data.last())
            .cloned()
            .unwrap_or((0, String::new()))
    };

    let mut rows = Vec::with_capacity(data.len());
    for record in reader.records() {
        let record = record.map_err(|err| {
            let (line, content) = source(err.position());
            Error::MalformedRow {
                line,
                content,
                reason: err.to_string(),
            }
        })?;
        let (line, content) = source(record.position());
        rows.push((line, content, record.iter().map(str::to_owned).collect()));
    }
    Ok(rows)
}

/// Select `usecols` and parse each field as the requested dtype.
fn convert_row(
    line: usize,
    content: &str,
    fields: &[String],
    opts: &ParseOptions,
) -> Result<Vec<f64>> {
    let malformed = |reason: String| Error::MalformedRow {
        line,
        content: content.to_owned(),
        reason,
    };

    let picked: Vec<&str> = match &opts.usecols {
        None => fields.iter().map(String::as_str).collect(),
        Some(cols) => cols
            .iter()
            .map(|&c| {
                fields.get(c).map(String::as_str).ok_or_else(|| {
                    malformed(format!("column {c} out of range for {} fields", fields.len()))
                })
            })
            .collect::<Result<_>>()?,
    };

    picked
        .into_iter()
        .map(|tok| {
            parse_value(tok, opts.dtype).ok_or_else(|| {
                malformed(format!("'{tok}' is not a valid {}", dtype_name(opts.dtype)))
            })
        })
        .collect()
}

fn parse_value(tok: &str, dtype: Dtype) -> Option<f64> {
    let tok = tok.trim();
    match dtype {
        Dtype::Float64 => tok.parse::<f64>().ok(),
        Dtype::Float32 => tok.parse::<f32>().ok().map(f64::from),
        Dtype::Int64 => tok.parse::<i64>().ok().map(|v| v as f64),
    }
}

fn dtype_name(dtype: Dtype) -> &'static str {
    match dtype {
        Dtype::Float64 => "float64",
        Dtype::Float32 => "float32",
        Dtype::Int64 => "int64",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(text: &str) -> Vec<(usize, &str)> {
        text.lines().enumerate().map(|(i, l)| (i + 1, l)).collect()
    }

    #[test]
    fn whitespace_rows() {
        let block = parse_table(numbered("1 2\n3\t4\n  5   6  "), &ParseOptions::default()).unwrap();
        assert_eq!(block.shape(), (3, 2));
        assert_eq!(block.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn comments_and_whitespace_lines_are_skipped() {
        let text = "# header\n1 2 # trailing\n   \n3 4\n";
        let block = parse_table(numbered(text), &ParseOptions::default()).unwrap();
        assert_eq!(block.shape(), (2, 2));
    }

    #[test]
    fn ragged_row_reports_its_line() {
        let err = parse_table(numbered("1 2\n3 4\n5\n"), &ParseOptions::default()).unwrap_err();
        match err {
            Error::MalformedRow { line, content, .. } => {
                assert_eq!(line, 3);
                assert_eq!(content, "5");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_token_reports_its_line() {
        let err = parse_table(numbered("1 2\n3 x\n"), &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn delimited_rows_with_usecols() {
        let opts = ParseOptions::default().with_delimiter(',').with_usecols(vec![2, 0]);
        let block = parse_table(numbered("1, 2, 3\n4,5,6"), &opts).unwrap();
        assert_eq!(block.as_slice(), &[3.0, 1.0, 6.0, 4.0]);
    }

    #[test]
    fn usecols_out_of_range_is_malformed() {
        let opts = ParseOptions::default().with_usecols(vec![5]);
        let err = parse_table(numbered("1 2"), &opts).unwrap_err();
        assert!(matches!(err, Error::MalformedRow { line: 1, .. }));
    }

    #[test]
    fn delimited_error_line_skips_comments() {
        let opts = ParseOptions::default().with_delimiter(';');
        let err = parse_table(numbered("# c\n1;2\n3;oops"), &opts).unwrap_err();
        assert!(matches!(err, Error::MalformedRow { line: 3, .. }));
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let opts = ParseOptions::default().with_delimiter('§');
        let err = parse_table(numbered("1§2"), &opts).unwrap_err();
        assert!(matches!(err, Error::InvalidOptions(_)));
    }

    #[test]
    fn skip_and_max_rows() {
        let opts = ParseOptions::default().with_skip_rows(1).with_max_rows(2);
        let block = parse_table(numbered("x y\n1 2\n3 4\n5 6"), &opts).unwrap();
        assert_eq!(block.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn dtypes() {
        let ints = ParseOptions::default().with_dtype(Dtype::Int64);
        assert!(parse_table(numbered("1 2.5"), &ints).is_err());
        assert_eq!(parse_table(numbered("1 -2"), &ints).unwrap().as_slice(), &[1.0, -2.0]);

        let single = ParseOptions::default().with_dtype(Dtype::Float32);
        let block = parse_table(numbered("0.1"), &single).unwrap();
        assert_eq!(block.as_slice(), &[f64::from(0.1f32)]);
    }

    #[test]
    fn only_comments_gives_empty_block() {
        let block = parse_table(numbered("# nothing here"), &ParseOptions::default()).unwrap();
        assert!(block.is_empty());
        assert_eq!(block.ncols(), 0);
    }
}
