use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, info};

use super::model::{BlockDataset, Grid, NumericBlock};
use super::options::ParseOptions;
use super::table::parse_table;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read a file made of blank-line-separated numeric sections.
///
/// Each run of non-blank lines is parsed into one [`NumericBlock`]; a run of
/// one or more blank lines is a single separator. `opts` applies to every
/// block separately, so `skip_rows` drops the leading lines of each block.
pub fn read_blocks(path: &Path, opts: &ParseOptions) -> Result<BlockDataset> {
    let text = read_text(path)?;
    let dataset = read_blocks_from_str(&text, opts)?;
    info!(
        "read {} blocks ({} rows) from {}",
        dataset.len(),
        dataset.total_rows(),
        path.display()
    );
    Ok(dataset)
}

/// In-memory variant of [`read_blocks`].
pub fn read_blocks_from_str(text: &str, opts: &ParseOptions) -> Result<BlockDataset> {
    let blocks = sections(text)
        .into_iter()
        .enumerate()
        .map(|(i, section)| {
            let first = section.first().map_or(0, |(no, _)| *no);
            debug!("block {i} starts at line {first} ({} lines)", section.len());
            parse_table(section, opts)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(BlockDataset::from_blocks(blocks))
}

/// Read a file as one flat table and reshape it into equal blocks.
///
/// The block count is the number of distinct values in the first column;
/// the total row count must be a multiple of it. Blank lines are ignored.
pub fn read_grid(path: &Path, opts: &ParseOptions) -> Result<Grid> {
    let text = read_text(path)?;
    let grid = read_grid_from_str(&text, opts)?;
    let [keys, rows, cols] = grid.shape();
    info!("read {keys} x {rows} x {cols} grid from {}", path.display());
    Ok(grid)
}

/// In-memory variant of [`read_grid`].
pub fn read_grid_from_str(text: &str, opts: &ParseOptions) -> Result<Grid> {
    let table = parse_table(numbered_lines(text), opts)?;
    let rows = table.nrows();
    let keys = table.column(0).map_or(0, |first| distinct_count(&first));

    if keys == 0 || rows % keys != 0 {
        return Err(Error::ShapeMismatch { rows, keys });
    }
    let shape = [keys, rows / keys, table.ncols()];
    debug!("reshaping {rows} rows into {shape:?}");
    Ok(Grid::new(table.as_slice().to_vec(), shape))
}

/// Write blocks in the layout [`read_blocks`] reads back.
///
/// Rows are written one per line with single-space separators; blocks are
/// separated by one blank line. Zero-row blocks produce no text and are
/// therefore lost on re-reading.
pub fn write_blocks(path: &Path, blocks: &[NumericBlock]) -> Result<()> {
    let file = fs::File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);
    write_sections(&mut out, blocks).map_err(|e| Error::io(path, e))?;
    info!("wrote {} blocks to {}", blocks.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_sections<W: Write>(out: &mut W, blocks: &[NumericBlock]) -> std::io::Result<()> {
    for (i, block) in blocks.iter().filter(|b| !b.is_empty()).enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        write!(out, "{block}")?;
    }
    out.flush()
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Lines paired with their 1-based line number, terminators removed.
fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines().enumerate().map(|(i, line)| (i + 1, line))
}

/// Group consecutive lines by "is blank" and keep the non-blank groups.
///
/// Only an empty line counts as blank; a line holding spaces belongs to the
/// surrounding section.
fn sections(text: &str) -> Vec<Vec<(usize, &str)>> {
    let mut out: Vec<Vec<(usize, &str)>> = Vec::new();
    let mut current: Vec<(usize, &str)> = Vec::new();
    for (no, line) in numbered_lines(text) {
        if line.is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        } else {
            current.push((no, line));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Count distinct values, treating `-0.0` and `0.0` as equal and all NaNs
/// as one value.
fn distinct_count(values: &[f64]) -> usize {
    let (nans, mut keys): (Vec<f64>, Vec<f64>) =
        values.iter().copied().partition(|v| v.is_nan());
    keys.sort_by(f64::total_cmp);
    keys.dedup();
    keys.len() + usize::from(!nans.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_collapse_blank_runs() {
        let groups = sections("1 2\n3 4\n\n\n\n5 6\n");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1], vec![(6, "5 6")]);
    }

    #[test]
    fn leading_and_trailing_blanks_add_nothing() {
        assert_eq!(sections("\n\n1\n\n").len(), 1);
        assert!(sections("\n\n").is_empty());
        assert!(sections("").is_empty());
    }

    #[test]
    fn whitespace_line_is_not_a_separator() {
        let groups = sections("1\n   \n2\n");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 3);
    }

    #[test]
    fn crlf_blank_lines_separate() {
        let data = read_blocks_from_str("1 2\r\n\r\n3 4\r\n", &ParseOptions::default()).unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn comment_only_section_is_an_empty_block() {
        let data = read_blocks_from_str("1\n\n# note\n\n2\n", &ParseOptions::default()).unwrap();
        assert_eq!(data.len(), 3);
        assert!(data.blocks[1].is_empty());
    }

    #[test]
    fn distinct_count_merges_signed_zero() {
        assert_eq!(distinct_count(&[0.0, -0.0, 1.0, 1.0]), 2);
    }

    #[test]
    fn distinct_count_merges_nan_keys() {
        assert_eq!(distinct_count(&[f64::NAN, -f64::NAN, 1.0, 1.0]), 2);
    }

    #[test]
    fn nan_keys_form_one_block() {
        let text = "nan 1\nnan 2\n1 3\n1 4\n";
        let grid = read_grid_from_str(text, &ParseOptions::default()).unwrap();
        assert_eq!(grid.shape(), [2, 2, 2]);
    }

    #[test]
    fn grid_of_empty_text_is_a_shape_mismatch() {
        let err = read_grid_from_str("", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { rows: 0, keys: 0 }));
    }
}
