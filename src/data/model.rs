use std::fmt;

// ---------------------------------------------------------------------------
// NumericBlock – one blank-line-delimited section of a file
// ---------------------------------------------------------------------------

/// A 2-D numeric table parsed from one contiguous run of non-blank lines.
///
/// Values are stored row-major. A block parsed from a section holding only
/// comments has zero rows and zero columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumericBlock {
    values: Vec<f64>,
    nrows: usize,
    ncols: usize,
}

impl NumericBlock {
    /// Build a block from row-major `values` with `ncols` columns.
    ///
    /// Returns `None` if `values` does not divide evenly into rows.
    pub fn from_flat(values: Vec<f64>, ncols: usize) -> Option<Self> {
        if ncols == 0 {
            return values.is_empty().then(Self::default);
        }
        if values.len() % ncols != 0 {
            return None;
        }
        let nrows = values.len() / ncols;
        Some(NumericBlock {
            values,
            nrows,
            ncols,
        })
    }

    /// Build a block from rows. Returns `None` for ragged input.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Option<Self> {
        let ncols = rows.first().map_or(0, |r| r.as_ref().len());
        if rows.iter().any(|r| r.as_ref().len() != ncols) {
            return None;
        }
        let values = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Self::from_flat(values, ncols)
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn is_empty(&self) -> bool {
        self.nrows == 0
    }

    /// Row-major view of all values.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        (i < self.nrows).then(|| &self.values[i * self.ncols..(i + 1) * self.ncols])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact panics on 0, and a zero-column block has no rows anyway
        self.values.chunks_exact(self.ncols.max(1))
    }

    /// Copy of column `j`.
    pub fn column(&self, j: usize) -> Option<Vec<f64>> {
        (j < self.ncols).then(|| self.rows().map(|r| r[j]).collect())
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.row(i).and_then(|r| r.get(j).copied())
    }
}

impl fmt::Display for NumericBlock {
    /// One row per line, values separated by a single space.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for (j, v) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{v:?}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// BlockDataset – every block of a file, in file order
// ---------------------------------------------------------------------------

/// The parsed blocks of one file, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockDataset {
    pub blocks: Vec<NumericBlock>,
}

impl BlockDataset {
    pub fn from_blocks(blocks: Vec<NumericBlock>) -> Self {
        BlockDataset { blocks }
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the file had no non-blank sections at all.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NumericBlock> {
        self.blocks.iter()
    }

    /// Total data rows across all blocks.
    pub fn total_rows(&self) -> usize {
        self.blocks.iter().map(NumericBlock::nrows).sum()
    }
}

impl IntoIterator for BlockDataset {
    type Item = NumericBlock;
    type IntoIter = std::vec::IntoIter<NumericBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.into_iter()
    }
}

impl<'a> IntoIterator for &'a BlockDataset {
    type Item = &'a NumericBlock;
    type IntoIter = std::slice::Iter<'a, NumericBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

// ---------------------------------------------------------------------------
// Grid – a flat table reshaped into equal blocks
// ---------------------------------------------------------------------------

/// A 3-D array of shape `[keys, rows_per_key, cols]`, row-major.
///
/// Axis 0 runs over the distinct values of the first column of the source
/// table.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    values: Vec<f64>,
    shape: [usize; 3],
}

impl Grid {
    /// Caller guarantees `values.len()` equals the product of `shape`.
    pub(crate) fn new(values: Vec<f64>, shape: [usize; 3]) -> Self {
        debug_assert_eq!(values.len(), shape.iter().product::<usize>());
        Grid { values, shape }
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<f64> {
        let [ni, nj, nk] = self.shape;
        if i >= ni || j >= nj || k >= nk {
            return None;
        }
        Some(self.values[(i * nj + j) * nk + k])
    }

    /// Row-major values of block `i`.
    pub fn block(&self, i: usize) -> Option<&[f64]> {
        let [ni, nj, nk] = self.shape;
        let len = nj * nk;
        (i < ni).then(|| &self.values[i * len..(i + 1) * len])
    }

    /// Split into one [`NumericBlock`] per key.
    pub fn to_blocks(&self) -> Vec<NumericBlock> {
        let [ni, _, nk] = self.shape;
        (0..ni)
            .filter_map(|i| self.block(i))
            .filter_map(|b| NumericBlock::from_flat(b.to_vec(), nk))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_rejects_ragged_input() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(NumericBlock::from_rows(&rows).is_none());
    }

    #[test]
    fn accessors_follow_row_major_layout() {
        let b = NumericBlock::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(b.shape(), (2, 3));
        assert_eq!(b.row(1), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(b.column(2), Some(vec![3.0, 6.0]));
        assert_eq!(b.get(0, 1), Some(2.0));
        assert_eq!(b.get(2, 0), None);
        assert_eq!(b.rows().count(), 2);
    }

    #[test]
    fn empty_block_has_no_rows() {
        let b = NumericBlock::default();
        assert!(b.is_empty());
        assert_eq!(b.rows().count(), 0);
        assert_eq!(b.to_string(), "");
    }

    #[test]
    fn display_writes_one_row_per_line() {
        let b = NumericBlock::from_rows(&[[1.0, 0.5], [2.0, 1e-9]]).unwrap();
        assert_eq!(b.to_string(), "1.0 0.5\n2.0 1e-9\n");
    }

    #[test]
    fn grid_indexing_and_split() {
        let values: Vec<f64> = (0..12).map(f64::from).collect();
        let grid = Grid::new(values, [2, 3, 2]);
        assert_eq!(grid.get(1, 0, 1), Some(7.0));
        assert_eq!(grid.get(2, 0, 0), None);
        let blocks = grid.to_blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].row(2), Some(&[10.0, 11.0][..]));
    }
}
