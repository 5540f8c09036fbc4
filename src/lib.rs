//! Helpers for scientific plotting workflows.
//!
//! * [`data`] reads text files of blank-line-separated numeric sections into
//!   tables, or reshapes a keyed flat table into equal blocks.
//! * [`figure`] saves figures under `{base}_{n}.{ext}` names, picking the
//!   first unused `n` so repeated runs never overwrite earlier output.

pub mod data;
pub mod error;
pub mod figure;

pub use data::loader::{
    read_blocks, read_blocks_from_str, read_grid, read_grid_from_str, write_blocks,
};
pub use data::model::{BlockDataset, Grid, NumericBlock};
pub use data::options::{Dtype, ParseOptions};
pub use error::{Error, Result};
pub use figure::{save_figure, Backend, Figure, SaveConfig, SaveMode, SavedFigure};
