//! Sequential-name writer: save figures as `{base}_{n}.{ext}` without
//! overwriting earlier output.

pub mod config;
pub mod naming;
pub mod save;

use std::path::Path;

use anyhow::{bail, Result};

pub use config::{Backend, SaveConfig, SaveMode};
pub use naming::{next_free_suffix, numbered_path};
pub use save::{export_calls, plan_targets, save_figure, ExportCall, ExportTarget, SavedFigure};

/// Export capabilities of a figure owned by a plotting library.
///
/// Implement the methods the library supports; the rest report that the
/// export is unavailable. The writer never inspects the figure itself.
pub trait Figure {
    /// Matplotlib-style export. `dpi` is `None` for vector output.
    fn savefig(&self, path: &Path, _dpi: Option<u32>) -> Result<()> {
        bail!("figure cannot savefig to {}", path.display())
    }

    /// Plotly-style static image export. `scale` is `None` for vector output.
    fn write_image(&self, path: &Path, _scale: Option<f64>) -> Result<()> {
        bail!("figure cannot write_image to {}", path.display())
    }

    /// Plotly-style interactive export.
    fn write_html(&self, path: &Path) -> Result<()> {
        bail!("figure cannot write_html to {}", path.display())
    }
}

impl<F: Figure + ?Sized> Figure for &F {
    fn savefig(&self, path: &Path, dpi: Option<u32>) -> Result<()> {
        (**self).savefig(path, dpi)
    }

    fn write_image(&self, path: &Path, scale: Option<f64>) -> Result<()> {
        (**self).write_image(path, scale)
    }

    fn write_html(&self, path: &Path) -> Result<()> {
        (**self).write_html(path)
    }
}
