use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::config::{Backend, SaveConfig, SaveMode};
use super::naming::{check_base_name, next_free_suffix, numbered_path};
use super::Figure;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Export plan
// ---------------------------------------------------------------------------

/// Which figure method to call for one output file, with its parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportCall {
    /// Matplotlib-style `savefig(path, dpi)`.
    SaveFig { dpi: Option<u32> },
    /// Plotly-style `write_image(path, scale)`.
    WriteImage { scale: Option<f64> },
    /// Plotly-style `write_html(path)`.
    WriteHtml,
}

/// One file a save will ask the figure to write.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTarget {
    pub path: PathBuf,
    pub call: ExportCall,
}

/// Result of a successful [`save_figure`].
#[derive(Debug, Clone, PartialEq)]
pub struct SavedFigure {
    /// Absolute directory the files were written to.
    pub directory: PathBuf,
    pub suffix: u32,
    /// Written files, in write order.
    pub paths: Vec<PathBuf>,
}

/// Extensions and calls a config resolves to, without touching the disk.
///
/// Fails with [`Error::UnsupportedMode`] for `html` on Matplotlib.
pub fn export_calls(config: &SaveConfig) -> Result<Vec<(String, ExportCall)>> {
    let one = |ext: &str, call: ExportCall| -> Result<Vec<(String, ExportCall)>> {
        Ok(vec![(ext.to_string(), call)])
    };
    let dpi = Some(config.dpi);
    let scale = Some(config.scale);
    if let Some(ext) = config.forced_ext() {
        if ext.contains(['/', '\\']) {
            return Err(Error::InvalidOptions(format!(
                "extension '{ext}' must not contain a path separator"
            )));
        }
    }

    match (config.backend, config.forced_ext()) {
        (Backend::Matplotlib, Some(ext)) => one(ext, ExportCall::SaveFig { dpi }),
        (Backend::Plotly, Some(ext)) => one(ext, ExportCall::WriteImage { scale }),
        (Backend::Matplotlib, None) => match config.mode {
            SaveMode::Vec => {
                let mut calls = vec![("svg".to_string(), ExportCall::SaveFig { dpi: None })];
                if config.eps_companion {
                    calls.push(("eps".to_string(), ExportCall::SaveFig { dpi: None }));
                }
                Ok(calls)
            }
            SaveMode::Raster => one("png", ExportCall::SaveFig { dpi }),
            SaveMode::Html => Err(Error::UnsupportedMode {
                mode: config.mode.to_string(),
                backend: Some(Backend::Matplotlib),
                supported: Backend::Matplotlib.supported_modes(),
            }),
        },
        (Backend::Plotly, None) => match config.mode {
            SaveMode::Vec => one("svg", ExportCall::WriteImage { scale: None }),
            SaveMode::Raster => one("png", ExportCall::WriteImage { scale }),
            SaveMode::Html => one("html", ExportCall::WriteHtml),
        },
    }
}

/// Full target list for `base` at `suffix` inside `dir`.
pub fn plan_targets(
    dir: &Path,
    base: &str,
    suffix: u32,
    config: &SaveConfig,
) -> Result<Vec<ExportTarget>> {
    check_base_name(base)?;
    Ok(export_calls(config)?
        .into_iter()
        .map(|(ext, call)| ExportTarget {
            path: numbered_path(dir, base, suffix, &ext),
            call,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Save `figure` as `{base}_{n}.{ext}` in the configured directory, with
/// `n` the smallest suffix no existing file uses.
///
/// The configuration is validated before anything is created on disk. The
/// directory is then created if needed and the suffix chosen by scanning
/// it. A failing export stops the save; files written before it stay.
pub fn save_figure(figure: &dyn Figure, base: &str, config: &SaveConfig) -> Result<SavedFigure> {
    check_base_name(base)?;
    let calls = export_calls(config)?;

    let directory = prepare_directory(&config.directory)?;
    let suffix = next_free_suffix(&directory, base)?;
    debug!("saving '{base}' with suffix {suffix} in {}", directory.display());

    let mut paths = Vec::with_capacity(calls.len());
    for (ext, call) in calls {
        let path = numbered_path(&directory, base, suffix, &ext);
        export(figure, &path, call)?;
        paths.push(path);
    }

    info!(
        "saved {} file(s) for '{base}_{suffix}' to {} ({} backend)",
        paths.len(),
        directory.display(),
        config.backend
    );
    Ok(SavedFigure {
        directory,
        suffix,
        paths,
    })
}

fn export(figure: &dyn Figure, path: &Path, call: ExportCall) -> Result<()> {
    debug!("{call:?} -> {}", path.display());
    let outcome = match call {
        ExportCall::SaveFig { dpi } => figure.savefig(path, dpi),
        ExportCall::WriteImage { scale } => figure.write_image(path, scale),
        ExportCall::WriteHtml => figure.write_html(path),
    };
    outcome.map_err(|source| Error::Export {
        path: path.to_path_buf(),
        source,
    })
}

/// Create `dir` (and parents) when missing and return its absolute form.
/// An empty path means the current directory.
fn prepare_directory(dir: &Path) -> Result<PathBuf> {
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    let io_err = |source| Error::Io {
        path: dir.to_path_buf(),
        source,
    };
    if !dir.exists() {
        debug!("creating {}", dir.display());
        fs::create_dir_all(dir).map_err(io_err)?;
    }
    fs::canonicalize(dir).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calls(config: &SaveConfig) -> Vec<(String, ExportCall)> {
        export_calls(config).unwrap()
    }

    #[test]
    fn matplotlib_vec_is_svg_without_dpi() {
        assert_eq!(
            calls(&SaveConfig::new()),
            vec![("svg".to_string(), ExportCall::SaveFig { dpi: None })]
        );
    }

    #[test]
    fn eps_companion_follows_svg() {
        let exts: Vec<String> = calls(&SaveConfig::new().eps_companion(true))
            .into_iter()
            .map(|(ext, _)| ext)
            .collect();
        assert_eq!(exts, ["svg", "eps"]);
    }

    #[test]
    fn eps_companion_is_matplotlib_only() {
        let cfg = SaveConfig::new().backend(Backend::Plotly).eps_companion(true);
        assert_eq!(calls(&cfg).len(), 1);
    }

    #[test]
    fn raster_passes_resolution_per_backend() {
        let mpl = SaveConfig::new().mode(SaveMode::Raster).dpi(150);
        assert_eq!(
            calls(&mpl)[0],
            ("png".to_string(), ExportCall::SaveFig { dpi: Some(150) })
        );

        let plotly = mpl.backend(Backend::Plotly).scale(2.0);
        assert_eq!(
            calls(&plotly)[0],
            ("png".to_string(), ExportCall::WriteImage { scale: Some(2.0) })
        );
    }

    #[test]
    fn forced_ext_overrides_mode() {
        let cfg = SaveConfig::new().mode(SaveMode::Html).ext("pdf");
        assert_eq!(
            calls(&cfg),
            vec![("pdf".to_string(), ExportCall::SaveFig { dpi: Some(300) })]
        );
    }

    #[test]
    fn html_needs_plotly() {
        let cfg = SaveConfig::new().mode(SaveMode::Html);
        match export_calls(&cfg) {
            Err(Error::UnsupportedMode { mode, backend, .. }) => {
                assert_eq!(mode, "html");
                assert_eq!(backend, Some(Backend::Matplotlib));
            }
            other => panic!("expected UnsupportedMode, got {other:?}"),
        }
        assert_eq!(
            calls(&cfg.backend(Backend::Plotly)),
            vec![("html".to_string(), ExportCall::WriteHtml)]
        );
    }

    #[test]
    fn extension_with_separator_is_rejected() {
        for ext in ["d/../../escaped", "a\\b"] {
            let cfg = SaveConfig::new().ext(ext);
            assert!(matches!(export_calls(&cfg), Err(Error::InvalidOptions(_))));
        }
    }

    #[test]
    fn empty_directory_is_the_current_one() {
        let resolved = prepare_directory(Path::new("")).unwrap();
        assert_eq!(resolved, fs::canonicalize(".").unwrap());
    }

    #[test]
    fn output_directory_errors_are_io_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("plain-file");
        fs::write(&blocker, b"x").unwrap();
        let err = prepare_directory(&blocker.join("sub")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn plan_targets_builds_numbered_paths() {
        let targets = plan_targets(Path::new("/out"), "fig", 4, &SaveConfig::new()).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].path, PathBuf::from("/out/fig_4.svg"));
    }
}
