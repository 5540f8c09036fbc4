use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Backend – which export capability set a figure offers
// ---------------------------------------------------------------------------

/// Plotting library a figure comes from.
///
/// Parsed case-insensitively from `"Matplotlib"` or `"Plotly"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Backend {
    /// `savefig(path, dpi)`: vector and raster output.
    #[default]
    Matplotlib,
    /// `write_image(path, scale)` and `write_html(path)`.
    Plotly,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Matplotlib => "Matplotlib",
            Backend::Plotly => "Plotly",
        }
    }

    /// Modes this backend can produce, for error messages.
    pub fn supported_modes(self) -> &'static str {
        match self {
            Backend::Matplotlib => "vec, raster",
            Backend::Plotly => "vec, raster, html",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("matplotlib") {
            Ok(Backend::Matplotlib)
        } else if s.eq_ignore_ascii_case("plotly") {
            Ok(Backend::Plotly)
        } else {
            Err(Error::UnsupportedBackend(s.to_string()))
        }
    }
}

impl TryFrom<String> for Backend {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Backend> for String {
    fn from(b: Backend) -> Self {
        b.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// SaveMode – preset output formats
// ---------------------------------------------------------------------------

/// Preset selecting the default output format(s) when no extension is forced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SaveMode {
    /// Vector image (`.svg`).
    #[default]
    Vec,
    /// Raster image (`.png`) at the configured dpi or scale.
    Raster,
    /// Interactive page (`.html`), Plotly only.
    Html,
}

impl SaveMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SaveMode::Vec => "vec",
            SaveMode::Raster => "raster",
            SaveMode::Html => "html",
        }
    }
}

impl fmt::Display for SaveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaveMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vec" => Ok(SaveMode::Vec),
            "raster" => Ok(SaveMode::Raster),
            "html" => Ok(SaveMode::Html),
            other => Err(Error::UnsupportedMode {
                mode: other.to_string(),
                backend: None,
                supported: "vec, raster, html",
            }),
        }
    }
}

impl TryFrom<String> for SaveMode {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<SaveMode> for String {
    fn from(m: SaveMode) -> Self {
        m.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// SaveConfig
// ---------------------------------------------------------------------------

/// Options for [`save_figure`](super::save_figure).
///
/// Defaults: current directory, `vec` mode, no forced extension, 300 dpi,
/// scale 1, Matplotlib backend, no `.eps` companion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    /// Target directory, created with its parents when missing.
    pub directory: PathBuf,
    pub mode: SaveMode,
    /// Forces a single file with this extension, whatever the mode.
    pub ext: Option<String>,
    /// Resolution for Matplotlib raster and forced-extension output.
    pub dpi: u32,
    /// Scale factor for Plotly raster and forced-extension output.
    pub scale: f64,
    pub backend: Backend,
    /// Also write an `.eps` next to the `.svg` for Matplotlib `vec` saves.
    pub eps_companion: bool,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            mode: SaveMode::Vec,
            ext: None,
            dpi: 300,
            scale: 1.0,
            backend: Backend::Matplotlib,
            eps_companion: false,
        }
    }
}

impl SaveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON config object; missing keys take their defaults.
    ///
    /// Unknown `backend` or `mode` strings are reported as
    /// [`Error::UnsupportedBackend`] / [`Error::UnsupportedMode`] rather
    /// than a generic deserialization error.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(text)?;
        if let Some(backend) = value.get("backend").and_then(JsonValue::as_str) {
            backend.parse::<Backend>()?;
        }
        if let Some(mode) = value.get("mode").and_then(JsonValue::as_str) {
            mode.parse::<SaveMode>()?;
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn directory(mut self, dir: impl AsRef<Path>) -> Self {
        self.directory = dir.as_ref().to_path_buf();
        self
    }

    pub fn mode(mut self, mode: SaveMode) -> Self {
        self.mode = mode;
        self
    }

    /// Force an extension; a leading `.` is dropped.
    pub fn ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = Some(ext.into());
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn eps_companion(mut self, on: bool) -> Self {
        self.eps_companion = on;
        self
    }

    /// The forced extension without its leading dot. An empty extension
    /// counts as unset.
    pub fn forced_ext(&self) -> Option<&str> {
        self.ext
            .as_deref()
            .map(|e| e.trim_start_matches('.'))
            .filter(|e| !e.is_empty())
    }
}
