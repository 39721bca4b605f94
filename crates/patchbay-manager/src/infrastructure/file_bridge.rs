//! JSON file implementation of the config bridge.
//!
//! Persists the config document to the platform-appropriate location:
//! - Windows:  `%APPDATA%\Patchbay\config.json`
//! - Linux:    `~/.config/patchbay/config.json`
//! - macOS:    `~/Library/Application Support/Patchbay/config.json`
//!
//! The document is small (a handful of clones with a few dozen keys each),
//! so every write replaces the whole file.  Output is pretty-printed: the
//! file doubles as the hand-editing escape hatch when a bad value locks the
//! manager out, and pretty JSON keeps its diffs reviewable.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use patchbay_core::{BridgeError, ConfigBridge};
use serde_json::Value;
use tracing::debug;

/// Config bridge backed by a single JSON file.
pub struct FileBridge {
    path: PathBuf,
}

impl FileBridge {
    /// Creates a bridge that persists to `path`.
    ///
    /// Nothing is read or created until the store asks; a missing file is
    /// reported as "no document yet", not an error.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this bridge reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigBridge for FileBridge {
    fn read_document(&self) -> Result<Option<Value>, BridgeError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content)
                .map(Some)
                .map_err(|e| BridgeError::Malformed(format!("{}: {e}", self.path.display()))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no config file at {}", self.path.display());
                Ok(None)
            }
            Err(e) => Err(BridgeError::Read(format!("{}: {e}", self.path.display()))),
        }
    }

    fn write_document(&self, document: &Value) -> Result<(), BridgeError> {
        // Ensure directory exists before writing.
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| BridgeError::Write(format!("{}: {e}", dir.display())))?;
        }

        let content = serde_json::to_string_pretty(document)
            .map_err(|e| BridgeError::Write(e.to_string()))?;
        std::fs::write(&self.path, content)
            .map_err(|e| BridgeError::Write(format!("{}: {e}", self.path.display())))
    }
}

/// Resolves the default config file path for this platform.
///
/// Returns `None` when the platform base directory cannot be determined from
/// the environment (e.g. a stripped container without `HOME`).
pub fn default_config_path() -> Option<PathBuf> {
    platform_config_dir().map(|dir| dir.join("config.json"))
}

/// Resolves the platform config directory including the `Patchbay` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Patchbay"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("patchbay"))
    }

    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/Patchbay
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Patchbay")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        // Fallback for unsupported platforms.
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
