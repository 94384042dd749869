use crate::error::{ConvertError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Where an operation writes: a directory plus a file name
///
/// Resolution is pure; the directory is only created by [`prepare`] right
/// before a write, so skipped operations leave the tree untouched.
///
/// [`prepare`]: OutputLocation::prepare
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    pub dir: PathBuf,
    pub file_name: String,
}

impl OutputLocation {
    /// `root/<subfolder>/<file_name>` in separate-folders mode, else `root/<file_name>`
    pub fn resolve(
        output_root: &Path,
        subfolder: &str,
        separate_folders: bool,
        file_name: impl Into<String>,
    ) -> Self {
        let dir = if separate_folders && !subfolder.is_empty() {
            output_root.join(subfolder.to_lowercase())
        } else {
            output_root.to_path_buf()
        };
        Self {
            dir,
            file_name: file_name.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Creates the directory if needed and returns the full output path
    pub fn prepare(&self) -> Result<PathBuf> {
        ensure_dir(&self.dir)?;
        Ok(self.path())
    }
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        fs::create_dir_all(dir).map_err(|_| ConvertError::DirectoryCreationFailed(dir.to_path_buf()))?;
    }
    Ok(())
}

/// File stem as a string, e.g. `photo` for `/in/photo.png`
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
