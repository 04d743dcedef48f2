//! Per-run scratch directory for intermediate files

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Scratch space removed when dropped, whatever way the run ends
pub struct RunWorkspace {
    dir: TempDir,
}

impl RunWorkspace {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("coverage-report-")
            .tempdir()
            .context("Failed to create run workspace")?;
        debug!(path = %dir.path().display(), "run workspace created");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Copy the template to `temp_<file name>` and return the copy's path
    pub fn stage_template(&self, template: &Path) -> Result<PathBuf> {
        let name = template
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "template.docx".to_string());
        let staged = self.dir.path().join(format!("temp_{}", name));
        fs::copy(template, &staged)
            .with_context(|| format!("Failed to stage template {}", template.display()))?;
        Ok(staged)
    }

    /// Where the extracted chart for `locality` is written
    pub fn chart_image_path(&self, locality: &str) -> PathBuf {
        self.dir.path().join(format!("temp_{}_imagen.png", locality))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_is_removed_on_drop() {
        let source = tempfile::tempdir().unwrap();
        let template = source.path().join("TUMBACO_4G_CONECEL_DT.docx");
        fs::write(&template, b"docx").unwrap();

        let workspace = RunWorkspace::new().unwrap();
        let staged = workspace.stage_template(&template).unwrap();
        assert!(staged.ends_with("temp_TUMBACO_4G_CONECEL_DT.docx"));
        assert_eq!(fs::read(&staged).unwrap(), b"docx");
        assert!(workspace
            .chart_image_path("TUMBACO")
            .ends_with("temp_TUMBACO_imagen.png"));

        let root = workspace.path().to_path_buf();
        drop(workspace);
        assert!(!root.exists());
    }
}
