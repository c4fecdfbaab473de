use std::path::PathBuf;

use tracing::debug;

use crate::errors::HarnessError;
use crate::utils::formatting::format_bytes;

/// Scratch directory for audio returned by successful synthesis steps.
/// Same-named files are overwritten on later runs.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    directory: PathBuf,
}

impl ArtifactStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    /// Write `bytes` to `<directory>/<name>`, creating the directory first.
    pub async fn save(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, HarnessError> {
        tokio::fs::create_dir_all(&self.directory).await?;
        let path = self.directory.join(sanitize_file_name(name));
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), size = %format_bytes(bytes.len()), "Saved artifact");
        Ok(path)
    }
}

/// Keep a name to one path component. Letters and digits of any script
/// survive; separators, control characters and punctuation become `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "artifact".to_string()
    } else {
        trimmed.to_string()
    }
}
