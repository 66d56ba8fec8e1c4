//! Model handles owned by the store

use crate::error::ModelError;
use crate::models::predictor::Predictor;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Load status of a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Loaded,
    NotFound,
    LoadError,
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoadStatus::Loaded => "loaded",
            LoadStatus::NotFound => "not found",
            LoadStatus::LoadError => "load error",
        };
        f.write_str(s)
    }
}

/// Size and modification time of an artifact on disk
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactInfo {
    pub size_bytes: u64,
    pub modified: DateTime<Local>,
}

impl ArtifactInfo {
    /// Read file metadata, `None` if the size or mtime cannot be read
    pub fn read(path: &Path) -> Option<Self> {
        let metadata = std::fs::metadata(path).ok()?;
        let modified = metadata.modified().ok()?;
        Some(Self {
            size_bytes: metadata.len(),
            modified: DateTime::<Local>::from(modified),
        })
    }

    /// Render as `"12.3 KB, modified 2024-05-01 10:00:00"`
    pub fn describe(info: Option<&ArtifactInfo>) -> String {
        match info {
            Some(info) => format!(
                "{:.1} KB, modified {}",
                info.size_bytes as f64 / 1024.0,
                info.modified.format("%Y-%m-%d %H:%M:%S")
            ),
            None => "(no info)".to_string(),
        }
    }
}

enum HandleState {
    Loaded(Arc<dyn Predictor>),
    NotFound(String),
    LoadError(String),
}

/// A model slot: either a usable predictor or the reason it is missing
pub struct ModelHandle {
    name: String,
    path: PathBuf,
    state: HandleState,
    info: Option<ArtifactInfo>,
}

impl ModelHandle {
    /// Handle wrapping a successfully loaded predictor
    pub fn loaded(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        predictor: Arc<dyn Predictor>,
    ) -> Self {
        let path = path.into();
        let info = ArtifactInfo::read(&path);
        Self {
            name: name.into(),
            path,
            state: HandleState::Loaded(predictor),
            info,
        }
    }

    /// Handle recording a load failure
    pub fn failed(name: impl Into<String>, path: impl Into<PathBuf>, error: &ModelError) -> Self {
        let path = path.into();
        let detail = error.to_string();
        let state = match error {
            ModelError::MissingArtifact { .. } => HandleState::NotFound(detail),
            _ => HandleState::LoadError(detail),
        };
        let info = ArtifactInfo::read(&path);
        Self {
            name: name.into(),
            path,
            state,
            info,
        }
    }

    /// Logical name (the artifact file name)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved artifact path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn status(&self) -> LoadStatus {
        match self.state {
            HandleState::Loaded(_) => LoadStatus::Loaded,
            HandleState::NotFound(_) => LoadStatus::NotFound,
            HandleState::LoadError(_) => LoadStatus::LoadError,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, HandleState::Loaded(_))
    }

    /// Failure detail; present iff the handle is not loaded
    pub fn error_detail(&self) -> Option<&str> {
        match &self.state {
            HandleState::Loaded(_) => None,
            HandleState::NotFound(detail) | HandleState::LoadError(detail) => Some(detail.as_str()),
        }
    }

    /// The predictor, only reachable on a loaded handle.
    ///
    /// This is the call-site guard: the gateway takes a predictor, not a
    /// handle, so callers must come through here first.
    pub fn predictor(&self) -> Option<&dyn Predictor> {
        match &self.state {
            HandleState::Loaded(predictor) => Some(predictor.as_ref()),
            _ => None,
        }
    }

    pub fn artifact_info(&self) -> Option<&ArtifactInfo> {
        self.info.as_ref()
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("status", &self.status())
            .field("error", &self.error_detail())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Fixed(i64);

    impl Predictor for Fixed {
        fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>, ModelError> {
            Ok(vec![self.0; rows.len()])
        }

        fn kind(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn test_loaded_handle() {
        let handle = ModelHandle::loaded("m.json", "/nonexistent/m.json", Arc::new(Fixed(1)));
        assert_eq!(handle.status(), LoadStatus::Loaded);
        assert!(handle.is_loaded());
        assert!(handle.error_detail().is_none());
        assert_eq!(handle.predictor().map(|p| p.kind()), Some("fixed"));
        assert!(handle.artifact_info().is_none());
    }

    #[test]
    fn test_failed_handles() {
        let missing = ModelError::MissingArtifact {
            path: PathBuf::from("/nonexistent/m.json"),
        };
        let handle = ModelHandle::failed("m.json", "/nonexistent/m.json", &missing);
        assert_eq!(handle.status(), LoadStatus::NotFound);
        assert!(handle.predictor().is_none());
        assert_eq!(handle.error_detail(), Some("File not found: /nonexistent/m.json"));

        let corrupt = ModelError::corrupt("/nonexistent/m.json", "bad magic");
        let handle = ModelHandle::failed("m.json", "/nonexistent/m.json", &corrupt);
        assert_eq!(handle.status(), LoadStatus::LoadError);
        assert_eq!(handle.error_detail(), Some("bad magic"));
    }

    #[test]
    fn test_describe_artifact_info() {
        assert_eq!(ArtifactInfo::describe(None), "(no info)");
        let modified = Local.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let info = ArtifactInfo {
            size_bytes: 2048,
            modified,
        };
        assert_eq!(
            ArtifactInfo::describe(Some(&info)),
            "2.0 KB, modified 2024-05-01 10:00:00"
        );
        assert_eq!(
            ArtifactInfo::describe(ArtifactInfo::read(Path::new("/nonexistent/m.json")).as_ref()),
            "(no info)"
        );
    }

    #[test]
    fn test_read_artifact_info() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.json");
        std::fs::write(&path, vec![0u8; 1536]).unwrap();

        let info = ArtifactInfo::read(&path).unwrap();
        assert_eq!(info.size_bytes, 1536);
        assert!(ArtifactInfo::describe(Some(&info)).starts_with("1.5 KB, modified "));
    }
}
