//! Artifact loader: file name in, model handle out

use crate::error::ModelError;
use crate::models::handle::ModelHandle;
use crate::models::linear::LinearModel;
use crate::models::onnx::OnnxPredictor;
use crate::models::predictor::Predictor;
use crate::models::registry::LoadErrorRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Loads serialized classifiers from a fixed directory
#[derive(Debug, Clone)]
pub struct ModelLoader {
    /// Directory the logical file names resolve against
    models_dir: PathBuf,
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new<P: AsRef<Path>>(models_dir: P) -> Self {
        Self::with_threads(models_dir, 1)
    }

    /// Create a new model loader with specified number of ONNX threads
    pub fn with_threads<P: AsRef<Path>>(models_dir: P, onnx_threads: usize) -> Self {
        Self {
            models_dir: models_dir.as_ref().to_path_buf(),
            onnx_threads: onnx_threads.max(1),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Path a logical file name resolves to
    pub fn resolve(&self, file_name: &str) -> PathBuf {
        self.models_dir.join(file_name)
    }

    /// Load one model, never failing.
    ///
    /// Missing and unreadable artifacts come back as non-loaded handles and
    /// are recorded in `registry` under `file_name`.
    pub fn load(&self, file_name: &str, registry: &mut LoadErrorRegistry) -> ModelHandle {
        let path = self.resolve(file_name);

        info!(model = %file_name, path = %path.display(), "Loading model");

        match self.load_predictor(&path) {
            Ok(predictor) => {
                info!(
                    model = %file_name,
                    backend = predictor.kind(),
                    "Model loaded successfully"
                );
                ModelHandle::loaded(file_name, path, predictor)
            }
            Err(e) => {
                warn!(model = %file_name, path = %path.display(), error = %e, "Failed to load model");
                registry.record(file_name, e.to_string());
                ModelHandle::failed(file_name, path, &e)
            }
        }
    }

    /// Deserialize the artifact at `path`, picking the format by extension
    pub fn load_predictor(&self, path: &Path) -> Result<Arc<dyn Predictor>, ModelError> {
        if !path.exists() {
            return Err(ModelError::MissingArtifact {
                path: path.to_path_buf(),
            });
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => {
                let bytes = std::fs::read(path).map_err(|e| ModelError::corrupt(path, e.to_string()))?;
                let model =
                    LinearModel::from_json_slice(&bytes).map_err(|e| ModelError::corrupt(path, e))?;
                Ok(Arc::new(model))
            }
            Some("onnx") => {
                let model = OnnxPredictor::load(path, self.onnx_threads)
                    .map_err(|e| ModelError::corrupt(path, format!("{e:#}")))?;
                Ok(Arc::new(model))
            }
            other => Err(ModelError::corrupt(
                path,
                format!(
                    "unsupported model artifact format: {}",
                    other.map(|ext| format!(".{ext}")).unwrap_or_else(|| "(no extension)".to_string())
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::handle::LoadStatus;

    const VALID: &str = r#"{"kind":"linear","coefficients":[1.0,-1.0],"intercept":0.0}"#;

    #[test]
    fn test_load_valid_artifact() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("m.json"), VALID).unwrap();

        let loader = ModelLoader::new(dir.path());
        let mut registry = LoadErrorRegistry::new();
        let handle = loader.load("m.json", &mut registry);

        assert_eq!(handle.status(), LoadStatus::Loaded);
        assert_eq!(handle.path(), dir.path().join("m.json"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ModelLoader::new(dir.path());
        let mut registry = LoadErrorRegistry::new();

        let handle = loader.load("absent.json", &mut registry);
        let expected_path = dir.path().join("absent.json");

        assert_eq!(handle.status(), LoadStatus::NotFound);
        let detail = handle.error_detail().unwrap();
        assert!(detail.contains(&expected_path.display().to_string()));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("absent.json"), Some(detail));
    }

    #[test]
    fn test_truncated_artifact() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("m.json"), &VALID[..20]).unwrap();

        let loader = ModelLoader::new(dir.path());
        let mut registry = LoadErrorRegistry::new();
        let handle = loader.load("m.json", &mut registry);

        assert_eq!(handle.status(), LoadStatus::LoadError);
        assert!(!handle.error_detail().unwrap().is_empty());
        assert!(registry.contains("m.json"));
    }

    #[test]
    fn test_binary_garbage_artifact() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("m.json"), [0x80u8, 0x04, 0x95, 0xff, 0x00]).unwrap();

        let loader = ModelLoader::new(dir.path());
        let mut registry = LoadErrorRegistry::new();
        let handle = loader.load("m.json", &mut registry);

        assert_eq!(handle.status(), LoadStatus::LoadError);
        assert!(handle.predictor().is_none());
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("diabetes_model.sav"), b"\x80\x04pickle").unwrap();

        let loader = ModelLoader::new(dir.path());
        let mut registry = LoadErrorRegistry::new();
        let handle = loader.load("diabetes_model.sav", &mut registry);

        assert_eq!(handle.status(), LoadStatus::LoadError);
        assert_eq!(
            handle.error_detail(),
            Some("unsupported model artifact format: .sav")
        );
    }

    #[test]
    fn test_resolve() {
        let loader = ModelLoader::with_threads("saved_models", 0);
        assert_eq!(loader.resolve("m.onnx"), PathBuf::from("saved_models/m.onnx"));
        assert_eq!(loader.models_dir(), Path::new("saved_models"));
    }
}
