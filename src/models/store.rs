//! Model store: the three disease models and their load failures

use crate::config::ModelsConfig;
use crate::models::handle::ModelHandle;
use crate::models::loader::ModelLoader;
use crate::models::registry::LoadErrorRegistry;
use crate::types::disease::Disease;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Owns one handle per disease for the life of the process
#[derive(Debug, Default)]
pub struct ModelStore {
    handles: BTreeMap<Disease, ModelHandle>,
    errors: LoadErrorRegistry,
}

impl ModelStore {
    /// Load every configured model once.
    ///
    /// Each model loads independently; a failure only disables its own
    /// disease and shows up in [`ModelStore::errors`].
    pub fn load_all(config: &ModelsConfig) -> Self {
        let loader = ModelLoader::with_threads(&config.models_dir, config.onnx_threads);
        let mut errors = LoadErrorRegistry::new();
        let mut handles = BTreeMap::new();

        for disease in Disease::ALL {
            let handle = loader.load(config.file_for(disease), &mut errors);
            check_width(disease, &handle);
            handles.insert(disease, handle);
        }

        let store = Self { handles, errors };
        info!(
            loaded = store.loaded_count(),
            failed = store.errors.len(),
            models_dir = %loader.models_dir().display(),
            "Model store ready"
        );
        store
    }

    /// Assemble a store from prebuilt handles
    pub fn from_handles(
        handles: impl IntoIterator<Item = (Disease, ModelHandle)>,
        errors: LoadErrorRegistry,
    ) -> Self {
        Self {
            handles: handles.into_iter().collect(),
            errors,
        }
    }

    pub fn handle(&self, disease: Disease) -> Option<&ModelHandle> {
        self.handles.get(&disease)
    }

    /// Handles in disease order
    pub fn handles(&self) -> impl Iterator<Item = (Disease, &ModelHandle)> {
        self.handles.iter().map(|(disease, handle)| (*disease, handle))
    }

    /// Load failures recorded at startup
    pub fn errors(&self) -> &LoadErrorRegistry {
        &self.errors
    }

    pub fn loaded_count(&self) -> usize {
        self.handles.values().filter(|h| h.is_loaded()).count()
    }
}

/// Warn when an artifact declares a feature count other than the schema's.
/// The handle stays loaded; the gateway reports the mismatch per request.
fn check_width(disease: Disease, handle: &ModelHandle) {
    let declared = handle.predictor().and_then(|p| p.input_width());
    if let Some(width) = declared {
        if width != disease.feature_count() {
            warn!(
                disease = %disease,
                model = %handle.name(),
                declared = width,
                expected = disease.feature_count(),
                "Model input width does not match the disease schema"
            );
        }
    }
}
