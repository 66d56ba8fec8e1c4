//! Model loading and inference components

pub mod handle;
pub mod inference;
pub mod linear;
pub mod loader;
pub mod onnx;
pub mod predictor;
pub mod registry;
pub mod store;

pub use handle::{ArtifactInfo, LoadStatus, ModelHandle};
pub use linear::LinearModel;
pub use loader::ModelLoader;
pub use onnx::OnnxPredictor;
pub use predictor::Predictor;
pub use registry::LoadErrorRegistry;
pub use store::ModelStore;
