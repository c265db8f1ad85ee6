pub mod editor;
pub mod loader;
pub mod reporter;

pub use editor::{EditorStage, MarkerEdits, apply_marker};
pub use loader::LoaderStage;
pub use reporter::ReporterStage;
