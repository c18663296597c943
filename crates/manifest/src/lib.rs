//! AndroidManifest value type and the deferred mutator abstraction used to
//! finalize each variant's master manifest (§4.4 step 6-7, §6, §9).

pub mod manifest;
pub mod mutator;

pub use manifest::{AndroidManifest, UsesSdkLibrary};
pub use mutator::{apply_all, ManifestMutator, MutatorConflict};
