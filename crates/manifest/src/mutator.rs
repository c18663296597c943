//! The deferred manifest mutator abstraction (§9 design notes).
//!
//! A `ManifestMutator` is a tagged, deferred function from manifest to
//! manifest. Splitters attach them to non-master splits; `ModuleSplitter`
//! collects every pending mutator for a variant and applies them once, to
//! that variant's master split only. Two mutators with the same tag but
//! different payloads are irreconcilable and `apply_all` reports that as a
//! conflict rather than picking one arbitrarily — callers surface this as
//! `InconsistentMasterMutators`.

use std::collections::HashMap;

use crate::manifest::{AndroidManifest, UsesSdkLibrary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestMutator {
    SetExtractNativeLibs(bool),
    SetSplitsRequired(bool),
    SetSandboxVersion(u32),
    SetMinSdk(u32),
    AddUsesSdkLibrary(UsesSdkLibrary),
    StripPrivacySandboxRequiredAttribute,
}

impl ManifestMutator {
    /// The manifest element/attribute this mutator targets. Two mutators
    /// sharing a tag must carry an identical payload or they conflict.
    fn tag(&self) -> &'static str {
        match self {
            ManifestMutator::SetExtractNativeLibs(_) => "extract_native_libs",
            ManifestMutator::SetSplitsRequired(_) => "is_split_required",
            ManifestMutator::SetSandboxVersion(_) => "target_sandbox_version",
            ManifestMutator::SetMinSdk(_) => "min_sdk",
            ManifestMutator::AddUsesSdkLibrary(lib) => {
                // Each SDK library is its own element; only identical
                // declarations for the same package name ever collapse.
                Box::leak(format!("uses_sdk_library::{}", lib.package_name).into_boxed_str())
            }
            ManifestMutator::StripPrivacySandboxRequiredAttribute => "strip_privacy_sandbox_required",
        }
    }

    fn apply(&self, manifest: &mut AndroidManifest) {
        match self {
            ManifestMutator::SetExtractNativeLibs(v) => manifest.extract_native_libs = Some(*v),
            ManifestMutator::SetSplitsRequired(v) => manifest.is_split_required = Some(*v),
            ManifestMutator::SetSandboxVersion(v) => manifest.target_sandbox_version = Some(*v),
            ManifestMutator::SetMinSdk(v) => manifest.min_sdk = Some(*v),
            ManifestMutator::AddUsesSdkLibrary(lib) => {
                if !manifest.uses_sdk_libraries.contains(lib) {
                    manifest.uses_sdk_libraries.push(lib.clone());
                }
            }
            ManifestMutator::StripPrivacySandboxRequiredAttribute => {
                manifest.required_by_privacy_sandbox_sdk = false;
            }
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("irreconcilable manifest mutators targeting {tag}")]
pub struct MutatorConflict {
    pub tag: String,
}

/// Apply every mutator in encounter order after checking none of them
/// disagree on the same manifest element. `tag()` leaks a small, bounded
/// number of strings per distinct SDK-library package name across a
/// process's lifetime — acceptable for a build-time tool whose mutator
/// lists are assembled once per variant and then dropped.
pub fn apply_all(manifest: &mut AndroidManifest, mutators: &[ManifestMutator]) -> Result<(), MutatorConflict> {
    let mut seen: HashMap<&'static str, &ManifestMutator> = HashMap::new();
    for mutator in mutators {
        let tag = mutator.tag();
        match seen.get(tag) {
            Some(prev) if *prev != mutator => {
                return Err(MutatorConflict { tag: tag.to_string() });
            }
            _ => {
                seen.insert(tag, mutator);
            }
        }
    }
    for mutator in mutators {
        mutator.apply(manifest);
    }
    Ok(())
}
