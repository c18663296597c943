//! Android Manifest value type.
//!
//! This is deliberately narrower than a full `AndroidManifest.xml` model:
//! it only carries the fields the split generation core reads or mutates
//! (§4.4 step 7, §6 runtime-enabled-SDK config). Parsing the manifest out of
//! a module's protobuf form and serializing mutations back into one are the
//! "manifest protobuf mutator utilities" the specification calls out as an
//! external collaborator (§1) — this type is the in-memory value they
//! produce and consume.

use serde::{Deserialize, Serialize};

/// A `<uses-sdk-library>` declaration injected into the base master manifest
/// when the bundle declares a runtime-enabled SDK (§6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsesSdkLibrary {
    pub package_name: String,
    pub version_major: u32,
    pub certificate_digest: String,
}

/// The manifest fields relevant to split generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AndroidManifest {
    /// Package name (e.g., "com.example.app").
    pub package: String,

    /// `android:minSdkVersion` on `<uses-sdk>`.
    pub min_sdk: Option<u32>,

    /// `android:targetSdkVersion` on `<uses-sdk>`.
    pub target_sdk: Option<u32>,

    /// `android:maxSdkVersion` on `<uses-sdk>`. A module targeting only
    /// pre-L devices sets this below `sdk::L`, which `ModuleSplitter`
    /// refuses to split (`TargetsPreL`).
    pub max_sdk: Option<u32>,

    /// `android:extractNativeLibs` on `<application>`. Set by the
    /// uncompressed-native-libs variant mutator.
    pub extract_native_libs: Option<bool>,

    /// `android:targetSandboxVersion` on `<manifest>`. Set to `2` for
    /// instant-app variants.
    pub target_sandbox_version: Option<u32>,

    /// `android:isSplitRequired` on `<application>`. Set once whenever any
    /// targeted config split is produced for the variant.
    pub is_split_required: Option<bool>,

    /// Whether this manifest's application element declares
    /// `requiredByPrivacySandboxSdk="true"` anywhere. The non-sdk-runtime
    /// variant strips it.
    pub required_by_privacy_sandbox_sdk: bool,

    /// `<uses-sdk-library>` elements, injected into the base module's
    /// master manifest per runtime-enabled-SDK config entry.
    pub uses_sdk_libraries: Vec<UsesSdkLibrary>,
}

impl AndroidManifest {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Default::default()
        }
    }

    pub fn with_min_sdk(mut self, min_sdk: u32) -> Self {
        self.min_sdk = Some(min_sdk);
        self
    }

    pub fn with_max_sdk(mut self, max_sdk: u32) -> Self {
        self.max_sdk = Some(max_sdk);
        self
    }

    /// Effective min SDK, defaulting to 1 when unspecified (matches
    /// Android's own default for an absent `<uses-sdk>` element).
    pub fn effective_min_sdk(&self) -> u32 {
        self.min_sdk.unwrap_or(1)
    }
}
