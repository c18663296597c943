//! `ModuleSplit`: the central composite the splitting core produces and
//! consumes (§3).

use shardkit_manifest::{AndroidManifest, ManifestMutator};
use shardkit_targeting::{ApkTargeting, VariantTargeting};

use crate::bundle_module::{AssetsConfig, BundleModule, ResourceTable};
use crate::entry::{ModuleEntry, ModuleName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitType {
    Split,
    AssetSlice,
    Standalone,
    Instant,
    System,
    Archive,
}

/// One output APK's worth of entries, targeting, and (for masters) manifest.
#[derive(Debug, Clone)]
pub struct ModuleSplit {
    pub module_name: ModuleName,
    pub split_type: SplitType,
    pub is_master: bool,
    pub apk_targeting: ApkTargeting,
    pub variant_targeting: VariantTargeting,
    pub entries: Vec<ModuleEntry>,
    pub manifest: Option<AndroidManifest>,
    pub resource_table: Option<ResourceTable>,
    pub assets_config: Option<AssetsConfig>,
    /// Mutators this split wants applied to its variant's master manifest
    /// once the pipeline finishes (§4.2 split-requires-splits rule, §4.4
    /// step 6).
    pub pending_master_manifest_mutators: Vec<ManifestMutator>,
    pub split_id: Option<String>,
    /// Set by `ModuleSplitter` when `SparseEncodingVariantGenerator`'s
    /// breakpoint applies to this split's variant (§4.6).
    pub sparse_encoding: bool,
}

impl ModuleSplit {
    fn base(module_name: ModuleName, split_type: SplitType, variant_targeting: VariantTargeting) -> Self {
        Self {
            module_name,
            split_type,
            is_master: true,
            apk_targeting: ApkTargeting::default_targeting(),
            variant_targeting,
            entries: Vec::new(),
            manifest: None,
            resource_table: None,
            assets_config: None,
            pending_master_manifest_mutators: Vec::new(),
            split_id: None,
            sparse_encoding: false,
        }
    }

    /// Build the initial master split for a code/resource module (§4.4 step 1).
    pub fn for_module(module: &BundleModule, variant_targeting: VariantTargeting) -> Self {
        let mut split = Self::base(module.name.clone(), SplitType::Split, variant_targeting);
        split.entries = module.entries.clone();
        split.manifest = Some(module.manifest.clone());
        split.resource_table = module.resource_table.clone();
        split.assets_config = module.assets_config.clone();
        split
    }

    /// Build the initial master split for an asset-only module (§4.4 step 3).
    pub fn for_assets(module: &BundleModule, variant_targeting: VariantTargeting) -> Self {
        let mut split = Self::base(module.name.clone(), SplitType::AssetSlice, variant_targeting);
        split.entries = module.entries.clone();
        split.assets_config = module.assets_config.clone();
        split
    }

    /// Build the initial split for one APEX image (§4.2 APEX multi-ABI splitter).
    pub fn for_apex(module: &BundleModule, variant_targeting: VariantTargeting) -> Self {
        let mut split = Self::base(module.name.clone(), SplitType::Split, variant_targeting);
        split.entries = module.entries.clone();
        split.manifest = Some(module.manifest.clone());
        split
    }

    pub fn is_config_split(&self) -> bool {
        !self.is_master
    }

    /// A split-requires-splits mutator fires once per non-master output
    /// produced by a dimension splitter (§4.2).
    pub fn push_splits_required_mutator(&mut self) {
        self.pending_master_manifest_mutators
            .push(ManifestMutator::SetSplitsRequired(true));
    }

    pub fn entry_paths(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.path.as_str()).collect()
    }
}
