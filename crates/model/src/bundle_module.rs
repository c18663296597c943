//! `BundleModule`: an immutable view of a module's files, manifest,
//! resource table, assets-config and native-config (§3).

use std::collections::BTreeSet;
use indexmap::IndexMap;

use shardkit_manifest::AndroidManifest;
use shardkit_targeting::{Abi, CountrySet, Language};

use crate::entry::{ModuleEntry, ModuleName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Base,
    Feature,
    AssetOnly,
}

/// A declared `resource_id` or `resource_name` pinned to every master
/// split regardless of configuration (§6 `master_resources`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfigValue {
    /// `None` means this value is the density-agnostic default.
    pub density: Option<shardkit_targeting::ScreenDensity>,
    /// `None` means this value is the locale-agnostic default.
    pub language: Option<Language>,
    pub path: crate::entry::EntryPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub id: ResourceId,
    pub name: String,
    pub configs: Vec<ResourceConfigValue>,
}

/// A drastically simplified view of the module's compiled resource table:
/// enough to drive the density splitter's best-match search (§4.2) and to
/// validate `master_resources` pins (§6). Full `resources.pb` structure
/// (styles, references, complex values) belongs to the out-of-scope
/// resource-table construction stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceTable {
    pub entries: Vec<ResourceEntry>,
}

impl ResourceTable {
    pub fn has_resource_id(&self, id: u32) -> bool {
        self.entries.iter().any(|e| e.id.0 == id)
    }

    pub fn has_resource_name(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn entry_for_path(&self, path: &str) -> Option<&ResourceEntry> {
        self.entries
            .iter()
            .find(|e| e.configs.iter().any(|c| c.path.as_str() == path))
    }
}

/// Declared alternative targeting on a single targeted-assets directory.
/// These can't be derived from the directory's path alone — they're
/// metadata the bundle author attached so the device selector knows a
/// default or suffixed directory also serves additional values (§4.2
/// language and country-set splitters).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetsDirectoryTargeting {
    pub alternative_language_targeting: Option<BTreeSet<Language>>,
    pub alternative_country_set_targeting: Option<BTreeSet<CountrySet>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetedAssetsDirectory {
    /// The directory's literal path, suffix included if it has one, e.g.
    /// `"assets/images"` or `"assets/images#countries_latam"`.
    pub path: String,
    pub targeting: AssetsDirectoryTargeting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetsConfig {
    pub directories: Vec<TargetedAssetsDirectory>,
}

impl AssetsConfig {
    pub fn directory(&self, path: &str) -> Option<&TargetedAssetsDirectory> {
        self.directories.iter().find(|d| d.path == path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeDirectoryTargeting {
    pub abi: Abi,
}

/// Maps each `lib/<abi>` directory the module declares to its targeting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeLibrariesConfig {
    pub directories: IndexMap<String, NativeDirectoryTargeting>,
}

impl NativeLibrariesConfig {
    pub fn abis(&self) -> BTreeSet<Abi> {
        self.directories.values().map(|d| d.abi).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApexImageTargeting {
    pub abis: BTreeSet<Abi>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApexImageFile {
    pub path: String,
    pub targeting: ApexImageTargeting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApexImagesConfig {
    pub images: Vec<ApexImageFile>,
}

/// An immutable view of one module's files and configuration.
#[derive(Debug, Clone)]
pub struct BundleModule {
    pub name: ModuleName,
    pub kind: ModuleKind,
    pub entries: Vec<ModuleEntry>,
    pub manifest: AndroidManifest,
    pub resource_table: Option<ResourceTable>,
    pub assets_config: Option<AssetsConfig>,
    pub native_config: Option<NativeLibrariesConfig>,
    pub apex_config: Option<ApexImagesConfig>,
}

impl BundleModule {
    pub fn new(name: impl Into<String>, kind: ModuleKind, manifest: AndroidManifest) -> Self {
        Self {
            name: ModuleName::new(name),
            kind,
            entries: Vec::new(),
            manifest,
            resource_table: None,
            assets_config: None,
            native_config: None,
            apex_config: None,
        }
    }

    pub fn with_entries(mut self, entries: Vec<ModuleEntry>) -> Self {
        self.entries = entries;
        self
    }

    pub fn is_base(&self) -> bool {
        matches!(self.kind, ModuleKind::Base)
    }

    pub fn is_asset_only(&self) -> bool {
        matches!(self.kind, ModuleKind::AssetOnly)
    }

    pub fn entries_under<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a ModuleEntry> + 'a {
        self.entries.iter().filter(move |e| e.path.starts_with(prefix))
    }

    pub fn dex_entries(&self) -> impl Iterator<Item = &ModuleEntry> {
        self.entries_under("dex/")
    }

    pub fn has_native_libs(&self) -> bool {
        self.entries.iter().any(|e| e.path.starts_with("lib/"))
    }

    pub fn has_dex(&self) -> bool {
        self.entries.iter().any(|e| e.path.starts_with("dex/"))
    }
}
