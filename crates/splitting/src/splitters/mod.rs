//! The §4.2 dimension splitters: each takes one master `ModuleSplit` that is
//! still agnostic on its dimension and returns that split (with the
//! dimension's entries removed) alongside one non-master config split per
//! distinct value found.

pub mod abi;
pub mod apex;
pub mod country_set;
pub mod density;
pub mod device_tier;
pub mod graphics;
pub mod language;
pub mod tcf;

pub use abi::AbiSplitter;
pub use apex::ApexImageSplitter;
pub use country_set::CountrySetSplitter;
pub use density::ScreenDensitySplitter;
pub use device_tier::DeviceTierSplitter;
pub use graphics::GraphicsApiSplitter;
pub use language::LanguageSplitter;
pub use tcf::TextureCompressionFormatSplitter;

use std::collections::BTreeMap;

use shardkit_core::{Result, SuffixStrippingConfig};
use shardkit_model::{ModuleEntry, ModuleSplit};

use crate::path_targeting::strip_suffix;

/// A single dimension splitter (§4.2). Implementors must be agnostic-safe:
/// calling `split` on a split already targeted on this dimension is a
/// contract violation the splitter itself reports via `require_agnostic_on`.
pub trait DimensionSplitter {
    fn split(&self, split: ModuleSplit) -> Result<Vec<ModuleSplit>>;
}

/// Partition `entries` into the subset this dimension leaves untouched
/// (`key_of` returns `None`) and a map from value to the entries carrying
/// that value. `BTreeMap` keeps iteration order deterministic, which the
/// split-id assignment step downstream relies on.
pub(crate) fn partition_entries_by<K: Ord + Clone>(
    entries: Vec<ModuleEntry>,
    mut key_of: impl FnMut(&ModuleEntry) -> Option<K>,
) -> (Vec<ModuleEntry>, BTreeMap<K, Vec<ModuleEntry>>) {
    let mut agnostic = Vec::new();
    let mut grouped: BTreeMap<K, Vec<ModuleEntry>> = BTreeMap::new();
    for entry in entries {
        match key_of(&entry) {
            Some(k) => grouped.entry(k).or_default().push(entry),
            None => agnostic.push(entry),
        }
    }
    (agnostic, grouped)
}

/// The directory portion of an entry path, e.g. `"assets/images"` for
/// `"assets/images/a.png"`. Used to look a plain (untargeted) entry up
/// against its declaring `TargetedAssetsDirectory` by path.
pub(crate) fn parent_dir(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(dir, _)| dir)
}

/// Rewrite each entry's path to drop its `#key_value` suffix when
/// `suffix_stripping.enabled` (§6). Only meaningful for the dimensions
/// `SplitDimension::supports_suffix_stripping` allows.
pub(crate) fn strip_suffixes(entries: Vec<ModuleEntry>, suffix_stripping: &SuffixStrippingConfig) -> Vec<ModuleEntry> {
    if !suffix_stripping.enabled {
        return entries;
    }
    entries
        .into_iter()
        .map(|e| match strip_suffix(e.path.as_str()) {
            Some(stripped) => e.with_path(stripped),
            None => e,
        })
        .collect()
}

/// Clone `master` into a non-master config split carrying just `entries`,
/// tagged with a splits-required mutator for the eventual parent manifest.
pub(crate) fn config_split_from(master: &ModuleSplit, entries: Vec<ModuleEntry>) -> ModuleSplit {
    let mut split = master.clone();
    split.is_master = false;
    split.entries = entries;
    split.manifest = None;
    split.resource_table = None;
    split.assets_config = None;
    split.pending_master_manifest_mutators.clear();
    split.push_splits_required_mutator();
    split
}
