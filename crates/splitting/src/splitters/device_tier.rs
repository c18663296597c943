//! Device tier splitter (§4.2): `assets/*#tier_<n>` directories, with
//! module-global alternatives.

use std::collections::BTreeSet;

use shardkit_core::{Result, SuffixStrippingConfig};
use shardkit_model::ModuleSplit;
use shardkit_targeting::{ApkTargeting, DeviceTier, Dimension, Targeting};

use crate::path_targeting::parse_targeted_segment;

use super::{config_split_from, partition_entries_by, strip_suffixes, DimensionSplitter};

#[derive(Default)]
pub struct DeviceTierSplitter {
    pub suffix_stripping: SuffixStrippingConfig,
}

impl DeviceTierSplitter {
    pub fn new(suffix_stripping: SuffixStrippingConfig) -> Self {
        Self { suffix_stripping }
    }
}

impl DimensionSplitter for DeviceTierSplitter {
    fn split(&self, mut split: ModuleSplit) -> Result<Vec<ModuleSplit>> {
        split.apk_targeting.require_agnostic_on(Dimension::DeviceTier)?;

        let entries = std::mem::take(&mut split.entries);
        let (agnostic, grouped) = partition_entries_by(entries, |e| {
            let seg = parse_targeted_segment(e.path.as_str())?;
            (seg.key == "tier").then(|| seg.value.parse::<u32>().ok()).flatten().map(DeviceTier)
        });

        if grouped.is_empty() {
            split.entries = agnostic;
            return Ok(vec![split]);
        }

        let present: BTreeSet<DeviceTier> = grouped.keys().copied().collect();
        split.entries = agnostic;
        let mut outputs = vec![split.clone()];

        for (tier, entries) in grouped {
            let entries = strip_suffixes(entries, &self.suffix_stripping);
            let mut config_split = config_split_from(&split, entries);
            let values: BTreeSet<DeviceTier> = [tier].into_iter().collect();
            let alternatives = Targeting::alternatives_for(&values, &present);
            config_split.apk_targeting = ApkTargeting::with_device_tier(values, alternatives);
            outputs.push(config_split);
        }

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardkit_manifest::AndroidManifest;
    use shardkit_model::{BundleModule, ContentHandle, ModuleEntry, ModuleKind, ModuleName};
    use shardkit_targeting::VariantTargeting;

    fn entry(path: &str) -> ModuleEntry {
        ModuleEntry::new(path, ContentHandle::from_bytes(b"x".to_vec()), ModuleName::new("base"))
    }

    #[test]
    fn splits_by_tier_with_global_alternatives() {
        let module = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example"))
            .with_entries(vec![entry("assets/tex#tier_0/a"), entry("assets/tex#tier_1/a")]);
        let split = ModuleSplit::for_module(&module, VariantTargeting::default());
        let outputs = DeviceTierSplitter::default().split(split).unwrap();
        assert_eq!(outputs.len(), 3);
        for config in &outputs[1..] {
            assert_eq!(config.apk_targeting.device_tier.as_ref().unwrap().alternatives.len(), 1);
        }
    }

    #[test]
    fn suffix_stripping_drops_the_tier_suffix_from_output_paths() {
        let module = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example"))
            .with_entries(vec![entry("assets/tex#tier_0/a")]);
        let split = ModuleSplit::for_module(&module, VariantTargeting::default());
        let splitter = DeviceTierSplitter::new(SuffixStrippingConfig { enabled: true, default_suffix: None });
        let outputs = splitter.split(split).unwrap();
        assert_eq!(outputs[1].entries[0].path.as_str(), "assets/tex/a");
    }
}
