//! Screen density splitter (§4.2): resolves resource entries against the 7
//! canonical density buckets using Android's best-match rule and emits one
//! config split per bucket a source resolves to, not just the literal
//! densities present in the resource table.

use std::collections::{BTreeMap, BTreeSet};

use shardkit_core::Result;
use shardkit_model::ModuleSplit;
use shardkit_targeting::{resolve_density_buckets, ApkTargeting, Dimension, ScreenDensity, Targeting};

use super::{config_split_from, partition_entries_by, DimensionSplitter};

pub struct ScreenDensitySplitter;

impl DimensionSplitter for ScreenDensitySplitter {
    fn split(&self, mut split: ModuleSplit) -> Result<Vec<ModuleSplit>> {
        split.apk_targeting.require_agnostic_on(Dimension::ScreenDensity)?;

        let Some(table) = split.resource_table.clone() else {
            return Ok(vec![split]);
        };

        let mut path_to_density: BTreeMap<String, ScreenDensity> = BTreeMap::new();
        for entry in &table.entries {
            for config in &entry.configs {
                if let Some(density) = config.density {
                    path_to_density.insert(config.path.as_str().to_string(), density);
                }
            }
        }

        if path_to_density.is_empty() {
            return Ok(vec![split]);
        }

        let available: BTreeSet<ScreenDensity> = path_to_density.values().copied().collect();
        let buckets = resolve_density_buckets(&available);
        let all_buckets: BTreeSet<ScreenDensity> = buckets.keys().copied().collect();

        let entries = std::mem::take(&mut split.entries);
        let (agnostic, by_source) = partition_entries_by(entries, |e| path_to_density.get(e.path.as_str()).copied());

        split.entries = agnostic;
        let mut outputs = vec![split.clone()];

        for (bucket, sources) in &buckets {
            let mut bucket_entries = Vec::new();
            for source in sources {
                if let Some(matching) = by_source.get(source) {
                    bucket_entries.extend(matching.iter().cloned());
                }
            }
            let mut config_split = config_split_from(&split, bucket_entries);
            let values: BTreeSet<ScreenDensity> = [*bucket].into_iter().collect();
            let alternatives = Targeting::alternatives_for(&values, &all_buckets);
            config_split.apk_targeting = ApkTargeting::with_screen_density(values, alternatives);
            outputs.push(config_split);
        }

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardkit_manifest::AndroidManifest;
    use shardkit_model::{
        BundleModule, ContentHandle, ModuleEntry, ModuleKind, ModuleName, ResourceConfigValue, ResourceEntry,
        ResourceId, ResourceTable,
    };
    use shardkit_targeting::VariantTargeting;

    fn entry(path: &str) -> ModuleEntry {
        ModuleEntry::new(path, ContentHandle::from_bytes(b"x".to_vec()), ModuleName::new("base"))
    }

    #[test]
    fn three_densities_present_still_produce_all_seven_buckets() {
        let mut module = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example")).with_entries(
            vec![
                entry("res/drawable-mdpi/icon.png"),
                entry("res/drawable-hdpi/icon.png"),
                entry("res/drawable-xhdpi/icon.png"),
            ],
        );
        module.resource_table = Some(ResourceTable {
            entries: vec![ResourceEntry {
                id: ResourceId(1),
                name: "icon".to_string(),
                configs: vec![
                    ResourceConfigValue {
                        density: Some(ScreenDensity::Mdpi),
                        language: None,
                        path: shardkit_model::EntryPath::new("res/drawable-mdpi/icon.png"),
                    },
                    ResourceConfigValue {
                        density: Some(ScreenDensity::Hdpi),
                        language: None,
                        path: shardkit_model::EntryPath::new("res/drawable-hdpi/icon.png"),
                    },
                    ResourceConfigValue {
                        density: Some(ScreenDensity::Xhdpi),
                        language: None,
                        path: shardkit_model::EntryPath::new("res/drawable-xhdpi/icon.png"),
                    },
                ],
            }],
        });
        let split = ModuleSplit::for_module(&module, VariantTargeting::default());
        let outputs = ScreenDensitySplitter.split(split).unwrap();
        assert_eq!(outputs.len(), 1 + 7);
        assert!(outputs[0].is_master);
        assert!(outputs[0].entries.is_empty());
        for config in &outputs[1..] {
            let density = config.apk_targeting.screen_density.as_ref().unwrap();
            assert_eq!(density.alternatives.len(), 6);
        }
    }

    #[test]
    fn ldpi_and_hdpi_only_still_resolve_every_bucket_and_mdpi_gets_both() {
        let mut module = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example"))
            .with_entries(vec![entry("res/drawable-ldpi/icon.png"), entry("res/drawable-hdpi/icon.png")]);
        module.resource_table = Some(ResourceTable {
            entries: vec![ResourceEntry {
                id: ResourceId(1),
                name: "icon".to_string(),
                configs: vec![
                    ResourceConfigValue {
                        density: Some(ScreenDensity::Ldpi),
                        language: None,
                        path: shardkit_model::EntryPath::new("res/drawable-ldpi/icon.png"),
                    },
                    ResourceConfigValue {
                        density: Some(ScreenDensity::Hdpi),
                        language: None,
                        path: shardkit_model::EntryPath::new("res/drawable-hdpi/icon.png"),
                    },
                ],
            }],
        });
        let split = ModuleSplit::for_module(&module, VariantTargeting::default());
        let outputs = ScreenDensitySplitter.split(split).unwrap();
        assert_eq!(outputs.len(), 1 + 7);

        let mdpi = outputs
            .iter()
            .find(|s| s.apk_targeting.screen_density.as_ref().unwrap().values.contains(&ScreenDensity::Mdpi))
            .unwrap();
        assert_eq!(mdpi.entries.len(), 2);
    }
}
