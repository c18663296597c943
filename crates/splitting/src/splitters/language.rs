//! Language splitter (§4.2): groups `assets/*#lang_<tag>` directories and
//! locale-qualified resources by language, with module-global alternatives —
//! a device that declines `fr` should fall back across every other language
//! the module ships, not just the siblings of one asset directory. A default
//! (untagged) assets directory that declares `alternativeLanguageTargeting`
//! gets its own assets-only rest-of-world split.

use std::collections::{BTreeMap, BTreeSet};

use shardkit_core::Result;
use shardkit_model::ModuleSplit;
use shardkit_targeting::{ApkTargeting, Dimension, Language, Targeting};

use crate::path_targeting::parse_targeted_segment;

use super::{config_split_from, parent_dir, partition_entries_by, DimensionSplitter};

pub struct LanguageSplitter;

impl DimensionSplitter for LanguageSplitter {
    fn split(&self, mut split: ModuleSplit) -> Result<Vec<ModuleSplit>> {
        split.apk_targeting.require_agnostic_on(Dimension::Language)?;

        let mut path_to_language: BTreeMap<String, Language> = BTreeMap::new();
        if let Some(table) = &split.resource_table {
            for entry in &table.entries {
                for config in &entry.configs {
                    if let Some(language) = &config.language {
                        path_to_language.insert(config.path.as_str().to_string(), language.clone());
                    }
                }
            }
        }

        let entries = std::mem::take(&mut split.entries);
        let (mut agnostic, grouped) = partition_entries_by(entries, |e| {
            if let Some(seg) = parse_targeted_segment(e.path.as_str()) {
                if seg.key == "lang" {
                    return Some(Language::new(seg.value));
                }
            }
            path_to_language.get(e.path.as_str()).cloned()
        });

        if grouped.is_empty() {
            split.entries = agnostic;
            return Ok(vec![split]);
        }

        let declared: BTreeSet<Language> = grouped.keys().cloned().collect();

        let declared_alternatives = split.assets_config.as_ref().and_then(|config| {
            config
                .directories
                .iter()
                .find_map(|dir| dir.targeting.alternative_language_targeting.as_ref().map(|alts| (dir.path.clone(), alts.clone())))
        });

        let rest_of_world = match declared_alternatives {
            Some((dir_path, declared)) => {
                let (matching, remaining): (Vec<_>, Vec<_>) =
                    agnostic.into_iter().partition(|e| parent_dir(e.path.as_str()) == Some(dir_path.as_str()));
                agnostic = remaining;
                (!matching.is_empty()).then_some((matching, declared))
            }
            None => None,
        };

        split.entries = agnostic;
        let mut outputs = vec![split.clone()];

        for (language, entries) in grouped {
            let mut config_split = config_split_from(&split, entries);
            let values: BTreeSet<Language> = [language].into_iter().collect();
            let alternatives = Targeting::alternatives_for(&values, &declared);
            config_split.apk_targeting = ApkTargeting::with_language(values, alternatives);
            outputs.push(config_split);
        }

        if let Some((entries, declared_alts)) = rest_of_world {
            let mut config_split = config_split_from(&split, entries);
            config_split.apk_targeting = ApkTargeting::with_language(BTreeSet::new(), declared_alts);
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
        AssetsConfig, AssetsDirectoryTargeting, BundleModule, ContentHandle, ModuleEntry, ModuleKind, ModuleName,
        ResourceConfigValue, ResourceEntry, ResourceId, ResourceTable, TargetedAssetsDirectory,
    };
    use shardkit_targeting::VariantTargeting;

    fn entry(path: &str) -> ModuleEntry {
        ModuleEntry::new(path, ContentHandle::from_bytes(b"x".to_vec()), ModuleName::new("base"))
    }

    #[test]
    fn splits_by_language_directory() {
        let module = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example")).with_entries(
            vec![
                entry("assets/strings#lang_fr/a.txt"),
                entry("assets/strings#lang_de/a.txt"),
                entry("assets/common/a.txt"),
            ],
        );
        let split = ModuleSplit::for_module(&module, VariantTargeting::default());
        let outputs = LanguageSplitter.split(split).unwrap();
        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[0].entries.len(), 1);
        for config in &outputs[1..] {
            assert_eq!(config.apk_targeting.language.as_ref().unwrap().alternatives.len(), 1);
        }
    }

    #[test]
    fn resource_entries_group_by_declared_language_alongside_assets() {
        let mut module = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example")).with_entries(
            vec![entry("res/values-fr/strings.xml"), entry("res/values/strings.xml")],
        );
        module.resource_table = Some(ResourceTable {
            entries: vec![ResourceEntry {
                id: ResourceId(1),
                name: "app_name".to_string(),
                configs: vec![
                    ResourceConfigValue {
                        density: None,
                        language: Some(Language::new("fr")),
                        path: shardkit_model::EntryPath::new("res/values-fr/strings.xml"),
                    },
                    ResourceConfigValue {
                        density: None,
                        language: None,
                        path: shardkit_model::EntryPath::new("res/values/strings.xml"),
                    },
                ],
            }],
        });
        let split = ModuleSplit::for_module(&module, VariantTargeting::default());
        let outputs = LanguageSplitter.split(split).unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].entries.len(), 1);
        assert_eq!(outputs[0].entries[0].path.as_str(), "res/values/strings.xml");
        let fr = outputs.iter().find(|s| s.apk_targeting.language.as_ref().unwrap().values.contains(&Language::new("fr"))).unwrap();
        assert_eq!(fr.entries[0].path.as_str(), "res/values-fr/strings.xml");
    }

    #[test]
    fn default_directory_with_declared_alternatives_gets_its_own_rest_of_world_split() {
        let mut module = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example")).with_entries(
            vec![entry("assets/strings#lang_fr/a.txt"), entry("assets/strings/a.txt")],
        );
        module.assets_config = Some(AssetsConfig {
            directories: vec![TargetedAssetsDirectory {
                path: "assets/strings".to_string(),
                targeting: AssetsDirectoryTargeting {
                    alternative_language_targeting: Some([Language::new("de")].into_iter().collect()),
                    alternative_country_set_targeting: None,
                },
            }],
        });
        let split = ModuleSplit::for_module(&module, VariantTargeting::default());
        let outputs = LanguageSplitter.split(split).unwrap();
        assert_eq!(outputs.len(), 3);
        assert!(outputs[0].entries.is_empty());
        let rest_of_world =
            outputs.iter().find(|s| s.apk_targeting.language.as_ref().map(|t| t.values.is_empty()).unwrap_or(false)).unwrap();
        assert_eq!(rest_of_world.entries.len(), 1);
        assert_eq!(rest_of_world.entries[0].path.as_str(), "assets/strings/a.txt");
    }
}
