//! ABI splitter (§4.2): partitions `lib/<abi>/...` entries into one config
//! split per ABI present, honoring `include_64_bit_libs`.

use shardkit_core::{ApkGenerationConfiguration, CommandExecutionError, Result};
use shardkit_model::ModuleSplit;
use shardkit_targeting::{Abi, ApkTargeting, Dimension, Targeting};

use super::{config_split_from, partition_entries_by, DimensionSplitter};

pub struct AbiSplitter {
    pub generation_config: ApkGenerationConfiguration,
}

impl AbiSplitter {
    pub fn new(generation_config: ApkGenerationConfiguration) -> Self {
        Self { generation_config }
    }

    fn abi_of_path(path: &str) -> Option<Abi> {
        let rest = path.strip_prefix("lib/")?;
        let dir = rest.split('/').next()?;
        Abi::from_str(dir)
    }
}

impl DimensionSplitter for AbiSplitter {
    fn split(&self, mut split: ModuleSplit) -> Result<Vec<ModuleSplit>> {
        split.apk_targeting.require_agnostic_on(Dimension::Abi)?;

        let entries = std::mem::take(&mut split.entries);
        let (agnostic, mut grouped) = partition_entries_by(entries, |e| Self::abi_of_path(e.path.as_str()));

        let had_native_libs = !grouped.is_empty();
        if !self.generation_config.include_64_bit_libs {
            grouped.retain(|abi, _| !abi.is_64_bit());
        }

        if grouped.is_empty() {
            if had_native_libs {
                return Err(CommandExecutionError::NoCompatibleNativeLibs(split.module_name.0.clone()).into());
            }
            split.entries = agnostic;
            return Ok(vec![split]);
        }

        let present: std::collections::BTreeSet<Abi> = grouped.keys().copied().collect();

        split.entries = agnostic;
        let mut outputs = vec![split.clone()];

        for (abi, entries) in grouped {
            let mut config_split = config_split_from(&split, entries);
            let values: std::collections::BTreeSet<Abi> = [abi].into_iter().collect();
            let alternatives = Targeting::alternatives_for(&values, &present);
            config_split.apk_targeting = ApkTargeting::with_abi(values, alternatives);
            outputs.push(config_split);
        }

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardkit_manifest::AndroidManifest;
    use shardkit_model::{ContentHandle, ModuleEntry, ModuleKind, ModuleName};
    use shardkit_targeting::VariantTargeting;

    fn entry(path: &str) -> ModuleEntry {
        ModuleEntry::new(path, ContentHandle::from_bytes(b"x".to_vec()), ModuleName::new("base"))
    }

    fn base_split() -> ModuleSplit {
        let module = shardkit_model::BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example"))
            .with_entries(vec![
                entry("dex/classes.dex"),
                entry("lib/armeabi-v7a/libfoo.so"),
                entry("lib/arm64-v8a/libfoo.so"),
                entry("lib/x86/libfoo.so"),
            ]);
        ModuleSplit::for_module(&module, VariantTargeting::default())
    }

    #[test]
    fn three_abis_produce_three_config_splits_plus_master() {
        let splitter = AbiSplitter::new(ApkGenerationConfiguration {
            include_64_bit_libs: true,
            ..Default::default()
        });
        let outputs = splitter.split(base_split()).unwrap();
        assert_eq!(outputs.len(), 4);
        assert!(outputs[0].is_master);
        assert_eq!(outputs[0].entries.len(), 1);
        for config in &outputs[1..] {
            assert!(!config.is_master);
            assert_eq!(config.entries.len(), 1);
            let abi_targeting = config.apk_targeting.abi.as_ref().unwrap();
            assert_eq!(abi_targeting.values.len(), 1);
            assert_eq!(abi_targeting.alternatives.len(), 2);
        }
    }

    #[test]
    fn excludes_64_bit_libs_when_disabled() {
        let splitter = AbiSplitter::new(ApkGenerationConfiguration::default());
        let outputs = splitter.split(base_split()).unwrap();
        assert_eq!(outputs.len(), 3);
        assert!(outputs[1..]
            .iter()
            .all(|s| !s.apk_targeting.abi.as_ref().unwrap().values.contains(&Abi::Arm64V8a)));
    }
}
