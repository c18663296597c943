//! `BundleSharder` (§4.5): the fat-APK path for pre-L devices (no split
//! APK support) and for device-spec targeted standalone generation.

use std::collections::BTreeSet;

use itertools::iproduct;

use shardkit_core::{ApkGenerationConfiguration, DeviceSpec, Result};
use shardkit_model::{BundleModule, ModuleSplit, SplitType};
use shardkit_targeting::{resolve_density_buckets, Abi, ApkTargeting, ScreenDensity, Targeting, VariantTargeting};

use crate::fuse::fuse_modules;

pub struct BundleSharder {
    pub generation_config: ApkGenerationConfiguration,
}

impl BundleSharder {
    pub fn new(generation_config: ApkGenerationConfiguration) -> Self {
        Self { generation_config }
    }

    /// Shard `modules` into standalone APKs, one per ABI x density
    /// combination present, optionally narrowed to the single combination
    /// matching `device_spec`.
    pub fn shard(&self, modules: &[BundleModule], device_spec: Option<&DeviceSpec>) -> Result<Vec<ModuleSplit>> {
        let fused = fuse_modules(modules);

        let mut abis: BTreeSet<Abi> = fused.native_config.as_ref().map(|c| c.abis()).unwrap_or_default();
        if !self.generation_config.include_64_bit_libs {
            abis.retain(|a| !a.is_64_bit());
        }
        let available_densities = collect_densities(&fused);
        let density_buckets = resolve_density_buckets(&available_densities);
        let densities: BTreeSet<ScreenDensity> = density_buckets.keys().copied().collect();

        let abi_options: Vec<Option<Abi>> = if abis.is_empty() { vec![None] } else { abis.iter().copied().map(Some).collect() };
        let density_options: Vec<Option<ScreenDensity>> =
            if densities.is_empty() { vec![None] } else { densities.iter().copied().map(Some).collect() };

        let mut outputs = Vec::new();
        for (abi, density) in iproduct!(abi_options.iter(), density_options.iter()) {
            // Standalone shards serve pre-L devices that can't install split
            // APKs; minSdk=1 keeps them in the same variant pool as the L+
            // split variants so AlternativeVariantTargetingPopulator (§4.7)
            // can compute alternatives across both.
            let mut split = ModuleSplit::for_module(&fused, VariantTargeting::with_min_sdk(1));
            split.split_type = SplitType::Standalone;

            if let Some(abi) = abi {
                split.entries.retain(|e| {
                    e.path.as_str().strip_prefix("lib/").and_then(|rest| rest.split('/').next()).map(|dir| dir == abi.as_str()).unwrap_or(true)
                });
            }
            if let Some(density) = density {
                let sources = density_buckets.get(density).cloned().unwrap_or_default();
                retain_density(&mut split, &fused, &sources);
            }

            let abi_targeting = abi.map(|a| {
                let values: BTreeSet<Abi> = [a].into_iter().collect();
                Targeting::new(values.clone(), Targeting::alternatives_for(&values, &abis))
            });
            let density_targeting = density.map(|d| {
                let values: BTreeSet<ScreenDensity> = [d].into_iter().collect();
                Targeting::new(values.clone(), Targeting::alternatives_for(&values, &densities))
            });
            split.apk_targeting = ApkTargeting { abi: abi_targeting, screen_density: density_targeting, ..Default::default() };

            if device_spec.map(|spec| spec.matches(&split.apk_targeting)).unwrap_or(true) {
                outputs.push(split);
            }
        }

        Ok(outputs)
    }

    /// The system-image path: like `shard`, but a `DeviceSpec` is mandatory
    /// (a system image always targets one concrete device configuration)
    /// and the result is tagged `SplitType::System`.
    pub fn shard_for_system_image(&self, modules: &[BundleModule], device_spec: &DeviceSpec) -> Result<Vec<ModuleSplit>> {
        let mut outputs = self.shard(modules, Some(device_spec))?;
        for split in &mut outputs {
            split.split_type = SplitType::System;
        }
        Ok(outputs)
    }
}

fn collect_densities(module: &BundleModule) -> BTreeSet<ScreenDensity> {
    let Some(table) = &module.resource_table else { return BTreeSet::new() };
    table
        .entries
        .iter()
        .flat_map(|e| e.configs.iter())
        .filter_map(|c| c.density)
        .collect()
}

/// Keep only the density-qualified resources whose source density is one of
/// `sources` (the best-match result for the bucket this shard targets, see
/// `resolve_density_buckets`), plus every entry that isn't density-qualified
/// at all.
fn retain_density(split: &mut ModuleSplit, module: &BundleModule, sources: &BTreeSet<ScreenDensity>) {
    let Some(table) = &module.resource_table else { return };
    let mut keep_paths: BTreeSet<&str> = BTreeSet::new();
    for entry in &table.entries {
        for config in &entry.configs {
            if config.density.is_none() || config.density.map(|d| sources.contains(&d)).unwrap_or(false) {
                keep_paths.insert(config.path.as_str());
            }
        }
    }
    split.entries.retain(|e| {
        let is_density_resource = table.entries.iter().any(|entry| entry.configs.iter().any(|c| c.path.as_str() == e.path.as_str()));
        !is_density_resource || keep_paths.contains(e.path.as_str())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use shardkit_manifest::AndroidManifest;
    use shardkit_model::{ContentHandle, ModuleEntry, ModuleKind, ModuleName, NativeDirectoryTargeting, NativeLibrariesConfig};

    fn entry(path: &str) -> ModuleEntry {
        ModuleEntry::new(path, ContentHandle::from_bytes(b"x".to_vec()), ModuleName::new("base"))
    }

    #[test]
    fn three_abis_produce_three_standalone_apks() {
        let mut module = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example")).with_entries(
            vec![
                entry("lib/armeabi-v7a/libfoo.so"),
                entry("lib/arm64-v8a/libfoo.so"),
                entry("lib/x86/libfoo.so"),
                entry("dex/classes.dex"),
            ],
        );
        let mut directories = IndexMap::new();
        directories.insert("lib/armeabi-v7a".to_string(), NativeDirectoryTargeting { abi: Abi::ArmeabiV7a });
        directories.insert("lib/arm64-v8a".to_string(), NativeDirectoryTargeting { abi: Abi::Arm64V8a });
        directories.insert("lib/x86".to_string(), NativeDirectoryTargeting { abi: Abi::X86 });
        module.native_config = Some(NativeLibrariesConfig { directories });

        let sharder = BundleSharder::new(ApkGenerationConfiguration { include_64_bit_libs: true, ..Default::default() });
        let outputs = sharder.shard(&[module], None).unwrap();
        assert_eq!(outputs.len(), 3);
        for split in &outputs {
            assert_eq!(split.entries.iter().filter(|e| e.path.as_str().starts_with("lib/")).count(), 1);
            assert!(split.entries.iter().any(|e| e.path.as_str() == "dex/classes.dex"));
        }
    }

    #[test]
    fn device_spec_narrows_to_matching_abi() {
        let mut module = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example"))
            .with_entries(vec![entry("lib/armeabi-v7a/libfoo.so"), entry("lib/x86/libfoo.so")]);
        let mut directories = IndexMap::new();
        directories.insert("lib/armeabi-v7a".to_string(), NativeDirectoryTargeting { abi: Abi::ArmeabiV7a });
        directories.insert("lib/x86".to_string(), NativeDirectoryTargeting { abi: Abi::X86 });
        module.native_config = Some(NativeLibrariesConfig { directories });

        let sharder = BundleSharder::new(ApkGenerationConfiguration::default());
        let spec = DeviceSpec { abis: vec![Abi::X86], ..Default::default() };
        let outputs = sharder.shard(&[module], Some(&spec)).unwrap();
        assert_eq!(outputs.len(), 1);
    }
}
