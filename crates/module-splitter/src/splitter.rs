//! `ModuleSplitter`: turns one `BundleModule` into the full set of
//! `ModuleSplit`s it produces across every generated variant (§4.4).

use std::collections::HashSet;

use shardkit_core::{
    is_resource_pinned_to_master, ApkGenerationConfiguration, BundleConfig, BundleError, CommandExecutionError,
    MasterResourcesConfig, Result, RuntimeEnabledSdkConfig,
};
use shardkit_manifest::{apply_all, ManifestMutator, UsesSdkLibrary};
use shardkit_model::{BundleModule, ModuleKind, ModuleSplit};
use shardkit_splitting::{ApexImageSplitter, SplittingPipeline};
use shardkit_targeting::{sdk, Abi, VariantTargeting};
use shardkit_variants::{default_generators, generate_variants};

use crate::split_id::assign_split_id;

pub struct ModuleSplitter<'a> {
    pub bundle_config: &'a BundleConfig,
    pub generation_config: ApkGenerationConfiguration,
}

impl<'a> ModuleSplitter<'a> {
    pub fn new(bundle_config: &'a BundleConfig, generation_config: ApkGenerationConfiguration) -> Self {
        Self { bundle_config, generation_config }
    }

    /// Step 1-9: produce every split this module contributes.
    ///
    /// Alternatives across the variant family are NOT populated here:
    /// `AlternativeVariantTargetingPopulator` (§4.7) runs once over the
    /// whole bundle's assembled split and standalone output, not per module.
    pub fn split_module(&self, module: &BundleModule) -> Result<Vec<ModuleSplit>> {
        if module.apex_config.is_some() {
            return ApexImageSplitter.split(module);
        }

        if let Some(max_sdk) = module.manifest.max_sdk {
            if max_sdk < sdk::L {
                return Err(BundleError::CommandExecution(CommandExecutionError::TargetsPreL(module.name.to_string())));
            }
        }

        // Step 2: generate the variant family this module spreads across.
        let base_variant = VariantTargeting::default();
        let variants = generate_variants(&base_variant, &default_generators(), &self.generation_config);

        let pipeline = SplittingPipeline::new(self.bundle_config.optimizations.clone(), self.generation_config.clone());

        let mut all_splits = Vec::new();
        for variant_targeting in variants {
            let mut master = match module.kind {
                ModuleKind::AssetOnly => ModuleSplit::for_assets(module, variant_targeting.clone()),
                ModuleKind::Base | ModuleKind::Feature => ModuleSplit::for_module(module, variant_targeting.clone()),
            };
            if module.is_base() {
                inject_placeholder_libs(&mut master, &self.generation_config.abis_for_placeholder_libs);
            }

            apply_compression_mutators(&mut master, &variant_targeting, &self.generation_config);
            queue_manifest_mutators(&mut master, module, &variant_targeting, &self.generation_config, &self.bundle_config.runtime_enabled_sdks);

            // Steps 4-5: run the configured dimension splitters.
            let mut splits = pipeline.apply(master)?;

            // Step 7: any resource pinned to master reclaims its path out of
            // whichever config split the dimension splitters routed it into.
            restore_pinned_master_resources(&mut splits, module, &self.bundle_config.master_resources);

            // Step 6: fold every pending mutator (the master's own queued
            // ones plus each config split's splits-required mutator) into
            // the final master manifest.
            let mutators: Vec<ManifestMutator> =
                splits.iter().flat_map(|s| s.pending_master_manifest_mutators.clone()).collect();
            if !mutators.is_empty() {
                if let Some(master_manifest) = splits[0].manifest.as_mut() {
                    apply_all(master_manifest, &mutators)?;
                }
            }

            // Step 6b: the sparse resource table encoding breakpoint applies
            // to every split of a variant past its cutoff, not just the
            // master (§4.6).
            if self.generation_config.enable_sparse_encoding && variant_targeting.min_sdk_value() >= sdk::S_V2 {
                for split in &mut splits {
                    split.sparse_encoding = true;
                }
            }

            // Step 8: assign split ids.
            let mut used = HashSet::new();
            for split in &mut splits {
                split.split_id = Some(assign_split_id(module.name.as_str(), split.is_master, &split.apk_targeting, &mut used));
            }

            all_splits.extend(splits);
        }

        Ok(all_splits)
    }
}

/// Step 9: inject `lib/<abi>/libplaceholder.so` entries for ABIs the base
/// module didn't already ship a native directory for, so a fat installer
/// (Play Store pre-L fallback) never sees an ABI gap.
fn inject_placeholder_libs(master: &mut ModuleSplit, abis: &std::collections::BTreeSet<Abi>) {
    use shardkit_model::{ContentHandle, ModuleEntry};

    let existing: std::collections::BTreeSet<Abi> =
        master.entries.iter().filter_map(|e| e.path.as_str().strip_prefix("lib/")).filter_map(|rest| Abi::from_str(rest.split('/').next().unwrap_or(""))).collect();

    for abi in abis.difference(&existing) {
        master.entries.push(ModuleEntry::new(
            format!("lib/{}/libplaceholder.so", abi.as_str()),
            ContentHandle::from_bytes(Vec::new()),
            master.module_name.clone(),
        ));
    }
}

/// Native-libs and dex compression variant generators (§4.6) carved this
/// variant's minSdk breakpoint; mark the entries they cut over as
/// force-uncompressed and flip `extractNativeLibs` on the master manifest.
fn apply_compression_mutators(master: &mut ModuleSplit, variant: &VariantTargeting, generation_config: &ApkGenerationConfiguration) {
    let native_libs_cutoff = if generation_config.installable_on_external_storage { sdk::P } else { sdk::M };
    if generation_config.enable_uncompressed_native_libs && variant.min_sdk_value() >= native_libs_cutoff {
        for entry in master.entries.iter_mut().filter(|e| e.path.starts_with("lib/")) {
            entry.force_uncompressed = true;
        }
        master.pending_master_manifest_mutators.push(ManifestMutator::SetExtractNativeLibs(false));
    }

    if generation_config.enable_dex_compression_split && variant.min_sdk_value() >= sdk::P {
        for entry in master.entries.iter_mut().filter(|e| e.path.starts_with("dex/")) {
            entry.force_uncompressed = true;
        }
    }
}

/// Queue every manifest mutation known up front for this variant's master:
/// the minSdk rewrite, instant-app sandboxing, runtime-enabled-SDK library
/// declarations, and privacy-sandbox attribute stripping (§4.4 step 6, §6).
fn queue_manifest_mutators(
    master: &mut ModuleSplit,
    module: &BundleModule,
    variant: &VariantTargeting,
    generation_config: &ApkGenerationConfiguration,
    runtime_enabled_sdks: &[RuntimeEnabledSdkConfig],
) {
    if master.manifest.is_none() {
        return;
    }

    let min_sdk = module.manifest.effective_min_sdk().max(sdk::L).max(variant.min_sdk_value());
    master.pending_master_manifest_mutators.push(ManifestMutator::SetMinSdk(min_sdk));

    if generation_config.for_instant_app {
        master.pending_master_manifest_mutators.push(ManifestMutator::SetSandboxVersion(2));
    }

    if module.is_base() {
        for sdk_config in runtime_enabled_sdks {
            master.pending_master_manifest_mutators.push(ManifestMutator::AddUsesSdkLibrary(UsesSdkLibrary {
                package_name: sdk_config.package_name.clone(),
                version_major: sdk_config.version_major,
                certificate_digest: sdk_config.certificate_digest.clone(),
            }));
        }
    }

    if !variant.requires_sdk_runtime() {
        master.pending_master_manifest_mutators.push(ManifestMutator::StripPrivacySandboxRequiredAttribute);
    }
}

/// Step 7: a resource pinned to the master split (§6 `master_resources`)
/// must live in the master regardless of which config split the dimension
/// splitters routed its path into.
fn restore_pinned_master_resources(splits: &mut [ModuleSplit], module: &BundleModule, config: &MasterResourcesConfig) {
    let Some(table) = &module.resource_table else { return };
    let pinned_paths: HashSet<String> = table
        .entries
        .iter()
        .filter(|e| is_resource_pinned_to_master(config, Some(e.id.0), Some(e.name.as_str())))
        .flat_map(|e| e.configs.iter().map(|c| c.path.as_str().to_string()))
        .collect();
    if pinned_paths.is_empty() || splits.is_empty() {
        return;
    }

    let mut recovered = Vec::new();
    for split in splits.iter_mut().skip(1) {
        let mut i = 0;
        while i < split.entries.len() {
            if pinned_paths.contains(split.entries[i].path.as_str()) {
                recovered.push(split.entries.remove(i));
            } else {
                i += 1;
            }
        }
    }

    let master = &mut splits[0];
    for entry in recovered {
        if !master.entries.iter().any(|e| e.path.as_str() == entry.path.as_str()) {
            master.entries.push(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardkit_core::{OptimizationDimensions, SplitDimension, SplitDimensionConfig};
    use shardkit_manifest::AndroidManifest;
    use shardkit_model::{ContentHandle, ModuleName};

    fn entry(path: &str) -> shardkit_model::ModuleEntry {
        shardkit_model::ModuleEntry::new(path, ContentHandle::from_bytes(b"x".to_vec()), ModuleName::new("base"))
    }

    #[test]
    fn module_with_no_optimizations_produces_single_master() {
        let module = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example"))
            .with_entries(vec![entry("dex/classes.dex")]);
        let bundle_config = BundleConfig::default();
        let splitter = ModuleSplitter::new(&bundle_config, ApkGenerationConfiguration::default());
        let splits = splitter.split_module(&module).unwrap();
        assert_eq!(splits.len(), 1);
        assert!(splits[0].is_master);
        assert_eq!(splits[0].split_id.as_deref(), Some("base"));
    }

    #[test]
    fn asset_only_module_splits_by_abi_config() {
        let module = BundleModule::new("assets_only", ModuleKind::AssetOnly, AndroidManifest::new("com.example"))
            .with_entries(vec![entry("assets/a")]);
        let mut bundle_config = BundleConfig::default();
        bundle_config.optimizations = OptimizationDimensions {
            dimensions: vec![SplitDimensionConfig::new(SplitDimension::Language)],
        };
        let splitter = ModuleSplitter::new(&bundle_config, ApkGenerationConfiguration::default());
        let splits = splitter.split_module(&module).unwrap();
        assert_eq!(splits.len(), 1);
    }

    #[test]
    fn module_targeting_only_pre_l_devices_is_rejected() {
        let module = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example").with_max_sdk(19))
            .with_entries(vec![entry("dex/classes.dex")]);
        let bundle_config = BundleConfig::default();
        let splitter = ModuleSplitter::new(&bundle_config, ApkGenerationConfiguration::default());
        let err = splitter.split_module(&module).unwrap_err();
        assert_eq!(err, BundleError::CommandExecution(CommandExecutionError::TargetsPreL("base".to_string())));
    }

    #[test]
    fn uncompressed_native_libs_variant_marks_entries_and_flips_manifest_flag() {
        let module = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example"))
            .with_entries(vec![entry("lib/arm64-v8a/libfoo.so"), entry("dex/classes.dex")]);
        let bundle_config = BundleConfig::default();
        let generation_config = ApkGenerationConfiguration { enable_uncompressed_native_libs: true, ..Default::default() };
        let splitter = ModuleSplitter::new(&bundle_config, generation_config);
        let splits = splitter.split_module(&module).unwrap();

        let m_variant = splits.iter().find(|s| s.is_master && s.variant_targeting.min_sdk_value() >= sdk::M).unwrap();
        assert!(m_variant.entries.iter().find(|e| e.path.as_str().starts_with("lib/")).unwrap().force_uncompressed);
        assert_eq!(m_variant.manifest.as_ref().unwrap().extract_native_libs, Some(false));

        let l_variant = splits.iter().find(|s| s.is_master && s.variant_targeting.min_sdk_value() == sdk::L).unwrap();
        assert!(!l_variant.entries.iter().find(|e| e.path.as_str().starts_with("lib/")).unwrap().force_uncompressed);
    }

    #[test]
    fn runtime_enabled_sdk_is_injected_into_base_module_master() {
        let module = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example"))
            .with_entries(vec![entry("dex/classes.dex")]);
        let mut bundle_config = BundleConfig::default();
        bundle_config.runtime_enabled_sdks = vec![RuntimeEnabledSdkConfig {
            package_name: "com.example.sdk".to_string(),
            version_major: 1,
            version_minor: 0,
            build_time_version_patch: 0,
            certificate_digest: "AA:BB".to_string(),
            resources_package_id: 2,
        }];
        let splitter = ModuleSplitter::new(&bundle_config, ApkGenerationConfiguration::default());
        let splits = splitter.split_module(&module).unwrap();
        let master = splits.iter().find(|s| s.is_master).unwrap();
        assert_eq!(master.manifest.as_ref().unwrap().uses_sdk_libraries.len(), 1);
        assert_eq!(master.manifest.as_ref().unwrap().uses_sdk_libraries[0].package_name, "com.example.sdk");
    }

    #[test]
    fn pinned_master_resource_is_recovered_from_a_config_split() {
        use shardkit_core::{OptimizationDimensions, SplitDimension, SplitDimensionConfig};
        use shardkit_model::{ResourceConfigValue, ResourceEntry, ResourceId, ResourceTable};

        let module = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example"))
            .with_entries(vec![entry("res/drawable-hdpi/icon.png"), entry("res/drawable-mdpi/icon.png")]);
        let mut module = module;
        module.resource_table = Some(ResourceTable {
            entries: vec![ResourceEntry {
                id: ResourceId(0x7f010000),
                name: "icon".to_string(),
                configs: vec![
                    ResourceConfigValue {
                        density: Some(shardkit_targeting::ScreenDensity::Hdpi),
                        language: None,
                        path: shardkit_model::EntryPath::new("res/drawable-hdpi/icon.png"),
                    },
                    ResourceConfigValue {
                        density: Some(shardkit_targeting::ScreenDensity::Mdpi),
                        language: None,
                        path: shardkit_model::EntryPath::new("res/drawable-mdpi/icon.png"),
                    },
                ],
            }],
        });

        let mut bundle_config = BundleConfig::default();
        bundle_config.optimizations =
            OptimizationDimensions { dimensions: vec![SplitDimensionConfig::new(SplitDimension::ScreenDensity)] };
        bundle_config.master_resources.resource_ids = vec![0x7f010000];

        let splitter = ModuleSplitter::new(&bundle_config, ApkGenerationConfiguration::default());
        let splits = splitter.split_module(&module).unwrap();
        let master = splits.iter().find(|s| s.is_master).unwrap();
        assert!(master.entries.iter().any(|e| e.path.as_str() == "res/drawable-hdpi/icon.png"));
        assert!(master.entries.iter().any(|e| e.path.as_str() == "res/drawable-mdpi/icon.png"));
        for config in splits.iter().filter(|s| !s.is_master) {
            assert!(config.entries.is_empty());
        }
    }
}
