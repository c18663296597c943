//! Module fusion (§4.5): a standalone APK has no split mechanism to fall
//! back on, so every installable module's entries, resources, and native
//! libraries are merged into one synthetic module before sharding.

use indexmap::IndexMap;

use shardkit_model::{AssetsConfig, BundleModule, ModuleKind, NativeLibrariesConfig, ResourceTable};

pub fn fuse_modules(modules: &[BundleModule]) -> BundleModule {
    let base = modules
        .iter()
        .find(|m| m.is_base())
        .or_else(|| modules.first())
        .expect("sharding requires at least one module");

    let mut fused = BundleModule::new(base.name.0.clone(), ModuleKind::Base, base.manifest.clone());

    let mut entries = Vec::new();
    let mut resource_entries = Vec::new();
    let mut native_directories: IndexMap<String, shardkit_model::NativeDirectoryTargeting> = IndexMap::new();
    let mut asset_directories = Vec::new();

    for module in modules {
        entries.extend(module.entries.iter().cloned());
        if let Some(table) = &module.resource_table {
            resource_entries.extend(table.entries.iter().cloned());
        }
        if let Some(native) = &module.native_config {
            for (dir, targeting) in &native.directories {
                native_directories.insert(dir.clone(), targeting.clone());
            }
        }
        if let Some(assets) = &module.assets_config {
            asset_directories.extend(assets.directories.iter().cloned());
        }
    }

    fused.entries = entries;
    fused.resource_table = (!resource_entries.is_empty()).then_some(ResourceTable { entries: resource_entries });
    fused.native_config = (!native_directories.is_empty()).then_some(NativeLibrariesConfig { directories: native_directories });
    fused.assets_config = (!asset_directories.is_empty()).then_some(AssetsConfig { directories: asset_directories });

    fused
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardkit_manifest::AndroidManifest;
    use shardkit_model::{ContentHandle, ModuleEntry, ModuleName};

    fn entry(path: &str, module: &str) -> ModuleEntry {
        ModuleEntry::new(path, ContentHandle::from_bytes(b"x".to_vec()), ModuleName::new(module))
    }

    #[test]
    fn fusion_concatenates_entries_from_every_module() {
        let base = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example"))
            .with_entries(vec![entry("dex/classes.dex", "base")]);
        let feature = BundleModule::new("feature", ModuleKind::Feature, AndroidManifest::new("com.example"))
            .with_entries(vec![entry("assets/feature.bin", "feature")]);
        let fused = fuse_modules(&[base, feature]);
        assert_eq!(fused.entries.len(), 2);
        assert_eq!(fused.name.0, "base");
    }
}
