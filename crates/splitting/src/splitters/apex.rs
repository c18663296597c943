//! APEX multi-ABI splitter (§4.2): each APEX image file becomes its own
//! split, targeted on `multi_abi` with `values` being that image's whole ABI
//! set and `alternatives` the union of every other image's ABI set.

use std::collections::BTreeSet;

use shardkit_core::Result;
use shardkit_model::{BundleModule, ModuleSplit};
use shardkit_targeting::{Abi, ApkTargeting, Dimension, VariantTargeting};

pub struct ApexImageSplitter;

impl ApexImageSplitter {
    pub fn split(&self, module: &BundleModule) -> Result<Vec<ModuleSplit>> {
        let Some(apex_config) = &module.apex_config else {
            return Ok(vec![ModuleSplit::for_apex(module, VariantTargeting::default())]);
        };

        let mut outputs = Vec::with_capacity(apex_config.images.len());
        for image in &apex_config.images {
            let others: BTreeSet<Abi> = apex_config
                .images
                .iter()
                .filter(|other| other.path != image.path)
                .flat_map(|other| other.targeting.abis.iter().copied())
                .collect();

            let mut split = ModuleSplit::for_apex(module, VariantTargeting::default());
            split.apk_targeting.require_agnostic_on(Dimension::MultiAbi)?;
            split.entries.retain(|e| e.path.as_str() == image.path);
            split.apk_targeting = ApkTargeting::with_multi_abi(image.targeting.abis.clone(), others);
            outputs.push(split);
        }
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardkit_manifest::AndroidManifest;
    use shardkit_model::{ApexImageFile, ApexImageTargeting, ApexImagesConfig, ContentHandle, ModuleEntry, ModuleKind, ModuleName};

    fn entry(path: &str) -> ModuleEntry {
        ModuleEntry::new(path, ContentHandle::from_bytes(b"x".to_vec()), ModuleName::new("apex"))
    }

    #[test]
    fn six_images_produce_six_multi_abi_splits() {
        let images = vec![
            ("apex/img_arm.img", vec![Abi::ArmeabiV7a]),
            ("apex/img_arm64.img", vec![Abi::Arm64V8a]),
            ("apex/img_x86.img", vec![Abi::X86]),
            ("apex/img_x86_64.img", vec![Abi::X86_64]),
            ("apex/img_arm_x86.img", vec![Abi::ArmeabiV7a, Abi::X86]),
            ("apex/img_arm64_x86_64.img", vec![Abi::Arm64V8a, Abi::X86_64]),
        ];
        let mut module = BundleModule::new("apex_module", ModuleKind::Feature, AndroidManifest::new("com.example"))
            .with_entries(images.iter().map(|(path, _)| entry(path)).collect());
        module.apex_config = Some(ApexImagesConfig {
            images: images
                .iter()
                .map(|(path, abis)| ApexImageFile {
                    path: path.to_string(),
                    targeting: ApexImageTargeting { abis: abis.iter().copied().collect() },
                })
                .collect(),
        });

        let outputs = ApexImageSplitter.split(&module).unwrap();
        assert_eq!(outputs.len(), 6);
        for split in &outputs {
            assert_eq!(split.entries.len(), 1);
            let targeting = split.apk_targeting.multi_abi.as_ref().unwrap();
            assert!(!targeting.alternatives.is_empty());
        }
    }
}
