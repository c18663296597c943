//! Texture compression format splitter (§4.2): `assets/*#tcf_<fmt>`
//! directories alternate only within their own family — the siblings that
//! share a base path — since two unrelated texture sets aren't substitutes
//! for each other.

use std::collections::{BTreeMap, BTreeSet};

use shardkit_core::{Result, SuffixStrippingConfig};
use shardkit_model::ModuleSplit;
use shardkit_targeting::{ApkTargeting, Dimension, Targeting, TextureCompressionFormat};

use crate::path_targeting::parse_targeted_segment;

use super::{config_split_from, partition_entries_by, strip_suffixes, DimensionSplitter};

#[derive(Default)]
pub struct TextureCompressionFormatSplitter {
    pub suffix_stripping: SuffixStrippingConfig,
}

impl TextureCompressionFormatSplitter {
    pub fn new(suffix_stripping: SuffixStrippingConfig) -> Self {
        Self { suffix_stripping }
    }
}

impl DimensionSplitter for TextureCompressionFormatSplitter {
    fn split(&self, mut split: ModuleSplit) -> Result<Vec<ModuleSplit>> {
        split.apk_targeting.require_agnostic_on(Dimension::TextureCompressionFormat)?;

        let entries = std::mem::take(&mut split.entries);
        let (agnostic, grouped) = partition_entries_by(entries, |e| {
            let seg = parse_targeted_segment(e.path.as_str())?;
            (seg.key == "tcf").then(|| (seg.base_path, TextureCompressionFormat::from_alias(&seg.value)))
        });

        if grouped.is_empty() {
            split.entries = agnostic;
            return Ok(vec![split]);
        }

        // Family (base_path) -> every TCF value present among its siblings.
        let mut families: BTreeMap<String, BTreeSet<TextureCompressionFormat>> = BTreeMap::new();
        for (base_path, tcf) in grouped.keys() {
            families.entry(base_path.clone()).or_default().insert(tcf.clone());
        }

        split.entries = agnostic;
        let mut outputs = vec![split.clone()];

        for ((base_path, tcf), entries) in grouped {
            let entries = strip_suffixes(entries, &self.suffix_stripping);
            let mut config_split = config_split_from(&split, entries);
            let values: BTreeSet<TextureCompressionFormat> = [tcf].into_iter().collect();
            let family = &families[&base_path];
            let alternatives = Targeting::alternatives_for(&values, family);
            config_split.apk_targeting = ApkTargeting::with_tcf(values, alternatives);
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
    fn alternatives_stay_within_family() {
        let module = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example")).with_entries(
            vec![
                entry("assets/tex#tcf_astc/a.ktx"),
                entry("assets/tex#tcf_etc1_rgb8/a.ktx"),
                entry("assets/other#tcf_astc/b.ktx"),
            ],
        );
        let split = ModuleSplit::for_module(&module, VariantTargeting::default());
        let outputs = TextureCompressionFormatSplitter::default().split(split).unwrap();
        assert_eq!(outputs.len(), 4);
        let tex_astc = outputs
            .iter()
            .find(|s| s.entries.first().map(|e| e.path.as_str()) == Some("assets/tex#tcf_astc/a.ktx"))
            .unwrap();
        assert_eq!(tex_astc.apk_targeting.texture_compression_format.as_ref().unwrap().alternatives.len(), 1);
        let other_astc = outputs
            .iter()
            .find(|s| s.entries.first().map(|e| e.path.as_str()) == Some("assets/other#tcf_astc/b.ktx"))
            .unwrap();
        assert!(other_astc.apk_targeting.texture_compression_format.as_ref().unwrap().alternatives.is_empty());
    }

    #[test]
    fn suffix_stripping_drops_the_tcf_suffix_from_output_paths() {
        let module = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example"))
            .with_entries(vec![entry("assets/tex#tcf_astc/a.ktx")]);
        let split = ModuleSplit::for_module(&module, VariantTargeting::default());
        let splitter = TextureCompressionFormatSplitter::new(SuffixStrippingConfig { enabled: true, default_suffix: None });
        let outputs = splitter.split(split).unwrap();
        let config = &outputs[1];
        assert_eq!(config.entries[0].path.as_str(), "assets/tex/a.ktx");
    }
}
