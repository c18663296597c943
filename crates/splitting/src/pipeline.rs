//! `SplittingPipeline` (§4.3): applies the configured dimension splitters to
//! a single master split in the bundle's fixed dimension order, threading
//! each splitter's master-remainder into the next.

use shardkit_core::{ApkGenerationConfiguration, OptimizationDimensions, Result, SplitDimension, SplitDimensionConfig};
use shardkit_model::ModuleSplit;

use crate::splitters::{
    AbiSplitter, CountrySetSplitter, DeviceTierSplitter, DimensionSplitter, GraphicsApiSplitter, LanguageSplitter,
    ScreenDensitySplitter, TextureCompressionFormatSplitter,
};

pub struct SplittingPipeline {
    dimensions: OptimizationDimensions,
    generation_config: ApkGenerationConfiguration,
}

impl SplittingPipeline {
    pub fn new(dimensions: OptimizationDimensions, generation_config: ApkGenerationConfiguration) -> Self {
        Self { dimensions, generation_config }
    }

    /// Run every configured dimension in fixed order over `split`. Each
    /// stage keeps exactly one master (the previous stage's remainder) and
    /// accumulates that stage's config splits; the final master is always
    /// `outputs[0]`.
    pub fn apply(&self, split: ModuleSplit) -> Result<Vec<ModuleSplit>> {
        let mut masters = vec![split];
        let mut configs = Vec::new();

        for dim_config in self.dimensions.ordered() {
            let mut next_masters = Vec::with_capacity(masters.len());
            for master in masters {
                let mut outputs = self.split_one(dim_config, master)?;
                let new_master = outputs.remove(0);
                configs.extend(outputs);
                next_masters.push(new_master);
            }
            masters = next_masters;
        }

        let mut all = masters;
        all.extend(configs);
        Ok(all)
    }

    fn split_one(&self, dim_config: &SplitDimensionConfig, split: ModuleSplit) -> Result<Vec<ModuleSplit>> {
        match dim_config.dimension {
            SplitDimension::Abi => AbiSplitter::new(self.generation_config.clone()).split(split),
            SplitDimension::ScreenDensity => ScreenDensitySplitter.split(split),
            SplitDimension::Language => LanguageSplitter.split(split),
            SplitDimension::TextureCompressionFormat => {
                TextureCompressionFormatSplitter::new(dim_config.suffix_stripping.clone()).split(split)
            }
            SplitDimension::DeviceTier => DeviceTierSplitter::new(dim_config.suffix_stripping.clone()).split(split),
            SplitDimension::CountrySet => CountrySetSplitter::new(dim_config.suffix_stripping.clone()).split(split),
            SplitDimension::Graphics => GraphicsApiSplitter.split(split),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardkit_core::{SplitDimensionConfig, SuffixStrippingConfig};
    use shardkit_manifest::AndroidManifest;
    use shardkit_model::{BundleModule, ContentHandle, ModuleEntry, ModuleKind, ModuleName};
    use shardkit_targeting::VariantTargeting;

    fn entry(path: &str) -> ModuleEntry {
        ModuleEntry::new(path, ContentHandle::from_bytes(b"x".to_vec()), ModuleName::new("base"))
    }

    #[test]
    fn pipeline_applies_multiple_dimensions_in_order() {
        let module = BundleModule::new("base", ModuleKind::Base, AndroidManifest::new("com.example")).with_entries(
            vec![
                entry("lib/armeabi-v7a/libfoo.so"),
                entry("lib/arm64-v8a/libfoo.so"),
                entry("res/drawable-mdpi/icon.png"),
                entry("dex/classes.dex"),
            ],
        );
        let split = ModuleSplit::for_module(&module, VariantTargeting::default());

        let dimensions = OptimizationDimensions {
            dimensions: vec![SplitDimensionConfig {
                dimension: SplitDimension::Abi,
                suffix_stripping: SuffixStrippingConfig::default(),
            }],
        };
        let pipeline = SplittingPipeline::new(
            dimensions,
            ApkGenerationConfiguration { include_64_bit_libs: true, ..Default::default() },
        );
        let outputs = pipeline.apply(split).unwrap();
        assert_eq!(outputs.len(), 3);
        assert!(outputs[0].is_master);
        assert_eq!(outputs[0].entries.len(), 2);
    }
}
