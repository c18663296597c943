//! Variant generators (§4.6): each contributes an SDK cutoff at which a
//! module-wide optimization (uncompressed native libs, uncompressed dex,
//! sparse resource table encoding) kicks in. `generate_variants` merges
//! every applicable generator's cutoff into one set of non-overlapping
//! `min_sdk` variants.

use std::collections::BTreeSet;

use shardkit_core::ApkGenerationConfiguration;
use shardkit_targeting::{sdk, VariantTargeting};

pub trait VariantGenerator {
    fn applicable(&self, generation_config: &ApkGenerationConfiguration) -> bool;
    fn sdk_cutoff(&self, generation_config: &ApkGenerationConfiguration) -> u32;
}

/// Splits off an uncompressed-native-libs variant. Ordinarily cuts at M
/// (`extractNativeLibs=false` support); an app requesting installation on
/// external storage needs the P-era loader instead.
pub struct NativeLibsCompressionVariantGenerator;

impl VariantGenerator for NativeLibsCompressionVariantGenerator {
    fn applicable(&self, generation_config: &ApkGenerationConfiguration) -> bool {
        generation_config.enable_uncompressed_native_libs
    }

    fn sdk_cutoff(&self, generation_config: &ApkGenerationConfiguration) -> u32 {
        if generation_config.installable_on_external_storage {
            sdk::P
        } else {
            sdk::M
        }
    }
}

/// Splits off an uncompressed-dex variant at P.
pub struct DexCompressionVariantGenerator;

impl VariantGenerator for DexCompressionVariantGenerator {
    fn applicable(&self, generation_config: &ApkGenerationConfiguration) -> bool {
        generation_config.enable_dex_compression_split
    }

    fn sdk_cutoff(&self, _generation_config: &ApkGenerationConfiguration) -> u32 {
        sdk::P
    }
}

/// Splits off a sparse resource table encoding variant at S_V2.
pub struct SparseEncodingVariantGenerator;

impl VariantGenerator for SparseEncodingVariantGenerator {
    fn applicable(&self, generation_config: &ApkGenerationConfiguration) -> bool {
        generation_config.enable_sparse_encoding
    }

    fn sdk_cutoff(&self, _generation_config: &ApkGenerationConfiguration) -> u32 {
        sdk::S_V2
    }
}

/// The full set of generators the orchestrator consults, in the order
/// their cutoffs stack.
pub fn default_generators() -> Vec<Box<dyn VariantGenerator>> {
    vec![
        Box::new(NativeLibsCompressionVariantGenerator),
        Box::new(DexCompressionVariantGenerator),
        Box::new(SparseEncodingVariantGenerator),
    ]
}

/// Merge every applicable generator's cutoff with `base`'s own min-SDK into
/// a sorted set of non-overlapping `min_sdk` variants.
pub fn generate_variants(
    base: &VariantTargeting,
    generators: &[Box<dyn VariantGenerator>],
    generation_config: &ApkGenerationConfiguration,
) -> Vec<VariantTargeting> {
    let mut breakpoints: BTreeSet<u32> = BTreeSet::new();
    breakpoints.insert(base.min_sdk_value());
    for generator in generators {
        if generator.applicable(generation_config) {
            let cutoff = generator.sdk_cutoff(generation_config);
            if cutoff > base.min_sdk_value() {
                breakpoints.insert(cutoff);
            }
        }
    }

    breakpoints
        .into_iter()
        .map(|sdk_value| {
            let mut variant = VariantTargeting::with_min_sdk(sdk_value);
            variant.abi = base.abi.clone();
            variant.screen_density = base.screen_density.clone();
            variant.sdk_runtime = base.sdk_runtime.clone();
            variant
        })
        .collect()
}
