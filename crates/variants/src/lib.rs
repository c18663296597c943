//! Variant generation (§4.6) and alternative-targeting population (§4.7).

pub mod alternatives;
pub mod generators;

pub use alternatives::populate_alternatives;
pub use generators::{
    default_generators, generate_variants, DexCompressionVariantGenerator, NativeLibsCompressionVariantGenerator,
    SparseEncodingVariantGenerator, VariantGenerator,
};
