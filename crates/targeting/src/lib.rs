//! Targeting value types and algebra.
//!
//! This crate has no notion of bundles, modules, or splits — it is the leaf
//! layer of the split generation core (§2 item 1): immutable value types
//! for each optimization dimension, the generic `values`/`alternatives`
//! targeting pair, and the `ApkTargeting` / `VariantTargeting` composites
//! built from them.

pub mod apk_targeting;
pub mod dims;
pub mod error;
pub mod targeting;
pub mod variant_targeting;

pub use apk_targeting::{ApkTargeting, Dimension, MultiAbiTargeting};
pub use dims::{
    resolve_density_buckets, sdk, Abi, CountrySet, DeviceTier, Language, OpenGlVersion, ScreenDensity, SdkRuntime,
    SdkVersion, TextureCompressionFormat,
};
pub use error::TargetingError;
pub use targeting::Targeting;
pub use variant_targeting::{VariantDimension, VariantTargeting};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn default_targeting_is_agnostic_everywhere() {
        let t = ApkTargeting::default_targeting();
        assert!(t.is_default());
        for dim in [
            Dimension::Abi,
            Dimension::ScreenDensity,
            Dimension::Language,
            Dimension::TextureCompressionFormat,
            Dimension::DeviceTier,
            Dimension::CountrySet,
            Dimension::OpenGl,
            Dimension::MultiAbi,
            Dimension::SdkVersion,
        ] {
            assert!(t.is_agnostic_on(dim));
        }
    }

    #[test]
    fn merge_unions_disjoint_dimensions() {
        let a = ApkTargeting::with_abi(BTreeSet::from([Abi::X86]), BTreeSet::from([Abi::Arm64V8a]));
        let b = ApkTargeting::with_screen_density(BTreeSet::from([ScreenDensity::Hdpi]), BTreeSet::new());
        let merged = a.merge(&b).unwrap();
        assert_eq!(merged.abi, a.abi);
        assert_eq!(merged.screen_density, b.screen_density);
    }

    #[test]
    fn merge_fails_on_conflicting_values() {
        let a = ApkTargeting::with_abi(BTreeSet::from([Abi::X86]), BTreeSet::new());
        let b = ApkTargeting::with_abi(BTreeSet::from([Abi::Arm64V8a]), BTreeSet::new());
        assert!(a.merge(&b).is_err());
    }

    #[test]
    fn merge_unions_alternatives_on_matching_values() {
        let a = ApkTargeting::with_abi(BTreeSet::from([Abi::X86]), BTreeSet::from([Abi::Arm64V8a]));
        let b = ApkTargeting::with_abi(BTreeSet::from([Abi::X86]), BTreeSet::from([Abi::ArmeabiV7a]));
        let merged = a.merge(&b).unwrap().abi.unwrap();
        assert_eq!(merged.values, BTreeSet::from([Abi::X86]));
        assert_eq!(merged.alternatives, BTreeSet::from([Abi::Arm64V8a, Abi::ArmeabiV7a]));
    }

    #[test]
    fn alternatives_for_is_set_difference() {
        let among = BTreeSet::from([Abi::X86, Abi::Arm64V8a, Abi::ArmeabiV7a]);
        let values = BTreeSet::from([Abi::X86]);
        let alts = Targeting::alternatives_for(&values, &among);
        assert_eq!(alts, BTreeSet::from([Abi::Arm64V8a, Abi::ArmeabiV7a]));
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let mut first = BTreeSet::new();
        first.insert(Abi::Arm64V8a);
        first.insert(Abi::X86);
        let mut second = BTreeSet::new();
        second.insert(Abi::X86);
        second.insert(Abi::Arm64V8a);
        assert_eq!(first, second);
    }

    #[test]
    fn multi_abi_targeting_tracks_value_set_and_union_of_alternatives() {
        let values = BTreeSet::from([Abi::X86_64, Abi::X86]);
        let alternatives = BTreeSet::from([Abi::Arm64V8a, Abi::ArmeabiV7a, Abi::Mips]);
        let t = MultiAbiTargeting::new(values.clone(), alternatives.clone());
        assert_eq!(t.values, values);
        assert_eq!(t.alternatives, alternatives);
        assert!(!t.is_empty());
    }
}
