//! Deterministic split-id assignment (§4.4 step 8, §9 design note).
//!
//! A master split's id is its module name (empty string for the base
//! module's master). A config split's id appends one suffix per targeted
//! dimension, applied in the bundle's fixed dimension order so two configs
//! that differ only in which dimensions happen to be present never collide
//! on suffix order.

use std::collections::HashSet;

use shardkit_targeting::{ApkTargeting, Dimension};

/// Rest-of-world splits (Language/CountrySet) and their ilk hold
/// `values=∅, alternatives=non-empty` (§4.2) rather than a concrete value to
/// render, so they get a fixed canonical suffix instead of joining an empty
/// value list into `""`.
const REST_OF_WORLD_SUFFIXES: &[(Dimension, &str)] = &[
    (Dimension::Language, "other_lang"),
    (Dimension::TextureCompressionFormat, "other_tcf"),
    (Dimension::DeviceTier, "other_tier"),
    (Dimension::CountrySet, "other_countries"),
];

fn dimension_suffix(targeting: &ApkTargeting, dim: Dimension) -> Option<String> {
    match dim {
        Dimension::Abi => targeting
            .abi
            .as_ref()
            .map(|t| t.values.iter().map(|v| v.as_str().replace('-', "_")).collect::<Vec<_>>().join("_")),
        Dimension::ScreenDensity => targeting.screen_density.as_ref().map(|t| {
            t.values.iter().map(|v| v.as_str().to_string()).collect::<Vec<_>>().join("_")
        }),
        Dimension::Language => targeting.language.as_ref().map(|t| {
            if t.values.is_empty() {
                rest_of_world_suffix(dim)
            } else {
                t.values.iter().map(|v| v.as_str().to_string()).collect::<Vec<_>>().join("_")
            }
        }),
        Dimension::TextureCompressionFormat => targeting.texture_compression_format.as_ref().map(|t| {
            if t.values.is_empty() {
                rest_of_world_suffix(dim)
            } else {
                t.values.iter().map(|v| v.alias().to_string()).collect::<Vec<_>>().join("_")
            }
        }),
        Dimension::DeviceTier => targeting.device_tier.as_ref().map(|t| {
            if t.values.is_empty() {
                rest_of_world_suffix(dim)
            } else {
                format!("tier_{}", t.values.iter().map(|v| v.0.to_string()).collect::<Vec<_>>().join("_"))
            }
        }),
        Dimension::CountrySet => targeting.country_set.as_ref().map(|t| {
            if t.values.is_empty() {
                rest_of_world_suffix(dim)
            } else {
                format!("countries_{}", t.values.iter().map(|v| v.0.clone()).collect::<Vec<_>>().join("_"))
            }
        }),
        Dimension::OpenGl => targeting.opengl.as_ref().map(|t| {
            format!("opengl_{}", t.values.iter().map(|v| v.to_string().replace('.', "_")).collect::<Vec<_>>().join("_"))
        }),
        Dimension::MultiAbi => targeting.multi_abi.as_ref().map(|t| {
            t.values.iter().map(|v| v.as_str().replace('-', "_")).collect::<Vec<_>>().join("_")
        }),
        Dimension::SdkVersion => targeting.sdk_version.as_ref().map(|t| {
            t.values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("_")
        }),
    }
}

fn rest_of_world_suffix(dim: Dimension) -> String {
    REST_OF_WORLD_SUFFIXES
        .iter()
        .find(|(d, _)| *d == dim)
        .map(|(_, suffix)| suffix.to_string())
        .unwrap_or_default()
}

const DIMENSION_ORDER: [Dimension; 9] = [
    Dimension::Abi,
    Dimension::ScreenDensity,
    Dimension::Language,
    Dimension::TextureCompressionFormat,
    Dimension::DeviceTier,
    Dimension::CountrySet,
    Dimension::OpenGl,
    Dimension::MultiAbi,
    Dimension::SdkVersion,
];

fn config_suffix(targeting: &ApkTargeting) -> String {
    DIMENSION_ORDER
        .iter()
        .filter_map(|dim| dimension_suffix(targeting, *dim))
        .collect::<Vec<_>>()
        .join(".")
}

/// Compute the split id for one split within a module, de-duplicating
/// against `used` ids already assigned in this module/variant by appending
/// a numeric disambiguator (this only fires if two directory names collapse
/// to the same canonical suffix, e.g. via suffix stripping).
pub fn assign_split_id(module_name: &str, is_master: bool, targeting: &ApkTargeting, used: &mut HashSet<String>) -> String {
    let base_id = if is_master {
        module_name.to_string()
    } else {
        let suffix = config_suffix(targeting);
        if module_name.is_empty() {
            format!("config.{suffix}")
        } else {
            format!("{module_name}.config.{suffix}")
        }
    };

    let mut candidate = base_id.clone();
    let mut counter = 2;
    while used.contains(&candidate) {
        candidate = format!("{base_id}_{counter}");
        counter += 1;
    }
    used.insert(candidate.clone());
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardkit_targeting::Abi;
    use std::collections::BTreeSet;

    #[test]
    fn master_split_id_is_module_name() {
        let mut used = HashSet::new();
        let id = assign_split_id("feature", true, &ApkTargeting::default(), &mut used);
        assert_eq!(id, "feature");
    }

    #[test]
    fn config_split_id_carries_dimension_suffix() {
        let mut used = HashSet::new();
        let targeting = ApkTargeting::with_abi(BTreeSet::from([Abi::ArmeabiV7a]), BTreeSet::new());
        let id = assign_split_id("base", false, &targeting, &mut used);
        assert_eq!(id, "base.config.armeabi_v7a");
    }

    #[test]
    fn rest_of_world_country_set_gets_the_canonical_suffix() {
        let mut used = HashSet::new();
        let targeting = ApkTargeting::with_country_set(
            BTreeSet::new(),
            BTreeSet::from([shardkit_targeting::CountrySet::new("latam"), shardkit_targeting::CountrySet::new("sea")]),
        );
        let id = assign_split_id("", false, &targeting, &mut used);
        assert_eq!(id, "config.other_countries");
    }

    #[test]
    fn colliding_ids_get_disambiguated() {
        let mut used = HashSet::new();
        let targeting = ApkTargeting::with_device_tier(BTreeSet::from([shardkit_targeting::DeviceTier(1)]), BTreeSet::new());
        let first = assign_split_id("base", false, &targeting, &mut used);
        let second = assign_split_id("base", false, &targeting, &mut used);
        assert_ne!(first, second);
    }
}
