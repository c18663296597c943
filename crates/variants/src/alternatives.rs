//! `AlternativeVariantTargetingPopulator` (§4.7): once every `VariantTargeting`
//! for a module has been generated, each one's `alternatives` set must name
//! every other value that appeared anywhere in the family, so a device can
//! recognize which variant it didn't get and why.

use std::collections::BTreeSet;

use shardkit_core::{BundleError, IllegalArgumentError, Result};
use shardkit_targeting::{Targeting, VariantDimension, VariantTargeting};

pub fn populate_alternatives(mut variants: Vec<VariantTargeting>) -> Result<Vec<VariantTargeting>> {
    populate_dim(
        &mut variants,
        VariantDimension::MinSdk,
        |v| v.min_sdk.as_ref(),
        |v| &mut v.min_sdk,
    )?;
    populate_dim(&mut variants, VariantDimension::Abi, |v| v.abi.as_ref(), |v| &mut v.abi)?;
    populate_dim(
        &mut variants,
        VariantDimension::ScreenDensity,
        |v| v.screen_density.as_ref(),
        |v| &mut v.screen_density,
    )?;
    populate_dim(
        &mut variants,
        VariantDimension::SdkRuntime,
        |v| v.sdk_runtime.as_ref(),
        |v| &mut v.sdk_runtime,
    )?;
    Ok(variants)
}

fn populate_dim<V: Ord + Clone>(
    variants: &mut [VariantTargeting],
    dim: VariantDimension,
    getter: impl Fn(&VariantTargeting) -> Option<&Targeting<V>>,
    setter: impl Fn(&mut VariantTargeting) -> &mut Option<Targeting<V>>,
) -> Result<()> {
    let targeted_count = variants.iter().filter(|v| getter(v).is_some()).count();
    if targeted_count == 0 {
        return Ok(());
    }
    if targeted_count != variants.len() {
        return Err(BundleError::IllegalArgument(IllegalArgumentError::MixedDimensionAgnosticism(
            dim.name().to_string(),
        )));
    }

    let universe: BTreeSet<V> = variants
        .iter()
        .filter_map(|v| getter(v).map(|t| t.values.iter().cloned()))
        .flatten()
        .collect();

    for variant in variants.iter_mut() {
        let own_values = getter(variant).map(|t| t.values.clone()).unwrap_or_default();
        let alternatives = Targeting::alternatives_for(&own_values, &universe);
        if let Some(slot) = setter(variant).as_mut() {
            slot.alternatives = alternatives;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardkit_targeting::sdk;

    #[test]
    fn three_densities_receive_full_alternative_sets() {
        let variants = vec![
            VariantTargeting::with_min_sdk(sdk::L),
            VariantTargeting::with_min_sdk(sdk::M),
            VariantTargeting::with_min_sdk(sdk::P),
        ];
        let populated = populate_alternatives(variants).unwrap();
        for variant in &populated {
            let min_sdk = variant.min_sdk.as_ref().unwrap();
            assert_eq!(min_sdk.alternatives.len(), 2);
        }
    }

    #[test]
    fn all_agnostic_stays_agnostic() {
        let variants = vec![VariantTargeting::default(), VariantTargeting::default()];
        let populated = populate_alternatives(variants).unwrap();
        assert!(populated.iter().all(|v| v.is_default()));
    }

    #[test]
    fn mixed_agnosticism_is_rejected() {
        let variants = vec![VariantTargeting::with_min_sdk(sdk::L), VariantTargeting::default()];
        assert!(populate_alternatives(variants).is_err());
    }
}
