//! Top-level facade: `generate_apks` wires the module splitter and bundle
//! sharder together the way an orchestrator (bundletool's `BuildApksCommand`
//! equivalent) would (§2, §6).

use shardkit_core::{AppBundle, ApkGenerationConfiguration, DeviceSpec, GeneratedApks, Result};
use shardkit_model::SplitType;
use shardkit_module_splitter::ModuleSplitter;
use shardkit_sharder::BundleSharder;
use shardkit_variants::populate_alternatives;

/// Generate every APK artifact this bundle produces under `generation_config`.
///
/// Non-APEX, non-asset-only modules go through `ModuleSplitter`; every
/// module goes through `BundleSharder` to produce the fat standalone
/// fallback. `device_spec`, when given, narrows the standalone output (and
/// relabels it `SplitType::System`) to the single matching configuration.
pub fn generate_apks(
    bundle: &AppBundle,
    generation_config: ApkGenerationConfiguration,
    device_spec: Option<&DeviceSpec>,
) -> Result<GeneratedApks> {
    bundle.validate()?;

    let mut generated = GeneratedApks::default();

    let splitter = ModuleSplitter::new(&bundle.config, generation_config.clone());
    for module in &bundle.modules {
        let splits = splitter.split_module(module)?;
        if generation_config.for_instant_app {
            generated.instant_apks.extend(splits.into_iter().map(|mut s| {
                s.split_type = SplitType::Instant;
                s
            }));
        } else {
            generated.split_apks.extend(splits);
        }
    }

    let sharder = BundleSharder::new(generation_config);
    let non_apex_modules: Vec<_> = bundle.modules.iter().filter(|m| m.apex_config.is_none()).cloned().collect();
    match device_spec {
        Some(spec) => {
            generated.system_apks = sharder.shard_for_system_image(&non_apex_modules, spec)?;
        }
        None => {
            generated.standalone_apks = sharder.shard(&non_apex_modules, None)?;
        }
    }

    // §4.7: alternatives are computed once across the assembled split and
    // standalone output, excluding instant, system and archived variants,
    // which each pass through (or form their own independent pool) untouched.
    let targetings = generated
        .split_apks
        .iter()
        .chain(generated.standalone_apks.iter())
        .map(|s| s.variant_targeting.clone())
        .collect::<Vec<_>>();
    if !targetings.is_empty() {
        let populated = populate_alternatives(targetings)?;
        for (split, targeting) in generated.split_apks.iter_mut().chain(generated.standalone_apks.iter_mut()).zip(populated) {
            split.variant_targeting = targeting;
        }
    }

    Ok(generated)
}
