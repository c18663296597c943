//! Country-set splitter (§4.2): `assets/*#countries_<set>` directories,
//! with module-global alternatives, plus one rest-of-world split for a
//! default (untagged) directory that declares `alternativeCountrySetTargeting`.

use std::collections::BTreeSet;

use shardkit_core::{Result, SuffixStrippingConfig};
use shardkit_model::ModuleSplit;
use shardkit_targeting::{ApkTargeting, CountrySet, Dimension, Targeting};

use crate::path_targeting::parse_targeted_segment;

use super::{config_split_from, parent_dir, partition_entries_by, strip_suffixes, DimensionSplitter};

#[derive(Default)]
pub struct CountrySetSplitter {
    pub suffix_stripping: SuffixStrippingConfig,
}

impl CountrySetSplitter {
    pub fn new(suffix_stripping: SuffixStrippingConfig) -> Self {
        Self { suffix_stripping }
    }
}

impl DimensionSplitter for CountrySetSplitter {
    fn split(&self, mut split: ModuleSplit) -> Result<Vec<ModuleSplit>> {
        split.apk_targeting.require_agnostic_on(Dimension::CountrySet)?;

        let entries = std::mem::take(&mut split.entries);
        let (mut agnostic, grouped) = partition_entries_by(entries, |e| {
            let seg = parse_targeted_segment(e.path.as_str())?;
            (seg.key == "countries").then(|| CountrySet::new(seg.value))
        });

        if grouped.is_empty() {
            split.entries = agnostic;
            return Ok(vec![split]);
        }

        let present: BTreeSet<CountrySet> = grouped.keys().cloned().collect();

        // A default directory can declare `alternativeCountrySetTargeting`
        // (the bundle author's way of saying "these untagged assets also
        // serve these country sets"); its entries get pulled into their own
        // rest-of-world split rather than staying in the master.
        let declared_alternatives = split.assets_config.as_ref().and_then(|config| {
            config
                .directories
                .iter()
                .find_map(|dir| dir.targeting.alternative_country_set_targeting.as_ref().map(|alts| (dir.path.clone(), alts.clone())))
        });

        let rest_of_world = match declared_alternatives {
            Some((dir_path, declared)) => {
                let (matching, remaining): (Vec<_>, Vec<_>) =
                    agnostic.into_iter().partition(|e| parent_dir(e.path.as_str()) == Some(dir_path.as_str()));
                agnostic = remaining;
                (!matching.is_empty()).then_some((matching, declared))
            }
            None => None,
        };

        split.entries = agnostic;
        let mut outputs = vec![split.clone()];

        for (country_set, entries) in grouped {
            let entries = strip_suffixes(entries, &self.suffix_stripping);
            let mut config_split = config_split_from(&split, entries);
            let values: BTreeSet<CountrySet> = [country_set].into_iter().collect();
            let alternatives = Targeting::alternatives_for(&values, &present);
            config_split.apk_targeting = ApkTargeting::with_country_set(values, alternatives);
            outputs.push(config_split);
        }

        if let Some((entries, declared)) = rest_of_world {
            let mut config_split = config_split_from(&split, entries);
            config_split.apk_targeting = ApkTargeting::with_country_set(BTreeSet::new(), declared);
            outputs.push(config_split);
        }

        Ok(outputs)
    }
}
