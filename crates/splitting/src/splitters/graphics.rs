//! Graphics API (OpenGL ES) splitter (§4.2): `assets/*#opengl_<major.minor>`
//! directories, alternatives scoped per family like texture compression
//! format.

use std::collections::{BTreeMap, BTreeSet};

use shardkit_core::Result;
use shardkit_model::ModuleSplit;
use shardkit_targeting::{ApkTargeting, Dimension, OpenGlVersion, Targeting};

use crate::path_targeting::parse_targeted_segment;

use super::{config_split_from, partition_entries_by, DimensionSplitter};

fn parse_version(s: &str) -> Option<OpenGlVersion> {
    let (major, minor) = s.split_once('.')?;
    Some(OpenGlVersion::new(major.parse().ok()?, minor.parse().ok()?))
}

pub struct GraphicsApiSplitter;

impl DimensionSplitter for GraphicsApiSplitter {
    fn split(&self, mut split: ModuleSplit) -> Result<Vec<ModuleSplit>> {
        split.apk_targeting.require_agnostic_on(Dimension::OpenGl)?;

        let entries = std::mem::take(&mut split.entries);
        let (agnostic, grouped) = partition_entries_by(entries, |e| {
            let seg = parse_targeted_segment(e.path.as_str())?;
            (seg.key == "opengl").then(|| parse_version(&seg.value)).flatten().map(|v| (seg.base_path, v))
        });

        if grouped.is_empty() {
            split.entries = agnostic;
            return Ok(vec![split]);
        }

        let mut families: BTreeMap<String, BTreeSet<OpenGlVersion>> = BTreeMap::new();
        for (base_path, version) in grouped.keys() {
            families.entry(base_path.clone()).or_default().insert(*version);
        }

        split.entries = agnostic;
        let mut outputs = vec![split.clone()];

        for ((base_path, version), entries) in grouped {
            let mut config_split = config_split_from(&split, entries);
            let values: BTreeSet<OpenGlVersion> = [version].into_iter().collect();
            let family = &families[&base_path];
            let alternatives = Targeting::alternatives_for(&values, family);
            config_split.apk_targeting = ApkTargeting::with_opengl(values, alternatives);
            outputs.push(config_split);
        }

        Ok(outputs)
    }
}
