//! `ApkTargeting`: the product of optional per-dimension targetings carried
//! by every `ModuleSplit` (§3, §4.1).

use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::dims::{Abi, CountrySet, DeviceTier, Language, OpenGlVersion, ScreenDensity, SdkVersion, TextureCompressionFormat};
use crate::error::TargetingError;
use crate::targeting::Targeting;

/// Every dimension `ApkTargeting` can carry, named for error messages and
/// for `is_agnostic_on`/splitter preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Abi,
    ScreenDensity,
    Language,
    TextureCompressionFormat,
    DeviceTier,
    CountrySet,
    OpenGl,
    MultiAbi,
    SdkVersion,
}

impl Dimension {
    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Abi => "abi",
            Dimension::ScreenDensity => "screen_density",
            Dimension::Language => "language",
            Dimension::TextureCompressionFormat => "texture_compression_format",
            Dimension::DeviceTier => "device_tier",
            Dimension::CountrySet => "country_set",
            Dimension::OpenGl => "opengl",
            Dimension::MultiAbi => "multi_abi",
            Dimension::SdkVersion => "sdk_version",
        }
    }
}

/// The multi-ABI targeting carried by APEX image splits (§4.2). Unlike the
/// regular `abi` dimension, a single split's `values` here is itself a
/// *set* of ABIs (the image's whole build), and `alternatives` is the union
/// of every other image's ABI set rather than a per-element complement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiAbiTargeting {
    pub values: BTreeSet<Abi>,
    pub alternatives: BTreeSet<Abi>,
}

impl MultiAbiTargeting {
    pub fn new(values: BTreeSet<Abi>, alternatives: BTreeSet<Abi>) -> Self {
        Self { values, alternatives }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.alternatives.is_empty()
    }
}

/// The default targeting (all dimensions absent) denotes "matches
/// everything" and is what every master split carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApkTargeting {
    pub abi: Option<Targeting<Abi>>,
    pub screen_density: Option<Targeting<ScreenDensity>>,
    pub language: Option<Targeting<Language>>,
    pub texture_compression_format: Option<Targeting<TextureCompressionFormat>>,
    pub device_tier: Option<Targeting<DeviceTier>>,
    pub country_set: Option<Targeting<CountrySet>>,
    pub opengl: Option<Targeting<OpenGlVersion>>,
    pub multi_abi: Option<MultiAbiTargeting>,
    pub sdk_version: Option<Targeting<SdkVersion>>,
}

impl ApkTargeting {
    pub fn default_targeting() -> Self {
        Self::default()
    }

    pub fn is_default(&self) -> bool {
        self == &Self::default()
    }

    pub fn is_agnostic_on(&self, dim: Dimension) -> bool {
        match dim {
            Dimension::Abi => self.abi.is_none(),
            Dimension::ScreenDensity => self.screen_density.is_none(),
            Dimension::Language => self.language.is_none(),
            Dimension::TextureCompressionFormat => self.texture_compression_format.is_none(),
            Dimension::DeviceTier => self.device_tier.is_none(),
            Dimension::CountrySet => self.country_set.is_none(),
            Dimension::OpenGl => self.opengl.is_none(),
            Dimension::MultiAbi => self.multi_abi.is_none(),
            Dimension::SdkVersion => self.sdk_version.is_none(),
        }
    }

    /// Require that `dim` is agnostic, per every splitter's precondition.
    pub fn require_agnostic_on(&self, dim: Dimension) -> Result<(), TargetingError> {
        if self.is_agnostic_on(dim) {
            Ok(())
        } else {
            Err(TargetingError::AlreadyTargetedOnDimension(dim.name()))
        }
    }

    /// Dimension-wise merge of two `ApkTargeting`s. Errors if both sides
    /// specify the dimension with differing values.
    pub fn merge(&self, other: &Self) -> Result<Self, TargetingError> {
        Ok(Self {
            abi: merge_dim(Dimension::Abi, &self.abi, &other.abi)?,
            screen_density: merge_dim(Dimension::ScreenDensity, &self.screen_density, &other.screen_density)?,
            language: merge_dim(Dimension::Language, &self.language, &other.language)?,
            texture_compression_format: merge_dim(
                Dimension::TextureCompressionFormat,
                &self.texture_compression_format,
                &other.texture_compression_format,
            )?,
            device_tier: merge_dim(Dimension::DeviceTier, &self.device_tier, &other.device_tier)?,
            country_set: merge_dim(Dimension::CountrySet, &self.country_set, &other.country_set)?,
            opengl: merge_dim(Dimension::OpenGl, &self.opengl, &other.opengl)?,
            multi_abi: merge_multi_abi(&self.multi_abi, &other.multi_abi)?,
            sdk_version: merge_dim(Dimension::SdkVersion, &self.sdk_version, &other.sdk_version)?,
        })
    }

    pub fn with_abi(values: BTreeSet<Abi>, alternatives: BTreeSet<Abi>) -> Self {
        Self {
            abi: Some(Targeting::new(values, alternatives)),
            ..Default::default()
        }
    }

    pub fn with_screen_density(values: BTreeSet<ScreenDensity>, alternatives: BTreeSet<ScreenDensity>) -> Self {
        Self {
            screen_density: Some(Targeting::new(values, alternatives)),
            ..Default::default()
        }
    }

    pub fn with_language(values: BTreeSet<Language>, alternatives: BTreeSet<Language>) -> Self {
        Self {
            language: Some(Targeting::new(values, alternatives)),
            ..Default::default()
        }
    }

    pub fn with_tcf(values: BTreeSet<TextureCompressionFormat>, alternatives: BTreeSet<TextureCompressionFormat>) -> Self {
        Self {
            texture_compression_format: Some(Targeting::new(values, alternatives)),
            ..Default::default()
        }
    }

    pub fn with_device_tier(values: BTreeSet<DeviceTier>, alternatives: BTreeSet<DeviceTier>) -> Self {
        Self {
            device_tier: Some(Targeting::new(values, alternatives)),
            ..Default::default()
        }
    }

    pub fn with_country_set(values: BTreeSet<CountrySet>, alternatives: BTreeSet<CountrySet>) -> Self {
        Self {
            country_set: Some(Targeting::new(values, alternatives)),
            ..Default::default()
        }
    }

    pub fn with_opengl(values: BTreeSet<OpenGlVersion>, alternatives: BTreeSet<OpenGlVersion>) -> Self {
        Self {
            opengl: Some(Targeting::new(values, alternatives)),
            ..Default::default()
        }
    }

    pub fn with_multi_abi(values: BTreeSet<Abi>, alternatives: BTreeSet<Abi>) -> Self {
        Self {
            multi_abi: Some(MultiAbiTargeting::new(values, alternatives)),
            ..Default::default()
        }
    }
}

fn merge_dim<V: Ord + Clone + std::fmt::Debug>(
    dim: Dimension,
    a: &Option<Targeting<V>>,
    b: &Option<Targeting<V>>,
) -> Result<Option<Targeting<V>>, TargetingError> {
    match (a, b) {
        (None, None) => Ok(None),
        (Some(t), None) | (None, Some(t)) => Ok(Some(t.clone())),
        (Some(x), Some(y)) => {
            if x.values == y.values {
                Ok(Some(Targeting::new(
                    x.values.clone(),
                    x.alternatives.union(&y.alternatives).cloned().collect(),
                )))
            } else {
                Err(TargetingError::Conflict {
                    dimension: dim.name(),
                    left: format!("{:?}", x.values),
                    right: format!("{:?}", y.values),
                })
            }
        }
    }
}

fn merge_multi_abi(
    a: &Option<MultiAbiTargeting>,
    b: &Option<MultiAbiTargeting>,
) -> Result<Option<MultiAbiTargeting>, TargetingError> {
    match (a, b) {
        (None, None) => Ok(None),
        (Some(t), None) | (None, Some(t)) => Ok(Some(t.clone())),
        (Some(x), Some(y)) => {
            if x.values == y.values {
                Ok(Some(MultiAbiTargeting::new(
                    x.values.clone(),
                    x.alternatives.union(&y.alternatives).cloned().collect(),
                )))
            } else {
                Err(TargetingError::Conflict {
                    dimension: Dimension::MultiAbi.name(),
                    left: format!("{:?}", x.values),
                    right: format!("{:?}", y.values),
                })
            }
        }
    }
}
