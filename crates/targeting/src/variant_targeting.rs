//! `VariantTargeting`: the product of optional variant-level targetings
//! (§3) that groups a family of splits sharing one variant.

use serde::{Deserialize, Serialize};

use crate::dims::{Abi, ScreenDensity, SdkRuntime, SdkVersion};
use crate::error::TargetingError;
use crate::targeting::Targeting;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantDimension {
    MinSdk,
    Abi,
    ScreenDensity,
    SdkRuntime,
}

impl VariantDimension {
    pub fn name(&self) -> &'static str {
        match self {
            VariantDimension::MinSdk => "min_sdk",
            VariantDimension::Abi => "abi",
            VariantDimension::ScreenDensity => "screen_density",
            VariantDimension::SdkRuntime => "sdk_runtime",
        }
    }
}

/// The empty `VariantTargeting` denotes the default (L+, no ABI/density
/// preference, no SDK runtime requirement) variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantTargeting {
    pub min_sdk: Option<Targeting<SdkVersion>>,
    pub abi: Option<Targeting<Abi>>,
    pub screen_density: Option<Targeting<ScreenDensity>>,
    pub sdk_runtime: Option<Targeting<SdkRuntime>>,
}

impl VariantTargeting {
    pub fn is_default(&self) -> bool {
        self == &Self::default()
    }

    pub fn with_min_sdk(min_sdk: u32) -> Self {
        Self {
            min_sdk: Some(Targeting::values_only([SdkVersion(min_sdk)])),
            ..Default::default()
        }
    }

    pub fn is_agnostic_on(&self, dim: VariantDimension) -> bool {
        match dim {
            VariantDimension::MinSdk => self.min_sdk.is_none(),
            VariantDimension::Abi => self.abi.is_none(),
            VariantDimension::ScreenDensity => self.screen_density.is_none(),
            VariantDimension::SdkRuntime => self.sdk_runtime.is_none(),
        }
    }

    pub fn min_sdk_value(&self) -> u32 {
        self.min_sdk
            .as_ref()
            .and_then(|t| t.values.iter().next().copied())
            .map(|v| v.0)
            .unwrap_or(crate::dims::sdk::L)
    }

    pub fn requires_sdk_runtime(&self) -> bool {
        self.sdk_runtime
            .as_ref()
            .and_then(|t| t.values.iter().next().copied())
            .map(|v| v == SdkRuntime::Required)
            .unwrap_or(false)
    }

    pub fn merge(&self, other: &Self) -> Result<Self, TargetingError> {
        Ok(Self {
            min_sdk: merge_dim(VariantDimension::MinSdk, &self.min_sdk, &other.min_sdk)?,
            abi: merge_dim(VariantDimension::Abi, &self.abi, &other.abi)?,
            screen_density: merge_dim(VariantDimension::ScreenDensity, &self.screen_density, &other.screen_density)?,
            sdk_runtime: merge_dim(VariantDimension::SdkRuntime, &self.sdk_runtime, &other.sdk_runtime)?,
        })
    }
}

fn merge_dim<V: Ord + Clone + std::fmt::Debug>(
    dim: VariantDimension,
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
