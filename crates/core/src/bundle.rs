//! `AppBundle`: the in-memory aggregate the split generation core consumes
//! (§6 Input). Parsing a `.aab` archive into this shape is the out-of-scope
//! external collaborator named in §1; everything downstream of it is ours.

use shardkit_model::BundleModule;

use crate::config::{is_resource_pinned_to_master, BundleConfig};
use crate::error::{BundleError, InvalidBundleError, Result};

#[derive(Debug, Clone)]
pub struct AppBundle {
    pub modules: Vec<BundleModule>,
    pub config: BundleConfig,
}

impl AppBundle {
    pub fn new(modules: Vec<BundleModule>, config: BundleConfig) -> Self {
        Self { modules, config }
    }

    pub fn base_module(&self) -> Option<&BundleModule> {
        self.modules.iter().find(|m| m.is_base())
    }

    pub fn feature_modules(&self) -> impl Iterator<Item = &BundleModule> {
        self.modules.iter().filter(|m| !m.is_base() && !m.is_asset_only())
    }

    pub fn asset_only_modules(&self) -> impl Iterator<Item = &BundleModule> {
        self.modules.iter().filter(|m| m.is_asset_only())
    }

    pub fn apex_modules(&self) -> impl Iterator<Item = &BundleModule> {
        self.modules.iter().filter(|m| m.apex_config.is_some())
    }

    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;

        for resource_id in &self.config.master_resources.resource_ids {
            let defined = self.modules.iter().any(|m| {
                m.resource_table.as_ref().map(|t| t.has_resource_id(*resource_id)).unwrap_or(false)
                    || is_resource_pinned_to_master(&self.config.master_resources, Some(*resource_id), None)
            });
            if !defined {
                return Err(BundleError::InvalidBundle(InvalidBundleError::UndefinedPinnedResource(resource_id.to_string())));
            }
        }
        for resource_name in &self.config.master_resources.resource_names {
            let defined = self.modules.iter().any(|m| m.resource_table.as_ref().map(|t| t.has_resource_name(resource_name)).unwrap_or(false));
            if !defined {
                return Err(BundleError::InvalidBundle(InvalidBundleError::UndefinedPinnedResource(resource_name.clone())));
            }
        }
        Ok(())
    }
}
