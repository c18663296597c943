//! Shared error catalogue, bundle configuration and output types for the
//! Android App Bundle split generation core.

pub mod bundle;
pub mod config;
pub mod error;
pub mod generated_apks;

pub use bundle::AppBundle;
pub use config::{
    is_resource_pinned_to_master, ApkGenerationConfiguration, BundleConfig, CompressionConfig, DeviceSpec,
    MasterResourcesConfig, OptimizationDimensions, RuntimeEnabledSdkConfig, SplitDimension, SplitDimensionConfig,
    SuffixStrippingConfig,
};
pub use error::{
    BundleError, CommandExecutionError, IllegalArgumentError, IllegalStateError, InvalidBundleError, Result,
};
pub use generated_apks::GeneratedApks;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
