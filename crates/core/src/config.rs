//! The `BundleConfig` input surface (§6): everything the split generation
//! core reads out of the bundle's build configuration plus the generation
//! options an orchestrator passes to `ModuleSplitter`/`BundleSharder`.

use serde::{Deserialize, Serialize};

use shardkit_targeting::{Abi, ApkTargeting, Dimension};

use crate::error::{BundleError, InvalidBundleError, Result};

/// The optimization dimensions a bundle can request splits for, in the
/// fixed application order (§4.4 step 4: ABI -> ScreenDensity -> Language ->
/// TCF -> DeviceTier -> CountrySet -> Graphics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitDimension {
    Abi,
    ScreenDensity,
    Language,
    TextureCompressionFormat,
    DeviceTier,
    CountrySet,
    Graphics,
}

impl SplitDimension {
    pub fn name(&self) -> &'static str {
        match self {
            SplitDimension::Abi => "ABI",
            SplitDimension::ScreenDensity => "SCREEN_DENSITY",
            SplitDimension::Language => "LANGUAGE",
            SplitDimension::TextureCompressionFormat => "TEXTURE_COMPRESSION_FORMAT",
            SplitDimension::DeviceTier => "DEVICE_TIER",
            SplitDimension::CountrySet => "COUNTRY_SET",
            SplitDimension::Graphics => "GRAPHICS_API",
        }
    }

    pub fn as_apk_targeting_dimension(&self) -> Dimension {
        match self {
            SplitDimension::Abi => Dimension::Abi,
            SplitDimension::ScreenDensity => Dimension::ScreenDensity,
            SplitDimension::Language => Dimension::Language,
            SplitDimension::TextureCompressionFormat => Dimension::TextureCompressionFormat,
            SplitDimension::DeviceTier => Dimension::DeviceTier,
            SplitDimension::CountrySet => Dimension::CountrySet,
            SplitDimension::Graphics => Dimension::OpenGl,
        }
    }

    /// Suffix stripping is only meaningful for dimensions keyed on asset
    /// directories (§6).
    fn supports_suffix_stripping(&self) -> bool {
        matches!(
            self,
            SplitDimension::TextureCompressionFormat | SplitDimension::DeviceTier | SplitDimension::CountrySet
        )
    }

    pub const FIXED_ORDER: [SplitDimension; 7] = [
        SplitDimension::Abi,
        SplitDimension::ScreenDensity,
        SplitDimension::Language,
        SplitDimension::TextureCompressionFormat,
        SplitDimension::DeviceTier,
        SplitDimension::CountrySet,
        SplitDimension::Graphics,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixStrippingConfig {
    pub enabled: bool,
    pub default_suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitDimensionConfig {
    pub dimension: SplitDimension,
    pub suffix_stripping: SuffixStrippingConfig,
}

impl SplitDimensionConfig {
    pub fn new(dimension: SplitDimension) -> Self {
        Self {
            dimension,
            suffix_stripping: SuffixStrippingConfig::default(),
        }
    }

    pub fn with_suffix_stripping(mut self, default_suffix: Option<&str>) -> Self {
        self.suffix_stripping = SuffixStrippingConfig {
            enabled: true,
            default_suffix: default_suffix.map(str::to_string),
        };
        self
    }
}

/// `optimizations.split_dimensions` (§6): the ordered, validated set of
/// dimensions to split on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationDimensions {
    pub dimensions: Vec<SplitDimensionConfig>,
}

impl OptimizationDimensions {
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for cfg in &self.dimensions {
            if !seen.insert(cfg.dimension) {
                return Err(BundleError::InvalidBundle(InvalidBundleError::DuplicateSplitDimension(
                    cfg.dimension.name().to_string(),
                )));
            }
            if cfg.suffix_stripping.enabled && !cfg.dimension.supports_suffix_stripping() {
                return Err(BundleError::InvalidBundle(
                    InvalidBundleError::SuffixStrippingUnsupportedForDimension(cfg.dimension.name().to_string()),
                ));
            }
            if cfg.dimension == SplitDimension::TextureCompressionFormat {
                if let Some(suffix) = &cfg.suffix_stripping.default_suffix {
                    if !shardkit_targeting::TextureCompressionFormat::is_known_alias(suffix) {
                        return Err(BundleError::InvalidBundle(InvalidBundleError::InvalidDefaultSuffix {
                            dimension: cfg.dimension.name().to_string(),
                            suffix: suffix.clone(),
                        }));
                    }
                }
            }
        }
        Ok(())
    }

    /// The configured dimensions, in the fixed pipeline application order.
    pub fn ordered(&self) -> Vec<&SplitDimensionConfig> {
        SplitDimension::FIXED_ORDER
            .iter()
            .filter_map(|dim| self.dimensions.iter().find(|c| c.dimension == *dim))
            .collect()
    }

    pub fn contains(&self, dim: SplitDimension) -> bool {
        self.dimensions.iter().any(|c| c.dimension == dim)
    }

    pub fn config_for(&self, dim: SplitDimension) -> Option<&SplitDimensionConfig> {
        self.dimensions.iter().find(|c| c.dimension == dim)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionConfig {
    /// Globs forced uncompressed in standalone APKs.
    pub uncompressed_glob: Vec<String>,
}

impl CompressionConfig {
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.uncompressed_glob {
            glob::Pattern::new(pattern).map_err(|e| {
                BundleError::InvalidBundle(InvalidBundleError::InvalidGlob {
                    glob: pattern.clone(),
                    reason: e.to_string(),
                })
            })?;
        }
        Ok(())
    }

    pub fn matches(&self, path: &str) -> bool {
        self.uncompressed_glob.iter().any(|pattern| {
            glob::Pattern::new(pattern)
                .map(|p| p.matches(path))
                .unwrap_or(false)
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterResourcesConfig {
    pub resource_ids: Vec<u32>,
    pub resource_names: Vec<String>,
}

/// A runtime-enabled SDK declaration (§6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeEnabledSdkConfig {
    pub package_name: String,
    pub version_major: u32,
    pub version_minor: u32,
    pub build_time_version_patch: u32,
    /// Colon-hex SHA-256, e.g. `"AA:BB:..."`.
    pub certificate_digest: String,
    pub resources_package_id: u8,
}

pub const VERSION_MAJOR_MAX: u32 = 163_835;
pub const VERSION_MINOR_MAX: u32 = 163_835;

impl RuntimeEnabledSdkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version_major > VERSION_MAJOR_MAX {
            return Err(bad_runtime_sdk(format!(
                "version_major {} exceeds maximum {}",
                self.version_major, VERSION_MAJOR_MAX
            )));
        }
        if self.version_minor > VERSION_MINOR_MAX {
            return Err(bad_runtime_sdk(format!(
                "version_minor {} exceeds maximum {}",
                self.version_minor, VERSION_MINOR_MAX
            )));
        }
        if !(2..=255).contains(&self.resources_package_id) {
            return Err(bad_runtime_sdk(format!(
                "resources_package_id {} is outside [2, 255]",
                self.resources_package_id
            )));
        }
        Ok(())
    }
}

fn bad_runtime_sdk(msg: String) -> BundleError {
    BundleError::InvalidBundle(InvalidBundleError::BadRuntimeEnabledSdkConfig(msg))
}

/// Validate uniqueness of `package_name` and `resources_package_id` across
/// every module's runtime-enabled-SDK declarations (§6).
pub fn validate_runtime_enabled_sdks(sdks: &[RuntimeEnabledSdkConfig]) -> Result<()> {
    let mut package_names = std::collections::HashSet::new();
    let mut resource_ids = std::collections::HashSet::new();
    for sdk in sdks {
        sdk.validate()?;
        if !package_names.insert(sdk.package_name.as_str()) {
            return Err(bad_runtime_sdk(format!(
                "duplicate runtime-enabled SDK package_name: {}",
                sdk.package_name
            )));
        }
        if !resource_ids.insert(sdk.resources_package_id) {
            return Err(bad_runtime_sdk(format!(
                "duplicate runtime-enabled SDK resources_package_id: {}",
                sdk.resources_package_id
            )));
        }
    }
    Ok(())
}

/// `BundleConfig`: the subset of the bundle's build configuration the
/// splitting core cares about (§6).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleConfig {
    pub compression: CompressionConfig,
    pub optimizations: OptimizationDimensions,
    pub master_resources: MasterResourcesConfig,
    pub runtime_enabled_sdks: Vec<RuntimeEnabledSdkConfig>,
    pub version: String,
}

impl BundleConfig {
    pub fn validate(&self) -> Result<()> {
        self.compression.validate()?;
        self.optimizations.validate()?;
        validate_runtime_enabled_sdks(&self.runtime_enabled_sdks)?;
        validate_bundletool_version(&self.version)?;
        Ok(())
    }
}

fn validate_bundletool_version(version: &str) -> Result<()> {
    if version.is_empty() {
        return Ok(());
    }
    let parts: Vec<&str> = version.split('.').collect();
    let valid = parts.len() == 3 && parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    if valid {
        Ok(())
    } else {
        Err(BundleError::InvalidBundle(InvalidBundleError::InvalidVersion(version.to_string())))
    }
}

/// Options passed to `ModuleSplitter` for one module/variant pair (§4.4).
#[derive(Debug, Clone, Default)]
pub struct ApkGenerationConfiguration {
    /// Whether 64-bit native libs are included at all, or filtered out
    /// (§4.2 ABI splitter).
    pub include_64_bit_libs: bool,
    /// Enables the uncompressed-native-libs variant (minSdk >= M).
    pub enable_uncompressed_native_libs: bool,
    /// Enables the uncompressed-dex variant (minSdk >= P).
    pub enable_dex_compression_split: bool,
    /// Enables the sparse resource table encoding variant (minSdk >= S_V2).
    pub enable_sparse_encoding: bool,
    /// "installable on external storage" escalates native-libs variant to P.
    pub installable_on_external_storage: bool,
    /// Use the base module's minSdk as the default targeting floor instead
    /// of each module's own declared minSdk.
    pub use_base_module_min_sdk_as_default: bool,
    /// ABIs to inject `lib/<abi>/libplaceholder.so` for, base module only
    /// (§4.4 step 9).
    pub abis_for_placeholder_libs: std::collections::BTreeSet<Abi>,
    pub for_instant_app: bool,
}

/// Master resources pinned to every configuration regardless of variant or
/// targeting (§6). `ApkTargeting` carries no dedicated field for this
/// because it's a resource-selection policy, not a device-targeting
/// dimension — `ModuleSplitter` consults it directly when partitioning
/// resource entries.
pub fn is_resource_pinned_to_master(
    config: &MasterResourcesConfig,
    resource_id: Option<u32>,
    resource_name: Option<&str>,
) -> bool {
    resource_id.map(|id| config.resource_ids.contains(&id)).unwrap_or(false)
        || resource_name
            .map(|name| config.resource_names.iter().any(|n| n == name))
            .unwrap_or(false)
}

/// A single-device targeting used by the sharder's device-spec mode (§4.5).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSpec {
    pub abis: Vec<Abi>,
    pub screen_density: Option<u32>,
    pub supported_locales: Vec<String>,
}

impl DeviceSpec {
    pub fn matches(&self, targeting: &ApkTargeting) -> bool {
        if let Some(t) = &targeting.abi {
            if !t.values.is_empty() && !t.values.iter().any(|a| self.abis.contains(a)) {
                return false;
            }
        }
        true
    }
}
