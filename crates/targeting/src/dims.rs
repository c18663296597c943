//! Per-dimension value types.
//!
//! Each type here is a leaf value that can appear in a `Targeting<V>`'s
//! `values`/`alternatives` sets. None of them carry behavior beyond parsing
//! and rendering their canonical string form, which the split-id assignment
//! step (see `shardkit-module-splitter`) relies on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Android SDK level milestones referenced by the splitting core.
///
/// Named the way the source material names them, not by raw API level, so a
/// reader can tell at a glance which Android release introduced the
/// behavior being gated.
pub mod sdk {
    /// Lollipop. First API level with split APK support.
    pub const L: u32 = 21;
    /// Marshmallow. Uncompressed native libs / `extractNativeLibs=false`.
    pub const M: u32 = 23;
    /// Nougat. Native activity still requires compressed libs pre-N.
    pub const N: u32 = 24;
    /// Pie. Uncompressed dex, installable-on-external-storage native libs.
    pub const P: u32 = 28;
    /// Android 12L / 13 sparse resource table encoding.
    pub const S_V2: u32 = 32;
}

/// CPU instruction set a native library directory was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Abi {
    Armeabi,
    ArmeabiV7a,
    Arm64V8a,
    X86,
    X86_64,
    Mips,
    Mips64,
    RiscV64,
}

impl Abi {
    /// Canonical `lib/<abi>` directory segment / split-id suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Abi::Armeabi => "armeabi",
            Abi::ArmeabiV7a => "armeabi-v7a",
            Abi::Arm64V8a => "arm64-v8a",
            Abi::X86 => "x86",
            Abi::X86_64 => "x86_64",
            Abi::Mips => "mips",
            Abi::Mips64 => "mips64",
            Abi::RiscV64 => "riscv64",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "armeabi" => Abi::Armeabi,
            "armeabi-v7a" => Abi::ArmeabiV7a,
            "arm64-v8a" => Abi::Arm64V8a,
            "x86" => Abi::X86,
            "x86_64" => Abi::X86_64,
            "mips" => Abi::Mips,
            "mips64" => Abi::Mips64,
            "riscv64" => Abi::RiscV64,
            _ => return None,
        })
    }

    /// Whether this is a 64-bit instruction set, used by the ABI splitter's
    /// `include_64_bit_libs` gate.
    pub fn is_64_bit(&self) -> bool {
        matches!(self, Abi::Arm64V8a | Abi::X86_64 | Abi::Mips64 | Abi::RiscV64)
    }
}

impl fmt::Display for Abi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The discrete density buckets device selection matches against.
///
/// Ordered by increasing dpi so `BTreeSet<ScreenDensity>` iterates low to
/// high, which the density splitter's best-match search relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScreenDensity {
    Ldpi,
    Mdpi,
    Tvdpi,
    Hdpi,
    Xhdpi,
    Xxhdpi,
    Xxxhdpi,
}

impl ScreenDensity {
    pub const ALL: [ScreenDensity; 7] = [
        ScreenDensity::Ldpi,
        ScreenDensity::Mdpi,
        ScreenDensity::Tvdpi,
        ScreenDensity::Hdpi,
        ScreenDensity::Xhdpi,
        ScreenDensity::Xxhdpi,
        ScreenDensity::Xxxhdpi,
    ];

    /// The dpi value Android associates with this bucket's alias.
    pub fn dpi(&self) -> u32 {
        match self {
            ScreenDensity::Ldpi => 120,
            ScreenDensity::Mdpi => 160,
            ScreenDensity::Tvdpi => 213,
            ScreenDensity::Hdpi => 240,
            ScreenDensity::Xhdpi => 320,
            ScreenDensity::Xxhdpi => 480,
            ScreenDensity::Xxxhdpi => 640,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenDensity::Ldpi => "ldpi",
            ScreenDensity::Mdpi => "mdpi",
            ScreenDensity::Tvdpi => "tvdpi",
            ScreenDensity::Hdpi => "hdpi",
            ScreenDensity::Xhdpi => "xhdpi",
            ScreenDensity::Xxhdpi => "xxhdpi",
            ScreenDensity::Xxxhdpi => "xxxhdpi",
        }
    }
}

impl fmt::Display for ScreenDensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ScreenDensity {
    /// The densities among `available` that best serve this bucket, per
    /// Android's density-matching rule: an exact match wins outright;
    /// failing that, downscaling a higher-density source looks better than
    /// upscaling a lower-density one, so the nearest higher density is
    /// preferred, falling back to the nearest lower density if none exists.
    ///
    /// `Mdpi` is the baseline bucket: when it has no exact source, both the
    /// nearest lower and nearest higher sources are considered equally
    /// eligible, since it covers devices that could reasonably be served by
    /// either.
    pub fn best_match(&self, available: &std::collections::BTreeSet<ScreenDensity>) -> std::collections::BTreeSet<ScreenDensity> {
        if available.contains(self) {
            return std::iter::once(*self).collect();
        }

        let lower = available.iter().filter(|d| d.dpi() < self.dpi()).max_by_key(|d| d.dpi()).copied();
        let higher = available.iter().filter(|d| d.dpi() > self.dpi()).min_by_key(|d| d.dpi()).copied();

        if *self == ScreenDensity::Mdpi {
            return [lower, higher].into_iter().flatten().collect();
        }

        match (lower, higher) {
            (Some(l), Some(h)) => {
                let dist_lower = self.dpi() as i64 - l.dpi() as i64;
                let dist_higher = h.dpi() as i64 - self.dpi() as i64;
                let winner = if dist_higher <= dist_lower { h } else { l };
                std::iter::once(winner).collect()
            }
            (Some(l), None) => std::iter::once(l).collect(),
            (None, Some(h)) => std::iter::once(h).collect(),
            (None, None) => std::collections::BTreeSet::new(),
        }
    }
}

/// Resolve every one of the 7 canonical density buckets against the
/// densities actually present in a resource table. A bucket is omitted only
/// when `available` is empty; otherwise the best-match rule (see
/// `ScreenDensity::best_match`) always resolves to at least one source.
/// Shared by the screen-density splitter and the sharder's density
/// cross-product so both paths agree on which densities exist and which
/// source(s) serve each one.
pub fn resolve_density_buckets(
    available: &std::collections::BTreeSet<ScreenDensity>,
) -> std::collections::BTreeMap<ScreenDensity, std::collections::BTreeSet<ScreenDensity>> {
    let mut buckets = std::collections::BTreeMap::new();
    if available.is_empty() {
        return buckets;
    }
    for bucket in ScreenDensity::ALL {
        let sources = bucket.best_match(available);
        if !sources.is_empty() {
            buckets.insert(bucket, sources);
        }
    }
    buckets
}

/// A BCP-47-ish language tag, e.g. `"fr"`, `"en-US"`, taken verbatim from the
/// `assets/*#lang_<tag>` directory name or resource configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Language(pub String);

impl Language {
    pub fn new(tag: impl Into<String>) -> Self {
        Language(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Known texture compression format aliases recognized by `#tcf_<fmt>`
/// directories. `Other` keeps the format round-trippable even if bundletool
/// adds a new alias this crate doesn't know about yet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TextureCompressionFormat {
    Astc,
    Atc,
    Dxt1,
    Latc,
    Paletted,
    Pvrtc,
    S3tc,
    Etc1Rgb8,
    ThreeDc,
    Other(String),
}

impl TextureCompressionFormat {
    pub fn alias(&self) -> &str {
        match self {
            TextureCompressionFormat::Astc => "astc",
            TextureCompressionFormat::Atc => "atc",
            TextureCompressionFormat::Dxt1 => "dxt1",
            TextureCompressionFormat::Latc => "latc",
            TextureCompressionFormat::Paletted => "paletted",
            TextureCompressionFormat::Pvrtc => "pvrtc",
            TextureCompressionFormat::S3tc => "s3tc",
            TextureCompressionFormat::Etc1Rgb8 => "etc1_rgb8",
            TextureCompressionFormat::ThreeDc => "3dc",
            TextureCompressionFormat::Other(s) => s,
        }
    }

    pub fn from_alias(alias: &str) -> Self {
        match alias {
            "astc" => TextureCompressionFormat::Astc,
            "atc" => TextureCompressionFormat::Atc,
            "dxt1" => TextureCompressionFormat::Dxt1,
            "latc" => TextureCompressionFormat::Latc,
            "paletted" => TextureCompressionFormat::Paletted,
            "pvrtc" => TextureCompressionFormat::Pvrtc,
            "s3tc" => TextureCompressionFormat::S3tc,
            "etc1_rgb8" => TextureCompressionFormat::Etc1Rgb8,
            "3dc" => TextureCompressionFormat::ThreeDc,
            other => TextureCompressionFormat::Other(other.to_string()),
        }
    }

    /// Whether `alias` is one of the known, non-`Other` formats. Used to
    /// validate a dimension's `suffix_stripping.default_suffix` option.
    pub fn is_known_alias(alias: &str) -> bool {
        !matches!(Self::from_alias(alias), TextureCompressionFormat::Other(_))
    }
}

impl fmt::Display for TextureCompressionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

/// A device-tier bucket, declared per `#tier_<n>` directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeviceTier(pub u32);

impl fmt::Display for DeviceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named country set, e.g. `"latam"`, `"sea"`, as declared in
/// `#countries_<set>` directory names and the bundle's country-set config.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CountrySet(pub String);

impl CountrySet {
    pub fn new(name: impl Into<String>) -> Self {
        CountrySet(name.into())
    }
}

impl fmt::Display for CountrySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An OpenGL ES version, e.g. `3.1`, as declared in `#opengl_<major.minor>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OpenGlVersion {
    pub major: u32,
    pub minor: u32,
}

impl OpenGlVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for OpenGlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A minimum SDK version gate, used both by `ApkTargeting.sdk_version` and
/// `VariantTargeting.min_sdk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SdkVersion(pub u32);

impl fmt::Display for SdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sdk{}", self.0)
    }
}

/// Whether a variant requires the Android privacy-sandbox SDK runtime.
/// SDK-runtime variants form an alternatives pool independent of min-SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SdkRuntime {
    Required,
    NotRequired,
}

impl fmt::Display for SdkRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdkRuntime::Required => f.write_str("sdk_runtime_required"),
            SdkRuntime::NotRequired => f.write_str("sdk_runtime_not_required"),
        }
    }
}
