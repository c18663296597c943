//! The error catalogue (§7). Every failure the splitting core raises is one
//! of these three kinds, each carrying a human-readable message.

use thiserror::Error;

use shardkit_manifest::MutatorConflict;
use shardkit_targeting::TargetingError;

/// Schema-level input errors, surfaced straight to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidBundleError {
    #[error("unrecognized split dimension: {0}")]
    UnrecognizedSplitDimension(String),

    #[error("duplicate split dimension in optimization config: {0}")]
    DuplicateSplitDimension(String),

    #[error("invalid glob pattern '{glob}': {reason}")]
    InvalidGlob { glob: String, reason: String },

    #[error("invalid bundletool version string: {0}")]
    InvalidVersion(String),

    #[error("pinned master resource is not defined in any module: {0}")]
    UndefinedPinnedResource(String),

    #[error("invalid runtime-enabled-SDK config: {0}")]
    BadRuntimeEnabledSdkConfig(String),

    #[error("suffix stripping is not supported for dimension: {0}")]
    SuffixStrippingUnsupportedForDimension(String),

    #[error("invalid default suffix '{suffix}' for dimension {dimension}")]
    InvalidDefaultSuffix { dimension: String, suffix: String },
}

/// Runtime orchestration failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandExecutionError {
    #[error("module '{0}' targets only pre-L devices and cannot be split")]
    TargetsPreL(String),

    #[error("filtering 64-bit native libs left no compatible ABI for module '{0}'")]
    NoCompatibleNativeLibs(String),
}

/// A splitter or populator was invoked with inputs violating its contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IllegalArgumentError {
    #[error("split is already targeted on dimension {0}")]
    AlreadyTargetedOnDimension(String),

    #[error("mixed dimension agnosticism on {0}: some variants are targeted, others are agnostic")]
    MixedDimensionAgnosticism(String),
}

/// An internal invariant the core itself is responsible for upholding broke.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IllegalStateError {
    #[error("inconsistent master manifest mutators for variant: {0}")]
    InconsistentMasterMutators(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BundleError {
    #[error(transparent)]
    InvalidBundle(#[from] InvalidBundleError),

    #[error(transparent)]
    CommandExecution(#[from] CommandExecutionError),

    #[error(transparent)]
    IllegalArgument(#[from] IllegalArgumentError),

    #[error(transparent)]
    IllegalState(#[from] IllegalStateError),
}

impl From<TargetingError> for BundleError {
    fn from(e: TargetingError) -> Self {
        match e {
            TargetingError::AlreadyTargetedOnDimension(dim) => {
                BundleError::IllegalArgument(IllegalArgumentError::AlreadyTargetedOnDimension(dim.to_string()))
            }
            TargetingError::Conflict { dimension, left, right } => BundleError::IllegalState(
                IllegalStateError::InconsistentMasterMutators(format!(
                    "conflicting targeting on {dimension}: {left} vs {right}"
                )),
            ),
        }
    }
}

impl From<MutatorConflict> for BundleError {
    fn from(e: MutatorConflict) -> Self {
        BundleError::IllegalState(IllegalStateError::InconsistentMasterMutators(e.tag))
    }
}

pub type Result<T> = std::result::Result<T, BundleError>;
