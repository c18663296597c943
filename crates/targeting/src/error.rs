use thiserror::Error;

/// Failures raised by the targeting algebra itself. Distinct from the
/// higher-level `InvalidBundleException` / `CommandExecutionException`
/// catalogue in `shardkit-core`, which wraps these where they cross into
/// orchestration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetingError {
    /// `ApkTargeting::merge` found two operands disagreeing on the same
    /// dimension.
    #[error("cannot merge conflicting targeting on dimension {dimension}: {left} vs {right}")]
    Conflict {
        dimension: &'static str,
        left: String,
        right: String,
    },

    /// A splitter was invoked on a split already carrying targeting on its
    /// own dimension.
    #[error("split is already targeted on dimension {0}")]
    AlreadyTargetedOnDimension(&'static str),
}
