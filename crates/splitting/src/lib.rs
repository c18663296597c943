//! Per-dimension split directory parsing and the dimension-splitter
//! pipeline (§4.2, §4.3).

pub mod path_targeting;
pub mod pipeline;
pub mod splitters;

pub use path_targeting::{parse_targeted_segment, TargetedSegment};
pub use pipeline::SplittingPipeline;
pub use splitters::{
    AbiSplitter, ApexImageSplitter, CountrySetSplitter, DeviceTierSplitter, DimensionSplitter, GraphicsApiSplitter,
    LanguageSplitter, ScreenDensitySplitter, TextureCompressionFormatSplitter,
};
