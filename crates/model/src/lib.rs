//! `ModuleEntry` / `BundleModule` / `ModuleSplit` value types (§2 item 2, §3).

pub mod bundle_module;
pub mod entry;
pub mod module_split;

pub use bundle_module::{
    ApexImageFile, ApexImageTargeting, ApexImagesConfig, AssetsConfig, AssetsDirectoryTargeting, BundleModule,
    ModuleKind, NativeDirectoryTargeting, NativeLibrariesConfig, ResourceConfigValue, ResourceEntry, ResourceId,
    ResourceTable, TargetedAssetsDirectory,
};
pub use entry::{ContentHandle, EntryContent, EntryPath, ModuleEntry, ModuleName};
pub use module_split::{ModuleSplit, SplitType};
