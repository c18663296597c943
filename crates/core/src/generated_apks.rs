//! `GeneratedApks`: the output bucket the orchestrator hands back once
//! every variant has been split and sharded (§6).

use shardkit_model::ModuleSplit;

#[derive(Debug, Clone, Default)]
pub struct GeneratedApks {
    pub split_apks: Vec<ModuleSplit>,
    pub standalone_apks: Vec<ModuleSplit>,
    pub instant_apks: Vec<ModuleSplit>,
    pub system_apks: Vec<ModuleSplit>,
    pub archived_apks: Vec<ModuleSplit>,
}

impl GeneratedApks {
    pub fn is_empty(&self) -> bool {
        self.split_apks.is_empty()
            && self.standalone_apks.is_empty()
            && self.instant_apks.is_empty()
            && self.system_apks.is_empty()
            && self.archived_apks.is_empty()
    }

    pub fn total_count(&self) -> usize {
        self.split_apks.len()
            + self.standalone_apks.len()
            + self.instant_apks.len()
            + self.system_apks.len()
            + self.archived_apks.len()
    }

    pub fn all(&self) -> impl Iterator<Item = &ModuleSplit> {
        self.split_apks
            .iter()
            .chain(self.standalone_apks.iter())
            .chain(self.instant_apks.iter())
            .chain(self.system_apks.iter())
            .chain(self.archived_apks.iter())
    }
}
