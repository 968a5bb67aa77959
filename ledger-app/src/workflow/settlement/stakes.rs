use ledger_core::StakePresets;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StakePresetsView {
    pub presets: Vec<u32>,
    pub default_stake: u32,
}

pub trait GetStakePresetsUseCase {
    fn get_presets(&self) -> StakePresetsView;
}

pub struct GetStakePresetsUseCaseImpl {
    presets: StakePresets,
}

impl GetStakePresetsUseCaseImpl {
    pub fn new(presets: StakePresets) -> Self {
        Self { presets }
    }
}

impl GetStakePresetsUseCase for GetStakePresetsUseCaseImpl {
    fn get_presets(&self) -> StakePresetsView {
        StakePresetsView {
            presets: self.presets.as_slice().to_vec(),
            default_stake: self.presets.default_stake(),
        }
    }
}
