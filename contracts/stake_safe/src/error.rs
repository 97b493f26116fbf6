use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum StakeError {
    Unauthorized = 100,
    NoStakeFound = 101,
    StakeNotMature = 102,
    InsufficientStake = 103,
    InvalidAmount = 104,
    InvalidLockPeriod = 105,
    NoRewards = 106,
    InsufficientRewardPool = 107,
    AlreadyInitialized = 108,
    NotInitialized = 109,
    ContractPaused = 110,
    InvalidConfig = 111,
    Overflow = 112,
}
