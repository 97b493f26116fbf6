use soroban_sdk::{contracttype, Address};

/// Contract-wide settings, written by `initialize` and the admin setters.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub admin: Address,
    /// Token accepted for stakes and paid out as rewards.
    pub token: Address,
    /// Reward per `REWARD_PERIOD_BLOCKS`, in basis points of the staked amount.
    pub reward_rate_bps: u32,
    pub min_lock_period: u32,
    pub max_lock_period: u32,
}

/// Stake held by a single principal.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeRecord {
    pub amount: i128,
    /// Blocks that must pass after `created_at` before a withdraw.
    pub lock_period: u32,
    /// Block height of the latest stake call.
    pub created_at: u32,
    /// Block height rewards were last settled at.
    pub last_claim_at: u32,
    /// Rewards settled but not yet paid out.
    pub accrued_rewards: i128,
    /// Global reward index at the last settlement.
    pub reward_index: i128,
}

impl StakeRecord {
    pub fn unlock_height(&self) -> u64 {
        self.created_at as u64 + self.lock_period as u64
    }

    pub fn is_mature(&self, height: u32) -> bool {
        height as u64 >= self.unlock_height()
    }
}

/// Running reward index, closed whenever the reward rate changes.
///
/// `index` is the sum of `reward_rate_bps * blocks` over every block up to
/// `height`, so a stake earns `amount * (index_now - index_then)` over
/// `BPS_DENOMINATOR * REWARD_PERIOD_BLOCKS`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardCheckpoint {
    pub index: i128,
    pub height: u32,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,
    TotalStaked,
    RewardPool,
    RewardCheckpoint,
    Paused,
    Stake(Address),
}
