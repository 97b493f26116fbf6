use soroban_sdk::{Address, Env};

use crate::error::StakeError;
use crate::types::{Config, DataKey, RewardCheckpoint, StakeRecord};

pub(crate) const DAY_IN_LEDGERS: u32 = 17_280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
pub(crate) const STAKE_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const STAKE_LIFETIME_THRESHOLD: u32 = STAKE_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<Config, StakeError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(StakeError::NotInitialized)
}

pub fn set_config(env: &Env, config: &Config) {
    env.storage().instance().set(&DataKey::Config, config);
}

/// Fails unless `caller` is the configured admin.
pub fn require_admin(env: &Env, caller: &Address) -> Result<Config, StakeError> {
    let config = get_config(env)?;
    if *caller != config.admin {
        return Err(StakeError::Unauthorized);
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

pub fn get_total_staked(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalStaked)
        .unwrap_or(0i128)
}

pub fn set_total_staked(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::TotalStaked, &amount);
}

pub fn get_reward_pool(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::RewardPool)
        .unwrap_or(0i128)
}

pub fn set_reward_pool(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::RewardPool, &amount);
}

pub fn get_reward_checkpoint(env: &Env) -> RewardCheckpoint {
    env.storage()
        .instance()
        .get(&DataKey::RewardCheckpoint)
        .unwrap_or(RewardCheckpoint { index: 0, height: 0 })
}

pub fn set_reward_checkpoint(env: &Env, checkpoint: &RewardCheckpoint) {
    env.storage()
        .instance()
        .set(&DataKey::RewardCheckpoint, checkpoint);
}

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
}

// ---------------------------------------------------------------------------
// Stake records
// ---------------------------------------------------------------------------

pub fn get_stake(env: &Env, staker: &Address) -> Option<StakeRecord> {
    env.storage()
        .persistent()
        .get(&DataKey::Stake(staker.clone()))
}

pub fn set_stake(env: &Env, staker: &Address, record: &StakeRecord) {
    let key = DataKey::Stake(staker.clone());
    env.storage().persistent().set(&key, record);
    env.storage()
        .persistent()
        .extend_ttl(&key, STAKE_LIFETIME_THRESHOLD, STAKE_BUMP_AMOUNT);
}

pub fn remove_stake(env: &Env, staker: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::Stake(staker.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StakeSafe;
    use soroban_sdk::{testutils::Address as _, Env};

    #[test]
    fn test_missing_config_reports_not_initialized() {
        let env = Env::default();
        let contract_id = env.register(StakeSafe, ());

        env.as_contract(&contract_id, || {
            assert!(!has_config(&env));
            assert_eq!(get_config(&env), Err(StakeError::NotInitialized));
            assert_eq!(get_total_staked(&env), 0);
            assert_eq!(get_reward_pool(&env), 0);
            assert_eq!(get_reward_checkpoint(&env), RewardCheckpoint { index: 0, height: 0 });
            assert!(!is_paused(&env));
        });
    }

    #[test]
    fn test_require_admin_rejects_other_callers() {
        let env = Env::default();
        let contract_id = env.register(StakeSafe, ());
        let admin = Address::generate(&env);
        let other = Address::generate(&env);
        let token = Address::generate(&env);

        env.as_contract(&contract_id, || {
            set_config(
                &env,
                &Config {
                    admin: admin.clone(),
                    token,
                    reward_rate_bps: 500,
                    min_lock_period: 1,
                    max_lock_period: 1_000,
                },
            );

            assert!(require_admin(&env, &admin).is_ok());
            assert_eq!(require_admin(&env, &other), Err(StakeError::Unauthorized));
        });
    }

    #[test]
    fn test_stake_record_set_and_remove() {
        let env = Env::default();
        let contract_id = env.register(StakeSafe, ());
        let staker = Address::generate(&env);
        let record = StakeRecord {
            amount: 2_000,
            lock_period: 150,
            created_at: 1,
            last_claim_at: 1,
            accrued_rewards: 0,
            reward_index: 0,
        };

        env.as_contract(&contract_id, || {
            assert!(get_stake(&env, &staker).is_none());

            set_stake(&env, &staker, &record);
            assert_eq!(get_stake(&env, &staker), Some(record.clone()));

            remove_stake(&env, &staker);
            assert!(get_stake(&env, &staker).is_none());
        });
    }
}
