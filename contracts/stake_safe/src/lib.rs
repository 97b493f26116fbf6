//! Stake Safe
//!
//! Time-locked staking. A principal stakes tokens for a lock period measured
//! in blocks (ledgers). The stake can be withdrawn once the lock has elapsed,
//! and it earns block-based rewards paid out of a pool funded by anyone.

#![no_std]

mod error;
mod events;
mod rewards;
mod storage;
mod types;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;


use soroban_sdk::{contract, contractimpl, log, token, Address, Env};

pub use crate::error::StakeError;
pub use crate::rewards::{BPS_DENOMINATOR, REWARD_PERIOD_BLOCKS};
pub use crate::types::{Config, RewardCheckpoint, StakeRecord};

pub const MIN_LOCK_PERIOD: u32 = 1;
pub const MAX_LOCK_PERIOD: u32 = 365 * storage::DAY_IN_LEDGERS;

#[contract]
pub struct StakeSafe;

#[contractimpl]
impl StakeSafe {
    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    pub fn initialize(
        env: Env,
        admin: Address,
        token: Address,
        reward_rate_bps: u32,
    ) -> Result<(), StakeError> {
        if storage::has_config(&env) {
            return Err(StakeError::AlreadyInitialized);
        }
        admin.require_auth();

        if reward_rate_bps as i128 > BPS_DENOMINATOR {
            return Err(StakeError::InvalidConfig);
        }

        let config = Config {
            admin: admin.clone(),
            token: token.clone(),
            reward_rate_bps,
            min_lock_period: MIN_LOCK_PERIOD,
            max_lock_period: MAX_LOCK_PERIOD,
        };
        storage::set_config(&env, &config);
        storage::set_reward_checkpoint(
            &env,
            &RewardCheckpoint {
                index: 0,
                height: env.ledger().sequence(),
            },
        );
        storage::extend_instance(&env);

        events::emit_initialized(&env, &admin, &token);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Staking
    // -----------------------------------------------------------------------

    /// Lock `amount` tokens for `lock_period` blocks.
    ///
    /// Staking again tops up the existing record: the lock restarts at the
    /// current block and keeps the longer of the two periods.
    pub fn stake(
        env: Env,
        staker: Address,
        amount: i128,
        lock_period: u32,
    ) -> Result<(), StakeError> {
        staker.require_auth();
        let config = storage::get_config(&env)?;
        storage::extend_instance(&env);

        if storage::is_paused(&env) {
            return Err(StakeError::ContractPaused);
        }
        if amount <= 0 {
            return Err(StakeError::InvalidAmount);
        }
        if lock_period < config.min_lock_period || lock_period > config.max_lock_period {
            return Err(StakeError::InvalidLockPeriod);
        }

        let height = env.ledger().sequence();
        let index = current_reward_index(&env, &config)?;
        let record = match storage::get_stake(&env, &staker) {
            Some(mut existing) => {
                rewards::settle(&mut existing, index, height)?;
                existing.amount = existing
                    .amount
                    .checked_add(amount)
                    .ok_or(StakeError::Overflow)?;
                existing.lock_period = existing.lock_period.max(lock_period);
                existing.created_at = height;
                existing
            }
            None => StakeRecord {
                amount,
                lock_period,
                created_at: height,
                last_claim_at: height,
                accrued_rewards: 0,
                reward_index: index,
            },
        };

        token::Client::new(&env, &config.token).transfer(
            &staker,
            &env.current_contract_address(),
            &amount,
        );

        let total = storage::get_total_staked(&env)
            .checked_add(amount)
            .ok_or(StakeError::Overflow)?;
        storage::set_stake(&env, &staker, &record);
        storage::set_total_staked(&env, total);

        log!(&env, "stake", amount, height, record.lock_period);
        events::emit_staked(&env, &staker, amount, record.amount, record.unlock_height());
        Ok(())
    }

    /// Return `amount` staked tokens to `staker` once the lock has elapsed.
    ///
    /// Allowed while paused.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<(), StakeError> {
        staker.require_auth();
        let config = storage::get_config(&env)?;
        storage::extend_instance(&env);

        if amount <= 0 {
            return Err(StakeError::InvalidAmount);
        }
        let mut record = storage::get_stake(&env, &staker).ok_or(StakeError::NoStakeFound)?;

        let height = env.ledger().sequence();
        if !record.is_mature(height) {
            log!(&env, "withdraw before unlock", height, record.unlock_height());
            return Err(StakeError::StakeNotMature);
        }
        if amount > record.amount {
            return Err(StakeError::InsufficientStake);
        }

        let total = storage::get_total_staked(&env)
            .checked_sub(amount)
            .filter(|total| *total >= 0)
            .ok_or(StakeError::Overflow)?;
        let index = current_reward_index(&env, &config)?;
        rewards::settle(&mut record, index, height)?;
        record.amount -= amount;

        if record.amount == 0 && record.accrued_rewards == 0 {
            storage::remove_stake(&env, &staker);
        } else {
            storage::set_stake(&env, &staker, &record);
        }
        storage::set_total_staked(&env, total);

        token::Client::new(&env, &config.token).transfer(
            &env.current_contract_address(),
            &staker,
            &amount,
        );

        events::emit_withdrawn(&env, &staker, amount, record.amount);
        Ok(())
    }

    /// Pay out everything `staker` has earned so far. Returns the amount paid.
    pub fn claim_rewards(env: Env, staker: Address) -> Result<i128, StakeError> {
        staker.require_auth();
        let config = storage::get_config(&env)?;
        storage::extend_instance(&env);

        if storage::is_paused(&env) {
            return Err(StakeError::ContractPaused);
        }
        let mut record = storage::get_stake(&env, &staker).ok_or(StakeError::NoStakeFound)?;

        let height = env.ledger().sequence();
        let index = current_reward_index(&env, &config)?;
        rewards::settle(&mut record, index, height)?;
        let reward = record.accrued_rewards;
        if reward <= 0 {
            return Err(StakeError::NoRewards);
        }

        let pool = storage::get_reward_pool(&env);
        if reward > pool {
            log!(&env, "reward pool short", reward, pool);
            return Err(StakeError::InsufficientRewardPool);
        }
        storage::set_reward_pool(&env, pool - reward);

        record.accrued_rewards = 0;
        if record.amount == 0 {
            storage::remove_stake(&env, &staker);
        } else {
            storage::set_stake(&env, &staker, &record);
        }

        token::Client::new(&env, &config.token).transfer(
            &env.current_contract_address(),
            &staker,
            &reward,
        );

        events::emit_rewards_claimed(&env, &staker, reward);
        Ok(reward)
    }

    /// Add `amount` tokens from `from` to the reward pool.
    pub fn fund_rewards(env: Env, from: Address, amount: i128) -> Result<(), StakeError> {
        from.require_auth();
        let config = storage::get_config(&env)?;
        storage::extend_instance(&env);

        if amount <= 0 {
            return Err(StakeError::InvalidAmount);
        }

        token::Client::new(&env, &config.token).transfer(
            &from,
            &env.current_contract_address(),
            &amount,
        );

        let pool = storage::get_reward_pool(&env)
            .checked_add(amount)
            .ok_or(StakeError::Overflow)?;
        storage::set_reward_pool(&env, pool);

        events::emit_rewards_funded(&env, &from, amount, pool);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn get_stake(env: Env, staker: Address) -> Option<StakeRecord> {
        storage::extend_instance(&env);
        storage::get_stake(&env, &staker)
    }

    pub fn get_pending_rewards(env: Env, staker: Address) -> Result<i128, StakeError> {
        storage::extend_instance(&env);
        let config = storage::get_config(&env)?;
        match storage::get_stake(&env, &staker) {
            Some(record) => {
                rewards::pending_rewards(&record, current_reward_index(&env, &config)?)
            }
            None => Ok(0),
        }
    }

    pub fn get_total_staked(env: Env) -> i128 {
        storage::extend_instance(&env);
        storage::get_total_staked(&env)
    }

    pub fn get_reward_pool(env: Env) -> i128 {
        storage::extend_instance(&env);
        storage::get_reward_pool(&env)
    }

    pub fn get_config(env: Env) -> Result<Config, StakeError> {
        storage::extend_instance(&env);
        storage::get_config(&env)
    }

    pub fn is_paused(env: Env) -> bool {
        storage::extend_instance(&env);
        storage::is_paused(&env)
    }

    // -----------------------------------------------------------------------
    // Admin
    // -----------------------------------------------------------------------

    pub fn set_reward_rate(env: Env, admin: Address, reward_rate_bps: u32) -> Result<(), StakeError> {
        admin.require_auth();
        let mut config = storage::require_admin(&env, &admin)?;

        if reward_rate_bps as i128 > BPS_DENOMINATOR {
            return Err(StakeError::InvalidConfig);
        }

        // Blocks up to now keep the old rate.
        let closed = rewards::checkpoint(
            &storage::get_reward_checkpoint(&env),
            config.reward_rate_bps,
            env.ledger().sequence(),
        )?;
        storage::set_reward_checkpoint(&env, &closed);

        config.reward_rate_bps = reward_rate_bps;
        storage::set_config(&env, &config);
        storage::extend_instance(&env);

        events::emit_config_updated(&env, &admin);
        Ok(())
    }

    pub fn set_lock_bounds(
        env: Env,
        admin: Address,
        min_lock_period: u32,
        max_lock_period: u32,
    ) -> Result<(), StakeError> {
        admin.require_auth();
        let mut config = storage::require_admin(&env, &admin)?;

        if min_lock_period == 0 || min_lock_period > max_lock_period {
            return Err(StakeError::InvalidConfig);
        }

        config.min_lock_period = min_lock_period;
        config.max_lock_period = max_lock_period;
        storage::set_config(&env, &config);
        storage::extend_instance(&env);

        events::emit_config_updated(&env, &admin);
        Ok(())
    }

    pub fn pause(env: Env, admin: Address) -> Result<(), StakeError> {
        admin.require_auth();
        storage::require_admin(&env, &admin)?;

        storage::set_paused(&env, true);
        storage::extend_instance(&env);

        events::emit_paused(&env, true);
        Ok(())
    }

    pub fn unpause(env: Env, admin: Address) -> Result<(), StakeError> {
        admin.require_auth();
        storage::require_admin(&env, &admin)?;

        storage::set_paused(&env, false);
        storage::extend_instance(&env);

        events::emit_paused(&env, false);
        Ok(())
    }

    pub fn transfer_admin(env: Env, admin: Address, new_admin: Address) -> Result<(), StakeError> {
        admin.require_auth();
        let mut config = storage::require_admin(&env, &admin)?;

        config.admin = new_admin.clone();
        storage::set_config(&env, &config);
        storage::extend_instance(&env);

        events::emit_admin_transferred(&env, &admin, &new_admin);
        Ok(())
    }
}

fn current_reward_index(env: &Env, config: &Config) -> Result<i128, StakeError> {
    rewards::index_at(
        &storage::get_reward_checkpoint(env),
        config.reward_rate_bps,
        env.ledger().sequence(),
    )
}
