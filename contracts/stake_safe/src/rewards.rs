//! Block-based reward accrual.
//!
//! A stake earns `reward_rate_bps` basis points of its amount for every
//! `REWARD_PERIOD_BLOCKS` blocks. Accrual runs through a global index that is
//! checkpointed on every rate change, so a new rate only applies to blocks
//! after the change. Partial periods accrue pro rata and each settlement is
//! floored.

use crate::error::StakeError;
use crate::types::{RewardCheckpoint, StakeRecord};

pub const BPS_DENOMINATOR: i128 = 10_000;

/// Blocks per reward period (roughly 8 minutes at 5 second ledgers).
pub const REWARD_PERIOD_BLOCKS: i128 = 100;

/// Global index at `height`, assuming `reward_rate_bps` since the checkpoint.
pub fn index_at(
    checkpoint: &RewardCheckpoint,
    reward_rate_bps: u32,
    height: u32,
) -> Result<i128, StakeError> {
    let elapsed = height.saturating_sub(checkpoint.height) as i128;
    (reward_rate_bps as i128)
        .checked_mul(elapsed)
        .and_then(|v| v.checked_add(checkpoint.index))
        .ok_or(StakeError::Overflow)
}

/// Close the current rate's accrual at `height`.
pub fn checkpoint(
    current: &RewardCheckpoint,
    reward_rate_bps: u32,
    height: u32,
) -> Result<RewardCheckpoint, StakeError> {
    Ok(RewardCheckpoint {
        index: index_at(current, reward_rate_bps, height)?,
        height: height.max(current.height),
    })
}

/// Rewards earned since the record was last settled, excluding accrued ones.
pub fn earned_since_settlement(record: &StakeRecord, index: i128) -> Result<i128, StakeError> {
    let delta = index - record.reward_index;
    if delta <= 0 || record.amount <= 0 {
        return Ok(0);
    }

    record
        .amount
        .checked_mul(delta)
        .map(|v| v / (BPS_DENOMINATOR * REWARD_PERIOD_BLOCKS))
        .ok_or(StakeError::Overflow)
}

/// Total claimable rewards at the given global index.
pub fn pending_rewards(record: &StakeRecord, index: i128) -> Result<i128, StakeError> {
    let earned = earned_since_settlement(record, index)?;
    record
        .accrued_rewards
        .checked_add(earned)
        .ok_or(StakeError::Overflow)
}

/// Moves everything earned so far into `accrued_rewards` and restarts
/// accrual from `index`. Must run before the staked amount changes.
pub fn settle(record: &mut StakeRecord, index: i128, height: u32) -> Result<(), StakeError> {
    record.accrued_rewards = pending_rewards(record, index)?;
    record.reward_index = index;
    record.last_claim_at = height;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(amount: i128, at: u32) -> StakeRecord {
        StakeRecord {
            amount,
            lock_period: 150,
            created_at: at,
            last_claim_at: at,
            accrued_rewards: 0,
            reward_index: 0,
        }
    }

    fn genesis() -> RewardCheckpoint {
        RewardCheckpoint { index: 0, height: 0 }
    }

    #[test]
    fn test_no_rewards_without_index_movement() {
        let r = record(2_000, 10);
        let index = index_at(&genesis(), 500, 0).unwrap();
        assert_eq!(pending_rewards(&r, index).unwrap(), 0);
    }

    #[test]
    fn test_rewards_accrue_linearly() {
        let r = record(2_000, 0);
        // 5% per 100 blocks on 2_000 → 100 per period.
        assert_eq!(pending_rewards(&r, index_at(&genesis(), 500, 100).unwrap()).unwrap(), 100);
        assert_eq!(pending_rewards(&r, index_at(&genesis(), 500, 200).unwrap()).unwrap(), 200);
        // Half a period.
        assert_eq!(pending_rewards(&r, index_at(&genesis(), 500, 50).unwrap()).unwrap(), 50);
    }

    #[test]
    fn test_rewards_are_floored() {
        let r = record(3, 0);
        // 3 * 500 * 1 / 1_000_000 = 0
        assert_eq!(pending_rewards(&r, index_at(&genesis(), 500, 1).unwrap()).unwrap(), 0);
    }

    #[test]
    fn test_zero_rate_earns_nothing() {
        let r = record(2_000, 0);
        assert_eq!(pending_rewards(&r, index_at(&genesis(), 0, 10_000).unwrap()).unwrap(), 0);
    }

    #[test]
    fn test_index_behind_record_earns_nothing() {
        let mut r = record(2_000, 50);
        r.reward_index = 25_000;
        assert_eq!(pending_rewards(&r, 20_000).unwrap(), 0);
    }

    #[test]
    fn test_checkpoint_keeps_old_rate_for_past_blocks() {
        let r = record(2_000, 0);

        // 1_000 blocks at 500 bps, then 100 blocks at 10_000 bps.
        let closed = checkpoint(&genesis(), 500, 1_000).unwrap();
        assert_eq!(closed, RewardCheckpoint { index: 500_000, height: 1_000 });
        assert_eq!(pending_rewards(&r, closed.index).unwrap(), 1_000);

        let index = index_at(&closed, 10_000, 1_100).unwrap();
        assert_eq!(pending_rewards(&r, index).unwrap(), 3_000);
    }

    #[test]
    fn test_checkpoint_never_moves_back() {
        let current = RewardCheckpoint { index: 7, height: 40 };
        let closed = checkpoint(&current, 500, 10).unwrap();
        assert_eq!(closed, current);
    }

    #[test]
    fn test_settle_preserves_total() {
        let mut r = record(2_000, 0);
        settle(&mut r, index_at(&genesis(), 500, 100).unwrap(), 100).unwrap();
        assert_eq!(r.accrued_rewards, 100);
        assert_eq!(r.reward_index, 50_000);
        assert_eq!(r.last_claim_at, 100);

        // Doubling the stake only affects accrual from the settle point on.
        r.amount = 4_000;
        let index = index_at(&genesis(), 500, 200).unwrap();
        assert_eq!(pending_rewards(&r, index).unwrap(), 300);
    }

    #[test]
    fn test_overflow_is_reported() {
        let r = record(i128::MAX, 0);
        assert_eq!(pending_rewards(&r, 10), Err(StakeError::Overflow));

        let top = RewardCheckpoint { index: i128::MAX, height: 0 };
        assert_eq!(index_at(&top, 1, 1), Err(StakeError::Overflow));
    }
}
