//! Simulated chain for exercising Stake Safe.
//!
//! Wraps a Soroban `Env` where the ledger sequence number is the block height.
//! Every call made between two `mine_*` calls lands in the same block.

extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{StellarAssetClient, TokenClient},
    Address, Env,
};

use crate::{StakeSafe, StakeSafeClient};

pub const DEFAULT_REWARD_RATE_BPS: u32 = 500;
pub const DEFAULT_WALLET_COUNT: usize = 8;
pub const STARTING_BALANCE: i128 = 100_000_000_000_000;
pub const INITIAL_REWARD_POOL: i128 = 1_000_000_000;
pub const LEDGER_CLOSE_SECONDS: u64 = 5;

pub struct StakeSafeTestEnv {
    pub env: Env,
    pub client: StakeSafeClient<'static>,
    pub contract_id: Address,
    pub token: Address,
    pub deployer: Address,
    wallets: std::vec::Vec<Address>,
}

impl StakeSafeTestEnv {
    /// Deploy a token and an initialised, funded Stake Safe contract.
    pub fn new() -> Self {
        Self::with_reward_rate(DEFAULT_REWARD_RATE_BPS)
    }

    pub fn with_reward_rate(reward_rate_bps: u32) -> Self {
        let env = Env::default();
        env.mock_all_auths();

        let deployer = Address::generate(&env);
        let token = env
            .register_stellar_asset_contract_v2(deployer.clone())
            .address();

        let contract_id = env.register(StakeSafe, ());
        let client = StakeSafeClient::new(&env, &contract_id);
        client.initialize(&deployer, &token, &reward_rate_bps);

        let minter = StellarAssetClient::new(&env, &token);
        minter.mint(&deployer, &STARTING_BALANCE);
        client.fund_rewards(&deployer, &INITIAL_REWARD_POOL);

        let wallets = (0..DEFAULT_WALLET_COUNT)
            .map(|_| {
                let wallet = Address::generate(&env);
                minter.mint(&wallet, &STARTING_BALANCE);
                wallet
            })
            .collect();

        Self {
            env,
            client,
            contract_id,
            token,
            deployer,
            wallets,
        }
    }

    /// `wallet(1)` is the first funded account.
    pub fn wallet(&self, n: usize) -> Address {
        assert!(n >= 1 && n <= self.wallets.len(), "no wallet_{}", n);
        self.wallets[n - 1].clone()
    }

    /// An address that holds no tokens and has never interacted.
    pub fn fresh_account(&self) -> Address {
        Address::generate(&self.env)
    }

    pub fn balance(&self, who: &Address) -> i128 {
        TokenClient::new(&self.env, &self.token).balance(who)
    }

    pub fn block_height(&self) -> u32 {
        self.env.ledger().sequence()
    }

    /// Close the current block.
    pub fn mine_block(&self) -> u32 {
        self.advance_blocks(1)
    }

    pub fn advance_blocks(&self, blocks: u32) -> u32 {
        self.env.ledger().with_mut(|li| {
            li.sequence_number += blocks;
            li.timestamp += blocks as u64 * LEDGER_CLOSE_SECONDS;
        });
        self.block_height()
    }

    /// Mine empty blocks until the chain reaches `height`. Never rewinds.
    pub fn mine_empty_block_until(&self, height: u32) -> u32 {
        let current = self.block_height();
        if height > current {
            self.advance_blocks(height - current);
        }
        self.block_height()
    }
}

impl Default for StakeSafeTestEnv {
    fn default() -> Self {
        Self::new()
    }
}
