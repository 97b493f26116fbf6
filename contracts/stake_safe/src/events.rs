use soroban_sdk::{symbol_short, Address, Env, Symbol};

const TOPIC: Symbol = symbol_short!("stk_safe");

pub fn emit_initialized(env: &Env, admin: &Address, token: &Address) {
    env.events().publish(
        (TOPIC, symbol_short!("init")),
        (admin.clone(), token.clone()),
    );
}

pub fn emit_staked(env: &Env, staker: &Address, amount: i128, staked: i128, unlock_height: u64) {
    env.events().publish(
        (TOPIC, symbol_short!("stake"), staker.clone()),
        (amount, staked, unlock_height),
    );
}

pub fn emit_withdrawn(env: &Env, staker: &Address, amount: i128, remaining: i128) {
    env.events().publish(
        (TOPIC, symbol_short!("withdraw"), staker.clone()),
        (amount, remaining),
    );
}

pub fn emit_rewards_claimed(env: &Env, staker: &Address, amount: i128) {
    env.events().publish(
        (TOPIC, symbol_short!("claim"), staker.clone()),
        amount,
    );
}

pub fn emit_rewards_funded(env: &Env, funder: &Address, amount: i128, pool: i128) {
    env.events().publish(
        (TOPIC, symbol_short!("fund")),
        (funder.clone(), amount, pool),
    );
}

pub fn emit_config_updated(env: &Env, admin: &Address) {
    env.events().publish(
        (TOPIC, symbol_short!("config")),
        admin.clone(),
    );
}

pub fn emit_paused(env: &Env, paused: bool) {
    env.events().publish(
        (TOPIC, symbol_short!("paused")),
        paused,
    );
}

pub fn emit_admin_transferred(env: &Env, old_admin: &Address, new_admin: &Address) {
    env.events().publish(
        (TOPIC, symbol_short!("admin")),
        (old_admin.clone(), new_admin.clone()),
    );
}
