//! Multi-denomination coin arithmetic over `Vec<Coin>` bundles.

use cosmwasm_std::{Coin, Coins, StdResult};

/// Coin-wise sum of several bundles, sorted by denom with zero entries dropped
pub fn sum_coins<'a>(bundles: impl IntoIterator<Item = &'a [Coin]>) -> StdResult<Vec<Coin>> {
    let mut total = Coins::default();
    for bundle in bundles {
        for coin in bundle {
            total.add(coin.clone())?;
        }
    }
    Ok(total.into_vec())
}

/// Coin-wise `minuend - subtrahend`; fails if any denom would go negative
pub fn sub_coins(minuend: &[Coin], subtrahend: &[Coin]) -> StdResult<Vec<Coin>> {
    let mut remaining = Coins::try_from(sum_coins([minuend])?)?;
    for coin in subtrahend {
        remaining.sub(coin.clone())?;
    }
    Ok(remaining.into_vec())
}

pub fn is_zero(coins: &[Coin]) -> bool {
    coins.iter().all(|coin| coin.amount.is_zero())
}

/// Render as `100uatom,20stake`
pub fn coins_to_string(coins: &[Coin]) -> String {
    coins
        .iter()
        .map(|coin| coin.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Checks that a bundle is sorted by denom, free of duplicates, strictly
/// positive and uses well-formed denoms.
pub fn validate_coins(coins: &[Coin]) -> Result<(), String> {
    for (i, coin) in coins.iter().enumerate() {
        validate_denom(&coin.denom)?;
        if coin.amount.is_zero() {
            return Err(format!("coin {coin} has zero amount"));
        }
        if i > 0 && coins[i - 1].denom >= coin.denom {
            return Err(format!("denom {} is unsorted or duplicated", coin.denom));
        }
    }
    Ok(())
}

fn validate_denom(denom: &str) -> Result<(), String> {
    let mut chars = denom.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || "/:._-".contains(c));

    if !(3..=128).contains(&denom.len()) || !starts_alpha || !rest_ok {
        return Err(format!("invalid denom: {denom:?}"));
    }
    Ok(())
}
