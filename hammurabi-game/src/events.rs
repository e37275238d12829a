//! Randomized world events rolled at the end of every successful year.
//!
//! Draw order is fixed: plague, rats (plus the eaten share when they come),
//! newcomers, then next year's land price and profit.

use crate::constants::{
    MAX_LAND_PRICE, MAX_LAND_PROFIT, MAX_NEWCOMERS, MAX_RAT_FRACTION, MIN_LAND_PRICE,
    MIN_LAND_PROFIT, MIN_NEWCOMERS, MIN_RAT_FRACTION, PLAGUE_CHANCE, RAT_CHANCE,
};
use crate::error::TransitionError;
use crate::numbers::{floor_f64_to_i64, i64_to_f64};
use crate::rng::Dice;

/// Next year's market conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Market {
    pub land_price: i64,
    pub land_profit: i64,
}

/// People lost to plague: half the population when it strikes, else zero.
///
/// # Errors
///
/// Returns `OutOfRange` if `population` is negative.
pub fn plague_casualties<D>(population: i64, dice: &mut D) -> Result<i64, TransitionError>
where
    D: Dice + ?Sized,
{
    if population < 0 {
        return Err(TransitionError::out_of_range(
            "population",
            "Must be non-negative",
        ));
    }
    if dice.roll_chance() < PLAGUE_CHANCE {
        Ok(population / 2)
    } else {
        Ok(0)
    }
}

/// Bushels eaten by rats: a share in `[0.10, 0.40)` of the store when they come.
///
/// # Errors
///
/// Returns `OutOfRange` if `bushels` is negative.
pub fn rat_infestation<D>(bushels: i64, dice: &mut D) -> Result<i64, TransitionError>
where
    D: Dice + ?Sized,
{
    if bushels < 0 {
        return Err(TransitionError::out_of_range(
            "bushels",
            "Must be non-negative",
        ));
    }
    if dice.roll_chance() >= RAT_CHANCE {
        return Ok(0);
    }
    let share = dice.roll_fraction(MIN_RAT_FRACTION, MAX_RAT_FRACTION);
    let eaten = floor_f64_to_i64(i64_to_f64(bushels) * share);
    Ok(eaten.clamp(0, bushels))
}

/// People who move to the city this year.
pub fn newcomers<D>(dice: &mut D) -> i64
where
    D: Dice + ?Sized,
{
    dice.roll_between(MIN_NEWCOMERS, MAX_NEWCOMERS)
}

/// Reroll land price and yield for the coming year.
pub fn next_market<D>(dice: &mut D) -> Market
where
    D: Dice + ?Sized,
{
    let land_price = dice.roll_between(MIN_LAND_PRICE, MAX_LAND_PRICE);
    let land_profit = dice.roll_between(MIN_LAND_PROFIT, MAX_LAND_PROFIT);
    Market {
        land_price,
        land_profit,
    }
}
