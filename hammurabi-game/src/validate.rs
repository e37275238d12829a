//! Pure checks of an action against a state. Each check owns one concern and
//! reports only the first constraint it finds violated.

use crate::constants::{BUSHELS_PER_LAND, BUSHELS_PER_PERSON, UPRISING_THRESHOLD};
use crate::error::TransitionError;
use crate::state::{GameAction, GameState};

/// Field-level sanity of the action itself.
///
/// # Errors
///
/// Returns `OutOfRange` when a feeding or seeding amount is negative.
pub fn validate_shape(action: &GameAction) -> Result<(), TransitionError> {
    if action.bushels_to_feed < 0 {
        return Err(TransitionError::out_of_range(
            "bushels_to_feed",
            "Must be non-negative",
        ));
    }
    if action.lands_to_seed < 0 {
        return Err(TransitionError::out_of_range(
            "lands_to_seed",
            "Must be non-negative",
        ));
    }
    Ok(())
}

/// Counts and prices a turn can start from.
///
/// # Errors
///
/// Returns `OutOfRange` for a negative bushel, population, acre or yield
/// count, or a land price that is not positive.
pub fn validate_state(state: &GameState) -> Result<(), TransitionError> {
    let counts = [
        ("bushels", state.bushels),
        ("population", state.population),
        ("lands", state.lands),
        ("land_profit", state.land_profit),
    ];
    for (field, value) in counts {
        if value < 0 {
            return Err(TransitionError::out_of_range(field, "Must be non-negative"));
        }
    }
    if state.land_price <= 0 {
        return Err(TransitionError::out_of_range("land_price", "Must be positive"));
    }
    Ok(())
}

/// Store and acreage once the land trade has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandTrade {
    pub bushels: i64,
    pub lands: i64,
}

/// Buying needs the bushels, selling needs the acres.
///
/// # Errors
///
/// Returns `InsufficientLandsToSell` or `InsufficientBushelsToBuyLands`, or
/// `OutOfRange` when the trade does not fit in the counters at all.
pub fn validate_land_trade(
    state: &GameState,
    action: &GameAction,
) -> Result<LandTrade, TransitionError> {
    let too_large = || TransitionError::out_of_range("lands_to_buy", "Trade is too large");

    let lands = state.lands.checked_add(action.lands_to_buy).ok_or_else(too_large)?;
    if action.lands_to_buy < 0 && lands < 0 {
        return Err(TransitionError::InsufficientLandsToSell {
            current_lands: state.lands,
            requested_lands: action.lands_to_buy.checked_neg().ok_or_else(too_large)?,
        });
    }

    let cost = state
        .land_price
        .checked_mul(action.lands_to_buy)
        .ok_or_else(too_large)?;
    let bushels = state.bushels.checked_sub(cost).ok_or_else(too_large)?;
    if action.lands_to_buy > 0 && bushels < 0 {
        return Err(TransitionError::InsufficientBushelsToBuyLands {
            current_bushels: state.bushels,
            required_bushels: cost,
        });
    }
    Ok(LandTrade { bushels, lands })
}

/// Bushels to feed, capped at what the whole population can eat.
#[must_use]
pub fn capped_feeding(state: &GameState, action: &GameAction) -> i64 {
    state.full_ration().min(action.bushels_to_feed)
}

/// Feeding beyond the full ration is capped, never refused.
///
/// # Errors
///
/// Returns `InsufficientBushelsToFeed` when the capped amount exceeds the store.
pub fn validate_feeding(state: &GameState, action: &GameAction) -> Result<(), TransitionError> {
    let requested_bushels = capped_feeding(state, action);
    if requested_bushels > state.bushels {
        return Err(TransitionError::InsufficientBushelsToFeed {
            current_bushels: state.bushels,
            requested_bushels,
        });
    }
    Ok(())
}

/// Acres that will actually be seeded: the request bounded by labor and land.
#[must_use]
pub fn capped_seeding(state: &GameState, action: &GameAction) -> i64 {
    state.farmable_lands().min(action.lands_to_seed)
}

/// Seeding beyond what can be farmed is capped, never refused.
///
/// # Errors
///
/// Returns `InsufficientBushelsToSeed` when the seed cost exceeds the store.
pub fn validate_seeding(state: &GameState, action: &GameAction) -> Result<(), TransitionError> {
    let requested_bushels = capped_seeding(state, action).saturating_mul(BUSHELS_PER_LAND);
    if state.bushels < requested_bushels {
        return Err(TransitionError::InsufficientBushelsToSeed {
            current_bushels: state.bushels,
            requested_bushels,
        });
    }
    Ok(())
}

/// Whether starving `starved` out of `population` pre-turn people triggers a revolt.
///
/// # Errors
///
/// Returns `OutOfRange` for a negative population, a negative starved count,
/// or more starved than there were people.
pub fn is_uprising(population: i64, starved: i64) -> Result<bool, TransitionError> {
    if population < 0 {
        return Err(TransitionError::out_of_range(
            "population",
            "Must be non-negative",
        ));
    }
    if starved < 0 {
        return Err(TransitionError::out_of_range(
            "people_starved",
            "Must be non-negative",
        ));
    }
    if starved > population {
        return Err(TransitionError::out_of_range(
            "people_starved",
            format!("Must not exceed population {population}"),
        ));
    }
    Ok(crate::numbers::ratio(starved, population) > UPRISING_THRESHOLD)
}

/// People fed by the capped ration; a partial ration feeds nobody.
#[must_use]
pub fn people_fed(state: &GameState, action: &GameAction) -> i64 {
    capped_feeding(state, action) / BUSHELS_PER_PERSON
}
