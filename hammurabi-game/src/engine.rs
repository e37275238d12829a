//! Per-year state transition.
//!
//! `transition` works on a copy of the state. Every deterministic step is
//! validated before it touches the copy, and the world events only roll once
//! all validation has passed, so a refused action neither changes the state
//! nor consumes any dice rolls.

use serde::{Deserialize, Serialize};

use crate::constants::{BUSHELS_PER_LAND, BUSHELS_PER_PERSON};
use crate::error::TransitionError;
use crate::events::{newcomers, next_market, plague_casualties, rat_infestation};
use crate::numbers::{clamp_f64_to_f32, ratio};
use crate::rng::Dice;
use crate::state::{GameAction, GameState, StateDelta};
use crate::validate::{
    capped_seeding, is_uprising, people_fed, validate_feeding, validate_land_trade,
    validate_seeding, validate_shape, validate_state,
};

/// Outcome of one successful year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Year the city is now in.
    pub year: u32,
    pub state: GameState,
    pub delta: StateDelta,
}

/// Advance `state` by one year under `action`.
///
/// # Errors
///
/// Returns `OutOfRange` for a state breaking its own invariants or a year
/// with no successor, then the first failed validation of `action`, or
/// `Uprising` when more than 45% of the pre-turn population starves. `state`
/// is never modified.
pub fn transition<D>(
    year: u32,
    state: &GameState,
    action: &GameAction,
    dice: &mut D,
) -> Result<Turn, TransitionError>
where
    D: Dice + ?Sized,
{
    validate_state(state)?;
    let next_year = year
        .checked_add(1)
        .ok_or_else(|| TransitionError::out_of_range("year", "No year follows it"))?;
    validate_shape(action)?;

    let mut next = *state;
    let mut delta = StateDelta::default();

    // Land trade at this year's price.
    let trade = validate_land_trade(&next, action)?;
    next.bushels = trade.bushels;
    next.lands = trade.lands;

    // Feeding: whoever misses a full ration starves.
    validate_feeding(&next, action)?;
    let fed = people_fed(&next, action);
    next.bushels -= fed * BUSHELS_PER_PERSON;
    next.population = fed;
    delta.people_starved = state.population - next.population;

    if is_uprising(state.population, delta.people_starved)? {
        let percentage = clamp_f64_to_f32(ratio(delta.people_starved, state.population) * 100.0);
        log::warn!(
            "uprising in year {year}: {} of {} starved",
            delta.people_starved,
            state.population
        );
        return Err(TransitionError::Uprising {
            year,
            people_starved: delta.people_starved,
            percentage,
        });
    }

    // Seeding and harvest at this year's yield, net of seed cost.
    validate_seeding(&next, action)?;
    let lands_harvested = capped_seeding(&next, action);
    next.bushels = lands_harvested
        .checked_mul(state.land_profit - BUSHELS_PER_LAND)
        .and_then(|harvest| next.bushels.checked_add(harvest))
        .ok_or_else(|| TransitionError::out_of_range("land_profit", "Harvest is too large"))?;

    // World events.
    delta.people_killed = plague_casualties(next.population, dice)?;
    delta.has_plague = delta.people_killed != 0;
    next.population -= delta.people_killed;

    delta.bushels_infested = rat_infestation(next.bushels, dice)?;
    delta.has_rat = delta.bushels_infested != 0;
    next.bushels -= delta.bushels_infested;

    delta.people_added = newcomers(dice);
    next.population += delta.people_added;

    let market = next_market(dice);
    next.land_price = market.land_price;
    next.land_profit = market.land_profit;

    log::debug!(
        "year {year} -> {next_year}: population {} -> {}, bushels {} -> {}, lands {} -> {}",
        state.population,
        next.population,
        state.bushels,
        next.bushels,
        state.lands,
        next.lands
    );

    Ok(Turn {
        year: next_year,
        state: next,
        delta,
    })
}

/// Stateless form of a turn, as received from an outside caller.
///
/// Either half may be absent on the wire; absence is reported as
/// `NilState` / `NilAction` before anything else is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnRequest {
    #[serde(default = "TurnRequest::default_year")]
    pub year: u32,
    #[serde(default)]
    pub state: Option<GameState>,
    #[serde(default)]
    pub action: Option<GameAction>,
}

impl TurnRequest {
    const fn default_year() -> u32 {
        crate::constants::INITIAL_YEAR
    }

    /// Resolve the request against `dice`.
    ///
    /// # Errors
    ///
    /// Returns `NilState`, `NilAction`, or any error from [`transition`].
    pub fn resolve<D>(&self, dice: &mut D) -> Result<Turn, TransitionError>
    where
        D: Dice + ?Sized,
    {
        let state = self.state.as_ref().ok_or(TransitionError::NilState)?;
        let action = self.action.as_ref().ok_or(TransitionError::NilAction)?;
        transition(self.year, state, action, dice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedDice;

    fn calm() -> ScriptedDice {
        ScriptedDice::constant(0.999)
    }

    #[test]
    fn opening_turn_with_full_rations_and_calm_year() {
        let state = GameState::initial();
        let action = GameAction::new(0, 2_000, 1_000);
        let turn = transition(1, &state, &action, &mut calm()).expect("valid turn");

        assert_eq!(turn.year, 2);
        assert_eq!(turn.delta.people_starved, 0);
        assert!(!turn.delta.has_plague);
        assert!(!turn.delta.has_rat);
        assert_eq!(turn.delta.people_added, 5);
        assert_eq!(turn.state.population, 105);
        // 2800 - 2000 eaten + 10 acres * (3 - 1)
        assert_eq!(turn.state.bushels, 820);
        assert_eq!(turn.state.land_price, 26);
        assert_eq!(turn.state.land_profit, 6);
    }

    #[test]
    fn harsh_year_applies_plague_and_rats() {
        let state = GameState::initial();
        let action = GameAction::new(0, 2_000, 1_000);
        let mut dice = ScriptedDice::constant(0.0);
        let turn = transition(1, &state, &action, &mut dice).expect("valid turn");

        assert!(turn.delta.has_plague);
        assert_eq!(turn.delta.people_killed, 50);
        assert!(turn.delta.has_rat);
        assert_eq!(turn.delta.bushels_infested, 82);
        assert_eq!(turn.delta.people_added, 2);
        assert_eq!(turn.state.population, 52);
        assert_eq!(turn.state.bushels, 738);
        assert_eq!(turn.state.land_price, 17);
        assert_eq!(turn.state.land_profit, 1);
        assert_eq!(dice.rolls(), 6);
    }

    #[test]
    fn land_trade_moves_bushels_at_current_price() {
        let state = GameState::initial();
        let bought = transition(1, &state, &GameAction::new(10, 2_000, 0), &mut calm())
            .expect("affordable purchase");
        assert_eq!(bought.state.lands, 1_010);
        assert_eq!(bought.state.bushels, 2_800 - 220 - 2_000);

        let sold = transition(1, &state, &GameAction::new(-100, 2_000, 0), &mut calm())
            .expect("owned land sells");
        assert_eq!(sold.state.lands, 900);
        assert_eq!(sold.state.bushels, 2_800 + 2_200 - 2_000);
    }

    #[test]
    fn refused_action_rolls_no_dice() {
        let state = GameState {
            bushels: 100,
            land_price: 20,
            ..GameState::initial()
        };
        let mut dice = ScriptedDice::constant(0.0);
        let err = transition(4, &state, &GameAction::new(100, 0, 0), &mut dice).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InsufficientBushelsToBuyLands {
                current_bushels: 100,
                required_bushels: 2_000,
            }
        );
        assert_eq!(dice.rolls(), 0);
    }

    #[test]
    fn starvation_at_threshold_is_tolerated() {
        let state = GameState::initial();
        let action = GameAction::new(0, 55 * BUSHELS_PER_PERSON, 0);
        let turn = transition(1, &state, &action, &mut calm()).expect("45% is not a revolt");
        assert_eq!(turn.delta.people_starved, 45);
    }

    #[test]
    fn starvation_above_threshold_is_an_uprising() {
        let state = GameState::initial();
        let action = GameAction::new(0, 54 * BUSHELS_PER_PERSON, 0);
        let mut dice = calm();
        let err = transition(7, &state, &action, &mut dice).unwrap_err();
        let uprising = err.uprising().expect("uprising");
        assert_eq!(uprising.year, 7);
        assert_eq!(uprising.people_starved, 46);
        assert!((uprising.percentage - 46.0).abs() < 1e-4);
        assert_eq!(dice.rolls(), 0);
    }

    #[test]
    fn seeding_validates_after_feeding() {
        let state = GameState {
            bushels: 2_005,
            ..GameState::initial()
        };
        let err = transition(1, &state, &GameAction::new(0, 2_000, 10), &mut calm()).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InsufficientBushelsToSeed {
                current_bushels: 5,
                requested_bushels: 10,
            }
        );
    }

    #[test]
    fn extreme_sale_is_refused_without_rolling() {
        let mut dice = calm();
        let action = GameAction::new(i64::MIN, 2_000, 0);
        let err = transition(1, &GameState::initial(), &action, &mut dice).unwrap_err();
        assert!(matches!(err, TransitionError::OutOfRange { field: "lands_to_buy", .. }));
        assert!(err.is_retryable());
        assert_eq!(dice.rolls(), 0);
    }

    #[test]
    fn broken_state_is_refused() {
        let landless = GameState {
            lands: -5,
            population: 0,
            bushels: 100,
            ..GameState::initial()
        };
        let err = transition(1, &landless, &GameAction::default(), &mut calm()).unwrap_err();
        assert!(matches!(err, TransitionError::OutOfRange { field: "lands", .. }));

        let negative_price = GameState {
            land_price: -20,
            bushels: 100,
            ..GameState::initial()
        };
        let err = transition(1, &negative_price, &GameAction::new(50, 0, 0), &mut calm())
            .unwrap_err();
        assert!(matches!(err, TransitionError::OutOfRange { field: "land_price", .. }));
    }

    #[test]
    fn last_representable_year_has_no_successor() {
        let state = GameState::initial();
        let action = GameAction::new(0, 2_000, 0);
        let mut dice = calm();
        let err = transition(u32::MAX, &state, &action, &mut dice).unwrap_err();
        assert!(matches!(err, TransitionError::OutOfRange { field: "year", .. }));
        assert_eq!(dice.rolls(), 0);

        let turn = transition(u32::MAX - 1, &state, &action, &mut calm())
            .expect("second to last year advances");
        assert_eq!(turn.year, u32::MAX);
    }

    #[test]
    fn oversized_harvest_is_refused() {
        let state = GameState {
            bushels: 5_000,
            population: 100,
            lands: 10,
            land_price: 22,
            land_profit: i64::MAX / 4,
        };
        let err = transition(1, &state, &GameAction::new(0, 2_000, 10), &mut calm()).unwrap_err();
        assert!(matches!(err, TransitionError::OutOfRange { field: "land_profit", .. }));
    }

    #[test]
    fn request_with_broken_state_is_refused() {
        let request: TurnRequest = serde_json::from_str(
            r#"{"state": {"lands": -5, "population": 0, "bushels": 100, "land_price": 22},
               "action": {}}"#,
        )
        .expect("deserialize");
        assert!(matches!(
            request.resolve(&mut calm()),
            Err(TransitionError::OutOfRange { field: "lands", .. })
        ));
    }

    #[test]
    fn request_reports_missing_halves() {
        let missing_state = TurnRequest {
            action: Some(GameAction::default()),
            ..TurnRequest::default()
        };
        assert_eq!(
            missing_state.resolve(&mut calm()),
            Err(TransitionError::NilState)
        );

        let missing_action = TurnRequest {
            state: Some(GameState::initial()),
            ..TurnRequest::default()
        };
        assert_eq!(
            missing_action.resolve(&mut calm()),
            Err(TransitionError::NilAction)
        );
    }

    #[test]
    fn request_parses_from_json() {
        let request: TurnRequest = serde_json::from_str(
            r#"{"state": {"bushels": 2800, "population": 100, "lands": 1000,
                "land_price": 22, "land_profit": 3},
               "action": {"bushels_to_feed": 2000, "lands_to_seed": 10}}"#,
        )
        .expect("deserialize");
        assert_eq!(request.year, 1);
        let turn = request.resolve(&mut calm()).expect("valid turn");
        assert_eq!(turn.year, 2);
    }
}
