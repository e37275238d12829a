//! Resource state, player action and per-turn delta.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BUSHELS_PER_PERSON, INITIAL_BUSHELS, INITIAL_BUSHELS_INFESTED, INITIAL_LAND_PRICE,
    INITIAL_LAND_PROFIT, INITIAL_LANDS, INITIAL_PEOPLE_ADDED, INITIAL_POPULATION,
    LANDS_PER_PERSON,
};

/// Current resources of the city. Replaced wholesale on every successful turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameState {
    /// Stored grain.
    #[serde(default)]
    pub bushels: i64,
    /// Number of people.
    #[serde(default)]
    pub population: i64,
    /// Acres owned.
    #[serde(default)]
    pub lands: i64,
    /// Bushels per acre when trading land this year.
    #[serde(default)]
    pub land_price: i64,
    /// Bushels harvested per seeded acre this year.
    #[serde(default)]
    pub land_profit: i64,
}

impl GameState {
    /// Fixed opening state of every new game.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            bushels: INITIAL_BUSHELS,
            population: INITIAL_POPULATION,
            lands: INITIAL_LANDS,
            land_price: INITIAL_LAND_PRICE,
            land_profit: INITIAL_LAND_PROFIT,
        }
    }

    /// Bushels needed to feed the whole population for a year.
    #[must_use]
    pub const fn full_ration(&self) -> i64 {
        self.population.saturating_mul(BUSHELS_PER_PERSON)
    }

    /// Acres the current population can farm, bounded by owned land.
    #[must_use]
    pub fn farmable_lands(&self) -> i64 {
        (self.population / LANDS_PER_PERSON).min(self.lands)
    }
}

/// Player intent for one year. Consumed by a single transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameAction {
    /// Positive buys, negative sells, zero skips the market.
    #[serde(default)]
    pub lands_to_buy: i64,
    #[serde(default)]
    pub bushels_to_feed: i64,
    #[serde(default)]
    pub lands_to_seed: i64,
}

impl GameAction {
    #[must_use]
    pub const fn new(lands_to_buy: i64, bushels_to_feed: i64, lands_to_seed: i64) -> Self {
        Self {
            lands_to_buy,
            bushels_to_feed,
            lands_to_seed,
        }
    }
}

/// Summary of what happened during one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateDelta {
    pub people_starved: i64,
    pub people_killed: i64,
    pub people_added: i64,
    pub bushels_infested: i64,
    pub has_rat: bool,
    pub has_plague: bool,
}

impl StateDelta {
    /// Report shown before the first turn: the previous ruler's last year.
    #[must_use]
    pub const fn opening() -> Self {
        Self {
            people_starved: 0,
            people_killed: 0,
            people_added: INITIAL_PEOPLE_ADDED,
            bushels_infested: INITIAL_BUSHELS_INFESTED,
            has_rat: true,
            has_plague: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_matches_opening_values() {
        let state = GameState::initial();
        assert_eq!(state.bushels, 2_800);
        assert_eq!(state.population, 100);
        assert_eq!(state.lands, 1_000);
        assert_eq!(state.land_price, 22);
        assert_eq!(state.land_profit, 3);
    }

    #[test]
    fn farmable_lands_bounded_by_labor_and_land() {
        let labor_bound = GameState {
            population: 25,
            lands: 1_000,
            ..GameState::default()
        };
        assert_eq!(labor_bound.farmable_lands(), 2);

        let land_bound = GameState {
            population: 1_000,
            lands: 10,
            ..GameState::default()
        };
        assert_eq!(land_bound.farmable_lands(), 10);
    }

    #[test]
    fn opening_delta_reports_rats_and_newcomers() {
        let delta = StateDelta::opening();
        assert!(delta.has_rat);
        assert!(!delta.has_plague);
        assert_eq!(delta.people_added, 5);
        assert_eq!(delta.bushels_infested, 200);
    }

    #[test]
    fn action_missing_fields_default_to_zero() {
        let action: GameAction =
            serde_json::from_str(r#"{"bushels_to_feed": 40}"#).expect("deserialize");
        assert_eq!(action, GameAction::new(0, 40, 0));
    }
}
