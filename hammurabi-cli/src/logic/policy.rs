use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use hammurabi_game::constants::{BUSHELS_PER_LAND, BUSHELS_PER_PERSON, LANDS_PER_PERSON};
use hammurabi_game::{GameAction, GameState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

/// Land is cheap at or below this price.
const BUY_PRICE: i64 = 19;
/// Land is dear at or above this price.
const SELL_PRICE: i64 = 24;
/// Percentage of the people the austere ruler feeds.
const AUSTERE_FED_PERCENT: i64 = 55;

/// Policy interface for automated rulers.
pub trait RulerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Choose the action for `year` given the city as it stands.
    fn decide(&mut self, year: u32, state: &GameState) -> GameAction;
}

/// Built-in rulers for automated terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RulerStrategy {
    Steward,
    Speculator,
    Austere,
    Gambler,
}

impl RulerStrategy {
    pub const ALL: [Self; 4] = [Self::Steward, Self::Speculator, Self::Austere, Self::Gambler];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Steward => "steward",
            Self::Speculator => "speculator",
            Self::Austere => "austere",
            Self::Gambler => "gambler",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn RulerPolicy + Send> {
        match self {
            Self::Steward => Box::new(StewardPolicy),
            Self::Speculator => Box::new(SpeculatorPolicy),
            Self::Austere => Box::new(AusterePolicy),
            Self::Gambler => Box::new(GamblerPolicy::new(seed)),
        }
    }
}

impl fmt::Display for RulerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RulerStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        match Self::ALL
            .into_iter()
            .find(|strategy| strategy.label().eq_ignore_ascii_case(wanted))
        {
            Some(strategy) => Ok(strategy),
            None => bail!("Unknown strategy: {wanted}"),
        }
    }
}

/// Expand strategy tokens, where `all` stands for every built-in ruler.
///
/// # Errors
///
/// Fails on the first unknown name.
pub fn resolve_strategies(tokens: &[String]) -> Result<Vec<RulerStrategy>> {
    let mut strategies: Vec<RulerStrategy> = Vec::new();
    for token in tokens {
        let expanded = if token.eq_ignore_ascii_case("all") {
            RulerStrategy::ALL.to_vec()
        } else {
            vec![token.parse()?]
        };
        for strategy in expanded {
            if !strategies.contains(&strategy) {
                strategies.push(strategy);
            }
        }
    }
    Ok(strategies)
}

struct StewardPolicy;
struct SpeculatorPolicy;
struct AusterePolicy;

struct GamblerPolicy {
    rng: ChaCha20Rng,
}

impl GamblerPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl RulerPolicy for StewardPolicy {
    fn name(&self) -> &'static str {
        "steward"
    }

    fn decide(&mut self, _year: u32, state: &GameState) -> GameAction {
        let people = state.population;
        affordable_plan(state, cover_shortfall(state, people), people)
    }
}

impl RulerPolicy for SpeculatorPolicy {
    fn name(&self) -> &'static str {
        "speculator"
    }

    fn decide(&mut self, _year: u32, state: &GameState) -> GameAction {
        let lands_to_buy = if state.land_price <= BUY_PRICE {
            let reserve = state.full_ration() + state.farmable_lands() * BUSHELS_PER_LAND;
            let surplus = (state.bushels - reserve).max(0);
            surplus / 2 / state.land_price.max(1)
        } else if state.land_price >= SELL_PRICE {
            -((state.lands - state.farmable_lands()).max(0) / 2)
        } else {
            cover_shortfall(state, state.population)
        };
        affordable_plan(state, lands_to_buy, state.population)
    }
}

impl RulerPolicy for AusterePolicy {
    fn name(&self) -> &'static str {
        "austere"
    }

    fn decide(&mut self, _year: u32, state: &GameState) -> GameAction {
        // Rounded up, so the starved share never exceeds the revolt threshold.
        let people = (state.population * AUSTERE_FED_PERCENT + 99) / 100;
        affordable_plan(state, cover_shortfall(state, people), people)
    }
}

impl RulerPolicy for GamblerPolicy {
    fn name(&self) -> &'static str {
        "gambler"
    }

    fn decide(&mut self, _year: u32, state: &GameState) -> GameAction {
        let max_buy = (state.bushels / state.land_price.max(1) / 4).max(0);
        let max_sell = (state.lands / 10).max(0);
        let lands_to_buy = self.rng.gen_range(-max_sell..=max_buy);
        let population = state.population.max(0);
        let people = self.rng.gen_range(population * 6 / 10..=population);
        affordable_plan(state, lands_to_buy, people)
    }
}

/// Acres to sell (as a non-positive purchase) so the store covers rations for
/// `people` plus seed for the acres they can farm. Only land nobody can farm
/// is sold.
fn cover_shortfall(state: &GameState, people: i64) -> i64 {
    let fed = people.clamp(0, state.population.max(0));
    let farmed = (fed / LANDS_PER_PERSON).min(state.lands);
    let needed = fed * BUSHELS_PER_PERSON + farmed * BUSHELS_PER_LAND;
    let shortfall = needed - state.bushels;
    if shortfall <= 0 {
        return 0;
    }
    let price = state.land_price.max(1);
    let spare = (state.lands - farmed).max(0);
    -((shortfall + price - 1) / price).min(spare)
}

/// Trade `lands_to_buy`, feed up to `people` whole rations, then seed as much
/// as the fed people and the remaining store allow.
fn affordable_plan(state: &GameState, lands_to_buy: i64, people: i64) -> GameAction {
    let bushels = (state.bushels - state.land_price * lands_to_buy).max(0);
    let lands = (state.lands + lands_to_buy).max(0);

    let fed = people
        .clamp(0, state.population.max(0))
        .min(bushels / BUSHELS_PER_PERSON);
    let bushels_to_feed = fed * BUSHELS_PER_PERSON;

    let store = bushels - bushels_to_feed;
    let lands_to_seed = (fed / LANDS_PER_PERSON)
        .min(lands)
        .min(store / BUSHELS_PER_LAND);

    GameAction::new(lands_to_buy, bushels_to_feed, lands_to_seed)
}
