//! Hammurabi Game Engine
//!
//! Platform-agnostic core of the Hammurabi city management game: the
//! per-year transition engine, its validators and the randomized world
//! events. This crate has no terminal, network or storage dependencies.

pub mod constants;
pub mod engine;
pub mod error;
pub mod events;
pub mod numbers;
pub mod rng;
pub mod session;
pub mod state;
pub mod validate;

// Re-export commonly used types
pub use engine::{Turn, TurnRequest, transition};
pub use error::{TransitionError, Uprising};
pub use events::{Market, newcomers, next_market, plague_casualties, rat_infestation};
pub use rng::{CountingRng, Dice, ScriptedDice, derive_stream_seed, seeded_rng};
pub use session::Game;
pub use state::{GameAction, GameState, StateDelta};
pub use validate::{
    LandTrade, is_uprising, validate_feeding, validate_land_trade, validate_seeding,
    validate_shape, validate_state,
};

/// Start a new term of `max_years` years.
#[must_use]
pub const fn new_game(max_years: u32) -> Game {
    Game::new(max_years)
}
