use serde::Serialize;
use thiserror::Error;

/// Payload of the game-ending revolt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Uprising {
    pub year: u32,
    pub people_starved: i64,
    /// Starved share of the pre-turn population, in percent.
    pub percentage: f32,
}

/// Reasons a transition is refused. The prior state is never modified.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransitionError {
    #[error("Game state is missing.")]
    NilState,
    #[error("Game action is missing.")]
    NilAction,
    #[error("Value of '{field}' is out of range. Reason: {reason}.")]
    OutOfRange { field: &'static str, reason: String },
    #[error(
        "Insufficient lands to sell. Having {current_lands} acres of land but requested to sell {requested_lands} acres."
    )]
    InsufficientLandsToSell {
        current_lands: i64,
        requested_lands: i64,
    },
    #[error(
        "Insufficient bushels to buy lands. Having {current_bushels} bushels but required {required_bushels} bushels to buy."
    )]
    InsufficientBushelsToBuyLands {
        current_bushels: i64,
        required_bushels: i64,
    },
    #[error(
        "Insufficient bushels to feed people. Having {current_bushels} bushels but requested {requested_bushels} bushels to feed."
    )]
    InsufficientBushelsToFeed {
        current_bushels: i64,
        requested_bushels: i64,
    },
    #[error(
        "Insufficient bushels to seed. Having {current_bushels} bushels but requested {requested_bushels} bushels to seed."
    )]
    InsufficientBushelsToSeed {
        current_bushels: i64,
        requested_bushels: i64,
    },
    #[error(
        "In year {year}, you starved {people_starved} people ({percentage:.2}% of the population). The people overthrew you."
    )]
    Uprising {
        year: u32,
        people_starved: i64,
        percentage: f32,
    },
}

impl TransitionError {
    pub(crate) fn out_of_range(field: &'static str, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            field,
            reason: reason.into(),
        }
    }

    /// The player may submit a new action for the same year.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::OutOfRange { .. }
                | Self::InsufficientLandsToSell { .. }
                | Self::InsufficientBushelsToBuyLands { .. }
                | Self::InsufficientBushelsToFeed { .. }
                | Self::InsufficientBushelsToSeed { .. }
        )
    }

    /// The session cannot continue.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.is_retryable()
    }

    #[must_use]
    pub fn uprising(&self) -> Option<Uprising> {
        match self {
            Self::Uprising {
                year,
                people_starved,
                percentage,
            } => Some(Uprising {
                year: *year,
                people_starved: *people_starved,
                percentage: *percentage,
            }),
            _ => None,
        }
    }

    /// Stable snake_case identifier for machine-readable output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NilState => "nil_state",
            Self::NilAction => "nil_action",
            Self::OutOfRange { .. } => "out_of_range",
            Self::InsufficientLandsToSell { .. } => "insufficient_lands_to_sell",
            Self::InsufficientBushelsToBuyLands { .. } => "insufficient_bushels_to_buy_lands",
            Self::InsufficientBushelsToFeed { .. } => "insufficient_bushels_to_feed",
            Self::InsufficientBushelsToSeed { .. } => "insufficient_bushels_to_seed",
            Self::Uprising { .. } => "uprising",
        }
    }
}

impl From<Uprising> for TransitionError {
    fn from(value: Uprising) -> Self {
        Self::Uprising {
            year: value.year,
            people_starved: value.people_starved,
            percentage: value.percentage,
        }
    }
}
