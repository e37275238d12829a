use crate::constants::INITIAL_YEAR;
use crate::engine::{Turn, transition};
use crate::error::{TransitionError, Uprising};
use crate::rng::Dice;
use crate::state::{GameAction, GameState, StateDelta};

/// One ruler's term: the current year, resources and last report.
///
/// The session owns its state exclusively; callers drive it one year at a
/// time and must not run two transitions on the same session concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    year: u32,
    max_years: u32,
    state: GameState,
    last_delta: StateDelta,
    staged: Option<GameAction>,
    uprising: Option<Uprising>,
}

impl Game {
    /// Start a new term. `max_years` is advisory: the session never refuses
    /// a year past it, callers decide when the term is over.
    #[must_use]
    pub const fn new(max_years: u32) -> Self {
        Self {
            year: INITIAL_YEAR,
            max_years,
            state: GameState::initial(),
            last_delta: StateDelta::opening(),
            staged: None,
            uprising: None,
        }
    }

    #[must_use]
    pub const fn year(&self) -> u32 {
        self.year
    }

    #[must_use]
    pub const fn max_years(&self) -> u32 {
        self.max_years
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Report of the most recent year (the opening report before the first turn).
    #[must_use]
    pub const fn last_delta(&self) -> &StateDelta {
        &self.last_delta
    }

    #[must_use]
    pub const fn staged(&self) -> Option<&GameAction> {
        self.staged.as_ref()
    }

    /// The revolt that ended the session, if any.
    #[must_use]
    pub const fn uprising(&self) -> Option<&Uprising> {
        self.uprising.as_ref()
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.uprising.is_some()
    }

    /// Every year of the term has been played.
    #[must_use]
    pub const fn term_complete(&self) -> bool {
        self.year > self.max_years
    }

    /// Hold `action` for the current year, replacing any earlier one.
    pub const fn stage(&mut self, action: GameAction) {
        self.staged = Some(action);
    }

    /// Play the current year with the staged action.
    ///
    /// # Errors
    ///
    /// Returns `NilAction` when nothing is staged, the recorded `Uprising`
    /// once the session has ended, or any error from [`transition`]. On
    /// error the year and state are left untouched and the staged action is
    /// dropped so the caller asks for a new one.
    pub fn advance<D>(&mut self, dice: &mut D) -> Result<Turn, TransitionError>
    where
        D: Dice + ?Sized,
    {
        let staged = self.staged.take();
        if let Some(uprising) = self.uprising {
            return Err(uprising.into());
        }
        let action = staged.ok_or(TransitionError::NilAction)?;
        match transition(self.year, &self.state, &action, dice) {
            Ok(turn) => {
                self.year = turn.year;
                self.state = turn.state;
                self.last_delta = turn.delta;
                Ok(turn)
            }
            Err(err) => {
                if let Some(uprising) = err.uprising() {
                    self.uprising = Some(uprising);
                }
                Err(err)
            }
        }
    }

    /// Stage `action` and play the current year with it.
    ///
    /// # Errors
    ///
    /// See [`Game::advance`].
    pub fn submit<D>(&mut self, action: GameAction, dice: &mut D) -> Result<Turn, TransitionError>
    where
        D: Dice + ?Sized,
    {
        self.stage(action);
        self.advance(dice)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_TERM_YEARS)
    }
}
