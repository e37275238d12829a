//! Interactive term: report, prompt, resolve, repeat.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use hammurabi_game::{Dice, Game, GameState, Uprising};

use super::input::parse_action;
use super::render;

/// How an interactive term ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayOutcome {
    Served(GameState),
    Overthrown(Uprising),
    /// Input ran out before the term was over.
    Abandoned { year: u32 },
}

/// Drive `game` from `input` until the term is served, the people revolt
/// or the input ends.
///
/// Unreadable lines and refused actions replay the same year.
///
/// # Errors
///
/// Returns an error only when reading input or writing output fails.
pub fn play<D>(
    game: &mut Game,
    dice: &mut D,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<PlayOutcome>
where
    D: Dice + ?Sized,
{
    render::intro(out, game.max_years())?;
    loop {
        if game.term_complete() {
            render::term_served(out, game.max_years(), game.state())?;
            return Ok(PlayOutcome::Served(*game.state()));
        }

        render::report(out, game.year(), game.state(), game.last_delta())?;
        render::action_prompt(out)?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("failed to read action")?;
        if read == 0 {
            log::info!("input closed in year {}", game.year());
            return Ok(PlayOutcome::Abandoned { year: game.year() });
        }

        let action = match parse_action(&line) {
            Ok(action) => action,
            Err(err) => {
                writeln!(out, "{err}")?;
                writeln!(out, "{}", render::RETRY_PROMPT)?;
                continue;
            }
        };

        writeln!(out)?;
        let year = game.year();
        match game.submit(action, dice) {
            Ok(turn) => log::debug!("year {year} resolved: {:?}", turn.delta),
            Err(err) => {
                if let Some(uprising) = err.uprising() {
                    render::overthrown(out, &uprising)?;
                    return Ok(PlayOutcome::Overthrown(uprising));
                }
                render::refusal(out, &err)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hammurabi_game::ScriptedDice;
    use std::io::Cursor;

    fn run(years: u32, script: &str) -> (PlayOutcome, Game, String) {
        let mut game = Game::new(years);
        let mut dice = ScriptedDice::constant(0.999);
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out: Vec<u8> = Vec::new();
        let outcome = play(&mut game, &mut dice, &mut input, &mut out).expect("play");
        (outcome, game, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn one_year_term_is_served() {
        let (outcome, game, text) = run(1, "0 2000 1000\n");
        assert!(matches!(outcome, PlayOutcome::Served(_)));
        assert_eq!(game.year(), 2);
        assert!(text.contains("elected for 1-year term"));
        assert!(text.contains("term of office is over"));
    }

    #[test]
    fn unreadable_line_replays_the_year() {
        let (outcome, game, text) = run(1, "plenty of grain\n0 2000 0\n");
        assert!(matches!(outcome, PlayOutcome::Served(_)));
        assert_eq!(game.year(), 2);
        assert!(text.contains("'plenty' is not a whole number."));
        assert!(text.contains(render::RETRY_PROMPT));
        assert_eq!(text.matches("In Year 1,").count(), 2);
    }

    #[test]
    fn refused_action_replays_the_year() {
        let (outcome, game, text) = run(1, "5000 0 0\n0 2000 0\n");
        assert!(matches!(outcome, PlayOutcome::Served(_)));
        assert_eq!(game.year(), 2);
        assert!(text.contains("surely you jest"));
        assert!(text.contains("Insufficient bushels to buy lands"));
    }

    #[test]
    fn starving_the_city_ends_the_term() {
        let (outcome, game, text) = run(10, "0 0 0\n0 2000 0\n");
        let PlayOutcome::Overthrown(uprising) = outcome else {
            panic!("expected an uprising, got {outcome:?}");
        };
        assert_eq!(uprising.people_starved, 100);
        assert!(game.is_over());
        assert!(text.contains("National Fink"));
    }

    #[test]
    fn impossible_sale_is_refused_and_the_year_replayed() {
        let (outcome, game, text) = run(1, "-9223372036854775808 2000 0\n0 2000 0\n");
        assert!(matches!(outcome, PlayOutcome::Served(_)));
        assert_eq!(game.year(), 2);
        assert!(text.contains("lands_to_buy"));
    }

    #[test]
    fn closed_input_abandons_the_term() {
        let (outcome, _, _) = run(10, "0 2000 0\n");
        assert_eq!(outcome, PlayOutcome::Abandoned { year: 2 });
    }
}
