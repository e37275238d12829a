//! Text the ruler sees: the term introduction and the yearly report.

use std::io::{self, Write};

use colored::Colorize;
use hammurabi_game::constants::{BUSHELS_PER_LAND, BUSHELS_PER_PERSON, LANDS_PER_PERSON};
use hammurabi_game::{GameState, StateDelta, TransitionError, Uprising};

pub const RETRY_PROMPT: &str = "Once again?";
pub const JEST: &str =
    "O Great Hammurabi, surely you jest! We seem to have problem understanding your decisions!";
pub const IMPEACHED: &str = "Due to this extreme mismanagement, you have not only been impeached and thrown out of office, but you have also been declared 'National Fink'!";

pub fn intro(out: &mut dyn Write, term_years: u32) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "Congratulations, you are the newest ruler of ancient Samaria, elected for {term_years}-year term of office. Your duties are to dispense food,"
    )?;
    writeln!(
        out,
        "direct farming, and buy and sell land as needed to support your people. Watch out for rat infestations and the plague! Grain is the general"
    )?;
    writeln!(
        out,
        "currency, measured in bushels. The following will help you in your decisions:"
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "- Each person needs at least {BUSHELS_PER_PERSON} bushels of grain per year to survive."
    )?;
    writeln!(
        out,
        "- Each person can farm at most {LANDS_PER_PERSON} acres of land."
    )?;
    writeln!(
        out,
        "- It takes {BUSHELS_PER_LAND} bushel of grain to farm an acre of land."
    )?;
    writeln!(out, "- The market price for land fluctuates yearly.")?;
    writeln!(out)?;
    writeln!(
        out,
        "Rule wisely and you will be showered with appreciation at the end of your term. Rule poorly and you will be kicked out of office!"
    )
}

/// Report for `year`, describing the year that led to `state`.
pub fn report(
    out: &mut dyn Write,
    year: u32,
    state: &GameState,
    delta: &StateDelta,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "Hammurabi: I beg to report to you,".bold())?;
    writeln!(
        out,
        "In Year {year}, {} people starved.",
        delta.people_starved
    )?;
    writeln!(out, "{} people came to the city.", delta.people_added)?;
    writeln!(out, "The city population is now {}.", state.population)?;
    writeln!(out, "The city now owns {} acres.", state.lands)?;
    writeln!(out, "You harvested {} bushels per acre.", state.land_profit)?;
    if delta.has_rat {
        writeln!(out, "Rats ate {} bushels.", delta.bushels_infested)?;
    }
    if delta.has_plague {
        writeln!(out, "Plague killed {} people.", delta.people_killed)?;
    }
    writeln!(out, "You now have {} bushels in store.", state.bushels)?;
    writeln!(out, "Land is trading at {} bushels per acre.", state.land_price)
}

pub fn action_prompt(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Input your action with the following format:")?;
    writeln!(out, "{}", "[LandsToBuy] [BushelsToFeed] [LandsToSeed]".cyan())?;
    out.flush()
}

/// A refused action: the year is replayed.
pub fn refusal(out: &mut dyn Write, err: &TransitionError) -> io::Result<()> {
    writeln!(out, "{}", JEST.yellow())?;
    writeln!(out, "{err}")
}

pub fn overthrown(out: &mut dyn Write, uprising: &Uprising) -> io::Result<()> {
    writeln!(out, "{}", TransitionError::from(*uprising))?;
    writeln!(out, "{}", IMPEACHED.red().bold())
}

pub fn term_served(out: &mut dyn Write, term_years: u32, state: &GameState) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        format!("Your {term_years}-year term of office is over.")
            .green()
            .bold()
    )?;
    writeln!(
        out,
        "You leave {} people, {} acres and {} bushels to your successor.",
        state.population, state.lands, state.bushels
    )
}
