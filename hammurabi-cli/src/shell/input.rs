//! Parsing one line of player input into a [`GameAction`].

use hammurabi_game::GameAction;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Expected 3 numbers but got {found}.")]
    WrongFieldCount { found: usize },
    #[error("'{token}' is not a whole number.")]
    InvalidNumber { token: String },
}

/// Parse `[LandsToBuy] [BushelsToFeed] [LandsToSeed]`.
///
/// Fields are separated by any whitespace. Signs are accepted on every field;
/// range checks belong to the engine.
///
/// # Errors
///
/// Returns `WrongFieldCount` unless the line holds exactly three tokens, or
/// `InvalidNumber` for the first token that is not an integer.
pub fn parse_action(line: &str) -> Result<GameAction, InputError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [buy, feed, seed] = tokens.as_slice() else {
        return Err(InputError::WrongFieldCount {
            found: tokens.len(),
        });
    };
    Ok(GameAction::new(
        parse_number(buy)?,
        parse_number(feed)?,
        parse_number(seed)?,
    ))
}

fn parse_number(token: &str) -> Result<i64, InputError> {
    token.parse().map_err(|_| InputError::InvalidNumber {
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_integers() {
        assert_eq!(
            parse_action("  -20\t2000 1000\n"),
            Ok(GameAction::new(-20, 2_000, 1_000))
        );
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(
            parse_action("1 2"),
            Err(InputError::WrongFieldCount { found: 2 })
        );
        assert_eq!(
            parse_action(""),
            Err(InputError::WrongFieldCount { found: 0 })
        );
        assert_eq!(
            parse_action("1 2 3 4"),
            Err(InputError::WrongFieldCount { found: 4 })
        );
    }

    #[test]
    fn reports_first_bad_token() {
        let err = parse_action("1 lots 3.5").unwrap_err();
        assert_eq!(
            err,
            InputError::InvalidNumber {
                token: "lots".to_string()
            }
        );
        assert!(err.to_string().contains("'lots'"));
    }

    #[test]
    fn negative_feeding_parses_for_the_engine_to_refuse() {
        assert_eq!(parse_action("0 -1 0"), Ok(GameAction::new(0, -1, 0)));
    }
}
