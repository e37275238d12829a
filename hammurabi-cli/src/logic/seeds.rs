use anyhow::{Context, Result, bail};

/// Seed used when no token resolves to anything.
pub const DEFAULT_SEED: u64 = 1337;

/// Resolve CLI seed tokens into world seeds.
///
/// Supports decimal integers (negative values use their magnitude), `0x`
/// prefixed hex, and the keyword `random`, which draws a fresh seed and logs
/// it so the run can be repeated. Duplicates are dropped, first one wins.
///
/// # Errors
///
/// Fails on the first token that is none of the above.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }
        let seed = parse_seed(token)?;
        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }

    Ok(seeds)
}

/// Parse a single seed token.
///
/// # Errors
///
/// Fails when the token is not a number or `random`.
pub fn parse_seed(token: &str) -> Result<u64> {
    if token.eq_ignore_ascii_case("random") {
        let seed = rand::random::<u64>();
        log::info!("random seed resolved to {seed}");
        return Ok(seed);
    }

    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16)
            .with_context(|| format!("Invalid hex seed: {token}"));
    }

    if let Ok(value) = token.parse::<u64>() {
        return Ok(value);
    }

    if let Ok(value) = token.parse::<i64>() {
        return Ok(value.unsigned_abs());
    }

    bail!("Unrecognized seed token: {token}");
}
