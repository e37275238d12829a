//! Centralized balance and tuning constants for Hammurabi game logic.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that the rules can only be adjusted via
//! code changes reviewed in version control.

// Rations ------------------------------------------------------------------
/// Bushels one person eats in a year.
pub const BUSHELS_PER_PERSON: i64 = 20;
/// Acres one person can farm in a year.
pub const LANDS_PER_PERSON: i64 = 10;
/// Seed cost in bushels per farmed acre.
pub const BUSHELS_PER_LAND: i64 = 1;

// Uprising -----------------------------------------------------------------
/// Starved share of the pre-turn population above which the people revolt.
pub const UPRISING_THRESHOLD: f64 = 0.45;

// Random events ------------------------------------------------------------
pub const PLAGUE_CHANCE: f64 = 0.15;
pub const RAT_CHANCE: f64 = 0.40;
pub const MIN_RAT_FRACTION: f64 = 0.10;
pub const MAX_RAT_FRACTION: f64 = 0.40;

pub const MIN_NEWCOMERS: i64 = 2;
pub const MAX_NEWCOMERS: i64 = 5;

// Market -------------------------------------------------------------------
pub const MIN_LAND_PRICE: i64 = 17;
pub const MAX_LAND_PRICE: i64 = 26;
pub const MIN_LAND_PROFIT: i64 = 1;
pub const MAX_LAND_PROFIT: i64 = 6;

// Opening state ------------------------------------------------------------
pub const INITIAL_YEAR: u32 = 1;
pub const INITIAL_BUSHELS: i64 = 2_800;
pub const INITIAL_POPULATION: i64 = 100;
pub const INITIAL_LANDS: i64 = 1_000;
pub const INITIAL_LAND_PRICE: i64 = 22;
pub const INITIAL_LAND_PROFIT: i64 = 3;

// Opening report: the previous ruler's last year.
pub const INITIAL_PEOPLE_ADDED: i64 = 5;
pub const INITIAL_BUSHELS_INFESTED: i64 = 200;

/// Term length when the caller does not choose one.
pub const DEFAULT_TERM_YEARS: u32 = 10;
