pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;

pub use policy::resolve_strategies;
pub use seeds::resolve_seed_inputs;
pub use simulation::{
    SimulationRecord, StrategyAggregate, aggregate_records, run_matrix,
};
