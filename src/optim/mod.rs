pub mod constraints;
pub mod model;
pub mod objective;
pub mod pass;
pub mod solver;
pub mod strategy;

pub use constraints::{ConstraintBuilder, RecipeModel};
pub use objective::{ObjectiveComposer, OptimizationMode};
pub use solver::{LpSolver, MicroLpSolver, TimedSolver};
pub use strategy::{Strategy, StrategyOrchestrator, StrategyResult, WeightTrial};
