pub mod analysis;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod nutrients;
pub mod optim;
pub mod outcome;
pub mod profile;
pub mod recipe;
pub mod report;
pub mod standards;

pub use engine::RecipeEngine;
pub use error::{EngineError, EngineResult};
pub use outcome::OptimizationOutcome;
pub use profile::{LifeStage, PetProfile, RecipeRequest, Species};
pub use report::RecipeResponse;
