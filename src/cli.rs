use clap::Parser;
use std::path::PathBuf;

use crate::profile::{LifeStage, RecipeRequest, Species};

#[derive(Parser, Debug)]
#[command(author, version, about = "Nutrient-adequate pet recipe optimiser", long_about = None)]
pub struct Cli {
    /// Ingredient catalog CSV (overrides RECIPE_CATALOG_PATH)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    pub species: Species,

    /// Age in months; used to pick the life stage when --life-stage is absent
    #[arg(short, long, conflicts_with = "life_stage")]
    pub age_months: Option<u32>,

    #[arg(long, value_enum)]
    pub life_stage: Option<LifeStage>,

    /// Daily energy target in kcal
    #[arg(long)]
    pub calories: f64,

    /// Preferred total recipe weight in grams
    #[arg(short, long)]
    pub preferred_weight: Option<f64>,

    /// Solver time budget in milliseconds (overrides RECIPE_SOLVER_TIMEOUT_MS)
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    #[arg(long, default_value_t = 0)]
    pub pet_id: u64,
}

impl Cli {
    /// Adult stage unless an age or an explicit stage says otherwise.
    pub fn life_stage(&self) -> LifeStage {
        match (self.life_stage, self.age_months) {
            (Some(stage), _) => stage,
            (None, Some(months)) => LifeStage::from_age(self.species, months),
            (None, None) => LifeStage::from_age(self.species, u32::MAX),
        }
    }

    pub fn request(&self) -> RecipeRequest {
        RecipeRequest {
            pet_id: self.pet_id,
            species: self.species,
            life_stage: self.life_stage(),
            target_calories: self.calories,
            preferred_weight_g: self.preferred_weight,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
