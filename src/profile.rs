use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};

/// Upper sanity bound on a daily calorie target.
pub const MAX_TARGET_CALORIES: f64 = 15_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Dog => f.write_str("dog"),
            Species::Cat => f.write_str("cat"),
        }
    }
}

/// Which requirement row of the standard applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LifeStage {
    DogPuppy,
    DogAdult,
    CatKitten,
    CatAdult,
}

impl LifeStage {
    /// Growth stages run through the first twelve months.
    pub fn from_age(species: Species, age_months: u32) -> Self {
        match (species, age_months <= 12) {
            (Species::Dog, true) => LifeStage::DogPuppy,
            (Species::Dog, false) => LifeStage::DogAdult,
            (Species::Cat, true) => LifeStage::CatKitten,
            (Species::Cat, false) => LifeStage::CatAdult,
        }
    }

    pub fn species(self) -> Species {
        match self {
            LifeStage::DogPuppy | LifeStage::DogAdult => Species::Dog,
            LifeStage::CatKitten | LifeStage::CatAdult => Species::Cat,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LifeStage::DogPuppy => "dog_puppy",
            LifeStage::DogAdult => "dog_adult",
            LifeStage::CatKitten => "cat_kitten",
            LifeStage::CatAdult => "cat_adult",
        }
    }
}

impl fmt::Display for LifeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifeStage {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dog_puppy" | "puppy" => Ok(LifeStage::DogPuppy),
            "dog_adult" => Ok(LifeStage::DogAdult),
            "cat_kitten" | "kitten" => Ok(LifeStage::CatKitten),
            "cat_adult" => Ok(LifeStage::CatAdult),
            other => Err(EngineError::InvalidRequest(format!(
                "unknown life stage '{}'",
                other
            ))),
        }
    }
}

/// Immutable physiological input to one optimisation run.
///
/// The lactation/nursing modifiers have already been folded into
/// `target_calories` upstream; they are carried for reporting only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetProfile {
    pub species: Species,
    pub life_stage: LifeStage,
    pub target_calories: f64,
    pub preferred_weight_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lactation_week: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nursing_count: Option<u8>,
}

impl PetProfile {
    pub fn new(life_stage: LifeStage, target_calories: f64) -> Self {
        Self {
            species: life_stage.species(),
            life_stage,
            target_calories,
            preferred_weight_g: None,
            lactation_week: None,
            nursing_count: None,
        }
    }

    pub fn with_preferred_weight(mut self, grams: f64) -> Self {
        self.preferred_weight_g = Some(grams);
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !self.target_calories.is_finite()
            || self.target_calories <= 0.0
            || self.target_calories > MAX_TARGET_CALORIES
        {
            return Err(EngineError::InvalidRequest(format!(
                "target calories {} outside the accepted range (0, {}]",
                self.target_calories, MAX_TARGET_CALORIES
            )));
        }
        if let Some(w) = self.preferred_weight_g {
            if !w.is_finite() || w <= 0.0 {
                return Err(EngineError::InvalidRequest(format!(
                    "preferred weight must be positive, got {}",
                    w
                )));
            }
        }
        if self.life_stage.species() != self.species {
            return Err(EngineError::InvalidRequest(format!(
                "life stage '{}' does not apply to a {}",
                self.life_stage, self.species
            )));
        }
        Ok(())
    }
}

/// Request as handed over by the profile layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRequest {
    pub pet_id: u64,
    pub species: Species,
    pub life_stage: LifeStage,
    pub target_calories: f64,
    #[serde(default)]
    pub preferred_weight_g: Option<f64>,
}

impl RecipeRequest {
    pub fn profile(&self) -> PetProfile {
        PetProfile {
            species: self.species,
            life_stage: self.life_stage,
            target_calories: self.target_calories,
            preferred_weight_g: self.preferred_weight_g,
            lactation_week: None,
            nursing_count: None,
        }
    }
}
