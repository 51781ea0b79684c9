//! AAFCO-style nutrient adequacy table, per 1000 kcal of metabolisable energy.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};
use crate::nutrients::{NutrientId, NutrientUnit};
use crate::profile::LifeStage;

pub const STANDARD_VERSION: &str = "AAFCO-2016";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientRequirement {
    pub nutrient: NutrientId,
    /// Per 1000 kcal ME.
    pub min: Option<f64>,
    /// Per 1000 kcal ME.
    pub max: Option<f64>,
    pub unit: NutrientUnit,
}

impl NutrientRequirement {
    /// Absolute minimum for a recipe delivering `kcal`.
    pub fn min_for(&self, kcal: f64) -> Option<f64> {
        self.min.map(|m| m * kcal / 1000.0)
    }

    /// Absolute maximum for a recipe delivering `kcal`.
    pub fn max_for(&self, kcal: f64) -> Option<f64> {
        self.max.map(|m| m * kcal / 1000.0)
    }
}

/// Requirement rows for one life stage.
#[derive(Debug, Clone, Serialize)]
pub struct LifeStageStandard {
    pub life_stage: LifeStage,
    requirements: BTreeMap<NutrientId, NutrientRequirement>,
}

impl LifeStageStandard {
    fn new(life_stage: LifeStage, rows: &[(NutrientId, f64, Option<f64>)]) -> Self {
        let requirements = rows
            .iter()
            .map(|&(nutrient, min, max)| {
                (
                    nutrient,
                    NutrientRequirement {
                        nutrient,
                        min: Some(min),
                        max,
                        unit: nutrient.unit(),
                    },
                )
            })
            .collect();
        Self {
            life_stage,
            requirements,
        }
    }

    pub fn get(&self, nutrient: NutrientId) -> Option<&NutrientRequirement> {
        self.requirements.get(&nutrient)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NutrientRequirement> {
        self.requirements.values()
    }

    pub fn nutrients(&self) -> impl Iterator<Item = NutrientId> + '_ {
        self.requirements.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Test and tooling helper: a standard holding only the given rows.
    pub fn custom(life_stage: LifeStage, requirements: Vec<NutrientRequirement>) -> Self {
        Self {
            life_stage,
            requirements: requirements.into_iter().map(|r| (r.nutrient, r)).collect(),
        }
    }
}

/// All life-stage rows. Built once, never mutated.
#[derive(Debug)]
pub struct NutrientStandardTable {
    pub version: &'static str,
    stages: BTreeMap<&'static str, LifeStageStandard>,
}

impl NutrientStandardTable {
    pub fn aafco() -> &'static NutrientStandardTable {
        &AAFCO_TABLE
    }

    pub fn for_stage(&self, life_stage: LifeStage) -> EngineResult<&LifeStageStandard> {
        self.stages
            .get(life_stage.as_str())
            .ok_or_else(|| EngineError::MissingStandard(life_stage.to_string()))
    }
}

static AAFCO_TABLE: Lazy<NutrientStandardTable> = Lazy::new(|| {
    use NutrientId::*;

    let dog_adult = LifeStageStandard::new(
        LifeStage::DogAdult,
        &[
            (Protein, 45.0, None),
            (Fat, 13.8, None),
            (Calcium, 1250.0, Some(6250.0)),
            (Phosphorus, 1000.0, Some(4000.0)),
            (Potassium, 1500.0, None),
            (Sodium, 200.0, None),
            (Magnesium, 150.0, None),
            (Iron, 10.0, None),
            (Zinc, 20.0, None),
            (Copper, 1.83, None),
            (Selenium, 80.0, Some(500.0)),
            (VitaminA, 1250.0, Some(62500.0)),
            (VitaminD, 125.0, Some(750.0)),
            // 12.5 IU expressed in mg (1 IU = 0.6774 mg)
            (VitaminE, 8.47, None),
            (Thiamine, 0.56, None),
            (VitaminB12, 7.0, None),
            (Riboflavin, 1.3, None),
            (LinoleicAcid, 3.3, None),
            (AlphaLinolenicAcid, 0.2, None),
        ],
    );

    let dog_puppy = LifeStageStandard::new(
        LifeStage::DogPuppy,
        &[
            (Protein, 56.3, None),
            (Fat, 21.3, None),
            (Calcium, 3000.0, Some(6250.0)),
            (Phosphorus, 2500.0, Some(4000.0)),
            (Potassium, 1500.0, None),
            (Sodium, 800.0, None),
            (Magnesium, 140.0, None),
            (Iron, 22.0, None),
            (Zinc, 25.0, None),
            (Copper, 3.1, None),
            (Selenium, 87.5, Some(500.0)),
            (VitaminA, 1250.0, Some(62500.0)),
            (VitaminD, 125.0, Some(750.0)),
            (VitaminE, 8.47, None),
            (Thiamine, 0.56, None),
            (VitaminB12, 7.0, None),
            (Riboflavin, 1.3, None),
            (LinoleicAcid, 3.3, None),
            (AlphaLinolenicAcid, 0.2, None),
        ],
    );

    let cat_adult = LifeStageStandard::new(
        LifeStage::CatAdult,
        &[
            (Protein, 63.0, None),
            (Fat, 22.5, None),
            (Calcium, 1440.0, Some(6250.0)),
            (Phosphorus, 1250.0, Some(4000.0)),
            (Potassium, 1670.0, None),
            (Sodium, 210.0, None),
            (Magnesium, 100.0, None),
            (Iron, 20.0, None),
            (Zinc, 18.75, None),
            (Copper, 1.25, None),
            (Selenium, 67.0, Some(500.0)),
            (VitaminA, 2083.0, Some(333_333.0)),
            (VitaminD, 62.5, Some(1667.0)),
            (VitaminE, 9.58, None),
            (Thiamine, 1.4, None),
            (VitaminB12, 5.6, None),
            (Riboflavin, 1.0, None),
            (LinoleicAcid, 1.4, None),
            (AlphaLinolenicAcid, 0.06, None),
        ],
    );

    let cat_kitten = LifeStageStandard::new(
        LifeStage::CatKitten,
        &[
            (Protein, 75.0, None),
            (Fat, 22.5, None),
            (Calcium, 2400.0, Some(6250.0)),
            (Phosphorus, 2000.0, Some(4000.0)),
            (Potassium, 1670.0, None),
            (Sodium, 670.0, None),
            (Magnesium, 100.0, None),
            (Iron, 20.0, None),
            (Zinc, 18.75, None),
            (Copper, 1.67, None),
            (Selenium, 83.0, None),
            (VitaminA, 2083.0, Some(333_333.0)),
            (VitaminD, 62.5, Some(1667.0)),
            (VitaminE, 9.58, None),
            (Thiamine, 1.4, None),
            (VitaminB12, 5.6, None),
            (Riboflavin, 1.0, None),
            (LinoleicAcid, 1.4, None),
            (AlphaLinolenicAcid, 0.06, None),
        ],
    );

    let stages = [dog_adult, dog_puppy, cat_adult, cat_kitten]
        .into_iter()
        .map(|s| (s.life_stage.as_str(), s))
        .collect();

    NutrientStandardTable {
        version: STANDARD_VERSION,
        stages,
    }
});
