use serde::Serialize;
use std::fmt;

use crate::nutrients::{NutrientId, NutrientUnit};
use crate::recipe::SolvedRecipe;
use crate::standards::LifeStageStandard;

/// Per-nutrient adequacy ratios are capped here before averaging.
pub const ADEQUACY_CAP: f64 = 1.5;
/// Relative slack allowed when comparing against a bound.
const BOUND_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    Deficient,
    Adequate,
    Excessive,
}

impl ComplianceStatus {
    /// Depends on the density and the bounds only.
    pub fn classify(density: f64, min: Option<f64>, max: Option<f64>) -> Self {
        if let Some(min) = min {
            if density < min * (1.0 - BOUND_TOLERANCE) {
                return ComplianceStatus::Deficient;
            }
        }
        if let Some(max) = max {
            if density > max * (1.0 + BOUND_TOLERANCE) {
                return ComplianceStatus::Excessive;
            }
        }
        ComplianceStatus::Adequate
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComplianceStatus::Deficient => "DEFICIENT",
            ComplianceStatus::Adequate => "ADEQUATE",
            ComplianceStatus::Excessive => "EXCESSIVE",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientCompliance {
    pub nutrient: NutrientId,
    /// Total amount in the recipe.
    pub actual: f64,
    /// Amount per 1000 kcal of achieved energy.
    pub density: f64,
    pub required_min: Option<f64>,
    pub required_max: Option<f64>,
    pub unit: NutrientUnit,
    pub adequacy_ratio: Option<f64>,
    pub status: ComplianceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceReport {
    pub nutrients: Vec<NutrientCompliance>,
    pub compliant: bool,
    /// 0 to 100.
    pub score: f64,
}

impl ComplianceReport {
    /// Every nutrient outside its bounds.
    pub fn violations(&self) -> impl Iterator<Item = &NutrientCompliance> {
        self.nutrients
            .iter()
            .filter(|n| n.status != ComplianceStatus::Adequate)
    }

    pub fn get(&self, nutrient: NutrientId) -> Option<&NutrientCompliance> {
        self.nutrients.iter().find(|n| n.nutrient == nutrient)
    }
}

/// Compares the recipe against the standard on a per-1000-kcal basis using
/// the calories the recipe actually delivers.
pub fn evaluate(recipe: &SolvedRecipe, standard: &LifeStageStandard) -> ComplianceReport {
    let kcal = recipe.actual_calories;
    let mut nutrients = Vec::with_capacity(standard.len());
    let mut ratios = Vec::new();

    for req in standard.iter() {
        let actual = recipe.nutrient_total(req.nutrient);
        let density = if kcal > 0.0 { actual / kcal * 1000.0 } else { 0.0 };
        let adequacy_ratio = req.min.filter(|m| *m > 0.0).map(|m| density / m);
        if let Some(ratio) = adequacy_ratio {
            ratios.push(ratio.min(ADEQUACY_CAP));
        }
        nutrients.push(NutrientCompliance {
            nutrient: req.nutrient,
            actual,
            density,
            required_min: req.min,
            required_max: req.max,
            unit: req.unit,
            adequacy_ratio,
            status: ComplianceStatus::classify(density, req.min, req.max),
        });
    }

    let score = if ratios.is_empty() {
        100.0
    } else {
        let mean = ratios.iter().sum::<f64>() / ratios.len() as f64;
        (mean / ADEQUACY_CAP * 100.0).clamp(0.0, 100.0)
    };
    let compliant = !nutrients
        .iter()
        .any(|n| n.status == ComplianceStatus::Deficient);

    ComplianceReport {
        nutrients,
        compliant,
        score,
    }
}
