use serde::Serialize;
use std::collections::BTreeMap;

use super::compliance::{ComplianceReport, ComplianceStatus};
use crate::nutrients::{NutrientId, NutrientUnit};
use crate::recipe::SolvedRecipe;

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct MacroSummary {
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbohydrate_g: f64,
    pub fiber_g: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NutrientDetail {
    pub total: f64,
    pub per_1000_kcal: f64,
    pub unit: NutrientUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplianceStatus>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct NutritionSummary {
    pub totals: MacroSummary,
    /// Same fields, per 1000 kcal delivered.
    pub per_1000_kcal: MacroSummary,
    pub total_calories_kcal: f64,
    pub details: BTreeMap<NutrientId, NutrientDetail>,
}

pub fn summarize(recipe: &SolvedRecipe, compliance: &ComplianceReport) -> NutritionSummary {
    let mut totals = MacroSummary::default();
    macro_rules! take_total {
        ($field:ident, $nutrient:expr) => {
            totals.$field = recipe.nutrient_total($nutrient);
        };
    }
    take_total!(protein_g, NutrientId::Protein);
    take_total!(fat_g, NutrientId::Fat);
    take_total!(carbohydrate_g, NutrientId::Carbohydrate);
    take_total!(fiber_g, NutrientId::Fiber);

    let kcal = recipe.actual_calories;
    let scale_factor = if kcal > 0.0 { 1000.0 / kcal } else { 0.0 };
    let mut per_1000_kcal = MacroSummary::default();
    macro_rules! normalize {
        ($field:ident) => {
            per_1000_kcal.$field = totals.$field * scale_factor;
        };
    }
    normalize!(protein_g);
    normalize!(fat_g);
    normalize!(carbohydrate_g);
    normalize!(fiber_g);

    let details = recipe
        .nutrient_totals
        .iter()
        .map(|(&nutrient, &total)| {
            let row = compliance.get(nutrient);
            (
                nutrient,
                NutrientDetail {
                    total,
                    per_1000_kcal: total * scale_factor,
                    unit: nutrient.unit(),
                    required_min: row.and_then(|r| r.required_min),
                    required_max: row.and_then(|r| r.required_max),
                    status: row.map(|r| r.status),
                },
            )
        })
        .collect();

    NutritionSummary {
        totals,
        per_1000_kcal,
        total_calories_kcal: kcal,
        details,
    }
}
