//! Response document handed to the reporting layer.
//!
//! Values are rounded here and nowhere else. The reported total weight is the
//! sum of the reported ingredient amounts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analysis::{
    ComplianceStatus, NutritionalBalance, UserGuidance, WeightAnalysis, WeightCategory,
};
use crate::catalog::Category;
use crate::error::EngineError;
use crate::nutrients::{NutrientId, NutrientUnit};
use crate::outcome::OptimizationOutcome;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    // no "-0.0" on the wire
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn round_opt(value: Option<f64>, decimals: i32) -> Option<f64> {
    value.map(|v| round_to(v, decimals))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<RecipeData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeData {
    pub total_weight_g: f64,
    pub target_calories: f64,
    pub actual_calories: f64,
    pub energy_accuracy: f64,
    pub ingredients: Vec<IngredientData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientData {
    pub id: String,
    pub name: String,
    pub amount_g: f64,
    pub percentage: f64,
    pub cost: f64,
    pub calories: f64,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisData {
    pub nutrition: NutritionData,
    pub efficiency: EfficiencyData,
    pub aafco_compliance: ComplianceData,
    pub cost_analysis: CostData,
    pub nutritional_balance: NutritionalBalance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_analysis: Option<WeightAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimization_strategy: Option<StrategyData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_guidance: Option<UserGuidance>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientData {
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

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionData {
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbohydrate_g: f64,
    pub fiber_g: f64,
    pub total_calories_kcal: f64,
    pub nutrients: BTreeMap<NutrientId, NutrientData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyData {
    pub caloric_density_kcal_per_g: f64,
    pub cost_efficiency_cost_per_kcal: f64,
    pub ingredient_count: usize,
    pub weight_category: WeightCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationData {
    pub nutrient: NutrientId,
    /// Per 1000 kcal.
    pub actual: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_max: Option<f64>,
    pub unit: NutrientUnit,
    pub status: ComplianceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceData {
    pub compliant: bool,
    pub violations: Vec<ViolationData>,
    pub score: f64,
    pub standard: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostData {
    pub total_cost: f64,
    pub cost_per_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyData {
    pub optimization_strategy: &'static str,
    pub primary_mode: &'static str,
    pub weight_preference_provided: bool,
    pub strategy_description: &'static str,
}

impl RecipeResponse {
    pub fn error(err: &EngineError) -> Self {
        Self {
            status: ResponseStatus::Error,
            error: Some(err.to_string()),
            recipe: None,
            analysis: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

impl From<&OptimizationOutcome> for RecipeResponse {
    fn from(outcome: &OptimizationOutcome) -> Self {
        let recipe = &outcome.recipe;

        let ingredients: Vec<IngredientData> = recipe
            .lines
            .iter()
            .map(|line| IngredientData {
                id: line.id.clone(),
                name: line.name.clone(),
                amount_g: round_to(line.amount_g, 2),
                percentage: round_to(recipe.percentage(line), 1),
                cost: round_to(line.cost, 2),
                calories: round_to(line.calories, 1),
                category: line.category,
            })
            .collect();
        let total_weight_g = ingredients.iter().map(|i| i.amount_g).sum();

        let nutrients = outcome
            .nutrition
            .details
            .iter()
            .map(|(&id, d)| {
                (
                    id,
                    NutrientData {
                        total: round_to(d.total, 3),
                        per_1000_kcal: round_to(d.per_1000_kcal, 3),
                        unit: d.unit,
                        required_min: d.required_min,
                        required_max: d.required_max,
                        status: d.status,
                    },
                )
            })
            .collect();
        let totals = &outcome.nutrition.totals;

        let violations = outcome
            .compliance
            .violations()
            .map(|v| ViolationData {
                nutrient: v.nutrient,
                actual: round_to(v.density, 3),
                required_min: v.required_min,
                required_max: v.required_max,
                unit: v.unit,
                status: v.status,
            })
            .collect();

        let mut weight_analysis = outcome.weight_analysis.clone();
        weight_analysis.final_weight_g = round_to(weight_analysis.final_weight_g, 1);
        weight_analysis.baseline_weight_g = round_opt(weight_analysis.baseline_weight_g, 1);
        weight_analysis.nutrition_compromise = round_opt(weight_analysis.nutrition_compromise, 2);

        let mut nutritional_balance = outcome.balance.clone();
        nutritional_balance.balance_score = round_to(nutritional_balance.balance_score, 1);
        for share in nutritional_balance.category_breakdown.values_mut() {
            share.weight_g = round_to(share.weight_g, 1);
            share.percentage = round_to(share.percentage, 1);
        }

        let user_guidance = outcome.user_guidance.clone().map(|mut g| {
            g.weight_achievement = round_to(g.weight_achievement, 1);
            g
        });

        Self {
            status: ResponseStatus::Success,
            error: None,
            recipe: Some(RecipeData {
                total_weight_g,
                target_calories: outcome.profile.target_calories,
                actual_calories: round_to(recipe.actual_calories, 1),
                energy_accuracy: round_to(outcome.energy_accuracy(), 2),
                ingredients,
            }),
            analysis: Some(AnalysisData {
                nutrition: NutritionData {
                    protein_g: round_to(totals.protein_g, 1),
                    fat_g: round_to(totals.fat_g, 1),
                    carbohydrate_g: round_to(totals.carbohydrate_g, 1),
                    fiber_g: round_to(totals.fiber_g, 1),
                    total_calories_kcal: round_to(outcome.nutrition.total_calories_kcal, 1),
                    nutrients,
                },
                efficiency: EfficiencyData {
                    caloric_density_kcal_per_g: round_to(
                        outcome.cost.caloric_density_kcal_per_g,
                        2,
                    ),
                    cost_efficiency_cost_per_kcal: round_to(outcome.cost.cost_per_kcal, 4),
                    ingredient_count: recipe.ingredient_count(),
                    weight_category: outcome.weight_analysis.weight_category,
                },
                aafco_compliance: ComplianceData {
                    compliant: outcome.compliance.compliant,
                    violations,
                    score: round_to(outcome.compliance.score, 1),
                    standard: outcome.standard_version,
                },
                cost_analysis: CostData {
                    total_cost: round_to(outcome.cost.total_cost, 2),
                    cost_per_kg: round_to(outcome.cost.cost_per_kg, 2),
                },
                nutritional_balance,
                weight_analysis: Some(weight_analysis),
                optimization_strategy: Some(StrategyData {
                    optimization_strategy: "hybrid",
                    primary_mode: outcome.strategy.primary_mode(),
                    weight_preference_provided: outcome.profile.preferred_weight_g.is_some(),
                    strategy_description: outcome.strategy_description(),
                }),
                user_guidance,
            }),
        }
    }
}
