use serde::Serialize;

use crate::recipe::SolvedRecipe;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientCost {
    pub id: String,
    pub cost: f64,
    /// Percent of the total cost.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSummary {
    pub total_cost: f64,
    pub cost_per_kg: f64,
    pub cost_per_kcal: f64,
    pub caloric_density_kcal_per_g: f64,
    pub breakdown: Vec<IngredientCost>,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

pub fn analyze(recipe: &SolvedRecipe) -> CostSummary {
    let total_cost = recipe.total_cost;
    let mut breakdown: Vec<IngredientCost> = recipe
        .lines
        .iter()
        .map(|l| IngredientCost {
            id: l.id.clone(),
            cost: l.cost,
            share: ratio(l.cost, total_cost) * 100.0,
        })
        .collect();
    breakdown.sort_by(|a, b| b.cost.total_cmp(&a.cost));

    CostSummary {
        total_cost,
        cost_per_kg: ratio(total_cost, recipe.total_weight_g / 1000.0),
        cost_per_kcal: ratio(total_cost, recipe.actual_calories),
        caloric_density_kcal_per_g: ratio(recipe.actual_calories, recipe.total_weight_g),
        breakdown,
    }
}
