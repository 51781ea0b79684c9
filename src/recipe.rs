use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::{Candidate, Category};
use crate::nutrients::NutrientId;
use crate::optim::model::{LpSolution, VarId};

/// Amounts below this are solver noise and are left out of the recipe.
pub const MIN_REPORTED_AMOUNT_G: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeLine {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub amount_g: f64,
    pub calories: f64,
    pub cost: f64,
}

/// Grams per ingredient from one solver pass. Never mutated; a new pass
/// produces a new recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolvedRecipe {
    pub lines: Vec<RecipeLine>,
    pub total_weight_g: f64,
    pub actual_calories: f64,
    pub total_cost: f64,
    /// Absolute amount of every validated nutrient across the recipe.
    pub nutrient_totals: BTreeMap<NutrientId, f64>,
}

impl SolvedRecipe {
    /// Reads ingredient amounts back from a solution.
    pub fn from_solution(
        candidates: &[Candidate<'_>],
        amounts: &[VarId],
        solution: &LpSolution,
    ) -> Self {
        let mut lines = Vec::new();
        let mut nutrient_totals: BTreeMap<NutrientId, f64> = BTreeMap::new();

        for (candidate, &var) in candidates.iter().zip(amounts) {
            let grams = solution.value(var).max(0.0);
            if grams < MIN_REPORTED_AMOUNT_G {
                continue;
            }
            for (nutrient, per_100g) in candidate.nutrients() {
                *nutrient_totals.entry(nutrient).or_insert(0.0) += per_100g * grams / 100.0;
            }
            lines.push(RecipeLine {
                id: candidate.id().to_string(),
                name: candidate.ingredient.name.clone(),
                category: candidate.category(),
                amount_g: grams,
                calories: candidate.kcal_per_100g * grams / 100.0,
                cost: candidate.cost_per_100g * grams / 100.0,
            });
        }

        Self {
            total_weight_g: lines.iter().map(|l| l.amount_g).sum(),
            actual_calories: lines.iter().map(|l| l.calories).sum(),
            total_cost: lines.iter().map(|l| l.cost).sum(),
            lines,
            nutrient_totals,
        }
    }

    pub fn nutrient_total(&self, nutrient: NutrientId) -> f64 {
        self.nutrient_totals.get(&nutrient).copied().unwrap_or(0.0)
    }

    pub fn category_weight(&self, category: Category) -> f64 {
        self.lines
            .iter()
            .filter(|l| l.category == category)
            .map(|l| l.amount_g)
            .sum()
    }

    /// Share of the total weight, in percent.
    pub fn percentage(&self, line: &RecipeLine) -> f64 {
        if self.total_weight_g > 0.0 {
            line.amount_g / self.total_weight_g * 100.0
        } else {
            0.0
        }
    }

    pub fn ingredient_count(&self) -> usize {
        self.lines.len()
    }
}
