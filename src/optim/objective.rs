//! Weighted minimisation objective shared by both passes.

use std::fmt;

use serde::Serialize;

use super::constraints::{Bound, RecipeModel};
use super::model::{LinearExpr, Sense, VarKind};
use crate::catalog::{Candidate, Category};

/// Penalty per unit of relative nutrient shortfall, times importance.
pub const DEFICIENCY_WEIGHT: f64 = 1000.0;
/// Penalty per unit of relative nutrient excess, times importance.
pub const EXCESS_WEIGHT: f64 = 100.0;
/// Multiplies the recipe cost in currency units.
pub const COST_WEIGHT: f64 = 1.0;
/// Per kcal the delivered energy misses the target, either side.
pub const ENERGY_DEVIATION_WEIGHT: f64 = 1.0;
/// Per gram a category runs over its soft share.
pub const DIVERSITY_WEIGHT: f64 = 0.02;
/// Per gram of deviation from the preferred total weight.
pub const WEIGHT_PREFERENCE_WEIGHT: f64 = 15.0;

/// Share of the total weight a category may take before the diversity
/// penalty starts counting.
pub fn soft_target(category: Category) -> f64 {
    match category {
        Category::Protein => 0.55,
        Category::Vegetable => 0.25,
        Category::Grain => 0.20,
        Category::Fat => 0.08,
        Category::Other => 0.10,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OptimizationMode {
    NutritionFocused,
    WeightGuided { preferred_weight_g: f64 },
}

impl OptimizationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationMode::NutritionFocused => "nutrition_focused",
            OptimizationMode::WeightGuided { .. } => "weight_guided",
        }
    }
}

impl fmt::Display for OptimizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ObjectiveComposer {
    mode: OptimizationMode,
}

impl ObjectiveComposer {
    pub fn new(mode: OptimizationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> OptimizationMode {
        self.mode
    }

    /// Adds slack variables and their rows to `recipe` and fills in the
    /// objective. Weights are the same in every mode; the weight-guided mode
    /// only adds the preference term.
    pub fn compose(&self, recipe: &mut RecipeModel, candidates: &[Candidate<'_>]) {
        let model = &mut recipe.model;

        for nr in &recipe.nutrient_rows {
            if nr.required <= 0.0 {
                continue;
            }
            let importance = nr.nutrient.importance();
            match nr.bound {
                Bound::Min => {
                    let s = model.add_var(VarKind::Deficiency(nr.nutrient), None);
                    model.add_to_row(nr.row, s, 1.0);
                    model.add_to_objective(s, DEFICIENCY_WEIGHT * importance / nr.required);
                }
                Bound::Max => {
                    let e = model.add_var(VarKind::Excess(nr.nutrient), None);
                    model.add_to_row(nr.row, e, -1.0);
                    model.add_to_objective(e, EXCESS_WEIGHT * importance / nr.required);
                }
            }
        }

        for (c, &g) in candidates.iter().zip(&recipe.amounts) {
            model.add_to_objective(g, COST_WEIGHT * c.cost_per_100g / 100.0);
        }

        for category in Category::ALL {
            let members: Vec<_> = candidates
                .iter()
                .zip(&recipe.amounts)
                .filter(|(c, _)| c.category() == category)
                .map(|(_, &g)| g)
                .collect();
            if members.is_empty() {
                continue;
            }
            // d_c >= sum(g_i) - t_c * W
            let d = model.add_var(VarKind::CategoryOverflow(category), None);
            let mut expr = LinearExpr::new()
                .with(d, 1.0)
                .with(recipe.total_weight, soft_target(category));
            for g in members {
                expr.add(g, -1.0);
            }
            model.add_row(format!("diversity_{}", category), expr, Sense::Ge, 0.0);
            model.add_to_objective(d, DIVERSITY_WEIGHT);
        }

        // energy - target = over - under
        let over = model.add_var(VarKind::EnergyOver, None);
        let under = model.add_var(VarKind::EnergyUnder, None);
        let expr = recipe.energy.clone().with(over, -1.0).with(under, 1.0);
        model.add_row("energy_target", expr, Sense::Eq, recipe.target_kcal);
        model.add_to_objective(over, ENERGY_DEVIATION_WEIGHT);
        model.add_to_objective(under, ENERGY_DEVIATION_WEIGHT);

        if let OptimizationMode::WeightGuided { preferred_weight_g } = self.mode {
            // W - preferred = over - under
            let over = model.add_var(VarKind::WeightOver, None);
            let under = model.add_var(VarKind::WeightUnder, None);
            let expr = LinearExpr::new()
                .with(recipe.total_weight, 1.0)
                .with(over, -1.0)
                .with(under, 1.0);
            model.add_row("weight_preference", expr, Sense::Eq, preferred_weight_g);
            model.add_to_objective(over, WEIGHT_PREFERENCE_WEIGHT);
            model.add_to_objective(under, WEIGHT_PREFERENCE_WEIGHT);
        }
    }
}
