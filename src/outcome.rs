use serde::Serialize;

use crate::analysis::{
    ComplianceReport, CostSummary, NutritionSummary, NutritionalBalance, UserGuidance,
    WeightAnalysis,
};
use crate::optim::strategy::Strategy;
use crate::profile::PetProfile;
use crate::recipe::SolvedRecipe;

/// Everything one generation request produces. Built once, then only read.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationOutcome {
    pub profile: PetProfile,
    pub recipe: SolvedRecipe,
    pub compliance: ComplianceReport,
    pub cost: CostSummary,
    pub nutrition: NutritionSummary,
    pub balance: NutritionalBalance,
    pub weight_analysis: WeightAnalysis,
    pub user_guidance: Option<UserGuidance>,
    pub strategy: Strategy,
    /// Objective value of the solve that produced `recipe`.
    pub objective: f64,
    pub solver_calls: usize,
    pub standard_version: &'static str,
}

impl OptimizationOutcome {
    /// 100 minus the relative energy miss, in percent.
    pub fn energy_accuracy(&self) -> f64 {
        let target = self.profile.target_calories;
        100.0 - 100.0 * (self.recipe.actual_calories - target).abs() / target
    }

    pub fn strategy_description(&self) -> &'static str {
        self.strategy.description()
    }
}
