//! Hard constraint rows and the elastic nutrient rows of the recipe LP.

use tracing::debug;

use super::model::{LinearExpr, LpModel, RowId, Sense, VarId, VarKind};
use crate::catalog::{Candidate, Category};
use crate::error::{EngineError, EngineResult};
use crate::nutrients::NutrientId;
use crate::standards::LifeStageStandard;

/// Accepted deviation of delivered energy from the target, either side.
pub const ENERGY_TOLERANCE: f64 = 0.07;
/// No single ingredient may exceed this share of the total weight.
pub const MAX_INGREDIENT_SHARE: f64 = 0.35;
pub const PROTEIN_SHARE_MIN: f64 = 0.40;
pub const PROTEIN_SHARE_MAX: f64 = 0.70;
pub const VEGETABLE_SHARE_MIN: f64 = 0.15;
/// Floors are raised and ceilings lowered by this fraction of the calorie
/// basis, matching the re-linearisation tolerance.
pub const REQUIREMENT_MARGIN: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
}

/// A nutrient row the objective composer turns elastic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientRow {
    pub nutrient: NutrientId,
    pub bound: Bound,
    pub row: RowId,
    /// Absolute amount the row asks for, in the nutrient's unit.
    pub required: f64,
}

/// The LP plus the handles later stages need.
#[derive(Debug, Clone)]
pub struct RecipeModel {
    pub model: LpModel,
    /// One variable per candidate, same order as the candidate slice.
    pub amounts: Vec<VarId>,
    pub total_weight: VarId,
    pub nutrient_rows: Vec<NutrientRow>,
    /// Delivered energy, `Σ kcal_i/100 · g_i`.
    pub energy: LinearExpr,
    pub target_kcal: f64,
    pub basis_kcal: f64,
}

pub struct ConstraintBuilder<'a> {
    candidates: &'a [Candidate<'a>],
    standard: &'a LifeStageStandard,
    target_calories: f64,
}

impl<'a> ConstraintBuilder<'a> {
    pub fn new(
        candidates: &'a [Candidate<'a>],
        standard: &'a LifeStageStandard,
        target_calories: f64,
    ) -> Self {
        Self {
            candidates,
            standard,
            target_calories,
        }
    }

    pub fn energy_band(&self) -> (f64, f64) {
        (
            self.target_calories * (1.0 - ENERGY_TOLERANCE),
            self.target_calories * (1.0 + ENERGY_TOLERANCE),
        )
    }

    /// Builds the model with nutrient requirements scaled to `basis_kcal`.
    ///
    /// Structural gaps that make the hard rows unsatisfiable for any basis
    /// (no candidate at all, no protein or vegetable source) are reported
    /// here instead of through the solver.
    pub fn build(&self, basis_kcal: f64) -> EngineResult<RecipeModel> {
        if self.candidates.is_empty() {
            return Err(EngineError::infeasible("no candidate ingredients"));
        }
        for (category, label) in [
            (Category::Protein, "protein"),
            (Category::Vegetable, "vegetable"),
        ] {
            if !self.candidates.iter().any(|c| c.category() == category) {
                return Err(EngineError::infeasible(format!(
                    "catalog offers no {} ingredient for the category balance",
                    label
                )));
            }
        }

        let (min_energy, max_energy) = self.energy_band();
        let mut model = LpModel::new();

        // An ingredient alone can never exceed the energy ceiling.
        let amounts: Vec<VarId> = self
            .candidates
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let upper = max_energy / (c.kcal_per_100g / 100.0);
                model.add_var(VarKind::Ingredient(i), Some(upper))
            })
            .collect();
        let total_weight = model.add_var(VarKind::TotalWeight, None);

        let mut sum = LinearExpr::new().with(total_weight, 1.0);
        for &g in &amounts {
            sum.add(g, -1.0);
        }
        model.add_row("total_weight", sum, Sense::Eq, 0.0);

        let energy = self.weighted_sum(&amounts, |c| c.kcal_per_100g);
        model.add_row("energy_min", energy.clone(), Sense::Ge, min_energy);
        model.add_row("energy_max", energy.clone(), Sense::Le, max_energy);

        for (c, &g) in self.candidates.iter().zip(&amounts) {
            model.add_row(
                format!("cap_{}", c.id()),
                LinearExpr::new()
                    .with(g, 1.0)
                    .with(total_weight, -MAX_INGREDIENT_SHARE),
                Sense::Le,
                0.0,
            );
        }

        let protein =
            self.category_share(&amounts, total_weight, Category::Protein, PROTEIN_SHARE_MIN);
        model.add_row("protein_share_min", protein, Sense::Ge, 0.0);
        let protein =
            self.category_share(&amounts, total_weight, Category::Protein, PROTEIN_SHARE_MAX);
        model.add_row("protein_share_max", protein, Sense::Le, 0.0);
        let vegetable =
            self.category_share(&amounts, total_weight, Category::Vegetable, VEGETABLE_SHARE_MIN);
        model.add_row("vegetable_share_min", vegetable, Sense::Ge, 0.0);

        let mut nutrient_rows = Vec::new();
        for req in self.standard.iter() {
            let supplied = self.weighted_sum(&amounts, |c| c.per_100g(req.nutrient));
            if let Some(required) = req.min_for(basis_kcal * (1.0 + REQUIREMENT_MARGIN)) {
                let row = model.add_row(
                    format!("{}_min", req.nutrient),
                    supplied.clone(),
                    Sense::Ge,
                    required,
                );
                nutrient_rows.push(NutrientRow {
                    nutrient: req.nutrient,
                    bound: Bound::Min,
                    row,
                    required,
                });
            }
            if let Some(required) = req.max_for(basis_kcal * (1.0 - REQUIREMENT_MARGIN)) {
                let row = model.add_row(
                    format!("{}_max", req.nutrient),
                    supplied,
                    Sense::Le,
                    required,
                );
                nutrient_rows.push(NutrientRow {
                    nutrient: req.nutrient,
                    bound: Bound::Max,
                    row,
                    required,
                });
            }
        }

        debug!(
            vars = model.vars().len(),
            rows = model.rows().len(),
            basis_kcal,
            "recipe model built"
        );

        Ok(RecipeModel {
            model,
            amounts,
            total_weight,
            nutrient_rows,
            energy,
            target_kcal: self.target_calories,
            basis_kcal,
        })
    }

    fn weighted_sum(&self, amounts: &[VarId], per_100g: impl Fn(&Candidate) -> f64) -> LinearExpr {
        let mut expr = LinearExpr::new();
        for (c, &g) in self.candidates.iter().zip(amounts) {
            expr.add(g, per_100g(c) / 100.0);
        }
        expr
    }

    /// `Σ g_i (i in category) - share * W`
    fn category_share(
        &self,
        amounts: &[VarId],
        total_weight: VarId,
        category: Category,
        share: f64,
    ) -> LinearExpr {
        let mut expr = LinearExpr::new().with(total_weight, -share);
        for (c, &g) in self.candidates.iter().zip(amounts) {
            if c.category() == category {
                expr.add(g, 1.0);
            }
        }
        expr
    }
}
