//! One optimisation pass: build, solve, and re-linearise the nutrient rows
//! against the calories the previous solve actually delivered.

use tracing::{debug, info, warn};

use super::constraints::ConstraintBuilder;
use super::objective::{ObjectiveComposer, OptimizationMode};
use super::solver::TimedSolver;
use crate::catalog::Candidate;
use crate::error::EngineResult;
use crate::recipe::SolvedRecipe;

/// Relative change of the calorie basis under which the pass stops.
pub const RELINEARISATION_TOLERANCE: f64 = 0.01;
pub const NUTRITION_EXTRA_SOLVES: usize = 2;
pub const WEIGHT_GUIDED_EXTRA_SOLVES: usize = 1;

#[derive(Debug, Clone)]
pub struct PassOutcome {
    pub mode: OptimizationMode,
    pub recipe: SolvedRecipe,
    pub objective: f64,
    /// Calories the nutrient rows of the final solve were scaled to.
    pub basis_kcal: f64,
    pub solves: usize,
    pub converged: bool,
}

pub struct PassRunner<'a> {
    builder: ConstraintBuilder<'a>,
    candidates: &'a [Candidate<'a>],
    solver: &'a TimedSolver,
}

impl<'a> PassRunner<'a> {
    pub fn new(
        builder: ConstraintBuilder<'a>,
        candidates: &'a [Candidate<'a>],
        solver: &'a TimedSolver,
    ) -> Self {
        Self {
            builder,
            candidates,
            solver,
        }
    }

    /// Solves once at `initial_basis`, then up to `extra_solves` more times
    /// while the achieved calories drift from the basis by more than the
    /// tolerance. An infeasible or timed-out solve ends the pass with that
    /// error.
    pub async fn run(
        &self,
        mode: OptimizationMode,
        initial_basis: f64,
        extra_solves: usize,
    ) -> EngineResult<PassOutcome> {
        let composer = ObjectiveComposer::new(mode);
        let mut basis = initial_basis;
        let mut solves = 0;

        loop {
            let mut recipe_model = self.builder.build(basis)?;
            composer.compose(&mut recipe_model, self.candidates);
            let amounts = recipe_model.amounts.clone();

            let solution = self.solver.solve(recipe_model.model).await?;
            solves += 1;

            let recipe = SolvedRecipe::from_solution(self.candidates, &amounts, &solution);
            let achieved = recipe.actual_calories;
            let change = (achieved - basis).abs() / basis;
            debug!(
                mode = %mode,
                iteration = solves,
                basis_kcal = basis,
                achieved_kcal = achieved,
                objective = solution.objective,
                "solve finished"
            );

            let converged = change <= RELINEARISATION_TOLERANCE;
            if converged || solves > extra_solves {
                if converged {
                    info!(mode = %mode, solves, achieved_kcal = achieved, "pass converged");
                } else {
                    warn!(
                        mode = %mode,
                        solves,
                        relative_change = change,
                        "pass stopped before the calorie basis settled"
                    );
                }
                return Ok(PassOutcome {
                    mode,
                    recipe,
                    objective: solution.objective,
                    basis_kcal: basis,
                    solves,
                    converged,
                });
            }
            basis = achieved;
        }
    }
}
