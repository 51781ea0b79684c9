use std::sync::Arc;
use std::time::Duration;

use tracing::{info, info_span, warn, Instrument};

use crate::analysis::{balance, cost, nutrition, weight};
use crate::catalog::{validate_candidates, IngredientCatalog};
use crate::error::{EngineError, EngineResult};
use crate::optim::constraints::ConstraintBuilder;
use crate::optim::pass::PassRunner;
use crate::optim::solver::{LpSolver, MicroLpSolver, TimedSolver};
use crate::optim::strategy::StrategyOrchestrator;
use crate::outcome::OptimizationOutcome;
use crate::profile::{PetProfile, RecipeRequest};
use crate::report::RecipeResponse;
use crate::standards::NutrientStandardTable;

/// Turns pet profiles into optimised recipes.
///
/// Holds only read-only state, so one engine can serve concurrent requests
/// through a shared reference.
#[derive(Debug, Clone)]
pub struct RecipeEngine {
    catalog: Arc<IngredientCatalog>,
    standards: &'static NutrientStandardTable,
    solver: TimedSolver,
}

impl RecipeEngine {
    pub fn new(catalog: Arc<IngredientCatalog>, solver_timeout: Duration) -> Self {
        Self::with_solver(catalog, Arc::new(MicroLpSolver), solver_timeout)
    }

    pub fn with_solver(
        catalog: Arc<IngredientCatalog>,
        solver: Arc<dyn LpSolver>,
        solver_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            standards: NutrientStandardTable::aafco(),
            solver: TimedSolver::new(solver, solver_timeout),
        }
    }

    pub fn catalog(&self) -> &IngredientCatalog {
        &self.catalog
    }

    pub async fn optimize(&self, profile: &PetProfile) -> EngineResult<OptimizationOutcome> {
        profile.validate()?;
        let standard = self.standards.for_stage(profile.life_stage)?;

        let safe = self.catalog.for_species(profile.species);
        if safe.is_empty() {
            return Err(EngineError::InvalidRequest(format!(
                "no ingredients are safe for {}",
                profile.species
            )));
        }
        let candidates = validate_candidates(&safe, standard)?;
        info!(
            life_stage = %profile.life_stage,
            target_kcal = profile.target_calories,
            preferred_weight_g = ?profile.preferred_weight_g,
            candidates = candidates.len(),
            "optimising recipe"
        );

        let builder = ConstraintBuilder::new(&candidates, standard, profile.target_calories);
        let runner = PassRunner::new(builder, &candidates, &self.solver);
        let result = StrategyOrchestrator::new(
            runner,
            standard,
            profile.target_calories,
            profile.preferred_weight_g,
        )
        .run()
        .await?;

        let recipe = result.chosen.recipe;
        let cost = cost::analyze(&recipe);
        let nutrition = nutrition::summarize(&recipe, &result.compliance);
        let balance = balance::analyze(&recipe);
        let weight_analysis = weight::analyze(
            result.strategy,
            result.weight_trial.as_ref(),
            recipe.total_weight_g,
            recipe.actual_calories,
        );
        let user_guidance = profile
            .preferred_weight_g
            .map(|preferred| weight::guidance(preferred, &weight_analysis));

        info!(
            strategy = %result.strategy,
            total_weight_g = recipe.total_weight_g,
            actual_kcal = recipe.actual_calories,
            score = result.compliance.score,
            compliant = result.compliance.compliant,
            solver_calls = result.solver_calls,
            "recipe optimised"
        );

        Ok(OptimizationOutcome {
            profile: profile.clone(),
            compliance: result.compliance,
            cost,
            nutrition,
            balance,
            weight_analysis,
            user_guidance,
            strategy: result.strategy,
            objective: result.chosen.objective,
            solver_calls: result.solver_calls,
            standard_version: self.standards.version,
            recipe,
        })
    }

    /// Never fails: errors come back as an `Error` response.
    pub async fn generate(&self, request: &RecipeRequest) -> RecipeResponse {
        let span = info_span!("recipe", pet_id = request.pet_id);
        match self.optimize(&request.profile()).instrument(span).await {
            Ok(outcome) => RecipeResponse::from(&outcome),
            Err(err) => {
                warn!(pet_id = request.pet_id, error = %err, "recipe generation failed");
                RecipeResponse::error(&err)
            }
        }
    }
}
