//! Two-pass strategy: a nutrition-focused solve, then an optional
//! weight-guided refinement that is kept only if it stays close enough to the
//! baseline's nutritional quality.

use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

use super::objective::OptimizationMode;
use super::pass::{PassOutcome, PassRunner, NUTRITION_EXTRA_SOLVES, WEIGHT_GUIDED_EXTRA_SOLVES};
use crate::analysis::compliance::{self, ComplianceReport};
use crate::error::{EngineError, EngineResult};
use crate::standards::LifeStageStandard;

/// Largest compliance score loss a weight-guided candidate may cost.
pub const MAX_COMPLIANCE_DROP: f64 = 8.0;
/// A candidate further than this from the preferred weight has not achieved
/// the adjustment.
pub const MAX_WEIGHT_DEVIATION: f64 = 0.35;
pub const INFEASIBLE_REASON: &str = "no feasible nutrient-adequate composition";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    NutritionFocused,
    WeightGuided,
    WeightGuidedFallback,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::NutritionFocused => "nutrition_focused",
            Strategy::WeightGuided => "weight_guided",
            Strategy::WeightGuidedFallback => "weight_guided_fallback",
        }
    }

    /// The pass whose recipe is returned.
    pub fn primary_mode(self) -> &'static str {
        match self {
            Strategy::NutritionFocused | Strategy::WeightGuidedFallback => "nutrition_focused",
            Strategy::WeightGuided => "weight_guided",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Strategy::NutritionFocused => {
                "Nutrition-focused optimization: the recipe weight follows from nutrient and energy needs"
            }
            Strategy::WeightGuided => {
                "Weight-guided optimization: the recipe was steered toward the preferred weight while meeting nutrient needs"
            }
            Strategy::WeightGuidedFallback => {
                "Nutrition-focused fallback: the weight-guided candidate was rejected and the nutrition-optimal recipe was kept"
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of a weight-guided attempt, accepted or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightTrial {
    pub baseline_weight_g: f64,
    pub target_weight_g: f64,
    /// Baseline weight when the candidate was rejected.
    pub final_weight_g: f64,
    pub accepted: bool,
    /// Candidate score minus baseline score; absent if no candidate was solved.
    pub nutrition_compromise: Option<f64>,
    pub fallback_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StrategyResult {
    pub strategy: Strategy,
    pub chosen: PassOutcome,
    pub compliance: ComplianceReport,
    pub weight_trial: Option<WeightTrial>,
    pub solver_calls: usize,
}

/// Decides whether a weight-guided candidate replaces the baseline.
///
/// Returns the rejection reason when it does not.
pub fn review_candidate(
    baseline_score: f64,
    candidate_score: f64,
    preferred_weight_g: f64,
    candidate_weight_g: f64,
) -> Result<(), String> {
    let compromise = candidate_score - baseline_score;
    if compromise < -MAX_COMPLIANCE_DROP {
        return Err(format!(
            "nutrition compromise of {:.1} score points exceeds the {:.1} point limit",
            -compromise, MAX_COMPLIANCE_DROP
        ));
    }
    let deviation = (candidate_weight_g - preferred_weight_g).abs() / preferred_weight_g;
    if deviation > MAX_WEIGHT_DEVIATION {
        return Err(format!(
            "preferred weight of {:.0} g is out of reach: closest nutrient-feasible weight is {:.0} g ({:.0}% off)",
            preferred_weight_g,
            candidate_weight_g,
            deviation * 100.0
        ));
    }
    Ok(())
}

enum State {
    NutritionFocused,
    WeightGuided {
        baseline: PassOutcome,
        baseline_compliance: ComplianceReport,
        preferred_weight_g: f64,
    },
    Done(StrategyResult),
    Failed(EngineError),
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::NutritionFocused => "NUTRITION_FOCUSED",
            State::WeightGuided { .. } => "WEIGHT_GUIDED",
            State::Done(_) => "DONE",
            State::Failed(_) => "FAILED",
        }
    }
}

pub struct StrategyOrchestrator<'a> {
    runner: PassRunner<'a>,
    standard: &'a LifeStageStandard,
    target_calories: f64,
    preferred_weight_g: Option<f64>,
}

impl<'a> StrategyOrchestrator<'a> {
    pub fn new(
        runner: PassRunner<'a>,
        standard: &'a LifeStageStandard,
        target_calories: f64,
        preferred_weight_g: Option<f64>,
    ) -> Self {
        Self {
            runner,
            standard,
            target_calories,
            preferred_weight_g,
        }
    }

    pub async fn run(&self) -> EngineResult<StrategyResult> {
        let mut state = State::NutritionFocused;
        let mut solver_calls = 0;

        loop {
            let from = state.name();
            state = match state {
                State::NutritionFocused => {
                    match self
                        .runner
                        .run(
                            OptimizationMode::NutritionFocused,
                            self.target_calories,
                            NUTRITION_EXTRA_SOLVES,
                        )
                        .await
                    {
                        Ok(baseline) => {
                            solver_calls += baseline.solves;
                            let baseline_compliance =
                                compliance::evaluate(&baseline.recipe, self.standard);
                            match self.preferred_weight_g {
                                None => State::Done(StrategyResult {
                                    strategy: Strategy::NutritionFocused,
                                    chosen: baseline,
                                    compliance: baseline_compliance,
                                    weight_trial: None,
                                    solver_calls,
                                }),
                                Some(preferred_weight_g) => State::WeightGuided {
                                    baseline,
                                    baseline_compliance,
                                    preferred_weight_g,
                                },
                            }
                        }
                        Err(EngineError::InfeasibleModel { reason }) => State::Failed(
                            EngineError::infeasible(format!("{}: {}", INFEASIBLE_REASON, reason)),
                        ),
                        Err(other) => State::Failed(other),
                    }
                }
                State::WeightGuided {
                    baseline,
                    baseline_compliance,
                    preferred_weight_g,
                } => {
                    let attempt = self
                        .runner
                        .run(
                            OptimizationMode::WeightGuided { preferred_weight_g },
                            baseline.recipe.actual_calories,
                            WEIGHT_GUIDED_EXTRA_SOLVES,
                        )
                        .await;
                    match attempt {
                        Ok(candidate) => {
                            solver_calls += candidate.solves;
                            let candidate_compliance =
                                compliance::evaluate(&candidate.recipe, self.standard);
                            State::Done(self.select(
                                baseline,
                                baseline_compliance,
                                candidate,
                                candidate_compliance,
                                preferred_weight_g,
                                solver_calls,
                            ))
                        }
                        Err(EngineError::InfeasibleModel { reason }) => {
                            let trial = WeightTrial {
                                baseline_weight_g: baseline.recipe.total_weight_g,
                                target_weight_g: preferred_weight_g,
                                final_weight_g: baseline.recipe.total_weight_g,
                                accepted: false,
                                nutrition_compromise: None,
                                fallback_reason: Some(format!(
                                    "weight-guided pass found no feasible composition: {}",
                                    reason
                                )),
                            };
                            State::Done(StrategyResult {
                                strategy: Strategy::WeightGuidedFallback,
                                chosen: baseline,
                                compliance: baseline_compliance,
                                weight_trial: Some(trial),
                                solver_calls,
                            })
                        }
                        Err(other) => State::Failed(other),
                    }
                }
                State::Done(result) => return Ok(result),
                State::Failed(err) => return Err(err),
            };
            info!(from, to = state.name(), solver_calls, "strategy transition");
        }
    }

    fn select(
        &self,
        baseline: PassOutcome,
        baseline_compliance: ComplianceReport,
        candidate: PassOutcome,
        candidate_compliance: ComplianceReport,
        preferred_weight_g: f64,
        solver_calls: usize,
    ) -> StrategyResult {
        let compromise = candidate_compliance.score - baseline_compliance.score;
        let baseline_weight_g = baseline.recipe.total_weight_g;
        let candidate_weight_g = candidate.recipe.total_weight_g;

        match review_candidate(
            baseline_compliance.score,
            candidate_compliance.score,
            preferred_weight_g,
            candidate_weight_g,
        ) {
            Ok(()) => StrategyResult {
                strategy: Strategy::WeightGuided,
                chosen: candidate,
                compliance: candidate_compliance,
                weight_trial: Some(WeightTrial {
                    baseline_weight_g,
                    target_weight_g: preferred_weight_g,
                    final_weight_g: candidate_weight_g,
                    accepted: true,
                    nutrition_compromise: Some(compromise),
                    fallback_reason: None,
                }),
                solver_calls,
            },
            Err(reason) => {
                warn!(%reason, "weight-guided candidate rejected");
                StrategyResult {
                    strategy: Strategy::WeightGuidedFallback,
                    chosen: baseline,
                    compliance: baseline_compliance,
                    weight_trial: Some(WeightTrial {
                        baseline_weight_g,
                        target_weight_g: preferred_weight_g,
                        final_weight_g: baseline_weight_g,
                        accepted: false,
                        nutrition_compromise: Some(compromise),
                        fallback_reason: Some(reason),
                    }),
                    solver_calls,
                }
            }
        }
    }
}
