use std::sync::Arc;
use std::time::{Duration, Instant};

use good_lp::{
    constraint, microlp, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use tracing::{debug, warn};

use super::model::{LinearExpr, LpModel, LpSolution, Sense};
use crate::error::{EngineError, EngineResult};

/// Anything that can minimise an [`LpModel`].
///
/// Implementations are called from a blocking worker thread.
pub trait LpSolver: Send + Sync {
    fn solve(&self, model: &LpModel) -> EngineResult<LpSolution>;
}

/// Pure-Rust simplex backend through `good_lp`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MicroLpSolver;

fn to_expression(expr: &LinearExpr, vars: &[Variable]) -> Expression {
    let mut out = Expression::default();
    for &(v, coef) in expr.terms() {
        if let Some(&var) = vars.get(v.index()) {
            out += var * coef;
        }
    }
    out
}

impl LpSolver for MicroLpSolver {
    fn solve(&self, model: &LpModel) -> EngineResult<LpSolution> {
        let mut pb = ProblemVariables::new();
        let vars: Vec<Variable> = model
            .vars()
            .iter()
            .map(|def| {
                let mut v = variable().min(def.lower);
                if let Some(upper) = def.upper {
                    v = v.max(upper);
                }
                pb.add(v)
            })
            .collect();

        let objective = to_expression(model.objective(), &vars);
        let mut problem = pb.minimise(objective).using(microlp);
        for row in model.rows() {
            let lhs = to_expression(&row.expr, &vars);
            let rhs = Expression::default() + row.rhs;
            let c = match row.sense {
                Sense::Le => constraint::leq(lhs, rhs),
                Sense::Ge => constraint::geq(lhs, rhs),
                Sense::Eq => constraint::eq(lhs, rhs),
            };
            problem = problem.with(c);
        }

        let solution = problem.solve().map_err(|e| match e {
            ResolutionError::Infeasible => {
                EngineError::infeasible("hard constraints cannot be satisfied together")
            }
            ResolutionError::Unbounded => EngineError::infeasible("objective is unbounded"),
            other => EngineError::infeasible(format!("solver failure: {}", other)),
        })?;

        let values: Vec<f64> = vars.iter().map(|&v| solution.value(v)).collect();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::infeasible("solver returned non-finite values"));
        }
        let objective = model.objective().evaluate(&values);
        if !objective.is_finite() {
            return Err(EngineError::infeasible("solver returned a non-finite objective"));
        }
        Ok(LpSolution { values, objective })
    }
}

/// Runs a solver on the blocking pool under a wall-clock budget.
///
/// On expiry the worker is abandoned; its result is dropped when it finishes.
#[derive(Clone)]
pub struct TimedSolver {
    inner: Arc<dyn LpSolver>,
    timeout: Duration,
}

impl TimedSolver {
    pub fn new(inner: Arc<dyn LpSolver>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn solve(&self, model: LpModel) -> EngineResult<LpSolution> {
        let solver = Arc::clone(&self.inner);
        let started = Instant::now();
        let task = tokio::task::spawn_blocking(move || solver.solve(&model));

        match tokio::time::timeout(self.timeout, task).await {
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "solver timed out");
                Err(EngineError::SolverTimeout {
                    after: self.timeout,
                })
            }
            Ok(Err(join_error)) => Err(EngineError::infeasible(format!(
                "solver worker failed: {}",
                join_error
            ))),
            Ok(Ok(result)) => {
                debug!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    ok = result.is_ok(),
                    "solver returned"
                );
                result
            }
        }
    }
}

impl std::fmt::Debug for TimedSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedSolver")
            .field("inner", &"<dyn LpSolver>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
