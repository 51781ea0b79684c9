//! Solver-independent linear program.
//!
//! The builder and the objective composer only ever touch this plain data
//! model; translating it into a concrete solver happens in `solver.rs`.

use std::fmt;

use crate::catalog::Category;
use crate::nutrients::NutrientId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a decision variable stands for. Used for logging and for reading
/// the solution back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// Grams of the candidate at this position.
    Ingredient(usize),
    TotalWeight,
    Deficiency(NutrientId),
    Excess(NutrientId),
    CategoryOverflow(Category),
    EnergyOver,
    EnergyUnder,
    WeightOver,
    WeightUnder,
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarKind::Ingredient(i) => write!(f, "g[{}]", i),
            VarKind::TotalWeight => f.write_str("total_weight"),
            VarKind::Deficiency(n) => write!(f, "deficit[{}]", n),
            VarKind::Excess(n) => write!(f, "excess[{}]", n),
            VarKind::CategoryOverflow(c) => write!(f, "overflow[{}]", c),
            VarKind::EnergyOver => f.write_str("energy_over"),
            VarKind::EnergyUnder => f.write_str("energy_under"),
            VarKind::WeightOver => f.write_str("weight_over"),
            VarKind::WeightUnder => f.write_str("weight_under"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDef {
    pub kind: VarKind,
    pub lower: f64,
    pub upper: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, var: VarId, coefficient: f64) {
        if coefficient != 0.0 {
            self.terms.push((var, coefficient));
        }
    }

    pub fn with(mut self, var: VarId, coefficient: f64) -> Self {
        self.add(var, coefficient);
        self
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(v, c)| c * values.get(v.index()).copied().unwrap_or(0.0))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Le,
    Ge,
    Eq,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub name: String,
    pub expr: LinearExpr,
    pub sense: Sense,
    pub rhs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowId(usize);

/// Variables, constraint rows and a minimisation objective.
#[derive(Debug, Clone, Default)]
pub struct LpModel {
    vars: Vec<VarDef>,
    rows: Vec<Row>,
    objective: LinearExpr,
}

impl LpModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable bounded below by zero.
    pub fn add_var(&mut self, kind: VarKind, upper: Option<f64>) -> VarId {
        self.vars.push(VarDef {
            kind,
            lower: 0.0,
            upper,
        });
        VarId(self.vars.len() - 1)
    }

    pub fn add_row(
        &mut self,
        name: impl Into<String>,
        expr: LinearExpr,
        sense: Sense,
        rhs: f64,
    ) -> RowId {
        self.rows.push(Row {
            name: name.into(),
            expr,
            sense,
            rhs,
        });
        RowId(self.rows.len() - 1)
    }

    /// Adds a term to an existing row, e.g. an elastic slack.
    pub fn add_to_row(&mut self, row: RowId, var: VarId, coefficient: f64) {
        if let Some(r) = self.rows.get_mut(row.0) {
            r.expr.add(var, coefficient);
        }
    }

    pub fn add_to_objective(&mut self, var: VarId, coefficient: f64) {
        self.objective.add(var, coefficient);
    }

    pub fn vars(&self) -> &[VarDef] {
        &self.vars
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, row: RowId) -> Option<&Row> {
        self.rows.get(row.0)
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn find_var(&self, kind: VarKind) -> Option<VarId> {
        self.vars.iter().position(|v| v.kind == kind).map(VarId)
    }
}

/// Raw solver output: one value per variable, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    pub values: Vec<f64>,
    pub objective: f64,
}

impl LpSolution {
    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.index()).copied().unwrap_or(0.0)
    }
}
