//! Weight assessment of a finished recipe and the guidance derived from it.

use serde::Serialize;

use crate::optim::strategy::{Strategy, WeightTrial};

pub const MIN_REASONABLE_WEIGHT_G: f64 = 50.0;
pub const MAX_REASONABLE_WEIGHT_G: f64 = 2000.0;
pub const MIN_REASONABLE_DENSITY: f64 = 1.5;
pub const MAX_REASONABLE_DENSITY: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightCategory {
    HighDensity,
    MediumDensity,
    LowDensity,
    VeryLowDensity,
}

fn density(weight_g: f64, kcal: f64) -> f64 {
    if weight_g > 0.0 {
        kcal / weight_g
    } else {
        0.0
    }
}

/// Bands on kcal per gram.
pub fn categorize(weight_g: f64, kcal: f64) -> WeightCategory {
    let d = density(weight_g, kcal);
    if d > 4.0 {
        WeightCategory::HighDensity
    } else if d > 3.0 {
        WeightCategory::MediumDensity
    } else if d > 2.0 {
        WeightCategory::LowDensity
    } else {
        WeightCategory::VeryLowDensity
    }
}

pub fn is_reasonable(weight_g: f64, kcal: f64) -> bool {
    if !(MIN_REASONABLE_WEIGHT_G..=MAX_REASONABLE_WEIGHT_G).contains(&weight_g) {
        return false;
    }
    (MIN_REASONABLE_DENSITY..=MAX_REASONABLE_DENSITY).contains(&density(weight_g, kcal))
}

pub fn suggestions(weight_g: f64, kcal: f64) -> Vec<String> {
    let mut out = Vec::new();
    if weight_g < 150.0 {
        out.push("Light batch: suited to preparing several small portions in advance".to_string());
    } else if weight_g > 1000.0 {
        out.push("Heavy batch: portion it out and freeze what is not fed within a day".to_string());
    }
    let d = density(weight_g, kcal);
    if d > 4.5 {
        out.push("High energy density: measure portions carefully".to_string());
    } else if d < 2.5 {
        out.push("Low energy density: make sure the pet can eat the full amount".to_string());
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightAnalysis {
    pub optimization_mode: &'static str,
    pub weight_category: WeightCategory,
    pub weight_reasonable: bool,
    pub suggested_adjustments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_weight_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight_g: Option<f64>,
    pub final_weight_g: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment_success: Option<bool>,
    /// Compliance score change of the weight-guided candidate over the
    /// baseline; negative is a loss.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition_compromise: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

fn recommendation(trial: &WeightTrial) -> String {
    let drop = trial.nutrition_compromise.map_or(0.0, |c| -c);
    let deviation = (trial.final_weight_g - trial.target_weight_g).abs() / trial.target_weight_g;
    let text = if trial.accepted && drop <= 3.0 {
        "Adjusted to the preferred weight with nutritional quality preserved"
    } else if trial.accepted && drop <= 5.0 {
        "Adjusted to the preferred weight with a slight, acceptable nutritional compromise"
    } else if trial.accepted {
        "Adjusted to the preferred weight, but nutrition was noticeably compromised; consider the nutrition-focused recipe"
    } else if deviation < 0.2 {
        "Close to the preferred weight with good nutritional quality"
    } else {
        "The preferred weight could not be reached; the nutrition-focused recipe is recommended"
    };
    text.to_string()
}

/// Builds the weight section for whichever branch produced the recipe.
pub fn analyze(
    strategy: Strategy,
    trial: Option<&WeightTrial>,
    final_weight_g: f64,
    kcal: f64,
) -> WeightAnalysis {
    let mut analysis = WeightAnalysis {
        optimization_mode: strategy.as_str(),
        weight_category: categorize(final_weight_g, kcal),
        weight_reasonable: is_reasonable(final_weight_g, kcal),
        suggested_adjustments: suggestions(final_weight_g, kcal),
        baseline_weight_g: None,
        target_weight_g: None,
        final_weight_g,
        adjustment_success: None,
        nutrition_compromise: None,
        fallback_reason: None,
        recommendation: None,
    };
    if let Some(trial) = trial {
        analysis.baseline_weight_g = Some(trial.baseline_weight_g);
        analysis.target_weight_g = Some(trial.target_weight_g);
        analysis.adjustment_success = Some(trial.accepted);
        analysis.nutrition_compromise = trial.nutrition_compromise;
        analysis.fallback_reason = trial.fallback_reason.clone();
        analysis.recommendation = Some(recommendation(trial));
    }
    analysis
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserGuidance {
    /// Deviation from the preferred weight, in percent.
    pub weight_achievement: f64,
    pub weight_achievement_category: &'static str,
    pub next_steps: Vec<String>,
}

pub fn achievement_category(deviation_percent: f64) -> &'static str {
    if deviation_percent <= 5.0 {
        "fully_achieved"
    } else if deviation_percent <= 15.0 {
        "mostly_achieved"
    } else if deviation_percent <= 30.0 {
        "partially_achieved"
    } else {
        "significant_deviation"
    }
}

pub fn guidance(preferred_weight_g: f64, analysis: &WeightAnalysis) -> UserGuidance {
    let deviation =
        (analysis.final_weight_g - preferred_weight_g).abs() / preferred_weight_g * 100.0;
    let mut next_steps = Vec::new();
    if analysis.adjustment_success == Some(true) {
        next_steps.push("Weight adjustment succeeded; the recipe can be used as is".to_string());
    } else {
        next_steps.push("If nutritional quality matters most, use the current recipe".to_string());
        next_steps.push(
            "If a specific weight is required, prepare it in several batches or rebalance the ingredients"
                .to_string(),
        );
    }
    if analysis.nutrition_compromise.map_or(false, |c| c < -5.0) {
        next_steps.push(
            "The recipe trades some nutritional quality for weight; weigh both needs".to_string(),
        );
    }
    UserGuidance {
        weight_achievement: deviation,
        weight_achievement_category: achievement_category(deviation),
        next_steps,
    }
}
