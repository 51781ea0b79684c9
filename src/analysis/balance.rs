//! Category balance of a solved recipe, scored on a 0-100 scale.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::Category;
use crate::recipe::SolvedRecipe;

/// Protein share (percent) below which the balance score drops.
pub const PROTEIN_PERCENT_LOW: f64 = 30.0;
pub const PROTEIN_PERCENT_HIGH: f64 = 80.0;
pub const VEGETABLE_PERCENT_LOW: f64 = 10.0;
pub const FAT_PERCENT_HIGH: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub weight_g: f64,
    /// Percent of the total weight.
    pub percentage: f64,
    pub ingredient_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionalBalance {
    /// Only categories the recipe actually uses.
    pub category_breakdown: BTreeMap<Category, CategoryShare>,
    pub balance_score: f64,
    pub overall_assessment: &'static str,
}

/// Starts at 100 and loses points per percentage point outside the
/// comfortable band of each category.
pub fn balance_score(protein_pct: f64, vegetable_pct: f64, fat_pct: f64) -> f64 {
    let mut score = 100.0;
    if protein_pct < PROTEIN_PERCENT_LOW {
        score -= (PROTEIN_PERCENT_LOW - protein_pct) * 2.0;
    } else if protein_pct > PROTEIN_PERCENT_HIGH {
        score -= (protein_pct - PROTEIN_PERCENT_HIGH) * 1.5;
    }
    if vegetable_pct < VEGETABLE_PERCENT_LOW {
        score -= (VEGETABLE_PERCENT_LOW - vegetable_pct) * 3.0;
    }
    if fat_pct > FAT_PERCENT_HIGH {
        score -= (fat_pct - FAT_PERCENT_HIGH) * 2.0;
    }
    f64::max(score, 0.0)
}

pub fn assessment(score: f64) -> &'static str {
    if score >= 85.0 {
        "Well balanced: ingredient categories are combined sensibly"
    } else if score >= 70.0 {
        "Broadly balanced: consider adjusting the category proportions"
    } else {
        "Balance needs work: add vegetables or restructure the recipe"
    }
}

pub fn analyze(recipe: &SolvedRecipe) -> NutritionalBalance {
    let total = recipe.total_weight_g;
    let percent = |weight: f64| if total > 0.0 { weight / total * 100.0 } else { 0.0 };

    let category_breakdown: BTreeMap<Category, CategoryShare> = Category::ALL
        .into_iter()
        .filter_map(|category| {
            let count = recipe.lines.iter().filter(|l| l.category == category).count();
            if count == 0 {
                return None;
            }
            let weight_g = recipe.category_weight(category);
            Some((
                category,
                CategoryShare {
                    weight_g,
                    percentage: percent(weight_g),
                    ingredient_count: count,
                },
            ))
        })
        .collect();

    let share = |category: Category| percent(recipe.category_weight(category));
    let balance_score = balance_score(
        share(Category::Protein),
        share(Category::Vegetable),
        share(Category::Fat),
    );

    NutritionalBalance {
        category_breakdown,
        balance_score,
        overall_assessment: assessment(balance_score),
    }
}
