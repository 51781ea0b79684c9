pub mod data_loader;
pub mod ingredient;

pub use data_loader::load_catalog_csv;
pub use ingredient::{Category, Ingredient, SpeciesSafety};

use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::nutrients::NutrientId;
use crate::profile::Species;
use crate::standards::LifeStageStandard;

/// Read-only snapshot of the candidate ingredients.
///
/// Built once at start-up and shared behind an `Arc`; there is no mutation
/// path after construction.
#[derive(Debug, Clone)]
pub struct IngredientCatalog {
    ingredients: Vec<Ingredient>,
}

impl IngredientCatalog {
    pub fn new(ingredients: Vec<Ingredient>) -> EngineResult<Self> {
        let mut seen = HashSet::new();
        for ingredient in &ingredients {
            if !seen.insert(ingredient.id.as_str()) {
                return Err(EngineError::catalog(&ingredient.id, "duplicate ingredient id"));
            }
        }
        Ok(Self { ingredients })
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.id == id)
    }

    /// Species-safe ingredients, minus those known to carry no energy.
    /// Ingredients with no energy value at all are kept so validation rejects them.
    pub fn for_species(&self, species: Species) -> Vec<&Ingredient> {
        self.ingredients
            .iter()
            .filter(|i| i.safe_for.allows(species))
            .filter(|i| i.kcal_per_100g.map_or(true, |k| k > 0.0))
            .collect()
    }
}

/// An ingredient whose every value needed by the model has been checked.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub ingredient: &'a Ingredient,
    pub kcal_per_100g: f64,
    pub cost_per_100g: f64,
    nutrients: BTreeMap<NutrientId, f64>,
}

impl<'a> Candidate<'a> {
    pub fn id(&self) -> &str {
        &self.ingredient.id
    }

    pub fn category(&self) -> Category {
        self.ingredient.category
    }

    /// Amount per 100 g of a nutrient that was part of validation.
    pub fn per_100g(&self, nutrient: NutrientId) -> f64 {
        self.nutrients.get(&nutrient).copied().unwrap_or(0.0)
    }

    pub fn nutrients(&self) -> impl Iterator<Item = (NutrientId, f64)> + '_ {
        self.nutrients.iter().map(|(&n, &v)| (n, v))
    }
}

fn checked_value(ingredient: &Ingredient, field: &str, value: Option<f64>) -> EngineResult<f64> {
    match value {
        None => Err(EngineError::catalog(
            &ingredient.id,
            format!("missing required field '{}'", field),
        )),
        Some(v) if !v.is_finite() || v < 0.0 => Err(EngineError::catalog(
            &ingredient.id,
            format!("field '{}' has invalid value {}", field, v),
        )),
        Some(v) => Ok(v),
    }
}

/// Checks that every ingredient carries energy, cost, the macro fields and
/// every nutrient the standard constrains. Fails on the first offender.
pub fn validate_candidates<'a>(
    ingredients: &[&'a Ingredient],
    standard: &LifeStageStandard,
) -> EngineResult<Vec<Candidate<'a>>> {
    let mut required: Vec<NutrientId> = standard.nutrients().collect();
    for m in NutrientId::MACROS {
        if !required.contains(&m) {
            required.push(m);
        }
    }

    let mut candidates = Vec::with_capacity(ingredients.len());
    for &ingredient in ingredients {
        let kcal_per_100g = checked_value(ingredient, "kcal_per_100g", ingredient.kcal_per_100g)?;
        let cost_per_100g = checked_value(ingredient, "cost_per_100g", ingredient.cost_per_100g)?;
        let mut nutrients = BTreeMap::new();
        for &nutrient in &required {
            let value = checked_value(
                ingredient,
                &nutrient.csv_column(),
                ingredient.nutrient_per_100g(nutrient),
            )?;
            nutrients.insert(nutrient, value);
        }
        candidates.push(Candidate {
            ingredient,
            kcal_per_100g,
            cost_per_100g,
            nutrients,
        });
    }
    debug!(count = candidates.len(), "validated candidate ingredients");
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::LifeStage;
    use crate::standards::NutrientStandardTable;

    fn complete(id: &str, category: Category) -> Ingredient {
        let mut ingredient = Ingredient::new(id, id, category)
            .with_energy(100.0)
            .with_cost(1.0);
        for n in NutrientId::ALL {
            ingredient = ingredient.with_nutrient(n, 1.0);
        }
        ingredient
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = IngredientCatalog::new(vec![
            complete("a", Category::Protein),
            complete("a", Category::Grain),
        ]);
        assert!(matches!(result, Err(EngineError::CatalogData { .. })));
    }

    #[test]
    fn test_for_species_filters_unsafe_and_energyless() {
        let catalog = IngredientCatalog::new(vec![
            complete("chicken", Category::Protein),
            complete("grapes", Category::Vegetable).with_safety(false, false),
            complete("onion", Category::Vegetable).with_safety(false, true),
            complete("water", Category::Other).with_energy(0.0),
        ])
        .unwrap();
        let dog: Vec<&str> = catalog
            .for_species(Species::Dog)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(dog, vec!["chicken"]);
        let cat: Vec<&str> = catalog
            .for_species(Species::Cat)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(cat, vec!["chicken", "onion"]);
    }

    #[test]
    fn test_validation_fails_fast_on_missing_nutrient() {
        let standard = NutrientStandardTable::aafco()
            .for_stage(LifeStage::DogAdult)
            .unwrap();
        let mut liver = complete("liver", Category::Protein);
        liver.nutrients.remove(&NutrientId::Copper);
        let chicken = complete("chicken", Category::Protein);
        let err = validate_candidates(&[&chicken, &liver], standard).unwrap_err();
        match err {
            EngineError::CatalogData { ingredient, detail } => {
                assert_eq!(ingredient, "liver");
                assert!(detail.contains("copper_mg"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_validation_rejects_negative_cost() {
        let standard = NutrientStandardTable::aafco()
            .for_stage(LifeStage::CatAdult)
            .unwrap();
        let fish = complete("fish", Category::Protein).with_cost(-2.0);
        assert!(validate_candidates(&[&fish], standard).is_err());
    }

    #[test]
    fn test_validated_candidate_exposes_values() {
        let standard = NutrientStandardTable::aafco()
            .for_stage(LifeStage::DogAdult)
            .unwrap();
        let rice = complete("rice", Category::Grain).with_nutrient(NutrientId::Fiber, 1.8);
        let candidates = validate_candidates(&[&rice], standard).unwrap();
        assert_eq!(candidates[0].per_100g(NutrientId::Fiber), 1.8);
        assert_eq!(candidates[0].kcal_per_100g, 100.0);
    }
}
