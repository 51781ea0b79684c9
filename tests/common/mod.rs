#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use pet_recipe_optim::catalog::{Category, Ingredient, IngredientCatalog};
use pet_recipe_optim::nutrients::NutrientId;
use pet_recipe_optim::RecipeEngine;

pub const TEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Per 100 g values in `NutrientId::ALL` order.
type Profile = [f64; 21];

fn ingredient(id: &str, name: &str, category: Category, kcal: f64, cost: f64, values: Profile) -> Ingredient {
    NutrientId::ALL
        .iter()
        .zip(values)
        .fold(
            Ingredient::new(id, name, category).with_energy(kcal).with_cost(cost),
            |ingredient, (&nutrient, value)| ingredient.with_nutrient(nutrient, value),
        )
}

/// Eleven ingredients that can be blended into a complete diet for every
/// life stage.
pub fn balanced_ingredients() -> Vec<Ingredient> {
    vec![
        ingredient(
            "chicken",
            "Chicken breast",
            Category::Protein,
            165.0,
            1.1,
            [31.0, 3.6, 0.0, 0.0, 15.0, 228.0, 256.0, 74.0, 29.0, 1.0, 1.0, 0.05, 27.6, 21.0, 5.0, 0.27, 0.07, 0.34, 0.11, 0.6, 0.05],
        ),
        ingredient(
            "beef",
            "Lean beef",
            Category::Protein,
            250.0,
            1.5,
            [26.0, 15.0, 0.0, 0.0, 18.0, 200.0, 318.0, 72.0, 21.0, 2.6, 6.3, 0.08, 21.0, 0.0, 7.0, 0.4, 0.05, 2.6, 0.18, 0.4, 0.05],
        ),
        ingredient(
            "salmon",
            "Salmon",
            Category::Protein,
            208.0,
            2.2,
            [20.0, 13.0, 0.0, 0.0, 9.0, 240.0, 363.0, 59.0, 27.0, 0.3, 0.4, 0.05, 36.0, 50.0, 526.0, 3.5, 0.2, 3.2, 0.38, 0.9, 2.5],
        ),
        ingredient(
            "liver",
            "Beef liver",
            Category::Protein,
            135.0,
            0.9,
            [20.0, 3.6, 3.9, 0.0, 5.0, 387.0, 313.0, 69.0, 18.0, 4.9, 4.0, 9.8, 40.0, 16898.0, 49.0, 0.4, 0.19, 59.0, 2.76, 0.4, 0.02],
        ),
        ingredient(
            "sweet_potato",
            "Sweet potato",
            Category::Vegetable,
            86.0,
            0.3,
            [1.6, 0.1, 20.0, 3.0, 30.0, 47.0, 337.0, 55.0, 25.0, 0.6, 0.3, 0.15, 0.6, 14187.0, 0.0, 0.26, 0.08, 0.0, 0.06, 0.01, 0.0],
        ),
        ingredient(
            "spinach",
            "Spinach",
            Category::Vegetable,
            23.0,
            0.6,
            [2.9, 0.4, 3.6, 2.2, 99.0, 49.0, 558.0, 79.0, 79.0, 2.7, 0.5, 0.13, 1.0, 9377.0, 0.0, 2.0, 0.08, 0.0, 0.19, 0.03, 0.14],
        ),
        ingredient(
            "carrot",
            "Carrot",
            Category::Vegetable,
            41.0,
            0.2,
            [0.9, 0.2, 9.6, 2.8, 33.0, 35.0, 320.0, 69.0, 12.0, 0.3, 0.2, 0.05, 0.1, 16706.0, 0.0, 0.66, 0.07, 0.0, 0.06, 0.1, 0.0],
        ),
        ingredient(
            "rice",
            "Brown rice",
            Category::Grain,
            112.0,
            0.25,
            [2.6, 0.9, 23.0, 1.8, 10.0, 83.0, 43.0, 5.0, 43.0, 0.4, 0.6, 0.1, 9.8, 0.0, 0.0, 0.03, 0.1, 0.0, 0.01, 0.3, 0.01],
        ),
        ingredient(
            "sunflower",
            "Sunflower oil",
            Category::Fat,
            884.0,
            0.4,
            [0.0, 100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 41.0, 0.0, 0.0, 0.0, 65.0, 0.0],
        ),
        ingredient(
            "fishoil",
            "Fish oil",
            Category::Fat,
            902.0,
            2.0,
            [0.0, 100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 30.0],
        ),
        ingredient(
            "premix",
            "Vitamin and mineral premix",
            Category::Other,
            50.0,
            5.0,
            [0.0, 0.0, 0.0, 0.0, 30000.0, 8000.0, 10000.0, 3000.0, 3000.0, 300.0, 600.0, 50.0, 2000.0, 0.0, 0.0, 300.0, 30.0, 200.0, 40.0, 0.0, 0.0],
        ),
    ]
}

pub fn balanced_catalog() -> Arc<IngredientCatalog> {
    Arc::new(IngredientCatalog::new(balanced_ingredients()).unwrap())
}

pub fn catalog_of(ids: &[&str]) -> Arc<IngredientCatalog> {
    let picked = balanced_ingredients()
        .into_iter()
        .filter(|i| ids.contains(&i.id.as_str()))
        .collect();
    Arc::new(IngredientCatalog::new(picked).unwrap())
}

pub fn engine() -> RecipeEngine {
    RecipeEngine::new(balanced_catalog(), TEST_TIMEOUT)
}
