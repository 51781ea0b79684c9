mod common;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pet_recipe_optim::analysis::ComplianceStatus;
use pet_recipe_optim::catalog::{load_catalog_csv, Category, Ingredient, IngredientCatalog};
use pet_recipe_optim::nutrients::NutrientId;
use pet_recipe_optim::optim::model::{LpModel, LpSolution};
use pet_recipe_optim::optim::{LpSolver, MicroLpSolver, Strategy};
use pet_recipe_optim::report::ResponseStatus;
use pet_recipe_optim::{
    EngineError, EngineResult, LifeStage, OptimizationOutcome, PetProfile, RecipeEngine,
    RecipeRequest, Species,
};

use common::{balanced_catalog, balanced_ingredients, catalog_of, engine, TEST_TIMEOUT};

const EPS: f64 = 1e-4;

fn request(life_stage: LifeStage, calories: f64, preferred: Option<f64>) -> RecipeRequest {
    RecipeRequest {
        pet_id: 42,
        species: life_stage.species(),
        life_stage,
        target_calories: calories,
        preferred_weight_g: preferred,
    }
}

/// Checks every hard constraint the optimiser promises.
fn assert_structural_invariants(outcome: &OptimizationOutcome) {
    let recipe = &outcome.recipe;
    let total = recipe.total_weight_g;
    let target = outcome.profile.target_calories;
    assert!(total > 0.0);

    let sum: f64 = recipe.lines.iter().map(|l| l.amount_g).sum();
    assert!((sum - total).abs() <= EPS * total, "lines sum {} vs total {}", sum, total);

    let kcal = recipe.actual_calories;
    assert!(kcal > 0.93 * target, "kcal {} on or below the band", kcal);
    assert!(kcal < 1.07 * target, "kcal {} on or above the band", kcal);
    assert!(outcome.energy_accuracy() >= 93.0);

    for line in &recipe.lines {
        assert!(line.amount_g > 0.0);
        assert!(
            line.amount_g <= 0.35 * total * (1.0 + EPS),
            "{} is {:.1}% of the recipe",
            line.id,
            line.amount_g / total * 100.0
        );
    }

    let protein = recipe.category_weight(Category::Protein) / total;
    let vegetable = recipe.category_weight(Category::Vegetable) / total;
    assert!(protein >= 0.40 - EPS && protein <= 0.70 + EPS, "protein share {}", protein);
    assert!(vegetable >= 0.15 - EPS, "vegetable share {}", vegetable);

    let compliance = &outcome.compliance;
    assert!((0.0..=100.0).contains(&compliance.score));
    let deficient = compliance
        .nutrients
        .iter()
        .any(|n| n.status == ComplianceStatus::Deficient);
    assert_eq!(compliance.compliant, !deficient);
}

#[tokio::test]
async fn test_adult_dog_recipe_is_compliant() {
    let engine = engine();
    let profile = PetProfile::new(LifeStage::DogAdult, 1000.0);
    let outcome = engine.optimize(&profile).await.unwrap();

    assert_structural_invariants(&outcome);
    assert_eq!(outcome.strategy, Strategy::NutritionFocused);
    // the energy term pulls delivered calories onto the target
    assert!(outcome.energy_accuracy() > 99.0, "{}", outcome.energy_accuracy());
    assert!(outcome.compliance.compliant);
    assert_eq!(outcome.compliance.violations().count(), 0);
    assert!(outcome.compliance.score > 80.0);
    assert!(outcome.weight_analysis.adjustment_success.is_none());
    assert!(outcome.user_guidance.is_none());
    assert!(outcome.solver_calls >= 1 && outcome.solver_calls <= 3);
}

#[tokio::test]
async fn test_every_life_stage_is_served() {
    let engine = engine();
    for (stage, calories) in [
        (LifeStage::DogPuppy, 1200.0),
        (LifeStage::DogAdult, 800.0),
        (LifeStage::CatAdult, 250.0),
        (LifeStage::CatKitten, 300.0),
    ] {
        let outcome = engine
            .optimize(&PetProfile::new(stage, calories))
            .await
            .unwrap();
        assert_structural_invariants(&outcome);
        assert!(outcome.compliance.compliant, "{} not compliant", stage);
        assert!(outcome.energy_accuracy() > 99.0, "{} missed its energy target", stage);
    }
}

#[tokio::test]
async fn test_response_document_shape() {
    let engine = engine();
    let response = engine
        .generate(&request(LifeStage::DogAdult, 1000.0, None))
        .await;
    assert_eq!(response.status, ResponseStatus::Success);
    assert!(response.error.is_none());

    let recipe = response.recipe.as_ref().unwrap();
    let wire_sum: f64 = recipe.ingredients.iter().map(|i| i.amount_g).sum();
    assert_eq!(recipe.total_weight_g, wire_sum);
    assert_eq!(recipe.target_calories, 1000.0);
    assert!(recipe.energy_accuracy >= 93.0);
    for ingredient in &recipe.ingredients {
        assert_eq!(ingredient.amount_g, (ingredient.amount_g * 100.0).round() / 100.0);
    }

    let analysis = response.analysis.as_ref().unwrap();
    assert!(analysis.aafco_compliance.compliant);
    assert_eq!(analysis.aafco_compliance.standard, "AAFCO-2016");
    assert!(analysis.nutrition.nutrients.contains_key(&NutrientId::Calcium));
    let balance = &analysis.nutritional_balance;
    assert!((0.0..=100.0).contains(&balance.balance_score));
    assert!(balance.category_breakdown.contains_key(&Category::Protein));
    assert!(balance.category_breakdown.contains_key(&Category::Vegetable));
    let share_sum: f64 = balance.category_breakdown.values().map(|c| c.percentage).sum();
    assert!((share_sum - 100.0).abs() < 0.5, "category shares sum to {}", share_sum);
    let counted: usize = balance
        .category_breakdown
        .values()
        .map(|c| c.ingredient_count)
        .sum();
    assert_eq!(counted, recipe.ingredients.len());

    let strategy = analysis.optimization_strategy.as_ref().unwrap();
    assert_eq!(strategy.optimization_strategy, "hybrid");
    assert_eq!(strategy.primary_mode, "nutrition_focused");
    assert!(!strategy.weight_preference_provided);

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "Success");
    assert!(json.get("error").is_none());
    assert!(json["recipe"]["ingredients"].as_array().unwrap().len() >= 2);
    assert!(json["analysis"]["nutritional_balance"]["category_breakdown"]["protein"].is_object());
    assert!(json["analysis"]["aafco_compliance"]["violations"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_random_targets_hold_invariants() {
    let engine = engine();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..5 {
        let calories: f64 = rng.gen_range(200.0..3000.0);
        let outcome = engine
            .optimize(&PetProfile::new(LifeStage::DogAdult, calories))
            .await
            .unwrap();
        assert_structural_invariants(&outcome);
    }
}

#[tokio::test]
async fn test_generation_is_deterministic() {
    let engine = engine();
    let req = request(LifeStage::DogAdult, 1000.0, Some(600.0));
    let first = engine.generate(&req).await;
    let second = engine.generate(&req).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_reachable_weight_preference_is_accepted() {
    let engine = engine();
    let profile = PetProfile::new(LifeStage::DogAdult, 1000.0).with_preferred_weight(600.0);
    let outcome = engine.optimize(&profile).await.unwrap();

    assert_structural_invariants(&outcome);
    assert_eq!(outcome.strategy, Strategy::WeightGuided);
    let weight = &outcome.weight_analysis;
    assert_eq!(weight.adjustment_success, Some(true));
    assert_eq!(weight.target_weight_g, Some(600.0));
    assert!(weight.fallback_reason.is_none());
    assert!(weight.nutrition_compromise.unwrap() >= -8.0);
    assert!((outcome.recipe.total_weight_g - 600.0).abs() / 600.0 <= 0.35);
    assert!(outcome.user_guidance.is_some());
}

#[tokio::test]
async fn test_unreachable_weight_falls_back_to_baseline() {
    let engine = engine();
    let baseline = engine
        .optimize(&PetProfile::new(LifeStage::DogAdult, 1000.0))
        .await
        .unwrap();
    let profile = PetProfile::new(LifeStage::DogAdult, 1000.0).with_preferred_weight(10_000.0);
    let outcome = engine.optimize(&profile).await.unwrap();

    assert_eq!(outcome.strategy, Strategy::WeightGuidedFallback);
    let weight = &outcome.weight_analysis;
    assert_eq!(weight.adjustment_success, Some(false));
    assert!(!weight.fallback_reason.as_deref().unwrap_or("").is_empty());
    assert_eq!(weight.baseline_weight_g, Some(weight.final_weight_g));
    assert!((outcome.recipe.total_weight_g - baseline.recipe.total_weight_g).abs() < 1e-6);
    assert_eq!(outcome.compliance.score, baseline.compliance.score);

    let response = engine
        .generate(&request(LifeStage::DogAdult, 1000.0, Some(10_000.0)))
        .await;
    let strategy = response.analysis.unwrap().optimization_strategy.unwrap();
    assert_eq!(strategy.primary_mode, "nutrition_focused");
    assert!(strategy.weight_preference_provided);
}

#[tokio::test]
async fn test_single_ingredient_is_infeasible() {
    let engine = RecipeEngine::new(catalog_of(&["chicken"]), TEST_TIMEOUT);
    let err = engine
        .optimize(&PetProfile::new(LifeStage::DogAdult, 1000.0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InfeasibleModel { .. }));

    let response = engine
        .generate(&request(LifeStage::DogAdult, 1000.0, None))
        .await;
    assert_eq!(response.status, ResponseStatus::Error);
    assert!(response.recipe.is_none());
    assert!(response
        .error
        .unwrap()
        .contains("no feasible nutrient-adequate composition"));
}

#[tokio::test]
async fn test_missing_nutrient_is_a_catalog_error() {
    let mut ingredients = balanced_ingredients();
    ingredients[0].nutrients.remove(&NutrientId::Selenium);
    let catalog = Arc::new(IngredientCatalog::new(ingredients).unwrap());
    let engine = RecipeEngine::new(catalog, TEST_TIMEOUT);

    let err = engine
        .optimize(&PetProfile::new(LifeStage::DogAdult, 1000.0))
        .await
        .unwrap_err();
    match err {
        EngineError::CatalogData { ingredient, detail } => {
            assert_eq!(ingredient, "chicken");
            assert!(detail.contains("selenium_ug"));
        }
        other => panic!("expected catalog error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_safe_ingredients_for_species() {
    let ingredients = balanced_ingredients()
        .into_iter()
        .map(|i| i.with_safety(true, false))
        .collect();
    let catalog = Arc::new(IngredientCatalog::new(ingredients).unwrap());
    let engine = RecipeEngine::new(catalog, TEST_TIMEOUT);

    let err = engine
        .optimize(&PetProfile::new(LifeStage::CatAdult, 250.0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_invalid_requests_are_rejected() {
    let engine = engine();
    let response = engine
        .generate(&request(LifeStage::DogAdult, -10.0, None))
        .await;
    assert_eq!(response.status, ResponseStatus::Error);
    assert!(response.error.unwrap().starts_with("invalid request"));

    let mismatched = RecipeRequest {
        species: Species::Dog,
        ..request(LifeStage::CatAdult, 250.0, None)
    };
    assert!(!engine.generate(&mismatched).await.is_success());

    let zero_weight = PetProfile::new(LifeStage::DogAdult, 1000.0).with_preferred_weight(0.0);
    assert!(matches!(
        engine.optimize(&zero_weight).await,
        Err(EngineError::InvalidRequest(_))
    ));
}

struct SlowSolver {
    delay: Duration,
}

impl LpSolver for SlowSolver {
    fn solve(&self, model: &LpModel) -> EngineResult<LpSolution> {
        thread::sleep(self.delay);
        MicroLpSolver.solve(model)
    }
}

#[tokio::test]
async fn test_solver_timeout_is_reported() {
    let solver = Arc::new(SlowSolver {
        delay: Duration::from_millis(500),
    });
    let engine = RecipeEngine::with_solver(balanced_catalog(), solver, Duration::from_millis(20));

    let err = engine
        .optimize(&PetProfile::new(LifeStage::DogAdult, 1000.0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::SolverTimeout { .. }));

    let response = engine
        .generate(&request(LifeStage::DogAdult, 1000.0, None))
        .await;
    assert!(response.error.unwrap().contains("time budget"));
}

#[tokio::test]
async fn test_bundled_catalog_serves_both_species() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/catalog.csv");
    let catalog = load_catalog_csv(&path).unwrap();
    assert!(catalog.get("grapes").is_some());
    let engine = RecipeEngine::new(Arc::new(catalog), TEST_TIMEOUT);

    let response = engine
        .generate(&request(LifeStage::DogAdult, 1000.0, None))
        .await;
    assert!(response.is_success(), "{:?}", response.error);
    let recipe = response.recipe.unwrap();
    assert!(recipe.ingredients.iter().all(|i| i.id != "grapes" && i.id != "onion"));

    let cat = engine.generate(&request(LifeStage::CatAdult, 250.0, None)).await;
    assert!(cat.is_success(), "{:?}", cat.error);
    let recipe = cat.recipe.unwrap();
    assert!(recipe
        .ingredients
        .iter()
        .all(|i| !["grapes", "onion", "oats", "sweet_potato"].contains(&i.id.as_str())));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_share_one_engine() {
    let engine = Arc::new(engine());
    let calories = [400.0, 800.0, 1200.0, 1600.0];

    let handles: Vec<_> = calories
        .iter()
        .map(|&kcal| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .generate(&request(LifeStage::DogAdult, kcal, None))
                    .await
            })
        })
        .collect();

    for (handle, kcal) in handles.into_iter().zip(calories) {
        let response = handle.await.unwrap();
        assert!(response.is_success());
        assert_eq!(response.recipe.unwrap().target_calories, kcal);
    }
}

#[test]
fn test_catalog_rejects_duplicate_ids() {
    let mut ingredients = balanced_ingredients();
    ingredients.push(Ingredient::new("chicken", "Chicken again", Category::Protein));
    assert!(IngredientCatalog::new(ingredients).is_err());
}
