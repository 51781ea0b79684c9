use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::nutrients::NutrientId;
use crate::profile::Species;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Protein,
    Vegetable,
    Grain,
    Fat,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Protein,
        Category::Vegetable,
        Category::Grain,
        Category::Fat,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Protein => "protein",
            Category::Vegetable => "vegetable",
            Category::Grain => "grain",
            Category::Fat => "fat",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "protein" | "meat" | "fish" => Ok(Category::Protein),
            "vegetable" | "fruit" => Ok(Category::Vegetable),
            "grain" | "carbohydrate" => Ok(Category::Grain),
            "fat" | "oil" | "nuts" => Ok(Category::Fat),
            "other" | "supplement" | "" => Ok(Category::Other),
            other => Err(format!("unknown ingredient category '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesSafety {
    pub dogs: bool,
    pub cats: bool,
}

impl SpeciesSafety {
    pub fn allows(&self, species: Species) -> bool {
        match species {
            Species::Dog => self.dogs,
            Species::Cat => self.cats,
        }
    }
}

/// One candidate ingredient. Every amount is per 100 g as-fed.
///
/// Absent values stay absent: a missing nutrient is never read as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub kcal_per_100g: Option<f64>,
    pub cost_per_100g: Option<f64>,
    pub nutrients: BTreeMap<NutrientId, f64>,
    pub safe_for: SpeciesSafety,
}

impl Ingredient {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            kcal_per_100g: None,
            cost_per_100g: None,
            nutrients: BTreeMap::new(),
            safe_for: SpeciesSafety {
                dogs: true,
                cats: true,
            },
        }
    }

    pub fn with_energy(mut self, kcal_per_100g: f64) -> Self {
        self.kcal_per_100g = Some(kcal_per_100g);
        self
    }

    pub fn with_cost(mut self, cost_per_100g: f64) -> Self {
        self.cost_per_100g = Some(cost_per_100g);
        self
    }

    pub fn with_nutrient(mut self, nutrient: NutrientId, per_100g: f64) -> Self {
        self.nutrients.insert(nutrient, per_100g);
        self
    }

    pub fn with_safety(mut self, dogs: bool, cats: bool) -> Self {
        self.safe_for = SpeciesSafety { dogs, cats };
        self
    }

    pub fn nutrient_per_100g(&self, nutrient: NutrientId) -> Option<f64> {
        self.nutrients.get(&nutrient).copied()
    }
}
