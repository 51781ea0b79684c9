use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit a nutrient amount is expressed in, both in the catalog (per 100 g)
/// and in the standards (per 1000 kcal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NutrientUnit {
    G,
    Mg,
    Ug,
    Iu,
}

impl fmt::Display for NutrientUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NutrientUnit::G => "g",
            NutrientUnit::Mg => "mg",
            NutrientUnit::Ug => "ug",
            NutrientUnit::Iu => "IU",
        };
        f.write_str(s)
    }
}

/// Every nutrient the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientId {
    Protein,
    Fat,
    Carbohydrate,
    Fiber,
    Calcium,
    Phosphorus,
    Potassium,
    Sodium,
    Magnesium,
    Iron,
    Zinc,
    Copper,
    Selenium,
    VitaminA,
    VitaminD,
    VitaminE,
    Thiamine,
    VitaminB12,
    Riboflavin,
    LinoleicAcid,
    AlphaLinolenicAcid,
}

impl NutrientId {
    pub const ALL: [NutrientId; 21] = [
        NutrientId::Protein,
        NutrientId::Fat,
        NutrientId::Carbohydrate,
        NutrientId::Fiber,
        NutrientId::Calcium,
        NutrientId::Phosphorus,
        NutrientId::Potassium,
        NutrientId::Sodium,
        NutrientId::Magnesium,
        NutrientId::Iron,
        NutrientId::Zinc,
        NutrientId::Copper,
        NutrientId::Selenium,
        NutrientId::VitaminA,
        NutrientId::VitaminD,
        NutrientId::VitaminE,
        NutrientId::Thiamine,
        NutrientId::VitaminB12,
        NutrientId::Riboflavin,
        NutrientId::LinoleicAcid,
        NutrientId::AlphaLinolenicAcid,
    ];

    /// Macro fields reported in the nutrition summary regardless of the standard.
    pub const MACROS: [NutrientId; 4] = [
        NutrientId::Protein,
        NutrientId::Fat,
        NutrientId::Carbohydrate,
        NutrientId::Fiber,
    ];

    pub fn unit(self) -> NutrientUnit {
        use NutrientId::*;
        match self {
            Protein | Fat | Carbohydrate | Fiber | LinoleicAcid | AlphaLinolenicAcid => {
                NutrientUnit::G
            }
            Calcium | Phosphorus | Potassium | Sodium | Magnesium | Iron | Zinc | Copper
            | VitaminE | Thiamine | Riboflavin => NutrientUnit::Mg,
            Selenium | VitaminB12 => NutrientUnit::Ug,
            VitaminA | VitaminD => NutrientUnit::Iu,
        }
    }

    /// Stable snake_case key, used in JSON output and as the CSV column stem.
    pub fn key(self) -> &'static str {
        use NutrientId::*;
        match self {
            Protein => "protein",
            Fat => "fat",
            Carbohydrate => "carbohydrate",
            Fiber => "fiber",
            Calcium => "calcium",
            Phosphorus => "phosphorus",
            Potassium => "potassium",
            Sodium => "sodium",
            Magnesium => "magnesium",
            Iron => "iron",
            Zinc => "zinc",
            Copper => "copper",
            Selenium => "selenium",
            VitaminA => "vitamin_a",
            VitaminD => "vitamin_d",
            VitaminE => "vitamin_e",
            Thiamine => "thiamine",
            VitaminB12 => "vitamin_b12",
            Riboflavin => "riboflavin",
            LinoleicAcid => "linoleic_acid",
            AlphaLinolenicAcid => "alpha_linolenic_acid",
        }
    }

    /// Catalog column holding the amount per 100 g, e.g. `calcium_mg`.
    pub fn csv_column(self) -> String {
        let suffix = match self.unit() {
            NutrientUnit::G => "g",
            NutrientUnit::Mg => "mg",
            NutrientUnit::Ug => "ug",
            NutrientUnit::Iu => "iu",
        };
        format!("{}_{}", self.key(), suffix)
    }

    /// Relative priority used to scale deficiency/excess penalties.
    pub fn importance(self) -> f64 {
        match self {
            NutrientId::Protein => 10.0,
            NutrientId::Fat => 8.0,
            NutrientId::Calcium | NutrientId::Phosphorus => 7.0,
            NutrientId::Iron | NutrientId::Zinc => 5.0,
            NutrientId::Sodium => 3.0,
            _ => 4.0,
        }
    }
}

impl fmt::Display for NutrientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
