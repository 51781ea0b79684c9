pub mod balance;
pub mod compliance;
pub mod cost;
pub mod nutrition;
pub mod weight;

pub use balance::{CategoryShare, NutritionalBalance};
pub use compliance::{ComplianceReport, ComplianceStatus, NutrientCompliance};
pub use cost::CostSummary;
pub use nutrition::NutritionSummary;
pub use weight::{UserGuidance, WeightAnalysis, WeightCategory};
