use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

use super::ingredient::{Category, Ingredient, SpeciesSafety};
use super::IngredientCatalog;
use crate::nutrients::NutrientId;

const ID_COL: &str = "id";
const NAME_COL: &str = "name";
const CATEGORY_COL: &str = "category";
const SAFE_DOGS_COL: &str = "safe_for_dogs";
const SAFE_CATS_COL: &str = "safe_for_cats";
const KCAL_COL: &str = "kcal_per_100g";
const COST_COL: &str = "cost_per_100g";

fn parse_optional_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_flag(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", name))
}

/// Loads the ingredient catalog from a CSV file.
///
/// Numeric cells that are empty or unparsable are kept as absent values; the
/// optimiser rejects such ingredients if a constraint needs them.
pub fn load_catalog_csv(csv_path: &Path) -> Result<IngredientCatalog> {
    if !csv_path.exists() {
        return Err(anyhow::anyhow!("Catalog CSV file not found at: {:?}", csv_path));
    }

    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open catalog CSV file at {:?}", csv_path))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = rdr.headers()?.clone();

    let id_idx = column_index(&headers, ID_COL)?;
    let name_idx = column_index(&headers, NAME_COL)?;
    let category_idx = column_index(&headers, CATEGORY_COL)?;
    let dogs_idx = column_index(&headers, SAFE_DOGS_COL)?;
    let cats_idx = column_index(&headers, SAFE_CATS_COL)?;
    let kcal_idx = column_index(&headers, KCAL_COL)?;
    let cost_idx = column_index(&headers, COST_COL)?;

    let mut nutrient_columns = Vec::new();
    for nutrient in NutrientId::ALL {
        let column = nutrient.csv_column();
        match headers.iter().position(|h| h.trim() == column) {
            Some(idx) => nutrient_columns.push((nutrient, idx)),
            None => warn!(column = %column, "catalog has no column for nutrient"),
        }
    }

    let mut ingredients = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("Failed to read record at row index {}", row_index))?;

        let id = record.get(id_idx).unwrap_or_default().trim().to_string();
        if id.is_empty() {
            continue;
        }

        let name = record
            .get(name_idx)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| id.clone());

        let category: Category = record
            .get(category_idx)
            .unwrap_or_default()
            .parse()
            .map_err(|e: String| {
                anyhow::anyhow!("{} (ingredient '{}', row {})", e, id, row_index)
            })?;

        let mut nutrients = BTreeMap::new();
        for &(nutrient, idx) in &nutrient_columns {
            if let Some(value) = record.get(idx).and_then(parse_optional_f64) {
                nutrients.insert(nutrient, value);
            }
        }

        ingredients.push(Ingredient {
            id,
            name,
            category,
            kcal_per_100g: record.get(kcal_idx).and_then(parse_optional_f64),
            cost_per_100g: record.get(cost_idx).and_then(parse_optional_f64),
            nutrients,
            safe_for: SpeciesSafety {
                dogs: record.get(dogs_idx).map_or(false, parse_flag),
                cats: record.get(cats_idx).map_or(false, parse_flag),
            },
        });
    }

    if ingredients.is_empty() {
        return Err(anyhow::anyhow!("No valid ingredients loaded from {:?}", csv_path));
    }

    let catalog = IngredientCatalog::new(ingredients)
        .with_context(|| format!("Invalid catalog in {:?}", csv_path))?;
    info!(count = catalog.len(), path = ?csv_path, "ingredient catalog loaded");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn header() -> String {
        let mut cols = vec![
            ID_COL.to_string(),
            NAME_COL.to_string(),
            CATEGORY_COL.to_string(),
            SAFE_DOGS_COL.to_string(),
            SAFE_CATS_COL.to_string(),
            KCAL_COL.to_string(),
            COST_COL.to_string(),
        ];
        cols.extend(NutrientId::ALL.iter().map(|n| n.csv_column()));
        cols.join(",")
    }

    fn row(id: &str, category: &str, kcal: &str, fill: &str) -> String {
        let mut cells = vec![
            id.to_string(),
            format!("{} name", id),
            category.to_string(),
            "true".to_string(),
            "false".to_string(),
            kcal.to_string(),
            "0.5".to_string(),
        ];
        cells.extend(NutrientId::ALL.iter().map(|_| fill.to_string()));
        cells.join(",")
    }

    fn create_test_csv_file() -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{}", header())?;
        writeln!(file, "{}", row("chicken", "protein", "165", "1.5"))?;
        writeln!(file, "{}", row("carrot", "vegetable", "", "0.2"))?; // missing kcal
        writeln!(file, "{}", row("", "grain", "100", "1"))?; // empty id
        writeln!(file, "{}", row("oil", "fat", "884", "text"))?; // unparsable nutrients
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_load_catalog_success() -> Result<()> {
        let file = create_test_csv_file()?;
        let catalog = load_catalog_csv(file.path())?;

        assert_eq!(catalog.len(), 3);

        let chicken = catalog.get("chicken").unwrap();
        assert_eq!(chicken.kcal_per_100g, Some(165.0));
        assert_eq!(chicken.category, Category::Protein);
        assert_eq!(chicken.nutrient_per_100g(NutrientId::Zinc), Some(1.5));
        assert!(chicken.safe_for.dogs);
        assert!(!chicken.safe_for.cats);

        let carrot = catalog.get("carrot").unwrap();
        assert_eq!(carrot.kcal_per_100g, None);

        let oil = catalog.get("oil").unwrap();
        assert!(oil.nutrients.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_catalog_missing_column() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{},{},{}", ID_COL, NAME_COL, CATEGORY_COL)?;
        writeln!(file, "a,Apple,vegetable")?;
        file.flush()?;

        let result = load_catalog_csv(file.path());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains(&format!("Column '{}' not found", SAFE_DOGS_COL)));
        Ok(())
    }

    #[test]
    fn test_load_catalog_unknown_category() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{}", header())?;
        writeln!(file, "{}", row("rock", "mineral", "1", "0"))?;
        file.flush()?;

        let err = load_catalog_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("unknown ingredient category"));
        Ok(())
    }

    #[test]
    fn test_load_catalog_empty_file_with_headers() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{}", header())?;
        file.flush()?;

        let result = load_catalog_csv(file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("No valid ingredients loaded"));
        Ok(())
    }

    #[test]
    fn test_load_catalog_file_not_found() {
        let path = Path::new("this_catalog_does_not_exist.csv");
        let result = load_catalog_csv(path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Catalog CSV file not found"));
    }

    #[test]
    fn test_load_catalog_duplicate_ids() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{}", header())?;
        writeln!(file, "{}", row("beef", "protein", "250", "1"))?;
        writeln!(file, "{}", row("beef", "protein", "250", "1"))?;
        file.flush()?;

        let err = load_catalog_csv(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("duplicate ingredient id"));
        Ok(())
    }
}
