use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::path::Path;

use crate::dataset::{Ingredient, InstructionStep, Recipe, RecipeDataset, RecipeIngredientLink};

// Expected column headers per table
const INGREDIENT_ID_COL: &str = "ingredient_id";
const INGREDIENT_NAME_COL: &str = "ingredient_name";
const RECIPE_ID_COL: &str = "recipe_id";
const RECIPE_NAME_COL: &str = "recipe_name";
const CALORIES_COL: &str = "calories";
const FAT_COL: &str = "fat";
const CARB_COL: &str = "carbohydrates";
const PROTEIN_COL: &str = "protein";
const METHOD_COL: &str = "method";
const STEP_NO_COL: &str = "step_no";
const INSTRUCTION_COL: &str = "instruction";

fn open_reader(csv_path: &Path) -> Result<csv::Reader<std::fs::File>> {
    if !csv_path.exists() {
        return Err(anyhow::anyhow!("CSV file not found at: {:?}", csv_path));
    }
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file at {:?}", csv_path))?;
    Ok(ReaderBuilder::new().has_headers(true).from_reader(file))
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", name))
}

fn parse_u32(record: &csv::StringRecord, idx: usize, col: &str, row: usize) -> Result<u32> {
    record
        .get(idx)
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' at row {}", col, row))?
        .trim()
        .parse::<u32>()
        .with_context(|| format!("Invalid '{}' at row {}", col, row))
}

fn parse_f32(record: &csv::StringRecord, idx: usize, col: &str, row: usize) -> Result<f32> {
    record
        .get(idx)
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' at row {}", col, row))?
        .trim()
        .parse::<f32>()
        .with_context(|| format!("Invalid '{}' at row {}", col, row))
}

pub fn load_ingredients(csv_path: &Path) -> Result<Vec<Ingredient>> {
    let mut rdr = open_reader(csv_path)?;
    let headers = rdr.headers()?.clone();

    let id_idx = column_index(&headers, INGREDIENT_ID_COL)?;
    let name_idx = column_index(&headers, INGREDIENT_NAME_COL)?;

    let mut ingredients = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("Failed to read record at row index {}", row))?;
        let name = record
            .get(name_idx)
            .ok_or_else(|| anyhow::anyhow!("Missing ingredient name at row {}", row))?
            .trim()
            .to_string();
        if name.is_empty() {
            // Nameless ingredients cannot be shown on the selection form; skip.
            continue;
        }
        ingredients.push(Ingredient {
            ingredient_id: parse_u32(&record, id_idx, INGREDIENT_ID_COL, row)?,
            ingredient_name: name,
        });
    }

    Ok(ingredients)
}

pub fn load_recipes(csv_path: &Path) -> Result<Vec<Recipe>> {
    let mut rdr = open_reader(csv_path)?;
    let headers = rdr.headers()?.clone();

    let id_idx = column_index(&headers, RECIPE_ID_COL)?;
    let name_idx = column_index(&headers, RECIPE_NAME_COL)?;
    let calories_idx = column_index(&headers, CALORIES_COL)?;
    let fat_idx = column_index(&headers, FAT_COL)?;
    let carb_idx = column_index(&headers, CARB_COL)?;
    let protein_idx = column_index(&headers, PROTEIN_COL)?;

    let mut recipes = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("Failed to read record at row index {}", row))?;
        recipes.push(Recipe {
            recipe_id: parse_u32(&record, id_idx, RECIPE_ID_COL, row)?,
            recipe_name: record
                .get(name_idx)
                .ok_or_else(|| anyhow::anyhow!("Missing recipe name at row {}", row))?
                .trim()
                .to_string(),
            calories: parse_f32(&record, calories_idx, CALORIES_COL, row)?,
            fat: parse_f32(&record, fat_idx, FAT_COL, row)?,
            carbohydrates: parse_f32(&record, carb_idx, CARB_COL, row)?,
            protein: parse_f32(&record, protein_idx, PROTEIN_COL, row)?,
        });
    }

    if recipes.is_empty() {
        return Err(anyhow::anyhow!("No recipes loaded from {:?}", csv_path));
    }

    Ok(recipes)
}

pub fn load_recipe_ingredients(csv_path: &Path) -> Result<Vec<RecipeIngredientLink>> {
    let mut rdr = open_reader(csv_path)?;
    let headers = rdr.headers()?.clone();

    let recipe_idx = column_index(&headers, RECIPE_ID_COL)?;
    let ingredient_idx = column_index(&headers, INGREDIENT_ID_COL)?;

    let mut links = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("Failed to read record at row index {}", row))?;
        links.push(RecipeIngredientLink {
            recipe_id: parse_u32(&record, recipe_idx, RECIPE_ID_COL, row)?,
            ingredient_id: parse_u32(&record, ingredient_idx, INGREDIENT_ID_COL, row)?,
        });
    }

    Ok(links)
}

pub fn load_recipe_instructions(csv_path: &Path) -> Result<Vec<InstructionStep>> {
    let mut rdr = open_reader(csv_path)?;
    let headers = rdr.headers()?.clone();

    let recipe_idx = column_index(&headers, RECIPE_ID_COL)?;
    let method_idx = column_index(&headers, METHOD_COL)?;
    let step_idx = column_index(&headers, STEP_NO_COL)?;
    let instruction_idx = column_index(&headers, INSTRUCTION_COL)?;

    let mut steps = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("Failed to read record at row index {}", row))?;
        steps.push(InstructionStep {
            recipe_id: parse_u32(&record, recipe_idx, RECIPE_ID_COL, row)?,
            method: record
                .get(method_idx)
                .ok_or_else(|| anyhow::anyhow!("Missing method at row {}", row))?
                .trim()
                .to_string(),
            step_no: parse_u32(&record, step_idx, STEP_NO_COL, row)?,
            instruction: record
                .get(instruction_idx)
                .ok_or_else(|| anyhow::anyhow!("Missing instruction at row {}", row))?
                .trim()
                .to_string(),
        });
    }

    Ok(steps)
}

/// Loads the four recipe tables from a data directory and assembles the
/// immutable dataset store.
pub fn load_dataset(data_dir: &Path) -> Result<RecipeDataset> {
    let ingredients = load_ingredients(&data_dir.join("ingredients.csv"))
        .with_context(|| "Failed to load ingredients table")?;
    let recipes = load_recipes(&data_dir.join("recipes.csv"))
        .with_context(|| "Failed to load recipes table")?;
    let links = load_recipe_ingredients(&data_dir.join("recipe_ingredients.csv"))
        .with_context(|| "Failed to load recipe-ingredient links table")?;
    let instructions = load_recipe_instructions(&data_dir.join("recipe_instructions.csv"))
        .with_context(|| "Failed to load recipe instructions table")?;

    Ok(RecipeDataset::new(ingredients, recipes, links, instructions))
}
