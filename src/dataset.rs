use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ingredient {
    pub ingredient_id: u32,
    pub ingredient_name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Recipe {
    pub recipe_id: u32,
    pub recipe_name: String,
    pub calories: f32,
    pub fat: f32,
    pub carbohydrates: f32,
    pub protein: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipeIngredientLink {
    pub recipe_id: u32,
    pub ingredient_id: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InstructionStep {
    pub recipe_id: u32,
    pub method: String,
    pub step_no: u32,
    pub instruction: String,
}

/// Immutable in-memory store for the four recipe tables.
///
/// Built once at startup and shared read-only across requests; there is no
/// writer after construction, so no locking is needed.
#[derive(Debug, Clone, Default)]
pub struct RecipeDataset {
    pub ingredients: Vec<Ingredient>,
    pub recipes: Vec<Recipe>,
    pub links: Vec<RecipeIngredientLink>,
    pub instructions: Vec<InstructionStep>,
    recipes_by_id: HashMap<u32, usize>,
    ingredient_names_by_id: HashMap<u32, String>,
    // Duplicate link rows for the same (recipe, ingredient) collapse here.
    ingredient_ids_by_recipe: HashMap<u32, HashSet<u32>>,
}

impl RecipeDataset {
    pub fn new(
        ingredients: Vec<Ingredient>,
        recipes: Vec<Recipe>,
        links: Vec<RecipeIngredientLink>,
        mut instructions: Vec<InstructionStep>,
    ) -> Self {
        let recipes_by_id = recipes
            .iter()
            .enumerate()
            .map(|(idx, r)| (r.recipe_id, idx))
            .collect();

        let ingredient_names_by_id = ingredients
            .iter()
            .map(|i| (i.ingredient_id, i.ingredient_name.clone()))
            .collect();

        let mut ingredient_ids_by_recipe: HashMap<u32, HashSet<u32>> = HashMap::new();
        for link in &links {
            ingredient_ids_by_recipe
                .entry(link.recipe_id)
                .or_default()
                .insert(link.ingredient_id);
        }

        // Display order for instructions is (method, step_no).
        instructions.sort_by(|a, b| (&a.method, a.step_no).cmp(&(&b.method, b.step_no)));

        Self {
            ingredients,
            recipes,
            links,
            instructions,
            recipes_by_id,
            ingredient_names_by_id,
            ingredient_ids_by_recipe,
        }
    }

    pub fn recipe_by_id(&self, recipe_id: u32) -> Option<&Recipe> {
        self.recipes_by_id
            .get(&recipe_id)
            .map(|&idx| &self.recipes[idx])
    }

    pub fn all_recipe_ids(&self) -> Vec<u32> {
        self.recipes.iter().map(|r| r.recipe_id).collect()
    }

    pub fn ingredient_ids_for_recipe(&self, recipe_id: u32) -> Option<&HashSet<u32>> {
        self.ingredient_ids_by_recipe.get(&recipe_id)
    }

    /// Resolves a recipe's linked ingredient ids to display names, in the
    /// ingredient table's order. Ids with no ingredient row are skipped.
    pub fn ingredient_names_for_recipe(&self, recipe_id: u32) -> Vec<String> {
        let Some(ids) = self.ingredient_ids_by_recipe.get(&recipe_id) else {
            return Vec::new();
        };
        self.ingredients
            .iter()
            .filter(|i| ids.contains(&i.ingredient_id))
            .map(|i| i.ingredient_name.clone())
            .collect()
    }

    pub fn ingredient_name(&self, ingredient_id: u32) -> Option<&str> {
        self.ingredient_names_by_id
            .get(&ingredient_id)
            .map(String::as_str)
    }

    /// Instruction texts for one recipe and one method label, ordered by
    /// step number.
    pub fn instructions_for_method(&self, recipe_id: u32, method: &str) -> Vec<String> {
        self.instructions
            .iter()
            .filter(|s| s.recipe_id == recipe_id && s.method == method)
            .map(|s| s.instruction.clone())
            .collect()
    }

    /// Seed selection: ids of recipes linked to at least one of the selected
    /// ingredients. An empty result means the caller should broaden to the
    /// whole recipe table.
    pub fn recipes_matching_ingredients(&self, selected: &HashSet<u32>) -> HashSet<u32> {
        self.links
            .iter()
            .filter(|link| selected.contains(&link.ingredient_id))
            .map(|link| link.recipe_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> RecipeDataset {
        let ingredients = vec![
            Ingredient { ingredient_id: 1, ingredient_name: "Tomato".to_string() },
            Ingredient { ingredient_id: 2, ingredient_name: "Basil".to_string() },
            Ingredient { ingredient_id: 3, ingredient_name: "Rice".to_string() },
        ];
        let recipes = vec![
            Recipe {
                recipe_id: 10,
                recipe_name: "Tomato Soup".to_string(),
                calories: 250.0,
                fat: 8.0,
                carbohydrates: 30.0,
                protein: 6.0,
            },
            Recipe {
                recipe_id: 11,
                recipe_name: "Plain Rice".to_string(),
                calories: 300.0,
                fat: 1.0,
                carbohydrates: 65.0,
                protein: 5.0,
            },
        ];
        let links = vec![
            RecipeIngredientLink { recipe_id: 10, ingredient_id: 1 },
            RecipeIngredientLink { recipe_id: 10, ingredient_id: 2 },
            // Duplicate row; must collapse into the set.
            RecipeIngredientLink { recipe_id: 10, ingredient_id: 2 },
            RecipeIngredientLink { recipe_id: 11, ingredient_id: 3 },
        ];
        let instructions = vec![
            InstructionStep {
                recipe_id: 10,
                method: "method_1".to_string(),
                step_no: 2,
                instruction: "Simmer for 20 minutes".to_string(),
            },
            InstructionStep {
                recipe_id: 10,
                method: "method_1".to_string(),
                step_no: 1,
                instruction: "Chop the tomatoes".to_string(),
            },
            InstructionStep {
                recipe_id: 10,
                method: "method_2".to_string(),
                step_no: 1,
                instruction: "Blend everything raw".to_string(),
            },
        ];
        RecipeDataset::new(ingredients, recipes, links, instructions)
    }

    #[test]
    fn test_recipe_lookup() {
        let ds = sample_dataset();
        assert_eq!(ds.recipe_by_id(10).unwrap().recipe_name, "Tomato Soup");
        assert!(ds.recipe_by_id(99).is_none());
    }

    #[test]
    fn test_duplicate_links_collapse() {
        let ds = sample_dataset();
        let ids = ds.ingredient_ids_for_recipe(10).unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&1) && ids.contains(&2));
    }

    #[test]
    fn test_ingredient_names_skip_unknown_ids() {
        let mut ds = sample_dataset();
        ds = RecipeDataset::new(
            ds.ingredients.clone(),
            ds.recipes.clone(),
            {
                let mut links = ds.links.clone();
                links.push(RecipeIngredientLink { recipe_id: 10, ingredient_id: 77 });
                links
            },
            ds.instructions.clone(),
        );
        let names = ds.ingredient_names_for_recipe(10);
        assert_eq!(names, vec!["Tomato".to_string(), "Basil".to_string()]);
    }

    #[test]
    fn test_instructions_ordered_by_step() {
        let ds = sample_dataset();
        let steps = ds.instructions_for_method(10, "method_1");
        assert_eq!(
            steps,
            vec![
                "Chop the tomatoes".to_string(),
                "Simmer for 20 minutes".to_string()
            ]
        );
        assert_eq!(ds.instructions_for_method(10, "method_2").len(), 1);
        assert!(ds.instructions_for_method(11, "method_1").is_empty());
    }

    #[test]
    fn test_seed_selection() {
        let ds = sample_dataset();
        let selected: HashSet<u32> = [2].into_iter().collect();
        let seeds = ds.recipes_matching_ingredients(&selected);
        assert_eq!(seeds, [10].into_iter().collect::<HashSet<u32>>());

        let none_selected: HashSet<u32> = [42].into_iter().collect();
        assert!(ds.recipes_matching_ingredients(&none_selected).is_empty());
    }
}
