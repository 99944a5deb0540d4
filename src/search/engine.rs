use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use crate::dataset::{Recipe, RecipeDataset};
use crate::search::affinity_graph::AffinityGraph;

/// Global calorie floor and ceiling applied to user-derived bounds.
pub const CALORIE_FLOOR: f32 = 50.0;
pub const CALORIE_CEILING: f32 = 1000.0;

/// Calorie widening margin for the relaxed tier.
pub const CALORIE_RELAX_MARGIN: f32 = 200.0;

// Fixed macro ranges, identical for every request.
pub const FAT_RANGE: (f32, f32) = (0.0, 40.0);
pub const CARB_RANGE: (f32, f32) = (0.0, 100.0);
pub const PROTEIN_RANGE: (f32, f32) = (0.0, 60.0);

/// Inclusive [min, max] ranges for the four nutrition metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutritionBounds {
    pub calories: (f32, f32),
    pub fat: (f32, f32),
    pub carbohydrates: (f32, f32),
    pub protein: (f32, f32),
}

impl NutritionBounds {
    /// Bounds with the given calorie range and the fixed macro ranges.
    pub fn with_calories(calorie_min: f32, calorie_max: f32) -> Self {
        Self {
            calories: (calorie_min, calorie_max),
            fat: FAT_RANGE,
            carbohydrates: CARB_RANGE,
            protein: PROTEIN_RANGE,
        }
    }

    pub fn admits(&self, recipe: &Recipe) -> bool {
        self.calories.0 <= recipe.calories
            && recipe.calories <= self.calories.1
            && self.fat.0 <= recipe.fat
            && recipe.fat <= self.fat.1
            && self.carbohydrates.0 <= recipe.carbohydrates
            && recipe.carbohydrates <= self.carbohydrates.1
            && self.protein.0 <= recipe.protein
            && recipe.protein <= self.protein.1
    }

    /// Same bounds with the calorie range widened by `margin` on both ends.
    pub fn widen_calories(&self, margin: f32) -> Self {
        Self {
            calories: (self.calories.0 - margin, self.calories.1 + margin),
            ..*self
        }
    }
}

/// Breadth-first search over the affinity graph from the given seeds,
/// collecting recipes that satisfy all four nutrition bounds.
///
/// Traversal always runs to queue exhaustion; matching never stops it early,
/// and neighbors are enqueued whether or not the current recipe matched.
/// Results come back in BFS pop order. A seed or neighbor with no recipe row
/// contributes no match but its neighbors are still explored.
pub fn bfs_search(
    dataset: &RecipeDataset,
    graph: &AffinityGraph,
    seeds: &[u32],
    bounds: &NutritionBounds,
) -> Vec<Recipe> {
    let mut visited: HashSet<u32> = HashSet::new();
    let mut queue: VecDeque<u32> = seeds.iter().copied().collect();
    let mut results = Vec::new();

    while let Some(rid) = queue.pop_front() {
        // Duplicate enqueues are tolerated and skipped here.
        if !visited.insert(rid) {
            continue;
        }

        if let Some(recipe) = dataset.recipe_by_id(rid) {
            if bounds.admits(recipe) {
                results.push(recipe.clone());
            }
        }

        if let Some(neighbors) = graph.neighbors(rid) {
            let mut next: Vec<u32> = neighbors
                .iter()
                .copied()
                .filter(|n| !visited.contains(n))
                .collect();
            // Deterministic layer order regardless of set iteration order.
            next.sort_unstable();
            queue.extend(next);
        }
    }

    results
}

/// Ingredient overlap between a recipe and the user's selection; the ranking
/// key for candidates.
pub fn score_recipe(dataset: &RecipeDataset, recipe_id: u32, selected: &HashSet<u32>) -> usize {
    dataset
        .ingredient_ids_for_recipe(recipe_id)
        .map_or(0, |ids| ids.intersection(selected).count())
}

/// The immutable recommendation core: dataset store plus affinity graph,
/// built once at startup and shared read-only across requests.
pub struct RecommendationEngine {
    dataset: Arc<RecipeDataset>,
    graph: AffinityGraph,
}

impl RecommendationEngine {
    pub fn new(dataset: Arc<RecipeDataset>) -> Self {
        let graph = AffinityGraph::build(&dataset);
        Self { dataset, graph }
    }

    pub fn dataset(&self) -> &RecipeDataset {
        &self.dataset
    }

    pub fn graph(&self) -> &AffinityGraph {
        &self.graph
    }

    /// Seed ids for the given ingredient selection: recipes sharing at least
    /// one selected ingredient, or every recipe when nothing matches. Sorted
    /// ascending so traversal order is deterministic.
    pub fn seed_nodes(&self, selected: &HashSet<u32>) -> Vec<u32> {
        let matched = self.dataset.recipes_matching_ingredients(selected);
        let mut seeds: Vec<u32> = if matched.is_empty() {
            self.dataset.all_recipe_ids()
        } else {
            matched.into_iter().collect()
        };
        seeds.sort_unstable();
        seeds
    }

    /// Runs the three-tier search and returns candidates ranked descending
    /// by ingredient-overlap score (stable, so ties keep BFS order). Empty
    /// result means no match.
    ///
    /// Tiers, stopping at the first that yields at least one candidate:
    /// 1. strict: caller-supplied calorie range, fixed macro ranges;
    /// 2. relaxed: calorie range widened by ±200;
    /// 3. unfiltered: every recipe whose id is in the seed set.
    pub fn recommend(
        &self,
        selected: &HashSet<u32>,
        calorie_min: f32,
        calorie_max: f32,
    ) -> Vec<Recipe> {
        let seeds = self.seed_nodes(selected);
        let bounds = NutritionBounds::with_calories(calorie_min, calorie_max);

        let mut candidates = bfs_search(&self.dataset, &self.graph, &seeds, &bounds);

        if candidates.is_empty() {
            println!(
                "No candidates in calorie range {} - {}; widening by {}",
                calorie_min, calorie_max, CALORIE_RELAX_MARGIN
            );
            let relaxed = bounds.widen_calories(CALORIE_RELAX_MARGIN);
            candidates = bfs_search(&self.dataset, &self.graph, &seeds, &relaxed);
        }

        if candidates.is_empty() {
            println!("Relaxed search empty; falling back to unfiltered seed recipes");
            let seed_set: HashSet<u32> = seeds.iter().copied().collect();
            candidates = self
                .dataset
                .recipes
                .iter()
                .filter(|r| seed_set.contains(&r.recipe_id))
                .cloned()
                .collect();
        }

        candidates.sort_by_key(|r| {
            std::cmp::Reverse(score_recipe(&self.dataset, r.recipe_id, selected))
        });

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Ingredient, RecipeDataset, RecipeIngredientLink};

    fn recipe(recipe_id: u32, calories: f32) -> Recipe {
        Recipe {
            recipe_id,
            recipe_name: format!("Recipe {}", recipe_id),
            calories,
            fat: 10.0,
            carbohydrates: 30.0,
            protein: 10.0,
        }
    }

    fn link(recipe_id: u32, ingredient_id: u32) -> RecipeIngredientLink {
        RecipeIngredientLink {
            recipe_id,
            ingredient_id,
        }
    }

    fn dataset(recipes: Vec<Recipe>, links: Vec<RecipeIngredientLink>) -> RecipeDataset {
        let ingredients = links
            .iter()
            .map(|l| l.ingredient_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .map(|id| Ingredient {
                ingredient_id: id,
                ingredient_name: format!("Ingredient {}", id),
            })
            .collect();
        RecipeDataset::new(ingredients, recipes, links, Vec::new())
    }

    // Chain 5 - 9 - 12 via shared ingredients; bounds admit only recipe 9.
    fn chain_dataset() -> RecipeDataset {
        dataset(
            vec![recipe(5, 900.0), recipe(9, 300.0), recipe(12, 920.0)],
            vec![
                link(5, 100),
                link(9, 100),
                link(9, 200),
                link(12, 200),
            ],
        )
    }

    #[test]
    fn test_bfs_collects_only_admitted_recipes() {
        let ds = chain_dataset();
        let graph = AffinityGraph::build(&ds);
        let bounds = NutritionBounds::with_calories(250.0, 400.0);

        let results = bfs_search(&ds, &graph, &[5, 9], &bounds);
        let ids: Vec<u32> = results.iter().map(|r| r.recipe_id).collect();
        assert_eq!(ids, vec![9]);
    }

    #[test]
    fn test_bfs_visits_whole_component_without_early_return() {
        let ds = chain_dataset();
        let graph = AffinityGraph::build(&ds);
        // Admit everything; pop order must cover the full component.
        let bounds = NutritionBounds::with_calories(0.0, 2000.0);

        let results = bfs_search(&ds, &graph, &[5], &bounds);
        let ids: Vec<u32> = results.iter().map(|r| r.recipe_id).collect();
        assert_eq!(ids, vec![5, 9, 12]);
    }

    #[test]
    fn test_bfs_duplicate_seeds_visit_once() {
        let ds = chain_dataset();
        let graph = AffinityGraph::build(&ds);
        let bounds = NutritionBounds::with_calories(0.0, 2000.0);

        let results = bfs_search(&ds, &graph, &[9, 9, 9], &bounds);
        let nines = results.iter().filter(|r| r.recipe_id == 9).count();
        assert_eq!(nines, 1);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_bfs_missing_recipe_skipped_not_crash() {
        let ds = chain_dataset();
        let graph = AffinityGraph::build(&ds);
        let bounds = NutritionBounds::with_calories(0.0, 2000.0);

        // Seed 777 has no recipe row and no graph entry.
        let results = bfs_search(&ds, &graph, &[777, 9], &bounds);
        let ids: Vec<u32> = results.iter().map(|r| r.recipe_id).collect();
        assert_eq!(ids, vec![9, 5, 12]);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = NutritionBounds::with_calories(100.0, 200.0);
        let mut r = recipe(1, 100.0);
        assert!(bounds.admits(&r));
        r.calories = 200.0;
        assert!(bounds.admits(&r));
        r.calories = 200.01;
        assert!(!bounds.admits(&r));
        r.calories = 150.0;
        r.fat = 40.0;
        assert!(bounds.admits(&r));
        r.fat = 40.5;
        assert!(!bounds.admits(&r));
    }

    #[test]
    fn test_widen_calories_superset() {
        let strict = NutritionBounds::with_calories(300.0, 500.0);
        let relaxed = strict.widen_calories(CALORIE_RELAX_MARGIN);
        assert_eq!(relaxed.calories, (100.0, 700.0));
        assert_eq!(relaxed.fat, strict.fat);
        assert_eq!(relaxed.carbohydrates, strict.carbohydrates);
        assert_eq!(relaxed.protein, strict.protein);
    }

    #[test]
    fn test_score_counts_overlap() {
        let ds = chain_dataset();
        let selected: HashSet<u32> = [100, 200].into_iter().collect();
        assert_eq!(score_recipe(&ds, 9, &selected), 2);
        assert_eq!(score_recipe(&ds, 5, &selected), 1);
        assert_eq!(score_recipe(&ds, 777, &selected), 0);
    }

    #[test]
    fn test_seed_nodes_fall_back_to_all_recipes() {
        let engine = RecommendationEngine::new(Arc::new(chain_dataset()));
        let unmatched: HashSet<u32> = [999].into_iter().collect();
        assert_eq!(engine.seed_nodes(&unmatched), vec![5, 9, 12]);

        let matched: HashSet<u32> = [200].into_iter().collect();
        assert_eq!(engine.seed_nodes(&matched), vec![9, 12]);
    }

    #[test]
    fn test_recommend_strict_tier() {
        let engine = RecommendationEngine::new(Arc::new(chain_dataset()));
        let selected: HashSet<u32> = [100].into_iter().collect();

        let results = engine.recommend(&selected, 250.0, 400.0);
        let ids: Vec<u32> = results.iter().map(|r| r.recipe_id).collect();
        assert_eq!(ids, vec![9]);
    }

    #[test]
    fn test_recommend_relaxed_tier() {
        // Strict range 400-450 admits nothing; widened 200-650 admits 9.
        let engine = RecommendationEngine::new(Arc::new(chain_dataset()));
        let selected: HashSet<u32> = [100].into_iter().collect();

        let results = engine.recommend(&selected, 400.0, 450.0);
        let ids: Vec<u32> = results.iter().map(|r| r.recipe_id).collect();
        assert_eq!(ids, vec![9]);
    }

    #[test]
    fn test_recommend_unfiltered_tier() {
        // All recipes far outside even the widened range.
        let ds = dataset(
            vec![recipe(1, 5000.0), recipe(2, 6000.0)],
            vec![link(1, 100), link(2, 100)],
        );
        let engine = RecommendationEngine::new(Arc::new(ds));
        let selected: HashSet<u32> = [100].into_iter().collect();

        let results = engine.recommend(&selected, 300.0, 400.0);
        let ids: Vec<u32> = results.iter().map(|r| r.recipe_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_recommend_ranks_by_ingredient_overlap() {
        // Recipes 1 and 2 both admitted; 2 shares more selected ingredients.
        let ds = dataset(
            vec![recipe(1, 300.0), recipe(2, 300.0)],
            vec![
                link(1, 100),
                link(2, 100),
                link(2, 200),
                link(2, 300),
            ],
        );
        let engine = RecommendationEngine::new(Arc::new(ds));
        let selected: HashSet<u32> = [100, 200, 300].into_iter().collect();

        let results = engine.recommend(&selected, 250.0, 400.0);
        let ids: Vec<u32> = results.iter().map(|r| r.recipe_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_recommend_empty_dataset_is_no_match() {
        let ds = RecipeDataset::new(Vec::new(), Vec::new(), Vec::new(), Vec::new());
        let engine = RecommendationEngine::new(Arc::new(ds));
        let selected: HashSet<u32> = [1].into_iter().collect();

        assert!(engine.recommend(&selected, 300.0, 400.0).is_empty());
    }
}
