use std::collections::{HashMap, HashSet};

use crate::dataset::RecipeDataset;

/// Undirected adjacency over recipe ids: two recipes are adjacent iff they
/// share at least one ingredient.
///
/// Built once after the dataset loads and never mutated afterward, so it can
/// be shared read-only across all requests.
#[derive(Debug, Clone, Default)]
pub struct AffinityGraph {
    adjacency: HashMap<u32, HashSet<u32>>,
}

impl AffinityGraph {
    /// Builds the graph by pairwise intersection of per-recipe ingredient
    /// sets. Quadratic in recipe count; acceptable as a one-time startup
    /// cost. For larger datasets an inverted index (ingredient_id ->
    /// recipe_ids) would bring construction to near-linear without changing
    /// request-time behavior.
    pub fn build(dataset: &RecipeDataset) -> Self {
        // Every recipe gets an entry, so isolated recipes have an empty set
        // rather than being absent.
        let mut adjacency: HashMap<u32, HashSet<u32>> = dataset
            .all_recipe_ids()
            .into_iter()
            .map(|rid| (rid, HashSet::new()))
            .collect();

        let recipe_ids = dataset.all_recipe_ids();
        for &r1 in &recipe_ids {
            let Some(ings1) = dataset.ingredient_ids_for_recipe(r1) else {
                continue;
            };
            for &r2 in &recipe_ids {
                if r1 == r2 {
                    continue;
                }
                let Some(ings2) = dataset.ingredient_ids_for_recipe(r2) else {
                    continue;
                };
                if !ings1.is_disjoint(ings2) {
                    // Symmetry follows from iterating the pair in both orders.
                    if let Some(set) = adjacency.get_mut(&r1) {
                        set.insert(r2);
                    }
                }
            }
        }

        Self { adjacency }
    }

    pub fn neighbors(&self, recipe_id: u32) -> Option<&HashSet<u32>> {
        self.adjacency.get(&recipe_id)
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(HashSet::len).sum::<usize>() / 2
    }
}
