pub mod affinity_graph;
pub mod data_loader;
pub mod engine;

pub use affinity_graph::AffinityGraph;
pub use data_loader::load_dataset;
pub use engine::{bfs_search, score_recipe, NutritionBounds, RecommendationEngine};
pub use engine::{CALORIE_CEILING, CALORIE_FLOOR, CALORIE_RELAX_MARGIN};
