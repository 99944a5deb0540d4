use anyhow::{Context, Result};
use recipe_recommender::cli::parse_args;
use recipe_recommender::search::{load_dataset, RecommendationEngine};
use recipe_recommender::server;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = parse_args();

    println!("Loading recipe datasets from '{}'...", cli_args.data_dir);
    let dataset = load_dataset(Path::new(&cli_args.data_dir))
        .with_context(|| format!("Failed to load datasets from '{}'", cli_args.data_dir))?;
    println!(
        " > Loaded {} ingredients, {} recipes, {} links, {} instruction steps.",
        dataset.ingredients.len(),
        dataset.recipes.len(),
        dataset.links.len(),
        dataset.instructions.len()
    );

    println!("Building ingredient-affinity graph (one-time startup cost)...");
    let engine = RecommendationEngine::new(Arc::new(dataset));
    println!(
        " > Graph built: {} recipes, {} shared-ingredient edges.",
        engine.graph().len(),
        engine.graph().edge_count()
    );

    let app = server::router(Arc::new(engine));
    let listener = tokio::net::TcpListener::bind(&cli_args.bind)
        .await
        .with_context(|| format!("Failed to bind to '{}'", cli_args.bind))?;
    println!("Listening on http://{}", cli_args.bind);

    axum::serve(listener, app)
        .await
        .with_context(|| "HTTP server terminated unexpectedly")?;

    Ok(())
}
