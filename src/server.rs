use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::Form;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::dataset::Recipe;
use crate::search::RecommendationEngine;
use crate::targets::{ActivityLevel, Gender, Goal, UserProfile};

const METHOD_1: &str = "method_1";
const METHOD_2: &str = "method_2";

/// Raw form submission. Metrics arrive as strings so malformed values can be
/// reported as invalid input instead of a framework-level rejection.
#[derive(Debug, Deserialize)]
pub struct RecommendationForm {
    pub age: String,
    pub height: String,
    pub weight: String,
    pub gender: String,
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub ingredient_id: Vec<u32>,
}

/// The chosen recipe with everything the result page needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationView {
    pub recipe: Recipe,
    pub ingredients: Vec<String>,
    pub instructions_1: Vec<String>,
    pub instructions_2: Vec<String>,
    pub bmi: f32,
}

/// Terminal outcomes of one form submission. Invalid input and no-match are
/// reported results, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationOutcome {
    InvalidInput(String),
    EmptySelection,
    NoMatch,
    Match(RecommendationView),
}

fn parse_profile(form: &RecommendationForm) -> Result<UserProfile, String> {
    let age = form
        .age
        .trim()
        .parse::<u32>()
        .map_err(|_| "Age must be a whole number".to_string())?;
    let height_ft = form
        .height
        .trim()
        .parse::<f32>()
        .map_err(|_| "Height must be a number".to_string())?;
    let weight_kg = form
        .weight
        .trim()
        .parse::<f32>()
        .map_err(|_| "Weight must be a number".to_string())?;

    let profile = UserProfile {
        age,
        height_ft,
        weight_kg,
        gender: Gender::parse(&form.gender),
        activity: ActivityLevel::parse(&form.activity),
        goal: Goal::parse(&form.goal),
    };
    profile.validate()?;
    Ok(profile)
}

/// Full request pipeline: validate metrics, derive calorie bounds, run the
/// three-tier search, assemble the result page data for the top candidate.
pub fn run_recommendation(
    engine: &RecommendationEngine,
    form: &RecommendationForm,
) -> RecommendationOutcome {
    let profile = match parse_profile(form) {
        Ok(p) => p,
        Err(message) => return RecommendationOutcome::InvalidInput(message),
    };

    if form.ingredient_id.is_empty() {
        return RecommendationOutcome::EmptySelection;
    }
    let selected: HashSet<u32> = form.ingredient_id.iter().copied().collect();

    let (calorie_min, calorie_max) = profile.calorie_bounds();
    println!("Calorie range: {} - {}", calorie_min, calorie_max);

    let ranked = engine.recommend(&selected, calorie_min, calorie_max);
    let Some(best) = ranked.into_iter().next() else {
        return RecommendationOutcome::NoMatch;
    };

    let dataset = engine.dataset();
    RecommendationOutcome::Match(RecommendationView {
        ingredients: dataset.ingredient_names_for_recipe(best.recipe_id),
        instructions_1: dataset.instructions_for_method(best.recipe_id, METHOD_1),
        instructions_2: dataset.instructions_for_method(best.recipe_id, METHOD_2),
        bmi: profile.bmi(),
        recipe: best,
    })
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{}</title></head>\n<body>\n{}\n</body>\n</html>",
        escape_html(title),
        body
    ))
}

fn render_form(engine: &RecommendationEngine) -> Html<String> {
    let mut checkboxes = String::new();
    for ingredient in &engine.dataset().ingredients {
        checkboxes.push_str(&format!(
            "<label><input type=\"checkbox\" name=\"ingredient_id\" value=\"{}\"> {}</label><br>\n",
            ingredient.ingredient_id,
            escape_html(&ingredient.ingredient_name)
        ));
    }

    let body = format!(
        concat!(
            "<h1>Recipe Recommendation</h1>\n",
            "<form action=\"/get_recommendation\" method=\"post\">\n",
            "<label>Age: <input type=\"number\" name=\"age\" required></label><br>\n",
            "<label>Height (ft): <input type=\"text\" name=\"height\" required></label><br>\n",
            "<label>Weight (kg): <input type=\"text\" name=\"weight\" required></label><br>\n",
            "<label>Gender: <select name=\"gender\">",
            "<option value=\"male\">Male</option>",
            "<option value=\"other\">Other</option>",
            "</select></label><br>\n",
            "<label>Activity: <select name=\"activity\">",
            "<option value=\"low\">Low</option>",
            "<option value=\"moderate\">Moderate</option>",
            "<option value=\"high\">High</option>",
            "</select></label><br>\n",
            "<label>Goal: <select name=\"goal\">",
            "<option value=\"weight_loss\">Weight loss</option>",
            "<option value=\"weight_gain\">Weight gain</option>",
            "<option value=\"maintain\">Maintain</option>",
            "</select></label><br>\n",
            "<h2>Ingredients</h2>\n{}",
            "<button type=\"submit\">Get recommendation</button>\n",
            "</form>"
        ),
        checkboxes
    );
    page("Recipe Recommendation", &body)
}

fn render_steps(steps: &[String]) -> String {
    if steps.is_empty() {
        return "<p>No steps for this method.</p>".to_string();
    }
    let items: String = steps
        .iter()
        .map(|s| format!("<li>{}</li>", escape_html(s)))
        .collect();
    format!("<ol>{}</ol>", items)
}

fn render_recommendation(view: &RecommendationView) -> Html<String> {
    let ingredient_items: String = view
        .ingredients
        .iter()
        .map(|name| format!("<li>{}</li>", escape_html(name)))
        .collect();

    let body = format!(
        concat!(
            "<h1>{}</h1>\n",
            "<p>Your BMI: {}</p>\n",
            "<p>Calories: {} | Fat: {} g | Carbohydrates: {} g | Protein: {} g</p>\n",
            "<h2>Ingredients</h2>\n<ul>{}</ul>\n",
            "<h2>Method 1</h2>\n{}\n",
            "<h2>Method 2</h2>\n{}"
        ),
        escape_html(&view.recipe.recipe_name),
        view.bmi,
        view.recipe.calories,
        view.recipe.fat,
        view.recipe.carbohydrates,
        view.recipe.protein,
        ingredient_items,
        render_steps(&view.instructions_1),
        render_steps(&view.instructions_2),
    );
    page(&view.recipe.recipe_name, &body)
}

async fn index_handler(State(engine): State<Arc<RecommendationEngine>>) -> Html<String> {
    render_form(&engine)
}

async fn recommendation_handler(
    State(engine): State<Arc<RecommendationEngine>>,
    Form(form): Form<RecommendationForm>,
) -> Html<String> {
    match run_recommendation(&engine, &form) {
        RecommendationOutcome::InvalidInput(message) => {
            page("Invalid input", &format!("<h1>Invalid input</h1>\n<p>{}</p>", escape_html(&message)))
        }
        RecommendationOutcome::EmptySelection => page(
            "No ingredients selected",
            "<h1>No ingredients selected</h1>\n<p>Please select at least one ingredient.</p>",
        ),
        RecommendationOutcome::NoMatch => page(
            "No match",
            "<h1>No matching recipe found</h1>\n<p>Try selecting different ingredients.</p>",
        ),
        RecommendationOutcome::Match(view) => render_recommendation(&view),
    }
}

async fn health_handler(
    State(engine): State<Arc<RecommendationEngine>>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "recipes": engine.dataset().recipes.len(),
        "graph_nodes": engine.graph().len(),
        "graph_edges": engine.graph().edge_count(),
    }))
}

pub fn router(engine: Arc<RecommendationEngine>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/get_recommendation", post(recommendation_handler))
        .route("/health", get(health_handler))
        .with_state(engine)
}
