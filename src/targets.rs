use crate::search::engine::{CALORIE_CEILING, CALORIE_FLOOR};

/// Calorie margin applied around the per-meal target for each goal.
const GOAL_MARGIN: f32 = 300.0;
const MAINTAIN_MARGIN: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Other,
}

impl Gender {
    /// Anything other than "male" is treated as Other.
    pub fn parse(s: &str) -> Self {
        match s {
            "male" => Gender::Male,
            _ => Gender::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityLevel {
    #[default]
    Low,
    Moderate,
    High,
}

impl ActivityLevel {
    /// Unrecognized labels fall back to Low.
    pub fn parse(s: &str) -> Self {
        match s {
            "moderate" => ActivityLevel::Moderate,
            "high" => ActivityLevel::High,
            _ => ActivityLevel::Low,
        }
    }

    pub fn factor(self) -> f32 {
        match self {
            ActivityLevel::Low => 1.2,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::High => 1.725,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    WeightLoss,
    WeightGain,
    Maintain,
}

impl Goal {
    /// Unrecognized labels behave as Maintain.
    pub fn parse(s: &str) -> Self {
        match s {
            "weight_loss" => Goal::WeightLoss,
            "weight_gain" => Goal::WeightGain,
            _ => Goal::Maintain,
        }
    }
}

/// Body metrics and dietary goal for one request. `validate()` must pass
/// before any target derivation is meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub age: u32,
    pub height_ft: f32,
    pub weight_kg: f32,
    pub gender: Gender,
    pub activity: ActivityLevel,
    pub goal: Goal,
}

impl UserProfile {
    /// Range checks on the raw metrics. Failures here are an invalid-input
    /// outcome, distinct from a no-match result downstream.
    pub fn validate(&self) -> Result<(), String> {
        if !(5..=100).contains(&self.age) {
            return Err("Age must be between 5 and 100".to_string());
        }
        if !(3.0..=8.0).contains(&self.height_ft) {
            return Err("Height must be between 3 and 8 feet".to_string());
        }
        if !(20.0..=200.0).contains(&self.weight_kg) {
            return Err("Weight must be between 20 and 200 kg".to_string());
        }
        Ok(())
    }

    pub fn height_cm(&self) -> f32 {
        self.height_ft * 30.48
    }

    /// Body mass index, rounded to two decimals.
    pub fn bmi(&self) -> f32 {
        let height_m = self.height_cm() / 100.0;
        let raw = self.weight_kg / (height_m * height_m);
        (raw * 100.0).round() / 100.0
    }

    /// Mifflin-St Jeor basal metabolic rate.
    pub fn bmr(&self) -> f32 {
        let base = 10.0 * self.weight_kg + 6.25 * self.height_cm() - 5.0 * self.age as f32;
        match self.gender {
            Gender::Male => base + 5.0,
            Gender::Other => base - 161.0,
        }
    }

    pub fn daily_calories(&self) -> f32 {
        self.bmr() * self.activity.factor()
    }

    /// Per-meal calorie range for the user's goal, assuming a recipe covers
    /// one of three daily meals, clipped to the global floor and ceiling.
    pub fn calorie_bounds(&self) -> (f32, f32) {
        let meal_calories = self.daily_calories() / 3.0;

        let (min, max) = match self.goal {
            Goal::WeightLoss => (meal_calories - GOAL_MARGIN, meal_calories),
            Goal::WeightGain => (meal_calories, meal_calories + GOAL_MARGIN),
            Goal::Maintain => (
                meal_calories - MAINTAIN_MARGIN,
                meal_calories + MAINTAIN_MARGIN,
            ),
        };

        (min.max(CALORIE_FLOOR), max.min(CALORIE_CEILING))
    }
}
