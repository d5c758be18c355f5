use async_trait::async_trait;
use time::Date;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{DailyData, Goals, Meal, MealSuggestion, User, WeeklyData};
use crate::nutrition::Macros;

pub mod dto;
#[cfg(test)]
pub(crate) mod fake;
pub mod http;

pub use dto::{ImageUpload, NewMeal, QuickMeal};
pub use http::HttpApi;

/// The backend operations the client uses. Every view talks to the backend
/// through this trait so tests can substitute an in-memory double.
#[async_trait]
pub trait NutritionApi: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;
    async fn create_user(&self, name: &str) -> Result<User, ApiError>;

    async fn fetch_daily(&self, date: Date, user_id: Uuid) -> Result<DailyData, ApiError>;
    async fn create_meal(&self, meal: NewMeal) -> Result<Meal, ApiError>;
    async fn update_meal(&self, meal_id: Uuid, macros: Macros) -> Result<Meal, ApiError>;
    async fn delete_meal(&self, meal_id: Uuid) -> Result<(), ApiError>;

    async fn fetch_goals(&self, user_id: Uuid) -> Result<Goals, ApiError>;
    async fn save_goals(&self, goals: &Goals) -> Result<Goals, ApiError>;

    async fn fetch_weekly(&self, user_id: Uuid) -> Result<WeeklyData, ApiError>;

    async fn search_meals(&self, user_id: Uuid, query: &str)
        -> Result<Vec<MealSuggestion>, ApiError>;
    async fn quick_create_meal(&self, meal: QuickMeal) -> Result<Meal, ApiError>;
}
