use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use time::Date;
use uuid::Uuid;

use super::dto::{NewMeal, QuickMeal};
use super::NutritionApi;
use crate::error::ApiError;
use crate::models::{DailyData, DayEntry, Goals, Meal, MealSuggestion, User, WeeklyData};
use crate::nutrition::Macros;

/// In-memory backend that records every call.
#[derive(Default)]
pub(crate) struct FakeApi {
    pub users: Mutex<Vec<User>>,
    pub meals: Mutex<Vec<Meal>>,
    pub goals: Mutex<Option<Goals>>,
    pub suggestions: Mutex<Vec<MealSuggestion>>,
    pub calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    delays: Mutex<HashMap<&'static str, VecDeque<Duration>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    /// Queue a response delay for the next call to `op`; one entry per call.
    pub fn delay(&self, op: &'static str, by: Duration) {
        self.delays
            .lock()
            .unwrap()
            .entry(op)
            .or_default()
            .push_back(by);
    }

    async fn pause(&self, op: &'static str) {
        let by = self
            .delays
            .lock()
            .unwrap()
            .get_mut(op)
            .and_then(VecDeque::pop_front);
        if let Some(by) = by {
            tokio::time::sleep(by).await;
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, op: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c == op || c.starts_with(&format!("{op}:")))
            .collect()
    }

    pub fn add_meal(&self, user_id: Uuid, date: Date, text: &str, macros: Macros) -> Meal {
        let meal = Meal {
            meal_id: Uuid::new_v4(),
            user_id,
            date,
            text_input: Some(text.to_string()),
            macros,
            error: String::new(),
            created_at: None,
        };
        self.meals.lock().unwrap().push(meal.clone());
        meal
    }

    fn record(&self, op: &'static str, detail: Option<String>) -> Result<(), ApiError> {
        let entry = match detail {
            Some(d) => format!("{op}:{d}"),
            None => op.to_string(),
        };
        self.calls.lock().unwrap().push(entry);
        if self.failing.lock().unwrap().contains(op) {
            return Err(ApiError::from_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{op} failed"),
            ));
        }
        Ok(())
    }

    fn day(&self, date: Date, user_id: Uuid) -> DailyData {
        let mut day = DailyData::empty(date, user_id);
        day.meals = self
            .meals
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.user_id == user_id && m.date == date)
            .cloned()
            .collect();
        day.recompute_totals();
        day
    }
}

#[async_trait]
impl NutritionApi for FakeApi {
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.record("list_users", None)?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create_user(&self, name: &str) -> Result<User, ApiError> {
        self.record("create_user", Some(name.to_string()))?;
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: None,
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn fetch_daily(&self, date: Date, user_id: Uuid) -> Result<DailyData, ApiError> {
        self.record("fetch_daily", Some(date.to_string()))?;
        Ok(self.day(date, user_id))
    }

    async fn create_meal(&self, meal: NewMeal) -> Result<Meal, ApiError> {
        self.record("create_meal", meal.text.clone())?;
        Ok(self.add_meal(
            meal.user_id,
            meal.date,
            meal.text.as_deref().unwrap_or_default(),
            Macros::default(),
        ))
    }

    async fn update_meal(&self, meal_id: Uuid, macros: Macros) -> Result<Meal, ApiError> {
        self.record("update_meal", Some(format!("{}", macros.calories)))?;
        self.pause("update_meal").await;
        let mut meals = self.meals.lock().unwrap();
        let meal = meals
            .iter_mut()
            .find(|m| m.meal_id == meal_id)
            .ok_or_else(|| ApiError::from_status(StatusCode::NOT_FOUND, "Meal not found".into()))?;
        meal.macros = macros;
        Ok(meal.clone())
    }

    async fn delete_meal(&self, meal_id: Uuid) -> Result<(), ApiError> {
        self.record("delete_meal", None)?;
        self.meals.lock().unwrap().retain(|m| m.meal_id != meal_id);
        Ok(())
    }

    async fn fetch_goals(&self, user_id: Uuid) -> Result<Goals, ApiError> {
        self.record("fetch_goals", None)?;
        Ok(self
            .goals
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Goals::from_macros(user_id, Macros::default())))
    }

    async fn save_goals(&self, goals: &Goals) -> Result<Goals, ApiError> {
        self.record("save_goals", None)?;
        *self.goals.lock().unwrap() = Some(goals.clone());
        Ok(goals.clone())
    }

    async fn fetch_weekly(&self, user_id: Uuid) -> Result<WeeklyData, ApiError> {
        self.record("fetch_weekly", None)?;
        let goal = self
            .goals
            .lock()
            .unwrap()
            .as_ref()
            .map(Goals::as_macros)
            .unwrap_or_default();
        let mut dates: Vec<Date> = self.meals.lock().unwrap().iter().map(|m| m.date).collect();
        dates.sort();
        dates.dedup();
        let days = dates
            .into_iter()
            .map(|date| DayEntry {
                date,
                goal,
                actual: self.day(date, user_id).totals,
            })
            .collect();
        Ok(WeeklyData { user_id, days })
    }

    async fn search_meals(
        &self,
        _user_id: Uuid,
        query: &str,
    ) -> Result<Vec<MealSuggestion>, ApiError> {
        self.record("search_meals", Some(query.to_string()))?;
        self.pause("search_meals").await;
        let needle = query.to_lowercase();
        Ok(self
            .suggestions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.text_input.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn quick_create_meal(&self, meal: QuickMeal) -> Result<Meal, ApiError> {
        self.record("quick_create_meal", Some(meal.text_input.clone()))?;
        Ok(self.add_meal(meal.user_id, meal.meal_date, &meal.text_input, meal.macros))
    }
}
