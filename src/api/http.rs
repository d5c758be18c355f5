use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder, Response,
};
use serde::de::DeserializeOwned;
use time::Date;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::dto::{CreateUserRequest, NewMeal, QuickMeal};
use super::NutritionApi;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::{DailyData, Goals, Meal, MealSuggestion, User, WeeklyData};
use crate::nutrition::Macros;

/// `NutritionApi` over the backend's REST routes.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(&config.api_base_url, config.request_timeout())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let res = ensure_success(req.send().await?).await?;
        let body = res.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

async fn ensure_success(res: Response) -> Result<Response, ApiError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    debug!(%status, "backend returned error status");
    Err(ApiError::from_status(status, body))
}

#[async_trait]
impl NutritionApi for HttpApi {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.fetch_json(self.client.get(self.url("/api/users"))).await
    }

    #[instrument(skip(self))]
    async fn create_user(&self, name: &str) -> Result<User, ApiError> {
        let req = self
            .client
            .post(self.url("/api/users"))
            .json(&CreateUserRequest { name });
        self.fetch_json(req).await
    }

    #[instrument(skip(self))]
    async fn fetch_daily(&self, date: Date, user_id: Uuid) -> Result<DailyData, ApiError> {
        let req = self
            .client
            .get(self.url(&format!("/api/daily/{date}")))
            .query(&[("user_id", user_id.to_string())]);
        self.fetch_json(req).await
    }

    #[instrument(skip(self, meal), fields(user_id = %meal.user_id, date = %meal.date))]
    async fn create_meal(&self, meal: NewMeal) -> Result<Meal, ApiError> {
        let mut form = Form::new()
            .text("user_id", meal.user_id.to_string())
            .text("meal_date", meal.date.to_string());
        if let Some(text) = meal.text {
            form = form.text("text", text);
        }
        if let Some(image) = meal.image {
            debug!(file = %image.file_name, bytes = image.body.len(), "attaching image");
            let part = Part::bytes(image.body.to_vec())
                .file_name(image.file_name)
                .mime_str(&image.content_type)?;
            form = form.part("image", part);
        }
        let req = self.client.post(self.url("/api/meal")).multipart(form);
        self.fetch_json(req).await
    }

    #[instrument(skip(self))]
    async fn update_meal(&self, meal_id: Uuid, macros: Macros) -> Result<Meal, ApiError> {
        let req = self
            .client
            .put(self.url(&format!("/api/meal/{meal_id}")))
            .json(&macros);
        self.fetch_json(req).await
    }

    #[instrument(skip(self))]
    async fn delete_meal(&self, meal_id: Uuid) -> Result<(), ApiError> {
        let req = self.client.delete(self.url(&format!("/api/meal/{meal_id}")));
        ensure_success(req.send().await?).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_goals(&self, user_id: Uuid) -> Result<Goals, ApiError> {
        let req = self
            .client
            .get(self.url("/api/goals"))
            .query(&[("user_id", user_id.to_string())]);
        self.fetch_json(req).await
    }

    #[instrument(skip(self, goals), fields(user_id = %goals.user_id))]
    async fn save_goals(&self, goals: &Goals) -> Result<Goals, ApiError> {
        let req = self.client.post(self.url("/api/goals")).json(goals);
        self.fetch_json(req).await
    }

    #[instrument(skip(self))]
    async fn fetch_weekly(&self, user_id: Uuid) -> Result<WeeklyData, ApiError> {
        let req = self
            .client
            .get(self.url("/api/weekly"))
            .query(&[("user_id", user_id.to_string())]);
        self.fetch_json(req).await
    }

    #[instrument(skip(self))]
    async fn search_meals(
        &self,
        user_id: Uuid,
        query: &str,
    ) -> Result<Vec<MealSuggestion>, ApiError> {
        let req = self
            .client
            .get(self.url("/api/meals/search"))
            .query(&[("user_id", user_id.to_string().as_str()), ("q", query)]);
        self.fetch_json(req).await
    }

    #[instrument(skip(self, meal), fields(user_id = %meal.user_id))]
    async fn quick_create_meal(&self, meal: QuickMeal) -> Result<Meal, ApiError> {
        let req = self.client.post(self.url("/api/meal/quick")).json(&meal);
        self.fetch_json(req).await
    }
}
