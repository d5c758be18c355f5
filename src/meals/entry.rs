use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use time::Date;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::api::{ImageUpload, NewMeal, NutritionApi, QuickMeal};
use crate::error::ApiError;
use crate::input::MacroDraft;
use crate::models::{Meal, MealSuggestion};
use crate::nutrition::Macro;

pub const MISSING_INPUT: &str = "Please provide a meal description or image.";

impl ImageUpload {
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let body = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let content_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime_from_ext)
            .unwrap_or("application/octet-stream")
            .to_string();
        Ok(Self {
            file_name,
            content_type,
            body: Bytes::from(body),
        })
    }
}

fn mime_from_ext(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// A suggestion picked from the autocomplete, with editable macro values.
#[derive(Debug, Clone)]
pub struct QuickAdd {
    pub suggestion: MealSuggestion,
    pub draft: MacroDraft,
}

impl QuickAdd {
    pub fn new(suggestion: MealSuggestion) -> Self {
        let draft = MacroDraft::from_macros(&suggestion.macros);
        Self { suggestion, draft }
    }

    pub fn set(&mut self, nutrient: Macro, raw: &str) -> bool {
        self.draft.set(nutrient, raw)
    }
}

/// The "log a meal" form.
pub struct MealEntry {
    api: Arc<dyn NutritionApi>,
    user_id: Uuid,
    date: Date,
    text: String,
    image: Option<ImageUpload>,
    submitting: bool,
}

impl MealEntry {
    pub fn new(api: Arc<dyn NutritionApi>, user_id: Uuid, date: Date) -> Self {
        Self {
            api,
            user_id,
            date,
            text: String::new(),
            image: None,
            submitting: false,
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attach_image(&mut self, image: ImageUpload) {
        self.image = Some(image);
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Build the request, or reject the form when there is nothing to log.
    pub fn validate(&self) -> Result<NewMeal, ApiError> {
        let text = self.text.trim();
        if text.is_empty() && self.image.is_none() {
            return Err(ApiError::Validation(MISSING_INPUT.into()));
        }
        Ok(NewMeal {
            user_id: self.user_id,
            date: self.date,
            text: (!text.is_empty()).then(|| text.to_string()),
            image: self.image.clone(),
        })
    }

    /// Send the meal for estimation. The form is cleared on success and kept
    /// as-is on failure.
    #[instrument(skip(self), fields(user_id = %self.user_id, date = %self.date))]
    pub async fn submit(&mut self) -> Result<Meal, ApiError> {
        let request = self.validate()?;
        self.submitting = true;
        let result = self.api.create_meal(request).await;
        self.submitting = false;

        let meal = result?;
        info!(meal_id = %meal.meal_id, "meal logged");
        self.reset();
        Ok(meal)
    }

    /// Store a meal straight from a remembered suggestion.
    #[instrument(skip(self, quick), fields(user_id = %self.user_id, text = %quick.suggestion.text_input))]
    pub async fn quick_add(&mut self, quick: &QuickAdd) -> Result<Meal, ApiError> {
        let meal = self
            .api
            .quick_create_meal(QuickMeal {
                user_id: self.user_id,
                meal_date: self.date,
                text_input: quick.suggestion.text_input.clone(),
                macros: quick.draft.to_macros(),
            })
            .await?;
        info!(meal_id = %meal.meal_id, "meal added from memory");
        self.reset();
        Ok(meal)
    }

    fn reset(&mut self) {
        self.text.clear();
        self.image = None;
    }
}
