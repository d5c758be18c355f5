use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::api::NutritionApi;
use crate::error::ApiError;
use crate::input::MacroDraft;
use crate::models::Goals;
use crate::nutrition::Macro;

/// Editable copy of a user's daily goals.
pub struct GoalEditor {
    api: Arc<dyn NutritionApi>,
    user_id: Uuid,
    draft: MacroDraft,
}

impl GoalEditor {
    pub async fn load(api: Arc<dyn NutritionApi>, user_id: Uuid) -> Result<Self, ApiError> {
        let goals = api.fetch_goals(user_id).await?;
        Ok(Self::from_goals(api, &goals))
    }

    pub fn from_goals(api: Arc<dyn NutritionApi>, goals: &Goals) -> Self {
        Self {
            api,
            user_id: goals.user_id,
            draft: MacroDraft::from_macros(&goals.as_macros()),
        }
    }

    pub fn field(&self, nutrient: Macro) -> &str {
        self.draft.get(nutrient)
    }

    pub fn set(&mut self, nutrient: Macro, raw: &str) -> bool {
        self.draft.set(nutrient, raw)
    }

    pub fn to_goals(&self) -> Goals {
        Goals::from_macros(self.user_id, self.draft.to_macros())
    }

    /// Save the current values. Errors are returned for display.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn save(&mut self) -> Result<Goals, ApiError> {
        let saved = self.api.save_goals(&self.to_goals()).await?;
        info!("goals saved");
        self.draft = MacroDraft::from_macros(&saved.as_macros());
        Ok(saved)
    }
}
