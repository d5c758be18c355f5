use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;
use uuid::Uuid;

use crate::api::NutritionApi;
use crate::debounce::Debouncer;
use crate::models::MealSuggestion;

pub const MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Default)]
struct SearchState {
    text: String,
    /// Bumped on every keystroke; results from an older generation are dropped.
    generation: u64,
    suggestions: Vec<MealSuggestion>,
    dropdown_open: bool,
}

/// Autocomplete over previously logged meal descriptions.
pub struct MealSearch {
    api: Arc<dyn NutritionApi>,
    user_id: Uuid,
    debouncer: Debouncer,
    state: Arc<Mutex<SearchState>>,
}

impl MealSearch {
    pub fn new(api: Arc<dyn NutritionApi>, user_id: Uuid, quiet: Duration) -> Self {
        Self {
            api,
            user_id,
            debouncer: Debouncer::new(quiet),
            state: Arc::new(Mutex::new(SearchState::default())),
        }
    }

    /// Record a keystroke. The lookup runs once the text has been stable for
    /// the quiet period.
    pub fn on_input(&self, text: &str) {
        let generation = {
            let mut st = lock(&self.state);
            st.text = text.to_string();
            st.generation += 1;
            st.generation
        };

        let query = text.trim().to_string();
        let api = self.api.clone();
        let state = self.state.clone();
        let user_id = self.user_id;

        self.debouncer.call(async move {
            if query.chars().count() < MIN_QUERY_LEN {
                let mut st = lock(&state);
                st.suggestions.clear();
                st.dropdown_open = false;
                return;
            }
            match api.search_meals(user_id, &query).await {
                Ok(results) => {
                    let mut st = lock(&state);
                    if st.generation != generation {
                        debug!(%query, "discarding stale search results");
                        return;
                    }
                    st.dropdown_open = !results.is_empty();
                    st.suggestions = results;
                }
                Err(e) => debug!(error = %e, %query, "meal search failed"),
            }
        });
    }

    pub fn text(&self) -> String {
        lock(&self.state).text.clone()
    }

    pub fn suggestions(&self) -> Vec<MealSuggestion> {
        lock(&self.state).suggestions.clone()
    }

    pub fn is_open(&self) -> bool {
        let st = lock(&self.state);
        st.dropdown_open && !st.suggestions.is_empty()
    }

    /// Pick a suggestion from the open dropdown.
    pub fn choose(&self, index: usize) -> Option<MealSuggestion> {
        let mut st = lock(&self.state);
        let picked = st.suggestions.get(index).cloned()?;
        st.dropdown_open = false;
        Some(picked)
    }

    /// Close the dropdown without dropping the results.
    pub fn dismiss(&self) {
        lock(&self.state).dropdown_open = false;
    }

    /// Clear the text box after a meal was logged.
    pub fn reset(&self) {
        self.debouncer.cancel();
        let mut st = lock(&self.state);
        st.generation += 1;
        st.text.clear();
        st.suggestions.clear();
        st.dropdown_open = false;
    }
}

fn lock(state: &Mutex<SearchState>) -> std::sync::MutexGuard<'_, SearchState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}
