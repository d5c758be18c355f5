use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use time::Date;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::NutritionApi;
use crate::debounce::Debouncer;
use crate::error::ApiError;
use crate::input::MacroDraft;
use crate::models::{DailyData, Goals, Meal};
use crate::nutrition::{progress_report, Macro, MacroProgress, Macros};

struct DayState {
    data: DailyData,
    /// What each meal row currently displays; may run ahead of `data`.
    drafts: HashMap<Uuid, MacroDraft>,
    /// Latest scheduled commit per meal; older responses are ignored.
    commit_seq: HashMap<Uuid, u64>,
}

impl DayState {
    fn new(date: Date, user_id: Uuid) -> Self {
        Self {
            data: DailyData::empty(date, user_id),
            drafts: HashMap::new(),
            commit_seq: HashMap::new(),
        }
    }
}

/// One day of meals for one user, with inline macro editing.
///
/// Edits update the displayed value immediately and are committed after a
/// quiet period. Failed commits and deletes are logged and otherwise ignored.
pub struct DailyView {
    api: Arc<dyn NutritionApi>,
    user_id: Uuid,
    today: Date,
    date: Date,
    commit_quiet: Duration,
    state: Arc<Mutex<DayState>>,
    commits: Mutex<HashMap<Uuid, Debouncer>>,
}

impl DailyView {
    pub fn new(api: Arc<dyn NutritionApi>, user_id: Uuid, today: Date, commit_quiet: Duration) -> Self {
        Self {
            api,
            user_id,
            today,
            date: today,
            commit_quiet,
            state: Arc::new(Mutex::new(DayState::new(today, user_id))),
            commits: Mutex::new(HashMap::new()),
        }
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn is_today(&self) -> bool {
        self.date == self.today
    }

    pub fn previous_day(&mut self) -> bool {
        match self.date.previous_day() {
            Some(d) => {
                self.move_to(d);
                true
            }
            None => false,
        }
    }

    /// Step forward, but never past today.
    pub fn next_day(&mut self) -> bool {
        match self.date.next_day() {
            Some(d) if d <= self.today => {
                self.move_to(d);
                true
            }
            _ => false,
        }
    }

    /// Jump to `date`; dates after today are refused.
    pub fn go_to(&mut self, date: Date) -> bool {
        if date > self.today {
            return false;
        }
        if date != self.date {
            self.move_to(date);
        }
        true
    }

    fn move_to(&mut self, date: Date) {
        self.date = date;
        *lock(&self.state) = DayState::new(date, self.user_id);
        self.prune_commits();
    }

    /// Forget debouncers whose commit has already been sent.
    fn prune_commits(&self) {
        self.commits
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|_, d| d.is_pending());
    }

    pub async fn load(&self) -> Result<(), ApiError> {
        let mut data = self.api.fetch_daily(self.date, self.user_id).await?;
        data.recompute_totals();
        debug!(date = %data.date, meals = data.meals.len(), "daily data loaded");

        let mut st = lock(&self.state);
        st.drafts = data
            .meals
            .iter()
            .map(|m| (m.meal_id, MacroDraft::from_macros(&m.macros)))
            .collect();
        st.data = data;
        drop(st);
        self.prune_commits();
        Ok(())
    }

    pub fn meals(&self) -> Vec<Meal> {
        lock(&self.state).data.meals.clone()
    }

    pub fn totals(&self) -> Macros {
        lock(&self.state).data.totals
    }

    pub fn progress(&self, goals: &Goals) -> Vec<MacroProgress> {
        progress_report(&self.totals(), &goals.as_macros())
    }

    /// The string a meal's field currently shows.
    pub fn field(&self, meal_id: Uuid, nutrient: Macro) -> Option<String> {
        lock(&self.state)
            .drafts
            .get(&meal_id)
            .map(|d| d.get(nutrient).to_string())
    }

    /// Apply a keystroke to a meal's field and schedule the commit.
    ///
    /// Returns `false` when the value is not an unsigned decimal (or the meal
    /// is unknown); the field is left unchanged in that case.
    pub fn edit(&self, meal_id: Uuid, nutrient: Macro, raw: &str) -> bool {
        let (macros, seq) = {
            let mut st = lock(&self.state);
            let Some(draft) = st.drafts.get_mut(&meal_id) else {
                return false;
            };
            if !draft.set(nutrient, raw) {
                return false;
            }
            let macros = draft.to_macros();
            let seq = st.commit_seq.entry(meal_id).or_insert(0);
            *seq += 1;
            (macros, *seq)
        };

        let api = self.api.clone();
        let state = self.state.clone();
        let mut commits = self.commits.lock().unwrap_or_else(|e| e.into_inner());
        commits
            .entry(meal_id)
            .or_insert_with(|| Debouncer::new(self.commit_quiet))
            .call(async move {
                match api.update_meal(meal_id, macros).await {
                    Ok(saved) => {
                        let mut st = lock(&state);
                        if st.commit_seq.get(&meal_id) != Some(&seq) {
                            debug!(%meal_id, "discarding superseded meal update");
                            return;
                        }
                        if let Some(slot) = st.data.meals.iter_mut().find(|m| m.meal_id == meal_id) {
                            *slot = saved;
                        }
                        st.data.recompute_totals();
                        debug!(%meal_id, "meal update committed");
                    }
                    Err(e) => warn!(error = %e, %meal_id, "meal update failed; keeping local value"),
                }
            });
        true
    }

    /// Delete a meal. On failure the list is left as it was.
    pub async fn delete_meal(&self, meal_id: Uuid) {
        if let Err(e) = self.api.delete_meal(meal_id).await {
            warn!(error = %e, %meal_id, "meal delete failed");
            return;
        }
        if let Some(pending) = self
            .commits
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&meal_id)
        {
            pending.cancel();
        }
        let mut st = lock(&self.state);
        st.data.meals.retain(|m| m.meal_id != meal_id);
        st.drafts.remove(&meal_id);
        st.commit_seq.remove(&meal_id);
        st.data.recompute_totals();
        info!(%meal_id, "meal deleted");
    }
}

fn lock(state: &Mutex<DayState>) -> MutexGuard<'_, DayState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}
