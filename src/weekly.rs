use std::sync::Arc;

use time::Date;
use uuid::Uuid;

use crate::api::NutritionApi;
use crate::error::ApiError;
use crate::models::WeeklyData;
use crate::nutrition::Macro;

/// One bar/line point of a weekly chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub date: Date,
    pub label: String,
    pub actual: f64,
    pub goal: f64,
}

pub struct WeeklyView {
    data: WeeklyData,
}

impl WeeklyView {
    pub async fn load(api: Arc<dyn NutritionApi>, user_id: Uuid) -> Result<Self, ApiError> {
        let data = api.fetch_weekly(user_id).await?;
        Ok(Self { data })
    }

    pub fn from_data(data: WeeklyData) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &WeeklyData {
        &self.data
    }

    /// Actual vs goal per day, in backend order.
    pub fn series(&self, nutrient: Macro) -> Vec<ChartPoint> {
        self.data
            .days
            .iter()
            .map(|day| ChartPoint {
                date: day.date,
                label: weekday_label(day.date),
                actual: day.actual.get(nutrient),
                goal: day.goal.get(nutrient),
            })
            .collect()
    }

    pub fn average_actual(&self, nutrient: Macro) -> f64 {
        let days = &self.data.days;
        if days.is_empty() {
            return 0.0;
        }
        days.iter().map(|d| d.actual.get(nutrient)).sum::<f64>() / days.len() as f64
    }
}

fn weekday_label(date: Date) -> String {
    date.weekday().to_string().chars().take(3).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::models::{DayEntry, Goals};
    use crate::nutrition::Macros;
    use time::macros::date;

    fn cal(calories: f64) -> Macros {
        Macros { calories, ..Macros::default() }
    }

    #[test]
    fn series_pairs_actual_with_goal() {
        let view = WeeklyView::from_data(WeeklyData {
            user_id: Uuid::new_v4(),
            days: vec![
                DayEntry { date: date!(2026 - 02 - 15), goal: cal(2200.0), actual: cal(2050.0) },
                DayEntry { date: date!(2026 - 02 - 16), goal: cal(2200.0), actual: cal(2350.0) },
            ],
        });
        let points = view.series(Macro::Calories);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].label, "Sun");
        assert_eq!(points[1].label, "Mon");
        assert_eq!(points[1].actual, 2350.0);
        assert_eq!(points[1].goal, 2200.0);
        assert_eq!(view.average_actual(Macro::Calories), 2200.0);
        assert_eq!(view.average_actual(Macro::Sugar), 0.0);
    }

    #[test]
    fn empty_week_averages_zero() {
        let view = WeeklyView::from_data(WeeklyData { user_id: Uuid::new_v4(), days: vec![] });
        assert_eq!(view.average_actual(Macro::Protein), 0.0);
        assert!(view.series(Macro::Protein).is_empty());
    }

    #[tokio::test]
    async fn load_from_backend() {
        let api = Arc::new(FakeApi::new());
        let user_id = Uuid::new_v4();
        *api.goals.lock().unwrap() = Some(Goals::from_macros(user_id, cal(2000.0)));
        api.add_meal(user_id, date!(2026 - 02 - 14), "toast", cal(300.0));
        api.add_meal(user_id, date!(2026 - 02 - 14), "soup", cal(450.0));

        let view = WeeklyView::load(api.clone(), user_id).await.unwrap();
        let points = view.series(Macro::Calories);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].actual, 750.0);
        assert_eq!(points[0].goal, 2000.0);
        assert_eq!(points[0].label, "Sat");
    }
}
