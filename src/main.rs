use anyhow::Context;
use time::{macros::format_description, Date, OffsetDateTime};

use brotein::{api::NutritionApi, meals::DailyView, telemetry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let state = AppState::init()?;
    let today = OffsetDateTime::now_utc().date();
    let date = match std::env::args().nth(1) {
        Some(raw) => Date::parse(&raw, format_description!("[year]-[month]-[day]"))
            .with_context(|| format!("invalid date {raw:?}, expected YYYY-MM-DD"))?,
        None => today,
    };

    let mut session = state.user_session();
    session.refresh().await.context("load users")?;
    let Some(user) = session.selected_user().cloned() else {
        anyhow::bail!("no users yet, create one first");
    };
    tracing::debug!(user_id = %user.id, %date, "showing daily summary");

    let mut day = DailyView::new(
        state.api.clone(),
        user.id,
        today,
        state.config.debounce.commit(),
    );
    anyhow::ensure!(day.go_to(date), "{date} is in the future");
    day.load().await.context("load daily data")?;
    let goals = state
        .api
        .fetch_goals(user.id)
        .await
        .context("load goals")?;

    println!("{} / {}", user.name, day.date());
    let meals = day.meals();
    if meals.is_empty() {
        println!("  No meals logged yet.");
    }
    for meal in &meals {
        println!(
            "  {:<40} {:>6.0} kcal",
            meal.description(),
            meal.macros.calories
        );
        if !meal.error.is_empty() {
            tracing::warn!(meal_id = %meal.meal_id, error = %meal.error, "estimation failed");
        }
    }
    println!();
    for p in day.progress(&goals) {
        println!(
            "  {:<9} {:>7.1} / {:>7.1} {:<4} {:>4.0}%",
            p.nutrient,
            p.actual,
            p.goal,
            p.nutrient.unit(),
            p.fraction * 100.0
        );
    }

    Ok(())
}
