use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrition::{Macro, Macros};

/// `YYYY-MM-DD` dates as used in routes and bodies.
pub(crate) mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{macros::format_description, Date};

    pub fn serialize<S: Serializer>(date: &Date, s: S) -> Result<S::Ok, S::Error> {
        let text = date
            .format(format_description!("[year]-[month]-[day]"))
            .map_err(serde::ser::Error::custom)?;
        s.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(d)?;
        Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    #[serde(default, with = "timestamp")]
    pub created_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub meal_id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub text_input: Option<String>,
    #[serde(flatten)]
    pub macros: Macros,
    /// Set by the backend when estimation failed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(default, with = "timestamp")]
    pub created_at: Option<OffsetDateTime>,
}

impl Meal {
    pub fn description(&self) -> &str {
        match self.text_input.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => "(no description)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    pub user_id: Uuid,
    pub calories_goal: f64,
    pub protein_goal: f64,
    pub carbs_goal: f64,
    #[serde(default)]
    pub fat_goal: f64,
    pub sugar_goal: f64,
}

impl Goals {
    pub fn from_macros(user_id: Uuid, targets: Macros) -> Self {
        Self {
            user_id,
            calories_goal: targets.calories,
            protein_goal: targets.protein,
            carbs_goal: targets.carbs,
            fat_goal: targets.fat,
            sugar_goal: targets.sugar,
        }
    }

    pub fn target(&self, m: Macro) -> f64 {
        self.as_macros().get(m)
    }

    pub fn as_macros(&self) -> Macros {
        Macros {
            calories: self.calories_goal,
            protein: self.protein_goal,
            carbs: self.carbs_goal,
            fat: self.fat_goal,
            sugar: self.sugar_goal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyData {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub user_id: Uuid,
    pub totals: Macros,
    pub meals: Vec<Meal>,
}

impl DailyData {
    pub fn empty(date: Date, user_id: Uuid) -> Self {
        Self {
            date,
            user_id,
            totals: Macros::default(),
            meals: Vec::new(),
        }
    }

    /// Re-derive `totals` from the meal list after a local change.
    pub fn recompute_totals(&mut self) {
        self.totals = self.meals.iter().map(|m| &m.macros).sum();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub goal: Macros,
    pub actual: Macros,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyData {
    pub user_id: Uuid,
    pub days: Vec<DayEntry>,
}

/// A previously logged description with the macros it was stored with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSuggestion {
    pub text_input: String,
    #[serde(flatten)]
    pub macros: Macros,
}

/// ISO-8601 timestamps. Values without an offset are read as UTC and an
/// empty string reads as `None`.
mod timestamp {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{
        format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
        PrimitiveDateTime,
    };

    pub fn serialize<S: Serializer>(ts: &Option<OffsetDateTime>, s: S) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => {
                let text = ts.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
                s.serialize_str(&text)
            }
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<OffsetDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse(text).map(Some).map_err(serde::de::Error::custom),
        }
    }

    pub(super) fn parse(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
        if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
            return Ok(ts);
        }
        PrimitiveDateTime::parse(
            raw,
            format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
            ),
        )
        .map(PrimitiveDateTime::assume_utc)
    }
}
