use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// One of the five tracked quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Macro {
    Calories,
    Protein,
    Carbs,
    Fat,
    Sugar,
}

impl Macro {
    pub const ALL: [Macro; 5] = [
        Macro::Calories,
        Macro::Protein,
        Macro::Carbs,
        Macro::Fat,
        Macro::Sugar,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Macro::Calories => "Calories",
            Macro::Protein => "Protein",
            Macro::Carbs => "Carbs",
            Macro::Fat => "Fat",
            Macro::Sugar => "Sugar",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Macro::Calories => "kcal",
            _ => "g",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Macro::Calories => 0,
            Macro::Protein => 1,
            Macro::Carbs => 2,
            Macro::Fat => 3,
            Macro::Sugar => 4,
        }
    }
}

impl fmt::Display for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Five macro quantities. Also the wire shape of meal updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Macros {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub sugar: f64,
}

impl Macros {
    pub fn get(&self, m: Macro) -> f64 {
        match m {
            Macro::Calories => self.calories,
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
            Macro::Sugar => self.sugar,
        }
    }

    pub fn set(&mut self, m: Macro, value: f64) {
        let slot = match m {
            Macro::Calories => &mut self.calories,
            Macro::Protein => &mut self.protein,
            Macro::Carbs => &mut self.carbs,
            Macro::Fat => &mut self.fat,
            Macro::Sugar => &mut self.sugar,
        };
        *slot = value;
    }
}

impl Add for Macros {
    type Output = Macros;

    fn add(self, rhs: Macros) -> Macros {
        Macros {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
            sugar: self.sugar + rhs.sugar,
        }
    }
}

impl AddAssign for Macros {
    fn add_assign(&mut self, rhs: Macros) {
        *self = *self + rhs;
    }
}

impl Sum for Macros {
    fn sum<I: Iterator<Item = Macros>>(iter: I) -> Macros {
        iter.fold(Macros::default(), Add::add)
    }
}

impl<'a> Sum<&'a Macros> for Macros {
    fn sum<I: Iterator<Item = &'a Macros>>(iter: I) -> Macros {
        iter.copied().sum()
    }
}

/// Fraction of `goal` reached. A non-positive goal counts as no progress.
pub fn progress(actual: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        0.0
    } else {
        actual / goal
    }
}

pub fn ring_fraction(actual: f64, goal: f64) -> f64 {
    progress(actual, goal).clamp(0.0, 1.0)
}

pub fn remaining(actual: f64, goal: f64) -> f64 {
    (goal - actual).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroProgress {
    pub nutrient: Macro,
    pub actual: f64,
    pub goal: f64,
    pub fraction: f64,
    pub remaining: f64,
}

pub fn progress_report(actual: &Macros, goal: &Macros) -> Vec<MacroProgress> {
    Macro::ALL
        .iter()
        .map(|&m| {
            let (a, g) = (actual.get(m), goal.get(m));
            MacroProgress {
                nutrient: m,
                actual: a,
                goal: g,
                fraction: progress(a, g),
                remaining: remaining(a, g),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(calories: f64, protein: f64, carbs: f64, fat: f64, sugar: f64) -> Macros {
        Macros { calories, protein, carbs, fat, sugar }
    }

    #[test]
    fn sum_is_field_wise() {
        let meals = [m(750.0, 45.0, 72.0, 20.0, 6.0), m(320.0, 35.0, 28.0, 5.0, 18.0)];
        let total: Macros = meals.iter().sum();
        assert_eq!(total, m(1070.0, 80.0, 100.0, 25.0, 24.0));
    }

    #[test]
    fn empty_sum_is_zero() {
        let total: Macros = Vec::<Macros>::new().into_iter().sum();
        assert_eq!(total, Macros::default());
    }

    #[test]
    fn zero_goal_means_zero_progress() {
        assert_eq!(progress(500.0, 0.0), 0.0);
        assert_eq!(ring_fraction(500.0, 0.0), 0.0);
        assert_eq!(progress(50.0, 200.0), 0.25);
    }

    #[test]
    fn ring_is_clamped() {
        assert_eq!(ring_fraction(300.0, 200.0), 1.0);
        assert_eq!(progress(300.0, 200.0), 1.5);
        assert_eq!(remaining(300.0, 200.0), 0.0);
        assert_eq!(remaining(150.0, 200.0), 50.0);
    }

    #[test]
    fn missing_fat_defaults_to_zero() {
        let parsed: Macros =
            serde_json::from_str(r#"{"calories":750,"protein":45.0,"carbs":72.0,"sugar":6.0}"#)
                .unwrap();
        assert_eq!(parsed.fat, 0.0);
        assert_eq!(parsed.calories, 750.0);
    }

    #[test]
    fn report_covers_every_macro() {
        let report = progress_report(&m(1000.0, 80.0, 0.0, 0.0, 0.0), &m(2000.0, 0.0, 0.0, 0.0, 0.0));
        assert_eq!(report.len(), 5);
        assert_eq!(report[0].fraction, 0.5);
        assert_eq!(report[1].fraction, 0.0);
        assert_eq!(report[1].nutrient, Macro::Protein);
    }
}
