mod daily;
mod entry;
mod search;

pub use daily::DailyView;
pub use entry::{MealEntry, QuickAdd, MISSING_INPUT};
pub use search::{MealSearch, MIN_QUERY_LEN};
