use bytes::Bytes;
use serde::Serialize;
use time::Date;
use uuid::Uuid;

use crate::nutrition::Macros;

#[derive(Debug, Serialize)]
pub struct CreateUserRequest<'a> {
    pub name: &'a str,
}

/// An image attached to a new meal.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub body: Bytes,
}

/// Multipart body of `POST /api/meal`. At least one of `text` and `image`
/// is set.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeal {
    pub user_id: Uuid,
    pub date: Date,
    pub text: Option<String>,
    pub image: Option<ImageUpload>,
}

/// Body of `POST /api/meal/quick`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickMeal {
    pub user_id: Uuid,
    #[serde(with = "crate::models::iso_date")]
    pub meal_date: Date,
    pub text_input: String,
    #[serde(flatten)]
    pub macros: Macros,
}
