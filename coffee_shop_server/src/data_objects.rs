use actix_web::http::StatusCode;
use coffee_shop_engine::db_types::{DrinkUpdate, NewDrink, Recipe};
use serde::{Deserialize, Serialize};

/// The `{success: true, drinks: [...]}` envelope. `T` is either the short or the long drink representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self { success: true, drinks }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i64,
}

impl DeleteResponse {
    pub fn new(id: i64) -> Self {
        Self { success: true, delete: id }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

impl ErrorResponse {
    /// Builds the error body for the given status code, using the fixed message for that code.
    pub fn for_status(status: StatusCode) -> Self {
        let message = match status {
            StatusCode::BAD_REQUEST => "Bad request",
            StatusCode::UNAUTHORIZED => "Unauthenticated",
            StatusCode::FORBIDDEN => "Unauthorized",
            StatusCode::NOT_FOUND => "resource not found",
            StatusCode::METHOD_NOT_ALLOWED => "Method not allowed",
            StatusCode::CONFLICT => "conflict",
            StatusCode::UNPROCESSABLE_ENTITY => "unprocessable",
            s if s.is_server_error() => "internal server error",
            s => s.canonical_reason().unwrap_or("error"),
        };
        Self { success: false, error: status.as_u16(), message: message.to_string() }
    }
}

/// Body of `POST /drinks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDrinkRequest {
    pub title: String,
    pub recipe: Recipe,
}

impl From<NewDrinkRequest> for NewDrink {
    fn from(req: NewDrinkRequest) -> Self {
        NewDrink::new(req.title, req.recipe)
    }
}

/// Body of `PATCH /drinks/{id}`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDrinkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<Recipe>,
}

impl UpdateDrinkRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }
}

impl From<UpdateDrinkRequest> for DrinkUpdate {
    fn from(req: UpdateDrinkRequest) -> Self {
        DrinkUpdate { title: req.title, recipe: req.recipe }
    }
}
