use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::{types::Json, FromRow};

//--------------------------------------     Ingredient       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub color: String,
    pub name: String,
    pub parts: u32,
}

impl Ingredient {
    pub fn new<S: Into<String>>(color: S, name: S, parts: u32) -> Self {
        Self { color: color.into(), name: name.into(), parts }
    }
}

/// The public view of an ingredient. The ingredient name is considered part of the secret recipe and is left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: u32,
}

impl From<&Ingredient> for ShortIngredient {
    fn from(value: &Ingredient) -> Self {
        Self { color: value.color.clone(), parts: value.parts }
    }
}

//--------------------------------------       Recipe         ---------------------------------------------------------
/// An ordered list of ingredients.
///
/// Clients may send either a single ingredient object or a list of them. Both forms deserialize into a `Recipe`;
/// it always serializes as a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Recipe(Vec<Ingredient>);

impl Recipe {
    pub fn new(ingredients: Vec<Ingredient>) -> Self {
        Self(ingredients)
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn short(&self) -> Vec<ShortIngredient> {
        self.0.iter().map(ShortIngredient::from).collect()
    }
}

impl From<Vec<Ingredient>> for Recipe {
    fn from(ingredients: Vec<Ingredient>) -> Self {
        Self(ingredients)
    }
}

impl From<Ingredient> for Recipe {
    fn from(ingredient: Ingredient) -> Self {
        Self(vec![ingredient])
    }
}

impl<'de> Deserialize<'de> for Recipe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            Many(Vec<Ingredient>),
            One(Ingredient),
        }
        match OneOrMany::deserialize(deserializer)? {
            OneOrMany::Many(ingredients) => Ok(Self(ingredients)),
            OneOrMany::One(ingredient) => Ok(Self(vec![ingredient])),
        }
    }
}

//--------------------------------------        Drink         ---------------------------------------------------------
/// A drink as it is stored in the database. The `id` is assigned by the database on insert and never changes.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Json<Recipe>,
}

impl Drink {
    pub fn new<S: Into<String>>(id: i64, title: S, recipe: Recipe) -> Self {
        Self { id, title: title.into(), recipe: Json(recipe) }
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe.0
    }

    /// The public representation of the drink. Ingredient names are omitted.
    pub fn short(&self) -> ShortDrink {
        ShortDrink { id: self.id, title: self.title.clone(), recipe: self.recipe().short() }
    }

    /// The full representation of the drink, including ingredient names.
    pub fn long(&self) -> LongDrink {
        LongDrink { id: self.id, title: self.title.clone(), recipe: self.recipe().clone() }
    }
}

impl Display for Drink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Drink #{} ({})", self.id, self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongDrink {
    pub id: i64,
    pub title: String,
    pub recipe: Recipe,
}

//--------------------------------------       NewDrink       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Recipe,
}

impl NewDrink {
    pub fn new<S: Into<String>>(title: S, recipe: Recipe) -> Self {
        Self { title: title.into(), recipe }
    }
}

//--------------------------------------     DrinkUpdate      ---------------------------------------------------------
/// A partial update to a drink. Fields that are `None` are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<Recipe>,
}

impl DrinkUpdate {
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipe = Some(recipe);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }
}
