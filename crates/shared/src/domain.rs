use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(RecipeId);

pub const ALL_CATEGORIES: &str = "all";

/// Category filter applied to the recipe list. Always stored case-folded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FilterCategory(String);

impl FilterCategory {
    pub fn new(raw: impl AsRef<str>) -> Self {
        let folded = raw.as_ref().trim().to_lowercase();
        if folded.is_empty() {
            Self::all()
        } else {
            Self(folded)
        }
    }

    pub fn all() -> Self {
        Self(ALL_CATEGORIES.to_string())
    }

    pub fn is_all(&self) -> bool {
        self.0 == ALL_CATEGORIES
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FilterCategory {
    fn default() -> Self {
        Self::all()
    }
}

impl From<String> for FilterCategory {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for FilterCategory {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<FilterCategory> for String {
    fn from(value: FilterCategory) -> Self {
        value.0
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ingredient amounts arrive either as numbers (`2`, `0.5`) or free text (`"1/2"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            Quantity::Number(n) => write!(f, "{n}"),
            Quantity::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(3);
        if let Some(quantity) = &self.quantity {
            parts.push(quantity.to_string());
        }
        if let Some(unit) = self.unit.as_deref().filter(|u| !u.trim().is_empty()) {
            parts.push(unit.trim().to_string());
        }
        parts.push(self.name.clone());
        f.write_str(&parts.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Step order is the order of this sequence.
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Recipe {
    pub fn step_count(&self) -> usize {
        self.instructions.len()
    }

    pub fn last_step(&self) -> Option<usize> {
        self.instructions.len().checked_sub(1)
    }

    pub fn instruction(&self, index: usize) -> Option<&str> {
        self.instructions.get(index).map(String::as_str)
    }

    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            name: self.name.clone(),
            cuisine: self.cuisine.clone(),
            category: self.category.clone(),
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            servings: self.servings,
            image_url: self.image_url.clone(),
        }
    }
}
