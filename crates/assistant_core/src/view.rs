//! Turns the session into the two mutually exclusive screens plus the
//! controls around them.

use shared::domain::{FilterCategory, Recipe, RecipeId, RecipeSummary};

use crate::{
    messages,
    session::{ActiveView, SessionSnapshot},
};

pub const DEFAULT_FILTERS: [&str; 4] = ["all", "vegetarian", "non-vegetarian", "sweet"];
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/400x300/cccccc/333333?text=No+Image";
pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_INGREDIENTS: &str = "No ingredients listed.";
pub const NO_INSTRUCTIONS: &str = "No instructions listed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListNotice {
    Loading,
    Empty,
    Failed,
}

impl ListNotice {
    pub fn message(self) -> &'static str {
        match self {
            Self::Loading => "Loading recipes...",
            Self::Empty => "No recipes available for this category.",
            Self::Failed => {
                "Failed to load recipes. Please ensure your backend is running and accessible."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ListContent {
    Pending(ListNotice),
    Loaded(Vec<RecipeSummary>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButton {
    pub category: FilterCategory,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeCard {
    pub id: RecipeId,
    pub name: String,
    pub cuisine: String,
    pub category: String,
    pub prep_time: String,
    pub cook_time: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPanel {
    pub notice: Option<ListNotice>,
    pub cards: Vec<RecipeCard>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepLine {
    pub index: usize,
    pub text: String,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipePanel {
    pub id: RecipeId,
    pub title: String,
    pub cuisine: String,
    pub category: String,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: String,
    pub image_url: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<StepLine>,
    pub steps_notice: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewBody {
    List(ListPanel),
    Recipe(RecipePanel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub body: ViewBody,
    pub filter_buttons: Vec<FilterButton>,
    pub assistant_enabled: bool,
    pub status_line: String,
    pub narration_log: String,
}

impl ViewModel {
    pub fn list_panel(&self) -> Option<&ListPanel> {
        match &self.body {
            ViewBody::List(panel) => Some(panel),
            ViewBody::Recipe(_) => None,
        }
    }

    pub fn recipe_panel(&self) -> Option<&RecipePanel> {
        match &self.body {
            ViewBody::Recipe(panel) => Some(panel),
            ViewBody::List(_) => None,
        }
    }
}

pub struct ViewController {
    filters: Vec<FilterCategory>,
    list: ListContent,
    status_line: String,
    narration_log: String,
}

impl ViewController {
    pub fn new<I, S>(filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut categories: Vec<FilterCategory> = Vec::new();
        for raw in filters {
            let category = FilterCategory::new(raw);
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        Self {
            filters: categories,
            list: ListContent::Pending(ListNotice::Loading),
            status_line: messages::STATUS_SELECT_RECIPE.to_string(),
            narration_log: messages::LOG_IDLE.to_string(),
        }
    }

    pub fn status_line(&self) -> &str {
        &self.status_line
    }

    pub fn narration_log(&self) -> &str {
        &self.narration_log
    }

    pub(crate) fn set_status(&mut self, status: impl Into<String>) {
        self.status_line = status.into();
    }

    pub(crate) fn set_narration_log(&mut self, log: impl Into<String>) {
        self.narration_log = log.into();
    }

    pub(crate) fn reset_for_list(&mut self) {
        self.list = ListContent::Pending(ListNotice::Loading);
        self.status_line = messages::STATUS_SELECT_RECIPE.to_string();
    }

    pub(crate) fn set_recipes(&mut self, recipes: Vec<RecipeSummary>) {
        self.list = if recipes.is_empty() {
            ListContent::Pending(ListNotice::Empty)
        } else {
            ListContent::Loaded(recipes)
        };
    }

    pub(crate) fn set_list_failed(&mut self) {
        self.list = ListContent::Pending(ListNotice::Failed);
    }

    pub fn render(&self, snapshot: &SessionSnapshot, assistant_enabled: bool) -> ViewModel {
        let body = match (snapshot.active_view, snapshot.active_recipe.as_deref()) {
            (ActiveView::Display, Some(recipe)) => {
                ViewBody::Recipe(recipe_panel(recipe, snapshot.current_step))
            }
            _ => ViewBody::List(self.list_panel()),
        };

        ViewModel {
            body,
            filter_buttons: self
                .filters
                .iter()
                .map(|category| FilterButton {
                    category: category.clone(),
                    label: filter_label(category),
                    active: *category == snapshot.active_filter,
                })
                .collect(),
            assistant_enabled,
            status_line: self.status_line.clone(),
            narration_log: self.narration_log.clone(),
        }
    }

    fn list_panel(&self) -> ListPanel {
        match &self.list {
            ListContent::Pending(notice) => ListPanel {
                notice: Some(*notice),
                cards: Vec::new(),
            },
            ListContent::Loaded(recipes) => ListPanel {
                notice: None,
                cards: recipes.iter().map(recipe_card).collect(),
            },
        }
    }
}

fn recipe_card(summary: &RecipeSummary) -> RecipeCard {
    RecipeCard {
        id: summary.id,
        name: summary.name.clone(),
        cuisine: text_or_na(summary.cuisine.as_deref()),
        category: text_or_na(summary.category.as_deref()),
        prep_time: minutes_or_na(summary.prep_time),
        cook_time: minutes_or_na(summary.cook_time),
        image_url: image_or_placeholder(summary.image_url.as_deref()),
    }
}

fn recipe_panel(recipe: &Recipe, current_step: usize) -> RecipePanel {
    let ingredients = if recipe.ingredients.is_empty() {
        vec![NO_INGREDIENTS.to_string()]
    } else {
        recipe.ingredients.iter().map(ToString::to_string).collect()
    };
    let steps: Vec<StepLine> = recipe
        .instructions
        .iter()
        .enumerate()
        .map(|(index, text)| StepLine {
            index,
            text: text.clone(),
            current: index == current_step,
        })
        .collect();

    RecipePanel {
        id: recipe.id,
        title: recipe.name.clone(),
        cuisine: text_or_na(recipe.cuisine.as_deref()),
        category: text_or_na(recipe.category.as_deref()),
        prep_time: minutes_or_na(recipe.prep_time),
        cook_time: minutes_or_na(recipe.cook_time),
        servings: recipe
            .servings
            .map_or_else(|| NOT_AVAILABLE.to_string(), |s| s.to_string()),
        image_url: image_or_placeholder(recipe.image_url.as_deref()),
        ingredients,
        steps_notice: steps.is_empty().then_some(NO_INSTRUCTIONS),
        steps,
    }
}

fn text_or_na(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

fn minutes_or_na(value: Option<u32>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |m| format!("{m} mins"))
}

fn image_or_placeholder(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(PLACEHOLDER_IMAGE_URL)
        .to_string()
}

fn filter_label(category: &FilterCategory) -> String {
    category
        .as_str()
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join("-")
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
