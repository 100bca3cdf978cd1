use serde::{Deserialize, Serialize};

use crate::domain::{FilterCategory, RecipeId};

/// Body posted to the command interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretRequest {
    #[serde(rename = "command")]
    pub utterance: String,
    pub current_step: usize,
    pub recipe_id: Option<RecipeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    NextStep,
    RepeatStep,
    LoadRecipeId,
    ShowRecipeList,
    FilterRecipes,
}

impl ActionKind {
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "next_step" => Some(Self::NextStep),
            "repeat_step" => Some(Self::RepeatStep),
            "load_recipe_id" => Some(Self::LoadRecipeId),
            "show_recipe_list" => Some(Self::ShowRecipeList),
            "filter_recipes" => Some(Self::FilterRecipes),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::NextStep => "next_step",
            Self::RepeatStep => "repeat_step",
            Self::LoadRecipeId => "load_recipe_id",
            Self::ShowRecipeList => "show_recipe_list",
            Self::FilterRecipes => "filter_recipes",
        }
    }
}

/// Interpreter reply. `action` is kept as a raw string so unknown actions
/// degrade to narration-only instead of failing to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<RecipeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandAction {
    AdvanceStep,
    RepeatStep,
    LoadRecipe(RecipeId),
    ShowList,
    FilterByCategory(FilterCategory),
}

impl InterpretResponse {
    pub fn narration_only(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            action: None,
            recipe_id: None,
            category: None,
            intent: None,
        }
    }

    pub fn with_action(mut self, kind: ActionKind) -> Self {
        self.action = Some(kind.as_wire().to_string());
        self
    }

    pub fn action_kind(&self) -> Option<ActionKind> {
        self.action.as_deref().and_then(ActionKind::from_wire)
    }

    /// Resolves the action together with its payload. Actions missing a
    /// required payload resolve to `None`.
    pub fn command_action(&self) -> Option<CommandAction> {
        match self.action_kind()? {
            ActionKind::NextStep => Some(CommandAction::AdvanceStep),
            ActionKind::RepeatStep => Some(CommandAction::RepeatStep),
            ActionKind::LoadRecipeId => self.recipe_id.map(CommandAction::LoadRecipe),
            ActionKind::ShowRecipeList => Some(CommandAction::ShowList),
            ActionKind::FilterRecipes => self
                .category
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .map(|c| CommandAction::FilterByCategory(FilterCategory::new(c))),
        }
    }
}
