use std::sync::Arc;

use shared::domain::{FilterCategory, Recipe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    List,
    Display,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpeechFlags {
    pub is_listening: bool,
    pub is_speaking: bool,
}

/// Read-only copy of the session handed to renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub active_view: ActiveView,
    pub active_recipe: Option<Arc<Recipe>>,
    pub current_step: usize,
    pub active_filter: FilterCategory,
    pub is_listening: bool,
    pub is_speaking: bool,
    pub generation: u64,
}

#[derive(Debug, Clone)]
struct LoadedRecipe {
    recipe: Arc<Recipe>,
    step: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAdvance {
    Advanced(usize),
    AtLastStep(usize),
    NoSteps,
    NoRecipe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepJump {
    pub index: usize,
    pub clamped_from: Option<usize>,
}

/// Single source of truth for what is on screen.
///
/// The display view exists only while a recipe is loaded, so the view is
/// derived from the loaded recipe rather than stored beside it. The
/// generation increases every time the view returns to the list or a new
/// recipe is loaded; requests remember the generation they were issued in.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    loaded: Option<LoadedRecipe>,
    filter: FilterCategory,
    generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_view(&self) -> ActiveView {
        if self.loaded.is_some() {
            ActiveView::Display
        } else {
            ActiveView::List
        }
    }

    pub fn active_recipe(&self) -> Option<&Arc<Recipe>> {
        self.loaded.as_ref().map(|loaded| &loaded.recipe)
    }

    pub fn current_step(&self) -> usize {
        self.loaded.as_ref().map_or(0, |loaded| loaded.step)
    }

    pub fn current_instruction(&self) -> Option<&str> {
        let loaded = self.loaded.as_ref()?;
        loaded.recipe.instruction(loaded.step)
    }

    pub fn filter(&self) -> &FilterCategory {
        &self.filter
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self, flags: SpeechFlags) -> SessionSnapshot {
        SessionSnapshot {
            active_view: self.active_view(),
            active_recipe: self.active_recipe().cloned(),
            current_step: self.current_step(),
            active_filter: self.filter.clone(),
            is_listening: flags.is_listening,
            is_speaking: flags.is_speaking,
            generation: self.generation,
        }
    }

    pub(crate) fn show_list(&mut self, filter: Option<FilterCategory>) {
        self.loaded = None;
        if let Some(filter) = filter {
            self.filter = filter;
        }
        self.generation += 1;
    }

    pub(crate) fn load_recipe(&mut self, recipe: Recipe) {
        self.loaded = Some(LoadedRecipe {
            recipe: Arc::new(recipe),
            step: 0,
        });
        self.generation += 1;
    }

    pub(crate) fn advance(&mut self) -> StepAdvance {
        let Some(loaded) = self.loaded.as_mut() else {
            return StepAdvance::NoRecipe;
        };
        let Some(last) = loaded.recipe.last_step() else {
            return StepAdvance::NoSteps;
        };
        if loaded.step < last {
            loaded.step += 1;
            StepAdvance::Advanced(loaded.step)
        } else {
            loaded.step = last;
            StepAdvance::AtLastStep(last)
        }
    }

    /// Moves to `index`, clamping into range. `None` when nothing is loaded
    /// or the recipe has no steps.
    pub(crate) fn jump_to_step(&mut self, index: usize) -> Option<StepJump> {
        let loaded = self.loaded.as_mut()?;
        let last = loaded.recipe.last_step()?;
        let clamped = index.min(last);
        loaded.step = clamped;
        Some(StepJump {
            index: clamped,
            clamped_from: (clamped != index).then_some(index),
        })
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
