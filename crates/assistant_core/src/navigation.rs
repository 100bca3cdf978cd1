use shared::domain::{FilterCategory, Recipe, RecipeId, RecipeSummary};
use tracing::{debug, info};

use crate::{
    assistant::{Assistant, RequestTicket, ServiceCommand},
    error::{AssistantError, CatalogError, FetchTarget},
    messages,
    session::{ActiveView, StepAdvance},
};

/// Whether entering the list view should silence narration in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Narration {
    Cancel,
    Keep,
}

impl Assistant {
    pub fn go_to_list(&mut self, filter: Option<FilterCategory>) {
        self.enter_list(filter, Narration::Cancel);
    }

    pub fn set_filter(&mut self, category: &str) {
        self.enter_list(Some(FilterCategory::new(category)), Narration::Cancel);
    }

    pub fn open_recipe(&mut self, id: RecipeId) {
        let ticket = self.requests.issue_recipe(self.session.generation(), id);
        self.view.set_status(messages::STATUS_FETCHING_RECIPE);
        info!(recipe_id = id.0, seq = ticket.seq, "fetching recipe");
        self.emit(ServiceCommand::FetchRecipe { ticket, id });
    }

    pub fn advance_step(&mut self) {
        match self.session.advance() {
            StepAdvance::Advanced(step) => {
                info!(step, "moved to next step");
                self.narrate_current_step();
            }
            StepAdvance::AtLastStep(step) => {
                debug!(step, "already at the last step");
                self.narrate(messages::SAY_LAST_STEP);
            }
            StepAdvance::NoSteps => self.narrate(messages::SAY_NO_INSTRUCTIONS),
            StepAdvance::NoRecipe => self.narrate(messages::SAY_NO_RECIPE_TO_ADVANCE),
        }
    }

    pub fn repeat_step(&mut self) {
        match self.session.current_instruction() {
            Some(_) => {
                debug!(step = self.session.current_step(), "repeating step");
                self.narrate_current_step();
            }
            None => self.narrate(messages::SAY_NO_STEP_TO_REPEAT),
        }
    }

    /// Jumps straight to an instruction, e.g. when the user clicks it.
    pub fn go_to_step(&mut self, index: usize) {
        let step_count = self
            .session
            .active_recipe()
            .map_or(0, |recipe| recipe.step_count());
        match self.session.jump_to_step(index) {
            Some(jump) => {
                if let Some(requested) = jump.clamped_from {
                    self.record_error(AssistantError::InvalidStep {
                        requested,
                        step_count,
                    });
                }
                self.narrate_current_step();
            }
            None => self.narrate(messages::SAY_NO_STEP_TO_REPEAT),
        }
    }

    pub(crate) fn enter_list(&mut self, filter: Option<FilterCategory>, narration: Narration) {
        if self.input.abort() {
            debug!("listening aborted on return to list");
        }
        if narration == Narration::Cancel {
            if self.output.cancel() {
                debug!("narration cancelled on return to list");
            }
            self.view.set_narration_log(messages::LOG_IDLE);
        }
        self.requests.forget_recipe();
        self.session.show_list(filter);
        self.view.reset_for_list();
        info!(
            filter = %self.session.filter(),
            generation = self.session.generation(),
            "showing recipe list"
        );
        self.request_recipe_list();
    }

    fn request_recipe_list(&mut self) {
        let ticket = self.requests.issue_list(self.session.generation());
        let filter = self.session.filter().clone();
        self.emit(ServiceCommand::FetchRecipeList { ticket, filter });
    }

    fn narrate_current_step(&mut self) {
        if let Some(text) = self.session.current_instruction().map(str::to_owned) {
            self.narrate(&text);
        }
    }

    pub(crate) fn on_recipe_list_fetched(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<RecipeSummary>, CatalogError>,
    ) {
        if !self.requests.settle_list(ticket) {
            debug!(seq = ticket.seq, "discarding superseded recipe list");
            return;
        }
        match result {
            Ok(recipes) => {
                info!(count = recipes.len(), "recipe list loaded");
                self.view.set_recipes(recipes);
            }
            Err(source) => {
                self.record_error(AssistantError::FetchFailure {
                    target: FetchTarget::RecipeList,
                    source,
                });
                self.view.set_list_failed();
                if self.session.active_view() == ActiveView::List {
                    self.narrate(messages::SAY_LIST_FETCH_FAILED);
                }
            }
        }
    }

    pub(crate) fn on_recipe_fetched(
        &mut self,
        ticket: RequestTicket,
        result: Result<Recipe, CatalogError>,
    ) {
        if ticket.generation != self.session.generation() {
            debug!(
                seq = ticket.seq,
                generation = ticket.generation,
                "discarding recipe response from an earlier generation"
            );
            return;
        }
        let Some(requested) = self.requests.settle_recipe(ticket) else {
            debug!(seq = ticket.seq, "discarding superseded recipe response");
            return;
        };
        match result {
            Ok(recipe) => {
                let name = recipe.name.clone();
                info!(recipe_id = recipe.id.0, steps = recipe.step_count(), "recipe loaded");
                self.session.load_recipe(recipe);
                self.view.set_status(messages::STATUS_RECIPE_LOADED);
                self.narrate(&messages::say_recipe_loaded(&name));
            }
            Err(source) => {
                self.record_error(AssistantError::FetchFailure {
                    target: FetchTarget::Recipe(requested),
                    source,
                });
                self.enter_list(None, Narration::Cancel);
                self.view.set_status(messages::STATUS_RECIPE_LOAD_FAILED);
                self.narrate(messages::SAY_RECIPE_FETCH_FAILED);
            }
        }
    }
}
