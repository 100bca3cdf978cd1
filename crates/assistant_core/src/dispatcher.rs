use shared::protocol::{CommandAction, InterpretRequest, InterpretResponse};
use tracing::{debug, info, warn};

use crate::{
    assistant::{Assistant, RequestTicket, ServiceCommand},
    error::{AssistantError, InterpreterError},
    messages,
    navigation::Narration,
};

/// Tracks the single interpreter round-trip allowed at a time.
#[derive(Debug, Default)]
pub struct CommandDispatcher {
    in_flight: Option<RequestTicket>,
}

impl CommandDispatcher {
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<RequestTicket> {
        self.in_flight
    }

    fn begin(&mut self, ticket: RequestTicket) {
        self.in_flight = Some(ticket);
    }

    fn finish(&mut self, ticket: RequestTicket) -> bool {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }
}

impl Assistant {
    /// Sends an utterance to the interpreter together with the current step
    /// and recipe. Refused while another utterance is still being interpreted.
    pub fn submit_utterance(&mut self, utterance: &str) {
        if let Some(pending) = self.dispatcher.in_flight() {
            warn!(seq = pending.seq, "utterance dropped; a command is already in flight");
            self.view.set_status(messages::STATUS_COMMAND_IN_FLIGHT);
            return;
        }

        let ticket = self.requests.issue(self.session.generation());
        self.dispatcher.begin(ticket);
        let request = InterpretRequest {
            utterance: utterance.to_string(),
            current_step: self.session.current_step(),
            recipe_id: self.session.active_recipe().map(|recipe| recipe.id),
        };
        info!(
            seq = ticket.seq,
            generation = ticket.generation,
            utterance,
            "submitting utterance"
        );
        self.view.set_narration_log(messages::log_processing(utterance));
        self.narrate(messages::SAY_PROCESSING);
        self.emit(ServiceCommand::Interpret { ticket, request });
    }

    pub(crate) fn on_command_interpreted(
        &mut self,
        ticket: RequestTicket,
        result: Result<InterpretResponse, InterpreterError>,
    ) {
        if !self.dispatcher.finish(ticket) {
            warn!(seq = ticket.seq, "ignoring interpreter response that was never awaited");
            return;
        }
        if ticket.generation != self.session.generation() {
            info!(
                seq = ticket.seq,
                issued_in = ticket.generation,
                current = self.session.generation(),
                "discarding interpreter response from an earlier generation"
            );
            return;
        }

        match result {
            Ok(response) => {
                self.view.set_narration_log(messages::log_reply(&response.response));
                self.narrate(&response.response);
                match response.command_action() {
                    Some(action) => self.apply_command_action(action),
                    None => debug!(action = ?response.action, "narration-only reply"),
                }
            }
            Err(error) => {
                self.record_error(AssistantError::InterpreterFailure(error));
                self.view.set_narration_log(messages::LOG_COMMAND_FAILED);
                self.narrate(messages::SAY_COMMAND_FAILED);
            }
        }
    }

    /// The reply's narration has already been issued; list transitions keep it
    /// playing instead of cutting it off.
    fn apply_command_action(&mut self, action: CommandAction) {
        info!(?action, "applying interpreted action");
        match action {
            CommandAction::AdvanceStep => self.advance_step(),
            CommandAction::RepeatStep => self.repeat_step(),
            CommandAction::LoadRecipe(id) => self.open_recipe(id),
            CommandAction::ShowList => self.enter_list(None, Narration::Keep),
            CommandAction::FilterByCategory(category) => {
                self.enter_list(Some(category), Narration::Keep)
            }
        }
    }
}
