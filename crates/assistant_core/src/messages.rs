//! Fixed texts shown on the status line, in the narration log, or spoken aloud.

pub const STATUS_SELECT_RECIPE: &str = "Select a recipe to begin or filter by category.";
pub const STATUS_FETCHING_RECIPE: &str = "Fetching recipe...";
pub const STATUS_RECIPE_LOADED: &str = "Recipe loaded. Click 'Start Assistant' to begin.";
pub const STATUS_RECIPE_LOAD_FAILED: &str = "Failed to load recipe. Please try again.";
pub const STATUS_READY: &str = "Ready for your command.";
pub const STATUS_SPEECH_ERROR: &str = "Error speaking. Ready for command.";
pub const STATUS_SYNTHESIS_UNAVAILABLE: &str = "Speech Synthesis not available. Ready for command.";
pub const STATUS_LISTENING: &str = "Listening...";
pub const STATUS_SPEAKING_WAIT: &str = "Assistant is speaking. Please wait.";
pub const STATUS_SELECT_RECIPE_FIRST: &str = "Please select a recipe first.";
pub const STATUS_COMMAND_IN_FLIGHT: &str = "Still working on your last request. Please wait.";
pub const STATUS_ALREADY_LISTENING: &str = "Already listening...";
pub const STATUS_START_FAILED: &str =
    "Could not start listening. Microphone might be in use or permissions denied.";
pub const STATUS_RECOGNITION_UNSUPPORTED: &str =
    "Speech recognition is not supported on this platform. Voice input is disabled.";
pub const STATUS_PERMISSION_DENIED: &str =
    "Microphone permission denied. Allow microphone access and try again.";
pub const STATUS_LISTENING_STOPPED: &str =
    "Listening stopped. Click 'Start Assistant' to try again.";

pub const LOG_IDLE: &str = "Assistant will speak here.";
pub const LOG_COMMAND_FAILED: &str = "Sorry, I couldn't process that command.";

pub const SAY_PROCESSING: &str = "Processing your request.";
pub const SAY_RETRY: &str = "I didn't quite catch that. Please try again.";
pub const SAY_LIST_FETCH_FAILED: &str = "Sorry, I could not fetch the list of recipes.";
pub const SAY_RECIPE_FETCH_FAILED: &str = "Sorry, I could not load the recipe.";
pub const SAY_COMMAND_FAILED: &str = "Sorry, I couldn't process that command due to an error.";
pub const SAY_LAST_STEP: &str = "You are at the last step of the recipe!";
pub const SAY_NO_RECIPE_TO_ADVANCE: &str = "No recipe loaded to advance steps.";
pub const SAY_NO_STEP_TO_REPEAT: &str = "No step to repeat.";
pub const SAY_NO_INSTRUCTIONS: &str = "This recipe has no instructions.";

pub fn status_transcript(transcript: &str) -> String {
    format!("You said: \"{transcript}\"")
}

pub fn status_recognition_error(code: &str) -> String {
    format!("Speech error: {code}. Please try again.")
}

pub fn log_processing(utterance: &str) -> String {
    format!("Processing command: \"{utterance}\"...")
}

pub fn log_reply(narration: &str) -> String {
    format!("Assistant: {narration}")
}

pub fn say_recipe_loaded(name: &str) -> String {
    format!("The recipe for {name} is loaded. Click Start Assistant when you are ready.")
}
