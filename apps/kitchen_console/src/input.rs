use assistant_core::UiAction;
use shared::domain::RecipeId;
use thiserror::Error;

pub const HELP: &str = "\
Type what you would say to the assistant, or one of:
  :list            back to the recipe list
  :filter <name>   filter recipes by category
  :open <id>       open a recipe
  :next            next step
  :repeat          repeat the current step
  :step <n>        jump to step n
  :listen          start listening without a phrase
  :help            show this help
  :quit            exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Action(UiAction),
    /// Free text, delivered as the transcript of the next listen session.
    Say(String),
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command ':{0}', type :help for the list")]
    UnknownCommand(String),
    #[error("':{command}' needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
}

pub fn parse_line(line: &str) -> Result<ConsoleInput, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ConsoleInput::Empty);
    }
    let Some(command) = line.strip_prefix(':') else {
        return Ok(ConsoleInput::Say(line.to_string()));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    let action = match name.to_ascii_lowercase().as_str() {
        "list" => UiAction::ShowList,
        "filter" => {
            if arg.is_empty() {
                return Err(InputError::MissingArgument {
                    command: "filter",
                    expected: "a category",
                });
            }
            UiAction::SetFilter(arg.to_string())
        }
        "open" => UiAction::OpenRecipe(RecipeId(parse_number("open", "a recipe id", arg)?)),
        "next" => UiAction::NextStep,
        "repeat" => UiAction::RepeatStep,
        "step" => {
            let step: i64 = parse_number("step", "a step number", arg)?;
            // Steps are shown starting at 1.
            let index = step
                .checked_sub(1)
                .and_then(|i| usize::try_from(i).ok())
                .ok_or_else(|| InputError::InvalidNumber(arg.to_string()))?;
            UiAction::GoToStep(index)
        }
        "listen" => UiAction::StartListening,
        "help" | "h" => return Ok(ConsoleInput::Help),
        "quit" | "q" | "exit" => return Ok(ConsoleInput::Quit),
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(ConsoleInput::Action(action))
}

fn parse_number(
    command: &'static str,
    expected: &'static str,
    arg: &str,
) -> Result<i64, InputError> {
    if arg.is_empty() {
        return Err(InputError::MissingArgument { command, expected });
    }
    arg.parse()
        .map_err(|_| InputError::InvalidNumber(arg.to_string()))
}
