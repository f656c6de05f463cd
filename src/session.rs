use std::{collections::VecDeque, fmt, mem};

use tracing::{debug, info};

use crate::{
    commands::{CommandTable, Completion, Interaction, Reply},
    context::{ChatMessage, Context, Effect},
    error::ShellError,
};

/// Where the session is in reading input.
enum State {
    /// Reading a normal command line.
    Idle,
    /// An interactive command is collecting answers.
    AwaitingAnswer {
        prompt: String,
        remaining: VecDeque<String>,
        answers: Vec<String>,
        callback: Completion,
    },
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Idle => f.write_str("Idle"),
            State::AwaitingAnswer {
                prompt,
                remaining,
                answers,
                ..
            } => f
                .debug_struct("AwaitingAnswer")
                .field("prompt", prompt)
                .field("remaining", remaining)
                .field("answers", answers)
                .finish_non_exhaustive(),
        }
    }
}

/// Everything the host should show or do after a line was submitted.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Response {
    pub output: Option<String>,
    pub effects: Vec<Effect>,
    pub messages: Vec<ChatMessage>,
}

/// One player session: the command table, the simulation it drives, and the
/// interactive input state.
#[derive(Debug)]
pub struct Session {
    table: CommandTable,
    ctx: Context,
    state: State,
}

impl Session {
    pub fn new(table: CommandTable, ctx: Context) -> Self {
        info!("session started with {} commands", table.names().count());
        Self {
            table,
            ctx,
            state: State::Idle,
        }
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    pub fn is_awaiting_answer(&self) -> bool {
        matches!(self.state, State::AwaitingAnswer { .. })
    }

    /// The prompt to show before the next line: the pending question of an
    /// interactive command, or the current device's shell prompt.
    pub fn prompt(&self) -> String {
        match &self.state {
            State::AwaitingAnswer { prompt, .. } => prompt.clone(),
            State::Idle => self
                .ctx
                .network
                .current_device()
                .render_prompt(self.ctx.player_name()),
        }
    }

    /// Feed one line of input, either a command or an answer.
    pub fn submit(&mut self, line: &str) -> Response {
        let output = match mem::replace(&mut self.state, State::Idle) {
            State::Idle => self.dispatch(line),
            State::AwaitingAnswer {
                mut remaining,
                mut answers,
                callback,
                ..
            } => {
                answers.push(line.to_string());
                match remaining.pop_front() {
                    Some(prompt) => {
                        self.state = State::AwaitingAnswer {
                            prompt,
                            remaining,
                            answers,
                            callback,
                        };
                        None
                    }
                    None => {
                        debug!("interaction complete with {} answers", answers.len());
                        render(callback(&mut self.ctx, answers))
                    }
                }
            }
        };

        Response {
            output,
            effects: self.ctx.take_effects(),
            messages: self.ctx.take_messages(),
        }
    }

    fn dispatch(&mut self, line: &str) -> Option<String> {
        match self.table.parse(line, &mut self.ctx) {
            Ok(Reply::Done(output)) => output,
            Ok(Reply::Ask(interaction)) => self.begin(interaction),
            Err(e) => Some(error_text(&e)),
        }
    }

    fn begin(&mut self, interaction: Interaction) -> Option<String> {
        let mut remaining = VecDeque::from(interaction.prompts);
        match remaining.pop_front() {
            Some(prompt) => {
                debug!("awaiting {} answers", remaining.len() + 1);
                self.state = State::AwaitingAnswer {
                    prompt,
                    remaining,
                    answers: Vec::new(),
                    callback: interaction.on_complete,
                };
                None
            }
            None => render((interaction.on_complete)(&mut self.ctx, Vec::new())),
        }
    }
}

fn render(result: Result<Option<String>, ShellError>) -> Option<String> {
    result.unwrap_or_else(|e| Some(error_text(&e)))
}

fn error_text(err: &ShellError) -> String {
    debug!("command failed: {err:?}");
    format!("Error: {err}")
}
