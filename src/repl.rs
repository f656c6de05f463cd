use std::{
    borrow::Cow,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use clap_repl::reedline::{
    default_emacs_keybindings, ColumnarMenu, Completer, Emacs, KeyCode, KeyModifiers, MenuBuilder,
    Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, Reedline,
    ReedlineEvent, ReedlineMenu, Signal, Span, Suggestion,
};
use miette::{IntoDiagnostic, Result};
use rand::Rng;
use tracing::info;

use crate::{
    commands::CommandTable,
    context::{Context, Effect},
    markup::Renderer,
    network::Network,
    save::SaveStore,
    session::{Response, Session},
};

static DEFAULT_MULTILINE_INDICATOR: &str = "::: ";
static COMPLETION_MENU: &str = "completion_menu";

static BOOT_LINES: &[&str] = &[
    "[$primary]Cyclops BIOS v4.02[/]",
    "Checking memory... 7812MiB OK",
    "Detecting NPv5 interfaces... 1 found",
    "Mounting /bin",
    "Mounting /home",
    "Starting bosh 5.1.4",
    "[$primary]oracleOS v1.17[/] ready.",
];

/// Prompt whose text is fully rendered before each line is read.
pub struct OraclePrompt {
    left: String,
}

impl OraclePrompt {
    pub fn new(left: impl Into<String>) -> Self {
        Self { left: left.into() }
    }
}

impl Prompt for OraclePrompt {
    fn render_prompt_left(&self) -> Cow<str> {
        Cow::Borrowed(&self.left)
    }

    fn render_prompt_right(&self) -> Cow<str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<str> {
        Cow::Borrowed(DEFAULT_MULTILINE_INDICATOR)
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}

/// Tab completion of command names through [`CommandTable::complete`].
/// Silent while a command waits for an answer.
pub struct CommandCompleter {
    table: CommandTable,
    idle: Arc<AtomicBool>,
}

impl CommandCompleter {
    pub fn new(table: CommandTable, idle: Arc<AtomicBool>) -> Self {
        Self { table, idle }
    }
}

impl Completer for CommandCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let prefix = &line[..pos];
        if !self.idle.load(Ordering::Relaxed) || prefix.contains(char::is_whitespace) {
            return Vec::new();
        }

        self.table
            .complete(prefix)
            .into_iter()
            .map(|name| Suggestion {
                value: name.to_string(),
                span: Span::new(0, pos),
                append_whitespace: true,
                ..Default::default()
            })
            .collect()
    }
}

/// The terminal host: reads lines, feeds them to a [`Session`] and prints
/// the rendered replies.
pub struct Repl {
    renderer: Renderer,
    saves: SaveStore,
    debug: bool,
}

impl Repl {
    pub fn new(renderer: Renderer, saves: SaveStore, debug: bool) -> Self {
        Self {
            renderer,
            saves,
            debug,
        }
    }

    /// A fresh world and command table.
    pub fn new_session(&self) -> Session {
        Session::new(
            CommandTable::standard(self.debug),
            Context::new(Network::world(), self.saves.clone()),
        )
    }

    /// Print the boot log line by line with short random pauses.
    pub fn boot(&self) {
        let mut rng = rand::rng();
        for line in BOOT_LINES {
            thread::sleep(Duration::from_millis(rng.random_range(0..500)));
            println!("{}", self.renderer.render(line));
        }
        thread::sleep(Duration::from_millis(500));
    }

    pub fn run(&self) -> Result<()> {
        let mut session = self.new_session();
        let idle = Arc::new(AtomicBool::new(true));

        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );
        let mut editor = Reedline::create()
            .with_completer(Box::new(CommandCompleter::new(
                session.table().clone(),
                idle.clone(),
            )))
            .with_menu(ReedlineMenu::EngineCompleter(Box::new(
                ColumnarMenu::default().with_name(COMPLETION_MENU),
            )))
            .with_edit_mode(Box::new(Emacs::new(keybindings)));

        self.print("Welcome to [$primary]oracleOS[/]. Type [bold]help[/] for a list of commands.");

        loop {
            let prompt = OraclePrompt::new(self.renderer.render(&session.prompt()));
            let line = match editor.read_line(&prompt).into_diagnostic()? {
                Signal::Success(line) => line,
                Signal::CtrlC => continue,
                Signal::CtrlD => break,
                #[allow(unreachable_patterns)]
                _ => continue,
            };

            let Response {
                output,
                effects,
                messages,
            } = session.submit(&line);
            idle.store(!session.is_awaiting_answer(), Ordering::Relaxed);

            for message in &messages {
                self.print(&message.to_markup());
            }
            if let Some(output) = output {
                self.print(&output);
            }

            for effect in effects {
                match effect {
                    Effect::ClearScreen => editor.clear_screen().into_diagnostic()?,
                    Effect::Logout => {
                        info!("session ended, starting a new one");
                        session = self.new_session();
                        idle.store(true, Ordering::Relaxed);
                        self.print("Logged out. Type [bold]login[/] to log in again.");
                    }
                    Effect::Quit => return Ok(()),
                }
            }
        }

        Ok(())
    }

    fn print(&self, markup: &str) {
        println!("{}", self.renderer.render(markup));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completer(idle: bool) -> CommandCompleter {
        CommandCompleter::new(
            CommandTable::standard(false),
            Arc::new(AtomicBool::new(idle)),
        )
    }

    #[test]
    fn test_completes_command_names() {
        let mut completer = completer(true);

        let values: Vec<String> = completer
            .complete("lo", 2)
            .into_iter()
            .map(|s| s.value)
            .collect();

        assert_eq!(values, vec!["login", "logout"]);
        assert_eq!(completer.complete("sp", 2)[0].value, "spin");
    }

    #[test]
    fn test_no_completion_for_arguments_or_answers() {
        assert!(completer(true).complete("cd ho", 5).is_empty());
        assert!(completer(false).complete("lo", 2).is_empty());
    }

    #[test]
    fn test_prompt_renders_given_text() {
        let prompt = OraclePrompt::new("guest@oracle $ ");
        assert_eq!(prompt.render_prompt_left(), "guest@oracle $ ");
        assert_eq!(prompt.render_prompt_right(), "");
    }
}
