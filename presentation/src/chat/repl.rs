//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use crate::ProgressReporter;
use crate::interrupt::InterruptGuard;
use colored::Colorize;
use conductor_application::{NoProgress, ProcessRequestUseCase};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// What a line of input asks the REPL to do
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplInput<'a> {
    Empty,
    Exit,
    Help,
    Tools,
    Unknown(&'a str),
    Request(&'a str),
}

impl<'a> ReplInput<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line {
            "" => Self::Empty,
            "exit" | "quit" | "/quit" | "/exit" | "/q" => Self::Exit,
            "/help" | "/h" | "/?" => Self::Help,
            "/tools" => Self::Tools,
            cmd if cmd.starts_with('/') => Self::Unknown(cmd),
            request => Self::Request(request),
        }
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: Arc<ProcessRequestUseCase>,
    show_progress: bool,
    history_path: Option<PathBuf>,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(use_case: Arc<ProcessRequestUseCase>) -> Self {
        Self {
            use_case,
            show_progress: true,
            history_path: Self::default_history_path(),
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Use a specific history file instead of the data-dir default
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.history_path = path;
        }
        self
    }

    fn default_history_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("conductor").join("history.txt"))
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => match ReplInput::parse(&line) {
                    ReplInput::Empty => continue,
                    ReplInput::Exit => {
                        println!("Bye!");
                        break;
                    }
                    ReplInput::Help => Self::print_help(),
                    ReplInput::Tools => self.print_tools(),
                    ReplInput::Unknown(cmd) => {
                        println!("Unknown command: {}", cmd);
                        println!("Type /help for available commands");
                    }
                    ReplInput::Request(request) => {
                        let _ = rl.add_history_entry(request);
                        self.process_request(request).await;
                    }
                },
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        let tools = self.use_case.tools();

        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│           Conductor - Chat Mode             │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Model: {}", self.use_case.config().decision.model);
        if tools.is_empty() {
            println!("Tools: {}", "none".yellow());
        } else {
            println!("Tools: {}", tools.names().collect::<Vec<_>>().join(", "));
        }
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?            - Show this help");
        println!("  /tools                   - List available tools");
        println!("  /quit, /exit, /q, exit   - Exit chat");
        println!();
    }

    fn print_tools(&self) {
        println!();
        println!("{}", ConsoleFormatter::format_tools(&self.use_case.tools()));
    }

    async fn process_request(&self, request: &str) {
        println!();

        let cancel = CancellationToken::new();
        let _interrupt = InterruptGuard::arm(&cancel);

        let result = if self.show_progress {
            let progress = ProgressReporter::new();
            self.use_case
                .process_with_progress(request, &cancel, &progress)
                .await
        } else {
            self.use_case
                .process_with_progress(request, &cancel, &NoProgress)
                .await
        };

        match result {
            Ok(output) => {
                print!("{}", ConsoleFormatter::format(&output));
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
            }
        }
        println!();
    }
}
