//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;
use taskcrew_application::{Orchestrator, TaskStorePort};
use taskcrew_domain::SessionId;

/// Interactive chat REPL driving one orchestrator session.
pub struct ChatRepl {
    orchestrator: Arc<Orchestrator>,
    store: Arc<dyn TaskStorePort>,
    session_id: SessionId,
}

impl ChatRepl {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        store: Arc<dyn TaskStorePort>,
        session_id: SessionId,
    ) -> Self {
        Self {
            orchestrator,
            store,
            session_id,
        }
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("taskcrew").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline(">>> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line).await {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    let response = self.orchestrator.process(&self.session_id, line).await;
                    println!("{}", ConsoleFormatter::format(&response));
                }
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

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│           Taskcrew - Chat Mode              │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Tell me what you need, e.g.:");
        println!("  \"I need to do the accounting, due March 27\"");
        println!("  \"plan my week\"");
        println!();
        println!("Commands:");
        println!("  /help     - Show this help");
        println!("  /tasks    - List all tasks");
        println!("  /quit     - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&self, cmd: &str) -> bool {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?    - Show this help");
                println!("  /tasks           - List all tasks");
                println!("  /quit, /exit, /q - Exit chat");
                println!();
                false
            }
            "/tasks" => {
                match self.store.tasks().await {
                    Ok(tasks) if tasks.is_empty() => println!("No tasks yet."),
                    Ok(tasks) => {
                        for task in tasks {
                            let deadline = task
                                .deadline
                                .map(|d| format!(" due {}", d))
                                .unwrap_or_default();
                            println!("  #{} {} [{}]{}", task.id, task.title, task.status, deadline);
                        }
                    }
                    Err(e) => eprintln!("Couldn't read the tasks: {}", e),
                }
                false
            }
            other => {
                println!("Unknown command: {} (try /help)", other);
                false
            }
        }
    }
}
