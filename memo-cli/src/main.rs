//! `memo`: command-line front end for the Memo note store.

mod settings;

use clap::{Parser, Subcommand};
use memo_core::{ConnectionProvider, NoteStore, Result};
use settings::AppSettings;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "memo", version, about = "Keep short notes in a local SQLite database")]
struct Cli {
    /// Database file to use instead of the one in the settings file
    #[arg(long, env = "MEMO_DB", global = true)]
    db: Option<PathBuf>,

    /// Hold one shared connection for the whole run
    #[arg(long, global = true)]
    shared: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(flatten)]
    Note(NoteCommand),

    /// Show or change the saved settings
    Config {
        /// Default database file
        #[arg(long)]
        database: Option<PathBuf>,

        /// Use a shared connection by default
        #[arg(long)]
        shared_connection: Option<bool>,
    },
}

#[derive(Debug, Subcommand)]
enum NoteCommand {
    /// Add a note and print its id
    Add { title: String, content: String },

    /// List notes, newest first
    List {
        /// Print the notes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print one note's title and content
    Show { id: i64 },

    /// Replace a note's title and content
    Edit {
        id: i64,
        title: String,
        content: String,
    },

    /// Delete a note
    Rm { id: i64 },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::debug!("{e:?}");
            eprintln!("memo: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let settings = settings::load_settings();

    let command = match cli.command {
        Command::Config {
            database,
            shared_connection,
        } => return configure(settings, database, shared_connection),
        Command::Note(command) => command,
    };

    let db_path = cli
        .db
        .unwrap_or_else(|| PathBuf::from(&settings.database_path));
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    log::debug!("Using database {}", db_path.display());

    if cli.shared || settings.shared_connection {
        execute(&NoteStore::open_shared(&db_path)?, command)
    } else {
        execute(&NoteStore::open(&db_path), command)
    }
}

/// Runs one note command. Returns `false` when the command found nothing to act on.
fn execute<P: ConnectionProvider>(store: &NoteStore<P>, command: NoteCommand) -> Result<bool> {
    match command {
        NoteCommand::Add { title, content } => {
            let id = store.insert(&title, &content)?;
            println!("{id}");
        }
        NoteCommand::List { json } => {
            let notes = store.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&notes)?);
            } else if notes.is_empty() {
                println!("No notes yet.");
            } else {
                for note in &notes {
                    println!("{:>5}  {}  {}", note.id, note.updated_at, note.title);
                }
            }
        }
        NoteCommand::Show { id } => match store.get(id)? {
            Some(note) => println!("{}", note.view()),
            None => {
                eprintln!("memo: no note with id {id}");
                return Ok(false);
            }
        },
        // A missing id is not an error for edit or rm.
        NoteCommand::Edit { id, title, content } => store.update(id, &title, &content)?,
        NoteCommand::Rm { id } => store.delete(id)?,
    }
    Ok(true)
}

fn configure(
    mut settings: AppSettings,
    database: Option<PathBuf>,
    shared_connection: Option<bool>,
) -> Result<bool> {
    if database.is_none() && shared_connection.is_none() {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(true);
    }

    if let Some(database) = database {
        settings.database_path = database.to_string_lossy().to_string();
    }
    if let Some(shared) = shared_connection {
        settings.shared_connection = shared;
    }
    settings::save_settings(&settings)?;
    println!("Saved settings to {}", settings::settings_file_path().display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_with_global_flags() {
        let cli = Cli::try_parse_from(["memo", "add", "Todo", "Call Bob", "--db", "x.db", "--shared"])
            .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        assert!(cli.shared);
        assert!(matches!(
            cli.command,
            Command::Note(NoteCommand::Add { ref title, ref content })
                if title == "Todo" && content == "Call Bob"
        ));
    }

    #[test]
    fn test_parse_config() {
        let cli = Cli::try_parse_from(["memo", "config", "--shared-connection", "true"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config { database: None, shared_connection: Some(true) }
        ));
    }

    #[test]
    fn test_edit_requires_title_and_content() {
        assert!(Cli::try_parse_from(["memo", "edit", "1", "only-title"]).is_err());
    }

    #[test]
    fn test_execute_note_commands() {
        let temp = NamedTempFile::new().unwrap();
        let store = NoteStore::open(temp.path());

        let add = NoteCommand::Add {
            title: "Groceries".to_string(),
            content: "Milk, eggs".to_string(),
        };
        assert!(execute(&store, add).unwrap());
        let id = store.list().unwrap()[0].id;

        let edit = NoteCommand::Edit {
            id,
            title: "Groceries".to_string(),
            content: "Milk, eggs, bread".to_string(),
        };
        assert!(execute(&store, edit).unwrap());
        assert_eq!(store.get(id).unwrap().unwrap().content, "Milk, eggs, bread");

        assert!(execute(&store, NoteCommand::Show { id }).unwrap());
        assert!(execute(&store, NoteCommand::List { json: true }).unwrap());

        assert!(execute(&store, NoteCommand::Rm { id }).unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_show_missing_note_reports_not_found() {
        let temp = NamedTempFile::new().unwrap();
        let store = NoteStore::open(temp.path());
        assert!(!execute(&store, NoteCommand::Show { id: 7 }).unwrap());
    }

    #[test]
    fn test_rm_missing_note_succeeds() {
        let temp = NamedTempFile::new().unwrap();
        let store = NoteStore::open(temp.path());
        assert!(execute(&store, NoteCommand::Rm { id: 7 }).unwrap());
    }
}
