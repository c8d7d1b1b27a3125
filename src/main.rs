use clap::Parser;
use mindjournal::application::{
    init::init, Checkpoint, Collaborators, ConfigService, DeleteOutcome, DiscardOutcome,
    JournalSession,
};
use mindjournal::cli::{
    format_draft, format_entry_detail, format_entry_list, Cli, Commands, DraftAction,
};
use mindjournal::error::{JournalError, Result};
use mindjournal::infrastructure::{
    AutoConfirm, Confirmer, FileShare, JournalRoot, ShareOutcome, ShareTarget, StdoutShare,
    TerminalConfirm,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn init_logging() {
    // Logs go to stderr so exports on stdout stay clean
    let filter = EnvFilter::try_from_env("MINDJOURNAL_LOG")
        .unwrap_or_else(|_| EnvFilter::new("mindjournal=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn emit(text: &str) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}

fn confirmer(yes: bool) -> Arc<dyn Confirmer> {
    if yes {
        Arc::new(AutoConfirm(true))
    } else {
        Arc::new(TerminalConfirm)
    }
}

/// Open the journal found from the current directory.
/// With `strict`, unreadable entries abort instead of starting empty.
async fn open_session(
    confirmer: Arc<dyn Confirmer>,
    share: Arc<dyn ShareTarget>,
    strict: bool,
) -> Result<Arc<JournalSession>> {
    let root = JournalRoot::discover()?;
    let config = root.load_config()?;
    let collaborators = Collaborators::new(Arc::new(root.store()), confirmer, share);
    let session = Arc::new(JournalSession::new(collaborators, &config));

    let report = session.initialize().await;
    if let Some(warning) = report.warning {
        if strict {
            return Err(JournalError::Persistence(format!(
                "existing entries could not be read, refusing to modify the journal ({})",
                warning
            )));
        }
        eprintln!(
            "Warning: Failed to load your journal entries, showing an empty journal ({})",
            warning
        );
    }
    if report.draft_restored {
        tracing::info!("Recovered an unsaved draft");
    }
    Ok(session)
}

async fn open_default(strict: bool) -> Result<Arc<JournalSession>> {
    open_session(Arc::new(TerminalConfirm), Arc::new(StdoutShare), strict).await
}

fn ensure_no_other_draft(session: &JournalSession, editing: Option<&str>) -> Result<()> {
    let draft = session.draft();
    if draft.is_empty() || (editing.is_some() && draft.editing_id.as_deref() == editing) {
        return Ok(());
    }
    Err(JournalError::Config(
        "An unsaved draft exists. Run 'mindjournal draft save' or \
        'mindjournal draft discard' first"
            .to_string(),
    ))
}

async fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    tokio::io::stdin().read_to_string(&mut buffer).await?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}

async fn save_draft(session: &JournalSession) -> Result<()> {
    let outcome = session.save_entry().await?;
    let created = outcome.created;
    let id = outcome.entry.id.clone();
    outcome.persistence.into_result()?;

    if created {
        println!("Saved entry {}", id);
    } else {
        println!("Updated entry {}", id);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { path } => {
            let config = init(&path)?;
            println!("Initialized mindjournal at {}", path.display());
            println!("Autosave interval: {}s", config.autosave_interval_secs);
            Ok(())
        }
        Commands::List => {
            let session = open_default(false).await?;
            emit(&format_entry_list(&session.entries()));
            Ok(())
        }
        Commands::Show { id } => {
            let session = open_default(false).await?;
            let entry = session.view_entry(&id)?;
            emit(&format_entry_detail(&entry));
            Ok(())
        }
        Commands::Write {
            title,
            content,
            keep_draft,
        } => {
            let session = open_default(true).await?;
            ensure_no_other_draft(&session, None)?;

            let content = match content {
                Some(content) => content,
                None => read_stdin().await?,
            };
            session.update_draft_text(title.unwrap_or_default(), content);

            if keep_draft {
                return match session.checkpoint().await {
                    Checkpoint::Written | Checkpoint::Unchanged => {
                        println!("Draft saved");
                        Ok(())
                    }
                    Checkpoint::EmptyContent => Err(JournalError::Validation(
                        "Journal entry cannot be empty".to_string(),
                    )),
                    Checkpoint::Superseded | Checkpoint::Failed => Err(
                        JournalError::Persistence("the draft could not be saved".to_string()),
                    ),
                };
            }
            save_draft(&session).await
        }
        Commands::Compose { title } => {
            let session = open_default(true).await?;
            let draft = session.draft();
            if !draft.is_empty() {
                eprintln!("Continuing unsaved draft");
            }
            if let Some(title) = title {
                session.update_draft_text(title, draft.content);
            }

            session.start_autosave();
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                let draft = session.draft();
                let content = if draft.content.is_empty() {
                    line
                } else {
                    format!("{}\n{}", draft.content, line)
                };
                session.update_draft_text(draft.title, content);
            }
            session.teardown();

            save_draft(&session).await
        }
        Commands::Edit { id, title, content } => {
            let session = open_default(true).await?;
            let entry = session
                .entry(&id)
                .ok_or_else(|| JournalError::NotFound(id.clone()))?;
            ensure_no_other_draft(&session, Some(&id))?;

            // Resume a recovered edit of this entry instead of starting over
            if session.draft().editing_id.as_deref() != Some(id.as_str()) {
                session.begin_edit(&entry).await?;
            }
            let base = session.draft();
            session.update_draft_text(
                title.unwrap_or(base.title),
                content.unwrap_or(base.content),
            );
            save_draft(&session).await
        }
        Commands::Delete { id, yes } => {
            let session = open_session(confirmer(yes), Arc::new(StdoutShare), true).await?;
            match session.delete_entry(&id).await? {
                DeleteOutcome::Cancelled => println!("Cancelled"),
                DeleteOutcome::Deleted {
                    cleared_draft,
                    persistence,
                    ..
                } => {
                    persistence.into_result()?;
                    println!("Entry deleted successfully");
                    if cleared_draft {
                        println!("Discarded the unsaved edit of this entry");
                    }
                }
            }
            Ok(())
        }
        Commands::Draft { action } => match action.unwrap_or(DraftAction::Show) {
            DraftAction::Show => {
                let session = open_default(false).await?;
                emit(&format_draft(&session.draft()));
                Ok(())
            }
            DraftAction::Save => {
                let session = open_default(true).await?;
                save_draft(&session).await
            }
            DraftAction::Discard { yes } => {
                let session = open_session(confirmer(yes), Arc::new(StdoutShare), false).await?;
                match session.discard_draft().await {
                    DiscardOutcome::Cancelled => println!("Cancelled"),
                    DiscardOutcome::Discarded { persistence } => {
                        persistence.into_result()?;
                        println!("Draft discarded");
                    }
                }
                Ok(())
            }
        },
        Commands::Export { output } => {
            let share: Arc<dyn ShareTarget> = match &output {
                Some(path) => Arc::new(FileShare::new(path.clone())),
                None => Arc::new(StdoutShare),
            };
            let session = open_session(Arc::new(AutoConfirm(false)), share, true).await?;
            match session.export_all().await? {
                ShareOutcome::Shared => {
                    if let Some(path) = output {
                        eprintln!("Exported {} entries to {}", session.entries().len(), path.display());
                    }
                }
                ShareOutcome::Dismissed => eprintln!("Export cancelled"),
            }
            Ok(())
        }
        Commands::Config { key, value, list } => {
            let root = JournalRoot::discover()?;
            let service = ConfigService::new(root);

            if list {
                let config = service.list()?;
                println!("autosave_interval_secs = {}", config.autosave_interval_secs);
                println!("title_format = {}", config.title_format);
                println!("created = {}", config.created.to_rfc3339());
                Ok(())
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                    Ok(())
                } else {
                    let val = service.get(&k)?;
                    println!("{}", val);
                    Ok(())
                }
            } else {
                println!("Usage: mindjournal config [--list | <key> [<value>]]");
                println!("Valid keys: autosave_interval_secs, title_format, created");
                Ok(())
            }
        }
    }
}
