//! SiteWarden CLI
//!
//! Admin tool for the blocked-URL list: the command-line counterpart of the
//! extension's list-editing UI. It normalizes whatever the user types down
//! to a bare hostname, keeps ids opaque, and can export the compiled
//! declarativeNetRequest payload for inspection.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use sw_core::{
    compile_update, matches_url, normalize_host, url_filter, CompileError, UrlEntry, MAX_RULES,
};
use sw_sync::{ChangeListener, DynamicRuleTable, EntryStore, JsonFileStore, RuleSink};

#[derive(Parser)]
#[command(name = "sw-cli")]
#[command(about = "SiteWarden blocked-URL list manager")]
struct Cli {
    /// Entry list file
    #[arg(short, long, default_value = "blocked_urls.json", global = true)]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List blocked entries
    List,

    /// Block a domain (accepts full URLs, strips scheme/path/www.)
    Add {
        /// URL or hostname to block
        url: String,
    },

    /// Unblock an entry by id
    Remove {
        /// Entry id as shown by `list`
        id: String,
    },

    /// Change the domain of an existing entry
    Edit {
        /// Entry id as shown by `list`
        id: String,
        /// New URL or hostname
        url: String,
    },

    /// Report whether a navigation to the given URL would be blocked
    Check {
        /// Full URL to test
        url: String,
    },

    /// Print the compiled updateDynamicRules payload as JSON
    Export,

    /// Run the change listener against a local rule table, printing the
    /// active rule set as the entry list changes
    Watch,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List => cmd_list(&cli.store).await,
        Commands::Add { url } => cmd_add(&cli.store, &url).await,
        Commands::Remove { id } => cmd_remove(&cli.store, &id).await,
        Commands::Edit { id, url } => cmd_edit(&cli.store, &id, &url).await,
        Commands::Check { url } => cmd_check(&cli.store, &url).await,
        Commands::Export => cmd_export(&cli.store).await,
        Commands::Watch => cmd_watch(&cli.store).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn open(path: &PathBuf) -> Result<JsonFileStore, String> {
    JsonFileStore::open(path.clone())
        .await
        .map_err(|e| e.to_string())
}

async fn cmd_list(path: &PathBuf) -> Result<(), String> {
    let store = open(path).await?;
    let entries = store.read().await.map_err(|e| e.to_string())?;
    if entries.is_empty() {
        println!("No blocked URLs.");
        return Ok(());
    }
    for entry in entries {
        println!("{}  {}", entry.id, entry.url);
    }
    Ok(())
}

async fn cmd_add(path: &PathBuf, input: &str) -> Result<(), String> {
    let host = normalize_host(input).map_err(|e| e.to_string())?;
    let store = open(path).await?;
    let mut entries = store.read().await.map_err(|e| e.to_string())?;

    if entries.iter().any(|entry| entry.url == host) {
        println!("{host} is already blocked");
        return Ok(());
    }

    entries.push(UrlEntry::new(Uuid::new_v4().to_string(), host.clone()));
    store.write(entries).await.map_err(|e| e.to_string())?;
    println!("Blocked {host}");
    Ok(())
}

async fn cmd_remove(path: &PathBuf, id: &str) -> Result<(), String> {
    let store = open(path).await?;
    let mut entries = store.read().await.map_err(|e| e.to_string())?;
    let before = entries.len();
    entries.retain(|entry| entry.id != id);
    if entries.len() == before {
        return Err(format!("no entry with id {id}"));
    }
    store.write(entries).await.map_err(|e| e.to_string())?;
    println!("Removed {id}");
    Ok(())
}

async fn cmd_edit(path: &PathBuf, id: &str, input: &str) -> Result<(), String> {
    let host = normalize_host(input).map_err(|e| e.to_string())?;
    let store = open(path).await?;
    let mut entries = store.read().await.map_err(|e| e.to_string())?;

    let entry = entries
        .iter_mut()
        .find(|entry| entry.id == id)
        .ok_or_else(|| format!("no entry with id {id}"))?;
    entry.url = host.clone();

    store.write(entries).await.map_err(|e| e.to_string())?;
    println!("Entry {id} now blocks {host}");
    Ok(())
}

async fn cmd_check(path: &PathBuf, url: &str) -> Result<(), String> {
    let store = open(path).await?;
    let entries = store.read().await.map_err(|e| e.to_string())?;

    match entries
        .iter()
        .find(|entry| matches_url(&url_filter(&entry.url), url))
    {
        Some(entry) => println!("BLOCKED by {} ({})", entry.url, entry.id),
        None => println!("not blocked"),
    }
    Ok(())
}

async fn cmd_export(path: &PathBuf) -> Result<(), String> {
    let store = open(path).await?;
    let entries = store.read().await.map_err(|e| e.to_string())?;
    let domains = sw_core::domains(&entries);

    let update = match compile_update(&domains) {
        Ok(update) => update,
        Err(err @ CompileError::CapacityExceeded { .. }) => {
            eprintln!("Warning: {err}; exporting the first {MAX_RULES} entries");
            compile_update(&domains[..MAX_RULES]).map_err(|e| e.to_string())?
        }
    };

    let json = serde_json::to_string_pretty(&update).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

/// Fold edits made by other invocations into this store's change stream.
/// The file is the shared medium between processes, and a write-through of
/// the freshly read list fires the store's own notification.
async fn fold_external_edits(
    store: &JsonFileStore,
    last_seen: &mut Option<Vec<UrlEntry>>,
) -> Result<(), String> {
    let entries = store.read().await.map_err(|e| e.to_string())?;
    if last_seen.as_ref() != Some(&entries) {
        store.write(entries.clone()).await.map_err(|e| e.to_string())?;
        *last_seen = Some(entries);
    }
    Ok(())
}

async fn cmd_watch(path: &PathBuf) -> Result<(), String> {
    let store = Arc::new(open(path).await?);
    let table = Arc::new(DynamicRuleTable::new());
    ChangeListener::new(store.clone(), table.clone()).spawn();

    println!(
        "Watching {} (edits from other sw-cli invocations are picked up; ctrl-c to stop)",
        path.display()
    );

    let mut last_seen = None;
    let mut last_printed = None;
    loop {
        fold_external_edits(store.as_ref(), &mut last_seen).await?;

        let active = table.active_rules().await;
        if last_printed.as_ref() != Some(&active) {
            println!("{} active rule(s)", active.len());
            for rule in &active {
                println!("  {}  {}", rule.id, rule.condition.url_filter);
            }
            last_printed = Some(active);
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
}
