//! QuerySwitch command line tool
//!
//! Switches search queries between engines, manages the engine list and
//! runs the local HTTP service.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use queryswitch::{
    commands::{
        command_name, effective_shortcuts, parse_command, ContextMenu, KeyPress, ShortcutDraft,
        ShortcutInput,
    },
    config::{self, Settings},
    locales::{resolve_language, Messages},
    storage::{CustomEngineForm, Store},
    web::{create_router, AppState},
    Switcher,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about = "Re-run a search query on a different search engine")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the state file
    #[arg(long)]
    state: Option<PathBuf>,

    /// Message language (en, zh-CN)
    #[arg(short, long)]
    lang: Option<String>,

    /// Print machine-readable JSON
    #[arg(long)]
    json: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the URL of a search page's query on another engine
    Switch {
        /// Current search page URL
        url: String,
        /// Target engine id
        engine: String,
    },
    /// Show which engine a page belongs to and its query
    Detect { url: String },
    /// List the engines a page can be switched to
    Targets { url: String },
    /// List all engines
    Engines,
    /// Enable an engine
    Enable { id: String },
    /// Disable an engine
    Disable { id: String },
    /// Add a custom engine
    AddEngine {
        /// Display name
        #[arg(long)]
        name: String,
        /// Search URL containing {query}
        #[arg(long)]
        url: String,
        /// Detection pattern (regular expression)
        #[arg(long)]
        pattern: String,
        /// Query parameter name
        #[arg(long)]
        param: String,
    },
    /// Delete a custom engine
    RemoveEngine { id: String },
    /// Print the context menu model
    Menu,
    /// List, set or clear keyboard shortcuts
    Shortcut {
        /// Command name, e.g. switch-to-bing
        command: Option<String>,
        /// Shortcut, e.g. Ctrl+Shift+K
        keys: Option<String>,
        /// Remove the command's shortcut
        #[arg(long)]
        clear: bool,
        /// Restore default shortcuts
        #[arg(long)]
        reset: bool,
    },
    /// Show or set the preferred language
    Language { code: Option<String> },
    /// Restore all defaults
    Reset,
    /// Run the local HTTP service
    Serve {
        /// Server port
        #[arg(short, long)]
        port: Option<u16>,
        /// Bind address
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = config::load(cli.config.as_deref())?;
    if let Some(ref path) = cli.state {
        settings.storage.state_path = Some(path.clone());
    }

    init_logging(&cli, &settings);
    debug!("QuerySwitch v{}", queryswitch::VERSION);

    let state_path = settings.state_path();
    let mut store = Store::open(&state_path)
        .with_context(|| format!("failed to open state file {}", state_path.display()))?;

    let language = cli
        .lang
        .clone()
        .or_else(|| store.settings().language.clone().filter(|l| !l.is_empty()))
        .or_else(|| settings.general.default_language.clone())
        .unwrap_or_default();
    let messages = Messages::new(&language)?;

    match cli.command {
        Command::Switch { ref url, ref engine } => {
            let registry = store.registry();
            let outcome = Switcher::new(&registry)
                .with_open_in_background(store.settings().open_in_background)
                .switch(Some(url), engine)
                .map_err(|e| localized(e, &messages))?;

            if cli.json {
                print_json(&outcome)?;
            } else {
                println!("{}", outcome.url);
            }
        }
        Command::Detect { ref url } => {
            let registry = store.registry();
            let info = Switcher::new(&registry).page_info(url);

            if cli.json {
                print_json(&info)?;
            } else if let (Some(engine), Some(name)) = (&info.engine, &info.engine_name) {
                println!("{} ({})", name, engine);
                println!("{}", info.query.as_deref().unwrap_or("-"));
            } else {
                let n = messages.notification(&queryswitch::Error::NoEngineMatch);
                bail!("{}: {}", n.title, n.message);
            }
        }
        Command::Targets { ref url } => {
            let registry = store.registry();
            let targets = Switcher::new(&registry).switch_targets(url);

            if cli.json {
                print_json(&targets)?;
            } else if !targets.page.is_search_page {
                let n = messages.notification(&queryswitch::Error::NoEngineMatch);
                bail!("{}: {}", n.title, n.message);
            } else if targets.engines.is_empty() {
                println!("{}", messages.get("no-other-engines"));
            } else {
                for engine in &targets.engines {
                    println!("{:<24} {}", engine.id, engine.name);
                }
            }
        }
        Command::Engines => {
            let registry = store.registry();
            let summaries: Vec<_> = registry.iter().map(|e| e.summary()).collect();

            if cli.json {
                print_json(&summaries)?;
            } else {
                for e in &summaries {
                    println!(
                        "[{}] {:<24} {:<12} {}",
                        if e.enabled { "x" } else { " " },
                        e.id,
                        e.name,
                        e.url_template
                    );
                }
            }
        }
        Command::Enable { ref id } => {
            store.set_enabled(id, true).map_err(|e| localized(e, &messages))?;
        }
        Command::Disable { ref id } => {
            store.set_enabled(id, false).map_err(|e| localized(e, &messages))?;
        }
        Command::AddEngine {
            name,
            url,
            pattern,
            param,
        } => {
            let form = CustomEngineForm {
                name,
                url,
                pattern,
                param,
            };
            let id = store
                .add_custom_engine(form)
                .map_err(|e| localized(e, &messages))?;
            println!("{}", id);
        }
        Command::RemoveEngine { ref id } => {
            store
                .remove_custom_engine(id)
                .map_err(|e| localized(e, &messages))?;
        }
        Command::Menu => {
            let menu = if store.settings().show_context_menu {
                ContextMenu::build(&store.registry(), &messages)
            } else {
                ContextMenu::empty()
            };

            if cli.json {
                print_json(&menu)?;
            } else {
                for item in &menu.items {
                    let indent = if item.parent_id.is_some() { "  " } else { "" };
                    println!("{}{}  ({})", indent, item.title, item.id);
                }
            }
        }
        Command::Shortcut {
            ref command,
            ref keys,
            clear,
            reset,
        } => {
            run_shortcut(
                &mut store,
                &messages,
                command.as_deref(),
                keys.as_deref(),
                clear,
                reset,
                cli.json,
            )?;
        }
        Command::Language { ref code } => match code {
            Some(code) => {
                let resolved = resolve_language(code);
                store.set_language(resolved)?;
                println!("{}", resolved);
            }
            None => println!("{}", messages.language()),
        },
        Command::Reset => {
            store.reset()?;
        }
        Command::Serve { port, ref bind } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            if let Some(bind) = bind {
                settings.server.bind_address = bind.clone();
            }
            serve(settings, store).await?;
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli, settings: &Settings) {
    let level = if cli.debug || settings.general.debug {
        "debug"
    } else if matches!(cli.command, Command::Serve { .. }) {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Turn a library error into a localized message
fn localized(error: queryswitch::Error, messages: &Messages) -> anyhow::Error {
    debug!("Operation failed: {}", error);
    let n = messages.notification(&error);
    anyhow::anyhow!("{}: {}", n.title, n.message)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_shortcut(
    store: &mut Store,
    messages: &Messages,
    command: Option<&str>,
    keys: Option<&str>,
    clear: bool,
    reset: bool,
    json: bool,
) -> Result<()> {
    if reset {
        for command in store.state().shortcuts.keys().cloned().collect::<Vec<_>>() {
            store.set_shortcut(&command, None)?;
        }
        println!("{}", messages.get("shortcuts-reset"));
        return Ok(());
    }

    let registry = store.registry();
    let commands: Vec<String> = registry.iter().map(|e| command_name(&e.id)).collect();

    let command = match command {
        Some(command) => command,
        None => {
            let effective = effective_shortcuts(&store.state().shortcuts);
            if json {
                print_json(&effective)?;
            } else {
                for command in &commands {
                    let shortcut = effective.get(command).map(String::as_str).unwrap_or("-");
                    println!("{:<32} {}", command, shortcut);
                }
            }
            return Ok(());
        }
    };

    match parse_command(command) {
        Some(id) if registry.contains(id) => {}
        _ => {
            let error = queryswitch::Error::EngineNotFound(command.to_string());
            return Err(localized(error, messages));
        }
    }

    let mut draft = ShortcutDraft::new(
        commands.iter().map(String::as_str),
        &store.state().shortcuts,
    );
    if clear {
        draft.clear(command);
    } else {
        let keys = keys.context("a shortcut such as Ctrl+Shift+K is required")?;
        let press =
            KeyPress::parse(keys).with_context(|| format!("invalid shortcut: {}", keys))?;
        match draft.apply(command, &press) {
            ShortcutInput::Set(shortcut) => debug!("Recorded {} for {}", shortcut, command),
            ShortcutInput::Clear => debug!("Cleared shortcut for {}", command),
            ShortcutInput::Cancel | ShortcutInput::Ignore => bail!("invalid shortcut: {}", keys),
        }
    }

    let overrides = draft.overrides();
    store.set_shortcut(command, overrides.get(command).map(String::as_str))?;
    println!("{}", messages.get("shortcuts-saved"));
    Ok(())
}

async fn serve(settings: Settings, store: Store) -> Result<()> {
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    info!("State file: {}", store.path().display());
    let state = AppState::new(settings, store);
    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
