use super::render::{render_config, render_list, render_locations, render_messages};
use super::setup::{Cli, Commands};
use super::shell;
use clap::Parser;
use console::Term;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use todoz::api::{ConfigAction, TodozApi};
use todoz::commands::{CmdResult, Confirm};
use todoz::config::{resolve_data_dir, TodozConfig};
use todoz::error::Result;
use todoz::model::Filter;
use todoz::store::fs::FileBackend;

struct AppContext {
    api: TodozApi<FileBackend>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = init_context(cli.data_dir)?;

    match cli.command {
        Some(Commands::Add { text }) => handle_add(&mut ctx, text),
        Some(Commands::List { filter }) => handle_list(&mut ctx, filter.into()),
        Some(Commands::Toggle { reference }) => handle_toggle(&mut ctx, &reference),
        Some(Commands::Delete { reference }) => handle_delete(&mut ctx, &reference),
        Some(Commands::Edit { reference, text }) => handle_edit(&mut ctx, &reference, text),
        Some(Commands::Clear { yes }) => handle_clear(&mut ctx, yes),
        Some(Commands::Shell) => handle_shell(&mut ctx),
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
        Some(Commands::Path) => handle_path(&ctx),
        None => handle_list(&mut ctx, Filter::All),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn init_context(data_dir: Option<PathBuf>) -> Result<AppContext> {
    let data_dir = resolve_data_dir(data_dir)?;
    let config = match TodozConfig::load(&data_dir) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("ignoring unreadable config in {}: {}", data_dir.display(), e);
            TodozConfig::default()
        }
    };
    log::debug!("data dir: {}", data_dir.display());

    let mut api = TodozApi::new(FileBackend::new(data_dir.clone()))
        .with_config(config.clone(), Some(data_dir));

    let loaded = load_with_indicator(&mut api, &config)?;
    print!("{}", render_messages(&loaded.messages));

    Ok(AppContext { api })
}

/// Runs the initial load behind a loading indicator. The configured delay
/// simulates storage latency; the indicator is cleared once load completes.
fn load_with_indicator(api: &mut TodozApi<FileBackend>, config: &TodozConfig) -> Result<CmdResult> {
    let term = Term::stderr();
    let show = term.is_term() && !config.load_delay().is_zero();
    if show {
        term.write_str("Loading…")?;
    }
    std::thread::sleep(config.load_delay());
    let result = api.load();
    if show {
        term.clear_line()?;
    }
    result
}

/// Asks on the terminal (or reads an answer piped to stdin).
pub(super) struct TerminalConfirm {
    pub assume_yes: bool,
}

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        ask(prompt, &mut input, &mut std::io::stderr())
    }
}

/// Writes `prompt [y/N] ` and reads one line. Anything but y/yes declines.
pub(super) fn ask<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> bool {
    if write!(output, "{} [y/N] ", prompt).and_then(|_| output.flush()).is_err() {
        return false;
    }
    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
    }
}

fn handle_add(ctx: &mut AppContext, text: Vec<String>) -> Result<()> {
    let result = ctx.api.add(&text.join(" "))?;
    print!("{}", render_messages(&result.messages));
    Ok(())
}

fn handle_list(ctx: &mut AppContext, filter: Filter) -> Result<()> {
    ctx.api.set_filter(filter);
    let result = ctx.api.list()?;
    print!("{}", render_list(&result));
    Ok(())
}

fn handle_toggle(ctx: &mut AppContext, reference: &str) -> Result<()> {
    let result = ctx.api.toggle(reference)?;
    print!("{}", render_messages(&result.messages));
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, reference: &str) -> Result<()> {
    let result = ctx.api.delete(reference)?;
    print!("{}", render_messages(&result.messages));
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, reference: &str, text: Vec<String>) -> Result<()> {
    let result = ctx.api.edit(reference, &text.join(" "))?;
    print!("{}", render_messages(&result.messages));
    Ok(())
}

fn handle_clear(ctx: &mut AppContext, yes: bool) -> Result<()> {
    let mut confirm = TerminalConfirm { assume_yes: yes };
    let result = ctx.api.clear_all(&mut confirm)?;
    print!("{}", render_messages(&result.messages));
    Ok(())
}

fn handle_shell(ctx: &mut AppContext) -> Result<()> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    shell::run(&mut ctx.api, &mut input, &mut output)
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::Get(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = action == ConfigAction::ShowAll;

    let result = ctx.api.config(action)?;
    if show_all {
        print!("{}", render_config(&result));
    }
    print!("{}", render_messages(&result.messages));
    Ok(())
}

fn handle_path(ctx: &AppContext) -> Result<()> {
    print!("{}", render_locations(&ctx.api.locations()));
    Ok(())
}
