//! Interactive session: one store, one filter, one edit session, many commands.
//!
//! The list is re-rendered after every command, the way a reactive UI redraws
//! on each state change. Row labels come from the API's display handles, so a
//! todo keeps its label for as long as it stays on screen.

use super::commands::ask;
use super::render::{render_list, render_messages};
use colored::Colorize;
use std::io::{BufRead, Write};
use todoz::api::TodozApi;
use todoz::commands::CmdResult;
use todoz::error::Result;
use todoz::model::Filter;
use todoz::store::KeyValueBackend;

const HELP: &str = "\
Commands:
  add <text>          Add a todo                      (a)
  toggle <row>        Mark done / not done            (t)
  delete <row>        Delete a todo                   (rm)
  edit <row>          Start editing a todo            (e)
  text <draft>        Replace the draft being edited
  save                Save the draft
  cancel              Drop the draft
  filter <f>          all, active or completed        (f)
  list                Show the list                   (ls, or an empty line)
  clear               Remove every todo (asks first)
  help                This text                       (?)
  quit                Leave                           (q, exit)

Rows are addressed by their label, or by id as #<id>.
";

enum Step {
    Continue(Option<CmdResult>),
    Quit,
}

pub fn run<B, R, W>(api: &mut TodozApi<B>, input: &mut R, output: &mut W) -> Result<()>
where
    B: KeyValueBackend,
    R: BufRead,
    W: Write,
{
    write!(output, "{}", render_list(&api.list()?))?;

    loop {
        write!(output, "{} ", ">".cyan())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(());
        }

        match step(api, line.trim(), input, output) {
            Ok(Step::Quit) => return Ok(()),
            Ok(Step::Continue(result)) => {
                if let Some(result) = result {
                    write!(output, "{}", render_messages(&result.messages))?;
                    write!(output, "{}", render_list(&api.list()?))?;
                }
            }
            Err(e) => writeln!(output, "{}", format!("Error: {}", e).red())?,
        }
    }
}

fn step<B, R, W>(api: &mut TodozApi<B>, line: &str, input: &mut R, output: &mut W) -> Result<Step>
where
    B: KeyValueBackend,
    R: BufRead,
    W: Write,
{
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let result = match command {
        "" | "list" | "ls" => CmdResult::default(),
        "add" | "a" => api.add(rest)?,
        "toggle" | "t" => api.toggle(rest)?,
        "delete" | "rm" => api.delete(rest)?,
        "edit" | "e" => api.start_edit(rest)?,
        "text" => api.update_edit_text(rest)?,
        "save" => api.save_edit()?,
        "cancel" => api.cancel_edit(),
        "filter" | "f" => match rest.parse::<Filter>() {
            Ok(filter) => api.set_filter(filter),
            Err(msg) => {
                writeln!(output, "{}", msg.yellow())?;
                return Ok(Step::Continue(None));
            }
        },
        "clear" => {
            let mut confirm = |prompt: &str| ask(prompt, &mut *input, &mut *output);
            api.clear_all(&mut confirm)?
        }
        "help" | "?" => {
            write!(output, "{}", HELP)?;
            return Ok(Step::Continue(None));
        }
        "quit" | "q" | "exit" => return Ok(Step::Quit),
        other => {
            writeln!(
                output,
                "{}",
                format!("Unknown command: {} (type `help`)", other).yellow()
            )?;
            return Ok(Step::Continue(None));
        }
    };
    Ok(Step::Continue(Some(result)))
}
