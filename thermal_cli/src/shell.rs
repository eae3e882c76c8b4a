//! Interactive composite wall editor.
//!
//! Mirrors the wall page: layers can be added, edited and removed, and
//! every change renumbers the remaining layers.

use std::io::{self, BufRead, Write};
use std::path::Path;

use thermal_core::calculators::{CompositeWall, LayerForm, WallForm};
use thermal_core::client::CalcClient;
use thermal_core::session::Session;
use thermal_core::transport::Transport;

use crate::output::{format_fields, print_error};

const HELP: &str = "\
Commands:
  add                 append a blank layer
  remove N            remove layer N
  set N T K A         set layer N to thickness T, conductivity K, area A
  temps IN OUT        set inner and outer temperatures
  list                show the form
  submit              calculate
  export              save the PDF report
  help                show this help
  quit                leave the shell";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Add,
    Remove(usize),
    Set(usize, LayerForm),
    Temps(String, String),
    List,
    Submit,
    Export,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let position = |word: &str| {
        word.parse::<usize>()
            .map_err(|_| format!("'{}' is not a layer number", word))
    };

    match words.as_slice() {
        ["add"] => Ok(ShellCommand::Add),
        ["remove", n] => Ok(ShellCommand::Remove(position(*n)?)),
        ["set", n, t, k, a] => Ok(ShellCommand::Set(position(*n)?, LayerForm::new(*t, *k, *a))),
        ["temps", inner, outer] => Ok(ShellCommand::Temps(inner.to_string(), outer.to_string())),
        ["list"] => Ok(ShellCommand::List),
        ["submit"] => Ok(ShellCommand::Submit),
        ["export"] => Ok(ShellCommand::Export),
        ["help"] | ["?"] => Ok(ShellCommand::Help),
        ["quit"] | ["exit"] => Ok(ShellCommand::Quit),
        [] => Err("empty command".to_string()),
        _ => Err(format!("unknown command '{}', try 'help'", line.trim())),
    }
}

/// The form as the page would show it.
pub fn format_form(form: &WallForm) -> String {
    let mut out = format!("  T_inner = {}\n  T_outer = {}\n", blank(&form.t_inner), blank(&form.t_outer));
    if form.layers.is_empty() {
        out.push_str("  (no layers)\n");
    }
    for (position, layer) in form.layers.iter() {
        out.push_str(&format!(
            "  Layer {}: thickness = {}, k = {}, area = {}\n",
            position,
            blank(&layer.thickness),
            blank(&layer.k_value),
            blank(&layer.area)
        ));
    }
    out
}

fn blank(value: &str) -> &str {
    if value.trim().is_empty() {
        "_"
    } else {
        value
    }
}

/// Apply an editing command to the form. Returns the message to show.
pub fn edit(form: &mut WallForm, command: &ShellCommand) -> Result<String, String> {
    match command {
        ShellCommand::Add => Ok(format!("added layer {}", form.layers.add())),
        ShellCommand::Remove(n) => {
            form.layers.remove(*n).map_err(|e| e.to_string())?;
            Ok(format!("removed layer {}, {} left", n, form.layers.len()))
        }
        ShellCommand::Set(n, layer) => {
            form.layers.set(*n, layer.clone()).map_err(|e| e.to_string())?;
            Ok(format!("updated layer {}", n))
        }
        ShellCommand::Temps(inner, outer) => {
            form.t_inner = inner.clone();
            form.t_outer = outer.clone();
            Ok("temperatures updated".to_string())
        }
        _ => Ok(String::new()),
    }
}

pub async fn run<T: Transport>(client: &CalcClient<T>, out_dir: &Path) -> io::Result<()> {
    let mut form = WallForm::default();
    let mut session = Session::<CompositeWall>::new();
    let stdin = io::stdin();

    println!("ThermalSim composite wall shell. Type 'help' for commands.");
    loop {
        print!("wall> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{}", message);
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => println!("{}", HELP),
            ShellCommand::List => print!("{}", format_form(&form)),
            ShellCommand::Submit => match client.calculate(&mut session, &form).await {
                Ok(()) => {
                    print!("{}", format_fields(&session.result_fields()));
                    if let Some(status) = session.status() {
                        println!("{}", status);
                    }
                }
                Err(e) => print_error(&e, false),
            },
            ShellCommand::Export => match client.export(&mut session, out_dir).await {
                Ok(path) => println!("saved {}", path.display()),
                Err(e) => print_error(&e, false),
            },
            editing => match edit(&mut form, &editing) {
                Ok(message) => println!("{}", message),
                Err(message) => eprintln!("{}", message),
            },
        }
    }
    Ok(())
}
