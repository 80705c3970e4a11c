//! Quillnote - styled note tooling and key binding management.
//!
//! # Usage
//!
//! ```bash
//! quillnote plain note.txt
//! quillnote inspect --json note.txt
//! quillnote normalize --write note.txt
//! quillnote keys set toggle-bold "<Alt>b"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;

use quillnote::codec;
use quillnote::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use quillnote::editor::NoteEditor;
use quillnote::keybinding::{
    Binding, FileStore, Shortcut, ShortcutMatcher, ShortcutType, parse_accelerator,
};
use quillnote::style::{PresetName, Tag};

/// Styled note tooling
#[derive(Parser, Debug)]
#[command(name = "quillnote", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Key binding store to use
    #[arg(long, value_name = "PATH", global = true)]
    keybindings: Option<PathBuf>,

    /// Mirror the style at the caret into the typing style
    #[arg(long, global = true)]
    inherit_styles: bool,

    /// Save current command-line flags as defaults
    #[arg(long, global = true)]
    save: bool,

    /// Clear saved defaults
    #[arg(long, global = true)]
    clear: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a note's text without markup
    Plain {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Summarize a note's styling
    Inspect {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rewrite a note's markup in canonical form
    Normalize {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Write back to the file instead of printing
        #[arg(long)]
        write: bool,
    },
    /// Manage key bindings
    Keys {
        #[command(subcommand)]
        action: KeysCommand,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// List every shortcut with its binding
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show the binding of one shortcut
    Get {
        #[arg(value_name = "TYPE")]
        kind: String,
    },
    /// Bind a shortcut, e.g. `keys set toggle-bold "<Alt>b"`
    Set {
        #[arg(value_name = "TYPE")]
        kind: String,
        #[arg(value_name = "ACCEL")]
        accel: String,
        /// Bind even if another shortcut already uses this chord
        #[arg(long)]
        force: bool,
    },
    /// Restore a shortcut's default binding
    Reset {
        #[arg(value_name = "TYPE")]
        kind: String,
    },
    /// Show which shortcut a chord triggers
    Check {
        #[arg(value_name = "ACCEL")]
        accel: String,
    },
}

#[derive(Serialize)]
struct NoteReport {
    file: PathBuf,
    chars: usize,
    tag_ranges: BTreeMap<&'static str, usize>,
    preset_at_start: PresetName,
    well_nested: bool,
    canonical: bool,
}

#[derive(Serialize)]
struct ListedShortcut {
    #[serde(flatten)]
    shortcut: &'static Shortcut,
    binding: String,
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let level = if effective.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let Some(command) = cli.command else {
        if cli.save || cli.clear {
            return Ok(());
        }
        bail!("no command given (see --help)");
    };

    match command {
        Command::Plain { file } => {
            let editor = open_note(&file, &effective)?;
            print!("{}", editor.text());
        }
        Command::Inspect { file, json } => {
            let report = inspect(&file, &effective)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Command::Normalize { file, write } => {
            let editor = open_note(&file, &effective)?;
            let markup = editor.markup();
            if write {
                fs::write(&file, &markup)
                    .with_context(|| format!("Failed to write note {}", file.display()))?;
            } else {
                print!("{markup}");
            }
        }
        Command::Keys { action } => run_keys(action, &effective.keybindings_path())?,
    }
    Ok(())
}

fn read_note(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("Failed to read note {}", file.display()))
}

fn open_note(file: &Path, flags: &ConfigFlags) -> Result<NoteEditor> {
    let markup = read_note(file)?;
    let mut editor = NoteEditor::new().with_inherit_styles(flags.inherit_styles);
    editor.load(file.display().to_string(), &markup);
    Ok(editor)
}

fn inspect(file: &Path, flags: &ConfigFlags) -> Result<NoteReport> {
    let markup = read_note(file)?;
    let editor = open_note(file, flags)?;
    let buffer = editor.buffer();
    let tag_ranges = Tag::ALL
        .into_iter()
        .map(|tag| (tag.name(), buffer.tag_ranges(tag).len()))
        .filter(|(_, count)| *count > 0)
        .collect();
    Ok(NoteReport {
        file: file.to_path_buf(),
        chars: editor.text().chars().count(),
        tag_ranges,
        preset_at_start: editor.report().preset,
        well_nested: codec::is_well_nested(&markup),
        canonical: editor.markup() == markup,
    })
}

fn print_report(report: &NoteReport) {
    println!("file:        {}", report.file.display());
    println!("characters:  {}", report.chars);
    println!("start style: {}", report.preset_at_start);
    println!("well nested: {}", report.well_nested);
    println!("canonical:   {}", report.canonical);
    if report.tag_ranges.is_empty() {
        println!("tags:        none");
    } else {
        println!("tags:");
        for (name, count) in &report.tag_ranges {
            println!("  {name:<10} {count} range(s)");
        }
    }
}

fn run_keys(action: KeysCommand, store_path: &Path) -> Result<()> {
    let store = FileStore::open(store_path)?;
    let mut matcher = ShortcutMatcher::new(store);

    match action {
        KeysCommand::List { json } => {
            if json {
                let listed: Vec<_> = matcher
                    .all()
                    .map(|(shortcut, binding)| ListedShortcut {
                        shortcut,
                        binding: binding.to_string(),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&listed)?);
            } else {
                for (shortcut, binding) in matcher.all() {
                    println!(
                        "{:<18} {:<12} {:<20} {}",
                        shortcut.kind,
                        shortcut.group.label(),
                        binding.label(),
                        shortcut.label
                    );
                }
            }
        }
        KeysCommand::Get { kind } => {
            let kind: ShortcutType = kind.parse()?;
            println!("{}", matcher.get(kind));
        }
        KeysCommand::Set { kind, accel, force } => {
            let kind: ShortcutType = kind.parse()?;
            let binding = parse_binding(&accel)?;
            if let Some(other) = matcher.find_conflict(binding, kind) {
                if !force {
                    bail!("{} is already bound to {other} (use --force to bind anyway)", binding.label());
                }
                tracing::warn!(%kind, %other, binding = %binding, "binding a chord that is already in use");
            }
            matcher.set(kind, binding)?;
            println!("{kind} = {}", matcher.get(kind));
        }
        KeysCommand::Reset { kind } => {
            let kind: ShortcutType = kind.parse()?;
            matcher.reset(kind)?;
            println!("{kind} = {}", matcher.get(kind));
        }
        KeysCommand::Check { accel } => {
            let binding = parse_binding(&accel)?;
            match matcher.check(binding) {
                Some(kind) => println!("{kind}"),
                None => println!("no shortcut"),
            }
        }
    }
    Ok(())
}

fn parse_binding(accel: &str) -> Result<Binding> {
    parse_accelerator(accel).with_context(|| format!("Invalid accelerator {accel:?}"))
}
