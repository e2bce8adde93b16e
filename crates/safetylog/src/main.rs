//! `safelog` - CLI for safetylog
//!
//! Every command loads the journal, performs one action, persists, and
//! prints the result. Failures are reported with the notice for their kind.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::Parser;
use tracing::debug;

use safetylog::cli::{
    AddCommand, Cli, ClearCommand, Command, ConfigCommand, DeleteCommand, ExportCommand,
    ImportCommand, ListCommand, OutputFormat, ViewCommand,
};
use safetylog::detail::{detail_file_name, detail_json, detail_lines, render_detail_html};
use safetylog::{
    init_logging, Config, Error, Filter, Journal, ObservationDraft, Persistence, Rating, Result,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).map_err(|e| anyhow::anyhow!(e.notice()))?;

    if let Err(e) = run(cli.command, &config) {
        debug!("Command failed: {:?}", e);
        anyhow::bail!(e.notice());
    }
    Ok(())
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Add(cmd) => handle_add(config, cmd),
        Command::List(cmd) => handle_list(config, &cmd),
        Command::View(cmd) => handle_view(config, &cmd),
        Command::Delete(cmd) => handle_delete(config, &cmd),
        Command::Clear(cmd) => handle_clear(config, &cmd),
        Command::Export(cmd) => handle_export(config, cmd),
        Command::Import(cmd) => handle_import(config, &cmd),
        Command::Config(cmd) => handle_config(config, cmd),
    }
}

fn open_journal(config: &Config) -> Result<Journal> {
    Ok(Journal::open(config.open_store()?))
}

fn handle_add(config: &Config, cmd: AddCommand) -> Result<()> {
    let mut journal = open_journal(config)?;

    if let Some(photo) = &cmd.photo {
        journal.select_photo(&config.photo_pipeline(), Some(photo.as_path()))?;
    }

    let draft = ObservationDraft {
        title: cmd.title,
        description: cmd.description,
        rating: Rating::from(cmd.rating),
    };
    let (observation, persistence) = journal.submit(&draft)?;

    println!(
        "Recorded {} observation {}{}",
        observation.rating,
        observation.id,
        if observation.has_photo() {
            " (with photo)"
        } else {
            ""
        }
    );
    finish(&journal, &persistence);
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> Result<()> {
    let journal = open_journal(config)?;
    let view = journal.view(Filter::from(cmd.filter));

    let mut out: Box<dyn Write> = match &cmd.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    match cmd.format {
        OutputFormat::Plain => view.render_plain(&mut out)?,
        OutputFormat::Json => view.render_json(&mut out)?,
        OutputFormat::Html => view.render_html(&mut out)?,
    }
    out.flush()?;

    if let Some(path) = &cmd.output {
        println!("Wrote {} observations to {}", view.observations.len(), path.display());
    }
    Ok(())
}

fn handle_view(config: &Config, cmd: &ViewCommand) -> Result<()> {
    let journal = open_journal(config)?;
    let observation = journal
        .get(&cmd.id)
        .ok_or_else(|| Error::NotFound(cmd.id.clone()))?;

    println!("{}", detail_lines(observation).join("\n"));
    if observation.has_photo() {
        println!("\nPhoto: attached");
    }

    if let Some(path) = &cmd.html {
        std::fs::write(path, render_detail_html(observation)?)?;
        println!("Printable page written to {}", path.display());
    }

    if let Some(dir) = &cmd.json {
        let path = dir.join(detail_file_name(observation));
        std::fs::write(&path, detail_json(observation)?)?;
        println!("Saved {}", path.display());
    }
    Ok(())
}

fn handle_delete(config: &Config, cmd: &DeleteCommand) -> Result<()> {
    let mut journal = open_journal(config)?;
    if journal.get(&cmd.id).is_none() {
        return Err(Error::NotFound(cmd.id.clone()));
    }

    if !cmd.yes && !confirm("Delete this observation? This cannot be undone.")? {
        println!("Cancelled.");
        return Ok(());
    }

    let persistence = journal.delete(&cmd.id)?;
    println!("Deleted observation {}", cmd.id);
    finish(&journal, &persistence);
    Ok(())
}

fn handle_clear(config: &Config, cmd: &ClearCommand) -> Result<()> {
    let mut journal = open_journal(config)?;

    if !cmd.yes
        && !confirm("This will permanently delete all observations on this device. Continue?")?
    {
        println!("Cancelled.");
        return Ok(());
    }

    let (removed, persistence) = journal.clear();
    println!("Deleted {removed} observations");
    finish(&journal, &persistence);
    Ok(())
}

fn handle_export(config: &Config, cmd: ExportCommand) -> Result<()> {
    let journal = open_journal(config)?;
    let json = journal.export_json()?;

    let output = cmd
        .output
        .unwrap_or_else(|| config.export.file_name.clone().into());
    if output == Path::new("-") {
        print!("{json}");
        return Ok(());
    }

    std::fs::write(&output, json)?;
    println!(
        "Exported {} observations to {}",
        journal.observations().len(),
        output.display()
    );
    Ok(())
}

fn handle_import(config: &Config, cmd: &ImportCommand) -> Result<()> {
    let text = std::fs::read_to_string(&cmd.file)
        .map_err(|e| Error::import(format!("failed to read {}: {e}", cmd.file.display())))?;

    let mut journal = open_journal(config)?;
    let replaced = journal.observations().len();
    let (imported, persistence) = journal.import_json(&text)?;

    println!("Imported {imported} observations (replaced {replaced})");
    finish(&journal, &persistence);
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!("  Slot key:       {}", config.storage.slot_key);
                println!("  Quota (bytes):  {}", config.storage.quota_bytes);
                println!();
                println!("[Photos]");
                println!("  Max width:      {}", config.photos.max_width);
                println!("  Quality:        {}", config.photos.quality);
                println!();
                println!("[Export]");
                println!("  File name:      {}", config.export.file_name);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

/// Report a lagging save and show the refreshed counts.
fn finish(journal: &Journal, persistence: &Persistence) {
    if let Some(notice) = persistence.notice() {
        eprintln!("warning: {notice}");
    }
    println!("{}", journal.view(Filter::All).stats.pills().join("  "));
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
