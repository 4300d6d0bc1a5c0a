//! `ds-workbench` command line
//!
//! Assembles metadata forms, checks drafts against the required-field gate
//! and replays recorded store events.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use ds_core::{init_tracing, LogFormat, WorkbenchConfig};
use ds_metadata::{
    Contents, MetadataDefinition, MetadataDraft, MetadataFormAssembler, Paged, TargetKind,
};
use ds_store::{replay, StoreEvent, StoreState};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

fn definitions_arg() -> Arg {
    Arg::new("definitions")
        .long("definitions")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON file with a definition list or a definition page")
}

fn target_arg() -> Arg {
    Arg::new("target")
        .long("target")
        .default_value("datasets")
        .value_parser(value_parser!(TargetKind))
        .help("Item kind the form is for: datasets or files")
}

fn cli() -> Command {
    Command::new("ds-workbench")
        .version(ds_core::VERSION)
        .about("Dataset Workbench metadata and store tooling")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("assemble")
                .about("Print the renderable fields of a metadata form")
                .arg(definitions_arg())
                .arg(target_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Check a metadata draft against the required fields")
                .arg(definitions_arg())
                .arg(target_arg())
                .arg(
                    Arg::new("draft")
                        .long("draft")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON object of definition name to field values"),
                ),
        )
        .subcommand(
            Command::new("replay")
                .about("Fold a JSON array of store events and print collection sizes")
                .arg(
                    Arg::new("events")
                        .long("events")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON file with store events"),
                ),
        )
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn load_definitions(path: &Path) -> Result<Vec<MetadataDefinition>> {
    let text = read(path)?;
    if let Ok(page) = serde_json::from_str::<Paged<MetadataDefinition>>(&text) {
        return Ok(page.data);
    }
    serde_json::from_str(&text)
        .with_context(|| format!("parsing definitions in {}", path.display()))
}

fn load_draft(path: &Path) -> Result<MetadataDraft> {
    let entries: IndexMap<String, Contents> = serde_json::from_str(&read(path)?)
        .with_context(|| format!("parsing draft in {}", path.display()))?;

    let mut draft = MetadataDraft::new();
    for (definition, contents) in entries {
        for (field, value) in contents {
            draft.set(&definition, &field, value);
        }
    }
    Ok(draft)
}

fn print_sizes(state: &StoreState) {
    println!("datasets: {}", state.dataset.datasets.len());
    println!("folders and files: {}", state.dataset.folders_and_files.len());
    println!("staged files: {}", state.dataset.new_files.len());
    println!("metadata: {}", state.metadata.values.len());
    println!("visualization configs: {}", state.visualization.configs.len());
}

fn main() -> Result<()> {
    let matches = cli().get_matches();

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => WorkbenchConfig::load(path)?,
        None => WorkbenchConfig::default(),
    };
    let format = if matches.get_flag("log-json") {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(&config.log_filter, format);
    tracing::debug!(app = %config.app_name, "starting");

    let assembler = MetadataFormAssembler::default();
    match matches.subcommand() {
        Some(("assemble", args)) => {
            let definitions = load_definitions(
                args.get_one::<PathBuf>("definitions")
                    .context("--definitions")?,
            )?;
            let target = *args.get_one::<TargetKind>("target").context("--target")?;

            let fields = assembler.assemble(&definitions, target);
            tracing::info!(
                definitions = definitions.len(),
                fields = fields.len(),
                %target,
                "form assembled"
            );
            println!("{}", serde_json::to_string_pretty(&fields)?);
        }
        Some(("check", args)) => {
            let definitions = load_definitions(
                args.get_one::<PathBuf>("definitions")
                    .context("--definitions")?,
            )?;
            let target = *args.get_one::<TargetKind>("target").context("--target")?;
            let draft = load_draft(args.get_one::<PathBuf>("draft").context("--draft")?)?;

            let report = assembler.check(&definitions, target, &draft);
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_satisfied() {
                std::process::exit(1);
            }
        }
        Some(("replay", args)) => {
            let path = args.get_one::<PathBuf>("events").context("--events")?;
            let events: Vec<StoreEvent> = serde_json::from_str(&read(path)?)
                .with_context(|| format!("parsing events in {}", path.display()))?;

            let state = replay(&StoreState::default(), &events);
            tracing::info!(events = events.len(), "events replayed");
            print_sizes(&state);
        }
        _ => {}
    }

    Ok(())
}
