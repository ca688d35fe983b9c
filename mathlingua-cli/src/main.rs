//! Command-line interface for MathLingua
//!
//! Usage:
//!   mathlingua check `<files>...` [--json]                          - Report every problem found
//!   mathlingua render `<file>` [`<context>...`] [--html] [--literal] [--no-expand]
//!   mathlingua complete `<prefix>` `<files>...` [--signatures]      - Print completion suffixes
//!   mathlingua search `<query>` `<files>...`                        - Print matching paths
//!
//! Global options `--config <file>` and `--set key=value` layer over the built-in defaults.

mod error;

use clap::{Arg, ArgAction, ArgMatches, Command};
use error::CliError;
use mathlingua_analysis::{CollectionOptions, RenderMode, RenderOptions, SourceCollection};
use mathlingua_config::{Loader, MathlinguaConfig};
use std::fs;
use std::process;

fn files_arg() -> Arg {
    Arg::new("files")
        .help("MathLingua files to load")
        .num_args(1..)
        .required(true)
}

fn cli() -> Command {
    Command::new("mathlingua")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Check, render and search MathLingua files")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .global(true)
                .action(ArgAction::Append)
                .value_name("KEY=VALUE")
                .help("Override a single configuration value (e.g. render.html=true)"),
        )
        .subcommand(
            Command::new("check")
                .about("Report parse errors and semantic problems")
                .arg(files_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print diagnostics as a JSON array")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("render")
                .about("Print each top-level group of a file")
                .arg(Arg::new("file").help("File to render").required(true).index(1))
                .arg(
                    Arg::new("context")
                        .help("Further files whose definitions are used for expansion")
                        .num_args(0..)
                        .index(2),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help("Emit HTML instead of plain text")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("literal")
                        .long("literal")
                        .help("Print statements through their `written:` templates only")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-expand")
                        .long("no-expand")
                        .help("Print statements exactly as they appear in the source")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("literal"),
                ),
        )
        .subcommand(
            Command::new("complete")
                .about("Print completions for a word or signature prefix")
                .arg(Arg::new("prefix").required(true).index(1))
                .arg(files_arg().index(2))
                .arg(
                    Arg::new("signatures")
                        .long("signatures")
                        .help("Complete signatures instead of words")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("search")
                .about("Print the files containing every word of a query")
                .arg(Arg::new("query").required(true).index(1))
                .arg(files_arg().index(2)),
        )
}

fn main() {
    let matches = cli().get_matches();

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(2);
    });
    init_logging(&config.logging.level);

    let result = match matches.subcommand() {
        Some(("check", args)) => handle_check_command(args, &config),
        Some(("render", args)) => handle_render_command(args, &config),
        Some(("complete", args)) => handle_complete_command(args, &config),
        Some(("search", args)) => handle_search_command(args, &config),
        _ => Ok(true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

fn load_config(matches: &ArgMatches) -> Result<MathlinguaConfig, CliError> {
    let mut loader = Loader::new().with_optional_file("mathlingua.toml");
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    for assignment in matches.get_many::<String>("set").into_iter().flatten() {
        loader = loader.set_assignment(assignment)?;
    }
    Ok(loader.build()?)
}

/// `RUST_LOG` wins over the configured level
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn collection_options(config: &MathlinguaConfig) -> CollectionOptions {
    CollectionOptions {
        skip_operator_signatures: config.check.skip_operator_signatures,
        max_expansion_iterations: config.expansion.max_iterations,
        html_class_prefix: config.render.html_class_prefix.clone(),
    }
}

fn load_collection<'a>(
    paths: impl IntoIterator<Item = &'a String>,
    config: &MathlinguaConfig,
) -> Result<SourceCollection, CliError> {
    let sources = paths
        .into_iter()
        .map(|path| {
            fs::read_to_string(path)
                .map(|content| (path.clone(), content))
                .map_err(|source| CliError::Io {
                    path: path.into(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(files = sources.len(), "loaded sources");
    Ok(SourceCollection::from_sources(
        sources,
        collection_options(config),
    ))
}

/// Returns `Ok(false)` when problems were found
fn handle_check_command(args: &ArgMatches, config: &MathlinguaConfig) -> Result<bool, CliError> {
    let collection = load_collection(args.get_many::<String>("files").into_iter().flatten(), config)?;
    let diagnostics = collection.check();

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    } else if diagnostics.is_empty() {
        println!("SUCCESS: no errors found");
    } else {
        for diagnostic in &diagnostics {
            println!("ERROR: {}", diagnostic);
        }
        println!("{} error(s) found", diagnostics.len());
    }
    Ok(diagnostics.is_empty())
}

fn render_mode(args: &ArgMatches, config: &MathlinguaConfig) -> RenderMode {
    if args.get_flag("no-expand") {
        RenderMode::Raw
    } else if args.get_flag("literal") || config.render.literal || !config.expansion.enabled {
        RenderMode::Literal
    } else {
        RenderMode::Expanded
    }
}

fn handle_render_command(args: &ArgMatches, config: &MathlinguaConfig) -> Result<bool, CliError> {
    let Some(file) = args.get_one::<String>("file") else {
        return Ok(false);
    };
    let context = args.get_many::<String>("context").into_iter().flatten();
    let collection = load_collection(std::iter::once(file).chain(context), config)?;

    let options = RenderOptions {
        html: args.get_flag("html") || config.render.html,
        mode: render_mode(args, config),
    };
    let rendered = collection.render_file(file, options)?;
    println!("{}", rendered.join("\n"));
    Ok(true)
}

fn handle_complete_command(args: &ArgMatches, config: &MathlinguaConfig) -> Result<bool, CliError> {
    let prefix = args.get_one::<String>("prefix").map(String::as_str).unwrap_or_default();
    let collection = load_collection(args.get_many::<String>("files").into_iter().flatten(), config)?;

    let suffixes = if args.get_flag("signatures") {
        collection.find_signature_suffixes(prefix)
    } else {
        collection.find_word_suffixes(prefix)
    };
    for suffix in suffixes.iter().take(config.completion.max_results) {
        println!("{}{}", prefix, suffix);
    }
    Ok(true)
}

fn handle_search_command(args: &ArgMatches, config: &MathlinguaConfig) -> Result<bool, CliError> {
    let query = args.get_one::<String>("query").map(String::as_str).unwrap_or_default();
    let collection = load_collection(args.get_many::<String>("files").into_iter().flatten(), config)?;

    for file in collection.search(query) {
        println!("{}", file.path);
    }
    Ok(true)
}
