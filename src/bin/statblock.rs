//! Command-line interface for statblock
//! Converts pasted stat block text or Markdown into structured entity records.
//!
//! Usage:
//!   statblock convert `<path>` [--format text|markdown] [--output json|yaml] [--source `<S>`]
//!                     [--page `<N>`] [--config `<file>`] [--title-case]
//!   statblock normalize `<path>`                 - Print the repaired input text
//!   statblock inflicts `<path>` [--format ...]   - List conditions the entries inflict

use clap::{Arg, ArgAction, ArgMatches, Command};
use statblock_parser::statblock::building::InputFormat;
use statblock_parser::statblock::config::{ConfigError, Loader, StatblockConfig};
use statblock_parser::statblock::diagnostics::{Diagnostic, FnSink};
use statblock_parser::statblock::normalizing::normalize;
use statblock_parser::statblock::pipeline::{Conversion, ConvertError, ConvertOptions, Converter};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
enum CliError {
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
    Convert(ConvertError),
    Config(ConfigError),
    Usage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io { path, source } => {
                write!(f, "Error reading {}: {}", path.display(), source)
            }
            CliError::Json(e) => write!(f, "JSON serialization error: {}", e),
            CliError::Yaml(e) => write!(f, "YAML serialization error: {}", e),
            CliError::Convert(e) => write!(f, "Conversion error: {}", e),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::Usage(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io { source, .. } => Some(source),
            CliError::Json(e) => Some(e),
            CliError::Yaml(e) => Some(e),
            CliError::Convert(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Usage(_) => None,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(e: serde_yaml::Error) -> Self {
        CliError::Yaml(e)
    }
}

impl From<ConvertError> for CliError {
    fn from(e: ConvertError) -> Self {
        CliError::Convert(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the pasted stat block")
        .required(true)
        .index(1)
}

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .help("Input format")
        .value_parser(["text", "markdown"])
        .default_value("text")
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .help("Configuration file layered over the built-in defaults")
}

fn main() {
    let matches = Command::new("statblock")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts pasted stat blocks into structured entity records")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log pipeline stages to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a stat block into an entity record")
                .arg(path_arg())
                .arg(format_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output format")
                        .value_parser(["json", "yaml"])
                        .default_value("json"),
                )
                .arg(
                    Arg::new("source")
                        .long("source")
                        .short('s')
                        .help("Source abbreviation of the entity"),
                )
                .arg(
                    Arg::new("page")
                        .long("page")
                        .short('p')
                        .help("Page number of the entity")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(config_arg())
                .arg(
                    Arg::new("title-case")
                        .long("title-case")
                        .help("Title-case the entity name")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("normalize")
                .about("Print the input after line-wrap repair")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("inflicts")
                .about("List the conditions a stat block inflicts on others")
                .arg(path_arg())
                .arg(format_arg())
                .arg(config_arg()),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let result = match matches.subcommand() {
        Some(("convert", convert_matches)) => handle_convert_command(convert_matches),
        Some(("normalize", normalize_matches)) => handle_normalize_command(normalize_matches),
        Some(("inflicts", inflicts_matches)) => handle_inflicts_command(inflicts_matches),
        _ => Err(CliError::Usage("Unknown command".to_string())),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, CliError> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("Missing argument: {}", name)))
}

fn read_input(matches: &ArgMatches) -> Result<String, CliError> {
    let path = PathBuf::from(required(matches, "path")?);
    std::fs::read_to_string(&path).map_err(|source| CliError::Io { path, source })
}

fn input_format(matches: &ArgMatches) -> Result<InputFormat, CliError> {
    match required(matches, "format")? {
        "markdown" => Ok(InputFormat::Markdown),
        _ => Ok(InputFormat::PlainText),
    }
}

/// Defaults, then the `--config` file, then flag overrides.
///
/// Subcommands define different flags, so each is looked up with `try_get_one`.
fn load_config(matches: &ArgMatches) -> Result<StatblockConfig, CliError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Ok(Some(source)) = matches.try_get_one::<String>("source") {
        loader = loader.set_override("convert.source", source.clone())?;
    }
    if let Ok(Some(page)) = matches.try_get_one::<u32>("page") {
        loader = loader.set_override("convert.page", i64::from(*page))?;
    }
    if let Ok(Some(true)) = matches.try_get_one::<bool>("title-case") {
        loader = loader.set_override("convert.is_title_case", true)?;
    }
    Ok(loader.build()?)
}

/// Run a conversion, printing every warning to stderr as it is emitted.
fn convert(
    matches: &ArgMatches,
    converter: &Converter,
    config: &StatblockConfig,
) -> Result<Conversion, CliError> {
    let source = read_input(matches)?;
    let format = input_format(matches)?;
    let mut options = config.to_options();
    let mut sink = FnSink(|diagnostic: Diagnostic| eprintln!("{}", diagnostic));
    Ok(converter.convert(&source, format, &mut options, &mut sink)?)
}

/// Handle the convert command
fn handle_convert_command(matches: &ArgMatches) -> Result<(), CliError> {
    let config = load_config(matches)?;
    let converter = config.converter()?;
    let conversion = convert(matches, &converter, &config)?;
    let output = match required(matches, "output")? {
        "yaml" => serde_yaml::to_string(&conversion.entity)?,
        _ => serde_json::to_string_pretty(&conversion.entity)? + "\n",
    };
    print!("{}", output);
    Ok(())
}

/// Handle the normalize command
fn handle_normalize_command(matches: &ArgMatches) -> Result<(), CliError> {
    let source = read_input(matches)?;
    let mut options = ConvertOptions::default();
    let text = normalize(&source, Some(&mut options));
    if let Some(page) = options.page {
        eprintln!("page: {}", page);
    }
    println!("{}", text);
    Ok(())
}

/// Handle the inflicts command
fn handle_inflicts_command(matches: &ArgMatches) -> Result<(), CliError> {
    let config = load_config(matches)?;
    let converter = config.converter()?;
    let conversion = convert(matches, &converter, &config)?;
    for condition in converter.inflicted_conditions(&conversion.entity.entries, None) {
        println!("{}", condition);
    }
    Ok(())
}
