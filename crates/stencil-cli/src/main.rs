use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::{env, fs, process};
use stencil_config::Config;
use stencil_syntax::{MarkupParser, NestingSequences, debug_tree};

const USAGE: &str = "Usage: stencil-cli [--config PATH] [--nested START END] [--case-sensitive] FILE";

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    nested: Option<(String, String)>,
    case_sensitive: bool,
    file: PathBuf,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut file = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--nested" => {
                let start = iter.next().context("--nested needs a start sequence")?;
                let end = iter.next().context("--nested needs an end sequence")?;
                parsed.nested = Some((start.clone(), end.clone()));
            }
            "--case-sensitive" => parsed.case_sensitive = true,
            flag if flag.starts_with("--") => bail!("Unknown option {flag}"),
            path if file.is_none() => file = Some(PathBuf::from(path)),
            extra => bail!("Unexpected argument {extra}"),
        }
    }

    parsed.file = file.context("No template file given")?;
    Ok(parsed)
}

fn load_config(args: &Args) -> Result<Config> {
    let config_path = args.config.clone().unwrap_or_else(Config::config_path);
    log::info!("Config path: {}", config_path.display());

    let config = Config::load_from_path(&config_path)
        .with_context(|| format!("Failed to load config file '{}'", config_path.display()))?;
    match config {
        Some(config) => Ok(config),
        None if args.config.is_some() => {
            bail!("Config file '{}' does not exist", config_path.display())
        }
        None => Ok(Config::default()),
    }
}

/// Parse the file and print the tree. Returns the number of diagnostics.
fn run(args: &Args) -> Result<usize> {
    let config = load_config(args)?;
    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read template '{}'", args.file.display()))?;

    let parser = MarkupParser::new().with_options(config.to_options());
    let nesting = match &args.nested {
        Some((start, end)) => Some(
            NestingSequences::new(start.as_str(), end.as_str()).case_sensitive(args.case_sensitive),
        ),
        None => config.nesting_sequences(),
    };

    let parse = match nesting {
        Some(sequences) => parser.parse_nested(&source, &sequences)?,
        None => parser.parse_block(&source)?,
    };

    println!("{}", debug_tree(&parse.syntax()));
    for diagnostic in parse.errors() {
        eprintln!("{diagnostic}");
    }
    Ok(parse.errors().len())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let raw: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    let diagnostics = run(&args)?;
    if diagnostics > 0 {
        log::info!("{diagnostics} diagnostic(s) reported");
        process::exit(1);
    }
    Ok(())
}
