use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use serde_json::Value as Json;
use tokenscript::{
    config::{Config, DEFAULT_MAX_ITERATIONS},
    interpret_to_string,
    interpreter::{colors::ColorManager, units::UnitManager, value::import::import_references},
    token_set::TokenSet,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// tokenscript computes design-token values: unit-aware arithmetic,
/// references, and colors in script-defined formats.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells tokenscript to look at a file instead of a script.
    #[arg(short, long)]
    file: bool,

    /// JSON object file whose entries are available as `{name}`.
    #[arg(short, long, value_name = "FILE")]
    references: Option<PathBuf>,

    /// Color format specification to register; may be repeated.
    #[arg(short, long = "color-spec", value_name = "FILE")]
    color_spec: Vec<PathBuf>,

    /// Unit specification to register; may be repeated.
    #[arg(short, long = "unit-spec", value_name = "FILE")]
    unit_spec: Vec<PathBuf>,

    /// Design-token document to resolve; prints the resolved tokens as JSON.
    #[arg(short, long, value_name = "FILE")]
    tokens: Option<PathBuf>,

    /// Maximum number of iterations of a single `while` loop.
    #[arg(short, long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// The script, or a path with `--file`.
    #[arg(required_unless_present = "tokens")]
    contents: Option<String>,
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| {
                                format!("Failed to read '{}': {e}. Perhaps this file does not exist?",
                                        path.display())
                            })
}

fn build_config(args: &Args) -> Result<Config, String> {
    let mut units = UnitManager::default();
    for path in &args.unit_spec {
        units.register_json(&read(path)?)
             .map_err(|e| format!("{}: {e}", path.display()))?;
    }

    let mut colors = ColorManager::new();
    for path in &args.color_spec {
        colors.register_json(&read(path)?)
              .map_err(|e| format!("{}: {e}", path.display()))?;
    }
    debug!(formats = colors.len(), "registered color formats");

    Ok(Config::default().with_max_iterations(args.max_iterations)
                        .with_units(units)
                        .with_colors(colors))
}

fn run(args: Args) -> Result<String, String> {
    let config = build_config(&args)?;

    if let Some(path) = &args.tokens {
        let tokens = TokenSet::from_json(&read(path)?).map_err(|e| e.to_string())?;
        let resolved = tokens.resolve(&config).map_err(|e| e.to_string())?;
        let output = resolved.into_iter()
                             .map(|(path, token)| (path, Json::String(token.text)))
                             .collect::<serde_json::Map<_, _>>();
        return serde_json::to_string_pretty(&output).map_err(|e| e.to_string());
    }

    let references = match &args.references {
        Some(path) => {
            let json = serde_json::from_str::<HashMap<String, Json>>(&read(path)?)
                .map_err(|e| format!("{}: {e}", path.display()))?;
            import_references(&json)
        },
        None => HashMap::new(),
    };

    let contents = args.contents.unwrap_or_default();
    let script = if args.file {
        read(Path::new(&contents))?
    } else {
        contents
    };

    interpret_to_string(&script, references, Some(config)).map_err(|e| e.report(&script))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env())
                             .with_writer(std::io::stderr)
                             .init();

    match run(Args::parse()) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        },
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        },
    }
}
