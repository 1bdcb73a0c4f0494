//! Structured Data Injection CLI
//!
//! Builds an Organization schema from `schema.config.json` and writes it
//! into the `<head>` of a static `index.html`.

use std::env;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use seoptimize::config::{example_config, file_label};
use seoptimize::{
    find_project_root, generate_organization_schema, inject_schema, load_organization_config,
    InjectOutcome, SeoError, CONFIG_FILE_NAME,
};

#[derive(Parser)]
#[command(name = "generate-schema")]
#[command(about = "Inject an Organization JSON-LD schema into an HTML shell")]
#[command(version)]
struct Cli {
    /// Path to the schema config (default: schema.config.json in the project root)
    config: Option<PathBuf>,

    /// HTML file to update (default: index.html in the project root)
    html: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<(), SeoError> {
    let cwd = env::current_dir()?;
    let root = find_project_root(&cwd);
    let config_path = cli.config.unwrap_or_else(|| root.join(CONFIG_FILE_NAME));
    let html_path = cli.html.unwrap_or_else(|| root.join("index.html"));
    debug!(config = %config_path.display(), html = %html_path.display(), "Resolved paths");

    let config = load_organization_config(&config_path)?;
    let schema = generate_organization_schema(&config)?;

    let html_name = file_label(&html_path);
    if !html_path.is_file() {
        return Err(SeoError::HtmlNotFound {
            name: html_name,
            path: html_path,
        });
    }

    let html = fs::read_to_string(&html_path)?;
    let injection = inject_schema(&html, &schema, &html_name)?;
    match injection.outcome {
        InjectOutcome::Updated => println!("Schema updated in {}", html_name),
        InjectOutcome::Added => println!("Schema added to {}", html_name),
    }

    fs::write(&html_path, injection.html)?;
    println!("Schema successfully written to {}", html_path.display());
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        if matches!(e, SeoError::ConfigNotFound(_)) {
            eprintln!("Please create a {} file with your organization details.", CONFIG_FILE_NAME);
            eprintln!("Example:");
            if let Ok(example) = serde_json::to_string_pretty(&example_config()) {
                eprintln!("{}", example);
            }
        }
        std::process::exit(1);
    }
}
