// Print stored monitoring data as JSON.
//
// Usage: dump_history [--config PATH] [--format json|csv] [FILE]
//   FILE defaults to the configured json_file/csv_file under data_dir.

use clap::Parser;
use std::path::PathBuf;
use sysprobe::config::{AppConfig, DEFAULT_CONFIG_PATH};
use sysprobe::persistence::{StorageFormat, load_csv, load_json};

#[derive(Parser)]
#[command(name = "dump_history", version, about = "Print stored monitoring data")]
struct Args {
    #[arg(short, long, env = "CONFIG_FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// json or csv; defaults to the configured storage format.
    #[arg(short, long)]
    format: Option<String>,

    file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let (config, _) = AppConfig::load_or_default(&args.config);
    let format = args
        .format
        .as_deref()
        .map(StorageFormat::from_config)
        .unwrap_or_else(|| config.storage_format());
    let path = args.file.unwrap_or_else(|| match format {
        StorageFormat::Json => config.json_path(),
        StorageFormat::Csv => config.csv_path(),
    });

    let dumped = match format {
        StorageFormat::Json => load_json(&path)?
            .map(|s| serde_json::to_string_pretty(&s))
            .transpose()?,
        StorageFormat::Csv => load_csv(&path)?
            .map(|rows| serde_json::to_string_pretty(&rows))
            .transpose()?,
    };
    match dumped {
        Some(json) => println!("{}", json),
        None => println!("no data at {}", path.display()),
    }
    Ok(())
}
