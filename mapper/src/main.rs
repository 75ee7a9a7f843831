//! OCDS Mapper CLI - Convert CSV files to the Open Contracting format
//!
//! # Main Command
//!
//! ```bash
//! ocds-mapper convert --csv-file data.csv --mapping-file mapping.json \
//!     --publisher-name "John Doe" --publish-date 2014-07-26
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! ocds-mapper parse data.csv          # CSV rows as JSON
//! ocds-mapper inspect mapping.json    # Directives of the release template
//! ocds-mapper directives              # Supported directive kinds
//! ```

use clap::{Parser, Subcommand};
use ocds_mapper::logs::{log_info, log_info_indent, log_success, LOG_BROADCASTER};
use ocds_mapper::{
    directives_description, parse_bytes, process, to_json_string, write_output, ConvertOptions,
    LoaderConfig, MappingDefinition, SourceLoader, UuidTokens,
};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ocds-mapper", version)]
#[command(about = "Convert CSV files to the OpenContracting format using a given mapping", long_about = None)]
struct Cli {
    /// Do not print progress to stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a CSV file using a mapping
    Convert {
        /// The CSV file to convert (path or URL)
        #[arg(long, value_name = "data.csv")]
        csv_file: String,

        /// The mapping used to convert the CSV file (path or URL)
        #[arg(long, value_name = "mapping.json")]
        mapping_file: String,

        /// Name of the organization that published the CSV file
        #[arg(long)]
        publisher_name: String,

        /// ISO date when the CSV file was published
        #[arg(long)]
        publish_date: String,

        /// CSV delimiter
        #[arg(short, long, default_value_t = ',')]
        delimiter: char,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a CSV file and output its rows as JSON
    Parse {
        /// Input CSV file (path or URL)
        input: String,

        /// CSV delimiter
        #[arg(short, long, default_value_t = ',')]
        delimiter: char,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the directives of a mapping's release template
    Inspect {
        /// Mapping file (path or URL)
        mapping: String,
    },

    /// Show the supported directive kinds
    Directives,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = LoaderConfig::from_env();
    LOG_BROADCASTER.set_quiet(cli.quiet || config.quiet);

    let result = match cli.command {
        Commands::Convert {
            csv_file,
            mapping_file,
            publisher_name,
            publish_date,
            delimiter,
            output,
        } => {
            let options = ConvertOptions::new(csv_file, mapping_file, publisher_name, publish_date)
                .with_delimiter(delimiter);
            cmd_convert(&config, &options, output.as_deref()).await
        }

        Commands::Parse {
            input,
            delimiter,
            output,
        } => cmd_parse(&config, &input, delimiter, output.as_deref()).await,

        Commands::Inspect { mapping } => cmd_inspect(&config, &mapping).await,

        Commands::Directives => cmd_directives(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_convert(
    config: &LoaderConfig,
    options: &ConvertOptions,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let loader = SourceLoader::new(config)?;
    let json = process(options, &loader, UuidTokens).await?;
    write_output(&json, output)?;
    Ok(())
}

async fn cmd_parse(
    config: &LoaderConfig,
    input: &str,
    delimiter: char,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("📄 Parsing CSV: {}", input));

    let loader = SourceLoader::new(config)?;
    let bytes = loader.load(input).await?;
    let parsed = parse_bytes(&bytes, delimiter)?;

    log_success(format!("Encoding: {}", parsed.encoding));
    log_success(format!("Columns: {}", parsed.headers.join(", ")));
    log_success(format!("Parsed {} records", parsed.rows.len()));

    let records: Vec<Value> = parsed
        .rows
        .iter()
        .map(|row| row.to_json(&parsed.headers))
        .collect();
    write_output(&to_json_string(&records)?, output)?;
    Ok(())
}

async fn cmd_inspect(config: &LoaderConfig, location: &str) -> Result<(), Box<dyn std::error::Error>> {
    let loader = SourceLoader::new(config)?;
    let mapping = MappingDefinition::from_slice(&loader.load(location).await?)?;

    log_info(format!("🗺️  Release template of {}:", location));
    for (path, directive) in mapping.release_schema.directives() {
        let kind = match directive.kind() {
            Ok(kind) => kind.to_string(),
            Err(_) => format!("{} (unknown)", directive.kind),
        };
        println!("{}  {}:{}", path, kind, directive.argument);
    }

    let columns = mapping.referenced_columns();
    log_info(format!("Columns read ({}):", columns.len()));
    for column in columns {
        log_info_indent(column, 1);
    }

    let unknown = mapping.release_schema.kind_counts().get(&None).copied().unwrap_or(0);
    if unknown > 0 {
        return Err(format!("{} directive(s) use an unknown kind", unknown).into());
    }
    Ok(())
}

fn cmd_directives() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", directives_description());
    Ok(())
}
