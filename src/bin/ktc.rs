//! ktc - Kube Transcoder CLI tool
//!
//! A command line tool for converting metadata blocks and computing
//! metadata patches from YAML/JSON files.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Serialize;
use tracing::debug;

use kube_transcoder::meta::{expand_metadata_with, flatten_metadata_with};
use kube_transcoder::value::{self, Map, Value};
use kube_transcoder::{id_parts, patch_metadata, AnnotationFilter, Error, Quantity, StateDiff};

#[derive(Parser, Debug)]
#[command(name = "ktc", version, about = "Kube Transcoder CLI tool")]
struct Cli {
    /// Output location. Use '-' for stdout
    #[arg(short, long, global = true, default_value = "-")]
    output: String,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,

    /// Annotation domains treated as system-managed
    #[arg(
        long = "reserved-domain",
        env = "KTC_RESERVED_DOMAINS",
        global = true,
        value_delimiter = ',',
        default_value = "kubernetes.io"
    )]
    reserved_domains: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand a metadata block into object metadata
    ExpandMetadata { file: PathBuf },
    /// Flatten object metadata into a metadata block
    FlattenMetadata { file: PathBuf },
    /// Compute the metadata patch between two state documents
    Diff {
        #[arg(long)]
        old: PathBuf,
        #[arg(long)]
        new: PathBuf,
        /// Location of the metadata block in the state documents
        #[arg(long, default_value = "metadata.0.")]
        key_prefix: String,
        /// Location of the metadata in the API object
        #[arg(long, default_value = "/metadata/")]
        path_prefix: String,
    },
    /// Print the canonical form of resource quantities
    Quantity {
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Split a "namespace/name" identifier
    Id { id: String },
}

fn init_tracing() {
    let env = std::env::var("KTC_LOG").unwrap_or_else(|_| "warn".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let filter = AnnotationFilter::new(cli.reserved_domains);
    debug!(reserved_domains = ?filter.reserved_domains(), "configured annotation filter");

    let mut output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::File::create(&cli.output)
                .map_err(|e| format!("Failed to create output file {:?}: {}", cli.output, e))?,
        )
    };

    match cli.command {
        Command::ExpandMetadata { file } => {
            let block = read_block(&file)?;
            let meta = expand_metadata_with(&block, &filter)?;
            write_document(&mut output, cli.format, &meta)?;
        }
        Command::FlattenMetadata { file } => {
            let content = read_file(&file)?;
            let meta: ObjectMeta = serde_yaml::from_str(&content)
                .map_err(|e| format!("Failed to parse object metadata: {}", e))?;
            let block = Value::List(flatten_metadata_with(&meta, &filter));
            write_document(&mut output, cli.format, &block)?;
        }
        Command::Diff {
            old,
            new,
            key_prefix,
            path_prefix,
        } => {
            let diff = StateDiff::new(read_value(&old)?, read_value(&new)?);
            let ops = patch_metadata(&key_prefix, &path_prefix, &diff)?;
            write_document(&mut output, cli.format, &ops)?;
        }
        Command::Quantity { values } => {
            let mut canonical = Map::new();
            for (i, raw) in values.iter().enumerate() {
                let quantity = raw
                    .parse::<Quantity>()
                    .map_err(|e| Error::quantity_parse(format!("[{}]", i), raw.as_str(), e))?;
                canonical.set(raw.as_str(), quantity.to_string());
            }
            write_document(&mut output, cli.format, &canonical)?;
        }
        Command::Id { id } => {
            let (namespace, name) = id_parts(&id)?;
            let parts: Map = [("namespace", namespace), ("name", name)].into_iter().collect();
            write_document(&mut output, cli.format, &parts)?;
        }
    }

    Ok(())
}

fn read_file(file: &Path) -> Result<String, Box<dyn std::error::Error>> {
    Ok(fs::read_to_string(file).map_err(|e| format!("Failed to read file {:?}: {}", file, e))?)
}

fn read_value(file: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let content = read_file(file)?;
    Ok(value::from_yaml(&content).map_err(|e| format!("Failed to parse {:?}: {}", file, e))?)
}

/// Reads a metadata block, accepting either the single-element list or the
/// bare map.
fn read_block(file: &Path) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    match read_value(file)? {
        Value::List(block) => Ok(block),
        Value::Null => Ok(Vec::new()),
        map @ Value::Map(_) => Ok(vec![map]),
        other => Err(Error::type_mismatch("metadata", "list", other.type_name()).into()),
    }
}

fn write_document<T: Serialize>(
    output: &mut dyn Write,
    format: OutputFormat,
    document: &T,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => writeln!(output, "{}", serde_json::to_string_pretty(document)?)?,
        OutputFormat::Yaml => write!(output, "{}", serde_yaml::to_string(document)?)?,
    }
    Ok(())
}
