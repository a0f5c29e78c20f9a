use crate::document_builder::{DocumentAssembler, DEFAULT_API_VERSION};
use crate::extractor::{AnnotationExtractor, EndpointExtractor};
use crate::model::{EndpointCandidate, RequestContext};
use crate::serializer::{serialize_json, serialize_json_pretty, serialize_yaml, write_to_file};
use crate::source::{SourceParser, SourceScanner};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Functions Swagger - generate a Swagger 2.0 document from annotated HTTP-triggered functions
#[derive(Parser, Debug)]
#[command(name = "functions-swagger")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the function project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// API title, also used as the tag of every operation
    #[arg(long, env = "SWAGGER_TITLE")]
    pub title: String,

    /// API description
    #[arg(long, env = "SWAGGER_DESCRIPTION")]
    pub description: String,

    /// Name of the function serving the document; it is left out of the paths
    #[arg(long = "definition-name", env = "SWAGGER_DEFINITION_NAME")]
    pub definition_name: String,

    /// Host the document is generated for; local hosts get the http scheme
    #[arg(long, env = "SWAGGER_HOST", default_value = "localhost")]
    pub host: String,

    /// API version written to the info section
    #[arg(long = "api-version", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Output format (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Indent JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    info!("Project path: {}", args.project_path.display());
    info!("API: {} {}", args.title, args.api_version);
    info!("Host: {}", args.host);
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Endpoint candidates found in a project, with scan statistics
pub struct Discovery {
    pub candidates: Vec<EndpointCandidate>,
    pub files_scanned: usize,
    pub files_parsed: usize,
}

/// Scan, parse and extract the endpoint candidates of a project.
pub fn discover(project_path: &Path) -> Result<Discovery> {
    info!("Scanning project directory...");
    let scan_result = SourceScanner::new(project_path.to_path_buf()).scan()?;
    info!("Found {} Rust files", scan_result.rust_files.len());

    if scan_result.rust_files.is_empty() {
        anyhow::bail!("No Rust files found in the project directory");
    }

    info!("Parsing Rust files...");
    let parsed_files = SourceParser::parse_files(&scan_result.rust_files);
    info!("Successfully parsed {} files", parsed_files.len());

    if parsed_files.is_empty() {
        anyhow::bail!("No files could be parsed successfully");
    }

    info!("Extracting endpoint candidates...");
    let candidates = AnnotationExtractor.extract_candidates(&parsed_files);

    Ok(Discovery {
        candidates,
        files_scanned: scan_result.rust_files.len(),
        files_parsed: parsed_files.len(),
    })
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting Swagger document generation...");

    let discovery = discover(&args.project_path)?;
    if discovery.candidates.is_empty() {
        warn!("No annotated functions found in the project");
    }

    info!("Building Swagger document...");
    let document = DocumentAssembler::new()
        .with_request(RequestContext::new(args.host.clone()))
        .with_title(args.title.clone())
        .with_description(args.description.clone())
        .with_definition_name(args.definition_name.clone())
        .with_version(args.api_version.clone())
        .build(&discovery.candidates)
        .context("Failed to build the Swagger document")?;
    info!("Swagger document built successfully");

    info!("Serializing to {:?} format...", args.output_format);
    let content = match (args.output_format, args.pretty) {
        (OutputFormat::Yaml, _) => serialize_yaml(&document)?,
        (OutputFormat::Json, true) => serialize_json_pretty(&document)?,
        (OutputFormat::Json, false) => serialize_json(&document)?,
    };

    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote Swagger document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Files scanned: {}", discovery.files_scanned);
    info!("  - Files parsed: {}", discovery.files_parsed);
    info!("  - Candidates found: {}", discovery.candidates.len());
    info!("  - Paths generated: {}", document.paths.len());
    info!("  - Definitions: {}", document.definitions.len());

    Ok(())
}
