//! Command-line interface for the charthouse utility
//!
//! Provides a CLI to generate PlantUML class diagrams from a JSON type
//! catalog.

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use charthouse::core::logging::init_logging;
use charthouse::prelude::*;

/// Charthouse - Generate PlantUML class diagrams from a type catalog
#[derive(Parser)]
#[command(name = "charthouse")]
#[command(about = "A Rust utility to generate PlantUML class diagrams from a JSON type catalog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate .puml files from a JSON type catalog
    Generate {
        /// Input file containing the JSON catalog (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory to write one .puml file per type
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print diagrams to stdout instead of writing files
        #[arg(long)]
        stdout: bool,

        /// Types to render (defaults to every type in the catalog);
        /// referenced types are rendered transitively
        #[arg(short, long)]
        types: Vec<String>,

        /// Generator configuration as a JSON file, applied before flags
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit dependency edges for ordinary method parameters
        #[arg(long)]
        method_associations: bool,

        /// Do not emit edges for non-collection fields and properties
        #[arg(long)]
        no_property_associations: bool,

        /// Keep collection containers as their own nodes instead of
        /// unwrapping to the element type
        #[arg(long)]
        keep_collections: bool,

        /// Drop inheritance edges to framework-noise base types
        #[arg(long)]
        exclude_framework_bases: bool,

        /// Render public members only
        #[arg(long)]
        public_only: bool,

        /// Number of spaces to indent member lines with
        #[arg(long)]
        indent: Option<usize>,
    },

    /// List the types a catalog declares
    Types {
        /// Input file containing the JSON catalog (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Validate a catalog: parse it and build every declared type
    Validate {
        /// Input file containing the JSON catalog (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

/// Main CLI application
pub struct CharthouseApp;

impl CharthouseApp {
    /// Create a new application instance
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over CLI flags
        let log_level_str = std::env::var("CHARTHOUSE_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("CHARTHOUSE_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Charthouse v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Generate {
                input,
                output_dir,
                stdout,
                types,
                config,
                method_associations,
                no_property_associations,
                keep_collections,
                exclude_framework_bases,
                public_only,
                indent,
            } => {
                let config = Self::build_config(
                    config,
                    method_associations,
                    no_property_associations,
                    keep_collections,
                    exclude_framework_bases,
                    public_only,
                    indent,
                )?;
                self.generate_command(input, output_dir, stdout, types, config, cli.verbose)
            }
            Commands::Types { input, json } => self.types_command(input, json, cli.verbose),
            Commands::Validate { input } => self.validate_command(input, cli.verbose),
        }
    }

    /// Load the base configuration and apply flag overrides
    #[allow(clippy::too_many_arguments)]
    fn build_config(
        config_path: Option<PathBuf>,
        method_associations: bool,
        no_property_associations: bool,
        keep_collections: bool,
        exclude_framework_bases: bool,
        public_only: bool,
        indent: Option<usize>,
    ) -> Result<GeneratorConfig> {
        let mut config = match config_path {
            Some(path) => {
                let text = fs::read_to_string(&path)
                    .map_err(|e| anyhow!("Failed to read config {}: {}", path.display(), e))?;
                serde_json::from_str(&text)
                    .map_err(|e| anyhow!("Invalid config {}: {}", path.display(), e))?
            }
            None => GeneratorConfig::default(),
        };
        if method_associations {
            config = config.with_method_parameter_associations(true);
        }
        if no_property_associations {
            config = config.with_property_associations(false);
        }
        if keep_collections {
            config = config.with_collection_unwrapping(false);
        }
        if exclude_framework_bases {
            config = config.with_framework_base_exclusion(true);
        }
        if public_only {
            config = config.with_visibility_filter(VisibilityFilter::public_only());
        }
        if let Some(width) = indent {
            config = config.with_indent(" ".repeat(width));
        }
        Ok(config)
    }

    /// Handle the generate command
    fn generate_command(
        &self,
        input: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        stdout: bool,
        types: Vec<String>,
        config: GeneratorConfig,
        verbose: bool,
    ) -> Result<()> {
        let catalog = self.read_catalog(input, verbose)?;
        let builder = DiagramBuilder::new(&catalog, &config);

        let roots: Vec<&str> = if types.is_empty() {
            catalog.type_identifiers()
        } else {
            types.iter().map(String::as_str).collect()
        };
        let diagrams = builder.build_closure(roots);
        if diagrams.is_empty() {
            bail!("No diagrams were generated");
        }

        if verbose {
            eprintln!("Generated {} diagram(s)", diagrams.len());
        }

        if stdout || output_dir.is_none() {
            let blocks: Vec<&str> = diagrams.iter().map(|d| d.text.as_str()).collect();
            let mut out = io::stdout().lock();
            writeln!(out, "{}", blocks.join("\n\n"))?;
            return Ok(());
        }

        let dir = output_dir.expect("output_dir checked above");
        fs::create_dir_all(&dir)
            .map_err(|e| anyhow!("Failed to create {}: {}", dir.display(), e))?;
        for diagram in &diagrams {
            let path = dir.join(format!("{}.puml", diagram.identifier));
            fs::write(&path, &diagram.text)
                .map_err(|e| anyhow!("Failed to write {}: {}", path.display(), e))?;
            if verbose {
                eprintln!("Wrote {}", path.display());
            }
        }
        Ok(())
    }

    /// Handle the types command
    fn types_command(&self, input: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
        let catalog = self.read_catalog(input, verbose)?;
        let identifiers = catalog.type_identifiers();

        if json {
            let listing = serde_json::json!({
                "types": identifiers,
                "total": identifiers.len(),
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            for identifier in &identifiers {
                println!("{}", identifier);
            }
            println!();
            println!("Total: {} type(s)", identifiers.len());
        }
        Ok(())
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let catalog = self.read_catalog(input, verbose)?;
        let config = GeneratorConfig::default();
        let builder = DiagramBuilder::new(&catalog, &config);

        let mut failures = Vec::new();
        for identifier in catalog.type_identifiers() {
            if let Err(error) = builder.build(identifier) {
                failures.push(format!("{}: {}", identifier, error));
            }
            // Nested types are part of the catalog's own structure and
            // must resolve, unlike ordinary references
            if let Some(decl) = catalog.type_decl(identifier) {
                for nested in &decl.nested {
                    if !catalog.is_in_scope(nested) {
                        failures.push(format!(
                            "{}: nested type {} is not declared",
                            identifier, nested
                        ));
                    }
                }
            }
        }

        if failures.is_empty() {
            println!("✓ Valid catalog ({} types)", catalog.type_identifiers().len());
            Ok(())
        } else {
            for failure in &failures {
                eprintln!("✗ {}", failure);
            }
            bail!("{} type(s) failed to build", failures.len());
        }
    }

    /// Read and parse the catalog from a file or stdin
    fn read_catalog(&self, input: Option<PathBuf>, verbose: bool) -> Result<InMemoryCatalog> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }
        InMemoryCatalog::from_json(&content).map_err(|e| anyhow!("Invalid catalog: {}", e))
    }

    /// Read input from a file, or stdin when the path is absent or `-`
    fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            None => Self::read_stdin(),
            Some(ref p) if p == Path::new("-") => Self::read_stdin(),
            Some(path) => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e)),
        }
    }

    fn read_stdin() -> Result<String> {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| anyhow!("Failed to read stdin: {}", e))?;
        Ok(content)
    }
}

impl Default for CharthouseApp {
    fn default() -> Self {
        Self::new()
    }
}
