//! yamlbind CLI - inspect, edit and validate YAML config documents

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use parking_lot::Mutex;
use serde::Serialize;
use serde_yaml::Value;
use tracing_subscriber::EnvFilter;

use yamlbind::{
    compare, BindError, BinderBuilder, Bound, Document, FixSuggestion, Schema, Tag, YamlDocument,
};

#[derive(Parser)]
#[command(name = "yamlbind")]
#[command(about = "yamlbind - bind and validate dotted-path YAML config")]
#[command(version)]
struct Cli {
    /// Debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value at a dotted path
    Get {
        /// Path to the YAML file
        file: String,

        /// Dotted path, e.g. database.host
        path: String,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Set a value (parsed as YAML) and save the file
    Set {
        file: String,
        path: String,
        value: String,
    },

    /// Check that required paths are present
    Check {
        file: String,

        /// Section the required paths are relative to
        #[arg(short, long)]
        section: Option<String>,

        /// Required dotted path (repeatable)
        #[arg(short, long = "require", required = true)]
        require: Vec<String>,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Compare two dot separated versions
    Compare { left: String, right: String },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Get { file, path, format } => get_value(&file, &path, format).map(|_| true),
        Commands::Set { file, path, value } => set_value(&file, &path, &value).map(|_| true),
        Commands::Check {
            file,
            section,
            require,
            format,
        } => check_file(&file, section, require, format),
        Commands::Compare { left, right } => compare_versions(&left, &right).map(|_| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            if let Some(suggestion) = e.fix_suggestion() {
                eprintln!("  {} {}", "Fix:".yellow(), suggestion);
            }
            std::process::exit(1);
        }
    }
}

fn get_value(file: &str, path: &str, format: Format) -> Result<(), BindError> {
    let document = YamlDocument::open(file)?;
    let value = document.get(path).ok_or_else(|| BindError::MissingValue {
        route: path.to_string(),
    })?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&value)?),
        Format::Text => match &value {
            Value::String(s) => println!("{s}"),
            Value::Number(n) => println!("{n}"),
            Value::Bool(b) => println!("{b}"),
            Value::Null => println!("null"),
            other => print!("{}", serde_yaml::to_string(other)?),
        },
    }
    Ok(())
}

fn set_value(file: &str, path: &str, raw: &str) -> Result<(), BindError> {
    let value: Value = serde_yaml::from_str(raw)?;
    let mut document = YamlDocument::open(file)?;
    document.set(path, value)?;
    document.save()?;
    println!("{} Set {} in {}", "✓".green(), path.cyan(), file);
    Ok(())
}

// ============================================================================
// CHECK
// ============================================================================

/// Bound object built at runtime: one required string per path
struct RequiredPaths {
    schema: Arc<Schema>,
    values: Vec<Option<String>>,
}

impl Bound for RequiredPaths {
    fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }
}

impl RequiredPaths {
    fn new(section: Option<&str>, paths: &[String]) -> Self {
        let mut builder = Schema::builder::<RequiredPaths>();
        if let Some(section) = section {
            builder = builder.section(section);
        }
        for (i, path) in paths.iter().enumerate() {
            builder = builder.field(
                path.as_str(),
                move |r| &mut r.values[i],
                Tag::at(path.as_str()).required(),
            );
        }
        Self {
            schema: Arc::new(builder.build()),
            values: vec![None; paths.len()],
        }
    }
}

#[derive(Serialize)]
struct CheckReport {
    file: String,
    ok: bool,
    checked: usize,
    errors: Vec<String>,
}

fn check_file(
    file: &str,
    section: Option<String>,
    require: Vec<String>,
    format: Format,
) -> Result<bool, BindError> {
    let document = YamlDocument::open(file)?;
    let target = Arc::new(Mutex::new(RequiredPaths::new(section.as_deref(), &require)));
    let failures = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&failures);

    // A check never writes: bind an in-memory copy
    let snapshot = YamlDocument::parse(&document.to_yaml_string()?)?;
    BinderBuilder::yaml(snapshot)
        .register(target)
        .build(|_| {}, move |errors| sink.lock().extend(errors))?;

    let errors = std::mem::take(&mut *failures.lock());
    let report = CheckReport {
        file: file.to_string(),
        ok: errors.is_empty(),
        checked: require.len(),
        errors,
    };

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text if report.ok => println!(
            "{} {}: {} required path(s) present",
            "✓".green(),
            report.file,
            report.checked
        ),
        Format::Text => {
            println!("{} {}: missing or invalid", "✗".red(), report.file);
            for error in &report.errors {
                println!("  - {}", error.yellow());
            }
        }
    }
    Ok(report.ok)
}

fn compare_versions(left: &str, right: &str) -> Result<(), BindError> {
    println!("{}", compare(left, right)?);
    Ok(())
}
