use crate::audit::{audit_directory, print_audit_issues, Severity};
use crate::config::GeneratorConfig;
use crate::error::RegistryError;
use crate::generator::{
    compare_connector, generate_connectors, generate_multi_connector, preview_connector,
    DocumentKind, GeneratedFiles, GeneratorOptions,
};
use crate::logging::{init_logging, LogConfig};
use crate::manifest::{build_manifest, write_manifest};
use crate::registry::NodeRegistry;
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use std::path::{Path, PathBuf};

/// Command-line interface for connector-gen
#[derive(Parser, Debug)]
#[command(name = "connector-gen", version)]
#[command(about = "Generate Catalyst connectors from operation schemas", long_about = None)]
pub struct Cli {
    /// Config file (defaults to ./connector-gen.toml when present)
    #[arg(long, global = true, env = "CONNECTOR_GEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Extra YAML/JSON service catalog (repeatable)
    #[arg(long = "catalog", global = true)]
    pub catalogs: Vec<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate single-operation connectors for a service
    ///
    /// Without --operation every registered operation of the service is
    /// generated.
    Generate {
        /// Service identifier, e.g. slack
        service: String,

        /// Operation code or name
        #[arg(short, long)]
        operation: Option<String>,

        /// Root of the generated connector tree
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,

        /// Show what would be written without touching the filesystem
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Overwrite without keeping backups of previous diagrams and workflows
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
    /// Generate one multi-operation connector for a service
    GenerateMulti {
        /// Service identifier, e.g. gmail
        service: String,

        /// Highest operation tier to include (1-3)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=3))]
        tier: Option<u8>,

        /// Root of the generated connector tree
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,

        /// Show what would be written without touching the filesystem
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Overwrite without keeping backups of previous diagrams and workflows
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
    /// List registered services
    ListNodes,
    /// List the operations of a service
    ListOperations {
        /// Service identifier
        service: String,
    },
    /// Print generated documents without writing them
    Preview {
        /// Service identifier
        service: String,

        /// Operation code or name
        #[arg(short, long, default_value = "send")]
        operation: String,

        /// Only this document (all documents when omitted)
        #[arg(short, long, value_enum)]
        file: Option<PreviewFile>,
    },
    /// Compare a generated connector with an existing one
    Compare {
        /// Service identifier
        service: String,

        /// Operation code or name
        #[arg(short, long, default_value = "send")]
        operation: String,

        /// Directory holding the existing connector files
        #[arg(short, long)]
        existing: PathBuf,
    },
    /// Audit generated element templates and metadata
    Audit {
        /// Connector tree, connector directory or single file
        path: PathBuf,

        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
    /// Build a manifest of every connector under a connector tree
    Manifest {
        /// Root of the connector tree (`<root>/<category>/<connector>/`)
        root: PathBuf,

        /// Write the manifest here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Document selectable with `preview --file`
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PreviewFile {
    Element,
    Workflow,
    Bpmn,
    Readme,
    Metadata,
}

impl PreviewFile {
    fn kind(self) -> DocumentKind {
        match self {
            PreviewFile::Element => DocumentKind::ElementTemplate,
            PreviewFile::Workflow => DocumentKind::Workflow,
            PreviewFile::Bpmn => DocumentKind::ExampleBpmn,
            PreviewFile::Readme => DocumentKind::Readme,
            PreviewFile::Metadata => DocumentKind::Metadata,
        }
    }
}

/// Parse arguments, install logging and execute the command
///
/// Failures are printed in red to stderr, with the valid alternatives for
/// unknown services and operations.
///
/// # Errors
///
/// Returns an error if the config or a catalog cannot be loaded, a lookup
/// fails, generation fails, or `audit --fail-on-error` finds errors.
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let result =
        init_logging(&LogConfig::from_env().verbose(cli.verbose)).and_then(|()| execute(&cli));
    if let Err(err) = &result {
        report_error(err);
    }
    result.map_err(Into::into)
}

/// Print an error in red, followed by the alternatives of a failed lookup
pub fn report_error(err: &anyhow::Error) {
    eprintln!("{}", style(format!("Error: {err:#}")).red());
    let registry_error = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<RegistryError>());
    if let Some(registry_error) = registry_error {
        let (label, available) = match registry_error {
            RegistryError::NodeNotFound { available, .. } => ("services", available),
            RegistryError::OperationNotFound { available, .. } => ("operations", available),
            RegistryError::InvalidSchema { .. } => return,
        };
        eprintln!("Available {label}:");
        for alternative in available {
            eprintln!("  • {alternative}");
        }
    }
}

/// Built-in services plus catalogs from the config file and the command line
fn build_registry(cli: &Cli, config: &GeneratorConfig) -> anyhow::Result<NodeRegistry> {
    let mut registry = NodeRegistry::with_builtin()?;
    for catalog in config.catalogs.iter().chain(&cli.catalogs) {
        registry
            .load_catalog(catalog)
            .with_context(|| format!("Failed to load catalog {}", catalog.display()))?;
    }
    Ok(registry)
}

fn generator_options(
    config: &GeneratorConfig,
    output_dir: Option<&Path>,
    dry_run: bool,
    force: bool,
) -> GeneratorOptions {
    GeneratorOptions::new(output_dir.unwrap_or(&config.output_dir))
        .with_dry_run(dry_run)
        .with_force(force)
        .with_readme_template(config.readme_template.clone())
}

fn print_generated(generated: &GeneratedFiles) {
    if generated.dry_run {
        println!(
            "🔍 {} (dry run, version {})",
            style(&generated.connector_id).yellow(),
            generated.version
        );
        println!("   Would write to {}", generated.directory.display());
    } else {
        println!(
            "✅ Generated {} (version {})",
            style(&generated.connector_id).green(),
            generated.version
        );
        println!("   Directory: {}", generated.directory.display());
    }
    println!("   Files: {}", generated.files.join(", "));
    for backup in &generated.backups {
        println!("   💾 Backup: {}", backup.display());
    }
    for warning in &generated.warnings {
        println!("   ⚠️  {warning}");
    }
}

/// Execute a parsed command
pub fn execute(cli: &Cli) -> anyhow::Result<()> {
    let config = GeneratorConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Generate {
            service,
            operation,
            output_dir,
            dry_run,
            force,
        } => {
            let registry = build_registry(cli, &config)?;
            let schemas = match operation {
                Some(operation) => vec![registry.get_node_operation(service, operation)?.clone()],
                None => registry.get_node_operations(service)?.to_vec(),
            };
            println!(
                "\n🔧 Generating {} connector(s) for {service}...\n",
                schemas.len()
            );

            let opts = generator_options(&config, output_dir.as_deref(), *dry_run, *force);
            let items = generate_connectors(&schemas, &opts);
            let mut failures = Vec::new();
            for item in &items {
                match &item.outcome {
                    Ok(generated) => print_generated(generated),
                    Err(message) => {
                        eprintln!("{}", style(format!("❌ {message}")).red());
                        failures.push(message.clone());
                    }
                }
            }

            let succeeded = items.len() - failures.len();
            println!("\n✨ Done! Generated {succeeded} of {} connector(s).", items.len());
            if !failures.is_empty() {
                anyhow::bail!("{} connector(s) failed to generate", failures.len());
            }
            Ok(())
        }
        Commands::GenerateMulti {
            service,
            tier,
            output_dir,
            dry_run,
            force,
        } => {
            let registry = build_registry(cli, &config)?;
            let max_tier = tier.unwrap_or(config.max_tier);
            let full = registry.extract_node_schema(service)?;
            let schema = full.filter_by_tier(max_tier);
            println!(
                "\n🔧 Generating multi-operation connector for {service}: {} of {} operation(s) up to tier {max_tier}\n",
                schema.operation_count(),
                full.operation_count()
            );
            let opts = generator_options(&config, output_dir.as_deref(), *dry_run, *force);
            let generated = generate_multi_connector(&schema, &opts)?;
            print_generated(&generated);
            Ok(())
        }
        Commands::ListNodes => {
            let registry = build_registry(cli, &config)?;
            println!("\n📦 Available services:\n");
            for node in registry.list_available_nodes() {
                println!("  • {}", style(node).cyan());
            }
            println!();
            Ok(())
        }
        Commands::ListOperations { service } => {
            let registry = build_registry(cli, &config)?;
            let operations = registry.get_node_operations(service)?;
            println!("\n📋 Operations for {service}:\n");
            for op in operations {
                println!(
                    "  • {} ({} {}, tier {})",
                    style(&op.operation).cyan(),
                    op.resource,
                    op.operation_name,
                    crate::registry::classify_operation_tier(&op.parameters)
                );
            }
            println!();
            Ok(())
        }
        Commands::Preview {
            service,
            operation,
            file,
        } => {
            let registry = build_registry(cli, &config)?;
            let schema = registry.get_node_operation(service, operation)?;
            let preview = preview_connector(schema)?;
            println!("\n🔍 Preview: {}\n", style(&preview.connector_id).yellow());
            println!("{}", "═".repeat(60));

            let wanted = file.map(PreviewFile::kind);
            for document in &preview.documents {
                if wanted.is_some_and(|kind| kind != document.kind) {
                    continue;
                }
                println!(
                    "\n📄 {} ({}):\n",
                    style(document.kind.label()).cyan(),
                    document.filename
                );
                println!("{}", document.contents);
            }
            for warning in &preview.warnings {
                println!("⚠️  {warning}");
            }
            Ok(())
        }
        Commands::Compare {
            service,
            operation,
            existing,
        } => {
            let registry = build_registry(cli, &config)?;
            let schema = registry.get_node_operation(service, operation)?;
            println!("\n📊 Comparing: {}\n", schema.connector_id());

            let comparison = compare_connector(schema, existing)?;
            for (label, unit, pair) in [
                ("Element Template", "properties", &comparison.element),
                ("n8n Workflow", "nodes", &comparison.workflow),
            ] {
                match pair {
                    Some(pair) => {
                        let marker = if pair.matches() { "✅" } else { "⚠️ " };
                        println!("{marker} {label}");
                        println!("   Generated {unit}: {}", pair.generated);
                        println!("   Existing {unit}:  {}", pair.existing);
                    }
                    None => println!("➖ {label}: no existing file in {}", existing.display()),
                }
            }
            Ok(())
        }
        Commands::Audit {
            path,
            fail_on_error,
            errors_only,
        } => {
            println!("🔍 Auditing {}...", path.display());
            let report = audit_directory(path)?;
            let shown: Vec<_> = if *errors_only {
                report
                    .issues
                    .iter()
                    .filter(|i| i.severity == Severity::Error)
                    .cloned()
                    .collect()
            } else {
                report.issues.clone()
            };
            print_audit_issues(&shown);
            println!("Checked {} file(s)", report.files_checked);

            if *fail_on_error && report.has_errors() {
                anyhow::bail!("Audit found {} error(s)", report.error_count());
            }
            Ok(())
        }
        Commands::Manifest { root, output } => {
            let report = build_manifest(root)?;
            for skipped in &report.skipped {
                eprintln!(
                    "{}",
                    style(format!("⚠️  Skipped {}: {}", skipped.path.display(), skipped.reason))
                        .yellow()
                );
            }
            match output {
                Some(output) => {
                    write_manifest(&report.manifest, output)?;
                    println!(
                        "✅ Manifest with {} connector(s) written to {}",
                        report.manifest.stats.total_connectors,
                        output.display()
                    );
                }
                None => println!("{}", serde_json::to_string_pretty(&report.manifest)?),
            }
            Ok(())
        }
    }
}
