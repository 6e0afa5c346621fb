//! soap-proxygen: generation driver CLI
//!
//! Runs the proxy generation batch over a JSON schema of annotated
//! remote-object interfaces and reports the planned classes.
//!
//! ## Example Usage
//!
//! ```bash
//! # Plan proxies for every interface in the schema
//! soap-proxygen generate --schema api.json
//!
//! # Machine-readable plan output
//! soap-proxygen generate --schema api.json --json
//!
//! # Validate the schema without printing plans
//! soap-proxygen check --schema api.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use soap_codegen::driver::{generate, GenConfig, DEFAULT_NAMESPACE};
use soap_codegen::schema::SchemaRegistry;

#[derive(Parser)]
#[command(
    name = "soap-proxygen",
    author,
    version,
    about = "Proxy generation for a message-based remote-object protocol",
    long_about = "Extracts annotated interface definitions, plans client proxy classes,\n\
                  and reports generation errors per interface."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a generation batch and print the planned proxy classes
    Generate {
        /// Schema file with interfaces, enums, and composites
        #[arg(long)]
        schema: PathBuf,

        /// Service namespace for wire operations
        #[arg(long, default_value = DEFAULT_NAMESPACE)]
        namespace: String,

        /// Emit the full plans as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Validate the schema: exit nonzero if any interface fails generation
    Check {
        /// Schema file with interfaces, enums, and composites
        #[arg(long)]
        schema: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Generate {
            schema,
            namespace,
            json,
        } => {
            let registry = SchemaRegistry::load(&schema)?;
            let outcome = generate(&registry, &GenConfig::new(namespace));

            if json {
                let classes: Vec<&soap_model::ProxyClass> =
                    outcome.registry.iter().map(|c| c.as_ref()).collect();
                println!("{}", serde_json::to_string_pretty(&classes)?);
            } else {
                for class in outcome.registry.iter() {
                    let extends = class
                        .extends
                        .as_deref()
                        .map(|base| format!(" : {}", base))
                        .unwrap_or_default();
                    println!(
                        "{}{} ({} methods, {} cache slots)",
                        class.interface,
                        extends,
                        class.methods.len(),
                        class.slots.len()
                    );
                }
            }

            report_errors(&outcome.errors);
            Ok(exit_for(outcome.errors.is_empty()))
        }
        Commands::Check { schema } => {
            let registry = SchemaRegistry::load(&schema)?;
            let outcome = generate(&registry, &GenConfig::default());
            println!(
                "{} of {} interface(s) planned",
                outcome.registry.len(),
                registry.interface_count()
            );
            report_errors(&outcome.errors);
            Ok(exit_for(outcome.errors.is_empty()))
        }
    }
}

fn report_errors(errors: &[soap_codegen::GenError]) {
    for err in errors {
        eprintln!("error[{}]: {}", err.interface(), err);
    }
}

fn exit_for(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
