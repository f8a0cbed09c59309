use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use blokgen::{
    config::{PushMethod, Settings},
    ctx::AppContext,
    generate::{self, GenerateOptions},
    orchestrate::{OrchestrateOptions, Orchestrator, PipelineStages},
    push::{PushClient, PushOptions},
    schema::validator,
    story, testbed,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::debug;

#[derive(Parser)]
#[command(name = "blokgen", version, about = "Storyblok component generation pipeline")]
struct Cli {
    /// Config file, defaults to `.blokgen.toml` in the workspace.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Workspace root, defaults to the current directory.
    #[arg(short, long, global = true)]
    workspace: Option<PathBuf>,
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: SubCommands,
}

#[derive(Subcommand)]
enum SubCommands {
    #[command(flatten)]
    Pipeline(PipelineCommand),
    /// Print the JSON Schema of the config file.
    ConfigSchema,
}

/// Commands operating on a workspace.
#[derive(Subcommand)]
enum PipelineCommand {
    /// Write a catalog schema (and its nested dependencies).
    GenerateSchema {
        /// Block name, snake or kebab case.
        name: String,
        /// Display name for generic sections.
        display_name: Option<String>,
        /// Design URL carrying a `node-id` query parameter.
        #[arg(long)]
        figma_url: Option<String>,
        /// Do not run the workflow on the written schemas.
        #[arg(long)]
        no_orchestrate: bool,
        /// Overwrite existing schema files.
        #[arg(long)]
        force: bool,
        #[arg(long, value_enum)]
        push_method: Option<PushMethod>,
    },
    /// Scaffold React files for a stored schema.
    GenerateComponent { name: String },
    /// Validate a stored schema and its generated files.
    ValidateSchema { name: String },
    /// Write a test page for a scaffolded component.
    TestComponent { name: String },
    /// Push one schema, or all of them, to the CMS.
    PushSchema {
        #[arg(required_unless_present = "all")]
        name: Option<String>,
        #[arg(long, conflicts_with = "name")]
        all: bool,
        #[arg(long, value_enum)]
        method: Option<PushMethod>,
        /// Skip validation before pushing.
        #[arg(long)]
        no_validate: bool,
    },
    /// Validate, scaffold, push and review one component.
    Orchestrate {
        name: String,
        #[arg(long)]
        skip_validation: bool,
        #[arg(long)]
        skip_component: bool,
        #[arg(long)]
        skip_push: bool,
        #[arg(long)]
        skip_code_review: bool,
        #[arg(long, value_enum)]
        push_method: Option<PushMethod>,
    },
    /// Check a story's block types against the registration manifest.
    InspectStory {
        slug: String,
        #[arg(long)]
        draft: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "info" }),
    )
    .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            println!("{} {e:#}", "error:".red());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let command = match cli.command {
        SubCommands::ConfigSchema => {
            println!("{}", Settings::json_schema()?);
            return Ok(true);
        }
        SubCommands::Pipeline(command) => command,
    };

    let workspace = match cli.workspace {
        Some(w) => w,
        None => std::env::current_dir().context("can not read current directory")?,
    };
    let settings = Settings::load(cli.config.as_deref(), &workspace)?;
    let ctx = AppContext::new(&workspace, settings, cli.verbose);
    debug!("Schemas root: {}", ctx.paths.schemas_root.display());
    debug!("App root: {}", ctx.paths.app_root.display());

    let default_method = ctx.settings.push.method;

    match command {
        PipelineCommand::GenerateSchema {
            name,
            display_name,
            figma_url,
            no_orchestrate,
            force,
            push_method,
        } => {
            println!("{}", format!("Generating schema for: {name}").bold());
            let options = GenerateOptions {
                display_name,
                design_url: figma_url,
                force,
            };
            let written = generate::generate_schemas(&ctx, &name, &options)?;
            if no_orchestrate {
                return Ok(true);
            }
            let options = OrchestrateOptions {
                push_method: push_method.unwrap_or(default_method),
                ..Default::default()
            };
            let mut orchestrator = Orchestrator::new(PipelineStages::new(&ctx)?);
            let mut ok = true;
            for g in written {
                ok &= orchestrator.run(&g.name, options).await.success;
            }
            Ok(ok)
        }
        PipelineCommand::GenerateComponent { name } => generate_component(&ctx, &name),
        PipelineCommand::ValidateSchema { name } => Ok(validate_schema(&ctx, &name)),
        PipelineCommand::TestComponent { name } => {
            let report = testbed::run(&ctx, &name)?;
            Ok(report.all_accessible())
        }
        PipelineCommand::PushSchema {
            name,
            all,
            method,
            no_validate,
        } => {
            let client = PushClient::new(&ctx.settings.push, ctx.store())?;
            let options = PushOptions {
                validate: !no_validate,
                method: method.unwrap_or(default_method),
            };
            if all {
                let summary = client.push_all(options).await?;
                return Ok(summary.failed == 0);
            }
            let name = name.unwrap_or_default();
            println!("{}", format!("Pushing schema: {name}").bold());
            let outcome = client.push(&name, options).await;
            outcome.print();
            Ok(outcome.success)
        }
        PipelineCommand::Orchestrate {
            name,
            skip_validation,
            skip_component,
            skip_push,
            skip_code_review,
            push_method,
        } => {
            let options = OrchestrateOptions {
                skip_validation,
                skip_component,
                skip_push,
                skip_code_review,
                push_method: push_method.unwrap_or(default_method),
            };
            let mut orchestrator = Orchestrator::new(PipelineStages::new(&ctx)?);
            Ok(orchestrator.run(&name, options).await.success)
        }
        PipelineCommand::InspectStory { slug, draft } => {
            let report = story::inspect(&ctx, &slug, draft).await?;
            if report.unregistered.is_empty() {
                println!("{}", "Every block type is registered".green());
                Ok(true)
            } else {
                println!(
                    "{} {}",
                    "Unregistered block types:".red(),
                    report.unregistered.join(", ")
                );
                Ok(false)
            }
        }
    }
}

fn generate_component(ctx: &AppContext, name: &str) -> anyhow::Result<bool> {
    let schema = ctx.store().load(name)?.value;
    println!("{}", format!("Generating React component for: {name}").bold());
    println!("   Display Name: {}", schema.display_name);

    let scaffolder = ctx.scaffolder();
    let report = scaffolder.scaffold(&schema)?;
    if report.created.is_empty() {
        println!(
            "   {}",
            "Component already exists. Delete the files to regenerate.".yellow()
        );
    } else {
        let paths = scaffolder.paths(name);
        println!("{}", "Component generation complete".green());
        println!("   Next: implement {}", rel(&ctx.paths.workspace, &paths.presentational));
        println!("   Next: style {}", rel(&ctx.paths.workspace, &paths.stylesheet));
    }
    Ok(true)
}

fn validate_schema(ctx: &AppContext, name: &str) -> bool {
    println!("{}", format!("Validating schema: {name}").bold());
    let mut problems: Vec<String> = validator::validate_schema_file(name, ctx.store())
        .errors
        .iter()
        .map(ToString::to_string)
        .collect();

    if let Ok(stored) = ctx.store().load(name) {
        println!("   Display Name: {}", stored.value.display_name);
        println!("   Fields: {}", stored.value.fields.len());
        problems.extend(ctx.scaffolder().check_component_files(name).problems());
    }

    if problems.is_empty() {
        println!("{}", "Schema validation passed".green());
        println!("   schema structure and field types are valid");
        println!("   React components exist and are registered");
        println!("   nested components exist");
        true
    } else {
        println!("{}", "Schema validation failed:".red());
        for (i, p) in problems.iter().enumerate() {
            println!("   {}. {p}", i + 1);
        }
        false
    }
}

fn rel(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_schema_is_top_level() {
        let cli = Cli::try_parse_from(["blokgen", "config-schema"]).unwrap();
        assert!(matches!(cli.command, SubCommands::ConfigSchema));

        let cli = Cli::try_parse_from(["blokgen", "push-schema", "--all"]).unwrap();
        assert!(matches!(
            cli.command,
            SubCommands::Pipeline(PipelineCommand::PushSchema { all: true, .. })
        ));
        assert!(Cli::try_parse_from(["blokgen", "push-schema"]).is_err());
    }
}
