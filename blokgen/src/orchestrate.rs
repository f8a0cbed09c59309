//! End-to-end component workflow.
//!
//! The orchestrator walks `ValidateSchema -> Scaffold -> Push -> Review`.
//! Validation and scaffolding failures stop the run. A failed push marks the
//! run unsuccessful but review still runs. Review findings are advisory only.

use std::{fmt, future::Future};

use colored::Colorize;

use crate::{
    config::PushMethod,
    ctx::AppContext,
    push::{PushClient, PushOptions, PushOutcome},
    review::{ReviewResult, ReviewRunner},
    scaffold::ScaffoldReport,
    schema::validator::{ValidationError, validate_schema_file},
};

/// Workflow states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ValidateSchema,
    Scaffold,
    Push,
    Review,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::ValidateSchema => "validate",
            Stage::Scaffold => "scaffold",
            Stage::Push => "push",
            Stage::Review => "review",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Per-run switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrchestrateOptions {
    pub skip_validation: bool,
    pub skip_component: bool,
    pub skip_push: bool,
    pub skip_code_review: bool,
    pub push_method: PushMethod,
}

/// The work behind each stage.
pub trait Stages {
    fn exists(&self, name: &str) -> bool;
    fn validate(&mut self, name: &str) -> Vec<ValidationError>;
    fn scaffold(&mut self, name: &str) -> anyhow::Result<ScaffoldReport>;
    fn push(&mut self, name: &str, method: PushMethod) -> impl Future<Output = PushOutcome>;
    fn review(&mut self, name: &str) -> ReviewResult;
}

/// Outcome of one orchestrated run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestrationReport {
    pub final_state: Stage,
    pub success: bool,
    pub push: Option<PushOutcome>,
    pub review: Option<ReviewResult>,
}

impl OrchestrationReport {
    fn failed() -> Self {
        Self {
            final_state: Stage::Failed,
            success: false,
            push: None,
            review: None,
        }
    }
}

fn skipping(what: &str) {
    println!("   {} {what}", "skipping".yellow());
}

/// Drives a component through the workflow.
pub struct Orchestrator<S> {
    stages: S,
}

impl<S: Stages> Orchestrator<S> {
    pub fn new(stages: S) -> Self {
        Self { stages }
    }

    pub fn into_stages(self) -> S {
        self.stages
    }

    pub async fn run(&mut self, name: &str, options: OrchestrateOptions) -> OrchestrationReport {
        println!("{}", format!("Orchestrating workflow for: {name}").bold().cyan());

        if !self.stages.exists(name) {
            println!("{} Schema not found: {name}.json", "error:".red());
            println!("   Generate it first with: blokgen generate-schema {name}");
            return OrchestrationReport::failed();
        }

        let mut report = OrchestrationReport {
            final_state: Stage::ValidateSchema,
            success: true,
            push: None,
            review: None,
        };

        let mut state = Stage::ValidateSchema;
        loop {
            debug!("'{name}' entering stage {state}");
            state = match state {
                Stage::ValidateSchema => {
                    if options.skip_validation {
                        skipping("validation");
                        Stage::Scaffold
                    } else {
                        println!("{}", "Step 1: validating schema".bold());
                        let errors = self.stages.validate(name);
                        if errors.is_empty() {
                            println!("   {}", "Validation passed".green());
                            Stage::Scaffold
                        } else {
                            println!("   {}", "Schema validation failed:".red());
                            for (i, e) in errors.iter().enumerate() {
                                println!("   {}. {e}", i + 1);
                            }
                            Stage::Failed
                        }
                    }
                }
                Stage::Scaffold => {
                    if options.skip_component {
                        skipping("component generation");
                        Stage::Push
                    } else {
                        println!("{}", "Step 2: generating React component".bold());
                        match self.stages.scaffold(name) {
                            Ok(_) => Stage::Push,
                            Err(e) => {
                                println!("   {} {e:#}", "Component generation failed:".red());
                                Stage::Failed
                            }
                        }
                    }
                }
                Stage::Push => {
                    if options.skip_push {
                        skipping("push");
                    } else {
                        println!("{}", "Step 3: pushing to the CMS".bold());
                        let outcome = self.stages.push(name, options.push_method).await;
                        if outcome.success {
                            outcome.print();
                        } else {
                            println!("   {} {}", "Push failed:".red(), outcome.message);
                            report.success = false;
                        }
                        report.push = Some(outcome);
                    }
                    Stage::Review
                }
                Stage::Review => {
                    if options.skip_code_review {
                        skipping("code review");
                    } else {
                        println!("{}", "Step 4: running code review".bold());
                        let review = self.stages.review(name);
                        if !review.success {
                            println!(
                                "   {}",
                                "Code review found issues. Fix them before deploying.".yellow()
                            );
                        }
                        report.review = Some(review);
                    }
                    Stage::Done
                }
                Stage::Done | Stage::Failed => break,
            };
        }

        report.final_state = state;
        if state == Stage::Failed {
            report.success = false;
        }
        if report.success {
            println!("{}", "Workflow completed successfully".green().bold());
        } else {
            println!("{}", format!("Workflow for {name} did not succeed").red().bold());
        }
        report
    }
}

/// Real stages backed by the store, scaffolder, push client and review runner.
pub struct PipelineStages<'a> {
    ctx: &'a AppContext,
    push: PushClient<'a>,
}

impl<'a> PipelineStages<'a> {
    pub fn new(ctx: &'a AppContext) -> anyhow::Result<Self> {
        Ok(Self {
            ctx,
            push: PushClient::new(&ctx.settings.push, ctx.store())?,
        })
    }
}

impl Stages for PipelineStages<'_> {
    fn exists(&self, name: &str) -> bool {
        self.ctx.store().exists(name)
    }

    fn validate(&mut self, name: &str) -> Vec<ValidationError> {
        validate_schema_file(name, self.ctx.store()).errors
    }

    fn scaffold(&mut self, name: &str) -> anyhow::Result<ScaffoldReport> {
        let schema = self.ctx.store().load(name)?.value;
        self.ctx.scaffolder().scaffold(&schema)
    }

    async fn push(&mut self, name: &str, method: PushMethod) -> PushOutcome {
        let options = PushOptions {
            validate: false,
            method,
        };
        self.push.push(name, options).await
    }

    fn review(&mut self, name: &str) -> ReviewResult {
        ReviewRunner::new(self.ctx).run(Some(name))
    }
}
