//! # blokgen
//!
//! Generation pipeline for Storyblok-backed Next.js sites.
//!
//! `blokgen` turns declarative component schemas into CMS component
//! definitions, React component scaffolds and a registration manifest, pushes
//! schemas to the CMS and runs an advisory review over the consuming app.
//!
//! ## Modules
//!
//! - [`schema`] - Schema model, validator, catalog and file store
//! - [`scaffold`] - React component and manifest generation
//! - [`push`] - Webhook and management API transports
//! - [`review`] - Type-check and lint runner
//! - [`orchestrate`] - Validate, scaffold, push and review workflow
//! - [`generate`] - Catalog-driven schema generation
//! - [`testbed`] - Test payloads and pages for components
//! - [`story`] - Content API story inspection
//! - [`config`] - `.blokgen.toml` settings
//! - [`ctx`] - Application context and state management
//! - [`utils`] - Common utilities and helper functions
//!
//! ## Example
//!
//! ```rust,no_run
//! // blokgen is primarily used as a CLI tool
//! // See `blokgen --help` for the available commands
//! ```

/// Tool configuration types.
pub mod config;

/// Application context and state management.
pub mod ctx;

/// Catalog-driven schema generation.
pub mod generate;

/// Validate, scaffold, push and review workflow.
pub mod orchestrate;

/// Remote schema push.
///
/// Delivers stored schemas through a webhook or the management API.
pub mod push;

/// Advisory type-check and lint review.
pub mod review;

/// React component and registration manifest generation.
pub mod scaffold;

/// Component schemas and their storage.
pub mod schema;

/// Content API story inspection.
pub mod story;

/// Test payloads and pages for scaffolded components.
pub mod testbed;

/// Common utilities and helper functions.
pub mod utils;

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;
