//! Component schemas.
//!
//! - [`model`] - typed schema, field and category definitions
//! - [`validator`] - structural checks over raw schema JSON
//! - [`catalog`] - factories for every known component
//! - [`store`] - the on-disk `bloks/` and `nested/` store

pub mod catalog;
pub mod model;
pub mod store;
pub mod validator;
