//! Runbook - data model for runnable step documents
//!
//! A runbook document is an ordered sequence of steps: rendered markdown,
//! forms defined by an embedded field list, and runnable scripts whose
//! arguments bind to upstream form fields. Required steps gate everything
//! after them until completed.
//!
//! - [`document`] owns the step types and the ordered
//!   [`document::StepCollection`] with its reorder/delete/gating operations.
//! - [`fields`] holds the field definitions and the [`fields::codec`] for
//!   the JSON field list embedded in a form step's content.
//! - [`outline`] derives a navigable heading outline from markdown steps.
//! - [`selection`], [`store`], [`config`], and [`logging`] support the CLI
//!   and embedding applications.

pub mod config;
pub mod document;
pub mod error;
pub mod fields;
pub mod logging;
pub mod outline;
pub mod selection;
pub mod store;

pub use error::ModelError;
