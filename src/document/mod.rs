//! Documents, steps, and the ordered step collection

mod collection;
mod step;

pub use collection::{ArgBinding, MoveDirection, MoveOutcome, StepCollection};
pub use step::{Document, RunStatus, Step, StepId, StepInstanceValue, StepType, StepValues};
