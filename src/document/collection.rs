//! Ordered step collection: reordering, deletion, and completion gating

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::document::step::{Step, StepId, StepType, StepValues};
use crate::error::ModelError;
use crate::fields::{codec, Field};

/// Direction for [`StepCollection::move_step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Towards the start of the document
    Up,
    /// Towards the end of the document
    Down,
}

/// Result of a move request.
///
/// Moving the first step up or the last step down is a reachable, harmless
/// user action, so it reports a boundary instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The step swapped places with its neighbor
    Moved,
    /// The step was already at the edge; nothing changed
    AtBoundary,
}

/// One entry of a script step's `args`, resolved against upstream fields
#[derive(Debug, Clone, PartialEq)]
pub struct ArgBinding {
    /// Field name as recorded on the script step
    pub name: String,
    /// First upstream field with a matching name, if any
    pub field: Option<Field>,
}

/// The ordered steps of one document.
///
/// Position is document order; there is no separate order key. All
/// operations look steps up by id and report [`ModelError::StepNotFound`]
/// rather than panicking when the id does not resolve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct StepCollection {
    steps: Vec<Step>,
}

impl StepCollection {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    pub fn as_slice(&self) -> &[Step] {
        &self.steps
    }

    /// Append a step at the end of the document
    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Step at the given document position
    pub fn get(&self, position: usize) -> Option<&Step> {
        self.steps.get(position)
    }

    /// Document position of a step, if present
    pub fn position(&self, id: StepId) -> Option<usize> {
        self.steps.iter().position(|s| s.id == id)
    }

    /// Step with the given id, if present
    pub fn step(&self, id: StepId) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    fn index_of(&self, id: StepId) -> Result<usize, ModelError> {
        self.position(id).ok_or(ModelError::StepNotFound(id))
    }

    /// Swap a step with its immediate neighbor in the given direction.
    ///
    /// All other relative orderings are preserved. Moving past the first or
    /// last position reports [`MoveOutcome::AtBoundary`] and changes nothing.
    pub fn move_step(
        &mut self,
        id: StepId,
        direction: MoveDirection,
    ) -> Result<MoveOutcome, ModelError> {
        let index = self.index_of(id)?;
        let target = match direction {
            MoveDirection::Up => {
                if index == 0 {
                    return Ok(MoveOutcome::AtBoundary);
                }
                index - 1
            }
            MoveDirection::Down => {
                if index + 1 >= self.steps.len() {
                    return Ok(MoveOutcome::AtBoundary);
                }
                index + 1
            }
        };

        self.steps.swap(index, target);
        tracing::debug!(step = %id, from = index, to = target, "moved step");
        Ok(MoveOutcome::Moved)
    }

    /// Remove a step and return it.
    ///
    /// The caller is responsible for clearing any selection pointing at the
    /// removed step.
    pub fn delete_step(&mut self, id: StepId) -> Result<Step, ModelError> {
        let index = self.index_of(id)?;
        let step = self.steps.remove(index);
        tracing::debug!(step = %id, position = index, "deleted step");
        Ok(step)
    }

    /// Flip a step's `required` flag and return the new value.
    ///
    /// Only affects the gating of *subsequent* steps; a step's own frozen
    /// state depends solely on the steps before it.
    pub fn toggle_required(&mut self, id: StepId) -> Result<bool, ModelError> {
        let index = self.index_of(id)?;
        let step = &mut self.steps[index];
        step.required = !step.required;
        Ok(step.required)
    }

    /// Derive the frozen state of every step from the completion of its
    /// required predecessors.
    ///
    /// A step is frozen iff some earlier step is required and not completed.
    /// The first step is never frozen. This is a pure function of
    /// `(steps, values)`; callers re-derive it after any mutation instead of
    /// caching the result.
    pub fn compute_frozen(&self, values: &StepValues) -> HashMap<StepId, bool> {
        let mut frozen = HashMap::with_capacity(self.steps.len());
        let mut blocked = false;

        for step in &self.steps {
            frozen.insert(step.id, blocked);
            let completed = values.get(&step.id).is_some_and(|v| v.completed);
            if step.required && !completed {
                blocked = true;
            }
        }

        frozen
    }

    /// Set the completion flag in a step's instance value.
    ///
    /// Does not recompute frozen state for other steps; callers re-derive it
    /// via [`Self::compute_frozen`].
    pub fn update_completed(
        &self,
        values: &mut StepValues,
        id: StepId,
        completed: bool,
    ) -> Result<(), ModelError> {
        self.index_of(id)?;
        values.entry(id).or_default().completed = completed;
        Ok(())
    }

    /// Replace a step's content: the write path for editor updates, form
    /// field edits included (re-encoded field lists land here).
    pub fn update_content(
        &mut self,
        id: StepId,
        content: impl Into<String>,
    ) -> Result<(), ModelError> {
        let index = self.index_of(id)?;
        self.steps[index].content = content.into();
        Ok(())
    }

    /// Replace a script step's argument list
    pub fn update_args(&mut self, id: StepId, args: Vec<String>) -> Result<(), ModelError> {
        let index = self.script_index(id)?;
        self.steps[index].args = args;
        Ok(())
    }

    /// Field definitions of every form step preceding a script step, in
    /// document order. Only fields with a non-empty `name` are usable as
    /// script arguments, so unnamed fields are filtered out.
    pub fn upstream_form_fields(
        &self,
        script_id: StepId,
    ) -> Result<Vec<(StepId, Vec<Field>)>, ModelError> {
        let index = self.script_index(script_id)?;

        let mut groups = Vec::new();
        for step in &self.steps[..index] {
            if step.step_type != StepType::Form {
                continue;
            }
            let named: Vec<Field> = codec::decode(&step.content)?
                .into_iter()
                .filter(|f| !f.name.is_empty())
                .collect();
            groups.push((step.id, named));
        }
        Ok(groups)
    }

    /// Resolve each entry of a script step's `args` to its upstream field
    /// definition. Dangling names resolve to `None`.
    ///
    /// Known limitation: when several upstream fields share a name, the
    /// first match in document order wins.
    pub fn resolved_args(&self, script_id: StepId) -> Result<Vec<ArgBinding>, ModelError> {
        let index = self.script_index(script_id)?;
        let groups = self.upstream_form_fields(script_id)?;

        let bindings = self.steps[index]
            .args
            .iter()
            .map(|name| ArgBinding {
                name: name.clone(),
                field: groups
                    .iter()
                    .flat_map(|(_, fields)| fields.iter())
                    .find(|f| &f.name == name)
                    .cloned(),
            })
            .collect();
        Ok(bindings)
    }

    fn script_index(&self, id: StepId) -> Result<usize, ModelError> {
        let index = self.index_of(id)?;
        if self.steps[index].step_type != StepType::Script {
            return Err(ModelError::WrongStepType {
                id,
                expected: "script",
            });
        }
        Ok(index)
    }
}

impl<'a> IntoIterator for &'a StepCollection {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
