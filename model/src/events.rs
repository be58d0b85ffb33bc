//! Change notification.
//!
//! Listeners are registered on a model instance with
//! [`Model::add_listener`](crate::Model::add_listener) and are called
//! synchronously, in registration order, after each committed change.
//! A listener must not call back into the model that notified it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::concept::ConceptId;
use crate::constraint::ConstraintId;
use crate::identifier::Identifier;

/// A committed change to a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    /// A child concept was created.
    ChildAdded {
        /// The parent.
        parent: ConceptId,
        /// The new child.
        child: ConceptId,
    },
    /// A concept was given a new identity.
    ConceptRenamed {
        /// The renamed concept.
        concept: ConceptId,
        /// Its identity before the rename.
        previous: Identifier,
    },
    /// A concept was re-parented.
    ConceptMoved {
        /// The moved concept.
        concept: ConceptId,
        /// The parent it was detached from.
        from: ConceptId,
        /// The parent it now hangs under.
        to: ConceptId,
    },
    /// A concept was deleted. The handle is no longer live.
    ConceptRemoved {
        /// The removed concept.
        concept: ConceptId,
        /// Its identity at removal time.
        identity: Identifier,
    },
    /// A constraint was attached to its source concept.
    ConstraintAdded {
        /// The source concept.
        source: ConceptId,
        /// The new constraint.
        constraint: ConstraintId,
    },
    /// Some target values of a constraint were removed with their concepts.
    /// The constraint keeps its handle and its remaining targets.
    ConstraintChanged {
        /// The source concept it is attached to.
        source: ConceptId,
        /// The pruned constraint.
        constraint: ConstraintId,
    },
    /// A constraint was deleted. The handle is no longer live.
    ConstraintRemoved {
        /// The source concept it was attached to.
        source: ConceptId,
        /// The removed constraint.
        constraint: ConstraintId,
    },
    /// The model became dirty (has unsaved changes).
    ModelUpdated,
}

/// Receives model change notifications. All callbacks default to no-ops.
pub trait ModelListener {
    /// A child concept was created under `parent`.
    fn on_child_added(&mut self, _parent: ConceptId, _child: ConceptId) {}

    /// `concept` was renamed away from `previous`.
    fn on_concept_renamed(&mut self, _concept: ConceptId, _previous: &Identifier) {}

    /// `concept` moved from `from` to `to`.
    fn on_concept_moved(&mut self, _concept: ConceptId, _from: ConceptId, _to: ConceptId) {}

    /// `concept` (formerly `identity`) was removed.
    fn on_concept_removed(&mut self, _concept: ConceptId, _identity: &Identifier) {}

    /// `constraint` was attached to `source`.
    fn on_constraint_added(&mut self, _source: ConceptId, _constraint: ConstraintId) {}

    /// `constraint`, attached to `source`, lost some of its targets.
    fn on_constraint_changed(&mut self, _source: ConceptId, _constraint: ConstraintId) {}

    /// `constraint` was detached from `source` and deleted.
    fn on_constraint_removed(&mut self, _source: ConceptId, _constraint: ConstraintId) {}

    /// The model has unsaved changes.
    fn on_model_update(&mut self) {}
}

pub(crate) fn dispatch(listener: &mut dyn ModelListener, event: &ModelEvent) {
    match event {
        ModelEvent::ChildAdded { parent, child } => listener.on_child_added(*parent, *child),
        ModelEvent::ConceptRenamed { concept, previous } => {
            listener.on_concept_renamed(*concept, previous);
        }
        ModelEvent::ConceptMoved { concept, from, to } => {
            listener.on_concept_moved(*concept, *from, *to);
        }
        ModelEvent::ConceptRemoved { concept, identity } => {
            listener.on_concept_removed(*concept, identity);
        }
        ModelEvent::ConstraintAdded { source, constraint } => {
            listener.on_constraint_added(*source, *constraint);
        }
        ModelEvent::ConstraintChanged { source, constraint } => {
            listener.on_constraint_changed(*source, *constraint);
        }
        ModelEvent::ConstraintRemoved { source, constraint } => {
            listener.on_constraint_removed(*source, *constraint);
        }
        ModelEvent::ModelUpdated => listener.on_model_update(),
    }
}

/// A listener that records every event into a shared buffer.
///
/// Clones share the buffer, so one clone can be handed to the model while
/// the caller keeps another to inspect.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<ModelEvent>>>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<ModelEvent> {
        self.events.borrow().clone()
    }

    /// Removes and returns the recorded events.
    pub fn take(&self) -> Vec<ModelEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    fn record(&self, event: ModelEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl ModelListener for EventLog {
    fn on_child_added(&mut self, parent: ConceptId, child: ConceptId) {
        self.record(ModelEvent::ChildAdded { parent, child });
    }

    fn on_concept_renamed(&mut self, concept: ConceptId, previous: &Identifier) {
        self.record(ModelEvent::ConceptRenamed {
            concept,
            previous: previous.clone(),
        });
    }

    fn on_concept_moved(&mut self, concept: ConceptId, from: ConceptId, to: ConceptId) {
        self.record(ModelEvent::ConceptMoved { concept, from, to });
    }

    fn on_concept_removed(&mut self, concept: ConceptId, identity: &Identifier) {
        self.record(ModelEvent::ConceptRemoved {
            concept,
            identity: identity.clone(),
        });
    }

    fn on_constraint_added(&mut self, source: ConceptId, constraint: ConstraintId) {
        self.record(ModelEvent::ConstraintAdded { source, constraint });
    }

    fn on_constraint_changed(&mut self, source: ConceptId, constraint: ConstraintId) {
        self.record(ModelEvent::ConstraintChanged { source, constraint });
    }

    fn on_constraint_removed(&mut self, source: ConceptId, constraint: ConstraintId) {
        self.record(ModelEvent::ConstraintRemoved { source, constraint });
    }

    fn on_model_update(&mut self) {
        self.record(ModelEvent::ModelUpdated);
    }
}
