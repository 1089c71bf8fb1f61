//! Autofill planning: which value goes into which element, and which events follow.

use serde::{Deserialize, Serialize};

use crate::models::field::CandidateField;
use crate::models::page::ElementHandle;

/// Notification the driver dispatches after assigning a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillEvent {
    Focus,
    Input,
    Change,
    KeyUp,
    Blur,
}

impl FillEvent {
    /// DOM event type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FillEvent::Focus => "focus",
            FillEvent::Input => "input",
            FillEvent::Change => "change",
            FillEvent::KeyUp => "keyup",
            FillEvent::Blur => "blur",
        }
    }
}

/// Events emitted for every filled element, in order.
pub const FILL_EVENTS: [FillEvent; 5] = [
    FillEvent::Focus,
    FillEvent::Input,
    FillEvent::Change,
    FillEvent::KeyUp,
    FillEvent::Blur,
];

/// Assignment of one value to one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillStep {
    pub handle: ElementHandle,
    pub value: String,
}

/// Ordered assignments for filling a code into a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillPlan {
    pub steps: Vec<FillStep>,
}

impl FillPlan {
    /// Plan the fill of `code` into `field`.
    ///
    /// A single field takes the whole code. A segmented field takes one
    /// character per box in order; boxes past the end of the code are left
    /// alone and characters past the last box are dropped.
    pub fn new(field: &CandidateField, code: &str) -> Self {
        if code.is_empty() {
            return Self::default();
        }

        let steps = match field {
            CandidateField::Single { handle } => vec![FillStep {
                handle: *handle,
                value: code.to_string(),
            }],
            CandidateField::Segmented { handles } => handles
                .iter()
                .zip(code.chars())
                .map(|(handle, ch)| FillStep {
                    handle: *handle,
                    value: ch.to_string(),
                })
                .collect(),
        };

        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Events to dispatch after each assignment.
    pub fn events(&self) -> &'static [FillEvent] {
        &FILL_EVENTS
    }
}
