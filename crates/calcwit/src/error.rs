use thiserror::Error;

use crate::arena::{ComponentId, ComponentState};
use crate::dispatch::TemplateId;

pub type Result<T> = std::result::Result<T, WitnessError>;

/// Runtime state the compiled component graph should never produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphDefect {
    #[error("pending-input counter decremented past zero")]
    CounterUnderflow,
    #[error("triggered while {0:?}")]
    AlreadyTriggered(ComponentState),
    #[error("triggered with {0} inputs still pending")]
    PendingInputs(u32),
    #[error("input written after the component started ({0:?})")]
    InputAfterStart(ComponentState),
    #[error("local signal {signal} is not in the input block {start}..{end}")]
    NotAnInput { signal: usize, start: usize, end: usize },
    #[error("subcomponent slot {slot} is not allocated")]
    UnallocatedSubcomponent { slot: usize },
    #[error("subcomponent slot {slot} out of range (template declares {slots})")]
    SubcomponentSlotOutOfRange { slot: usize, slots: usize },
    #[error("no dispatch entry for template {0}")]
    UnknownTemplate(TemplateId),
    #[error("component handle already created")]
    DuplicateComponent,
    #[error("component handle beyond the declared {limit} components")]
    ComponentOutOfRange { limit: usize },
    #[error("component handle was never created")]
    UnknownComponent,
    #[error("released while {0:?}")]
    ReleasedEarly(ComponentState),
    #[error("signal {signal} read before it was written")]
    UnwrittenSignal { signal: usize },
}

#[derive(Debug, Error)]
pub enum WitnessError {
    #[error("graph defect in component {component} ({label}): {defect}")]
    GraphDefect {
        component: ComponentId,
        label: String,
        defect: GraphDefect,
    },

    #[error("assert failed in template {template} ({label}), line {line}")]
    AssertionFailed {
        template: &'static str,
        label: String,
        line: u32,
    },

    #[error("all inputs already assigned")]
    AllInputsAssigned,

    #[error("no input signal with hash {hash:#018x}")]
    UnknownInput { hash: u64 },

    #[error("no input signal named {name:?}")]
    UnknownInputName { name: String },

    #[error("input index {index} exceeds size {size} of signal {hash:#018x}")]
    InputIndexOutOfRange { hash: u64, index: usize, size: usize },

    #[error("input {index} of signal {hash:#018x} assigned twice")]
    InputAssignedTwice { hash: u64, index: usize },

    #[error("not all inputs have been set: {missing} of {expected} missing")]
    InputsIncomplete { missing: u32, expected: u32 },

    #[error("invalid value for input {name:?}: {value}")]
    InvalidInputValue { name: String, value: String },

    #[error("value {value} does not fit a machine index")]
    IndexOverflow { value: String },

    #[error("invalid circuit: {0}")]
    InvalidCircuit(String),

    #[error("invalid input JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid engine config: {0}")]
    Config(#[from] toml::de::Error),
}

impl WitnessError {
    pub fn graph(component: ComponentId, label: impl Into<String>, defect: GraphDefect) -> Self {
        Self::GraphDefect {
            component,
            label: label.into(),
            defect,
        }
    }

    /// The defect kind, when this is a graph defect.
    pub fn defect(&self) -> Option<&GraphDefect> {
        match self {
            Self::GraphDefect { defect, .. } => Some(defect),
            _ => None,
        }
    }
}
