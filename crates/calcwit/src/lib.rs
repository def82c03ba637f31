//! Dependency-triggered witness calculation.
//!
//! A compiled circuit is a static hierarchy of components. Each component
//! waits until all of its declared inputs are written, then runs its body,
//! which computes its outputs and feeds the inputs of its own
//! subcomponents. Running the root component therefore evaluates the whole
//! tree in dependency order and leaves every signal with a value.
//!
//! ```ignore
//! let calculator = WitnessCalculator::new(circuit);
//! let witness = calculator.calculate_json(r#"{"a": "3", "b": "11"}"#)?;
//! ```

pub mod arena;
pub mod calcwit;
pub mod circuit;
pub mod config;
pub mod constants;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod field;
pub mod inputs;
mod reclaim;
mod scheduler;
pub mod signals;
pub mod trace;

pub use arena::{ComponentId, ComponentRecord, ComponentState, Registry};
pub use calcwit::WitnessCalculator;
pub use circuit::{Circuit, CircuitBuilder};
pub use config::EngineConfig;
pub use constants::ConstantPool;
pub use context::WitnessContext;
pub use dispatch::{DispatchEntry, DispatchTable, RunFn, TemplateId, TemplateInfo};
pub use error::{GraphDefect, Result, WitnessError};
pub use field::Fr;
pub use inputs::{input_hash, InputAssignment, InputSignalInfo, InputSignalMap};
pub use signals::SignalStore;
pub use trace::{ExecutionTrace, TraceEvent};
