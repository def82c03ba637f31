//! Root driver.
//!
//! [`WitnessCalculator`] owns a shared circuit and runs one witness
//! computation per call. The main component is created only after every
//! main input has been written; the single trigger of the root then
//! executes the whole component tree.

use std::sync::Arc;

use num_bigint::BigUint;

use crate::arena::ComponentId;
use crate::circuit::Circuit;
use crate::config::EngineConfig;
use crate::context::WitnessContext;
use crate::error::{Result, WitnessError};
use crate::field::Fr;
use crate::inputs::InputAssignment;

impl WitnessContext {
    /// Create the main component over the already written main input block
    /// and account each of its inputs, which runs it.
    pub fn run_root(&mut self) -> Result<()> {
        let circuit = Arc::clone(&self.circuit);
        self.create_component(
            ComponentId::ROOT,
            circuit.main_template(),
            circuit.main_signal_start(),
            "main",
            None,
        )?;
        let input_start = circuit.main_input_start();
        for signal in input_start..input_start + circuit.main_input_count() {
            self.input_arrived(ComponentId::ROOT, signal)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct WitnessCalculator {
    circuit: Arc<Circuit>,
    config: EngineConfig,
}

impl WitnessCalculator {
    pub fn new(circuit: impl Into<Arc<Circuit>>) -> Self {
        Self {
            circuit: circuit.into(),
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn circuit(&self) -> &Arc<Circuit> {
        &self.circuit
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fresh computation state; nothing is shared with earlier contexts.
    pub fn new_context(&self) -> WitnessContext {
        WitnessContext::new(Arc::clone(&self.circuit), self.config.clone())
    }

    /// Feed `inputs` through the input protocol and return the finished
    /// context.
    pub fn calculate_context(&self, inputs: &InputAssignment) -> Result<WitnessContext> {
        let mut ctx = self.new_context();
        log::debug!(
            "calculating witness for `{}`: {} signals, {} components, {} inputs",
            self.circuit.name(),
            self.circuit.total_signals(),
            self.circuit.total_components(),
            self.circuit.main_input_count()
        );

        ctx.set_inputs(inputs)?;
        if ctx.state(ComponentId::ROOT).is_none() {
            let missing = ctx.pending_main_inputs();
            if missing > 0 {
                return Err(WitnessError::InputsIncomplete {
                    missing,
                    expected: self.circuit.main_input_count() as u32,
                });
            }
            // No main inputs at all.
            ctx.run_root()?;
        }

        log::debug!(
            "witness for `{}` done: {} of {} signals written",
            self.circuit.name(),
            ctx.signals().written_count(),
            ctx.signals().len()
        );
        Ok(ctx)
    }

    pub fn calculate(&self, inputs: &InputAssignment) -> Result<Vec<Fr>> {
        Ok(self.calculate_context(inputs)?.into_witness())
    }

    pub fn calculate_biguint(&self, inputs: &InputAssignment) -> Result<Vec<BigUint>> {
        Ok(self.calculate_context(inputs)?.into_witness_biguint())
    }

    /// [`WitnessCalculator::calculate`] over a JSON input document.
    pub fn calculate_json(&self, text: &str) -> Result<Vec<Fr>> {
        self.calculate(&InputAssignment::from_json(text)?)
    }

    /// Write `values` into the main input block in order and run the
    /// root, bypassing the named protocol.
    pub fn calculate_ordered(&self, values: &[Fr]) -> Result<Vec<Fr>> {
        let expected = self.circuit.main_input_count();
        if values.len() < expected {
            return Err(WitnessError::InputsIncomplete {
                missing: (expected - values.len()) as u32,
                expected: expected as u32,
            });
        }
        if values.len() > expected {
            return Err(WitnessError::InvalidInputValue {
                name: "<ordered>".to_string(),
                value: format!("{} values for {expected} main inputs", values.len()),
            });
        }

        let mut ctx = self.new_context();
        let input_start = self.circuit.main_input_start();
        for (offset, value) in values.iter().enumerate() {
            ctx.set_signal(input_start + offset, *value);
        }
        ctx.input_counter = 0;
        ctx.run_root()?;
        Ok(ctx.into_witness())
    }
}
