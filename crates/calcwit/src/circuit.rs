//! Static description of a compiled circuit.
//!
//! A [`Circuit`] is built once and shared read-only (behind an `Arc`) by
//! every witness computation over it.

use crate::constants::ConstantPool;
use crate::dispatch::{DispatchTable, TemplateId, TemplateInfo};
use crate::error::{Result, WitnessError};
use crate::inputs::InputSignalMap;

#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    total_signals: usize,
    total_components: usize,
    main_template: TemplateId,
    main_info: TemplateInfo,
    main_signal_start: usize,
    constants: ConstantPool,
    dispatch: DispatchTable,
    inputs: InputSignalMap,
    witness_to_signal: Vec<usize>,
}

impl Circuit {
    pub fn builder(name: impl Into<String>) -> CircuitBuilder {
        CircuitBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_signals(&self) -> usize {
        self.total_signals
    }

    pub fn total_components(&self) -> usize {
        self.total_components
    }

    pub fn main_template(&self) -> TemplateId {
        self.main_template
    }

    pub fn main_signal_start(&self) -> usize {
        self.main_signal_start
    }

    pub fn main_info(&self) -> &TemplateInfo {
        &self.main_info
    }

    /// Global index of the first main input.
    pub fn main_input_start(&self) -> usize {
        self.main_signal_start + self.main_info().input_start()
    }

    pub fn main_input_count(&self) -> usize {
        self.main_info().inputs
    }

    pub fn constants(&self) -> &ConstantPool {
        &self.constants
    }

    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    pub fn inputs(&self) -> &InputSignalMap {
        &self.inputs
    }

    pub fn witness_to_signal(&self) -> &[usize] {
        &self.witness_to_signal
    }

    /// Number of witness entries; the whole store when no map is given.
    pub fn witness_len(&self) -> usize {
        if self.witness_to_signal.is_empty() {
            self.total_signals
        } else {
            self.witness_to_signal.len()
        }
    }
}

pub struct CircuitBuilder {
    name: String,
    total_signals: usize,
    total_components: usize,
    main_template: TemplateId,
    main_signal_start: usize,
    constants: ConstantPool,
    dispatch: DispatchTable,
    inputs: InputSignalMap,
    witness_to_signal: Vec<usize>,
}

impl CircuitBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total_signals: 0,
            total_components: 1,
            main_template: TemplateId(0),
            main_signal_start: 1,
            constants: ConstantPool::new(),
            dispatch: DispatchTable::new(),
            inputs: InputSignalMap::new(),
            witness_to_signal: Vec::new(),
        }
    }

    pub fn total_signals(mut self, total_signals: usize) -> Self {
        self.total_signals = total_signals;
        self
    }

    pub fn total_components(mut self, total_components: usize) -> Self {
        self.total_components = total_components;
        self
    }

    pub fn main_template(mut self, template: TemplateId) -> Self {
        self.main_template = template;
        self
    }

    /// Base offset of the main component. Defaults to 1, after the constant one.
    pub fn main_signal_start(mut self, start: usize) -> Self {
        self.main_signal_start = start;
        self
    }

    pub fn constants(mut self, constants: ConstantPool) -> Self {
        self.constants = constants;
        self
    }

    pub fn dispatch(mut self, dispatch: DispatchTable) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn inputs(mut self, inputs: InputSignalMap) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn witness_to_signal(mut self, witness_to_signal: Vec<usize>) -> Self {
        self.witness_to_signal = witness_to_signal;
        self
    }

    pub fn build(self) -> Result<Circuit> {
        let invalid = |message: String| Err(WitnessError::InvalidCircuit(message));

        self.dispatch.validate()?;
        let Some(main) = self.dispatch.info(self.main_template).copied() else {
            return invalid(format!(
                "main template {} has no dispatch entry",
                self.main_template
            ));
        };
        if self.total_components == 0 {
            return invalid("a circuit needs at least the main component".to_string());
        }
        if self.main_signal_start == 0 {
            return invalid("signal 0 is reserved for the constant one".to_string());
        }
        let main_end = self.main_signal_start + main.signals;
        if main_end > self.total_signals {
            return invalid(format!(
                "main signals {}..{main_end} exceed the {} signals of the store",
                self.main_signal_start, self.total_signals
            ));
        }
        // A non-empty map must cover each main input exactly once.
        let mut covered = vec![false; main.inputs];
        for (name, hash) in self.inputs.names() {
            let Some(info) = self.inputs.get(hash) else {
                continue;
            };
            let end = info.offset + info.size;
            if end > main.inputs {
                return invalid(format!(
                    "input {name:?} ({}..{end}) lies outside the {} main inputs",
                    info.offset, main.inputs
                ));
            }
            if let Some(overlap) = (info.offset..end).find(|&offset| covered[offset]) {
                return invalid(format!(
                    "input {name:?} overlaps another input at main input {overlap}"
                ));
            }
            covered[info.offset..end].fill(true);
        }
        if !self.inputs.is_empty() {
            if let Some(gap) = covered.iter().position(|&is_covered| !is_covered) {
                return invalid(format!(
                    "main input {gap} is not covered by any named input"
                ));
            }
        }
        if let Some(signal) = self
            .witness_to_signal
            .iter()
            .find(|&&signal| signal >= self.total_signals)
        {
            return invalid(format!("witness entry refers to missing signal {signal}"));
        }

        Ok(Circuit {
            name: self.name,
            total_signals: self.total_signals,
            total_components: self.total_components,
            main_template: self.main_template,
            main_info: main,
            main_signal_start: self.main_signal_start,
            constants: self.constants,
            dispatch: self.dispatch,
            inputs: self.inputs,
            witness_to_signal: self.witness_to_signal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ComponentId;
    use crate::context::WitnessContext;
    use crate::dispatch::DispatchEntry;

    const MAIN: TemplateInfo = TemplateInfo::new("Main", 1, 2, 3, 0);

    fn noop(_ctx: &mut WitnessContext, _id: ComponentId) -> Result<()> {
        Ok(())
    }

    fn table() -> DispatchTable {
        DispatchTable::new()
            .with(TemplateId(0), DispatchEntry::new(MAIN, noop))
            .unwrap()
    }

    #[test]
    fn main_input_block_follows_outputs() {
        let mut inputs = InputSignalMap::new();
        inputs.insert("in", 0, 2).unwrap();
        let circuit = Circuit::builder("probe")
            .total_signals(4)
            .dispatch(table())
            .inputs(inputs)
            .build()
            .unwrap();

        assert_eq!(circuit.main_input_start(), 2);
        assert_eq!(circuit.main_input_count(), 2);
        assert_eq!(circuit.witness_len(), 4);
        assert_eq!(circuit.main_info().name, "Main");
    }

    #[test]
    fn build_rejects_inconsistent_layouts() {
        let missing_main = Circuit::builder("probe")
            .total_signals(4)
            .dispatch(table())
            .main_template(TemplateId(3))
            .build();
        assert!(matches!(missing_main, Err(WitnessError::InvalidCircuit(_))));

        let too_small = Circuit::builder("probe")
            .total_signals(3)
            .dispatch(table())
            .build();
        assert!(too_small.is_err());

        let mut inputs = InputSignalMap::new();
        inputs.insert("in", 1, 2).unwrap();
        let outside = Circuit::builder("probe")
            .total_signals(4)
            .dispatch(table())
            .inputs(inputs)
            .build();
        assert!(outside.is_err());

        let mut inputs = InputSignalMap::new();
        inputs.insert("a", 0, 2).unwrap();
        inputs.insert("b", 1, 1).unwrap();
        let overlapping = Circuit::builder("probe")
            .total_signals(4)
            .dispatch(table())
            .inputs(inputs)
            .build();
        assert!(matches!(overlapping, Err(WitnessError::InvalidCircuit(_))));

        let mut inputs = InputSignalMap::new();
        inputs.insert("a", 0, 1).unwrap();
        let uncovered = Circuit::builder("probe")
            .total_signals(4)
            .dispatch(table())
            .inputs(inputs)
            .build();
        assert!(matches!(uncovered, Err(WitnessError::InvalidCircuit(_))));

        let bad_witness = Circuit::builder("probe")
            .total_signals(4)
            .dispatch(table())
            .witness_to_signal(vec![0, 4])
            .build();
        assert!(bad_witness.is_err());
    }
}
