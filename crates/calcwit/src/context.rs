//! State of one witness computation.
//!
//! A `WitnessContext` owns the signal store and the component registry and
//! is borrowed mutably by every running component body. Independent
//! computations over the same [`Circuit`] share nothing but the circuit.

use std::sync::Arc;

use ark_ff::One;
use num_bigint::BigUint;

use crate::arena::{ComponentId, ComponentRecord, ComponentState, Registry};
use crate::circuit::Circuit;
use crate::config::EngineConfig;
use crate::error::{GraphDefect, Result, WitnessError};
use crate::field::{self, Fr};
use crate::signals::SignalStore;
use crate::trace::{ExecutionTrace, TraceEvent};

#[derive(Debug)]
pub struct WitnessContext {
    pub(crate) circuit: Arc<Circuit>,
    pub(crate) config: EngineConfig,
    pub(crate) signals: SignalStore,
    pub(crate) registry: Registry,
    pub(crate) trace: ExecutionTrace,
    /// Main inputs not yet assigned through the input protocol
    pub(crate) input_counter: u32,
    /// Component whose body is executing
    pub(crate) active: Option<ComponentId>,
}

impl WitnessContext {
    pub fn new(circuit: Arc<Circuit>, config: EngineConfig) -> Self {
        let mut signals = SignalStore::allocate(circuit.total_signals());
        let mut trace = ExecutionTrace::new(config.record_trace);
        if !signals.is_empty() {
            signals.write(0, Fr::one());
            trace.record(TraceEvent::SignalWritten { signal: 0 });
        }
        Self {
            registry: Registry::new(circuit.total_components()),
            input_counter: circuit.main_input_count() as u32,
            active: None,
            circuit,
            config,
            signals,
            trace,
        }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn signals(&self) -> &SignalStore {
        &self.signals
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn trace(&self) -> &ExecutionTrace {
        &self.trace
    }

    pub fn constant(&self, index: usize) -> Fr {
        *self.circuit.constants().get(index)
    }

    /// Read a signal by global index. Unwritten signals read as zero, or
    /// abort when `check_reads` is set.
    pub fn signal(&mut self, index: usize) -> Result<Fr> {
        let written = self.signals.is_written(index);
        self.trace.record(TraceEvent::SignalRead {
            signal: index,
            written,
        });
        if !written && self.config.check_reads {
            let reader = self.active.unwrap_or(ComponentId::ROOT);
            return Err(self.defect(reader, GraphDefect::UnwrittenSignal { signal: index }));
        }
        Ok(self.signals.read(index))
    }

    /// Write a signal the running component owns. Never decrements a
    /// counter; writes into a child's inputs go through
    /// [`WitnessContext::write_input`].
    pub fn set_signal(&mut self, index: usize, value: Fr) {
        self.signals.write(index, value);
        self.trace.record(TraceEvent::SignalWritten { signal: index });
    }

    pub(crate) fn record(&self, id: ComponentId) -> Result<&ComponentRecord> {
        self.registry
            .get(id)
            .ok_or_else(|| self.defect(id, GraphDefect::UnknownComponent))
    }

    pub(crate) fn record_mut(&mut self, id: ComponentId) -> Result<&mut ComponentRecord> {
        match self.registry.get_mut(id) {
            Some(record) => Ok(record),
            None => Err(WitnessError::graph(
                id,
                format!("<component {id}>"),
                GraphDefect::UnknownComponent,
            )),
        }
    }

    pub(crate) fn defect(&self, id: ComponentId, defect: GraphDefect) -> WitnessError {
        WitnessError::graph(id, self.registry.label(id), defect)
    }

    pub fn signal_start(&self, id: ComponentId) -> Result<usize> {
        Ok(self.record(id)?.signal_start)
    }

    /// Component whose body is currently running, if any.
    pub fn active(&self) -> Option<ComponentId> {
        self.active
    }

    pub fn state(&self, id: ComponentId) -> Option<ComponentState> {
        self.registry.state(id)
    }

    pub fn label(&self, id: ComponentId) -> String {
        self.registry.label(id)
    }

    pub fn template_name(&self, id: ComponentId) -> &'static str {
        self.registry
            .get(id)
            .and_then(|record| self.circuit.dispatch().info(record.template))
            .map_or("<unknown>", |info| info.name)
    }

    /// Handle `offset` positions after `parent`, as generated bodies number
    /// their children.
    pub fn child_handle(&self, parent: ComponentId, offset: u32) -> Result<ComponentId> {
        parent.checked_offset(offset).ok_or_else(|| {
            self.defect(
                parent,
                GraphDefect::ComponentOutOfRange {
                    limit: self.registry.len(),
                },
            )
        })
    }

    /// Handle held in `slot` of `parent`'s subcomponent array.
    pub fn subcomponent(&self, parent: ComponentId, slot: usize) -> Result<ComponentId> {
        let record = self.record(parent)?;
        match record.subcomponents.get(slot) {
            Some(Some(child)) => Ok(*child),
            Some(None) => Err(self.defect(parent, GraphDefect::UnallocatedSubcomponent { slot })),
            None => Err(self.defect(
                parent,
                GraphDefect::SubcomponentSlotOutOfRange {
                    slot,
                    slots: record.subcomponents.len(),
                },
            )),
        }
    }

    pub(crate) fn set_subcomponent(
        &mut self,
        parent: ComponentId,
        slot: usize,
        child: ComponentId,
    ) -> Result<()> {
        let slots = self.record(parent)?.subcomponents.len();
        if slot >= slots {
            return Err(self.defect(
                parent,
                GraphDefect::SubcomponentSlotOutOfRange { slot, slots },
            ));
        }
        self.record_mut(parent)?.subcomponents[slot] = Some(child);
        Ok(())
    }

    /// Check an `assert` of the body of `id`.
    pub fn assert_true(&self, id: ComponentId, value: &Fr, line: u32) -> Result<()> {
        if field::is_true(value) {
            return Ok(());
        }
        let label = self.label(id);
        log::warn!("assert failed in {label} at line {line}");
        Err(WitnessError::AssertionFailed {
            template: self.template_name(id),
            label,
            line,
        })
    }

    /// Value of witness entry `index`. Panics when `index` is not below
    /// [`WitnessContext::witness_len`].
    pub fn witness(&self, index: usize) -> Fr {
        match self.circuit.witness_to_signal() {
            [] => self.signals.read(index),
            map => self.signals.read(map[index]),
        }
    }

    pub fn witness_len(&self) -> usize {
        self.circuit.witness_len()
    }

    pub fn into_witness(self) -> Vec<Fr> {
        let map = self.circuit.witness_to_signal();
        if map.is_empty() {
            return self.signals.into_values();
        }
        map.iter().map(|&signal| self.signals.read(signal)).collect()
    }

    pub fn into_witness_biguint(self) -> Vec<BigUint> {
        self.into_witness().iter().map(field::to_biguint).collect()
    }
}
