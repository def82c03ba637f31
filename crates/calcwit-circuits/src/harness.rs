//! Test harness: runs a circuit with tracing on and checks the scheduling
//! properties every computation must satisfy.

use anyhow::{bail, ensure, Context};
use calcwit::{
    Circuit, ComponentId, ComponentState, EngineConfig, Fr, InputAssignment, TraceEvent,
    WitnessCalculator, WitnessContext,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn fr(value: u64) -> Fr {
    Fr::from(value)
}

pub fn frs(values: &[u64]) -> Vec<Fr> {
    values.iter().copied().map(Fr::from).collect()
}

/// Inputs of [`sample_circuit`](crate::sample_circuit).
pub fn sample_inputs(a: [u64; 3], b: [u64; 3], x: u64, flag: bool) -> InputAssignment {
    InputAssignment::new()
        .with("a", frs(&a))
        .with("b", frs(&b))
        .with("x", vec![fr(x)])
        .with("flag", vec![fr(flag as u64)])
}

/// Calculator with trace recording and strict reads.
pub fn diagnostic_calculator(circuit: Circuit) -> WitnessCalculator {
    init_logging();
    WitnessCalculator::new(circuit).with_config(EngineConfig {
        log_components: true,
        ..EngineConfig::diagnostic()
    })
}

/// A finished computation under inspection.
pub struct TestRun {
    ctx: WitnessContext,
}

impl TestRun {
    pub fn calculate(circuit: Circuit, inputs: &InputAssignment) -> anyhow::Result<Self> {
        let name = circuit.name().to_string();
        let ctx = diagnostic_calculator(circuit)
            .calculate_context(inputs)
            .with_context(|| format!("calculating witness for `{name}`"))?;
        Ok(Self { ctx })
    }

    /// Wrap a context driven by hand.
    pub fn from_context(ctx: WitnessContext) -> Self {
        Self { ctx }
    }

    pub fn ctx(&self) -> &WitnessContext {
        &self.ctx
    }

    pub fn into_context(self) -> WitnessContext {
        self.ctx
    }

    pub fn signal(&self, index: usize) -> Fr {
        self.ctx.signals().read(index)
    }

    pub fn assert_signal(&self, index: usize, expected: u64) {
        assert_eq!(
            self.signal(index),
            fr(expected),
            "signal {index} of `{}`",
            self.ctx.circuit().name()
        );
    }

    pub fn assert_state(&self, id: ComponentId, expected: ComponentState) {
        assert_eq!(
            self.ctx.state(id),
            Some(expected),
            "state of {id} ({})",
            self.ctx.label(id)
        );
    }

    /// Check the scheduling properties over the recorded trace.
    pub fn check_invariants(&self) -> anyhow::Result<()> {
        let trace = self.ctx.trace();
        ensure!(trace.is_enabled(), "trace recording is off");

        for (id, record) in self.ctx.registry().iter() {
            let label = &record.label;
            let info = self
                .ctx
                .circuit()
                .dispatch()
                .info(record.template)
                .with_context(|| format!("{label}: no template info"))?;

            let triggers = trace.trigger_count(id);
            ensure!(triggers == 1, "{label}: triggered {triggers} times");
            ensure!(record.pending_inputs == 0, "{label}: counter never reached zero");

            let decrements = trace.decrement_count(id);
            ensure!(
                decrements == info.inputs,
                "{label}: {decrements} decrements for {} inputs",
                info.inputs
            );

            let events = trace.events_for(id);
            let Some(trigger_at) = events
                .iter()
                .position(|event| matches!(event, TraceEvent::Triggered { .. }))
            else {
                bail!("{label}: no trigger event");
            };
            for (position, event) in events.iter().enumerate() {
                if let TraceEvent::InputWritten { remaining, .. } = event {
                    let before_trigger = position < trigger_at;
                    ensure!(before_trigger, "{label}: input written after the trigger");
                    ensure!(
                        (*remaining == 0) == (position + 1 == trigger_at),
                        "{label}: trigger does not follow the last input"
                    );
                }
            }

            if id != ComponentId::ROOT {
                ensure!(
                    record.state == ComponentState::Released,
                    "{label}: not released by its parent ({:?})",
                    record.state
                );
            }
        }

        let unwritten = trace.read_before_write();
        ensure!(unwritten.is_empty(), "signals read before written: {unwritten:?}");
        Ok(())
    }
}
