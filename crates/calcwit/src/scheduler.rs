//! Input-counting activation.
//!
//! Each component starts with its declared input count. Every write into
//! its input block decrements the count, and the write that takes it to
//! zero runs the component's body right there, before the writer's next
//! statement. Reads never decrement, nor do a component's writes to its
//! own signals.

use crate::arena::{ComponentId, ComponentState, NewComponent};
use crate::context::WitnessContext;
use crate::dispatch::{TemplateId, TemplateInfo};
use crate::error::{GraphDefect, Result, WitnessError};
use crate::field::Fr;
use crate::trace::TraceEvent;

impl WitnessContext {
    /// Create component `id` over the signal block starting at
    /// `signal_start`. A template without inputs runs before this returns.
    pub fn create_component(
        &mut self,
        id: ComponentId,
        template: TemplateId,
        signal_start: usize,
        label: impl Into<String>,
        parent: Option<ComponentId>,
    ) -> Result<()> {
        let label = label.into();
        let Some(info) = self.circuit.dispatch().info(template).copied() else {
            return Err(WitnessError::graph(
                id,
                label,
                GraphDefect::UnknownTemplate(template),
            ));
        };

        if self.config.log_components {
            log::trace!("create {id} {} `{label}` at {signal_start}", info.name);
        }
        self.registry
            .create(
                id,
                NewComponent {
                    template,
                    signal_start,
                    input_count: info.inputs as u32,
                    subcomponent_slots: info.subcomponents,
                    parent,
                    label,
                },
            )
            .map_err(|defect| self.defect(id, defect))?;
        self.trace.record(TraceEvent::Created {
            component: id,
            template,
        });

        if info.inputs == 0 {
            self.trigger(id)?;
        }
        Ok(())
    }

    /// Create a child of `parent` and store its handle in `slot`.
    pub fn create_subcomponent(
        &mut self,
        parent: ComponentId,
        slot: usize,
        id: ComponentId,
        template: TemplateId,
        signal_start: usize,
        label: impl Into<String>,
    ) -> Result<()> {
        self.set_subcomponent(parent, slot, id)?;
        self.create_component(id, template, signal_start, label, Some(parent))
    }

    /// Write local input `local` of `child` and run it if this was the last
    /// missing input.
    pub fn write_input(&mut self, child: ComponentId, local: usize, value: Fr) -> Result<()> {
        let record = self.record(child)?;
        let (template, signal_start, state) = (record.template, record.signal_start, record.state);
        let info = self.template_info(child, template)?;

        if !info.is_input(local) {
            return Err(self.defect(
                child,
                GraphDefect::NotAnInput {
                    signal: local,
                    start: info.input_start(),
                    end: info.input_end(),
                },
            ));
        }
        if state != ComponentState::Created {
            return Err(self.defect(child, GraphDefect::InputAfterStart(state)));
        }

        let signal = signal_start + local;
        self.set_signal(signal, value);
        self.input_arrived(child, signal)
    }

    /// Write consecutive inputs of `child` starting at local `local_start`.
    pub fn write_inputs(&mut self, child: ComponentId, local_start: usize, values: &[Fr]) -> Result<()> {
        for (offset, value) in values.iter().enumerate() {
            self.write_input(child, local_start + offset, *value)?;
        }
        Ok(())
    }

    /// Decrement the pending-input counter of `id`, returning what remains.
    pub fn decrement(&mut self, id: ComponentId) -> Result<u32> {
        let record = self.record_mut(id)?;
        match record.pending_inputs.checked_sub(1) {
            Some(remaining) => {
                record.pending_inputs = remaining;
                Ok(remaining)
            }
            None => Err(self.defect(id, GraphDefect::CounterUnderflow)),
        }
    }

    /// `signal` of `id`'s input block now holds its value.
    pub(crate) fn input_arrived(&mut self, id: ComponentId, signal: usize) -> Result<()> {
        let remaining = self.decrement(id)?;
        self.trace.record(TraceEvent::InputWritten {
            component: id,
            signal,
            remaining,
        });
        if remaining == 0 {
            self.trigger(id)?;
        }
        Ok(())
    }

    /// Run the body of `id`. Only valid once, right after its counter
    /// reached zero.
    pub fn trigger(&mut self, id: ComponentId) -> Result<()> {
        let record = self.record(id)?;
        let (template, state, pending) = (record.template, record.state, record.pending_inputs);
        if state != ComponentState::Created {
            return Err(self.defect(id, GraphDefect::AlreadyTriggered(state)));
        }
        if pending != 0 {
            return Err(self.defect(id, GraphDefect::PendingInputs(pending)));
        }
        let Some(run) = self
            .circuit
            .dispatch()
            .resolve(template, self.config.use_alternate)
        else {
            return Err(self.defect(id, GraphDefect::UnknownTemplate(template)));
        };

        self.record_mut(id)?.state = ComponentState::Running;
        self.trace.record(TraceEvent::Triggered { component: id });
        if self.config.log_components {
            log::trace!("run {id} `{}`", self.registry.label(id));
        }

        let caller = self.active.replace(id);
        let outcome = run(self, id);
        self.active = caller;
        outcome?;

        self.record_mut(id)?.state = ComponentState::Finished;
        self.trace.record(TraceEvent::Finished { component: id });
        if self.config.log_components {
            log::trace!("finish {id}");
        }
        Ok(())
    }

    fn template_info(&self, id: ComponentId, template: TemplateId) -> Result<TemplateInfo> {
        self.circuit
            .dispatch()
            .info(template)
            .copied()
            .ok_or_else(|| self.defect(id, GraphDefect::UnknownTemplate(template)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::circuit::Circuit;
    use crate::config::EngineConfig;
    use crate::constants::ConstantPool;
    use crate::dispatch::{DispatchEntry, DispatchTable};
    use crate::field;

    const ADDER: TemplateId = TemplateId(0);
    const LEAF: TemplateId = TemplateId(1);
    const FLAGGED: TemplateId = TemplateId(2);

    fn adder(ctx: &mut WitnessContext, id: ComponentId) -> Result<()> {
        let start = ctx.signal_start(id)?;
        let a = ctx.signal(start + 1)?;
        let b = ctx.signal(start + 2)?;
        ctx.set_signal(start, field::add(&a, &b));
        Ok(())
    }

    fn leaf(ctx: &mut WitnessContext, id: ComponentId) -> Result<()> {
        let start = ctx.signal_start(id)?;
        let seed = ctx.constant(1);
        ctx.set_signal(start, field::mul(&seed, &seed));
        Ok(())
    }

    fn flagged_sync(ctx: &mut WitnessContext, id: ComponentId) -> Result<()> {
        let start = ctx.signal_start(id)?;
        ctx.set_signal(start, Fr::from(1u64));
        Ok(())
    }

    fn flagged_alternate(ctx: &mut WitnessContext, id: ComponentId) -> Result<()> {
        let start = ctx.signal_start(id)?;
        ctx.set_signal(start, Fr::from(2u64));
        Ok(())
    }

    fn circuit() -> Arc<Circuit> {
        let dispatch = DispatchTable::new()
            .with(
                ADDER,
                DispatchEntry::new(TemplateInfo::new("Adder", 1, 2, 3, 0), adder),
            )
            .unwrap()
            .with(
                LEAF,
                DispatchEntry::new(TemplateInfo::new("Leaf", 1, 0, 1, 0), leaf),
            )
            .unwrap()
            .with(
                FLAGGED,
                DispatchEntry::new(TemplateInfo::new("Flagged", 1, 0, 1, 0), flagged_sync)
                    .with_alternate(flagged_alternate),
            )
            .unwrap();
        let constants: ConstantPool = [Fr::from(1u64), Fr::from(6u64)].into_iter().collect();
        Arc::new(
            Circuit::builder("scheduler")
                .total_signals(16)
                .total_components(8)
                .constants(constants)
                .dispatch(dispatch)
                .build()
                .unwrap(),
        )
    }

    fn context(config: EngineConfig) -> WitnessContext {
        WitnessContext::new(circuit(), config)
    }

    #[test]
    fn zero_input_component_runs_during_create() {
        let mut ctx = context(EngineConfig::diagnostic());
        let id = ComponentId(1);
        ctx.create_component(id, LEAF, 4, "leaf", None).unwrap();

        assert_eq!(ctx.state(id), Some(ComponentState::Finished));
        assert_eq!(ctx.signals().read(4), Fr::from(36u64));
        assert_eq!(ctx.trace().trigger_count(id), 1);
    }

    #[test]
    fn last_input_triggers_in_any_order() {
        for order in [[1, 2], [2, 1]] {
            let mut ctx = context(EngineConfig::diagnostic());
            let id = ComponentId(1);
            ctx.create_component(id, ADDER, 6, "adder", None).unwrap();

            ctx.write_input(id, order[0], Fr::from(3u64)).unwrap();
            assert_eq!(ctx.state(id), Some(ComponentState::Created));
            assert_eq!(ctx.trace().trigger_count(id), 0);

            ctx.write_input(id, order[1], Fr::from(4u64)).unwrap();
            assert_eq!(ctx.state(id), Some(ComponentState::Finished));
            assert_eq!(ctx.trace().trigger_count(id), 1);
            assert_eq!(ctx.trace().decrement_count(id), 2);
            assert_eq!(ctx.signals().read(6), Fr::from(7u64));
            assert!(ctx.trace().read_before_write().is_empty());
        }
    }

    #[test]
    fn outputs_are_not_inputs() {
        let mut ctx = context(EngineConfig::default());
        let id = ComponentId(1);
        ctx.create_component(id, ADDER, 6, "adder", None).unwrap();
        let err = ctx.write_input(id, 0, Fr::from(1u64)).unwrap_err();
        assert_eq!(
            err.defect(),
            Some(&GraphDefect::NotAnInput {
                signal: 0,
                start: 1,
                end: 3
            })
        );
    }

    #[test]
    fn finished_component_rejects_more_input() {
        let mut ctx = context(EngineConfig::default());
        let id = ComponentId(1);
        ctx.create_component(id, ADDER, 6, "adder", None).unwrap();
        ctx.write_inputs(id, 1, &[Fr::from(1u64), Fr::from(2u64)]).unwrap();

        let err = ctx.write_input(id, 1, Fr::from(5u64)).unwrap_err();
        assert_eq!(
            err.defect(),
            Some(&GraphDefect::InputAfterStart(ComponentState::Finished))
        );
        assert_eq!(
            ctx.decrement(id).unwrap_err().defect(),
            Some(&GraphDefect::CounterUnderflow)
        );
        assert_eq!(
            ctx.trigger(id).unwrap_err().defect(),
            Some(&GraphDefect::AlreadyTriggered(ComponentState::Finished))
        );
    }

    #[test]
    fn early_trigger_is_a_defect() {
        let mut ctx = context(EngineConfig::default());
        let id = ComponentId(2);
        ctx.create_component(id, ADDER, 6, "adder", None).unwrap();
        let err = ctx.trigger(id).unwrap_err();
        assert_eq!(err.defect(), Some(&GraphDefect::PendingInputs(2)));
        assert!(err.to_string().contains("adder"));
    }

    #[test]
    fn duplicate_and_unknown_creations_are_defects() {
        let mut ctx = context(EngineConfig::default());
        ctx.create_component(ComponentId(1), LEAF, 4, "leaf", None)
            .unwrap();
        let duplicate = ctx
            .create_component(ComponentId(1), LEAF, 5, "again", None)
            .unwrap_err();
        assert_eq!(duplicate.defect(), Some(&GraphDefect::DuplicateComponent));

        let unknown = ctx
            .create_component(ComponentId(2), TemplateId(9), 5, "ghost", None)
            .unwrap_err();
        assert_eq!(
            unknown.defect(),
            Some(&GraphDefect::UnknownTemplate(TemplateId(9)))
        );

        let beyond = ctx
            .create_component(ComponentId(8), LEAF, 5, "beyond", None)
            .unwrap_err();
        assert_eq!(
            beyond.defect(),
            Some(&GraphDefect::ComponentOutOfRange { limit: 8 })
        );
    }

    #[test]
    fn alternate_runs_only_when_configured() {
        let mut ctx = context(EngineConfig::default());
        ctx.create_component(ComponentId(1), FLAGGED, 5, "flagged", None)
            .unwrap();
        assert_eq!(ctx.signals().read(5), Fr::from(1u64));

        let config = EngineConfig {
            use_alternate: true,
            ..EngineConfig::default()
        };
        let mut ctx = context(config);
        ctx.create_component(ComponentId(1), FLAGGED, 5, "flagged", None)
            .unwrap();
        assert_eq!(ctx.signals().read(5), Fr::from(2u64));
    }
}
