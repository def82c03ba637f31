//! Execution trace for one witness computation.
//!
//! Records component lifecycle steps and signal reads, in program order,
//! when [`EngineConfig::record_trace`](crate::config::EngineConfig) is set.

use crate::arena::ComponentId;
use crate::dispatch::TemplateId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Created {
        component: ComponentId,
        template: TemplateId,
    },
    /// A write into the component's input block and the counter after it
    InputWritten {
        component: ComponentId,
        signal: usize,
        remaining: u32,
    },
    Triggered {
        component: ComponentId,
    },
    Finished {
        component: ComponentId,
    },
    Released {
        component: ComponentId,
    },
    SignalWritten {
        signal: usize,
    },
    SignalRead {
        signal: usize,
        written: bool,
    },
}

impl TraceEvent {
    pub fn component(&self) -> Option<ComponentId> {
        match self {
            TraceEvent::Created { component, .. }
            | TraceEvent::InputWritten { component, .. }
            | TraceEvent::Triggered { component }
            | TraceEvent::Finished { component }
            | TraceEvent::Released { component } => Some(*component),
            TraceEvent::SignalWritten { .. } | TraceEvent::SignalRead { .. } => None,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ExecutionTrace {
    events: Vec<TraceEvent>,
    enabled: bool,
}

impl ExecutionTrace {
    pub fn new(enabled: bool) -> Self {
        Self {
            events: Vec::new(),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record(&mut self, event: TraceEvent) {
        if self.enabled {
            self.events.push(event);
        }
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn events_for(&self, component: ComponentId) -> Vec<&TraceEvent> {
        self.events
            .iter()
            .filter(|event| event.component() == Some(component))
            .collect()
    }

    pub fn trigger_count(&self, component: ComponentId) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, TraceEvent::Triggered { component: c } if *c == component))
            .count()
    }

    pub fn decrement_count(&self, component: ComponentId) -> usize {
        self.events
            .iter()
            .filter(|event| {
                matches!(event, TraceEvent::InputWritten { component: c, .. } if *c == component)
            })
            .count()
    }

    /// Signals that were read while still unwritten.
    pub fn read_before_write(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|event| match event {
                TraceEvent::SignalRead {
                    signal,
                    written: false,
                } => Some(*signal),
                _ => None,
            })
            .collect()
    }

    /// Position of the first `Triggered` event for `component`.
    pub fn trigger_position(&self, component: ComponentId) -> Option<usize> {
        self.events
            .iter()
            .position(|event| matches!(event, TraceEvent::Triggered { component: c } if *c == component))
    }
}
