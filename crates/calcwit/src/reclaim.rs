//! Release of component-owned arrays.
//!
//! A parent body releases its direct children immediately before it
//! returns. Releasing only drops the child's own handle array; the signal
//! store is never touched, so outputs stay readable.

use crate::arena::{ComponentId, ComponentState, Subcomponents};
use crate::context::WitnessContext;
use crate::error::{GraphDefect, Result};
use crate::trace::TraceEvent;

impl WitnessContext {
    /// Release the arrays owned by `handle`. An unallocated slot (`None`)
    /// and an already released component are no-ops.
    pub fn release(&mut self, handle: Option<ComponentId>) -> Result<()> {
        let Some(id) = handle else {
            return Ok(());
        };
        let state = self.record(id)?.state;
        match state {
            ComponentState::Released => Ok(()),
            ComponentState::Finished => {
                let reclaim = self.config.reclaim;
                let record = self.record_mut(id)?;
                if reclaim {
                    record.subcomponents = Subcomponents::new();
                }
                record.state = ComponentState::Released;
                self.trace.record(TraceEvent::Released { component: id });
                if self.config.log_components {
                    log::trace!("release {id}");
                }
                Ok(())
            }
            state @ (ComponentState::Created | ComponentState::Running) => {
                Err(self.defect(id, GraphDefect::ReleasedEarly(state)))
            }
        }
    }

    /// Release every direct child of `parent`, in slot order.
    pub fn release_children(&mut self, parent: ComponentId) -> Result<()> {
        let children = self.record(parent)?.subcomponents.clone();
        for child in children {
            self.release(child)?;
        }
        Ok(())
    }
}
