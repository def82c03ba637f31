//! Component registry.
//!
//! One record per component instance, addressed by a dense handle that the
//! compiler assigns. Handles are never reused within a witness computation.

use std::fmt;

use smallvec::SmallVec;

use crate::dispatch::TemplateId;
use crate::error::GraphDefect;

/// Dense handle into the registry. The root component is always `ROOT`,
/// so no child can ever be handle 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u32);

impl ComponentId {
    pub const ROOT: Self = Self(0);

    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Handle `offset` positions after this one, as emitted for children.
    /// `None` when it would not fit a handle.
    pub fn checked_offset(self, offset: u32) -> Option<Self> {
        self.0.checked_add(offset).map(Self)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    /// Waiting for inputs
    Created,
    /// Body is on the call stack
    Running,
    /// Body returned; outputs are valid
    Finished,
    /// Parent reclaimed the owned arrays
    Released,
}

/// Owned child handles. `None` marks a slot the body has not instantiated.
pub type Subcomponents = SmallVec<[Option<ComponentId>; 4]>;

#[derive(Debug, Clone)]
pub struct ComponentRecord {
    pub template: TemplateId,
    pub signal_start: usize,
    pub pending_inputs: u32,
    pub subcomponents: Subcomponents,
    pub parent: Option<ComponentId>,
    /// Diagnostic name, e.g. `main.arr.mult[2]`
    pub label: String,
    pub state: ComponentState,
}

/// Everything `Registry::create` needs besides the handle.
#[derive(Debug, Clone)]
pub struct NewComponent {
    pub template: TemplateId,
    pub signal_start: usize,
    pub input_count: u32,
    pub subcomponent_slots: usize,
    pub parent: Option<ComponentId>,
    pub label: String,
}

#[derive(Debug)]
pub struct Registry {
    records: Vec<Option<ComponentRecord>>,
    created: usize,
}

impl Registry {
    /// Registry able to hold `total_components` handles.
    pub fn new(total_components: usize) -> Self {
        Self {
            records: (0..total_components).map(|_| None).collect(),
            created: 0,
        }
    }

    pub fn create(&mut self, id: ComponentId, new: NewComponent) -> Result<(), GraphDefect> {
        let limit = self.records.len();
        let slot = self
            .records
            .get_mut(id.index())
            .ok_or(GraphDefect::ComponentOutOfRange { limit })?;
        if slot.is_some() {
            return Err(GraphDefect::DuplicateComponent);
        }
        *slot = Some(ComponentRecord {
            template: new.template,
            signal_start: new.signal_start,
            pending_inputs: new.input_count,
            subcomponents: SmallVec::from_elem(None, new.subcomponent_slots),
            parent: new.parent,
            label: new.label,
            state: ComponentState::Created,
        });
        self.created += 1;
        Ok(())
    }

    pub fn get(&self, id: ComponentId) -> Option<&ComponentRecord> {
        self.records.get(id.index())?.as_ref()
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut ComponentRecord> {
        self.records.get_mut(id.index())?.as_mut()
    }

    pub fn state(&self, id: ComponentId) -> Option<ComponentState> {
        self.get(id).map(|record| record.state)
    }

    /// Label for error messages; unknown handles get a placeholder.
    pub fn label(&self, id: ComponentId) -> String {
        self.get(id)
            .map(|record| record.label.clone())
            .unwrap_or_else(|| format!("<component {id}>"))
    }

    /// Declared capacity (number of handles).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of handles created so far.
    pub fn created(&self) -> usize {
        self.created
    }

    pub fn iter(&self) -> impl Iterator<Item = (ComponentId, &ComponentRecord)> {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(idx, record)| Some((ComponentId(idx as u32), record.as_ref()?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(label: &str) -> NewComponent {
        NewComponent {
            template: TemplateId(0),
            signal_start: 1,
            input_count: 2,
            subcomponent_slots: 3,
            parent: None,
            label: label.to_string(),
        }
    }

    #[test]
    fn create_initialises_record() {
        let mut registry = Registry::new(2);
        registry.create(ComponentId(1), leaf("main.x")).unwrap();

        let record = registry.get(ComponentId(1)).unwrap();
        assert_eq!(record.pending_inputs, 2);
        assert_eq!(record.state, ComponentState::Created);
        assert_eq!(record.subcomponents.as_slice(), &[None, None, None]);
        assert_eq!(registry.created(), 1);
        assert!(registry.get(ComponentId(0)).is_none());
    }

    #[test]
    fn offsets_past_the_handle_space_are_none() {
        assert_eq!(ComponentId(3).checked_offset(2), Some(ComponentId(5)));
        assert_eq!(ComponentId(u32::MAX).checked_offset(1), None);
    }

    #[test]
    fn handles_are_not_reused() {
        let mut registry = Registry::new(1);
        registry.create(ComponentId::ROOT, leaf("main")).unwrap();
        assert_eq!(
            registry.create(ComponentId::ROOT, leaf("again")),
            Err(GraphDefect::DuplicateComponent)
        );
    }

    #[test]
    fn handles_beyond_capacity_are_rejected() {
        let mut registry = Registry::new(1);
        assert_eq!(
            registry.create(ComponentId(5), leaf("far")),
            Err(GraphDefect::ComponentOutOfRange { limit: 1 })
        );
        assert_eq!(registry.label(ComponentId(5)), "<component #5>");
    }
}
