//! Template dispatch.
//!
//! Two parallel tables keyed by [`TemplateId`]: a mandatory synchronous run
//! procedure per template, and an optional alternate procedure. Every
//! trigger goes through here, so children of dynamically indexed arrays
//! need no static knowledge of their concrete template at the call site.

use std::fmt;

use crate::arena::ComponentId;
use crate::context::WitnessContext;
use crate::error::{Result, WitnessError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId(pub u32);

impl TemplateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Run procedure of a template body.
pub type RunFn = fn(&mut WitnessContext, ComponentId) -> Result<()>;

/// Static shape of a template, as laid out by the compiler.
///
/// Local signals are ordered outputs first, then inputs, then
/// intermediates; `signals` counts all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateInfo {
    pub name: &'static str,
    pub outputs: usize,
    pub inputs: usize,
    pub signals: usize,
    pub subcomponents: usize,
}

impl TemplateInfo {
    pub const fn new(
        name: &'static str,
        outputs: usize,
        inputs: usize,
        signals: usize,
        subcomponents: usize,
    ) -> Self {
        Self {
            name,
            outputs,
            inputs,
            signals,
            subcomponents,
        }
    }

    /// First local index of the input block.
    pub const fn input_start(&self) -> usize {
        self.outputs
    }

    pub const fn input_end(&self) -> usize {
        self.outputs + self.inputs
    }

    pub const fn is_input(&self, local: usize) -> bool {
        local >= self.input_start() && local < self.input_end()
    }
}

#[derive(Clone, Copy)]
pub struct DispatchEntry {
    pub info: TemplateInfo,
    pub run: RunFn,
    pub run_alternate: Option<RunFn>,
}

impl fmt::Debug for DispatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchEntry")
            .field("info", &self.info)
            .field("alternate", &self.run_alternate.is_some())
            .finish()
    }
}

impl DispatchEntry {
    pub fn new(info: TemplateInfo, run: RunFn) -> Self {
        Self {
            info,
            run,
            run_alternate: None,
        }
    }

    pub fn with_alternate(mut self, run_alternate: RunFn) -> Self {
        self.run_alternate = Some(run_alternate);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    entries: Vec<Option<DispatchEntry>>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the entry for `id`. Ids are chosen by the compiler; gaps are
    /// allowed while building but rejected by [`DispatchTable::validate`].
    pub fn insert(&mut self, id: TemplateId, entry: DispatchEntry) -> Result<()> {
        if self.entries.len() <= id.index() {
            self.entries.resize(id.index() + 1, None);
        }
        let slot = &mut self.entries[id.index()];
        if let Some(existing) = slot {
            return Err(WitnessError::InvalidCircuit(format!(
                "template {id} registered twice ({} and {})",
                existing.info.name, entry.info.name
            )));
        }
        *slot = Some(entry);
        Ok(())
    }

    /// Builder form of [`DispatchTable::insert`].
    pub fn with(mut self, id: TemplateId, entry: DispatchEntry) -> Result<Self> {
        self.insert(id, entry)?;
        Ok(self)
    }

    pub fn entry(&self, id: TemplateId) -> Option<&DispatchEntry> {
        self.entries.get(id.index())?.as_ref()
    }

    pub fn info(&self, id: TemplateId) -> Option<&TemplateInfo> {
        self.entry(id).map(|entry| &entry.info)
    }

    /// Pick the procedure to run. The alternate is only chosen when asked
    /// for and present; a missing alternate falls back to the synchronous
    /// entry.
    pub fn resolve(&self, id: TemplateId, prefer_alternate: bool) -> Option<RunFn> {
        let entry = self.entry(id)?;
        match entry.run_alternate {
            Some(alternate) if prefer_alternate => Some(alternate),
            _ => Some(entry.run),
        }
    }

    /// Every id below the highest registered one must have an entry.
    pub fn validate(&self) -> Result<()> {
        if let Some(gap) = self.entries.iter().position(Option::is_none) {
            return Err(WitnessError::InvalidCircuit(format!(
                "template T{gap} has no dispatch entry"
            )));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn alternate_count(&self) -> usize {
        self.entries
            .iter()
            .flatten()
            .filter(|entry| entry.run_alternate.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO: TemplateInfo = TemplateInfo::new("Probe", 1, 2, 4, 0);

    fn sync_body(_ctx: &mut WitnessContext, _id: ComponentId) -> Result<()> {
        Ok(())
    }

    fn alternate_body(_ctx: &mut WitnessContext, _id: ComponentId) -> Result<()> {
        Ok(())
    }

    #[test]
    fn input_block_follows_outputs() {
        assert_eq!(INFO.input_start(), 1);
        assert_eq!(INFO.input_end(), 3);
        assert!(!INFO.is_input(0));
        assert!(INFO.is_input(2));
        assert!(!INFO.is_input(3));
    }

    #[test]
    fn alternate_entries_are_optional() {
        let table = DispatchTable::new()
            .with(TemplateId(0), DispatchEntry::new(INFO, sync_body))
            .unwrap()
            .with(
                TemplateId(1),
                DispatchEntry::new(INFO, sync_body).with_alternate(alternate_body),
            )
            .unwrap();

        assert!(table.entry(TemplateId(0)).unwrap().run_alternate.is_none());
        assert!(table.entry(TemplateId(1)).unwrap().run_alternate.is_some());
        assert!(table.resolve(TemplateId(0), true).is_some());
        assert!(table.resolve(TemplateId(7), false).is_none());
        assert_eq!(table.alternate_count(), 1);
        assert_eq!(table.info(TemplateId(1)).unwrap().name, "Probe");
    }

    #[test]
    fn gaps_and_duplicates_are_rejected() {
        let mut table = DispatchTable::new();
        table
            .insert(TemplateId(1), DispatchEntry::new(INFO, sync_body))
            .unwrap();
        assert!(table.validate().is_err());

        assert!(table
            .insert(TemplateId(1), DispatchEntry::new(INFO, sync_body))
            .is_err());

        table
            .insert(TemplateId(0), DispatchEntry::new(INFO, sync_body))
            .unwrap();
        assert!(table.validate().is_ok());
    }
}
