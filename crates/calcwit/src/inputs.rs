//! Main-component inputs: the hash map emitted by the compiler, the
//! assignment protocol, and JSON input documents.
//!
//! Input signals are addressed by the 64-bit FNV-1a hash of their name.
//! Each entry gives the offset and size of the signal inside the main
//! input block.

use std::hash::Hasher;

use fnv::FnvHasher;
use rustc_hash::FxHashMap;
use serde_json::Value as JsonValue;

use crate::context::WitnessContext;
use crate::error::{Result, WitnessError};
use crate::field::{self, Fr};
use crate::trace::TraceEvent;

pub fn input_hash(name: &str) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(name.as_bytes());
    hasher.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSignalInfo {
    /// Offset from the start of the main input block
    pub offset: usize,
    /// Number of field elements (arrays are flattened row-major)
    pub size: usize,
}

#[derive(Debug, Clone, Default)]
pub struct InputSignalMap {
    entries: FxHashMap<u64, InputSignalInfo>,
    names: Vec<(String, u64)>,
}

impl InputSignalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, offset: usize, size: usize) -> Result<()> {
        let name = name.into();
        let hash = input_hash(&name);
        if self.entries.contains_key(&hash) {
            return Err(WitnessError::InvalidCircuit(format!(
                "input {name:?} declared twice"
            )));
        }
        self.entries.insert(hash, InputSignalInfo { offset, size });
        self.names.push((name, hash));
        Ok(())
    }

    pub fn get(&self, hash: u64) -> Option<&InputSignalInfo> {
        self.entries.get(&hash)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&InputSignalInfo> {
        self.get(input_hash(name))
    }

    /// Declared names with their hashes, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = (&str, u64)> {
        self.names.iter().map(|(name, hash)| (name.as_str(), *hash))
    }

    /// Total number of input elements covered by the map.
    pub fn total_size(&self) -> usize {
        self.entries.values().map(|info| info.size).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Named input values, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputAssignment {
    entries: Vec<(String, Vec<Fr>)>,
}

impl InputAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the values of `name`, replacing any earlier ones.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Fr>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = values,
            None => self.entries.push((name, values)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, values: Vec<Fr>) -> Self {
        self.insert(name, values);
        self
    }

    /// Parse `{"a": "3", "b": ["1", 2, ["0x03"]]}`. Strings may be decimal
    /// or hex, numbers may be negative; nested arrays are flattened.
    pub fn from_json(text: &str) -> Result<Self> {
        let document: JsonValue = serde_json::from_str(text)?;
        let JsonValue::Object(map) = document else {
            return Err(WitnessError::InvalidInputValue {
                name: "<document>".to_string(),
                value: "expected a JSON object".to_string(),
            });
        };

        let mut inputs = Self::new();
        for (name, value) in map {
            let mut values = Vec::new();
            flatten_into(&name, &value, &mut values)?;
            inputs.insert(name, values);
        }
        Ok(inputs)
    }

    pub fn get(&self, name: &str) -> Option<&[Fr]> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, values)| values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Fr])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten_into(name: &str, value: &JsonValue, out: &mut Vec<Fr>) -> Result<()> {
    let invalid = || WitnessError::InvalidInputValue {
        name: name.to_string(),
        value: value.to_string(),
    };
    match value {
        JsonValue::String(text) => out.push(field::parse(text).ok_or_else(invalid)?),
        JsonValue::Number(number) => {
            let element = if let Some(v) = number.as_u64() {
                Fr::from(v)
            } else if let Some(v) = number.as_i64() {
                -Fr::from(v.unsigned_abs())
            } else {
                return Err(invalid());
            };
            out.push(element);
        }
        JsonValue::Bool(flag) => out.push(field::from_bool(*flag)),
        JsonValue::Array(items) => {
            for item in items {
                flatten_into(name, item, out)?;
            }
        }
        JsonValue::Null | JsonValue::Object(_) => return Err(invalid()),
    }
    Ok(())
}

impl WitnessContext {
    /// Assign element `index` of the input signal whose name hashes to
    /// `hash`. The assignment that completes the main input block runs the
    /// root component.
    pub fn set_input_signal(&mut self, hash: u64, index: usize, value: Fr) -> Result<()> {
        if self.input_counter == 0 {
            log::warn!("input {hash:#018x}[{index}] assigned after all inputs were set");
            return Err(WitnessError::AllInputsAssigned);
        }
        let Some(info) = self.circuit.inputs().get(hash).copied() else {
            log::warn!("no input signal with hash {hash:#018x}");
            return Err(WitnessError::UnknownInput { hash });
        };
        if index >= info.size {
            log::warn!("input {hash:#018x}[{index}] beyond its {} elements", info.size);
            return Err(WitnessError::InputIndexOutOfRange {
                hash,
                index,
                size: info.size,
            });
        }

        let signal = self.circuit.main_input_start() + info.offset + index;
        if self.signals.is_written(signal) {
            log::warn!("input {hash:#018x}[{index}] (signal {signal}) assigned twice");
            return Err(WitnessError::InputAssignedTwice { hash, index });
        }
        self.signals.write(signal, value);
        self.trace.record(TraceEvent::SignalWritten { signal });

        self.input_counter -= 1;
        if self.input_counter == 0 {
            self.run_root()?;
        }
        Ok(())
    }

    /// [`WitnessContext::set_input_signal`] by name.
    pub fn set_input(&mut self, name: &str, index: usize, value: Fr) -> Result<()> {
        if self.circuit.inputs().get_by_name(name).is_none() {
            return Err(WitnessError::UnknownInputName {
                name: name.to_string(),
            });
        }
        self.set_input_signal(input_hash(name), index, value)
    }

    /// Assign every value of `inputs` through the protocol.
    pub fn set_inputs(&mut self, inputs: &InputAssignment) -> Result<()> {
        for (name, values) in inputs.iter() {
            for (index, value) in values.iter().enumerate() {
                self.set_input(name, index, *value)?;
            }
        }
        Ok(())
    }

    /// Main inputs still waiting for a value.
    pub fn pending_main_inputs(&self) -> u32 {
        self.input_counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_matches_reference_vectors() {
        assert_eq!(input_hash(""), 0xcbf29ce484222325);
        assert_eq!(input_hash("a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn map_rejects_duplicate_names() {
        let mut map = InputSignalMap::new();
        map.insert("a", 0, 3).unwrap();
        map.insert("b", 3, 1).unwrap();
        assert!(map.insert("a", 4, 1).is_err());
        assert_eq!(map.total_size(), 4);
        assert_eq!(map.get_by_name("b"), Some(&InputSignalInfo { offset: 3, size: 1 }));
    }

    #[test]
    fn json_values_are_flattened() {
        let inputs =
            InputAssignment::from_json(r#"{"a": ["1", 2, ["0x03", -1]], "flag": true}"#).unwrap();
        assert_eq!(
            inputs.get("a").unwrap(),
            &[Fr::from(1u64), Fr::from(2u64), Fr::from(3u64), -Fr::from(1u64)]
        );
        assert_eq!(inputs.get("flag").unwrap(), &[Fr::from(1u64)]);
    }

    #[test]
    fn json_rejects_bad_values() {
        assert!(matches!(
            InputAssignment::from_json(r#"{"a": "x1"}"#),
            Err(WitnessError::InvalidInputValue { .. })
        ));
        assert!(matches!(
            InputAssignment::from_json("[1, 2]"),
            Err(WitnessError::InvalidInputValue { .. })
        ));
        assert!(matches!(
            InputAssignment::from_json("{"),
            Err(WitnessError::Json(_))
        ));
    }

    #[test]
    fn insert_replaces_existing_values() {
        let inputs = InputAssignment::new()
            .with("x", vec![Fr::from(1u64)])
            .with("x", vec![Fr::from(2u64)]);
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs.get("x").unwrap(), &[Fr::from(2u64)]);
    }
}
