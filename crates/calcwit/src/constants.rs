//! Constant pool shared by every component body of a circuit.
//!
//! Entries are appended while the circuit is being described and never
//! change afterwards; a built [`Circuit`](crate::circuit::Circuit) only
//! hands out shared references.

use crate::error::{Result, WitnessError};
use crate::field::{self, Fr};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantPool {
    values: Vec<Fr>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a constant, returning its index.
    pub fn push(&mut self, value: Fr) -> usize {
        self.values.push(value);
        self.values.len() - 1
    }

    /// Append a constant written as a decimal or hex literal.
    pub fn push_literal(&mut self, literal: &str) -> Result<usize> {
        let value = field::parse(literal).ok_or_else(|| {
            WitnessError::InvalidCircuit(format!("bad constant literal {literal:?}"))
        })?;
        Ok(self.push(value))
    }

    /// Constant at `index`. Indices are emitted by the compiler, so an
    /// out-of-range index panics.
    pub fn get(&self, index: usize) -> &Fr {
        &self.values[index]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fr> {
        self.values.iter()
    }
}

impl FromIterator<Fr> for ConstantPool {
    fn from_iter<I: IntoIterator<Item = Fr>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_returns_positions() {
        let mut pool = ConstantPool::new();
        assert_eq!(pool.push(Fr::from(1u64)), 0);
        assert_eq!(pool.push_literal("7").unwrap(), 1);
        assert_eq!(*pool.get(1), Fr::from(7u64));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn bad_literal_is_rejected() {
        let mut pool = ConstantPool::new();
        assert!(pool.push_literal("seven").is_err());
        assert!(pool.is_empty());
    }
}
