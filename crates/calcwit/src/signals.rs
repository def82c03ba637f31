//! Flat signal store.
//!
//! Every signal of the circuit lives at a fixed index for the whole witness
//! computation. Indices come from the compiler and are not range checked
//! beyond the slice bounds check.

use ark_ff::Zero;

use crate::field::Fr;

#[derive(Debug, Clone)]
pub struct SignalStore {
    values: Vec<Fr>,
    written: Vec<bool>,
}

impl SignalStore {
    /// Reserve `total_signals` slots, all unwritten.
    pub fn allocate(total_signals: usize) -> Self {
        Self {
            values: vec![Fr::zero(); total_signals],
            written: vec![false; total_signals],
        }
    }

    pub fn read(&self, index: usize) -> Fr {
        self.values[index]
    }

    pub fn write(&mut self, index: usize, value: Fr) {
        self.values[index] = value;
        self.written[index] = true;
    }

    pub fn is_written(&self, index: usize) -> bool {
        self.written[index]
    }

    /// Number of slots written so far.
    pub fn written_count(&self) -> usize {
        self.written.iter().filter(|w| **w).count()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Fr] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Fr> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_marks_slot() {
        let mut store = SignalStore::allocate(4);
        assert!(!store.is_written(2));

        store.write(2, Fr::from(9u64));
        assert!(store.is_written(2));
        assert_eq!(store.read(2), Fr::from(9u64));
        assert_eq!(store.written_count(), 1);
    }

    #[test]
    #[should_panic]
    fn out_of_range_panics() {
        let store = SignalStore::allocate(1);
        let _ = store.read(1);
    }
}
