//! Sample circuits for the calcwit engine, with the layouts a circuit
//! compiler would emit for them.

pub mod harness;
pub mod templates;

use calcwit::{
    Circuit, ConstantPool, DispatchEntry, DispatchTable, Fr, InputSignalMap, Result, TemplateId,
};

use templates::{constant_leaf, gate, is_zero, main, multiplier, multiplier_array, num2bits};

pub mod ids {
    use calcwit::TemplateId;

    pub const MULTIPLIER: TemplateId = TemplateId(0);
    pub const CONSTANT_LEAF: TemplateId = TemplateId(1);
    pub const NUM2BITS: TemplateId = TemplateId(2);
    pub const IS_ZERO: TemplateId = TemplateId(3);
    pub const MULTIPLIER_ARRAY: TemplateId = TemplateId(4);
    pub const GATE: TemplateId = TemplateId(5);
    pub const MAIN: TemplateId = TemplateId(6);
}

/// Width of the multiplier array inside [`sample_circuit`].
pub const ARRAY_LEN: usize = 3;

/// Pool index of the seed read by `ConstantLeaf`.
pub const SEED_CONSTANT: usize = 1;
pub const SEED: u64 = 7;

/// Global signal indices of the sample circuit.
pub mod layout {
    pub const MAIN: usize = 1;
    pub const RESULT: usize = MAIN;
    pub const SEED: usize = MAIN + 1;
    pub const MAIN_INPUTS: usize = MAIN + 2;
    pub const DOT: usize = MAIN + 10;
    pub const LEAF: usize = 12;
    pub const ARRAY: usize = 14;
    /// First signal of multiplier `i` is `MULTIPLIERS + 3 * i`
    pub const MULTIPLIERS: usize = 23;
    pub const GATE: usize = 32;
    pub const IS_ZERO: usize = 35;
    pub const NUM2BITS: usize = 38;
    pub const TOTAL_SIGNALS: usize = 43;
    pub const TOTAL_COMPONENTS: usize = 9;
}

/// Component handles of the sample circuit.
pub mod handles {
    use calcwit::ComponentId;

    pub const MAIN: ComponentId = ComponentId::ROOT;
    pub const LEAF: ComponentId = ComponentId(1);
    pub const ARRAY: ComponentId = ComponentId(2);
    pub const MULTIPLIERS: [ComponentId; 3] = [ComponentId(3), ComponentId(4), ComponentId(5)];
    pub const GATE: ComponentId = ComponentId(6);
    pub const IS_ZERO: ComponentId = ComponentId(7);
    pub const NUM2BITS: ComponentId = ComponentId(8);
}

/// `[1, SEED]`
pub fn constants() -> ConstantPool {
    [Fr::from(1u64), Fr::from(SEED)].into_iter().collect()
}

/// Every template, with the multiplier array of width `K`.
pub fn dispatch_table<const K: usize>() -> Result<DispatchTable> {
    DispatchTable::new()
        .with(ids::MULTIPLIER, DispatchEntry::new(multiplier::INFO, multiplier::run))?
        .with(
            ids::CONSTANT_LEAF,
            DispatchEntry::new(constant_leaf::INFO, constant_leaf::run),
        )?
        .with(ids::NUM2BITS, DispatchEntry::new(num2bits::INFO, num2bits::run))?
        .with(ids::IS_ZERO, DispatchEntry::new(is_zero::INFO, is_zero::run))?
        .with(
            ids::MULTIPLIER_ARRAY,
            DispatchEntry::new(multiplier_array::info::<K>(), multiplier_array::run::<K>),
        )?
        .with(ids::GATE, DispatchEntry::new(gate::INFO, gate::run))?
        .with(ids::MAIN, DispatchEntry::new(main::INFO, main::run))
}

/// `result = dot(a, b) + SEED^2 + gate(x, flag)`, `seed = SEED`.
///
/// Inputs: `a[3]`, `b[3]`, `x`, `flag`. The witness is the constant one,
/// the main block and the gate output.
pub fn sample_circuit() -> Result<Circuit> {
    let mut inputs = InputSignalMap::new();
    inputs.insert("a", 0, ARRAY_LEN)?;
    inputs.insert("b", ARRAY_LEN, ARRAY_LEN)?;
    inputs.insert("x", 2 * ARRAY_LEN, 1)?;
    inputs.insert("flag", 2 * ARRAY_LEN + 1, 1)?;

    let mut witness: Vec<usize> = (0..layout::LEAF).collect();
    witness.push(layout::GATE);

    Circuit::builder("sample")
        .total_signals(layout::TOTAL_SIGNALS)
        .total_components(layout::TOTAL_COMPONENTS)
        .main_template(ids::MAIN)
        .constants(constants())
        .dispatch(dispatch_table::<ARRAY_LEN>()?)
        .inputs(inputs)
        .witness_to_signal(witness)
        .build()
}

/// A single `Multiplier` as main: inputs `a`, `b`, output at signal 1.
pub fn multiplier_circuit() -> Result<Circuit> {
    let mut inputs = InputSignalMap::new();
    inputs.insert("a", 0, 1)?;
    inputs.insert("b", 1, 1)?;
    main_only(
        "multiplier",
        ids::MULTIPLIER,
        1 + multiplier::INFO.signals,
        1,
        dispatch_table::<ARRAY_LEN>()?,
        inputs,
    )
}

/// A `MultiplierArray<K>` as main: inputs `a[K]`, `b[K]`, products at
/// signals `1..=K`.
pub fn multiplier_array_circuit<const K: usize>() -> Result<Circuit> {
    let mut inputs = InputSignalMap::new();
    inputs.insert("a", 0, K)?;
    inputs.insert("b", K, K)?;
    main_only(
        "multiplier_array",
        ids::MULTIPLIER_ARRAY,
        1 + multiplier_array::subtree_signals(K),
        multiplier_array::subtree_components(K),
        dispatch_table::<K>()?,
        inputs,
    )
}

fn main_only(
    name: &str,
    main_template: TemplateId,
    total_signals: usize,
    total_components: usize,
    dispatch: DispatchTable,
    inputs: InputSignalMap,
) -> Result<Circuit> {
    Circuit::builder(name)
        .total_signals(total_signals)
        .total_components(total_components)
        .main_template(main_template)
        .constants(constants())
        .dispatch(dispatch)
        .inputs(inputs)
        .build()
}
