//! Failed in-body asserts abort the computation with the failing component.

use calcwit::WitnessError;
use calcwit_circuits::harness::{diagnostic_calculator, sample_inputs};
use calcwit_circuits::sample_circuit;
use calcwit_circuits::templates::num2bits;

#[test]
fn out_of_range_value_fails_the_bit_decomposition() {
    let calculator = diagnostic_calculator(sample_circuit().unwrap());
    let err = calculator
        .calculate(&sample_inputs([1, 2, 3], [4, 5, 6], 16, true))
        .unwrap_err();

    match err {
        WitnessError::AssertionFailed {
            template,
            label,
            line,
        } => {
            assert_eq!(template, "Num2Bits");
            assert_eq!(label, "main.gate.n2b");
            assert_eq!(line, num2bits::SUM_ASSERT_LINE);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn same_value_passes_when_the_check_is_skipped() {
    let calculator = diagnostic_calculator(sample_circuit().unwrap());
    let witness = calculator
        .calculate(&sample_inputs([1, 2, 3], [4, 5, 6], 16, false))
        .unwrap();
    assert_eq!(witness[1], calcwit::Fr::from(32u64 + 49));
}
