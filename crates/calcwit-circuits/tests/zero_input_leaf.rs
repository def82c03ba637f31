//! A component without inputs runs inside its own creation.

use std::sync::Arc;

use calcwit::{ComponentId, ComponentState, EngineConfig, WitnessContext};
use calcwit_circuits::harness::{fr, init_logging, sample_inputs, TestRun};
use calcwit_circuits::{handles, ids, layout, sample_circuit, SEED};

#[test]
fn leaf_is_finished_when_create_returns() {
    init_logging();
    let circuit = Arc::new(sample_circuit().unwrap());
    let mut ctx = WitnessContext::new(circuit, EngineConfig::diagnostic());

    let leaf = ComponentId(1);
    ctx.create_component(leaf, ids::CONSTANT_LEAF, layout::LEAF, "leaf", None)
        .unwrap();

    assert_eq!(ctx.state(leaf), Some(ComponentState::Finished));
    assert_eq!(ctx.trace().decrement_count(leaf), 0);
    assert_eq!(ctx.trace().trigger_count(leaf), 1);
    assert_eq!(ctx.signals().read(layout::LEAF), fr(SEED));
    assert_eq!(ctx.signals().read(layout::LEAF + 1), fr(SEED * SEED));
}

#[test]
fn leaf_outputs_do_not_depend_on_inputs() {
    for (a, b) in [([0, 0, 0], [0, 0, 0]), ([9, 8, 7], [1, 2, 3])] {
        let inputs = sample_inputs(a, b, 3, false);
        let run = TestRun::calculate(sample_circuit().unwrap(), &inputs).unwrap();
        run.assert_signal(layout::LEAF, SEED);
        run.assert_signal(layout::LEAF + 1, SEED * SEED);
        run.assert_signal(layout::SEED, SEED);
        run.assert_state(handles::LEAF, ComponentState::Released);
    }
}
