use std::rc::Rc;

use glide_interp_core::{Interpolation, InterpolationConfig, ManualTimer, Phase, Tensor};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Script {
    config: InterpolationConfig,
    initial: Tensor,
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
enum Step {
    SetTarget { value: Tensor },
    SetPeriod { seconds: f64 },
    Advance { ms: u64 },
    ExpectCurrent { value: Tensor },
    ExpectPhase { phase: Phase },
}

fn approx_tensor(actual: &Tensor, expected: &Tensor, eps: f64) -> bool {
    actual.shape() == expected.shape()
        && actual
            .scalars()
            .iter()
            .zip(expected.scalars())
            .all(|(a, e)| (a - e).abs() <= eps)
}

fn run_script(name: &str) {
    let script: Script = glide_test_fixtures::sessions::load(name).expect("load session fixture");
    let timer = Rc::new(ManualTimer::new(0));
    let value = Interpolation::new(script.initial, script.config, timer.clone())
        .expect("construct interpolation");

    for (i, step) in script.steps.into_iter().enumerate() {
        match step {
            Step::SetTarget { value: target } => value.set_target(target).expect("set target"),
            Step::SetPeriod { seconds } => value.set_period(seconds).expect("set period"),
            Step::Advance { ms } => {
                timer.advance(ms);
            }
            Step::ExpectCurrent { value: expected } => {
                let current = value.current();
                assert!(
                    approx_tensor(&current, &expected, 1e-9),
                    "{name} step {i}: current={current} expected={expected}"
                );
            }
            Step::ExpectPhase { phase } => {
                assert_eq!(value.phase(), phase, "{name} step {i}");
            }
        }
    }
}

#[test]
fn lerp_retarget_script() {
    run_script("lerp-retarget");
}

#[test]
fn ease_scalar_script() {
    run_script("ease-scalar");
}

#[test]
fn every_session_fixture_runs() {
    let mut keys = glide_test_fixtures::sessions::keys();
    keys.sort();
    assert!(keys.len() >= 2);
    for key in keys {
        run_script(&key);
    }
}

#[test]
fn ragged_demo_tensor_animates_per_leaf() {
    let initial: Tensor = glide_test_fixtures::tensors::load("demo-ragged").expect("fixture");
    let timer = Rc::new(ManualTimer::new(0));
    let value = Interpolation::new(initial.clone(), InterpolationConfig::default(), timer.clone())
        .expect("construct");

    let doubled = initial.map_scalars(|v| v * 2.0);
    value.set_target(doubled.clone()).unwrap();
    // 1.5s default duration with 20ms ticks: the tick at 600ms is 40% in.
    timer.advance(600);
    let expected = initial.map_scalars(|v| v * 1.4);
    assert!(approx_tensor(&value.current(), &expected, 1e-9));

    timer.advance(2_000);
    assert_eq!(value.current(), doubled);
    assert!(value.is_settled());
}
