use glide_tensor_core::{
    check_compatible, lerp, smoothstep, IndexPath, InterpMethod, Tensor, TensorError, TensorKind,
};

fn t(v: f64) -> Tensor {
    Tensor::Scalar(v)
}

#[test]
fn scalar_lerp_midpoint() {
    assert_eq!(lerp(&t(0.0), &t(10.0), 0.5).unwrap(), t(5.0));
}

#[test]
fn scalar_lerp_endpoints() {
    let pairs = [(0.0, 1.0), (-7.25, 3.5), (1e6, -1e6), (42.0, 42.0)];
    for (a, b) in pairs {
        assert_eq!(lerp(&t(a), &t(b), 0.0).unwrap(), t(a), "lerp({a}, {b}, 0)");
        assert_eq!(lerp(&t(a), &t(b), 1.0).unwrap(), t(b), "lerp({a}, {b}, 1)");
    }
}

#[test]
fn sequence_lerp_recurses() {
    let out = lerp(&Tensor::from([0.0, 10.0]), &Tensor::from([10.0, 20.0]), 0.5).unwrap();
    assert_eq!(out, Tensor::from([5.0, 15.0]));
}

#[test]
fn smoothstep_identity_when_equal() {
    for f in [-2.0, 0.0, 0.3, 1.0, 9.0] {
        assert_eq!(smoothstep(&t(5.0), &t(5.0), f).unwrap(), t(5.0));
    }
}

#[test]
fn smoothstep_endpoints() {
    let pairs = [(0.0, 1.0), (-7.25, 3.5), (10.0, -10.0)];
    for (a, b) in pairs {
        assert_eq!(smoothstep(&t(a), &t(b), 0.0).unwrap(), t(a));
        assert_eq!(smoothstep(&t(a), &t(b), 1.0).unwrap(), t(b));
    }
}

#[test]
fn smoothstep_is_monotonic_inside_the_segment() {
    let mut prev = f64::NEG_INFINITY;
    for i in 0..=20 {
        let f = i as f64 / 20.0;
        let v = smoothstep(&t(0.0), &t(1.0), f).unwrap().as_scalar().unwrap();
        assert!(v >= prev, "not monotonic at fraction {f}");
        prev = v;
    }
}

#[test]
fn shape_mismatch_detected() {
    let err = lerp(&Tensor::from([1.0, 2.0]), &Tensor::from([1.0, 2.0, 3.0]), 0.5).unwrap_err();
    assert_eq!(
        err,
        TensorError::ShapeMismatch {
            path: IndexPath::root(),
            expected: 2,
            found: 3,
        }
    );
}

#[test]
fn kind_mismatch_detected() {
    let err = lerp(&t(1.0), &Tensor::from([1.0, 2.0]), 0.5).unwrap_err();
    assert_eq!(
        err,
        TensorError::TypeMismatch {
            path: IndexPath::root(),
            expected: TensorKind::Scalar,
            found: TensorKind::Seq,
        }
    );
    assert!(err.to_string().contains("type mismatch at $"));
}

#[test]
fn deep_mismatch_yields_no_partial_result() {
    let a = Tensor::from(vec![t(0.0), Tensor::from(vec![Tensor::from([1.0, 2.0])])]);
    let b = Tensor::from(vec![t(10.0), Tensor::from(vec![Tensor::from([1.0])])]);
    let err = smoothstep(&a, &b, 0.5).unwrap_err();
    assert_eq!(err.path().indices(), &[1, 0]);
    assert_eq!(check_compatible(&a, &b), Err(err));
}

#[test]
fn method_dispatch_matches_kernels() {
    let a = Tensor::from([0.0, 4.0]);
    let b = Tensor::from([8.0, 0.0]);
    assert_eq!(
        InterpMethod::Lerp.interpolate(&a, &b, 0.25).unwrap(),
        lerp(&a, &b, 0.25).unwrap()
    );
    assert_eq!(
        InterpMethod::EaseInOut.interpolate(&a, &b, 0.25).unwrap(),
        smoothstep(&a, &b, 0.25).unwrap()
    );
}

#[test]
fn method_serde_uses_hook_names() {
    let m: InterpMethod = serde_json::from_str("\"ease-in-out\"").unwrap();
    assert_eq!(m, InterpMethod::EaseInOut);
    assert_eq!(serde_json::to_string(&InterpMethod::Lerp).unwrap(), "\"lerp\"");
    assert!(serde_json::from_str::<InterpMethod>("\"linear\"").is_err());
}
