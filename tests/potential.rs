use std::{ f64::consts::PI, io::Write, path::PathBuf };
use ndarray as nd;
use xpotential::{ Potential, PotError, Sampled, Value, DEF_VALUE };

fn cfg(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("potentials").join(name)
}

#[test]
fn parameter_access() {
    let pot = Potential::new(cfg("kronigpenney.cfg")).unwrap();
    assert_eq!(pot.param("w").unwrap(), &pot.params()["w"]);

    let pot = Potential::new(cfg("bumpdown.cfg")).unwrap();
    assert_eq!(pot.param("a").unwrap(), &pot.params()["a"]);

    let pot = Potential::new(cfg("sho.cfg")).unwrap();
    assert_eq!(pot.param("w").unwrap(), &pot.params()["w"]);

    match pot.param("dummy") {
        Err(PotError::UnknownAttribute { name, path }) => {
            assert_eq!(name, "dummy");
            assert!(path.ends_with("sho.cfg"));
        },
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn sho() {
    let pot = Potential::new(cfg("sho.cfg")).unwrap();
    assert_eq!(pot.eval(1.2).unwrap(), 0.0);
    assert_eq!(pot.eval(0.5).unwrap(), 0.125);
}

#[test]
fn kronig_penney() {
    let pot = Potential::new(cfg("kronigpenney.cfg")).unwrap();
    let v0 = pot.param_f64("v0").unwrap();
    let l = pot.param_f64("l").unwrap();
    for cell in -5..5 {
        let x0 = cell as f64 * l;
        assert_eq!(pot.eval(x0).unwrap(), v0);
        assert_eq!(pot.eval(x0 + 0.1).unwrap(), v0);
        assert_eq!(pot.eval(x0 + 0.5).unwrap(), 0.0);
    }
    assert_eq!(pot.eval(5.0).unwrap(), DEF_VALUE);
}

#[test]
fn bumpdown() {
    let mut pot = Potential::new(cfg("bumpdown.cfg")).unwrap();
    let params: [(f64, f64, f64, usize); 4] = [
        (2.0, 1.0, 15.0, 100),
        (1e5, 5e4, 1234.0, 100_000),
        (1.0 / 3.0, 1.0 / 6.0, 10.0, 5),
        (PI, PI / 2.0, -(2.0_f64.sqrt()), 23),
    ];
    for (a, w, v0, n) in params {
        pot.adjust([("a", a), ("w", w), ("v0", v0)]).unwrap();
        let x = w + (a - w) / 2.0;
        let xa: nd::Array1<f64> = nd::Array1::linspace(-a, a, n);
        assert_eq!(pot.eval(x).unwrap(), v0);
        assert_eq!(pot.eval(3.0 / 4.0 * w).unwrap(), 0.0);
        assert_eq!(pot.eval(5.0 / 4.0 * w).unwrap(), v0);
        assert_eq!(pot.eval_array(&xa).unwrap().len(), n);
        assert_eq!(pot.eval(-0.5 * a).unwrap(), 0.0);
        assert_eq!(pot.eval(-w).unwrap(), 0.0);
        assert_eq!(pot.eval(a).unwrap(), 0.0);
        assert!(matches!(pot.call(&Value::from("a")), Err(PotError::InvalidInput(_))));
    }
}

#[test]
fn vector_matches_scalar() {
    let pot = Potential::new(cfg("kronigpenney.cfg")).unwrap();
    let (x, v) = pot.sample(-6.0, 6.0, 241).unwrap();
    assert_eq!(x.len(), 241);
    assert_eq!(v.len(), 241);
    x.iter().zip(&v)
        .for_each(|(xk, vk)| assert_eq!(pot.eval(*xk).unwrap(), *vk));

    let xs: Vec<f64> = x.to_vec();
    match pot.call(&Value::from(xs)).unwrap() {
        Sampled::Array(w) => assert_eq!(w, v),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn evaluation_is_repeatable() {
    let pot = Potential::new(cfg("bumpdown.cfg")).unwrap();
    for x in [-2.5, -1.5, 0.0, 1.0, 1.999, 2.0] {
        assert_eq!(pot.eval(x).unwrap(), pot.eval(x).unwrap());
    }
}

#[test]
fn numpy_and_operator_rules() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "\
[parameters]
v0 = 4.
cut = 0.5

[regions]
step = (0, 1)|lambda x: numpy.where(operator.lt(x, cut), v0, 0.)
root = (1, 10)|lambda x: v0 * np.sqrt(x)
",
    ).unwrap();
    let mut pot = Potential::new(file.path()).unwrap();
    assert_eq!(pot.eval(0.25).unwrap(), 4.0);
    assert_eq!(pot.eval(0.75).unwrap(), 0.0);
    assert_eq!(pot.eval(4.0).unwrap(), 8.0);

    pot.adjust([("cut", 0.8)]).unwrap();
    assert_eq!(pot.eval(0.75).unwrap(), 4.0);
}

#[test]
fn construction_failures() {
    let missing = cfg("does-not-exist.cfg");
    assert!(matches!(Potential::new(missing), Err(PotError::ConfigNotFound { .. })));

    assert!(matches!(
        Potential::from_str("[parameters]\na = 1.\n"),
        Err(PotError::MissingRegions(_)),
    ));
    assert!(matches!(
        Potential::from_str("[regions]\nr = (0, 1) 2.\n"),
        Err(PotError::MalformedRegion { .. }),
    ));
    assert!(matches!(
        Potential::from_str("[parameters]\na = (1.\n[regions]\nr = (0, 1)|1.\n"),
        Err(PotError::Expr { .. }),
    ));
    assert!(matches!(
        Potential::from_str("[regions]\nr = (0, b)|1.\n"),
        Err(PotError::Expr { .. }),
    ));
}
