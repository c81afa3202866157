use std::{ env, path::PathBuf };
use xpotential::Potential;

// sample a potential on an even grid and print it as two columns
//
// usage: sample [config] [start] [end] [n] [name=value ...]

fn main() -> anyhow::Result<()> {
    const DEF_CONFIG: &str = "potentials/bumpdown.cfg";
    const DEF_BOUNDS: (f64, f64) = (-2.5, 2.5);
    const DEF_N: usize = 101;

    let args: Vec<String> = env::args().skip(1).collect();
    let (positional, changes): (Vec<&String>, Vec<&String>)
        = args.iter().partition(|arg| !arg.contains('='));

    let path
        = positional.first()
        .map(|p| PathBuf::from(p.as_str()))
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEF_CONFIG));
    let start: f64
        = positional.get(1).map(|s| s.parse::<f64>()).transpose()?.unwrap_or(DEF_BOUNDS.0);
    let end: f64
        = positional.get(2).map(|s| s.parse::<f64>()).transpose()?.unwrap_or(DEF_BOUNDS.1);
    let n: usize
        = positional.get(3).map(|s| s.parse::<usize>()).transpose()?.unwrap_or(DEF_N);

    let mut pot = Potential::new(&path)?;
    let changes: Vec<(&str, f64)>
        = changes.iter()
        .map(|arg| {
            let (name, value) = arg.split_once('=').unwrap_or((arg.as_str(), ""));
            Ok::<_, anyhow::Error>((name, value.parse::<f64>()?))
        })
        .collect::<anyhow::Result<_>>()?;
    if !changes.is_empty() { pot.adjust(changes)?; }

    println!("# {}", pot.path().display());
    for (name, value) in pot.params().iter() {
        println!("# {name} = {value}");
    }
    let (x, v) = pot.sample(start, end, n)?;
    x.iter().zip(&v)
        .for_each(|(xk, vk)| println!("{xk:+.6e} {vk:+.6e}"));
    Ok(())
}
