use std::{env, path::PathBuf};

use autodsl::Config;

fn main() -> eyre::Result<()> {
    let src = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?).join("src");
    let out_dir = env::var("OUT_DIR")?;
    println!("cargo::rerun-if-changed=src");

    let config = Config::default()
        .with_source_root(src)
        .with_generated_dir(out_dir);
    let report = autodsl::generate(config)?;

    for diagnostic in &report.diagnostics {
        println!("cargo::warning={}", diagnostic);
    }
    if report.has_errors() {
        eyre::bail!(
            "autodsl reported {} error(s)",
            report.diagnostics.len()
        );
    }
    Ok(())
}
