//! `vigil init` — scaffold a starter configuration.

use std::path::Path;

use anyhow::bail;

use vigil_core::VerifyConfig;

pub fn run(path: &str, base_url: &str) -> anyhow::Result<()> {
    let output = Path::new(path);
    if output.exists() {
        bail!("{} already exists, refusing to overwrite", output.display());
    }

    let config = VerifyConfig::scaffold(base_url);
    std::fs::write(output, config.to_toml_string()?)?;
    println!("✓ Generated {}", output.display());

    Ok(())
}
