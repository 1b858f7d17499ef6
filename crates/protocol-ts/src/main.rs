//! Exports TypeScript declarations for the ck-protocol shapes.
//!
//! Usage: `ck-protocol-ts [OUT_DIR]` (defaults to `bindings/`).

use ck_protocol::{GenerableType, GlobalConfig, ParameterContents, ParameterType, ParameterValue};
use color_eyre::eyre::WrapErr;
use std::path::PathBuf;
use ts_rs::TS;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("bindings"));

    // Dependencies of each type are exported alongside it.
    ParameterContents::export_all_to(&out_dir).wrap_err("Failed to export ParameterContents")?;
    ParameterType::export_all_to(&out_dir).wrap_err("Failed to export ParameterType")?;
    ParameterValue::export_all_to(&out_dir).wrap_err("Failed to export ParameterValue")?;
    GenerableType::export_all_to(&out_dir).wrap_err("Failed to export GenerableType")?;
    GlobalConfig::export_all_to(&out_dir).wrap_err("Failed to export GlobalConfig")?;

    println!("Exported TypeScript bindings to {}", out_dir.display());
    Ok(())
}
