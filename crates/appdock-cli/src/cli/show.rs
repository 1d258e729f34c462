use crate::context::AppContext;
use crate::Result;
use appdock_manifest::loader;
use clap::Args;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Args)]
pub struct ManifestArgs {
    /// Application directory containing manifest.json
    #[arg(default_value = ".")]
    pub app_dir: PathBuf,
}

pub fn execute_manifest(args: ManifestArgs) -> Result<()> {
    let schema = loader::load_from_app_dir(&args.app_dir)?;
    println!("{}", schema.to_json_string());
    Ok(())
}

#[derive(Args)]
pub struct ParamsArgs {
    /// Override the application root (else APPDOCK_APP_DIR, else /app)
    #[arg(long)]
    pub app_dir: Option<PathBuf>,

    /// Override the data root (else APPDOCK_DATA_ROOT, else /data)
    #[arg(long)]
    pub data_root: Option<PathBuf>,
}

pub fn execute_params(args: ParamsArgs) -> Result<()> {
    let context = AppContext::initialize(args.app_dir.as_deref(), args.data_root.as_deref())?;

    // Sort for stable, diff-friendly output
    let resolved: BTreeMap<String, serde_json::Value> =
        context.parameters()?.into_iter().collect();
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}
