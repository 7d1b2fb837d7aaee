//! Generate command - builds one package without starting the server

use std::path::PathBuf;

use clap::Args;

use crate::api::types::GeneratePackageResponse;
use crate::config::AppConfig;
use crate::domain::RawPackageConfig;
use crate::infrastructure::logging;

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Number of rooms in the generated maze
    #[arg(long)]
    pub maze_rooms: u64,

    /// Total training steps
    #[arg(long)]
    pub training_steps: u64,

    /// Training algorithm, defaults to PPO
    #[arg(long)]
    pub algorithm: Option<String>,

    /// Override the configured template directory
    #[arg(long)]
    pub template_dir: Option<PathBuf>,

    /// Override the configured output (scratch) directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

impl GenerateArgs {
    fn raw_config(&self) -> RawPackageConfig {
        let raw = RawPackageConfig::new(self.maze_rooms, self.training_steps);
        match &self.algorithm {
            Some(algorithm) => raw.with_algorithm(algorithm.clone()),
            None => raw,
        }
    }

    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.template_dir {
            config.package.template_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.package.scratch_dir = dir.clone();
        }
    }
}

/// Run a one-shot generation and print the outcome as JSON on stdout
pub async fn run(args: GenerateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);
    args.apply_overrides(&mut config);

    let response = execute(&args, &config).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

async fn execute(args: &GenerateArgs, config: &AppConfig) -> anyhow::Result<GeneratePackageResponse> {
    let service = crate::create_package_service(config).await?;
    let outcome = service.generate(args.raw_config()).await?;

    Ok(GeneratePackageResponse::from(outcome))
}
