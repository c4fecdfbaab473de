use std::path::PathBuf;

use crate::cli::commands::ValidateArgs;
use crate::config;
use crate::errors::HarnessError;

pub async fn handle_validate(args: &ValidateArgs) -> Result<(), HarnessError> {
    let path = PathBuf::from(&args.file);
    let config = config::parse_config(&path).await?;
    println!("Configuration is valid: {}", args.file);
    println!("  target:    {}", config.target.url);
    println!("  container: {}", config.container.name);
    println!(
        "  scoring:   burst of {}, rate limit counts as pass: {}",
        config.scoring.burst_size, config.scoring.rate_limit_counts_as_pass
    );
    Ok(())
}
