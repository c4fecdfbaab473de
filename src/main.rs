use clap::Parser;
use tracing_subscriber::EnvFilter;

use voiceprobe::cli::suite::{handle_suite, Suite};
use voiceprobe::cli::{self, Cli, Commands};
use voiceprobe::reporting::renderer::render_build_line;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(!cli.no_color)
            .init();
    }

    if cli.no_color {
        console::set_colors_enabled(false);
    }
    if !cli.quiet {
        println!("{}", console::style(render_build_line()).dim());
    }

    let result = match &cli.command {
        Commands::Functional => handle_suite(&cli, Suite::Functional).await,
        Commands::Compat(args) => handle_suite(&cli, Suite::Compat(args.mode())).await,
        Commands::Contract => handle_suite(&cli, Suite::Contract).await,
        Commands::BodyVariants => handle_suite(&cli, Suite::BodyVariants).await,
        Commands::Sweep => handle_suite(&cli, Suite::Sweep).await,
        Commands::Security(args) => cli::security::handle_security(&cli, args).await,
        Commands::ValidateConfig(args) => cli::validate::handle_validate(args).await,
    };

    if let Err(e) = result {
        let classification = e.classify();
        tracing::debug!(error_type = classification.error_type, kind = ?classification.kind, "Run aborted");
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
