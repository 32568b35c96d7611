use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::info;

use vpp_polar::cli::Args;
use vpp_polar::config::Config;
use vpp_polar::display::{self, DisplayMode};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "vpp-polar", &mut std::io::stdout());
        return Ok(());
    }

    // Handle --init-config
    if args.init_config {
        let path = Config::init_default_config()?;
        println!("Config written to {}", path.display());
        return Ok(());
    }

    // Load config: explicit path > default XDG path > defaults
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_from_default_path().unwrap_or_default(),
    };
    config.merge_args(&args);

    // Log output would tear up the terminal UI, so it is opt-in there
    let mode = config.display.mode;
    if mode != DisplayMode::Terminal || std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("vpp_polar=info".parse()?),
            )
            .init();
    }

    info!("Starting vpp-polar in {:?} mode", mode);

    match mode {
        DisplayMode::Svg => {
            display::svg::run(config, &args).await?;
        }
        #[cfg(feature = "terminal")]
        DisplayMode::Terminal => {
            display::terminal::run(config, &args).await?;
        }
        #[cfg(not(feature = "terminal"))]
        DisplayMode::Terminal => {
            anyhow::bail!("Terminal mode not compiled in. Rebuild with --features terminal");
        }
    }

    Ok(())
}
