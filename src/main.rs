mod cli;

use ripforge::{
    config,
    drives::{DriveScanner, SystemDriveScanner},
    tui,
};
use ripforge_av::{get_tool_path, handbrake_presets, HANDBRAKE, MAKEMKV};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Mutex;

fn env_filter(verbose: bool) -> String {
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose {
            "ripforge=trace,ripforge_av=trace,ripforge_common=debug".to_string()
        } else {
            "ripforge=info,ripforge_av=info".to_string()
        }
    })
}

/// Log to stderr for one-shot commands.
fn init_stderr_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .init();
}

/// The interactive session owns the terminal, so logs go to a file.
fn init_file_logging(verbose: bool, path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            init_file_logging(cli.verbose, &config.logging.file)?;
            let rt = tokio::runtime::Runtime::new()?;
            let result = tui::run(&config, rt.handle());
            rt.shutdown_timeout(std::time::Duration::from_secs(2));
            result
        }
        Commands::CheckTools => {
            init_stderr_logging(cli.verbose);
            let config = config::load_config_or_default(cli.config.as_deref())?;
            check_tools(&config)
        }
        Commands::Drives => {
            init_stderr_logging(cli.verbose);
            let config = config::load_config_or_default(cli.config.as_deref())?;
            list_drives(&config)
        }
        Commands::Titles { device, json } => {
            init_stderr_logging(cli.verbose);
            let config = config::load_config_or_default(cli.config.as_deref())?;
            list_titles(&config, &device, json)
        }
        Commands::Presets => {
            init_stderr_logging(cli.verbose);
            let config = config::load_config_or_default(cli.config.as_deref())?;
            list_presets(&config)
        }
        Commands::Validate {
            config: config_path,
        } => {
            init_stderr_logging(cli.verbose);
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("ripforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn check_tools(config: &config::Config) -> Result<()> {
    println!("Checking external tools...\n");

    let tools = ripforge_av::check_tools(
        config.tools.makemkvcon_path.as_deref(),
        config.tools.handbrake_path.as_deref(),
    );
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install them to rip and encode.");
    }

    Ok(())
}

fn makemkv_path(config: &config::Config) -> std::path::PathBuf {
    get_tool_path(MAKEMKV, config.tools.makemkvcon_path.as_deref())
        .unwrap_or_else(|_| MAKEMKV.into())
}

fn list_drives(config: &config::Config) -> Result<()> {
    let scanner = SystemDriveScanner::new(config.drives.candidates.clone(), makemkv_path(config));
    let drives = scanner.scan();

    if drives.is_empty() {
        println!("No optical drives found");
        return Ok(());
    }

    for drive in drives {
        println!(
            "{}  {} [{}]",
            drive.device_path.display(),
            drive.display_name,
            drive.disc_type
        );
    }
    Ok(())
}

fn list_titles(config: &config::Config, device: &Path, json: bool) -> Result<()> {
    let tool = get_tool_path(MAKEMKV, config.tools.makemkvcon_path.as_deref())?;
    let info = ripforge_av::disc_info(&tool, device)
        .with_context(|| format!("Failed to read titles from {:?}", device))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info.titles)?);
        return Ok(());
    }

    if let Some(ref name) = info.name {
        println!("Disc: {}", name);
    }
    println!("Titles: {}", info.titles.len());
    for title in &info.titles {
        println!(
            "  [{}] {}  {}  {} chapter(s)  {}",
            title.index, title.duration, title.size, title.chapter_count, title.description
        );
    }
    Ok(())
}

fn list_presets(config: &config::Config) -> Result<()> {
    let tool = get_tool_path(HANDBRAKE, config.tools.handbrake_path.as_deref())?;
    let presets = handbrake_presets(&tool)?;

    if presets.is_empty() {
        println!("No presets reported by {}", tool.display());
    }
    for preset in presets {
        println!("{}", preset);
    }
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    for warning in config::validate_config(&config)? {
        println!("! {}", warning);
    }

    println!("✓ Configuration is valid");
    println!("  Output: {}", config.output.dir.display());
    println!(
        "  Encoded: {}",
        config.output.dir.join(&config.output.encoded_subdir).display()
    );
    println!(
        "  Encoder: {} ({}, q={})",
        config.encode.encoder, config.encode.encoder_preset, config.encode.quality
    );
    if let Some(ref preset) = config.encode.preset {
        println!("  Preset: {}", preset);
    }
    println!("  Drive candidates: {}", config.drives.candidates.len());
    println!("  Log file: {}", config.logging.file.display());

    Ok(())
}
