use clap::{ArgAction, Parser, Subcommand};
use gallery_export::config::{self, ConfigError, ExportConfig};
use gallery_export::tree::GalleryTree;
use gallery_export::types::Gallery;
use gallery_export::{document, output, site, source};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status for anything other than a configuration problem.
const EXIT_FAILURE: u8 = 1;
/// Exit status when configuration is missing or invalid.
const EXIT_CONFIG: u8 = 2;

#[derive(Parser)]
#[command(name = "gallery-export")]
#[command(version)]
#[command(about = "Export a photo-gallery database to JSON and a static HTML site")]
#[command(long_about = "\
Export a photo-gallery database to JSON and a static HTML site

Albums and art items are read from the gallery database (or a JSON
snapshot of it), the album tree is rebuilt from the parent column, and
the result is written as:

  art.json            every art item with its path and ancestor albums
  art_by_album.json   the album tree, children and art nested
  html/               one index.html per album

  html/
  ├── index.html               # Root album
  ├── vacation-1/              # <filename>-<id>
  │   ├── index.html
  │   └── beach-4/
  │       └── index.html
  └── zoo-2/
      └── index.html

Data source (first available wins):
  --snapshot FILE → snapshot in config → --database-url / DATABASE_URL → database.url

Run 'gallery-export gen-config' to generate a documented config file.")]
struct Cli {
    /// Config file [default: gallery-export.toml, if present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read records from a JSON snapshot instead of the database
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Database connection URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write art.json and art_by_album.json
    Export,
    /// Generate the static HTML site
    Site,
    /// Run both: export → site
    Build,
    /// Load the data and verify the album tree without writing anything
    Check,
    /// Save the loaded records as a JSON snapshot
    Dump {
        /// Snapshot file to write
        file: PathBuf,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(exit_status(err.as_ref()))
        }
    }
}

/// [`EXIT_CONFIG`] when a [`ConfigError`] is the error or anywhere in its
/// source chain, [`EXIT_FAILURE`] otherwise.
fn exit_status(err: &(dyn std::error::Error + 'static)) -> u8 {
    let mut current = Some(err);
    while let Some(err) = current {
        if err.is::<ConfigError>() {
            return EXIT_CONFIG;
        }
        current = err.source();
    }
    EXIT_FAILURE
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Command::GenConfig => print!("{}", config::stock_config_toml()),
        Command::Export => {
            let (config, gallery) = load(&cli)?;
            export(&GalleryTree::new(&gallery), &config)?;
        }
        Command::Site => {
            let (config, gallery) = load(&cli)?;
            build_site(&GalleryTree::new(&gallery), &config)?;
        }
        Command::Build => {
            let (config, gallery) = load(&cli)?;
            let tree = GalleryTree::new(&gallery);
            export(&tree, &config)?;
            build_site(&tree, &config)?;
            println!("==> Build complete");
        }
        Command::Check => {
            let (_, gallery) = load(&cli)?;
            println!("==> Checking album tree");
            let report = GalleryTree::new(&gallery).check()?;
            output::print_check_output(&report);
            println!("==> Album tree is valid");
        }
        Command::Dump { file } => {
            let (_, gallery) = load(&cli)?;
            source::write_snapshot(&gallery, file)?;
            println!("==> Snapshot written to {}", file.display());
        }
    }

    Ok(())
}

/// Resolve configuration and the data source, then load the snapshot.
///
/// Every configuration problem surfaces here, before anything is written.
fn load(cli: &Cli) -> Result<(ExportConfig, Gallery), Box<dyn std::error::Error>> {
    let config = load_config(cli)?;
    let spec = config.source()?;
    init_thread_pool(&config.processing);

    let source = source::open_source(&spec, &config.database);
    println!("==> Loading {}", source.describe());
    let gallery = source.load()?;
    output::print_load_output(&source.describe(), &gallery);
    Ok((config, gallery))
}

/// Load the config file and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<ExportConfig, ConfigError> {
    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(snapshot) = &cli.snapshot {
        config.snapshot = Some(snapshot.clone());
    }
    if let Some(url) = &cli.database_url {
        config.database.url = Some(url.clone());
    }
    Ok(config)
}

fn export(tree: &GalleryTree, config: &ExportConfig) -> Result<(), document::DocumentError> {
    println!(
        "==> Writing JSON documents to {}",
        config.output.json_dir.display()
    );
    let summary = document::export_documents(tree, &config.output.json_dir)?;
    output::print_export_output(&summary);
    Ok(())
}

fn build_site(tree: &GalleryTree, config: &ExportConfig) -> Result<(), site::SiteError> {
    println!(
        "==> Generating HTML \u{2192} {}",
        config.site.html_dir.display()
    );
    let report = site::build_site(tree, &site::SiteOptions::from_config(config))?;
    output::print_site_output(&report);
    Ok(())
}

/// Diagnostics go to stderr so stdout stays the command's own output.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_export::tree::TreeError;
    use thiserror::Error;

    #[derive(Error, Debug)]
    #[error("loading failed")]
    struct Wrapped(#[source] ConfigError);

    #[test]
    fn config_errors_exit_with_config_status() {
        let err: Box<dyn std::error::Error> = Box::new(ConfigError::MissingSource);
        assert_eq!(exit_status(err.as_ref()), EXIT_CONFIG);

        let err: Box<dyn std::error::Error> =
            Box::new(ConfigError::Validation("bad".to_string()));
        assert_eq!(exit_status(err.as_ref()), EXIT_CONFIG);
    }

    #[test]
    fn wrapped_config_error_keeps_config_status() {
        let err: Box<dyn std::error::Error> = Box::new(Wrapped(ConfigError::MissingSource));
        assert_eq!(exit_status(err.as_ref()), EXIT_CONFIG);
    }

    #[test]
    fn other_errors_exit_with_failure_status() {
        let err: Box<dyn std::error::Error> = Box::new(TreeError::NoRoot);
        assert_eq!(exit_status(err.as_ref()), EXIT_FAILURE);

        let err: Box<dyn std::error::Error> = Box::new(std::io::Error::other("disk full"));
        assert_eq!(exit_status(err.as_ref()), EXIT_FAILURE);
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "gallery-export",
            "export",
            "--snapshot",
            "gallery.json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.snapshot, Some(PathBuf::from("gallery.json")));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Export));
    }
}
