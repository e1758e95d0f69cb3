//! access-export CLI - stream Access tables into delimited text files.

use std::path::PathBuf;
use std::process::ExitCode;

use access_export::{ExportConfig, ExportError, FormatOptions, SourceSpec};
use clap::Parser;
use tracing::Level;

#[derive(Parser)]
#[command(name = "access-export")]
#[command(about = "Export Microsoft Access (.mdb/.accdb) tables to delimited text via ODBC")]
#[command(version)]
struct Cli {
    /// Path to the .mdb/.accdb file (not needed with --dsn)
    db_path: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = access_export::DEFAULT_OUT_DIR)]
    out: PathBuf,

    /// Export only these tables/views (multiple names)
    #[arg(short, long, num_args = 1..)]
    tables: Option<Vec<String>>,

    /// Also enumerate and export views
    #[arg(long)]
    include_views: bool,

    /// Field delimiter; the token \t means tab
    #[arg(short, long, default_value = ",")]
    delimiter: String,

    /// Output text encoding (any WHATWG label)
    #[arg(short, long, default_value = "utf-8")]
    encoding: String,

    /// Line terminator: \n, \r\n, \r, or a verbatim string [default: platform native]
    #[arg(long)]
    lineterm: Option<String>,

    /// Rows per fetch
    #[arg(long, default_value_t = access_export::DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Connect through a registered ODBC data source instead of a path
    #[arg(long)]
    dsn: Option<String>,

    /// User name for --dsn
    #[arg(long)]
    uid: Option<String>,

    /// Password for --dsn
    #[arg(long)]
    pwd: Option<String>,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,

    /// Print intended actions, write nothing
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), ExportError> {
    let source = match cli.dsn {
        Some(name) => SourceSpec::Dsn {
            name,
            user: cli.uid,
            password: cli.pwd,
        },
        None => {
            let path = cli.db_path.ok_or_else(|| {
                ExportError::Usage("give a path to the database or use --dsn".to_string())
            })?;
            SourceSpec::File(path)
        }
    };

    let config = ExportConfig {
        source,
        out_dir: cli.out,
        tables: cli.tables,
        include_views: cli.include_views,
        format: FormatOptions::resolve(&cli.delimiter, &cli.encoding, cli.lineterm.as_deref())?,
        batch_size: cli.batch_size,
        dry_run: cli.dry_run,
    };

    access_export::run(&config)?;
    Ok(())
}

fn setup_logging(quiet: bool) {
    let level = if quiet { Level::WARN } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}
