#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(
    name = "avpr2sample",
    about = "Generate sample JSON messages from Avro protocols"
)]
struct Cli {
    /// `.avpr` files, or directories to scan for them
    #[arg(value_name = "PATH", required = true)]
    paths: Vec<std::path::PathBuf>,

    /// Directory the samples are written to
    #[arg(long, default_value = "out")]
    out_dir: std::path::PathBuf,

    /// Export a `.avsc` schema and a sample per record instead of per topic
    #[arg(long, default_value_t = false)]
    schemas: bool,

    /// With `--schemas`, only export records that have a `version` property
    #[arg(long, default_value_t = false, requires = "schemas")]
    versioned_only: bool,
}

#[cfg(feature = "cli")]
fn main() {
    use avro_samples::driver::{process_paths, Mode};
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::prelude::*;

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    #[cfg(feature = "trace")]
    let fmt_layer = fmt_layer.with_span_events(
        tracing_subscriber::fmt::format::FmtSpan::ENTER
            | tracing_subscriber::fmt::format::FmtSpan::EXIT,
    );
    let level = if cfg!(feature = "trace") {
        LevelFilter::TRACE
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(level))
        .init();

    let cli = Cli::parse();
    let mode = if cli.schemas {
        Mode::Schemas {
            versioned_only: cli.versioned_only,
        }
    } else {
        Mode::Topics
    };

    match process_paths(&cli.paths, &cli.out_dir, mode) {
        Ok(summary) => {
            tracing::info!(
                "{} file(s) written, {} item(s) failed",
                summary.written.len(),
                summary.failures.len()
            );
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary is only available with the `cli` feature enabled.");
    std::process::exit(1);
}
