use clap::{Parser, Subcommand};
use rasarx::{
    compute_files, export, DescriptorSource, Kernel, OutputFormat, RasarConfig, RestApi,
    ServerConfig, DEFAULT_CTC,
};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Read-across structure-activity relationship descriptors
#[derive(Parser, Debug)]
#[command(name = "rasarx")]
#[command(about = "RASAR descriptors from similarity-weighted close neighbors", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Bind address
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// HTTP API port
        #[arg(long, env = "PORT", default_value_t = 5000)]
        http_port: u16,

        /// Largest accepted file part in bytes
        #[arg(long, default_value_t = 16 * 1024 * 1024)]
        max_upload_bytes: usize,

        /// Largest accepted row count per table
        #[arg(long, default_value_t = 20_000)]
        max_items: usize,

        /// Wall-clock bound on one computation
        #[arg(long, default_value_t = 120)]
        timeout_secs: u64,
    },

    /// Compute descriptors for two CSV files
    Compute {
        /// Reference (training) table: id, features..., response
        #[arg(long)]
        train: PathBuf,

        /// Query (test) table: id, features...[, response]
        #[arg(long)]
        test: PathBuf,

        /// Similarity kernel (gaussian, laplacian)
        #[arg(long, default_value = "gaussian")]
        kernel: Kernel,

        /// Feature source (user, selected, all)
        #[arg(long, default_value = "user")]
        descriptors: DescriptorSource,

        /// Close-neighbor window cap
        #[arg(long, default_value_t = DEFAULT_CTC)]
        ctc: usize,

        /// Output directory; the report goes to stdout as JSON when omitted
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Output format for --out-dir (csv, json)
        #[arg(long, default_value = "csv")]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::from_level(log_level).into()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Serve {
            host,
            http_port,
            max_upload_bytes,
            max_items,
            timeout_secs,
        } => {
            let config = ServerConfig {
                host,
                port: http_port,
                max_upload_bytes,
                max_items,
                timeout_secs,
            };
            serve(config).await
        }
        Command::Compute {
            train,
            test,
            kernel,
            descriptors,
            ctc,
            out_dir,
            format,
        } => {
            let config = RasarConfig { kernel, ctc };
            let out = compute_files(&train, &test, descriptors, config, None)?;
            if !out.dropped.is_empty() {
                info!(dropped = ?out.dropped, "low-variance descriptors removed");
            }
            match out_dir {
                Some(dir) => {
                    for path in export::write_report(&dir, &out.report, format)? {
                        println!("{}", path.display());
                    }
                }
                None => {
                    serde_json::to_writer_pretty(std::io::stdout().lock(), &out.report)?;
                    println!();
                }
            }
            Ok(())
        }
    }
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    info!("Starting RASARx v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Limits: {} bytes per upload, {} items per table, {} s per computation",
        config.max_upload_bytes, config.max_items, config.timeout_secs
    );

    let port = config.port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(config, None).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("HTTP API: http://localhost:{}/calculate_rasar", port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
