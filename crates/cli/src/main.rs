//! `bookshelf` command-line entrypoint.

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use clap::{Args, Parser, Subcommand};

/// In-memory book catalogue service
#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server until Ctrl+C or SIGTERM
    Serve(ServeArgs),

    /// Print the route table
    Routes,
}

#[derive(Args)]
struct ServeArgs {
    /// Override `server.host`
    #[arg(long)]
    host: Option<String>,

    /// Override `server.port`
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;

    match cli.command {
        Commands::Serve(args) => serve(args, settings).await,
        Commands::Routes => {
            print_routes(&settings);
            Ok(())
        }
    }
}

async fn serve(args: ServeArgs, mut settings: Settings) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        address = %settings.server.bind_address(),
        "bookshelf bootstrap starting"
    );

    let registry = build_registry(&settings);
    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served =
        bookshelf_http::start_server(&registry, &settings, bookshelf_http::shutdown_signal()).await;

    // Stop modules even when the server failed, then report the server error.
    registry.stop_modules().await?;
    served?;

    tracing::info!("bookshelf shutdown complete");
    Ok(())
}

fn build_registry(settings: &Settings) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    bookshelf_app::modules::register_all(&mut registry, settings);
    registry
}

fn print_routes(settings: &Settings) {
    let registry = build_registry(settings);
    for (module, endpoint, path) in registry.route_table(&settings.server.api_prefix) {
        println!(
            "{:<7} {:<24} {:<8} {}",
            endpoint.method, path, module, endpoint.summary
        );
    }
}
