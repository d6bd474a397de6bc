use std::sync::Arc;

use clap::Parser;
use miette::IntoDiagnostic;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pdb_scout::app::App;
use pdb_scout::rcsb::RcsbHttpClient;
use pdb_scout::server;
use pdb_scout::store::Store;

#[derive(Parser)]
#[command(name = "pdb-scout-server")]
#[command(about = "Serve PDB structure summaries over HTTP with a static front end")]
#[command(version, author)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1:5000")]
    addr: String,
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // The blocking HTTP client is built before the runtime starts; handlers
    // only touch it through spawn_blocking.
    let store = Store::new().into_diagnostic()?;
    let rcsb = RcsbHttpClient::new().into_diagnostic()?;
    let app = Arc::new(App::new(store, rcsb));

    let runtime = tokio::runtime::Runtime::new().into_diagnostic()?;
    runtime.block_on(serve(cli, app))
}

async fn serve(cli: Cli, app: Arc<App<RcsbHttpClient>>) -> miette::Result<()> {
    let router = server::router(app);
    let listener = TcpListener::bind(&cli.addr).await.into_diagnostic()?;
    info!(addr = %cli.addr, "serving");
    axum::serve(listener, router).await.into_diagnostic()?;
    Ok(())
}
