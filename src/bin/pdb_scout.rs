use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use pdb_scout::app::App;
use pdb_scout::error::PdbError;
use pdb_scout::output;
use pdb_scout::rcsb::RcsbHttpClient;
use pdb_scout::store::Store;

#[derive(Parser)]
#[command(name = "pdb-scout")]
#[command(about = "Fetch RCSB PDB structure summaries and cache them locally")]
#[command(version, author)]
struct Cli {
    /// One or more PDB ids (e.g. 7wyv 1tup)
    #[arg(required = true, value_name = "PDB_ID")]
    ids: Vec<String>,

    /// Produce no output; cache and image files are still written
    #[arg(short, long)]
    silent: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(report) => {
            if !cli.silent {
                eprintln!("{report:?}");
            }
            ExitCode::from(1)
        }
    }
}

/// Attempts every id independently; returns whether all of them succeeded.
fn run(cli: &Cli) -> miette::Result<bool> {
    if !cli.silent {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let store = Store::new().into_diagnostic()?;
    let rcsb = RcsbHttpClient::new().into_diagnostic()?;
    let app = App::new(store, rcsb);

    let mut all_ok = true;
    for raw_id in &cli.ids {
        let raw_id = raw_id.trim();
        if raw_id.is_empty() {
            continue;
        }
        match app.get_pdb_info(raw_id) {
            Ok(record) => {
                if !cli.silent {
                    println!("{}", output::render_record(&record));
                }
            }
            Err(err) => {
                all_ok = false;
                if !cli.silent {
                    eprintln!("error fetching {raw_id}: {err}");
                    if let PdbError::ClientStatus {
                        status: 429,
                        retry_after: Some(secs),
                    } = &err
                    {
                        eprintln!("rate limited; retry after {secs} seconds");
                    }
                }
            }
        }
    }
    Ok(all_ok)
}
