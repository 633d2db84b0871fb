use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stardriver_patcher::traits::TracingObserver;
use stardriver_patcher::{ClientSelection, ScanPolicy, Synchronizer};

const DEFAULT_MANAGEMENT_URL: &str = "http://patch01.pso2gs.net/patch_prod/patches/management_beta.txt";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SelectionArg {
  Full,
  Main,
  Launcher,
}

impl From<SelectionArg> for ClientSelection {
  fn from(arg: SelectionArg) -> Self {
    match arg {
      SelectionArg::Full => ClientSelection::FullDataset,
      SelectionArg::Main => ClientSelection::MainOnly,
      SelectionArg::Launcher => ClientSelection::LauncherOnly,
    }
  }
}

/// Synchronize a local PSO2 client with the remote manifest.
#[derive(Debug, Parser)]
#[command(name = "stardriver-sync", version)]
struct Args {
  /// Directory the game is installed under
  install_root: PathBuf,

  /// Management document to bootstrap from
  #[arg(long, default_value = DEFAULT_MANAGEMENT_URL)]
  management_url: String,

  /// Which manifest sub-lists to synchronize
  #[arg(long, value_enum, default_value_t = SelectionArg::Full)]
  selection: SelectionArg,

  /// Only download files that are absent on disk
  #[arg(long)]
  missing_only: bool,

  /// Ignore the digest cache and rehash every present file
  #[arg(long)]
  force_rehash: bool,

  /// Skip files whose cache entry still matches size and mtime
  #[arg(long, conflicts_with = "force_rehash")]
  trust_cache: bool,
}

impl Args {
  fn policy(&self) -> ScanPolicy {
    if self.missing_only {
      ScanPolicy::missing_only()
    } else if self.force_rehash {
      ScanPolicy::full_rehash()
    } else if self.trust_cache {
      ScanPolicy::trust_cache()
    } else {
      ScanPolicy::default()
    }
  }
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let args = Args::parse();
  let synchronizer = match Synchronizer::builder()
    .install_root(&args.install_root)
    .management_url(args.management_url.clone())
    .selection(args.selection.into())
    .policy(args.policy())
    .observer(Arc::new(TracingObserver))
    .build()
  {
    Ok(synchronizer) => synchronizer,
    Err(e) => {
      error!("{}", e);
      std::process::exit(1);
    },
  };

  let cancel = synchronizer.cancel_token();
  tokio::task::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      info!("Interrupt received, cancelling");
      cancel.cancel();
    }
  });

  match synchronizer.run().await {
    Ok(report) if report.all_succeeded() => std::process::exit(0),
    Ok(report) if report.cancelled > 0 => std::process::exit(130),
    Ok(_) => std::process::exit(2),
    Err(e) => {
      error!("{}", e);
      std::process::exit(1);
    },
  }
}
