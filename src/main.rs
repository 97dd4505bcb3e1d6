mod error;

use crate::error::{ErrorKind, Result};
use clap::{ArgAction, Parser};
use exn::ResultExt;
use futures::StreamExt;
use spelunk_config::{Config, HttpOverrides, Loader, Overrides};
use spelunk_crawl::{Context, CrawlEvent, RateLimiter, Summary, Visit, crawl, ref_seeds};
use spelunk_remote::{HttpOptions, HttpRemote, normalize_base_url};
use spelunk_storage::DirStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Recover the refs and logs of a `.git` directory exposed over HTTP.
#[derive(Parser, Debug)]
#[command(name = "spelunk", version, about)]
struct Cli {
    /// Site root, or the exposed `.git/` directory itself.
    url: String,
    /// Where to mirror retrieved files. Defaults to the host name.
    dir: Option<PathBuf>,
    /// Configuration file (TOML, YAML or JSON).
    #[arg(short, long, env = "SPELUNK_CONFIG")]
    config: Option<PathBuf>,
    /// Maximum number of requests in flight.
    #[arg(short = 'j', long)]
    concurrency: Option<u16>,
    #[arg(long)]
    user_agent: Option<String>,
    /// Per-request timeout, in seconds.
    #[arg(long)]
    timeout: Option<u64>,
    /// Accept invalid TLS certificates.
    #[arg(short = 'k', long)]
    insecure: bool,
    /// More logging; repeat for even more. Ignored when `RUST_LOG` is set.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            concurrency: self.concurrency,
            http: HttpOverrides {
                user_agent: self.user_agent.clone(),
                timeout_secs: self.timeout,
                insecure: self.insecure.then_some(true),
            },
        }
    }

    /// The output directory, made absolute.
    fn output_dir(&self) -> Result<PathBuf> {
        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => {
                let url = normalize_base_url(&self.url).or_raise(|| ErrorKind::Url(self.url.clone()))?;
                match url.host_str() {
                    Some(host) => PathBuf::from(host),
                    None => exn::bail!(ErrorKind::Url(self.url.clone())),
                }
            },
        };
        std::path::absolute(&dir).or_raise(|| ErrorKind::OutputDir(dir.clone()))
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn context(cli: &Cli, config: &Config) -> Result<Context> {
    let options = HttpOptions {
        user_agent: config.http.user_agent.clone(),
        timeout: config.timeout(),
        insecure: config.http.insecure,
    };
    let remote = HttpRemote::new(&cli.url, &options).or_raise(|| ErrorKind::Remote(cli.url.clone()))?;

    let dir = cli.output_dir()?;
    let store = DirStore::new(dir.clone()).or_raise(|| ErrorKind::OutputDir(dir.clone()))?;

    tracing::info!(url = %remote.base(), dir = %dir.display(), "starting crawl");
    let limiter = RateLimiter::new(config.pause(), config.cooldown());
    Ok(Context::new(Arc::new(remote), Arc::new(store), limiter))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut loader = Loader::new().overrides(cli.overrides());
    if let Some(file) = &cli.config {
        loader = loader.file(file.clone());
    }
    let config = loader.load().or_raise(|| ErrorKind::Config)?;
    let ctx = context(&cli, &config)?;

    let mut events = std::pin::pin!(crawl(&ctx, ref_seeds(), usize::from(config.concurrency)));
    let mut summary = Summary::default();
    while let Some(event) = events.next().await {
        match event {
            CrawlEvent::Started => tracing::debug!(concurrency = config.concurrency, "crawl started"),
            CrawlEvent::Visited { path, visit: Visit::AlreadyClaimed } => tracing::trace!(path, "duplicate"),
            CrawlEvent::Visited { path, visit } => tracing::debug!(path, ?visit, "visited"),
            CrawlEvent::Complete(done) => summary = done,
        }
    }

    tracing::info!(
        fetched = summary.fetched,
        cached = summary.cached,
        failed = summary.failed,
        rate_limited = summary.rate_limited,
        "crawl complete"
    );
    println!("{} files retrieved ({} new, {} already present)", summary.stored(), summary.fetched, summary.cached);
    Ok(())
}
