use clap::{Parser, Subcommand};
use folio::contact::{self, Channel, EnvSource, Relay, RelayEnv};
use folio::content::ContentStore;
use folio::{config, generate, logging, output};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn version_string() -> &'static str {
    let on_tag = env!("FOLIO_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("FOLIO_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static site generator and contact relay for personal portfolios")]
#[command(long_about = "\
Static site generator and contact relay for personal portfolios

Three JSON documents describe the site. folio renders them into a landing
page plus project, tag and blog pages, and serves the contact endpoint.

Content structure:

  content/
  ├── config.toml        # Site config (optional; see 'folio gen-config')
  ├── profile.json       # Name, bio, contact, stats, experience
  ├── projects.json      # Projects, in display order
  ├── posts.json         # Blog posts (markdown bodies)
  └── assets/            # Copied verbatim to the output root
      └── resume.pdf

Contact delivery (first configured wins, read per request):
  RESEND_API_KEY       Send through the email API (CONTACT_EMAIL overrides recipient)
  FORMSPREE_ENDPOINT   Forward the submission to a form relay
  (neither)            Log the submission

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Clone)]
struct ServeArgs {
    /// Address to listen on (overrides [contact].bind)
    #[arg(long)]
    bind: Option<String>,

    /// Serve only the contact endpoint, not the built site
    #[arg(long)]
    api_only: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Validate content and config without building
    Check,
    /// Render the site into the output directory
    Build,
    /// Run the contact relay, serving the built site alongside it
    Serve(ServeArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site_config = config::load_config(&cli.source)?;
            let store = ContentStore::load(&cli.source)?;
            output::print_check_output(&store, &site_config, &cli.source);
            println!("==> Content is valid");
        }
        Command::Build => {
            let site_config = config::load_config(&cli.source)?;
            let store = ContentStore::load(&cli.source)?;
            init_thread_pool(&site_config.build);

            println!(
                "==> Generating {} → {}",
                cli.source.display(),
                cli.output.display()
            );
            let report = generate::generate(&store, &site_config, &cli.source, &cli.output)?;
            output::print_generate_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Serve(args) => {
            let site_config = config::load_config(&cli.source)?;
            let store = ContentStore::load(&cli.source)?;
            let bind = args.bind.unwrap_or_else(|| site_config.contact.bind.clone());
            let addr: SocketAddr = bind.parse()?;

            let channel = Channel::select(&RelayEnv::from_process());
            tracing::info!(
                channel = channel.name(),
                endpoint = %site_config.contact.endpoint,
                "contact relay ready"
            );

            let relay = Relay::new(
                site_config.contact.clone(),
                EnvSource::Process,
                &store.site_profile().contact.email,
            )?;
            let site_dir = if args.api_only {
                None
            } else {
                built_site(&cli.output)
            };
            let app = contact::server::router(Arc::new(relay), site_dir);

            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(contact::server::serve(addr, app))?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on build config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(build: &config::BuildConfig) {
    let threads = config::effective_threads(build);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// The output directory, if it holds a built site.
fn built_site(output: &Path) -> Option<&Path> {
    if output.join("index.html").is_file() {
        Some(output)
    } else {
        tracing::warn!(
            "{} has no index.html; serving the contact endpoint only (run 'folio build' first)",
            output.display()
        );
        None
    }
}
