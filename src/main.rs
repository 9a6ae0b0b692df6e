//! CLI entry point for tagpress

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tagpress::server::ServeOptions;
use tagpress::Blog;

#[derive(Parser)]
#[command(name = "tagpress")]
#[command(author = "Yukang Chen")]
#[command(version)]
#[command(about = "A small markdown blog engine with tag pages", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Slug for the post URL (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Build static files
    #[command(visible_alias = "generate", alias = "g")]
    Build {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Remove the output folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (post, tag)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Validate every post without building
    Check {
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "tagpress=debug,tower_http=debug,info"
    } else {
        "tagpress=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            tagpress::commands::init::init_site(&target_dir)?;
            println!("Initialized empty blog in {:?}", target_dir);
        }

        Commands::New { title, slug } => {
            let blog = Blog::new(&base_dir)?;
            let path = blog.new_post(&title, slug.as_deref())?;
            println!("Created: {:?}", path);
        }

        Commands::Build { watch } => {
            let blog = Blog::new(&base_dir)?;
            tracing::info!("Generating static files...");

            let pages = blog.build()?;
            println!("Generated {} pages into {:?}", pages, blog.output_dir);

            if watch {
                tagpress::commands::build::watch(&blog).await?;
            }
        }

        Commands::Serve {
            port,
            ip,
            open,
            r#static,
        } => {
            let blog = Blog::new(&base_dir)?;
            let options = ServeOptions {
                ip,
                port,
                watch: !r#static,
                open,
            };

            tracing::info!("Starting server at http://{}:{}", options.ip, options.port);
            tagpress::server::start(&blog, &options).await?;
        }

        Commands::Clean => {
            let blog = Blog::new(&base_dir)?;
            tracing::info!("Cleaning output folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let blog = Blog::new(&base_dir)?;
            tagpress::commands::list::run(&blog, &r#type)?;
        }

        Commands::Check { json } => {
            let blog = Blog::new(&base_dir)?;
            if !tagpress::commands::check::run(&blog, json)? {
                std::process::exit(1);
            }
        }

        Commands::Version => {
            println!("tagpress version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
