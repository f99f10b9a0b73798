use clap::{Parser, Subcommand};
use photofolio::imaging::rust_backend::RustBackend;
use photofolio::{compress, config, output, process, render};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let hash = env!("GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup — trivial, called exactly once
        Box::leak(format!("{}@{hash}", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "photofolio")]
#[command(about = "Static gallery builder for photography portfolios")]
#[command(long_about = "\
Static gallery builder for photography portfolios

Point it at a folder of photos and it produces resized JPEG and WebP
variants at configured breakpoints, a JSON manifest describing each
image (dimensions, variants, capture metadata), and a self-contained
gallery page with a lightbox viewer.

Outputs with the stock config:

  images/optimized/      resized variants (<stem>-<breakpoint>.<ext>)
  js/gallery-data.json   the manifest the page fetches at load
  dist/index.html        the gallery page

Variants that already exist on disk are skipped; pass --force to
re-encode everything. Run 'photofolio gen-config' to print a documented
gallery.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Configuration file (built-in defaults if absent)
    #[arg(long, default_value = "gallery.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build variants, manifest, and the gallery page
    Build {
        /// Re-encode variants even when their output files exist
        #[arg(long)]
        force: bool,
    },
    /// Recompress specific JPEG files without resizing
    Compress {
        /// Files to recompress
        files: Vec<PathBuf>,
    },
    /// Print a stock gallery.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build { force } => {
            let config = config::GalleryConfig::load(&cli.config)?;
            let backend = RustBackend::new();

            println!(
                "==> Processing {} -> {}",
                config.source_dir.display(),
                config.output_dir.display()
            );
            let report = process::build(&backend, &config, force)?;
            output::print_build_report(&report, &config.manifest_path);

            let page = render::write_site(&config)?;
            println!("==> Gallery page: {}", page.display());
        }
        Command::Compress { files } => {
            if files.is_empty() {
                eprintln!("usage: photofolio compress <FILE>...");
                std::process::exit(1);
            }
            let config = config::GalleryConfig::load(&cli.config)?;
            let backend = RustBackend::new();

            let outcomes =
                compress::run(&backend, &files, &config.source_dir, config.quality())?;
            output::print_compress_outcomes(&outcomes);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
