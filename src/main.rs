use clap::{Parser, Subcommand};
use log::{LevelFilter, error};
use shotwell_gallery::catalog::ShotwellCatalog;
use shotwell_gallery::config::{self, GalleryConfig, OutputLayout};
use shotwell_gallery::imaging::RustBackend;
use shotwell_gallery::{generate, output, pipeline, resolve};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "shotwell-gallery")]
#[command(version)]
#[command(about = "Publish a tagged set of Shotwell photos as a static gallery")]
#[command(long_about = "\
Publish a tagged set of Shotwell photos as a static gallery

Tag the photos you want to publish in Shotwell, point the config at the
catalog database, and run `build`:

  public/
  ├── index.html                   # Gallery page
  ├── manifest.json                # Renditions written by `process`
  ├── assets/                      # Copy of the static directory
  └── img/
      ├── lg/20040228172648.jpg    # Named after the capture timestamp
      └── sm/20040228172648.jpg

Every rendition is scaled down to fit its bounding box and carries only the
photographer fields from the config plus the photo's title. The catalog is
opened read-only, so Shotwell can stay open.

Run 'shotwell-gallery gen-config' to generate a documented config file.")]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Output directory, deleted and recreated by `build`
    #[arg(long, default_value = "public", global = true)]
    output: PathBuf,

    /// Static assets copied to <output>/assets by `build`
    #[arg(long, default_value = "static", global = true)]
    static_dir: PathBuf,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the tag to source paths without touching any image
    Check,
    /// Create renditions for every tagged photo and write the manifest
    Process,
    /// Render index.html from an existing manifest
    Generate,
    /// Run the full pipeline: cleanup → process → generate
    Build,
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let layout = OutputLayout::new(&cli.output);

    match cli.command {
        Command::Check => {
            let config = config::load_config(&cli.config)?;
            let catalog = ShotwellCatalog::new(&config.source.catalog)?;
            let ids = resolve::resolve_photo_ids(&catalog, &config.source.tag)?;
            let paths = resolve::resolve_photo_paths(&catalog, &ids)?;
            let resolved: Vec<_> = ids.into_iter().zip(paths).collect();
            output::print_check_output(&config.source.tag, catalog.path(), &resolved);
        }
        Command::Process => {
            let config = config::load_config(&cli.config)?;
            process(&config, &layout)?;
        }
        Command::Generate => {
            let config = config::load_config(&cli.config)?;
            let manifest = generate::load_manifest(&layout.manifest_path())?;
            let index = generate::generate(&manifest, &config.website, &layout)?;
            output::print_generate_output(&config.website.title, &index, manifest.len());
        }
        Command::Build => {
            let config = config::load_config(&cli.config)?;
            let built = pipeline::build(
                &config,
                &RustBackend::new(),
                &layout,
                &cli.static_dir,
                &[cli.config.as_path()],
            )?;
            output::print_manifest_output(&built.manifest);
            output::print_generate_output(
                &config.website.title,
                &built.index,
                built.manifest.len(),
            );
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Stage 1 + 2: resolve the tag, write renditions and the manifest.
fn process(
    config: &GalleryConfig,
    layout: &OutputLayout,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = ShotwellCatalog::new(&config.source.catalog)?;
    let manifest = pipeline::run(config, &catalog, &RustBackend::new(), layout)?;
    pipeline::write_manifest(&manifest, &layout.manifest_path())?;
    output::print_manifest_output(&manifest);
    Ok(())
}

/// `YYYY-MM-DD HH:MM:SS LEVEL    message`, info by default.
///
/// `RUST_LOG` still applies; `--verbose` forces debug.
fn init_logger(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<8} {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}
