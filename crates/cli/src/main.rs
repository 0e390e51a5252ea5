use proshot_core::{
    config::Config,
    init,
    presets::{self, PRESETS},
    ProShot, SelectedFile,
};
use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Additional instructions appended to the style
    #[arg(trailing_var_arg = true)]
    prompt: Vec<String>,

    /// Source photo; runs one generation without opening the window
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Style to apply (see --list-styles)
    #[arg(short, long, conflicts_with = "no_style")]
    style: Option<String>,

    /// Use only the prompt, without a style
    #[arg(long)]
    no_style: bool,

    /// Override the model defined in .env
    #[arg(short, long)]
    model: Option<String>,

    /// Directory the generated image is saved to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// List available styles and exit
    #[arg(long)]
    list_styles: bool,

    /// Print machine-readable JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup
    init();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    // Handle --list-styles
    if args.list_styles {
        if args.json {
            println!("{}", serde_json::to_string_pretty(PRESETS)?);
        } else {
            println!("Available styles:");
            for preset in PRESETS {
                println!("  {} {:<10} {} - {}", preset.icon, preset.id, preset.name, preset.description);
            }
        }
        return Ok(());
    }

    // Load config and apply CLI overrides
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(m) = args.model.clone() {
        config.model_name = m;
    }
    if let Some(dir) = args.output_dir.clone() {
        config.output_dir = dir;
    }
    let app = ProShot::with_config(config);

    match args.image.clone() {
        Some(image) => run_headless(&app, &args, image).await,
        None => app
            .run_interactive()
            .context("Failed to run the headshot window"),
    }
}

/// Runs a single generation for `image` and saves the result.
async fn run_headless(app: &ProShot, args: &Args, image: PathBuf) -> Result<()> {
    tracing::info!(image = %image.display(), "Running headless generation");
    let mut session = app.session();

    // Acquire
    if let Err(e) = session.acquire(SelectedFile::from_path(&image)) {
        bail!("{} ({})", e.user_message(), image.display());
    }

    // Configure
    let style = if args.no_style {
        None
    } else {
        Some(
            args.style
                .clone()
                .unwrap_or_else(|| presets::default_preset().id.to_string()),
        )
    };
    session
        .select_preset(style.as_deref())
        .context("Unknown style. Try using --list-styles to check ids")?;
    session.set_instructions(args.prompt.join(" "));

    let client = app.client().context("Failed to create Gemini client")?;

    // Send to API
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.green} {msg}")?,
    );
    spinner.set_message(format!("Enhancing image with {}...", client.model_name()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = session.generate(&client).await;
    spinner.finish_and_clear();

    if let Err(e) = outcome {
        bail!("{}", e.user_message());
    }

    let path = session
        .download(&app.config().output_dir)
        .context("Failed to save generated image")?
        .context("Generation finished without an image")?;

    if args.json {
        let summary = serde_json::json!({
            "status": session.status(),
            "style": session.preset().map(|p| p.id),
            "path": path,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Saved headshot to {}", path.display());
    }

    Ok(())
}
