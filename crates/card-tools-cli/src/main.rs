mod logger;

use anyhow::{Context, Result};
use card_mint::{ColorTransform, Pipeline, PipelineOptions};
use card_sheet::PaperSize;
use clap::{Args, Parser, Subcommand, ValueEnum};
use logger::StderrLogger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cardt", about = "Card sheet tools CLI", version)]
struct Cli {
    /// Log per-card and per-page progress
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint front cards from a list of URLs and lay them out
    Front {
        /// Newline-delimited URL list
        #[arg(short, long)]
        input: PathBuf,

        /// Front template image
        #[arg(short, long, default_value = "front.png")]
        template: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Card variant
        #[arg(long, default_value = "rgb", value_enum)]
        preset: FrontPreset,

        /// Write QR and card PNGs to this directory
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Leave the sequence counter off the cards
        #[arg(long)]
        no_counter: bool,

        /// Stamp page numbers
        #[arg(long)]
        page_numbers: bool,

        /// Draw crop marks around each card
        #[arg(long)]
        crop_marks: bool,

        /// Parallel card workers
        #[arg(long)]
        workers: Option<usize>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Lay out a mirrored back sheet from one template
    Back {
        /// Back template image
        #[arg(short, long, default_value = "back.png")]
        template: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Convert to CMYK with magenta correction
        #[arg(long)]
        cmyk: bool,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Draw cut guides for a card sheet
    CutLines {
        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Inset of the cut line from each cell edge in mm
        #[arg(long)]
        bleed: Option<f32>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Show pagination for a URL list without generating anything
    Stats {
        /// Newline-delimited URL list
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },
}

/// Options shared by every subcommand
#[derive(Args)]
struct CommonArgs {
    /// JSON options file (replaces the preset)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output paper size
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Magenta attenuation factor in (0, 1]; implies CMYK output
    #[arg(long)]
    magenta: Option<f64>,

    /// TrueType font for printed codes and counters
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FrontPreset {
    Rgb,
    Cmyk,
    Catalog,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
        }
    }
}

impl FrontPreset {
    fn options(self) -> PipelineOptions {
        match self {
            FrontPreset::Rgb => PipelineOptions::front_rgb(),
            FrontPreset::Cmyk => PipelineOptions::front_cmyk(),
            FrontPreset::Catalog => PipelineOptions::catalog(),
        }
    }
}

/// Start from the config file if given, otherwise the preset, then apply
/// the shared overrides.
async fn resolve_options(common: &CommonArgs, preset: PipelineOptions) -> Result<PipelineOptions> {
    let mut options = match &common.config {
        Some(path) => PipelineOptions::load(path)
            .await
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => preset,
    };

    if let Some(paper) = common.paper {
        options.layout.paper_size = paper.into();
    }
    if let Some(factor) = common.magenta {
        options.mint.color_transform = Some(ColorTransform::new(factor)?);
    }
    if let Some(font) = &common.font {
        options.mint.font_path = Some(font.clone());
    }

    Ok(options)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    StderrLogger::new(StderrLogger::level_for(cli.verbose, cli.quiet))
        .init()
        .context("Failed to install logger")?;

    match cli.command {
        Commands::Front {
            input,
            template,
            output,
            preset,
            export_dir,
            no_counter,
            page_numbers,
            crop_marks,
            workers,
            common,
        } => {
            let mut options = resolve_options(&common, preset.options()).await?;
            if no_counter {
                options.mint.counter = false;
            }
            if page_numbers {
                options.layout.page_numbers = true;
            }
            if crop_marks {
                options.layout.crop_marks = true;
            }
            if let Some(workers) = workers {
                options.workers = workers;
            }
            if export_dir.is_some() {
                options.export_dir = export_dir;
            }

            let identifiers = card_mint::load_identifiers(&input).await?;
            let pipeline = Pipeline::new(options)?;
            let summary = pipeline.front(identifiers, &template, &output).await?;
            println!(
                "Generated {} cards on {} page(s) → {}",
                summary.cards,
                summary.pages,
                summary.output.display()
            );
        }

        Commands::Back {
            template,
            output,
            cmyk,
            common,
        } => {
            let preset = if cmyk {
                PipelineOptions::back_cmyk()
            } else {
                PipelineOptions::back_rgb()
            };
            let options = resolve_options(&common, preset).await?;

            let pipeline = Pipeline::new(options)?;
            let summary = pipeline.back(&template, &output).await?;
            println!(
                "Generated back sheet with {} cards → {}",
                summary.cards,
                summary.output.display()
            );
        }

        Commands::CutLines {
            output,
            bleed,
            common,
        } => {
            let mut options = resolve_options(&common, PipelineOptions::cut_guides()).await?;
            if let Some(bleed) = bleed {
                options.layout.bleed_mm = bleed;
            }

            let pipeline = Pipeline::new(options)?;
            let summary = pipeline.cut_guides(&output).await?;
            println!(
                "Generated cut guides for {} cards → {}",
                summary.cards,
                summary.output.display()
            );
        }

        Commands::Stats { input, common } => {
            let options = resolve_options(&common, PipelineOptions::front_rgb()).await?;
            let identifiers = card_mint::load_identifiers(&input).await?;

            let stats = card_sheet::calculate_statistics(identifiers.len(), &options.layout)?;
            println!("Sheet Statistics:");
            println!("  Cards: {}", stats.cards);
            println!("  Cards per page: {}", stats.cards_per_page);
            println!("  Pages: {}", stats.pages);
            println!("  Cards on last page: {}", stats.cards_on_last_page);
            println!("  Empty cells: {}", stats.empty_cells);
        }
    }

    Ok(())
}
