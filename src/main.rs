use anyhow::{Context, Result};
use chartdrop::config::AppConfig;
use chartdrop::ir::ChartKind;
use chartdrop::render::{self, ExportFormat};
use chartdrop::session::ChartSession;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chartdrop")]
#[command(about = "Chart a CSV, JSON or spreadsheet file as a line, bar or pie image", long_about = None)]
struct Args {
    #[arg(help = "Input file (.csv, .json, .xls, .xlsx)")]
    file: PathBuf,

    #[arg(long = "mime", help = "MIME type of the input, for files without a usable extension")]
    mime: Option<String>,

    #[arg(short = 'k', long = "kind", value_enum, help = "Chart type (defaults to config, then line)")]
    kind: Option<ChartKind>,

    #[arg(short = 'x', long = "x", value_delimiter = ',', help = "Category field(s) for the x axis")]
    x_fields: Vec<String>,

    #[arg(short = 'y', long = "y", value_delimiter = ',', help = "Value field(s) to plot")]
    y_fields: Vec<String>,

    #[arg(short = 'c', long = "category", help = "Field rows are grouped by (default: Year)")]
    category: Option<String>,

    #[arg(long = "no-normalize", help = "Chart rows as loaded, without merging duplicate categories")]
    no_normalize: bool,

    #[arg(long = "width", help = "Output width in pixels")]
    width: Option<u32>,

    #[arg(long = "height", help = "Output height in pixels")]
    height: Option<u32>,

    #[arg(short = 't', long = "title", help = "Chart title")]
    title: Option<String>,

    #[arg(long = "zoom", default_value = "0", allow_negative_numbers = true, help = "Zoom delta applied to the horizontal scale")]
    zoom: f64,

    #[arg(long = "pan-x", default_value = "0", allow_negative_numbers = true, help = "Horizontal pan in pixels")]
    pan_x: f64,

    #[arg(long = "pan-y", default_value = "0", allow_negative_numbers = true, help = "Vertical pan in pixels")]
    pan_y: f64,

    #[arg(long = "pie-index", default_value = "0", help = "Advance the pie chart this many rows")]
    pie_index: usize,

    #[arg(short = 'f', long = "format", value_enum, default_value_t = ExportFormat::Png)]
    format: ExportFormat,

    #[arg(short = 'o', long = "output", help = "Write the image here instead of stdout")]
    output: Option<PathBuf>,

    #[arg(long = "config", help = "Config file (default: <config dir>/chartdrop/config.toml)")]
    config: Option<PathBuf>,

    #[arg(long = "list-fields", help = "Print the fields found in the file and exit")]
    list_fields: bool,

    #[arg(short = 'v', long = "verbose", help = "Debug logging on stderr")]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    // stdout carries image bytes
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_default()?,
    };

    if let Some(kind) = args.kind {
        config.chart.kind = kind;
    }
    if let Some(category) = &args.category {
        config.chart.category_field = category.clone();
    }
    if let Some(title) = &args.title {
        config.chart.title = Some(title.clone());
    }
    if let Some(width) = args.width {
        config.canvas.width = width;
    }
    if let Some(height) = args.height {
        config.canvas.height = height;
    }
    if args.no_normalize {
        config.normalize.enabled = false;
    }
    config.validate().context("Invalid chart options")?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    let mut session = ChartSession::from_config(&config)?;
    session
        .load_file(&args.file, args.mime.as_deref())
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    if args.list_fields {
        let fields = session.dataset().map(|d| d.field_names()).unwrap_or_default();
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        for field in fields {
            writeln!(handle, "{}", field).context("Failed to write to stdout")?;
        }
        return Ok(());
    }

    for field in &args.x_fields {
        session.select_x(field);
    }
    for field in &args.y_fields {
        session.select_y(field);
    }

    let mut plan = session.draw();
    if args.zoom != 0.0 {
        plan = session.zoom(args.zoom);
    }
    if args.pan_x != 0.0 || args.pan_y != 0.0 {
        plan = session.pan(args.pan_x, args.pan_y);
    }
    for _ in 0..args.pie_index {
        plan = session.next_pie_row();
    }

    if plan.has_no_series() {
        anyhow::bail!(
            "Nothing to chart: select value fields with -y (available: {})",
            session
                .dataset()
                .map(|d| d.field_names().join(", "))
                .unwrap_or_default()
        );
    }

    let bytes = render::render(&plan, args.format).context("Failed to render chart")?;

    match &args.output {
        Some(path) => std::fs::write(path, &bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(&bytes)
                .context("Failed to write image to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
