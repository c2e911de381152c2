//! Rankpage CLI
//!
//! Command-line front end for:
//! - Summarizing a model file (`info`)
//! - Precomputing a dataset bundle for navigation (`bundle`)
//! - Computing and rendering one navigation view (`navigate`)
//! - Writing a static site with detail and category pages (`generate`)

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rankpage_core::{ModelKind, NavigationView, Navigator};
use rankpage_ingest::{load_bundle, load_model, load_translations, DatasetBundle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, Level};

mod render;
mod site;

#[derive(Parser)]
#[command(name = "rankpage")]
#[command(
    author,
    version,
    about = "Rankpage: faceted navigation and ranking over a fixed dataset"
)]
struct Cli {
    /// Log everything (debug level) to stderr.
    #[arg(long, global = true)]
    logall: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a model summary: columns, value domains and the filter path count.
    Info {
        /// Model file (JSON)
        #[arg(short, long)]
        data: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Precompute a dataset bundle (domains, weights, rows, links, translations).
    Bundle {
        /// Model file (JSON)
        #[arg(short, long)]
        data: PathBuf,
        /// Translation file (JSON)
        #[arg(short, long)]
        translation: Option<PathBuf>,
        /// Output bundle
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Generate a static site: index, detail pages, category pages and bundle.
    Generate {
        /// Model file (JSON)
        #[arg(short, long)]
        data: PathBuf,
        /// Translation file (JSON)
        #[arg(short, long)]
        translation: Option<PathBuf>,
        /// Output directory
        #[arg(long)]
        outdir: PathBuf,
        /// Directory for detail and category pages, relative to the output
        #[arg(long, default_value = site::DEFAULT_SUBPAGE_DIR)]
        subpage_dir: String,
    },

    /// Compute one navigation view.
    ///
    /// The query string is decoded first, then every `--toggle` is applied in
    /// order, as if clicked.
    Navigate {
        /// Model file or dataset bundle (JSON)
        #[arg(short, long)]
        data: PathBuf,
        /// Override the dataset's navigation model
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Selection as a page query string (`color=red&size=small`)
        #[arg(short, long, default_value = "")]
        query: String,
        /// Click `attribute=value` (repeatable)
        #[arg(long = "toggle", value_name = "ATTR=VALUE")]
        toggles: Vec<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Translation file (JSON); replaces the bundle's translations
        #[arg(short, long)]
        translation: Option<PathBuf>,
        /// Write the rendering here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Weighted,
    Rows,
}

impl From<ModeArg> for ModelKind {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Weighted => ModelKind::Weighted,
            ModeArg::Rows => ModelKind::Rows,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Html,
}

fn init_logging(logall: bool) {
    let level = if logall { Level::DEBUG } else { Level::INFO };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.logall);

    match cli.command {
        Commands::Info { data, json } => cmd_info(&data, json)?,
        Commands::Bundle {
            data,
            translation,
            out,
        } => cmd_bundle(&data, translation.as_deref(), &out)?,
        Commands::Generate {
            data,
            translation,
            outdir,
            subpage_dir,
        } => cmd_generate(&data, translation.as_deref(), &outdir, &subpage_dir)?,
        Commands::Navigate {
            data,
            mode,
            query,
            toggles,
            format,
            translation,
            out,
        } => cmd_navigate(
            &data,
            mode,
            &query,
            &toggles,
            format,
            translation.as_deref(),
            out.as_deref(),
        )?,
    }

    Ok(())
}

fn cmd_info(data: &Path, json: bool) -> Result<()> {
    let model = load_model(data)?;
    let info = model.info();
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{} {}", "Model".green().bold(), data.display());
    println!("  {} {}", "answer:".cyan(), info.answer);
    println!("  {} {}", "rows:".cyan(), info.rows);
    for column in &info.columns {
        println!(
            "  {}: {} [{}]",
            column.name.bold(),
            column.values.len(),
            column.values.join(", ")
        );
    }
    println!("  {} {}", "total_count:".cyan(), info.total_count);
    Ok(())
}

fn cmd_bundle(data: &Path, translation: Option<&Path>, out: &Path) -> Result<()> {
    println!("{} {}", "Bundling".green().bold(), data.display());

    let model = load_model(data)?;
    let translations = match translation {
        Some(path) => load_translations(path)?,
        None => Default::default(),
    };
    let bundle = DatasetBundle::from_model(&model, translations)?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    bundle.write(out)?;

    println!(
        "  {} {} (entities={}, rows={})",
        "→".cyan(),
        out.display(),
        bundle.dataset.candidates().len(),
        bundle.dataset.rows.len()
    );
    Ok(())
}

fn cmd_generate(
    data: &Path,
    translation: Option<&Path>,
    outdir: &Path,
    subpage_dir: &str,
) -> Result<()> {
    println!("{} {}", "Generating".green().bold(), data.display());

    let model = load_model(data)?;
    let translations = match translation {
        Some(path) => load_translations(path)?,
        None => Default::default(),
    };
    let site = site::build_site(&model, translations, subpage_dir)?;
    site.write(outdir)?;

    println!(
        "  {} {} ({} pages)",
        "→".cyan(),
        outdir.display(),
        site.pages.len()
    );
    Ok(())
}

fn parse_toggle(raw: &str) -> Result<(String, String)> {
    let (attribute, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("invalid --toggle '{raw}': expected ATTR=VALUE"))?;
    if attribute.is_empty() {
        return Err(anyhow!("invalid --toggle '{raw}': empty attribute"));
    }
    Ok((attribute.to_string(), value.to_string()))
}

fn cmd_navigate(
    data: &Path,
    mode: Option<ModeArg>,
    query: &str,
    toggles: &[String],
    format: OutputFormat,
    translation: Option<&Path>,
    out: Option<&Path>,
) -> Result<()> {
    let DatasetBundle {
        page_title,
        mut config,
        dataset,
        mut translations,
    } = load_bundle(data)?;
    if let Some(path) = translation {
        translations = load_translations(path)?;
    }
    if let Some(mode) = mode {
        config.mode = mode.into();
    }

    let navigator = Navigator::new(dataset, config, translations)?;
    let mut session = navigator.session_from_query(query);
    for raw in toggles {
        let (attribute, value) = parse_toggle(raw)?;
        debug!(attribute = %attribute, value = %value, "toggle");
        session
            .toggle(&attribute, &value)
            .with_context(|| format!("toggle {raw}"))?;
    }
    let view = session.view()?;

    let rendered = render_view(&view, format, page_title.as_deref())?;
    match out {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn render_view(view: &NavigationView, format: OutputFormat, title: Option<&str>) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => render::text(view, title),
        OutputFormat::Html => render::html(view, title),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(view)?),
    })
}
