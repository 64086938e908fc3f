use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use doc_model::{Blueprint, LogCategory, LogEntry, PageSize, Project, TimeRange};
use pdf_pages::LopdfPages;
use serde::Serialize;
use sitepin_core::{GalleryContext, GalleryFilter, GalleryQueryEngine, MediaItem, MediaKind};
use sitepin_scheduler::CancellationToken;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use storage::{MemoryStore, ProjectFile};
use viewer_core::NormalizedRect;

#[derive(Debug, Parser)]
#[command(name = "sitepin-cli")]
#[command(about = "SitePin CLI")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write a deterministic sample project file.
    Seed {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print machine-readable project metadata.
    Info {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Attach a PDF blueprint to a project file.
    Attach {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(value_name = "PDF")]
        pdf: PathBuf,
        /// Display name; defaults to the PDF file stem.
        #[arg(long)]
        name: Option<String>,
    },
    /// Run a gallery query against a project file.
    Query {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Restrict to one blueprint, by name.
        #[arg(long)]
        blueprint: Option<String>,
        /// Page for a spatial region query (1-based).
        #[arg(long)]
        page: Option<u32>,
        /// Normalized selection rectangle as X,Y,W,H.
        #[arg(long, value_name = "X,Y,W,H")]
        rect: Option<String>,
        /// Keep only these categories (repeatable).
        #[arg(long = "category", value_name = "CATEGORY")]
        categories: Vec<String>,
        /// Keep entries dated at or after this Unix timestamp.
        #[arg(long)]
        since: Option<i64>,
        /// Keep entries dated at or before this Unix timestamp.
        #[arg(long)]
        until: Option<i64>,
        /// Exclude photo attachments.
        #[arg(long, default_value_t = false)]
        no_photos: bool,
        /// Exclude video attachments.
        #[arg(long, default_value_t = false)]
        no_videos: bool,
    },
    /// Print CLI version.
    Version,
}

#[derive(Debug, Serialize)]
struct InfoOutput {
    path: String,
    project: String,
    blueprints: usize,
    entries: usize,
    photos: usize,
    videos: usize,
}

#[derive(Debug, Serialize)]
struct MediaItemOutput {
    title: String,
    kind: &'static str,
    category: &'static str,
    page: u32,
    date: i64,
    bytes: usize,
    file_name: Option<String>,
}

impl From<&MediaItem> for MediaItemOutput {
    fn from(item: &MediaItem) -> Self {
        Self {
            title: item.title.clone(),
            kind: match item.kind {
                MediaKind::Photo => "photo",
                MediaKind::Video => "video",
            },
            category: item.category.as_str(),
            page: item.page_number,
            date: item.date,
            bytes: item.data.len(),
            file_name: item.file_name.clone(),
        }
    }
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::Seed { file } => run_seed(&file),
        Commands::Info { file } => run_info(&file),
        Commands::Attach { file, pdf, name } => run_attach(&file, &pdf, name),
        Commands::Query {
            file,
            blueprint,
            page,
            rect,
            categories,
            since,
            until,
            no_photos,
            no_videos,
        } => run_query(QueryArgs {
            file,
            blueprint,
            page,
            rect,
            categories,
            since,
            until,
            no_photos,
            no_videos,
        }),
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_seed(file: &Path) -> Result<()> {
    let project_file = sample_project();
    project_file.save_to(file).context("failed to write project file")?;

    println!("{}", file.display());
    Ok(())
}

fn run_info(file: &Path) -> Result<()> {
    let project_file = load_project_file(file)?;

    let photos: usize =
        project_file.entries.iter().map(|entry| entry.photo_count()).sum();
    let videos: usize =
        project_file.entries.iter().filter(|entry| entry.has_video()).count();

    let payload = InfoOutput {
        path: file.display().to_string(),
        project: project_file.project.name.clone(),
        blueprints: project_file.blueprints.len(),
        entries: project_file.entries.len(),
        photos,
        videos,
    };

    let json = serde_json::to_string_pretty(&payload)?;
    println!("{json}");

    Ok(())
}

#[derive(Debug, Serialize)]
struct AttachOutput {
    name: String,
    pages: u32,
}

fn run_attach(file: &Path, pdf: &Path, name: Option<String>) -> Result<()> {
    let mut project_file = load_project_file(file)?;

    let bytes = fs::read(pdf)
        .with_context(|| format!("failed to read PDF {}", pdf.display()))?;
    let pages = LopdfPages::from_bytes(&bytes).context("failed to read PDF page geometry")?;

    let page_sizes: Vec<PageSize> = pages
        .sizes()
        .iter()
        .map(|size| PageSize { width: size.width, height: size.height })
        .collect();

    let display_name = name.unwrap_or_else(|| {
        pdf.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Blueprint".to_owned())
    });
    let file_name = pdf
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let blueprint = Blueprint::with_page_sizes(
        project_file.project.id,
        display_name.clone(),
        file_name,
        page_sizes,
    );
    let pages = blueprint.page_count;
    project_file.blueprints.push(blueprint);
    project_file.save_to(file).context("failed to write project file")?;

    let json = serde_json::to_string_pretty(&AttachOutput { name: display_name, pages })?;
    println!("{json}");

    Ok(())
}

struct QueryArgs {
    file: PathBuf,
    blueprint: Option<String>,
    page: Option<u32>,
    rect: Option<String>,
    categories: Vec<String>,
    since: Option<i64>,
    until: Option<i64>,
    no_photos: bool,
    no_videos: bool,
}

fn run_query(args: QueryArgs) -> Result<()> {
    let project_file = load_project_file(&args.file)?;
    let project_id = project_file.project.id;

    let blueprint_id = match &args.blueprint {
        Some(name) => Some(
            project_file
                .blueprints
                .iter()
                .find(|blueprint| blueprint.name == *name)
                .with_context(|| format!("no blueprint named \"{name}\""))?
                .id,
        ),
        None => None,
    };

    let context = match (&args.rect, blueprint_id) {
        (Some(spec), Some(blueprint_id)) => {
            let page = args
                .page
                .context("--rect requires --page to identify the queried page")?;
            GalleryContext::SpatialRegion { blueprint_id, rect: parse_rect(spec)?, page }
        }
        (Some(_), None) => {
            anyhow::bail!("--rect requires --blueprint to identify the queried blueprint")
        }
        (None, Some(blueprint_id)) => GalleryContext::SingleBlueprint(blueprint_id),
        (None, None) => GalleryContext::WholeProject(project_id),
    };

    let filter = build_filter(&args)?;

    let store: MemoryStore =
        project_file.into_store().context("project file contains invalid records")?;
    let engine = GalleryQueryEngine::new(&store);
    let items = engine
        .run(&context, &filter, &CancellationToken::new())
        .context("gallery query failed")?;

    let records: Vec<MediaItemOutput> = items.iter().map(MediaItemOutput::from).collect();
    let json = serde_json::to_string_pretty(&records)?;
    println!("{json}");

    Ok(())
}

fn build_filter(args: &QueryArgs) -> Result<GalleryFilter> {
    let categories: HashSet<LogCategory> = if args.categories.is_empty() {
        LogCategory::ALL.into()
    } else {
        args.categories
            .iter()
            .map(|name| name.parse::<LogCategory>())
            .collect::<Result<_, _>>()?
    };

    let date_range = match (args.since, args.until) {
        (None, None) => None,
        (since, until) => {
            Some(TimeRange::new(since.unwrap_or(i64::MIN), until.unwrap_or(i64::MAX)))
        }
    };

    Ok(GalleryFilter {
        categories,
        date_range,
        include_photos: !args.no_photos,
        include_videos: !args.no_videos,
    })
}

fn parse_rect(spec: &str) -> Result<NormalizedRect> {
    let parts: Vec<f64> = spec
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .with_context(|| format!("invalid rectangle \"{spec}\""))?;

    let &[x, y, width, height] = parts.as_slice() else {
        anyhow::bail!("rectangle must have exactly four components, got \"{spec}\"");
    };

    Ok(NormalizedRect::new(x, y, width, height))
}

fn load_project_file(path: &Path) -> Result<ProjectFile> {
    if !path.exists() {
        anyhow::bail!("file does not exist: {}", path.display());
    }

    ProjectFile::load_from(path).context("failed to read project file")
}

/// Sample data used by demos and the CLI contract tests. Dates are fixed so
/// query ordering is reproducible.
fn sample_project() -> ProjectFile {
    let mut project = Project::new("Modern Office Complex");
    project.description =
        "A 12-story modern office building with sustainable design features".to_owned();
    project.client_name = "Urban Development Corp".to_owned();
    project.location = "Downtown Manhattan, NY".to_owned();

    let letter = PageSize { width: 612.0, height: 792.0 };
    let ground =
        Blueprint::new(project.id, "Ground Floor Plan", "ground-floor.pdf", 1, letter);
    let electrical =
        Blueprint::new(project.id, "Electrical Plan", "electrical-plan.pdf", 1, letter);

    let mut panel = LogEntry::new(
        ground.id,
        "Main Electrical Panel",
        LogCategory::Electrical,
        0.3,
        0.4,
        1,
    );
    panel.notes = "120V/240V panel, 200A service, located in utility room".to_owned();
    panel.date = 1_722_556_800;
    panel.add_photo(b"sample-photo-panel-1".to_vec());
    panel.add_photo(b"sample-photo-panel-2".to_vec());

    let mut water = LogEntry::new(
        ground.id,
        "Water Main Entry",
        LogCategory::Plumbing,
        0.7,
        0.6,
        1,
    );
    water.notes = "3/4\" copper line from street, includes shutoff valve".to_owned();
    water.date = 1_722_470_400;
    water.add_photo(b"sample-photo-water".to_vec());

    let mut riser = LogEntry::new(
        electrical.id,
        "Distribution Riser",
        LogCategory::Electrical,
        0.5,
        0.2,
        1,
    );
    riser.notes = "Vertical riser feeding floors 2 through 12".to_owned();
    riser.date = 1_722_384_000;
    riser.set_video(b"sample-video-riser".to_vec(), "riser-walkthrough.mov");

    ProjectFile::new(project, vec![ground, electrical], vec![panel, water, riser])
}
