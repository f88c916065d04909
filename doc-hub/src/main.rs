//! Headless driver for a document hub session.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use doc_hub::session;
use doc_hub_core::config::HubConfig;
use doc_hub_core::highlight::HighlightLocator;
use doc_hub_core::hub::DocumentHub;
use doc_hub_core::upload::DiskFile;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "doc-hub")]
#[command(about = "Folder tree, uploads and PDF keyword highlighting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the folder tree of a session
    Tree {
        /// Session file; the default folders are used when absent
        #[arg(long)]
        session: Option<PathBuf>,

        /// Expand every folder
        #[arg(long)]
        expand_all: bool,

        /// Expand one folder (repeatable)
        #[arg(long = "expand")]
        expand: Vec<Uuid>,

        /// Mark a folder as selected
        #[arg(long)]
        select: Option<Uuid>,
    },

    /// Locate a keyword in a serialized text layer
    Highlight {
        #[arg(long)]
        layer: PathBuf,

        #[arg(long)]
        keyword: String,
    },

    /// Validate and store a file, then add it to the session
    Upload {
        #[arg(long)]
        file: PathBuf,

        /// Title; defaults to the file name
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Folder to file the document under
        #[arg(long)]
        folder: Option<Uuid>,

        #[arg(long)]
        session: Option<PathBuf>,

        /// Directory for stored uploads (overrides DOC_HUB_STORAGE_DIR)
        #[arg(long)]
        storage_dir: Option<PathBuf>,

        /// Size ceiling in bytes (overrides DOC_HUB_MAX_UPLOAD_BYTES)
        #[arg(long)]
        max_upload_bytes: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = HubConfig::from_env()?;

    match cli.command {
        Commands::Tree {
            session,
            expand_all,
            expand,
            select,
        } => run_tree(config, session, expand_all, expand, select),
        Commands::Highlight { layer, keyword } => run_highlight(layer, &keyword),
        Commands::Upload {
            file,
            title,
            description,
            tags,
            folder,
            session,
            storage_dir,
            max_upload_bytes,
        } => {
            let mut config = config;
            if storage_dir.is_some() {
                config.storage_dir = storage_dir;
            }
            if let Some(max) = max_upload_bytes {
                config.max_upload_bytes = max;
            }
            let args = UploadArgs {
                file,
                title,
                description,
                tags,
                folder,
                session,
            };
            run_upload(config, args).await
        }
    }
}

fn run_tree(
    config: HubConfig,
    session_path: Option<PathBuf>,
    expand_all: bool,
    expand: Vec<Uuid>,
    select: Option<Uuid>,
) -> Result<()> {
    let session = session::load(session_path.as_deref())?;
    let storage = config.open_storage()?;
    let mut hub = DocumentHub::from_session(config, storage, session);
    if expand_all {
        hub.expand_all();
    }
    for id in expand {
        if !hub.view().is_expanded(id) {
            hub.toggle_folder(id);
        }
    }
    if let Some(id) = select {
        if !hub.select_folder(id) {
            bail!("folder {id} not found");
        }
    }
    let tree = hub.tree();
    print!("{}", session::render_rows(&hub.view().rows(&tree)));
    eprint!("{}", session::render_skipped(&tree.skipped));
    Ok(())
}

fn run_highlight(layer: PathBuf, keyword: &str) -> Result<()> {
    let layer = session::load_layer(&layer)?;
    let result = HighlightLocator::new().locate(&layer, keyword);
    info!(matches = result.match_count, "keyword located");
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

struct UploadArgs {
    file: PathBuf,
    title: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
    folder: Option<Uuid>,
    session: Option<PathBuf>,
}

async fn run_upload(config: HubConfig, args: UploadArgs) -> Result<()> {
    let session = session::load(args.session.as_deref())?;
    let storage = config.open_storage()?;
    let mut hub = DocumentHub::from_session(config, storage, session);
    if let Some(id) = args.folder {
        if !hub.select_folder(id) {
            bail!("folder {id} not found");
        }
    }

    let file = DiskFile::open(&args.file).await?;
    let mut draft = hub.begin_upload(Box::new(file))?;
    if let Some(title) = args.title {
        draft.metadata.title = title;
    }
    if let Some(description) = args.description {
        draft.metadata.description = description;
    }
    for tag in &args.tags {
        draft.add_tag(tag);
    }
    let id = hub.upload(&draft).await?;

    if let Some(path) = &args.session {
        session::save(path, &hub.to_session())?;
    }
    if let Some(doc) = hub.documents().get(id) {
        println!("{}", serde_json::to_string_pretty(doc)?);
    }
    Ok(())
}
