use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use photomark::EditorSession;
use photomark::config::EditorConfig;
use photomark::session::messages::EditorMsg;

/// Annotate a photo by replaying editor messages, then save or download it
#[derive(Debug, Parser)]
#[command(name = "photomark")]
#[command(about = "Photo annotation editor")]
struct Cli {
    /// Source photo
    #[arg(value_name = "IMAGE")]
    image: PathBuf,
    /// Caption passed through to the commit callback
    #[arg(long)]
    caption: Option<String>,
    /// JSON array of editor messages to replay
    #[arg(long, value_name = "FILE.json")]
    script: Option<PathBuf>,
    /// Output file for save (defaults to annotated.<ext>)
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
    /// Write to the download directory instead of saving
    #[arg(long)]
    download: bool,
}

fn load_script(path: &Path) -> anyhow::Result<Vec<EditorMsg>> {
    let json = std::fs::read_to_string(path).with_context(|| format!("reading script {:?}", path))?;
    serde_json::from_str(&json).with_context(|| format!("parsing script {:?}", path))
}

fn run(args: Cli) -> anyhow::Result<()> {
    let config = EditorConfig::load();
    let script = match &args.script {
        Some(path) => load_script(path)?,
        None => Vec::new(),
    };

    let out = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("annotated.{}", config.export_format.extension())));
    let commit_out = out.clone();

    let mut session = EditorSession::open_path(
        &args.image,
        args.caption.clone(),
        config,
        Box::new(move |bytes: Vec<u8>, caption: String| {
            match std::fs::write(&commit_out, &bytes) {
                Ok(()) => println!("{}\t{}", commit_out.display(), caption),
                Err(err) => log::error!("Failed to write {:?}: {}", commit_out, err),
            }
        }),
        Box::new(|| log::info!("Annotation discarded")),
    )?;

    log::info!("Replaying {} messages", script.len());
    for msg in script {
        session.update(msg);
    }

    if args.download {
        let path = session.download()?;
        println!("{}", path.display());
        session.cancel();
        return Ok(());
    }

    session.save()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Cli::parse();
    if let Err(err) = run(args) {
        log::error!("{:?}", err);
        eprintln!("photomark: {err:#}");
        std::process::exit(1);
    }
}
