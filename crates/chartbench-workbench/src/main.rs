//! `chartbench`: render a chart specification headlessly and export it.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;

use chartbench_core::{Backend, Specification, SystemClock, Theme};
use chartbench_io::{
    ArtifactKind, DirectorySink, JsonFileStore, MemoryClipboard, StaticLocation, WorkbenchSettings,
};
use chartbench_layout::{ContainerRect, ListenerRegistry};
use chartbench_render::HeadlessBackend;
use chartbench_workbench::{LogObserver, Workbench};

const STATE_FILE: &str = ".chartbench-state.json";

/// Render a chart specification headlessly and export its artifacts.
#[derive(Parser, Debug)]
#[command(name = "chartbench")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Chart specification (JSON)
    spec: PathBuf,

    /// Chart title used for artifact names and share links
    #[arg(long)]
    title: Option<String>,

    /// Directory exported artifacts are written to
    #[arg(long)]
    out: Option<PathBuf>,

    /// Workbench settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// File holding the persisted layout state
    #[arg(long)]
    state: Option<PathBuf>,

    /// Colour theme (light, dark)
    #[arg(long)]
    theme: Option<Theme>,

    /// Drawing backend (raster, vector)
    #[arg(long)]
    backend: Option<Backend>,

    /// Enable the accessibility decal pattern
    #[arg(long)]
    decal: bool,
}

fn default_title(spec: &Path) -> String {
    spec.file_stem()
        .map(|stem| stem.to_string_lossy().replace(['-', '_'], " "))
        .unwrap_or_else(|| "chart".to_string())
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let settings = match &args.config {
        Some(path) => WorkbenchSettings::load(path)?,
        None => WorkbenchSettings::default(),
    };
    let out = args.out.clone().unwrap_or_else(|| PathBuf::from("."));
    let state = args.state.clone().unwrap_or_else(|| out.join(STATE_FILE));
    let title = args.title.clone().unwrap_or_else(|| default_title(&args.spec));

    let spec = Specification::from_json(&std::fs::read_to_string(&args.spec)?)?;

    let mut bench = Workbench::new(
        HeadlessBackend::new(),
        Box::new(JsonFileStore::open(&state)?),
        Box::new(ListenerRegistry::new()),
        &settings,
        Rc::new(SystemClock),
    );
    bench.add_observer(Box::new(LogObserver));

    let mut mode = settings.default_mode;
    if let Some(theme) = args.theme {
        mode.theme = theme;
    }
    if let Some(backend) = args.backend {
        mode.backend = backend;
    }
    mode.decal_pattern_enabled |= args.decal;
    bench.set_render_mode(mode)?;

    let container = ContainerRect::at_origin(settings.container.width, settings.container.height);
    bench.mount(container)?;
    bench.run(spec)?;

    let mut sink = DirectorySink::new(&out);
    for kind in [ArtifactKind::Spec, ArtifactKind::Raster] {
        if let Some(artifact) = bench.export_artifact(kind, &title, &mut sink)? {
            println!("{}", out.join(&artifact.file_name).display());
        }
    }

    if let Some(base) = &settings.share_base_url {
        let mut clipboard = MemoryClipboard::new();
        let url = bench.share_link(&StaticLocation::for_chart(base, &title), &mut clipboard)?;
        println!("{}", url);
    }

    if let Some(metrics) = bench.metrics() {
        log::info!("Rendered '{}' in {:.3}ms", title, metrics.apply_duration_ms);
    }
    bench.unmount();
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("chartbench: {}", e);
            ExitCode::FAILURE
        }
    }
}
