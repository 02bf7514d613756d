use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{info, warn};
use tokio::runtime::Handle;

use hvac_viewer::assets::GltfProvider;
use hvac_viewer::catalog;
use hvac_viewer::config::ViewerConfig;
use hvac_viewer::overlay::{LabelBoxRenderer, OverlayRenderer};
use hvac_viewer::{HvacViewer, VisibilityState};

/// Headless HVAC assembly viewer: loads the catalog and runs the frame loop.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "hvac-viewer")]
#[command(version)]
pub struct Args {
    /// Directory holding the catalog's asset files [default: $HVAC_ASSET_ROOT or models]
    pub asset_root: Option<PathBuf>,

    /// Number of frames to run
    #[arg(long, default_value_t = 120)]
    pub frames: u64,

    /// Frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    pub fps: u32,

    /// Spin the fans
    #[arg(long)]
    pub spin: bool,

    /// Hide a catalog entry, may be repeated
    #[arg(long = "hide", value_name = "NAME")]
    pub hidden: Vec<String>,
}

/// Drives the viewer headlessly at a fixed frame rate and logs what each frame
/// would draw.
pub async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = ViewerConfig::from_env();
    if let Some(root) = args.asset_root.clone() {
        config = config.with_asset_root(root);
    }
    info!("Loading assets from {}", config.asset_root.display());

    let mut provider = GltfProvider::new(config.asset_root.clone(), Handle::current());
    let mut viewer = HvacViewer::new(config, &mut provider)
        .on_center_change(|center| info!("Orbit target moved to {:?}", center));

    let camera = &viewer.config().camera;
    info!(
        "Camera at {:?}, {:.1} units from {:?}, fov {}",
        camera.eye,
        camera.distance(),
        camera.target,
        camera.fov_degrees
    );

    let mut visibility = VisibilityState::all_visible(catalog::catalog());
    for name in &args.hidden {
        if catalog::find(name).is_none() {
            warn!("{} is not in the catalog", name);
        }
        visibility.set(name, false);
    }

    let mut labels = LabelBoxRenderer;
    let frame_time = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    let mut interval = tokio::time::interval(frame_time);
    let mut last_frame = Instant::now();
    let mut last_summary = None;
    let mut settled = false;

    for _ in 0..args.frames {
        interval.tick().await;
        let delta_time = last_frame.elapsed();
        last_frame = Instant::now();

        let frame = viewer.tick(&visibility, args.spin, delta_time);
        let summary = (frame.instance_count(), frame.overlay_count());
        if last_summary != Some(summary) {
            info!("Drawing {} instances and {} overlays", summary.0, summary.1);
            for overlay in frame.overlays() {
                info!("{}: {}", overlay.target, labels.render_overlay(overlay));
            }
            last_summary = Some(summary);
        }

        if !settled && viewer.cache().is_settled() {
            info!("All asset loads settled after {} frames", viewer.frames());
            settled = true;
        }
    }

    for state in viewer.animator().states() {
        info!(
            "{} stopped at {:.2} rad ({:?})",
            state.descriptor.name, state.angle, state.phase
        );
    }
    let failed = viewer
        .cache()
        .assets()
        .filter_map(|asset| Some((asset.name(), asset.error()?)))
        .collect::<Vec<_>>();
    for (name, error) in &failed {
        warn!("{} unavailable: {}", name, error);
    }
    info!(
        "Ran {} frames, {} recompositions, {} of {} assets unavailable",
        viewer.frames(),
        viewer.rebuilds(),
        failed.len(),
        catalog::catalog().len()
    );

    Ok(())
}
