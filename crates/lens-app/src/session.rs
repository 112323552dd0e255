//! Scripted session that drives the shell the way a window's layout passes
//! would: a region mounted at zero size and sized over several passes, a
//! panel that opens and closes before it settles, then a resize and a scroll.

use std::time::Duration;

use lens_binder::BinderSnapshot;
use lens_common::{Position, Rect, RegionId, Size};
use serde::Serialize;
use tracing::info;

use crate::shell::PreviewShell;

#[derive(Debug, Serialize)]
pub struct RegionReport {
    pub region: RegionId,
    pub snapshot: BinderSnapshot,
}

#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub regions: Vec<RegionReport>,
    pub notices: Vec<String>,
    pub live_surfaces: usize,
}

pub async fn run(shell: &mut PreviewShell, settle: Duration) -> SessionReport {
    let settle = settle.max(Duration::from_millis(10));

    let main = shell.mount(Rect::new(0.0, 0.0, 0.0, 0.0));
    if let Some(region) = shell.region(main) {
        region.set_rect(Rect::new(24.0, 64.0, 320.0, 180.0));
        region.resize(Size::new(640.0, 360.0));
    }

    let flicker = shell.mount(Rect::new(700.0, 64.0, 200.0, 120.0));
    tokio::time::sleep(settle / 4).await;
    shell.unmount(flicker);

    tokio::time::sleep(settle * 2).await;
    if let Some(region) = shell.region(main) {
        region.resize(Size::new(800.0, 450.0));
        region.reposition(Position::new(24.0, 16.0));
    }
    tokio::time::sleep(settle).await;
    let handled = shell.pump_events();
    info!(events = handled, "session settled");

    let regions = shell
        .registry()
        .active_regions()
        .into_iter()
        .filter_map(|region| {
            shell
                .snapshot(region)
                .map(|snapshot| RegionReport { region, snapshot })
        })
        .collect();
    let notices = shell
        .notifications()
        .iter()
        .map(|n| format!("{}: {}", n.title, n.body))
        .collect();
    let live_surfaces = shell.host().surface_count().await.unwrap_or(0);

    SessionReport {
        regions,
        notices,
        live_surfaces,
    }
}
