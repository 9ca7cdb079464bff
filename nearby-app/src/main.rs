use anyhow::{bail, Context};
use nearby_map::{
    geolocation::{FixedLocation, UnavailableLocation},
    resolve_center, HeadlessSurface, LatLng, MarkerLifecycleManager, MarkerSyncConfig,
    ProfileDirectory, StaticDirectory,
};
use std::sync::Arc;
use std::time::Duration;

/// Runs one refresh cycle against an in-memory surface and prints the result.
///
/// Usage: `nearby-app [config.json|-] [profiles.json|-] [lat,lng]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nearby_map::init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.first().map(String::as_str) {
        Some(path) if path != "-" => MarkerSyncConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path))?,
        _ => MarkerSyncConfig::default(),
    };
    let directory = match args.get(1).map(String::as_str) {
        Some(path) if path != "-" => StaticDirectory::load(path)
            .with_context(|| format!("failed to load profiles from {}", path))?,
        _ => StaticDirectory::samples(),
    };

    let resolution = match args.get(2) {
        Some(raw) => resolve_center(&FixedLocation(parse_position(raw)?), &config).await,
        None => resolve_center(&UnavailableLocation, &config).await,
    };
    if let Some(notice) = resolution.notice {
        println!("notice: {}", notice);
    }
    println!(
        "center: {:.4}, {:.4}",
        resolution.center.lat, resolution.center.lng
    );

    let surface = HeadlessSurface::new();
    let manager = MarkerLifecycleManager::new(Arc::new(surface.clone()), config.clone());
    manager.center_view(&resolution)?;
    manager.schedule_refresh(resolution.center, directory.list_candidates(None));

    // Let the debounce elapse and a few animation frames run.
    tokio::time::sleep(config.debounce() + Duration::from_millis(250)).await;

    let markers = manager.markers();
    println!("{} markers on the map:", markers.len());
    for marker in &markers {
        let name = directory
            .get(&marker.profile_id)
            .map(|p| p.display_name.as_str())
            .unwrap_or("?");
        println!(
            "  {:<12} {:>9.5} {:>9.5}{}",
            name,
            marker.position.lat,
            marker.position.lng,
            if marker.animated { "  (moving)" } else { "" }
        );
    }

    if let Some(view) = surface.last_view() {
        println!("initial view: {:?}", view);
    }
    if let Some(position) = manager.viewer_position() {
        println!("you are here: {:.4}, {:.4}", position.lat, position.lng);
    }

    if manager.focus_on_markers(50.0)? {
        if let Some(view) = surface.last_view() {
            println!("view: {:?}", view);
        }
    }

    manager.cleanup();
    log::info!(
        "cleaned up, {} markers left on the surface",
        surface.marker_count()
    );
    Ok(())
}

fn parse_position(raw: &str) -> anyhow::Result<LatLng> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [lat, lng] = parts.as_slice() else {
        bail!("expected a position as \"lat,lng\", got {:?}", raw);
    };
    Ok(LatLng::new(
        lat.parse().context("invalid latitude")?,
        lng.parse().context("invalid longitude")?,
    ))
}
