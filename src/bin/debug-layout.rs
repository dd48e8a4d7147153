/// Diagnostic tool to verify the data → layout pipeline without a window
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use treemap_view::config::Config;
use treemap_view::data;
use treemap_view::layout::{compute_layout, compute_layouts};

fn parse_viewport(s: &str) -> Result<(f64, f64)> {
    let (w, h) = s
        .split_once('x')
        .with_context(|| format!("viewport '{}' is not WIDTHxHEIGHT", s))?;
    Ok((w.trim().parse()?, h.trim().parse()?))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("treemap_view=debug".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(data_path) = args.next().map(PathBuf::from) else {
        bail!("usage: debug-layout DATA.json [WIDTHxHEIGHT] [CONFIG.toml]");
    };
    let (width, height) = match args.next() {
        Some(v) => parse_viewport(&v)?,
        None => (1920.0, 1080.0),
    };
    let config = Config::load(args.next().map(PathBuf::from).as_deref());

    println!("=== DIAGNOSTIC: Data → Layout Pipeline ===");

    // Load
    let items = data::load_records(&data_path, &config.data)?;
    println!("\n[1] Loaded {} records from {}", items.len(), data_path.display());

    let skipped = items
        .iter()
        .filter(|i| !i.value.is_finite() || i.value < 0.0)
        .count();
    let total: f64 = items
        .iter()
        .filter(|i| i.value.is_finite() && i.value >= 0.0)
        .map(|i| i.value)
        .sum();
    println!("    usable total value: {:.2} ({} records left out)", total, skipped);

    // Compute layout
    let layout = compute_layout(&items, width, height);
    println!("\n[2] Layout computed: {} rectangles in {}x{}", layout.rects.len(), width, height);

    println!("\n[3] Top 10 largest rectangles by area:");
    let mut by_area: Vec<_> = layout.rects.iter().collect();
    by_area.sort_by(|a, b| b.area().total_cmp(&a.area()));
    for (i, rect) in by_area.iter().take(10).enumerate() {
        let item = &items[rect.key];
        println!(
            "    [{}] '{}' - rect: {:.1}x{:.1} ({:.0}px²) at ({:.1}, {:.1}) - value: {:.2} - aspect: {}",
            i,
            item.display_name(),
            rect.w,
            rect.h,
            rect.area(),
            rect.x,
            rect.y,
            item.value,
            rect.aspect_ratio()
                .map(|r| format!("{:.2}", r))
                .unwrap_or_else(|| "-".to_string())
        );
    }

    // Check for anomalies
    println!("\n[4] Checking for anomalies:");
    let viewport_area = width * height;
    let area_sum = layout.total_area();
    println!("    Total rect area: {:.0}px²", area_sum);
    println!("    Viewport area:   {:.0}px²", viewport_area);
    if viewport_area > 0.0 {
        println!("    Coverage: {:.3}%", area_sum / viewport_area * 100.0);
    }
    println!("    Worst aspect ratio: {:.2}", layout.worst_aspect_ratio());
    let collapsed = layout.rects.iter().filter(|r| r.area() <= 0.0).count();
    println!("    Collapsed rectangles: {}", collapsed);
    let non_finite = layout
        .rects
        .iter()
        .filter(|r| !(r.x.is_finite() && r.y.is_finite() && r.w.is_finite() && r.h.is_finite()))
        .count();
    if non_finite > 0 {
        println!("    WARNING: {} rectangles have non-finite geometry", non_finite);
    }

    // Sweep common viewport sizes in parallel
    println!("\n[5] Viewport sweep:");
    let viewports = [
        (320.0, 240.0),
        (800.0, 600.0),
        (1280.0, 800.0),
        (1920.0, 1080.0),
        (2560.0, 1440.0),
        (600.0, 1600.0),
    ];
    for (layout, (w, h)) in compute_layouts(&items, &viewports).iter().zip(viewports) {
        let coverage = if w * h > 0.0 { layout.total_area() / (w * h) * 100.0 } else { 0.0 };
        println!(
            "    {:>5}x{:<5} rects={:<6} coverage={:>8.3}% worst_aspect={:.2}",
            w,
            h,
            layout.rects.len(),
            coverage,
            layout.worst_aspect_ratio()
        );
    }

    Ok(())
}
