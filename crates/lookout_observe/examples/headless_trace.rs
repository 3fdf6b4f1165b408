//! Headless Observation Demo
//!
//! Drives a layout observer and the callback watchers against the
//! in-memory host and prints every published snapshot.
//!
//! Features demonstrated:
//! - Attach/detach lifecycle of a `LayoutObserver`
//! - Scroll bursts coalesced into one pass per frame
//! - Orientation change followed by the deferred resize
//! - Loading `ObserveConfig` from TOML
//!
//! Run with: RUST_LOG=lookout_observe=debug cargo run -p lookout_observe --example headless_trace [config.toml]

use std::rc::Rc;

use anyhow::Context;
use lookout_observe::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = r#"
prefer_native_resize = false

[viewability]
cushion = 0.25

[watchers]
scroll_mode = "debounced"
"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => ObserveConfig::load(&path).with_context(|| format!("loading {}", path))?,
        None => ObserveConfig::from_toml_str(DEFAULT_CONFIG)?,
    };
    tracing::info!("Config: {:?}", config);

    let host = Rc::new(HeadlessHost::new());
    let card = host.create_element(ClientRect::from_xywh(40.0, 900.0, 300.0, 200.0));

    let observer = LayoutObserver::new(host.clone(), config.clone());
    let _layout = observer.subscribe(|state| {
        println!(
            "layout: rect=({:.0},{:.0} {:.0}x{:.0}) screen={:.0}x{:.0} scroll={:.0} hover={} in_view={}",
            state.rect.x,
            state.rect.y,
            state.rect.width,
            state.rect.height,
            state.screen.width,
            state.screen.height,
            state.scroll.y,
            state.hover,
            state.in_view
        );
    });

    let scroll = ScrollWatcher::from_config(host.clone(), &config, |top| {
        println!("scroll: top={:.0}", top);
    });

    observer.attach(Some(card));
    scroll.attach();

    // Scroll the card into view, one frame's worth of events
    for step in 1..=8 {
        host.scroll_to(0.0, step as f64 * 60.0);
    }
    host.tick_frame();

    host.dispatch(HostEvent::PointerMove { x: 100.0, y: 500.0 });
    host.tick_frame();

    // Rotate: the new viewport is only known on the following resize
    host.dispatch(HostEvent::OrientationChange);
    host.resize_window(600.0, 800.0);
    host.tick_frame();

    println!(
        "passes={} native_resize={} frames={}",
        observer.pass_count(),
        observer.uses_native_resize(),
        host.frame_count()
    );

    observer.detach();
    scroll.detach();
    println!(
        "after detach: listeners={} observers={} pending_frames={}",
        host.total_listeners(),
        host.observer_count(),
        host.pending_frames()
    );

    Ok(())
}
