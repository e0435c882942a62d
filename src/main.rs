mod app;
mod dataset;
mod search;
mod util;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the knowledge-graph dataset (JSON with `nodes` and `edges`).
    #[arg(long, default_value = "graph.json")]
    dataset: String,
}

fn main() -> eframe::Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "docgraph=info".to_owned());
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "docgraph",
        options,
        Box::new(move |cc| Ok(Box::new(app::DocGraphApp::new(cc, args.dataset.clone())))),
    )
}
