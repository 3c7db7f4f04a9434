mod app;
mod util;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use codegraph_view::layout::LayoutConfig;
use eframe::egui::vec2;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph JSON to open on startup.
    graph: Option<PathBuf>,

    /// Seed for the initial node placement. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Seconds of simulation before the layout is frozen. 0 waits for the
    /// simulation to cool down on its own.
    #[arg(long, default_value_t = 3.0, value_parser = parse_settle_timeout)]
    settle_timeout: f32,

    #[arg(long, default_value_t = 1440.0)]
    width: f32,

    #[arg(long, default_value_t = 920.0)]
    height: f32,
}

fn parse_settle_timeout(raw: &str) -> Result<f32, String> {
    let seconds = raw
        .parse::<f32>()
        .map_err(|error| format!("not a number of seconds: {error}"))?;
    if seconds < 0.0 {
        return Err("must not be negative".to_owned());
    }
    Duration::try_from_secs_f32(seconds).map_err(|error| format!("out of range: {error}"))?;
    Ok(seconds)
}

impl Args {
    fn layout_config(&self) -> LayoutConfig {
        let settle_timeout = Duration::try_from_secs_f32(self.settle_timeout)
            .ok()
            .filter(|timeout| !timeout.is_zero());
        LayoutConfig {
            viewport: vec2(self.width, self.height),
            settle_timeout,
            seed: self.seed,
            ..LayoutConfig::default()
        }
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().compact())
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = args.layout_config();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    eframe::run_native(
        "codegraph-view",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::CodeGraphApp::new(
                cc,
                config,
                args.graph.clone(),
            )))
        }),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cli_maps_onto_layout_config() {
        let args = Args::parse_from([
            "codegraph-view",
            "graph.json",
            "--seed",
            "9",
            "--settle-timeout",
            "1.5",
            "--width",
            "1000",
            "--height",
            "600",
        ]);

        let config = args.layout_config();

        assert_eq!(args.graph, Some(PathBuf::from("graph.json")));
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.settle_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(config.viewport, vec2(1000.0, 600.0));
        assert_eq!(config.link_padding, LayoutConfig::default().link_padding);
    }

    #[test]
    fn zero_timeout_disables_the_timer() {
        let args = Args::parse_from(["codegraph-view", "--settle-timeout", "0"]);

        assert_eq!(args.graph, None);
        assert_eq!(args.layout_config().settle_timeout, None);
    }

    #[test]
    fn unrepresentable_timeouts_are_rejected_at_parse_time() {
        for raw in ["inf", "NaN", "1e30", "-1", "soon"] {
            let parsed = Args::try_parse_from(["codegraph-view", "--settle-timeout", raw]);
            assert!(parsed.is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn out_of_range_timeout_never_panics_when_built_directly() {
        let args = Args {
            graph: None,
            seed: None,
            settle_timeout: f32::INFINITY,
            width: 800.0,
            height: 600.0,
        };

        assert_eq!(args.layout_config().settle_timeout, None);
    }
}
