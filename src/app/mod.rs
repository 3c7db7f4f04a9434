use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::Context as _;
use eframe::egui::{self, Context};
use tracing::{info, warn};

use codegraph_view::graph::{CodeNode, GraphDocument, NodeKind, read_graph_document};
use codegraph_view::layout::{LayoutConfig, LayoutNode};
use codegraph_view::view::Session;

mod graph;
mod render_utils;
mod ui;

/// Polling interval while a background load is in flight.
const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct CodeGraphApp {
    graph_path: String,
    model: Box<ViewModel>,
    pending: Option<PendingLoad>,
    next_generation: u64,
}

struct PendingLoad {
    generation: u64,
    path: PathBuf,
    rx: Receiver<LoadOutcome>,
}

struct LoadOutcome {
    generation: u64,
    result: anyhow::Result<GraphDocument>,
}

/// What the details panel shows. Filled by the session's node-select
/// listener, so it only changes when the selection does.
#[derive(Clone, Debug)]
struct NodeDetails {
    id: String,
    name: String,
    kind: NodeKind,
    file: String,
    line: u32,
    column: u32,
    level: usize,
    child_count: usize,
    metadata: Vec<(String, String)>,
}

impl NodeDetails {
    fn from_node(node: &CodeNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
            file: node.file.clone(),
            line: node.line,
            column: node.column,
            level: node.level,
            child_count: node.child_count,
            metadata: node
                .metadata
                .iter()
                .map(|(key, value)| (key.clone(), value.to_string()))
                .collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct TickReadout {
    ticks: u64,
    kinetic_energy: f32,
}

struct ViewModel {
    session: Session,
    details: Rc<RefCell<Option<NodeDetails>>>,
    tick_readout: Rc<Cell<TickReadout>>,
    load_error: Option<String>,
}

impl ViewModel {
    fn new(config: LayoutConfig) -> Self {
        let mut session = Session::new(config);

        let details = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&details);
        session.on_node_select(move |node| {
            *sink.borrow_mut() = node.map(NodeDetails::from_node);
        });

        let tick_readout = Rc::new(Cell::new(TickReadout::default()));
        let readout = Rc::clone(&tick_readout);
        session.on_tick(move |nodes: &[LayoutNode]| {
            let previous = readout.get();
            readout.set(TickReadout {
                ticks: previous.ticks + 1,
                kinetic_energy: nodes.iter().map(|node| node.velocity.length_sq()).sum(),
            });
        });

        Self {
            session,
            details,
            tick_readout,
            load_error: None,
        }
    }
}

impl CodeGraphApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: LayoutConfig,
        graph_path: Option<PathBuf>,
    ) -> Self {
        let mut app = Self {
            graph_path: graph_path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            model: Box::new(ViewModel::new(config)),
            pending: None,
            next_generation: 0,
        };

        if let Some(path) = graph_path {
            app.start_load(path);
        }
        app
    }

    fn spawn_load(path: PathBuf, generation: u64) -> Receiver<LoadOutcome> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = read_graph_document(&path)
                .with_context(|| format!("failed to load graph from {}", path.display()));
            // The receiver is gone when a newer load replaced this one.
            let _ = tx.send(LoadOutcome { generation, result });
        });

        rx
    }

    /// Starts reading `path` in the background. Any load still in flight is
    /// abandoned; its result is never installed.
    fn start_load(&mut self, path: PathBuf) {
        self.next_generation += 1;
        let generation = self.next_generation;
        info!(path = %path.display(), generation, "loading graph");

        self.pending = Some(PendingLoad {
            generation,
            rx: Self::spawn_load(path.clone(), generation),
            path,
        });
    }

    fn poll_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        match pending.rx.try_recv() {
            Ok(outcome) if outcome.generation != pending.generation => {
                warn!(
                    expected = pending.generation,
                    received = outcome.generation,
                    "discarding stale graph load"
                );
            }
            Ok(outcome) => self.install(outcome.result, &pending.path),
            Err(TryRecvError::Empty) => {
                self.pending = Some(pending);
            }
            Err(TryRecvError::Disconnected) => {
                self.model.load_error = Some("Background load worker disconnected".to_owned());
            }
        }
    }

    fn install(&mut self, result: anyhow::Result<GraphDocument>, path: &Path) {
        match result {
            Ok(document) => {
                self.model.session.load(&document);
                self.model.load_error = None;
                info!(path = %path.display(), "graph installed");
            }
            Err(error) => {
                warn!(path = %path.display(), "graph load failed: {error:#}");
                self.model.load_error = Some(format!("{error:#}"));
            }
        }
    }
}

impl eframe::App for CodeGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_pending();

        let is_loading = self.pending.is_some();
        if is_loading {
            ctx.request_repaint_after(LOAD_POLL_INTERVAL);
        }

        let mut load_requested = false;
        let model = &mut self.model;
        model.show_chrome(ctx, &mut self.graph_path, &mut load_requested, is_loading);

        if model.session.generation() == 0 {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    if is_loading {
                        ui.heading("Loading code graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    } else {
                        ui.heading("No graph loaded");
                        ui.add_space(6.0);
                        ui.label("Enter the path of a graph JSON file above and press Load.");
                    }
                });
            });
        } else {
            egui::CentralPanel::default().show(ctx, |ui| model.draw_graph(ui));

            let elapsed = Duration::from_secs_f32(ctx.input(|input| input.stable_dt).max(0.0));
            if model.session.tick(elapsed) {
                ctx.request_repaint();
            }
        }

        if load_requested {
            let path = self.graph_path.trim().to_owned();
            if path.is_empty() {
                self.model.load_error = Some("Enter a graph file path first".to_owned());
            } else {
                self.start_load(PathBuf::from(path));
            }
        }
    }
}
