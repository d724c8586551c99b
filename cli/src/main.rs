use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use clap::Parser;
use gesture_canvas::config::{CanvasConfig, GestureTuning};
use gesture_canvas::engine::{Action, EngineCore};
use gesture_canvas::geometry::Size;
use gesture_canvas::input::PointerEvent;
use gesture_canvas::pager::PagerLink;
use serde::Deserialize;
use serde_json::{Value, json};


#[derive(Debug, thiserror::Error)]
enum ReplayError {
    #[error("cannot open script {path}: {source}")]
    Open { path: String, source: io::Error },
    #[error("io failed: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: invalid step: {source}")]
    Parse { line: usize, source: serde_json::Error },
    #[error("line {line}: `{step}` before `mount`")]
    NotMounted { line: usize, step: &'static str },
    #[error("line {line}: canvas already mounted")]
    AlreadyMounted { line: usize },
    #[error("line {line}: time {at} ms is earlier than {last} ms")]
    TimeWentBack { line: usize, at: f64, last: f64 },
    #[error("output encode failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("--frame-ms must be a positive number, got {0}")]
    InvalidFrame(f64),
}

#[derive(Parser, Debug)]
#[command(name = "canvas-replay", about = "Replay a pointer script through the canvas gesture engine")]
struct Cli {
    #[arg(long, default_value = "-", help = "Script path (JSON lines), or - for stdin")]
    script: String,

    #[arg(long, env = "CANVAS_FRAME_MS", default_value_t = 16.0)]
    frame_ms: f64,

    #[arg(long, env = "CANVAS_SETTLE_MS", default_value_t = 6000.0, help = "Ticks allowed after the last step")]
    settle_ms: f64,

    #[arg(long, default_value_t = false, help = "Print the transform after every render request")]
    transforms: bool,

    #[arg(long, default_value_t = false, help = "Embed the canvas in a pager and report its scroll flag")]
    pager: bool,
}

/// One line of a replay script. Times are milliseconds on the script's clock.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Step {
    Mount {
        config: CanvasConfig,
    },
    Pointer {
        at: f64,
        event: PointerEvent,
    },
    Tick {
        at: f64,
    },
    Reset {
        at: f64,
        #[serde(default = "default_animated")]
        animated: bool,
    },
    Active {
        at: f64,
        value: bool,
    },
    CanvasSize {
        at: f64,
        size: Size,
    },
    ContentSize {
        at: f64,
        size: Size,
    },
    /// The enclosing pager started or stopped turning a page.
    Swiping {
        at: f64,
        value: bool,
    },
}

fn default_animated() -> bool {
    true
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Self::Mount { .. } => "mount",
            Self::Pointer { .. } => "pointer",
            Self::Tick { .. } => "tick",
            Self::Reset { .. } => "reset",
            Self::Active { .. } => "active",
            Self::CanvasSize { .. } => "canvas_size",
            Self::ContentSize { .. } => "content_size",
            Self::Swiping { .. } => "swiping",
        }
    }

    fn at(&self) -> f64 {
        match *self {
            Self::Mount { .. } => 0.0,
            Self::Pointer { at, .. }
            | Self::Tick { at }
            | Self::Reset { at, .. }
            | Self::Active { at, .. }
            | Self::CanvasSize { at, .. }
            | Self::ContentSize { at, .. }
            | Self::Swiping { at, .. } => at,
        }
    }
}

/// JSON-lines writer for everything the engine reports.
struct Sink<W> {
    out: W,
    transforms: bool,
    actions: usize,
}

impl<W: Write> Sink<W> {
    fn line(&mut self, value: &Value) -> Result<(), ReplayError> {
        serde_json::to_writer(&mut self.out, value)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn record(&mut self, at: f64, session: &mut Session, actions: &[Action]) -> Result<(), ReplayError> {
        for action in actions {
            self.actions = self.actions.saturating_add(1);
            self.line(&json!({ "at": at, "action": action }))?;
            if self.transforms && *action == Action::RenderNeeded {
                self.line(&json!({ "at": at, "transform": session.engine.transform() }))?;
            }
        }
        if let Some(link) = &session.pager {
            let flag = link.should_pager_scroll.get();
            if session.pager_scroll != Some(flag) {
                session.pager_scroll = Some(flag);
                self.line(&json!({ "at": at, "should_pager_scroll": flag }))?;
            }
        }
        Ok(())
    }
}

/// A mounted canvas and the script clock.
struct Session {
    engine: EngineCore,
    pager: Option<PagerLink>,
    clock_ms: f64,
    pager_scroll: Option<bool>,
}

impl Session {
    /// Tick frame by frame up to `to` while anything is moving or a tap is
    /// pending.
    fn advance<W: Write>(&mut self, to: f64, frame_ms: f64, sink: &mut Sink<W>) -> Result<(), ReplayError> {
        let mut t = self.clock_ms;
        while self.engine.needs_tick() && t + frame_ms <= to {
            t += frame_ms;
            let actions = self.engine.tick(t);
            sink.record(t, self, &actions)?;
        }
        self.clock_ms = to;
        Ok(())
    }

    fn apply(&mut self, step: Step) -> Vec<Action> {
        let at = self.clock_ms;
        match step {
            Step::Mount { .. } => Vec::new(),
            Step::Pointer { event, .. } => self.engine.handle_pointer(event, at),
            Step::Tick { .. } => self.engine.tick(at),
            Step::Reset { animated, .. } => self.engine.reset_transform(animated),
            Step::Active { value, .. } => self.engine.set_active(value),
            Step::CanvasSize { size, .. } => self.engine.set_canvas_size(size),
            Step::ContentSize { size, .. } => self.engine.set_content_size(size),
            Step::Swiping { value, .. } => {
                if let Some(link) = &self.pager {
                    link.is_swiping_in_pager.set(value);
                }
                Vec::new()
            }
        }
    }
}

fn main() -> Result<(), ReplayError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let cli = Cli::parse();
    if !(cli.frame_ms.is_finite() && cli.frame_ms > 0.0) {
        return Err(ReplayError::InvalidFrame(cli.frame_ms));
    }

    let reader: Box<dyn BufRead> = if cli.script == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&cli.script).map_err(|source| ReplayError::Open { path: cli.script.clone(), source })?;
        Box::new(BufReader::new(file))
    };

    let mut sink = Sink { out: io::stdout().lock(), transforms: cli.transforms, actions: 0 };
    let steps = replay(reader, &cli, &mut sink)?;
    sink.out.flush()?;
    tracing::info!(steps, actions = sink.actions, "replay complete");
    Ok(())
}

fn mount<W: Write>(config: &CanvasConfig, cli: &Cli, sink: &mut Sink<W>) -> Result<Session, ReplayError> {
    let pager = cli.pager.then(PagerLink::new);
    let engine = EngineCore::new(config, GestureTuning::from_env(), pager.clone());
    for err in engine.config_errors() {
        sink.line(&json!({ "at": 0.0, "config_error": err.to_string() }))?;
    }
    let mut session = Session { engine, pager, clock_ms: 0.0, pager_scroll: None };
    sink.record(0.0, &mut session, &[])?;
    Ok(session)
}

/// Run every step of the script, then let animations settle. Returns the
/// number of steps applied.
fn replay<W: Write>(reader: impl BufRead, cli: &Cli, sink: &mut Sink<W>) -> Result<usize, ReplayError> {
    let mut session: Option<Session> = None;
    let mut steps = 0_usize;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let step: Step =
            serde_json::from_str(trimmed).map_err(|source| ReplayError::Parse { line: line_no, source })?;
        tracing::debug!(line = line_no, step = step.name(), at = step.at(), "applying step");

        let step = match step {
            Step::Mount { config } => {
                if session.is_some() {
                    return Err(ReplayError::AlreadyMounted { line: line_no });
                }
                session = Some(mount(&config, cli, sink)?);
                steps = steps.saturating_add(1);
                continue;
            }
            step => step,
        };
        let Some(active) = session.as_mut() else {
            return Err(ReplayError::NotMounted { line: line_no, step: step.name() });
        };

        let at = step.at();
        if at.is_nan() || at < active.clock_ms {
            return Err(ReplayError::TimeWentBack { line: line_no, at, last: active.clock_ms });
        }
        active.advance(at, cli.frame_ms, sink)?;
        let actions = active.apply(step);
        sink.record(at, active, &actions)?;
        steps = steps.saturating_add(1);
    }

    if let Some(active) = session.as_mut() {
        let end = active.clock_ms + cli.settle_ms;
        active.advance(end, cli.frame_ms, sink)?;
        let animating = active.engine.is_animating();
        if active.engine.needs_tick() {
            tracing::warn!(settle_ms = cli.settle_ms, "animations still running at end of replay");
        }
        sink.line(&json!({ "at": active.clock_ms, "transform": active.engine.transform(), "animating": animating }))?;
        active.engine.teardown();
    }
    Ok(steps)
}
