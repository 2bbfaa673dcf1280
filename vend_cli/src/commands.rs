//! Subcommand implementations: config mapping, backend assembly and output.

use crate::cli::{Commands, DEFAULT_CONFIG};
use eyre::{Result, WrapErr};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use vend_config::{Config, SourceKind};
use vend_core::catalog::{self, Strategy};
use vend_core::dashboard::{Analysis, AnalysisKind};
use vend_core::link_error::map_source_error;
use vend_core::optimizer::{Inference, OptimizationResult, OptimizerParams, infer};
use vend_core::sampler::{Sampler, SamplerCfg};
use vend_core::{Dashboard, TelemetrySample, VendError, check_reading};
use vend_hardware::{FailingSink, MemorySink, OutboxSink, ReplayTelemetry, SimulatedTelemetry};
use vend_traits::clock::SystemClock;
use vend_traits::{CommandSink, TelemetrySource};

/// Test hook: `VEND_TEST_SINK_FAIL=1` makes every command delivery fail.
const SINK_FAIL_ENV: &str = "VEND_TEST_SINK_FAIL";

pub type BoxedSource = Box<dyn TelemetrySource + Send>;
pub type BoxedSink = Box<dyn CommandSink + Send>;

/// Load `--config`, or the default file if present, or built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path: Option<PathBuf> = match path {
        Some(p) => Some(p.to_path_buf()),
        None => Some(PathBuf::from(DEFAULT_CONFIG)).filter(|p| p.exists()),
    };
    match path {
        Some(p) => vend_config::load_file(&p)
            .map_err(|e| eyre::Report::new(VendError::Config(format!("{e:#}")))),
        None => Ok(Config::default()),
    }
}

pub fn build_source(cfg: &Config) -> Result<(BoxedSource, SourceKind)> {
    match cfg.telemetry.source {
        SourceKind::Simulated => {
            let sim = SimulatedTelemetry::new(
                f64::from(cfg.simulation.max_rpm),
                f64::from(cfg.simulation.max_vibration),
                cfg.simulation.seed,
            );
            Ok((Box::new(sim), SourceKind::Simulated))
        }
        SourceKind::Replay => {
            let path = cfg.telemetry.replay_csv.as_deref().ok_or_else(|| {
                VendError::Config("replay_csv is required when telemetry.source = \"replay\"".into())
            })?;
            let samples = vend_config::load_telemetry_csv(Path::new(path))
                .map_err(|e| eyre::Report::new(VendError::Config(format!("{e:#}"))))?;
            let replay = ReplayTelemetry::new(samples)
                .map_err(|e| eyre::Report::new(VendError::Config(e.to_string())))?;
            Ok((Box::new(replay), SourceKind::Replay))
        }
    }
}

pub fn build_sink(cfg: &Config) -> Result<BoxedSink> {
    if std::env::var(SINK_FAIL_ENV).is_ok_and(|v| v == "1") {
        tracing::debug!("{SINK_FAIL_ENV} set; using failing sink");
        return Ok(Box::new(FailingSink::new("store unreachable (test hook)")));
    }
    match cfg.store.outbox.as_deref() {
        Some(path) => {
            let sink = OutboxSink::open(path, cfg.store.command_path.clone())
                .wrap_err_with(|| format!("open outbox {path:?}"))?;
            Ok(Box::new(sink))
        }
        None => Ok(Box::new(MemorySink::new())),
    }
}

/// Catalog lookup accepting the command code 0 for the baseline entry.
pub fn resolve_strategy(id: u8) -> Result<&'static Strategy, VendError> {
    catalog::find(id).or_else(|_| catalog::by_command(id))
}

fn validate_params(p: &OptimizerParams) -> Result<(), VendError> {
    let w = p.medicine_weight;
    if !(w.is_finite() && w > 0.0 && w <= 10.0) {
        return Err(VendError::InvalidInput(format!(
            "weight must be in (0.0, 10.0], got {w}"
        )));
    }
    let t = p.target_accuracy;
    if !(t.is_finite() && t > 0.0) {
        return Err(VendError::InvalidInput(format!(
            "target accuracy must be > 0, got {t}"
        )));
    }
    Ok(())
}

fn result_json(r: &OptimizationResult) -> Value {
    json!({
        "optimal_rpm": r.optimal_rpm,
        "current_accuracy": r.current_accuracy,
        "predicted_accuracy": r.predicted_accuracy,
        "improvement_percent": r.improvement_percent,
        "vibration_delta": r.vibration_delta,
    })
}

fn inference_json(inf: &Inference) -> Value {
    let m = &inf.memberships;
    let degrees = |d: vend_core::fuzzy::Degrees| json!([d.low, d.mid, d.high]);
    json!({
        "memberships": {
            "weight": degrees(m.weight),
            "vibration": degrees(m.vibration),
            "rpm": degrees(m.rpm),
        },
        "rules": inf.firings.iter().map(|f| json!({
            "rule": f.rule,
            "strength": f.strength,
            "output_rpm": f.output.rpm(),
        })).collect::<Vec<_>>(),
        "crisp_rpm": inf.crisp_rpm,
        "accuracy_margin": inf.accuracy_margin,
    })
}

fn analysis_json(a: &Analysis) -> Value {
    let kind = match a.kind {
        AnalysisKind::Optimized => "optimized",
        AnalysisKind::Preview => "preview",
    };
    let mut v = result_json(&a.result);
    v["kind"] = json!(kind);
    v["rpm"] = json!(a.sample.rpm);
    v["vibration"] = json!(a.sample.vibration);
    v
}

pub fn run(cmd: Commands, cfg: &Config, json_out: bool) -> Result<()> {
    match cmd {
        Commands::Optimize {
            vibration,
            rpm,
            reference_vibration,
            weight,
            target_accuracy,
            trace,
        } => {
            let mut params: OptimizerParams = (&cfg.optimizer).into();
            if let Some(w) = weight {
                params.medicine_weight = w;
            }
            if let Some(t) = target_accuracy {
                params.target_accuracy = t;
            }
            validate_params(&params)?;
            check_reading(vibration, rpm)?;
            if let Some(r) = reference_vibration.filter(|r| !r.is_finite()) {
                return Err(VendError::InvalidInput(format!(
                    "reference vibration must be a finite number, got {r}"
                ))
                .into());
            }
            optimize(&params, vibration, rpm, reference_vibration, trace, json_out);
            Ok(())
        }
        Commands::Catalog => {
            if json_out {
                let list: Vec<Value> = catalog::display_order()
                    .map(|s| {
                        json!({
                            "id": s.id,
                            "command": s.command(),
                            "name": s.name,
                            "purpose": s.purpose,
                            "executable": s.is_executable(),
                        })
                    })
                    .collect();
                println!("{}", Value::Array(list));
            } else {
                print!("{}", vend_ui::render_catalog());
            }
            Ok(())
        }
        Commands::Show { id } => {
            let s = resolve_strategy(id)?;
            if json_out {
                println!(
                    "{}",
                    json!({
                        "id": s.id,
                        "command": s.command(),
                        "name": s.name,
                        "purpose": s.purpose,
                        "description": s.description,
                        "rules": s.reference_rules,
                    })
                );
            } else {
                println!("{}", vend_ui::render_strategy(s));
            }
            Ok(())
        }
        Commands::Activate { id, rpm, vibration } => {
            let explicit = match (rpm, vibration) {
                (Some(r), Some(v)) => {
                    check_reading(v, r)?;
                    Some(TelemetrySample::new(r, v))
                }
                _ => None,
            };
            activate(cfg, id, explicit, json_out)
        }
        Commands::Monitor { samples, period_ms } => monitor(cfg, samples, period_ms, json_out),
        Commands::SelfCheck => self_check(cfg, json_out),
    }
}

fn optimize(
    params: &OptimizerParams,
    vibration: f64,
    rpm: f64,
    reference: Option<f64>,
    trace: bool,
    json_out: bool,
) {
    let inf = infer(params, vibration, rpm);
    let result = inf.to_result(reference);
    if inf.fell_back() {
        tracing::warn!(vibration, rpm, "no rule fired; using fallback rpm");
    }
    if json_out {
        let mut v = result_json(&result);
        if trace {
            v["trace"] = inference_json(&inf);
        }
        println!("{v}");
    } else {
        if trace {
            println!("{}\n", vend_ui::render_inference(&inf));
        }
        println!("{}", vend_ui::render_result(&result));
    }
}

fn activate(
    cfg: &Config,
    id: u8,
    explicit: Option<TelemetrySample>,
    json_out: bool,
) -> Result<()> {
    let strategy = resolve_strategy(id)?;
    let sink = build_sink(cfg)?;
    let mut dash = Dashboard::builder()
        .with_sink(sink)
        .apply_config(cfg)
        .build()?;

    match explicit {
        Some(sample) => dash.ingest(sample),
        None => {
            let (mut source, kind) = build_source(cfg)?;
            let timeout = Duration::from_millis(cfg.telemetry.read_timeout_ms);
            let sample = source
                .read(timeout)
                .map_err(|e| map_source_error(e.as_ref()))?;
            match kind {
                SourceKind::Simulated => dash.ingest_simulated(sample),
                SourceKind::Replay => dash.ingest(sample),
            }
        }
    }

    let a = dash.activate(strategy.id)?;
    if json_out {
        println!(
            "{}",
            json!({
                "id": a.strategy.id,
                "name": a.strategy.name,
                "command": a.command,
                "delivered": a.delivered,
                "fallback_reason": a.fallback_reason.as_ref().map(ToString::to_string),
                "status": a.status.to_string(),
                "analysis": analysis_json(&a.analysis),
            })
        );
    } else {
        if let Some(reason) = &a.fallback_reason {
            println!("Command {} not delivered ({reason}); simulating.", a.command);
        } else {
            println!("Command {} sent.", a.command);
        }
        println!("{}", vend_ui::status_line(dash.status(), dash.link()));
        println!("{}", vend_ui::render_analysis(&a.analysis));
    }
    Ok(())
}

fn monitor(cfg: &Config, samples: usize, period_ms: Option<u64>, json_out: bool) -> Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
            tracing::warn!(error = %e, "Ctrl-C handler not installed");
        }
    }

    let (source, kind) = build_source(cfg)?;
    let mut scfg: SamplerCfg = (&cfg.telemetry).into();
    if let Some(ms) = period_ms {
        if ms == 0 {
            return Err(VendError::InvalidInput("period must be >= 1 ms".into()).into());
        }
        scfg.period = Duration::from_millis(ms);
    }
    let wait = scfg.period + scfg.read_timeout + Duration::from_secs(1);

    let mut dash = Dashboard::builder()
        .with_sink(MemorySink::new())
        .apply_config(cfg)
        .build()?;
    let sampler = Sampler::spawn(source, scfg, SystemClock);
    tracing::info!(samples, period_ms = scfg.period.as_millis() as u64, "monitor started");

    let mut received = 0usize;
    for _ in 0..samples {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("monitor interrupted");
            break;
        }
        match sampler.recv_timeout(wait) {
            Some(sample) => {
                received += 1;
                match kind {
                    SourceKind::Simulated => dash.ingest_simulated(sample),
                    SourceKind::Replay => dash.ingest(sample),
                }
            }
            None => {
                tracing::warn!(stalled_ms = sampler.stalled_for_now(), "no telemetry");
                dash.mark_disconnected();
            }
        }
        let latest = dash.latest();
        if json_out {
            println!(
                "{}",
                json!({
                    "rpm": latest.rpm,
                    "vibration": latest.vibration,
                    "status": dash.status().to_string(),
                    "link": dash.link().label(),
                })
            );
        } else {
            println!(
                "{}\n",
                vend_ui::render_monitor(
                    dash.status(),
                    dash.link(),
                    dash.history(),
                    cfg.telemetry.graph_points
                )
            );
        }
    }

    if received == 0 && samples > 0 {
        return Err(VendError::Telemetry(format!(
            "no samples received ({} read errors)",
            sampler.read_errors()
        ))
        .into());
    }
    Ok(())
}

fn self_check(cfg: &Config, json_out: bool) -> Result<()> {
    let (mut source, kind) = build_source(cfg)?;
    let sample = source
        .read(Duration::from_millis(cfg.telemetry.read_timeout_ms))
        .map_err(|e| map_source_error(e.as_ref()))?;
    let _sink = build_sink(cfg)?;
    let source_name = match kind {
        SourceKind::Simulated => "simulated",
        SourceKind::Replay => "replay",
    };
    if json_out {
        println!(
            "{}",
            json!({
                "ok": true,
                "source": source_name,
                "sample": { "rpm": sample.rpm, "vibration": sample.vibration },
                "command_path": cfg.store.command_path,
            })
        );
    } else {
        println!("config: ok");
        println!(
            "telemetry ({source_name}): ok, rpm {} vibration {}",
            sample.rpm, sample.vibration
        );
        println!("store ({}): ok", cfg.store.command_path);
        println!("OK");
    }
    Ok(())
}
