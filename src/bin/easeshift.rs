use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use easeshift::{
    AttributeId, ConvertOpts, CubicBezier, FrameRatio, HandlePair, HostSnapshot, InMemoryHost,
    KeySelection, KeyframeSource, PresetLibrary, Timeline, Vec2,
};

#[derive(Parser, Debug)]
#[command(name = "easeshift", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Retime a composition snapshot to a new frame rate.
    Convert(ConvertArgs),
    /// Print the retiming plan for a single attribute timeline.
    Plan(PlanArgs),
    /// Normalize a pair of tangent handles to cubic-bezier form.
    Curve(CurveArgs),
    /// Apply an easing curve to the keyframes of one attribute in a snapshot.
    Ease(EaseArgs),
    /// Print the preset library as JSON, optionally merged with an exported file.
    Presets(PresetsArgs),
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Target frame rate.
    #[arg(long)]
    to: f64,

    /// Output snapshot JSON (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Rate assumed when the snapshot has none.
    #[arg(long, default_value_t = 25.0)]
    default_fps: f64,

    /// Leave layer in/out points untouched.
    #[arg(long)]
    keep_layer_spans: bool,

    /// Leave auto-animate offsets and frame behaviours untouched.
    #[arg(long)]
    keep_behaviours: bool,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Input timeline JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame ratio (target / source).
    #[arg(long)]
    ratio: f64,
}

#[derive(Parser, Debug)]
struct CurveArgs {
    /// Outgoing handle of the first keyframe, `dx,dy`.
    #[arg(long, value_parser = parse_vec2, allow_hyphen_values = true)]
    out_handle: Vec2,

    /// Incoming handle of the second keyframe, `dx,dy`.
    #[arg(long, value_parser = parse_vec2, allow_hyphen_values = true)]
    in_handle: Vec2,

    /// Frames between the keyframes.
    #[arg(long)]
    frames: f64,

    /// Value difference between the keyframes.
    #[arg(long, allow_hyphen_values = true)]
    values: f64,
}

#[derive(Parser, Debug)]
struct EaseArgs {
    /// Input snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Attribute path, e.g. `basicShape#1.position.x`.
    #[arg(long)]
    attribute: String,

    /// Curve as `x1,y1,x2,y2` or `cubic-bezier(...)`.
    #[arg(long, conflicts_with = "preset", allow_hyphen_values = true)]
    curve: Option<CubicBezier>,

    /// Name of a built-in preset.
    #[arg(long)]
    preset: Option<String>,

    /// First selected frame (inclusive).
    #[arg(long, allow_hyphen_values = true)]
    from: Option<f64>,

    /// Last selected frame (inclusive).
    #[arg(long, allow_hyphen_values = true)]
    to: Option<f64>,

    /// Output snapshot JSON (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PresetsArgs {
    /// Exported presets JSON to merge over the defaults.
    #[arg(long)]
    import: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Convert(args) => cmd_convert(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Curve(args) => cmd_curve(args),
        Command::Ease(args) => cmd_ease(args),
        Command::Presets(args) => cmd_presets(args),
    }
}

fn parse_vec2(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `dx,dy`, got {s:?}"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("dx: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("dy: {e}"))?;
    Ok(Vec2::new(x, y))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse JSON '{}'", path.display()))
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let snapshot: HostSnapshot = read_json(&args.in_path)?;
    let opts = ConvertOpts {
        default_source_fps: args.default_fps,
        retime_layer_spans: !args.keep_layer_spans,
        retime_behaviours: !args.keep_behaviours,
        ..ConvertOpts::default()
    };

    let source = InMemoryHost::new(snapshot.clone());
    let mut sink = InMemoryHost::new(snapshot);
    let report = easeshift::convert_frame_rate(&source, &mut sink, args.to, &opts)?;

    for (attr, err) in report.failures() {
        eprintln!("warning: {attr}: {err}");
    }
    for layer in report.failed_layers.iter().chain(&report.failed_behaviours) {
        eprintln!("warning: {layer}: timing not retimed");
    }
    eprintln!(
        "converted {} attribute(s), {} keyframe(s), {} behaviour(s), {} -> {} fps",
        report.converted_count(),
        report.total_keyframes(),
        report.behaviours,
        report.source_fps.as_f64(),
        report.target_fps.as_f64()
    );

    write_snapshot(sink.snapshot(), args.out.as_deref())
}

fn write_snapshot(snapshot: &HostSnapshot, out: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    match out {
        Some(out) => {
            std::fs::write(out, json).with_context(|| format!("write '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let timeline: Timeline = read_json(&args.in_path)?;
    let plan = easeshift::plan_attribute(&timeline, FrameRatio::new(args.ratio)?)?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

fn cmd_curve(args: CurveArgs) -> anyhow::Result<()> {
    let curve = CubicBezier::from_handles(
        HandlePair {
            out_handle: args.out_handle,
            in_handle: args.in_handle,
        },
        args.frames,
        args.values,
    )?;
    println!("{}", curve.to_css());
    Ok(())
}

fn cmd_ease(args: EaseArgs) -> anyhow::Result<()> {
    let curve = match (args.curve, args.preset) {
        (Some(curve), _) => curve,
        (None, Some(name)) => PresetLibrary::with_defaults()
            .get(&name)
            .with_context(|| format!("unknown preset '{name}'"))?,
        (None, None) => anyhow::bail!("pass --curve or --preset"),
    };
    let selection = match (args.from, args.to) {
        (None, None) => KeySelection::All,
        (start, end) => KeySelection::Range {
            start: start.unwrap_or(f64::NEG_INFINITY),
            end: end.unwrap_or(f64::INFINITY),
        },
    };

    let snapshot: HostSnapshot = read_json(&args.in_path)?;
    let mut host = InMemoryHost::new(snapshot);
    let timeline = host.keyframe_timeline(&AttributeId::new(args.attribute))?;
    let plan = easeshift::apply_easing(&timeline, curve, &selection)?;
    easeshift::commit_plan(&mut host, &plan)?;
    eprintln!(
        "eased {} keyframe(s) of {} with {}",
        plan.writes.len(),
        plan.attribute,
        curve.to_css()
    );
    write_snapshot(host.snapshot(), args.out.as_deref())
}

fn cmd_presets(args: PresetsArgs) -> anyhow::Result<()> {
    let mut lib = PresetLibrary::with_defaults();
    if let Some(path) = args.import {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read presets '{}'", path.display()))?;
        let added = lib.import_json(&text)?;
        eprintln!("imported {added} new preset(s)");
    }
    println!("{}", lib.to_json_pretty()?);
    Ok(())
}
