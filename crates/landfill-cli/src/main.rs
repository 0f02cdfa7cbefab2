use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use landfill_core::prelude::*;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "landfill",
    about = "Pack rectangles into a texture atlas layout",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack a list of sizes or a directory of images and export the layout
    Pack(PackArgs),
    /// Simple timing bench on random sizes (packs once, prints time + efficiency)
    Bench(BenchArgs),
}

/// Atlas bounds and packer behavior shared by all subcommands.
#[derive(Parser, Debug, Clone)]
struct AtlasArgs {
    /// Atlas width
    #[arg(long, default_value_t = 1024, help_heading = "Atlas")]
    width: u32,
    /// Atlas (layer) height: a number or `unbounded`
    #[arg(long, default_value = "unbounded", help_heading = "Atlas")]
    height: Bound,
    /// Atlas depth (layer count): a number or `unbounded`. Anything but 1 makes an array atlas
    #[arg(long, default_value = "1", help_heading = "Atlas")]
    depth: Bound,
    /// Horizontal padding on each side of an item
    #[arg(long, default_value_t = 0, help_heading = "Atlas")]
    padding_x: u32,
    /// Vertical padding on each side of an item
    #[arg(long, default_value_t = 0, help_heading = "Atlas")]
    padding_y: u32,
    /// Orientation: portrait | landscape | keep
    #[arg(long, default_value = "portrait", help_heading = "Behavior")]
    orientation: Orientation,
    /// Ordering of same-height items: widest | narrowest | original
    #[arg(long, default_value = "widest", help_heading = "Behavior")]
    tie_break: TieBreak,
    /// Reverse the fill direction on every row, not only when a row ended lower
    #[arg(long, default_value_t = false, help_heading = "Behavior")]
    reverse_always: bool,
    /// Add items in batches of this many, one `add()` call each (0 = single batch)
    #[arg(long, default_value_t = 0, help_heading = "Behavior")]
    batch: usize,
}

impl AtlasArgs {
    fn to_config(&self) -> LandfillConfig {
        LandfillConfig::builder()
            .width(self.width)
            .height(self.height.0)
            .depth(self.depth.0)
            .padding(self.padding_x, self.padding_y)
            .orientation(self.orientation)
            .tie_break(self.tie_break)
            .reverse_direction_always(self.reverse_always)
            .build()
    }
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    /// Input: a JSON/YAML list of sizes, an image file or a directory of images
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output JSON layout file
    #[arg(short, long, default_value = "atlas.json", help_heading = "Input/Output")]
    out: PathBuf,
    /// YAML config file path (overrides atlas and behavior options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    #[command(flatten)]
    atlas: AtlasArgs,

    /// Metadata format: json | json-hash
    #[arg(long, default_value = "json", value_parser = ["json", "json-hash"], help_heading = "Export")]
    metadata: String,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Number of random sizes
    #[arg(long, default_value_t = 10_000)]
    count: usize,
    /// Smallest generated side
    #[arg(long, default_value_t = 4)]
    min_size: u32,
    /// Largest generated side
    #[arg(long, default_value_t = 64)]
    max_size: u32,
    /// RNG seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[command(flatten)]
    atlas: AtlasArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);

    match &cli.command {
        Commands::Pack(args) => run_pack(args, cli.progress && !cli.quiet),
        Commands::Bench(b) => run_bench(b),
    }
}

/// Named input item.
struct InputItem {
    key: String,
    size: Size,
}

/// Result of packing all inputs, possibly over several `add()` calls.
struct PackRun {
    batch: PackedBatch,
    elapsed: Duration,
    calls: usize,
}

fn run_pack(cli: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let mut cfg = cli.atlas.to_config();
    // Config file overrides atlas and behavior options en bloc
    if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg = y.into_landfill_config(cfg)?;
    }

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let items = if is_size_list(&cli.input) {
        load_size_list(&cli.input)?
    } else {
        let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
        read_dimensions_with_progress(&paths, show_progress)?
    };
    info!(count = items.len(), "loaded input sizes");

    let mut atlas = AtlasLandfill::from_config(&cfg).context("invalid atlas configuration")?;
    let sizes: Vec<Size> = items.iter().map(|i| i.size).collect();
    let run = pack_in_batches(&mut atlas, &sizes, cli.atlas.batch)?;

    let rotations: Vec<bool> = run.batch.placements.iter().map(|p| p.rotated).collect();
    let stats = atlas.stats(&sizes, &rotations);
    info!(
        calls = run.calls,
        filled = %format!("{}x{}x{}", stats.filled.width, stats.filled.height, stats.filled.depth),
        efficiency = %format!("{:.2}%", stats.efficiency * 100.0),
        time = %fmt_dur(run.elapsed),
        "stats"
    );

    let json_value = match cli.metadata.as_str() {
        "json-hash" => {
            let keys: Vec<&str> = items.iter().map(|i| i.key.as_str()).collect();
            landfill_core::to_json_hash(atlas.size(), &keys, &sizes, &run.batch)
        }
        _ => landfill_core::to_json(atlas.size(), atlas.filled_size(), &sizes, &run.batch),
    };
    if !cli.dry_run {
        let json = serde_json::to_string_pretty(&json_value)?;
        fs::write(&cli.out, json).with_context(|| format!("write {}", cli.out.display()))?;
        info!(out = ?cli.out, items = items.len(), "layout written");
    }

    if let Some(stats_path) = &cli.export_stats {
        if !cli.dry_run {
            fs::write(stats_path, serde_json::to_string_pretty(&stats)?)
                .with_context(|| format!("write {}", stats_path.display()))?;
            info!(?stats_path, "stats exported");
        } else {
            println!("{}", stats.summary());
        }
    }
    Ok(())
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        b.min_size <= b.max_size,
        "min size {} is larger than max size {}",
        b.min_size,
        b.max_size
    );
    let mut rng = rand::rngs::StdRng::seed_from_u64(b.seed);
    let sizes: Vec<Size> = (0..b.count)
        .map(|_| {
            Size::new(
                rng.gen_range(b.min_size..=b.max_size),
                rng.gen_range(b.min_size..=b.max_size),
            )
        })
        .collect();

    let cfg = b.atlas.to_config();
    let mut atlas = AtlasLandfill::from_config(&cfg).context("invalid atlas configuration")?;
    let run = pack_in_batches(&mut atlas, &sizes, b.atlas.batch)?;
    let rotations: Vec<bool> = run.batch.placements.iter().map(|p| p.rotated).collect();
    let stats = atlas.stats(&sizes, &rotations);

    println!(
        "items={} calls={} filled={}x{}x{} efficiency={:.2}% time={}",
        stats.num_items,
        run.calls,
        stats.filled.width,
        stats.filled.height,
        stats.filled.depth,
        stats.efficiency * 100.0,
        fmt_dur(run.elapsed)
    );
    Ok(())
}

/// Adds `sizes` in chunks of `batch` items (all at once for 0), merging the
/// per-call results back into input order.
fn pack_in_batches(
    atlas: &mut AtlasLandfill,
    sizes: &[Size],
    batch: usize,
) -> anyhow::Result<PackRun> {
    let chunk = if batch == 0 { sizes.len().max(1) } else { batch };
    let mut placements = Vec::with_capacity(sizes.len());
    let mut bounds: Option<Range3> = None;
    let mut calls = 0;

    let start = Instant::now();
    for (i, part) in sizes.chunks(chunk).enumerate() {
        calls += 1;
        let Some(packed) = atlas.try_pack(part)? else {
            let first = i * chunk;
            anyhow::bail!(
                "atlas {} is full, items {}..{} don't fit (filled {}x{}x{})",
                atlas.size(),
                first,
                first + part.len(),
                atlas.filled_size().width,
                atlas.filled_size().height,
                atlas.filled_size().depth,
            );
        };
        if !packed.placements.is_empty() {
            bounds = Some(match bounds {
                Some(b) => b.join(&packed.bounds),
                None => packed.bounds,
            });
        }
        placements.extend(packed.placements);
    }
    let elapsed = start.elapsed();

    Ok(PackRun {
        batch: PackedBatch {
            placements,
            bounds: bounds.unwrap_or_default(),
        },
        elapsed,
        calls,
    })
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

/// Atlas height or depth, `None` for unbounded.
#[derive(Debug, Clone, Copy)]
struct Bound(Option<u32>);

impl std::str::FromStr for Bound {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("unbounded") || s.eq_ignore_ascii_case("none") {
            return Ok(Self(None));
        }
        s.parse::<u32>()
            .map(|v| Self(Some(v)))
            .map_err(|e| format!("expected a number or `unbounded`: {e}"))
    }
}

fn is_size_list(p: &Path) -> bool {
    p.is_file()
        && matches!(
            p.extension()
                .and_then(|e| e.to_str())
                .map(|s| s.to_ascii_lowercase()),
            Some(ext) if matches!(ext.as_str(), "json" | "yaml" | "yml")
        )
}

/// One entry of a size list: `[w, h]` or `{ name?, w, h }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SizeEntry {
    Pair(u32, u32),
    Named {
        #[serde(default)]
        name: Option<String>,
        w: u32,
        h: u32,
    },
}

fn load_size_list(path: &Path) -> anyhow::Result<Vec<InputItem>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read size list {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let entries: Vec<SizeEntry> = if is_json {
        serde_json::from_str(&text)?
    } else {
        serde_yaml::from_str(&text)?
    };
    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(i, e)| match e {
            SizeEntry::Pair(w, h) => InputItem {
                key: format!("item_{i}"),
                size: Size::new(w, h),
            },
            SizeEntry::Named { name, w, h } => InputItem {
                key: name.unwrap_or_else(|| format!("item_{i}")),
                size: Size::new(w, h),
            },
        })
        .collect())
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    // Build glob matchers
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }

    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        anyhow::ensure!(path.is_dir(), "input {} does not exist", path.display());
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg")
    )
}

/// Reads image dimensions from file headers without decoding the pixels.
fn read_dimensions_with_progress(
    paths: &[PathBuf],
    progress: bool,
) -> anyhow::Result<Vec<InputItem>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} reading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };

    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match image::image_dimensions(p) {
            Ok((w, h)) => {
                let key = p.to_string_lossy().replace('\\', "/");
                list.push(InputItem {
                    key,
                    size: Size::new(w, h),
                });
            }
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    if list.is_empty() {
        warn!("no input images found");
    }
    Ok(list)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

/// YAML overlay; every field present replaces the CLI value.
#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    width: Option<u32>,
    height: Option<YamlBound>,
    depth: Option<YamlBound>,
    padding: Option<(u32, u32)>,
    orientation: Option<String>,
    tie_break: Option<String>,
    reverse_direction_always: Option<bool>,
}

/// `512` or `unbounded`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum YamlBound {
    Value(u32),
    Named(String),
}

impl YamlBound {
    fn into_bound(self) -> anyhow::Result<Option<u32>> {
        match self {
            Self::Value(v) => Ok(Some(v)),
            Self::Named(s) => Ok(s.parse::<Bound>().map_err(anyhow::Error::msg)?.0),
        }
    }
}

impl YamlConfig {
    fn into_landfill_config(self, mut cfg: LandfillConfig) -> anyhow::Result<LandfillConfig> {
        if let Some(v) = self.width {
            cfg.width = v;
        }
        if let Some(v) = self.height {
            cfg.height = v.into_bound()?;
        }
        if let Some(v) = self.depth {
            cfg.depth = v.into_bound()?;
        }
        if let Some(v) = self.padding {
            cfg.padding = v;
        }
        if let Some(v) = self.orientation {
            cfg.orientation = v.parse()?;
        }
        if let Some(v) = self.tie_break {
            cfg.tie_break = v.parse()?;
        }
        if let Some(v) = self.reverse_direction_always {
            cfg.reverse_direction_always = v;
        }
        Ok(cfg)
    }
}
