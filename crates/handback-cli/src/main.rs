use clap::{Parser, Subcommand};
use handback_cli::{build_verify_options, parse_mode, OptionOverrides};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use handback_core::pipeline::VerifyRecord;

#[derive(Parser)]
#[command(name = "handback")]
#[command(version, about = "Damage verification for rental handback photos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify one before/after photo pair
    Verify {
        /// "Before" (reference) image
        #[arg(value_name = "BEFORE")]
        before: PathBuf,

        /// "After" (test) image
        #[arg(value_name = "AFTER")]
        after: PathBuf,

        /// Region-of-interest mask image
        #[arg(short, long, value_name = "FILE")]
        mask: Option<PathBuf>,

        /// Directory for rendered artifacts (heatmap, overlay)
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Options preset: "continuous", "discrete", or a saved preset name
        #[arg(short, long, value_name = "NAME")]
        preset: Option<String>,

        /// Output mode: "continuous" (heatmap) or "discrete" (binary mask)
        #[arg(long, value_name = "MODE")]
        mode: Option<String>,

        /// Canonical working size (WxH)
        #[arg(long, value_name = "WxH")]
        size: Option<String>,

        /// Fusion weights: structural,color,edge
        #[arg(long, value_name = "W1,W2,W3")]
        weights: Option<String>,

        /// CLAHE clip limit for contrast enhancement
        #[arg(long, value_name = "FLOAT")]
        clip_limit: Option<f32>,

        /// Adaptive binarization threshold as a fraction of the field maximum
        #[arg(long, value_name = "FLOAT")]
        threshold_fraction: Option<f32>,

        /// Severity above which the pair is flagged as damaged (~0-100)
        #[arg(long, value_name = "FLOAT")]
        severity_threshold: Option<f32>,

        /// Skip the denoise pass during normalization
        #[arg(long)]
        no_denoise: bool,

        /// Write the result record as JSON to this file ("-" for stdout)
        #[arg(long, value_name = "FILE")]
        json: Option<String>,

        /// Enable debug output showing intermediate statistics
        #[arg(long)]
        debug: bool,
    },

    /// Verify many pairs listed in a manifest file
    Batch {
        /// Manifest file: one "before,after[,mask]" line per pair
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        /// Output directory for artifacts and the records file
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Options preset shared by every pair
        #[arg(short, long, value_name = "NAME")]
        preset: Option<String>,

        /// Output mode: "continuous" or "discrete"
        #[arg(long, value_name = "MODE")]
        mode: Option<String>,

        /// Number of parallel threads
        #[arg(short = 'j', long, value_name = "N")]
        threads: Option<usize>,

        /// Skip artifact rendering, emit records only
        #[arg(long)]
        no_artifacts: bool,
    },

    /// Manage option presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
}

#[derive(Subcommand)]
enum PresetAction {
    /// List available presets
    List {
        /// Directory to list presets from
        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Show details of a preset
    Show {
        /// Preset name or file path
        preset: String,
    },

    /// Create a new preset file from a built-in baseline
    Create {
        /// Output file path
        output: PathBuf,

        /// Baseline: "continuous" or "discrete"
        #[arg(short, long, default_value = "continuous")]
        mode: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Verify {
            before,
            after,
            mask,
            out,
            preset,
            mode,
            size,
            weights,
            clip_limit,
            threshold_fraction,
            severity_threshold,
            no_denoise,
            json,
            debug,
        } => cmd_verify(
            before,
            after,
            mask,
            out,
            preset,
            mode,
            size,
            weights,
            clip_limit,
            threshold_fraction,
            severity_threshold,
            no_denoise,
            json,
            debug,
        ),

        Commands::Batch {
            manifest,
            out,
            preset,
            mode,
            threads,
            no_artifacts,
        } => cmd_batch(manifest, out, preset, mode, threads, no_artifacts),

        Commands::Preset { action } => match action {
            PresetAction::List { dir } => cmd_preset_list(dir),
            PresetAction::Show { preset } => cmd_preset_show(preset),
            PresetAction::Create { output, mode } => cmd_preset_create(output, mode),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_verify(
    before: PathBuf,
    after: PathBuf,
    mask: Option<PathBuf>,
    out: Option<PathBuf>,
    preset: Option<String>,
    mode: Option<String>,
    size: Option<String>,
    weights: Option<String>,
    clip_limit: Option<f32>,
    threshold_fraction: Option<f32>,
    severity_threshold: Option<f32>,
    no_denoise: bool,
    json: Option<String>,
    debug: bool,
) -> Result<(), String> {
    handback_core::config::set_verbose(debug);
    handback_core::config::log_config_usage();

    let overrides = OptionOverrides {
        mode: mode.as_deref().map(parse_mode).transpose()?,
        size,
        weights,
        contrast_clip_limit: clip_limit,
        binarize_threshold_fraction: threshold_fraction,
        severity_threshold,
        no_denoise,
        debug,
    };
    let options = build_verify_options(preset.as_deref(), &overrides)?;

    println!("Verifying {} -> {}", before.display(), after.display());
    if let Some(mask_path) = &mask {
        println!("  Region mask: {}", mask_path.display());
    }
    println!(
        "  Mode: {:?}, size: {}x{}, weights: [{:.2}, {:.2}, {:.2}]",
        options.output_mode,
        options.target_size.0,
        options.target_size.1,
        options.fusion_weights[0],
        options.fusion_weights[1],
        options.fusion_weights[2]
    );

    let record = handback_core::verify_pair(
        before.as_path(),
        after.as_path(),
        mask.as_deref(),
        &options,
        out.as_deref(),
    );

    print_record(&record);
    write_json(&record, json.as_deref())?;

    Ok(())
}

fn cmd_batch(
    manifest: PathBuf,
    out: Option<PathBuf>,
    preset: Option<String>,
    mode: Option<String>,
    threads: Option<usize>,
    no_artifacts: bool,
) -> Result<(), String> {
    handback_core::config::log_config_usage();

    // Configure thread pool if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        println!("Using {} threads for parallel processing", num_threads);
    }

    let overrides = OptionOverrides {
        mode: mode.as_deref().map(parse_mode).transpose()?,
        ..Default::default()
    };
    let options = build_verify_options(preset.as_deref(), &overrides)?;

    let pairs = read_manifest(&manifest)?;
    if pairs.is_empty() {
        return Err("Manifest lists no photo pairs".to_string());
    }

    let output_dir = out.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir)
        .map_err(|e| format!("Failed to create output directory: {}", e))?;

    println!("\nVerifying {} pairs in parallel...\n", pairs.len());

    let processed_count = AtomicUsize::new(0);
    let total_pairs = pairs.len();

    // Each pair runs the full pure pipeline independently; a bad pair
    // yields an error record instead of aborting the batch.
    let records: Vec<VerifyRecord> = pairs
        .par_iter()
        .enumerate()
        .map(|(index, pair)| {
            let artifact_dir = if no_artifacts {
                None
            } else {
                Some(output_dir.join(format!("pair_{:04}", index)))
            };

            let record = handback_core::verify_pair(
                pair.before.as_path(),
                pair.after.as_path(),
                pair.mask.as_deref(),
                &options,
                artifact_dir.as_deref(),
            );

            let count = processed_count.fetch_add(1, Ordering::SeqCst) + 1;
            println!(
                "[{}/{}] {} -> damaged={} severity={:.2}{}",
                count,
                total_pairs,
                pair.before.display(),
                record.is_damaged,
                record.damage_severity,
                record
                    .error
                    .as_deref()
                    .map(|e| format!(" ({})", e))
                    .unwrap_or_default()
            );

            record
        })
        .collect();

    let records_path = output_dir.join("records.json");
    let json = serde_json::to_string_pretty(&records)
        .map_err(|e| format!("Failed to serialize records: {}", e))?;
    std::fs::write(&records_path, json)
        .map_err(|e| format!("Failed to write records file: {}", e))?;

    let damaged = records.iter().filter(|r| r.is_damaged).count();
    let failed = records.iter().filter(|r| r.error.is_some()).count();

    println!("\n========================================");
    println!("BATCH VERIFICATION COMPLETE");
    println!("========================================");
    println!("  Pairs:    {}", total_pairs);
    println!("  Damaged:  {}", damaged);
    println!("  Errors:   {}", failed);
    println!("  Records:  {}", records_path.display());

    Ok(())
}

fn cmd_preset_list(dir: Option<PathBuf>) -> Result<(), String> {
    let dir = match dir {
        Some(dir) => dir,
        None => handback_core::presets::get_presets_dir()?,
    };

    println!("Built-in presets:");
    println!("  continuous");
    println!("  discrete");

    println!("\nPresets in {}:", dir.display());
    match handback_core::presets::list_presets(&dir) {
        Ok(presets) => {
            if presets.is_empty() {
                println!("  (none)");
            } else {
                for preset in presets {
                    println!("  {}", preset);
                }
            }
            Ok(())
        }
        Err(e) => {
            println!("  (unavailable: {})", e);
            Ok(())
        }
    }
}

fn cmd_preset_show(preset: String) -> Result<(), String> {
    // Try built-ins and the presets directory first, then a literal path
    let options = handback_core::presets::resolve_preset(&preset)
        .or_else(|_| handback_core::presets::load_preset(PathBuf::from(&preset)))?;

    println!("Preset: {}", preset);
    println!("  Output mode:        {:?}", options.output_mode);
    println!(
        "  Target size:        {}x{}",
        options.target_size.0, options.target_size.1
    );
    println!(
        "  Fusion weights:     [{:.3}, {:.3}, {:.3}]",
        options.fusion_weights[0], options.fusion_weights[1], options.fusion_weights[2]
    );
    println!("  Clip limit:         {:.3}", options.contrast_clip_limit);
    println!(
        "  Threshold fraction: {:.3}",
        options.binarize_threshold_fraction
    );
    println!("  Severity threshold: {:.3}", options.severity_threshold);
    println!("  Denoise:            {}", options.denoise);

    Ok(())
}

fn cmd_preset_create(output: PathBuf, mode: String) -> Result<(), String> {
    let options = handback_core::VerifyOptions::builtin(&mode)
        .ok_or_else(|| format!("Unknown baseline '{}' (expected continuous or discrete)", mode))?;

    handback_core::presets::save_preset(&options, &output)?;

    println!("Preset created: {}", output.display());
    println!("You can now edit this file to customize the parameters.");

    Ok(())
}

/// One manifest entry: a before/after pair with an optional mask
struct ManifestPair {
    before: PathBuf,
    after: PathBuf,
    mask: Option<PathBuf>,
}

/// Read a batch manifest: one "before,after[,mask]" line per pair,
/// blank lines and '#' comments ignored
fn read_manifest(path: &Path) -> Result<Vec<ManifestPair>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read manifest {}: {}", path.display(), e))?;

    let mut pairs = Vec::new();
    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 2 || fields.len() > 3 {
            return Err(format!(
                "Manifest line {}: expected 'before,after[,mask]', got '{}'",
                line_no + 1,
                line
            ));
        }

        pairs.push(ManifestPair {
            before: PathBuf::from(fields[0]),
            after: PathBuf::from(fields[1]),
            mask: fields.get(2).map(PathBuf::from),
        });
    }

    Ok(pairs)
}

fn print_record(record: &VerifyRecord) {
    println!("\nResult:");
    println!("  Damaged:  {}", record.is_damaged);
    println!("  Severity: {:.2}", record.damage_severity);
    if let Some(path) = &record.heatmap_path {
        println!("  Heatmap:  {}", path.display());
    }
    if let Some(path) = &record.overlay_path {
        println!("  Overlay:  {}", path.display());
    }
    if let Some(error) = &record.error {
        println!("  Error:    {}", error);
    }
}

fn write_json(record: &VerifyRecord, target: Option<&str>) -> Result<(), String> {
    let Some(target) = target else {
        return Ok(());
    };

    let json = serde_json::to_string_pretty(record)
        .map_err(|e| format!("Failed to serialize record: {}", e))?;

    if target == "-" {
        println!("{}", json);
    } else {
        std::fs::write(target, json).map_err(|e| format!("Failed to write JSON file: {}", e))?;
        println!("Record saved to: {}", target);
    }

    Ok(())
}
