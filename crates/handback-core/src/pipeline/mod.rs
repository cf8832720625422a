//! Damage verification pipeline.
//!
//! `verify_images` is the pure core: normalized pair in, [`DamageReport`]
//! out, no I/O. `verify_pair` is the outermost boundary used by callers
//! processing many rental records: it decodes, runs the core, writes
//! artifacts, and folds every expected failure into the [`VerifyRecord`]
//! instead of letting it propagate — one bad image pair must not abort a
//! batch. Both are pure functions of their inputs and options, so they are
//! safe to call concurrently without locking.


use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::binarize::binarize_cues;
use crate::cues::extract_cues;
use crate::decoders::{decode_image, decode_mask, DecodedImage};
use crate::exporters;
use crate::field::ScalarField;
use crate::fusion::fuse_cues;
use crate::mask::RegionMask;
use crate::models::{OutputMode, VerifyOptions};
use crate::normalize::normalize_image;
use crate::verbose_println;

/// Terminal output of one verification call.
///
/// Constructed once per call and immutable thereafter; the engine holds no
/// state across calls. `severity` sits on a ~0-100 scale but is not
/// clamped: contrast enhancement can push the mean of a renormalized field
/// past 100 on pathological inputs.
#[derive(Debug, Clone)]
pub struct DamageReport {
    /// Scalar severity: mean of the fused field x 100
    pub severity: f32,

    /// Whether severity exceeded the configured threshold
    pub is_damaged: bool,

    /// Continuous damage-intensity field
    pub fused: ScalarField,

    /// Binary damage mask (discrete mode only)
    pub binary_mask: Option<ScalarField>,
}

/// Structured boundary record handed to the surrounding orchestration.
///
/// Always fully populated: on failure the numeric fields carry safe
/// defaults and `error` explains what went wrong.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyRecord {
    pub is_damaged: bool,
    pub damage_severity: f32,
    pub overlay_path: Option<PathBuf>,
    pub heatmap_path: Option<PathBuf>,
    pub error: Option<String>,
}

impl VerifyRecord {
    /// Record for a verification that failed before producing a verdict
    pub fn failed(error: String) -> Self {
        Self {
            is_damaged: false,
            damage_severity: 0.0,
            overlay_path: None,
            heatmap_path: None,
            error: Some(error),
        }
    }
}

/// Run the verification pipeline on two decoded images.
///
/// Both images resize to the canonical working size, the three cues
/// extract independently, and the fused field reduces to severity and
/// verdict. In discrete mode the binarizer additionally produces the
/// binary mask; severity always derives from the continuous fused field.
pub fn verify_images(
    reference: &DecodedImage,
    test: &DecodedImage,
    mask: Option<&RegionMask>,
    options: &VerifyOptions,
) -> Result<DamageReport, String> {
    let reference = normalize_image(reference, options.target_size, options.denoise);
    let test = normalize_image(test, options.target_size, options.denoise);

    let cues = extract_cues(&reference, &test, mask)?;

    if options.debug {
        for (name, field) in [
            ("structural", &cues.structural),
            ("color", &cues.color),
            ("edge", &cues.edge),
        ] {
            let (min, max) = field.min_max();
            verbose_println!(
                "[handback] cue {}: min={:.4} max={:.4} mean={:.4}",
                name,
                min,
                max,
                field.mean()
            );
        }
    }

    let fused = fuse_cues(
        &cues,
        options.fusion_weights,
        options.contrast_clip_limit,
        mask,
    );

    let binary_mask = match options.output_mode {
        OutputMode::Continuous => None,
        OutputMode::Discrete => Some(binarize_cues(
            &cues,
            options.fusion_weights,
            options.binarize_threshold_fraction,
            mask,
        )),
    };

    let severity = fused.mean() * 100.0;
    let is_damaged = severity > options.severity_threshold;

    if options.debug {
        verbose_println!(
            "[handback] severity={:.3} threshold={:.3} damaged={}",
            severity,
            options.severity_threshold,
            is_damaged
        );
    }

    Ok(DamageReport {
        severity,
        is_damaged,
        fused,
        binary_mask,
    })
}

/// Verify a before/after photo pair from disk, never raising past the
/// boundary.
///
/// Decode failures and any other expected error fold into the record's
/// `error` field with safe defaults. When `artifact_dir` is given, the
/// heatmap and overlay render there; an artifact write failure nulls the
/// affected reference and attaches an advisory message without
/// invalidating the computed verdict.
pub fn verify_pair<P: AsRef<Path>>(
    before_path: P,
    after_path: P,
    mask_path: Option<P>,
    options: &VerifyOptions,
    artifact_dir: Option<&Path>,
) -> VerifyRecord {
    match run_pair(
        before_path.as_ref(),
        after_path.as_ref(),
        mask_path.as_ref().map(|p| p.as_ref()),
        options,
        artifact_dir,
    ) {
        Ok(record) => record,
        Err(error) => VerifyRecord::failed(error),
    }
}

fn run_pair(
    before_path: &Path,
    after_path: &Path,
    mask_path: Option<&Path>,
    options: &VerifyOptions,
    artifact_dir: Option<&Path>,
) -> Result<VerifyRecord, String> {
    let reference = decode_image(before_path)?;
    let test = decode_image(after_path)?;
    let mask = match mask_path {
        Some(path) => Some(decode_mask(path)?),
        None => None,
    };

    let report = verify_images(&reference, &test, mask.as_ref(), options)?;

    let mut heatmap_path = None;
    let mut overlay_path = None;
    let mut advisory = None;

    if let Some(dir) = artifact_dir {
        // artifact failures are advisory: the verdict is already computed
        if let Err(e) = std::fs::create_dir_all(dir) {
            advisory = Some(format!("Artifact directory not created: {}", e));
        } else {
            // overlay renders on the "after" photo at the working resolution
            let overlay_base = normalize_image(&test, options.target_size, false);
            let overlay_field = report.binary_mask.as_ref().unwrap_or(&report.fused);

            match exporters::save_heatmap_png(&report.fused, &dir.join("damage_heatmap.png")) {
                Ok(path) => heatmap_path = Some(path),
                Err(e) => advisory = Some(format!("Heatmap not written: {}", e)),
            }

            match exporters::save_overlay_png(&overlay_base, overlay_field, &dir.join("overlay.png"))
            {
                Ok(path) => overlay_path = Some(path),
                Err(e) => {
                    advisory = Some(match advisory {
                        Some(prior) => format!("{}; overlay not written: {}", prior, e),
                        None => format!("Overlay not written: {}", e),
                    })
                }
            }
        }
    }

    Ok(VerifyRecord {
        is_damaged: report.is_damaged,
        damage_severity: report.severity,
        overlay_path,
        heatmap_path,
        error: advisory,
    })
}
