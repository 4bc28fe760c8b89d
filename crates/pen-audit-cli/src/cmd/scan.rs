use super::Context;
use crate::output::print_json;
use anyhow::Context as _;
use pen_audit_core::{
    detectors::run_all_detectors,
    node::Document,
    state::{Merged, ScanDiff},
    stats::Stats,
};
use std::path::Path;

#[derive(serde::Serialize)]
struct ScanOutput<'a> {
    source: String,
    scan_count: u32,
    diff: ScanDiff,
    stats: &'a Stats,
}

pub fn run(ctx: &Context, design: &Path) -> anyhow::Result<()> {
    let doc = Document::load(design)
        .with_context(|| format!("failed to read design export {}", design.display()))?;
    let detected = run_all_detectors(&doc);

    let previous = ctx.load_state();
    let Merged { mut state, diff } = previous.merge_scan(detected, &doc.source);
    ctx.save_state(&mut state)?;

    if ctx.json {
        return print_json(&ScanOutput {
            source: doc.source.clone(),
            scan_count: state.scan_count,
            diff,
            stats: &state.stats,
        });
    }

    println!("Scanned {} (scan #{})", doc.source, state.scan_count);
    println!(
        "  {} features detected, {} new, {} removed from design",
        diff.total, diff.new, diff.removed
    );
    println!(
        "  {} open, {} implemented ({:.1}%)",
        state.stats.open, state.stats.implemented, state.stats.pct
    );
    Ok(())
}
