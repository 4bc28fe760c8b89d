use super::Context;
use crate::output::{print_json, print_table};
use pen_audit_core::{
    stats::Stats,
    types::{FeatureStatus, Tier},
};

#[derive(serde::Serialize)]
struct StatusOutput<'a> {
    source_file: Option<&'a str>,
    scan_count: u32,
    last_scan: Option<String>,
    stats: &'a Stats,
}

pub fn run(ctx: &Context) -> anyhow::Result<()> {
    let state = ctx.load_state();

    if ctx.json {
        return print_json(&StatusOutput {
            source_file: state.source_file.as_deref(),
            scan_count: state.scan_count,
            last_scan: state.last_scan.map(|t| t.to_rfc3339()),
            stats: &state.stats,
        });
    }

    if state.scan_count == 0 {
        println!("No scans yet. Run: pen-audit scan <design.json>");
        return Ok(());
    }

    let stats = &state.stats;
    println!(
        "Source:    {}",
        state.source_file.as_deref().unwrap_or("(unknown)")
    );
    if let Some(t) = state.last_scan {
        println!(
            "Last scan: {} (#{})",
            t.format("%Y-%m-%d %H:%M UTC"),
            state.scan_count
        );
    }
    println!(
        "Progress:  {}/{} implemented ({:.1}%), effort-weighted {:.1}%",
        stats.implemented, stats.total, stats.pct, stats.effort_score
    );
    println!();

    let by_status: Vec<Vec<String>> = FeatureStatus::all()
        .iter()
        .map(|s| vec![s.to_string(), stats.count(*s).to_string()])
        .collect();
    print_table(&["STATUS", "COUNT"], by_status);
    println!();

    let by_tier: Vec<Vec<String>> = Tier::all()
        .iter()
        .map(|t| {
            let ts = stats.tier(*t);
            vec![
                format!("{t} {}", t.label()),
                format!("{}/{}", ts.done, ts.total),
                t.description().to_string(),
            ]
        })
        .collect();
    print_table(&["TIER", "DONE", "DESCRIPTION"], by_tier);
    Ok(())
}
