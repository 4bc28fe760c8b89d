use super::Context;
use crate::output::{print_json, print_table, truncate};
use anyhow::Context as _;
use pen_audit_core::types::FeatureStatus;

pub fn run(ctx: &Context, pattern: Option<&str>, status: Option<&str>) -> anyhow::Result<()> {
    let status: Option<FeatureStatus> = status
        .map(str::parse::<FeatureStatus>)
        .transpose()
        .context("invalid --status")?;
    let state = ctx.load_state();
    let features = state.filter(status, pattern);

    if ctx.json {
        return print_json(&features);
    }

    if features.is_empty() {
        println!("No matching features.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = features
        .iter()
        .map(|f| {
            vec![
                f.tier.to_string(),
                f.status.to_string(),
                f.id.clone(),
                truncate(&f.summary, 60),
            ]
        })
        .collect();
    print_table(&["TIER", "STATUS", "ID", "SUMMARY"], rows);
    Ok(())
}
