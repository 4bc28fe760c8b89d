use super::Context;
use crate::output::{print_json, print_table, truncate};
use anyhow::Context as _;
use pen_audit_core::types::Tier;

pub fn run(ctx: &Context, tier: Option<u8>, count: usize) -> anyhow::Result<()> {
    let tier: Option<Tier> = tier.map(Tier::try_from).transpose().context("invalid --tier")?;
    let state = ctx.load_state();
    let next = state.next_open(tier, count);

    if ctx.json {
        return print_json(&next);
    }

    if next.is_empty() {
        println!("Nothing open. Every detected feature is resolved.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = next
        .iter()
        .map(|f| {
            vec![
                format!("{} {}", f.tier, f.tier.label()),
                f.id.clone(),
                truncate(&f.summary, 60),
            ]
        })
        .collect();
    print_table(&["TIER", "ID", "SUMMARY"], rows);
    println!();
    println!("Resolve with: pen-audit resolve implemented <id>");
    Ok(())
}
