use super::Context;
use crate::output::print_json;
use anyhow::{bail, Context as _};
use pen_audit_core::types::FeatureStatus;

#[derive(serde::Serialize)]
struct ResolveOutput {
    status: FeatureStatus,
    resolved: Vec<String>,
}

pub fn run(ctx: &Context, status: &str, patterns: &[String]) -> anyhow::Result<()> {
    let status: FeatureStatus = status.parse().context("invalid status")?;
    if patterns.iter().any(|p| p.trim().is_empty()) {
        bail!("empty pattern would match every open feature");
    }

    let mut state = ctx.load_state();
    let mut resolved = Vec::new();
    for pattern in patterns {
        let ids = state
            .resolve(pattern, status)
            .with_context(|| format!("failed to resolve '{pattern}'"))?;
        if ids.is_empty() {
            tracing::warn!("no open feature matches '{pattern}'");
        }
        resolved.extend(ids);
    }

    if !resolved.is_empty() {
        ctx.save_state(&mut state)?;
    }

    if ctx.json {
        return print_json(&ResolveOutput { status, resolved });
    }

    if resolved.is_empty() {
        println!("No open features matched.");
    } else {
        for id in &resolved {
            println!("{:<14} {id}", status.as_str());
        }
        println!("{} feature(s) marked {status}", resolved.len());
    }
    Ok(())
}
