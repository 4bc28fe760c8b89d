use super::Context;
use crate::output::{print_json, print_table};
use anyhow::Context as _;
use pen_audit_core::{matcher::match_codebase, PenAuditError};
use std::path::Path;

pub fn run(
    ctx: &Context,
    project: Option<&Path>,
    app_subdir: Option<String>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let project = project.unwrap_or(ctx.root.as_path());
    let mut cfg = ctx.config.matcher.clone();
    if let Some(sub) = app_subdir {
        cfg.app_subdir = sub;
    }

    let mut state = ctx.load_state();
    let report = match match_codebase(&mut state, project, &cfg, dry_run) {
        Ok(report) => report,
        Err(e @ PenAuditError::AppDirNotFound(_)) if ctx.json => {
            print_json(&serde_json::json!({ "error": e.to_string() }))?;
            return Err(e.into());
        }
        Err(e) => return Err(e).context("codebase match failed"),
    };

    if !dry_run && report.total_matched > 0 {
        ctx.save_state(&mut state)?;
    }

    if ctx.json {
        return print_json(&report);
    }

    if !report.matched.is_empty() {
        let rows = report
            .matched
            .iter()
            .map(|m| {
                vec![
                    m.screen_name.clone(),
                    m.page_path.clone(),
                    m.matched_via.to_string(),
                ]
            })
            .collect();
        print_table(&["IMPLEMENTED", "PAGE", "VIA"], rows);
        println!();
    }
    for s in &report.stub {
        println!("stub     {}  ({})", s.screen_name, s.page_path);
    }
    for m in &report.missing {
        println!("missing  {}  (expected app/{})", m.screen_name, m.expected_slug);
    }
    println!(
        "{} implemented, {} stub, {} missing{}",
        report.total_matched,
        report.total_stub,
        report.total_missing,
        if dry_run { " (dry run, state unchanged)" } else { "" }
    );
    Ok(())
}
