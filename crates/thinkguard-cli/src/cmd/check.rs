use crate::cmd::load_enforcer;
use crate::input::read_payload;
use crate::output::{print_json, print_table, truncate};
use anyhow::Context;
use std::path::Path;
use thinkguard_core::Payload;

pub fn run(config: Option<&Path>, file: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let enforcer = load_enforcer(config)?;
    let raw = read_payload(file)?;
    let payload = Payload::parse(&raw).context("failed to parse payload")?;
    let report = enforcer.plan(payload.conversation());

    if json {
        print_json(&report)?;
    } else {
        let model = report.model.as_deref().unwrap_or("(none)");
        if !report.enforcing {
            println!("Model {model} does not require thinking-first turns. Nothing to check.");
        } else if report.is_noop() {
            println!("Model {model}: no violations.");
        } else {
            println!("Model {model}: {} violation(s)", report.repaired());
            let rows = report
                .repairs
                .iter()
                .map(|r| {
                    vec![
                        r.index.to_string(),
                        r.message_id.clone().unwrap_or_else(|| "-".to_string()),
                        if r.reused { "reused" } else { "placeholder" }.to_string(),
                        truncate(&r.content, 48),
                    ]
                })
                .collect();
            print_table(&["TURN", "MESSAGE", "SOURCE", "THINKING"], rows);
        }
        if report.skipped > 0 {
            println!("{} malformed turn(s) skipped", report.skipped);
        }
    }

    if !report.is_noop() {
        anyhow::bail!("{} turn(s) violate the thinking-first rule", report.repaired());
    }
    Ok(())
}
