use crate::cmd::load_enforcer;
use crate::input::read_payload;
use crate::output::{print_json, write_raw};
use anyhow::Context;
use std::path::Path;
use thinkguard_core::io::atomic_write;
use thinkguard_core::{EnforceReport, Payload};

pub fn run(
    config: Option<&Path>,
    file: Option<&Path>,
    in_place: bool,
    strict: bool,
    json: bool,
) -> anyhow::Result<()> {
    let enforcer = load_enforcer(config)?;
    let raw = read_payload(file)?;

    let (report, repaired) = match Payload::parse(&raw) {
        Ok(mut payload) => {
            let report = enforcer.enforce(payload.conversation_mut());
            let repaired = if report.is_noop() {
                None
            } else {
                render(&payload, &raw)
            };
            (report, repaired)
        }
        Err(e) if !strict => {
            tracing::warn!(error = %e, "payload is not a conversation; passing it through unchanged");
            (EnforceReport::default(), None)
        }
        Err(e) => return Err(e).context("failed to parse payload"),
    };

    tracing::info!(
        model = report.model.as_deref().unwrap_or("-"),
        enforcing = report.enforcing,
        repaired = report.repaired(),
        skipped = report.skipped,
        "enforce complete"
    );

    if in_place {
        // `requires = "file"` on the flag guarantees a path here.
        let path = file.context("--in-place needs a FILE")?;
        if let Some(out) = &repaired {
            atomic_write(path, out.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        if json {
            print_json(&report)?;
        } else {
            println!(
                "{}: {} turn(s) repaired",
                path.display(),
                report.repaired()
            );
        }
        return Ok(());
    }

    write_raw(repaired.as_deref().unwrap_or(&raw))
}

/// Serialize the repaired payload in the same layout as the input. Returns
/// `None` when serialization fails so the caller falls back to the original.
fn render(payload: &Payload, raw: &str) -> Option<String> {
    let pretty = raw.trim().contains('\n');
    match payload.to_json(pretty) {
        Ok(mut out) => {
            if raw.ends_with('\n') {
                out.push('\n');
            }
            Some(out)
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize repaired payload; sending original");
            None
        }
    }
}
