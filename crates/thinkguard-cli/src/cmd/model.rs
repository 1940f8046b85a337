use crate::cmd::load_enforcer;
use crate::output::{print_json, print_table};
use std::path::Path;

// ---------------------------------------------------------------------------
// model <ID>
// ---------------------------------------------------------------------------

pub fn run(config: Option<&Path>, id: &str, json: bool) -> anyhow::Result<()> {
    let enforcer = load_enforcer(config)?;
    let matched = enforcer.registry().matching_pattern(id);

    if json {
        let value = serde_json::json!({
            "model": id,
            "enforcing": matched.is_some(),
            "pattern": matched.map(|p| p.spec()),
            "origin": matched.map(|p| p.origin()),
        });
        print_json(&value)?;
        return Ok(());
    }

    match matched {
        Some(p) => println!("{id}: enforcing ({p}, {})", p.origin().as_str()),
        None => println!("{id}: not enforcing"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// models
// ---------------------------------------------------------------------------

pub fn list(config: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let enforcer = load_enforcer(config)?;
    let patterns = enforcer.registry().patterns();

    if json {
        let value: Vec<serde_json::Value> = patterns
            .iter()
            .map(|p| {
                serde_json::json!({
                    "match": p.spec().kind,
                    "value": p.spec().value,
                    "origin": p.origin(),
                })
            })
            .collect();
        print_json(&value)?;
        return Ok(());
    }

    if patterns.is_empty() {
        println!("No enforcing-model patterns configured.");
        return Ok(());
    }
    let rows = patterns
        .iter()
        .map(|p| {
            vec![
                p.spec().kind.to_string(),
                p.spec().value.clone(),
                p.origin().as_str().to_string(),
            ]
        })
        .collect();
    print_table(&["MATCH", "VALUE", "ORIGIN"], rows);
    Ok(())
}
