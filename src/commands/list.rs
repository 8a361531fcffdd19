//! `apiary list` — enumerate provisioned instances.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::app::AppContext;
use crate::domain::instance::{CONFIG_FILE, InstanceConfig};
use crate::infra::paths;

struct InstanceRow {
    name: String,
    tenant: Option<String>,
    created: Option<DateTime<Utc>>,
}

/// Run `apiary list`.
///
/// # Errors
///
/// Returns an error if the instances directory cannot be read.
pub async fn run(app: &AppContext) -> Result<()> {
    let root = paths::instances_dir()?;
    let rows = collect_rows(&root)?;

    if app.is_json() {
        let entries: Vec<_> = rows
            .iter()
            .map(|r| {
                serde_json::json!({
                    "name": r.name,
                    "tenant": r.tenant,
                    "created": r.created.map(|t| t.to_rfc3339()),
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(entries));
        return Ok(());
    }

    if rows.is_empty() {
        app.output.info("No instances provisioned.");
        return Ok(());
    }

    for row in rows {
        let tenant = row.tenant.unwrap_or_else(|| "-".to_string());
        let created = row
            .created
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
        app.output
            .kv(&row.name, &format!("tenant {tenant}  created {created}"));
    }
    Ok(())
}

fn collect_rows(root: &Path) -> Result<Vec<InstanceRow>> {
    let mut rows = Vec::new();
    if !root.is_dir() {
        return Ok(rows);
    }
    let entries = std::fs::read_dir(root)
        .with_context(|| format!("reading instances directory {}", root.display()))?;
    for entry in entries {
        let entry = entry.context("reading instances directory entry")?;
        if !entry.file_type().context("inspecting entry")?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let tenant = std::fs::read_to_string(entry.path().join(CONFIG_FILE))
            .ok()
            .and_then(|raw| serde_json::from_str::<InstanceConfig>(&raw).ok())
            .map(|cfg| cfg.owner_id);
        let created = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);
        rows.push(InstanceRow {
            name,
            tenant,
            created,
        });
    }
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(rows)
}
