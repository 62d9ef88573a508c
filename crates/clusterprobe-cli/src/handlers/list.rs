//! List command handler

use crate::commands::ListArgs;
use crate::error::CliResult;
use crate::manifest::Manifest;
use clusterprobe::{CategoryFilter, ProbeInfo};

/// Render probes as an aligned table
#[must_use]
pub fn render_probe_table(probes: &[ProbeInfo]) -> String {
    if probes.is_empty() {
        return "No probes selected.\n".to_string();
    }

    let id_width = probes.iter().map(|p| p.id.len()).max().unwrap_or(0).max(2);
    let category_width = probes
        .iter()
        .map(|p| p.category.key().len())
        .max()
        .unwrap_or(0)
        .max(8);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<id_width$}  {:<category_width$}  NAME\n",
        "ID", "CATEGORY"
    ));
    for probe in probes {
        out.push_str(&format!(
            "{:<id_width$}  {:<category_width$}  {}\n",
            probe.id,
            probe.category.key(),
            probe.name
        ));
    }
    out.push_str(&format!("\n{} probe(s)\n", probes.len()));
    out
}

/// Probes of the manifest that pass the category filter
pub fn selected_probes(args: &ListArgs) -> CliResult<Vec<ProbeInfo>> {
    let registry = Manifest::load(&args.manifest)?.to_registry()?;
    let filter = CategoryFilter::from_names(&args.categories)?;
    Ok(registry
        .select(&filter)
        .into_iter()
        .map(|p| p.info)
        .collect())
}

/// Execute the list command
pub fn execute_list(args: &ListArgs) -> CliResult<()> {
    let probes = selected_probes(args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&probes)?);
    } else {
        print!("{}", render_probe_table(&probes));
    }
    Ok(())
}
