//! `qsched resolve` command - Look up part numbers in the catalog

use miette::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::helpers::{effective_format, load_catalog, load_config};
use crate::cli::output::{render_rows, serialize};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::engine::resolve;

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Part numbers as printed on a quote
    #[arg(required = true)]
    pub parts: Vec<String>,

    /// Equipment catalog (JSON or YAML)
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ResolveRow {
    part: String,
    key: Option<String>,
    tier: Option<String>,
    description: Option<String>,
    sub_components: usize,
}

pub fn run(args: ResolveArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let catalog = load_catalog(args.catalog.as_deref(), &config)?;

    let results: Vec<ResolveRow> = args
        .parts
        .iter()
        .map(|part| match resolve(&catalog, part) {
            Some(res) => ResolveRow {
                part: part.clone(),
                key: Some(res.key.to_string()),
                tier: Some(res.tier.to_string()),
                description: Some(res.entry.main.description.clone()),
                sub_components: res.entry.sub_components.len(),
            },
            None => ResolveRow {
                part: part.clone(),
                key: None,
                tier: None,
                description: None,
                sub_components: 0,
            },
        })
        .collect();

    let format = effective_format(global, &config);
    if matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        print!("{}", serialize(&results, format)?);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|r| {
            vec![
                r.part.clone(),
                r.key.clone().unwrap_or_else(|| "not found".to_string()),
                r.tier.clone().unwrap_or_default(),
                r.description.clone().unwrap_or_default(),
                r.sub_components.to_string(),
            ]
        })
        .collect();
    print!(
        "{}",
        render_rows(
            &["Part", "Catalog Key", "Match", "Description", "Sub-components"],
            &rows,
            format
        )?
    );
    Ok(())
}
