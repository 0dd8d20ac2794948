//! `qsched extract` command - Show what the extractor recognizes in a quote

use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{effective_format, load_config, load_rules, read_quote};
use crate::cli::output::{render_rows, serialize};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::engine::QuoteExtractor;

#[derive(clap::Args, Debug)]
pub struct ExtractArgs {
    /// Quote text file (`-` for stdin)
    pub quote: PathBuf,
}

pub fn run(args: ExtractArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let rules = load_rules(&config)?;
    let text = read_quote(&args.quote)?;

    let extractor = QuoteExtractor::new().into_diagnostic()?;
    let doc = extractor.extract(&text, rules.voltages.default_country());

    let format = effective_format(global, &config);
    if matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        print!("{}", serialize(&doc, format)?);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = doc
        .items
        .iter()
        .map(|item| {
            vec![
                item.part_number.clone(),
                item.quantity.to_string(),
                item.description.clone(),
            ]
        })
        .collect();
    let table = render_rows(&["Part Number", "Qty", "Description"], &rows, format)?;

    if matches!(format, OutputFormat::Auto | OutputFormat::Table) {
        println!("Format:          {}", doc.format);
        println!("Acknowledgment:  {}", doc.acknowledgment_label());
        println!("Project:         {}", doc.project_label());
        if let Some(ship_to) = &doc.ship_to {
            println!("Ship to:         {}", ship_to);
        }
        println!("Country:         {}", doc.detected_country);
        println!("Items:           {}", doc.items.len());
        println!();
    }
    print!("{}", table);
    Ok(())
}
