//! `qsched countries` command - List the effective voltage tables

use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{effective_format, load_config, load_rules};
use crate::cli::output::{render_rows, serialize};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(Debug, Serialize)]
struct CountryRow<'a> {
    country: &'a str,
    three_phase: u32,
    one_phase: u32,
    default: bool,
}

pub fn run(global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let rules = load_rules(&config)?;
    let default = rules.voltages.default_country();

    let countries: Vec<CountryRow> = rules
        .voltages
        .iter()
        .map(|(country, table)| CountryRow {
            country,
            three_phase: table.three_phase,
            one_phase: table.one_phase,
            default: country == default,
        })
        .collect();

    let format = effective_format(global, &config);
    if matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        print!("{}", serialize(&countries, format)?);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = countries
        .iter()
        .map(|c| {
            vec![
                c.country.to_string(),
                format!("{}V", c.three_phase),
                format!("{}V", c.one_phase),
                if c.default { "*".to_string() } else { String::new() },
            ]
        })
        .collect();
    print!(
        "{}",
        render_rows(&["Country", "3-Phase", "1-Phase", "Default"], &rows, format)?
    );
    Ok(())
}
