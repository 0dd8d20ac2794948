//! Output rendering for command results
//!
//! Every command builds a header row plus string rows and hands them to
//! [`render_rows`], which produces the table, CSV, TSV or markdown form.
//! JSON and YAML go through serde instead.

use chrono::Local;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{escape_md, truncate_str};
use crate::cli::OutputFormat;
use crate::entities::{CellValue, Schedule, ScheduleLineItem};

/// Widest description shown in the terminal table
const TABLE_DESCRIPTION_WIDTH: usize = 48;

pub const SCHEDULE_HEADERS: [&str; 16] = [
    "Item",
    "Part Number",
    "Qty",
    "Description",
    "HP",
    "Phase",
    "Volts",
    "Amps",
    "CB",
    "Port",
    "Cold",
    "Hot",
    "Reclaim",
    "GPM",
    "BTUH",
    "Motor",
];

/// Serialize a value as pretty JSON or YAML
pub fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yml::to_string(value).into_diagnostic(),
        _ => {
            let mut json = serde_json::to_string_pretty(value).into_diagnostic()?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Render rows in one of the tabular formats
pub fn render_rows(headers: &[&str], rows: &[Vec<String>], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Csv => delimited(headers, rows, b','),
        OutputFormat::Tsv => delimited(headers, rows, b'\t'),
        OutputFormat::Md => Ok(markdown(headers, rows)),
        _ => Ok(table(headers, rows)),
    }
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().copied());
    for row in rows {
        builder.push_record(row.iter().map(String::as_str));
    }
    let mut out = builder.build().with(Style::sharp()).to_string();
    out.push('\n');
    out
}

fn markdown(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().copied());
    for row in rows {
        builder.push_record(row.iter().map(|c| escape_md(c)));
    }
    let mut out = builder.build().with(Style::markdown()).to_string();
    out.push('\n');
    out
}

fn delimited(headers: &[&str], rows: &[Vec<String>], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    writer.write_record(headers).into_diagnostic()?;
    for row in rows {
        writer.write_record(row).into_diagnostic()?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| miette::miette!("Failed to flush output: {}", e))?;
    String::from_utf8(bytes).into_diagnostic()
}

fn cell(value: &Option<CellValue>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Cells of one schedule row, in [`SCHEDULE_HEADERS`] order
pub fn schedule_cells(item: &ScheduleLineItem, terminal: bool) -> Vec<String> {
    let description = if terminal {
        let indent = if item.is_sub_component { "  " } else { "" };
        format!("{}{}", indent, truncate_str(&item.description, TABLE_DESCRIPTION_WIDTH))
    } else {
        item.description.clone()
    };

    vec![
        item.item_number.clone(),
        item.part_number.clone(),
        item.quantity.to_string(),
        description,
        cell(&item.electrical.hp),
        item.electrical
            .phase
            .map(|p| p.to_string())
            .unwrap_or_default(),
        cell(&item.electrical.volts),
        cell(&item.electrical.amps),
        cell(&item.electrical.breaker_rating),
        cell(&item.port),
        cell(&item.cold_water_flag),
        cell(&item.hot_water_flag),
        cell(&item.reclaim_flag),
        cell(&item.flow_rate_gpm),
        cell(&item.heat_output_btuh),
        item.motor_label.clone().unwrap_or_default(),
    ]
}

/// Render a schedule in the requested format
pub fn render_schedule(schedule: &Schedule, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json | OutputFormat::Yaml => serialize(schedule, format),
        OutputFormat::Csv | OutputFormat::Tsv => {
            let rows: Vec<_> = schedule.items.iter().map(|i| schedule_cells(i, false)).collect();
            render_rows(&SCHEDULE_HEADERS, &rows, format)
        }
        OutputFormat::Md => {
            let rows: Vec<_> = schedule.items.iter().map(|i| schedule_cells(i, false)).collect();
            let mut out = format!(
                "# {} - Electrical Schedule\n\nAcknowledgment: {}\n\n",
                schedule.project_name, schedule.acknowledgment_number
            );
            out.push_str(&render_rows(&SCHEDULE_HEADERS, &rows, format)?);
            out.push_str("\n## Summary\n\n");
            for line in summary_lines(schedule) {
                out.push_str(&format!("- {}\n", line));
            }
            Ok(out)
        }
        OutputFormat::Auto | OutputFormat::Table => {
            let rows: Vec<_> = schedule.items.iter().map(|i| schedule_cells(i, true)).collect();
            let mut out = format!(
                "{} - Electrical Schedule (Acknowledgment {})\n",
                schedule.project_name, schedule.acknowledgment_number
            );
            out.push_str(&render_rows(&SCHEDULE_HEADERS, &rows, format)?);
            out.push('\n');
            for line in summary_lines(schedule) {
                out.push_str(&line);
                out.push('\n');
            }
            Ok(out)
        }
    }
}

/// Footer lines: totals, voltage configuration, diagnostics and a timestamp
fn summary_lines(schedule: &Schedule) -> Vec<String> {
    let mut lines = vec![
        format!("Total Motors: {}", schedule.total_motors),
        format!("Total Amps: {:.2}", schedule.total_amps),
        format!("Voltage ({}): {}", schedule.country, schedule.voltage_table),
    ];

    let lists = [
        ("Not found in catalog", &schedule.not_found_items),
        ("Excluded", &schedule.excluded_items),
        ("Repeated", &schedule.repeated_items),
    ];
    for (title, items) in lists {
        if !items.is_empty() {
            lines.push(format!("{} ({}): {}", title, items.len(), items.join("; ")));
        }
    }

    lines.push(format!("Generated: {}", Local::now().format("%Y-%m-%d %H:%M")));
    lines
}
