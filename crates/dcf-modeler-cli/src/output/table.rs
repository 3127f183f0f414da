use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tabled::{builder::Builder, Table};

use dcf_modeler_core::types::round_currency;

/// Render the computation envelope as tables. The sensitivity grid and the
/// valuation projection get dedicated layouts; anything else falls back to
/// a field/value listing.
pub fn print_table(value: &Value) {
    if let Some(result) = value.get("result") {
        if result.get("cells").is_some() {
            print_grid(result);
        } else if result.get("valuation").is_some() {
            print_valuation(result);
        } else {
            print_fields(result);
        }
        print_envelope_footer(value);
    } else {
        print_fields(value);
    }
}

/// 5x5 matrix with growth rates down the side and WACC across the top.
fn print_grid(result: &Value) {
    let growth_rates = string_list(result.get("growth_rates"));
    let discount_rates = string_list(result.get("discount_rates"));
    let empty = Vec::new();
    let rows = result
        .get("cells")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    let mut builder = Builder::default();
    let mut header = vec!["Growth \\ WACC".to_string()];
    header.extend(discount_rates.iter().map(|w| format!("{w}%")));
    builder.push_record(header);

    for (i, row) in rows.iter().enumerate() {
        let label = growth_rates
            .get(i)
            .map(|g| format!("{g}%"))
            .unwrap_or_default();
        let mut record = vec![label];
        if let Value::Array(cells) = row {
            record.extend(cells.iter().map(format_cell));
        }
        builder.push_record(record);
    }

    println!("{}", Table::from(builder));
    println!("(enterprise value in millions; n/c = non-convergent)");
}

fn format_cell(cell: &Value) -> String {
    match cell.get("status").and_then(Value::as_str) {
        Some("value") => cell
            .get("ev_millions")
            .map(format_money)
            .unwrap_or_default(),
        _ => "n/c".to_string(),
    }
}

/// Summary figures followed by the year-by-year projection.
fn print_valuation(result: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    if let Some(effective) = result.get("effective") {
        builder.push_record([
            "effective_growth",
            &format_raw(effective.get("growth")),
        ]);
        builder.push_record([
            "effective_margin",
            &format_raw(effective.get("margin")),
        ]);
    }
    builder.push_record([
        "discount_rate_used",
        &format_raw(result.get("discount_rate_used")),
    ]);

    if let Some(valuation) = result.get("valuation") {
        for key in ["terminal_value", "pv_of_terminal_value", "enterprise_value"] {
            builder.push_record([key, &valuation.get(key).map(format_money).unwrap_or_default()]);
        }
    }
    println!("{}", Table::from(builder));

    if let Some(Value::Array(periods)) = result.pointer("/valuation/periods") {
        let mut builder = Builder::default();
        builder.push_record(["Year", "Revenue", "EBITDA", "Tax", "FCF", "PV"]);
        for p in periods {
            builder.push_record([
                format_raw(p.get("period")),
                p.get("revenue").map(format_money).unwrap_or_default(),
                p.get("ebitda").map(format_money).unwrap_or_default(),
                p.get("tax").map(format_money).unwrap_or_default(),
                p.get("fcf").map(format_money).unwrap_or_default(),
                p.get("present_value").map(format_money).unwrap_or_default(),
            ]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_fields(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_raw(Some(val))]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{value}");
    }
}

fn print_envelope_footer(envelope: &Value) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {s}");
                }
            }
        }
    }
    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {methodology}");
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|a| a.iter().map(|v| format_raw(Some(v))).collect())
        .unwrap_or_default()
}

/// Monetary values arrive as unrounded decimal strings; round to whole
/// currency units for display only.
fn format_money(value: &Value) -> String {
    if let Some(s) = value.as_str() {
        if let Ok(d) = Decimal::from_str(s) {
            return round_currency(d).to_string();
        }
    }
    format_raw(Some(value))
}

fn format_raw(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => serde_json::to_string(other).unwrap_or_default(),
    }
}
