use serde_json::Value;
use std::io;

/// Write the computation result as CSV to stdout. The sensitivity grid
/// becomes a matrix with WACC column headers; a valuation becomes one row
/// per projection year; anything else degrades to field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.get("result").unwrap_or(value);

    if result.get("cells").is_some() {
        write_grid(&mut wtr, result);
    } else if let Some(Value::Array(periods)) = result.pointer("/valuation/periods") {
        write_periods(&mut wtr, periods);
    } else if let Value::Object(map) = result {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &scalar(val)]);
        }
    } else {
        let _ = wtr.write_record([&scalar(result)]);
    }

    let _ = wtr.flush();
}

fn write_grid(wtr: &mut csv::Writer<io::StdoutLock<'_>>, result: &Value) {
    let wacc: Vec<String> = list(result.get("discount_rates"));
    let growth: Vec<String> = list(result.get("growth_rates"));

    let mut header = vec!["growth_pct".to_string()];
    header.extend(wacc);
    let _ = wtr.write_record(&header);

    if let Some(Value::Array(rows)) = result.get("cells") {
        for (i, row) in rows.iter().enumerate() {
            let mut record = vec![growth.get(i).cloned().unwrap_or_default()];
            if let Value::Array(cells) = row {
                for cell in cells {
                    let text = match cell.get("status").and_then(Value::as_str) {
                        Some("value") => scalar(cell.get("ev_millions").unwrap_or(&Value::Null)),
                        _ => "non_convergent".to_string(),
                    };
                    record.push(text);
                }
            }
            let _ = wtr.write_record(&record);
        }
    }
}

fn write_periods(wtr: &mut csv::Writer<io::StdoutLock<'_>>, periods: &[Value]) {
    let columns = ["period", "revenue", "ebitda", "tax", "fcf", "present_value"];
    let _ = wtr.write_record(columns);
    for p in periods {
        let row: Vec<String> = columns
            .iter()
            .map(|c| p.get(*c).map(scalar).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}

fn list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|a| a.iter().map(scalar).collect())
        .unwrap_or_default()
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
