use serde_json::Value;

/// Print just the headline number from the output: enterprise value for a
/// valuation, WACC for a cost-of-capital run, the center cell for a grid.
pub fn print_minimal(value: &Value) {
    let result = value.get("result").unwrap_or(value);

    if let Some(ev) = result.pointer("/valuation/enterprise_value") {
        println!("{}", scalar(ev));
        return;
    }
    if let Some(wacc) = result.get("wacc") {
        println!("{}", scalar(wacc));
        return;
    }
    if result.get("cells").is_some() {
        print_center_cell(result);
        return;
    }

    // Fall back to the first field of the result object
    if let Value::Object(map) = result {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar(val));
            return;
        }
    }
    println!("{}", scalar(result));
}

fn print_center_cell(result: &Value) {
    let center = result
        .pointer("/cells/2/2")
        .and_then(|cell| match cell.get("status").and_then(Value::as_str) {
            Some("value") => cell.get("ev_millions"),
            _ => None,
        });
    match center {
        Some(v) => println!("{}", scalar(v)),
        None => println!("non_convergent"),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
