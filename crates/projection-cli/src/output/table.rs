use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::notation::render;

/// Format output as tables using the tabled crate.
///
/// Scalar result fields go into a Field/Value table; every array of objects
/// (the yearly schedules) is printed as its own table underneath.
pub fn print_table(value: &Value, compact: bool) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                print_result_table(result, map, compact);
            } else {
                print_fields(map, compact);
            }
        }
        Value::Array(arr) => print_rows("", arr, compact),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Map<String, Value>, envelope: &Map<String, Value>, compact: bool) {
    print_fields(result, compact);

    for (key, val) in result {
        if let Value::Array(rows) = val {
            if rows.first().map_or(false, Value::is_object) {
                println!("\n{}:", key);
                print_rows(key, rows, compact);
            }
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(map: &Map<String, Value>, compact: bool) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if matches!(val, Value::Array(rows) if rows.first().map_or(false, Value::is_object)) {
            continue;
        }
        builder.push_record([key.as_str(), &render(key, val, compact)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(name: &str, rows: &[Value], compact: bool) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            println!("{}", render(name, item, compact));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);

    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| {
                    map.get(h.as_str())
                        .map(|v| render(h, v, compact))
                        .unwrap_or_default()
                })
                .collect();
            builder.push_record(row);
        }
    }

    println!("{}", Table::from(builder));
}
