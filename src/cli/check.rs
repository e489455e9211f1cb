use std::{error::Error, path::PathBuf};

use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

use crate::{
    config::{path::find_bindings_file, Bindings},
    input::binding::resolve,
};

#[derive(Tabled)]
struct BindingRow {
    slot: String,
    action: String,
    repeat: String,
    status: String,
}

/// Load and validate a bindings file, then print how each slot resolves
pub fn handle_check(path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let Some(path) = path.or_else(find_bindings_file) else {
        return Err("No bindings file given and none found in the config paths".into());
    };
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let bindings = if is_json {
        Bindings::from_json(&std::fs::read_to_string(&path)?)?
    } else {
        Bindings::from_yaml_path(&path)?
    };

    let rows: Vec<BindingRow> = bindings
        .iter()
        .map(|(slot, record)| {
            let resolved = resolve(&slot, &bindings);
            let repeat = match resolved.as_ref() {
                Some(binding) if binding.params.repeat_rate > 0.0 => {
                    format!("{}s", binding.params.repeat_rate)
                }
                _ => "-".to_string(),
            };
            let status = match resolved {
                Some(_) => "ok".to_string(),
                None => "unknown action".to_string(),
            };
            BindingRow {
                slot: slot.to_string(),
                action: record.action.clone(),
                repeat,
                status,
            }
        })
        .collect();
    let count = rows.len();

    let mut table = Table::new(rows);
    table
        .with(Style::modern_rounded())
        .with(Panel::header(format!("Bindings: {}", path.display())));
    println!("{table}");

    let unknown = bindings.unknown_actions().len();
    if unknown > 0 {
        println!("Found {count} binding(s), {unknown} bound to unknown actions and ignored");
    } else {
        println!("Found {count} binding(s)");
    }

    Ok(())
}
