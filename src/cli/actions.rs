use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

use crate::action::{ActionName, DispatchKind, Gate};

#[derive(Tabled)]
struct ActionRow {
    name: String,
    kind: String,
    parameters: String,
    description: String,
}

pub fn handle_actions() {
    let rows: Vec<ActionRow> = ActionName::ALL
        .iter()
        .map(|action| {
            let definition = action.definition();
            let mut kind = match definition.kind {
                DispatchKind::Discrete => "discrete".to_string(),
                DispatchKind::Continuous => "continuous".to_string(),
            };
            if definition.gate == Gate::AnyPress {
                kind.push_str(", digital");
            }
            let mut parameters = definition.params.names().join(", ");
            if definition.default_repeat_rate > 0.0 {
                parameters.push_str(&format!(" (default {}s)", definition.default_repeat_rate));
            }
            ActionRow {
                name: action.to_string(),
                kind,
                parameters,
                description: definition.description.to_string(),
            }
        })
        .collect();
    let count = rows.len();

    let mut table = Table::new(rows);
    table
        .with(Style::modern_rounded())
        .with(Panel::header("Navigation Actions"));
    println!("{table}");
    println!("Found {count} action(s)");
}
