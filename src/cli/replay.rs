use std::{
    error::Error,
    path::{Path, PathBuf},
};

use clap::Args;
use serde::Deserialize;
use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

use crate::{
    config::{Bindings, LoadError, Preferences},
    navigator::{Navigator, PageEvent},
    platform::memory::{Effect, MemoryPlatform, PageFixture},
    timer::Millis,
};

/// Time replayed after the last scripted step when no end is given
const DEFAULT_TAIL_MS: Millis = 1000;

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// YAML description of the page to navigate
    #[arg(long)]
    pub page: PathBuf,
    /// YAML script of timed gamepad and page events
    #[arg(long)]
    pub script: PathBuf,
    /// Bindings file to use instead of the standard bindings
    #[arg(long)]
    pub bindings: Option<PathBuf>,
    /// Preferences file to use instead of the defaults
    #[arg(long)]
    pub preferences: Option<PathBuf>,
}

/// A new value for one gamepad input
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InputChange {
    #[serde(default)]
    pub gamepad: u32,
    pub index: usize,
    pub value: f64,
}

/// Events applied at one point in time. Several may be combined.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ScriptStep {
    pub at: Millis,
    pub connect: Option<u32>,
    pub disconnect: Option<u32>,
    pub button: Option<InputChange>,
    pub axis: Option<InputChange>,
    pub page: Option<PageEvent>,
    /// Open or close a modal surface over the page
    pub modal: Option<bool>,
    pub gamepad_error: Option<bool>,
}

/// A timed sequence of events to replay
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
    /// Time at which the replay ends
    pub end: Option<Millis>,
}

impl Script {
    /// Load a [Script] from the given YAML string
    pub fn from_yaml(content: &str) -> Result<Script, LoadError> {
        let script: Script = serde_yaml::from_str(content)?;
        Ok(script)
    }

    /// Load a [Script] from the given YAML file
    pub fn from_yaml_path<P: AsRef<Path>>(path: P) -> Result<Script, LoadError> {
        let file = std::fs::File::open(path)?;
        let script: Script = serde_yaml::from_reader(file)?;
        Ok(script)
    }
}

/// An effect together with the time it happened
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEffect {
    pub at: Millis,
    pub effect: Effect,
}

#[derive(Tabled)]
struct EffectRow {
    time: String,
    effect: String,
}

/// Run the given script against a started navigator and return every effect
/// the page observed, in order.
pub fn run_script(
    navigator: &mut Navigator<MemoryPlatform>,
    script: &Script,
) -> Vec<TimedEffect> {
    let platform = navigator.platform().clone();
    let mut steps = script.steps.clone();
    steps.sort_by_key(|step| step.at);

    let last = steps.last().map(|step| step.at).unwrap_or_default();
    let end = script
        .end
        .unwrap_or_else(|| last.saturating_add(DEFAULT_TAIL_MS));

    let mut effects = Vec::new();
    let mut collect = |at: Millis, effects: &mut Vec<TimedEffect>| {
        effects.extend(
            platform
                .take_effects()
                .into_iter()
                .map(|effect| TimedEffect { at, effect }),
        );
    };
    collect(navigator.now(), &mut effects);

    for step in steps {
        advance(navigator, step.at, &mut effects, &mut collect);
        apply(navigator, &step);
        collect(step.at, &mut effects);
    }
    advance(navigator, end, &mut effects, &mut collect);

    effects
}

/// Advance to `target` one deadline at a time so effects keep their time
fn advance<F>(
    navigator: &mut Navigator<MemoryPlatform>,
    target: Millis,
    effects: &mut Vec<TimedEffect>,
    collect: &mut F,
) where
    F: FnMut(Millis, &mut Vec<TimedEffect>),
{
    while let Some(deadline) = navigator.next_deadline() {
        if deadline > target {
            break;
        }
        navigator.advance(deadline);
        collect(deadline, effects);
    }
    navigator.advance(target);
}

fn apply(navigator: &mut Navigator<MemoryPlatform>, step: &ScriptStep) {
    let platform = navigator.platform().clone();
    if let Some(failing) = step.gamepad_error {
        platform.set_gamepad_error(failing);
    }
    if let Some(index) = step.connect {
        platform.connect_gamepad(index);
        navigator.gamepad_connected(step.at);
    }
    if let Some(change) = step.button.as_ref() {
        platform.set_button(change.gamepad, change.index, change.value);
    }
    if let Some(change) = step.axis.as_ref() {
        platform.set_axis(change.gamepad, change.index, change.value);
    }
    if let Some(index) = step.disconnect {
        platform.disconnect_gamepad(index);
        navigator.gamepad_disconnected(step.at);
    }
    if let Some(event) = step.page {
        navigator.page_event(event);
    }
    if let Some(modal) = step.modal {
        platform.set_modal(modal);
        for handle in platform.observers() {
            navigator.dom_changed(handle);
        }
    }
}

pub fn handle_replay(args: ReplayArgs) -> Result<(), Box<dyn Error>> {
    let fixture = PageFixture::from_yaml_path(&args.page)?;
    let script = Script::from_yaml_path(&args.script)?;
    let bindings = match args.bindings.as_ref() {
        Some(path) => Bindings::from_yaml_path(path)?,
        None => Bindings::standard(),
    };
    let preferences = match args.preferences.as_ref() {
        Some(path) => Preferences::from_yaml_path(path)?,
        None => Preferences::default(),
    };

    let platform = MemoryPlatform::from_fixture(fixture);
    let mut navigator = Navigator::new(platform, bindings, preferences);
    navigator.start(0);
    let effects = run_script(&mut navigator, &script);
    let state = navigator.state();
    navigator.stop();

    let count = effects.len();
    let rows: Vec<EffectRow> = effects
        .into_iter()
        .map(|timed| EffectRow {
            time: format!("{}ms", timed.at),
            effect: serde_json::to_string(&timed.effect).unwrap_or_default(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern_rounded())
        .with(Panel::header(format!("Replay: {}", args.script.display())));
    println!("{table}");
    println!("Observed {count} effect(s)");
    println!("{}", serde_json::to_string_pretty(&state)?);

    Ok(())
}
