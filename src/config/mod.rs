pub mod path;

use std::{collections::BTreeMap, io, path::Path};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    action::ActionName,
    constants::{DEFAULT_ANALOG_CUTOFF, DEFAULT_POLLING_FREQUENCY_MS},
    input::slot::{Slot, SlotKind},
};

/// Represents all possible errors loading bindings or preferences
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Unable to deserialize: {0}")]
    DeserializeError(#[from] serde_yaml::Error),
    #[error("Unable to deserialize JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// The configured mapping from one input slot to an action and its
/// parameters. Parameters the action does not accept are ignored.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BindingRecord {
    /// Name of the action in the action registry (e.g. "forwardTab")
    pub action: String,
    /// Reverse the direction of the input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invert: Option<bool>,
    /// Seconds between automatic re-fires while the input is held. Zero
    /// disables repeating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_rate: Option<f64>,
    /// Speed multiplier for scroll actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_factor: Option<f64>,
    /// Open new tabs or windows without switching to them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<bool>,
    /// Key to send for key injection actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl BindingRecord {
    pub fn new(action: ActionName) -> Self {
        Self {
            action: action.as_str().to_string(),
            invert: None,
            repeat_rate: None,
            scroll_factor: None,
            background: None,
            key: None,
        }
    }

    pub fn with_repeat_rate(mut self, rate: f64) -> Self {
        self.repeat_rate = Some(rate);
        self
    }

    pub fn with_scroll_factor(mut self, factor: f64) -> Self {
        self.scroll_factor = Some(factor);
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = Some(invert);
        self
    }

    pub fn with_background(mut self, background: bool) -> Self {
        self.background = Some(background);
        self
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }
}

/// The bindings table maps button and axis indices to [BindingRecord]s. It is
/// always replaced as a whole, never patched.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bindings {
    #[serde(default)]
    pub buttons: BTreeMap<u32, BindingRecord>,
    #[serde(default)]
    pub axes: BTreeMap<u32, BindingRecord>,
}

impl Bindings {
    /// Load [Bindings] from the given YAML string
    pub fn from_yaml(content: &str) -> Result<Bindings, LoadError> {
        let bindings: Bindings = serde_yaml::from_str(content)?;
        bindings.validate()?;
        Ok(bindings)
    }

    /// Load [Bindings] from the given JSON string
    pub fn from_json(content: &str) -> Result<Bindings, LoadError> {
        let bindings: Bindings = serde_json::from_str(content)?;
        bindings.validate()?;
        Ok(bindings)
    }

    /// Load [Bindings] from the given YAML or JSON file
    pub fn from_yaml_path<P: AsRef<Path>>(path: P) -> Result<Bindings, LoadError> {
        let file = std::fs::File::open(path)?;
        let bindings: Bindings = serde_yaml::from_reader(file)?;
        bindings.validate()?;
        Ok(bindings)
    }

    /// Returns the binding for the given slot
    pub fn get(&self, slot: &Slot) -> Option<&BindingRecord> {
        match slot.kind {
            SlotKind::Axis => self.axes.get(&slot.index),
            SlotKind::Button => self.buttons.get(&slot.index),
        }
    }

    /// Bind the given slot, replacing any existing binding
    pub fn insert(&mut self, slot: Slot, record: BindingRecord) {
        match slot.kind {
            SlotKind::Axis => self.axes.insert(slot.index, record),
            SlotKind::Button => self.buttons.insert(slot.index, record),
        };
    }

    /// Iterate over every bound slot, axes first
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &BindingRecord)> {
        self.axes
            .iter()
            .map(|(index, record)| (Slot::axis(*index), record))
            .chain(
                self.buttons
                    .iter()
                    .map(|(index, record)| (Slot::button(*index), record)),
            )
    }

    /// Check numeric parameters. Unknown action names are not an error; the
    /// resolver treats them as unbound.
    pub fn validate(&self) -> Result<(), LoadError> {
        for (slot, record) in self.iter() {
            if let Some(rate) = record.repeat_rate {
                if !rate.is_finite() || rate < 0.0 {
                    return Err(LoadError::Invalid(format!(
                        "{slot}: repeatRate must be a non-negative number, got {rate}"
                    )));
                }
            }
            if let Some(factor) = record.scroll_factor {
                if !factor.is_finite() || factor <= 0.0 {
                    return Err(LoadError::Invalid(format!(
                        "{slot}: scrollFactor must be a positive number, got {factor}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Returns the slots whose action name is not in the action registry
    pub fn unknown_actions(&self) -> Vec<(Slot, String)> {
        self.iter()
            .filter(|(_, record)| record.action.parse::<ActionName>().is_err())
            .map(|(slot, record)| (slot, record.action.clone()))
            .collect()
    }
}

impl Bindings {
    /// The bindings used when no bindings file was found. Indices follow the
    /// standard gamepad layout.
    pub fn standard() -> Self {
        let mut bindings = Bindings::default();

        // Face buttons
        bindings.insert(Slot::button(0), BindingRecord::new(ActionName::Click));
        bindings.insert(
            Slot::button(1),
            BindingRecord::new(ActionName::PreviousPageInHistory),
        );
        bindings.insert(
            Slot::button(2),
            BindingRecord::new(ActionName::ReverseTab).with_repeat_rate(0.4),
        );
        bindings.insert(
            Slot::button(3),
            BindingRecord::new(ActionName::ForwardTab).with_repeat_rate(0.4),
        );

        // Bumpers and triggers
        bindings.insert(
            Slot::button(4),
            BindingRecord::new(ActionName::ReverseTab).with_repeat_rate(0.4),
        );
        bindings.insert(
            Slot::button(5),
            BindingRecord::new(ActionName::ForwardTab).with_repeat_rate(0.4),
        );
        bindings.insert(
            Slot::button(6),
            BindingRecord::new(ActionName::GoToPreviousTab).with_repeat_rate(1.0),
        );
        bindings.insert(
            Slot::button(7),
            BindingRecord::new(ActionName::GoToNextTab).with_repeat_rate(1.0),
        );

        // D-pad
        bindings.insert(
            Slot::button(12),
            BindingRecord::new(ActionName::ScrollUp).with_scroll_factor(1.0),
        );
        bindings.insert(
            Slot::button(13),
            BindingRecord::new(ActionName::ScrollDown).with_scroll_factor(1.0),
        );
        bindings.insert(
            Slot::button(14),
            BindingRecord::new(ActionName::ScrollLeft).with_scroll_factor(1.0),
        );
        bindings.insert(
            Slot::button(15),
            BindingRecord::new(ActionName::ScrollRight).with_scroll_factor(1.0),
        );

        // Thumbsticks
        bindings.insert(
            Slot::axis(0),
            BindingRecord::new(ActionName::ScrollHorizontally).with_scroll_factor(1.0),
        );
        bindings.insert(
            Slot::axis(1),
            BindingRecord::new(ActionName::ScrollVertically).with_scroll_factor(1.0),
        );
        bindings.insert(
            Slot::axis(2),
            BindingRecord::new(ActionName::ThumbstickHistoryNavigation),
        );
        bindings.insert(
            Slot::axis(3),
            BindingRecord::new(ActionName::ThumbstickTabbing).with_repeat_rate(0.4),
        );

        bindings
    }
}

/// User preferences consumed by the navigator
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Analog values at or below this magnitude are treated as at rest
    pub analog_cutoff: f64,
    /// Interval in milliseconds between gamepad samples
    pub polling_frequency_ms: u64,
    /// Pulse the gamepad when a scroll or history action cannot go further
    pub vibrate_on_boundary: bool,
    /// URL passed along with new tab and window requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_tab_or_window_url: Option<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            analog_cutoff: DEFAULT_ANALOG_CUTOFF,
            polling_frequency_ms: DEFAULT_POLLING_FREQUENCY_MS,
            vibrate_on_boundary: true,
            new_tab_or_window_url: None,
        }
    }
}

impl Preferences {
    /// Load [Preferences] from the given YAML string
    pub fn from_yaml(content: &str) -> Result<Preferences, LoadError> {
        let preferences: Preferences = serde_yaml::from_str(content)?;
        preferences.validate()?;
        Ok(preferences)
    }

    /// Load [Preferences] from the given JSON string
    pub fn from_json(content: &str) -> Result<Preferences, LoadError> {
        let preferences: Preferences = serde_json::from_str(content)?;
        preferences.validate()?;
        Ok(preferences)
    }

    /// Load [Preferences] from the given YAML or JSON file
    pub fn from_yaml_path<P: AsRef<Path>>(path: P) -> Result<Preferences, LoadError> {
        let file = std::fs::File::open(path)?;
        let preferences: Preferences = serde_yaml::from_reader(file)?;
        preferences.validate()?;
        Ok(preferences)
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        if !(0.0..1.0).contains(&self.analog_cutoff) {
            return Err(LoadError::Invalid(format!(
                "analogCutoff must be in [0, 1), got {}",
                self.analog_cutoff
            )));
        }
        if self.polling_frequency_ms == 0 {
            return Err(LoadError::Invalid(
                "pollingFrequencyMs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
