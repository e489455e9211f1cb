use crate::{
    action::{ActionDefinition, ActionName, ActionParams},
    config::Bindings,
};

use super::slot::Slot;

/// An action and its parameters resolved from a binding
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBinding {
    pub definition: ActionDefinition,
    pub params: ActionParams,
}

impl ResolvedBinding {
    pub fn action(&self) -> ActionName {
        self.definition.name
    }
}

/// Resolve the binding for the given slot. Returns `None` if the slot is not
/// bound or the bound action is not registered.
///
/// Parameters present in the binding are passed through unmodified. Omitted
/// parameters take the registry default and parameters the action does not
/// accept are dropped; the resolver knows nothing else about actions.
pub fn resolve(slot: &Slot, bindings: &Bindings) -> Option<ResolvedBinding> {
    let record = bindings.get(slot)?;
    let action = match record.action.parse::<ActionName>() {
        Ok(action) => action,
        Err(e) => {
            log::trace!("Ignoring binding on {slot}: {e}");
            return None;
        }
    };
    let definition = action.definition();
    let accepts = definition.params;

    let repeat_rate = if accepts.repeat_rate {
        record.repeat_rate.unwrap_or(definition.default_repeat_rate)
    } else {
        0.0
    };
    let params = ActionParams {
        repeat_rate,
        invert: accepts.invert && record.invert.unwrap_or(false),
        scroll_factor: record.scroll_factor.filter(|_| accepts.scroll_factor),
        background: accepts.background && record.background.unwrap_or(false),
        key: record.key.clone().filter(|_| accepts.key),
    };

    Some(ResolvedBinding { definition, params })
}
