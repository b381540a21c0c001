use serde_yaml::{Mapping, Value};

use crate::error::{DecodeError, PatchError, StructuralEditError};

pub(crate) const RECEIVERS: &str = "receivers";
pub(crate) const ROUTE: &str = "route";
pub(crate) const ROUTES: &str = "routes";
pub(crate) const NAME: &str = "name";
pub(crate) const RECEIVER: &str = "receiver";
pub(crate) const WEBHOOK_CONFIGS: &str = "webhook_configs";
pub(crate) const URL: &str = "url";

/// Decoded alert routing configuration. Keys keep their original order, so
/// an untouched document encodes back to the same structure.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertConfigDocument {
    root: Mapping,
}

impl AlertConfigDocument {
    pub fn decode(blob: &[u8]) -> Result<Self, DecodeError> {
        if blob.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(DecodeError::Empty);
        }
        match serde_yaml::from_slice::<Value>(blob)? {
            Value::Mapping(root) => Ok(Self { root }),
            _ => Err(DecodeError::NotAMapping),
        }
    }

    /// Encode and verify the output decodes back to the same document, so a
    /// broken blob is never handed to the caller for write-back.
    pub fn encode(&self) -> Result<Vec<u8>, PatchError> {
        let text = serde_yaml::to_string(&Value::Mapping(self.root.clone()))
            .map_err(|e| PatchError::Encode(e.to_string()))?;
        let reread = Self::decode(text.as_bytes())?;
        if reread != *self {
            return Err(PatchError::Encode(
                "encoded document does not decode to the same content".into(),
            ));
        }
        Ok(text.into_bytes())
    }

    pub fn root(&self) -> &Mapping {
        &self.root
    }

    pub fn receivers(&self) -> Result<&Vec<Value>, StructuralEditError> {
        match self.root.get(RECEIVERS) {
            None | Some(Value::Null) => {
                Err(StructuralEditError::MissingReceivers)
            }
            Some(Value::Sequence(seq)) => Ok(seq),
            Some(_) => Err(StructuralEditError::ReceiversNotSequence),
        }
    }

    pub(crate) fn receivers_mut(
        &mut self,
    ) -> Result<&mut Vec<Value>, StructuralEditError> {
        match self.root.get_mut(RECEIVERS) {
            None | Some(Value::Null) => {
                Err(StructuralEditError::MissingReceivers)
            }
            Some(Value::Sequence(seq)) => Ok(seq),
            Some(_) => Err(StructuralEditError::ReceiversNotSequence),
        }
    }

    fn route(&self) -> Result<&Mapping, StructuralEditError> {
        match self.root.get(ROUTE) {
            None | Some(Value::Null) => Err(StructuralEditError::MissingRoute),
            Some(Value::Mapping(m)) => Ok(m),
            Some(_) => Err(StructuralEditError::RouteNotMapping),
        }
    }

    /// Child routes of the top-level route. An absent list reads as empty.
    pub fn routes(&self) -> Result<&[Value], StructuralEditError> {
        match self.route()?.get(ROUTES) {
            None | Some(Value::Null) => Ok(&[]),
            Some(Value::Sequence(seq)) => Ok(seq),
            Some(_) => Err(StructuralEditError::RoutesNotSequence),
        }
    }

    /// Child routes, creating an empty list under `route` when absent.
    pub(crate) fn routes_mut(
        &mut self,
    ) -> Result<&mut Vec<Value>, StructuralEditError> {
        let route = match self.root.get_mut(ROUTE) {
            None | Some(Value::Null) => {
                return Err(StructuralEditError::MissingRoute);
            }
            Some(Value::Mapping(m)) => m,
            Some(_) => return Err(StructuralEditError::RouteNotMapping),
        };
        if matches!(route.get(ROUTES), None | Some(Value::Null)) {
            route.insert(Value::String(ROUTES.into()), Value::Sequence(Vec::new()));
        }
        match route.get_mut(ROUTES) {
            Some(Value::Sequence(seq)) => Ok(seq),
            _ => Err(StructuralEditError::RoutesNotSequence),
        }
    }

    pub fn receiver_names(&self) -> Vec<String> {
        self.receivers()
            .map(|seq| seq.iter().filter_map(entry_name).collect())
            .unwrap_or_default()
    }

    /// Name of the first receiver with a webhook pointing at `url`.
    pub fn receiver_for_url(&self, url: &str) -> Option<String> {
        self.receivers().ok()?.iter().find_map(|r| {
            let hooks = r.get(WEBHOOK_CONFIGS)?.as_sequence()?;
            hooks
                .iter()
                .any(|h| h.get(URL).and_then(Value::as_str) == Some(url))
                .then(|| entry_name(r))
                .flatten()
        })
    }

    /// Whether the receiver called `name` has a webhook pointing at `url`.
    pub fn receiver_sends_to(
        &self,
        name: &str,
        url: &str,
    ) -> Result<bool, StructuralEditError> {
        Ok(self
            .receivers()?
            .iter()
            .filter(|r| entry_name(r).as_deref() == Some(name))
            .filter_map(|r| r.get(WEBHOOK_CONFIGS)?.as_sequence())
            .flatten()
            .any(|h| h.get(URL).and_then(Value::as_str) == Some(url)))
    }

    pub fn routes_for_receiver(&self, receiver: &str) -> Vec<&Value> {
        self.routes()
            .map(|routes| {
                routes
                    .iter()
                    .filter(|r| {
                        r.get(RECEIVER).and_then(Value::as_str)
                            == Some(receiver)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn entry_name(v: &Value) -> Option<String> {
    v.get(NAME).and_then(Value::as_str).map(str::to_string)
}
