use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::document::{
    AlertConfigDocument, NAME, RECEIVER, URL, WEBHOOK_CONFIGS,
};
use crate::error::{PatchError, StructuralEditError};

/// Timing and matching of the child route that sends alerts to the managed
/// receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    pub matchers: Vec<String>,
    pub group_wait: String,
    pub group_interval: String,
    pub repeat_interval: String,
}

impl Default for RouteTemplate {
    fn default() -> Self {
        Self {
            matchers: Vec::new(),
            group_wait: "5s".into(),
            group_interval: "10s".into(),
            repeat_interval: "1m".into(),
        }
    }
}

/// Upserts a webhook receiver and the route selecting it.
///
/// Both edits overwrite: applying them again with the same target replaces
/// the managed entry in place instead of appending a duplicate.
#[derive(Debug, Clone)]
pub struct ConfigPatcher {
    receiver_name: String,
    route: RouteTemplate,
}

impl ConfigPatcher {
    pub fn new(receiver_name: impl Into<String>, route: RouteTemplate) -> Self {
        Self {
            receiver_name: receiver_name.into(),
            route,
        }
    }

    pub fn receiver_name(&self) -> &str {
        &self.receiver_name
    }

    /// Adds (or replaces) the receiver named `receiver_name` with a single
    /// webhook sending to `target_url`.
    pub fn apply_receiver_edit(
        &self,
        blob: &[u8],
        target_url: &str,
    ) -> Result<Vec<u8>, PatchError> {
        check_target(target_url)?;
        let mut doc = AlertConfigDocument::decode(blob)?;
        let entry = self.receiver_entry(target_url);
        let receivers = doc.receivers_mut()?;
        match receivers.iter().position(|r| {
            r.get(NAME).and_then(Value::as_str)
                == Some(self.receiver_name.as_str())
        }) {
            Some(idx) => {
                debug!(receiver = %self.receiver_name, idx, "replacing receiver");
                receivers[idx] = entry;
            }
            None => {
                debug!(receiver = %self.receiver_name, "appending receiver");
                receivers.push(entry);
            }
        }
        doc.encode()
    }

    /// Adds (or replaces) the child route selecting `receiver_name`, which
    /// must already send to `target_url`. The route goes first with
    /// `continue: true` so earlier catch-all routes cannot shadow it. Routes
    /// of other receivers are left alone even when they share the URL.
    pub fn apply_route_edit(
        &self,
        blob: &[u8],
        target_url: &str,
    ) -> Result<Vec<u8>, PatchError> {
        check_target(target_url)?;
        let mut doc = AlertConfigDocument::decode(blob)?;
        if !doc.receiver_sends_to(&self.receiver_name, target_url)? {
            return Err(StructuralEditError::MissingReceiver {
                url: target_url.to_string(),
            }
            .into());
        }
        let receiver = self.receiver_name.as_str();
        let entry = self.route_entry(receiver);
        let routes = doc.routes_mut()?;
        match routes.iter().position(|r| {
            r.get(RECEIVER).and_then(Value::as_str) == Some(receiver)
        }) {
            Some(idx) => {
                debug!(%receiver, idx, "replacing route");
                routes[idx] = entry;
            }
            None => {
                debug!(%receiver, "inserting route");
                routes.insert(0, entry);
            }
        }
        doc.encode()
    }

    fn receiver_entry(&self, target_url: &str) -> Value {
        let mut hook = Mapping::new();
        hook.insert(URL.into(), target_url.into());
        hook.insert("send_resolved".into(), Value::Bool(false));

        let mut entry = Mapping::new();
        entry.insert(NAME.into(), self.receiver_name.as_str().into());
        entry.insert(
            WEBHOOK_CONFIGS.into(),
            Value::Sequence(vec![Value::Mapping(hook)]),
        );
        Value::Mapping(entry)
    }

    fn route_entry(&self, receiver: &str) -> Value {
        let mut entry = Mapping::new();
        entry.insert(RECEIVER.into(), receiver.into());
        if !self.route.matchers.is_empty() {
            entry.insert(
                "matchers".into(),
                Value::Sequence(
                    self.route
                        .matchers
                        .iter()
                        .map(|m| Value::String(m.clone()))
                        .collect(),
                ),
            );
        }
        entry.insert(
            "group_wait".into(),
            self.route.group_wait.as_str().into(),
        );
        entry.insert(
            "group_interval".into(),
            self.route.group_interval.as_str().into(),
        );
        entry.insert(
            "repeat_interval".into(),
            self.route.repeat_interval.as_str().into(),
        );
        entry.insert("continue".into(), Value::Bool(true));
        Value::Mapping(entry)
    }
}

fn check_target(url: &str) -> Result<(), StructuralEditError> {
    let has_scheme = url.starts_with("http://") || url.starts_with("https://");
    let has_host = url
        .split_once("://")
        .map(|(_, rest)| !rest.is_empty() && !rest.starts_with('/'))
        .unwrap_or(false);
    if has_scheme && has_host {
        Ok(())
    } else {
        Err(StructuralEditError::InvalidTarget(url.to_string()))
    }
}
