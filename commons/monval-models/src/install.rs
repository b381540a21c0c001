use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Snapshot of a chart release on the target cluster. Built fresh from the
/// chart manager each time it is needed; never carried across steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationState {
    pub is_installed: bool,
    pub installed_version: Option<String>,
    /// Newest first.
    pub available_versions: Vec<String>,
}

impl InstallationState {
    pub fn not_installed(available_versions: Vec<String>) -> Self {
        Self {
            is_installed: false,
            installed_version: None,
            available_versions,
        }
    }

    pub fn installed(
        version: impl Into<String>,
        available_versions: Vec<String>,
    ) -> Self {
        Self {
            is_installed: true,
            installed_version: Some(version.into()),
            available_versions,
        }
    }

    pub fn newest_available(&self) -> Option<&str> {
        self.available_versions.first().map(String::as_str)
    }

    /// Newest listed version that differs from the installed one. `None` when
    /// the release already runs the newest version or nothing is listed.
    pub fn upgrade_target(&self) -> Option<&str> {
        let newest = self.newest_available()?;
        match self.installed_version.as_deref() {
            Some(current) if current == newest => None,
            _ => Some(newest),
        }
    }

    pub fn is_at_newest(&self) -> bool {
        self.is_installed
            && self.installed_version.as_deref().is_some()
            && self.installed_version.as_deref() == self.newest_available()
    }
}

/// Identity of the install target. Only `target_version` changes during a
/// run (between the install and upgrade phases).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartInstallOptions {
    pub cluster_id: String,
    pub cluster_name: String,
    pub project_id: String,
    pub target_version: String,
}

impl ChartInstallOptions {
    pub fn is_primary_cluster(&self) -> bool {
        self.cluster_id == self.cluster_name
    }

    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            target_version: version.into(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    IngressNginx,
    RkeControllerManager,
    RkeEtcd,
    RkeProxy,
    RkeScheduler,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::IngressNginx,
        Feature::RkeControllerManager,
        Feature::RkeEtcd,
        Feature::RkeProxy,
        Feature::RkeScheduler,
    ];

    /// Chart value key toggling this integration.
    pub fn value_key(&self) -> &'static str {
        match self {
            Feature::IngressNginx => "ingressNginx.enabled",
            Feature::RkeControllerManager => "rkeControllerManager.enabled",
            Feature::RkeEtcd => "rkeEtcd.enabled",
            Feature::RkeProxy => "rkeProxy.enabled",
            Feature::RkeScheduler => "rkeScheduler.enabled",
        }
    }
}

/// Optional integrations forwarded untouched to install and upgrade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureToggleSet(BTreeMap<Feature, bool>);

impl FeatureToggleSet {
    pub fn all_enabled() -> Self {
        Self(Feature::ALL.iter().map(|f| (*f, true)).collect())
    }

    pub fn set(mut self, feature: Feature, enabled: bool) -> Self {
        self.0.insert(feature, enabled);
        self
    }

    pub fn get(&self, feature: Feature) -> Option<bool> {
        self.0.get(&feature).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, bool)> + '_ {
        self.0.iter().map(|(f, v)| (*f, *v))
    }

    /// `key=value` pairs in a stable order.
    pub fn as_values(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(f, v)| (f.value_key().to_string(), v.to_string()))
            .collect()
    }
}
