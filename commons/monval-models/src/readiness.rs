use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Deployment,
    DaemonSet,
    StatefulSet,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceKind::Deployment => "Deployment",
            ResourceKind::DaemonSet => "DaemonSet",
            ResourceKind::StatefulSet => "StatefulSet",
        };
        f.write_str(s)
    }
}

/// Which resources of a kind belong to the cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// Every resource of the kind in the namespace.
    All,
    /// Kubernetes label selector expression, e.g. `app=webhook`.
    Labels(String),
    /// A single resource by name.
    Name(String),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str("*"),
            Selector::Labels(l) => write!(f, "labels({l})"),
            Selector::Name(n) => write!(f, "name({n})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessPredicate {
    AllReplicasAvailable,
    AllNodesScheduled,
    AllReplicasReady,
    AnnotationEquals { key: String, value: String },
}

impl ReadinessPredicate {
    pub fn is_satisfied(&self, r: &ObservedResource) -> bool {
        match self {
            ReadinessPredicate::AllReplicasAvailable => {
                r.available_replicas.unwrap_or(0) >= r.desired_replicas()
            }
            ReadinessPredicate::AllNodesScheduled => {
                match (r.desired_number_scheduled, r.number_available) {
                    (Some(desired), available) => {
                        available.unwrap_or(0) >= desired
                    }
                    // no status reported yet
                    (None, _) => false,
                }
            }
            ReadinessPredicate::AllReplicasReady => {
                r.ready_replicas.unwrap_or(0) >= r.desired_replicas()
            }
            ReadinessPredicate::AnnotationEquals { key, value } => {
                r.annotations.get(key) == Some(value)
            }
        }
    }
}

impl fmt::Display for ReadinessPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadinessPredicate::AllReplicasAvailable => {
                f.write_str("all-replicas-available")
            }
            ReadinessPredicate::AllNodesScheduled => {
                f.write_str("all-nodes-scheduled")
            }
            ReadinessPredicate::AllReplicasReady => {
                f.write_str("all-replicas-ready")
            }
            ReadinessPredicate::AnnotationEquals { key, value } => {
                write!(f, "annotation {key}={value}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessSpec {
    pub kind: ResourceKind,
    pub namespace: String,
    pub selector: Selector,
    pub predicate: ReadinessPredicate,
}

impl ReadinessSpec {
    pub fn deployments(namespace: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Deployment,
            namespace: namespace.into(),
            selector: Selector::All,
            predicate: ReadinessPredicate::AllReplicasAvailable,
        }
    }

    pub fn daemonsets(namespace: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::DaemonSet,
            namespace: namespace.into(),
            selector: Selector::All,
            predicate: ReadinessPredicate::AllNodesScheduled,
        }
    }

    pub fn statefulsets(namespace: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::StatefulSet,
            namespace: namespace.into(),
            selector: Selector::All,
            predicate: ReadinessPredicate::AllReplicasReady,
        }
    }

    /// Wait for a single Deployment to carry `key=value` in its annotations.
    pub fn deployment_annotation(
        namespace: impl Into<String>,
        name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            kind: ResourceKind::Deployment,
            namespace: namespace.into(),
            selector: Selector::Name(name.into()),
            predicate: ReadinessPredicate::AnnotationEquals {
                key: key.into(),
                value: value.into(),
            },
        }
    }

    /// The three workload cohorts of a deployed chart.
    pub fn workload_cohorts(namespace: &str) -> Vec<Self> {
        vec![
            Self::deployments(namespace),
            Self::daemonsets(namespace),
            Self::statefulsets(namespace),
        ]
    }

    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = selector;
        self
    }
}

impl fmt::Display for ReadinessSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{} [{}]",
            self.kind, self.namespace, self.selector, self.predicate
        )
    }
}

/// Status fields of one workload as seen by a single list call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedResource {
    pub name: String,
    /// `spec.replicas` for Deployments and StatefulSets.
    pub replicas: Option<i32>,
    pub available_replicas: Option<i32>,
    pub ready_replicas: Option<i32>,
    pub desired_number_scheduled: Option<i32>,
    pub number_available: Option<i32>,
    pub annotations: BTreeMap<String, String>,
}

impl ObservedResource {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Kubernetes defaults `spec.replicas` to 1.
    pub fn desired_replicas(&self) -> i32 {
        self.replicas.unwrap_or(1)
    }

    pub fn summary(&self) -> String {
        let mut parts = vec![self.name.clone()];
        if let Some(r) = self.replicas {
            parts.push(format!("replicas={r}"));
        }
        if let Some(a) = self.available_replicas {
            parts.push(format!("available={a}"));
        }
        if let Some(r) = self.ready_replicas {
            parts.push(format!("ready={r}"));
        }
        if let Some(d) = self.desired_number_scheduled {
            parts.push(format!(
                "scheduled={}/{}",
                self.number_available.unwrap_or(0),
                d
            ));
        }
        parts.join(" ")
    }
}
