use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub cluster_id: String,
    pub project_id: String,
}

/// Resolves the install target's cluster and system project ids.
#[async_trait]
pub trait ClusterIdentity: Send + Sync {
    async fn resolve(
        &self,
        cluster_name: &str,
        project_name: &str,
    ) -> Result<ResolvedIdentity, ValidationError>;
}

/// Ids supplied up front through configuration.
pub struct StaticIdentity {
    pub cluster_id: String,
    pub project_id: String,
}

#[async_trait]
impl ClusterIdentity for StaticIdentity {
    async fn resolve(
        &self,
        _cluster_name: &str,
        _project_name: &str,
    ) -> Result<ResolvedIdentity, ValidationError> {
        if self.cluster_id.is_empty() || self.project_id.is_empty() {
            return Err(ValidationError::Setup(
                "cluster id and project id must both be set".into(),
            ));
        }
        Ok(ResolvedIdentity {
            cluster_id: self.cluster_id.clone(),
            project_id: self.project_id.clone(),
        })
    }
}

/// Looks ids up through the management server's v3 API.
pub struct ManagementApiIdentity {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct Collection {
    #[serde(default)]
    data: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
struct Resource {
    id: String,
}

impl ManagementApiIdentity {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client,
        }
    }

    async fn first_id(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<String>, ValidationError> {
        let mut req = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| ValidationError::Setup(format!("GET {path}: {e}")))?;
        if !resp.status().is_success() {
            return Err(ValidationError::Setup(format!(
                "GET {path} answered {}",
                resp.status()
            )));
        }
        let body: Collection = resp
            .json()
            .await
            .map_err(|e| ValidationError::Setup(format!("GET {path}: {e}")))?;
        Ok(body.data.into_iter().next().map(|r| r.id))
    }
}

#[async_trait]
impl ClusterIdentity for ManagementApiIdentity {
    async fn resolve(
        &self,
        cluster_name: &str,
        project_name: &str,
    ) -> Result<ResolvedIdentity, ValidationError> {
        let cluster_id = self
            .first_id("/v3/clusters", &[("name", cluster_name)])
            .await?
            .ok_or_else(|| {
                ValidationError::Setup(format!("cluster {cluster_name} not found"))
            })?;
        let project_id = self
            .first_id(
                "/v3/projects",
                &[("clusterId", cluster_id.as_str()), ("name", project_name)],
            )
            .await?
            .ok_or_else(|| {
                ValidationError::Setup(format!(
                    "project {project_name} not found in cluster {cluster_id}"
                ))
            })?;
        info!(%cluster_name, %cluster_id, %project_id, "resolved cluster identity");
        Ok(ResolvedIdentity {
            cluster_id,
            project_id,
        })
    }
}
