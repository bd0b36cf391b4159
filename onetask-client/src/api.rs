//! HTTP transport for the marketplace backend
//!
//! One typed method per consumed endpoint. Authorized calls replay the
//! session's opaque token verbatim in `Authorization`; the backend
//! re-authenticates each request, so there is nothing else to attach.
//! Non-success statuses surface as [`ClientError::UnexpectedStatus`],
//! including 401/403, which callers see as a generic network failure
//! rather than a distinguished session-expiry condition.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use onetask_core::{
    LoginStatus, ProfileUpdate, Proposal, ProposalCreation, ProposalId, Registration, Task,
    TaskCreation, TaskId, TaskStatus, UserId, UserProfile,
};

use crate::config::Config;
use crate::error::ClientError;
use crate::Result;

/// Typed client for the backend REST contract
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        tracing::debug!(%method, path, authorized = token.is_some(), "api request");
        let mut req = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = token {
            req = req.header(reqwest::header::AUTHORIZATION, token);
        }
        req
    }

    fn expect(resp: Response, expected: StatusCode, path: &str) -> Result<Response> {
        if resp.status() == expected {
            Ok(resp)
        } else {
            Err(ClientError::UnexpectedStatus {
                status: resp.status().as_u16(),
                path: path.to_string(),
            })
        }
    }

    async fn json_of<T: DeserializeOwned>(
        resp: Response,
        expected: StatusCode,
        path: &str,
    ) -> Result<T> {
        let resp = Self::expect(resp, expected, path)?;
        Ok(resp.json().await?)
    }

    /// POST /login: exchange Basic credentials for a login status
    pub async fn login(&self, token: &str) -> Result<LoginStatus> {
        let resp = self.request(Method::POST, "/login", Some(token)).send().await?;
        Self::json_of(resp, StatusCode::OK, "/login").await
    }

    /// POST /rest/users: sign up a new user (201 on success)
    pub async fn register_user(&self, registration: &Registration) -> Result<()> {
        let resp = self
            .request(Method::POST, "/rest/users", None)
            .json(registration)
            .send()
            .await?;
        Self::expect(resp, StatusCode::CREATED, "/rest/users").map(|_| ())
    }

    /// GET /rest/users/current: profile of the authenticated user
    pub async fn current_user(&self, token: &str) -> Result<UserProfile> {
        let resp = self
            .request(Method::GET, "/rest/users/current", Some(token))
            .send()
            .await?;
        Self::json_of(resp, StatusCode::OK, "/rest/users/current").await
    }

    /// GET /rest/users/{id}: public profile read
    pub async fn user(&self, id: UserId) -> Result<UserProfile> {
        let path = format!("/rest/users/{id}");
        let resp = self.request(Method::GET, &path, None).send().await?;
        Self::json_of(resp, StatusCode::OK, &path).await
    }

    /// GET /rest/users/username/{username}
    pub async fn user_by_username(&self, username: &str) -> Result<UserProfile> {
        let path = format!("/rest/users/username/{username}");
        let resp = self.request(Method::GET, &path, None).send().await?;
        Self::json_of(resp, StatusCode::OK, &path).await
    }

    /// PUT /rest/users/{id}: update own profile
    pub async fn update_user(&self, token: &str, update: &ProfileUpdate) -> Result<()> {
        let path = format!("/rest/users/{}", update.id);
        let resp = self
            .request(Method::PUT, &path, Some(token))
            .json(update)
            .send()
            .await?;
        Self::expect(resp, StatusCode::OK, &path).map(|_| ())
    }

    /// GET /rest/tasks/taskBoard?fromNewest=: public task board
    pub async fn task_board(&self, from_newest: bool) -> Result<Vec<Task>> {
        let resp = self
            .request(Method::GET, "/rest/tasks/taskBoard", None)
            .query(&[("fromNewest", from_newest)])
            .send()
            .await?;
        Self::json_of(resp, StatusCode::OK, "/rest/tasks/taskBoard").await
    }

    /// GET /rest/tasks/{id}: public task detail
    pub async fn task(&self, id: TaskId) -> Result<Task> {
        let path = format!("/rest/tasks/{id}");
        let resp = self.request(Method::GET, &path, None).send().await?;
        Self::json_of(resp, StatusCode::OK, &path).await
    }

    /// GET /rest/tasks/posted?expired=: tasks owned by the caller
    pub async fn posted_tasks(&self, token: &str, expired: bool) -> Result<Vec<Task>> {
        let resp = self
            .request(Method::GET, "/rest/tasks/posted", Some(token))
            .query(&[("expired", expired)])
            .send()
            .await?;
        Self::json_of(resp, StatusCode::OK, "/rest/tasks/posted").await
    }

    /// GET /rest/tasks/taken?taskStatus=&expired=: tasks assigned to the caller
    pub async fn taken_tasks(
        &self,
        token: &str,
        status: Option<TaskStatus>,
        expired: bool,
    ) -> Result<Vec<Task>> {
        let mut query: Vec<(&str, String)> = vec![("expired", expired.to_string())];
        if let Some(status) = status {
            query.push(("taskStatus", status.as_str().to_string()));
        }
        let resp = self
            .request(Method::GET, "/rest/tasks/taken", Some(token))
            .query(&query)
            .send()
            .await?;
        Self::json_of(resp, StatusCode::OK, "/rest/tasks/taken").await
    }

    /// POST /rest/tasks: post a new task (201 on success)
    pub async fn create_task(&self, token: &str, creation: &TaskCreation) -> Result<()> {
        let resp = self
            .request(Method::POST, "/rest/tasks", Some(token))
            .json(creation)
            .send()
            .await?;
        Self::expect(resp, StatusCode::CREATED, "/rest/tasks").map(|_| ())
    }

    /// GET /rest/proposals: the full proposal collection; callers filter
    pub async fn proposals(&self, token: &str) -> Result<Vec<Proposal>> {
        let resp = self
            .request(Method::GET, "/rest/proposals", Some(token))
            .send()
            .await?;
        Self::json_of(resp, StatusCode::OK, "/rest/proposals").await
    }

    /// POST /rest/proposals: submit a proposal (201 on success)
    ///
    /// The server-assigned id is parsed only when the response carried a
    /// body; some deployments answer 201 with an empty body and only a
    /// Location header.
    pub async fn create_proposal(
        &self,
        token: &str,
        creation: &ProposalCreation,
    ) -> Result<Option<ProposalId>> {
        let resp = self
            .request(Method::POST, "/rest/proposals", Some(token))
            .json(creation)
            .send()
            .await?;
        let resp = Self::expect(resp, StatusCode::CREATED, "/rest/proposals")?;

        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        #[derive(Deserialize)]
        struct Created {
            id: ProposalId,
        }
        let created: Created = serde_json::from_str(&body)?;
        Ok(Some(created.id))
    }

    /// POST /rest/tasks/posted/{taskId}/proposals/{freelancerId}:
    /// assign a freelancer to an owned task (204 = success, no body)
    pub async fn assign_freelancer(
        &self,
        token: &str,
        task_id: TaskId,
        freelancer_id: UserId,
    ) -> Result<()> {
        let path = format!("/rest/tasks/posted/{task_id}/proposals/{freelancer_id}");
        let resp = self.request(Method::POST, &path, Some(token)).send().await?;
        Self::expect(resp, StatusCode::NO_CONTENT, &path).map(|_| ())
    }
}
