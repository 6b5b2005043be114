use std::time::Duration;

use async_trait::async_trait;
use log::info;
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Client, Method, RequestBuilder, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::auth::basic_auth_value;
use crate::config::Config;
use crate::time_entry::{NewTimeEntry, Project, TimeEntry};

/// Toggl APIとの通信で発生するエラー。
///
/// いずれも致命的には扱わず、通知して処理を継続する。リトライは行わない。
#[derive(Debug, Error)]
pub enum TogglError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("request returned an error status: {0}")]
    Status(StatusCode),
    #[error("failed to parse response: {0}")]
    Parse(String),
    #[error("no project id resolved for '{0}'")]
    UnresolvedProject(String),
}

/// Toggl APIと通信するためのrepository trait。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TogglRepository {
    /// workspace内のプロジェクト一覧を取得する。
    async fn read_projects(&self) -> Result<Vec<Project>, TogglError>;

    /// 実行中のtime entryを作成する。
    async fn create_time_entry(&self, entry: NewTimeEntry) -> Result<TimeEntry, TogglError>;

    /// 指定されたtime entryを停止する。
    async fn stop_time_entry(&self, id: i64) -> Result<TimeEntry, TogglError>;

    /// 指定されたtime entryを削除し、HTTPステータスコードを返す。
    ///
    /// 削除の成否はレスポンスボディではなくステータスコードで判定するため、
    /// 非2xxのステータスもErrにはせずそのまま返す。
    async fn delete_time_entry(&self, id: i64) -> Result<StatusCode, TogglError>;
}

/// Toggl APIと通信するためのクライアント。
///
/// # Examples
///
/// ```
/// let client = TogglClient::new(&config);
/// let projects = client.read_projects().await.unwrap();
/// ```
pub struct TogglClient {
    client: Client,
    api_url: String,
    api_token: String,
    workspace_id: i64,
    timeout: Duration,
}

impl TogglClient {
    /// 新しい`TogglClient`を返す。
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.clone(),
            api_token: config.api_token.clone(),
            workspace_id: config.workspace_id,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// workspace配下のリソースを指すURLを組み立てる。
    fn workspace_url(&self, path: &str) -> String {
        format!("{}/workspaces/{}{}", self.api_url, self.workspace_id, path)
    }

    /// 認証ヘッダーとタイムアウトを設定したリクエストを準備する。
    ///
    /// タイムアウトが指定されない場合は設定済みの既定値を利用する。
    fn request(&self, method: Method, path: &str, timeout: Option<Duration>) -> RequestBuilder {
        self.client
            .request(method, self.workspace_url(path))
            .header(AUTHORIZATION, basic_auth_value(&self.api_token))
            .header(CONTENT_TYPE, "application/json")
            .timeout(timeout.unwrap_or(self.timeout))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<T, TogglError> {
        let response = self
            .request(Method::GET, path, timeout)
            .send()
            .await
            .map_err(transport_error)?;

        parse_json(response).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<T, TogglError> {
        let response = self
            .request(Method::POST, path, timeout)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        parse_json(response).await
    }

    // PATCHは停止のみに利用するためボディは送らない
    async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<T, TogglError> {
        let response = self
            .request(Method::PATCH, path, timeout)
            .send()
            .await
            .map_err(transport_error)?;

        parse_json(response).await
    }

    async fn delete(
        &self,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<StatusCode, TogglError> {
        let response = self
            .request(Method::DELETE, path, timeout)
            .send()
            .await
            .map_err(transport_error)?;

        Ok(response.status())
    }
}

#[async_trait]
impl TogglRepository for TogglClient {
    async fn read_projects(&self) -> Result<Vec<Project>, TogglError> {
        let projects: Vec<Project> = self.get("/projects", None).await?;
        info!("length of projects: {}", projects.len());

        Ok(projects)
    }

    async fn create_time_entry(&self, entry: NewTimeEntry) -> Result<TimeEntry, TogglError> {
        self.post("/time_entries", &entry, None).await
    }

    async fn stop_time_entry(&self, id: i64) -> Result<TimeEntry, TogglError> {
        self.patch(&format!("/time_entries/{}/stop", id), None).await
    }

    async fn delete_time_entry(&self, id: i64) -> Result<StatusCode, TogglError> {
        self.delete(&format!("/time_entries/{}", id), None).await
    }
}

/// 2xxのレスポンスボディをJSONとしてデシリアライズする。
async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, TogglError> {
    let status = response.status();
    if !status.is_success() {
        return Err(TogglError::Status(status));
    }

    response
        .json::<T>()
        .await
        .map_err(|err| TogglError::Parse(err.to_string()))
}

/// reqwestの送信エラーをタイムアウトとそれ以外の転送エラーに振り分ける。
fn transport_error(err: reqwest::Error) -> TogglError {
    if err.is_timeout() {
        TogglError::Timeout
    } else {
        TogglError::Transport(err.to_string())
    }
}
