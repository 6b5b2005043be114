use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Toggl APIのサービスルート。
pub const DEFAULT_API_URL: &str = "https://api.track.toggl.com/api/v9";

/// リクエストの既定タイムアウト秒数。
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// 設定ファイルの内容をデシリアライズするための構造体。
///
/// すべてのフィールドは省略可能で、不足分は環境変数または既定値で補う。
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_token: Option<String>,
    workspace_id: Option<i64>,
    timeout_secs: Option<u64>,
    api_url: Option<String>,
    default_project: Option<String>,
}

/// 解決済みのアプリケーション設定。
#[derive(Clone, Debug)]
pub struct Config {
    pub api_token: String,
    pub workspace_id: i64,
    pub timeout_secs: u64,
    pub api_url: String,
    pub default_project: Option<String>,
}

impl Config {
    /// 設定を読み込んで解決する。
    ///
    /// 設定ファイルを読み込んだ上で、環境変数`TOGGL_API_TOKEN`と
    /// `TOGGL_WORKSPACE_ID`があればそちらを優先する。どちらからも
    /// 得られない必須項目はエラーになる。
    ///
    /// # Arguments
    ///
    /// * `path` - 設定ファイルのパス。Noneの場合は既定の場所を参照する
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path.map(PathBuf::from).or_else(default_config_path);
        let file = match config_path {
            Some(config_path) if config_path.exists() => {
                let content = fs::read_to_string(&config_path).with_context(|| {
                    format!("Failed to read config file: {}", config_path.display())
                })?;
                serde_json::from_str::<FileConfig>(&content).with_context(|| {
                    format!("Failed to parse config file: {}", config_path.display())
                })?
            }
            _ => FileConfig::default(),
        };

        Self::resolve(
            file,
            env::var("TOGGL_API_TOKEN").ok(),
            env::var("TOGGL_WORKSPACE_ID").ok(),
        )
    }

    /// ファイルと環境変数の値から設定を解決する。
    fn resolve(
        file: FileConfig,
        env_token: Option<String>,
        env_workspace_id: Option<String>,
    ) -> Result<Self> {
        let api_token = env_token
            .or(file.api_token)
            .context("TOGGL_API_TOKEN must be set")?;
        let workspace_id = match env_workspace_id {
            Some(raw) => raw
                .parse::<i64>()
                .with_context(|| format!("Failed to parse TOGGL_WORKSPACE_ID: {}", raw))?,
            None => file
                .workspace_id
                .context("TOGGL_WORKSPACE_ID must be set")?,
        };

        Ok(Self {
            api_token,
            workspace_id,
            timeout_secs: file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            api_url: file.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            default_project: file.default_project,
        })
    }
}

/// 既定の設定ファイルのパスを返す。
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("clocktoggl").join("config.json"))
}
