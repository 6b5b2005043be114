use std::sync::{Arc, Mutex};

use log::info;
use reqwest::StatusCode;
use tokio::task::JoinHandle;

use crate::notify::Notifier;
use crate::project::ProjectCache;
use crate::time_entry::{NewTimeEntry, TimeEntry};
use crate::toggl::{TogglError, TogglRepository};

/// clockイベントを処理し、実行中のtime entryをToggl APIと同期するセッション。
///
/// ローカル状態として保持するtime entryは常に高々1件で、リクエスト完了時の
/// コールバックによる上書きは後勝ちとする。発行済みリクエストの順序制御や
/// キャンセルは行わない。
pub struct ClockSession<T, N> {
    toggl: Arc<T>,
    notifier: Arc<N>,
    projects: Arc<Mutex<ProjectCache>>,
    current: Arc<Mutex<Option<TimeEntry>>>,
    workspace_id: i64,
}

impl<T, N> ClockSession<T, N>
where
    T: TogglRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    /// 新しい`ClockSession`を返す。
    ///
    /// # Arguments
    ///
    /// * `toggl` - Toggl APIと通信するためのリポジトリ
    /// * `notifier` - 処理結果をユーザーへ通知するためのnotifier
    /// * `workspace_id` - 操作対象のworkspace id
    pub fn new(toggl: Arc<T>, notifier: Arc<N>, workspace_id: i64) -> Self {
        Self {
            toggl,
            notifier,
            projects: Arc::new(Mutex::new(ProjectCache::new())),
            current: Arc::new(Mutex::new(None)),
            workspace_id,
        }
    }

    /// clock-inイベントを処理し、time entryの作成を開始する。
    ///
    /// プロジェクトは指定された名前、なければ選択済みの既定プロジェクトで
    /// 解決する。作成が成功したレスポンスのtime entryをローカル状態に
    /// 設定する。実行中のtime entryがある状態で呼ばれた場合も停止はせず、
    /// 新しいtime entryを開始する。
    pub fn clock_in(
        &self,
        description: String,
        tags: Vec<String>,
        project: Option<String>,
    ) -> JoinHandle<()> {
        let project_id = self.resolve_project_id(project.as_deref());
        let entry = NewTimeEntry::start_now(description, project_id, self.workspace_id, tags);

        let toggl = Arc::clone(&self.toggl);
        let notifier = Arc::clone(&self.notifier);
        let current = Arc::clone(&self.current);
        tokio::spawn(async move {
            match toggl.create_time_entry(entry).await {
                Ok(started) => {
                    info!("Time entry started: id={}", started.id);
                    let description = started.description.clone();
                    *current.lock().unwrap() = Some(started);
                    notifier.notify(&format!("Clocked in: {}", description));
                }
                Err(err) => {
                    notifier.notify(&format!("Failed to start time entry: {}", err));
                }
            }
        })
    }

    /// clock-outイベントを処理し、実行中のtime entryを停止する。
    ///
    /// ローカル状態はリクエストの発行と同時に解除し、コールバックでは
    /// 通知のみを行う。実行中のtime entryがない場合はリクエストを発行せず
    /// Noneを返す。
    pub fn clock_out(&self) -> Option<JoinHandle<()>> {
        let entry = self.current.lock().unwrap().take()?;

        let toggl = Arc::clone(&self.toggl);
        let notifier = Arc::clone(&self.notifier);
        Some(tokio::spawn(async move {
            match toggl.stop_time_entry(entry.id).await {
                Ok(stopped) => {
                    info!(
                        "Time entry stopped: id={}, duration={}",
                        stopped.id, stopped.duration
                    );
                    notifier.notify(&format!("Clocked out: {}", stopped.description));
                }
                Err(err) => {
                    notifier.notify(&format!(
                        "Failed to stop time entry {}: {}",
                        entry.id, err
                    ));
                }
            }
        }))
    }

    /// clock-cancelイベントを処理し、実行中のtime entryを削除する。
    ///
    /// ローカル状態はステータス200が確認できた場合のみ解除する。それ以外の
    /// ステータスや失敗時は実行中のまま残す。実行中のtime entryがない場合は
    /// リクエストを発行せずNoneを返す。
    pub fn clock_cancel(&self) -> Option<JoinHandle<()>> {
        let id = self.current.lock().unwrap().as_ref().map(|entry| entry.id)?;

        let toggl = Arc::clone(&self.toggl);
        let notifier = Arc::clone(&self.notifier);
        let current = Arc::clone(&self.current);
        Some(tokio::spawn(async move {
            match toggl.delete_time_entry(id).await {
                Ok(status) if status == StatusCode::OK => {
                    info!("Time entry canceled: id={}", id);
                    *current.lock().unwrap() = None;
                    notifier.notify("Clock canceled.");
                }
                Ok(status) => {
                    notifier.notify(&format!(
                        "Cancel request for time entry {} returned status {}.",
                        id, status
                    ));
                }
                Err(err) => {
                    notifier.notify(&format!("Failed to cancel time entry {}: {}", id, err));
                }
            }
        }))
    }

    /// プロジェクト一覧を取得してキャッシュを更新する。
    ///
    /// 失敗した場合はキャッシュを変更しない。
    pub async fn refresh_projects(&self) {
        refresh_projects_task(
            Arc::clone(&self.toggl),
            Arc::clone(&self.notifier),
            Arc::clone(&self.projects),
        )
        .await;
    }

    /// プロジェクト一覧の更新をバックグラウンドで開始する。
    pub fn refresh_projects_background(&self) -> JoinHandle<()> {
        tokio::spawn(refresh_projects_task(
            Arc::clone(&self.toggl),
            Arc::clone(&self.notifier),
            Arc::clone(&self.projects),
        ))
    }

    /// 既定プロジェクトとして指定された名前のプロジェクトを選択する。
    pub fn select_project(&self, name: &str) -> Option<i64> {
        self.projects.lock().unwrap().select(name)
    }

    /// 把握しているプロジェクト名の一覧を返す。
    pub fn project_names(&self) -> Vec<String> {
        self.projects.lock().unwrap().names()
    }

    /// ローカル状態が保持している実行中のtime entryを返す。
    pub fn current_entry(&self) -> Option<TimeEntry> {
        self.current.lock().unwrap().clone()
    }

    /// clock-inに紐づけるプロジェクトidを解決する。
    ///
    /// 明示された名前が解決できない場合は通知した上でプロジェクトなしで
    /// 処理を続行する。
    fn resolve_project_id(&self, name: Option<&str>) -> Option<i64> {
        let cache = self.projects.lock().unwrap();
        match name {
            Some(name) => {
                let id = cache.lookup(name);
                if id.is_none() {
                    self.notifier
                        .notify(&TogglError::UnresolvedProject(name.to_string()).to_string());
                }
                id
            }
            None => cache.default_project_id(),
        }
    }
}

/// プロジェクト一覧の取得とキャッシュの再構築を行う。
async fn refresh_projects_task<T, N>(
    toggl: Arc<T>,
    notifier: Arc<N>,
    projects: Arc<Mutex<ProjectCache>>,
) where
    T: TogglRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    match toggl.read_projects().await {
        Ok(list) => {
            let mut cache = projects.lock().unwrap();
            cache.rebuild(list);
            notifier.notify(&format!("Project list updated ({} projects).", cache.len()));
        }
        Err(err) => {
            notifier.notify(&format!("Failed to refresh project list: {}", err));
        }
    }
}
