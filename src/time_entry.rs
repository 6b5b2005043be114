use serde::{Deserialize, Serialize};

use crate::datetime;

/// time entryの作成元としてToggl APIへ送るクライアント識別子。
pub const CREATED_WITH: &str = "clocktoggl";

/// 実行中のtime entryを表すdurationのセンチネル値。
pub const RUNNING_DURATION: i64 = -1;

/// Toggl APIのプロジェクト情報をデシリアライズするための構造体。
#[derive(Clone, Debug, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
}

/// Toggl APIのtime entryレスポンスをデシリアライズするための構造体。
#[derive(Clone, Debug, Deserialize)]
pub struct TimeEntry {
    pub id: i64,
    pub description: String,
    pub project_id: Option<i64>,
    pub start: String,
    #[serde(default)]
    pub wid: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub duration: i64,
}

/// time entryの作成リクエストをシリアライズするための構造体。
///
/// フィールドはToggl APIのリクエストボディと1対1に対応する。
#[derive(Clone, Debug, Serialize)]
pub struct NewTimeEntry {
    pub description: String,
    pub project_id: Option<i64>,
    pub created_with: String,
    pub start: String,
    pub wid: i64,
    pub tags: Vec<String>,
    pub duration: i64,
}

impl NewTimeEntry {
    /// 現在のローカル時刻を開始時刻とする実行中のtime entryを組み立てる。
    ///
    /// # Arguments
    ///
    /// * `description` - time entryの説明
    /// * `project_id` - 紐づけるプロジェクトのid。未解決の場合はNone
    /// * `wid` - workspace id
    /// * `tags` - 付与するタグ
    pub fn start_now(
        description: String,
        project_id: Option<i64>,
        wid: i64,
        tags: Vec<String>,
    ) -> Self {
        let start = datetime::format_clock_start(&datetime::now_local());

        Self {
            description,
            project_id,
            created_with: CREATED_WITH.to_string(),
            start,
            wid,
            tags,
            duration: RUNNING_DURATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use serde_json::json;

    use super::{NewTimeEntry, TimeEntry};
    use crate::datetime::mock_datetime;

    /// 作成リクエストのJSONが期待するフィールドのみを過不足なく含むことを確認する。
    #[test]
    fn test_new_time_entry_json_round_trip() {
        mock_datetime::set_mock_time(
            DateTime::parse_from_rfc3339("2024-01-02T09:30:00+02:00").unwrap(),
        );

        let entry = NewTimeEntry::start_now(
            "Write report".to_string(),
            Some(7),
            42,
            vec!["work".to_string()],
        );
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(
            value,
            json!({
                "description": "Write report",
                "project_id": 7,
                "created_with": "clocktoggl",
                "start": "2024-01-02T09:30:00+02:00",
                "wid": 42,
                "tags": ["work"],
                "duration": -1,
            })
        );

        mock_datetime::clear_mock_time();
    }

    /// プロジェクトが未解決の場合にproject_idがnullとして送られることを確認する。
    #[test]
    fn test_new_time_entry_without_project() {
        let entry = NewTimeEntry::start_now("Write report".to_string(), None, 42, vec![]);
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["project_id"], serde_json::Value::Null);
        assert_eq!(value["duration"], json!(-1));
    }

    /// レスポンスにwidやtagsが含まれない場合でもデシリアライズできることを確認する。
    #[test]
    fn test_time_entry_deserialize_with_missing_fields() {
        let body = json!({
            "id": 555,
            "description": "Write report",
            "project_id": null,
            "start": "2024-01-02T09:30:00+02:00",
            "duration": -1,
        });

        let entry: TimeEntry = serde_json::from_value(body).unwrap();

        assert_eq!(entry.id, 555);
        assert_eq!(entry.wid, 0);
        assert!(entry.tags.is_empty());
    }
}
