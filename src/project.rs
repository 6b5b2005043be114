use std::collections::HashMap;

use crate::time_entry::Project;

/// プロジェクト名からidを引くためのキャッシュ。
///
/// 更新は全置き換えのみで、部分的な更新は行わない。既定プロジェクトの
/// 選択状態もここで保持する。
#[derive(Debug, Default)]
pub struct ProjectCache {
    name_to_id: HashMap<String, i64>,
    default_project_id: Option<i64>,
}

impl ProjectCache {
    /// 新しい空の`ProjectCache`を返す。
    pub fn new() -> Self {
        Self::default()
    }

    /// プロジェクト一覧からマッピングを作り直す。
    ///
    /// 既存のエントリーはすべて破棄する。同名のプロジェクトが複数ある場合は
    /// 一覧の後方にあるものが優先される。
    pub fn rebuild(&mut self, projects: Vec<Project>) {
        self.name_to_id = projects
            .into_iter()
            .map(|project| (project.name, project.id))
            .collect();
    }

    /// プロジェクト名からidを引く。
    pub fn lookup(&self, name: &str) -> Option<i64> {
        self.name_to_id.get(name).copied()
    }

    /// 既定プロジェクトとして指定された名前のプロジェクトを選択する。
    ///
    /// 名前が解決できない場合は選択状態を変更せずNoneを返す。
    pub fn select(&mut self, name: &str) -> Option<i64> {
        let id = self.lookup(name)?;
        self.default_project_id = Some(id);

        Some(id)
    }

    /// 選択済みの既定プロジェクトのidを返す。
    pub fn default_project_id(&self) -> Option<i64> {
        self.default_project_id
    }

    /// 把握しているプロジェクト名の一覧を名前順で返す。
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.name_to_id.keys().cloned().collect();
        names.sort();

        names
    }

    /// 把握しているプロジェクト数を返す。
    pub fn len(&self) -> usize {
        self.name_to_id.len()
    }
}

#[cfg(test)]
mod tests {
    use super::ProjectCache;
    use crate::time_entry::Project;

    /// テスト用のプロジェクトを作成する。
    fn project(name: &str, id: i64) -> Project {
        Project {
            id,
            name: name.to_string(),
        }
    }

    /// 取得した一覧から名前でidが引けることを確認する。
    #[test]
    fn test_rebuild_and_lookup() {
        let mut cache = ProjectCache::new();
        cache.rebuild(vec![project("A", 1), project("B", 2)]);

        assert_eq!(cache.lookup("A"), Some(1));
        assert_eq!(cache.lookup("B"), Some(2));
        assert_eq!(cache.lookup("C"), None);
    }

    /// 再構築で古いエントリーが破棄されることを確認する。
    #[test]
    fn test_rebuild_replaces_previous_mapping() {
        let mut cache = ProjectCache::new();
        cache.rebuild(vec![project("A", 1)]);
        cache.rebuild(vec![project("B", 2)]);

        assert_eq!(cache.lookup("A"), None);
        assert_eq!(cache.lookup("B"), Some(2));
    }

    /// 同名のプロジェクトは一覧の後方が優先されることを確認する。
    #[test]
    fn test_rebuild_last_occurrence_wins() {
        let mut cache = ProjectCache::new();
        cache.rebuild(vec![project("A", 1), project("A", 9)]);

        assert_eq!(cache.lookup("A"), Some(9));
        assert_eq!(cache.len(), 1);
    }

    /// 既定プロジェクトの選択と未知の名前の扱いを確認する。
    #[test]
    fn test_select_default_project() {
        let mut cache = ProjectCache::new();
        cache.rebuild(vec![project("A", 1), project("B", 2)]);

        assert_eq!(cache.select("B"), Some(2));
        assert_eq!(cache.default_project_id(), Some(2));

        assert_eq!(cache.select("C"), None);
        assert_eq!(cache.default_project_id(), Some(2));
    }

    /// 名前一覧がソートされて返ることを確認する。
    #[test]
    fn test_names_sorted() {
        let mut cache = ProjectCache::new();
        cache.rebuild(vec![project("B", 2), project("A", 1)]);

        assert_eq!(cache.names(), vec!["A".to_string(), "B".to_string()]);
    }
}
