use chrono::{DateTime, FixedOffset};

#[cfg(not(test))]
/// ローカルタイムゾーンの現在時刻を取得する。
pub fn now_local() -> DateTime<FixedOffset> {
    chrono::Local::now().fixed_offset()
}

/// time entryの開始時刻をToggl APIへ送る形式に変換する。
///
/// `YYYY-MM-DDTHH:MM:SS`に続けて、コロン区切りのUTCオフセットを付与する。
pub fn format_clock_start(datetime: &DateTime<FixedOffset>) -> String {
    let local_time = datetime.format("%Y-%m-%dT%H:%M:%S").to_string();
    let offset = format_timezone_offset(&datetime.format("%z").to_string());

    format!("{}{}", local_time, offset)
}

/// `±HHMM`形式のUTCオフセットを`±HH:MM`形式に変換する。
///
/// 符号と時の2桁の後ろにコロンを挿入する。想定外の長さの場合はそのまま返す。
pub fn format_timezone_offset(raw_offset: &str) -> String {
    if raw_offset.len() < 5 {
        return raw_offset.to_string();
    }

    format!("{}:{}", &raw_offset[..3], &raw_offset[3..])
}

/// テスト時に利用するモック時間を取得する。
#[cfg(test)]
pub mod mock_datetime {
    use std::cell::RefCell;

    use chrono::Local;

    use super::DateTime;
    use super::FixedOffset;

    thread_local! {
        static MOCK_TIME: RefCell<Option<DateTime<FixedOffset>>> = RefCell::new(None);
    }

    /// モック時間を取得する。
    pub fn now_local() -> DateTime<FixedOffset> {
        MOCK_TIME.with(|cell| {
            cell.borrow()
                .as_ref()
                .cloned()
                .unwrap_or_else(|| Local::now().fixed_offset())
        })
    }

    /// モック時間を設定する。
    pub fn set_mock_time(time: DateTime<FixedOffset>) {
        MOCK_TIME.with(|cell| *cell.borrow_mut() = Some(time));
    }

    // 設定したモック時間をクリアする。
    pub fn clear_mock_time() {
        MOCK_TIME.with(|cell| *cell.borrow_mut() = None);
    }
}

#[cfg(test)]
pub use mock_datetime::now_local;
