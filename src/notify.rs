use std::io::Write;
use std::sync::Mutex;

use log::warn;

/// clockイベントの結果をユーザーへ通知するためのtrait。
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    /// メッセージを通知する。
    ///
    /// 通知はベストエフォートで行い、失敗しても呼び出し元へは伝播しない。
    fn notify(&self, message: &str);
}

/// 通知を1行ずつwriterへ書き出す。
pub struct ConsoleNotifier<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> ConsoleNotifier<W> {
    /// 新しい`ConsoleNotifier`を返す。
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> Notifier for ConsoleNotifier<W> {
    fn notify(&self, message: &str) {
        let mut writer = self.writer.lock().unwrap();
        if let Err(err) = writeln!(writer, "{}", message) {
            warn!("Failed to write notification: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ConsoleNotifier;
    use super::Notifier;

    /// 通知が1行ずつ書き出されることを確認する。
    #[test]
    fn test_notify_writes_lines() {
        let notifier = ConsoleNotifier::new(Vec::new());

        notifier.notify("Clocked in.");
        notifier.notify("Clocked out.");

        let written = notifier.writer.into_inner().unwrap();
        assert_eq!(
            String::from_utf8(written).unwrap(),
            "Clocked in.\nClocked out.\n"
        );
    }
}
