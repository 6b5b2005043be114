use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Toggl APIのBasic認証ヘッダー値を生成する。
///
/// トークンに`:api_token`を連結してbase64エンコードした値を返す。
/// トークンの検証は行わないため、空文字列でも形式上有効なヘッダー値になる。
///
/// # Examples
///
/// ```
/// let value = basic_auth_value("my-token");
/// assert!(value.starts_with("Basic "));
/// ```
pub fn basic_auth_value(api_token: &str) -> String {
    let credential = format!("{}:api_token", api_token);
    format!("Basic {}", STANDARD.encode(credential))
}
