use anyhow::{bail, Context, Result};

/// ホストから届くclockイベントを表す列挙型。
#[derive(Debug, PartialEq)]
pub enum ClockEvent {
    In {
        description: String,
        tags: Vec<String>,
        project: Option<String>,
    },
    Out,
    Cancel,
    Projects,
    Select { name: String },
    Status,
    Quit,
}

/// 1行のテキストをclockイベントにパースする。
///
/// `in`の引数は`+`で始まるトークンをタグ、`@`で始まるトークンをプロジェクト名、
/// それ以外を説明として解釈する。
///
/// # Examples
///
/// ```
/// let event = parse_event("in Write report +work @Acme").unwrap();
/// ```
pub fn parse_event(line: &str) -> Result<ClockEvent> {
    let mut tokens = line.split_whitespace();
    let command = tokens.next().context("empty input")?;

    match command {
        "in" => {
            let mut description = Vec::new();
            let mut tags = Vec::new();
            let mut project = None;
            for token in tokens {
                if let Some(tag) = token.strip_prefix('+') {
                    tags.push(tag.to_string());
                } else if let Some(name) = token.strip_prefix('@') {
                    project = Some(name.to_string());
                } else {
                    description.push(token);
                }
            }
            if description.is_empty() {
                bail!("clock-in requires a description");
            }

            Ok(ClockEvent::In {
                description: description.join(" "),
                tags,
                project,
            })
        }
        "out" => Ok(ClockEvent::Out),
        "cancel" => Ok(ClockEvent::Cancel),
        "projects" => Ok(ClockEvent::Projects),
        "select" => {
            let name = tokens.collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                bail!("select requires a project name");
            }

            Ok(ClockEvent::Select { name })
        }
        "status" => Ok(ClockEvent::Status),
        "quit" | "exit" => Ok(ClockEvent::Quit),
        other => bail!("unknown command: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::parse_event;
    use super::ClockEvent;

    /// 正常系のテスト。
    #[rstest]
    #[case::plain_in(
        "in Write report",
        ClockEvent::In {
            description: "Write report".to_string(),
            tags: vec![],
            project: None,
        },
    )]
    #[case::in_with_tags_and_project(
        "in Write report +work +deep @Acme",
        ClockEvent::In {
            description: "Write report".to_string(),
            tags: vec!["work".to_string(), "deep".to_string()],
            project: Some("Acme".to_string()),
        },
    )]
    #[case::out("out", ClockEvent::Out)]
    #[case::cancel("cancel", ClockEvent::Cancel)]
    #[case::projects("projects", ClockEvent::Projects)]
    #[case::select(
        "select Acme Support",
        ClockEvent::Select { name: "Acme Support".to_string() },
    )]
    #[case::status("status", ClockEvent::Status)]
    #[case::quit("quit", ClockEvent::Quit)]
    #[case::exit("exit", ClockEvent::Quit)]
    fn test_parse_event(#[case] line: &str, #[case] expected: ClockEvent) {
        assert_eq!(parse_event(line).unwrap(), expected);
    }

    /// 異常系のテスト。
    #[rstest]
    #[case::empty("")]
    #[case::unknown("restart")]
    #[case::in_without_description("in +work @Acme")]
    #[case::select_without_name("select")]
    fn test_parse_event_error(#[case] line: &str) {
        assert!(parse_event(line).is_err());
    }
}
