// crates/gemchat-server/src/cli/chat.rs
// Terminal front end driving the chat widget against a running relay

use anyhow::{Context, Result};
use gemchat_types::ChatMessage;
use gemchat_widget::{
    AttachmentFile, ChatWidget, ComposeError, EntryKind, ExchangeTransport, RelayClient,
    TranscriptEvent,
};
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinSet;
use tracing::{debug, warn};

const HELP: &str = "Commands: /image <path> attach an image, /remove drop it, /quit exit";

pub async fn run_chat(relay_url: &str) -> Result<()> {
    let widget = ChatWidget::new(RelayClient::new(relay_url));
    let events = widget.subscribe().await;
    let renderer = tokio::spawn(render(events));

    println!("gemchat - talking to {}", relay_url);
    println!("{}", HELP);

    drive(widget, BufReader::new(tokio::io::stdin())).await?;

    // the widget is gone, so the event stream closes once drained
    if let Err(e) = renderer.await {
        warn!(error = %e, "Renderer task failed");
    }
    Ok(())
}

/// Feed input lines to the widget until `/quit` or end of input, then wait
/// for every reply still in flight.
async fn drive<T, R>(widget: ChatWidget<T>, input: R) -> Result<()>
where
    T: ExchangeTransport + 'static,
    R: AsyncBufRead + Unpin,
{
    let mut sends = JoinSet::new();
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();

        match parse_command(line) {
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Remove => widget.remove_attachment().await,
            Command::Image(path) => stage(&widget, Path::new(path)).await,
            Command::Send => {
                // render on the read loop so messages keep input order
                let pending = match widget.begin_send(line).await {
                    Ok(pending) => pending,
                    Err(ComposeError::Empty) => continue,
                };
                let widget = widget.clone();
                sends.spawn(async move {
                    let report = widget.complete_send(pending).await;
                    debug!(entry = ?report.outcome.entry(), "Send finished");
                });
            }
        }

        while sends.try_join_next().is_some() {}
    }

    while let Some(joined) = sends.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "Send task failed");
        }
    }
    Ok(())
}

#[derive(Debug, PartialEq)]
enum Command<'a> {
    Send,
    Image(&'a str),
    Remove,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Command<'_> {
    match line.split_once(' ') {
        Some(("/image", path)) => Command::Image(path.trim()),
        _ => match line {
            "/remove" => Command::Remove,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            _ => Command::Send,
        },
    }
}

async fn stage<T: ExchangeTransport>(widget: &ChatWidget<T>, path: &Path) {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("! cannot read {}: {}", path.display(), e);
            return;
        }
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Err(e) = widget.stage_attachment(AttachmentFile::new(name, bytes)).await {
        eprintln!("! {}", e);
    }
}

async fn render(mut events: broadcast::Receiver<TranscriptEvent>) {
    loop {
        match events.recv().await {
            Ok(TranscriptEvent::Appended(entry)) => {
                if let Some(line) = describe(&entry.kind) {
                    println!("{}", line);
                }
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => debug!(skipped, "Renderer lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}

fn describe(kind: &EntryKind) -> Option<String> {
    match kind {
        EntryKind::User { message } => Some(describe_user(message)),
        EntryKind::AttachmentPreview { file_name, .. } => {
            Some(format!("[attached {} - /remove to drop]", file_name))
        }
        EntryKind::Thinking => Some("gemini is thinking...".to_string()),
        EntryKind::Bot { text } => Some(format!("gemini> {}", text)),
        EntryKind::Error { text } => Some(format!("gemini> {}", text)),
    }
}

fn describe_user(message: &ChatMessage) -> String {
    let mut line = String::from("you> ");
    if let Some(image) = &message.image {
        line.push_str(&format!("[{} image] ", image.mime_type));
    }
    if let Some(text) = &message.text {
        line.push_str(text);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemchat_types::InlineData;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("/quit"), Command::Quit);
        assert_eq!(parse_command("/remove"), Command::Remove);
        assert_eq!(parse_command("/image cat.png"), Command::Image("cat.png"));
        assert_eq!(parse_command("hello there"), Command::Send);
        assert_eq!(parse_command(""), Command::Send);
    }

    #[test]
    fn test_describe_user_with_image() {
        let message = ChatMessage::user(
            Some("what is this".to_string()),
            Some(InlineData {
                mime_type: "image/png".to_string(),
                data: "AQID".to_string(),
            }),
        );
        assert_eq!(describe_user(&message), "you> [image/png image] what is this");
    }

    #[test]
    fn test_describe_bot_and_error() {
        let bot = EntryKind::Bot {
            text: "Hi".to_string(),
        };
        assert_eq!(describe(&bot).as_deref(), Some("gemini> Hi"));

        let error = EntryKind::Error {
            text: "Sorry, I encountered an error: boom".to_string(),
        };
        assert_eq!(
            describe(&error).as_deref(),
            Some("gemini> Sorry, I encountered an error: boom")
        );
    }

    // ============================================================================
    // Input loop tests
    // ============================================================================

    async fn relay_with_replies() -> wiremock::MockServer {
        use serde_json::json;
        use std::time::Duration;
        use wiremock::matchers::{body_partial_json, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({"message": "a"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"reply": "A"}))
                    .set_delay(Duration::from_millis(150)),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({"message": "b"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "B"})))
            .mount(&server)
            .await;
        server
    }

    fn summarize(entries: Vec<gemchat_widget::Entry>) -> Vec<String> {
        entries
            .into_iter()
            .map(|e| match e.kind {
                EntryKind::User { message } => format!("you:{}", message.text.unwrap_or_default()),
                EntryKind::Bot { text } => format!("bot:{}", text),
                other => format!("{:?}", other),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_fast_lines_each_send_in_order() {
        let relay = relay_with_replies().await;
        let widget = ChatWidget::new(RelayClient::new(&relay.uri()));

        drive(widget.clone(), &b"a\n\nb\n"[..]).await.unwrap();

        // both user lines render in input order; the slower reply lands last
        assert_eq!(
            summarize(widget.entries().await),
            vec!["you:a", "you:b", "bot:B", "bot:A"]
        );
    }

    #[tokio::test]
    async fn test_end_of_input_waits_for_replies() {
        let relay = relay_with_replies().await;
        let widget = ChatWidget::new(RelayClient::new(&relay.uri()));

        drive(widget.clone(), &b"a"[..]).await.unwrap();

        assert_eq!(summarize(widget.entries().await), vec!["you:a", "bot:A"]);
    }

    #[tokio::test]
    async fn test_quit_stops_reading() {
        let relay = relay_with_replies().await;
        let widget = ChatWidget::new(RelayClient::new(&relay.uri()));

        drive(widget.clone(), &b"/quit\nb\n"[..]).await.unwrap();

        assert!(widget.entries().await.is_empty());
    }
}
