//! Integration tests for tutorius.
//! The assistant service is played by in-process doubles: a scripted
//! `Completion` for session behavior, and a one-shot HTTP responder on a local
//! socket for the client.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    use tutorius::chat::{ClassChat, Message, Renderer, SendOutcome, Sender, SkipReason};
    use tutorius::client::CompletionRequest;
    use tutorius::{
        AssistantBinding, AssistantService, ClassCatalog, ClassId, ClassRecord, Completion, Error,
        Result, StaticCatalog, StaticDirectory,
    };

    /// Completion double that answers with a fixed result and records calls.
    struct Mock {
        reply: std::result::Result<String, Error>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl Mock {
        fn new(reply: std::result::Result<String, Error>) -> Self {
            Self {
                reply,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl Completion for Mock {
        async fn complete(&self, text: &str, class_code: &str) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((text.to_string(), class_code.to_string()));
            self.reply.clone()
        }
    }

    /// Counts appended messages as they are reported and tracks loading.
    #[derive(Default)]
    struct Tally {
        messages: Vec<Message>,
        errors: Vec<String>,
        loading: bool,
        loading_spans: usize,
    }

    impl Renderer for Tally {
        fn print_header(&mut self, _: &ClassRecord) {}

        fn print_sidebar(&mut self, _: &ClassRecord) {}

        fn print_message(&mut self, message: &Message) {
            assert!(!self.loading, "reply reported while still loading");
            self.messages.push(message.clone());
        }

        fn start_loading(&mut self) {
            assert!(!self.loading);
            self.loading = true;
        }

        fn finish_loading(&mut self) {
            assert!(self.loading);
            self.loading = false;
            self.loading_spans += 1;
        }

        fn print_error(&mut self, error: &str) {
            self.errors.push(error.to_string());
        }

        fn print_info(&mut self, _: &str) {}
    }

    fn intro_catalog() -> Arc<StaticCatalog> {
        Arc::new(
            StaticCatalog::from_json(
                r#"{"classes":[{"id":1,"Class Code":"CS101","Class Name":"Intro"}]}"#,
            )
            .unwrap(),
        )
    }

    fn intro_bindings() -> Arc<StaticDirectory> {
        Arc::new(StaticDirectory::new().with_binding(
            "CS101",
            AssistantBinding::new("asst_cs101", Some("vs_cs101".to_string())),
        ))
    }

    fn open(reply: std::result::Result<String, Error>) -> ClassChat<Mock> {
        ClassChat::open(intro_catalog(), intro_bindings(), ClassId(1), Mock::new(reply)).unwrap()
    }

    #[tokio::test]
    async fn hello_hi_scenario() {
        let catalog = intro_catalog();
        assert_eq!(
            catalog.lookup(ClassId(1)),
            Some(ClassRecord::new(1, "CS101", "Intro"))
        );

        let mut chat = open(Ok("**Hi**".to_string()));
        let mut tally = Tally::default();
        chat.set_input("Hello");
        let outcome = chat.send(&mut tally).await;

        assert_eq!(outcome, SendOutcome::Replied);
        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[0].text, "Hello");
        assert_eq!(messages[1].sender, Sender::Assistant);
        assert_eq!(messages[1].text, "<p><strong>Hi</strong></p>\n");
        assert_eq!(chat.state().input(), "");
        assert!(!chat.state().is_loading());
        assert!(chat.state().error().is_none());
        assert_eq!(tally.loading_spans, 1);
        assert_eq!(
            chat.completion().calls.lock().unwrap().as_slice(),
            &[("Hello".to_string(), "CS101".to_string())]
        );
    }

    #[tokio::test]
    async fn timeout_scenario() {
        let mut chat = open(Err(Error::timeout("timeout", None)));
        let mut tally = Tally::default();
        let outcome = chat.send_text("Hello", &mut tally).await;

        assert_eq!(outcome, SendOutcome::Failed("timeout".to_string()));
        assert_eq!(chat.state().error(), Some("timeout"));
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].sender, Sender::User);
        assert!(!chat.state().is_loading());
        assert_eq!(tally.errors, vec!["timeout".to_string()]);
        assert!(tally.messages.is_empty());
    }

    #[test]
    fn unknown_class_scenario() {
        let result = ClassChat::open(
            intro_catalog(),
            intro_bindings(),
            ClassId(99),
            Mock::new(Ok(String::new())),
        );
        let err = result.err().expect("class 99 should not resolve");
        assert!(err.is_not_found());
        assert_eq!(err.message(), "Class not found");
    }

    #[tokio::test]
    async fn appends_per_exchange() {
        let mut ok = open(Ok("fine".to_string()));
        let mut failing = open(Err(Error::connection("refused", None)));
        let mut tally = Tally::default();
        for i in 0..3 {
            ok.send_text(&format!("question {i}"), &mut tally).await;
            failing.send_text(&format!("question {i}"), &mut tally).await;
        }
        assert_eq!(ok.messages().len(), 6);
        assert_eq!(failing.messages().len(), 3);
        let senders: Vec<Sender> = ok.messages().iter().map(|m| m.sender).collect();
        assert_eq!(
            senders,
            vec![
                Sender::User,
                Sender::Assistant,
                Sender::User,
                Sender::Assistant,
                Sender::User,
                Sender::Assistant,
            ]
        );
        assert!(failing.messages().iter().all(|m| m.sender == Sender::User));
    }

    #[tokio::test]
    async fn skipped_sends_touch_nothing() {
        let mut chat = open(Ok("x".to_string()));
        let mut tally = Tally::default();
        for input in ["", " ", "\t\n"] {
            let outcome = chat.send_text(input, &mut tally).await;
            assert_eq!(outcome, SendOutcome::Skipped(SkipReason::EmptyInput));
        }
        assert_eq!(chat.completion().call_count(), 0);
        assert!(chat.messages().is_empty());
        assert_eq!(tally.loading_spans, 0);

        let mut unbound = ClassChat::open(
            intro_catalog(),
            Arc::new(StaticDirectory::new()),
            ClassId(1),
            Mock::new(Ok("x".to_string())),
        )
        .unwrap();
        let outcome = unbound.send_text("Hello", &mut tally).await;
        assert_eq!(outcome, SendOutcome::Skipped(SkipReason::Unbound));
        assert_eq!(unbound.completion().call_count(), 0);
        assert!(unbound.messages().is_empty());
    }

    #[tokio::test]
    async fn new_chat_after_traffic() {
        let mut chat = open(Ok("x".to_string()));
        let mut tally = Tally::default();
        chat.send_text("one", &mut tally).await;
        chat.send_text("two", &mut tally).await;
        chat.new_chat();
        assert!(chat.messages().is_empty());
        chat.new_chat();
        assert!(chat.messages().is_empty());
        assert!(chat.binding().is_some());
    }

    /// Serves one HTTP request with `status` and `body`, handing the raw
    /// request back through the returned channel.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
        });
        (format!("http://127.0.0.1:{port}/api"), rx)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(split) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..split]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        request.len() >= split + 4 + content_length
    }

    fn service(base_url: String) -> AssistantService {
        AssistantService::with_options(
            Some("secret".to_string()),
            Some(base_url),
            Some(Duration::from_secs(5)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn client_posts_message_and_class_code() {
        let (base_url, request) = serve_once("200 OK", r#"{"text":"**Hi**"}"#).await;
        let reply = service(base_url).complete("Hello", "CS101").await.unwrap();
        assert_eq!(reply, "**Hi**");

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /api/chat HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer secret"));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let sent: CompletionRequest = serde_json::from_str(body).unwrap();
        assert_eq!(
            sent,
            CompletionRequest {
                message: "Hello".to_string(),
                class_code: "CS101".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn client_surfaces_service_error_message() {
        let (base_url, _request) = serve_once(
            "503 Service Unavailable",
            r#"{"error":{"type":"overloaded","message":"assistant is busy"}}"#,
        )
        .await;
        let err = service(base_url).complete("Hello", "CS101").await.unwrap_err();
        assert!(err.is_server_error());
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.message(), "assistant is busy");
    }

    #[tokio::test]
    async fn client_uses_raw_body_without_error_envelope() {
        let (base_url, _request) = serve_once("418 I'm a teapot", "short and stout").await;
        let err = service(base_url).complete("Hello", "CS101").await.unwrap_err();
        assert_eq!(err.status_code(), Some(418));
        assert_eq!(err.message(), "short and stout");
    }

    #[tokio::test]
    async fn client_rejects_malformed_success_body() {
        let (base_url, _request) = serve_once("200 OK", r#"{"unexpected":true}"#).await;
        let err = service(base_url).complete("Hello", "CS101").await.unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
    }

    #[tokio::test]
    async fn session_over_http_surfaces_error_verbatim() {
        let (base_url, _request) = serve_once(
            "500 Internal Server Error",
            r#"{"error":{"message":"vector store unavailable"}}"#,
        )
        .await;
        let mut chat = ClassChat::open(intro_catalog(), intro_bindings(), ClassId(1), service(base_url))
            .unwrap();
        let mut tally = Tally::default();
        let outcome = chat.send_text("Hello", &mut tally).await;
        assert_eq!(
            outcome,
            SendOutcome::Failed("vector store unavailable".to_string())
        );
        assert_eq!(chat.messages().len(), 1);
    }
}
