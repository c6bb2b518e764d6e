use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use practice_core::model::{Question, QuestionId};
use reqwest::Client;
use serde::Deserialize;

use crate::error::CatalogError;

/// File name of the catalog under an HTTP base URL.
pub const CATALOG_FILE_NAME: &str = "questions.json";

//
// ─── WIRE FORMAT ───────────────────────────────────────────────────────────────
//

/// One question as it appears in the catalog JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: String,
    pub subject: String,
    pub topic: String,
    pub source: String,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_option_index: i64,
    #[serde(default)]
    pub solution: Option<String>,
}

impl QuestionRecord {
    /// Convert to a domain question. An empty solution means "no solution".
    ///
    /// Returns `None` when the answer key does not point at an option.
    #[must_use]
    pub fn into_question(self) -> Option<Question> {
        let correct_option = usize::try_from(self.correct_option_index).ok()?;
        let solution = self.solution.filter(|text| !text.trim().is_empty());

        let question = Question {
            id: QuestionId::new(self.id),
            subject: self.subject,
            topic: self.topic,
            source: self.source,
            text: self.question_text,
            options: self.options,
            correct_option,
            solution,
        };
        question.has_valid_answer_key().then_some(question)
    }
}

//
// ─── SOURCES ───────────────────────────────────────────────────────────────────
//

/// Where the catalog comes from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the raw catalog records.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on transport or parse failure.
    async fn fetch(&self) -> Result<Vec<QuestionRecord>, CatalogError>;

    /// Human-readable location, used in logs.
    fn describe(&self) -> String;
}

/// Catalog served over HTTP.
#[derive(Clone, Debug)]
pub struct HttpCatalogSource {
    client: Client,
    url: String,
}

impl HttpCatalogSource {
    /// `location` is either the catalog URL itself (ending in `.json`) or a
    /// base URL under which `questions.json` lives.
    #[must_use]
    pub fn new(location: &str) -> Self {
        Self::with_client(location, Client::new())
    }

    fn with_client(location: &str, client: Client) -> Self {
        let url = if location.ends_with(".json") {
            location.to_string()
        } else {
            format!("{}/{CATALOG_FILE_NAME}", location.trim_end_matches('/'))
        };
        Self { client, url }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Vec<QuestionRecord>, CatalogError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Catalog stored in a local JSON file.
#[derive(Clone, Debug)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn fetch(&self) -> Result<Vec<QuestionRecord>, CatalogError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

//
// ─── LOADER ────────────────────────────────────────────────────────────────────
//

/// Fetches the catalog once per session, optionally retrying.
#[derive(Clone)]
pub struct CatalogLoader {
    source: Arc<dyn CatalogSource>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl CatalogLoader {
    #[must_use]
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            max_attempts: 1,
            retry_delay: Duration::from_millis(500),
        }
    }

    /// Allow up to `attempts` fetches (at least one), `delay` apart.
    #[must_use]
    pub fn with_retries(mut self, attempts: u32, delay: Duration) -> Self {
        self.max_attempts = attempts.max(1);
        self.retry_delay = delay;
        self
    }

    /// Fetch and convert the catalog. Records with a broken answer key are skipped.
    ///
    /// # Errors
    ///
    /// Returns the last `CatalogError` once every attempt has failed.
    pub async fn load(&self) -> Result<Vec<Question>, CatalogError> {
        let location = self.source.describe();
        let mut attempt = 1;
        let records = loop {
            match self.source.fetch().await {
                Ok(records) => break records,
                Err(err) if attempt < self.max_attempts => {
                    tracing::warn!(%location, attempt, error = %err, "catalog fetch failed, retrying");
                    attempt += 1;
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(err) => {
                    tracing::error!(%location, attempt, error = %err, "catalog fetch failed");
                    return Err(err);
                }
            }
        };

        let total = records.len();
        let questions: Vec<Question> = records
            .into_iter()
            .filter_map(|record| {
                let id = record.id.clone();
                let question = record.into_question();
                if question.is_none() {
                    tracing::warn!(%id, "skipping question with invalid answer key");
                }
                question
            })
            .collect();

        tracing::info!(%location, total, usable = questions.len(), "catalog loaded");
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    const CATALOG_JSON: &str = r#"[
        {"id": "p1", "subject": "Physics", "topic": "Optics", "source": "NCERT",
         "questionText": "Speed of light?", "options": ["c", "2c"],
         "correctOptionIndex": 0, "solution": "By definition."},
        {"id": "b1", "subject": "Biology", "topic": "Cells", "source": "NCERT",
         "questionText": "Powerhouse?", "options": ["Mitochondria", "Nucleus"],
         "correctOptionIndex": 0, "solution": ""},
        {"id": "x1", "subject": "Physics", "topic": "Optics", "source": "NCERT",
         "questionText": "Broken", "options": ["a"], "correctOptionIndex": 4}
    ]"#;

    struct FlakySource {
        failures_left: AtomicU32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl CatalogSource for FlakySource {
        async fn fetch(&self) -> Result<Vec<QuestionRecord>, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failures_left.load(Ordering::SeqCst) > 0 {
                self.failures_left.fetch_sub(1, Ordering::SeqCst);
                return Err(CatalogError::Io(std::io::Error::other("offline")));
            }
            Ok(serde_json::from_str(CATALOG_JSON)?)
        }

        fn describe(&self) -> String {
            "flaky".into()
        }
    }

    fn flaky(failures: u32) -> Arc<FlakySource> {
        Arc::new(FlakySource {
            failures_left: AtomicU32::new(failures),
            calls: AtomicU32::new(0),
        })
    }

    #[test]
    fn empty_solution_means_none() {
        let records: Vec<QuestionRecord> = serde_json::from_str(CATALOG_JSON).unwrap();
        let biology = records[1].clone().into_question().unwrap();
        assert_eq!(biology.solution, None);
        let physics = records[0].clone().into_question().unwrap();
        assert_eq!(physics.solution(), Some("By definition."));
        assert_eq!(physics.text, "Speed of light?");
    }

    #[test]
    fn invalid_answer_key_is_rejected() {
        let records: Vec<QuestionRecord> = serde_json::from_str(CATALOG_JSON).unwrap();
        assert!(records[2].clone().into_question().is_none());
    }

    #[test]
    fn http_source_appends_catalog_file() {
        assert_eq!(
            HttpCatalogSource::new("http://localhost:3000/").url(),
            "http://localhost:3000/questions.json"
        );
        assert_eq!(
            HttpCatalogSource::new("https://example.com/data/bank.json").url(),
            "https://example.com/data/bank.json"
        );
    }

    /// Serve one canned HTTP response on a local port and return its base URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0_u8; 4096];
            let _ = socket.read(&mut request).await.unwrap();
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}")
    }

    fn local_source(base: &str) -> HttpCatalogSource {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpCatalogSource::with_client(base, client)
    }

    #[tokio::test]
    async fn http_source_decodes_json_body() {
        let base = serve_once("200 OK", CATALOG_JSON).await;
        let loader = CatalogLoader::new(Arc::new(local_source(&base)));
        let ids: Vec<String> = loader
            .load()
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["p1", "b1"]);
    }

    #[tokio::test]
    async fn http_source_reports_status() {
        let base = serve_once("404 Not Found", "[]").await;
        let err = local_source(&base).fetch().await.unwrap_err();
        assert!(matches!(err, CatalogError::HttpStatus(status) if status.as_u16() == 404));
    }

    #[tokio::test]
    async fn file_source_loads_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CATALOG_FILE_NAME);
        std::fs::write(&path, CATALOG_JSON).unwrap();

        let loader = CatalogLoader::new(Arc::new(FileCatalogSource::new(&path)));
        let questions = loader.load().await.unwrap();
        // The loader keeps every subject; the allow-list is the store's job.
        let ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "b1"]);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CatalogLoader::new(Arc::new(FileCatalogSource::new(
            dir.path().join("absent.json"),
        )));
        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[tokio::test]
    async fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CATALOG_FILE_NAME);
        std::fs::write(&path, "{\"not\": \"a list\"}").unwrap();
        let loader = CatalogLoader::new(Arc::new(FileCatalogSource::new(&path)));
        assert!(matches!(loader.load().await, Err(CatalogError::Parse(_))));
    }

    #[tokio::test]
    async fn single_attempt_by_default() {
        let source = flaky(1);
        let loader = CatalogLoader::new(source.clone());
        assert!(loader.load().await.is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let source = flaky(2);
        let loader =
            CatalogLoader::new(source.clone()).with_retries(3, Duration::from_millis(1));
        let questions = loader.load().await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }
}
