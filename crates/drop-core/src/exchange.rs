//! Gated entry point for every operation on shared state.

use tracing::debug;

use crate::auth::{AuthGate, Session};
use crate::error::Result;
use crate::files::{FileRecord, FileStore};
use crate::text::TextSlot;

/// Bundles the gate with the resources it protects.
///
/// Every method that touches the file store or the text slot checks the
/// caller's session first and does nothing else when that check fails.
pub struct Exchange {
    gate: AuthGate,
    files: FileStore,
    text: TextSlot,
}

impl Exchange {
    pub fn new(gate: AuthGate, files: FileStore, text: TextSlot) -> Self {
        Self { gate, files, text }
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub fn text(&self) -> &TextSlot {
        &self.text
    }

    pub fn authenticate(&self, attempt: &str, session: &mut Session) -> Result<()> {
        self.gate.authenticate(attempt, session)
    }

    pub fn logout(&self, session: &mut Session) {
        self.gate.logout(session);
    }

    pub fn is_authenticated(&self, session: &Session) -> bool {
        self.gate.is_authenticated(session)
    }

    pub async fn list_files(&self, session: &Session) -> Result<Vec<FileRecord>> {
        self.gate.require(session)?;
        let records = self.files.list().await?;
        debug!("Listed {} files", records.len());
        Ok(records)
    }

    /// Store an upload and return the name it was saved under.
    pub async fn upload(&self, session: &Session, name: &str, bytes: &[u8]) -> Result<String> {
        self.gate.require(session)?;
        self.files.store(name, bytes).await
    }

    pub async fn download(&self, session: &Session, name: &str) -> Result<Vec<u8>> {
        self.gate.require(session)?;
        self.files.retrieve(name).await
    }

    pub async fn delete(&self, session: &Session, name: &str) -> Result<()> {
        self.gate.require(session)?;
        self.files.delete(name).await
    }

    pub async fn shared_text(&self, session: &Session) -> Result<String> {
        self.gate.require(session)?;
        self.text.get().await
    }

    pub async fn set_shared_text(&self, session: &Session, content: &str) -> Result<()> {
        self.gate.require(session)?;
        self.text.set(content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    const SECRET: &str = "open sesame";

    async fn create_test_exchange() -> (TempDir, Exchange) {
        let temp_dir = TempDir::new().unwrap();
        let gate = AuthGate::new(SECRET, Duration::from_secs(3600));
        let files = FileStore::open(temp_dir.path().join("uploads"), 1024 * 1024)
            .await
            .unwrap();
        let text = TextSlot::open(temp_dir.path().join("shared_texts/shared_text.txt"))
            .await
            .unwrap();
        (temp_dir, Exchange::new(gate, files, text))
    }

    fn logged_in(exchange: &Exchange) -> Session {
        let mut session = Session::new();
        exchange.authenticate(SECRET, &mut session).unwrap();
        session
    }

    #[tokio::test]
    async fn test_every_gated_operation_requires_auth() {
        let (temp_dir, exchange) = create_test_exchange().await;
        let admin = logged_in(&exchange);
        exchange.upload(&admin, "existing.txt", b"data").await.unwrap();
        exchange.set_shared_text(&admin, "original").await.unwrap();

        let anonymous = Session::new();
        assert!(matches!(exchange.list_files(&anonymous).await, Err(Error::Auth)));
        assert!(matches!(
            exchange.upload(&anonymous, "new.txt", b"x").await,
            Err(Error::Auth)
        ));
        assert!(matches!(
            exchange.download(&anonymous, "existing.txt").await,
            Err(Error::Auth)
        ));
        assert!(matches!(
            exchange.delete(&anonymous, "existing.txt").await,
            Err(Error::Auth)
        ));
        assert!(matches!(exchange.shared_text(&anonymous).await, Err(Error::Auth)));
        assert!(matches!(
            exchange.set_shared_text(&anonymous, "hijacked").await,
            Err(Error::Auth)
        ));

        // Nothing changed
        assert!(!temp_dir.path().join("uploads/new.txt").exists());
        assert!(temp_dir.path().join("uploads/existing.txt").exists());
        assert_eq!(exchange.shared_text(&admin).await.unwrap(), "original");
    }

    #[tokio::test]
    async fn test_auth_is_checked_before_validation() {
        let (_temp_dir, exchange) = create_test_exchange().await;
        let anonymous = Session::new();

        assert!(matches!(
            exchange.upload(&anonymous, "../x", b"x").await,
            Err(Error::Auth)
        ));
        assert!(matches!(
            exchange.set_shared_text(&anonymous, "").await,
            Err(Error::Auth)
        ));
    }

    #[tokio::test]
    async fn test_logout_revokes_access() {
        let (_temp_dir, exchange) = create_test_exchange().await;
        let mut session = logged_in(&exchange);
        assert!(exchange.list_files(&session).await.is_ok());

        exchange.logout(&mut session);

        assert!(!exchange.is_authenticated(&session));
        assert!(matches!(exchange.list_files(&session).await, Err(Error::Auth)));
    }

    #[tokio::test]
    async fn test_wrong_password_grants_nothing() {
        let (_temp_dir, exchange) = create_test_exchange().await;
        let mut session = Session::new();

        assert!(matches!(
            exchange.authenticate("guess", &mut session),
            Err(Error::Auth)
        ));
        assert!(matches!(exchange.list_files(&session).await, Err(Error::Auth)));
    }

    #[tokio::test]
    async fn test_upload_twice_lists_suffixed_copy_first() {
        let (temp_dir, exchange) = create_test_exchange().await;
        let session = logged_in(&exchange);

        let first = exchange.upload(&session, "report.pdf", b"v1").await.unwrap();
        // Keep the two uploads apart on coarse filesystem clocks
        std::fs::File::options()
            .write(true)
            .open(temp_dir.path().join("uploads/report.pdf"))
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(60))
            .unwrap();
        let second = exchange.upload(&session, "report.pdf", b"v2").await.unwrap();

        assert_eq!(first, "report.pdf");
        assert_eq!(second, "report_1.pdf");

        let names: Vec<_> = exchange
            .list_files(&session)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["report_1.pdf", "report.pdf"]);

        assert_eq!(exchange.download(&session, "report.pdf").await.unwrap(), b"v1");
        assert_eq!(exchange.download(&session, "report_1.pdf").await.unwrap(), b"v2");
    }

    #[tokio::test]
    async fn test_delete_then_download_is_not_found() {
        let (_temp_dir, exchange) = create_test_exchange().await;
        let session = logged_in(&exchange);
        exchange.upload(&session, "tmp.txt", b"x").await.unwrap();

        exchange.delete(&session, "tmp.txt").await.unwrap();

        assert!(exchange.list_files(&session).await.unwrap().is_empty());
        assert!(matches!(
            exchange.download(&session, "tmp.txt").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_shared_text_replace_semantics() {
        let (_temp_dir, exchange) = create_test_exchange().await;
        let session = logged_in(&exchange);

        assert_eq!(exchange.shared_text(&session).await.unwrap(), "");
        exchange.set_shared_text(&session, "hello").await.unwrap();
        exchange.set_shared_text(&session, "world").await.unwrap();
        assert_eq!(exchange.shared_text(&session).await.unwrap(), "world");

        assert!(matches!(
            exchange.set_shared_text(&session, "   ").await,
            Err(Error::Validation(_))
        ));
        assert_eq!(exchange.shared_text(&session).await.unwrap(), "world");
    }
}
