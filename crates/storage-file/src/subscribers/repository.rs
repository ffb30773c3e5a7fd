use async_trait::async_trait;
use std::sync::Arc;

use crate::db::FileDb;
use ratecast_core::errors::Result;
use ratecast_core::subscribers::SubscriberRepositoryTrait;
use ratecast_core::RequestContext;

/// Default subscribers file name inside the data directory.
pub const DEFAULT_SUBSCRIBERS_FILE: &str = "emails.txt";

/// Subscribers stored one address per line, in insertion order.
pub struct SubscriberRepository {
    db: Arc<FileDb>,
    file: String,
}

impl SubscriberRepository {
    pub fn new(db: Arc<FileDb>, file: impl Into<String>) -> Self {
        SubscriberRepository {
            db,
            file: file.into(),
        }
    }
}

#[async_trait]
impl SubscriberRepositoryTrait for SubscriberRepository {
    async fn save(&self, ctx: &RequestContext, email: &str) -> Result<()> {
        ctx.check()?;
        Ok(self.db.append(&self.file, email).await?)
    }

    async fn list(&self, ctx: &RequestContext) -> Result<Vec<String>> {
        ctx.check()?;
        let contents = self.db.read(&self.file).await?;
        Ok(contents
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn exist(&self, ctx: &RequestContext, email: &str) -> Result<bool> {
        let emails = self.list(ctx).await?;
        Ok(emails.iter().any(|e| e == email))
    }

    async fn ping(&self, ctx: &RequestContext) -> Result<()> {
        ctx.check()?;
        Ok(self.db.ping().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratecast_core::errors::Error;
    use ratecast_core::CancellationSource;
    use tempfile::tempdir;

    fn repository(dir: &std::path::Path) -> SubscriberRepository {
        SubscriberRepository::new(Arc::new(FileDb::new(dir)), DEFAULT_SUBSCRIBERS_FILE)
    }

    #[tokio::test]
    async fn test_save_and_list_preserve_order() {
        let dir = tempdir().unwrap();
        let repo = repository(dir.path());
        let ctx = RequestContext::background();

        for email in ["c@x.io", "a@x.io", "b@x.io"] {
            repo.save(&ctx, email).await.unwrap();
        }

        assert_eq!(
            repo.list(&ctx).await.unwrap(),
            vec!["c@x.io", "a@x.io", "b@x.io"]
        );
    }

    #[tokio::test]
    async fn test_missing_file_lists_empty() {
        let dir = tempdir().unwrap();
        let repo = repository(dir.path());
        let ctx = RequestContext::background();

        assert!(repo.list(&ctx).await.unwrap().is_empty());
        assert!(!repo.exist(&ctx, "a@x.io").await.unwrap());
    }

    #[tokio::test]
    async fn test_blank_lines_skipped() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_SUBSCRIBERS_FILE),
            "a@x.io\n\nb@x.io\n\n",
        )
        .unwrap();
        let repo = repository(dir.path());

        assert_eq!(
            repo.list(&RequestContext::background()).await.unwrap(),
            vec!["a@x.io", "b@x.io"]
        );
    }

    #[tokio::test]
    async fn test_exist_is_exact() {
        let dir = tempdir().unwrap();
        let repo = repository(dir.path());
        let ctx = RequestContext::background();
        repo.save(&ctx, "user@example.com").await.unwrap();

        assert!(repo.exist(&ctx, "user@example.com").await.unwrap());
        assert!(!repo.exist(&ctx, "User@example.com").await.unwrap());
        assert!(!repo.exist(&ctx, "user@example.co").await.unwrap());
        assert!(!repo.exist(&ctx, "ser@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_unreachable_directory_is_store_error() {
        let dir = tempdir().unwrap();
        let repo = repository(&dir.path().join("missing"));
        let ctx = RequestContext::background();

        assert!(matches!(repo.ping(&ctx).await, Err(Error::Store(_))));
        assert!(matches!(
            repo.save(&ctx, "a@x.io").await,
            Err(Error::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_cancelled_context_skips_io() {
        let dir = tempdir().unwrap();
        let repo = repository(dir.path());
        let source = CancellationSource::new();
        source.cancel();

        assert!(matches!(
            repo.save(&source.context(), "a@x.io").await,
            Err(Error::Cancelled)
        ));
        assert!(repo
            .list(&RequestContext::background())
            .await
            .unwrap()
            .is_empty());
    }
}
