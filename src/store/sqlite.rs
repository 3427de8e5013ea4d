use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{NewsreelError, Result};
use crate::domain::Article;
use crate::store::ArticleStore;

const ARTICLE_COLUMNS: &str =
    "id, title, description, content, url, image_url, published_at, source";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|e| NewsreelError::Other(format!("Migration failed: {}", e)))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            NewsreelError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn row_to_article(row: &Row<'_>) -> rusqlite::Result<Article> {
        let text = |idx: usize| -> rusqlite::Result<String> {
            Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
        };

        Ok(Article {
            id: row.get(0)?,
            title: text(1)?,
            description: text(2)?,
            content: text(3)?,
            url: text(4)?,
            image_url: text(5)?,
            published_at: text(6)?,
            source: text(7)?,
        })
    }
}

impl ArticleStore for SqliteStore {
    fn upsert_many(&self, articles: &[Article]) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut count = 0;

        {
            let mut stmt = tx.prepare(&format!(
                "INSERT OR REPLACE INTO articles ({ARTICLE_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
            ))?;
            for article in articles {
                count += stmt.execute(params![
                    article.id,
                    article.title,
                    article.description,
                    article.content,
                    article.url,
                    article.image_url,
                    article.published_at,
                    article.source
                ])?;
            }
        }

        tx.commit()?;
        Ok(count)
    }

    fn select_all(&self) -> Result<Vec<Article>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY rowid"
        ))?;

        let articles = stmt
            .query_map([], Self::row_to_article)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(articles)
    }

    fn get_article(&self, id: &str) -> Result<Option<Article>> {
        let conn = self.lock()?;
        let article = conn
            .query_row(
                &format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = ?1"),
                params![id],
                Self::row_to_article,
            )
            .optional()?;

        Ok(article)
    }

    fn clear_all(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM articles", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(n: usize) -> Article {
        let mut article = Article::from_url(format!("https://example.com/story-{}", n));
        article.title = format!("Story {}", n);
        article.source = "Example Wire".into();
        article
    }

    #[test]
    fn test_upsert_and_select_all() {
        let store = SqliteStore::in_memory().unwrap();
        let batch: Vec<Article> = (0..3).map(article).collect();

        assert_eq!(store.upsert_many(&batch).unwrap(), 3);

        let stored = store.select_all().unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0].title, "Story 0");
        assert_eq!(stored[2].title, "Story 2");
        assert_eq!(stored[1].source, "Example Wire");
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_many(&[article(1)]).unwrap();

        let mut edited = article(1);
        edited.title = "Story 1 (updated)".into();
        store.upsert_many(&[edited]).unwrap();

        let stored = store.select_all().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "Story 1 (updated)");
    }

    #[test]
    fn test_select_all_follows_write_order() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_many(&[article(1), article(2)]).unwrap();
        store.upsert_many(&[article(0)]).unwrap();

        let titles: Vec<String> = store
            .select_all()
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["Story 1", "Story 2", "Story 0"]);
    }

    #[test]
    fn test_clear_all_is_idempotent() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_many(&[article(1), article(2)]).unwrap();

        store.clear_all().unwrap();
        assert!(store.select_all().unwrap().is_empty());

        store.clear_all().unwrap();
        assert!(store.select_all().unwrap().is_empty());
    }

    #[test]
    fn test_get_article() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_many(&[article(7)]).unwrap();

        let found = store.get_article("https://example.com/story-7").unwrap();
        assert_eq!(found.unwrap().title, "Story 7");

        let missing = store.get_article("https://example.com/nope").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_null_columns_read_as_empty() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .conn
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO articles (id, title) VALUES (?1, ?2)",
                params!["https://example.com/bare", "Bare"],
            )
            .unwrap();

        let stored = store.get_article("https://example.com/bare").unwrap().unwrap();
        assert_eq!(stored.title, "Bare");
        assert_eq!(stored.description, "");
        assert_eq!(stored.source, "");
        assert_eq!(stored.published_at, "");
    }

    #[test]
    fn test_empty_batch() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.upsert_many(&[]).unwrap(), 0);
        assert!(store.select_all().unwrap().is_empty());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");

        {
            let store = SqliteStore::new(&path).unwrap();
            store.upsert_many(&[article(1), article(2)]).unwrap();
        }

        let reopened = SqliteStore::new(&path).unwrap();
        assert_eq!(reopened.select_all().unwrap().len(), 2);
    }
}
