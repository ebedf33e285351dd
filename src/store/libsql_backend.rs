//! libSQL backend — async `Database` trait implementation.
//!
//! Supports local file and in-memory databases. A single connection is
//! reused for all operations; `libsql::Connection` is `Send + Sync` and
//! safe for concurrent async use.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::model::{Author, Quote, QuoteRecord};
use crate::store::migrations;
use crate::store::traits::{Database, QuoteFilter};

/// libSQL database backend.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let backend = Self::from_db(db).await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        Self::from_db(db).await
    }

    async fn from_db(db: LibSqlDatabase) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        // Referential integrity between quotes and authors is enforced here,
        // not only by the handler-level guard.
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to enable foreign keys: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        Ok(backend)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Map an execute error, classifying constraint violations.
fn map_exec_err(op: &str, e: libsql::Error) -> DatabaseError {
    let msg = e.to_string();
    if msg.contains("UNIQUE constraint") || msg.contains("FOREIGN KEY constraint") {
        DatabaseError::Constraint(format!("{op}: {msg}"))
    } else {
        DatabaseError::Query(format!("{op}: {msg}"))
    }
}

/// Convert `Option<&str>` to a libsql Value.
fn opt_text(s: Option<&str>) -> libsql::Value {
    match s {
        Some(s) => libsql::Value::Text(s.to_string()),
        None => libsql::Value::Null,
    }
}

/// Convert `Option<i64>` to a libsql Value.
fn opt_int(n: Option<i64>) -> libsql::Value {
    match n {
        Some(n) => libsql::Value::Integer(n),
        None => libsql::Value::Null,
    }
}

fn row_to_author(row: &libsql::Row) -> Result<Author, libsql::Error> {
    Ok(Author {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

/// Map a joined quotes/authors row to a QuoteRecord.
///
/// Column order matches RECORD_COLUMNS:
/// 0:q.id, 1:q.author_id, 2:q.text, 3:q.rating, 4:a.id, 5:a.name
fn row_to_record(row: &libsql::Row) -> Result<QuoteRecord, libsql::Error> {
    Ok(QuoteRecord {
        quote: Quote {
            id: row.get(0)?,
            author_id: row.get(1)?,
            text: row.get(2)?,
            rating: row.get(3)?,
        },
        author: Author {
            id: row.get(4)?,
            name: row.get(5)?,
        },
    })
}

// ── Trait implementation ────────────────────────────────────────────

const AUTHOR_COLUMNS: &str = "id, name";

const RECORD_COLUMNS: &str = "q.id, q.author_id, q.text, q.rating, a.id, a.name";

const RECORD_FROM: &str = "FROM quotes q JOIN authors a ON a.id = q.author_id";

#[async_trait]
impl Database for LibSqlBackend {
    async fn init_schema(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    // ── Authors ─────────────────────────────────────────────────────

    async fn insert_author(&self, name: &str) -> Result<Author, DatabaseError> {
        let conn = self.conn();
        conn.execute("INSERT INTO authors (name) VALUES (?1)", params![name])
            .await
            .map_err(|e| map_exec_err("insert_author", e))?;

        let id = conn.last_insert_rowid();
        debug!(author_id = id, "Author inserted");
        Ok(Author {
            id,
            name: name.to_string(),
        })
    }

    async fn get_author(&self, id: i64) -> Result<Option<Author>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {AUTHOR_COLUMNS} FROM authors WHERE id = ?1"),
                params![id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_author: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let author = row_to_author(&row)
                    .map_err(|e| DatabaseError::Query(format!("get_author row parse: {e}")))?;
                Ok(Some(author))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_author: {e}"))),
        }
    }

    async fn list_authors(&self) -> Result<Vec<Author>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {AUTHOR_COLUMNS} FROM authors ORDER BY id"),
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_authors: {e}")))?;

        let mut authors = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("list_authors: {e}")))?
        {
            let author = row_to_author(&row)
                .map_err(|e| DatabaseError::Query(format!("list_authors row parse: {e}")))?;
            authors.push(author);
        }
        Ok(authors)
    }

    // ── Quotes ──────────────────────────────────────────────────────

    async fn insert_quote(&self, author_id: i64, text: &str) -> Result<Quote, DatabaseError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO quotes (author_id, text) VALUES (?1, ?2)",
            params![author_id, text],
        )
        .await
        .map_err(|e| map_exec_err("insert_quote", e))?;

        let id = conn.last_insert_rowid();
        debug!(quote_id = id, author_id, "Quote inserted");
        Ok(Quote {
            id,
            author_id,
            text: text.to_string(),
            rating: 1,
        })
    }

    async fn get_quote(&self, id: i64) -> Result<Option<QuoteRecord>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {RECORD_COLUMNS} {RECORD_FROM} WHERE q.id = ?1"),
                params![id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_quote: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let record = row_to_record(&row)
                    .map_err(|e| DatabaseError::Query(format!("get_quote row parse: {e}")))?;
                Ok(Some(record))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_quote: {e}"))),
        }
    }

    async fn list_quotes(&self) -> Result<Vec<QuoteRecord>, DatabaseError> {
        self.query_records(
            format!("SELECT {RECORD_COLUMNS} {RECORD_FROM} ORDER BY q.id"),
            (),
            "list_quotes",
        )
        .await
    }

    async fn update_quote(&self, quote: &Quote) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                "UPDATE quotes SET author_id = ?1, text = ?2, rating = ?3 WHERE id = ?4",
                params![quote.author_id, quote.text.as_str(), quote.rating, quote.id],
            )
            .await
            .map_err(|e| map_exec_err("update_quote", e))?;

        debug!(quote_id = quote.id, "Quote updated");
        Ok(())
    }

    async fn delete_quote(&self, id: i64) -> Result<bool, DatabaseError> {
        let affected = self
            .conn()
            .execute("DELETE FROM quotes WHERE id = ?1", params![id])
            .await
            .map_err(|e| DatabaseError::Query(format!("delete_quote: {e}")))?;

        debug!(quote_id = id, deleted = affected > 0, "Quote delete attempted");
        Ok(affected > 0)
    }

    async fn filter_quotes(&self, filter: &QuoteFilter) -> Result<Vec<QuoteRecord>, DatabaseError> {
        self.query_records(
            format!(
                "SELECT {RECORD_COLUMNS} {RECORD_FROM} \
                 WHERE (?1 IS NULL OR a.name = ?1) \
                   AND (?2 IS NULL OR q.rating >= ?2) \
                 ORDER BY q.id"
            ),
            params![
                opt_text(filter.author_name.as_deref()),
                opt_int(filter.min_rating)
            ],
            "filter_quotes",
        )
        .await
    }
}

impl LibSqlBackend {
    /// Run a query producing joined quote/author rows.
    async fn query_records(
        &self,
        sql: String,
        params: impl libsql::params::IntoParams,
        op: &str,
    ) -> Result<Vec<QuoteRecord>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(&sql, params)
            .await
            .map_err(|e| DatabaseError::Query(format!("{op}: {e}")))?;

        let mut records = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("{op}: {e}")))?
        {
            let record = row_to_record(&row)
                .map_err(|e| DatabaseError::Query(format!("{op} row parse: {e}")))?;
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> LibSqlBackend {
        LibSqlBackend::new_memory().await.unwrap()
    }

    #[tokio::test]
    async fn insert_and_get_author() {
        let db = test_db().await;
        let author = db.insert_author("Seneca").await.unwrap();
        assert!(author.id > 0);

        let fetched = db.get_author(author.id).await.unwrap().unwrap();
        assert_eq!(fetched, author);
    }

    #[tokio::test]
    async fn get_author_missing_returns_none() {
        let db = test_db().await;
        assert!(db.get_author(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_author_name_is_constraint_violation() {
        let db = test_db().await;
        db.insert_author("Seneca").await.unwrap();

        let err = db.insert_author("Seneca").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Constraint(_)), "got {err:?}");

        // The first row is the only one
        let authors = db.list_authors().await.unwrap();
        assert_eq!(authors.len(), 1);
    }

    #[tokio::test]
    async fn list_authors_empty_and_ordered() {
        let db = test_db().await;
        assert!(db.list_authors().await.unwrap().is_empty());

        db.insert_author("Seneca").await.unwrap();
        db.insert_author("Epictetus").await.unwrap();

        let authors = db.list_authors().await.unwrap();
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].name, "Seneca");
        assert_eq!(authors[1].name, "Epictetus");
    }

    #[tokio::test]
    async fn insert_and_get_quote_with_author() {
        let db = test_db().await;
        let author = db.insert_author("Seneca").await.unwrap();
        let quote = db
            .insert_quote(author.id, "We suffer more often in imagination than in reality.")
            .await
            .unwrap();
        assert_eq!(quote.rating, 1);

        let record = db.get_quote(quote.id).await.unwrap().unwrap();
        assert_eq!(record.quote.text, quote.text);
        assert_eq!(record.author, author);
    }

    #[tokio::test]
    async fn insert_quote_unknown_author_is_constraint_violation() {
        let db = test_db().await;
        let err = db.insert_quote(42, "orphan").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Constraint(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn update_quote_overwrites_all_fields() {
        let db = test_db().await;
        let seneca = db.insert_author("Seneca").await.unwrap();
        let epictetus = db.insert_author("Epictetus").await.unwrap();
        let quote = db.insert_quote(seneca.id, "First draft.").await.unwrap();

        let updated = Quote {
            id: quote.id,
            author_id: epictetus.id,
            text: String::new(),
            rating: 4,
        };
        db.update_quote(&updated).await.unwrap();

        let record = db.get_quote(quote.id).await.unwrap().unwrap();
        // Empty text is a real overwrite, not a no-op
        assert_eq!(record.quote.text, "");
        assert_eq!(record.quote.rating, 4);
        assert_eq!(record.author.id, epictetus.id);
    }

    #[tokio::test]
    async fn delete_quote_twice() {
        let db = test_db().await;
        let author = db.insert_author("Seneca").await.unwrap();
        let quote = db.insert_quote(author.id, "Ephemeral.").await.unwrap();

        assert!(db.delete_quote(quote.id).await.unwrap());
        assert!(db.get_quote(quote.id).await.unwrap().is_none());
        assert!(!db.delete_quote(quote.id).await.unwrap());
    }

    #[tokio::test]
    async fn filter_quotes_by_author_and_rating() {
        let db = test_db().await;
        let seneca = db.insert_author("Seneca").await.unwrap();
        let epictetus = db.insert_author("Epictetus").await.unwrap();

        let q1 = db.insert_quote(seneca.id, "One").await.unwrap();
        db.insert_quote(seneca.id, "Two").await.unwrap();
        let q3 = db.insert_quote(epictetus.id, "Three").await.unwrap();

        db.update_quote(&Quote { rating: 5, ..q1.clone() }).await.unwrap();
        db.update_quote(&Quote { rating: 3, ..q3.clone() }).await.unwrap();

        // No criteria — everything
        let all = db.filter_quotes(&QuoteFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        // By author name
        let by_author = db
            .filter_quotes(&QuoteFilter {
                author_name: Some("Seneca".into()),
                min_rating: None,
            })
            .await
            .unwrap();
        assert_eq!(by_author.len(), 2);

        // By minimum rating
        let by_rating = db
            .filter_quotes(&QuoteFilter {
                author_name: None,
                min_rating: Some(3),
            })
            .await
            .unwrap();
        assert_eq!(by_rating.len(), 2);

        // Both criteria AND-combined
        let both = db
            .filter_quotes(&QuoteFilter {
                author_name: Some("Seneca".into()),
                min_rating: Some(4),
            })
            .await
            .unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].quote.id, q1.id);

        // Unknown author matches nothing
        let none = db
            .filter_quotes(&QuoteFilter {
                author_name: Some("Marcus".into()),
                min_rating: None,
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn open_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("nested").join("quotes.db");
        let db = LibSqlBackend::new_local(&db_path).await.unwrap();
        assert!(db_path.exists());
        drop(db);
    }
}
