// src/storage/mod.rs
//! SQLite sink: one table per taxonomy term, replaced wholesale on each run.

use crate::error::AppError;
use crate::harvest::Record;
use crate::types::TaxonomyTerm;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// A connection pool over one database file.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file at `path`.
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Drops the term's table, recreates it and inserts `records`, all in
    /// one transaction. Returns the number of rows inserted.
    pub async fn replace_collection(
        &self,
        term: &TaxonomyTerm,
        records: &[Record],
    ) -> Result<usize, AppError> {
        let table = quote_identifier(term.as_str());
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!(
            "CREATE TABLE {} (
                title TEXT,
                summary TEXT,
                page_views INTEGER,
                image_path TEXT,
                categories TEXT,
                url TEXT
            )",
            table
        ))
        .execute(&mut *tx)
        .await?;

        let insert = format!(
            "INSERT INTO {} (title, summary, page_views, image_path, categories, url)
             VALUES (?, ?, ?, ?, ?, ?)",
            table
        );
        for record in records {
            let categories = serde_json::to_string(&record.categories)?;
            sqlx::query(&insert)
                .bind(record.title.as_str())
                .bind(&record.summary)
                .bind(i64::try_from(record.view_count).unwrap_or(i64::MAX))
                .bind(&record.image_path)
                .bind(categories)
                .bind(&record.url)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        log::info!("Stored {} row(s) in table {}", records.len(), table);
        Ok(records.len())
    }
}

/// Double-quoted SQL identifier with embedded quotes doubled.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
