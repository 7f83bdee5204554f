// tests/storage.rs
//! SQLite sink: one table per term, dropped and recreated on every run.

use pretty_assertions::assert_eq;
use sqlx::Row;
use wikiharvest::{CategoryName, ItemTitle, Record, SqliteStore, TaxonomyTerm};

fn record(title: &str, views: u64, categories: &[&str]) -> Record {
    Record {
        title: ItemTitle::new(title),
        summary: format!("{} is an office suite.", title),
        view_count: views,
        image_path: format!("Images/{}.png", title),
        categories: categories.iter().map(|c| CategoryName::new(*c)).collect(),
        url: format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_")),
    }
}

#[tokio::test]
async fn test_rows_land_in_a_table_named_after_the_term() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::connect(&dir.path().join("wiki-scraping.db"))
        .await
        .unwrap();
    let term = TaxonomyTerm::new("Office suites for Linux").unwrap();

    let written = store
        .replace_collection(
            &term,
            &[
                record("LibreOffice", 1200, &["Office suites", "Free software"]),
                record("Calligra Suite", 40, &[]),
            ],
        )
        .await
        .unwrap();
    assert_eq!(written, 2);

    let rows = sqlx::query(
        r#"SELECT title, summary, page_views, image_path, categories, url
           FROM "Office suites for Linux" ORDER BY rowid"#,
    )
    .fetch_all(store.pool())
    .await
    .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get::<String, _>("title"), "LibreOffice");
    assert_eq!(rows[0].get::<i64, _>("page_views"), 1200);
    assert_eq!(rows[0].get::<String, _>("image_path"), "Images/LibreOffice.png");
    assert_eq!(
        rows[0].get::<String, _>("categories"),
        r#"["Office suites","Free software"]"#
    );
    assert_eq!(
        rows[1].get::<String, _>("url"),
        "https://en.wikipedia.org/wiki/Calligra_Suite"
    );
    assert_eq!(rows[1].get::<String, _>("categories"), "[]");
}

#[tokio::test]
async fn test_second_run_replaces_the_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("harvest.db");
    let term = TaxonomyTerm::new("Category:Text editors").unwrap();

    let store = SqliteStore::connect(&path).await.unwrap();
    store
        .replace_collection(
            &term,
            &[record("Vim", 10, &[]), record("Emacs", 10, &[]), record("Nano", 1, &[])],
        )
        .await
        .unwrap();
    store
        .replace_collection(&term, &[record("Kate", 5, &["KDE"])])
        .await
        .unwrap();

    let titles: Vec<String> = sqlx::query_scalar(r#"SELECT title FROM "Text editors""#)
        .fetch_all(store.pool())
        .await
        .unwrap();
    assert_eq!(titles, vec!["Kate".to_string()]);
}

#[tokio::test]
async fn test_empty_harvest_leaves_an_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::connect(&dir.path().join("empty.db"))
        .await
        .unwrap();
    let term = TaxonomyTerm::new("Say \"cheese\"").unwrap();

    assert_eq!(store.replace_collection(&term, &[]).await.unwrap(), 0);

    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "Say ""cheese""""#)
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}
