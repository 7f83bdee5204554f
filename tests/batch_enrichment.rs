// tests/batch_enrichment.rs
//! Batched attribute passes and the full compose stage against an in-memory wiki.

mod common;

use common::{category_responder, pages_response, titles, FakeWiki};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::Arc;
use wikiharvest::{
    ApiQuery, AppError, BatchEnricher, CategoryListFetcher, CategoryName, HarvestConfig,
    Harvester, ItemTitle, PageImageFetcher, PageViewFetcher, SummaryFetcher, WikiRepository,
};

fn numbered_titles(n: usize) -> Vec<ItemTitle> {
    (1..=n).map(|i| ItemTitle::new(format!("Item {}", i))).collect()
}

#[tokio::test]
async fn test_batch_completeness() {
    let wiki = FakeWiki::new(|query: &ApiQuery| {
        pages_response(query.titles(), |title| {
            Some(format!("<extract>About {}</extract>", title))
        })
    });
    let all = numbered_titles(45);

    let pass = BatchEnricher::new(&wiki, 20, 3)
        .enrich(&all, &SummaryFetcher)
        .await
        .unwrap();

    assert_eq!(pass.batches, 3);
    assert_eq!(pass.values.len(), 45);
    assert_eq!(pass.defaulted, 0);
    assert_eq!(
        pass.values.get(&ItemTitle::new("Item 45")).map(String::as_str),
        Some("About Item 45")
    );

    let mut sizes: Vec<usize> = wiki.queries().iter().map(|q| q.titles().len()).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![5, 20, 20]);
}

#[tokio::test]
async fn test_batches_preserve_title_order() {
    let wiki = FakeWiki::new(|query: &ApiQuery| pages_response(query.titles(), |_| None));
    let all = numbered_titles(5);

    BatchEnricher::new(&wiki, 2, 1)
        .enrich(&all, &SummaryFetcher)
        .await
        .unwrap();

    let batches: Vec<Vec<ItemTitle>> = wiki.queries().iter().map(|q| q.titles().to_vec()).collect();
    assert_eq!(
        batches,
        vec![all[0..2].to_vec(), all[2..4].to_vec(), all[4..5].to_vec()]
    );
}

#[tokio::test]
async fn test_absent_titles_receive_defaults() {
    let wiki = FakeWiki::new(|query: &ApiQuery| {
        pages_response(query.titles(), |title| {
            (title == "With image").then(|| {
                r#"<thumbnail source="https://upload.test/1000px-Logo.png" width="1000" height="500" />"#
                    .to_string()
            })
        })
    });
    let all = titles(&["With image", "Without image"]);
    let fetcher = PageImageFetcher {
        images_dir: PathBuf::from("Images"),
    };

    let pass = BatchEnricher::new(&wiki, 20, 1)
        .enrich(&all, &fetcher)
        .await
        .unwrap();

    assert_eq!(pass.values.len(), 2);
    assert_eq!(pass.defaulted, 1);
    assert_eq!(pass.values.get(&all[1]), Some(&None));
    let reference = pass.values.get(&all[0]).cloned().flatten().unwrap();
    assert_eq!(reference.source_url, "https://upload.test/1000px-Logo.png");
    assert_eq!(reference.stored_path(), "Images/1000px-Logo.png");
}

#[tokio::test]
async fn test_view_counts_sum_and_skip_null_days() {
    let wiki = FakeWiki::new(|query: &ApiQuery| {
        assert_eq!(query.param("pvipdays"), Some("60"));
        pages_response(query.titles(), |_| {
            Some(
                r#"<pageviews><pvip date="2024-01-01">3</pvip><pvip date="2024-01-02" /><pvip date="2024-01-03">5</pvip></pageviews>"#
                    .to_string(),
            )
        })
    });
    let all = titles(&["Viewed"]);

    let pass = BatchEnricher::new(&wiki, 20, 1)
        .enrich(&all, &PageViewFetcher { days: 60 })
        .await
        .unwrap();

    assert_eq!(pass.values.get(&all[0]), Some(&8));
}

#[tokio::test]
async fn test_category_lists_combine_across_continuation() {
    let wiki = FakeWiki::new(|query: &ApiQuery| {
        if query.param("clcontinue").is_none() {
            r#"<api><continue clcontinue="1|Linux" continue="||" /><query><pages>
                <page ns="0" title="Suite"><categories><cl ns="14" title="Category:Office suites" /></categories></page>
                <page ns="0" title="Other" />
            </pages></query></api>"#
                .to_string()
        } else {
            r#"<api batchcomplete=""><query><pages>
                <page ns="0" title="Suite"><categories><cl ns="14" title="Category:Linux software" /><cl ns="14" title="Category:Office suites" /></categories></page>
                <page ns="0" title="Other" />
            </pages></query></api>"#
                .to_string()
        }
    });
    let all = titles(&["Suite", "Other"]);

    let pass = BatchEnricher::new(&wiki, 20, 1)
        .enrich(&all, &CategoryListFetcher)
        .await
        .unwrap();

    assert_eq!(
        pass.values.get(&all[0]).cloned().unwrap_or_default(),
        vec![
            CategoryName::new("Office suites"),
            CategoryName::new("Linux software")
        ]
    );
    assert_eq!(pass.values.get(&all[1]), Some(&Vec::new()));
    assert_eq!(wiki.query_count(), 2);
}

#[tokio::test]
async fn test_normalized_titles_map_back_and_strays_are_ignored() {
    let wiki = FakeWiki::new(|_: &ApiQuery| {
        r#"<api batchcomplete=""><query>
            <normalized><n from="libreOffice" to="LibreOffice" /></normalized>
            <pages>
                <page ns="0" title="LibreOffice"><extract>Free office suite.</extract></page>
                <page ns="0" title="Not requested"><extract>Stray.</extract></page>
            </pages>
        </query></api>"#
            .to_string()
    });
    let all = titles(&["libreOffice"]);

    let pass = BatchEnricher::new(&wiki, 20, 1)
        .enrich(&all, &SummaryFetcher)
        .await
        .unwrap();

    assert_eq!(pass.values.len(), 1);
    assert_eq!(
        pass.values.get(&all[0]).map(String::as_str),
        Some("Free office suite.")
    );
}

#[tokio::test]
async fn test_batch_failure_fails_the_pass() {
    let wiki = FakeWiki::new(|query: &ApiQuery| {
        if query.titles().iter().any(|t| t.as_str() == "Item 25") {
            "<html>Bad gateway</html>".to_string()
        } else {
            pages_response(query.titles(), |_| None)
        }
    });

    let err = BatchEnricher::new(&wiki, 20, 2)
        .enrich(&numbered_titles(30), &SummaryFetcher)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_harvester_composes_complete_records() {
    let wiki = FakeWiki::new(|query: &ApiQuery| {
        if query.param("list") == Some("categorymembers") {
            return category_responder(
                vec![
                    ("Suites", vec![("Category:Linux", 14), ("Calligra Suite", 0)]),
                    ("Linux", vec![("LibreOffice", 0)]),
                ],
                500,
            )(query);
        }
        pages_response(query.titles(), |title| match query.param("prop") {
            Some("extracts") => Some(format!("<extract>{} is an office suite.</extract>", title)),
            Some("pageviews") => Some(
                r#"<pageviews><pvip date="2024-01-01">10</pvip><pvip date="2024-01-02">32</pvip></pageviews>"#
                    .to_string(),
            ),
            Some("categories") => Some(
                r#"<categories><cl ns="14" title="Category:Office suites" /></categories>"#.to_string(),
            ),
            Some("pageimages") if title == "LibreOffice" => Some(
                r#"<thumbnail source="https://upload.test/thumb/LibreOffice_logo.png" />"#.to_string(),
            ),
            _ => None,
        })
    })
    .with_image("https://upload.test/thumb/LibreOffice_logo.png", b"png bytes");

    let images = tempfile::tempdir().unwrap();
    let config = HarvestConfig {
        images_dir: images.path().join("Images"),
        batch_size: 1,
        concurrency: 2,
        ..HarvestConfig::default()
    };
    let repository: Arc<dyn WikiRepository> = Arc::new(wiki);
    let harvester = Harvester::new(repository, &config);

    let closure = harvester.expand(&CategoryName::new("Suites")).await.unwrap();
    let outcome = harvester.compose(&closure.titles()).await.unwrap();

    assert_eq!(outcome.batches, 8);
    assert_eq!(outcome.records.len(), 2);

    let calligra = &outcome.records[0];
    assert_eq!(calligra.title.as_str(), "Calligra Suite");
    assert_eq!(calligra.summary, "Calligra Suite is an office suite.");
    assert_eq!(calligra.view_count, 42);
    assert_eq!(calligra.image_path, "");
    assert_eq!(calligra.url, "https://en.wikipedia.org/wiki/Calligra_Suite");

    let libreoffice = &outcome.records[1];
    let expected_path = images.path().join("Images").join("LibreOffice_logo.png");
    assert_eq!(libreoffice.image_path, expected_path.display().to_string());
    assert_eq!(libreoffice.categories, vec![CategoryName::new("Office suites")]);

    assert_eq!(outcome.images.attempted, 1);
    assert_eq!(outcome.images.written.len(), 1);
    assert_eq!(std::fs::read(&expected_path).unwrap(), b"png bytes");
}
