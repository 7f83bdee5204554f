// tests/common/mod.rs
//! In-memory wiki used by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use wikiharvest::{ApiQuery, ApiResponse, AppError, ItemTitle, WikiRepository};

type Responder = Box<dyn Fn(&ApiQuery) -> String + Send + Sync>;

/// A wiki that answers every query through a closure and records it.
pub struct FakeWiki {
    responder: Responder,
    queries: Mutex<Vec<ApiQuery>>,
    images: HashMap<String, Vec<u8>>,
}

impl FakeWiki {
    pub fn new(responder: impl Fn(&ApiQuery) -> String + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            queries: Mutex::new(Vec::new()),
            images: HashMap::new(),
        }
    }

    pub fn with_image(mut self, url: &str, bytes: &[u8]) -> Self {
        self.images.insert(url.to_string(), bytes.to_vec());
        self
    }

    pub fn queries(&self) -> Vec<ApiQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    /// Queries that listed members of `category`.
    pub fn listings_of(&self, category: &str) -> usize {
        let cmtitle = format!("Category:{}", category);
        self.queries()
            .iter()
            .filter(|q| q.param("cmtitle") == Some(cmtitle.as_str()))
            .count()
    }
}

#[async_trait::async_trait]
impl WikiRepository for FakeWiki {
    async fn query(&self, query: &ApiQuery) -> Result<ApiResponse<String>, AppError> {
        self.queries.lock().unwrap().push(query.clone());
        let body = (self.responder)(query);
        Ok(ApiResponse::ok(
            format!("https://wiki.test/w/api.php?{}", query.to_query_string()),
            body,
        ))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, AppError> {
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::ImageFetchFailed {
                url: url.to_string(),
                reason: "404 Not Found".to_string(),
            })
    }
}

/// A category graph: category name → (member title, namespace) pairs.
pub type CategoryGraph = Vec<(&'static str, Vec<(&'static str, i32)>)>;

/// Serves `list=categorymembers` from `graph`, `page_size` members per page.
///
/// Continuation tokens look like `page|<offset>`; unknown categories are empty.
pub fn category_responder(
    graph: CategoryGraph,
    page_size: usize,
) -> impl Fn(&ApiQuery) -> String + Send + Sync + 'static {
    let graph: HashMap<String, Vec<(&'static str, i32)>> = graph
        .into_iter()
        .map(|(name, members)| (format!("Category:{}", name), members))
        .collect();

    move |query: &ApiQuery| {
        let members = query
            .param("cmtitle")
            .and_then(|title| graph.get(title))
            .cloned()
            .unwrap_or_default();
        let offset = query
            .param("cmcontinue")
            .and_then(|token| token.strip_prefix("page|"))
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(0);

        let end = (offset + page_size).min(members.len());
        let listed: String = members[offset..end]
            .iter()
            .map(|(title, ns)| format!(r#"<cm ns="{}" title="{}" />"#, ns, escape(title)))
            .collect();

        let continuation = if end < members.len() {
            format!(r#"<continue cmcontinue="page|{}" continue="-||" />"#, end)
        } else {
            String::new()
        };

        format!(
            r#"<?xml version="1.0"?><api batchcomplete="">{}<query><categorymembers>{}</categorymembers></query></api>"#,
            continuation, listed
        )
    }
}

/// A `prop=` response with one `<page>` per title, its body from `page_body`.
/// Titles for which `page_body` returns `None` are left out of the response.
pub fn pages_response(
    titles: &[ItemTitle],
    page_body: impl Fn(&str) -> Option<String>,
) -> String {
    let pages: String = titles
        .iter()
        .enumerate()
        .filter_map(|(i, title)| {
            page_body(title.as_str()).map(|body| {
                format!(
                    r#"<page _idx="{}" pageid="{}" ns="0" title="{}">{}</page>"#,
                    i + 1,
                    i + 1,
                    escape(title.as_str()),
                    body
                )
            })
        })
        .collect();
    format!(
        r#"<?xml version="1.0"?><api batchcomplete=""><query><pages>{}</pages></query></api>"#,
        pages
    )
}

pub fn titles(names: &[&str]) -> Vec<ItemTitle> {
    names.iter().map(|n| ItemTitle::new(*n)).collect()
}

pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
