// src/api/parser.rs
//! Parsing of MediaWiki XML responses.
//!
//! Every response goes through [`parse_api_response`], which turns HTTP
//! failures and `<error>` elements into typed errors before any
//! operation-specific parsing happens.

use super::types::{CategoryMember, Continuation, PaginatedResponse};
use super::xml::XmlElement;
use super::ApiResponse;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, WikiErrorCode};
use std::collections::HashMap;

/// Parses a raw response into its document root, surfacing API errors.
pub fn parse_api_response(result: &ApiResponse<String>) -> Result<XmlElement, AppError> {
    if !result.status.is_success() {
        return Err(AppError::ServiceStatus {
            code: WikiErrorCode::from_http_status(result.status.as_u16()),
            status: result.status,
            url: result.url.clone(),
        });
    }

    let root = XmlElement::parse(&result.data).map_err(|e| {
        log::error!(
            "Failed to parse response from {}: {} (body: {})",
            result.url,
            e,
            preview(&result.data)
        );
        e
    })?;

    if root.name() != "api" {
        return Err(AppError::MalformedResponse(format!(
            "expected <api> root, found <{}>",
            root.name()
        )));
    }

    if let Some(error) = root.find("error") {
        return Err(AppError::ApiError {
            code: WikiErrorCode::from_api_response(error.attr("code").unwrap_or_default()),
            info: error.attr("info").unwrap_or_default().to_string(),
        });
    }

    for warning in root.find_all("warnings") {
        for module in warning.children() {
            log::warn!("API warning from {}: {}", module.name(), module.text());
        }
    }

    Ok(root)
}

/// Reads the continuation node, if the response has more pages.
///
/// Understands both the current `<continue>` element and the legacy
/// `<query-continue>` block.
pub fn parse_continuation(root: &XmlElement) -> Option<Continuation> {
    if let Some(node) = root.find("continue") {
        let params: Vec<(String, String)> = node
            .attributes()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        return (!params.is_empty()).then(|| Continuation::new(params));
    }

    let legacy = root.find("query-continue")?;
    let params: Vec<(String, String)> = legacy
        .children()
        .iter()
        .flat_map(|module| module.attributes())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    (!params.is_empty()).then(|| Continuation::new(params))
}

/// Parses one page of `list=categorymembers`.
pub fn parse_category_members(
    root: &XmlElement,
) -> Result<PaginatedResponse<CategoryMember>, AppError> {
    let continuation = parse_continuation(root);

    // An empty category omits the list element entirely.
    let Some(list) = root.find("query/categorymembers") else {
        if root.find("query").is_none() && continuation.is_none() {
            return Err(AppError::MalformedResponse(
                "category membership response has no <query> element".to_string(),
            ));
        }
        return Ok(PaginatedResponse {
            results: Vec::new(),
            continuation,
        });
    };

    let results = list
        .children_named("cm")
        .map(|cm| {
            let title = cm.attr("title").ok_or_else(|| {
                AppError::MalformedResponse("category member without a title".to_string())
            })?;
            let namespace = cm.attr("ns").and_then(|ns| ns.parse::<i32>().ok());
            Ok(CategoryMember::new(title, namespace))
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(PaginatedResponse {
        results,
        continuation,
    })
}

/// Maps titles the API normalized back to the spelling that was requested.
///
/// Keys are the normalized (returned) titles.
pub fn parse_normalized_titles(root: &XmlElement) -> HashMap<String, String> {
    root.find_all("query/normalized/n")
        .into_iter()
        .filter_map(|n| Some((n.attr("to")?.to_string(), n.attr("from")?.to_string())))
        .collect()
}

/// All `<page>` elements of a `prop=` query.
pub fn parse_pages(root: &XmlElement) -> Vec<&XmlElement> {
    root.find_all("query/pages/page")
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let truncated: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        body.to_string()
    }
}
