//! Pure request/response transforms, applied by the handler around dispatch.
//!
//! Query transforms rewrite the browser's parameters into the backend's
//! shape and own required-field validation: a missing required parameter
//! fails with 400 before any upstream call is made. Response transforms run
//! only on 2xx bodies and exist for data minimization; fields they strip or
//! mask are never sent to the browser.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::AppError;

pub type QueryMap = HashMap<String, String>;

/// Pure function of the inbound query; no I/O.
pub type QueryTransform = fn(&QueryMap) -> Result<Vec<(String, String)>, AppError>;

/// Applied to successful (2xx) upstream bodies only.
pub type ResponseTransform = fn(Value) -> Value;

fn require(query: &QueryMap, name: &str) -> Result<String, AppError> {
    match query.get(name).map(|v| v.trim()) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(AppError::bad_request(format!(
            "Missing required parameter: {name}"
        ))),
    }
}

fn push_paging(query: &QueryMap, out: &mut Vec<(String, String)>) {
    let page = query.get("page").cloned().unwrap_or_else(|| "1".to_string());
    let per_page = query
        .get("limit")
        .cloned()
        .unwrap_or_else(|| "10".to_string());
    out.push(("page".to_string(), page));
    out.push(("per_page".to_string(), per_page));

    if let Some(search) = query.get("search").filter(|v| !v.trim().is_empty()) {
        out.push(("q".to_string(), search.clone()));
    }
    if let Some(sort) = query.get("sort").filter(|v| !v.trim().is_empty()) {
        out.push(("sort".to_string(), sort.clone()));
    }
}

/// Browser paging (`page`, `limit`, `search`, `sort`) to backend paging
/// (`page`, `per_page`, `q`, `sort`).
pub fn paged_query(query: &QueryMap) -> Result<Vec<(String, String)>, AppError> {
    let mut out = Vec::new();
    push_paging(query, &mut out);
    Ok(out)
}

/// Ticket listing is always scoped to one event.
pub fn ticket_query(query: &QueryMap) -> Result<Vec<(String, String)>, AppError> {
    let event_id = require(query, "event_id")?;
    let mut out = vec![("event_id".to_string(), event_id)];
    push_paging(query, &mut out);
    Ok(out)
}

/// Withdrawal listing requires the organizer id; the backend names it `eo_id`.
pub fn withdrawal_query(query: &QueryMap) -> Result<Vec<(String, String)>, AppError> {
    let eo_id = require(query, "eventOrganizerId")?;
    let mut out = vec![("eo_id".to_string(), eo_id)];
    push_paging(query, &mut out);
    Ok(out)
}

/// Balance lookup: organizer id only, no paging.
pub fn balance_query(query: &QueryMap) -> Result<Vec<(String, String)>, AppError> {
    let eo_id = require(query, "eventOrganizerId")?;
    Ok(vec![("eo_id".to_string(), eo_id)])
}

/// Mask `email` fields in organizer payloads. Applied to both list bodies
/// (`data` array) and single-object bodies.
pub fn mask_organizer_emails(mut body: Value) -> Value {
    if let Some(items) = body.get_mut("data").and_then(Value::as_array_mut) {
        for item in items {
            mask_email_field(item);
        }
    } else {
        mask_email_field(&mut body);
    }
    body
}

fn mask_email_field(value: &mut Value) {
    if let Some(obj) = value.as_object_mut() {
        if let Some(email) = obj.get("email").and_then(Value::as_str) {
            let masked = mask_email(email);
            obj.insert("email".to_string(), Value::String(masked));
        }
    }
}

/// `ada@example.com` becomes `a***@example.com`. Values without an `@` are
/// replaced entirely.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first = local.chars().next().unwrap_or('*');
            format!("{first}***@{domain}")
        }
        _ => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn query(pairs: &[(&str, &str)]) -> QueryMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn paged_query_defaults() {
        let out = paged_query(&query(&[])).unwrap();
        assert!(out.contains(&("page".to_string(), "1".to_string())));
        assert!(out.contains(&("per_page".to_string(), "10".to_string())));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn paged_query_maps_browser_names() {
        let out = paged_query(&query(&[("page", "3"), ("limit", "50"), ("search", "rock")]))
            .unwrap();
        assert!(out.contains(&("page".to_string(), "3".to_string())));
        assert!(out.contains(&("per_page".to_string(), "50".to_string())));
        assert!(out.contains(&("q".to_string(), "rock".to_string())));
    }

    #[test]
    fn ticket_query_requires_event_id() {
        let err = ticket_query(&query(&[("page", "1")])).unwrap_err();
        assert_eq!(err.status().as_u16(), 400);

        let err = ticket_query(&query(&[("event_id", "  ")])).unwrap_err();
        assert_eq!(err.status().as_u16(), 400);

        let out = ticket_query(&query(&[("event_id", "ev-1")])).unwrap();
        assert!(out.contains(&("event_id".to_string(), "ev-1".to_string())));
    }

    #[test]
    fn withdrawal_query_renames_organizer_id() {
        let err = withdrawal_query(&query(&[])).unwrap_err();
        assert_eq!(err.status().as_u16(), 400);

        let out = withdrawal_query(&query(&[("eventOrganizerId", "eo-7")])).unwrap();
        assert!(out.contains(&("eo_id".to_string(), "eo-7".to_string())));
        assert!(!out.iter().any(|(k, _)| k == "eventOrganizerId"));
    }

    #[test]
    fn mask_email_keeps_first_char_and_domain() {
        assert_eq!(mask_email("ada@example.com"), "a***@example.com");
        assert_eq!(mask_email("x@y.z"), "x***@y.z");
        assert_eq!(mask_email("not-an-email"), "***");
        assert_eq!(mask_email("@example.com"), "***");
    }

    #[test]
    fn masks_emails_in_list_bodies() {
        let body = json!({
            "data": [
                {"id": "eo-1", "email": "ada@example.com"},
                {"id": "eo-2", "email": "bob@example.org"},
            ],
            "total": 2
        });
        let shaped = mask_organizer_emails(body);
        assert_eq!(shaped["data"][0]["email"], "a***@example.com");
        assert_eq!(shaped["data"][1]["email"], "b***@example.org");
        assert_eq!(shaped["total"], 2);
    }

    #[test]
    fn masks_email_in_single_object_body() {
        let shaped = mask_organizer_emails(json!({"id": "eo-1", "email": "ada@example.com"}));
        assert_eq!(shaped["email"], "a***@example.com");
    }
}
