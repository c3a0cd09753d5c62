//! Audit log viewing: an HTML page at `/` and the same listing as JSON at `/logs`.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tinytemplate::TinyTemplate;

use inkwell_core::domain::{LogQuery, LogRecord, SortField, SortOrder};
use inkwell_shared::dto::LogRecordResponse;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const LOG_PAGE: &str = include_str!("../../templates/logs.html");

const SORT_FIELDS: [SortField; 5] = [
    SortField::Id,
    SortField::LogFile,
    SortField::InfoType,
    SortField::Message,
    SortField::DateAndTime,
];

/// `?sort_by=&order=&search=` as sent by the page's form.
#[derive(Debug, Default, Deserialize)]
pub struct LogParams {
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
}

impl LogParams {
    /// Unknown sort fields fall back to the default ordering.
    fn into_query(self) -> LogQuery {
        let sort_by = match self.sort_by.as_deref() {
            Some(field) => field.parse::<SortField>().unwrap_or_else(|e: String| {
                tracing::debug!(error = %e, "Ignoring sort_by");
                SortField::default()
            }),
            None => SortField::default(),
        };

        LogQuery {
            search: self.search.unwrap_or_default(),
            sort_by,
            order: self.order.as_deref().map(SortOrder::parse).unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct Choice {
    value: &'static str,
    selected: bool,
}

#[derive(Serialize)]
struct LogPage<'a> {
    search: &'a str,
    fields: Vec<Choice>,
    orders: Vec<Choice>,
    count: usize,
    logs: Vec<LogRecordResponse>,
}

fn log_record_response(record: &LogRecord) -> LogRecordResponse {
    LogRecordResponse {
        log_id: record.id.to_string(),
        log_file: record.log_file.clone(),
        log_type: record.info_type.as_str().to_string(),
        message: record.message.clone(),
        date_and_time: record.date_and_time.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

fn render_page(query: &LogQuery, records: &[LogRecord]) -> AppResult<String> {
    let page = LogPage {
        search: &query.search,
        fields: SORT_FIELDS
            .iter()
            .map(|f| Choice {
                value: f.as_str(),
                selected: *f == query.sort_by,
            })
            .collect(),
        orders: [SortOrder::Desc, SortOrder::Asc]
            .iter()
            .map(|o| Choice {
                value: o.as_str(),
                selected: *o == query.order,
            })
            .collect(),
        count: records.len(),
        logs: records.iter().map(log_record_response).collect(),
    };

    let mut templates = TinyTemplate::new();
    templates
        .add_template("logs", LOG_PAGE)
        .map_err(|e| AppError::Internal(format!("log page template: {e}")))?;
    templates
        .render("logs", &page)
        .map_err(|e| AppError::Internal(format!("log page rendering: {e}")))
}

/// GET /
pub async fn log_page(
    state: web::Data<AppState>,
    params: web::Query<LogParams>,
) -> AppResult<HttpResponse> {
    let query = params.into_inner().into_query();
    let records = state.logs.query(&query).await?;

    let html = render_page(&query, &records)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// GET /logs
pub async fn list_logs(
    state: web::Data<AppState>,
    params: web::Query<LogParams>,
) -> AppResult<HttpResponse> {
    let query = params.into_inner().into_query();
    let records = state.logs.query(&query).await?;

    let body: Vec<LogRecordResponse> = records.iter().map(log_record_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use inkwell_core::domain::InfoType;

    use super::*;

    #[test]
    fn test_params_default_to_newest_first() {
        let query = LogParams::default().into_query();

        assert_eq!(query.sort_by, SortField::DateAndTime);
        assert_eq!(query.order, SortOrder::Desc);
        assert!(query.search.is_empty());
    }

    #[test]
    fn test_unknown_sort_field_falls_back() {
        let query = LogParams {
            sort_by: Some("password".to_string()),
            order: Some("asc".to_string()),
            search: Some("post".to_string()),
        }
        .into_query();

        assert_eq!(query.sort_by, SortField::DateAndTime);
        assert_eq!(query.order, SortOrder::Asc);
        assert_eq!(query.search, "post");
    }

    #[test]
    fn test_page_escapes_messages() {
        let record = LogRecord::new(
            "app.log",
            InfoType::Error,
            r#"Error "<b>bad</b>" occurred in /posts with method: POST"#,
            Utc::now(),
        );

        let html = render_page(&LogQuery::default(), &[record]).unwrap();

        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
        assert!(html.contains("1 record(s)"));
        assert!(html.contains(r#"<option value="date_and_time" selected>"#));
    }
}
