// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::content::{ItemId, StoreError};
use crate::export::ExportError;
use crate::templates::{FatalPageContext, TemplateEngine, render_minijinja_template};
use crate::view::dump::escape_html;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

pub const EXPORT_LINK_EXPIRED_MESSAGE: &str =
    "Post meta export link has expired. Go back, refresh the page and hit Export again.";
pub const ACCESS_DENIED_MESSAGE: &str = "Sorry, you are not allowed to access this page.";
pub const PAGE_NOT_FOUND_MESSAGE: &str = "The requested item does not exist.";

/// Conditions that end an admin request with a fatal page.
#[derive(Debug)]
pub enum AdminError {
    ExportLinkExpired,
    ItemNotFound(ItemId),
    HeadersAlreadySent { file: String, line: u32 },
    Forbidden,
    PageNotFound,
    Store(StoreError),
    Export(ExportError),
    Render(minijinja::Error),
}

impl AdminError {
    pub fn title(&self) -> &'static str {
        match self {
            AdminError::ExportLinkExpired => "Link expired",
            AdminError::ItemNotFound(_) | AdminError::PageNotFound => "Not found",
            AdminError::Forbidden => "Access denied",
            AdminError::HeadersAlreadySent { .. }
            | AdminError::Store(_)
            | AdminError::Export(_)
            | AdminError::Render(_) => "Error",
        }
    }

    /// Renders the fatal page through the template engine, falling back to a
    /// fixed document when rendering fails.
    pub fn render(&self, app_name: &str, templates: Option<&dyn TemplateEngine>) -> HttpResponse {
        let message = self.to_string();
        let context = FatalPageContext::new(app_name, self.title(), &message).to_value();
        let html = match templates {
            Some(engine) => match render_minijinja_template(engine, "admin/fatal.html", context) {
                Ok(html) => html,
                Err(err) => {
                    log::error!("Failed to render fatal page template: {}", err);
                    fallback_fatal_html(app_name, self.title(), &message)
                }
            },
            None => fallback_fatal_html(app_name, self.title(), &message),
        };

        HttpResponse::build(self.status_code())
            .content_type("text/html; charset=utf-8")
            .insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"))
            .insert_header(("Pragma", "no-cache"))
            .insert_header(("Expires", "0"))
            .body(html)
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminError::ExportLinkExpired => f.write_str(EXPORT_LINK_EXPIRED_MESSAGE),
            AdminError::ItemNotFound(id) => write!(
                f,
                "The post ID {} to be exported was not found in this installation.",
                id
            ),
            AdminError::HeadersAlreadySent { file, line } => write!(
                f,
                "Headers already sent. Output has started in file {} on line {}",
                file, line
            ),
            AdminError::Forbidden => f.write_str(ACCESS_DENIED_MESSAGE),
            AdminError::PageNotFound => f.write_str(PAGE_NOT_FOUND_MESSAGE),
            AdminError::Store(err) => write!(f, "Item storage failed: {}", err),
            AdminError::Export(err) => write!(f, "Export failed: {}", err),
            AdminError::Render(err) => write!(f, "Rendering failed: {}", err),
        }
    }
}

impl std::error::Error for AdminError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdminError::Store(err) => Some(err),
            AdminError::Export(err) => Some(err),
            AdminError::Render(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for AdminError {
    fn from(err: StoreError) -> Self {
        AdminError::Store(err)
    }
}

impl From<ExportError> for AdminError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::HeadersAlreadySent { file, line } => {
                AdminError::HeadersAlreadySent { file, line }
            }
            other => AdminError::Export(other),
        }
    }
}

impl From<minijinja::Error> for AdminError {
    fn from(err: minijinja::Error) -> Self {
        AdminError::Render(err)
    }
}

impl ResponseError for AdminError {
    fn status_code(&self) -> StatusCode {
        match self {
            AdminError::ExportLinkExpired | AdminError::Forbidden => StatusCode::FORBIDDEN,
            AdminError::ItemNotFound(_) | AdminError::PageNotFound => StatusCode::NOT_FOUND,
            AdminError::HeadersAlreadySent { .. }
            | AdminError::Store(_)
            | AdminError::Export(_)
            | AdminError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.render("", None)
    }
}

fn fallback_fatal_html(app_name: &str, title: &str, message: &str) -> String {
    let suffix = if app_name.is_empty() {
        String::new()
    } else {
        format!(" | {}", escape_html(app_name))
    };
    format!(
        r#"<!DOCTYPE html>
<html><head><title>{}{}</title></head>
<body><p>{}</p></body></html>"#,
        escape_html(title),
        suffix,
        escape_html(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::MiniJinjaEngine;
    use actix_web::body::to_bytes;

    async fn body_text(response: HttpResponse) -> String {
        let bytes = to_bytes(response.into_body()).await.expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf8")
    }

    #[test]
    fn messages_match_fatal_texts() {
        assert_eq!(
            AdminError::ItemNotFound(ItemId(999_999)).to_string(),
            "The post ID 999999 to be exported was not found in this installation."
        );
        assert_eq!(
            AdminError::HeadersAlreadySent {
                file: "src/hooks.rs".to_string(),
                line: 12
            }
            .to_string(),
            "Headers already sent. Output has started in file src/hooks.rs on line 12"
        );
        assert_eq!(
            AdminError::ExportLinkExpired.to_string(),
            EXPORT_LINK_EXPIRED_MESSAGE
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            AdminError::ExportLinkExpired.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AdminError::ItemNotFound(ItemId(1)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AdminError::HeadersAlreadySent {
                file: String::new(),
                line: 0
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn headers_already_sent_export_error_maps_to_fatal() {
        let err = AdminError::from(ExportError::HeadersAlreadySent {
            file: "a.rs".to_string(),
            line: 3,
        });
        assert!(matches!(err, AdminError::HeadersAlreadySent { line: 3, .. }));
    }

    #[actix_web::test]
    async fn render_uses_template_and_no_cache_headers() {
        let engine = MiniJinjaEngine::new();
        let response = AdminError::ExportLinkExpired.render("Test App", Some(&engine));
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response
                .headers()
                .get("Cache-Control")
                .and_then(|value| value.to_str().ok()),
            Some("no-cache, no-store, must-revalidate")
        );
        let body = body_text(response).await;
        assert!(body.contains(EXPORT_LINK_EXPIRED_MESSAGE));
        assert!(body.contains("Test App"));
    }

    #[actix_web::test]
    async fn fallback_escapes_message() {
        let response = AdminError::ItemNotFound(ItemId(5)).error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_text(response).await;
        assert!(body.contains("The post ID 5 to be exported was not found in this installation."));
    }

    #[actix_web::test]
    async fn fallback_escapes_markup_in_app_name() {
        let response = AdminError::Forbidden.render("<b>Shop</b> & Co", None);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_text(response).await;
        assert!(body.contains("Access denied | &lt;b&gt;Shop&lt;/b&gt; &amp; Co"));
        assert!(body.contains(ACCESS_DENIED_MESSAGE));
        assert!(!body.contains("<b>Shop</b>"));
    }
}
