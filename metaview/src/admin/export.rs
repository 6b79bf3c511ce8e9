// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::admin::error::AdminError;
use crate::app_state::AppState;
use crate::config::ValidatedConfig;
use crate::content::ItemId;
use crate::export::{ResponseBuffer, build_export, send_export};
use crate::meta::aggregate;
use crate::security::Actor;
use actix_web::HttpResponse;
use chrono::{DateTime, FixedOffset, Local, Utc};

/// Action the export nonce is bound to.
pub const EXPORT_NONCE_ACTION: &str = "post-meta-view-and-export";

/// Link that downloads the export of `item_id`, carrying the actor's nonce.
pub fn export_url(config: &ValidatedConfig, item_id: ItemId, token: &str) -> String {
    format!(
        "{}?{}={}&{}={}",
        config.admin.path,
        urlencoding::encode(&config.export.id_param),
        item_id,
        urlencoding::encode(&config.export.token_param),
        urlencoding::encode(token)
    )
}

/// Current time in the configured offset, or in the host's local offset.
pub fn export_timestamp(offset: Option<FixedOffset>) -> DateTime<FixedOffset> {
    match offset {
        Some(offset) => Utc::now().with_timezone(&offset),
        None => {
            let now = Local::now();
            now.with_timezone(now.offset())
        }
    }
}

/// Answers an export request of a super-admin.
pub fn handle_export(
    state: &AppState,
    actor: &Actor,
    raw_id: &str,
    token: Option<&str>,
    timestamp: DateTime<FixedOffset>,
) -> Result<HttpResponse, AdminError> {
    let mut response = ResponseBuffer::new();
    export_into(&mut response, state, actor, raw_id, token, timestamp)?;
    let (headers, body) = response.into_parts();
    let mut builder = HttpResponse::Ok();
    for (name, value) in headers {
        builder.insert_header((name, value));
    }
    Ok(builder.body(body))
}

/// Export steps in order: nonce, item lookup, aggregation, encoding, output.
pub fn export_into(
    response: &mut ResponseBuffer,
    state: &AppState,
    actor: &Actor,
    raw_id: &str,
    token: Option<&str>,
    timestamp: DateTime<FixedOffset>,
) -> Result<(), AdminError> {
    let actor_id = actor.id().unwrap_or_default();
    if !state
        .nonces
        .verify(token.unwrap_or_default(), actor_id, EXPORT_NONCE_ACTION)
    {
        return Err(AdminError::ExportLinkExpired);
    }

    let item_id = ItemId::parse_lenient(raw_id);
    let item = state
        .store
        .find_item(item_id)?
        .ok_or(AdminError::ItemNotFound(item_id))?;

    let document = aggregate(state.store.as_ref(), &state.extensions, &item)?;
    let export = build_export(&document, &item.item_type, item.id, timestamp)?;
    let filename = export.filename.clone();
    send_export(response, export)?;

    log::info!(
        "📦 {} exported metadata of {} {} as {}",
        actor_id,
        item.item_type,
        item.id,
        filename
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ActorRole;
    use crate::content::{ContentItem, MemoryItemStore};
    use crate::extensions::ExtensionRegistry;
    use crate::util::test_config::test_config;
    use std::sync::Arc;
    use std::time::Duration;

    fn state_with_item() -> AppState {
        let store = MemoryItemStore::new();
        store.insert_item(ContentItem::new(ItemId(42), "post", "Hello"));
        store.add_meta(ItemId(42), "color", "red");
        AppState::new(
            Arc::new(store),
            ExtensionRegistry::new(),
            Duration::from_secs(60),
        )
    }

    fn root() -> Actor {
        Actor::authenticated("root", ActorRole::SuperAdmin)
    }

    fn utc_timestamp() -> DateTime<FixedOffset> {
        export_timestamp(FixedOffset::east_opt(0))
    }

    #[test]
    fn export_url_carries_encoded_params() {
        let config = test_config();
        assert_eq!(
            export_url(&config, ItemId(7), "a b"),
            "/admin?export-id=7&token=a%20b"
        );
    }

    #[test]
    fn timestamp_uses_configured_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).expect("offset");
        assert_eq!(export_timestamp(Some(offset)).offset(), &offset);
    }

    #[test]
    fn export_writes_attachment() {
        let state = state_with_item();
        let token = state.nonces.issue("root", EXPORT_NONCE_ACTION);
        let mut response = ResponseBuffer::new();
        export_into(
            &mut response,
            &state,
            &root(),
            "42",
            Some(&token),
            utc_timestamp(),
        )
        .expect("export");
        let body: serde_json::Value = serde_json::from_slice(response.body()).expect("json");
        assert_eq!(body["meta"]["color"], "red");
        assert!(response.headers().iter().any(|(name, value)| {
            name == "Content-Disposition" && value.starts_with("attachment; filename=\"post-42-")
        }));
    }

    #[test]
    fn bad_token_is_checked_before_item_lookup() {
        let state = state_with_item();
        let mut response = ResponseBuffer::new();
        let err = export_into(
            &mut response,
            &state,
            &root(),
            "999999",
            Some("stale"),
            utc_timestamp(),
        )
        .expect_err("expired");
        assert!(matches!(err, AdminError::ExportLinkExpired));
    }

    #[test]
    fn nonce_of_another_actor_is_rejected() {
        let state = state_with_item();
        let token = state.nonces.issue("other-admin", EXPORT_NONCE_ACTION);
        let mut response = ResponseBuffer::new();
        let err = export_into(
            &mut response,
            &state,
            &root(),
            "42",
            Some(&token),
            utc_timestamp(),
        )
        .expect_err("foreign nonce");
        assert!(matches!(err, AdminError::ExportLinkExpired));
    }

    #[test]
    fn unknown_item_reports_parsed_id() {
        let state = state_with_item();
        let token = state.nonces.issue("root", EXPORT_NONCE_ACTION);
        let mut response = ResponseBuffer::new();
        let err = export_into(
            &mut response,
            &state,
            &root(),
            "999999abc",
            Some(&token),
            utc_timestamp(),
        )
        .expect_err("missing");
        assert!(matches!(err, AdminError::ItemNotFound(ItemId(999_999))));
        assert!(response.body().is_empty());
    }

    #[test]
    fn started_output_blocks_export() {
        let state = state_with_item();
        let token = state.nonces.issue("root", EXPORT_NONCE_ACTION);
        let mut response = ResponseBuffer::new();
        response.write_body(b"notice");
        let err = export_into(
            &mut response,
            &state,
            &root(),
            "42",
            Some(&token),
            utc_timestamp(),
        )
        .expect_err("headers sent");
        match err {
            AdminError::HeadersAlreadySent { file, .. } => assert!(file.ends_with("export.rs")),
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(response.body(), b"notice");
    }

    #[actix_web::test]
    async fn handle_export_builds_http_response() {
        let state = state_with_item();
        let token = state.nonces.issue("root", EXPORT_NONCE_ACTION);
        let response = handle_export(&state, &root(), "42", Some(&token), utc_timestamp())
            .expect("response");
        assert_eq!(response.status(), actix_web::http::StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("Content-Type")
                .and_then(|value| value.to_str().ok()),
            Some("application/json; charset=UTF-8")
        );
    }
}
