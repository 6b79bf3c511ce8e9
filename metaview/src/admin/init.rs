// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::admin::error::AdminError;
use crate::admin::export::{export_timestamp, handle_export};
use crate::app_state::AppState;
use crate::config::ValidatedConfig;
use crate::security::ActorRequest;
use actix_web::{
    Error, HttpResponse, web,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::collections::HashMap;
use std::future::{Ready, ready};
use std::sync::Arc;

/// Runs before every admin screen. Requests of non-super-admins pass through
/// untouched; a super-admin request carrying the export id parameter is
/// answered with the export download (or a fatal page) and never reaches the
/// wrapped route.
pub struct AdminInit {
    config: Arc<ValidatedConfig>,
}

impl AdminInit {
    pub fn new(config: Arc<ValidatedConfig>) -> Self {
        Self { config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminInit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminInitService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminInitService {
            service,
            config: self.config.clone(),
        }))
    }
}

pub struct AdminInitService<S> {
    service: S,
    config: Arc<ValidatedConfig>,
}

impl<S> AdminInitService<S> {
    fn export_response(&self, req: &ServiceRequest) -> Option<HttpResponse> {
        let actor = req.request().actor();
        if !actor.is_super_admin() {
            return None;
        }

        let params = web::Query::<HashMap<String, String>>::from_query(req.query_string())
            .map(web::Query::into_inner)
            .unwrap_or_default();
        let raw_id = params.get(&self.config.export.id_param)?;

        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            log::error!("🚨 CRITICAL: AppState missing, cannot answer export request");
            return None;
        };

        let token = params
            .get(&self.config.export.token_param)
            .map(String::as_str);
        let timestamp = export_timestamp(self.config.export.utc_offset);
        let response = match handle_export(state, &actor, raw_id, token, timestamp) {
            Ok(response) => response,
            Err(err) => {
                match &err {
                    AdminError::ExportLinkExpired | AdminError::ItemNotFound(_) => {
                        log::warn!("Export by {:?} refused: {}", actor.id(), err)
                    }
                    _ => log::error!("Export by {:?} failed: {}", actor.id(), err),
                }
                err.render(&self.config.app.name, Some(state.templates.as_ref()))
            }
        };
        Some(response)
    }
}

impl<S, B> Service<ServiceRequest> for AdminInitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(response) = self.export_response(&req) {
            let (req, _) = req.into_parts();
            let response = response.map_into_right_body();
            return Box::pin(async move { Ok(ServiceResponse::new(req, response)) });
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
