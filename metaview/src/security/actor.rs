// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::{ActorRole, ValidatedConfig};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::AUTHORIZATION,
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::sync::Arc;

/// Cookie carrying the actor token for plain browser navigation (export links).
pub const ACTOR_COOKIE_NAME: &str = "metaview_token";

/// Whoever is making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    Authenticated { name: String, role: ActorRole },
}

impl Actor {
    pub fn authenticated(name: impl Into<String>, role: ActorRole) -> Self {
        Actor::Authenticated {
            name: name.into(),
            role,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Actor::Anonymous => None,
            Actor::Authenticated { name, .. } => Some(name),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Actor::Authenticated { .. })
    }

    /// The panel and the export are reserved for this capability.
    pub fn is_super_admin(&self) -> bool {
        matches!(
            self,
            Actor::Authenticated {
                role: ActorRole::SuperAdmin,
                ..
            }
        )
    }
}

pub trait ActorRequest {
    fn actor(&self) -> Actor;
}

impl ActorRequest for HttpRequest {
    fn actor(&self) -> Actor {
        self.extensions()
            .get::<Actor>()
            .cloned()
            .unwrap_or(Actor::Anonymous)
    }
}

/// Maps a bearer token (or the actor cookie) onto a configured actor.
pub fn resolve_actor(req: &HttpRequest, config: &ValidatedConfig) -> Actor {
    let header_token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string());
    let token = header_token.or_else(|| {
        req.cookie(ACTOR_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
    });

    match token {
        Some(token) if !token.is_empty() => match config.actor_by_token(&token) {
            Some(actor) => Actor::authenticated(actor.name.clone(), actor.role),
            None => {
                log::debug!("Unknown actor token presented for {}", req.path());
                Actor::Anonymous
            }
        },
        _ => Actor::Anonymous,
    }
}

/// Stores the resolved [`Actor`] in request extensions; never rejects.
pub struct ActorMiddleware {
    config: Arc<ValidatedConfig>,
}

impl ActorMiddleware {
    pub fn new(config: Arc<ValidatedConfig>) -> Self {
        Self { config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ActorMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ActorMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ActorMiddlewareService {
            service,
            config: self.config.clone(),
        }))
    }
}

pub struct ActorMiddlewareService<S> {
    service: S,
    config: Arc<ValidatedConfig>,
}

impl<S, B> Service<ServiceRequest> for ActorMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let actor = resolve_actor(req.request(), &self.config);
        req.extensions_mut().insert(actor);
        let fut = self.service.call(req);
        Box::pin(fut)
    }
}
