// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Clone, Debug)]
struct NonceData {
    created_at: Instant,
    actor_id: String,
    action: String,
}

/// Short-lived tokens bound to an actor and an action, owned by a worker thread.
#[derive(Clone)]
pub struct NonceStore {
    sender: mpsc::Sender<NonceCommand>,
    lifetime: Duration,
}

enum NonceCommand {
    Issue {
        actor_id: String,
        action: String,
        reply: mpsc::Sender<String>,
    },
    Verify {
        token: String,
        actor_id: String,
        action: String,
        reply: mpsc::Sender<bool>,
    },
    #[cfg(test)]
    Count { reply: mpsc::Sender<usize> },
}

impl NonceStore {
    pub fn new(lifetime: Duration) -> Self {
        NonceStore {
            sender: start_nonce_worker(lifetime),
            lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    fn request<T>(&self, build: impl FnOnce(mpsc::Sender<T>) -> NonceCommand, fallback: T) -> T {
        let (reply, receive) = mpsc::channel();
        if self.sender.send(build(reply)).is_err() {
            log::error!("🚨 CRITICAL: NonceStore channel closed");
            return fallback;
        }
        receive.recv().unwrap_or(fallback)
    }

    /// Returns the live token for `(actor_id, action)`, refreshing its age,
    /// or mints a new one.
    pub fn issue(&self, actor_id: &str, action: &str) -> String {
        self.request(
            |reply| NonceCommand::Issue {
                actor_id: actor_id.to_string(),
                action: action.to_string(),
                reply,
            },
            String::new(),
        )
    }

    /// True only for a live token issued to the same actor for the same action.
    pub fn verify(&self, token: &str, actor_id: &str, action: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        self.request(
            |reply| NonceCommand::Verify {
                token: token.to_string(),
                actor_id: actor_id.to_string(),
                action: action.to_string(),
                reply,
            },
            false,
        )
    }

    #[cfg(test)]
    fn count(&self) -> usize {
        self.request(|reply| NonceCommand::Count { reply }, 0)
    }
}

fn start_nonce_worker(lifetime: Duration) -> mpsc::Sender<NonceCommand> {
    let (sender, receiver) = mpsc::channel();
    let thread = thread::Builder::new().name("nonce-store".to_string());
    if let Err(err) = thread.spawn(move || run_nonce_worker(receiver, lifetime)) {
        log::error!("NonceStore worker failed to start: {}", err);
    }
    sender
}

fn run_nonce_worker(receiver: mpsc::Receiver<NonceCommand>, lifetime: Duration) {
    let mut nonces: HashMap<String, NonceData> = HashMap::new();
    while let Ok(command) = receiver.recv() {
        let now = Instant::now();
        nonces.retain(|_, data| now.duration_since(data.created_at) < lifetime);
        match command {
            NonceCommand::Issue {
                actor_id,
                action,
                reply,
            } => {
                let existing = nonces
                    .iter_mut()
                    .find(|(_, data)| data.actor_id == actor_id && data.action == action)
                    .map(|(token, data)| {
                        data.created_at = now;
                        token.clone()
                    });
                let token = match existing {
                    Some(token) => token,
                    None => {
                        let token = Uuid::new_v4().to_string();
                        log::debug!("Issued nonce for actor {} action {}", actor_id, action);
                        nonces.insert(
                            token.clone(),
                            NonceData {
                                created_at: now,
                                actor_id,
                                action,
                            },
                        );
                        token
                    }
                };
                let _ = reply.send(token);
            }
            NonceCommand::Verify {
                token,
                actor_id,
                action,
                reply,
            } => {
                let owner = nonces
                    .get(&token)
                    .map(|data| (data.actor_id.clone(), data.action.clone()));
                let is_valid = match owner {
                    Some((owner_id, owner_action))
                        if owner_id == actor_id && owner_action == action =>
                    {
                        true
                    }
                    Some((owner_id, owner_action)) => {
                        log::warn!(
                            "Nonce presented by {} for {} was issued to {} for {}",
                            actor_id,
                            action,
                            owner_id,
                            owner_action
                        );
                        nonces.remove(&token);
                        false
                    }
                    None => false,
                };
                let _ = reply.send(is_valid);
            }
            #[cfg(test)]
            NonceCommand::Count { reply } => {
                let _ = reply.send(nonces.len());
            }
        }
    }
}
