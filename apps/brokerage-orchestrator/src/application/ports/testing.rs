//! Scripted port doubles shared by the use-case tests.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use super::{
    BrokerGatewayPort, GatewayError, GatewayRequest, HttpMethod, InstrumentCatalogPort,
    ProfileError, ProfilePort, UpstreamResponse,
};
use crate::domain::profile::{ProfilePatch, UserProfile};
use crate::domain::shared::{Symbol, UserId};

type Reply = Result<UpstreamResponse, GatewayError>;

/// Gateway that answers from a per-route script and records every dispatch.
///
/// Each route holds a queue of replies; the last one repeats once the
/// queue is drained. Unscripted routes answer 404.
#[derive(Default)]
pub struct ScriptedGateway {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<GatewayRequest>>,
    cancel_after_calls: Mutex<Option<(usize, CancellationToken)>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for `method path`.
    pub fn on(self, method: HttpMethod, path: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.push(method, path, Ok(UpstreamResponse::new(status, body)));
        self
    }

    /// Queue a JSON reply for `method path`.
    pub fn on_json(
        self,
        method: HttpMethod,
        path: &str,
        status: u16,
        body: &serde_json::Value,
    ) -> Self {
        self.on(method, path, status, body.to_string())
    }

    /// Queue a transport failure for `method path`.
    pub fn on_error(self, method: HttpMethod, path: &str, error: GatewayError) -> Self {
        self.push(method, path, Err(error));
        self
    }

    /// Cancel `token` once `calls` requests have been dispatched.
    pub fn cancel_after(self, calls: usize, token: CancellationToken) -> Self {
        *self.cancel_after_calls.lock() = Some((calls, token));
        self
    }

    fn push(&self, method: HttpMethod, path: &str, reply: Reply) {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    /// Every dispatched request, in order.
    pub fn calls(&self) -> Vec<GatewayRequest> {
        self.calls.lock().clone()
    }

    /// Number of dispatched requests matching `method path`.
    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|r| r.method == method && r.path() == path)
            .count()
    }

    /// `METHOD /path` of every dispatched request, in order.
    pub fn trace(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path()))
            .collect()
    }
}

#[async_trait]
impl BrokerGatewayPort for ScriptedGateway {
    async fn send(
        &self,
        request: GatewayRequest,
        cancel: &CancellationToken,
    ) -> Result<UpstreamResponse, GatewayError> {
        if cancel.is_cancelled() {
            return Err(GatewayError::Cancelled);
        }

        let key = (request.method, request.path());
        let dispatched = {
            let mut calls = self.calls.lock();
            calls.push(request);
            calls.len()
        };

        if let Some((after, token)) = self.cancel_after_calls.lock().as_ref() {
            if dispatched >= *after {
                token.cancel();
            }
        }

        let mut routes = self.routes.lock();
        match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap(),
            None => Ok(UpstreamResponse::new(404, r#"{"message":"not found"}"#)),
        }
    }
}

/// Profile store backed by a map, with an optional forced write failure.
#[derive(Default)]
pub struct MemoryProfiles {
    profiles: Mutex<HashMap<UserId, UserProfile>>,
    fail_updates: bool,
    updates: Mutex<Vec<ProfilePatch>>,
}

impl MemoryProfiles {
    pub fn with(profile: UserProfile) -> Self {
        let store = Self::default();
        store.profiles.lock().insert(profile.id, profile);
        store
    }

    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    pub fn updates(&self) -> Vec<ProfilePatch> {
        self.updates.lock().clone()
    }

    pub fn current(&self, user_id: UserId) -> Option<UserProfile> {
        self.profiles.lock().get(&user_id).cloned()
    }
}

#[async_trait]
impl ProfilePort for MemoryProfiles {
    async fn get(&self, user_id: UserId) -> Result<UserProfile, ProfileError> {
        self.current(user_id)
            .ok_or(ProfileError::NotFound { user_id })
    }

    async fn update(
        &self,
        user_id: UserId,
        patch: ProfilePatch,
    ) -> Result<UserProfile, ProfileError> {
        self.updates.lock().push(patch.clone());
        if self.fail_updates {
            return Err(ProfileError::Storage {
                message: "disk full".to_string(),
            });
        }
        let mut profiles = self.profiles.lock();
        let profile = profiles
            .get_mut(&user_id)
            .ok_or(ProfileError::NotFound { user_id })?;
        patch.apply_to(profile);
        Ok(profile.clone())
    }
}

/// Catalog with a fixed handful of names.
pub struct FixedCatalog;

impl InstrumentCatalogPort for FixedCatalog {
    fn name_for(&self, symbol: &Symbol) -> Option<String> {
        match symbol.as_str() {
            "AAPL" => Some("Apple Inc.".to_string()),
            "MSFT" => Some("Microsoft Corporation".to_string()),
            _ => None,
        }
    }
}
