#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use chrono::{DateTime, Utc};
use hotlink::api::handlers::health_handler;
use hotlink::api::routes::link_routes;
use hotlink::application::services::{PromotionPolicy, hash_token};
use hotlink::domain::entities::{Link, NewLink};
use hotlink::domain::repositories::{ApiToken, LinkRepository, TokenRepository};
use hotlink::domain::visit_event::VisitEvent;
use hotlink::error::AppError;
use hotlink::infrastructure::cache::MemoryCache;
use hotlink::state::AppState;
use serde_json::json;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use tokio::sync::mpsc;

pub const SIGNING_SECRET: &str = "test-signing-secret";

/// In-memory durable store. `set_offline(true)` makes every call fail the
/// way an unreachable database does.
#[derive(Default)]
pub struct MemoryLinkRepository {
    links: Mutex<Vec<Link>>,
    next_id: AtomicI64,
    offline: AtomicBool,
    lookups: AtomicUsize,
}

impl MemoryLinkRepository {
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of `get_by_code` calls served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn find(&self, short_code: &str) -> Option<Link> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.short_code == short_code)
            .cloned()
    }

    pub fn seed(
        &self,
        short_code: &str,
        original_url: &str,
        owner_id: Option<i64>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Link {
        let link = Link {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            short_code: short_code.to_string(),
            original_url: original_url.to_string(),
            owner_id,
            created_at: Utc::now(),
            expires_at,
            visits: 0,
            last_visited: None,
        };
        self.links.lock().unwrap().push(link.clone());
        link
    }

    fn check_online(&self) -> Result<(), AppError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable(
                "Durable store unavailable",
                json!({}),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn get_by_code(&self, short_code: &str) -> Result<Option<Link>, AppError> {
        self.check_online()?;
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.find(short_code))
    }

    async fn get_by_url(&self, original_url: &str) -> Result<Option<Link>, AppError> {
        self.check_online()?;
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.original_url == original_url)
            .cloned())
    }

    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.check_online()?;
        if self.find(&new_link.short_code).is_some() {
            return Err(AppError::conflict(
                "Short code already exists",
                json!({ "code": new_link.short_code }),
            ));
        }
        Ok(self.seed(
            &new_link.short_code,
            &new_link.original_url,
            new_link.owner_id,
            new_link.expires_at,
        ))
    }

    async fn update(&self, link: &Link) -> Result<Link, AppError> {
        self.check_online()?;
        let mut links = self.links.lock().unwrap();
        let stored = links
            .iter_mut()
            .find(|l| l.short_code == link.short_code)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({})))?;
        stored.original_url = link.original_url.clone();
        stored.expires_at = link.expires_at;
        Ok(stored.clone())
    }

    async fn delete(&self, link: &Link) -> Result<bool, AppError> {
        self.check_online()?;
        let mut links = self.links.lock().unwrap();
        let before = links.len();
        links.retain(|l| l.id != link.id);
        Ok(links.len() < before)
    }

    async fn record_visit(
        &self,
        short_code: &str,
        visited_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        self.check_online()?;
        let mut links = self.links.lock().unwrap();
        match links.iter_mut().find(|l| l.short_code == short_code) {
            Some(link) => {
                link.visits += 1;
                link.last_visited = Some(link.last_visited.map_or(visited_at, |t| t.max(visited_at)));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn health_check(&self) -> bool {
        !self.offline.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct MemoryTokenRepository {
    tokens: Mutex<Vec<ApiToken>>,
    next_id: AtomicI64,
}

impl MemoryTokenRepository {
    /// Stores a token for `owner_id` and returns the raw bearer value.
    pub fn issue(&self, owner_id: i64) -> String {
        let raw = format!("token-for-owner-{owner_id}-{}", self.next_id.load(Ordering::SeqCst));
        self.insert(owner_id, &raw);
        raw
    }

    pub fn revoke_all(&self, owner_id: i64) {
        for token in self.tokens.lock().unwrap().iter_mut() {
            if token.owner_id == owner_id {
                token.revoked_at = Some(Utc::now());
            }
        }
    }

    fn insert(&self, owner_id: i64, raw: &str) -> ApiToken {
        let token = ApiToken {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            owner_id,
            name: format!("owner-{owner_id}"),
            token_hash: hash_token(SIGNING_SECRET, raw),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        self.tokens.lock().unwrap().push(token.clone());
        token
    }

    fn find<F: Fn(&ApiToken) -> bool>(&self, predicate: F) -> Option<ApiToken> {
        self.tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| predicate(t))
            .cloned()
    }
}

#[async_trait]
impl TokenRepository for MemoryTokenRepository {
    async fn find_owner(&self, token_hash: &str) -> Result<Option<i64>, AppError> {
        Ok(self
            .find(|t| t.token_hash == token_hash && t.revoked_at.is_none())
            .map(|t| t.owner_id))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        for token in self.tokens.lock().unwrap().iter_mut() {
            if token.token_hash == token_hash {
                token.last_used_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn create_token(
        &self,
        owner_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        let token = ApiToken {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            owner_id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        self.tokens.lock().unwrap().push(token.clone());
        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        Ok(self.tokens.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        Ok(self.find(|t| t.id == id))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self.find(|t| t.name == name))
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        let token = tokens
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found("Token not found", json!({ "id": id })))?;
        token.revoked_at = Some(Utc::now());
        Ok(())
    }
}

/// Everything a handler test needs to arrange state and inspect effects.
pub struct TestContext {
    pub state: AppState,
    pub links: Arc<MemoryLinkRepository>,
    pub tokens: Arc<MemoryTokenRepository>,
    pub cache: MemoryCache,
    pub visits: mpsc::Receiver<VisitEvent>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_policy(PromotionPolicy::default())
    }

    pub fn with_policy(policy: PromotionPolicy) -> Self {
        let links = Arc::new(MemoryLinkRepository::default());
        let tokens = Arc::new(MemoryTokenRepository::default());
        let cache = MemoryCache::new();
        let (tx, rx) = mpsc::channel(100);

        let state = AppState::new(
            links.clone(),
            tokens.clone(),
            Arc::new(cache.clone()),
            Arc::new(cache.clone()),
            policy,
            SIGNING_SECRET.to_string(),
            Some(tx),
        );

        Self {
            state,
            links,
            tokens,
            cache,
            visits: rx,
        }
    }

    /// Link routes plus `/health`, without rate limiting.
    pub fn app(&self) -> Router {
        link_routes()
            .route("/health", get(health_handler))
            .with_state(self.state.clone())
    }

    pub fn bearer(&self, owner_id: i64) -> String {
        format!("Bearer {}", self.tokens.issue(owner_id))
    }
}
