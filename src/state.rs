//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{
    IdentityService, LinkService, PromotionPolicy, RedirectService,
};
use crate::domain::repositories::{LinkRepository, TokenRepository};
use crate::domain::visit_event::VisitEvent;
use crate::infrastructure::cache::{CacheService, PopularityCounter};

/// Services behind trait objects, so the same router runs against
/// PostgreSQL in production and in-memory repositories in tests.
#[derive(Clone)]
pub struct AppState {
    pub redirect_service: Arc<RedirectService<dyn LinkRepository>>,
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub identity_service: Arc<IdentityService<dyn TokenRepository>>,
    /// `None` when visit tracking is disabled.
    pub visit_sender: Option<mpsc::Sender<VisitEvent>>,
}

impl AppState {
    /// Wires the services over shared repositories and cache.
    pub fn new(
        links: Arc<dyn LinkRepository>,
        tokens: Arc<dyn TokenRepository>,
        cache: Arc<dyn CacheService>,
        counter: Arc<dyn PopularityCounter>,
        policy: PromotionPolicy,
        signing_secret: String,
        visit_sender: Option<mpsc::Sender<VisitEvent>>,
    ) -> Self {
        let redirect_service = RedirectService::new(
            links.clone(),
            cache.clone(),
            counter.clone(),
            policy,
            visit_sender.clone(),
        );
        let link_service = LinkService::new(links, cache, counter);
        let identity_service = IdentityService::new(tokens, signing_secret);

        Self {
            redirect_service: Arc::new(redirect_service),
            link_service: Arc::new(link_service),
            identity_service: Arc::new(identity_service),
            visit_sender,
        }
    }
}
