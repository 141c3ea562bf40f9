//! Link lifecycle service: create, rebind, delete, search and stats.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::{Identity, Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, PopularityCounter};
use crate::utils::code_generator::{generate_code, validate_alias};
use crate::utils::target_url::validate_target_url;

/// Maximum number of generated codes tried before giving up.
const MAX_GENERATION_ATTEMPTS: usize = 10;

/// A link together with its current popularity counter value.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkStats {
    pub link: Link,
    pub popularity: u64,
}

/// Service for creating and managing shortened links.
///
/// Every write that changes or removes a mapping invalidates the matching
/// cache entry after the durable write succeeds.
///
/// The invalidation is not atomic with the write. A redirect that read the
/// old link before the write can still promote it after the invalidation,
/// and that stale entry is served for at most one cache TTL. This window is
/// accepted; the cache TTL bounds it.
pub struct LinkService<L: LinkRepository + ?Sized> {
    links: Arc<L>,
    cache: Arc<dyn CacheService>,
    counter: Arc<dyn PopularityCounter>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(
        links: Arc<L>,
        cache: Arc<dyn CacheService>,
        counter: Arc<dyn PopularityCounter>,
    ) -> Self {
        Self {
            links,
            cache,
            counter,
        }
    }

    /// Creates a short link.
    ///
    /// # Arguments
    ///
    /// - `original_url` - Absolute http(s) URL to redirect to
    /// - `custom_alias` - Optional caller-chosen short code
    /// - `expires_at` - Optional expiry; must lie in the future
    /// - `owner` - Identity recorded as owner, `None` for anonymous links
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL, alias or expiry is invalid.
    /// Returns [`AppError::Conflict`] if the custom alias is already taken.
    pub async fn create(
        &self,
        original_url: &str,
        custom_alias: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
        owner: Option<Identity>,
    ) -> Result<Link, AppError> {
        validate_target_url(original_url)?;

        if let Some(expires_at) = expires_at
            && expires_at <= Utc::now()
        {
            return Err(AppError::bad_request(
                "Expiry must be in the future",
                json!({ "expires_at": expires_at }),
            ));
        }

        let owner_id = owner.map(|identity| identity.id);

        let link = match custom_alias {
            Some(alias) => {
                self.create_with_alias(alias, original_url, owner_id, expires_at)
                    .await?
            }
            None => {
                self.create_with_generated_code(original_url, owner_id, expires_at)
                    .await?
            }
        };

        info!(
            short_code = %link.short_code,
            owner_id = ?link.owner_id,
            "Link created"
        );

        Ok(link)
    }

    async fn create_with_alias(
        &self,
        alias: &str,
        original_url: &str,
        owner_id: Option<i64>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        validate_alias(alias)?;

        let taken = || AppError::conflict("Alias already taken", json!({ "alias": alias }));

        if self.links.get_by_code(alias).await?.is_some() {
            return Err(taken());
        }

        let new_link = NewLink {
            short_code: alias.to_string(),
            original_url: original_url.to_string(),
            owner_id,
            expires_at,
        };

        // A concurrent create can win between the check and the insert.
        match self.links.insert(new_link).await {
            Err(AppError::Conflict { .. }) => Err(taken()),
            other => other,
        }
    }

    async fn create_with_generated_code(
        &self,
        original_url: &str,
        owner_id: Option<i64>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let code = generate_code()?;

            if self.links.get_by_code(&code).await?.is_some() {
                continue;
            }

            let new_link = NewLink {
                short_code: code,
                original_url: original_url.to_string(),
                owner_id,
                expires_at,
            };

            match self.links.insert(new_link).await {
                Err(AppError::Conflict { .. }) => continue,
                other => return other,
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    pub async fn get(&self, short_code: &str) -> Result<Link, AppError> {
        self.links
            .get_by_code(short_code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": short_code })))
    }

    /// Points an existing link at `new_url`.
    ///
    /// A concurrent redirect may re-promote the old target for up to one
    /// cache TTL; see [`LinkService`].
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if `new_url` is not a valid target
    /// - [`AppError::NotFound`] if the link does not exist
    /// - [`AppError::Forbidden`] if `identity` does not own the link
    pub async fn update_url(
        &self,
        short_code: &str,
        new_url: &str,
        identity: &Identity,
    ) -> Result<Link, AppError> {
        validate_target_url(new_url)?;

        let mut link = self.get(short_code).await?;
        authorize(&link, identity)?;

        link.original_url = new_url.to_string();
        let updated = self.links.update(&link).await?;

        self.invalidate(short_code).await;
        info!(short_code, owner_id = identity.id, "Link target updated");

        Ok(updated)
    }

    /// Deletes a link owned by `identity`.
    ///
    /// The popularity counter is left alone; a re-created code starts from
    /// whatever count the old one reached.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the link does not exist
    /// - [`AppError::Forbidden`] if `identity` does not own the link
    pub async fn delete(&self, short_code: &str, identity: &Identity) -> Result<(), AppError> {
        let link = self.get(short_code).await?;
        authorize(&link, identity)?;

        if !self.links.delete(&link).await? {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "code": short_code }),
            ));
        }

        self.invalidate(short_code).await;
        info!(short_code, owner_id = identity.id, "Link deleted");

        Ok(())
    }

    /// Finds the first link whose target is exactly `original_url`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link points there.
    pub async fn search(&self, original_url: &str) -> Result<Link, AppError> {
        self.links
            .get_by_url(original_url)
            .await?
            .ok_or_else(|| {
                AppError::not_found("No link for this URL", json!({ "original_url": original_url }))
            })
    }

    /// Returns a link with its popularity counter.
    ///
    /// A failing counter store reports popularity 0 rather than failing the
    /// request.
    pub async fn stats(&self, short_code: &str) -> Result<LinkStats, AppError> {
        let link = self.get(short_code).await?;

        let popularity = self.counter.read(short_code).await.unwrap_or_else(|e| {
            warn!(short_code, error = %e, "Failed to read popularity counter");
            0
        });

        Ok(LinkStats { link, popularity })
    }

    /// Returns true if the durable store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.links.health_check().await
    }

    /// Returns true if the cache backend is reachable.
    pub async fn cache_healthy(&self) -> bool {
        self.cache.health_check().await
    }

    async fn invalidate(&self, short_code: &str) {
        if let Err(e) = self.cache.invalidate(short_code).await {
            warn!(
                short_code,
                error = %e,
                "Cache invalidation failed, entry will lapse at its TTL"
            );
        }
    }
}

/// Checks that `identity` owns `link`. Ownerless links are owned by nobody.
fn authorize(link: &Link, identity: &Identity) -> Result<(), AppError> {
    if link.is_owned_by(identity) {
        return Ok(());
    }

    Err(AppError::forbidden(
        "You do not own this link",
        json!({ "code": link.short_code }),
    ))
}
