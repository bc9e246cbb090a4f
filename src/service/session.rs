//! Session and profile manager.
//!
//! [`SessionManager`] owns the current identity and profile. Session transitions are
//! driven only by auth-state notifications from the backend client: a successful
//! sign-in emits [`AuthEvent::SignedIn`], the notification loop started by
//! [`SessionManager::init`] loads (or bootstraps) the profile, and
//! [`AuthEvent::SignedOut`] clears it.
//!
//! ```text
//! SignedOut --signed in--> ProfileLoading --profile found or created--> Ready
//!                                         --profile fetch failed-----> IdentityOnly
//! Ready / IdentityOnly --signed out--> SignedOut
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use dioxus_logger::tracing;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

use crate::{
    backend::BackendClient,
    config::{Config, Timeouts},
    data::{
        reference::ReferenceRepository, subscription::SubscriptionRepository,
        usage::UsageRepository, user::UserRepository,
    },
    error::{auth::AuthError, Error},
    model::{
        auth::{AuthEvent, Identity, SignUpDetails, SignUpResponse},
        usage::UsageStats,
        user::{
            NewSubscription, NewUserProfile, ProfileChanges, ProfileSeed, Subscription,
            UserProfile, DEFAULT_PLAN, DEFAULT_ROLE,
        },
    },
    service::{
        history::HistoryService,
        scan::ScanService,
        usage::{UsageGate, UsageService},
    },
    util::deadline::with_deadline,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// Before [`SessionManager::init`] has checked for an existing session.
    #[default]
    Initializing,
    SignedOut,
    /// Signed in, profile being fetched or bootstrapped.
    ProfileLoading { identity: Identity },
    /// Signed in but the profile could not be loaded. Treated as unauthenticated.
    IdentityOnly { identity: Identity },
    Ready {
        identity: Identity,
        profile: Box<UserProfile>,
    },
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::ProfileLoading { identity }
            | Self::IdentityOnly { identity }
            | Self::Ready { identity, .. } => Some(identity),
            Self::Initializing | Self::SignedOut => None,
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            Self::Ready { profile, .. } => Some(profile),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Initializing | Self::ProfileLoading { .. })
    }

    /// Identity and profile are both present.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: BackendClient,
    timeouts: Timeouts,
    site_url: Option<String>,
    state: watch::Sender<SessionState>,
    /// Today's usage for the signed-in user, shared with every usage and scan accessor.
    usage: UsageGate,
    /// Serializes profile bootstrap so concurrent sign-up and sign-in handling cannot
    /// both insert a profile.
    profile_lock: tokio::sync::Mutex<()>,
    cancel: CancellationToken,
    /// Scope of the signed-in user's change feeds, replaced on every sign-out.
    user_scope: Mutex<CancellationToken>,
}

impl SessionManager {
    /// Creates a new instance of [`SessionManager`]
    pub fn new(client: BackendClient, config: &Config) -> Self {
        let cancel = CancellationToken::new();
        let user_scope = cancel.child_token();

        Self {
            inner: Arc::new(SessionInner {
                client,
                timeouts: config.timeouts.clone(),
                site_url: config.site_url.clone(),
                state: watch::channel(SessionState::Initializing).0,
                usage: UsageGate::new(false),
                profile_lock: tokio::sync::Mutex::new(()),
                cancel,
                user_scope: Mutex::new(user_scope),
            }),
        }
    }

    pub fn client(&self) -> &BackendClient {
        &self.inner.client
    }

    /// Start the notification loop and restore the client's existing session, if any.
    ///
    /// Returns once the restored profile, if any, has been loaded.
    pub async fn init(&self) {
        let events = self.inner.client.subscribe_auth_events();
        let manager = self.clone();
        tokio::spawn(async move { manager.listen(events).await });

        match self.inner.client.session() {
            Some(session) => {
                tracing::info!(auth_user_id = %session.user.id, "Restoring existing session");
                self.handle_auth_event(AuthEvent::SignedIn(session)).await;
            }
            None => {
                self.inner.state.send_replace(SessionState::SignedOut);
            }
        }
    }

    /// Stop the notification loop and every change feed started for the user.
    pub fn dispose(&self) {
        self.inner.cancel.cancel();
    }

    async fn listen(&self, mut events: broadcast::Receiver<AuthEvent>) {
        loop {
            let event = tokio::select! {
                _ = self.inner.cancel.cancelled() => break,
                event = events.recv() => event,
            };

            match event {
                Ok(event) => self.handle_auth_event(event).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Auth event listener lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }

        tracing::debug!("Auth event listener stopped");
    }

    /// Apply one auth-state notification.
    pub async fn handle_auth_event(&self, event: AuthEvent) {
        match event {
            AuthEvent::SignedIn(session) => {
                let identity = session.user;
                self.inner.usage.clear();
                self.inner.usage.set_email_verified(identity.is_email_verified());
                self.inner.state.send_replace(SessionState::ProfileLoading {
                    identity: identity.clone(),
                });

                let next = match self.fetch_user_profile(&identity).await {
                    Some(profile) => SessionState::Ready {
                        identity,
                        profile: Box::new(profile),
                    },
                    None => SessionState::IdentityOnly { identity },
                };
                self.inner.state.send_replace(next);
            }
            AuthEvent::SignedOut => {
                self.reset_user_scope();
                self.inner.usage.clear();
                self.inner.state.send_replace(SessionState::SignedOut);
            }
            AuthEvent::UserUpdated(updated) => {
                let verified = updated.is_email_verified();
                let applied = self.inner.state.send_if_modified(|state| match state {
                    SessionState::ProfileLoading { identity }
                    | SessionState::IdentityOnly { identity }
                    | SessionState::Ready { identity, .. } => {
                        *identity = updated;
                        true
                    }
                    SessionState::Initializing | SessionState::SignedOut => false,
                });

                if applied {
                    self.inner.usage.set_email_verified(verified);
                }
            }
        }
    }

    fn reset_user_scope(&self) {
        let mut scope = self
            .inner
            .user_scope
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        scope.cancel();
        *scope = self.inner.cancel.child_token();
    }

    fn user_scope(&self) -> CancellationToken {
        self.inner
            .user_scope
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .child_token()
    }

    /// Sign in with email and password.
    ///
    /// The profile is loaded by the resulting notification, not by this call.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), Error> {
        let limit = self.inner.timeouts.sign_in;
        let auth = self.inner.client.auth();

        let result = with_deadline(limit, auth.sign_in_with_password(email, password))
            .await
            .into_result("Sign in", limit);

        match result {
            Ok(session) => {
                tracing::info!(auth_user_id = %session.user.id, "Signed in");
                Ok(())
            }
            Err(e) => {
                tracing::error!(kind = ?e.kind(), error = %e, "Sign in failed");
                Err(e)
            }
        }
    }

    /// Create an identity, then try to create its profile and subscription.
    ///
    /// Profile creation failure is logged and does not fail sign-up; the profile is
    /// bootstrapped again on the next sign-in.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        details: &SignUpDetails,
    ) -> Result<SignUpResponse, Error> {
        let limit = self.inner.timeouts.sign_up;
        let auth = self.inner.client.auth();

        let response = match with_deadline(limit, auth.sign_up(email, password, details))
            .await
            .into_result("Sign up", limit)
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(kind = ?e.kind(), error = %e, "Sign up failed");
                return Err(e);
            }
        };

        if let Some(identity) = &response.identity {
            tracing::info!(auth_user_id = %identity.id, "Signed up");

            let limit = self.inner.timeouts.profile_creation;
            let seed = ProfileSeed::from(details);
            let result = with_deadline(limit, self.ensure_user_profile(identity, seed))
                .await
                .into_result("Profile creation", limit);

            match result {
                Ok(profile) => {
                    tracing::info!(user_id = profile.user.user_id, "Created profile for new user")
                }
                Err(e) => tracing::warn!(
                    auth_user_id = %identity.id,
                    error = %e,
                    "Profile creation after sign-up failed, it will be created on first sign-in"
                ),
            }
        }

        Ok(response)
    }

    /// Sign out. Local state clears through the resulting notification.
    pub async fn sign_out(&self) -> Result<(), Error> {
        let limit = self.inner.timeouts.sign_in;

        with_deadline(limit, self.inner.client.auth().sign_out())
            .await
            .into_result("Sign out", limit)
    }

    /// Send a password reset email, redirecting back to the site when configured.
    pub async fn reset_password(&self, email: &str) -> Result<(), Error> {
        let limit = self.inner.timeouts.sign_in;
        let redirect_to = self
            .inner
            .site_url
            .as_ref()
            .map(|site| format!("{}/reset-password", site));

        with_deadline(
            limit,
            self.inner
                .client
                .auth()
                .reset_password_for_email(email, redirect_to.as_deref()),
        )
        .await
        .into_result("Password reset", limit)
    }

    /// Resend the confirmation email for the signed-in identity.
    pub async fn send_email_verification(&self) -> Result<(), Error> {
        let email = self
            .identity()
            .and_then(|identity| identity.email)
            .ok_or(AuthError::NotAuthenticated)?;
        let limit = self.inner.timeouts.sign_in;

        with_deadline(
            limit,
            self.inner.client.auth().resend_signup_verification(&email),
        )
        .await
        .into_result("Email verification", limit)
    }

    /// Load the profile for an identity, bootstrapping it when missing, and load today's
    /// usage into the shared gate.
    ///
    /// Failures are logged and yield `None`; a missing stats row is tolerated.
    pub async fn fetch_user_profile(&self, identity: &Identity) -> Option<UserProfile> {
        let limit = self.inner.timeouts.profile_creation;
        let seed = ProfileSeed::from_identity(identity);

        let profile = match with_deadline(limit, self.ensure_user_profile(identity, seed))
            .await
            .into_result("Profile fetch", limit)
        {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(auth_user_id = %identity.id, error = %e, "Failed to load user profile");
                return None;
            }
        };

        let stats = with_deadline(
            limit,
            UsageRepository::new(&self.inner.client).daily_stats(profile.user.user_id),
        )
        .await
        .into_result("Usage stats fetch", limit);

        match stats {
            // Only for the identity still signed in
            Ok(stats) if self.is_current(&identity.id) => self.inner.usage.set_stats(stats),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(user_id = profile.user.user_id, error = %e, "Failed to load usage stats")
            }
        }

        Some(profile)
    }

    /// Return the identity's profile, creating it with its Free subscription when
    /// missing. Safe to call repeatedly: the existence check always runs first.
    ///
    /// A profile left without an active subscription by an interrupted bootstrap gets
    /// its Free subscription here.
    pub async fn ensure_user_profile(
        &self,
        identity: &Identity,
        seed: ProfileSeed,
    ) -> Result<UserProfile, Error> {
        let _guard = self.inner.profile_lock.lock().await;
        let users = UserRepository::new(&self.inner.client);

        if let Some(mut profile) = users.find_by_auth_id(&identity.id).await? {
            if profile.active_subscription().is_none() {
                tracing::info!(
                    user_id = profile.user.user_id,
                    "Profile has no active subscription, creating the Free subscription"
                );
                let subscription = self.create_free_subscription(profile.user.user_id).await?;
                profile.subscription.push(subscription);
            }

            return Ok(profile);
        }

        tracing::info!(auth_user_id = %identity.id, "No profile found, creating one");

        self.create_profile_from_identity(identity, seed).await
    }

    async fn create_profile_from_identity(
        &self,
        identity: &Identity,
        seed: ProfileSeed,
    ) -> Result<UserProfile, Error> {
        let reference = ReferenceRepository::new(&self.inner.client);

        let role = reference
            .role_by_name(DEFAULT_ROLE)
            .await?
            .ok_or_else(|| AuthError::RoleNotFound(DEFAULT_ROLE.to_string()))?;

        let user = UserRepository::new(&self.inner.client)
            .create(&NewUserProfile::new(identity, seed, role.role_id))
            .await?;

        let subscription = self.create_free_subscription(user.user_id).await?;

        tracing::info!(user_id = user.user_id, "Created profile and Free subscription");

        Ok(UserProfile {
            user,
            role,
            subscription: vec![subscription],
        })
    }

    async fn create_free_subscription(&self, user_id: i32) -> Result<Subscription, Error> {
        let plan = ReferenceRepository::new(&self.inner.client)
            .plan_by_name(DEFAULT_PLAN)
            .await?
            .ok_or_else(|| AuthError::PlanNotFound(DEFAULT_PLAN.to_string()))?;

        let subscription = NewSubscription::one_year(user_id, plan.plan_id, Utc::now().date_naive());
        let mut subscription = SubscriptionRepository::new(&self.inner.client)
            .create(&subscription)
            .await?;
        subscription.plan = Some(plan);

        Ok(subscription)
    }

    /// Re-fetch the profile for the current identity.
    ///
    /// The result is dropped if the identity signed out while the fetch was running.
    pub async fn refresh_user_profile(&self) -> Result<(), Error> {
        let identity = self.identity().ok_or(AuthError::NotAuthenticated)?;
        let profile = self.fetch_user_profile(&identity).await;

        let applied = self.inner.state.send_if_modified(|state| {
            let Some(current) = state
                .identity()
                .filter(|current| current.id == identity.id)
                .cloned()
            else {
                return false;
            };

            *state = match profile {
                Some(profile) => SessionState::Ready {
                    identity: current,
                    profile: Box::new(profile),
                },
                None => SessionState::IdentityOnly { identity: current },
            };
            true
        });

        if !applied {
            tracing::debug!(auth_user_id = %identity.id, "Session ended during profile refresh");
            return Err(AuthError::NotAuthenticated.into());
        }

        Ok(())
    }

    /// The state still belongs to the identity `auth_user_id`.
    fn is_current(&self, auth_user_id: &str) -> bool {
        self.inner
            .state
            .borrow()
            .identity()
            .is_some_and(|identity| identity.id == auth_user_id)
    }

    /// Write the allowed profile fields, then refresh the profile.
    pub async fn update_profile(&self, changes: &ProfileChanges) -> Result<(), Error> {
        let profile = self.profile().ok_or(AuthError::ProfileMissing)?;
        let limit = self.inner.timeouts.profile_creation;

        with_deadline(
            limit,
            UserRepository::new(&self.inner.client).update(profile.user.user_id, changes),
        )
        .await
        .into_result("Profile update", limit)?
        .ok_or(AuthError::ProfileMissing)?;

        self.refresh_user_profile().await
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.state.borrow().identity().cloned()
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.inner.state.borrow().profile().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn is_email_verified(&self) -> bool {
        self.inner
            .state
            .borrow()
            .identity()
            .map(Identity::is_email_verified)
            .unwrap_or(false)
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    pub fn usage_stats(&self) -> Option<UsageStats> {
        self.inner.usage.stats()
    }

    /// The usage gate shared with every accessor this manager hands out.
    pub fn usage_gate(&self) -> &UsageGate {
        &self.inner.usage
    }

    /// Advisory gate from cached state: verified email and usage allowance left.
    pub fn can_perform_scan(&self) -> bool {
        self.is_authenticated() && self.inner.usage.can_perform_scan()
    }

    pub fn remaining_scans(&self) -> i32 {
        self.inner.usage.remaining_scans()
    }

    /// Usage accessor for the signed-in user, stopped on sign-out or dispose.
    pub fn usage_service(&self) -> Option<UsageService> {
        let user_id = self.profile()?.user.user_id;

        Some(UsageService::with_cancel(
            self.inner.client.clone(),
            user_id,
            self.inner.usage.clone(),
            self.user_scope(),
        ))
    }

    /// Scan accessor for the signed-in user, stopped on sign-out or dispose.
    pub fn scan_service(&self) -> Option<ScanService> {
        let user_id = self.profile()?.user.user_id;

        Some(ScanService::with_cancel(
            self.inner.client.clone(),
            user_id,
            self.inner.usage.clone(),
            self.user_scope(),
        ))
    }

    /// History accessor for the signed-in user, stopped on sign-out or dispose.
    pub fn history_service(&self) -> Option<HistoryService> {
        let user_id = self.profile()?.user.user_id;

        Some(HistoryService::with_cancel(
            self.inner.client.clone(),
            user_id,
            self.user_scope(),
        ))
    }
}
