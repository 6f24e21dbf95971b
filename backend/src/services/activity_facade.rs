//! Domain-named entry points over [`ActivityRecorder`].
//!
//! Each namespace fixes the action, and the role where the family implies
//! one, so call sites read as `activity.payout().processed(..)`.

use crate::models::{
    activity_log::{ActivityAction, ActivityMetadata, ActivityTarget, ActorRole},
    affiliate::NotePriority,
};
use crate::services::activity_log::{ActivityEvent, ActivityRecorder, RequestContext};

#[derive(Clone)]
pub struct ActivityLogger {
    recorder: ActivityRecorder,
}

impl ActivityLogger {
    pub fn new(recorder: ActivityRecorder) -> Self {
        Self { recorder }
    }

    pub fn blog_post(&self) -> BlogPostActivity<'_> {
        BlogPostActivity(&self.recorder)
    }

    pub fn category(&self) -> CategoryActivity<'_> {
        CategoryActivity(&self.recorder)
    }

    pub fn faq(&self) -> FaqActivity<'_> {
        FaqActivity(&self.recorder)
    }

    pub fn settings(&self) -> SettingsActivity<'_> {
        SettingsActivity(&self.recorder)
    }

    pub fn auth(&self) -> AuthActivity<'_> {
        AuthActivity(&self.recorder)
    }

    pub fn user(&self) -> UserActivity<'_> {
        UserActivity(&self.recorder)
    }

    pub fn affiliate(&self) -> AffiliateActivity<'_> {
        AffiliateActivity(&self.recorder)
    }

    pub fn payout(&self) -> PayoutActivity<'_> {
        PayoutActivity(&self.recorder)
    }

    pub fn payment_provider(&self) -> PaymentProviderActivity<'_> {
        PaymentProviderActivity(&self.recorder)
    }
}

fn as_admin(
    actor_id: &str,
    action: ActivityAction,
    context: Option<&RequestContext>,
) -> ActivityEvent {
    ActivityEvent::new(actor_id, ActorRole::Admin, action).with_context(context)
}

fn as_affiliate(
    actor_id: &str,
    action: ActivityAction,
    context: Option<&RequestContext>,
) -> ActivityEvent {
    ActivityEvent::new(actor_id, ActorRole::Affiliate, action).with_context(context)
}

fn changed(fields: Vec<String>) -> ActivityMetadata {
    ActivityMetadata::ChangedFields { fields }
}

pub struct BlogPostActivity<'a>(&'a ActivityRecorder);

impl BlogPostActivity<'_> {
    fn target(post_id: &str, title: &str) -> ActivityTarget {
        ActivityTarget::BlogPost {
            post_id: post_id.to_string(),
            title: title.to_string(),
        }
    }

    pub async fn created(
        &self,
        actor_id: &str,
        post_id: &str,
        title: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::CreatedBlogPost, context)
            .with_target(Self::target(post_id, title));
        self.0.record(event).await;
    }

    pub async fn updated(
        &self,
        actor_id: &str,
        post_id: &str,
        title: &str,
        fields: Vec<String>,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::UpdatedBlogPost, context)
            .with_target(Self::target(post_id, title))
            .with_metadata(changed(fields));
        self.0.record(event).await;
    }

    pub async fn deleted(
        &self,
        actor_id: &str,
        post_id: &str,
        title: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::DeletedBlogPost, context)
            .with_target(Self::target(post_id, title));
        self.0.record(event).await;
    }

    pub async fn published(
        &self,
        actor_id: &str,
        post_id: &str,
        title: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::PublishedBlogPost, context)
            .with_target(Self::target(post_id, title));
        self.0.record(event).await;
    }

    pub async fn unpublished(
        &self,
        actor_id: &str,
        post_id: &str,
        title: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::UnpublishedBlogPost, context)
            .with_target(Self::target(post_id, title));
        self.0.record(event).await;
    }
}

pub struct CategoryActivity<'a>(&'a ActivityRecorder);

impl CategoryActivity<'_> {
    async fn record(
        &self,
        action: ActivityAction,
        actor_id: &str,
        category_id: &str,
        name: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, action, context).with_target(ActivityTarget::Category {
            category_id: category_id.to_string(),
            name: name.to_string(),
        });
        self.0.record(event).await;
    }

    pub async fn created(
        &self,
        actor_id: &str,
        category_id: &str,
        name: &str,
        context: Option<&RequestContext>,
    ) {
        self.record(ActivityAction::CreatedCategory, actor_id, category_id, name, context)
            .await;
    }

    pub async fn updated(
        &self,
        actor_id: &str,
        category_id: &str,
        name: &str,
        context: Option<&RequestContext>,
    ) {
        self.record(ActivityAction::UpdatedCategory, actor_id, category_id, name, context)
            .await;
    }

    pub async fn deleted(
        &self,
        actor_id: &str,
        category_id: &str,
        name: &str,
        context: Option<&RequestContext>,
    ) {
        self.record(ActivityAction::DeletedCategory, actor_id, category_id, name, context)
            .await;
    }
}

pub struct FaqActivity<'a>(&'a ActivityRecorder);

impl FaqActivity<'_> {
    async fn record(
        &self,
        action: ActivityAction,
        actor_id: &str,
        faq_id: &str,
        question: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, action, context).with_target(ActivityTarget::Faq {
            faq_id: faq_id.to_string(),
            question: question.to_string(),
        });
        self.0.record(event).await;
    }

    pub async fn created(
        &self,
        actor_id: &str,
        faq_id: &str,
        question: &str,
        context: Option<&RequestContext>,
    ) {
        self.record(ActivityAction::CreatedFaq, actor_id, faq_id, question, context)
            .await;
    }

    pub async fn updated(
        &self,
        actor_id: &str,
        faq_id: &str,
        question: &str,
        context: Option<&RequestContext>,
    ) {
        self.record(ActivityAction::UpdatedFaq, actor_id, faq_id, question, context)
            .await;
    }

    pub async fn deleted(
        &self,
        actor_id: &str,
        faq_id: &str,
        question: &str,
        context: Option<&RequestContext>,
    ) {
        self.record(ActivityAction::DeletedFaq, actor_id, faq_id, question, context)
            .await;
    }
}

pub struct SettingsActivity<'a>(&'a ActivityRecorder);

impl SettingsActivity<'_> {
    pub async fn updated(
        &self,
        actor_id: &str,
        fields: Vec<String>,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::UpdatedGlobalSettings, context)
            .with_target(ActivityTarget::GlobalSettings)
            .with_metadata(changed(fields));
        self.0.record(event).await;
    }
}

pub struct AuthActivity<'a>(&'a ActivityRecorder);

impl AuthActivity<'_> {
    pub async fn admin_login(&self, actor_id: &str, context: Option<&RequestContext>) {
        self.0
            .record(as_admin(actor_id, ActivityAction::AdminLogin, context))
            .await;
    }

    pub async fn affiliate_login(&self, actor_id: &str, context: Option<&RequestContext>) {
        self.0
            .record(as_affiliate(actor_id, ActivityAction::AffiliateLogin, context))
            .await;
    }

    pub async fn user_login(&self, actor_id: &str, context: Option<&RequestContext>) {
        let event = ActivityEvent::new(actor_id, ActorRole::User, ActivityAction::UserLogin)
            .with_context(context);
        self.0.record(event).await;
    }

    /// Picks the login action matching the role held right now.
    pub async fn login(&self, actor_id: &str, role: ActorRole, context: Option<&RequestContext>) {
        match role {
            ActorRole::Admin => self.admin_login(actor_id, context).await,
            ActorRole::Affiliate => self.affiliate_login(actor_id, context).await,
            ActorRole::User => self.user_login(actor_id, context).await,
        }
    }

    /// The attempted email stands in for the actor, who is not authenticated.
    pub async fn failed_login(&self, email: &str, reason: &str, context: Option<&RequestContext>) {
        let event = ActivityEvent::new(email, ActorRole::User, ActivityAction::FailedLogin)
            .with_metadata(ActivityMetadata::Failure {
                reason: reason.to_string(),
            })
            .with_context(context);
        self.0.record(event).await;
    }

    pub async fn logout(&self, actor_id: &str, role: ActorRole, context: Option<&RequestContext>) {
        let event =
            ActivityEvent::new(actor_id, role, ActivityAction::Logout).with_context(context);
        self.0.record(event).await;
    }
}

pub struct UserActivity<'a>(&'a ActivityRecorder);

impl UserActivity<'_> {
    fn target(user_id: &str, email: &str) -> ActivityTarget {
        ActivityTarget::User {
            user_id: user_id.to_string(),
            email: email.to_string(),
        }
    }

    pub async fn created(
        &self,
        actor_id: &str,
        user_id: &str,
        email: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::CreatedUser, context)
            .with_target(Self::target(user_id, email));
        self.0.record(event).await;
    }

    pub async fn role_changed(
        &self,
        actor_id: &str,
        user_id: &str,
        email: &str,
        from: ActorRole,
        to: ActorRole,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::ChangedUserRole, context)
            .with_target(Self::target(user_id, email))
            .with_metadata(ActivityMetadata::RoleChange { from, to });
        self.0.record(event).await;
    }

    pub async fn deleted(
        &self,
        actor_id: &str,
        user_id: &str,
        email: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::DeletedUser, context)
            .with_target(Self::target(user_id, email));
        self.0.record(event).await;
    }
}

pub struct AffiliateActivity<'a>(&'a ActivityRecorder);

impl AffiliateActivity<'_> {
    fn target(affiliate_id: &str, company_name: Option<&str>) -> ActivityTarget {
        ActivityTarget::Affiliate {
            affiliate_id: affiliate_id.to_string(),
            company_name: company_name.map(str::to_string),
        }
    }

    pub async fn created(
        &self,
        actor_id: &str,
        affiliate_id: &str,
        company_name: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::CreatedAffiliate, context)
            .with_target(Self::target(affiliate_id, Some(company_name)));
        self.0.record(event).await;
    }

    pub async fn profile_updated(
        &self,
        actor_id: &str,
        affiliate_id: &str,
        fields: Vec<String>,
        context: Option<&RequestContext>,
    ) {
        let event = as_affiliate(actor_id, ActivityAction::UpdatedAffiliateProfile, context)
            .with_target(Self::target(affiliate_id, None))
            .with_metadata(changed(fields));
        self.0.record(event).await;
    }

    pub async fn page_edited(
        &self,
        actor_id: &str,
        affiliate_id: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_affiliate(actor_id, ActivityAction::EditedAffiliatePage, context)
            .with_target(Self::target(affiliate_id, None));
        self.0.record(event).await;
    }

    pub async fn approved(
        &self,
        actor_id: &str,
        affiliate_id: &str,
        company_name: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::ApprovedAffiliate, context)
            .with_target(Self::target(affiliate_id, Some(company_name)));
        self.0.record(event).await;
    }

    pub async fn suspended(
        &self,
        actor_id: &str,
        affiliate_id: &str,
        company_name: &str,
        reason: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::SuspendedAffiliate, context)
            .with_target(Self::target(affiliate_id, Some(company_name)))
            .with_metadata(ActivityMetadata::Reason {
                reason: reason.to_string(),
            });
        self.0.record(event).await;
    }

    pub async fn note_added(
        &self,
        actor_id: &str,
        affiliate_id: &str,
        priority: NotePriority,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::AddedAffiliateNote, context)
            .with_target(Self::target(affiliate_id, None))
            .with_metadata(ActivityMetadata::Note { priority });
        self.0.record(event).await;
    }
}

pub struct PayoutActivity<'a>(&'a ActivityRecorder);

impl PayoutActivity<'_> {
    fn target(payout_id: &str, affiliate_id: &str) -> ActivityTarget {
        ActivityTarget::Payout {
            payout_id: payout_id.to_string(),
            affiliate_id: affiliate_id.to_string(),
        }
    }

    pub async fn requested(
        &self,
        actor_id: &str,
        payout_id: &str,
        affiliate_id: &str,
        amount_cents: i64,
        currency: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_affiliate(actor_id, ActivityAction::RequestedPayout, context)
            .with_target(Self::target(payout_id, affiliate_id))
            .with_metadata(ActivityMetadata::Amount {
                amount_cents,
                currency: currency.to_string(),
            });
        self.0.record(event).await;
    }

    pub async fn processed(
        &self,
        actor_id: &str,
        payout_id: &str,
        affiliate_id: &str,
        amount_cents: i64,
        currency: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::ProcessedPayout, context)
            .with_target(Self::target(payout_id, affiliate_id))
            .with_metadata(ActivityMetadata::Amount {
                amount_cents,
                currency: currency.to_string(),
            });
        self.0.record(event).await;
    }

    pub async fn failed(
        &self,
        actor_id: &str,
        payout_id: &str,
        affiliate_id: &str,
        reason: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::FailedPayout, context)
            .with_target(Self::target(payout_id, affiliate_id))
            .with_metadata(ActivityMetadata::Failure {
                reason: reason.to_string(),
            });
        self.0.record(event).await;
    }
}

pub struct PaymentProviderActivity<'a>(&'a ActivityRecorder);

impl PaymentProviderActivity<'_> {
    fn target(affiliate_id: &str) -> ActivityTarget {
        ActivityTarget::Affiliate {
            affiliate_id: affiliate_id.to_string(),
            company_name: None,
        }
    }

    pub async fn account_created(
        &self,
        actor_id: &str,
        affiliate_id: &str,
        account_id: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::CreatedPaymentAccount, context)
            .with_target(Self::target(affiliate_id))
            .with_metadata(ActivityMetadata::PaymentAccount {
                account_id: account_id.to_string(),
            });
        self.0.record(event).await;
    }

    pub async fn onboarding_completed(
        &self,
        actor_id: &str,
        affiliate_id: &str,
        account_id: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::CompletedPaymentOnboarding, context)
            .with_target(Self::target(affiliate_id))
            .with_metadata(ActivityMetadata::PaymentAccount {
                account_id: account_id.to_string(),
            });
        self.0.record(event).await;
    }

    pub async fn onboarding_failed(
        &self,
        actor_id: &str,
        affiliate_id: &str,
        reason: &str,
        context: Option<&RequestContext>,
    ) {
        let event = as_admin(actor_id, ActivityAction::FailedPaymentOnboarding, context)
            .with_target(Self::target(affiliate_id))
            .with_metadata(ActivityMetadata::Failure {
                reason: reason.to_string(),
            });
        self.0.record(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity_log::NewActivityLog;
    use crate::services::activity_log::MockActivityLogStore;
    use std::sync::{Arc, Mutex};

    fn capturing_logger() -> (ActivityLogger, Arc<Mutex<Vec<NewActivityLog>>>) {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();
        let mut store = MockActivityLogStore::new();
        store.expect_insert().returning(move |log| {
            sink.lock().unwrap().push(log.clone());
            Ok(())
        });
        let logger = ActivityLogger::new(ActivityRecorder::new(Arc::new(store)));
        (logger, captured)
    }

    #[tokio::test]
    async fn blog_post_helpers_fix_action_and_admin_role() {
        let (logger, captured) = capturing_logger();
        logger
            .blog_post()
            .updated("admin-1", "post-1", "Why ICE matters", vec!["title".into()], None)
            .await;

        let logs = captured.lock().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, ActivityAction::UpdatedBlogPost);
        assert_eq!(logs[0].actor_role, ActorRole::Admin);
        assert_eq!(
            logs[0].target.as_ref().and_then(|t| t.pointer("/data/title")),
            Some(&serde_json::json!("Why ICE matters"))
        );
    }

    #[tokio::test]
    async fn login_dispatches_on_current_role() {
        let (logger, captured) = capturing_logger();
        let context = RequestContext {
            ip_address: Some("1.2.3.4".into()),
            user_agent: Some("agent".into()),
            request_id: None,
        };
        logger
            .auth()
            .login("user-1", ActorRole::Affiliate, Some(&context))
            .await;
        logger.auth().login("user-1", ActorRole::User, None).await;

        let logs = captured.lock().unwrap();
        assert_eq!(logs[0].action, ActivityAction::AffiliateLogin);
        assert_eq!(logs[0].actor_role, ActorRole::Affiliate);
        assert_eq!(logs[0].ip_address.as_deref(), Some("1.2.3.4"));
        assert_eq!(logs[1].action, ActivityAction::UserLogin);
        assert_eq!(logs[1].ip_address, None);
    }

    #[tokio::test]
    async fn payout_helpers_attach_amounts() {
        let (logger, captured) = capturing_logger();
        logger
            .payout()
            .requested("aff-user", "payout-1", "aff-1", 12_500, "USD", None)
            .await;
        logger
            .payout()
            .processed("admin-1", "payout-1", "aff-1", 12_500, "USD", None)
            .await;

        let logs = captured.lock().unwrap();
        assert_eq!(logs[0].actor_role, ActorRole::Affiliate);
        assert_eq!(logs[1].actor_role, ActorRole::Admin);
        assert!(logs.iter().all(|log| log.action.is_payment_related()));
        assert_eq!(
            logs[1].metadata,
            Some(serde_json::json!({
                "type": "amount",
                "data": { "amount_cents": 12500, "currency": "USD" }
            }))
        );
    }

    #[tokio::test]
    async fn suspension_reason_is_not_recorded_as_a_failure() {
        let (logger, captured) = capturing_logger();
        logger
            .affiliate()
            .suspended("admin-1", "aff-1", "Igloo Treats", "Chargebacks", None)
            .await;

        let logs = captured.lock().unwrap();
        assert_eq!(logs[0].action, ActivityAction::SuspendedAffiliate);
        assert_eq!(
            logs[0].metadata,
            Some(serde_json::json!({
                "type": "reason",
                "data": { "reason": "Chargebacks" }
            }))
        );
    }
}
