#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    error::ErrorResponse,
    handlers::admin::{
        ActivityLogDetailResponse, ActivityLogListQuery, ActivityLogListResponse,
        AffiliateActivityQuery, PayoutListQuery,
    },
    models::{
        activity_log::{
            ActionFamily, ActivityAction, ActivityLogItem, ActivityStats, ActorRole,
            AffiliateActivityItem, AffiliateActivityStats, AffiliateRef, RoleCount,
        },
        affiliate::{
            AffiliateNote, AffiliateProfile, AffiliateStatus, CreateAffiliateNotePayload,
            CreateAffiliatePayload, EditAffiliatePagePayload, FailPayoutPayload, NotePriority,
            Payout, PayoutStatus, RequestPayoutPayload, SuspendAffiliatePayload,
            UpdateAffiliateProfilePayload,
        },
        content::{
            BlogPost, Category, CategoryPayload, CreateBlogPostPayload, Faq, FaqPayload,
            GlobalSettings, UpdateBlogPostPayload, UpdateGlobalSettingsPayload,
        },
        user::{ChangeRoleRequest, CreateUser, LoginRequest, LoginResponse, UserResponse},
    },
    read_models::{
        ActivityDashboardStats, ActivityRange, ActivityRowDetail, AffiliateActivityResponse,
        AffiliateSummary, RoleShare, TimelineEntry,
    },
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        login_doc,
        logout_doc,
        me_doc,
        affiliate_profile_doc,
        affiliate_update_profile_doc,
        affiliate_edit_page_doc,
        affiliate_request_payout_doc,
        admin_list_activity_logs_doc,
        admin_activity_stats_doc,
        admin_activity_log_detail_doc,
        admin_affiliate_activity_doc,
        admin_list_blog_posts_doc,
        admin_create_blog_post_doc,
        admin_update_blog_post_doc,
        admin_delete_blog_post_doc,
        admin_publish_blog_post_doc,
        admin_unpublish_blog_post_doc,
        admin_list_categories_doc,
        admin_create_category_doc,
        admin_update_category_doc,
        admin_delete_category_doc,
        admin_list_faqs_doc,
        admin_create_faq_doc,
        admin_update_faq_doc,
        admin_delete_faq_doc,
        admin_get_settings_doc,
        admin_update_settings_doc,
        admin_list_users_doc,
        admin_create_user_doc,
        admin_change_user_role_doc,
        admin_delete_user_doc,
        admin_list_affiliates_doc,
        admin_create_affiliate_doc,
        admin_approve_affiliate_doc,
        admin_suspend_affiliate_doc,
        admin_list_affiliate_notes_doc,
        admin_add_affiliate_note_doc,
        admin_create_payment_account_doc,
        admin_list_payouts_doc,
        admin_process_payout_doc,
        admin_fail_payout_doc
    ),
    components(
        schemas(
            // auth
            LoginRequest,
            LoginResponse,
            UserResponse,
            ErrorResponse,
            // activity
            ActorRole,
            ActivityAction,
            ActionFamily,
            ActivityLogItem,
            ActivityStats,
            RoleCount,
            RoleShare,
            ActivityDashboardStats,
            ActivityRowDetail,
            ActivityLogListQuery,
            ActivityLogListResponse,
            ActivityLogDetailResponse,
            ActivityRange,
            AffiliateRef,
            AffiliateActivityItem,
            AffiliateActivityStats,
            AffiliateActivityQuery,
            AffiliateActivityResponse,
            AffiliateSummary,
            TimelineEntry,
            // content
            BlogPost,
            CreateBlogPostPayload,
            UpdateBlogPostPayload,
            Category,
            CategoryPayload,
            Faq,
            FaqPayload,
            GlobalSettings,
            UpdateGlobalSettingsPayload,
            // users
            CreateUser,
            ChangeRoleRequest,
            // affiliates
            AffiliateProfile,
            AffiliateStatus,
            CreateAffiliatePayload,
            UpdateAffiliateProfilePayload,
            EditAffiliatePagePayload,
            SuspendAffiliatePayload,
            AffiliateNote,
            NotePriority,
            CreateAffiliateNotePayload,
            Payout,
            PayoutStatus,
            PayoutListQuery,
            RequestPayoutPayload,
            FailPayoutPayload
        )
    ),
    tags(
        (name = "Auth"),
        (name = "Affiliate"),
        (name = "Activity"),
        (name = "Content"),
        (name = "Users"),
        (name = "Affiliates"),
        (name = "Payouts")
    ),
    modifiers(&SecuritySchemes),
    security(("BearerAuth" = []))
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_string());

        components.add_security_scheme("BearerAuth", SecurityScheme::Http(bearer));
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Auth",
    security(())
)]
fn login_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 204, description = "Signed out")),
    tag = "Auth"
)]
fn logout_doc() {}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses((status = 200, description = "Current user", body = UserResponse)),
    tag = "Auth"
)]
fn me_doc() {}

#[utoipa::path(
    get,
    path = "/api/affiliate/profile",
    responses(
        (status = 200, body = AffiliateProfile),
        (status = 404, description = "No profile for this account", body = ErrorResponse)
    ),
    tag = "Affiliate"
)]
fn affiliate_profile_doc() {}

#[utoipa::path(
    put,
    path = "/api/affiliate/profile",
    request_body = UpdateAffiliateProfilePayload,
    responses((status = 200, body = AffiliateProfile)),
    tag = "Affiliate"
)]
fn affiliate_update_profile_doc() {}

#[utoipa::path(
    put,
    path = "/api/affiliate/page",
    request_body = EditAffiliatePagePayload,
    responses((status = 200, body = AffiliateProfile)),
    tag = "Affiliate"
)]
fn affiliate_edit_page_doc() {}

#[utoipa::path(
    post,
    path = "/api/affiliate/payouts",
    request_body = RequestPayoutPayload,
    responses(
        (status = 201, body = Payout),
        (status = 403, description = "Affiliate is not active", body = ErrorResponse)
    ),
    tag = "Affiliate"
)]
fn affiliate_request_payout_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/activity-logs",
    params(ActivityLogListQuery),
    responses(
        (status = 200, description = "Newest first, at most 500 rows", body = ActivityLogListResponse),
        (status = 400, description = "Invalid filter", body = ErrorResponse)
    ),
    tag = "Activity"
)]
fn admin_list_activity_logs_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/activity-logs/stats",
    responses((status = 200, body = ActivityDashboardStats)),
    tag = "Activity"
)]
fn admin_activity_stats_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/activity-logs/{id}",
    params(("id" = String, Path, description = "Activity log id")),
    responses(
        (status = 200, body = ActivityLogDetailResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Activity"
)]
fn admin_activity_log_detail_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/affiliate-activity",
    params(AffiliateActivityQuery),
    responses(
        (status = 200, body = AffiliateActivityResponse),
        (status = 400, description = "Unknown range", body = ErrorResponse)
    ),
    tag = "Activity"
)]
fn admin_affiliate_activity_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/blog-posts",
    responses((status = 200, body = [BlogPost])),
    tag = "Content"
)]
fn admin_list_blog_posts_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/blog-posts",
    request_body = CreateBlogPostPayload,
    responses((status = 201, body = BlogPost)),
    tag = "Content"
)]
fn admin_create_blog_post_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/blog-posts/{id}",
    params(("id" = String, Path)),
    request_body = UpdateBlogPostPayload,
    responses((status = 200, body = BlogPost), (status = 404, body = ErrorResponse)),
    tag = "Content"
)]
fn admin_update_blog_post_doc() {}

#[utoipa::path(
    delete,
    path = "/api/admin/blog-posts/{id}",
    params(("id" = String, Path)),
    responses((status = 204), (status = 404, body = ErrorResponse)),
    tag = "Content"
)]
fn admin_delete_blog_post_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/blog-posts/{id}/publish",
    params(("id" = String, Path)),
    responses((status = 200, body = BlogPost)),
    tag = "Content"
)]
fn admin_publish_blog_post_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/blog-posts/{id}/unpublish",
    params(("id" = String, Path)),
    responses((status = 200, body = BlogPost)),
    tag = "Content"
)]
fn admin_unpublish_blog_post_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/categories",
    responses((status = 200, body = [Category])),
    tag = "Content"
)]
fn admin_list_categories_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CategoryPayload,
    responses((status = 201, body = Category)),
    tag = "Content"
)]
fn admin_create_category_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(("id" = String, Path)),
    request_body = CategoryPayload,
    responses((status = 200, body = Category)),
    tag = "Content"
)]
fn admin_update_category_doc() {}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(("id" = String, Path)),
    responses((status = 204)),
    tag = "Content"
)]
fn admin_delete_category_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/faqs",
    responses((status = 200, body = [Faq])),
    tag = "Content"
)]
fn admin_list_faqs_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/faqs",
    request_body = FaqPayload,
    responses((status = 201, body = Faq)),
    tag = "Content"
)]
fn admin_create_faq_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/faqs/{id}",
    params(("id" = String, Path)),
    request_body = FaqPayload,
    responses((status = 200, body = Faq)),
    tag = "Content"
)]
fn admin_update_faq_doc() {}

#[utoipa::path(
    delete,
    path = "/api/admin/faqs/{id}",
    params(("id" = String, Path)),
    responses((status = 204)),
    tag = "Content"
)]
fn admin_delete_faq_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses((status = 200, body = GlobalSettings)),
    tag = "Content"
)]
fn admin_get_settings_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = UpdateGlobalSettingsPayload,
    responses((status = 200, body = GlobalSettings), (status = 400, body = ErrorResponse)),
    tag = "Content"
)]
fn admin_update_settings_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses((status = 200, body = [UserResponse])),
    tag = "Users"
)]
fn admin_list_users_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = CreateUser,
    responses((status = 201, body = UserResponse), (status = 409, body = ErrorResponse)),
    tag = "Users"
)]
fn admin_create_user_doc() {}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/role",
    params(("id" = String, Path)),
    request_body = ChangeRoleRequest,
    responses((status = 200, body = UserResponse), (status = 400, body = ErrorResponse)),
    tag = "Users"
)]
fn admin_change_user_role_doc() {}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(("id" = String, Path)),
    responses((status = 204), (status = 404, body = ErrorResponse)),
    tag = "Users"
)]
fn admin_delete_user_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/affiliates",
    responses((status = 200, body = [AffiliateProfile])),
    tag = "Affiliates"
)]
fn admin_list_affiliates_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/affiliates",
    request_body = CreateAffiliatePayload,
    responses((status = 201, body = AffiliateProfile)),
    tag = "Affiliates"
)]
fn admin_create_affiliate_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/affiliates/{id}/approve",
    params(("id" = String, Path)),
    responses((status = 200, body = AffiliateProfile)),
    tag = "Affiliates"
)]
fn admin_approve_affiliate_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/affiliates/{id}/suspend",
    params(("id" = String, Path)),
    request_body = SuspendAffiliatePayload,
    responses((status = 200, body = AffiliateProfile)),
    tag = "Affiliates"
)]
fn admin_suspend_affiliate_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/affiliates/{id}/notes",
    params(("id" = String, Path)),
    responses((status = 200, body = [AffiliateNote])),
    tag = "Affiliates"
)]
fn admin_list_affiliate_notes_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/affiliates/{id}/notes",
    params(("id" = String, Path)),
    request_body = CreateAffiliateNotePayload,
    responses((status = 201, body = AffiliateNote)),
    tag = "Affiliates"
)]
fn admin_add_affiliate_note_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/affiliates/{id}/payment-account",
    params(("id" = String, Path)),
    responses(
        (status = 201, body = AffiliateProfile),
        (status = 409, description = "Already onboarded or suspended", body = ErrorResponse)
    ),
    tag = "Affiliates"
)]
fn admin_create_payment_account_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin/payouts",
    params(PayoutListQuery),
    responses((status = 200, body = [Payout])),
    tag = "Payouts"
)]
fn admin_list_payouts_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/payouts/{id}/process",
    params(("id" = String, Path)),
    responses((status = 200, body = Payout), (status = 409, body = ErrorResponse)),
    tag = "Payouts"
)]
fn admin_process_payout_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin/payouts/{id}/fail",
    params(("id" = String, Path)),
    request_body = FailPayoutPayload,
    responses((status = 200, body = Payout), (status = 409, body = ErrorResponse)),
    tag = "Payouts"
)]
fn admin_fail_payout_doc() {}
