//! Integration tests for the access decision evaluator and the audited
//! access service, backed by in-memory SurrealDB repositories.

use chrono::{Duration, TimeZone, Utc};
use greenroom_access::{AccessEvaluator, AccessService, DecisionReason};
use greenroom_core::models::context::{AccessContext, AccessRequest};
use greenroom_core::models::grant::{
    CreateRoleGrant, CreateUserGrant, GrantConditions, RESOURCE_ALL, TimeWindow,
};
use greenroom_core::models::role::Role;
use greenroom_core::repository::{
    AccessAuditRepository, AuditFilter, Pagination, RoleGrantRepository, UserGrantRepository,
};
use greenroom_db::repository::{
    SurrealAccessAuditRepository, SurrealRoleGrantRepository, SurrealUserGrantRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type UserRepo = SurrealUserGrantRepository<Db>;
type RoleRepo = SurrealRoleGrantRepository<Db>;
type AuditRepo = SurrealAccessAuditRepository<Db>;

/// Spin up an in-memory DB, run migrations, and build the repositories.
async fn setup() -> (UserRepo, RoleRepo, AuditRepo, Surreal<Db>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    greenroom_db::run_migrations(&db).await.unwrap();

    (
        SurrealUserGrantRepository::new(db.clone()),
        SurrealRoleGrantRepository::new(db.clone()),
        SurrealAccessAuditRepository::new(db.clone()),
        db,
    )
}

fn role_grant(category: &str, action: &str, resource: Option<&str>, granted: bool) -> CreateRoleGrant {
    CreateRoleGrant {
        category: category.into(),
        action: action.into(),
        resource: resource.map(String::from),
        granted,
    }
}

fn user_grant(
    user_id: Uuid,
    category: &str,
    action: &str,
    resource: Option<&str>,
    granted: bool,
) -> CreateUserGrant {
    CreateUserGrant {
        user_id,
        category: category.into(),
        action: action.into(),
        resource: resource.map(String::from),
        granted,
        conditions: None,
        expires_at: None,
        granted_by: Uuid::new_v4(),
    }
}

fn job_read_all() -> AccessRequest {
    AccessRequest::new("job_management", "read").with_resource(RESOURCE_ALL)
}

#[tokio::test]
async fn default_deny_without_any_grants() {
    let (user_repo, role_repo, _, _db) = setup().await;
    let evaluator = AccessEvaluator::new(user_repo, role_repo);

    let ctx = AccessContext::new(Uuid::new_v4(), Role::Talent);
    let decision = evaluator.decide(&ctx, &job_read_all()).await;

    assert!(!decision.allowed);
    assert_eq!(decision.reason, DecisionReason::NoMatchingGrant);
}

#[tokio::test]
async fn role_default_allows() {
    let (user_repo, role_repo, _, _db) = setup().await;
    role_repo
        .seed_role_grants(
            Role::Talent,
            vec![role_grant("job_management", "read", Some(RESOURCE_ALL), true)],
        )
        .await
        .unwrap();

    let evaluator = AccessEvaluator::new(user_repo, role_repo);
    let ctx = AccessContext::new(Uuid::new_v4(), Role::Talent);

    assert!(evaluator.evaluate(&ctx, &job_read_all()).await);
}

#[tokio::test]
async fn user_deny_beats_role_allow() {
    let (user_repo, role_repo, _, _db) = setup().await;
    let user_id = Uuid::new_v4();

    role_repo
        .seed_role_grants(
            Role::Talent,
            vec![role_grant("job_management", "read", Some(RESOURCE_ALL), true)],
        )
        .await
        .unwrap();
    user_repo
        .create(user_grant(
            user_id,
            "job_management",
            "read",
            Some(RESOURCE_ALL),
            false,
        ))
        .await
        .unwrap();

    let evaluator = AccessEvaluator::new(user_repo, role_repo);
    let ctx = AccessContext::new(user_id, Role::Talent);
    let decision = evaluator.decide(&ctx, &job_read_all()).await;

    assert!(!decision.allowed);
    assert_eq!(decision.reason, DecisionReason::UserOverrideDenied);
}

#[tokio::test]
async fn user_allow_beats_role_deny() {
    let (user_repo, role_repo, _, _db) = setup().await;
    let user_id = Uuid::new_v4();

    role_repo
        .seed_role_grants(
            Role::Talent,
            vec![role_grant("admin_panel", "read", None, false)],
        )
        .await
        .unwrap();
    user_repo
        .create(user_grant(user_id, "admin_panel", "read", None, true))
        .await
        .unwrap();

    let evaluator = AccessEvaluator::new(user_repo, role_repo);
    let ctx = AccessContext::new(user_id, Role::Talent);
    let decision = evaluator
        .decide(&ctx, &AccessRequest::new("admin_panel", "read"))
        .await;

    assert!(decision.allowed);
    assert_eq!(decision.reason, DecisionReason::UserOverrideAllowed);
}

#[tokio::test]
async fn expired_override_falls_back_to_role_default() {
    let (user_repo, role_repo, _, _db) = setup().await;
    let user_id = Uuid::new_v4();

    role_repo
        .seed_role_grants(
            Role::Talent,
            vec![role_grant("job_management", "read", Some(RESOURCE_ALL), true)],
        )
        .await
        .unwrap();

    let mut expired = user_grant(user_id, "job_management", "read", Some(RESOURCE_ALL), true);
    expired.expires_at = Some(Utc::now() - Duration::hours(1));
    user_repo.create(expired).await.unwrap();

    let evaluator = AccessEvaluator::new(user_repo, role_repo);
    let ctx = AccessContext::new(user_id, Role::Talent);
    let decision = evaluator.decide(&ctx, &job_read_all()).await;

    // The expired override is inert; the role default decides.
    assert!(decision.allowed);
    assert_eq!(decision.reason, DecisionReason::RoleDefaultAllowed);
}

#[tokio::test]
async fn expired_override_without_role_default_denies() {
    let (user_repo, role_repo, _, _db) = setup().await;
    let user_id = Uuid::new_v4();

    let mut expired = user_grant(user_id, "job_management", "read", None, true);
    expired.expires_at = Some(Utc::now() - Duration::minutes(5));
    user_repo.create(expired).await.unwrap();

    let evaluator = AccessEvaluator::new(user_repo, role_repo);
    let ctx = AccessContext::new(user_id, Role::Talent);
    let decision = evaluator
        .decide(&ctx, &AccessRequest::new("job_management", "read"))
        .await;

    assert!(!decision.allowed);
    assert_eq!(decision.reason, DecisionReason::NoMatchingGrant);
}

#[tokio::test]
async fn ip_outside_allowlist_denies_despite_grant() {
    let (user_repo, role_repo, _, _db) = setup().await;
    let user_id = Uuid::new_v4();

    let mut restricted = user_grant(user_id, "billing", "update", None, true);
    restricted.conditions = Some(GrantConditions {
        ip_allowlist: Some(vec!["10.0.0.1".into()]),
        time_window: None,
    });
    user_repo.create(restricted).await.unwrap();

    let evaluator = AccessEvaluator::new(user_repo, role_repo);

    let mut ctx = AccessContext::new(user_id, Role::Manager);
    ctx.ip_address = Some("10.0.0.2".into());
    let decision = evaluator
        .decide(&ctx, &AccessRequest::new("billing", "update"))
        .await;
    assert!(!decision.allowed);
    assert_eq!(decision.reason, DecisionReason::IpNotAllowed);

    // The allowlisted address passes.
    ctx.ip_address = Some("10.0.0.1".into());
    assert!(
        evaluator
            .evaluate(&ctx, &AccessRequest::new("billing", "update"))
            .await
    );

    // A context without an address skips the IP check.
    ctx.ip_address = None;
    assert!(
        evaluator
            .evaluate(&ctx, &AccessRequest::new("billing", "update"))
            .await
    );
}

#[tokio::test]
async fn hour_outside_time_window_denies() {
    let (user_repo, role_repo, _, _db) = setup().await;
    let user_id = Uuid::new_v4();

    let mut windowed = user_grant(user_id, "admin_panel", "update", None, true);
    windowed.conditions = Some(GrantConditions {
        ip_allowlist: None,
        time_window: Some(TimeWindow {
            start_hour: 9,
            end_hour: 17,
        }),
    });
    user_repo.create(windowed).await.unwrap();

    let evaluator = AccessEvaluator::new(user_repo, role_repo);
    let req = AccessRequest::new("admin_panel", "update");

    let mut ctx = AccessContext::new(user_id, Role::Admin);
    ctx.timestamp = Utc.with_ymd_and_hms(2026, 5, 4, 22, 0, 0).unwrap();
    let decision = evaluator.decide(&ctx, &req).await;
    assert!(!decision.allowed);
    assert_eq!(decision.reason, DecisionReason::OutsideTimeWindow);

    ctx.timestamp = Utc.with_ymd_and_hms(2026, 5, 4, 17, 0, 0).unwrap();
    assert!(evaluator.evaluate(&ctx, &req).await, "window is inclusive");
}

#[tokio::test]
async fn most_recent_override_wins() {
    let (user_repo, role_repo, _, _db) = setup().await;
    let user_id = Uuid::new_v4();

    user_repo
        .create(user_grant(user_id, "messaging", "create", None, true))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    user_repo
        .create(user_grant(user_id, "messaging", "create", None, false))
        .await
        .unwrap();

    let evaluator = AccessEvaluator::new(user_repo, role_repo);
    let ctx = AccessContext::new(user_id, Role::Talent);
    let decision = evaluator
        .decide(&ctx, &AccessRequest::new("messaging", "create"))
        .await;

    assert!(!decision.allowed);
    assert_eq!(decision.reason, DecisionReason::UserOverrideDenied);
}

#[tokio::test]
async fn all_scope_matches_specific_resource() {
    let (user_repo, role_repo, _, _db) = setup().await;
    let user_id = Uuid::new_v4();

    user_repo
        .create(user_grant(
            user_id,
            "job_management",
            "update",
            Some(RESOURCE_ALL),
            true,
        ))
        .await
        .unwrap();

    let evaluator = AccessEvaluator::new(user_repo, role_repo);
    let ctx = AccessContext::new(user_id, Role::Producer);
    let req = AccessRequest::new("job_management", "update").with_resource("job-42");

    assert!(evaluator.evaluate(&ctx, &req).await);
}

#[tokio::test]
async fn specific_scope_does_not_match_other_resources() {
    let (user_repo, role_repo, _, _db) = setup().await;
    let user_id = Uuid::new_v4();

    user_repo
        .create(user_grant(
            user_id,
            "job_management",
            "update",
            Some("job-42"),
            true,
        ))
        .await
        .unwrap();

    let evaluator = AccessEvaluator::new(user_repo, role_repo);
    let ctx = AccessContext::new(user_id, Role::Producer);

    let matching = AccessRequest::new("job_management", "update").with_resource("job-42");
    assert!(evaluator.evaluate(&ctx, &matching).await);

    let other = AccessRequest::new("job_management", "update").with_resource("job-7");
    assert!(!evaluator.evaluate(&ctx, &other).await);
}

#[tokio::test]
async fn scopeless_request_matches_scoped_role_default() {
    let (user_repo, role_repo, _, _db) = setup().await;

    role_repo
        .seed_role_grants(
            Role::Talent,
            vec![role_grant("applications", "create", Some("own"), true)],
        )
        .await
        .unwrap();

    let evaluator = AccessEvaluator::new(user_repo, role_repo);
    let ctx = AccessContext::new(Uuid::new_v4(), Role::Talent);

    // At the role layer a request without a scope matches any grant for
    // the pair, even one scoped to "own".
    assert!(
        evaluator
            .evaluate(&ctx, &AccessRequest::new("applications", "create"))
            .await
    );
}

#[tokio::test]
async fn evaluate_any_and_all() {
    let (user_repo, role_repo, _, _db) = setup().await;
    role_repo
        .seed_role_grants(
            Role::Talent,
            vec![role_grant("job_management", "read", Some(RESOURCE_ALL), true)],
        )
        .await
        .unwrap();

    let evaluator = AccessEvaluator::new(user_repo, role_repo);
    let ctx = AccessContext::new(Uuid::new_v4(), Role::Talent);

    let allowed = job_read_all();
    let denied = AccessRequest::new("admin_panel", "read");

    assert!(
        evaluator
            .evaluate_any(&ctx, &[denied.clone(), allowed.clone()])
            .await
    );
    assert!(
        !evaluator
            .evaluate_any(&ctx, &[denied.clone(), denied.clone()])
            .await
    );

    assert!(
        evaluator
            .evaluate_all(&ctx, &[allowed.clone(), allowed.clone()])
            .await
    );
    assert!(!evaluator.evaluate_all(&ctx, &[allowed, denied]).await);
}

#[tokio::test]
async fn malformed_request_is_denied() {
    let (user_repo, role_repo, _, _db) = setup().await;
    let evaluator = AccessEvaluator::new(user_repo, role_repo);
    let ctx = AccessContext::new(Uuid::new_v4(), Role::Admin);

    let decision = evaluator
        .decide(&ctx, &AccessRequest::new("job_management", ""))
        .await;
    assert!(!decision.allowed);
    assert_eq!(decision.reason, DecisionReason::MalformedRequest);

    let decision = evaluator.decide(&ctx, &AccessRequest::new("", "read")).await;
    assert_eq!(decision.reason, DecisionReason::MalformedRequest);
}

#[tokio::test]
async fn service_records_each_decision() {
    let (user_repo, role_repo, audit_repo, db) = setup().await;
    let user_id = Uuid::new_v4();

    role_repo
        .seed_role_grants(
            Role::Talent,
            vec![role_grant("job_management", "read", Some(RESOURCE_ALL), true)],
        )
        .await
        .unwrap();

    let service = AccessService::new(user_repo, role_repo, audit_repo);
    let mut ctx = AccessContext::new(user_id, Role::Talent);
    ctx.ip_address = Some("192.0.2.7".into());

    assert!(service.authorize(&ctx, &job_read_all()).await);
    assert!(
        !service
            .authorize(&ctx, &AccessRequest::new("admin_panel", "read"))
            .await
    );

    // Both decisions landed in the audit trail.
    let audit = SurrealAccessAuditRepository::new(db);
    let page = audit
        .list(
            AuditFilter {
                user_id: Some(user_id),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();

    assert_eq!(page.total, 2);
    let denied = page.items.iter().find(|e| !e.granted).unwrap();
    assert_eq!(denied.category, "admin_panel");
    assert_eq!(denied.reason, "no_matching_grant");
    assert_eq!(denied.ip_address.as_deref(), Some("192.0.2.7"));

    let allowed = page.items.iter().find(|e| e.granted).unwrap();
    assert_eq!(allowed.reason, "role_default_allowed");
}

#[tokio::test]
async fn authorize_any_short_circuits_on_first_allow() {
    let (user_repo, role_repo, audit_repo, db) = setup().await;
    let user_id = Uuid::new_v4();

    role_repo
        .seed_role_grants(
            Role::Talent,
            vec![role_grant("job_management", "read", Some(RESOURCE_ALL), true)],
        )
        .await
        .unwrap();

    let service = AccessService::new(user_repo, role_repo, audit_repo);
    let ctx = AccessContext::new(user_id, Role::Talent);

    let allowed = service
        .authorize_any(&ctx, &[job_read_all(), AccessRequest::new("admin_panel", "read")])
        .await;
    assert!(allowed);

    // Only the first request was evaluated and recorded.
    let audit = SurrealAccessAuditRepository::new(db);
    let page = audit
        .list(AuditFilter::default(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
}
