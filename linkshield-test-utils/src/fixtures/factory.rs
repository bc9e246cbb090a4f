//! JSON rows as the hosted backend returns them.

use chrono::Utc;
use serde_json::{json, Value};

use crate::constant::{FREE_PLAN_ID, FREE_ROLE_ID, TEST_ACCESS_TOKEN};

/// Create an auth identity.
///
/// # Arguments
/// - `id` - Auth service id
/// - `email` - Email address
/// - `confirmed` - Whether the email address has been confirmed
pub fn identity(id: &str, email: &str, confirmed: bool) -> Value {
    json!({
        "id": id,
        "aud": "authenticated",
        "role": "authenticated",
        "email": email,
        "email_confirmed_at": if confirmed { Some("2025-01-01T00:00:00Z") } else { None },
        "user_metadata": {},
        "created_at": "2025-01-01T00:00:00Z",
    })
}

/// Create an identity carrying sign-up metadata.
pub fn identity_with_metadata(
    id: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
    username: &str,
) -> Value {
    let mut identity = identity(id, email, false);
    identity["user_metadata"] = json!({
        "first_name": first_name,
        "last_name": last_name,
        "username": username,
    });
    identity
}

/// Wrap an identity in a session as issued by the sign-in endpoint.
pub fn session(identity: Value) -> Value {
    json!({
        "access_token": TEST_ACCESS_TOKEN,
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "test-refresh-token",
        "user": identity,
    })
}

/// The error body returned for a single-row read that matched nothing.
pub fn no_rows_error() -> Value {
    json!({
        "code": "PGRST116",
        "details": "The result contains 0 rows",
        "hint": null,
        "message": "JSON object requested, multiple (or no) rows returned",
    })
}

pub fn role(role_id: i32, name: &str) -> Value {
    json!({ "role_id": role_id, "name": name, "description": format!("{} tier", name) })
}

pub fn plan(plan_id: i32, name: &str, price: f64) -> Value {
    json!({ "plan_id": plan_id, "name": name, "description": null, "price": price })
}

/// Create an active one-year subscription row.
pub fn subscription(subscription_id: i32, user_id: i32, plan_id: i32) -> Value {
    json!({
        "subscription_id": subscription_id,
        "user_id": user_id,
        "plan_id": plan_id,
        "start_date": "2025-01-01",
        "end_date": "2026-01-01",
        "status": "active",
        "auto_renew": false,
    })
}

/// Create a `users` row on the Free role.
pub fn user_row(user_id: i32, auth_user_id: &str, email: &str, username: &str) -> Value {
    let now = Utc::now().to_rfc3339();

    json!({
        "user_id": user_id,
        "role_id": FREE_ROLE_ID,
        "email": email,
        "username": username,
        "status": "active",
        "auth_user_id": auth_user_id,
        "first_name": "User",
        "last_name": "",
        "avatar_url": null,
        "last_login": null,
        "created_at": now,
        "updated_at": now,
    })
}

/// Create a profile row joined with the Free role and an active Free subscription.
pub fn profile(user_id: i32, auth_user_id: &str, email: &str, username: &str) -> Value {
    let mut profile = user_row(user_id, auth_user_id, email, username);

    let mut subscription = subscription(1, user_id, FREE_PLAN_ID);
    subscription["plan"] = plan(FREE_PLAN_ID, "Free", 0.0);

    profile["role"] = role(FREE_ROLE_ID, "Free");
    profile["subscription"] = json!([subscription]);
    profile
}

/// Create a `daily_usage_stats` row.
///
/// Remaining scans and the limit flag are derived the way the view derives them; an
/// unlimited plan (`daily_scan_limit == -1`) reports `-1` remaining.
pub fn usage_stats(user_id: i32, daily_scan_limit: i32, scans_used_today: i32) -> Value {
    let remaining = if daily_scan_limit < 0 {
        -1
    } else {
        (daily_scan_limit - scans_used_today).max(0)
    };

    json!({
        "user_id": user_id,
        "username": "alice",
        "plan_name": if daily_scan_limit < 0 { "Pro" } else { "Free" },
        "daily_scan_limit": daily_scan_limit,
        "scans_used_today": scans_used_today,
        "remaining_scans": remaining,
        "limit_reached": daily_scan_limit >= 0 && remaining == 0,
    })
}

/// Create a `usagecounter` row for the month starting `period_start` (`YYYY-MM-DD`).
pub fn usage_counter(usage_id: i32, user_id: i32, period_start: &str, scans_used: i32) -> Value {
    json!({
        "usage_id": usage_id,
        "user_id": user_id,
        "period_start": period_start,
        "period_end": period_start,
        "scans_used": scans_used,
        "api_calls_used": 0,
        "last_reset": null,
    })
}

/// Create a `scan` row.
pub fn scan(scan_id: i32, user_id: i32, url: &str, status: &str) -> Value {
    json!({
        "scan_id": scan_id,
        "user_id": user_id,
        "url_scanned": url,
        "scan_type": "full",
        "submitted_at": Utc::now().to_rfc3339(),
        "started_at": null,
        "analyzed_at": null,
        "completed_at": null,
        "status": status,
        "progress": if status == "completed" { 100 } else { 0 },
        "error_message": null,
        "scan_duration_seconds": null,
    })
}

/// Create a `scan` row joined with empty report relations.
pub fn scan_with_details(scan_id: i32, user_id: i32, url: &str, status: &str) -> Value {
    let mut scan = scan(scan_id, user_id, url, status);
    scan["detailedreport"] = json!([]);
    scan["threatsummary"] = json!([]);
    scan
}

/// Create a `history` row.
pub fn history(history_id: i32, user_id: i32, scan_id: i32, is_favorite: bool) -> Value {
    json!({
        "history_id": history_id,
        "user_id": user_id,
        "scan_id": scan_id,
        "saved_at": Utc::now().to_rfc3339(),
        "notes": null,
        "is_favorite": is_favorite,
    })
}

/// Create a `history` row joined with its scan.
pub fn history_entry(history_id: i32, user_id: i32, scan_id: i32, is_favorite: bool) -> Value {
    let mut entry = history(history_id, user_id, scan_id, is_favorite);
    entry["scan"] = scan_with_details(scan_id, user_id, "https://example.com", "completed");
    entry
}
