//! The single set of usage gating rules.
//!
//! Limited plans derive remaining scans and the limit flag from the counts so the result
//! never depends on how the view rounds or caches them. Unlimited plans never reach a
//! limit; their remaining figure is whatever the view reports, clamped to zero.

use crate::model::usage::{DailyLimit, PlanLimits, UsageStats};

#[derive(Debug, Clone, Copy, Default)]
pub struct UsagePolicy;

impl UsagePolicy {
    /// Scans left today, never negative. `0` without stats.
    pub fn remaining_scans(stats: Option<&UsageStats>) -> i32 {
        let Some(stats) = stats else { return 0 };

        match stats.daily_limit() {
            DailyLimit::Limited(limit) => (limit - stats.scans_used_today).max(0),
            DailyLimit::Unlimited => stats.remaining_scans.max(0),
        }
    }

    pub fn limit_reached(stats: Option<&UsageStats>) -> bool {
        match stats {
            Some(stats) => match stats.daily_limit() {
                DailyLimit::Limited(_) => Self::remaining_scans(Some(stats)) == 0,
                DailyLimit::Unlimited => false,
            },
            None => false,
        }
    }

    /// A scan is allowed when the email is verified, stats exist and the daily limit has
    /// not been reached.
    pub fn can_perform_scan(email_verified: bool, stats: Option<&UsageStats>) -> bool {
        email_verified && stats.is_some() && !Self::limit_reached(stats)
    }

    /// Share of today's allowance used, `0..=100`. Unlimited plans and missing stats
    /// report `0`; a zero limit reports `100`.
    pub fn usage_percentage(stats: Option<&UsageStats>) -> u8 {
        let Some(stats) = stats else { return 0 };

        match stats.daily_limit() {
            DailyLimit::Unlimited => 0,
            DailyLimit::Limited(0) => 100,
            DailyLimit::Limited(limit) => {
                let used = f64::from(stats.scans_used_today.max(0));
                let percentage = (used / f64::from(limit) * 100.0).min(100.0);

                percentage as u8
            }
        }
    }

    pub fn plan_limits(stats: Option<&UsageStats>) -> Option<PlanLimits> {
        let stats = stats?;

        Some(PlanLimits {
            daily: stats.daily_limit(),
            used: stats.scans_used_today.max(0),
            remaining: Self::remaining_scans(Some(stats)),
            plan: stats.plan_name.clone().unwrap_or_else(|| "Free".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::usage::UNLIMITED;

    fn stats(limit: i32, used: i32, view_remaining: i32) -> UsageStats {
        UsageStats {
            user_id: 7,
            username: Some("alice".to_string()),
            plan_name: Some("Free".to_string()),
            daily_scan_limit: limit,
            scans_used_today: used,
            remaining_scans: view_remaining,
            // Ignored for limited plans.
            limit_reached: false,
        }
    }

    mod limited_tests {
        use super::*;

        /// Expect remaining to be derived from counts for every usage level
        #[test]
        fn remaining_is_limit_minus_used() {
            for (limit, used) in [(50, 0), (50, 49), (50, 50), (50, 75), (0, 0), (1, 3)] {
                let stats = stats(limit, used, 999);
                let remaining = UsagePolicy::remaining_scans(Some(&stats));

                assert_eq!(remaining, (limit - used).max(0));
                assert_eq!(UsagePolicy::limit_reached(Some(&stats)), remaining == 0);
            }
        }

        /// Expect the gate to close once the limit is reached
        #[test]
        fn gate_closes_at_limit() {
            assert!(UsagePolicy::can_perform_scan(true, Some(&stats(50, 49, 1))));
            assert!(!UsagePolicy::can_perform_scan(true, Some(&stats(50, 50, 0))));
        }

        #[test]
        fn percentage_is_capped() {
            assert_eq!(UsagePolicy::usage_percentage(Some(&stats(50, 25, 25))), 50);
            assert_eq!(UsagePolicy::usage_percentage(Some(&stats(50, 80, 0))), 100);
        }

        /// Expect a zero limit to report full usage
        #[test]
        fn zero_limit_is_full() {
            assert_eq!(UsagePolicy::usage_percentage(Some(&stats(0, 0, 0))), 100);
        }
    }

    mod unlimited_tests {
        use super::*;

        /// Expect unlimited plans to report no usage and never reach a limit
        #[test]
        fn never_limited() {
            let stats = stats(UNLIMITED, 500, -1);

            assert_eq!(UsagePolicy::usage_percentage(Some(&stats)), 0);
            assert!(!UsagePolicy::limit_reached(Some(&stats)));
            assert_eq!(UsagePolicy::remaining_scans(Some(&stats)), 0);
        }

        /// Expect the gate to depend only on verification and row presence
        #[test]
        fn gate_depends_on_verification() {
            let stats = stats(UNLIMITED, 500, -1);

            assert!(UsagePolicy::can_perform_scan(true, Some(&stats)));
            assert!(!UsagePolicy::can_perform_scan(false, Some(&stats)));
            assert!(!UsagePolicy::can_perform_scan(true, None));
        }

        #[test]
        fn plan_limits_report_unlimited() {
            let limits = UsagePolicy::plan_limits(Some(&stats(UNLIMITED, 3, 100))).unwrap();

            assert_eq!(limits.daily.to_string(), "Unlimited");
            assert_eq!(limits.remaining, 100);
            assert_eq!(limits.used, 3);
        }
    }

    /// Expect no stats to mean no scans and no usage
    #[test]
    fn missing_stats() {
        assert_eq!(UsagePolicy::remaining_scans(None), 0);
        assert_eq!(UsagePolicy::usage_percentage(None), 0);
        assert!(!UsagePolicy::limit_reached(None));
        assert!(UsagePolicy::plan_limits(None).is_none());
    }
}
