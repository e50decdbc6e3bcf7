//! Follower tier buckets.

use serde::{Deserialize, Serialize};

/// Popularity bucket derived from a follower count.
///
/// Variants are declared in ascending order so the derived `Ord` follows
/// follower count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowerTier {
    /// No follower count, or a non-positive one
    Unknown,
    /// Fewer than 10,000 followers
    Nano,
    /// Fewer than 100,000 followers
    Micro,
    /// Fewer than 500,000 followers
    Mid,
    /// Fewer than 1,000,000 followers
    Macro,
    /// One million followers or more
    Mega,
}

impl FollowerTier {
    /// Bucket a follower count.
    pub fn from_followers(followers: Option<i64>) -> Self {
        match followers {
            None => FollowerTier::Unknown,
            Some(n) if n <= 0 => FollowerTier::Unknown,
            Some(n) if n < 10_000 => FollowerTier::Nano,
            Some(n) if n < 100_000 => FollowerTier::Micro,
            Some(n) if n < 500_000 => FollowerTier::Mid,
            Some(n) if n < 1_000_000 => FollowerTier::Macro,
            Some(_) => FollowerTier::Mega,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FollowerTier::Unknown => "unknown",
            FollowerTier::Nano => "nano",
            FollowerTier::Micro => "micro",
            FollowerTier::Mid => "mid",
            FollowerTier::Macro => "macro",
            FollowerTier::Mega => "mega",
        }
    }
}

impl std::fmt::Display for FollowerTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoints() {
        let cases = [
            (None, FollowerTier::Unknown),
            (Some(-5), FollowerTier::Unknown),
            (Some(0), FollowerTier::Unknown),
            (Some(1), FollowerTier::Nano),
            (Some(9_999), FollowerTier::Nano),
            (Some(10_000), FollowerTier::Micro),
            (Some(99_999), FollowerTier::Micro),
            (Some(100_000), FollowerTier::Mid),
            (Some(499_999), FollowerTier::Mid),
            (Some(500_000), FollowerTier::Macro),
            (Some(999_999), FollowerTier::Macro),
            (Some(1_000_000), FollowerTier::Mega),
            (Some(250_000_000), FollowerTier::Mega),
        ];
        for (followers, expected) in cases {
            assert_eq!(
                FollowerTier::from_followers(followers),
                expected,
                "followers = {:?}",
                followers
            );
        }
    }

    #[test]
    fn test_monotonic_in_followers() {
        let mut previous = FollowerTier::from_followers(Some(-1));
        for followers in (-1_000..2_000_000i64).step_by(997) {
            let tier = FollowerTier::from_followers(Some(followers));
            assert!(tier >= previous, "tier decreased at {}", followers);
            previous = tier;
        }
        assert_eq!(previous, FollowerTier::Mega);
    }

    #[test]
    fn test_six_distinct_names() {
        let names: std::collections::HashSet<&str> = [0, 1, 10_000, 100_000, 500_000, 1_000_000]
            .into_iter()
            .map(|n| FollowerTier::from_followers(Some(n)).as_str())
            .collect();
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&FollowerTier::Macro).unwrap();
        assert_eq!(json, "\"macro\"");
        assert_eq!(FollowerTier::Mid.to_string(), "mid");
    }
}
