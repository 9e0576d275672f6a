use super::de::null_as_default;
use serde::Deserialize;
use std::collections::BTreeMap;

/// `GET /api/stats` body.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Stats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub paid: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: u64,
}

/// `GET /api/advanced_stats` body.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AdvancedStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub dau: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mau: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub retention_rate: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ltv: f64,
}

/// Payload of the `stats_update` push event. Every field is optional; an
/// absent one leaves the displayed value alone.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct StatsUpdate {
    #[serde(default)]
    pub users: Option<u64>,
    #[serde(default)]
    pub paid: Option<u64>,
    #[serde(default)]
    pub active: Option<u64>,
    #[serde(default)]
    pub dau: Option<u64>,
    #[serde(default)]
    pub mau: Option<u64>,
    #[serde(default)]
    pub retention_rate: Option<f64>,
    #[serde(default)]
    pub ltv: Option<f64>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SentimentDistribution {
    #[serde(default)]
    pub positive: u64,
    #[serde(default)]
    pub negative: u64,
    #[serde(default)]
    pub neutral: u64,
}

impl SentimentDistribution {
    pub fn total(&self) -> u64 {
        self.positive + self.negative + self.neutral
    }
}

/// `GET /api/analytics` body, feeding the two dashboard charts.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Analytics {
    #[serde(default)]
    pub sentiment_distribution: SentimentDistribution,
    #[serde(default)]
    pub popular_tags: BTreeMap<String, u64>,
}

impl Analytics {
    /// Figures the server itself returns until real aggregation exists.
    pub fn placeholder() -> Self {
        let popular_tags = [
            ("love", 8),
            ("work", 12),
            ("depression", 3),
            ("fun", 10),
            ("help", 7),
            ("family", 5),
        ]
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();

        Self {
            sentiment_distribution: SentimentDistribution {
                positive: 15,
                negative: 5,
                neutral: 25,
            },
            popular_tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_update_without_advanced_fields() {
        let update: StatsUpdate =
            serde_json::from_str(r#"{"users": 10, "paid": 2, "active": 1}"#).unwrap();
        assert_eq!(update.users, Some(10));
        assert_eq!(update.dau, None);
        assert_eq!(update.ltv, None);
    }

    #[test]
    fn stats_update_with_advanced_fields() {
        let update: StatsUpdate = serde_json::from_str(
            r#"{"users": 10, "paid": 2, "active": 1, "dau": 3, "mau": 9, "retention_rate": 12.5, "ltv": 499.0}"#,
        )
        .unwrap();
        assert_eq!(update.dau, Some(3));
        assert_eq!(update.retention_rate, Some(12.5));
    }

    #[test]
    fn stats_update_leaves_absent_counters_unset() {
        let update: StatsUpdate = serde_json::from_str(r#"{"users": 1}"#).unwrap();
        assert_eq!(update.users, Some(1));
        assert_eq!(update.paid, None);
        assert_eq!(update.active, None);
    }

    #[test]
    fn placeholder_totals() {
        let analytics = Analytics::placeholder();
        assert_eq!(analytics.sentiment_distribution.total(), 45);
        assert_eq!(analytics.popular_tags.get("work"), Some(&12));
    }
}
