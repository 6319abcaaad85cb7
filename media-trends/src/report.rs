//! Structured trend report.
//!
//! [`TrendReport::build`] turns the two generated tables into a single
//! serializable value. It performs no I/O; formatting lives in
//! [`crate::formatters`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, instrument};

use crate::analyzers::{
    correlation_matrix, describe, group_mean, group_multi_agg, profile_table, value_counts,
    AggregateFn, CorrelationMatrix, GroupedAggregate, GroupedMean, TableProfile, TableStatistics,
    ValueCounts,
};
use crate::error::Result;
use crate::schema::{engagement, usage};
use crate::table::RecordTable;

pub const DEFAULT_TITLE: &str = "Digital Media Trends Analysis: OTT & Social Media Platforms";
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Numeric usage columns compared in the usage correlation matrix.
pub const USAGE_CORRELATION_COLUMNS: [&str; 3] =
    [usage::WATCH_TIME_HOURS, usage::RATING, usage::COMPLETION_RATE];
/// Usage measures averaged per device type.
pub const DEVICE_ANALYSIS_COLUMNS: [&str; 3] =
    [usage::WATCH_TIME_HOURS, usage::RATING, usage::COMPLETION_RATE];
/// Engagement measures averaged per influencer-following flag.
pub const INFLUENCER_IMPACT_COLUMNS: [&str; 3] = [
    engagement::TIME_SPENT_MINUTES,
    engagement::INTERACTIONS_COUNT,
    engagement::AD_CLICKS,
];
/// Numeric engagement columns compared in the engagement correlation matrix.
pub const ENGAGEMENT_CORRELATION_COLUMNS: [&str; 4] = [
    engagement::TIME_SPENT_MINUTES,
    engagement::POSTS_VIEWED,
    engagement::INTERACTIONS_COUNT,
    engagement::AD_CLICKS,
];

const RECOMMENDATIONS: [&str; 5] = [
    "Focus on mobile optimization for better user experience",
    "Invest in TV Series content for OTT platforms",
    "Leverage influencer marketing for social media engagement",
    "Create age-specific content strategies",
    "Offer flexible subscription models to attract free-tier users",
];

/// Inputs to [`TrendReport::build`] that do not come from the tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    pub title: String,
    /// Seed the tables were generated from.
    pub seed: u64,
    /// Rows rendered in each exploration preview.
    pub preview_rows: usize,
    /// Report timestamp; the build time when unset.
    pub generated_at: Option<DateTime<Utc>>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            seed: crate::config::DEFAULT_SEED,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            generated_at: None,
        }
    }
}

impl ReportOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Pins the timestamp, making the report reproducible.
    pub fn generated_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.generated_at = Some(timestamp);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub title: String,
    pub seed: u64,
    pub usage_rows: usize,
    pub engagement_rows: usize,
    pub generated_at: DateTime<Utc>,
}

/// Shape, types and leading rows of both tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exploration {
    pub usage: TableProfile,
    pub engagement: TableProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub usage: TableStatistics,
    pub engagement: TableStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingTrends {
    pub platform_popularity: ValueCounts,
    pub watch_time_by_platform: GroupedMean,
    pub content_type_preference: ValueCounts,
    pub subscription_distribution: ValueCounts,
    pub device_usage: ValueCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialTrends {
    pub platform_popularity: ValueCounts,
    pub time_spent_by_platform: GroupedMean,
    pub content_category_preference: ValueCounts,
    pub interactions_by_platform: GroupedMean,
    pub age_distribution: ValueCounts,
    pub influencer_following: ValueCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeInsights {
    /// Mean streaming hours per age group.
    pub watch_time_by_age: GroupedMean,
    /// Mean social minutes per age group.
    pub time_spent_by_age: GroupedMean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedInsights {
    /// Mean watch time, rating and completion per device.
    pub device_analysis: GroupedAggregate,
    pub genre_ratings: GroupedMean,
    /// Mean time spent, interactions and ad clicks per influencer flag.
    pub influencer_impact: GroupedAggregate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlations {
    pub usage: CorrelationMatrix,
    pub engagement: CorrelationMatrix,
}

/// Where a finding applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    Streaming,
    Social,
    CrossPlatform,
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingCategory::Streaming => write!(f, "OTT Platform Insights"),
            FindingCategory::Social => write!(f, "Social Media Insights"),
            FindingCategory::CrossPlatform => write!(f, "Cross-Platform Trends"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub category: FindingCategory,
    pub message: String,
}

impl Finding {
    fn new(category: FindingCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub metadata: ReportMetadata,
    pub exploration: Exploration,
    pub statistics: Statistics,
    pub streaming: StreamingTrends,
    pub social: SocialTrends,
    pub age: AgeInsights,
    pub advanced: AdvancedInsights,
    pub correlations: Correlations,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
}

impl TrendReport {
    /// Builds the report from a usage table and an engagement table.
    ///
    /// Fails with `UnknownColumn` if either table lacks an expected column.
    /// Empty tables produce empty summaries and fewer findings.
    #[instrument(skip_all, fields(usage_rows = usage_table.num_rows(), engagement_rows = engagement_table.num_rows()))]
    pub fn build(
        usage_table: &RecordTable,
        engagement_table: &RecordTable,
        options: &ReportOptions,
    ) -> Result<Self> {
        let metadata = ReportMetadata {
            title: options.title.clone(),
            seed: options.seed,
            usage_rows: usage_table.num_rows(),
            engagement_rows: engagement_table.num_rows(),
            generated_at: options.generated_at.unwrap_or_else(Utc::now),
        };

        let exploration = Exploration {
            usage: profile_table(usage_table, options.preview_rows)?,
            engagement: profile_table(engagement_table, options.preview_rows)?,
        };

        let statistics = Statistics {
            usage: describe(usage_table)?,
            engagement: describe(engagement_table)?,
        };

        let streaming = StreamingTrends {
            platform_popularity: value_counts(usage_table, usage::PLATFORM)?,
            watch_time_by_platform: group_mean(usage_table, usage::PLATFORM, usage::WATCH_TIME_HOURS)?,
            content_type_preference: value_counts(usage_table, usage::CONTENT_TYPE)?,
            subscription_distribution: value_counts(usage_table, usage::SUBSCRIPTION_TYPE)?,
            device_usage: value_counts(usage_table, usage::DEVICE_TYPE)?,
        };

        let social = SocialTrends {
            platform_popularity: value_counts(engagement_table, engagement::PLATFORM)?,
            time_spent_by_platform: group_mean(
                engagement_table,
                engagement::PLATFORM,
                engagement::TIME_SPENT_MINUTES,
            )?,
            content_category_preference: value_counts(engagement_table, engagement::CONTENT_CATEGORY)?,
            interactions_by_platform: group_mean(
                engagement_table,
                engagement::PLATFORM,
                engagement::INTERACTIONS_COUNT,
            )?,
            age_distribution: value_counts(engagement_table, engagement::AGE_GROUP)?,
            influencer_following: value_counts(engagement_table, engagement::INFLUENCER_FOLLOWING)?,
        };

        let age = AgeInsights {
            watch_time_by_age: group_mean(usage_table, usage::AGE_GROUP, usage::WATCH_TIME_HOURS)?,
            time_spent_by_age: group_mean(
                engagement_table,
                engagement::AGE_GROUP,
                engagement::TIME_SPENT_MINUTES,
            )?,
        };

        let advanced = AdvancedInsights {
            device_analysis: group_multi_agg(
                usage_table,
                usage::DEVICE_TYPE,
                &DEVICE_ANALYSIS_COLUMNS,
                AggregateFn::Mean,
            )?,
            genre_ratings: group_mean(usage_table, usage::GENRE, usage::RATING)?,
            influencer_impact: group_multi_agg(
                engagement_table,
                engagement::INFLUENCER_FOLLOWING,
                &INFLUENCER_IMPACT_COLUMNS,
                AggregateFn::Mean,
            )?,
        };

        let correlations = Correlations {
            usage: correlation_matrix(usage_table, &USAGE_CORRELATION_COLUMNS)?,
            engagement: correlation_matrix(engagement_table, &ENGAGEMENT_CORRELATION_COLUMNS)?,
        };

        let findings = key_findings(&streaming, &social, &age);
        info!(findings = findings.len(), "built trend report");

        Ok(Self {
            metadata,
            exploration,
            statistics,
            streaming,
            social,
            age,
            advanced,
            correlations,
            findings,
            recommendations: RECOMMENDATIONS.iter().map(|r| r.to_string()).collect(),
        })
    }

    /// Findings of one category, in report order.
    pub fn findings_in(&self, category: FindingCategory) -> impl Iterator<Item = &Finding> + '_ {
        self.findings.iter().filter(move |f| f.category == category)
    }
}

fn key_findings(streaming: &StreamingTrends, social: &SocialTrends, age: &AgeInsights) -> Vec<Finding> {
    use FindingCategory::*;

    let mut findings = Vec::new();

    if let Some(top) = streaming.platform_popularity.top() {
        let share = streaming.platform_popularity.share_of(&top.label).unwrap_or(0.0);
        findings.push(Finding::new(
            Streaming,
            format!("{} dominates with {} users ({share:.1}%)", top.label, top.count),
        ));
    }
    if let Some(top) = streaming.content_type_preference.top() {
        findings.push(Finding::new(
            Streaming,
            format!("{} is the most popular content type ({} views)", top.label, top.count),
        ));
    }
    if let Some(share) = streaming.subscription_distribution.share_of("Premium") {
        findings.push(Finding::new(
            Streaming,
            format!("Premium subscriptions account for {share:.1}% of users"),
        ));
    }
    if let Some(share) = streaming.device_usage.share_of("Mobile") {
        findings.push(Finding::new(
            Streaming,
            format!("Mobile devices are preferred by {share:.1}% of users"),
        ));
    }

    if let Some(top) = social.platform_popularity.top() {
        findings.push(Finding::new(
            Social,
            format!("{} leads with {} users", top.label, top.count),
        ));
    }
    if let Some(share) = social.influencer_following.share_of("Yes") {
        findings.push(Finding::new(
            Social,
            format!("{share:.1}% of users follow influencers"),
        ));
    }
    if let Some(top) = social.content_category_preference.top() {
        findings.push(Finding::new(
            Social,
            format!("{} is the top content category", top.label),
        ));
    }
    if let Some(top) = social.age_distribution.top() {
        findings.push(Finding::new(
            Social,
            format!("Age group {} is the most active demographic", top.label),
        ));
    }

    if let Some(top) = age.time_spent_by_age.top() {
        findings.push(Finding::new(
            CrossPlatform,
            format!(
                "Age group {} spends the most time on social media ({:.2} minutes on average)",
                top.label, top.mean
            ),
        ));
    }
    if let Some(top) = age.watch_time_by_age.top() {
        findings.push(Finding::new(
            CrossPlatform,
            format!(
                "Age group {} watches the most OTT content ({:.2} hours on average)",
                top.label, top.mean
            ),
        ));
    }
    if streaming.device_usage.top().is_some_and(|d| d.label == "Mobile") {
        findings.push(Finding::new(
            CrossPlatform,
            "Mobile-first approach is critical for both platforms",
        ));
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{generate_engagement_table, generate_usage_table};
    use crate::sampler::Sampler;
    use chrono::TimeZone;

    fn fixed_options() -> ReportOptions {
        ReportOptions::default()
            .with_seed(42)
            .generated_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    fn tables(n: usize) -> (RecordTable, RecordTable) {
        let mut sampler = Sampler::seeded(42);
        let usage = generate_usage_table(n, &mut sampler).unwrap();
        let engagement = generate_engagement_table(n, &mut sampler).unwrap();
        (usage, engagement)
    }

    #[test]
    fn test_report_sections_are_populated() {
        let (usage, engagement) = tables(300);
        let report = TrendReport::build(&usage, &engagement, &fixed_options()).unwrap();

        assert_eq!(report.metadata.usage_rows, 300);
        assert_eq!(report.streaming.platform_popularity.total, 300);
        assert_eq!(report.exploration.usage.preview.len(), DEFAULT_PREVIEW_ROWS);
        assert_eq!(report.advanced.device_analysis.value_columns.len(), 3);
        assert_eq!(report.correlations.engagement.len(), 4);
        assert_eq!(report.recommendations.len(), 5);
        assert_eq!(report.findings_in(FindingCategory::Streaming).count(), 4);
        assert_eq!(report.findings_in(FindingCategory::Social).count(), 4);
    }

    #[test]
    fn test_advanced_sections_use_their_own_columns() {
        let (usage_table, engagement_table) = tables(120);
        let report =
            TrendReport::build(&usage_table, &engagement_table, &fixed_options()).unwrap();

        assert_eq!(report.advanced.device_analysis.group_column, usage::DEVICE_TYPE);
        assert_eq!(report.advanced.device_analysis.value_columns, DEVICE_ANALYSIS_COLUMNS);
        assert_eq!(
            report.advanced.influencer_impact.value_columns,
            INFLUENCER_IMPACT_COLUMNS
        );
        assert_eq!(report.correlations.usage.columns, USAGE_CORRELATION_COLUMNS);
    }

    #[test]
    fn test_report_is_reproducible_with_pinned_timestamp() {
        let (usage, engagement) = tables(50);
        let first = TrendReport::build(&usage, &engagement, &fixed_options()).unwrap();
        let second = TrendReport::build(&usage, &engagement, &fixed_options()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_leading_platform_finding_matches_counts() {
        let (usage, engagement) = tables(200);
        let report = TrendReport::build(&usage, &engagement, &fixed_options()).unwrap();
        let top = report.streaming.platform_popularity.top().unwrap();
        let first = &report.findings[0];
        assert!(first.message.starts_with(&format!("{} dominates with {} users", top.label, top.count)));
    }

    #[test]
    fn test_empty_tables_omit_findings() {
        let (usage, engagement) = tables(0);
        let report = TrendReport::build(&usage, &engagement, &fixed_options()).unwrap();
        assert!(report.findings.is_empty());
        assert!(report.streaming.watch_time_by_platform.is_empty());
        assert_eq!(report.recommendations.len(), 5);
    }

    #[test]
    fn test_swapped_tables_fail() {
        let (usage, engagement) = tables(5);
        let err = TrendReport::build(&engagement, &usage, &fixed_options()).unwrap_err();
        assert!(matches!(err, crate::error::TrendsError::UnknownColumn { .. }));
    }
}
