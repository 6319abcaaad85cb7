//! Synthetic record table generation.
//!
//! Each column is drawn independently from the shared [`Sampler`], in the
//! schema's declared order, with the usage table generated before the
//! engagement table. Floats are rounded when generated: two decimals for
//! continuous measures, one for ratings.
//!
//! Columns carry no cross-column correlation. Watch time does not depend on
//! platform, genre does not depend on content type, and so on.
//!
//! # Example
//!
//! ```rust
//! use media_trends::generator::generate_usage_table;
//! use media_trends::sampler::Sampler;
//!
//! let mut sampler = Sampler::seeded(42);
//! let usage = generate_usage_table(5, &mut sampler).unwrap();
//! assert_eq!(usage.num_rows(), 5);
//! ```

use tracing::{info, instrument};

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::sampler::{round_to, Sampler};
use crate::schema::engagement::{self, EngagementColumns};
use crate::schema::usage::{self, UsageColumns};
use crate::schema::{format_identifier, Vocabulary};
use crate::table::RecordTable;

/// Decimal places kept for continuous measures.
pub const MEASURE_DECIMALS: u32 = 2;
/// Decimal places kept for ratings.
pub const RATING_DECIMALS: u32 = 1;
/// Zero padding of generated identifiers.
pub const IDENTIFIER_WIDTH: usize = 4;

pub const WATCH_TIME_SCALE: f64 = 3.0;
pub const WATCH_TIME_SHIFT: f64 = 0.5;
pub const COMPLETION_ALPHA: f64 = 8.0;
pub const COMPLETION_BETA: f64 = 2.0;
pub const COMPLETION_SCALE: f64 = 100.0;

pub const TIME_SPENT_SCALE: f64 = 45.0;
pub const POSTS_VIEWED_MEAN: f64 = 50.0;
pub const INTERACTIONS_MEAN: f64 = 15.0;
pub const AD_CLICKS_MEAN: f64 = 3.0;

/// Both tables of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTables {
    pub usage: RecordTable,
    pub engagement: RecordTable,
}

/// Seeds one sampler from `config` and generates the usage table followed
/// by the engagement table.
pub fn generate_tables(config: &GeneratorConfig) -> Result<GeneratedTables> {
    let mut sampler = Sampler::seeded(config.seed);
    let usage = generate_usage_table(config.row_count, &mut sampler)?;
    let engagement = generate_engagement_table(config.row_count, &mut sampler)?;
    info!(
        seed = config.seed,
        usage_rows = usage.num_rows(),
        engagement_rows = engagement.num_rows(),
        draws = sampler.draws(),
        "generated datasets"
    );
    Ok(GeneratedTables { usage, engagement })
}

/// Generates `n` rows of streaming-media usage.
#[instrument(skip(sampler), fields(seed = sampler.seed()))]
pub fn generate_usage_table(n: usize, sampler: &mut Sampler) -> Result<RecordTable> {
    let user_id = identifiers(usage::ID_PREFIX, n);
    let platform = draw(sampler, &usage::PLATFORMS, n)?;
    let content_type = draw(sampler, &usage::CONTENT_TYPES, n)?;
    let genre = draw(sampler, &usage::GENRES, n)?;
    let watch_time_hours = rounded(
        sampler.sample_exponential(WATCH_TIME_SCALE, WATCH_TIME_SHIFT, n)?,
        MEASURE_DECIMALS,
    );
    let subscription_type = draw(sampler, &usage::SUBSCRIPTION_TYPES, n)?;
    let age_group = draw(sampler, &usage::AGE_GROUPS, n)?;
    let device_type = draw(sampler, &usage::DEVICE_TYPES, n)?;
    let rating = rounded(
        sampler.sample_uniform(usage::RATING_RANGE.min, usage::RATING_RANGE.max, n)?,
        RATING_DECIMALS,
    );
    let completion_rate = rounded(
        sampler.sample_beta_scaled(COMPLETION_ALPHA, COMPLETION_BETA, COMPLETION_SCALE, n)?,
        MEASURE_DECIMALS,
    );

    UsageColumns {
        user_id,
        platform,
        content_type,
        genre,
        watch_time_hours,
        subscription_type,
        age_group,
        device_type,
        rating,
        completion_rate,
    }
    .into_table()
}

/// Generates `n` rows of social-media engagement.
#[instrument(skip(sampler), fields(seed = sampler.seed()))]
pub fn generate_engagement_table(n: usize, sampler: &mut Sampler) -> Result<RecordTable> {
    let user_id = identifiers(engagement::ID_PREFIX, n);
    let platform = draw(sampler, &engagement::PLATFORMS, n)?;
    let content_category = draw(sampler, &engagement::CONTENT_CATEGORIES, n)?;
    let engagement_type = draw(sampler, &engagement::ENGAGEMENT_TYPES, n)?;
    let time_spent_minutes = rounded(
        sampler.sample_exponential(
            TIME_SPENT_SCALE,
            engagement::MIN_TIME_SPENT_MINUTES,
            n,
        )?,
        MEASURE_DECIMALS,
    );
    let posts_viewed = sampler.sample_poisson(POSTS_VIEWED_MEAN, n)?;
    let interactions_count = sampler.sample_poisson(INTERACTIONS_MEAN, n)?;
    let age_group = draw(sampler, &engagement::AGE_GROUPS, n)?;
    let influencer_following = draw(sampler, &engagement::INFLUENCER_FLAGS, n)?;
    let ad_clicks = sampler.sample_poisson(AD_CLICKS_MEAN, n)?;

    EngagementColumns {
        user_id,
        platform,
        content_category,
        engagement_type,
        time_spent_minutes,
        posts_viewed,
        interactions_count,
        age_group,
        influencer_following,
        ad_clicks,
    }
    .into_table()
}

fn identifiers(prefix: &str, n: usize) -> Vec<String> {
    (1..=n)
        .map(|i| format_identifier(prefix, IDENTIFIER_WIDTH, i))
        .collect()
}

fn draw(
    sampler: &mut Sampler,
    vocabulary: &'static Vocabulary,
    n: usize,
) -> Result<Vec<&'static str>> {
    sampler.sample_categorical(vocabulary.labels, vocabulary.weights, n)
}

fn rounded(values: Vec<f64>, decimals: u32) -> Vec<f64> {
    values.into_iter().map(|v| round_to(v, decimals)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_identifiers_in_order() {
        let mut sampler = Sampler::seeded(42);
        let table = generate_usage_table(5, &mut sampler).unwrap();
        let ids = table.labels(usage::USER_ID).unwrap();
        let ids: Vec<&str> = ids.iter().flatten().collect();
        assert_eq!(ids, vec!["U0001", "U0002", "U0003", "U0004", "U0005"]);
    }

    #[test]
    fn test_engagement_identifier_prefix() {
        let mut sampler = Sampler::seeded(42);
        let table = generate_engagement_table(3, &mut sampler).unwrap();
        let ids = table.labels(engagement::USER_ID).unwrap();
        assert_eq!(ids.value(0), "S0001");
        assert_eq!(ids.value(2), "S0003");
    }

    #[test]
    fn test_zero_rows() {
        let mut sampler = Sampler::seeded(42);
        let usage = generate_usage_table(0, &mut sampler).unwrap();
        let engagement = generate_engagement_table(0, &mut sampler).unwrap();
        assert!(usage.is_empty());
        assert!(engagement.is_empty());
        assert_eq!(usage.schema().fields().len(), 10);
    }

    #[test]
    fn test_rounding_applied_at_generation() {
        let mut sampler = Sampler::seeded(42);
        let table = generate_usage_table(200, &mut sampler).unwrap();
        for rating in table.numeric_values(usage::RATING).unwrap() {
            assert_eq!(rating, round_to(rating, 1));
        }
        for hours in table.numeric_values(usage::WATCH_TIME_HOURS).unwrap() {
            assert_eq!(hours, round_to(hours, 2));
        }
    }

    #[test]
    fn test_generate_tables_is_deterministic() {
        let config = GeneratorConfig::default().with_row_count(50);
        let first = generate_tables(&config).unwrap();
        let second = generate_tables(&config).unwrap();
        assert_eq!(first, second);

        let other = generate_tables(&config.clone().with_seed(43)).unwrap();
        assert_ne!(first.usage, other.usage);
    }

    #[test]
    fn test_engagement_depends_on_preceding_usage_draws() {
        let config = GeneratorConfig::default().with_row_count(20);
        let tables = generate_tables(&config).unwrap();

        let mut fresh = Sampler::seeded(config.seed);
        let standalone = generate_engagement_table(20, &mut fresh).unwrap();
        assert_ne!(tables.engagement, standalone);
    }
}
