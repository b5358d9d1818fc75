//! Seeded sampling primitives.

use crate::error::GeneratorError;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Source of all randomness for one run.
///
/// Created once from the configured seed and passed by `&mut` into every
/// generator and defect pass. Two contexts with the same seed produce the
/// same values for the same sequence of calls.
pub struct RandomContext {
    rng: StdRng,
}

impl RandomContext {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform draw from a non-empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, GeneratorError> {
        if items.is_empty() {
            return Err(GeneratorError::Sampling(
                "cannot choose from an empty set".to_string(),
            ));
        }
        let idx = self.rng.gen_range(0..items.len());
        Ok(&items[idx])
    }

    /// Weighted draw; `weight` extracts each item's probability.
    pub fn weighted<'a, T>(
        &mut self,
        items: &'a [T],
        weight: impl Fn(&T) -> f64,
    ) -> Result<&'a T, GeneratorError> {
        let dist = WeightedIndex::new(items.iter().map(weight))
            .map_err(|e| GeneratorError::Sampling(format!("invalid weights: {e}")))?;
        Ok(&items[dist.sample(&mut self.rng)])
    }

    /// Uniform float in the closed interval.
    pub fn uniform_f64(&mut self, min: f64, max: f64) -> Result<f64, GeneratorError> {
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(GeneratorError::Sampling(format!(
                "empty range [{min}, {max}]"
            )));
        }
        Ok(self.rng.gen_range(min..=max))
    }

    /// Uniform amount in the closed interval, rounded to 2 decimals.
    pub fn uniform_amount(&mut self, min: f64, max: f64) -> Result<Decimal, GeneratorError> {
        let value = self.uniform_f64(min, max)?;
        let cents = (value * 100.0).round() as i64;
        Ok(Decimal::new(cents, 2))
    }

    /// Uniform integer in the closed interval.
    pub fn uniform_int(&mut self, min: i32, max: i32) -> Result<i32, GeneratorError> {
        if min > max {
            return Err(GeneratorError::Sampling(format!(
                "empty range [{min}, {max}]"
            )));
        }
        Ok(self.rng.gen_range(min..=max))
    }

    /// Uniform datetime at second precision in `[start, end]`.
    pub fn uniform_datetime(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<NaiveDateTime, GeneratorError> {
        let span = (end - start).num_seconds();
        if span < 0 {
            return Err(GeneratorError::Sampling(format!(
                "empty datetime range [{start}, {end}]"
            )));
        }
        let offset = self.rng.gen_range(0..=span);
        Ok(start + Duration::seconds(offset))
    }

    /// Uniform calendar date in `[start, end]`.
    pub fn uniform_date(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<NaiveDate, GeneratorError> {
        let span = (end - start).num_days();
        if span < 0 {
            return Err(GeneratorError::Sampling(format!(
                "empty date range [{start}, {end}]"
            )));
        }
        let offset = self.rng.gen_range(0..=span);
        Ok(start + Duration::days(offset))
    }

    /// Random UUID v4 built from the seeded RNG.
    pub fn uuid(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.rng.fill(&mut bytes);

        // Set version (4) and variant (RFC 4122) bits
        bytes[6] = (bytes[6] & 0x0f) | 0x40;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;

        Uuid::from_bytes(bytes)
    }

    /// `amount` distinct positions in `0..len`, drawn without replacement.
    pub fn sample_positions(
        &mut self,
        len: usize,
        amount: usize,
    ) -> Result<Vec<usize>, GeneratorError> {
        if amount > len {
            return Err(GeneratorError::Sampling(format!(
                "cannot select {amount} rows out of {len}"
            )));
        }
        Ok(rand::seq::index::sample(&mut self.rng, len, amount).into_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomContext::new(42);
        let mut b = RandomContext::new(42);

        for _ in 0..10 {
            assert_eq!(a.uuid(), b.uuid());
            assert_eq!(
                a.uniform_int(1, 100).unwrap(),
                b.uniform_int(1, 100).unwrap()
            );
        }
    }

    #[test]
    fn test_different_seed_different_values() {
        let mut a = RandomContext::new(1);
        let mut b = RandomContext::new(2);
        assert_ne!(a.uuid(), b.uuid());
    }

    #[test]
    fn test_uuid_version() {
        let mut ctx = RandomContext::new(42);
        let id = ctx.uuid();
        assert_eq!(id.get_version_num(), 4);
    }

    #[test]
    fn test_uuid_uniqueness() {
        let mut ctx = RandomContext::new(42);
        let ids: HashSet<Uuid> = (0..10_000).map(|_| ctx.uuid()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_uniform_amount_two_decimals() {
        let mut ctx = RandomContext::new(42);
        for _ in 0..1000 {
            let amount = ctx.uniform_amount(0.99, 99.99).unwrap();
            assert_eq!(amount.scale(), 2);
            assert!(amount >= Decimal::new(99, 2));
            assert!(amount <= Decimal::new(9999, 2));
        }
    }

    #[test]
    fn test_uniform_datetime_inclusive() {
        let mut ctx = RandomContext::new(42);
        let start = ts("2024-10-01 00:00:00");
        let end = ts("2024-10-01 00:00:03");
        let seen: HashSet<NaiveDateTime> = (0..500)
            .map(|_| ctx.uniform_datetime(start, end).unwrap())
            .collect();
        assert_eq!(seen.len(), 4);
        assert!(seen.contains(&start));
        assert!(seen.contains(&end));
    }

    #[test]
    fn test_uniform_datetime_degenerate_window() {
        let mut ctx = RandomContext::new(42);
        let start = ts("2024-10-01 00:00:00");
        assert_eq!(ctx.uniform_datetime(start, start).unwrap(), start);
        assert!(ctx
            .uniform_datetime(start, start - Duration::seconds(1))
            .is_err());
    }

    #[test]
    fn test_uniform_date_range() {
        let mut ctx = RandomContext::new(7);
        let start = NaiveDate::from_ymd_opt(2022, 10, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        for _ in 0..1000 {
            let d = ctx.uniform_date(start, end).unwrap();
            assert!(start <= d && d <= end);
        }
    }

    #[test]
    fn test_weighted_distribution() {
        let mut ctx = RandomContext::new(42);
        let items = [("active", 0.85), ("inactive", 0.10), ("banned", 0.05)];
        let mut active = 0;
        for _ in 0..10_000 {
            if ctx.weighted(&items, |(_, w)| *w).unwrap().0 == "active" {
                active += 1;
            }
        }
        assert!((8_200..=8_800).contains(&active), "active = {active}");
    }

    #[test]
    fn test_weighted_rejects_bad_weights() {
        let mut ctx = RandomContext::new(42);
        let items = [("a", 0.0), ("b", 0.0)];
        assert!(matches!(
            ctx.weighted(&items, |(_, w)| *w),
            Err(GeneratorError::Sampling(_))
        ));
    }

    #[test]
    fn test_choose_empty() {
        let mut ctx = RandomContext::new(42);
        let empty: [u8; 0] = [];
        assert!(ctx.choose(&empty).is_err());
    }

    #[test]
    fn test_sample_positions_without_replacement() {
        let mut ctx = RandomContext::new(42);
        let positions = ctx.sample_positions(100, 30).unwrap();
        assert_eq!(positions.len(), 30);
        let unique: HashSet<usize> = positions.iter().copied().collect();
        assert_eq!(unique.len(), 30);
        assert!(positions.iter().all(|p| *p < 100));

        assert!(ctx.sample_positions(3, 4).is_err());
        assert!(ctx.sample_positions(0, 0).unwrap().is_empty());
    }
}
