//! Batch spin simulation
//!
//! Runs the resolver repeatedly with one set of parameters and reports
//! expectation, win rate and return-to-player.

use crate::errors::BetError;
use crate::games::resolver::BetResolver;
use crate::games::types::{BetOptions, SpinStats};
use crate::games::weights::SpinParameters;
use rand::Rng;
use std::time::Instant;
use tracing::info;

/// Running totals for a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpinTotals {
    pub spins: u64,
    pub wins: u64,
    pub total_bet: u64,
    pub total_win: u64,
}

impl SpinTotals {
    pub fn record(&mut self, bet_amount: u64, win_amount: u64, is_win: bool) {
        self.spins += 1;
        self.total_bet += bet_amount;
        self.total_win += win_amount;
        if is_win {
            self.wins += 1;
        }
    }

    /// Derive summary statistics. Empty batches report zero ratios.
    pub fn summarize(&self) -> SpinStats {
        let ratio = |num: f64, den: f64| if den > 0.0 { num / den } else { 0.0 };
        let spins = self.spins as f64;
        let total_bet = self.total_bet as f64;
        let total_win = self.total_win as f64;

        SpinStats {
            total_spins: self.spins,
            total_win_amount: self.total_win,
            total_bet_amount: self.total_bet,
            expectation: ratio(total_win - total_bet, spins),
            win_rate: ratio(self.wins as f64, spins) * 100.0,
            return_to_player: ratio(total_win, total_bet) * 100.0,
        }
    }
}

impl BetResolver {
    /// Run `spins` bets of `amount` using the thread-local generator
    pub fn run_many_spins(
        &self,
        amount: u64,
        options: &BetOptions,
        spins: u64,
    ) -> Result<SpinStats, BetError> {
        self.run_many_spins_with_rng(&mut rand::thread_rng(), amount, options, spins)
    }

    /// Run a batch drawing from `rng`. Options are validated once, before the
    /// first spin, so a batch either fails up front or runs to completion.
    pub fn run_many_spins_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        amount: u64,
        options: &BetOptions,
        spins: u64,
    ) -> Result<SpinStats, BetError> {
        let params = self.validate(options)?;
        let started = Instant::now();

        let stats = self.simulate(rng, amount, &params, spins).summarize();

        info!(
            "Simulated {} spins at stake {} in {:?}: rtp {:.2}%, win rate {:.2}%",
            stats.total_spins,
            amount,
            started.elapsed(),
            stats.return_to_player,
            stats.win_rate
        );
        Ok(stats)
    }

    /// Accumulate totals over `spins` resolutions
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        amount: u64,
        params: &SpinParameters,
        spins: u64,
    ) -> SpinTotals {
        let mut totals = SpinTotals::default();
        for _ in 0..spins {
            let result = self.resolve(rng, amount, params);
            totals.record(result.bet_amount, result.win_amount, result.is_win);
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::resolver::tests::CountingRng;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::BTreeMap;

    #[test]
    fn test_forced_loss_batch() {
        let resolver = BetResolver::standard();
        let mut rng = StdRng::seed_from_u64(10);

        let stats = resolver
            .run_many_spins_with_rng(&mut rng, 5, &BetOptions::force_lose(), 100)
            .unwrap();

        assert_eq!(stats.total_spins, 100);
        assert_eq!(stats.total_bet_amount, 500);
        assert_eq!(stats.total_win_amount, 0);
        assert_eq!(stats.win_rate, 0.0);
        assert_eq!(stats.return_to_player, 0.0);
        assert_eq!(stats.expectation, -5.0);
    }

    #[test]
    fn test_forced_win_batch() {
        let resolver = BetResolver::standard();
        let mut rng = StdRng::seed_from_u64(12);

        let stats = resolver
            .run_many_spins_with_rng(&mut rng, 5, &BetOptions::force_win(), 1_000)
            .unwrap();

        assert_eq!(stats.win_rate, 100.0);
        assert!(stats.total_win_amount > 0);
        // Lowest three-of-a-kind multiplier is 2x
        assert!(stats.return_to_player >= 200.0);
    }

    #[test]
    fn test_batch_statistics_are_consistent() {
        let resolver = BetResolver::standard();
        let mut rng = StdRng::seed_from_u64(13);

        for amount in [1, 5, 25, 100] {
            let stats = resolver
                .run_many_spins_with_rng(&mut rng, amount, &BetOptions::default(), 1_000)
                .unwrap();

            assert_eq!(stats.total_bet_amount, amount * 1_000);
            assert_eq!(
                stats.expectation,
                (stats.total_win_amount as f64 - stats.total_bet_amount as f64) / 1_000.0
            );
            assert_eq!(
                stats.return_to_player,
                stats.total_win_amount as f64 / stats.total_bet_amount as f64 * 100.0
            );
            assert!((0.0..=100.0).contains(&stats.win_rate));
        }
    }

    #[test]
    fn test_default_win_rate_matches_combinatorics() {
        // 16 of every 36 weight units are winning classifications on six symbols.
        let resolver = BetResolver::standard();
        let mut rng = StdRng::seed_from_u64(2025);

        let stats = resolver
            .run_many_spins_with_rng(&mut rng, 10, &BetOptions::default(), 200_000)
            .unwrap();

        let expected = 16.0 / 36.0 * 100.0;
        assert!((stats.win_rate - expected).abs() < 0.5, "win rate {}", stats.win_rate);
    }

    #[test]
    fn test_invalid_weights_fail_batch_before_any_spin() {
        let resolver = BetResolver::standard();
        let mut rng = CountingRng::new(3);
        let mut weights: BTreeMap<String, f64> = BTreeMap::new();
        weights.insert("threeOfAKind".to_string(), 1.0);
        weights.insert("twoOfAKind".to_string(), -2.0);
        weights.insert("noWin".to_string(), 1.0);
        let options = BetOptions {
            outcome_weights: Some(weights),
            ..Default::default()
        };

        let result = resolver.run_many_spins_with_rng(&mut rng, 5, &options, 10_000);
        assert!(matches!(result, Err(BetError::InvalidWeights(_))));
        assert_eq!(rng.draws, 0);
    }

    #[test]
    fn test_empty_totals_summarize_to_zero() {
        let stats = SpinTotals::default().summarize();
        assert_eq!(stats.total_spins, 0);
        assert_eq!(stats.expectation, 0.0);
        assert_eq!(stats.win_rate, 0.0);
        assert_eq!(stats.return_to_player, 0.0);
    }
}
