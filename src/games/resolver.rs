use crate::errors::BetError;
use crate::games::types::{BetOptions, BetResponse, SymbolCatalog, WinType, REEL_COUNT};
use crate::games::weighted::weighted_draw;
use crate::games::weights::{SpinParameters, SymbolWeights};
use rand::Rng;
use std::sync::Arc;

/// Two of a kind pays this fraction of the three-of-a-kind value
const TWO_OF_A_KIND_FRACTION: f64 = 0.2;

/// Resolves single bets against a read-only symbol catalog
#[derive(Debug, Clone)]
pub struct BetResolver {
    catalog: Arc<SymbolCatalog>,
}

impl BetResolver {
    /// Create a resolver over the given catalog
    pub fn new(catalog: Arc<SymbolCatalog>) -> Self {
        Self { catalog }
    }

    /// Resolver over the standard six-symbol catalog
    pub fn standard() -> Self {
        Self::new(Arc::new(SymbolCatalog::standard()))
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    /// Validate options for this resolver's catalog
    pub fn validate(&self, options: &BetOptions) -> Result<SpinParameters, BetError> {
        SpinParameters::from_options(options, self.catalog.len())
    }

    /// Place a bet using the thread-local generator
    pub fn place_bet(&self, amount: u64, options: &BetOptions) -> Result<BetResponse, BetError> {
        self.place_bet_with_rng(&mut rand::thread_rng(), amount, options)
    }

    /// Place a bet drawing from `rng`. Nothing is drawn unless validation passes.
    pub fn place_bet_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        amount: u64,
        options: &BetOptions,
    ) -> Result<BetResponse, BetError> {
        let params = self.validate(options)?;
        Ok(self.resolve(rng, amount, &params))
    }

    /// Resolve one spin from already validated parameters
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        amount: u64,
        params: &SpinParameters,
    ) -> BetResponse {
        let (win_type, symbols, winning_symbol) = if params.force_win {
            let symbol = self.select_winning_symbol(rng, &params.symbol_weights);
            (WinType::ThreeOfAKind, [symbol; REEL_COUNT], symbol)
        } else if params.force_lose {
            (WinType::NoWin, self.distinct_symbols(rng), 0)
        } else {
            let win_type = self.determine_win_type(rng, params);
            let (symbols, winning_symbol) = self.generate_symbols(rng, win_type, &params.symbol_weights);
            (win_type, symbols, winning_symbol)
        };

        BetResponse {
            symbols,
            bet_amount: amount,
            win_amount: self.calculate_win_amount(amount, winning_symbol, win_type),
            is_win: win_type.is_win(),
            win_type,
        }
    }

    /// Payout for a classification. A two of a kind that floors to 0 pays 1.
    pub fn calculate_win_amount(&self, amount: u64, winning_symbol: usize, win_type: WinType) -> u64 {
        let value = self.catalog.value(winning_symbol);
        match win_type {
            WinType::NoWin => 0,
            WinType::ThreeOfAKind => amount.saturating_mul(value),
            WinType::TwoOfAKind => {
                let multiplier = value as f64 * TWO_OF_A_KIND_FRACTION;
                ((amount as f64 * multiplier).floor() as u64).max(1)
            }
        }
    }

    fn determine_win_type<R: Rng + ?Sized>(&self, rng: &mut R, params: &SpinParameters) -> WinType {
        let weights = params
            .outcome_weights
            .classification_weights(self.catalog.len());
        weighted_draw(rng, &weights).unwrap_or(WinType::NoWin)
    }

    fn select_winning_symbol<R: Rng + ?Sized>(&self, rng: &mut R, weights: &SymbolWeights) -> usize {
        weighted_draw(rng, weights.candidates()).unwrap_or(0)
    }

    fn generate_symbols<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        win_type: WinType,
        weights: &SymbolWeights,
    ) -> ([usize; REEL_COUNT], usize) {
        match win_type {
            WinType::NoWin => (self.distinct_symbols(rng), 0),
            WinType::ThreeOfAKind => {
                let symbol = self.select_winning_symbol(rng, weights);
                ([symbol; REEL_COUNT], symbol)
            }
            WinType::TwoOfAKind => {
                let symbol = self.select_winning_symbol(rng, weights);
                (self.pair_with_odd_one_out(rng, symbol), symbol)
            }
        }
    }

    /// Three pairwise distinct indices, drawn uniformly without replacement in
    /// reel order
    fn distinct_symbols<R: Rng + ?Sized>(&self, rng: &mut R) -> [usize; REEL_COUNT] {
        let mut symbols = [0; REEL_COUNT];
        for drawn in 0..REEL_COUNT {
            // Rank among the indices not yet used, mapped back by skipping
            // earlier picks in ascending order
            let mut pick = rng.gen_range(0..self.catalog.len() - drawn);
            let mut taken = symbols;
            taken[..drawn].sort_unstable();
            for &used in &taken[..drawn] {
                if pick >= used {
                    pick += 1;
                }
            }
            symbols[drawn] = pick;
        }
        symbols
    }

    /// Winning symbol on two reels and a uniformly chosen other symbol on a
    /// uniformly chosen reel
    fn pair_with_odd_one_out<R: Rng + ?Sized>(&self, rng: &mut R, winning_symbol: usize) -> [usize; REEL_COUNT] {
        let mut different = rng.gen_range(0..self.catalog.len() - 1);
        if different >= winning_symbol {
            different += 1;
        }

        let mut symbols = [winning_symbol; REEL_COUNT];
        symbols[rng.gen_range(0..REEL_COUNT)] = different;
        symbols
    }
}

impl Default for BetResolver {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::games::types::Symbol;
    use rand::{rngs::StdRng, RngCore, SeedableRng};
    use std::collections::{BTreeMap, HashMap};

    /// Generator that counts every draw made through it
    pub(crate) struct CountingRng {
        inner: StdRng,
        pub draws: usize,
    }

    impl CountingRng {
        pub(crate) fn new(seed: u64) -> Self {
            Self {
                inner: StdRng::seed_from_u64(seed),
                draws: 0,
            }
        }
    }

    impl RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            self.draws += 1;
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.draws += 1;
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.draws += 1;
            self.inner.fill_bytes(dest)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.draws += 1;
            self.inner.try_fill_bytes(dest)
        }
    }

    fn classify(symbols: &[usize; 3]) -> WinType {
        let [a, b, c] = *symbols;
        if a == b && b == c {
            WinType::ThreeOfAKind
        } else if a == b || b == c || a == c {
            WinType::TwoOfAKind
        } else {
            WinType::NoWin
        }
    }

    fn outcome_weights(trip: f64, pair: f64, bust: f64) -> BTreeMap<String, f64> {
        [("threeOfAKind", trip), ("twoOfAKind", pair), ("noWin", bust)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_random_bets_respect_invariants() {
        let resolver = BetResolver::standard();
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = HashMap::new();

        for amount in [1, 5, 10, 25, 50, 100] {
            for _ in 0..2_000 {
                let result = resolver
                    .place_bet_with_rng(&mut rng, amount, &BetOptions::default())
                    .unwrap();

                assert!(result.symbols.iter().all(|&s| s < resolver.catalog().len()));
                assert_eq!(classify(&result.symbols), result.win_type);
                assert_eq!(result.is_win, result.win_type != WinType::NoWin);
                assert_eq!(result.bet_amount, amount);
                if result.is_win {
                    assert!(result.win_amount > 0);
                } else {
                    assert_eq!(result.win_amount, 0);
                }
                *seen.entry(result.win_type).or_insert(0) += 1;
            }
        }

        assert_eq!(seen.len(), 3, "all classifications should occur: {:?}", seen);
    }

    #[test]
    fn test_force_win_yields_three_of_a_kind() {
        let resolver = BetResolver::standard();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..500 {
            let result = resolver
                .place_bet_with_rng(&mut rng, 10, &BetOptions::force_win())
                .unwrap();
            assert_eq!(result.win_type, WinType::ThreeOfAKind);
            assert!(result.is_win);
            let [a, b, c] = result.symbols;
            assert!(a == b && b == c);
            assert_eq!(result.win_amount, 10 * resolver.catalog().value(a));
        }
    }

    #[test]
    fn test_force_lose_yields_no_win_regardless_of_weights() {
        let resolver = BetResolver::standard();
        let mut rng = StdRng::seed_from_u64(5);
        let options = BetOptions {
            autolose: Some(true),
            outcome_weights: Some(outcome_weights(1000.0, 1000.0, 0.001)),
            ..Default::default()
        };

        for _ in 0..500 {
            let result = resolver.place_bet_with_rng(&mut rng, 5, &options).unwrap();
            assert_eq!(result.win_type, WinType::NoWin);
            assert!(!result.is_win);
            assert_eq!(result.win_amount, 0);
            assert_eq!(result.bet_amount, 5);
            let [a, b, c] = result.symbols;
            assert!(a != b && b != c && a != c);
            assert!(result.symbols.iter().all(|&s| s <= 5));
        }
    }

    #[test]
    fn test_force_win_takes_precedence_over_force_lose() {
        let resolver = BetResolver::standard();
        let mut rng = StdRng::seed_from_u64(8);
        let options = BetOptions {
            autowin: Some(true),
            autolose: Some(true),
            outcome_weights: Some(outcome_weights(0.001, 1.0, 1000.0)),
            ..Default::default()
        };

        for _ in 0..200 {
            let result = resolver.place_bet_with_rng(&mut rng, 25, &options).unwrap();
            assert_eq!(result.win_type, WinType::ThreeOfAKind);
        }
    }

    #[test]
    fn test_invalid_weights_consume_no_randomness() {
        let resolver = BetResolver::standard();
        let mut rng = CountingRng::new(1);

        let mut missing = outcome_weights(1.0, 1.0, 1.0);
        missing.remove("noWin");
        let bad_cases = vec![
            BetOptions {
                outcome_weights: Some(missing),
                ..Default::default()
            },
            BetOptions {
                outcome_weights: Some(outcome_weights(1.0, f64::NAN, 1.0)),
                ..Default::default()
            },
            BetOptions {
                outcome_weights: Some(outcome_weights(1.0, 1.0, 0.0)),
                ..Default::default()
            },
            BetOptions {
                autowin: Some(true),
                symbol_weights: Some([("0".to_string(), 1.0)].into_iter().collect()),
                ..Default::default()
            },
        ];

        for options in bad_cases {
            let result = resolver.place_bet_with_rng(&mut rng, 5, &options);
            assert!(matches!(result, Err(BetError::InvalidWeights(_))));
        }
        assert_eq!(rng.draws, 0);

        resolver
            .place_bet_with_rng(&mut rng, 5, &BetOptions::default())
            .unwrap();
        assert!(rng.draws > 0);
    }

    #[test]
    fn test_outcome_weights_shift_classification() {
        let resolver = BetResolver::standard();
        let mut rng = StdRng::seed_from_u64(21);
        let options = BetOptions {
            outcome_weights: Some(outcome_weights(1_000_000.0, 1.0, 1.0)),
            ..Default::default()
        };

        let trips = (0..1_000)
            .map(|_| resolver.place_bet_with_rng(&mut rng, 1, &options).unwrap())
            .filter(|r| r.win_type == WinType::ThreeOfAKind)
            .count();
        assert!(trips > 990, "only {} trips", trips);
    }

    #[test]
    fn test_symbol_weights_favor_heavy_symbol() {
        let resolver = BetResolver::standard();
        let mut rng = StdRng::seed_from_u64(99);
        let mut weights: BTreeMap<String, f64> = (0..6).map(|i| (i.to_string(), 0.001)).collect();
        weights.insert("5".to_string(), 1_000.0);
        let options = BetOptions {
            autowin: Some(true),
            symbol_weights: Some(weights),
            ..Default::default()
        };

        let diamonds = (0..1_000)
            .map(|_| resolver.place_bet_with_rng(&mut rng, 1, &options).unwrap())
            .filter(|r| r.symbols == [5, 5, 5])
            .count();
        assert!(diamonds > 990, "only {} diamond wins", diamonds);
    }

    #[test]
    fn test_zero_symbol_weight_never_wins() {
        let resolver = BetResolver::standard();
        let mut rng = StdRng::seed_from_u64(1234);
        let params = SpinParameters {
            force_win: true,
            force_lose: false,
            outcome_weights: Default::default(),
            symbol_weights: SymbolWeights::from_weights(vec![1.0, 1.0, 0.0, 1.0, 1.0, 1.0]),
        };

        for _ in 0..50_000 {
            let result = resolver.resolve(&mut rng, 5, &params);
            assert_ne!(result.symbols[0], 2);
        }
    }

    #[test]
    fn test_two_of_a_kind_arrangement() {
        let resolver = BetResolver::standard();
        let mut rng = StdRng::seed_from_u64(77);
        let mut odd_positions = [0usize; 3];
        let mut odd_symbols = [0usize; 6];

        for _ in 0..3_000 {
            let symbol = 4;
            let symbols = resolver.pair_with_odd_one_out(&mut rng, symbol);
            assert_eq!(classify(&symbols), WinType::TwoOfAKind);
            assert_eq!(symbols.iter().filter(|&&s| s == symbol).count(), 2);
            let odd = symbols.iter().position(|&s| s != symbol).unwrap();
            odd_positions[odd] += 1;
            odd_symbols[symbols[odd]] += 1;
        }

        assert!(odd_positions.iter().all(|&n| n > 800), "{:?}", odd_positions);
        // Expect about 600 for each of the five other symbols
        assert_eq!(odd_symbols[4], 0);
        for (index, &count) in odd_symbols.iter().enumerate() {
            if index != 4 {
                assert!(count > 450 && count < 750, "{:?}", odd_symbols);
            }
        }
    }

    #[test]
    fn test_distinct_symbols_are_uniform_per_reel() {
        let resolver = BetResolver::standard();
        let mut rng = StdRng::seed_from_u64(31);
        let mut counts = [[0usize; 6]; REEL_COUNT];

        for _ in 0..6_000 {
            let symbols = resolver.distinct_symbols(&mut rng);
            let [a, b, c] = symbols;
            assert!(a != b && b != c && a != c, "{:?}", symbols);
            for (reel, &symbol) in symbols.iter().enumerate() {
                counts[reel][symbol] += 1;
            }
        }

        // Expect about 1000 per symbol on every reel
        for reel in counts {
            assert!(reel.iter().all(|&n| n > 850 && n < 1150), "{:?}", reel);
        }
    }

    #[test]
    fn test_payouts() {
        let resolver = BetResolver::standard();
        assert_eq!(resolver.calculate_win_amount(10, 5, WinType::ThreeOfAKind), 200);
        assert_eq!(resolver.calculate_win_amount(10, 5, WinType::TwoOfAKind), 40);
        assert_eq!(resolver.calculate_win_amount(5, 1, WinType::TwoOfAKind), 3);
        assert_eq!(resolver.calculate_win_amount(25, 3, WinType::NoWin), 0);
        assert_eq!(resolver.calculate_win_amount(1, 0, WinType::ThreeOfAKind), 2);
        // floor(1 * 2 * 0.2) would be 0; winning spins still pay
        assert_eq!(resolver.calculate_win_amount(1, 0, WinType::TwoOfAKind), 1);
        assert_eq!(resolver.calculate_win_amount(1, 2, WinType::TwoOfAKind), 1);
    }

    #[test]
    fn test_minimal_catalog() {
        let catalog = SymbolCatalog::new(vec![
            Symbol::new("A", "a", 1),
            Symbol::new("B", "b", 2),
            Symbol::new("C", "c", 3),
        ])
        .unwrap();
        let resolver = BetResolver::new(Arc::new(catalog));
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..1_000 {
            let result = resolver
                .place_bet_with_rng(&mut rng, 5, &BetOptions::default())
                .unwrap();
            assert_eq!(classify(&result.symbols), result.win_type);
        }
    }
}
