//! Unit tests for profitability prediction

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::analytics::{Trend, TrendResult, Volatility, VolatilityBasis};
    use crate::config::{AnalyticsConfig, FeatureWeights, MlConfig};
    use crate::error::BotError;
    use crate::storage::MockMarketStore;
    use crate::types::{ItemSnapshot, PriceObservation, TransactionStats};
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn make_item(expected_profit: Decimal, volume: i64) -> ItemSnapshot {
        ItemSnapshot {
            name: "Tempered AK47".to_string(),
            app_id: 252490,
            lowest_price: dec!(10.00),
            median_price: dec!(14.00),
            volume,
            expected_profit,
            is_profitable: true,
        }
    }

    fn make_trend(trend: Trend, confidence: f64) -> TrendResult {
        TrendResult {
            trend,
            slope: 0.5,
            price_change_pct: 4.0,
            avg_volume: 30.0,
            samples: 6,
            confidence,
        }
    }

    fn computed_volatility(value: f64) -> Volatility {
        Volatility {
            value,
            basis: VolatilityBasis::Computed,
        }
    }

    fn make_scorer() -> ProfitabilityScorer {
        ProfitabilityScorer::new(FeatureWeights::default())
    }

    #[test]
    fn test_all_bonuses_give_full_score() {
        let scorer = make_scorer();
        let signal = scorer.score(
            &make_item(dec!(6), 60),
            &make_trend(Trend::Rising, 0.8),
            &computed_volatility(3.0),
            &TransactionStats {
                successful_buys: 10,
                successful_sells: 9,
            },
        );

        // 30 + 20 + 25 + 15 + 10 with the stock weights
        assert_eq!(signal.score, 100.0);
        assert_eq!(signal.classification, Profitability::HighlyProfitable);
        assert_eq!(signal.confidence, 1.0);
        assert_eq!(signal.reasons.len(), 5);
    }

    #[test]
    fn test_score_capped_at_100_with_inflated_weights() {
        let weights = FeatureWeights {
            expected_profit: 80.0,
            volume: 80.0,
            trend: 80.0,
            volatility: 80.0,
            historical_success: 80.0,
        };
        let scorer = ProfitabilityScorer::new(weights);
        let signal = scorer.score(
            &make_item(dec!(6), 60),
            &make_trend(Trend::Rising, 0.8),
            &computed_volatility(3.0),
            &TransactionStats {
                successful_buys: 10,
                successful_sells: 9,
            },
        );

        assert_eq!(signal.score, 100.0);
        assert_eq!(signal.confidence, 1.0);
    }

    #[test]
    fn test_score_floored_at_zero_when_all_penalties_hit() {
        let scorer = make_scorer();
        let signal = scorer.score(
            &make_item(dec!(0.5), 2),
            &make_trend(Trend::Falling, 0.9),
            &computed_volatility(40.0),
            &TransactionStats::default(),
        );

        // -10 (falling) - 5 (high volatility), clamped up to zero
        assert_eq!(signal.score, 0.0);
        assert_eq!(signal.classification, Profitability::NotProfitable);
        assert_eq!(signal.confidence, 0.0);
        assert!(signal.reasons.contains(&"Falling price (risky)".to_string()));
        assert!(signal.reasons.contains(&"High volatility (risky)".to_string()));
    }

    #[test]
    fn test_half_weight_tiers() {
        let scorer = make_scorer();
        let signal = scorer.score(
            &make_item(dec!(3), 20),
            &make_trend(Trend::Stable, 0.8),
            &computed_volatility(10.0),
            &TransactionStats {
                successful_buys: 10,
                successful_sells: 6,
            },
        );

        // 15 + 10 + 12.5 + 7.5 + 5 = 50
        assert_eq!(signal.score, 50.0);
        assert_eq!(signal.classification, Profitability::Profitable);
    }

    #[test]
    fn test_classification_bands() {
        let scorer = make_scorer();
        let stats = TransactionStats::default();
        let calm = computed_volatility(3.0);

        // 30 + 20 + 25 + 15 = 90
        let high = scorer.score(
            &make_item(dec!(6), 60),
            &make_trend(Trend::Rising, 0.8),
            &calm,
            &stats,
        );
        assert_eq!(high.classification, Profitability::HighlyProfitable);

        // 15 + 10 + 12.5 + 15 = 52.5
        let profitable = scorer.score(
            &make_item(dec!(3), 20),
            &make_trend(Trend::Stable, 0.8),
            &calm,
            &stats,
        );
        assert_eq!(profitable.classification, Profitability::Profitable);

        // 15 + 15 = 30
        let moderate = scorer.score(
            &make_item(dec!(3), 5),
            &make_trend(Trend::InsufficientData, 0.0),
            &calm,
            &stats,
        );
        assert_eq!(moderate.classification, Profitability::Moderate);

        // 15 only
        let poor = scorer.score(
            &make_item(dec!(0.5), 5),
            &make_trend(Trend::InsufficientData, 0.0),
            &calm,
            &stats,
        );
        assert_eq!(poor.classification, Profitability::NotProfitable);
    }

    #[test]
    fn test_rising_trend_needs_confidence() {
        let scorer = make_scorer();
        let stats = TransactionStats::default();
        let calm = computed_volatility(3.0);

        let confident = scorer.score(
            &make_item(dec!(0.5), 5),
            &make_trend(Trend::Rising, 0.8),
            &calm,
            &stats,
        );
        let unsure = scorer.score(
            &make_item(dec!(0.5), 5),
            &make_trend(Trend::Rising, 0.3),
            &calm,
            &stats,
        );

        // Low-confidence rising earns nothing from the trend factor
        assert_eq!(confident.score - unsure.score, 25.0);
    }

    #[test]
    fn test_falling_penalty_is_flat_not_weighted() {
        let weights = FeatureWeights {
            trend: 60.0,
            ..FeatureWeights::default()
        };
        let scorer = ProfitabilityScorer::new(weights);

        let signal = scorer.score(
            &make_item(dec!(6), 60),
            &make_trend(Trend::Falling, 0.9),
            &computed_volatility(3.0),
            &TransactionStats::default(),
        );

        // 30 + 20 - 10 + 15: the falling penalty ignores the inflated weight
        assert_eq!(signal.score, 55.0);
    }

    #[test]
    fn test_history_skipped_without_sells() {
        let scorer = make_scorer();
        let with_buys_only = scorer.score(
            &make_item(dec!(6), 60),
            &make_trend(Trend::Stable, 0.8),
            &computed_volatility(3.0),
            &TransactionStats {
                successful_buys: 20,
                successful_sells: 0,
            },
        );

        assert!(!with_buys_only
            .reasons
            .iter()
            .any(|r| r.contains("historical performance")));
    }

    #[test]
    fn test_history_ratio_with_zero_buys() {
        let scorer = make_scorer();
        // Sells with no recorded buys: ratio divides by max(buys, 1)
        let signal = scorer.score(
            &make_item(dec!(0.5), 5),
            &make_trend(Trend::InsufficientData, 0.0),
            &computed_volatility(3.0),
            &TransactionStats {
                successful_buys: 0,
                successful_sells: 3,
            },
        );

        assert!(signal
            .reasons
            .contains(&"Strong historical performance".to_string()));
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let scorer = make_scorer();
        let item = make_item(dec!(3), 20);
        let trend = make_trend(Trend::Stable, 0.8);
        let vol = computed_volatility(10.0);
        let stats = TransactionStats {
            successful_buys: 4,
            successful_sells: 3,
        };

        let first = scorer.score(&item, &trend, &vol, &stats);
        let second = scorer.score(&item, &trend, &vol, &stats);
        assert_eq!(first, second);
    }

    #[test]
    fn test_features_snapshot_carried_on_signal() {
        let scorer = make_scorer();
        let signal = scorer.score(
            &make_item(dec!(3), 20),
            &make_trend(Trend::Stable, 0.8),
            &computed_volatility(10.0),
            &TransactionStats::default(),
        );

        let features = signal.features.unwrap();
        assert_eq!(features.expected_profit, dec!(3));
        assert_eq!(features.volume, 20);
        assert_eq!(features.trend, Trend::Stable);
        assert_eq!(features.volatility, 10.0);
    }

    #[test]
    fn test_unknown_and_error_signals() {
        let unknown = ProfitabilitySignal::unknown();
        assert_eq!(unknown.classification, Profitability::Unknown);
        assert_eq!(unknown.score, 0.0);
        assert!(unknown.features.is_none());

        let error = ProfitabilitySignal::error("database error: timeout");
        assert_eq!(error.classification, Profitability::Error);
        assert_eq!(error.confidence, 0.0);
        assert_eq!(error.reasons, vec!["database error: timeout".to_string()]);
    }

    // ---- predictor ----

    fn make_history(prices: &[Decimal]) -> Vec<PriceObservation> {
        let start = Utc::now() - Duration::hours(prices.len() as i64);
        prices
            .iter()
            .enumerate()
            .map(|(i, price)| PriceObservation {
                item_name: "Tempered AK47".to_string(),
                lowest_price: *price,
                median_price: *price,
                volume: 60,
                timestamp: start + Duration::hours(i as i64),
            })
            .collect()
    }

    fn make_predictor() -> MlPredictor {
        MlPredictor::new(MlConfig::default(), AnalyticsConfig::default())
    }

    #[tokio::test]
    async fn test_predict_unknown_without_snapshot() {
        let mut store = MockMarketStore::new();
        store.expect_item_snapshot().returning(|_| Ok(None));

        let predictor = make_predictor();
        let signal = predictor.predict(&store, "Ghost Item").await;
        assert_eq!(signal.classification, Profitability::Unknown);
    }

    #[tokio::test]
    async fn test_predict_maps_store_failure_to_error_signal() {
        let mut store = MockMarketStore::new();
        store
            .expect_item_snapshot()
            .returning(|_| Err(BotError::Market("boom".to_string())));

        let predictor = make_predictor();
        let signal = predictor.predict(&store, "Tempered AK47").await;
        assert_eq!(signal.classification, Profitability::Error);
        assert_eq!(signal.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_predict_scores_from_store_inputs() {
        let mut store = MockMarketStore::new();
        store
            .expect_item_snapshot()
            .returning(|_| Ok(Some(make_item(dec!(6), 60))));
        store
            .expect_price_history()
            .returning(|_, _| Ok(make_history(&[dec!(10), dec!(11), dec!(12), dec!(13)])));
        store
            .expect_transaction_stats()
            .returning(|_| Ok(TransactionStats::default()));

        let predictor = make_predictor();
        let signal = predictor.predict(&store, "Tempered AK47").await;

        // Rising trend with 4/5 confidence plus profit/volume bonuses;
        // volatility of that series sits in the moderate band
        assert_eq!(signal.classification, Profitability::HighlyProfitable);
        assert!(signal.reasons.contains(&"Rising price trend".to_string()));
    }

    #[tokio::test]
    async fn test_recommendations_filtered_sorted_truncated() {
        let mut store = MockMarketStore::new();
        store.expect_profitable_items().returning(|_, _| {
            Ok(vec![
                ItemSnapshot {
                    name: "Strong".to_string(),
                    ..make_item(dec!(6), 60)
                },
                ItemSnapshot {
                    name: "Weak".to_string(),
                    ..make_item(dec!(0.5), 2)
                },
                ItemSnapshot {
                    name: "Mid".to_string(),
                    ..make_item(dec!(3), 60)
                },
            ])
        });
        store.expect_item_snapshot().returning(|name| {
            Ok(Some(match name {
                "Strong" => ItemSnapshot {
                    name: "Strong".to_string(),
                    ..make_item(dec!(6), 60)
                },
                "Mid" => ItemSnapshot {
                    name: "Mid".to_string(),
                    ..make_item(dec!(3), 60)
                },
                _ => ItemSnapshot {
                    name: "Weak".to_string(),
                    ..make_item(dec!(0.5), 2)
                },
            }))
        });
        store
            .expect_price_history()
            .returning(|_, _| Ok(make_history(&[dec!(10), dec!(11), dec!(12), dec!(13)])));
        store
            .expect_transaction_stats()
            .returning(|_| Ok(TransactionStats::default()));

        let predictor = make_predictor();
        let recs = predictor.recommendations(&store, 10, Some(0.5)).await;

        let names: Vec<&str> = recs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Strong", "Mid"]);
        assert!(recs[0].score >= recs[1].score);

        let top_one = predictor.recommendations(&store, 1, Some(0.5)).await;
        assert_eq!(top_one.len(), 1);
        assert_eq!(top_one[0].name, "Strong");
    }

    #[tokio::test]
    async fn test_recommendations_empty_on_pool_failure() {
        let mut store = MockMarketStore::new();
        store
            .expect_profitable_items()
            .returning(|_, _| Err(BotError::Market("pool down".to_string())));

        let predictor = make_predictor();
        let recs = predictor.recommendations(&store, 5, None).await;
        assert!(recs.is_empty());
    }

    #[tokio::test]
    async fn test_failed_item_excluded_from_recommendations() {
        let mut store = MockMarketStore::new();
        store.expect_profitable_items().returning(|_, _| {
            Ok(vec![
                ItemSnapshot {
                    name: "Good".to_string(),
                    ..make_item(dec!(6), 60)
                },
                ItemSnapshot {
                    name: "Broken".to_string(),
                    ..make_item(dec!(6), 60)
                },
            ])
        });
        store.expect_item_snapshot().returning(|name| {
            if name == "Broken" {
                Err(BotError::Market("read failed".to_string()))
            } else {
                Ok(Some(ItemSnapshot {
                    name: "Good".to_string(),
                    ..make_item(dec!(6), 60)
                }))
            }
        });
        store
            .expect_price_history()
            .returning(|_, _| Ok(make_history(&[dec!(10), dec!(11), dec!(12), dec!(13)])));
        store
            .expect_transaction_stats()
            .returning(|_| Ok(TransactionStats::default()));

        let predictor = make_predictor();
        let recs = predictor.recommendations(&store, 10, Some(0.5)).await;

        // The broken item degrades to a zero-confidence error signal and
        // falls out; the batch itself survives
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].name, "Good");
    }
}
