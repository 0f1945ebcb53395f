//! Budget allocation for buy orders
//!
//! Turns a ranked candidate list into a bounded purchase plan. The pass is
//! greedy and single-shot: candidates arrive already ordered by expected
//! profit or score, so once the budget cannot cover the next candidate no
//! later candidate can do better.

use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::debug;

/// A purchase candidate, ranked by the caller
#[derive(Debug, Clone)]
pub struct BuyCandidate {
    pub name: String,
    pub lowest_price: Decimal,
    pub expected_profit: Decimal,
}

/// One planned buy order
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPurchase {
    pub name: String,
    pub price: Decimal,
}

/// The orders selected by one allocation pass
#[derive(Debug, Clone, Default)]
pub struct PurchasePlan {
    pub orders: Vec<PlannedPurchase>,
    pub total_spend: Decimal,
}

impl PurchasePlan {
    pub fn count(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Greedy allocator over a ranked candidate list
#[derive(Debug, Clone)]
pub struct BudgetAllocator {
    /// Added above the lowest ask so the order is likely to fill
    price_increment: Decimal,
    max_price_per_item: Decimal,
    blacklist: HashSet<String>,
}

impl BudgetAllocator {
    pub fn new(
        price_increment: Decimal,
        max_price_per_item: Decimal,
        blacklist: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            price_increment,
            max_price_per_item,
            blacklist: blacklist.into_iter().collect(),
        }
    }

    /// Select up to `limit` purchases within `budget`, in candidate order.
    ///
    /// Blacklisted and over-cap candidates are skipped so a single oversized
    /// item cannot block cheaper ones further down the ranking; budget
    /// exhaustion stops the pass entirely.
    pub fn allocate(
        &self,
        candidates: &[BuyCandidate],
        limit: usize,
        budget: Decimal,
    ) -> PurchasePlan {
        let mut plan = PurchasePlan::default();

        for candidate in candidates {
            if plan.count() >= limit {
                break;
            }

            if self.blacklist.contains(&candidate.name) {
                debug!(item = %candidate.name, "skipping blacklisted item");
                continue;
            }

            let price = candidate.lowest_price + self.price_increment;
            if price > self.max_price_per_item {
                debug!(item = %candidate.name, %price, "price above per-item cap");
                continue;
            }

            if plan.total_spend + price > budget {
                debug!(
                    spent = %plan.total_spend,
                    %budget,
                    "budget exhausted, stopping allocation"
                );
                break;
            }

            plan.total_spend += price;
            plan.orders.push(PlannedPurchase {
                name: candidate.name.clone(),
                price,
            });
        }

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_candidate(name: &str, lowest_price: Decimal, expected_profit: Decimal) -> BuyCandidate {
        BuyCandidate {
            name: name.to_string(),
            lowest_price,
            expected_profit,
        }
    }

    fn make_allocator(blacklist: &[&str]) -> BudgetAllocator {
        BudgetAllocator::new(
            dec!(0.01),
            dec!(50),
            blacklist.iter().map(|s| s.to_string()),
        )
    }

    #[test]
    fn test_oversized_item_skipped_not_aborting() {
        let allocator = make_allocator(&[]);
        let candidates = vec![
            make_candidate("A", dec!(60), dec!(10)),
            make_candidate("B", dec!(30), dec!(8)),
            make_candidate("C", dec!(40), dec!(5)),
        ];

        let plan = allocator.allocate(&candidates, 10, dec!(100));

        // A at 60.01 exceeds the 50 cap and is skipped; B and C both fit
        let names: Vec<&str> = plan.orders.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
        assert_eq!(plan.total_spend, dec!(70.02));
        assert!(plan.total_spend <= dec!(100));
    }

    #[test]
    fn test_budget_exhaustion_stops_the_pass() {
        let allocator = make_allocator(&[]);
        let candidates = vec![
            make_candidate("A", dec!(40), dec!(10)),
            make_candidate("B", dec!(45), dec!(8)),
            make_candidate("C", dec!(5), dec!(5)),
        ];

        let plan = allocator.allocate(&candidates, 10, dec!(60));

        // B busts the budget; C would fit but is never considered
        let names: Vec<&str> = plan.orders.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["A"]);
        assert_eq!(plan.total_spend, dec!(40.01));
    }

    #[test]
    fn test_blacklisted_items_never_planned() {
        let allocator = make_allocator(&["Jester Mask"]);
        let candidates = vec![
            make_candidate("Jester Mask", dec!(10), dec!(50)),
            make_candidate("Tempered Rock", dec!(10), dec!(1)),
        ];

        let plan = allocator.allocate(&candidates, 10, dec!(100));

        assert_eq!(plan.count(), 1);
        assert_eq!(plan.orders[0].name, "Tempered Rock");
    }

    #[test]
    fn test_limit_caps_order_count() {
        let allocator = make_allocator(&[]);
        let candidates: Vec<BuyCandidate> = (0..5)
            .map(|i| make_candidate(&format!("item-{i}"), dec!(10), dec!(5)))
            .collect();

        let plan = allocator.allocate(&candidates, 2, dec!(1000));

        assert_eq!(plan.count(), 2);
        assert_eq!(plan.orders[0].name, "item-0");
        assert_eq!(plan.orders[1].name, "item-1");
    }

    #[test]
    fn test_price_increment_applied() {
        let allocator = make_allocator(&[]);
        let candidates = vec![make_candidate("A", dec!(10.50), dec!(5))];

        let plan = allocator.allocate(&candidates, 10, dec!(100));

        assert_eq!(plan.orders[0].price, dec!(10.51));
    }

    #[test]
    fn test_increment_can_push_over_cap() {
        let allocator = make_allocator(&[]);
        // Exactly at the cap before the increment
        let candidates = vec![make_candidate("A", dec!(50), dec!(5))];

        let plan = allocator.allocate(&candidates, 10, dec!(100));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_exact_budget_fit_is_accepted() {
        let allocator = make_allocator(&[]);
        let candidates = vec![make_candidate("A", dec!(49.99), dec!(5))];

        let plan = allocator.allocate(&candidates, 10, dec!(50.00));

        assert_eq!(plan.count(), 1);
        assert_eq!(plan.total_spend, dec!(50.00));
    }

    #[test]
    fn test_empty_candidates_yield_empty_plan() {
        let allocator = make_allocator(&[]);
        let plan = allocator.allocate(&[], 10, dec!(100));

        assert!(plan.is_empty());
        assert_eq!(plan.total_spend, Decimal::ZERO);
    }

    #[test]
    fn test_allocation_is_idempotent() {
        let allocator = make_allocator(&["banned"]);
        let candidates = vec![
            make_candidate("A", dec!(10), dec!(5)),
            make_candidate("banned", dec!(10), dec!(9)),
            make_candidate("B", dec!(20), dec!(4)),
        ];

        let first = allocator.allocate(&candidates, 10, dec!(100));
        let second = allocator.allocate(&candidates, 10, dec!(100));

        assert_eq!(first.orders, second.orders);
        assert_eq!(first.total_spend, second.total_spend);
    }
}
