use serde::{Deserialize, Serialize};

/// Market signals for one product, gathered fresh for each computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingInput {
    /// Reference price the floor and ceiling are derived from
    pub base_price: f64,

    /// Last computed display price
    pub current_price: f64,

    pub current_stock: u64,

    /// Reference stock level (100% supply)
    pub base_stock: u64,

    pub view_count: u64,
    pub purchase_count: u64,
}

/// Outcome of one repricing step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub old_price: f64,
    pub new_price: f64,
    pub price_change_percent: f64,
    pub supply_ratio: f64,
    pub demand: u64,
    pub stock: u64,
    pub trend_indicator: TrendIndicator,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "UP",
            Trend::Down => "DOWN",
            Trend::Stable => "STABLE",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Stable => "→",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Trend::Up => "green",
            Trend::Down => "red",
            Trend::Stable => "gray",
        }
    }
}

/// UI-facing classification of a price move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendIndicator {
    pub arrow: String,
    pub trend: Trend,
    pub color: String,
    pub label: String,
}

/// Policy constants of the fluctuation model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// How many views one purchase is worth in demand
    pub purchase_weight: u64,

    /// Percent gained per unit of ratio below 1 (scarcity)
    pub scarcity_rate: f64,

    /// Percent lost per unit of ratio above 1 (surplus)
    pub surplus_rate: f64,

    /// Absolute bound on a single step's change, in percent
    pub max_change_percent: f64,

    /// Price floor as a fraction of the base price
    pub min_price_factor: f64,

    /// Price ceiling as a fraction of the base price
    pub max_price_factor: f64,

    /// Moves within +/- this band are reported as stable
    pub trend_threshold_percent: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            purchase_weight: 3,
            scarcity_rate: 100.0,
            surplus_rate: 30.0,
            max_change_percent: 50.0,
            min_price_factor: 0.1,
            max_price_factor: 2.0,
            trend_threshold_percent: 5.0,
        }
    }
}

/// Supply/demand price fluctuation engine.
///
/// Every method is pure and total: any input yields a value, nothing panics.
/// Out-of-range prices (zero, negative, non-finite) propagate into the output
/// rather than being rejected.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Weighted demand: views plus weighted purchases
    pub fn calculate_demand(&self, view_count: u64, purchase_count: u64) -> u64 {
        view_count.saturating_add(purchase_count.saturating_mul(self.config.purchase_weight))
    }

    /// Stock-availability percentage divided by demand.
    ///
    /// No demand or no reference stock means no signal, reported as the
    /// neutral ratio `1.0`.
    pub fn calculate_supply_ratio(&self, current_stock: u64, base_stock: u64, demand: u64) -> f64 {
        if demand == 0 || base_stock == 0 {
            return 1.0;
        }

        let supply_percentage = (current_stock as f64 / base_stock as f64) * 100.0;
        supply_percentage / demand.max(1) as f64
    }

    /// Signed percent change for a supply ratio.
    ///
    /// Scarcity (`ratio < 1`) raises the price at `scarcity_rate`, surplus
    /// lowers it at the gentler `surplus_rate`. Both are bounded by
    /// `max_change_percent`.
    pub fn calculate_price_change(&self, supply_ratio: f64) -> f64 {
        let bound = self.config.max_change_percent;

        if supply_ratio < 1.0 {
            ((1.0 - supply_ratio) * self.config.scarcity_rate).min(bound)
        } else {
            // (1 - r) rather than -(r - 1) keeps r == 1 at +0.0
            ((1.0 - supply_ratio) * self.config.surplus_rate).max(-bound)
        }
    }

    /// Compute the next display price for one product
    pub fn calculate_new_price(&self, input: &PricingInput) -> PricingResult {
        let demand = self.calculate_demand(input.view_count, input.purchase_count);
        let supply_ratio = self.calculate_supply_ratio(input.current_stock, input.base_stock, demand);
        let price_change_percent = self.calculate_price_change(supply_ratio);

        let floor = input.base_price * self.config.min_price_factor;
        let ceiling = input.base_price * self.config.max_price_factor;

        // max/min instead of clamp: clamp panics on NaN or inverted bounds
        let new_price = (input.current_price * (1.0 + price_change_percent / 100.0))
            .max(floor)
            .min(ceiling);

        PricingResult {
            old_price: input.current_price,
            new_price,
            price_change_percent,
            supply_ratio,
            demand,
            stock: input.current_stock,
            trend_indicator: self.trend_indicator(price_change_percent),
        }
    }

    /// Classify a percent change. Thresholds are strict: exactly +/-5 is stable.
    pub fn trend_indicator(&self, price_change_percent: f64) -> TrendIndicator {
        let threshold = self.config.trend_threshold_percent;
        // Normalise -0.0 so it never renders as "-0.00%"
        let percent = if price_change_percent == 0.0 { 0.0 } else { price_change_percent };

        let (trend, label) = if percent > threshold {
            (Trend::Up, format!("+{:.2}%", percent))
        } else if percent < -threshold {
            (Trend::Down, format!("{:.2}%", percent))
        } else {
            (Trend::Stable, format!("{:.2}%", percent))
        };

        TrendIndicator {
            arrow: trend.arrow().to_string(),
            trend,
            color: trend.color().to_string(),
            label,
        }
    }
}

pub fn calculate_demand(view_count: u64, purchase_count: u64) -> u64 {
    PricingEngine::default().calculate_demand(view_count, purchase_count)
}

pub fn calculate_supply_ratio(current_stock: u64, base_stock: u64, demand: u64) -> f64 {
    PricingEngine::default().calculate_supply_ratio(current_stock, base_stock, demand)
}

pub fn calculate_price_change(supply_ratio: f64) -> f64 {
    PricingEngine::default().calculate_price_change(supply_ratio)
}

/// Default-policy repricing from raw product counters
pub fn calculate_new_price(
    base_price: f64,
    current_price: f64,
    current_stock: u64,
    base_stock: u64,
    view_count: u64,
    purchase_count: u64,
) -> PricingResult {
    PricingEngine::default().calculate_new_price(&PricingInput {
        base_price,
        current_price,
        current_stock,
        base_stock,
        view_count,
        purchase_count,
    })
}

pub fn get_trend_indicator(price_change_percent: f64) -> TrendIndicator {
    PricingEngine::default().trend_indicator(price_change_percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(current_stock: u64, view_count: u64, purchase_count: u64) -> PricingInput {
        PricingInput {
            base_price: 100.0,
            current_price: 100.0,
            current_stock,
            base_stock: 100,
            view_count,
            purchase_count,
        }
    }

    #[test]
    fn test_demand_weights_purchases() {
        assert_eq!(calculate_demand(0, 0), 0);
        assert_eq!(calculate_demand(10, 0), 10);
        assert_eq!(calculate_demand(0, 10), 30);
        assert_eq!(calculate_demand(4, 2), 10);

        // One more purchase moves demand three times as far as one more view
        let base = calculate_demand(7, 7);
        assert_eq!(calculate_demand(7, 8) - base, 3 * (calculate_demand(8, 7) - base));
    }

    #[test]
    fn test_demand_saturates() {
        assert_eq!(calculate_demand(u64::MAX, u64::MAX), u64::MAX);
    }

    #[test]
    fn test_supply_ratio_neutral_without_signal() {
        assert_eq!(calculate_supply_ratio(10, 100, 0), 1.0);
        assert_eq!(calculate_supply_ratio(10, 0, 25), 1.0);
        assert_eq!(calculate_supply_ratio(0, 0, 0), 1.0);
    }

    #[test]
    fn test_supply_ratio() {
        assert!((calculate_supply_ratio(5, 100, 50) - 0.1).abs() < 1e-9);
        assert!((calculate_supply_ratio(200, 100, 1) - 200.0).abs() < 1e-9);
        assert!((calculate_supply_ratio(50, 100, 50) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_price_change_regimes() {
        // Scarcity
        assert!((calculate_price_change(0.8) - 20.0).abs() < 1e-9);
        assert_eq!(calculate_price_change(0.1), 50.0);
        assert_eq!(calculate_price_change(0.0), 50.0);

        // Surplus, gentler slope
        assert!((calculate_price_change(1.5) + 15.0).abs() < 1e-9);
        assert_eq!(calculate_price_change(200.0), -50.0);

        // Equilibrium is a positive zero
        let at_one = calculate_price_change(1.0);
        assert_eq!(at_one, 0.0);
        assert!(at_one.is_sign_positive());
    }

    #[test]
    fn test_scenario_no_demand() {
        let result = calculate_new_price(100.0, 100.0, 10, 100, 0, 0);

        assert_eq!(result.demand, 0);
        assert_eq!(result.supply_ratio, 1.0);
        assert_eq!(result.price_change_percent, 0.0);
        assert_eq!(result.new_price, 100.0);
        assert_eq!(result.old_price, 100.0);
        assert_eq!(result.stock, 10);
        assert_eq!(result.trend_indicator.trend, Trend::Stable);
        assert_eq!(result.trend_indicator.label, "0.00%");
    }

    #[test]
    fn test_scenario_scarcity() {
        let result = calculate_new_price(100.0, 100.0, 5, 100, 50, 0);

        assert_eq!(result.demand, 50);
        assert!((result.supply_ratio - 0.1).abs() < 1e-9);
        assert_eq!(result.price_change_percent, 50.0);
        assert_eq!(result.new_price, 150.0);
        assert_eq!(result.trend_indicator.trend, Trend::Up);
        assert_eq!(result.trend_indicator.arrow, "↑");
        assert_eq!(result.trend_indicator.color, "green");
        assert_eq!(result.trend_indicator.label, "+50.00%");
    }

    #[test]
    fn test_scenario_surplus() {
        let result = calculate_new_price(100.0, 100.0, 200, 100, 1, 0);

        assert_eq!(result.demand, 1);
        assert!((result.supply_ratio - 200.0).abs() < 1e-9);
        assert_eq!(result.price_change_percent, -50.0);
        assert_eq!(result.new_price, 50.0);
        assert_eq!(result.trend_indicator.trend, Trend::Down);
        assert_eq!(result.trend_indicator.arrow, "↓");
        assert_eq!(result.trend_indicator.color, "red");
        assert_eq!(result.trend_indicator.label, "-50.00%");
    }

    #[test]
    fn test_no_signal_keeps_price_but_clamps() {
        // Zero base stock: neutral ratio, price only moves into bounds
        let result = calculate_new_price(100.0, 500.0, 3, 0, 40, 2);
        assert_eq!(result.price_change_percent, 0.0);
        assert_eq!(result.new_price, 200.0);

        let result = calculate_new_price(100.0, 1.0, 3, 100, 0, 0);
        assert_eq!(result.new_price, 10.0);
    }

    #[test]
    fn test_new_price_within_bounds() {
        let engine = PricingEngine::default();

        for current_price in [0.5, 10.0, 60.0, 100.0, 150.0, 199.0, 400.0] {
            for stock in [0, 1, 5, 50, 100, 250, 10_000] {
                for views in [0, 1, 10, 500] {
                    for purchases in [0, 1, 20] {
                        let result = engine.calculate_new_price(&PricingInput {
                            base_price: 100.0,
                            current_price,
                            current_stock: stock,
                            base_stock: 100,
                            view_count: views,
                            purchase_count: purchases,
                        });
                        assert!(result.new_price >= 10.0 && result.new_price <= 200.0);
                        assert!(result.price_change_percent >= -50.0);
                        assert!(result.price_change_percent <= 50.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_lower_stock_never_lowers_change() {
        let engine = PricingEngine::default();
        let mut previous = f64::NEG_INFINITY;

        // Walk stock downward with demand held at 20
        for stock in (0..=300).rev() {
            let change = engine.calculate_new_price(&input(stock, 20, 0)).price_change_percent;
            assert!(change >= previous, "stock {} gave {} after {}", stock, change, previous);
            previous = change;
        }
    }

    #[test]
    fn test_trend_thresholds_are_strict() {
        assert_eq!(get_trend_indicator(5.0).trend, Trend::Stable);
        assert_eq!(get_trend_indicator(-5.0).trend, Trend::Stable);
        assert_eq!(get_trend_indicator(5.01).trend, Trend::Up);
        assert_eq!(get_trend_indicator(-5.01).trend, Trend::Down);

        assert_eq!(get_trend_indicator(5.0).label, "5.00%");
        assert_eq!(get_trend_indicator(-5.0).label, "-5.00%");
        assert_eq!(get_trend_indicator(12.345).label, "+12.35%");
        assert_eq!(get_trend_indicator(-0.0).label, "0.00%");
        assert_eq!(get_trend_indicator(0.0).arrow, "→");
        assert_eq!(get_trend_indicator(0.0).color, "gray");
    }

    #[test]
    fn test_non_finite_prices_do_not_panic() {
        let engine = PricingEngine::default();

        let result = engine.calculate_new_price(&PricingInput {
            base_price: f64::NAN,
            current_price: 100.0,
            current_stock: 5,
            base_stock: 100,
            view_count: 50,
            purchase_count: 0,
        });
        assert_eq!(result.price_change_percent, 50.0);

        let result = engine.calculate_new_price(&PricingInput {
            base_price: -10.0,
            current_price: f64::INFINITY,
            current_stock: 0,
            base_stock: 0,
            view_count: 0,
            purchase_count: 0,
        });
        assert_eq!(result.trend_indicator.trend, Trend::Stable);
    }

    #[test]
    fn test_custom_policy() {
        let engine = PricingEngine::new(PricingConfig {
            purchase_weight: 1,
            max_change_percent: 10.0,
            ..PricingConfig::default()
        });

        assert_eq!(engine.calculate_demand(2, 2), 4);
        assert_eq!(engine.calculate_price_change(0.0), 10.0);
        assert_eq!(engine.calculate_price_change(50.0), -10.0);
    }

    #[test]
    fn test_result_serializes_trend_uppercase() {
        let result = calculate_new_price(100.0, 100.0, 5, 100, 50, 0);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["trend_indicator"]["trend"], "UP");
        assert_eq!(json["new_price"], 150.0);
    }
}
