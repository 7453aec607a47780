use super::normalizer::normalize_name;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Simulated shelf price and profit margin for one product line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceProfile {
    pub unit_price: f64,
    pub margin: f64,
}

impl PriceProfile {
    pub const DEFAULT: PriceProfile = PriceProfile {
        unit_price: 1.00,
        margin: 0.20,
    };

    pub fn unit_cost(&self) -> f64 {
        self.unit_price * (1.0 - self.margin)
    }
}

static PRICE_TABLE: OnceLock<HashMap<String, PriceProfile>> = OnceLock::new();

pub fn price_profile_for(product_name: &str) -> PriceProfile {
    price_table()
        .get(&normalize_name(product_name))
        .copied()
        .unwrap_or(PriceProfile::DEFAULT)
}

fn price_table() -> &'static HashMap<String, PriceProfile> {
    PRICE_TABLE.get_or_init(|| {
        const PROFILES: &[(&str, f64, f64)] = &[
            ("Berry Juice", 4.50, 0.40),
            ("Mango Drink", 3.00, 0.35),
            ("Lemonade", 2.50, 0.30),
            ("Water Bottle", 1.50, 0.25),
            ("Diet Soda", 2.00, 0.30),
            ("Cola", 2.00, 0.35),
            ("Energy Drink", 5.00, 0.50),
            ("Coffee Beans", 15.00, 0.60),
            ("Tea Bags", 8.00, 0.45),
        ];

        PROFILES
            .iter()
            .map(|&(name, unit_price, margin)| {
                (normalize_name(name), PriceProfile { unit_price, margin })
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_products_use_their_profile() {
        let berry = price_profile_for("berry  juice");
        assert_eq!(berry.unit_price, 4.50);
        assert!((berry.unit_cost() - 2.70).abs() < 1e-9);
    }

    #[test]
    fn unknown_products_fall_back_to_default() {
        let profile = price_profile_for("Kombucha");
        assert_eq!(profile, PriceProfile::DEFAULT);
        assert!((profile.unit_cost() - 0.80).abs() < 1e-9);
    }
}
