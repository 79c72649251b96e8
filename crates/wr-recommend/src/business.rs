//! Business rules applied during Trinity assembly (§4.6.4 step 2).

use wr_intent::UserContext;

use crate::types::TrinityPackage;

/// Manufacturer names that earn the `+0.1` priority boost when they
/// appear in any trinity component's name (configurable in spirit; kept
/// as a constant table here as the teacher keeps its own static lists).
const PREFERRED_MANUFACTURERS: &[&str] = &["ESAB"];

pub const PREFERRED_MANUFACTURER_BOOST: f64 = 0.1;

const LARGE_ORG_MIN_PRICE: f64 = 5000.0;
const SMALL_ORG_MIN_PRICE: f64 = 1000.0;
const SMALL_ORG_MAX_PRICE: f64 = 5000.0;

/// `+0.1` if any trinity component's name contains a preferred
/// manufacturer's name.
pub fn preferred_manufacturer_boost(package: &TrinityPackage) -> f64 {
    let names = [&package.power_source, &package.feeder, &package.cooler]
        .into_iter()
        .flatten()
        .map(|c| c.product.name.as_str());

    for name in names {
        if PREFERRED_MANUFACTURERS.iter().any(|m| name.to_uppercase().contains(m)) {
            return PREFERRED_MANUFACTURER_BOOST;
        }
    }
    0.0
}

/// `1 − (max |price−mean|/mean)` across the trinity's priced components,
/// clamped to `[0,1]`; 1.0 when fewer than two prices are known (§4.6.4
/// step 2) since there's nothing to call inconsistent.
pub fn price_consistency(package: &TrinityPackage) -> f64 {
    let prices: Vec<f64> = [&package.power_source, &package.feeder, &package.cooler]
        .into_iter()
        .flatten()
        .filter_map(|c| c.product.price)
        .collect();

    if prices.len() < 2 {
        return 1.0;
    }

    let mean = prices.iter().sum::<f64>() / prices.len() as f64;
    if mean == 0.0 {
        return 1.0;
    }

    let max_deviation =
        prices.iter().map(|p| (p - mean).abs() / mean).fold(0.0_f64, f64::max);
    (1.0 - max_deviation).clamp(0.0, 1.0)
}

/// Returns `true` when the package's total price fits the pricing tier
/// the caller's organization prefers — large organizations (names
/// containing "enterprise"/"corporation") prefer packages over $5000,
/// everyone else prefers the $1000-$5000 band (§4.6.4 step 2).
pub fn fits_preferred_pricing_tier(package: &TrinityPackage, context: &UserContext) -> bool {
    let is_large_org = context
        .organization
        .as_deref()
        .map(|org| {
            let lower = org.to_lowercase();
            lower.contains("enterprise") || lower.contains("corporation")
        })
        .unwrap_or(false);

    if is_large_org {
        package.total_price > LARGE_ORG_MIN_PRICE
    } else {
        (SMALL_ORG_MIN_PRICE..=SMALL_ORG_MAX_PRICE).contains(&package.total_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PackageComponent;
    use wr_core::{Category, Product};

    fn product(name: &str, price: Option<f64>) -> Product {
        let mut p = Product::placeholder(Category::PowerSource, name);
        p.price = price;
        p
    }

    fn package_with_prices(prices: [Option<f64>; 3]) -> TrinityPackage {
        TrinityPackage {
            power_source: Some(PackageComponent { product: product("PS", prices[0]), compatibility_score: 1.0 }),
            feeder: Some(PackageComponent { product: product("Feeder", prices[1]), compatibility_score: 1.0 }),
            cooler: Some(PackageComponent { product: product("Cooler", prices[2]), compatibility_score: 1.0 }),
            accessories: vec![],
            consumables: vec![],
            package_score: 0.0,
            trinity_compliance: true,
            compliance_score: 1.0,
            total_price: prices.iter().flatten().sum(),
            algorithm_source: "test".into(),
            search_metadata: serde_json::json!({}),
        }
    }

    #[test]
    fn consistent_prices_score_near_one() {
        let package = package_with_prices([Some(1000.0), Some(1050.0), Some(950.0)]);
        assert!(price_consistency(&package) > 0.9);
    }

    #[test]
    fn divergent_prices_score_lower() {
        let package = package_with_prices([Some(100.0), Some(5000.0), Some(200.0)]);
        assert!(price_consistency(&package) < 0.5);
    }

    #[test]
    fn fewer_than_two_prices_floors_at_one() {
        let single_priced = package_with_prices([Some(1200.0), None, None]);
        assert_eq!(price_consistency(&single_priced), 1.0);

        let none_priced = package_with_prices([None, None, None]);
        assert_eq!(price_consistency(&none_priced), 1.0);
    }

    #[test]
    fn esab_name_triggers_boost() {
        let package = package_with_prices([Some(1000.0), Some(1000.0), Some(1000.0)]);
        let mut with_esab = package.clone();
        with_esab.power_source.as_mut().unwrap().product.name = "ESAB Renegade 300".into();
        assert_eq!(preferred_manufacturer_boost(&with_esab), PREFERRED_MANUFACTURER_BOOST);
        assert_eq!(preferred_manufacturer_boost(&package), 0.0);
    }
}
