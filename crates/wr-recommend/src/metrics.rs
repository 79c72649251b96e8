//! Quality metrics attached to a recommendation result (§4.6.5 reporting).

use crate::types::{ConfidenceDistribution, TrinityPackage};

const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.8;
const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Fraction of formed packages that are full PowerSource+Feeder+Cooler
/// Trinities.
pub fn trinity_formation_rate(packages: &[TrinityPackage]) -> f64 {
    if packages.is_empty() {
        return 0.0;
    }
    let compliant = packages.iter().filter(|p| p.trinity_compliance).count();
    compliant as f64 / packages.len() as f64
}

/// Proportion of packages falling into each confidence band, summing to 1
/// (or all-zero when there are no packages).
pub fn confidence_distribution(packages: &[TrinityPackage]) -> ConfidenceDistribution {
    if packages.is_empty() {
        return ConfidenceDistribution::default();
    }

    let total = packages.len() as f64;
    let mut high = 0u32;
    let mut medium = 0u32;
    let mut low = 0u32;

    for package in packages {
        if package.package_score >= HIGH_CONFIDENCE_THRESHOLD {
            high += 1;
        } else if package.package_score >= MEDIUM_CONFIDENCE_THRESHOLD {
            medium += 1;
        } else {
            low += 1;
        }
    }

    ConfidenceDistribution { high: high as f64 / total, medium: medium as f64 / total, low: low as f64 / total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PackageComponent;
    use wr_core::{Category, Product};

    fn package(score: f64, compliant: bool) -> TrinityPackage {
        TrinityPackage {
            power_source: Some(PackageComponent { product: Product::placeholder(Category::PowerSource, "PS"), compatibility_score: 0.9 }),
            feeder: None,
            cooler: None,
            accessories: vec![],
            consumables: vec![],
            package_score: score,
            trinity_compliance: compliant,
            compliance_score: if compliant { 1.0 } else { 0.33 },
            total_price: 0.0,
            algorithm_source: "test".into(),
            search_metadata: serde_json::json!({}),
        }
    }

    #[test]
    fn formation_rate_counts_only_compliant_packages() {
        let packages = vec![package(0.9, true), package(0.5, false)];
        assert_eq!(trinity_formation_rate(&packages), 0.5);
    }

    #[test]
    fn distribution_buckets_sum_to_one() {
        let packages = vec![package(0.9, true), package(0.7, true), package(0.2, true)];
        let dist = confidence_distribution(&packages);
        assert!((dist.high + dist.medium + dist.low - 1.0).abs() < 1e-9);
        assert!(dist.high > 0.0 && dist.medium > 0.0 && dist.low > 0.0);
    }

    #[test]
    fn empty_packages_yield_zeroed_distribution() {
        let dist = confidence_distribution(&[]);
        assert_eq!(dist.high, 0.0);
        assert_eq!(trinity_formation_rate(&[]), 0.0);
    }
}
