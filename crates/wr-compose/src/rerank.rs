//! Business context re-ranking (§4.7 step 1).

use wr_intent::UserContext;
use wr_recommend::TrinityPackage;

const ESAB_SHARE_WEIGHT: f64 = 0.3;
const TIER_FIT_BONUS: f64 = 0.2;
const TRINITY_COMPLIANCE_BONUS: f64 = 0.2;
const BASE_BUSINESS_SCORE: f64 = 0.5;

const ORIGINAL_SCORE_WEIGHT: f64 = 0.7;
const BUSINESS_SCORE_WEIGHT: f64 = 0.3;

/// Re-weights each package's score with a business-context factor and
/// re-sorts descending. Mutates in place, matching the teacher's
/// in-place re-ranking passes elsewhere in the pipeline.
pub fn rerank(packages: &mut [TrinityPackage], context: &UserContext) {
    for package in packages.iter_mut() {
        let business_score = business_score(package, context);
        package.package_score = (package.package_score * ORIGINAL_SCORE_WEIGHT) + (business_score * BUSINESS_SCORE_WEIGHT);
    }
    packages.sort_by(|a, b| b.package_score.partial_cmp(&a.package_score).unwrap_or(std::cmp::Ordering::Equal));
}

fn business_score(package: &TrinityPackage, context: &UserContext) -> f64 {
    let mut score = BASE_BUSINESS_SCORE;

    score += esab_share(package) * ESAB_SHARE_WEIGHT;

    if fits_tier(package, context) {
        score += TIER_FIT_BONUS;
    }

    if package.trinity_compliance {
        score += TRINITY_COMPLIANCE_BONUS;
    }

    score.min(1.0)
}

/// Fraction of the three Trinity members whose name mentions ESAB.
fn esab_share(package: &TrinityPackage) -> f64 {
    let components = [&package.power_source, &package.feeder, &package.cooler];
    let esab_count = components
        .into_iter()
        .flatten()
        .filter(|c| c.product.name.to_uppercase().contains("ESAB"))
        .count();
    esab_count as f64 / 3.0
}

fn fits_tier(package: &TrinityPackage, context: &UserContext) -> bool {
    let is_large_org = context
        .organization
        .as_deref()
        .map(|org| {
            let lower = org.to_lowercase();
            lower.contains("enterprise") || lower.contains("corporation")
        })
        .unwrap_or(false);

    if is_large_org {
        package.total_price > 5000.0
    } else {
        (1000.0..=5000.0).contains(&package.total_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wr_recommend::PackageComponent;
    use wr_core::{Category, Product};

    fn package(name: &str, price: f64, compliant: bool) -> TrinityPackage {
        let mut product = Product::placeholder(Category::PowerSource, name);
        product.price = Some(price);
        TrinityPackage {
            power_source: Some(PackageComponent { product, compatibility_score: 0.9 }),
            feeder: None,
            cooler: None,
            accessories: vec![],
            consumables: vec![],
            package_score: 0.5,
            trinity_compliance: compliant,
            compliance_score: if compliant { 1.0 } else { 0.33 },
            total_price: price,
            algorithm_source: "test".into(),
            search_metadata: serde_json::json!({}),
        }
    }

    #[test]
    fn esab_name_and_trinity_compliance_raise_score() {
        let mut packages = vec![package("ESAB Renegade 300", 2000.0, true), package("Generic PS", 2000.0, false)];
        let context = UserContext::default();
        rerank(&mut packages, &context);
        assert!(packages[0].package_score > packages[1].package_score);
        assert_eq!(packages[0].power_source.as_ref().unwrap().product.name, "ESAB Renegade 300");
    }

    #[test]
    fn enterprise_org_prefers_higher_price_tier() {
        let mut context = UserContext::default();
        context.organization = Some("Acme Corporation".to_string());
        let mut packages = vec![package("PS Low", 2000.0, true), package("PS High", 8000.0, true)];
        rerank(&mut packages, &context);
        assert_eq!(packages[0].power_source.as_ref().unwrap().product.name, "PS High");
    }
}
