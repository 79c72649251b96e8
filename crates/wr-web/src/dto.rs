//! Wire types for the HTTP surface (§6). These translate between the
//! pipeline's internal types and the request/response shapes external
//! callers depend on; the internal types themselves are never renamed
//! just to look more REST-ish.

use serde::{Deserialize, Serialize};
use wr_compose::ComposedResponse;
use wr_intent::UserContext;
use wr_recommend::{ConfidenceDistribution, GraphAlgorithm, PackageComponent, ScoredRecommendations, TrinityPackage};

#[derive(Debug, Deserialize)]
pub struct SparkyMessageRequest {
    pub message: String,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SparkyMessageResponse {
    pub response: String,
    pub requirements: Vec<String>,
    pub packages: Vec<String>,
    pub confidence: f64,
    pub conversation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_by_step_builder: Option<StepByStepBuilder>,
}

/// Attached only when the composer couldn't form a confident package and
/// asks the caller a clarifying question instead (§4.7 guided flow).
#[derive(Debug, Serialize)]
pub struct StepByStepBuilder {
    pub questions: Vec<String>,
    pub next_steps: Vec<String>,
}

impl SparkyMessageResponse {
    pub fn from_composed(composed: ComposedResponse, conversation_id: String) -> Self {
        let step_by_step_builder = composed.needs_follow_up.then(|| StepByStepBuilder {
            questions: composed.follow_up_questions.clone(),
            next_steps: composed.next_steps.clone(),
        });

        let mut response = composed.summary;
        if !composed.detailed_explanation.is_empty() {
            response.push_str("\n\n");
            response.push_str(&composed.detailed_explanation);
        }

        SparkyMessageResponse {
            response,
            requirements: composed.technical_notes,
            packages: composed.package_descriptions,
            confidence: composed.overall_confidence,
            conversation_id,
            step_by_step_builder,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EnterpriseRecommendationRequest {
    pub query: String,
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_context: EnterpriseUserContext,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default)]
    pub include_explanations: bool,
}

fn default_max_results() -> usize {
    10
}

#[derive(Debug, Default, Deserialize)]
pub struct EnterpriseUserContext {
    pub user_id: Option<String>,
    pub industry_context: Option<String>,
    pub organization: Option<String>,
    pub role: Option<String>,
    #[serde(default)]
    pub expertise_history: Vec<String>,
    #[serde(default)]
    pub previous_queries: Vec<String>,
}

impl EnterpriseRecommendationRequest {
    pub fn to_user_context(&self) -> UserContext {
        UserContext {
            user_id: self.user_context.user_id.clone(),
            session_id: self.session_id.clone(),
            preferred_language: None,
            expertise_history: self.user_context.expertise_history.clone(),
            previous_queries: self.user_context.previous_queries.clone(),
            industry_context: self.user_context.industry_context.clone(),
            organization: self.user_context.organization.clone(),
            role: self.user_context.role.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub gin: String,
    pub name: String,
    pub category: String,
    pub price: Option<f64>,
    pub compatibility_score: f64,
}

impl From<&PackageComponent> for ProductSummary {
    fn from(component: &PackageComponent) -> Self {
        ProductSummary {
            gin: component.product.gin.clone(),
            name: component.product.name.clone(),
            category: component.product.category.as_str().to_string(),
            price: component.product.price,
            compatibility_score: component.compatibility_score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PackageDto {
    pub power_source: Option<ProductSummary>,
    pub feeder: Option<ProductSummary>,
    pub cooler: Option<ProductSummary>,
    pub accessories: Vec<ProductSummary>,
    pub consumables: Vec<ProductSummary>,
    pub package_score: f64,
    pub trinity_compliance: bool,
    pub total_price: f64,
    pub algorithm_source: String,
}

impl From<&TrinityPackage> for PackageDto {
    fn from(package: &TrinityPackage) -> Self {
        PackageDto {
            power_source: package.power_source.as_ref().map(ProductSummary::from),
            feeder: package.feeder.as_ref().map(ProductSummary::from),
            cooler: package.cooler.as_ref().map(ProductSummary::from),
            accessories: package.accessories.iter().map(ProductSummary::from).collect(),
            consumables: package.consumables.iter().map(ProductSummary::from).collect(),
            package_score: package.package_score,
            trinity_compliance: package.trinity_compliance,
            total_price: package.total_price,
            algorithm_source: package.algorithm_source.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EnterpriseRecommendationResponse {
    pub session_id: String,
    pub packages: Vec<PackageDto>,
    pub total_packages_found: usize,
    pub algorithms_used: Vec<GraphAlgorithm>,
    pub confidence_distribution: ConfidenceDistribution,
    pub trinity_formation_rate: f64,
    pub overall_confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl EnterpriseRecommendationResponse {
    /// `explanation` is the composer's overall summary, attached once per
    /// response rather than per package — the composer reranks its own
    /// clone of the package list before describing it, so per-package
    /// descriptions don't line up with `recommendations.packages`' order.
    pub fn from_recommendations(
        recommendations: ScoredRecommendations,
        session_id: String,
        explanation: Option<String>,
        max_results: usize,
    ) -> Self {
        let overall_confidence = recommendations.packages.first().map(|p| p.package_score).unwrap_or(0.0);

        let packages = recommendations.packages.iter().take(max_results).map(PackageDto::from).collect();

        EnterpriseRecommendationResponse {
            session_id,
            packages,
            total_packages_found: recommendations.total_packages_found,
            algorithms_used: recommendations.algorithms_used,
            confidence_distribution: recommendations.confidence_distribution,
            trinity_formation_rate: recommendations.trinity_formation_rate,
            overall_confidence,
            explanation,
        }
    }
}

impl SparkyMessageRequest {
    pub fn to_user_context(&self) -> UserContext {
        UserContext {
            user_id: self.user_id.clone(),
            session_id: self.session_id.clone(),
            preferred_language: self.language.clone(),
            ..Default::default()
        }
    }
}
