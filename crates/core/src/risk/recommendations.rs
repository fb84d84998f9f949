//! Fixed advisory templates keyed by risk level and component thresholds.

use super::risk_model::{Priority, Recommendation, RecommendationType, RiskComponents, RiskLevel};

const MARKET_THRESHOLD: f64 = 70.0;
const LIQUIDITY_THRESHOLD: f64 = 60.0;
const CREDIT_THRESHOLD: f64 = 65.0;
const SYSTEMIC_THRESHOLD: f64 = 70.0;

fn template(
    recommendation_type: RecommendationType,
    priority: Priority,
    action: &str,
    detail: &str,
) -> Recommendation {
    Recommendation {
        recommendation_type,
        priority,
        action: action.to_string(),
        detail: detail.to_string(),
    }
}

/// The single overall advisory for a level.
pub fn overall_recommendation(level: RiskLevel) -> Recommendation {
    use RecommendationType::Overall;
    match level {
        RiskLevel::Minimal => template(
            Overall,
            Priority::Low,
            "Maintain current allocation",
            "Risk is minimal. Keep the regular rebalancing schedule and review quarterly.",
        ),
        RiskLevel::Low => template(
            Overall,
            Priority::Low,
            "Continue monitoring",
            "Risk is low. Watch for changes in volatility and keep position sizes in check.",
        ),
        RiskLevel::Moderate => template(
            Overall,
            Priority::Medium,
            "Review position sizing",
            "Risk is moderate. Trim positions that have grown beyond target weights.",
        ),
        RiskLevel::Elevated => template(
            Overall,
            Priority::High,
            "Reduce exposure to volatile positions",
            "Risk is elevated. Rotate part of the most volatile holdings into defensive assets.",
        ),
        RiskLevel::High => template(
            Overall,
            Priority::High,
            "Hedge downside risk",
            "Risk is high. Add hedges or raise cash to cushion a market decline.",
        ),
        RiskLevel::Extreme => template(
            Overall,
            Priority::Critical,
            "Reduce risk immediately",
            "Risk is extreme. Cut leveraged and speculative positions and raise cash now.",
        ),
    }
}

/// Overall advisory first, then component advisories in a fixed order.
pub fn build_recommendations(level: RiskLevel, components: &RiskComponents) -> Vec<Recommendation> {
    let mut recommendations = vec![overall_recommendation(level)];

    if components.market > MARKET_THRESHOLD {
        recommendations.push(template(
            RecommendationType::MarketRisk,
            Priority::High,
            "Hedge market exposure",
            "Market risk is high. Consider protective puts or lowering high-beta positions.",
        ));
    }

    if components.liquidity > LIQUIDITY_THRESHOLD {
        recommendations.push(template(
            RecommendationType::LiquidityRisk,
            Priority::Medium,
            "Improve portfolio liquidity",
            "Positions are large relative to traded volume. Favor liquid instruments and stagger exits.",
        ));
    }

    if components.credit > CREDIT_THRESHOLD {
        recommendations.push(template(
            RecommendationType::CreditRisk,
            Priority::Medium,
            "Upgrade credit quality",
            "Credit risk is elevated. Shift high-yield and speculative exposure toward investment grade.",
        ));
    }

    if components.systemic > SYSTEMIC_THRESHOLD {
        recommendations.push(template(
            RecommendationType::SystemicRisk,
            Priority::High,
            "Diversify across uncorrelated assets",
            "Holdings move together. Add assets with low correlation to the rest of the portfolio.",
        ));
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(market: f64, credit: f64, liquidity: f64, systemic: f64) -> RiskComponents {
        RiskComponents {
            market,
            credit,
            liquidity,
            sentiment: 50.0,
            systemic,
        }
    }

    #[test]
    fn test_only_overall_below_thresholds() {
        let recs = build_recommendations(RiskLevel::Low, &components(70.0, 65.0, 60.0, 70.0));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].recommendation_type, RecommendationType::Overall);
    }

    #[test]
    fn test_all_conditionals_in_order() {
        let recs = build_recommendations(RiskLevel::High, &components(71.0, 66.0, 61.0, 71.0));
        let types: Vec<_> = recs.iter().map(|r| r.recommendation_type).collect();
        assert_eq!(
            types,
            vec![
                RecommendationType::Overall,
                RecommendationType::MarketRisk,
                RecommendationType::LiquidityRisk,
                RecommendationType::CreditRisk,
                RecommendationType::SystemicRisk,
            ]
        );
    }

    #[test]
    fn test_every_level_has_an_overall_template() {
        for level in RiskLevel::ALL {
            let rec = overall_recommendation(level);
            assert!(!rec.action.is_empty());
        }
        assert_eq!(overall_recommendation(RiskLevel::Extreme).priority, Priority::Critical);
    }
}
