//! Static fixture rows served in demonstration mode.
//!
//! SYSTEM CONTEXT
//! ==============
//! When backend credentials are missing, and when a live query fails, the
//! provider fills its collections from this set instead. Timestamps are
//! anchored once per process (first access) so repeated loads compare equal.

use std::sync::LazyLock;

use serde_json::json;
use time::{Duration, OffsetDateTime};

use crate::models::{AnalysisStatus, EnrichmentStatus, EntityType, HorizontalData, UserProfile, VerticalAnalysis};

/// User id that owns every fixture row and the synthetic demonstration user.
pub const DEMO_USER_ID: &str = "user_mock_123456789";

/// Email shown for the synthetic demonstration user.
pub const DEMO_USER_EMAIL: &str = "demo@lumi.ai";

/// Display name of the synthetic demonstration user.
pub const DEMO_USER_NAME: &str = "Demo User";

struct Fixtures {
    profile: UserProfile,
    horizontal: Vec<HorizontalData>,
    vertical: Vec<VerticalAnalysis>,
}

static FIXTURES: LazyLock<Fixtures> = LazyLock::new(|| {
    let now = OffsetDateTime::now_utc();
    Fixtures { profile: build_profile(now), horizontal: build_horizontal(now), vertical: build_vertical(now) }
});

// =============================================================================
// ACCESSORS
// =============================================================================

/// Profile row for the synthetic demonstration user.
#[must_use]
pub fn demo_profile() -> UserProfile {
    FIXTURES.profile.clone()
}

/// The full horizontal fixture list, in fixture order.
#[must_use]
pub fn horizontal_data() -> Vec<HorizontalData> {
    FIXTURES.horizontal.clone()
}

/// The full vertical fixture list, in fixture order.
#[must_use]
pub fn vertical_analysis() -> Vec<VerticalAnalysis> {
    FIXTURES.vertical.clone()
}

#[cfg(test)]
#[must_use]
pub fn horizontal_by_id(id: &str) -> Option<HorizontalData> {
    FIXTURES.horizontal.iter().find(|h| h.id == id).cloned()
}

#[cfg(test)]
#[must_use]
pub fn vertical_by_id(id: &str) -> Option<VerticalAnalysis> {
    FIXTURES.vertical.iter().find(|v| v.id == id).cloned()
}

/// Analyses whose `horizontal_data_id` points at `horizontal_id`.
#[must_use]
pub fn related_analyses(horizontal_id: &str) -> Vec<VerticalAnalysis> {
    FIXTURES
        .vertical
        .iter()
        .filter(|v| v.horizontal_data_id == horizontal_id)
        .cloned()
        .collect()
}

/// The horizontal record an analysis was derived from.
#[cfg(test)]
#[must_use]
pub fn parent_horizontal(vertical_id: &str) -> Option<HorizontalData> {
    let analysis = FIXTURES.vertical.iter().find(|v| v.id == vertical_id)?;
    horizontal_by_id(&analysis.horizontal_data_id)
}

// =============================================================================
// PROFILE
// =============================================================================

fn build_profile(now: OffsetDateTime) -> UserProfile {
    UserProfile {
        id: DEMO_USER_ID.to_owned(),
        email: DEMO_USER_EMAIL.to_owned(),
        full_name: Some(DEMO_USER_NAME.to_owned()),
        avatar_url: None,
        created_at: now - Duration::days(30),
        updated_at: now,
        last_login: Some(now),
        preferences: None,
    }
}

// =============================================================================
// HORIZONTAL FIXTURES
// =============================================================================

#[allow(clippy::too_many_lines)]
fn build_horizontal(now: OffsetDateTime) -> Vec<HorizontalData> {
    let row = |id: &str,
               entity_type: EntityType,
               name: &str,
               description: &str,
               source: &str,
               created_days_ago: i64,
               updated_days_ago: i64,
               metadata: serde_json::Value,
               enriched_data: serde_json::Value| HorizontalData {
        id: id.into(),
        user_id: DEMO_USER_ID.into(),
        entity_type,
        name: name.into(),
        description: Some(description.into()),
        enriched_data,
        source: Some(source.into()),
        status: EnrichmentStatus::Enriched,
        metadata: Some(metadata),
        created_at: now - Duration::days(created_days_ago),
        updated_at: now - Duration::days(updated_days_ago),
    };

    vec![
        row(
            "horiz_comp_1",
            EntityType::Company,
            "TechNova Solutions",
            "Leading AI and machine learning solutions provider",
            "manual",
            7,
            0,
            json!({
                "logo_url": "https://placehold.co/400x400/2563eb/ffffff?text=TN",
                "website": "https://technova-solutions.example.com",
                "industry": "Technology",
                "size": "500-1000 employees"
            }),
            json!({
                "company_details": {
                    "founded": 2015,
                    "headquarters": "San Francisco, CA",
                    "funding": "$75M Series C",
                    "revenue_range": "$50M - $100M",
                    "growth_rate": "27% YoY",
                    "ceo": "Sarah Johnson",
                    "public": false
                },
                "industry_analysis": {
                    "market_position": "Leader in enterprise AI solutions",
                    "market_share": "12%",
                    "competitors": [
                        { "name": "AI Dynamics", "market_share": "15%" },
                        { "name": "Cognitive Systems", "market_share": "10%" },
                        { "name": "DataMind", "market_share": "8%" }
                    ]
                },
                "products_services": [
                    { "name": "NovaBrain", "description": "Enterprise AI platform" },
                    { "name": "NovaInsight", "description": "Predictive analytics suite" }
                ],
                "social_presence": {
                    "linkedin": "technova-solutions",
                    "twitter": "@TechNovaAI",
                    "followers": 45000,
                    "engagement_rate": "3.2%"
                }
            }),
        ),
        row(
            "horiz_comp_2",
            EntityType::Company,
            "GreenEarth Renewables",
            "Sustainable energy solutions and carbon capture technology",
            "exa.ai",
            14,
            2,
            json!({
                "logo_url": "https://placehold.co/400x400/10b981/ffffff?text=GE",
                "website": "https://greenearth-renewables.example.com",
                "industry": "Clean Energy",
                "size": "1000-5000 employees"
            }),
            json!({
                "company_details": {
                    "founded": 2010,
                    "headquarters": "Austin, TX",
                    "funding": "$120M Series D",
                    "revenue_range": "$100M - $250M",
                    "growth_rate": "32% YoY",
                    "ceo": "Michael Chen",
                    "public": true,
                    "stock_symbol": "GREN"
                },
                "industry_analysis": {
                    "market_position": "Pioneer in carbon capture technology",
                    "market_share": "18%"
                },
                "products_services": [
                    { "name": "CarbonLock", "description": "Industrial carbon capture system" },
                    { "name": "SolarGrid+", "description": "Advanced solar energy management" }
                ],
                "social_presence": {
                    "linkedin": "greenearth-renewables",
                    "twitter": "@GreenEarthRenew",
                    "followers": 78000,
                    "engagement_rate": "4.1%"
                }
            }),
        ),
        row(
            "horiz_contact_1",
            EntityType::Contact,
            "Dr. Alex Rivera",
            "Chief AI Officer at TechNova Solutions",
            "linkedin",
            5,
            0,
            json!({
                "avatar_url": "https://placehold.co/400x400/6366f1/ffffff?text=AR",
                "email": "alex.rivera@technova-solutions.example.com",
                "location": "San Francisco, CA"
            }),
            json!({
                "professional_details": {
                    "current_role": "Chief AI Officer",
                    "company": "TechNova Solutions",
                    "skills": ["Machine Learning", "Computer Vision", "NLP", "AI Ethics"]
                },
                "social_profiles": {
                    "linkedin": "dr-alex-rivera",
                    "github": "arivera-ai",
                    "followers": 28000
                },
                "influence_score": 87,
                "expertise_areas": ["Explainable AI", "AI Ethics", "Enterprise AI Solutions"]
            }),
        ),
        row(
            "horiz_contact_2",
            EntityType::Contact,
            "Emma Chen",
            "VP of Sustainability at GreenEarth Renewables",
            "manual",
            10,
            1,
            json!({
                "avatar_url": "https://placehold.co/400x400/a855f7/ffffff?text=EC",
                "email": "emma.chen@greenearth-renewables.example.com",
                "location": "Austin, TX"
            }),
            json!({
                "professional_details": {
                    "current_role": "VP of Sustainability",
                    "company": "GreenEarth Renewables",
                    "skills": ["Sustainability Strategy", "Carbon Accounting", "Environmental Policy"]
                },
                "social_profiles": {
                    "linkedin": "emma-chen-sustainability",
                    "followers": 15000
                },
                "influence_score": 82,
                "expertise_areas": ["Carbon Capture", "Corporate Sustainability", "Environmental Policy"]
            }),
        ),
        row(
            "horiz_comp_3",
            EntityType::Company,
            "HealthSync",
            "AI-powered healthcare diagnostics and patient management",
            "exa.ai",
            3,
            0,
            json!({
                "logo_url": "https://placehold.co/400x400/ec4899/ffffff?text=HS",
                "website": "https://healthsync.example.com",
                "industry": "Healthcare Technology",
                "size": "100-500 employees"
            }),
            json!({
                "company_details": {
                    "founded": 2019,
                    "headquarters": "Boston, MA",
                    "funding": "$45M Series B",
                    "revenue_range": "$10M - $50M",
                    "growth_rate": "65% YoY",
                    "ceo": "Dr. Lisa Patel",
                    "public": false
                },
                "industry_analysis": {
                    "market_position": "Emerging leader in AI diagnostics",
                    "market_share": "8%"
                },
                "products_services": [
                    { "name": "SyncDiagnose", "description": "AI diagnostic assistant for clinicians" },
                    { "name": "PatientSync", "description": "Remote patient monitoring platform" }
                ],
                "social_presence": {
                    "linkedin": "healthsync",
                    "twitter": "@HealthSyncAI",
                    "followers": 22000,
                    "engagement_rate": "3.8%"
                }
            }),
        ),
    ]
}

// =============================================================================
// VERTICAL FIXTURES
// =============================================================================

#[allow(clippy::too_many_lines)]
fn build_vertical(now: OffsetDateTime) -> Vec<VerticalAnalysis> {
    let row = |id: &str,
               horizontal_data_id: &str,
               analysis_type: &str,
               created_days_ago: i64,
               updated_days_ago: i64,
               agent_config: serde_json::Value,
               metadata: serde_json::Value,
               analysis_results: serde_json::Value| VerticalAnalysis {
        id: id.into(),
        user_id: DEMO_USER_ID.into(),
        horizontal_data_id: horizontal_data_id.into(),
        analysis_type: analysis_type.into(),
        analysis_results,
        agent_config: Some(agent_config),
        status: AnalysisStatus::Completed,
        metadata: Some(metadata),
        created_at: now - Duration::days(created_days_ago),
        updated_at: now - Duration::days(updated_days_ago),
    };

    vec![
        row(
            "vert_analysis_1",
            "horiz_comp_1",
            "Market Opportunity Analysis",
            2,
            0,
            json!({
                "agents": ["Market Analyst", "Industry Expert", "Financial Advisor"],
                "depth": "comprehensive",
                "focus_areas": ["growth potential", "competitive landscape", "market trends"]
            }),
            json!({ "duration": "3.5 minutes", "token_usage": 12500, "confidence_score": 0.89 }),
            json!({
                "executive_summary": "TechNova Solutions holds a strong position in a fast-growing enterprise AI market.",
                "key_findings": [
                    { "title": "Strong Market Position", "details": "12% share places TechNova among the top three vendors." },
                    { "title": "Competitive Threats", "details": "AI Dynamics raised $100M and is expanding its sales team." }
                ],
                "strategic_recommendations": [
                    "Accelerate healthcare AI development through targeted acquisitions",
                    "Prepare GDPR and AI Act compliance ahead of European entry"
                ]
            }),
        ),
        row(
            "vert_analysis_2",
            "horiz_comp_2",
            "Investment Potential Analysis",
            1,
            0,
            json!({
                "agents": ["Financial Analyst", "CleanTech Expert", "Policy Specialist"],
                "depth": "comprehensive",
                "focus_areas": ["financial performance", "regulatory landscape", "technology differentiation"]
            }),
            json!({ "duration": "4.2 minutes", "token_usage": 14800, "confidence_score": 0.92 }),
            json!({
                "executive_summary": "GreenEarth Renewables pairs leading carbon capture technology with a favourable policy climate.",
                "market_analysis": {
                    "total_addressable_market": "$50B by 2030 for carbon capture technology",
                    "growth_rate": "CAGR of 38% projected through 2030"
                },
                "investment_thesis": {
                    "strengths": ["Technology leadership", "Favourable regulatory environment"],
                    "risks": ["Deployment scaling challenges", "Policy changes across election cycles"]
                }
            }),
        ),
        row(
            "vert_analysis_3",
            "horiz_contact_1",
            "Expert Profile Analysis",
            4,
            4,
            json!({
                "agents": ["Talent Specialist", "AI Domain Expert", "Network Analyst"],
                "depth": "detailed",
                "focus_areas": ["expertise validation", "influence assessment", "collaboration potential"]
            }),
            json!({ "duration": "2.8 minutes", "token_usage": 9800, "confidence_score": 0.94 }),
            json!({
                "executive_summary": "Dr. Alex Rivera is a credible expert in explainable AI and AI ethics.",
                "expertise_assessment": {
                    "core_strengths": ["Explainable AI", "AI ethics frameworks", "Enterprise AI deployment"],
                    "knowledge_depth": "Deep technical expertise with practical implementation experience"
                },
                "additional_insights": [
                    "Publication history shows sustained interest in healthcare AI"
                ]
            }),
        ),
        row(
            "vert_analysis_4",
            "horiz_comp_3",
            "Competitive Landscape Analysis",
            0,
            0,
            json!({
                "agents": ["Industry Analyst", "Healthcare Specialist", "Technology Strategist"],
                "depth": "comprehensive",
                "focus_areas": ["competitive positioning", "technology differentiation", "market dynamics"]
            }),
            json!({ "duration": "3.9 minutes", "token_usage": 13200, "confidence_score": 0.87 }),
            json!({
                "executive_summary": "HealthSync is gaining traction in healthcare AI after its FDA clearance.",
                "market_landscape": {
                    "market_size": "$15.8B global healthcare AI market, growing at 38% CAGR"
                },
                "competitive_positioning": {
                    "healthsync_advantages": ["FDA clearance", "65% YoY growth"],
                    "healthsync_challenges": ["Smaller sales team", "Limited international presence"]
                }
            }),
        ),
    ]
}

#[cfg(test)]
#[path = "fixtures_test.rs"]
mod tests;
