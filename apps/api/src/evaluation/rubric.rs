//! Evaluation rubric: the weighted parameters and rules each role is scored on.
//!
//! This is the single source of truth for weights: the prompt is rendered from it,
//! the score audit checks model output against it, and `GET /api/rubric` serves it.

use serde::Serialize;

use crate::evaluation::models::Role;

/// Points deducted when most of the CV describes automatable or manual work.
pub const RISK_PENALTY_POINTS: f64 = 20.0;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricParameter {
    pub name: &'static str,
    pub weight: u32,
    pub summary: &'static str,
    pub positive_signals: &'static [&'static str],
    /// Gaps the model must always report as negative indicators when absent.
    pub gap_checks: &'static [&'static str],
    pub evidence_rule: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rubric {
    pub role: Role,
    pub label: &'static str,
    pub heading: &'static str,
    pub parameters: &'static [RubricParameter],
    pub fresher_rule: &'static str,
    pub experienced_rule: &'static str,
    pub risk_penalty_rule: &'static str,
}

impl Rubric {
    pub fn parameter(&self, name: &str) -> Option<&RubricParameter> {
        self.parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn total_weight(&self) -> u32 {
        self.parameters.iter().map(|p| p.weight).sum()
    }
}

pub fn rubric_for(role: Role) -> &'static Rubric {
    match role {
        Role::DataScience => &DATA_SCIENCE,
        Role::DigitalMarketing => &DIGITAL_MARKETING,
    }
}

static DATA_SCIENCE: Rubric = Rubric {
    role: Role::DataScience,
    label: "Data Science",
    heading: "DATA SCIENCE EVALUATION RULES",
    parameters: &[
        RubricParameter {
            name: "Modern Tool Stack",
            weight: 40,
            summary: "Transformers, LangChain, Vector DBs, MLOps vs Legacy tools",
            positive_signals: &[
                "Transformers",
                "Hugging Face",
                "LangChain",
                "Vertex AI",
                "MLOps",
                "Vector DBs",
                "OpenAI API",
                "Claude API",
                "RAG",
                "fine-tuning",
                "PyTorch",
                "TensorFlow",
            ],
            gap_checks: &[
                "No mention of modern ML frameworks (Transformers, PyTorch, TensorFlow, Scikit-learn)",
                "Reliance on Excel-based models or business intelligence tools",
                "No evidence of LLM/GenAI experience (ChatGPT, Claude, Gemini APIs)",
                "Missing vector database or semantic search experience",
                "No ML operations or model deployment experience",
                "Outdated tools: SAS, SPSS, R without modern frameworks",
            ],
            evidence_rule: "Score based on evidence in Work Experience or Projects ONLY (Skills lists get 80% discount)",
        },
        RubricParameter {
            name: "Deployment & Application",
            weight: 60,
            summary: "Production APIs, business impact vs isolated modeling",
            positive_signals: &[
                "Deployed API",
                "Streamlit/Gradio/FastAPI apps",
                "CI/CD pipelines",
                "Production ML",
                "user-facing impact",
                "revenue metrics",
                "A/B testing",
            ],
            gap_checks: &[
                "No deployed models or applications mentioned",
                "Only training/analysis with no real-world application",
                "No evidence of production environment experience",
                "Missing quantified business impact (revenue, cost savings, user metrics)",
                "No CI/CD or DevOps practices mentioned",
                "Purely academic/theoretical projects without deployment",
                "No evidence of handling production data at scale",
            ],
            evidence_rule: "Score based on evidence in Work Experience or Projects ONLY",
        },
    ],
    fresher_rule: "Score personal projects and hackathons. Ignore lack of enterprise impact. Look for learning velocity.",
    experienced_rule: "Penalize high \"legacy skill\" density without recent AI adoption. Expect production experience.",
    risk_penalty_rule: "If >50% of CV bullets describe fully automatable tasks (data cleaning, reporting, dashboards), deduct 20 points.",
};

static DIGITAL_MARKETING: Rubric = Rubric {
    role: Role::DigitalMarketing,
    label: "Digital Marketing",
    heading: "DIGITAL MARKETING EVALUATION RULES",
    parameters: &[
        RubricParameter {
            name: "AI-Augmented Workflow",
            weight: 50,
            summary: "Programmatic SEO, automation, GenAI vs manual processes",
            positive_signals: &[
                "Programmatic SEO",
                "Automation (Zapier/Make)",
                "GenAI for content",
                "Dynamic Creative",
                "AI copywriting",
                "Predictive analytics",
            ],
            gap_checks: &[
                "Manual campaign management with no automation tools",
                "No use of AI/ML for content creation or optimization",
                "Missing programmatic advertising or dynamic creative optimization",
                "No automation platforms (Zapier, Make, HubSpot automation)",
                "Purely manual keyword bidding without smart bidding strategies",
                "No GenAI tools (ChatGPT, Claude, etc.) for content or strategy",
                "No mention of predictive analytics or audience modeling",
            ],
            evidence_rule: "Score based on evidence in Work Experience or Projects ONLY",
        },
        RubricParameter {
            name: "Outcome Density/ROI",
            weight: 50,
            summary: "CAC, LTV, ROAS, revenue attribution vs vanity metrics",
            positive_signals: &[
                "CAC",
                "LTV",
                "ROAS",
                "Revenue Attribution",
                "Conversion Rate",
                "CPA",
                "CLTV",
                "Growth %",
                "specific quantified metrics",
            ],
            gap_checks: &[
                "Vanity metrics only (Reach, Impressions, Likes, Followers)",
                "No revenue or business impact mentioned",
                "Missing conversion rate optimization focus",
                "No customer acquisition cost (CAC) or lifetime value (LTV) tracking",
                "Vague descriptions without specific KPIs or results",
                "No A/B testing or experimentation mentioned",
                "No measurable ROI or cost-per-acquisition data",
            ],
            evidence_rule: "Score based on evidence in Work Experience or Projects ONLY",
        },
    ],
    fresher_rule: "Score campaign management, social media growth, and personal brand work. Ignore lack of enterprise impact.",
    experienced_rule: "Penalize missing AI adoption, metrics-driven approach, and quantified business results in recent roles.",
    risk_penalty_rule: "If >50% of CV bullets describe purely manual tasks (manual posting, manual bidding, manual reporting), deduct 20 points.",
};
