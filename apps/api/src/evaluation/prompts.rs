// All LLM prompt text for the evaluation module.
// Role-specific rules are rendered from `rubric`; everything else is fixed text.

use crate::evaluation::models::Role;
use crate::evaluation::rubric::{rubric_for, Rubric};
use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, JSON_ONLY_TRAILER};

/// Evaluator instruction template. Replace `{role_label}`, `{role}` and `{role_rules}`.
pub const EVALUATOR_TEMPLATE: &str = r#"You are an AI Readiness Evaluator. Analyze CVs for the {role_label} role and {json_only}

## OUTPUT SCHEMA (Required - All fields must be present)
{
  "overallScore": number (0-100),
  "function": "{role}",
  "functionLabel": "string",
  "experienceLevel": "fresher" | "experienced",
  "yearsOfExperience": number,
  "parameters": [
    {
      "name": "string",
      "weight": number (percentage),
      "score": number (0-100),
      "weightedScore": number,
      "positiveIndicators": [string],
      "negativeIndicators": [string],
      "reasoning": "string"
    }
  ],
  "validationNotes": [string],
  "riskPenaltyApplied": boolean,
  "riskPenaltyReason": string | null,
  "summary": "string",
  "recommendations": [string]
}

{role_rules}

## INDICATOR GENERATION RULES (IMPORTANT)
For BOTH positive and negative indicators:
- Always generate 3-5 indicators per parameter (even if score is low/high)
- Negative indicators should highlight specific GAPS or MISSING SKILLS
- Be specific: instead of "No modern tools", say "No Transformers/LangChain/Vector DB experience"
- If candidate has weakness in a parameter, list what's MISSING vs what they have
- Never leave negativeIndicators empty just because score is high
- Never leave positiveIndicators empty if there's ANY relevant experience

## OUTPUT INSTRUCTIONS
1. Extract years of experience (fresher for 0-2 years, experienced for 3+ years)
2. For each parameter, ALWAYS generate both positive and negative indicators
3. Find VALID evidence (Work Experience/Projects only)
4. Calculate parameter scores and weighted scores (weightedScore = score * weight / 100)
5. Compute overall score = sum of weighted scores, minus the risk penalty if applied
6. Provide validation notes, a 2-3 sentence summary and 3-5 recommendations
7. Output ONLY the JSON object, no markdown, no backticks, no explanations."#;

pub const CV_START: &str = "---CV START---";
pub const CV_END: &str = "---CV END---";

/// Renders the role-specific instruction block.
pub fn build_system_prompt(role: Role) -> String {
    let rubric = rubric_for(role);
    EVALUATOR_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{role_label}", rubric.label)
        .replace("{role_rules}", &render_role_rules(rubric))
        .replace("{role}", role.as_str())
}

/// Full prompt sent to the model: instructions, then the delimited CV text.
pub fn build_evaluation_prompt(role: Role, cv_text: &str) -> String {
    format!(
        "{}\n\n{CV_START}\n{}\n{CV_END}\n\n{JSON_ONLY_TRAILER}",
        build_system_prompt(role),
        cv_text
    )
}

fn render_role_rules(rubric: &Rubric) -> String {
    let mut out = format!("## {}\n", rubric.heading);

    for (i, p) in rubric.parameters.iter().enumerate() {
        out.push_str(&format!(
            "\n**Parameter {}: {} ({}% weight)**\n",
            i + 1,
            p.name,
            p.weight
        ));
        out.push_str(&format!("- Positive: {}\n", p.positive_signals.join(", ")));
        out.push_str("- Negative Indicators to ALWAYS capture (if absent):\n");
        for gap in p.gap_checks {
            out.push_str(&format!("  * {gap}\n"));
        }
        out.push_str(&format!("- {}\n", p.evidence_rule));
    }

    out.push_str("\n**Experience-Based Rules:**\n");
    out.push_str(&format!("- Fresher (0-2 years): {}\n", rubric.fresher_rule));
    out.push_str(&format!("- Experienced (3+ years): {}\n", rubric.experienced_rule));
    out.push_str(&format!("\n**Risk Penalty:** {}", rubric.risk_penalty_rule));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_evaluation_prompt(Role::DataScience, "Jane Doe, ML engineer");
        let b = build_evaluation_prompt(Role::DataScience, "Jane Doe, ML engineer");
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_placeholders_left() {
        for role in Role::ALL {
            let prompt = build_system_prompt(role);
            for placeholder in ["{role}", "{role_label}", "{role_rules}", "{json_only}"] {
                assert!(!prompt.contains(placeholder), "{placeholder} left in {role}");
            }
        }
    }

    #[test]
    fn test_function_pinned_to_role() {
        let prompt = build_system_prompt(Role::DigitalMarketing);
        assert!(prompt.contains("\"function\": \"digital_marketing\""));
        assert!(prompt.contains("for the Digital Marketing role"));
    }

    #[test]
    fn test_data_science_rules_rendered() {
        let prompt = build_system_prompt(Role::DataScience);
        assert!(prompt.contains("## DATA SCIENCE EVALUATION RULES"));
        assert!(prompt.contains("**Parameter 1: Modern Tool Stack (40% weight)**"));
        assert!(prompt.contains("**Parameter 2: Deployment & Application (60% weight)**"));
        assert!(prompt.contains("  * Outdated tools: SAS, SPSS, R without modern frameworks"));
        assert!(prompt.contains("deduct 20 points"));
        assert!(!prompt.contains("DIGITAL MARKETING"));
    }

    #[test]
    fn test_marketing_rules_rendered() {
        let prompt = build_system_prompt(Role::DigitalMarketing);
        assert!(prompt.contains("**Parameter 1: AI-Augmented Workflow (50% weight)**"));
        assert!(prompt.contains("**Parameter 2: Outcome Density/ROI (50% weight)**"));
        assert!(prompt.contains("- Fresher (0-2 years): Score campaign management"));
    }

    #[test]
    fn test_cv_is_delimited_and_trailer_last() {
        let prompt = build_evaluation_prompt(Role::DataScience, "CV BODY");
        assert!(prompt.contains("---CV START---\nCV BODY\n---CV END---"));
        assert!(prompt.ends_with("Respond with valid JSON only, no markdown."));
    }

    #[test]
    fn test_cv_text_with_braces_is_not_substituted() {
        let prompt = build_evaluation_prompt(Role::DataScience, "skills: {role} {role_rules}");
        assert!(prompt.contains("skills: {role} {role_rules}"));
    }
}
