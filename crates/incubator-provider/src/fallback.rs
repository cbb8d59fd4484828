//! Deterministic templated content served when the provider cannot be used.
//!
//! Fallback output is a pure function of the concept snapshot, so two
//! fallbacks for the same concept are identical.

use incubator_core::content::ContentBlock;
use incubator_core::models::{ConceptSnapshot, Stage};

use crate::normalize::SubScores;

const UNAVAILABLE_NOTE: &str =
    "Generated from a template because the analysis service was unavailable. Try again later for a tailored version.";

/// Baseline (market, technical, resource) per development stage.
fn stage_baseline(stage: Stage) -> (f64, f64, f64) {
    match stage {
        Stage::Concept => (6.0, 5.5, 6.5),
        Stage::Research => (7.0, 6.0, 7.0),
        Stage::Prototype => (7.5, 4.5, 7.5),
        Stage::Testing => (8.0, 3.5, 8.0),
        Stage::Launch => (8.5, 2.5, 8.5),
    }
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn mentions_automation(text: &str, words: &[String]) -> bool {
    text.contains("artificial intelligence")
        || text.contains("machine learning")
        || words
            .iter()
            .any(|w| w == "ai" || w.starts_with("automat"))
}

fn mentions_software(words: &[String]) -> bool {
    words.iter().any(|w| {
        matches!(
            w.as_str(),
            "mobile" | "app" | "apps" | "platform" | "platforms" | "software"
        )
    })
}

/// Stage baseline adjusted by keywords in the title and description.
///
/// AI or automation concepts gain market potential but need more technology
/// and resources (+1.0 / +2.0 / +1.5). Software, app, mobile or platform
/// concepts get +0.5 / +1.0 / +0.5. Results are clamped to `[0, 10]`.
pub fn scores(snapshot: &ConceptSnapshot) -> SubScores {
    let (mut market, mut technical, mut resource) = stage_baseline(snapshot.stage);
    let text = format!("{} {}", snapshot.title, snapshot.description).to_lowercase();
    let words = words(&text);

    if mentions_automation(&text, &words) {
        market += 1.0;
        technical += 2.0;
        resource += 1.5;
    }
    if mentions_software(&words) {
        market += 0.5;
        technical += 1.0;
        resource += 0.5;
    }
    SubScores::new(market, technical, resource)
}

pub fn pitch(snapshot: &ConceptSnapshot) -> Vec<ContentBlock> {
    vec![
        ContentBlock::header(snapshot.title.trim()),
        ContentBlock::header("Executive Summary"),
        ContentBlock::paragraph(snapshot.description.trim()),
        ContentBlock::header("Current Development Status"),
        ContentBlock::paragraph(format!(
            "The concept is in the {} stage and ready for structured development toward market entry.",
            snapshot.stage
        )),
        ContentBlock::header("Key Value Proposition"),
        ContentBlock::bullets([
            "Addresses an identified customer need with a new approach",
            "Scalable model with a clear growth path",
            "Room to build a defensible market position",
        ]),
        ContentBlock::header("Next Steps"),
        ContentBlock::bullets([
            "Validate the problem with target customers",
            "Build and test a minimum viable product",
            "Identify strategic partners",
        ]),
        ContentBlock::paragraph(UNAVAILABLE_NOTE),
    ]
}

pub fn market_insights(snapshot: &ConceptSnapshot) -> Vec<ContentBlock> {
    vec![
        ContentBlock::header(format!("Market Analysis for {}", snapshot.title.trim())),
        ContentBlock::header("Market Opportunity"),
        ContentBlock::paragraph(
            "The concept targets a recognizable need with room for growth and early adoption.",
        ),
        ContentBlock::header("Target Market"),
        ContentBlock::bullets([
            "Individuals and businesses looking for better solutions in this space",
            "Segments open to new entrants with a differentiated offer",
        ]),
        ContentBlock::header("Competitive Landscape"),
        ContentBlock::bullets([
            "Established players exist but leave gaps for differentiation",
            "A focused value proposition can win early market share",
        ]),
        ContentBlock::header("Strategic Recommendations"),
        ContentBlock::bullets([
            "Prioritize customer validation and product-market fit",
            "Develop clear brand positioning",
            "Explore partnerships for market entry",
        ]),
        ContentBlock::paragraph(UNAVAILABLE_NOTE),
    ]
}

pub fn risk_assessment(snapshot: &ConceptSnapshot) -> Vec<ContentBlock> {
    vec![
        ContentBlock::header(format!("Risk Assessment for {}", snapshot.title.trim())),
        ContentBlock::header("Market Risks (Medium)"),
        ContentBlock::bullets([
            "Customer adoption may be slower than planned",
            "Competitors may respond quickly",
        ]),
        ContentBlock::header("Technical Risks"),
        ContentBlock::bullets([
            format!("Development challenges typical of {} stage projects", snapshot.stage),
            "Feasibility should be confirmed through prototyping".to_string(),
        ]),
        ContentBlock::header("Financial Risks"),
        ContentBlock::bullets([
            "Funding needs depend on the pace of development",
            "Cash flow management is critical before revenue",
        ]),
        ContentBlock::header("Mitigation Strategies"),
        ContentBlock::numbered([
            "Validate the market before major investment",
            "Ship a minimum viable product early",
            "Set clear milestones and success metrics",
        ]),
        ContentBlock::paragraph(UNAVAILABLE_NOTE),
    ]
}

pub fn implementation_roadmap(snapshot: &ConceptSnapshot) -> Vec<ContentBlock> {
    vec![
        ContentBlock::header(format!(
            "Implementation Roadmap for {}",
            snapshot.title.trim()
        )),
        ContentBlock::header("Phase 1: Foundation (Months 1-3)"),
        ContentBlock::bullets([
            "Market validation and customer discovery",
            "Team assembly and resource planning",
        ]),
        ContentBlock::header("Phase 2: Development (Months 4-6)"),
        ContentBlock::bullets([
            "Minimum viable product development",
            "Early customer feedback and iteration",
        ]),
        ContentBlock::header("Phase 3: Testing (Months 7-9)"),
        ContentBlock::bullets([
            "Beta testing and product refinement",
            "Go-to-market strategy",
        ]),
        ContentBlock::header("Phase 4: Launch (Months 10-12)"),
        ContentBlock::bullets([
            "Market launch and customer acquisition",
            "Performance monitoring and expansion planning",
        ]),
        ContentBlock::paragraph(format!(
            "General framework for {} stage ventures. {UNAVAILABLE_NOTE}",
            snapshot.stage
        )),
    ]
}

pub fn title_suggestions(snapshot: &ConceptSnapshot) -> Vec<ContentBlock> {
    vec![
        ContentBlock::header("Title Optimization"),
        ContentBlock::paragraph(format!(
            "Current title: {}. It is a workable foundation that describes the core idea.",
            snapshot.title.trim()
        )),
        ContentBlock::numbered([
            "A benefit-led variant that names the main value for customers",
            "An outcome-focused variant that describes the result customers get",
            "A market-positioned variant that signals category leadership",
        ]),
        ContentBlock::paragraph(
            "Test the candidates with target customers before committing to one.",
        ),
        ContentBlock::paragraph(UNAVAILABLE_NOTE),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(title: &str, description: &str, stage: Stage) -> ConceptSnapshot {
        ConceptSnapshot {
            id: "f".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            stage,
            refined_pitch: None,
        }
    }

    #[test]
    fn baseline_per_stage() {
        let s = scores(&snapshot("Bakery", "Sourdough for the neighbourhood", Stage::Testing));
        assert_eq!(s, SubScores::new(8.0, 3.5, 8.0));
    }

    #[test]
    fn ai_keywords_raise_all_three() {
        let s = scores(&snapshot("Crop AI", "Predict yields", Stage::Concept));
        assert_eq!(s, SubScores::new(7.0, 7.5, 8.0));
    }

    #[test]
    fn ai_inside_a_word_does_not_count() {
        let s = scores(&snapshot("Fresh bait", "Maintain supply chains", Stage::Concept));
        assert_eq!(s, SubScores::new(6.0, 5.5, 6.5));
    }

    #[test]
    fn both_keyword_groups_stack_and_clamp() {
        let s = scores(&snapshot(
            "Launch platform",
            "Machine learning automation in a mobile app",
            Stage::Launch,
        ));
        assert_eq!(s.market_potential, 10.0);
        assert_eq!(s.technical_complexity, 5.5);
        assert_eq!(s.resource_requirements, 10.0);
    }

    #[test]
    fn templates_are_deterministic_and_non_empty() {
        let snap = snapshot("Bakery", "Sourdough for the neighbourhood", Stage::Concept);
        assert_eq!(pitch(&snap), pitch(&snap));
        for blocks in [
            pitch(&snap),
            market_insights(&snap),
            risk_assessment(&snap),
            implementation_roadmap(&snap),
            title_suggestions(&snap),
        ] {
            assert!(!blocks.is_empty());
            assert!(blocks.iter().all(|b| !b.is_empty()));
            assert!(incubator_core::content::visible_chars(&blocks) >= 50);
        }
    }
}
