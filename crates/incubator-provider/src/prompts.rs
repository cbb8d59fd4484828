//! Prompt text for each request kind.

use incubator_core::models::{ConceptSnapshot, GenerationRequest, RequestKind};

/// Build the request for `kind` from a concept snapshot.
pub fn build(kind: RequestKind, snapshot: &ConceptSnapshot) -> GenerationRequest {
    let prompt = match kind {
        RequestKind::Pitch => pitch(snapshot),
        RequestKind::Feasibility => feasibility(snapshot),
        RequestKind::MarketInsights => market_insights(snapshot),
        RequestKind::RiskAssessment => risk_assessment(snapshot),
        RequestKind::ImplementationRoadmap => implementation_roadmap(snapshot),
        RequestKind::TitleOptimization => title_optimization(snapshot),
    };
    GenerationRequest {
        kind,
        concept_id: snapshot.id.clone(),
        prompt,
    }
}

fn concept_block(snapshot: &ConceptSnapshot) -> String {
    let mut block = format!(
        "Title: {}\nDescription: {}\nDevelopment stage: {}\n",
        snapshot.title.trim(),
        snapshot.description.trim(),
        snapshot.stage
    );
    if let Some(pitch) = snapshot.refined_pitch.as_deref().filter(|p| !p.trim().is_empty()) {
        block.push_str(&format!("Refined pitch: {}\n", pitch.trim()));
    }
    block
}

fn pitch(snapshot: &ConceptSnapshot) -> String {
    format!(
        "You are an experienced startup advisor. Rewrite the business concept below \
         as a concise, investor-ready pitch.\n\n{}\n\
         Structure the pitch with bold section headings for the executive summary, \
         the problem, the solution, the target market and next steps. Use bullet \
         points for lists. Keep it under 400 words.",
        concept_block(snapshot)
    )
}

fn feasibility(snapshot: &ConceptSnapshot) -> String {
    format!(
        "You are a startup feasibility analyst. Score the business concept below.\n\n{}\n\
         Use a 0-10 scale with one decimal place:\n\
         - market_potential: 0 = no market, 10 = massive opportunity\n\
         - technical_complexity: 0 = trivial to build, 10 = extremely complex\n\
         - resource_requirements: 0 = minimal resources, 10 = massive investment\n\n\
         Respond ONLY with a JSON object containing the numeric fields \
         \"market_potential\", \"technical_complexity\" and \"resource_requirements\".",
        concept_block(snapshot)
    )
}

fn market_insights(snapshot: &ConceptSnapshot) -> String {
    format!(
        "You are a market research analyst. Analyse the market for the concept below.\n\n{}\n\
         Cover market size and growth, target customer segments, the competitive \
         landscape, key trends, and strategic recommendations. Use bold section \
         headings and bullet points.",
        concept_block(snapshot)
    )
}

fn risk_assessment(snapshot: &ConceptSnapshot) -> String {
    format!(
        "You are a risk management consultant. Assess the risks of the concept below.\n\n{}\n\
         Cover market, technical, financial, operational and regulatory risks, each \
         with a severity level, followed by concrete mitigation strategies. Use bold \
         section headings and bullet points.",
        concept_block(snapshot)
    )
}

fn implementation_roadmap(snapshot: &ConceptSnapshot) -> String {
    format!(
        "You are a strategic planning consultant. Write a 12-month implementation \
         roadmap for the concept below.\n\n{}\n\
         Organise it into four quarterly phases with bold headings, list the key \
         activities of each phase as bullet points, and finish with success factors \
         and key performance indicators.",
        concept_block(snapshot)
    )
}

fn title_optimization(snapshot: &ConceptSnapshot) -> String {
    format!(
        "You are a branding strategist. Suggest better titles for the concept below.\n\n{}\n\
         Give three numbered alternative titles, each with a one-sentence rationale, \
         then recommend one of them.",
        concept_block(snapshot)
    )
}
