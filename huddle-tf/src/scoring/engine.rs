//! Compatibility scoring engine
//!
//! Pure function from (candidate, team context, existing members) to a
//! score breakdown. The only non-input signal is personality inference,
//! injected as a trait, and the neutral-band fallback, which is seeded
//! from the two entity ids so repeated calls are byte-identical.

use std::collections::{BTreeSet, HashSet};

use huddle_common::db::models::{Archetype, Proficiency};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::Serialize;

use super::personality::PersonalityInference;

/// Weight a declared proficiency contributes toward a required capability
fn proficiency_weight(level: Proficiency) -> f64 {
    match level {
        Proficiency::Beginner => 0.25,
        Proficiency::Intermediate => 0.5,
        Proficiency::Advanced => 0.75,
        Proficiency::Expert => 1.0,
    }
}

/// Weight for a capability only found through personality inference
const INFERRED_SKILL_WEIGHT: f64 = 0.5;

/// Flat bonus when inferred experience exceeds this many years
const EXPERIENCE_BONUS_YEARS: u32 = 3;
const EXPERIENCE_BONUS: f64 = 0.5;

/// Per-overlapping-vibe-tag boost to the vibe score
const TAG_OVERLAP_BOOST: f64 = 12.0;

/// Per-compatible-member collaboration-style boost
const STYLE_MATCH_BOOST: f64 = 10.0;

/// Archetypes a given archetype pairs well with
///
/// Checked in both directions: a pair is compatible if either side's
/// table contains the other.
fn compatible_archetypes(archetype: Archetype) -> &'static [Archetype] {
    use Archetype::*;
    match archetype {
        Builder => &[Designer, Researcher],
        Designer => &[Builder, Communicator],
        Researcher => &[Builder, Strategist],
        Communicator => &[Builder, Designer, Researcher, Strategist, Communicator],
        Strategist => &[Researcher, Communicator],
    }
}

/// Whether two archetypes are in the compatibility relation
pub fn archetypes_compatible(a: Archetype, b: Archetype) -> bool {
    compatible_archetypes(a).contains(&b) || compatible_archetypes(b).contains(&a)
}

/// One declared capability of a candidate
#[derive(Debug, Clone)]
pub struct DeclaredCapability {
    pub name: String,
    pub proficiency: Proficiency,
}

/// Everything the scoring engine needs to know about one person
#[derive(Debug, Clone)]
pub struct CandidateProfile {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub archetype: Option<Archetype>,
    pub capabilities: Vec<DeclaredCapability>,
}

/// Score breakdown returned to callers; all scores in [0, 100], one decimal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub score: f64,
    pub capability_score: f64,
    pub vibe_score: f64,
    pub matched_capabilities: Vec<String>,
}

/// Score a candidate against a team for a set of required capability tags
///
/// Final score is a 60/40 blend of capability coverage and personality
/// compatibility. Deterministic for identical inputs: the fallback and
/// tie-break draws are seeded from `candidate.id + team_id`.
pub fn score_candidate(
    candidate: &CandidateProfile,
    team_id: i64,
    required_tags: &[String],
    members: &[CandidateProfile],
    inference: &dyn PersonalityInference,
) -> ScoreBreakdown {
    let analysis = inference.analyse(&candidate.email, &candidate.full_name);

    // Capability tags required by the hackathon, lower-cased
    let required: BTreeSet<String> = required_tags.iter().map(|t| t.to_lowercase()).collect();

    // Capability tags already covered by existing members; a duplicate
    // contribution is worth half (filling gaps beats doubling up)
    let covered: HashSet<String> = members
        .iter()
        .flat_map(|m| m.capabilities.iter().map(|c| c.name.to_lowercase()))
        .collect();

    let mut matched_capabilities = Vec::new();
    let capability_score = if required.is_empty() {
        // No declared requirements: neutral default
        50.0
    } else {
        let mut total = 0.0;

        for cap in &candidate.capabilities {
            let tag = cap.name.to_lowercase();
            if required.contains(&tag) {
                matched_capabilities.push(cap.name.clone());
                let mut weight = proficiency_weight(cap.proficiency);
                if covered.contains(&tag) {
                    weight *= 0.5;
                }
                total += weight;
            }
        }

        // Inferred skills count too, at a fixed intermediate weight,
        // unless the declared pass already matched the same tag
        for skill in &analysis.skills {
            let tag = skill.to_lowercase();
            if required.contains(&tag)
                && !matched_capabilities.iter().any(|m| m.to_lowercase() == tag)
            {
                matched_capabilities.push(skill.clone());
                let mut weight = INFERRED_SKILL_WEIGHT;
                if covered.contains(&tag) {
                    weight *= 0.5;
                }
                total += weight;
            }
        }

        if analysis.experience_years > EXPERIENCE_BONUS_YEARS {
            total += EXPERIENCE_BONUS;
        }

        (total / required.len() as f64 * 100.0).min(100.0)
    };

    let seed = candidate.id.wrapping_add(team_id) as u64;

    // Base vibe: fraction of archetype-declaring members compatible with
    // the candidate's archetype; seeded neutral band when the signal is
    // missing on either side
    let mut vibe_score = match candidate.archetype {
        Some(archetype) if !members.is_empty() => {
            let mut valid = 0u32;
            let mut compatible = 0u32;
            for member in members {
                if let Some(member_archetype) = member.archetype {
                    valid += 1;
                    if archetypes_compatible(archetype, member_archetype) {
                        compatible += 1;
                    }
                }
            }
            if valid > 0 {
                f64::from(compatible) / f64::from(valid) * 100.0
            } else {
                50.0
            }
        }
        _ => Pcg64::seed_from_u64(seed).gen_range(45.0..75.0),
    };

    // Boost for shared personality tags across the team's aggregate profile
    let member_profiles: Vec<_> = members
        .iter()
        .map(|m| inference.analyse(&m.email, &m.full_name))
        .collect();
    let team_tags: HashSet<&str> = member_profiles
        .iter()
        .flat_map(|p| p.vibe_tags.iter().map(String::as_str))
        .collect();
    let overlap = analysis
        .vibe_tags
        .iter()
        .filter(|t| team_tags.contains(t.as_str()))
        .count();
    if overlap > 0 {
        vibe_score = (vibe_score + TAG_OVERLAP_BOOST * overlap as f64).min(100.0);
    }

    // Boost per member whose collaboration style pairs with the candidate's
    let style_matches = member_profiles
        .iter()
        .filter(|p| analysis.collab_style.is_compatible_with(p.collab_style))
        .count();
    if style_matches > 0 {
        vibe_score = (vibe_score + STYLE_MATCH_BOOST * style_matches as f64).min(100.0);
    }

    // Deterministic nudge to break ties between otherwise equal pairs
    let nudge = Pcg64::seed_from_u64(seed).gen_range(-5.0..15.0);
    vibe_score = (vibe_score + nudge).clamp(0.0, 100.0);

    let final_score = capability_score * 0.6 + vibe_score * 0.4;

    ScoreBreakdown {
        score: round1(final_score),
        capability_score: round1(capability_score),
        vibe_score: round1(vibe_score),
        matched_capabilities,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
