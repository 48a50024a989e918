//! Personality inference from identity strings
//!
//! Maps an email/name to an inferred skill and trait profile. The default
//! implementation is local and fully deterministic: the same identity
//! always yields the same profile, across calls and across processes.
//! A service-backed analyser would implement the same trait.

use sha2::{Digest, Sha256};

/// Inferred collaboration style, used for a secondary compatibility boost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollabStyle {
    Methodical,
    VisualThinker,
    Leader,
    DeepDiver,
    Generalist,
}

impl CollabStyle {
    /// Styles this style collaborates well with
    pub fn compatible_styles(self) -> &'static [CollabStyle] {
        use CollabStyle::*;
        match self {
            Methodical => &[Leader, DeepDiver, VisualThinker],
            VisualThinker => &[Methodical, Leader, Generalist],
            Leader => &[Methodical, VisualThinker, DeepDiver, Generalist],
            DeepDiver => &[Methodical, Leader, Generalist],
            Generalist => &[Leader, VisualThinker, DeepDiver, Methodical],
        }
    }

    /// Whether `other` is in this style's compatibility set
    pub fn is_compatible_with(self, other: CollabStyle) -> bool {
        self.compatible_styles().contains(&other)
    }
}

/// Inferred profile for one identity
#[derive(Debug, Clone)]
pub struct VibeProfile {
    /// Likely technical skills
    pub skills: Vec<String>,
    /// Personality tags ("analytical", "creative", ...)
    pub vibe_tags: Vec<String>,
    /// Collaboration style
    pub collab_style: CollabStyle,
    /// Estimated years of experience
    pub experience_years: u32,
}

/// Capability the scoring engine depends on: identity -> inferred profile
///
/// Implementations must be deterministic for identical inputs; the scoring
/// engine's repeatability guarantee rests on it.
pub trait PersonalityInference: Send + Sync {
    fn analyse(&self, email: &str, full_name: &str) -> VibeProfile;
}

/// Trait pool for one detected personality domain
struct TraitPool {
    keywords: &'static [&'static str],
    skills: &'static [&'static str],
    vibe_tags: &'static [&'static str],
    collab_style: CollabStyle,
}

const TECH: TraitPool = TraitPool {
    keywords: &[
        "dev", "code", "hack", "tech", "eng", "sys", "data", "cyber", "net", "comp", "prog",
        "soft",
    ],
    skills: &[
        "Python",
        "JavaScript",
        "React",
        "Cloud Computing",
        "Data Analysis",
        "Machine Learning",
    ],
    vibe_tags: &["analytical", "structured", "innovative", "problem-solver"],
    collab_style: CollabStyle::Methodical,
};

const DESIGN: TraitPool = TraitPool {
    keywords: &[
        "design", "art", "creat", "ux", "ui", "graph", "visual", "media", "photo",
    ],
    skills: &[
        "UI/UX Design",
        "Figma",
        "User Research",
        "Prototyping",
        "Visual Design",
    ],
    vibe_tags: &["creative", "empathetic", "visionary", "detail-oriented"],
    collab_style: CollabStyle::VisualThinker,
};

const BUSINESS: TraitPool = TraitPool {
    keywords: &[
        "manage", "lead", "exec", "strat", "market", "biz", "mba", "consult",
    ],
    skills: &[
        "Project Management",
        "Strategy",
        "Communication",
        "Agile",
        "Leadership",
    ],
    vibe_tags: &["driven", "collaborative", "communicative", "strategic"],
    collab_style: CollabStyle::Leader,
};

const RESEARCH: TraitPool = TraitPool {
    keywords: &["research", "sci", "phd", "lab", "study", "acad", "prof"],
    skills: &[
        "Research Methods",
        "Data Science",
        "Statistics",
        "Academic Writing",
    ],
    vibe_tags: &["curious", "thorough", "analytical", "persistent"],
    collab_style: CollabStyle::DeepDiver,
};

const GENERAL: TraitPool = TraitPool {
    keywords: &[],
    skills: &["Communication", "Teamwork", "Problem Solving", "Adaptability"],
    vibe_tags: &["professional", "focused", "reliable", "adaptable"],
    collab_style: CollabStyle::Generalist,
};

// Keyword pools are checked in this order; GENERAL is the fallback
const POOLS: [&TraitPool; 5] = [&TECH, &DESIGN, &BUSINESS, &RESEARCH, &GENERAL];

/// Default local analyser: keyword hints plus a stable hash of the identity
pub struct LocalVibeAnalyser;

impl PersonalityInference for LocalVibeAnalyser {
    fn analyse(&self, email: &str, full_name: &str) -> VibeProfile {
        let seed_text = if !email.is_empty() {
            email
        } else if !full_name.is_empty() {
            full_name
        } else {
            "unknown"
        }
        .trim()
        .to_lowercase();

        let seed = hash_seed(&seed_text);

        // Detect domain from identity patterns; fall back to a
        // hash-assigned domain so unknown identities still spread out
        let mut pool_idx = POOLS
            .iter()
            .position(|p| p.keywords.iter().any(|kw| seed_text.contains(kw)))
            .unwrap_or(POOLS.len() - 1);
        if pool_idx == POOLS.len() - 1 && seed_text != "unknown" {
            pool_idx = (seed % POOLS.len() as u64) as usize;
        }
        let pool = POOLS[pool_idx];

        let n_skills = 2 + (seed % 3) as usize; // 2-4 skills
        let n_vibes = 2 + (seed % 2) as usize; // 2-3 vibe tags
        let mut skills: Vec<String> = pool.skills[..n_skills.min(pool.skills.len())]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut vibe_tags: Vec<String> = pool.vibe_tags[..n_vibes.min(pool.vibe_tags.len())]
            .iter()
            .map(|s| s.to_string())
            .collect();

        // Cross-pollinate with a secondary domain
        let secondary_idx = ((seed >> 4) % POOLS.len() as u64) as usize;
        if secondary_idx != pool_idx {
            let extra = POOLS[secondary_idx];
            skills.push(extra.skills[(seed % extra.skills.len() as u64) as usize].to_string());
            vibe_tags
                .push(extra.vibe_tags[(seed % extra.vibe_tags.len() as u64) as usize].to_string());
        }
        dedup_preserving_order(&mut skills);
        dedup_preserving_order(&mut vibe_tags);

        // Identities carrying digits look like student roll numbers and
        // get the lower experience band
        let experience_years = if seed_text.chars().any(|c| c.is_ascii_digit()) {
            1 + (seed % 3) as u32
        } else {
            2 + (seed % 6) as u32
        };

        VibeProfile {
            skills,
            vibe_tags,
            collab_style: pool.collab_style,
            experience_years,
        }
    }
}

/// Stable numeric seed from an identity string
fn hash_seed(text: &str) -> u64 {
    let digest = Sha256::digest(text.as_bytes());
    u64::from_be_bytes(digest[..8].try_into().expect("digest is 32 bytes"))
}

fn dedup_preserving_order(items: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    items.retain(|s| seen.insert(s.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_is_deterministic() {
        let analyser = LocalVibeAnalyser;
        let a = analyser.analyse("dev.student@campus.edu", "Sam Coder");
        let b = analyser.analyse("dev.student@campus.edu", "Sam Coder");
        assert_eq!(a.skills, b.skills);
        assert_eq!(a.vibe_tags, b.vibe_tags);
        assert_eq!(a.collab_style, b.collab_style);
        assert_eq!(a.experience_years, b.experience_years);
    }

    #[test]
    fn keyword_hint_selects_domain() {
        let analyser = LocalVibeAnalyser;
        let profile = analyser.analyse("devops@campus.edu", "");
        assert_eq!(profile.collab_style, CollabStyle::Methodical);

        let profile = analyser.analyse("design.lover@campus.edu", "");
        assert_eq!(profile.collab_style, CollabStyle::VisualThinker);

        let profile = analyser.analyse("research.group@campus.edu", "");
        assert_eq!(profile.collab_style, CollabStyle::DeepDiver);
    }

    #[test]
    fn falls_back_to_name_when_email_missing() {
        let analyser = LocalVibeAnalyser;
        let from_name = analyser.analyse("", "lead.manager");
        assert_eq!(from_name.collab_style, CollabStyle::Leader);
    }

    #[test]
    fn digit_identities_get_low_experience_band() {
        let analyser = LocalVibeAnalyser;
        let profile = analyser.analyse("student2024@campus.edu", "");
        assert!((1..=3).contains(&profile.experience_years));
    }

    #[test]
    fn no_duplicate_tags_after_cross_pollination() {
        let analyser = LocalVibeAnalyser;
        for email in ["a@x.io", "b@y.io", "hackathon.fan@z.io", "phd.lab@u.edu"] {
            let p = analyser.analyse(email, "");
            let mut skills = p.skills.clone();
            skills.sort();
            skills.dedup();
            assert_eq!(skills.len(), p.skills.len(), "dup skill for {}", email);
        }
    }

    #[test]
    fn leader_pairs_with_every_other_style() {
        use CollabStyle::*;
        for s in [Methodical, VisualThinker, DeepDiver, Generalist] {
            assert!(Leader.is_compatible_with(s));
        }
        assert!(!Leader.is_compatible_with(Leader));
    }
}
