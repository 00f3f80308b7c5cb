//! Card concept generation.
//!
//! Concepts are plain descriptions of the cards in a season before any image
//! exists for them. Generation is deterministic: the same mode, theme and names
//! always produce the same 70 concepts.

use std::fmt;

use clap::ValueEnum;
use tracing::warn;

use crate::constants::{
    EVOLUTION_LINES, HYBRID_EVOLUTION_QUOTA, HYBRID_THEMATIC_QUOTA, TARGET_DISTRIBUTION,
};
use crate::error::ConceptError;

/// Rarity tiers, lowest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rarity {
    /// Common cards
    Normal,
    /// Uncommon
    Rare,
    /// Silver tier
    SuperRare,
    /// Gold tier
    UltraRare,
    /// One per season
    Secret,
}

impl Rarity {
    /// All tiers in order.
    pub const ALL: [Rarity; 5] = [
        Rarity::Normal,
        Rarity::Rare,
        Rarity::SuperRare,
        Rarity::UltraRare,
        Rarity::Secret,
    ];

    /// The key stored alongside persisted cards.
    pub fn as_key(self) -> &'static str {
        match self {
            Rarity::Normal => "normal",
            Rarity::Rare => "rare",
            Rarity::SuperRare => "superRare",
            Rarity::UltraRare => "ultraRare",
            Rarity::Secret => "secret",
        }
    }

}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// How a season's cards are derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum GenerationMode {
    /// 20 creatures, five stages each, filtered to the target distribution
    #[default]
    Evolution,
    /// 70 independent cards named after the theme
    Thematic,
    /// Half evolution, half thematic
    Hybrid,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationMode::Evolution => "evolution",
            GenerationMode::Thematic => "thematic",
            GenerationMode::Hybrid => "hybrid",
        };
        f.write_str(name)
    }
}

/// A card before it has an image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardConcept {
    /// Dense 0-based position in the season
    pub index: usize,
    /// Card name
    pub name: String,
    /// Flavour text
    pub description: String,
    /// Rarity tier
    pub rarity: Rarity,
    /// 1-based creature line, evolution cards only
    pub evolution_line: Option<u32>,
    /// 1-based stage within the line, evolution cards only
    pub evolution_stage: Option<u32>,
    /// Stored image URL, set once the image is acquired and stored
    pub image_path: Option<String>,
}

impl CardConcept {
    /// Document id of the card, `card_{index}`.
    pub fn card_id(&self) -> String {
        format!("card_{}", self.index)
    }
}

struct Stage {
    number: u32,
    rarity: Rarity,
    prefix: &'static str,
}

const STAGES: [Stage; 5] = [
    Stage {
        number: 1,
        rarity: Rarity::Normal,
        prefix: "Egg",
    },
    Stage {
        number: 2,
        rarity: Rarity::Rare,
        prefix: "Hatchling",
    },
    Stage {
        number: 3,
        rarity: Rarity::SuperRare,
        prefix: "Adult",
    },
    Stage {
        number: 4,
        rarity: Rarity::UltraRare,
        prefix: "Empowered",
    },
    Stage {
        number: 5,
        rarity: Rarity::Secret,
        prefix: "Ultimate",
    },
];

const MONSTER_NAMES: [&str; EVOLUTION_LINES] = [
    "Emberling",
    "Tidepup",
    "Sproutle",
    "Zapmouse",
    "Snorebear",
    "Psyclone",
    "Gustwing",
    "Skyserpent",
    "Guardian",
    "Blazewyrm",
    "Torrentfang",
    "Dreadnought",
    "Ironclaw",
    "Crimsonwing",
    "Auraknight",
    "Sandshark",
    "Bloomlord",
    "Cinderfox",
    "Vinewhip",
    "Pyroclast",
];

const DINOSAUR_NAMES: [&str; EVOLUTION_LINES] = [
    "Tyranno",
    "Tricera",
    "Brachio",
    "Stego",
    "Veloci",
    "Pteranodon",
    "Diplodocus",
    "Spino",
    "Allo",
    "Pachycephalo",
    "Iguanodon",
    "Ankylo",
    "Gallimimus",
    "Carno",
    "Giganoto",
    "Therizino",
    "Quetzalcoatlus",
    "Mosasaurus",
    "Tarbo",
    "Baryonyx",
];

const ODDITY_NAMES: [&str; EVOLUTION_LINES] = [
    "Tungtungsaurus",
    "Squishle",
    "Wobblewonk",
    "Munchmunch",
    "Wrigglewug",
    "Clunkclank",
    "Gloopgloop",
    "Coughcough",
    "Swayswish",
    "Waddlewad",
    "Spinspin",
    "Flapflap",
    "Droopdrip",
    "Clickclack",
    "Bobbob",
    "Boomboom",
    "Winkwink",
    "Fluffpuff",
    "Boingboing",
    "Chewychew",
];

/// Theme keywords and the creature names they unlock, checked in order.
const THEME_NAMES: [(&[&str], &[&str; EVOLUTION_LINES]); 3] = [
    (&["monster", "몬스터", "포켓몬"], &MONSTER_NAMES),
    (&["dinosaur", "dino", "공룡"], &DINOSAUR_NAMES),
    (&["weird", "oddit", "해괴한", "퉁퉁퉁"], &ODDITY_NAMES),
];

/// Creature names for a theme, or numbered theme names when no keyword matches.
pub fn theme_creature_names(theme: &str) -> Vec<String> {
    let lowered = theme.to_lowercase();
    THEME_NAMES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(_, names)| names.iter().map(|name| name.to_string()).collect::<Vec<_>>())
        .unwrap_or_else(|| numbered_names(theme, EVOLUTION_LINES))
}

fn numbered_names(theme: &str, count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("{theme} #{i}")).collect()
}

/// Checks user supplied evolution names.
pub fn validate_custom_names(names: &[String]) -> Result<(), ConceptError> {
    if names.len() == EVOLUTION_LINES {
        Ok(())
    } else {
        Err(ConceptError::CustomNameCount {
            expected: EVOLUTION_LINES,
            actual: names.len(),
        })
    }
}

/// Generates the concepts for a season.
///
/// Custom names only apply to the evolution lines; when there are not exactly
/// [`EVOLUTION_LINES`] of them the theme's defaults are used instead.
pub fn generate(
    mode: GenerationMode,
    theme: &str,
    custom_names: Option<&[String]>,
) -> Vec<CardConcept> {
    let mut concepts = match mode {
        GenerationMode::Evolution => {
            select_by_quota(&evolution_lines(theme, custom_names), &TARGET_DISTRIBUTION)
        }
        GenerationMode::Thematic => thematic(theme),
        GenerationMode::Hybrid => {
            let mut cards =
                select_by_quota(&evolution_lines(theme, custom_names), &HYBRID_EVOLUTION_QUOTA);
            cards.extend(select_by_quota(&thematic(theme), &HYBRID_THEMATIC_QUOTA));
            cards
        }
    };
    reindex(&mut concepts);
    concepts
}

/// Every stage of every creature line, 100 concepts in line order.
fn evolution_lines(theme: &str, custom_names: Option<&[String]>) -> Vec<CardConcept> {
    let names = match custom_names {
        Some(names) => match validate_custom_names(names) {
            Ok(()) => names.to_vec(),
            Err(err) => {
                warn!("Ignoring custom names ({err}), using theme defaults");
                theme_creature_names(theme)
            }
        },
        None => theme_creature_names(theme),
    };

    let mut cards = Vec::with_capacity(names.len() * STAGES.len());
    for (line, name) in names.iter().enumerate() {
        for stage in &STAGES {
            cards.push(CardConcept {
                index: cards.len(),
                name: format!("{} {name}", stage.prefix),
                description: format!(
                    "Stage {} evolution of {name}. It grows stronger with every evolution!",
                    stage.number
                ),
                rarity: stage.rarity,
                evolution_line: Some(line as u32 + 1),
                evolution_stage: Some(stage.number),
                image_path: None,
            });
        }
    }
    cards
}

/// Seventy independent cards laid out in the target distribution.
fn thematic(theme: &str) -> Vec<CardConcept> {
    TARGET_DISTRIBUTION
        .iter()
        .flat_map(|(rarity, count)| std::iter::repeat_n(*rarity, *count))
        .enumerate()
        .map(|(index, rarity)| CardConcept {
            index,
            name: format!("{theme} #{}", index + 1),
            description: format!("A one-of-a-kind card from the {theme} theme"),
            rarity,
            evolution_line: None,
            evolution_stage: None,
            image_path: None,
        })
        .collect()
}

/// Takes, in original order, the first `count` concepts of each rarity in the quota.
fn select_by_quota(concepts: &[CardConcept], quota: &[(Rarity, usize)]) -> Vec<CardConcept> {
    let mut selected = Vec::with_capacity(quota.iter().map(|(_, count)| count).sum());
    for (rarity, count) in quota {
        selected.extend(
            concepts
                .iter()
                .filter(|concept| concept.rarity == *rarity)
                .take(*count)
                .cloned(),
        );
    }
    selected
}

fn reindex(concepts: &mut [CardConcept]) {
    for (index, concept) in concepts.iter_mut().enumerate() {
        concept.index = index;
    }
}

/// Counts concepts per rarity, in tier order.
pub fn rarity_counts(concepts: &[CardConcept]) -> [(Rarity, usize); 5] {
    Rarity::ALL.map(|rarity| {
        (
            rarity,
            concepts.iter().filter(|c| c.rarity == rarity).count(),
        )
    })
}
