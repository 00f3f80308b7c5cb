//! Shared constants for card generation
//!

use std::time::Duration;

use crate::concepts::Rarity;

/// Number of cards in one season.
pub const CARDS_PER_SEASON: usize = 70;

/// How many cards of each rarity a season holds, in tier order.
pub const TARGET_DISTRIBUTION: [(Rarity, usize); 5] = [
    (Rarity::Normal, 20),
    (Rarity::Rare, 20),
    (Rarity::SuperRare, 20),
    (Rarity::UltraRare, 9),
    (Rarity::Secret, 1),
];

/// Hybrid seasons take this share of the target from the evolution lines.
pub const HYBRID_EVOLUTION_QUOTA: [(Rarity, usize); 5] = [
    (Rarity::Normal, 10),
    (Rarity::Rare, 10),
    (Rarity::SuperRare, 10),
    (Rarity::UltraRare, 4),
    (Rarity::Secret, 1),
];

/// ...and the rest from the thematic cards.
pub const HYBRID_THEMATIC_QUOTA: [(Rarity, usize); 5] = [
    (Rarity::Normal, 10),
    (Rarity::Rare, 10),
    (Rarity::SuperRare, 10),
    (Rarity::UltraRare, 5),
    (Rarity::Secret, 0),
];

/// Number of base creatures in an evolution season.
pub const EVOLUTION_LINES: usize = 20;

/// Maximum supply recorded against every card.
pub const MAX_SUPPLY: i32 = 1000;

/// Where the service account credential lives unless told otherwise.
pub const DEFAULT_CREDENTIALS_PATH: &str = "/opt/cardgen/service-account.json";

/// Default image generation model.
pub const DEFAULT_IMAGE_MODEL: &str = "recraft-v3";

/// Time allowed for a single image generation request.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Time allowed for downloading a generated image.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Content type of stored card images.
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// How much of a prompt goes into the progress output.
pub const PROMPT_PREVIEW_CHARS: usize = 80;
