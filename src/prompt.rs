//! Image prompt composition

use std::fmt;

use crate::concepts::Rarity;

/// Art styles offered for a season.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArtStyle {
    /// Kawaii pastels
    #[default]
    Cute,
    /// Neon and chrome
    Cyberpunk,
    /// Bold outlines
    Cartoon,
    /// Epic and magical
    Fantasy,
    /// 16-bit retro
    PixelArt,
    /// Photorealistic
    Realistic,
}

impl ArtStyle {
    /// All styles, in menu order.
    pub const ALL: [ArtStyle; 6] = [
        ArtStyle::Cute,
        ArtStyle::Cyberpunk,
        ArtStyle::Cartoon,
        ArtStyle::Fantasy,
        ArtStyle::PixelArt,
        ArtStyle::Realistic,
    ];

    /// Short key for the style.
    pub fn as_key(self) -> &'static str {
        match self {
            ArtStyle::Cute => "cute",
            ArtStyle::Cyberpunk => "cyberpunk",
            ArtStyle::Cartoon => "cartoon",
            ArtStyle::Fantasy => "fantasy",
            ArtStyle::PixelArt => "pixelArt",
            ArtStyle::Realistic => "realistic",
        }
    }

    /// Parses a key, falling back to [`ArtStyle::Cute`] for anything unknown.
    /// Case, `-` and `_` are ignored, so `pixel-art` is [`ArtStyle::PixelArt`].
    pub fn from_key(key: &str) -> Self {
        let key = key.replace(['-', '_'], "");
        Self::ALL
            .into_iter()
            .find(|style| style.as_key().eq_ignore_ascii_case(&key))
            .unwrap_or_default()
    }
}

impl fmt::Display for ArtStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

fn style_clause(style: ArtStyle) -> &'static str {
    match style {
        ArtStyle::Cute => {
            "Cute and adorable style, kawaii aesthetic, soft pastel colors, charming, chibi-like proportions"
        }
        ArtStyle::Cyberpunk => {
            "Cyberpunk style, neon colors, futuristic, high-tech, glowing effects, dark background"
        }
        ArtStyle::Cartoon => {
            "Cartoon style, bold outlines, vibrant colors, animated look, expressive features"
        }
        ArtStyle::Fantasy => {
            "Fantasy art style, magical, ethereal, detailed, epic, mystical atmosphere"
        }
        ArtStyle::PixelArt => {
            "16-bit pixel art style, retro gaming aesthetic, detailed pixels, nostalgic"
        }
        ArtStyle::Realistic => {
            "Realistic style, photorealistic, detailed textures, natural lighting, high definition"
        }
    }
}

fn rarity_clause(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Secret => {
            "legendary masterpiece, extremely detailed, holographic effect, premium quality, epic lighting"
        }
        Rarity::UltraRare => {
            "epic quality, highly detailed, glowing golden aura, premium, shimmering effects"
        }
        Rarity::SuperRare => {
            "rare quality, detailed artwork, special silver effects, quality craftsmanship"
        }
        Rarity::Rare => "uncommon quality, good details, slight magical glow, polished",
        Rarity::Normal => "standard quality, clean design, professional artwork",
    }
}

const COMPOSITION_CLAUSE: &str = "trading card art, centered composition, clean white background, professional illustration";
const USAGE_CLAUSE: &str = "suitable for mobile game, high quality digital art";

/// Builds the image generation prompt for a card.
pub fn build_prompt(name: &str, description: &str, rarity: Rarity, style: ArtStyle) -> String {
    format!(
        "{}, {name}: {description}, {}, {COMPOSITION_CLAUSE}, {USAGE_CLAUSE}",
        style_clause(style),
        rarity_clause(rarity),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_deterministic() {
        let first = build_prompt("Egg Tyranno", "A tiny egg", Rarity::Rare, ArtStyle::Fantasy);
        let second = build_prompt("Egg Tyranno", "A tiny egg", Rarity::Rare, ArtStyle::Fantasy);
        assert_eq!(first, second);
        assert!(first.starts_with("Fantasy art style"));
        assert!(first.contains("Egg Tyranno: A tiny egg"));
        assert!(first.contains("slight magical glow"));
        assert!(first.ends_with("high quality digital art"));
    }

    #[test]
    fn unknown_style_key_is_cute() {
        let style = ArtStyle::from_key("watercolour");
        assert_eq!(style, ArtStyle::Cute);
        let prompt = build_prompt("x", "y", Rarity::Rare, style);
        assert!(prompt.starts_with(style_clause(ArtStyle::Cute)));
    }

    #[test]
    fn every_rarity_has_its_own_clause() {
        let clauses: Vec<_> = Rarity::ALL.into_iter().map(rarity_clause).collect();
        for (position, clause) in clauses.iter().enumerate() {
            assert!(!clauses[position + 1..].contains(clause));
        }
        let prompt = build_prompt("x", "y", Rarity::Normal, ArtStyle::Cyberpunk);
        assert!(prompt.contains(rarity_clause(Rarity::Normal)));
    }

    #[test]
    fn style_keys_parse_case_insensitively() {
        assert_eq!(ArtStyle::from_key("PixelArt"), ArtStyle::PixelArt);
        assert_eq!(ArtStyle::from_key("pixelart"), ArtStyle::PixelArt);
        assert_eq!(ArtStyle::from_key("pixel-art"), ArtStyle::PixelArt);
        assert_eq!(ArtStyle::from_key(""), ArtStyle::Cute);
    }
}
