use cardgen::concepts::{GenerationMode, Rarity, generate, rarity_counts};
use cardgen::constants::{CARDS_PER_SEASON, TARGET_DISTRIBUTION};

const MODES: [GenerationMode; 3] = [
    GenerationMode::Evolution,
    GenerationMode::Thematic,
    GenerationMode::Hybrid,
];

const THEMES: [&str; 5] = [
    "Evolving monsters",
    "Weird creatures",
    "Cute animals",
    "Cute dinosaurs",
    "",
];

#[test]
fn every_mode_matches_target_distribution() {
    for mode in MODES {
        for theme in THEMES {
            let concepts = generate(mode, theme, None);
            assert_eq!(concepts.len(), CARDS_PER_SEASON, "{mode} / {theme}");
            assert_eq!(
                rarity_counts(&concepts),
                TARGET_DISTRIBUTION,
                "{mode} / {theme}"
            );
        }
    }
}

#[test]
fn indexes_are_dense_and_ordered() {
    for mode in MODES {
        let concepts = generate(mode, "Cute animals", None);
        let indexes: Vec<_> = concepts.iter().map(|c| c.index).collect();
        assert_eq!(indexes, (0..CARDS_PER_SEASON).collect::<Vec<_>>(), "{mode}");
        let ids: Vec<_> = concepts.iter().map(|c| c.card_id()).collect();
        assert_eq!(ids[0], "card_0");
        assert_eq!(ids[69], "card_69");
    }
}

#[test]
fn generation_is_repeatable() {
    for mode in MODES {
        let first = generate(mode, "Evolving monsters", None);
        let second = generate(mode, "Evolving monsters", None);
        assert_eq!(first, second, "{mode}");
    }
}

#[test]
fn hybrid_is_evolution_then_thematic() {
    let concepts = generate(GenerationMode::Hybrid, "Cute dinosaurs", None);
    let (evolution, thematic) = concepts.split_at(35);
    assert!(evolution.iter().all(|c| c.evolution_stage.is_some()));
    assert!(thematic.iter().all(|c| c.evolution_stage.is_none()));
    assert_eq!(concepts[35].index, 35);
    assert_eq!(concepts[0].name, "Egg Tyranno");
    assert_eq!(concepts[35].name, "Cute dinosaurs #1");
    assert_eq!(rarity_counts(evolution)[4], (Rarity::Secret, 1));
}

#[test]
fn concepts_start_without_images() {
    for mode in MODES {
        let concepts = generate(mode, "Robots", None);
        assert!(concepts.iter().all(|c| c.image_path.is_none()), "{mode}");
    }
}
