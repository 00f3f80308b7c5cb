//! Season generation pipeline.
//!
//! Concepts are processed strictly one after another: acquire an image, move
//! it to the object store, record it. A card that fails is set aside and the
//! run carries on. Only the recorded cards are persisted, in a single batch
//! once every card has been attempted.

use std::fmt;
use std::io::Write;
use std::time::Instant;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use tracing::{debug, info, warn};

use crate::acquire::ImageAcquirer;
use crate::concepts::{self, CardConcept, GenerationMode};
use crate::db::entities::cards;
use crate::error::CardgenError;
use crate::prompt::ArtStyle;
use crate::season::SeasonId;
use crate::storage::ArtifactStore;

/// Where a single card is in its generate/store cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemState {
    /// Waiting on the generation service
    Acquiring,
    /// Moving the image into the object store
    Storing,
    /// Has an image, will be persisted
    Recorded,
    /// No image, will not be persisted
    Failed,
}

/// What to generate.
#[derive(Clone, Debug)]
pub struct SeasonRequest {
    /// How concepts are derived
    pub mode: GenerationMode,
    /// Theme keyword or free text
    pub theme: String,
    /// Art style for every card
    pub style: ArtStyle,
    /// Optional evolution creature names
    pub custom_names: Option<Vec<String>>,
}

/// Outcome of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationSummary {
    /// Season the cards were stored under
    pub season_id: SeasonId,
    /// Cards recorded and persisted
    pub success_count: usize,
    /// Cards without an image
    pub failure_count: usize,
    /// Wall clock time of the run
    pub elapsed_seconds: f64,
    /// Names of the failed cards
    pub failed: Vec<String>,
}

impl GenerationSummary {
    /// True when every card made it.
    pub fn success(&self) -> bool {
        self.failure_count == 0
    }

    /// Total cards attempted.
    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }

    /// Prints the closing summary block; `records_link` points at the stored records.
    pub fn report<W: Write>(&self, out: &mut W, records_link: &str) -> std::io::Result<()> {
        let total = self.total();
        writeln!(out, "\n{}", "=".repeat(60))?;
        writeln!(out, "Generation complete")?;
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out, "Successful: {}/{total}", self.success_count)?;
        writeln!(out, "Failed: {}/{total}", self.failure_count)?;
        for name in &self.failed {
            writeln!(out, "   - {name}")?;
        }
        writeln!(out, "Time: {:.1} minutes", self.elapsed_seconds / 60.0)?;
        writeln!(out, "Season ID: {}", self.season_id)?;
        writeln!(out, "{}", "=".repeat(60))?;
        if self.success() {
            writeln!(out, "\nAll cards generated successfully!")?;
        } else {
            writeln!(
                out,
                "\nGeneration completed with {} failures",
                self.failure_count
            )?;
        }
        writeln!(out, "\nView stored cards:")?;
        writeln!(out, "   {records_link}")?;
        writeln!(out, "   Collection: {}", self.season_id.collection_path())?;
        Ok(())
    }
}

/// Writes one progress line. Once images are being uploaded a broken output
/// must not stop the run, so failures are only logged.
fn progress<W: Write>(out: &mut W, line: fmt::Arguments<'_>) {
    if let Err(err) = out.write_fmt(line).and_then(|()| out.write_all(b"\n")) {
        warn!("Failed to write progress: {err}");
    }
}

/// Everything a run talks to.
pub struct Pipeline {
    acquirer: ImageAcquirer,
    artifacts: ArtifactStore,
    db: DatabaseConnection,
}

impl Pipeline {
    /// The artifact store decides the season.
    pub fn new(acquirer: ImageAcquirer, artifacts: ArtifactStore, db: DatabaseConnection) -> Self {
        Self {
            acquirer,
            artifacts,
            db,
        }
    }

    /// Season this pipeline stores into.
    pub fn season(&self) -> &SeasonId {
        self.artifacts.season()
    }

    /// Generates concepts for the request and runs them.
    pub async fn generate_season<W: Write>(
        &self,
        request: &SeasonRequest,
        out: &mut W,
    ) -> Result<GenerationSummary, CardgenError> {
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out, "Season: {}", self.season())?;
        writeln!(out, "Mode: {}", request.mode)?;
        writeln!(out, "Theme: {}", request.theme)?;
        writeln!(out, "Style: {}", request.style)?;
        writeln!(out, "{}", "=".repeat(60))?;

        writeln!(out, "\n[1/3] Generating card concepts...")?;
        let concepts = concepts::generate(
            request.mode,
            &request.theme,
            request.custom_names.as_deref(),
        );
        writeln!(out, "Generated {} card concepts", concepts.len())?;

        self.run(concepts, request.style, out).await
    }

    /// Acquires and stores an image for every concept, then persists the
    /// recorded ones.
    pub async fn run<W: Write>(
        &self,
        concepts: Vec<CardConcept>,
        style: ArtStyle,
        out: &mut W,
    ) -> Result<GenerationSummary, CardgenError> {
        let started = Instant::now();
        let total = concepts.len();
        let mut generated_cards = Vec::with_capacity(total);
        let mut failed_cards = Vec::new();

        progress(out, format_args!("\n[2/3] Generating images ({total} cards)..."));
        progress(out, format_args!("{}", "-".repeat(60)));

        for (position, mut concept) in concepts.into_iter().enumerate() {
            progress(
                out,
                format_args!("\n[{}/{total}] Processing: {}", position + 1, concept.name),
            );

            let state = self.process(&mut concept, style).await;
            match state {
                ItemState::Recorded => {
                    let stored = concept.image_path.as_deref().unwrap_or_default();
                    progress(out, format_args!("   Stored: {stored}"));
                    generated_cards.push(concept);
                }
                _ => {
                    progress(out, format_args!("   Generation failed"));
                    failed_cards.push(concept);
                }
            }

            let percent = (position + 1) as f64 / total as f64 * 100.0;
            progress(out, format_args!("   Progress: {percent:.1}% ({}/{total})", position + 1));
        }

        progress(out, format_args!("\n[3/3] Saving card records..."));
        let saved = cards::persist_all(
            &self.db,
            self.season(),
            &generated_cards,
            Utc::now(),
        )
        .await?;
        progress(out, format_args!("Saved {saved} cards"));

        let summary = GenerationSummary {
            season_id: self.season().clone(),
            success_count: generated_cards.len(),
            failure_count: failed_cards.len(),
            elapsed_seconds: started.elapsed().as_secs_f64(),
            failed: failed_cards.into_iter().map(|card| card.name).collect(),
        };
        info!(
            "Season {} done: {} succeeded, {} failed",
            summary.season_id, summary.success_count, summary.failure_count
        );
        Ok(summary)
    }

    /// One card's cycle. Storage never fails the card, it only degrades to the
    /// generated URL.
    async fn process(&self, concept: &mut CardConcept, style: ArtStyle) -> ItemState {
        debug!("{} -> {:?}", concept.card_id(), ItemState::Acquiring);
        let image_url = match self.acquirer.acquire(concept, style).await {
            Ok(url) => url,
            Err(err) => {
                warn!("Card {} ({}) failed: {err}", concept.index, concept.name);
                debug!("{} -> {:?}", concept.card_id(), ItemState::Failed);
                return ItemState::Failed;
            }
        };

        debug!("{} -> {:?}", concept.card_id(), ItemState::Storing);
        let stored = self.artifacts.store(&image_url, concept.index).await;
        concept.image_path = Some(stored);
        debug!("{} -> {:?}", concept.card_id(), ItemState::Recorded);
        ItemState::Recorded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquire::{GenerationRequest, ImageGenerator};
    use crate::concepts::Rarity;
    use crate::error::AcquireError;
    use crate::storage::tests::{StaticDownloader, sample_image};
    use crate::storage::FsObjectStore;
    use sea_orm_migration::MigratorTrait;

    /// Fails every request whose task mentions one of the given card names.
    struct SelectiveGenerator {
        failing: Vec<String>,
    }

    #[async_trait::async_trait]
    impl ImageGenerator for SelectiveGenerator {
        async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, AcquireError> {
            if self
                .failing
                .iter()
                .any(|name| request.task_summary.ends_with(name.as_str()))
            {
                return Ok("The image could not be generated.".to_string());
            }
            Ok("![card](https://gen.example.com/out.png)".to_string())
        }
    }

    async fn pipeline(failing: &[&str], dir: &tempfile::TempDir) -> Pipeline {
        let db = crate::db::connect_test_db()
            .await
            .expect("connect test db");
        crate::db::migrations::Migrator::up(&db, None)
            .await
            .expect("run migrations");
        let generator = SelectiveGenerator {
            failing: failing.iter().map(|name| name.to_string()).collect(),
        };
        let artifacts = ArtifactStore::new(
            Box::new(StaticDownloader(sample_image(image::ImageFormat::Png))),
            Box::new(FsObjectStore::new(dir.path(), None).expect("fs store")),
            "2025_S3_v1".parse::<SeasonId>().expect("valid season"),
        );
        Pipeline::new(
            ImageAcquirer::new(Box::new(generator), "test-model"),
            artifacts,
            db,
        )
    }

    fn concept(index: usize, name: &str) -> CardConcept {
        CardConcept {
            index,
            name: name.to_string(),
            description: format!("{name} description"),
            rarity: Rarity::Normal,
            evolution_line: None,
            evolution_stage: None,
            image_path: None,
        }
    }

    #[tokio::test]
    async fn failed_item_is_skipped_and_not_persisted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pipeline = pipeline(&["Card B"], &dir).await;
        let concepts = vec![
            concept(0, "Card A"),
            concept(1, "Card B"),
            concept(2, "Card C"),
        ];
        let mut out = Vec::new();

        let summary = pipeline
            .run(concepts, ArtStyle::Cute, &mut out)
            .await
            .expect("run");
        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(summary.failed, ["Card B"]);
        assert!(!summary.success());

        let stored = cards::for_season(&pipeline.db, pipeline.season())
            .await
            .expect("fetch cards");
        let ids: Vec<_> = stored.iter().map(|row| row.card_id.as_str()).collect();
        assert_eq!(ids, ["card_0", "card_2"]);
        assert!(stored[1].image_path.ends_with("seasons/2025_S3_v1/cards/card_2.png"));
        assert!(dir.path().join("seasons/2025_S3_v1/cards/card_2.png").exists());
        assert!(!dir.path().join("seasons/2025_S3_v1/cards/card_1.png").exists());

        let shown = String::from_utf8(out).expect("utf8");
        assert!(shown.contains("[2/3] Processing: Card B"));
        assert!(shown.contains("Progress: 100.0% (3/3)"));
    }

    #[tokio::test]
    async fn full_season_succeeds() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pipeline = pipeline(&[], &dir).await;
        let request = SeasonRequest {
            mode: GenerationMode::Thematic,
            theme: "Robots".to_string(),
            style: ArtStyle::Cyberpunk,
            custom_names: None,
        };
        let mut out = Vec::new();
        let summary = pipeline
            .generate_season(&request, &mut out)
            .await
            .expect("run");
        assert!(summary.success());
        assert_eq!(summary.success_count, 70);

        let stored = cards::for_season(&pipeline.db, pipeline.season())
            .await
            .expect("fetch cards");
        assert_eq!(stored.len(), 70);
        assert_eq!(stored[69].rarity, "secret");
    }

    /// Output that went away, eg a closed pipe.
    struct BrokenOutput;

    impl Write for BrokenOutput {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[tokio::test]
    async fn broken_output_does_not_lose_stored_cards() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pipeline = pipeline(&[], &dir).await;
        let concepts = vec![concept(0, "Card A"), concept(1, "Card B")];

        let summary = pipeline
            .run(concepts, ArtStyle::Cute, &mut BrokenOutput)
            .await
            .expect("run");
        assert_eq!(summary.success_count, 2);

        let stored = cards::for_season(&pipeline.db, pipeline.season())
            .await
            .expect("fetch cards");
        assert_eq!(stored.len(), 2);
    }

    #[test]
    fn report_lists_counts_and_link() {
        let summary = GenerationSummary {
            season_id: "2025_S3_v1".parse::<SeasonId>().expect("valid season"),
            success_count: 2,
            failure_count: 1,
            elapsed_seconds: 90.0,
            failed: vec!["Card B".to_string()],
        };
        let mut out = Vec::new();
        summary
            .report(&mut out, "file:///tmp/cardgen.sqlite")
            .expect("report");
        let shown = String::from_utf8(out).expect("utf8");
        assert!(shown.contains("Successful: 2/3"));
        assert!(shown.contains("Failed: 1/3"));
        assert!(shown.contains("Time: 1.5 minutes"));
        assert!(shown.contains("completed with 1 failures"));
        assert!(shown.contains("Collection: seasons/2025_S3_v1/cards"));
        assert!(shown.contains("file:///tmp/cardgen.sqlite"));
    }
}
