//! The roster-to-deck pipeline.
//!
//! Sequencing: resolve the roster, then for each survivor acquire an image
//! and append a slide, then persist the deck, then release the image store.
//! Roster resolution and deck persistence failures are fatal; everything
//! per-member is recoverable. The image store is released on every exit
//! path, fatal ones included, and a cleanup failure is only ever logged.

use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};

use rosterdeck_assets::{ImageFetcher, ImageStore};
use rosterdeck_deck::Deck;
use rosterdeck_slack::profile::non_empty;
use rosterdeck_slack::{resolve_roster, SlackClient, SlackConfig, UserProfile};

/// Default output path, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "team_directory.pptx";
/// Default image directory, relative to the working directory.
pub const DEFAULT_IMAGE_DIR: &str = "temp_images";

/// Where the pipeline reads and writes on disk.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Path the generated deck is written to (overwritten each run).
    pub output_path: PathBuf,
    /// Directory for downloaded profile images, deleted at teardown.
    pub image_dir: PathBuf,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
        }
    }
}

/// How a successful pipeline run ended.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// The deck was generated and persisted.
    Completed {
        /// Where the deck was written.
        output_path: PathBuf,
        /// Total slides, title slide included.
        slide_count: usize,
    },
    /// The channel had no members; nothing was generated.
    NoMembers,
}

/// Run the full pipeline once.
///
/// Returns an error only for fatal outcomes (roster resolution, deck
/// persistence); per-member problems are logged and skipped.
pub async fn run(
    config: &SlackConfig,
    client: &SlackClient,
    options: &PipelineOptions,
) -> anyhow::Result<PipelineOutcome> {
    let store = ImageStore::create(&options.image_dir).with_context(|| {
        format!(
            "Failed to create image directory {}",
            options.image_dir.display()
        )
    })?;

    let resolution = match resolve_roster(client, config.channel_id()).await {
        Ok(resolution) => resolution,
        Err(err) => {
            release_store(&store);
            return Err(err).context("Failed to resolve channel roster");
        }
    };

    for excluded in &resolution.excluded {
        info!("Excluded {}: {}", excluded.member_id, excluded.reason);
    }

    if resolution.member_count() == 0 {
        info!("No users found in the channel");
        release_store(&store);
        return Ok(PipelineOutcome::NoMembers);
    }

    let fetcher = ImageFetcher::new();
    let mut deck = Deck::new();

    for profile in &resolution.survivors {
        let image = fetcher
            .acquire(&store, &profile.id, &profile.image_candidates())
            .await;
        match deck.add_member(profile.display_name(), image, member_facts(profile)) {
            Ok(()) => info!("Created slide for {}", profile.display_name()),
            Err(err) => warn!("Skipping slide for user {}: {}", profile.id, err),
        }
    }

    let saved = deck.save(&options.output_path).with_context(|| {
        format!("Failed to save deck to {}", options.output_path.display())
    });
    release_store(&store);
    saved?;

    info!("Deck saved to {}", options.output_path.display());
    Ok(PipelineOutcome::Completed {
        output_path: options.output_path.clone(),
        slide_count: deck.slide_count(),
    })
}

/// Release the image store; failures are reported, never escalated.
fn release_store(store: &ImageStore) {
    match store.cleanup() {
        Ok(()) => info!("Cleaned up temporary images"),
        Err(err) => warn!("Error cleaning up image directory: {}", err),
    }
}

/// Contact facts for one member slide, in fixed order, empty fields dropped.
fn member_facts(profile: &UserProfile) -> Vec<String> {
    let mut facts = Vec::new();
    if let Some(title) = non_empty(profile.title.as_deref()) {
        facts.push(format!("Title: {title}"));
    }
    if let Some(email) = non_empty(profile.email.as_deref()) {
        facts.push(format!("Email: {email}"));
    }
    if let Some(phone) = non_empty(profile.phone.as_deref()) {
        facts.push(format!("Phone: {phone}"));
    }
    if let Some(timezone) = non_empty(profile.timezone.as_deref()) {
        facts.push(format!("Timezone: {timezone}"));
    }
    facts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: "U1".to_string(),
            username: "ada".to_string(),
            real_name: Some("Ada Lovelace".to_string()),
            title: Some("Engineer".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: Some("+44 20 7946 0000".to_string()),
            timezone: Some("Europe/London".to_string()),
            image_original: None,
            image_512: None,
            image_192: None,
            is_bot: false,
            deleted: false,
        }
    }

    #[test]
    fn test_member_facts_fixed_order() {
        let facts = member_facts(&profile());
        assert_eq!(
            facts,
            vec![
                "Title: Engineer",
                "Email: ada@example.com",
                "Phone: +44 20 7946 0000",
                "Timezone: Europe/London",
            ]
        );
    }

    #[test]
    fn test_member_facts_drop_empty_fields() {
        let mut p = profile();
        p.email = None;
        p.phone = Some(String::new());
        let facts = member_facts(&p);
        assert_eq!(facts, vec!["Title: Engineer", "Timezone: Europe/London"]);
    }

    #[test]
    fn test_member_facts_all_empty() {
        let mut p = profile();
        p.title = None;
        p.email = None;
        p.phone = None;
        p.timezone = None;
        assert!(member_facts(&p).is_empty());
    }
}
