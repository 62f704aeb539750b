//! Slack Web API access for rosterdeck.
//!
//! This crate covers the read-only slice of the Slack API that the deck
//! generator needs:
//! - Token and channel configuration (`SlackConfig`)
//! - A typed client for `auth.test`, `conversations.info`,
//!   `conversations.members`, and `users.info` (`SlackClient`)
//! - Roster resolution: membership page → ordered, filtered user profiles
//!   (`resolve_roster`)
//!
//! # Example
//!
//! ```rust,ignore
//! use rosterdeck_slack::{SlackClient, SlackConfig, resolve_roster};
//!
//! let config = SlackConfig::from_env()?;
//! let client = SlackClient::new(&config)?;
//! let roster = resolve_roster(&client, config.channel_id()).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod profile;
pub mod roster;

pub use client::{AuthIdentity, ChannelInfo, MemberPage, SlackClient, DEFAULT_SLACK_API_URL};
pub use config::SlackConfig;
pub use error::{SlackError, SlackResult};
pub use profile::UserProfile;
pub use roster::{resolve_roster, ExcludedMember, ExclusionReason, RosterResolution};
