// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::connection::BotContext;
use super::utils::summary::archive_embed;
use crate::model::{Disposition, Ticket};
use chrono::Utc;
use miette::IntoDiagnostic;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::task::AbortHandle;
use tokio::time::{Duration, sleep};
use twilight_http::client::Client;
use twilight_model::id::Id;
use twilight_model::id::marker::ChannelMarker;

/// Posts the durable summary record for a closed ticket to the archive
/// channel. Callers treat failure as non-fatal; the transition has already
/// happened.
pub async fn post_archive(context: &BotContext, ticket: &Ticket, disposition: Disposition) -> miette::Result<()> {
	let embed = archive_embed(ticket, disposition, Utc::now()).into_diagnostic()?;
	let archive_channel = Id::new(context.config.tickets.archive_channel);
	context
		.http
		.create_message(archive_channel)
		.embeds(&[embed])
		.await
		.into_diagnostic()?;
	Ok(())
}

#[derive(Debug)]
struct PendingDeletion {
	channel: Id<ChannelMarker>,
	abort: AbortHandle,
}

/// Deferred deletion of closed ticket channels.
///
/// Each deletion is a one-shot task keyed by ticket id. Tasks capture only the
/// channel and ticket ids, never ticket state, and unregister themselves when
/// they fire; a deletion that has become pointless (the channel is already
/// gone) can be cancelled instead.
#[derive(Debug, Default)]
pub struct ChannelReaper {
	pending: Mutex<HashMap<u64, PendingDeletion>>,
}

impl ChannelReaper {
	pub fn schedule(self: Arc<Self>, http: Arc<Client>, ticket_id: u64, channel: Id<ChannelMarker>, delay: Duration) {
		let reaper = Arc::clone(&self);
		let task = tokio::spawn(async move {
			sleep(delay).await;
			if let Err(error) = http.delete_channel(channel).await {
				tracing::warn!(source = ?error, ticket_id, "failed to delete closed ticket channel");
			}
			if let Ok(mut pending) = reaper.pending.lock() {
				pending.remove(&ticket_id);
			}
		});
		let deletion = PendingDeletion {
			channel,
			abort: task.abort_handle(),
		};
		if let Ok(mut pending) = self.pending.lock() {
			if let Some(previous) = pending.insert(ticket_id, deletion) {
				previous.abort.abort();
			}
		}
	}

	pub fn cancel(&self, ticket_id: u64) -> bool {
		let Ok(mut pending) = self.pending.lock() else {
			return false;
		};
		match pending.remove(&ticket_id) {
			Some(deletion) => {
				deletion.abort.abort();
				true
			}
			None => false,
		}
	}

	pub fn cancel_for_channel(&self, channel: Id<ChannelMarker>) -> bool {
		let Ok(mut pending) = self.pending.lock() else {
			return false;
		};
		let ticket_id = pending
			.iter()
			.find(|(_, deletion)| deletion.channel == channel)
			.map(|(ticket_id, _)| *ticket_id);
		match ticket_id {
			Some(ticket_id) => {
				if let Some(deletion) = pending.remove(&ticket_id) {
					deletion.abort.abort();
				}
				true
			}
			None => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn test_client() -> Arc<Client> {
		Arc::new(Client::new(String::from("test-token")))
	}

	#[tokio::test(start_paused = true)]
	async fn scheduled_deletion_can_be_cancelled_by_ticket() {
		let reaper = Arc::new(ChannelReaper::default());
		Arc::clone(&reaper).schedule(test_client(), 1, Id::new(100), Duration::from_secs(5));
		assert!(reaper.cancel(1));
		assert!(!reaper.cancel(1));
	}

	#[tokio::test(start_paused = true)]
	async fn scheduled_deletion_can_be_cancelled_by_channel() {
		let reaper = Arc::new(ChannelReaper::default());
		Arc::clone(&reaper).schedule(test_client(), 1, Id::new(100), Duration::from_secs(5));
		assert!(reaper.cancel_for_channel(Id::new(100)));
		assert!(!reaper.cancel(1));
	}

	#[tokio::test(start_paused = true)]
	async fn rescheduling_replaces_the_earlier_deletion() {
		let reaper = Arc::new(ChannelReaper::default());
		Arc::clone(&reaper).schedule(test_client(), 1, Id::new(100), Duration::from_secs(5));
		Arc::clone(&reaper).schedule(test_client(), 1, Id::new(100), Duration::from_secs(5));
		assert!(reaper.cancel(1));
		assert!(!reaper.cancel(1));
	}
}
