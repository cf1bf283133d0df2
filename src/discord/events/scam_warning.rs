// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::super::connection::BotContext;
use miette::IntoDiagnostic;
use std::collections::HashMap;
use std::sync::Arc;
use twilight_model::channel::message::Message;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, MessageMarker};

const SCAM_WARNING: &str = "**Beware of scams!** Always transact through the server's rekber service. Staff never DM you first about a deal. Never pay outside a ticket channel, and report suspicious offers to the admins.";

/// The most recent warning the bot posted per channel, replaced on every
/// repost.
#[derive(Debug, Default)]
pub struct ScamWarningState {
	last_warning: HashMap<Id<ChannelMarker>, Id<MessageMarker>>,
}

/// Keeps the anti-scam warning the latest message in the warning channel:
/// every user message buries it, so the stale copy is deleted and a fresh one
/// posted.
pub async fn refresh(message: &Message, context: &Arc<BotContext>) -> miette::Result<()> {
	if message.channel_id.get() != context.config.scam_warning.channel {
		return Ok(());
	}

	let previous = {
		let mut state = context.state.write().await;
		let warning_state = state.entry::<ScamWarningState>().or_insert_with(ScamWarningState::default);
		warning_state.last_warning.remove(&message.channel_id)
	};
	if let Some(previous_id) = previous {
		if let Err(error) = context.http.delete_message(message.channel_id, previous_id).await {
			tracing::warn!(source = ?error, "failed to delete a stale scam warning");
		}
	}

	let warning_response = context
		.http
		.create_message(message.channel_id)
		.content(SCAM_WARNING)
		.await
		.into_diagnostic()?;
	let warning = warning_response.model().await.into_diagnostic()?;

	let mut state = context.state.write().await;
	let warning_state = state.entry::<ScamWarningState>().or_insert_with(ScamWarningState::default);
	warning_state.last_warning.insert(message.channel_id, warning.id);

	Ok(())
}
