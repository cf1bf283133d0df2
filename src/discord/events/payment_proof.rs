// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::super::connection::BotContext;
use crate::model::TicketStatus;
use crate::tickets::TicketRegistry;
use miette::IntoDiagnostic;
use std::collections::HashMap;
use std::sync::Arc;
use twilight_mention::fmt::Mention;
use twilight_model::channel::message::Message;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, MessageMarker};

/// The most recent acknowledgement per ticket channel; a newer screenshot
/// supersedes it.
#[derive(Debug, Default)]
pub struct PaymentAckState {
	last_ack: HashMap<Id<ChannelMarker>, Id<MessageMarker>>,
}

/// Acknowledges a payment screenshot posted into a live ticket channel so the
/// sender knows staff will pick it up.
pub async fn acknowledge(message: &Message, context: &Arc<BotContext>) -> miette::Result<()> {
	let has_screenshot = message.attachments.iter().any(|attachment| {
		attachment
			.content_type
			.as_deref()
			.is_some_and(|content_type| content_type.starts_with("image/"))
	});
	if !has_screenshot {
		return Ok(());
	}

	let ticket_open = {
		let state = context.state.read().await;
		state
			.get::<TicketRegistry>()
			.and_then(|registry| registry.find_by_channel(message.channel_id))
			.is_some_and(|ticket| ticket.status == TicketStatus::Pending)
	};
	if !ticket_open {
		return Ok(());
	}

	let previous = {
		let mut state = context.state.write().await;
		let ack_state = state.entry::<PaymentAckState>().or_insert_with(PaymentAckState::default);
		ack_state.last_ack.remove(&message.channel_id)
	};
	if let Some(previous_id) = previous {
		if let Err(error) = context.http.delete_message(message.channel_id, previous_id).await {
			tracing::warn!(source = ?error, "failed to delete an earlier payment acknowledgement");
		}
	}

	let acknowledgement = format!(
		"Payment screenshot from {} received. An admin will verify it before the deal is completed.",
		message.author.id.mention()
	);
	let ack_response = context
		.http
		.create_message(message.channel_id)
		.content(&acknowledgement)
		.await
		.into_diagnostic()?;
	let ack = ack_response.model().await.into_diagnostic()?;

	let mut state = context.state.write().await;
	let ack_state = state.entry::<PaymentAckState>().or_insert_with(PaymentAckState::default);
	ack_state.last_ack.insert(message.channel_id, ack.id);

	Ok(())
}
