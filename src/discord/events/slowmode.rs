// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::super::connection::BotContext;
use crate::slowmode::{Gate, SlowmodeGate, format_remaining};
use miette::IntoDiagnostic;
use std::sync::Arc;
use tokio::time::{Duration, sleep};
use twilight_http::client::Client;
use twilight_mention::fmt::Mention;
use twilight_model::channel::message::Message;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, MessageMarker};

const WARNING_LIFETIME: Duration = Duration::from_secs(5);

/// Applies the cooldown to a message in a slowmode channel. Returns whether
/// the message was suppressed.
pub async fn enforce(message: &Message, context: &Arc<BotContext>) -> miette::Result<bool> {
	let config = &context.config.slowmode;
	if !config.channels.contains(&message.channel_id.get()) {
		return Ok(false);
	}

	let privileged_role = Id::new(config.privileged_role);
	let privileged = message
		.member
		.as_ref()
		.is_some_and(|member| member.roles.contains(&privileged_role));

	let verdict = {
		let mut state = context.state.write().await;
		let gate = state
			.entry::<SlowmodeGate>()
			.or_insert_with(|| SlowmodeGate::new(config.privileged_seconds, config.standard_seconds));
		let verdict = gate.check(message.author.id, message.channel_id, privileged);
		gate.prune();
		verdict
	};

	let Gate::Deny { remaining_seconds } = verdict else {
		return Ok(false);
	};

	context
		.http
		.delete_message(message.channel_id, message.id)
		.await
		.into_diagnostic()?;

	let warning_content = format!(
		"{}, slow down! You can send another message here in {}.",
		message.author.id.mention(),
		format_remaining(remaining_seconds)
	);
	let warning_response = context
		.http
		.create_message(message.channel_id)
		.content(&warning_content)
		.await
		.into_diagnostic()?;
	let warning = warning_response.model().await.into_diagnostic()?;
	tokio::spawn(remove_warning(
		Arc::clone(&context.http),
		message.channel_id,
		warning.id,
	));

	Ok(true)
}

async fn remove_warning(http: Arc<Client>, channel: Id<ChannelMarker>, message: Id<MessageMarker>) {
	sleep(WARNING_LIFETIME).await;
	if let Err(error) = http.delete_message(channel, message).await {
		tracing::warn!(source = ?error, "failed to remove a slowmode warning");
	}
}
