// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::super::archive::post_archive;
use super::super::connection::BotContext;
use super::super::utils::permissions::{is_administrator, participant_overwrite};
use super::super::utils::responses::{domain_error_response, ephemeral_text_response, update_message_response};
use super::super::utils::summary::{summary_embed, ticket_components};
use super::super::utils::users::is_bot;
use crate::model::{Disposition, TicketError, TradeRole};
use crate::tickets::{CloseOutcome, TicketRegistry};
use miette::{IntoDiagnostic, bail};
use std::sync::Arc;
use tokio::time::Duration;
use twilight_mention::fmt::Mention;
use twilight_model::application::interaction::message_component::MessageComponentInteractionData;
use twilight_model::channel::permission_overwrite::PermissionOverwriteType;
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::http::permission_overwrite::{
	PermissionOverwrite as HttpPermissionOverwrite, PermissionOverwriteType as HttpPermissionOverwriteType,
};
use twilight_model::id::Id;
use twilight_util::builder::InteractionResponseDataBuilder;

pub async fn route_ticket_interaction(
	interaction: &InteractionCreate,
	interaction_data: &MessageComponentInteractionData,
	custom_id_path: &[String],
	context: &Arc<BotContext>,
) -> miette::Result<()> {
	let Some(id) = custom_id_path.get(1) else {
		bail!("Invalid custom ID for ticket controls (parts: {:?})", custom_id_path);
	};
	let Some(action) = custom_id_path.get(2) else {
		bail!("Invalid custom ID for ticket controls (parts: {:?})", custom_id_path);
	};
	let Ok(ticket_id) = id.parse::<u64>() else {
		bail!("Non-numeric ticket ID in custom ID (parts: {:?})", custom_id_path);
	};

	match action.as_str() {
		"complete" => close_ticket(interaction, ticket_id, Disposition::Completed, context).await?,
		"cancel" => close_ticket(interaction, ticket_id, Disposition::Cancelled, context).await?,
		_ => match TradeRole::from_id(action) {
			Some(role) => assign_participant(interaction, interaction_data, ticket_id, role, context).await?,
			None => bail!(
				"Invalid action for ticket controls: {} (custom ID parts: {:?})",
				action,
				custom_id_path
			),
		},
	}

	Ok(())
}

async fn close_ticket(
	interaction: &InteractionCreate,
	ticket_id: u64,
	disposition: Disposition,
	context: &Arc<BotContext>,
) -> miette::Result<()> {
	let Some(interaction_member) = &interaction.member else {
		bail!("Interaction isn't from a user");
	};
	let Some(interaction_user) = &interaction_member.user else {
		bail!("Interaction member is not a user");
	};
	let actor_is_admin = is_administrator(interaction_member);

	let interaction_client = context.interaction_client();

	// The guard check and the status write happen in one registry call under
	// the write lock, so two rapid presses can't both observe "pending".
	let outcome = {
		let mut state = context.state.write().await;
		let Some(registry) = state.get_mut::<TicketRegistry>() else {
			let response = domain_error_response(&TicketError::TicketNotFound);
			drop(state);
			interaction_client
				.create_response(interaction.id, &interaction.token, &response)
				.await
				.into_diagnostic()?;
			return Ok(());
		};
		registry.close(ticket_id, disposition, interaction_user.id, actor_is_admin)
	};

	let ticket = match outcome {
		Ok(CloseOutcome::Closed(ticket)) => ticket,
		Ok(CloseOutcome::AlreadyClosed) => {
			let response = ephemeral_text_response("This ticket is already closed.");
			interaction_client
				.create_response(interaction.id, &interaction.token, &response)
				.await
				.into_diagnostic()?;
			return Ok(());
		}
		Err(error) => {
			let response = domain_error_response(&error);
			interaction_client
				.create_response(interaction.id, &interaction.token, &response)
				.await
				.into_diagnostic()?;
			return Ok(());
		}
	};

	// From here on the transition has happened; none of the remaining side
	// effects may undo it or keep it from being archived.
	let rendered = match summary_embed(&ticket) {
		Ok(embed) => Some(embed),
		Err(error) => {
			tracing::warn!(source = ?error, ticket_id, "failed to render closed-ticket summary");
			None
		}
	};
	let summary_data = {
		let mut builder = InteractionResponseDataBuilder::new().components(Vec::new());
		if let Some(embed) = rendered.clone() {
			builder = builder.embeds([embed]);
		}
		builder.build()
	};
	let response = update_message_response(summary_data);
	let response_result = interaction_client
		.create_response(interaction.id, &interaction.token, &response)
		.await;
	if let Err(error) = response_result {
		tracing::warn!(source = ?error, ticket_id, "failed to update closed-ticket summary");
		// The summary message is known independently of the interaction, so
		// the terminal state can still be rendered onto it.
		if let (Some(message_id), Some(embed)) = (ticket.summary_message, rendered) {
			let edit_result = context
				.http
				.update_message(ticket.channel, message_id)
				.embeds(Some(&[embed]))
				.components(Some(&[]))
				.await;
			if let Err(error) = edit_result {
				tracing::warn!(source = ?error, ticket_id, "failed to edit closed-ticket summary");
			}
		}
	}

	if let Err(error) = post_archive(context, &ticket, disposition).await {
		tracing::warn!(source = ?error, ticket_id, "failed to emit archive record");
	}

	let admin_notification = format!(
		"Ticket #{} was {} by {}.",
		ticket.id,
		disposition.to_string().to_lowercase(),
		interaction_user.id.mention(),
	);
	let notify_result = context
		.http
		.create_message(Id::new(context.config.tickets.admin_channel))
		.content(&admin_notification)
		.await;
	if let Err(error) = notify_result {
		tracing::warn!(source = ?error, ticket_id, "failed to notify admins of a closed ticket");
	}

	{
		let mut state = context.state.write().await;
		if let Some(registry) = state.get_mut::<TicketRegistry>() {
			registry.remove(ticket_id);
		}
	}

	let delay = Duration::from_secs(context.config.tickets.teardown_delay_seconds);
	Arc::clone(&context.reaper).schedule(Arc::clone(&context.http), ticket_id, ticket.channel, delay);

	Ok(())
}

async fn assign_participant(
	interaction: &InteractionCreate,
	interaction_data: &MessageComponentInteractionData,
	ticket_id: u64,
	role: TradeRole,
	context: &Arc<BotContext>,
) -> miette::Result<()> {
	let Some(target_raw) = interaction_data.values.first() else {
		bail!("Missing user selection handling a role assignment");
	};
	let Ok(target) = target_raw.parse::<u64>() else {
		bail!("Non-numeric user ID in a role assignment: {}", target_raw);
	};
	let target = Id::new(target);

	let target_is_bot = match interaction_data
		.resolved
		.as_ref()
		.and_then(|resolved| resolved.users.get(&target))
	{
		Some(user) => user.bot,
		None => is_bot(context, target).await?,
	};

	let interaction_client = context.interaction_client();

	let result = {
		let mut state = context.state.write().await;
		let Some(registry) = state.get_mut::<TicketRegistry>() else {
			let response = domain_error_response(&TicketError::TicketNotFound);
			drop(state);
			interaction_client
				.create_response(interaction.id, &interaction.token, &response)
				.await
				.into_diagnostic()?;
			return Ok(());
		};
		registry.add_participant(ticket_id, role, target, target_is_bot)
	};

	let ticket = match result {
		Ok(ticket) => ticket,
		Err(error) => {
			let response = domain_error_response(&error);
			interaction_client
				.create_response(interaction.id, &interaction.token, &response)
				.await
				.into_diagnostic()?;
			return Ok(());
		}
	};

	// `update_channel_permission` takes the HTTP-model overwrite, whereas
	// `participant_overwrite` yields the channel-model one (shared with channel
	// creation). Bridge between the two structurally-identical types.
	let overwrite = participant_overwrite(target);
	let http_overwrite = HttpPermissionOverwrite {
		allow: Some(overwrite.allow),
		deny: Some(overwrite.deny),
		id: overwrite.id,
		kind: match overwrite.kind {
			PermissionOverwriteType::Role => HttpPermissionOverwriteType::Role,
			_ => HttpPermissionOverwriteType::Member,
		},
	};
	context
		.http
		.update_channel_permission(ticket.channel, &http_overwrite)
		.await
		.into_diagnostic()?;

	// Re-assigning the same user repeats this announcement; the participant
	// set itself is idempotent.
	let announcement = format!("{} joins the transaction as the {}.", target.mention(), role.name());
	let announce_result = context.http.create_message(ticket.channel).content(&announcement).await;
	if let Err(error) = announce_result {
		tracing::warn!(source = ?error, ticket_id, "failed to announce a role assignment");
	}

	let embed = summary_embed(&ticket).into_diagnostic()?;
	let data = InteractionResponseDataBuilder::new()
		.embeds([embed])
		.components(ticket_components(ticket.id))
		.build();
	interaction_client
		.create_response(interaction.id, &interaction.token, &update_message_response(data))
		.await
		.into_diagnostic()?;

	Ok(())
}
