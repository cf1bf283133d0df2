// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::super::connection::BotContext;
use super::super::utils::permissions::ticket_channel_overwrites;
use super::super::utils::responses::{domain_error_response, ephemeral_text_response};
use super::super::utils::summary::{format_amount, summary_embed, ticket_components};
use super::super::utils::timestamp::datetime_from_id;
use super::super::utils::users::bot_user_id;
use crate::fees::parse_nominal;
use crate::tickets::{TicketForm, TicketRegistry};
use chrono::Utc;
use miette::{IntoDiagnostic, bail, ensure};
use std::sync::Arc;
use twilight_mention::fmt::Mention;
use twilight_model::application::interaction::modal::ModalInteractionData;
use twilight_model::channel::ChannelType;
use twilight_model::channel::message::component::{ActionRow, Button, ButtonStyle, Component, TextInput, TextInputStyle};
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseType};
use twilight_model::id::Id;
use twilight_util::builder::InteractionResponseDataBuilder;

/// The standing button users press to start a rekber transaction.
pub fn open_ticket_button() -> Component {
	let open_button = Button {
		custom_id: Some(String::from("open_ticket//start")),
		disabled: false,
		emoji: None,
		label: Some(String::from("Open Rekber Ticket")),
		style: ButtonStyle::Primary,
		url: None,
		sku_id: None,
	};
	Component::ActionRow(ActionRow {
		components: vec![Component::Button(open_button)],
	})
}

pub async fn route_open_ticket_interaction(
	interaction: &InteractionCreate,
	custom_id_path: &[String],
	context: &Arc<BotContext>,
) -> miette::Result<()> {
	let Some(id) = custom_id_path.get(1) else {
		bail!("Invalid custom ID for ticket opening (parts: {:?})", custom_id_path);
	};
	let Some(action) = custom_id_path.get(2) else {
		bail!("Invalid custom ID for ticket opening (parts: {:?})", custom_id_path);
	};

	match action.as_str() {
		"start" => {
			ensure!(id.is_empty(), "Unexpected ID when opening a ticket");
			show_ticket_form(interaction, context).await?;
		}
		_ => bail!(
			"Invalid action for ticket opening: {} (custom ID parts: {:?})",
			action,
			custom_id_path
		),
	}

	Ok(())
}

pub async fn route_open_ticket_modal(
	interaction: &InteractionCreate,
	modal_data: &ModalInteractionData,
	custom_id_path: &[String],
	context: &Arc<BotContext>,
) -> miette::Result<()> {
	let Some(action) = custom_id_path.get(2) else {
		bail!("Invalid custom ID for ticket form (parts: {:?})", custom_id_path);
	};

	if action == "form" {
		handle_ticket_form(interaction, modal_data, context).await?;
	} else {
		bail!(
			"Invalid action for ticket form: {} (custom ID parts: {:?})",
			action,
			custom_id_path
		);
	}

	Ok(())
}

fn short_input(custom_id: &str, label: &str, placeholder: &str) -> Component {
	let input = TextInput {
		custom_id: custom_id.to_string(),
		label: label.to_string(),
		max_length: Some(100),
		min_length: None,
		placeholder: Some(placeholder.to_string()),
		required: Some(true),
		style: TextInputStyle::Short,
		value: None,
	};
	Component::ActionRow(ActionRow {
		components: vec![Component::TextInput(input)],
	})
}

async fn show_ticket_form(interaction: &InteractionCreate, context: &Arc<BotContext>) -> miette::Result<()> {
	let components = vec![
		short_input("buyer", "Buyer", "Username or contact of the buyer"),
		short_input("seller", "Seller", "Username or contact of the seller"),
		short_input("item", "Item", "What is being traded"),
		short_input("nominal", "Amount", "Transaction value, e.g. 30000"),
		short_input("payment_method", "Payment Method", "e.g. bank transfer, e-wallet"),
	];

	let response = InteractionResponseDataBuilder::new()
		.custom_id("open_ticket//form")
		.title("Open Rekber Ticket")
		.components(components)
		.build();
	let response = InteractionResponse {
		kind: InteractionResponseType::Modal,
		data: Some(response),
	};
	context
		.interaction_client()
		.create_response(interaction.id, &interaction.token, &response)
		.await
		.into_diagnostic()?;

	Ok(())
}

/// Ticket channels are named for their creator; Discord only allows lowercase
/// alphanumerics and dashes.
fn ticket_channel_name(username: &str) -> String {
	let mut name = String::from("rekber-");
	for character in username.chars() {
		if character.is_ascii_alphanumeric() {
			name.push(character.to_ascii_lowercase());
		} else if !name.ends_with('-') {
			name.push('-');
		}
	}
	name.trim_end_matches('-').to_string()
}

async fn handle_ticket_form(
	interaction: &InteractionCreate,
	modal_data: &ModalInteractionData,
	context: &Arc<BotContext>,
) -> miette::Result<()> {
	let Some(guild_id) = interaction.guild_id else {
		bail!("Ticket form submitted outside of a guild");
	};
	let Some(interaction_member) = &interaction.member else {
		bail!("Interaction isn't from a user");
	};
	let Some(interaction_user) = &interaction_member.user else {
		bail!("Interaction member is not a user");
	};

	let mut buyer_label: Option<String> = None;
	let mut seller_label: Option<String> = None;
	let mut item: Option<String> = None;
	let mut nominal_raw: Option<String> = None;
	let mut payment_method: Option<String> = None;

	for row in modal_data.components.iter() {
		for component in row.components.iter() {
			match component.custom_id.as_str() {
				"buyer" => buyer_label = component.value.clone(),
				"seller" => seller_label = component.value.clone(),
				"item" => item = component.value.clone(),
				"nominal" => nominal_raw = component.value.clone(),
				"payment_method" => payment_method = component.value.clone(),
				_ => (),
			}
		}
	}

	let interaction_client = context.interaction_client();

	let (Some(buyer_label), Some(seller_label), Some(item), Some(nominal_raw), Some(payment_method)) =
		(buyer_label, seller_label, item, nominal_raw, payment_method)
	else {
		let response = ephemeral_text_response("Ticket not opened: missing required data.");
		interaction_client
			.create_response(interaction.id, &interaction.token, &response)
			.await
			.into_diagnostic()?;
		return Ok(());
	};

	let nominal = match parse_nominal(&nominal_raw) {
		Ok(nominal) => nominal,
		Err(error) => {
			let response = domain_error_response(&error);
			interaction_client
				.create_response(interaction.id, &interaction.token, &response)
				.await
				.into_diagnostic()?;
			return Ok(());
		}
	};

	// The channel is created before the ticket is registered; a creation
	// failure must leave no registry entry behind.
	let bot_user = bot_user_id(context).await?;
	let overwrites = ticket_channel_overwrites(guild_id, interaction_user.id, bot_user);
	let channel_name = ticket_channel_name(&interaction_user.name);
	let channel_result = context
		.http
		.create_guild_channel(guild_id, &channel_name)
		.kind(ChannelType::GuildText)
		.parent_id(Id::new(context.config.tickets.category))
		.permission_overwrites(&overwrites)
		.await;
	let channel = match channel_result {
		Ok(response) => response.model().await.into_diagnostic()?,
		Err(error) => {
			tracing::error!(source = ?error, "failed to create a ticket channel");
			let response = ephemeral_text_response("Your ticket channel couldn't be created. Please try again later.");
			interaction_client
				.create_response(interaction.id, &interaction.token, &response)
				.await
				.into_diagnostic()?;
			return Ok(());
		}
	};

	let created_at = datetime_from_id(interaction.id).unwrap_or_else(Utc::now);
	let form = TicketForm {
		creator: interaction_user.id,
		buyer_label,
		seller_label,
		item,
		nominal,
		payment_method,
	};
	let ticket = {
		let mut state = context.state.write().await;
		let registry = state.entry::<TicketRegistry>().or_insert_with(TicketRegistry::new);
		registry.open(form, channel.id, created_at).clone()
	};

	let embed = summary_embed(&ticket).into_diagnostic()?;
	let summary_response = context
		.http
		.create_message(channel.id)
		.embeds(&[embed])
		.components(&ticket_components(ticket.id))
		.await
		.into_diagnostic()?;
	let summary_message = summary_response.model().await.into_diagnostic()?;
	{
		let mut state = context.state.write().await;
		if let Some(registry) = state.get_mut::<TicketRegistry>() {
			registry.set_summary_message(ticket.id, summary_message.id);
		}
	}

	let admin_notification = format!(
		"Ticket #{} opened by {} in {}: {} for {} (fee {}, total {}).",
		ticket.id,
		interaction_user.id.mention(),
		channel.id.mention(),
		ticket.item,
		format_amount(ticket.nominal),
		format_amount(ticket.fee),
		format_amount(ticket.total()),
	);
	let notify_result = context
		.http
		.create_message(Id::new(context.config.tickets.admin_channel))
		.content(&admin_notification)
		.await;
	if let Err(error) = notify_result {
		tracing::warn!(source = ?error, ticket_id = ticket.id, "failed to notify admins of a new ticket");
	}

	let response = ephemeral_text_response(format!("Ticket #{} opened: {}", ticket.id, channel.id.mention()));
	interaction_client
		.create_response(interaction.id, &interaction.token, &response)
		.await
		.into_diagnostic()?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn channel_names_are_sanitized_for_discord() {
		assert_eq!(ticket_channel_name("Budi"), "rekber-budi");
		assert_eq!(ticket_channel_name("budi santoso"), "rekber-budi-santoso");
		assert_eq!(ticket_channel_name("☆彡"), "rekber");
	}
}
