// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::super::connection::BotContext;
use super::super::interactions::open_ticket_button;
use super::super::utils::responses::ephemeral_text_response;
use miette::{IntoDiagnostic, bail};
use std::sync::Arc;
use twilight_model::application::command::{Command, CommandType};
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::guild::Permissions;
use twilight_util::builder::command::CommandBuilder;

const OPENER_MESSAGE: &str = "Trading with someone you don't know? Use the server's rekber service: press the button below, fill in the transaction details, and a private channel is created where staff hold the payment until both sides have delivered.";

pub fn command_definition() -> Command {
	CommandBuilder::new("setup", "Post the rekber ticket opener in this channel", CommandType::ChatInput)
		.dm_permission(false)
		.default_member_permissions(Permissions::MANAGE_GUILD)
		.build()
}

pub async fn handle_command(interaction: &InteractionCreate, context: &Arc<BotContext>) -> miette::Result<()> {
	let Some(channel) = &interaction.channel else {
		bail!("Setup command was used outside of a channel");
	};

	context
		.http
		.create_message(channel.id)
		.content(OPENER_MESSAGE)
		.components(&[open_ticket_button()])
		.await
		.into_diagnostic()?;

	let response = ephemeral_text_response("Ticket opener posted.");
	context
		.interaction_client()
		.create_response(interaction.id, &interaction.token, &response)
		.await
		.into_diagnostic()?;

	Ok(())
}
