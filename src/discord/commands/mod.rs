// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::connection::BotContext;
use miette::bail;
use std::sync::Arc;
use twilight_model::application::command::Command;
use twilight_model::application::interaction::application_command::CommandData;
use twilight_model::gateway::payload::incoming::InteractionCreate;

mod setup;

pub fn command_definitions() -> Vec<Command> {
	vec![setup::command_definition()]
}

pub async fn route_command(
	interaction: &InteractionCreate,
	command_data: &CommandData,
	context: &Arc<BotContext>,
) -> miette::Result<()> {
	match command_data.name.as_str() {
		"setup" => setup::handle_command(interaction, context).await,
		_ => bail!("Unknown command: {}", command_data.name),
	}
}
