// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::connection::BotContext;
use miette::bail;
use std::sync::Arc;
use twilight_model::application::interaction::message_component::MessageComponentInteractionData;
use twilight_model::application::interaction::modal::ModalInteractionData;
use twilight_model::gateway::payload::incoming::InteractionCreate;

mod open_ticket;
mod ticket_controls;

pub use open_ticket::open_ticket_button;

pub async fn route_interaction(
	interaction: &InteractionCreate,
	interaction_data: &MessageComponentInteractionData,
	context: &Arc<BotContext>,
) -> miette::Result<()> {
	let custom_id_path: Vec<String> = interaction_data.custom_id.split('/').map(|s| s.to_string()).collect();

	match custom_id_path.first().map(|s| s.as_str()) {
		Some("open_ticket") => {
			open_ticket::route_open_ticket_interaction(interaction, &custom_id_path, context).await
		}
		Some("ticket") => {
			ticket_controls::route_ticket_interaction(interaction, interaction_data, &custom_id_path, context).await
		}
		_ => bail!("Unknown component custom ID: {}", interaction_data.custom_id),
	}
}

pub async fn route_modal_submit(
	interaction: &InteractionCreate,
	modal_data: &ModalInteractionData,
	context: &Arc<BotContext>,
) -> miette::Result<()> {
	let custom_id_path: Vec<String> = modal_data.custom_id.split('/').map(|s| s.to_string()).collect();

	match custom_id_path.first().map(|s| s.as_str()) {
		Some("open_ticket") => open_ticket::route_open_ticket_modal(interaction, modal_data, &custom_id_path, context).await,
		_ => bail!("Unknown modal custom ID: {}", modal_data.custom_id),
	}
}
