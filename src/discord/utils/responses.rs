// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::model::TicketError;
use twilight_model::channel::message::MessageFlags;
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType};
use twilight_util::builder::InteractionResponseDataBuilder;

/// An ephemeral text reply to the acting user.
pub fn ephemeral_text_response(content: impl Into<String>) -> InteractionResponse {
	let data = InteractionResponseDataBuilder::new()
		.content(content)
		.flags(MessageFlags::EPHEMERAL)
		.build();
	InteractionResponse {
		kind: InteractionResponseType::ChannelMessageWithSource,
		data: Some(data),
	}
}

/// Replaces the message the interaction came from.
pub fn update_message_response(data: InteractionResponseData) -> InteractionResponse {
	InteractionResponse {
		kind: InteractionResponseType::UpdateMessage,
		data: Some(data),
	}
}

/// Reports a refused ticket operation back to the acting user. Domain errors
/// are terminal for the triggering operation but never for the process.
pub fn domain_error_response(error: &TicketError) -> InteractionResponse {
	ephemeral_text_response(error.to_string())
}
