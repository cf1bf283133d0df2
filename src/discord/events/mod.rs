// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::connection::BotContext;
use std::sync::Arc;
use twilight_model::channel::message::Message;

mod payment_proof;
mod scam_warning;
mod slowmode;

pub async fn route_message(message: &Message, context: &Arc<BotContext>) -> miette::Result<()> {
	if message.author.bot {
		return Ok(());
	}
	if message.guild_id.is_none() {
		return Ok(());
	}

	// A message the slowmode deleted triggers nothing else.
	if slowmode::enforce(message, context).await? {
		return Ok(());
	}
	scam_warning::refresh(message, context).await?;
	payment_proof::acknowledge(message, context).await?;

	Ok(())
}
