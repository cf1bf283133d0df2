// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::super::connection::BotContext;
use miette::IntoDiagnostic;
use twilight_model::id::Id;
use twilight_model::id::marker::UserMarker;

/// Whether the user is a bot/service account, from the cache when it's warm
/// and from the API otherwise.
pub async fn is_bot(context: &BotContext, user_id: Id<UserMarker>) -> miette::Result<bool> {
	if let Some(user) = context.cache.user(user_id) {
		return Ok(user.bot);
	}
	let user_response = context.http.user(user_id).await.into_diagnostic()?;
	let user = user_response.model().await.into_diagnostic()?;
	Ok(user.bot)
}

/// The bot's own user ID.
pub async fn bot_user_id(context: &BotContext) -> miette::Result<Id<UserMarker>> {
	if let Some(current_user) = context.cache.current_user() {
		return Ok(current_user.id);
	}
	let user_response = context.http.current_user().await.into_diagnostic()?;
	let user = user_response.model().await.into_diagnostic()?;
	Ok(user.id)
}
