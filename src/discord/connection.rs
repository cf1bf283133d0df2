// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::archive::ChannelReaper;
use super::commands::{command_definitions, route_command};
use super::events::route_message;
use super::interactions::{route_interaction, route_modal_submit};
use super::utils::responses::ephemeral_text_response;
use crate::config::ConfigDocument;
use miette::IntoDiagnostic;
use std::sync::Arc;
use tokio::sync::RwLock;
use twilight_cache_inmemory::{DefaultInMemoryCache, ResourceType};
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt};
use twilight_http::client::Client;
use twilight_http::client::InteractionClient;
use twilight_model::application::interaction::InteractionData;
use twilight_model::gateway::event::Event;
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;
use type_map::concurrent::TypeMap;

/// Everything an event handler needs, shared across the tasks spawned for
/// each gateway event.
pub struct BotContext {
	pub http: Arc<Client>,
	pub application_id: Id<ApplicationMarker>,
	pub config: Arc<ConfigDocument>,
	pub cache: Arc<DefaultInMemoryCache>,
	pub state: Arc<RwLock<TypeMap>>,
	pub reaper: Arc<ChannelReaper>,
}

impl BotContext {
	pub fn interaction_client(&self) -> InteractionClient<'_> {
		self.http.interaction(self.application_id)
	}
}

pub fn set_up_client(config: &ConfigDocument) -> Arc<Client> {
	Arc::new(Client::new(config.discord.bot_token.clone()))
}

pub async fn run_bot(config: Arc<ConfigDocument>, http_client: Arc<Client>) -> miette::Result<()> {
	let intents = Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::MESSAGE_CONTENT;

	let mut shard = Shard::new(ShardId::ONE, config.discord.bot_token.clone(), intents);

	let cache = DefaultInMemoryCache::builder()
		.resource_types(ResourceType::all())
		.build();

	let application_id = {
		let application_response = http_client.current_user_application().await.into_diagnostic()?;
		application_response.model().await.into_diagnostic()?.id
	};

	{
		let interaction_client = http_client.interaction(application_id);
		let commands = command_definitions();
		interaction_client
			.set_global_commands(&commands)
			.await
			.into_diagnostic()?;
	}

	let context = Arc::new(BotContext {
		http: http_client,
		application_id,
		config,
		cache: Arc::new(cache),
		state: Arc::new(RwLock::new(TypeMap::new())),
		reaper: Arc::new(ChannelReaper::default()),
	});

	while let Some(event) = shard.next_event(EventTypeFlags::all()).await {
		let event = match event {
			Ok(event) => event,
			Err(error) => {
				tracing::warn!(source = ?error, "error receiving event");
				continue;
			}
		};
		context.cache.update(&event);

		tokio::spawn(handle_event(event, Arc::clone(&context)));
	}

	Ok(())
}

async fn handle_event(event: Event, context: Arc<BotContext>) {
	let interaction_token = match &event {
		Event::InteractionCreate(interaction) => Some((interaction.id, interaction.token.clone())),
		_ => None,
	};
	let event_result = handle_event_route(event, &context).await;
	if let Err(error) = event_result {
		tracing::error!(source = ?error, "An error occurred handling a gateway event");
		// Answer the acting user if there was one; a failed event must never
		// take the process down with it.
		if let Some((interaction_id, token)) = interaction_token {
			let response = ephemeral_text_response("Something went wrong handling that. Please try again.");
			let response_result = context
				.interaction_client()
				.create_response(interaction_id, &token, &response)
				.await;
			if let Err(error) = response_result {
				tracing::debug!(source = ?error, "failed to send the generic failure response");
			}
		}
	}
}

async fn handle_event_route(event: Event, context: &Arc<BotContext>) -> miette::Result<()> {
	match event {
		Event::InteractionCreate(interaction) => match &interaction.data {
			Some(InteractionData::ApplicationCommand(command_data)) => {
				route_command(&interaction, command_data, context).await?;
			}
			Some(InteractionData::MessageComponent(interaction_data)) => {
				route_interaction(&interaction, interaction_data, context).await?;
			}
			Some(InteractionData::ModalSubmit(modal_data)) => {
				route_modal_submit(&interaction, modal_data, context).await?;
			}
			_ => (),
		},
		Event::MessageCreate(message) => route_message(&message.0, context).await?,
		Event::ChannelDelete(channel) => {
			// A ticket channel deleted by hand during the teardown grace delay
			// leaves nothing for the scheduled deletion to do.
			context.reaper.cancel_for_channel(channel.0.id);
		}
		Event::Ready(_) => {
			tracing::info!("Discord gateway is ready");
		}
		_ => (),
	}
	Ok(())
}
