// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use knus::Decode;
use miette::{IntoDiagnostic, Result};
use tokio::fs::read_to_string;

pub async fn parse_config(config_path: &str) -> Result<ConfigDocument> {
	let config_file_contents = read_to_string(config_path).await.into_diagnostic()?;
	let config = knus::parse(config_path, &config_file_contents)?;
	Ok(config)
}

#[derive(Debug, Decode)]
pub struct ConfigDocument {
	#[knus(child)]
	pub discord: DiscordConfig,
	#[knus(child)]
	pub tickets: TicketConfig,
	#[knus(child)]
	pub slowmode: SlowmodeConfig,
	#[knus(child)]
	pub scam_warning: ScamWarningConfig,
}

#[derive(Debug, Decode)]
pub struct DiscordConfig {
	#[knus(child, unwrap(argument))]
	pub bot_token: String,
	#[knus(child, unwrap(argument))]
	pub guild: u64,
}

#[derive(Debug, Decode)]
pub struct TicketConfig {
	/// The channel category under which ticket channels are created.
	#[knus(child, unwrap(argument))]
	pub category: u64,
	/// The channel to which closed-ticket summary records are sent.
	#[knus(child, unwrap(argument))]
	pub archive_channel: u64,
	/// The channel in which admins are notified of ticket fees and dispositions.
	#[knus(child, unwrap(argument))]
	pub admin_channel: u64,
	/// How long a closed ticket's channel remains readable before deletion.
	#[knus(child, unwrap(argument), default = 5)]
	pub teardown_delay_seconds: u64,
}

#[derive(Debug, Decode)]
pub struct SlowmodeConfig {
	/// Holders of this role get the shorter cooldown.
	#[knus(child, unwrap(argument))]
	pub privileged_role: u64,
	#[knus(child, unwrap(argument), default = 30)]
	pub privileged_seconds: i64,
	#[knus(child, unwrap(argument), default = 180)]
	pub standard_seconds: i64,
	/// The channels in which the cooldown is enforced.
	#[knus(child, unwrap(arguments))]
	pub channels: Vec<u64>,
}

#[derive(Debug, Decode)]
pub struct ScamWarningConfig {
	#[knus(child, unwrap(argument))]
	pub channel: u64,
}
