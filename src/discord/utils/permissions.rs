// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use twilight_model::channel::permission_overwrite::{PermissionOverwrite, PermissionOverwriteType};
use twilight_model::guild::{PartialMember, Permissions};
use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, UserMarker};

/// Whether the interaction member holds administrator capability. Interaction
/// payloads carry the member's computed permissions.
pub fn is_administrator(member: &PartialMember) -> bool {
	member
		.permissions
		.is_some_and(|permissions| permissions.contains(Permissions::ADMINISTRATOR))
}

/// What a transaction participant may do in the ticket's channel.
pub fn participant_permissions() -> Permissions {
	Permissions::VIEW_CHANNEL
		| Permissions::READ_MESSAGE_HISTORY
		| Permissions::SEND_MESSAGES
		| Permissions::ATTACH_FILES
		| Permissions::EMBED_LINKS
}

/// Grants one user access to a ticket channel.
pub fn participant_overwrite(user: Id<UserMarker>) -> PermissionOverwrite {
	PermissionOverwrite {
		allow: participant_permissions(),
		deny: Permissions::empty(),
		id: user.cast(),
		kind: PermissionOverwriteType::Member,
	}
}

/// The access list for a newly created ticket channel: deny-all default with
/// explicit allows for the creator and the bot itself.
pub fn ticket_channel_overwrites(
	guild: Id<GuildMarker>,
	creator: Id<UserMarker>,
	bot_user: Id<UserMarker>,
) -> Vec<PermissionOverwrite> {
	// The @everyone role shares the guild's ID.
	let everyone_overwrite = PermissionOverwrite {
		allow: Permissions::empty(),
		deny: Permissions::VIEW_CHANNEL,
		id: guild.cast(),
		kind: PermissionOverwriteType::Role,
	};
	let bot_overwrite = PermissionOverwrite {
		allow: participant_permissions() | Permissions::MANAGE_CHANNELS | Permissions::MANAGE_MESSAGES,
		deny: Permissions::empty(),
		id: bot_user.cast(),
		kind: PermissionOverwriteType::Member,
	};
	vec![everyone_overwrite, participant_overwrite(creator), bot_overwrite]
}
