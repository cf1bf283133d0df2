// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, MessageMarker, UserMarker};

/// Position of a ticket in its lifecycle. Transitions only move forward; a
/// ticket never leaves a terminal status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TicketStatus {
	Pending,
	Completed,
	Cancelled,
}

impl fmt::Display for TicketStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Pending => write!(f, "Pending"),
			Self::Completed => write!(f, "Completed"),
			Self::Cancelled => write!(f, "Cancelled"),
		}
	}
}

/// Terminal outcome of a ticket.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Disposition {
	Completed,
	Cancelled,
}

impl Disposition {
	pub fn status(self) -> TicketStatus {
		match self {
			Self::Completed => TicketStatus::Completed,
			Self::Cancelled => TicketStatus::Cancelled,
		}
	}
}

impl fmt::Display for Disposition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Completed => write!(f, "Completed"),
			Self::Cancelled => write!(f, "Cancelled"),
		}
	}
}

/// The side of the transaction a user is assigned to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TradeRole {
	Buyer,
	Seller,
}

impl TradeRole {
	pub fn from_id(id: &str) -> Option<Self> {
		match id {
			"set_buyer" => Some(Self::Buyer),
			"set_seller" => Some(Self::Seller),
			_ => None,
		}
	}

	pub fn as_id(&self) -> &'static str {
		match self {
			Self::Buyer => "set_buyer",
			Self::Seller => "set_seller",
		}
	}

	pub fn name(&self) -> &'static str {
		match self {
			Self::Buyer => "buyer",
			Self::Seller => "seller",
		}
	}
}

/// One escrow transaction and its dedicated channel.
#[derive(Clone, Debug)]
pub struct Ticket {
	pub id: u64,
	pub item: String,
	pub payment_method: String,
	/// Identity string for the buyer as entered on the form; not a verified
	/// Discord identity.
	pub buyer_label: String,
	/// Identity string for the seller as entered on the form; not a verified
	/// Discord identity.
	pub seller_label: String,
	/// Face value of the transaction. The fee is derived from this once, at
	/// creation, and neither changes afterward.
	pub nominal: u64,
	pub fee: u64,
	pub status: TicketStatus,
	/// The ticket's dedicated channel. Owned by this ticket for its lifetime.
	pub channel: Id<ChannelMarker>,
	/// The summary message posted into the ticket channel, once it exists.
	pub summary_message: Option<Id<MessageMarker>>,
	pub creator: Id<UserMarker>,
	/// The Discord user assigned as buyer, if any. Assignments may be repeated
	/// or overlap with the seller; the latest one is displayed.
	pub buyer: Option<Id<UserMarker>>,
	pub seller: Option<Id<UserMarker>>,
	/// Users permitted to cancel this ticket. Always contains the creator.
	pub participants: HashSet<Id<UserMarker>>,
	pub created_at: DateTime<Utc>,
}

impl Ticket {
	pub fn total(&self) -> u64 {
		self.nominal + self.fee
	}

	pub fn is_participant(&self, user: Id<UserMarker>) -> bool {
		self.participants.contains(&user)
	}
}

/// Why a ticket operation was refused. Each variant's message is shown to the
/// acting user as-is.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum TicketError {
	#[error("That amount isn't valid; enter a whole number of at least 1000.")]
	InvalidAmount,
	#[error("No open ticket exists here anymore.")]
	TicketNotFound,
	#[error("You don't have permission to do that for this ticket.")]
	Unauthorized,
	#[error("Bot accounts can't take part in a transaction.")]
	InvalidParticipant,
}
