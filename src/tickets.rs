// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::fees;
use crate::model::{Disposition, Ticket, TicketError, TicketStatus, TradeRole};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, MessageMarker, UserMarker};

/// Contents of a submitted ticket form, validated before any channel exists.
#[derive(Debug)]
pub struct TicketForm {
	pub creator: Id<UserMarker>,
	pub buyer_label: String,
	pub seller_label: String,
	pub item: String,
	pub nominal: u64,
	pub payment_method: String,
}

/// Result of a close request that passed its authorization checks.
///
/// `AlreadyClosed` lets a second Complete/Cancel press be answered without
/// re-dispatching the terminal side effects.
#[derive(Debug)]
pub enum CloseOutcome {
	Closed(Ticket),
	AlreadyClosed,
}

/// The authoritative registry of open tickets.
///
/// Events are handled on a multi-threaded runtime, so every guard-then-mutate
/// sequence here is a single synchronous call; callers hold the bot-state
/// write lock for the duration of the call, which serializes transitions on a
/// ticket.
#[derive(Debug, Default)]
pub struct TicketRegistry {
	tickets: HashMap<u64, Ticket>,
	last_id: u64,
}

impl TicketRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a new pending ticket and assigns it the next identifier. The
	/// fee and total are fixed here and never recomputed.
	pub fn open(&mut self, form: TicketForm, channel: Id<ChannelMarker>, created_at: DateTime<Utc>) -> &Ticket {
		self.last_id += 1;
		let id = self.last_id;
		let fee = fees::fee(form.nominal);
		let participants: HashSet<Id<UserMarker>> = [form.creator].into();
		let ticket = Ticket {
			id,
			item: form.item,
			payment_method: form.payment_method,
			buyer_label: form.buyer_label,
			seller_label: form.seller_label,
			nominal: form.nominal,
			fee,
			status: TicketStatus::Pending,
			channel,
			summary_message: None,
			creator: form.creator,
			buyer: None,
			seller: None,
			participants,
			created_at,
		};
		self.tickets.entry(id).or_insert(ticket)
	}

	pub fn get(&self, id: u64) -> Option<&Ticket> {
		self.tickets.get(&id)
	}

	pub fn find_by_channel(&self, channel: Id<ChannelMarker>) -> Option<&Ticket> {
		self.tickets.values().find(|ticket| ticket.channel == channel)
	}

	/// Records the summary message posted into the ticket's channel so
	/// terminal transitions can update its rendered state.
	pub fn set_summary_message(&mut self, id: u64, message: Id<MessageMarker>) {
		if let Some(ticket) = self.tickets.get_mut(&id) {
			ticket.summary_message = Some(message);
		}
	}

	/// Assigns a user to one side of the transaction and authorizes them to
	/// cancel the ticket. Adding the same user again is a no-op on the set;
	/// roles are not exclusive, and reassignment does not revoke the previous
	/// holder.
	pub fn add_participant(
		&mut self,
		id: u64,
		role: TradeRole,
		target: Id<UserMarker>,
		target_is_bot: bool,
	) -> Result<Ticket, TicketError> {
		let ticket = self.tickets.get_mut(&id).ok_or(TicketError::TicketNotFound)?;
		if target_is_bot {
			return Err(TicketError::InvalidParticipant);
		}
		match role {
			TradeRole::Buyer => ticket.buyer = Some(target),
			TradeRole::Seller => ticket.seller = Some(target),
		}
		ticket.participants.insert(target);
		Ok(ticket.clone())
	}

	/// Moves a pending ticket to a terminal status.
	///
	/// Completion requires administrator capability; cancellation is open to
	/// administrators and participants, so any stakeholder can abort a stalled
	/// deal while only an admin can affirm a successful one.
	pub fn close(
		&mut self,
		id: u64,
		disposition: Disposition,
		actor: Id<UserMarker>,
		actor_is_admin: bool,
	) -> Result<CloseOutcome, TicketError> {
		let ticket = self.tickets.get_mut(&id).ok_or(TicketError::TicketNotFound)?;
		let authorized = match disposition {
			Disposition::Completed => actor_is_admin,
			Disposition::Cancelled => actor_is_admin || ticket.is_participant(actor),
		};
		if !authorized {
			return Err(TicketError::Unauthorized);
		}
		if ticket.status != TicketStatus::Pending {
			return Ok(CloseOutcome::AlreadyClosed);
		}
		ticket.status = disposition.status();
		Ok(CloseOutcome::Closed(ticket.clone()))
	}

	/// Drops a ticket from the registry once its terminal side effects have
	/// been dispatched. No further mutation happens after removal.
	pub fn remove(&mut self, id: u64) -> Option<Ticket> {
		self.tickets.remove(&id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn user(id: u64) -> Id<UserMarker> {
		Id::new(id)
	}

	fn channel(id: u64) -> Id<ChannelMarker> {
		Id::new(id)
	}

	fn form(creator: u64, nominal: u64) -> TicketForm {
		TicketForm {
			creator: user(creator),
			buyer_label: String::from("budi#1"),
			seller_label: String::from("siti#2"),
			item: String::from("gaming account"),
			nominal,
			payment_method: String::from("bank transfer"),
		}
	}

	fn registry_with_ticket(creator: u64, nominal: u64) -> (TicketRegistry, u64) {
		let mut registry = TicketRegistry::new();
		let id = registry.open(form(creator, nominal), channel(500), Utc::now()).id;
		(registry, id)
	}

	#[test]
	fn open_derives_fee_and_total_and_starts_pending() {
		let (registry, id) = registry_with_ticket(10, 30_000);
		let ticket = registry.get(id).unwrap();
		assert_eq!(ticket.fee, 3_000);
		assert_eq!(ticket.total(), 33_000);
		assert_eq!(ticket.status, TicketStatus::Pending);
		assert_eq!(ticket.participants, [user(10)].into());
	}

	#[test]
	fn ids_are_assigned_monotonically() {
		let mut registry = TicketRegistry::new();
		let first = registry.open(form(10, 30_000), channel(500), Utc::now()).id;
		let second = registry.open(form(11, 30_000), channel(501), Utc::now()).id;
		assert!(second > first);
	}

	#[test]
	fn tickets_are_found_by_their_channel() {
		let (registry, id) = registry_with_ticket(10, 30_000);
		assert_eq!(registry.find_by_channel(channel(500)).map(|ticket| ticket.id), Some(id));
		assert!(registry.find_by_channel(channel(501)).is_none());
	}

	#[test]
	fn complete_by_non_admin_is_refused_and_status_unchanged() {
		let (mut registry, id) = registry_with_ticket(10, 30_000);
		let result = registry.close(id, Disposition::Completed, user(10), false);
		assert_eq!(result.unwrap_err(), TicketError::Unauthorized);
		assert_eq!(registry.get(id).unwrap().status, TicketStatus::Pending);
	}

	#[test]
	fn cancel_requires_admin_or_participant() {
		let (mut registry, id) = registry_with_ticket(10, 30_000);
		let result = registry.close(id, Disposition::Cancelled, user(99), false);
		assert_eq!(result.unwrap_err(), TicketError::Unauthorized);

		let result = registry.close(id, Disposition::Cancelled, user(10), false);
		let Ok(CloseOutcome::Closed(ticket)) = result else {
			panic!("participant cancel should close the ticket");
		};
		assert_eq!(ticket.status, TicketStatus::Cancelled);
	}

	#[test]
	fn second_close_is_a_no_op() {
		let (mut registry, id) = registry_with_ticket(10, 30_000);
		let first = registry.close(id, Disposition::Completed, user(1), true);
		assert!(matches!(first, Ok(CloseOutcome::Closed(_))));
		// Only a Closed outcome dispatches archival; the repeat press must not
		// produce a second one.
		let second = registry.close(id, Disposition::Completed, user(1), true);
		assert!(matches!(second, Ok(CloseOutcome::AlreadyClosed)));
		assert_eq!(registry.get(id).unwrap().status, TicketStatus::Completed);
	}

	#[test]
	fn terminal_status_never_reopens() {
		let (mut registry, id) = registry_with_ticket(10, 30_000);
		registry.close(id, Disposition::Cancelled, user(10), false).unwrap();
		let result = registry.close(id, Disposition::Completed, user(1), true);
		assert!(matches!(result, Ok(CloseOutcome::AlreadyClosed)));
		assert_eq!(registry.get(id).unwrap().status, TicketStatus::Cancelled);
	}

	#[test]
	fn bot_participants_are_refused() {
		let (mut registry, id) = registry_with_ticket(10, 30_000);
		let result = registry.add_participant(id, TradeRole::Buyer, user(20), true);
		assert_eq!(result.unwrap_err(), TicketError::InvalidParticipant);
		let ticket = registry.get(id).unwrap();
		assert!(ticket.buyer.is_none());
		assert!(!ticket.is_participant(user(20)));
	}

	#[test]
	fn adding_a_participant_twice_is_idempotent_on_the_set() {
		let (mut registry, id) = registry_with_ticket(10, 30_000);
		registry.add_participant(id, TradeRole::Buyer, user(20), false).unwrap();
		let ticket = registry.add_participant(id, TradeRole::Buyer, user(20), false).unwrap();
		assert_eq!(ticket.participants, [user(10), user(20)].into());
		assert_eq!(ticket.buyer, Some(user(20)));
	}

	#[test]
	fn roles_are_not_exclusive_and_may_be_reassigned() {
		let (mut registry, id) = registry_with_ticket(10, 30_000);
		registry.add_participant(id, TradeRole::Buyer, user(20), false).unwrap();
		registry.add_participant(id, TradeRole::Seller, user(20), false).unwrap();
		let ticket = registry.add_participant(id, TradeRole::Buyer, user(21), false).unwrap();
		// The previous buyer keeps cancel authorization.
		assert_eq!(ticket.buyer, Some(user(21)));
		assert_eq!(ticket.seller, Some(user(20)));
		assert!(ticket.is_participant(user(20)));
	}

	#[test]
	fn participants_can_cancel_after_being_added() {
		let (mut registry, id) = registry_with_ticket(10, 30_000);
		registry.add_participant(id, TradeRole::Seller, user(30), false).unwrap();
		let result = registry.close(id, Disposition::Cancelled, user(30), false);
		assert!(matches!(result, Ok(CloseOutcome::Closed(_))));
	}

	#[test]
	fn total_equals_nominal_plus_fee_in_every_reachable_state() {
		let (mut registry, id) = registry_with_ticket(10, 150_000);
		assert_eq!(registry.get(id).unwrap().total(), 157_000);
		registry.add_participant(id, TradeRole::Buyer, user(20), false).unwrap();
		assert_eq!(registry.get(id).unwrap().total(), 157_000);
		let Ok(CloseOutcome::Closed(ticket)) = registry.close(id, Disposition::Completed, user(1), true) else {
			panic!("admin complete should close the ticket");
		};
		assert_eq!(ticket.total(), ticket.nominal + ticket.fee);
	}

	#[test]
	fn removed_tickets_are_not_found() {
		let (mut registry, id) = registry_with_ticket(10, 30_000);
		registry.close(id, Disposition::Completed, user(1), true).unwrap();
		let removed = registry.remove(id).unwrap();
		assert_eq!(removed.id, id);
		assert!(registry.get(id).is_none());
		let result = registry.close(id, Disposition::Cancelled, user(10), false);
		assert_eq!(result.unwrap_err(), TicketError::TicketNotFound);
	}
}
