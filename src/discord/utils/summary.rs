// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::timestamp::timestamp_from_datetime;
use crate::model::{Disposition, Ticket, TicketStatus, TradeRole};
use chrono::{DateTime, Utc};
use twilight_mention::fmt::Mention;
use twilight_mention::timestamp::{Timestamp as MentionTimestamp, TimestampStyle};
use twilight_model::channel::message::component::{
	ActionRow, Button, ButtonStyle, Component, SelectMenu, SelectMenuType,
};
use twilight_model::channel::message::embed::Embed;
use twilight_model::id::Id;
use twilight_model::id::marker::UserMarker;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFieldBuilder};
use twilight_validate::embed::EmbedValidationError;

const PENDING_COLOR: u32 = 0x00f1c40f;
const COMPLETED_COLOR: u32 = 0x002ecc71;
const CANCELLED_COLOR: u32 = 0x00e74c3c;

fn status_color(status: TicketStatus) -> u32 {
	match status {
		TicketStatus::Pending => PENDING_COLOR,
		TicketStatus::Completed => COMPLETED_COLOR,
		TicketStatus::Cancelled => CANCELLED_COLOR,
	}
}

/// Renders an amount with thousands separators.
pub fn format_amount(amount: u64) -> String {
	let digits = amount.to_string();
	let mut reversed = String::new();
	for (position, digit) in digits.chars().rev().enumerate() {
		if position > 0 && position % 3 == 0 {
			reversed.push(',');
		}
		reversed.push(digit);
	}
	reversed.chars().rev().collect()
}

fn party_field_value(label: &str, assigned: Option<Id<UserMarker>>) -> String {
	match assigned {
		Some(user) => format!("{} — {}", label, user.mention()),
		None => format!("{} — not assigned yet", label),
	}
}

fn transaction_fields(builder: EmbedBuilder, ticket: &Ticket) -> EmbedBuilder {
	builder
		.field(EmbedFieldBuilder::new("Item", ticket.item.as_str()).inline())
		.field(EmbedFieldBuilder::new("Payment Method", ticket.payment_method.as_str()).inline())
		.field(EmbedFieldBuilder::new("Nominal", format_amount(ticket.nominal)).inline())
		.field(EmbedFieldBuilder::new("Service Fee", format_amount(ticket.fee)).inline())
		.field(EmbedFieldBuilder::new("Total", format_amount(ticket.total())).inline())
		.field(EmbedFieldBuilder::new(
			"Buyer",
			party_field_value(&ticket.buyer_label, ticket.buyer),
		))
		.field(EmbedFieldBuilder::new(
			"Seller",
			party_field_value(&ticket.seller_label, ticket.seller),
		))
}

/// Generates the summary posted into a ticket's channel, re-rendered on every
/// change to the ticket.
pub fn summary_embed(ticket: &Ticket) -> Result<Embed, EmbedValidationError> {
	let mut builder = EmbedBuilder::new()
		.title(format!("Rekber Ticket #{}", ticket.id))
		.color(status_color(ticket.status))
		.description(format!(
			"Opened by {}. An admin completes the deal once both sides have delivered; any participant can cancel it.",
			ticket.creator.mention()
		))
		.field(EmbedFieldBuilder::new("Status", ticket.status.to_string()).inline());
	builder = transaction_fields(builder, ticket);
	if let Ok(timestamp) = timestamp_from_datetime(ticket.created_at) {
		builder = builder.timestamp(timestamp);
	}
	Ok(builder.validate()?.build())
}

/// Role-assignment and status-transition controls attached to a pending
/// ticket's summary message.
pub fn ticket_components(ticket_id: u64) -> Vec<Component> {
	let buyer_select = SelectMenu {
		channel_types: None,
		custom_id: format!("ticket/{}/{}", ticket_id, TradeRole::Buyer.as_id()),
		default_values: None,
		disabled: false,
		kind: SelectMenuType::User,
		max_values: None,
		min_values: None,
		options: None,
		placeholder: Some(String::from("Assign the buyer")),
	};
	let seller_select = SelectMenu {
		channel_types: None,
		custom_id: format!("ticket/{}/{}", ticket_id, TradeRole::Seller.as_id()),
		default_values: None,
		disabled: false,
		kind: SelectMenuType::User,
		max_values: None,
		min_values: None,
		options: None,
		placeholder: Some(String::from("Assign the seller")),
	};
	let complete_button = Button {
		custom_id: Some(format!("ticket/{}/complete", ticket_id)),
		disabled: false,
		emoji: None,
		label: Some(String::from("Complete Deal")),
		style: ButtonStyle::Success,
		url: None,
		sku_id: None,
	};
	let cancel_button = Button {
		custom_id: Some(format!("ticket/{}/cancel", ticket_id)),
		disabled: false,
		emoji: None,
		label: Some(String::from("Cancel Deal")),
		style: ButtonStyle::Danger,
		url: None,
		sku_id: None,
	};

	vec![
		Component::ActionRow(ActionRow {
			components: vec![Component::SelectMenu(buyer_select)],
		}),
		Component::ActionRow(ActionRow {
			components: vec![Component::SelectMenu(seller_select)],
		}),
		Component::ActionRow(ActionRow {
			components: vec![Component::Button(complete_button), Component::Button(cancel_button)],
		}),
	]
}

/// Generates the durable record emitted to the archive channel when a ticket
/// reaches a terminal status.
pub fn archive_embed(
	ticket: &Ticket,
	disposition: Disposition,
	closed_at: DateTime<Utc>,
) -> Result<Embed, EmbedValidationError> {
	let opened_marker = MentionTimestamp::new(ticket.created_at.timestamp() as u64, Some(TimestampStyle::ShortDateTime));
	let mut builder = EmbedBuilder::new()
		.title(format!("Rekber Ticket #{} — {}", ticket.id, disposition))
		.color(status_color(disposition.status()))
		.description(format!(
			"Opened by {} at {}.",
			ticket.creator.mention(),
			opened_marker.mention()
		))
		.field(EmbedFieldBuilder::new("Disposition", disposition.to_string()).inline());
	builder = transaction_fields(builder, ticket);
	if let Ok(timestamp) = timestamp_from_datetime(closed_at) {
		builder = builder.timestamp(timestamp);
	}
	Ok(builder.validate()?.build())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	fn sample_ticket() -> Ticket {
		Ticket {
			id: 7,
			item: String::from("gaming account"),
			payment_method: String::from("bank transfer"),
			buyer_label: String::from("budi#1"),
			seller_label: String::from("siti#2"),
			nominal: 30_000,
			fee: 3_000,
			status: TicketStatus::Pending,
			channel: Id::new(500),
			summary_message: None,
			creator: Id::new(10),
			buyer: None,
			seller: None,
			participants: HashSet::from([Id::new(10)]),
			created_at: Utc::now(),
		}
	}

	#[test]
	fn amounts_get_thousands_separators() {
		assert_eq!(format_amount(999), "999");
		assert_eq!(format_amount(30_000), "30,000");
		assert_eq!(format_amount(1_234_567), "1,234,567");
	}

	#[test]
	fn summary_reports_the_derived_total() {
		let embed = summary_embed(&sample_ticket()).unwrap();
		let total = embed
			.fields
			.iter()
			.find(|field| field.name == "Total")
			.map(|field| field.value.clone());
		assert_eq!(total.as_deref(), Some("33,000"));
	}

	#[test]
	fn summary_shows_assigned_parties() {
		let mut ticket = sample_ticket();
		ticket.buyer = Some(Id::new(20));
		let embed = summary_embed(&ticket).unwrap();
		let buyer = embed
			.fields
			.iter()
			.find(|field| field.name == "Buyer")
			.map(|field| field.value.clone());
		assert_eq!(buyer.as_deref(), Some("budi#1 — <@20>"));
	}

	#[test]
	fn controls_are_scoped_to_the_ticket_id() {
		let components = ticket_components(7);
		assert_eq!(components.len(), 3);
		let Component::ActionRow(buttons) = &components[2] else {
			panic!("expected an action row");
		};
		let Component::Button(complete) = &buttons.components[0] else {
			panic!("expected the complete button");
		};
		assert_eq!(complete.custom_id.as_deref(), Some("ticket/7/complete"));
	}

	#[test]
	fn archive_record_names_the_disposition() {
		let embed = archive_embed(&sample_ticket(), Disposition::Cancelled, Utc::now()).unwrap();
		assert_eq!(embed.title.as_deref(), Some("Rekber Ticket #7 — Cancelled"));
		let disposition = embed
			.fields
			.iter()
			.find(|field| field.name == "Disposition")
			.map(|field| field.value.clone());
		assert_eq!(disposition.as_deref(), Some("Cancelled"));
	}
}
