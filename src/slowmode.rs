// © 2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, UserMarker};

/// Verdict for a rate-checked message.
#[derive(Debug, Eq, PartialEq)]
pub enum Gate {
	Allow,
	Deny { remaining_seconds: i64 },
}

/// Per-user-per-channel message cooldown with a role-based threshold.
#[derive(Debug)]
pub struct SlowmodeGate {
	last_message: HashMap<(Id<UserMarker>, Id<ChannelMarker>), DateTime<Utc>>,
	privileged_seconds: i64,
	standard_seconds: i64,
}

impl SlowmodeGate {
	pub fn new(privileged_seconds: i64, standard_seconds: i64) -> Self {
		Self {
			last_message: HashMap::new(),
			privileged_seconds,
			standard_seconds,
		}
	}

	pub fn check(&mut self, user: Id<UserMarker>, channel: Id<ChannelMarker>, privileged: bool) -> Gate {
		self.check_at(user, channel, privileged, Utc::now())
	}

	/// Checks a message against the sender's last accepted message in the
	/// channel. On `Allow` the timestamp is advanced to `now`; on `Deny` it is
	/// left alone, so waiting out the cooldown is measured from the last
	/// message that actually stood.
	pub fn check_at(
		&mut self,
		user: Id<UserMarker>,
		channel: Id<ChannelMarker>,
		privileged: bool,
		now: DateTime<Utc>,
	) -> Gate {
		let threshold = if privileged {
			self.privileged_seconds
		} else {
			self.standard_seconds
		};
		if let Some(last) = self.last_message.get(&(user, channel)) {
			let elapsed = (now - *last).num_seconds();
			if elapsed < threshold {
				return Gate::Deny {
					remaining_seconds: threshold - elapsed,
				};
			}
		}
		self.last_message.insert((user, channel), now);
		Gate::Allow
	}

	pub fn prune(&mut self) {
		self.prune_at(Utc::now());
	}

	/// Evicts entries old enough that no threshold can still deny them, so the
	/// table doesn't grow with every user who ever spoke.
	pub fn prune_at(&mut self, now: DateTime<Utc>) {
		let horizon = self.privileged_seconds.max(self.standard_seconds);
		self.last_message.retain(|_, last| (now - *last).num_seconds() < horizon);
	}

	#[cfg(test)]
	fn tracked_entries(&self) -> usize {
		self.last_message.len()
	}
}

/// Renders a remaining cooldown as whole minutes and seconds.
pub fn format_remaining(seconds: i64) -> String {
	let minutes = seconds / 60;
	let seconds = seconds % 60;
	if minutes > 0 {
		format!("{} minutes {} seconds", minutes, seconds)
	} else {
		format!("{} seconds", seconds)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{Duration, TimeZone};

	fn user(id: u64) -> Id<UserMarker> {
		Id::new(id)
	}

	fn channel(id: u64) -> Id<ChannelMarker> {
		Id::new(id)
	}

	fn start() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
	}

	#[test]
	fn unprivileged_sender_waits_the_full_cooldown() {
		let mut gate = SlowmodeGate::new(30, 180);
		let t0 = start();

		assert_eq!(gate.check_at(user(1), channel(1), false, t0), Gate::Allow);
		assert_eq!(
			gate.check_at(user(1), channel(1), false, t0 + Duration::seconds(29)),
			Gate::Deny { remaining_seconds: 151 }
		);
		// The denied message didn't reset the clock.
		assert_eq!(gate.check_at(user(1), channel(1), false, t0 + Duration::seconds(181)), Gate::Allow);
	}

	#[test]
	fn privileged_sender_gets_the_shorter_threshold() {
		let mut gate = SlowmodeGate::new(30, 180);
		let t0 = start();

		assert_eq!(gate.check_at(user(1), channel(1), true, t0), Gate::Allow);
		assert_eq!(
			gate.check_at(user(1), channel(1), true, t0 + Duration::seconds(29)),
			Gate::Deny { remaining_seconds: 1 }
		);
		assert_eq!(gate.check_at(user(1), channel(1), true, t0 + Duration::seconds(30)), Gate::Allow);
	}

	#[test]
	fn cooldowns_are_tracked_per_user_and_channel() {
		let mut gate = SlowmodeGate::new(30, 180);
		let t0 = start();

		assert_eq!(gate.check_at(user(1), channel(1), false, t0), Gate::Allow);
		assert_eq!(gate.check_at(user(2), channel(1), false, t0), Gate::Allow);
		assert_eq!(gate.check_at(user(1), channel(2), false, t0), Gate::Allow);
	}

	#[test]
	fn prune_drops_entries_past_the_longest_threshold() {
		let mut gate = SlowmodeGate::new(30, 180);
		let t0 = start();

		gate.check_at(user(1), channel(1), false, t0);
		gate.check_at(user(2), channel(1), false, t0 + Duration::seconds(100));
		gate.prune_at(t0 + Duration::seconds(200));
		assert_eq!(gate.tracked_entries(), 1);
	}

	#[test]
	fn remaining_time_reads_as_minutes_and_seconds() {
		assert_eq!(format_remaining(151), "2 minutes 31 seconds");
		assert_eq!(format_remaining(60), "1 minutes 0 seconds");
		assert_eq!(format_remaining(29), "29 seconds");
	}
}
