//! Trip snapshot assembly
//!
//! This module provides the `TripBook`, which collects participant and expense
//! records read from the input files and groups them into one snapshot per trip.
//!
//! The TripBook is responsible for:
//! - Creating a trip on its first participant or expense record
//! - Preserving input order of participants and expenses within a trip
//! - Remembering rows of a trip that failed to read, so the trip is rejected
//!   instead of settled without them
//! - Handing out snapshots in trip ID order for deterministic output

use crate::types::{ExpenseRecord, ParticipantRecord, SettlementError, TripId, TripSnapshot};
use std::collections::BTreeMap;

/// Groups input records into per-trip snapshots
#[derive(Debug, Default)]
pub struct TripBook {
    /// Map of trip IDs to the snapshot being assembled
    trips: BTreeMap<TripId, TripSnapshot>,
}

impl TripBook {
    /// Create an empty TripBook
    pub fn new() -> Self {
        TripBook {
            trips: BTreeMap::new(),
        }
    }

    fn get_or_create_trip(&mut self, trip: TripId) -> &mut TripSnapshot {
        self.trips
            .entry(trip)
            .or_insert_with_key(|trip| TripSnapshot::new(trip.clone()))
    }

    /// Add a participant to its trip
    pub fn add_participant(&mut self, record: ParticipantRecord) {
        self.get_or_create_trip(record.trip)
            .participants
            .push(record.participant);
    }

    /// Add an expense to its trip
    ///
    /// A trip that only has expenses still gets a snapshot, with no participants.
    pub fn add_expense(&mut self, record: ExpenseRecord) {
        self.get_or_create_trip(record.trip)
            .expenses
            .push(record.expense);
    }

    /// Record a row of `trip` that could not be read
    pub fn reject_row(&mut self, trip: TripId, error: SettlementError) {
        self.get_or_create_trip(trip).rejected_rows.push(error);
    }

    /// Number of trips seen so far
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    /// Whether no records have been added
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Consume the book, yielding snapshots sorted by trip ID
    pub fn into_snapshots(self) -> Vec<TripSnapshot> {
        self.trips.into_values().collect()
    }
}
