//! Guest-list logic that needs no I/O: intake validation, RSVP planning,
//! dashboard statistics, table sorting, address parsing and CSV export.

pub mod address;
pub mod export;
pub mod intake;
pub mod rsvp;
pub mod sort;
pub mod stats;
