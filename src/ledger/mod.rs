//! Dues ledger: eligibility, fee resolution, per-member records and the
//! aggregates derived from them.

pub mod book;
pub mod eligibility;
pub mod fees;
pub mod record;
pub mod status;
pub mod store;
pub mod totals;

pub use book::{ClubBook, CURRENT_SCHEMA_VERSION};
pub use eligibility::{eligible_months, is_eligible};
pub use fees::FeeSettings;
pub use record::LedgerRecord;
pub use status::MonthStatus;
pub use store::RecordStore;
pub use totals::{club_totals, member_totals, month_status, pay_all, ClubTotals, MemberTotals};
