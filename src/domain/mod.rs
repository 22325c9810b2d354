pub mod common;
pub mod member;
pub mod month;

pub use common::{Displayable, Identifiable, NamedEntity};
pub use member::{Member, MemberCategory, MemberId};
pub use month::Month;
