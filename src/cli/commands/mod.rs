pub mod attendance;
pub mod club;
pub mod dues;
pub mod member;
pub mod report;
pub mod system;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    registry.register_group("Clubs", club::definitions());
    registry.register_group("Members", member::definitions());
    registry.register_group("Dues", dues::definitions());
    registry.register_group("Reports", report::definitions());
    registry.register_group("Attendance", attendance::definitions());
    registry.register_group("System", system::definitions());
}
