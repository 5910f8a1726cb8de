pub mod analysis;
pub mod job_role;
pub mod skill;
pub mod user;
pub mod user_skill;

pub use analysis::*;
pub use job_role::*;
pub use skill::*;
pub use user::*;
pub use user_skill::*;
