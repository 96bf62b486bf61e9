pub mod company;
pub mod job;
pub mod section;
pub mod user;

pub use company::{Branding, Company, CompanyVideo};
pub use job::Job;
pub use section::Section;
pub use user::User;
