pub mod company_service;
pub mod job_service;
pub mod section_service;
pub mod user_service;

pub use company_service::{CompanyError, CompanyService};
pub use job_service::{JobError, JobService};
pub use section_service::{SectionError, SectionService};
pub use user_service::{UserError, UserService};

/// Postgres unique-constraint violation, the one driver error the services
/// translate into a domain error instead of a generic 500.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}
