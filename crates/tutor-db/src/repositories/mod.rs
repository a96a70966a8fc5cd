// All repository functions are generic over `E: Executor<'e, Database = Postgres>`
// so they accept both a `&PgPool` (direct query) and a `&mut PgConnection` /
// transaction (atomic operations).

pub mod correction;
pub mod message;
pub mod profile;
pub mod progress;
pub mod session;
pub mod user;
