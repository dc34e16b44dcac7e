/// PostgreSQL plumbing: connection pool and schema migrations
///
/// Entity SQL lives next to the models in `crate::models`; this module only
/// manages connections and the schema.

pub mod migrations;
pub mod pool;
