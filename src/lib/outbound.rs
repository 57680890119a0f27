pub mod blocking;
pub mod memory;
pub mod record;
pub mod sqlite;
