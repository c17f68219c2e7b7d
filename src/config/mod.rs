/// Database configuration, connection management and the query retry helper
pub mod database;
