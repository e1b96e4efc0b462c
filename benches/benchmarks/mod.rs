pub mod next_id;
pub mod query_hit;
