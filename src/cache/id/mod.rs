pub mod time_ordered_id_generator;
