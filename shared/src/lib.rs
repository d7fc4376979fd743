pub mod shared_lucky_draw;
pub mod weight_table;
