pub mod compliments;
