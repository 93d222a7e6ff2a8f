mod config_io_tests;
mod schedule_tests;
