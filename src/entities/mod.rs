pub mod movie_log;
