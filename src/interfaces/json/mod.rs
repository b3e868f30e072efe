pub mod fixture_reader;
