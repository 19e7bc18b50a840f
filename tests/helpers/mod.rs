pub mod snapshot_builder;
