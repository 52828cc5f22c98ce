pub mod visual_sync;
