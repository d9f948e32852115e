pub mod space_track;
