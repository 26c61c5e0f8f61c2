pub mod blend;
pub mod overlay;
pub mod params;
pub mod placement;
