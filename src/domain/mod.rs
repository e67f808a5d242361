pub mod actor;
pub mod debris;
pub mod geom;
pub mod lightning;
pub mod particles;
pub mod pose;
