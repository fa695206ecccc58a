pub mod facade;
pub mod headless;
pub mod layer;
pub mod raster;
pub mod registry;
pub mod surface;
pub mod symbology;
pub mod vector;

pub use facade::*;
pub use headless::*;
pub use layer::*;
pub use raster::*;
pub use registry::*;
pub use surface::*;
pub use symbology::*;
pub use vector::*;
