pub mod locator;

pub use locator::{location_label, GeoLocator, IpApiLocator};
