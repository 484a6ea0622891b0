mod dproperties;

pub use dproperties::DProperties;
