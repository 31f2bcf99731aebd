//! Business logic services for the meteorological observation service

pub mod lookup;
pub mod measurement;
pub mod observation;
pub mod vegetation;
pub mod zone;

pub use lookup::ObservationLookup;
pub use measurement::WeatherMeasurementService;
pub use observation::ObservationService;
pub use vegetation::VegetationService;
pub use zone::GeographicZoneService;
