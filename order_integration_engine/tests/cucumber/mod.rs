mod integration_world;
mod setups;
mod steps;

pub use integration_world::IntegrationWorld;
