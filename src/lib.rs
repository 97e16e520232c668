pub mod config;
pub mod constants;
pub mod env_state;
pub mod ephemeris;
pub mod kepler;
pub mod mode_selector;
pub mod neo_errors;
pub mod neows;
pub mod orbit_plot;
pub mod orbital_elements;
pub mod propagation;
pub mod scene;
pub mod tracking;
