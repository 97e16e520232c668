//! Look up a near-Earth object on NASA NeoWs and print the scene of its orbit as JSON.
//!
//! ```text
//! cargo run --example plot_neo -- 2099942 2029-04-13
//! ```
//!
//! The first argument is the NeoWs object identifier, the following ones are selected
//! close-approach dates (the most frequent one titles the plot). Reference planets come from
//! JPL Horizons, tracked satellites from CelesTrak.

use std::env;

use log::info;
use neo_orbit::env_state::NeoEnv;
use neo_orbit::ephemeris::horizons::HorizonsEphemeris;
use neo_orbit::neo_errors::NeoError;
use neo_orbit::neows::NeoWsClient;
use neo_orbit::orbit_plot::{plot_orbit, PlotRequest};
use neo_orbit::propagation::{BatchPolicy, PropagationSettings};
use neo_orbit::tracking::TleTracking;

fn main() -> Result<(), NeoError> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let object_id = args.next().unwrap_or_else(|| "2099942".to_string());
    let selected_dates: Vec<String> = args.collect();

    let env = NeoEnv::from_env()?;
    let detail = NeoWsClient::new(env.clone()).lookup(&object_id)?;
    info!(
        "{}: {} close approaches, first {:?}",
        detail.name,
        detail.sorted_approaches.len(),
        detail.approach_dates().first()
    );

    let request = PlotRequest::from_detail(&detail, selected_dates);
    let ephemeris = HorizonsEphemeris::new(&env.config)?;
    let tracking = TleTracking::new(env);

    let outcome = plot_orbit(
        &request,
        &ephemeris,
        &tracking,
        &PropagationSettings::default(),
        BatchPolicy::SkipFailed,
    )?;
    for failure in &outcome.failures {
        eprintln!("orbit {} not plotted: {}", failure.orbit_id, failure.error);
    }

    println!("{}", outcome.scene.to_json_string()?);
    Ok(())
}
