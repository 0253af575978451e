//! End-to-end scenarios driving the engine through its public surface.

use std::sync::Arc;

use neighborhood_sim::domain::{
    fahrenheit_to_celsius, Battery, Dimensions, GeometryBounds, GradientBounds, MaterialTier, Season,
    SizeRange, ThermostatMode, WallMaterial, Weather,
};
use neighborhood_sim::simulation::{
    Building, HouseRef, ResidentialProfile, SimObserver, World, WorldConfig,
};
use neighborhood_sim::SimError;
use parking_lot::Mutex;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::rstest;

/// Collects `(house, clock, turned_on)` for every fan transition.
#[derive(Default)]
struct FanLog(Mutex<Vec<(HouseRef, u64, bool)>>);

impl FanLog {
    fn events(&self) -> Vec<(HouseRef, u64, bool)> {
        self.0.lock().clone()
    }
}

impl SimObserver for FanLog {
    fn on_fan_on(&self, house: HouseRef, clock: u64, _end_time: u64) {
        self.0.lock().push((house, clock, true));
    }

    fn on_fan_off(&self, house: HouseRef, clock: u64) {
        self.0.lock().push((house, clock, false));
    }
}

fn generate(config: &WorldConfig, seed: u64) -> World {
    let mut rng = StdRng::seed_from_u64(seed);
    World::configure_and_generate(config, &mut rng).unwrap()
}

#[test]
fn test_summer_sunny_single_home() {
    let config = WorldConfig::from_names("summer", "sunny", 1, 1).unwrap();
    let world = generate(&config, 1);

    let lo = fahrenheit_to_celsius(60.0 + 3.0);
    let hi = fahrenheit_to_celsius(85.3 + 3.0);
    assert!((world.climate().lo_temp() - lo).abs() < 1e-9);
    assert!((world.climate().hi_temp() - hi).abs() < 1e-9);

    // sin(0) = 0, so the seed is the midpoint of the bounds
    let ambient = world.ambient_temp(Some(0)).unwrap();
    assert!((ambient - (lo + hi) / 2.0).abs() < 1e-9);
    assert_eq!(world.world_info().clock, 0);
}

#[rstest]
#[case("fall", "cloudy")]
#[case("winter", "snowy")]
#[case("spring", "rainy")]
#[case("summer", "sunny")]
fn test_every_climate_steps_cleanly(#[case] season: &str, #[case] weather: &str) {
    let config = WorldConfig::from_names(season, weather, 2, 2).unwrap();
    let mut world = generate(&config, 3);
    world.run(30);

    assert_eq!(world.world_clock(), 30);
    assert_eq!(world.temp_history().len(), 31);
    for n_id in 0..2 {
        for h_id in 0..2 {
            let temp = world.building_interior_temp(n_id, h_id, None).unwrap();
            assert!(temp.is_finite());
            assert_eq!(world.building_color(n_id, h_id, None).unwrap().len(), 7);
        }
    }
}

#[test]
fn test_same_seed_same_world() {
    let config = WorldConfig::new(Season::Fall, Weather::Cloudy, 2, 4);
    let mut a = generate(&config, 77);
    let mut b = generate(&config, 77);
    a.run(50);
    b.run(50);

    for n_id in 0..2 {
        for h_id in 0..4 {
            assert_eq!(
                a.building_info(n_id, h_id, None).unwrap(),
                b.building_info(n_id, h_id, None).unwrap()
            );
        }
    }
}

#[test]
fn test_cooling_cycle_then_passive_drift() {
    let config = WorldConfig::new(Season::Summer, Weather::Sunny, 1, 1);
    let observer = Arc::new(FanLog::default());
    let mut world = generate(&config, 5).with_observer(Box::new(observer.clone()));

    world.set_target_temp(0, 0, fahrenheit_to_celsius(68.0)).unwrap();
    assert!(world.thermostat_fan(0, 0, true).unwrap());

    let info = world.thermostat_info(0, 0).unwrap();
    assert_eq!(info.mode, ThermostatMode::Cooling);
    let end_time = info.end_time.unwrap();
    assert!(end_time >= info.start_time.unwrap());

    world.run(end_time);
    let cooled = world.building_interior_temp(0, 0, None).unwrap();
    assert!((cooled - fahrenheit_to_celsius(68.0)).abs() < 1e-6);
    assert!(world.thermostat_info(0, 0).unwrap().running);

    world.run(10);
    assert!(!world.thermostat_info(0, 0).unwrap().running);
    // ambient is warmer than the target, so the house warms back up
    assert!(world.building_interior_temp(0, 0, None).unwrap() > cooled);

    let events = observer.events();
    assert_eq!(events.len(), 2);
    assert!(events[0].2 && !events[1].2);
    assert_eq!(events[1].1, end_time + 1);
}

#[test]
fn test_set_mode_off_stops_running_fan() {
    let mut world = generate(&WorldConfig::new(Season::Winter, Weather::Snowy, 1, 1), 8);
    world.set_mode(0, 0, 2).unwrap();
    world.set_target_temp(0, 0, 25.0).unwrap();
    assert!(world.thermostat_fan(0, 0, true).unwrap());

    world.run(3);
    world.set_mode(0, 0, 0).unwrap();
    let info = world.thermostat_info(0, 0).unwrap();
    assert!(!info.running);
    assert_eq!(info.end_time, Some(3));
}

#[test]
fn test_errors_are_classified() {
    let mut world = generate(&WorldConfig::new(Season::Spring, Weather::Rainy, 1, 1), 4);

    let lookup = [
        world.building_interior_temp(1, 0, None).unwrap_err(),
        world.solar_info(0, 1).unwrap_err(),
        world.device_info(0, 0, "hot_tub").unwrap_err(),
        world.ambient_temp(Some(99)).unwrap_err(),
    ];
    assert!(lookup.iter().all(SimError::is_lookup));

    let configuration = [
        world.set_mode(0, 0, 5).unwrap_err(),
        WorldConfig::from_names("summer", "windy", 1, 1).unwrap_err(),
    ];
    assert!(configuration.iter().all(SimError::is_configuration));
}

#[test]
fn test_info_records() {
    let world = generate(&WorldConfig::new(Season::Summer, Weather::Cloudy, 1, 1), 10);

    let battery = world.battery_info(0, 0).unwrap();
    assert_eq!(battery.amp_hours, 415.0);
    assert_eq!(battery.voltage_v, 12.0);
    assert_eq!(battery.max_capacity_j, 415.0 * 12.0 * 3600.0);

    let solar = world.solar_info(0, 0).unwrap();
    assert_eq!(solar.num_cells, 5);
    assert_eq!(solar.watts_per_cell, 300.0);
    assert_eq!(solar.efficiency, 0.20);

    let building = world.building_info(0, 0, Some(0)).unwrap();
    assert_eq!(building.interior_temp_c, world.ambient_temp(Some(0)).unwrap());
    assert!((1..=3).contains(&building.num_floors));

    let evcs = world.device_info(0, 0, "evcs").unwrap();
    assert_eq!(evcs.consumption_w, 24_000.0);
    assert_eq!(evcs.on_time, Some(0));
}

#[test]
fn test_custom_building_drifts_towards_ambient() {
    let mut building = Building::residential(
        0,
        0,
        ResidentialProfile {
            residents: 2,
            has_basement: true,
            has_pool: false,
            windows: 12,
        },
        2,
        Dimensions::new(10.0, 10.0, 2.5),
        WallMaterial::with_r_value(MaterialTier::High, 2.0, 0.15),
        GradientBounds::default(),
        0,
        22.0,
    )
    .unwrap();

    assert!(building.device("pool_pump").is_err());
    let delta = building.exchange_heat(30.0);
    assert!(delta > 0.0);
    assert!(building.air().temp_c > 22.0);
}

#[test]
fn test_battery_rejects_overcharge() {
    let max = Battery::default().max_capacity();
    let mut battery = Battery::default().with_charge(max - 10.0);
    assert!(!battery.charge(50.0));
    assert_eq!(battery.current_charge(None), Ok(max - 10.0));
    assert_eq!(battery.charge_history().len(), 1);
    assert!(battery.current_charge(Some(1)).unwrap_err().is_lookup());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_recorded_history_never_changes(seed in any::<u64>(), steps in 1u64..60, recorded in 0u64..60) {
        let mut world = generate(&WorldConfig::new(Season::Summer, Weather::Sunny, 1, 2), seed);
        world.run(steps);

        let recorded = recorded.min(steps);
        let ambient = world.ambient_temp(Some(recorded)).unwrap();
        let interior = world.building_interior_temp(0, 1, Some(recorded)).unwrap();

        world.run(25);
        prop_assert_eq!(world.world_clock(), steps + 25);
        prop_assert_eq!(world.temp_history().len() as u64, steps + 26);
        prop_assert_eq!(world.ambient_temp(Some(recorded)).unwrap(), ambient);
        prop_assert_eq!(world.building_interior_temp(0, 1, Some(recorded)).unwrap(), interior);
    }

    #[test]
    fn prop_small_footprints_stay_finite(
        min_length in -2.0f64..20.0,
        length_span in 0.0f64..10.0,
        min_width in -2.0f64..20.0,
        width_span in 0.0f64..10.0,
        seed in any::<u64>(),
        steps in 1u64..200,
    ) {
        let geometry = GeometryBounds::new(
            SizeRange::new(min_length, min_length + length_span),
            SizeRange::new(min_width, min_width + width_span),
        );
        let config = WorldConfig::new(Season::Winter, Weather::Snowy, 1, 2).with_geometry(geometry);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut world = match World::configure_and_generate(&config, &mut rng) {
            Ok(world) => world,
            Err(err) => {
                prop_assert!(err.is_configuration());
                prop_assert!(min_length <= 0.0 || min_width <= 0.0);
                return Ok(());
            }
        };
        world.run(steps);

        for step in 0..=steps {
            for h_id in 0..2 {
                let temp = world.building_interior_temp(0, h_id, Some(step)).unwrap();
                prop_assert!(temp.is_finite(), "house {} at step {}: {}", h_id, step, temp);
            }
        }
        prop_assert_eq!(world.building_color(0, 1, None).unwrap().len(), 7);
    }

    #[test]
    fn prop_battery_history_within_bounds(ops in prop::collection::vec((any::<bool>(), 0.0f64..5_000.0), 1..64)) {
        let mut battery = Battery::new(1.0, 1.0);
        for (charge, joules) in ops {
            if charge {
                battery.charge(joules);
            } else {
                battery.discharge(joules);
            }
        }
        let max = battery.max_capacity();
        prop_assert!(battery.charge_history().iter().all(|c| (0.0..=max).contains(c)));
    }
}
