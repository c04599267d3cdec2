//! Demo data generator: fills an empty registry with plausible sensor data.

use crate::domain::scope::ScopeRegistry;
use crate::storage::StoreError;
use chrono::{TimeZone, Utc};
use rand::Rng;
use serde_json::{json, Value as JsonValue};
use tracing::info;

const SENSOR_COUNT: usize = 200;
const MAX_MEASUREMENTS_PER_SENSOR: usize = 500;

const MANUFACTURERS: &[&str] = &["Manufacture1", "Manufacture2", "Manufacture3"];
const SENSOR_TYPES: &[&str] = &["Sensor1", "Sensor2"];

/// Seeding is wanted only on a genuinely fresh store: both reference
/// scopes must be empty.
pub fn wants_demo_data(registry: &ScopeRegistry) -> bool {
    let is_empty = |name: &str| {
        registry
            .get_all(name)
            .map_or(true, |values| values.is_empty())
    };
    is_empty("Locations") && is_empty("PhysicalQuantities")
}

pub fn generate_demo_data(registry: &mut ScopeRegistry) -> Result<(), StoreError> {
    info!("generating demo database");
    seed_physical_quantities(registry)?;
    seed_locations(registry)?;
    seed_sensors(registry)?;
    info!("demo database ready");
    Ok(())
}

fn seed_physical_quantities(registry: &mut ScopeRegistry) -> Result<(), StoreError> {
    info!("adding list of base physical quantities");
    registry.add_many(
        "PhysicalQuantities",
        &[
            json!({ "Name": "Length", "Unit": "metre", "FormulaSymbol": "m" }),
            json!({ "Name": "Mass", "Unit": "kilogram", "FormulaSymbol": "kg" }),
            json!({ "Name": "Time", "Unit": "second", "FormulaSymbol": "s" }),
            json!({ "Name": "ElectricCurrent", "Unit": "ampere", "FormulaSymbol": "A" }),
            json!({ "Name": "Temperature", "Unit": "kelvin", "FormulaSymbol": "K" }),
            json!({ "Name": "Amount Of Substance", "Unit": "mole", "FormulaSymbol": "mol" }),
            json!({ "Name": "Luminosity", "Unit": "candela", "FormulaSymbol": "cd" }),
        ],
    )?;
    Ok(())
}

fn seed_locations(registry: &mut ScopeRegistry) -> Result<(), StoreError> {
    info!("adding list of locations");
    registry.add_many(
        "Locations",
        &[
            json!({ "ID": 0, "Designation": "Studenzen", "Coordinates": [47.0104, 15.7945] }),
            json!({ "ID": 1, "Designation": "Fladnitz", "Coordinates": [47.9917, 15.7853] }),
            json!({ "ID": 2, "Designation": "Haiku Stairs", "Coordinates": [36.1146, -115.1728] }),
            json!({ "ID": 3, "Designation": "Crooked Forest", "Coordinates": [53.1969, 14.4930] }),
            json!({ "ID": 4, "Designation": "The Door to Hell", "Coordinates": [40.1833, 58.4] }),
        ],
    )?;
    Ok(())
}

fn seed_sensors(registry: &mut ScopeRegistry) -> Result<(), StoreError> {
    info!(count = SENSOR_COUNT, "generating random sensors and measurements");
    let mut rng = rand::thread_rng();

    let location_count = registry.get_all("Locations").map_or(0, |values| values.len());
    let units: Vec<String> = registry
        .get_all("PhysicalQuantities")
        .map(|values| values.keys().cloned().collect())
        .unwrap_or_default();

    let mut sensors = Vec::with_capacity(SENSOR_COUNT);
    let mut measurements = Vec::new();
    for sensor_id in 0..SENSOR_COUNT {
        sensors.push(json!({
            "ID": sensor_id,
            "Designation": SENSOR_TYPES[rng.gen_range(0..SENSOR_TYPES.len())],
            "SerialNumber": rng.gen_range(10_000_000..100_000_000u64),
            "Manufacturer": MANUFACTURERS[rng.gen_range(0..MANUFACTURERS.len())],
            "ManufacturerNumber": rng.gen_range(1_000..10_000u32),
            "LocationID": rng.gen_range(0..location_count.max(1)),
        }));

        let series_length = rng.gen_range(0..=MAX_MEASUREMENTS_PER_SENSOR);
        for _ in 0..series_length {
            measurements.push(measurement(sensor_id, &units, &mut rng));
        }
    }

    info!(count = sensors.len(), "adding list of sensors");
    registry.add_many("Sensors", &sensors)?;

    info!(count = measurements.len(), "adding list of measurements");
    registry.add_many("Measurements", &measurements)?;
    Ok(())
}

fn measurement(sensor_id: usize, units: &[String], rng: &mut impl Rng) -> JsonValue {
    let unit = if units.is_empty() {
        JsonValue::Null
    } else {
        JsonValue::String(units[rng.gen_range(0..units.len())].clone())
    };

    json!({
        "SensorID": sensor_id,
        "Date": random_date(rng).to_rfc3339(),
        "Unit": unit,
        "Value": rng.gen_range(0..1_000),
    })
}

/// A uniformly random instant between the epoch and now.
fn random_date(rng: &mut impl Rng) -> chrono::DateTime<Utc> {
    let now = Utc::now().timestamp();
    Utc.timestamp_opt(rng.gen_range(0..now), 0)
        .single()
        .unwrap_or_else(Utc::now)
}
