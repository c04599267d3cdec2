//! The fixed scope catalog served by the API.

use crate::domain::scope::Scope;

/// Scopes are declared statically at process start; there is no runtime
/// scope creation.
pub fn default_scopes() -> Vec<Scope> {
    vec![
        Scope::new(
            "Sensors",
            &[
                "ID",
                "Designation",
                "SerialNumber",
                "Manufacturer",
                "ManufacturerNumber",
                "LocationID",
            ],
            Some("ID"),
        ),
        Scope::new("Locations", &["ID", "Designation", "Coordinates"], Some("ID")),
        Scope::new(
            "PhysicalQuantities",
            &["Name", "Unit", "FormulaSymbol"],
            Some("Name"),
        ),
        // Measurements carry no primary key; records are keyed by insertion index.
        Scope::new("Measurements", &["SensorID", "Date", "Unit", "Value"], None),
    ]
}
