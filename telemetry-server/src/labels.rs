/// Колонки экспорта OpenRocket, в порядке следования в CSV
pub(crate) const ORK_LABELS: [&str; 54] = [
    "Time",                           // (s)
    "Altitude",                       // (m)
    "Vertical velocity",              // (m/s)
    "Vertical acceleration",          // (m/s^2)
    "Total velocity",                 // (m/s)
    "Total acceleration",             // (m/s^2)
    "Position East of launch",        // (m)
    "Position North of launch",       // (m)
    "Lateral distance",               // (m)
    "Lateral direction",              // (deg)
    "Lateral velocity",               // (m/s)
    "Lateral acceleration",           // (m/s^2)
    "Latitude",                       // (deg)
    "Longitude",                      // (deg)
    "Gravitational acceleration",     // (m/s^2)
    "Angle of attack",                // (deg)
    "Roll rate",                      // (deg/s)
    "Pitch rate",                     // (deg/s)
    "Yaw rate",                       // (deg/s)
    "Mass",                           // (g)
    "Propellant mass",                // (g)
    "Longitudinal moment of inertia", // (kg*m^2)
    "Rotational moment of inertia",   // (kg*m^2)
    "CP location",                    // (cm)
    "CG location",                    // (cm)
    "Stability margin calibers",
    "Mach number",
    "Reynolds number",
    "Thrust",                    // (N)
    "Drag force",                // (N)
    "Drag coefficient",
    "Axial drag coefficient",
    "Friction drag coefficient",
    "Pressure drag coefficient",
    "Base drag coefficient",
    "Normal force coefficient",
    "Pitch moment coefficient",
    "Yaw moment coefficient",
    "Side force coefficient",
    "Roll moment coefficient",
    "Roll forcing coefficient",
    "Roll damping coefficient",
    "Pitch damping coefficient",
    "Coriolis acceleration",         // (m/s^2)
    "Reference length",              // (cm)
    "Reference area",                // (cm^2)
    "Vertical orientation (zenith)", // (deg)
    "Lateral orientation (azimuth)", // (deg)
    "Wind velocity",                 // (m/s)
    "Air temperature",               // (deg C)
    "Air pressure",                  // (mbar)
    "Speed of sound",                // (m/s)
    "Simulation time step",          // (s)
    "Computation time",              // (s)
];

/// Индекс колонки `Time`
pub(crate) const TIME_COLUMN: usize = 0;

pub(crate) fn label_index(label: &str) -> Option<usize> {
    ORK_LABELS.iter().position(|l| *l == label)
}
